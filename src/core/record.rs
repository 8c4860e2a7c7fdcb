//! Record trait - the field-bag view the query pipeline works against

use std::collections::HashMap;

use crate::core::value::Value;

/// A record as seen by the query pipeline: a stable key plus named scalar fields
///
/// Records are immutable from the pipeline's perspective; it only ever reads
/// fields and clones matching records into a fresh result.
pub trait Record: Clone {
    /// Stable unique key
    fn key(&self) -> String;

    /// Value of the named field, `None` when unset or unknown
    fn field(&self, name: &str) -> Option<Value>;
}

/// A dynamic record backed by a map of field values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBag {
    key: String,
    values: HashMap<String, Value>,
}

impl FieldBag {
    /// Create an empty bag with the given key (also exposed as field `id`)
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: HashMap::new(),
        }
    }

    /// Builder-style setter
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }
}

impl Record for FieldBag {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn field(&self, name: &str) -> Option<Value> {
        if name == "id" {
            return Some(Value::Text(self.key.clone()));
        }
        self.values.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_bag_exposes_key_as_id() {
        let bag = FieldBag::new("r1").with("name", "Alice Smith");
        assert_eq!(bag.key(), "r1");
        assert_eq!(bag.field("id"), Some(Value::Text("r1".into())));
        assert_eq!(bag.field("name"), Some(Value::Text("Alice Smith".into())));
        assert_eq!(bag.field("missing"), None);
    }
}
