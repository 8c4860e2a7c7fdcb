//! Record schemas
//!
//! A [`RecordSchema`] describes one entity type to the query pipeline: which
//! fields exist, which of them free-text search looks at, and which sort
//! strategies are registered.

use serde::Serialize;

use crate::query::error::{QueryError, QueryResult};

/// Kind of value a field holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "options")]
pub enum FieldKind {
    Text,
    Number,
    /// Enumerated tag; options are listed in workflow order
    Tag(Vec<String>),
    Date,
    Timestamp,
}

impl FieldKind {
    pub fn is_tag(&self) -> bool {
        matches!(self, FieldKind::Tag(_))
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Tag(_) => write!(f, "tag"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// A single field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FieldDef {
    /// Position of a tag option in workflow order
    pub fn option_rank(&self, value: &str) -> Option<usize> {
        match &self.kind {
            FieldKind::Tag(options) => options.iter().position(|o| o == value),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "asc"),
            SortOrder::Descending => write!(f, "desc"),
        }
    }
}

/// A registered comparison strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub name: String,
    pub label: String,
    pub field: String,
    pub order: SortOrder,
}

/// Schema for one entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSchema {
    entity: String,
    key_field: String,
    title_field: String,
    fields: Vec<FieldDef>,
    searchable: Vec<String>,
    sort_keys: Vec<SortKey>,
    default_sort: String,
}

impl RecordSchema {
    /// Start building a schema for the named entity
    pub fn builder(entity: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            schema: RecordSchema {
                entity: entity.into(),
                key_field: "id".to_string(),
                title_field: "name".to_string(),
                fields: Vec::new(),
                searchable: Vec::new(),
                sort_keys: Vec::new(),
                default_sort: String::new(),
            },
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Field shown as the record's title in search results
    pub fn title_field(&self) -> &str {
        &self.title_field
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn searchable_fields(&self) -> &[String] {
        &self.searchable
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    pub fn default_sort(&self) -> &str {
        &self.default_sort
    }

    /// Look up a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a sort key by name
    pub fn sort_key(&self, name: &str) -> Option<&SortKey> {
        self.sort_keys.iter().find(|k| k.name == name)
    }

    /// Look up a field, failing with `UnknownField`
    pub fn require_field(&self, name: &str) -> QueryResult<&FieldDef> {
        self.field(name).ok_or_else(|| QueryError::UnknownField {
            entity: self.entity.clone(),
            field: name.to_string(),
            valid: self.field_names().join(", "),
        })
    }

    /// Look up a sort key, failing with `InvalidSortKey`
    pub fn require_sort_key(&self, name: &str) -> QueryResult<&SortKey> {
        self.sort_key(name).ok_or_else(|| QueryError::InvalidSortKey {
            entity: self.entity.clone(),
            key: name.to_string(),
            valid: self.sort_key_names().join(", "),
        })
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn sort_key_names(&self) -> Vec<&str> {
        self.sort_keys.iter().map(|k| k.name.as_str()).collect()
    }

    /// Check that every searchable field, sort field and the default sort key
    /// refer to something this schema defines
    pub fn validate(&self) -> QueryResult<()> {
        self.require_field(&self.key_field)?;
        self.require_field(&self.title_field)?;
        for name in &self.searchable {
            self.require_field(name)?;
        }
        for key in &self.sort_keys {
            self.require_field(&key.field)?;
        }
        self.require_sort_key(&self.default_sort)?;
        Ok(())
    }
}

/// Builder for [`RecordSchema`]
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    schema: RecordSchema,
}

impl RecordSchemaBuilder {
    /// Override the key field (defaults to `id`)
    pub fn key_field(mut self, name: &str) -> Self {
        self.schema.key_field = name.to_string();
        self
    }

    /// Override the title field (defaults to `name`)
    pub fn title_field(mut self, name: &str) -> Self {
        self.schema.title_field = name.to_string();
        self
    }

    pub fn field(mut self, name: &str, label: &str, kind: FieldKind) -> Self {
        self.schema.fields.push(FieldDef {
            name: name.to_string(),
            label: label.to_string(),
            kind,
        });
        self
    }

    /// Shorthand for a tag field with the given options
    pub fn tag(self, name: &str, label: &str, options: &[&str]) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        self.field(name, label, FieldKind::Tag(options))
    }

    pub fn searchable(mut self, names: &[&str]) -> Self {
        self.schema.searchable = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Register a sort key; the first one registered becomes the default
    pub fn sort_key(mut self, name: &str, label: &str, field: &str, order: SortOrder) -> Self {
        if self.schema.sort_keys.is_empty() {
            self.schema.default_sort = name.to_string();
        }
        self.schema.sort_keys.push(SortKey {
            name: name.to_string(),
            label: label.to_string(),
            field: field.to_string(),
            order,
        });
        self
    }

    pub fn default_sort(mut self, name: &str) -> Self {
        self.schema.default_sort = name.to_string();
        self
    }

    pub fn build(self) -> RecordSchema {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordSchema {
        RecordSchema::builder("widget")
            .field("id", "ID", FieldKind::Text)
            .field("name", "Name", FieldKind::Text)
            .tag("state", "State", &["open", "closed"])
            .searchable(&["name"])
            .sort_key("name", "Name (A-Z)", "name", SortOrder::Ascending)
            .sort_key("state", "State", "state", SortOrder::Ascending)
            .build()
    }

    #[test]
    fn test_first_sort_key_is_default() {
        let schema = sample();
        assert_eq!(schema.default_sort(), "name");
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_require_field_reports_valid_names() {
        let err = sample().require_field("colour").unwrap_err();
        match err {
            QueryError::UnknownField { entity, field, valid } => {
                assert_eq!(entity, "widget");
                assert_eq!(field, "colour");
                assert_eq!(valid, "id, name, state");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_catches_bad_searchable_field() {
        let schema = RecordSchema::builder("widget")
            .field("id", "ID", FieldKind::Text)
            .field("name", "Name", FieldKind::Text)
            .searchable(&["missing"])
            .sort_key("id", "ID", "id", SortOrder::Ascending)
            .build();
        assert!(matches!(
            schema.validate(),
            Err(QueryError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_option_rank() {
        let schema = sample();
        let state = schema.field("state").unwrap();
        assert_eq!(state.option_rank("closed"), Some(1));
        assert_eq!(state.option_rank("archived"), None);
        assert_eq!(schema.field("name").unwrap().option_rank("x"), None);
    }
}
