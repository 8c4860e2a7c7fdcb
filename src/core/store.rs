//! Record stores - in-memory collections standing in for a database

use thiserror::Error;
use tracing::debug;

use crate::core::record::Record;
use crate::schema::record::RecordSchema;

/// Read interface the query pipeline evaluates against
pub trait RecordStore {
    type Item: Record;

    /// All records in source order
    fn list_all(&self) -> &[Self::Item];

    /// Schema describing the records
    fn schema(&self) -> &RecordSchema;
}

/// Errors raised by store mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("a {entity} record with key '{key}' already exists")]
    DuplicateKey { entity: String, key: String },

    #[error("no {entity} record with key '{key}'")]
    NotFound { entity: String, key: String },
}

/// A vector-backed record store
///
/// Source order is insertion order; updates keep a record in place and
/// deletes close the gap.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    schema: RecordSchema,
    records: Vec<T>,
}

impl<T: Record> MemoryStore<T> {
    /// Create an empty store for the given schema
    pub fn new(schema: RecordSchema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Create a store pre-populated with records.
    /// Later duplicates of a key are dropped.
    pub fn with_records(schema: RecordSchema, records: impl IntoIterator<Item = T>) -> Self {
        let mut store = Self::new(schema);
        for record in records {
            if let Err(e) = store.create(record) {
                tracing::warn!(error = %e, "skipping duplicate record");
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a record by key
    pub fn get(&self, key: &str) -> Option<&T> {
        self.records.iter().find(|r| r.key() == key)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.records.iter().position(|r| r.key() == key)
    }

    fn not_found(&self, key: &str) -> StoreError {
        StoreError::NotFound {
            entity: self.schema.entity().to_string(),
            key: key.to_string(),
        }
    }

    /// Append a new record
    pub fn create(&mut self, record: T) -> Result<(), StoreError> {
        let key = record.key();
        if self.position(&key).is_some() {
            return Err(StoreError::DuplicateKey {
                entity: self.schema.entity().to_string(),
                key,
            });
        }
        debug!(entity = self.schema.entity(), %key, "record created");
        self.records.push(record);
        Ok(())
    }

    /// Replace the record with the same key, keeping its position
    pub fn update(&mut self, record: T) -> Result<(), StoreError> {
        let key = record.key();
        let idx = self.position(&key).ok_or_else(|| self.not_found(&key))?;
        debug!(entity = self.schema.entity(), %key, "record updated");
        self.records[idx] = record;
        Ok(())
    }

    /// Remove and return the record with the given key
    pub fn delete(&mut self, key: &str) -> Result<T, StoreError> {
        let idx = self.position(key).ok_or_else(|| self.not_found(key))?;
        debug!(entity = self.schema.entity(), %key, "record deleted");
        Ok(self.records.remove(idx))
    }
}

impl<T: Record> RecordStore for MemoryStore<T> {
    type Item = T;

    fn list_all(&self) -> &[T] {
        &self.records
    }

    fn schema(&self) -> &RecordSchema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::FieldBag;
    use crate::schema::record::{FieldKind, SortOrder};

    fn schema() -> RecordSchema {
        RecordSchema::builder("note")
            .field("id", "ID", FieldKind::Text)
            .field("name", "Name", FieldKind::Text)
            .searchable(&["name"])
            .sort_key("name", "Name", "name", SortOrder::Ascending)
            .build()
    }

    #[test]
    fn test_create_and_list() {
        let mut store = MemoryStore::new(schema());
        store.create(FieldBag::new("a").with("name", "First")).unwrap();
        store.create(FieldBag::new("b").with("name", "Second")).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.list_all()[1].key(), "b");
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut store = MemoryStore::new(schema());
        store.create(FieldBag::new("a")).unwrap();
        let err = store.create(FieldBag::new("a")).unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateKey {
                entity: "note".into(),
                key: "a".into()
            }
        );
    }

    #[test]
    fn test_update_keeps_position() {
        let mut store = MemoryStore::with_records(
            schema(),
            vec![FieldBag::new("a"), FieldBag::new("b"), FieldBag::new("c")],
        );
        store.update(FieldBag::new("b").with("name", "changed")).unwrap();
        let keys: Vec<String> = store.list_all().iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(
            store.get("b").and_then(|r| r.field("name")).map(|v| v.to_string()),
            Some("changed".to_string())
        );
    }

    #[test]
    fn test_missing_keys() {
        let mut store: MemoryStore<FieldBag> = MemoryStore::new(schema());
        assert!(matches!(
            store.update(FieldBag::new("x")),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(store.delete("x"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_delete_reflected_in_list() {
        let mut store =
            MemoryStore::with_records(schema(), vec![FieldBag::new("a"), FieldBag::new("b")]);
        let removed = store.delete("a").unwrap();
        assert_eq!(removed.key(), "a");
        assert_eq!(store.list_all().len(), 1);
        assert!(store.get("a").is_none());
    }
}
