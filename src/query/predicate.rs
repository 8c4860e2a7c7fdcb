//! Predicate Set - the current query intent of one list view
//!
//! Mutators validate against the bound schema immediately, so a bad field
//! name or sort key is rejected at the call site and the set is left as it
//! was before the call.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::store::RecordStore;
use crate::query::error::QueryResult;
use crate::schema::record::RecordSchema;

/// Search text, field filters and sort key for one query session
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateSet {
    schema: RecordSchema,
    search_text: String,
    search_fields: Vec<String>,
    field_filters: BTreeMap<String, String>,
    sort_key: String,
    default_sort: String,
}

impl PredicateSet {
    /// Create an empty predicate set bound to a schema
    pub fn new(schema: &RecordSchema) -> Self {
        Self {
            schema: schema.clone(),
            search_text: String::new(),
            search_fields: schema.searchable_fields().to_vec(),
            field_filters: BTreeMap::new(),
            sort_key: schema.default_sort().to_string(),
            default_sort: schema.default_sort().to_string(),
        }
    }

    /// Create an empty predicate set for the records of a store
    pub fn for_store<S: RecordStore>(store: &S) -> Self {
        Self::new(store.schema())
    }

    /// Replace the free-text query; an empty string clears it
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        debug!(entity = self.schema.entity(), search = %self.search_text, "search text set");
    }

    /// Set or clear (empty value) the filter on one field
    pub fn set_field_filter(&mut self, field: &str, value: impl Into<String>) -> QueryResult<()> {
        self.schema.require_field(field)?;
        let value = value.into();
        if value.is_empty() {
            self.field_filters.remove(field);
            debug!(entity = self.schema.entity(), field, "field filter cleared");
        } else {
            debug!(entity = self.schema.entity(), field, %value, "field filter set");
            self.field_filters.insert(field.to_string(), value);
        }
        Ok(())
    }

    /// Replace the active sort strategy
    pub fn set_sort_key(&mut self, key: &str) -> QueryResult<()> {
        self.schema.require_sort_key(key)?;
        self.sort_key = key.to_string();
        debug!(entity = self.schema.entity(), key, "sort key set");
        Ok(())
    }

    /// Override which fields free-text search looks at
    pub fn set_search_fields<I, S>(&mut self, fields: I) -> QueryResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = Vec::new();
        for field in fields {
            let def = self.schema.require_field(field.as_ref())?;
            resolved.push(def.name.clone());
        }
        self.search_fields = resolved;
        Ok(())
    }

    /// Change the sort key `reset()` restores
    pub fn set_default_sort_key(&mut self, key: &str) -> QueryResult<()> {
        self.schema.require_sort_key(key)?;
        self.default_sort = key.to_string();
        Ok(())
    }

    /// Clear search text and filters, restore the default sort key
    pub fn reset(&mut self) {
        self.search_text.clear();
        self.field_filters.clear();
        self.sort_key = self.default_sort.clone();
        debug!(entity = self.schema.entity(), "predicates reset");
    }

    /// Number of non-empty field filters
    pub fn active_filter_count(&self) -> usize {
        self.field_filters.values().filter(|v| !v.is_empty()).count()
    }

    /// True when neither search text nor any filter is active
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.active_filter_count() == 0
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    pub fn field_filter(&self, field: &str) -> Option<&str> {
        self.field_filters.get(field).map(String::as_str)
    }

    /// Active filters in field-name order
    pub fn field_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.field_filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub fn default_sort_key(&self) -> &str {
        &self.default_sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::error::QueryError;
    use crate::schema::record::{FieldKind, SortOrder};

    fn schema() -> RecordSchema {
        RecordSchema::builder("task")
            .field("id", "ID", FieldKind::Text)
            .field("name", "Name", FieldKind::Text)
            .field("assignee", "Assignee", FieldKind::Text)
            .tag("status", "Status", &["todo", "in_progress", "done"])
            .field("created", "Created", FieldKind::Timestamp)
            .searchable(&["name"])
            .sort_key("newest", "Newest first", "created", SortOrder::Descending)
            .sort_key("name", "Name (A-Z)", "name", SortOrder::Ascending)
            .build()
    }

    #[test]
    fn test_new_is_empty_with_default_sort() {
        let p = PredicateSet::new(&schema());
        assert!(p.is_empty());
        assert_eq!(p.sort_key(), "newest");
        assert_eq!(p.search_fields(), &["name".to_string()]);
        assert_eq!(p.active_filter_count(), 0);
    }

    #[test]
    fn test_empty_filter_value_clears() {
        let mut p = PredicateSet::new(&schema());
        p.set_field_filter("status", "todo").unwrap();
        assert_eq!(p.active_filter_count(), 1);
        p.set_field_filter("status", "").unwrap();
        assert_eq!(p.active_filter_count(), 0);
        assert_eq!(p.field_filter("status"), None);
    }

    #[test]
    fn test_empty_sentinel_never_counted() {
        let mut p = PredicateSet::new(&schema());
        p.set_field_filter("status", "").unwrap();
        assert_eq!(p.active_filter_count(), 0);
        assert!(p.is_empty());
    }

    #[test]
    fn test_multiple_filters() {
        let mut p = PredicateSet::new(&schema());
        p.set_field_filter("status", "todo").unwrap();
        p.set_field_filter("assignee", "Dana").unwrap();
        assert_eq!(p.active_filter_count(), 2);
        let filters: Vec<_> = p.field_filters().collect();
        assert_eq!(filters, vec![("assignee", "Dana"), ("status", "todo")]);
    }

    #[test]
    fn test_unknown_filter_field_leaves_state() {
        let mut p = PredicateSet::new(&schema());
        p.set_field_filter("status", "done").unwrap();
        let before = p.clone();
        let err = p.set_field_filter("colour", "red").unwrap_err();
        assert!(matches!(err, QueryError::UnknownField { ref field, .. } if field == "colour"));
        assert_eq!(p, before);
    }

    #[test]
    fn test_invalid_sort_key_keeps_previous() {
        let mut p = PredicateSet::new(&schema());
        p.set_sort_key("name").unwrap();
        let err = p.set_sort_key("unknown_key").unwrap_err();
        assert!(matches!(err, QueryError::InvalidSortKey { ref key, .. } if key == "unknown_key"));
        assert_eq!(p.sort_key(), "name");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut p = PredicateSet::new(&schema());
        p.set_search_text("db");
        p.set_field_filter("status", "todo").unwrap();
        p.set_sort_key("name").unwrap();

        p.reset();
        let once = p.clone();
        p.reset();
        assert_eq!(p, once);
        assert!(p.is_empty());
        assert_eq!(p.sort_key(), "newest");
    }

    #[test]
    fn test_reset_restores_configured_default() {
        let mut p = PredicateSet::new(&schema());
        p.set_default_sort_key("name").unwrap();
        assert_eq!(p.sort_key(), "newest");
        p.reset();
        assert_eq!(p.sort_key(), "name");
        assert!(p.set_default_sort_key("bogus").is_err());
        assert_eq!(p.default_sort_key(), "name");
    }

    #[test]
    fn test_search_field_override() {
        let mut p = PredicateSet::new(&schema());
        p.set_search_fields(["name", "assignee"]).unwrap();
        assert_eq!(p.search_fields().len(), 2);
        assert!(p.set_search_fields(["name", "nope"]).is_err());
        // failed override leaves the previous list in place
        assert_eq!(p.search_fields(), &["name".to_string(), "assignee".to_string()]);
    }
}
