//! Document entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::record::Record;
use crate::core::value::Value;
use crate::schema::record::{FieldKind, RecordSchema, SortOrder};

/// Document category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Contract,
    Drawing,
    Report,
    Invoice,
    #[default]
    Other,
}

impl DocumentKind {
    pub const OPTIONS: &'static [&'static str] =
        &["contract", "drawing", "report", "invoice", "other"];
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Contract => write!(f, "contract"),
            DocumentKind::Drawing => write!(f, "drawing"),
            DocumentKind::Report => write!(f, "report"),
            DocumentKind::Invoice => write!(f, "invoice"),
            DocumentKind::Other => write!(f, "other"),
        }
    }
}

/// An uploaded file attached to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: EntityId,

    /// File name as shown in the documents list
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<EntityId>,

    #[serde(default)]
    pub kind: DocumentKind,

    /// File size in kilobytes
    #[serde(default)]
    pub size_kb: f64,

    /// Upload timestamp
    pub created: DateTime<Utc>,

    /// Who uploaded the file
    pub author: String,
}

impl Record for Document {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Text(self.id.to_string())),
            "name" => Some(Value::Text(self.name.clone())),
            "project" => self.project.as_ref().map(|p| Value::Text(p.to_string())),
            "kind" => Some(Value::Tag(self.kind.to_string())),
            "size_kb" => Some(Value::Number(self.size_kb)),
            "created" => Some(Value::Timestamp(self.created)),
            "author" => Some(Value::Text(self.author.clone())),
            _ => None,
        }
    }
}

impl Entity for Document {
    const PREFIX: EntityPrefix = EntityPrefix::Doc;

    fn schema() -> RecordSchema {
        RecordSchema::builder("document")
            .field("id", "ID", FieldKind::Text)
            .field("name", "Name", FieldKind::Text)
            .field("project", "Project", FieldKind::Text)
            .tag("kind", "Kind", DocumentKind::OPTIONS)
            .field("size_kb", "Size (KB)", FieldKind::Number)
            .field("created", "Uploaded", FieldKind::Timestamp)
            .field("author", "Uploaded by", FieldKind::Text)
            .searchable(&["name"])
            .sort_key("newest", "Newest first", "created", SortOrder::Descending)
            .sort_key("oldest", "Oldest first", "created", SortOrder::Ascending)
            .sort_key("name", "Name (A-Z)", "name", SortOrder::Ascending)
            .sort_key("size", "Largest first", "size_kb", SortOrder::Descending)
            .build()
    }

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_consistent() {
        Document::schema().validate().unwrap();
    }

    #[test]
    fn test_search_covers_name_only() {
        assert_eq!(Document::schema().searchable_fields(), &["name".to_string()]);
    }
}
