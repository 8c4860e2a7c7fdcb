//! Audit log entry entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::record::Record;
use crate::core::value::Value;
use crate::schema::record::{FieldKind, RecordSchema, SortOrder};

/// What kind of event an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditCategory {
    Create,
    #[default]
    Update,
    Delete,
    Login,
    Approval,
}

impl AuditCategory {
    pub const OPTIONS: &'static [&'static str] =
        &["create", "update", "delete", "login", "approval"];
}

impl std::fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditCategory::Create => write!(f, "create"),
            AuditCategory::Update => write!(f, "update"),
            AuditCategory::Delete => write!(f, "delete"),
            AuditCategory::Login => write!(f, "login"),
            AuditCategory::Approval => write!(f, "approval"),
        }
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: EntityId,

    /// Human readable description of the action
    pub action: String,

    /// User who performed it
    pub user: String,

    /// Affected record, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default)]
    pub category: AuditCategory,

    /// When it happened
    pub created: DateTime<Utc>,
}

impl Record for AuditLogEntry {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Text(self.id.to_string())),
            "action" => Some(Value::Text(self.action.clone())),
            "user" => Some(Value::Text(self.user.clone())),
            "target" => self.target.clone().map(Value::Text),
            "category" => Some(Value::Tag(self.category.to_string())),
            "created" => Some(Value::Timestamp(self.created)),
            _ => None,
        }
    }
}

impl Entity for AuditLogEntry {
    const PREFIX: EntityPrefix = EntityPrefix::Log;

    fn schema() -> RecordSchema {
        RecordSchema::builder("audit")
            .title_field("action")
            .field("id", "ID", FieldKind::Text)
            .field("action", "Action", FieldKind::Text)
            .field("user", "User", FieldKind::Text)
            .field("target", "Target", FieldKind::Text)
            .tag("category", "Category", AuditCategory::OPTIONS)
            .field("created", "Timestamp", FieldKind::Timestamp)
            .searchable(&["action", "user"])
            .sort_key("newest", "Newest first", "created", SortOrder::Descending)
            .sort_key("oldest", "Oldest first", "created", SortOrder::Ascending)
            .sort_key("user", "User (A-Z)", "user", SortOrder::Ascending)
            .build()
    }

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.action
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_consistent() {
        AuditLogEntry::schema().validate().unwrap();
    }

    #[test]
    fn test_title_is_action() {
        let schema = AuditLogEntry::schema();
        assert_eq!(schema.title_field(), "action");
        assert_eq!(
            schema.searchable_fields(),
            &["action".to_string(), "user".to_string()]
        );
    }
}
