//! Task entity type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Priority, Status};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::record::Record;
use crate::core::value::Value;
use crate::schema::record::{FieldKind, RecordSchema, SortOrder};

/// A unit of work, optionally attached to a project and stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: EntityId,

    /// Task name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Estimated effort in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate_hours: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created: DateTime<Utc>,

    pub author: String,
}

impl Task {
    pub fn new(name: String, author: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Tsk),
            name,
            project: None,
            stage: None,
            assignee: None,
            status: Status::default(),
            priority: Priority::default(),
            due_date: None,
            estimate_hours: None,
            description: None,
            created: Utc::now(),
            author,
        }
    }
}

impl Record for Task {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Text(self.id.to_string())),
            "name" => Some(Value::Text(self.name.clone())),
            "project" => self.project.as_ref().map(|p| Value::Text(p.to_string())),
            "stage" => self.stage.as_ref().map(|s| Value::Text(s.to_string())),
            "assignee" => self.assignee.clone().map(Value::Text),
            "status" => Some(Value::Tag(self.status.to_string())),
            "priority" => Some(Value::Tag(self.priority.to_string())),
            "due_date" => self.due_date.map(Value::Date),
            "estimate_hours" => self.estimate_hours.map(Value::Number),
            "created" => Some(Value::Timestamp(self.created)),
            "author" => Some(Value::Text(self.author.clone())),
            _ => None,
        }
    }
}

impl Entity for Task {
    const PREFIX: EntityPrefix = EntityPrefix::Tsk;

    fn schema() -> RecordSchema {
        RecordSchema::builder("task")
            .field("id", "ID", FieldKind::Text)
            .field("name", "Name", FieldKind::Text)
            .field("project", "Project", FieldKind::Text)
            .field("stage", "Stage", FieldKind::Text)
            .field("assignee", "Assignee", FieldKind::Text)
            .tag("status", "Status", Status::OPTIONS)
            .tag("priority", "Priority", Priority::OPTIONS)
            .field("due_date", "Due", FieldKind::Date)
            .field("estimate_hours", "Estimate (h)", FieldKind::Number)
            .field("created", "Created", FieldKind::Timestamp)
            .field("author", "Author", FieldKind::Text)
            .searchable(&["name", "assignee"])
            .sort_key("newest", "Newest first", "created", SortOrder::Descending)
            .sort_key("oldest", "Oldest first", "created", SortOrder::Ascending)
            .sort_key("name", "Name (A-Z)", "name", SortOrder::Ascending)
            .sort_key("due_date", "Due date (soonest)", "due_date", SortOrder::Ascending)
            .sort_key("priority", "Priority (highest first)", "priority", SortOrder::Descending)
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
        Task::schema().validate().unwrap();
    }

    #[test]
    fn test_optional_links_are_absent_fields() {
        let task = Task::new("Setup DB".into(), "dana".into());
        assert_eq!(task.field("project"), None);
        assert_eq!(task.field("status"), Some(Value::Tag("todo".into())));
        assert_eq!(task.field("priority"), Some(Value::Tag("medium".into())));
    }
}
