//! Stage entity type - a delivery phase within a project

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Status};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::record::Record;
use crate::core::value::Value;
use crate::schema::record::{FieldKind, RecordSchema, SortOrder};

/// A phase of work belonging to one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    /// Unique identifier
    pub id: EntityId,

    /// Stage name
    pub name: String,

    /// Owning project
    pub project: EntityId,

    #[serde(default)]
    pub status: Status,

    /// Person responsible for the stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created: DateTime<Utc>,

    pub author: String,
}

impl Stage {
    pub fn new(name: String, project: EntityId, author: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Stg),
            name,
            project,
            status: Status::default(),
            owner: None,
            start_date: None,
            end_date: None,
            description: None,
            created: Utc::now(),
            author,
        }
    }
}

impl Record for Stage {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Text(self.id.to_string())),
            "name" => Some(Value::Text(self.name.clone())),
            "project" => Some(Value::Text(self.project.to_string())),
            "status" => Some(Value::Tag(self.status.to_string())),
            "owner" => self.owner.clone().map(Value::Text),
            "start_date" => self.start_date.map(Value::Date),
            "end_date" => self.end_date.map(Value::Date),
            "created" => Some(Value::Timestamp(self.created)),
            "author" => Some(Value::Text(self.author.clone())),
            _ => None,
        }
    }
}

impl Entity for Stage {
    const PREFIX: EntityPrefix = EntityPrefix::Stg;

    fn schema() -> RecordSchema {
        RecordSchema::builder("stage")
            .field("id", "ID", FieldKind::Text)
            .field("name", "Name", FieldKind::Text)
            .field("project", "Project", FieldKind::Text)
            .tag("status", "Status", Status::OPTIONS)
            .field("owner", "Owner", FieldKind::Text)
            .field("start_date", "Start", FieldKind::Date)
            .field("end_date", "End", FieldKind::Date)
            .field("created", "Created", FieldKind::Timestamp)
            .field("author", "Author", FieldKind::Text)
            .searchable(&["name", "owner"])
            .sort_key("newest", "Newest first", "created", SortOrder::Descending)
            .sort_key("oldest", "Oldest first", "created", SortOrder::Ascending)
            .sort_key("name", "Name (A-Z)", "name", SortOrder::Ascending)
            .sort_key("start_date", "Start date", "start_date", SortOrder::Ascending)
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
        Stage::schema().validate().unwrap();
    }

    #[test]
    fn test_fields() {
        let project = EntityId::new(EntityPrefix::Prj);
        let mut stage = Stage::new("Design".into(), project.clone(), "dana".into());
        stage.status = Status::InProgress;
        assert_eq!(stage.field("project"), Some(Value::Text(project.to_string())));
        assert_eq!(stage.field("status"), Some(Value::Tag("in_progress".into())));
        assert_eq!(stage.field("owner"), None);
    }
}
