//! Project entity type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Priority};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::record::Record;
use crate::core::value::Value;
use crate::schema::record::{FieldKind, RecordSchema, SortOrder};

/// Delivery stage of a project (the kanban board columns)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStage {
    #[default]
    Prospecting,
    Planning,
    InProgress,
    Review,
    SignedOff,
}

impl ProjectStage {
    pub const OPTIONS: &'static [&'static str] =
        &["prospecting", "planning", "in_progress", "review", "signed_off"];

    /// All stages in workflow order
    pub fn all() -> &'static [ProjectStage] {
        &[
            ProjectStage::Prospecting,
            ProjectStage::Planning,
            ProjectStage::InProgress,
            ProjectStage::Review,
            ProjectStage::SignedOff,
        ]
    }

    /// The stage after this one, if any
    pub fn next(&self) -> Option<ProjectStage> {
        let all = Self::all();
        let idx = all.iter().position(|s| s == self)?;
        all.get(idx + 1).copied()
    }

    /// The stage before this one, if any
    pub fn previous(&self) -> Option<ProjectStage> {
        let all = Self::all();
        let idx = all.iter().position(|s| s == self)?;
        idx.checked_sub(1).and_then(|i| all.get(i).copied())
    }
}

impl std::fmt::Display for ProjectStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStage::Prospecting => write!(f, "prospecting"),
            ProjectStage::Planning => write!(f, "planning"),
            ProjectStage::InProgress => write!(f, "in_progress"),
            ProjectStage::Review => write!(f, "review"),
            ProjectStage::SignedOff => write!(f, "signed_off"),
        }
    }
}

impl std::str::FromStr for ProjectStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "prospecting" => Ok(ProjectStage::Prospecting),
            "planning" => Ok(ProjectStage::Planning),
            "in_progress" => Ok(ProjectStage::InProgress),
            "review" => Ok(ProjectStage::Review),
            "signed_off" => Ok(ProjectStage::SignedOff),
            _ => Err(format!("Unknown project stage: {}", s)),
        }
    }
}

/// A client project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: EntityId,

    /// Project name
    pub name: String,

    /// Client the work is for
    pub client: String,

    /// Current delivery stage
    #[serde(default)]
    pub stage: ProjectStage,

    #[serde(default)]
    pub priority: Priority,

    /// Project manager
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Budget in the client's currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Who created the project
    pub author: String,
}

impl Project {
    /// Create a new project in the prospecting stage
    pub fn new(name: String, client: String, author: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Prj),
            name,
            client,
            stage: ProjectStage::default(),
            priority: Priority::default(),
            manager: None,
            start_date: None,
            due_date: None,
            budget: None,
            description: None,
            created: Utc::now(),
            author,
        }
    }
}

impl Record for Project {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Text(self.id.to_string())),
            "name" => Some(Value::Text(self.name.clone())),
            "client" => Some(Value::Text(self.client.clone())),
            "stage" => Some(Value::Tag(self.stage.to_string())),
            "priority" => Some(Value::Tag(self.priority.to_string())),
            "manager" => self.manager.clone().map(Value::Text),
            "start_date" => self.start_date.map(Value::Date),
            "due_date" => self.due_date.map(Value::Date),
            "budget" => self.budget.map(Value::Number),
            "created" => Some(Value::Timestamp(self.created)),
            "author" => Some(Value::Text(self.author.clone())),
            _ => None,
        }
    }
}

impl Entity for Project {
    const PREFIX: EntityPrefix = EntityPrefix::Prj;

    fn schema() -> RecordSchema {
        RecordSchema::builder("project")
            .field("id", "ID", FieldKind::Text)
            .field("name", "Name", FieldKind::Text)
            .field("client", "Client", FieldKind::Text)
            .tag("stage", "Stage", ProjectStage::OPTIONS)
            .tag("priority", "Priority", Priority::OPTIONS)
            .field("manager", "Manager", FieldKind::Text)
            .field("start_date", "Start", FieldKind::Date)
            .field("due_date", "Due", FieldKind::Date)
            .field("budget", "Budget", FieldKind::Number)
            .field("created", "Created", FieldKind::Timestamp)
            .field("author", "Author", FieldKind::Text)
            .searchable(&["name", "client", "manager"])
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
