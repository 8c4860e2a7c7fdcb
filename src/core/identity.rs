//! Entity identity system using type-prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Entity type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityPrefix {
    /// Client project
    Prj,
    /// Project stage (phase of delivery)
    Stg,
    /// Task within a stage
    Tsk,
    /// Uploaded document
    Doc,
    /// Audit log entry
    Log,
}

impl EntityPrefix {
    /// Get the string representation of the prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Prj => "PRJ",
            EntityPrefix::Stg => "STG",
            EntityPrefix::Tsk => "TSK",
            EntityPrefix::Doc => "DOC",
            EntityPrefix::Log => "LOG",
        }
    }

    /// Lowercase entity name as used on the command line and in config keys
    pub fn entity_name(&self) -> &'static str {
        match self {
            EntityPrefix::Prj => "project",
            EntityPrefix::Stg => "stage",
            EntityPrefix::Tsk => "task",
            EntityPrefix::Doc => "document",
            EntityPrefix::Log => "audit",
        }
    }

    /// Get all valid prefixes
    pub fn all() -> &'static [EntityPrefix] {
        &[
            EntityPrefix::Prj,
            EntityPrefix::Stg,
            EntityPrefix::Tsk,
            EntityPrefix::Doc,
            EntityPrefix::Log,
        ]
    }

    /// Try to determine entity prefix from a fixture filename
    /// Accepts "projects.yaml", "project.yaml" and "PRJ-xxx.yaml" forms
    pub fn from_filename(filename: &str) -> Option<Self> {
        let upper = filename.to_uppercase();
        for prefix in Self::all() {
            if upper.starts_with(&format!("{}-", prefix.as_str())) {
                return Some(*prefix);
            }
        }

        let stem = filename.split('.').next()?.to_lowercase();
        Self::all().iter().copied().find(|p| {
            let name = p.entity_name();
            stem == name || stem == format!("{}s", name) || (name == "audit" && stem == "audit_log")
        })
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PRJ" | "PROJECT" | "PROJECTS" => Ok(EntityPrefix::Prj),
            "STG" | "STAGE" | "STAGES" => Ok(EntityPrefix::Stg),
            "TSK" | "TASK" | "TASKS" => Ok(EntityPrefix::Tsk),
            "DOC" | "DOCUMENT" | "DOCUMENTS" => Ok(EntityPrefix::Doc),
            "LOG" | "AUDIT" | "AUDIT_LOG" => Ok(EntityPrefix::Log),
            _ => Err(IdParseError::InvalidPrefix(s.to_string())),
        }
    }
}

/// A unique entity identifier combining a type prefix and ULID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId {
    prefix: EntityPrefix,
    ulid: Ulid,
}

impl EntityId {
    /// Create a new EntityId with the given prefix
    pub fn new(prefix: EntityPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    /// Get the entity prefix
    pub fn prefix(&self) -> EntityPrefix {
        self.prefix
    }

    /// Parse an EntityId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix_str, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        let prefix = prefix_str.parse()?;
        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { prefix, ulid })
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing entity IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid entity prefix: '{0}' (valid: PRJ, STG, TSK, DOC, LOG)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in entity ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id = EntityId::new(EntityPrefix::Prj);
        assert!(id.to_string().starts_with("PRJ-"));
        assert_eq!(id.to_string().len(), 30); // PRJ- (4) + ULID (26) = 30
    }

    #[test]
    fn test_entity_id_parsing() {
        let original = EntityId::new(EntityPrefix::Tsk);
        let parsed = EntityId::parse(&original.to_string()).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.prefix(), EntityPrefix::Tsk);
    }

    #[test]
    fn test_invalid_ids() {
        assert!(matches!(
            EntityId::parse("NOPE-01J9ZK3Q8W0000000000000001"),
            Err(IdParseError::InvalidPrefix(_))
        ));
        assert!(matches!(
            EntityId::parse("PRJ01J9ZK3Q8W"),
            Err(IdParseError::MissingDelimiter(_))
        ));
        assert!(matches!(
            EntityId::parse("PRJ-notaulid"),
            Err(IdParseError::InvalidUlid(_, _))
        ));
    }

    #[test]
    fn test_prefix_from_filename() {
        assert_eq!(EntityPrefix::from_filename("projects.yaml"), Some(EntityPrefix::Prj));
        assert_eq!(EntityPrefix::from_filename("task.yaml"), Some(EntityPrefix::Tsk));
        assert_eq!(EntityPrefix::from_filename("audit.yaml"), Some(EntityPrefix::Log));
        assert_eq!(
            EntityPrefix::from_filename("DOC-01J9ZK3Q8W0000000000000001.yaml"),
            Some(EntityPrefix::Doc)
        );
        assert_eq!(EntityPrefix::from_filename("notes.yaml"), None);
    }

    #[test]
    fn test_prefix_from_entity_name() {
        assert_eq!("project".parse::<EntityPrefix>().unwrap(), EntityPrefix::Prj);
        assert_eq!("STG".parse::<EntityPrefix>().unwrap(), EntityPrefix::Stg);
        assert_eq!("audit".parse::<EntityPrefix>().unwrap(), EntityPrefix::Log);
        assert!("widget".parse::<EntityPrefix>().is_err());
    }
}
