//! Workflow engine for project stage transitions
//!
//! Backs the kanban board: a card may move one column forward or one column
//! back. Signed-off projects can only be reopened into review, and only when
//! the configuration allows it.

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::store::{MemoryStore, StoreError};
use crate::entities::audit::{AuditCategory, AuditLogEntry};
use crate::entities::project::{Project, ProjectStage};

/// Workflow configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Allow signed_off -> review
    pub allow_reopen: bool,

    /// Audit message for a stage move
    pub move_message: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            allow_reopen: true,
            move_message: "Moved {name} from {from} to {to}".to_string(),
        }
    }
}

impl WorkflowConfig {
    /// Format the audit message for a move
    pub fn format_move_message(&self, name: &str, from: ProjectStage, to: ProjectStage) -> String {
        self.move_message
            .replace("{name}", name)
            .replace("{from}", &from.to_string())
            .replace("{to}", &to.to_string())
    }
}

/// Errors that can occur during workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid stage transition: {from} -> {to}")]
    InvalidTransition {
        from: ProjectStage,
        to: ProjectStage,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Workflow engine for managing stage transitions
#[derive(Debug, Clone, Default)]
pub struct WorkflowEngine {
    config: WorkflowConfig,
}

impl WorkflowEngine {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Check if a stage transition is valid
    pub fn is_valid_transition(&self, from: ProjectStage, to: ProjectStage) -> bool {
        match (from, to) {
            (ProjectStage::SignedOff, ProjectStage::Review) => self.config.allow_reopen,
            (ProjectStage::SignedOff, _) => false,
            _ => from.next() == Some(to) || from.previous() == Some(to),
        }
    }

    /// Get allowed transitions from the current stage, forward move first
    pub fn allowed_transitions(&self, current: ProjectStage) -> Vec<ProjectStage> {
        [current.next(), current.previous()]
            .into_iter()
            .flatten()
            .filter(|to| self.is_valid_transition(current, *to))
            .collect()
    }

    /// Move a project to another stage through the store's update command.
    ///
    /// Returns the audit entry describing the move; the caller decides where
    /// to record it.
    pub fn move_project(
        &self,
        store: &mut MemoryStore<Project>,
        key: &str,
        to: ProjectStage,
        actor: &str,
    ) -> Result<AuditLogEntry, WorkflowError> {
        let mut project = store
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "project".to_string(),
                key: key.to_string(),
            })?;

        let from = project.stage;
        if !self.is_valid_transition(from, to) {
            return Err(WorkflowError::InvalidTransition { from, to });
        }

        project.stage = to;
        let action = self.config.format_move_message(&project.name, from, to);
        store.update(project)?;
        info!(project = key, %from, %to, actor, "project stage changed");

        Ok(AuditLogEntry {
            id: EntityId::new(EntityPrefix::Log),
            action,
            user: actor.to_string(),
            target: Some(key.to_string()),
            category: AuditCategory::Update,
            created: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use crate::core::store::RecordStore;

    fn store_with(stage: ProjectStage) -> (MemoryStore<Project>, String) {
        let mut project = Project::new("Harbor Office".into(), "Acme".into(), "dana".into());
        project.stage = stage;
        let key = project.id.to_string();
        (MemoryStore::with_records(Project::schema(), vec![project]), key)
    }

    #[test]
    fn test_valid_transitions() {
        let engine = WorkflowEngine::default();

        assert!(engine.is_valid_transition(ProjectStage::Prospecting, ProjectStage::Planning));
        assert!(engine.is_valid_transition(ProjectStage::Planning, ProjectStage::InProgress));
        assert!(engine.is_valid_transition(ProjectStage::Review, ProjectStage::SignedOff));
        assert!(engine.is_valid_transition(ProjectStage::InProgress, ProjectStage::Planning));
        assert!(engine.is_valid_transition(ProjectStage::SignedOff, ProjectStage::Review));

        assert!(!engine.is_valid_transition(ProjectStage::Prospecting, ProjectStage::InProgress));
        assert!(!engine.is_valid_transition(ProjectStage::Planning, ProjectStage::Planning));
        assert!(!engine.is_valid_transition(ProjectStage::SignedOff, ProjectStage::Prospecting));
    }

    #[test]
    fn test_reopen_can_be_disabled() {
        let engine = WorkflowEngine::new(WorkflowConfig {
            allow_reopen: false,
            ..WorkflowConfig::default()
        });
        assert!(!engine.is_valid_transition(ProjectStage::SignedOff, ProjectStage::Review));
        assert!(engine.allowed_transitions(ProjectStage::SignedOff).is_empty());
    }

    #[test]
    fn test_allowed_transitions() {
        let engine = WorkflowEngine::default();
        assert_eq!(
            engine.allowed_transitions(ProjectStage::Prospecting),
            vec![ProjectStage::Planning]
        );
        assert_eq!(
            engine.allowed_transitions(ProjectStage::InProgress),
            vec![ProjectStage::Review, ProjectStage::Planning]
        );
        assert_eq!(
            engine.allowed_transitions(ProjectStage::SignedOff),
            vec![ProjectStage::Review]
        );
    }

    #[test]
    fn test_move_project_updates_store() {
        let engine = WorkflowEngine::default();
        let (mut store, key) = store_with(ProjectStage::Planning);

        let entry = engine
            .move_project(&mut store, &key, ProjectStage::InProgress, "dana")
            .unwrap();

        assert_eq!(store.get(&key).unwrap().stage, ProjectStage::InProgress);
        assert_eq!(store.list_all().len(), 1);
        assert_eq!(entry.action, "Moved Harbor Office from planning to in_progress");
        assert_eq!(entry.user, "dana");
        assert_eq!(entry.target.as_deref(), Some(key.as_str()));
    }

    #[test]
    fn test_move_project_rejects_skips() {
        let engine = WorkflowEngine::default();
        let (mut store, key) = store_with(ProjectStage::Prospecting);

        let err = engine
            .move_project(&mut store, &key, ProjectStage::Review, "dana")
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
        assert_eq!(store.get(&key).unwrap().stage, ProjectStage::Prospecting);
    }

    #[test]
    fn test_move_unknown_project() {
        let engine = WorkflowEngine::default();
        let (mut store, _) = store_with(ProjectStage::Planning);
        let err = engine
            .move_project(&mut store, "PRJ-missing", ProjectStage::Review, "dana")
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Store(StoreError::NotFound { .. })));
    }
}
