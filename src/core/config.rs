//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::workflow::WorkflowConfig;
use crate::query::{PredicateSet, QueryResult};

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = ".ttk.yaml";

/// ttk configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the entity YAML files (embedded fixtures when unset)
    pub data_dir: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Session file location
    pub session_file: Option<PathBuf>,

    /// Per-entity override of the fields free-text search looks at
    pub search_fields: HashMap<String, Vec<String>>,

    /// Per-entity override of the default sort key
    pub default_sort: HashMap<String, String>,

    /// Stage workflow settings
    pub workflow: Option<WorkflowConfig>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/ttk/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./.ttk.yaml)
        if let Some(local) = Self::read_file(Path::new(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. Environment variables
        if let Ok(dir) = std::env::var("TTK_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(format) = std::env::var("TTK_FORMAT") {
            config.default_format = Some(format);
        }
        if let Ok(session) = std::env::var("TTK_SESSION") {
            config.session_file = Some(PathBuf::from(session));
        }

        config
    }

    /// Read one config file; missing files are skipped, broken ones warned about
    pub fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "config loaded");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ttk")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.session_file.is_some() {
            self.session_file = other.session_file;
        }
        self.search_fields.extend(other.search_fields);
        self.default_sort.extend(other.default_sort);
        if other.workflow.is_some() {
            self.workflow = other.workflow;
        }
    }

    /// Session file, falling back to the user data directory
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .or_else(crate::core::session::Session::default_path)
            .unwrap_or_else(|| PathBuf::from(".ttk-session.yaml"))
    }

    pub fn workflow(&self) -> WorkflowConfig {
        self.workflow.clone().unwrap_or_default()
    }

    /// Apply per-entity overrides to a fresh predicate set
    ///
    /// Overrides naming unknown fields or sort keys are rejected with the
    /// same errors the mutators raise.
    pub fn apply_to(&self, predicates: &mut PredicateSet) -> QueryResult<()> {
        let entity = predicates.schema().entity().to_string();
        if let Some(fields) = self.search_fields.get(&entity) {
            predicates.set_search_fields(fields.iter().map(String::as_str))?;
        }
        if let Some(key) = self.default_sort.get(&entity) {
            predicates.set_default_sort_key(key)?;
            predicates.set_sort_key(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use crate::entities::Task;
    use crate::query::QueryError;

    fn parse(yaml: &str) -> Config {
        serde_yml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = parse("data_dir: /srv/a\ndefault_format: tsv\n");
        base.merge(parse("default_format: json\ndefault_sort:\n  task: priority\n"));

        assert_eq!(base.data_dir, Some(PathBuf::from("/srv/a")));
        assert_eq!(base.default_format.as_deref(), Some("json"));
        assert_eq!(base.default_sort.get("task").map(String::as_str), Some("priority"));
    }

    #[test]
    fn test_read_file_skips_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "data_dir: [unterminated").unwrap();
        assert!(Config::read_file(&path).is_none());
        assert!(Config::read_file(&tmp.path().join("missing.yaml")).is_none());
    }

    #[test]
    fn test_apply_overrides() {
        let config = parse("search_fields:\n  task: [name]\ndefault_sort:\n  task: due_date\n");
        let mut predicates = PredicateSet::new(&Task::schema());
        config.apply_to(&mut predicates).unwrap();

        assert_eq!(predicates.search_fields(), &["name".to_string()]);
        assert_eq!(predicates.sort_key(), "due_date");
        assert_eq!(predicates.default_sort_key(), "due_date");
    }

    #[test]
    fn test_apply_rejects_unknown_sort_key() {
        let config = parse("default_sort:\n  task: unknown_key\n");
        let mut predicates = PredicateSet::new(&Task::schema());
        let err = config.apply_to(&mut predicates).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSortKey { .. }));
    }

    #[test]
    fn test_workflow_section() {
        let config = parse("workflow:\n  allow_reopen: false\n");
        assert!(!config.workflow().allow_reopen);
        assert!(Config::default().workflow().allow_reopen);
    }
}
