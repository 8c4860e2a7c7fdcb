//! Record loading from YAML fixture files
//!
//! Each entity type lives in one file holding a YAML sequence of records
//! (`projects.yaml`, `tasks.yaml`, ...). Files are read from a data directory
//! when one is configured, otherwise from the fixtures bundled in the binary.

use rust_embed::Embed;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::entity::Entity;
use crate::core::identity::EntityPrefix;
use crate::core::store::MemoryStore;
use crate::entities::{AuditLogEntry, Document, Project, Stage, Task};
use crate::yaml::{parse_yaml_str, YamlSyntaxError};

#[derive(Embed)]
#[folder = "fixtures/"]
struct EmbeddedFixtures;

/// Errors raised while loading records
#[derive(Debug, Error, miette::Diagnostic)]
pub enum LoadError {
    #[error("data directory not found: {0}")]
    #[diagnostic(code(ttk::load::missing_dir))]
    MissingDir(PathBuf),

    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(ttk::load::io))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlSyntaxError),
}

/// All record stores of one tracker instance
#[derive(Debug, Clone)]
pub struct DataSet {
    pub projects: MemoryStore<Project>,
    pub stages: MemoryStore<Stage>,
    pub tasks: MemoryStore<Task>,
    pub documents: MemoryStore<Document>,
    pub audit: MemoryStore<AuditLogEntry>,
}

impl Default for DataSet {
    fn default() -> Self {
        Self {
            projects: MemoryStore::new(Project::schema()),
            stages: MemoryStore::new(Stage::schema()),
            tasks: MemoryStore::new(Task::schema()),
            documents: MemoryStore::new(Document::schema()),
            audit: MemoryStore::new(AuditLogEntry::schema()),
        }
    }
}

impl DataSet {
    /// Load from a data directory, or from the bundled fixtures when `None`
    pub fn load(data_dir: Option<&Path>) -> Result<Self, LoadError> {
        match data_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    /// Load the fixtures compiled into the binary
    pub fn embedded() -> Result<Self, LoadError> {
        let mut data = DataSet::default();
        for file in EmbeddedFixtures::iter() {
            let filename = file.as_ref();
            let Some(prefix) = EntityPrefix::from_filename(filename) else {
                continue;
            };
            if let Some(content) = EmbeddedFixtures::get(filename) {
                let source = String::from_utf8_lossy(&content.data);
                data.ingest(prefix, &source, filename)?;
            }
        }
        debug!(records = data.len(), "loaded bundled fixtures");
        Ok(data)
    }

    /// Load every recognised `.yaml` file below `dir`
    ///
    /// Files whose name does not map to an entity type are skipped with a
    /// warning. Several files for the same type are concatenated in path order.
    pub fn from_dir(dir: &Path) -> Result<Self, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::MissingDir(dir.to_path_buf()));
        }

        let mut data = DataSet::default();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml");
            if !is_yaml {
                continue;
            }

            let filename = entry.file_name().to_string_lossy();
            let Some(prefix) = EntityPrefix::from_filename(&filename) else {
                warn!(path = %path.display(), "skipping file with no matching entity type");
                continue;
            };

            let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            data.ingest(prefix, &source, &path.display().to_string())?;
        }

        debug!(dir = %dir.display(), records = data.len(), "loaded data directory");
        Ok(data)
    }

    /// Parse one file and add its records to the matching store
    fn ingest(&mut self, prefix: EntityPrefix, source: &str, filename: &str) -> Result<(), LoadError> {
        if source.trim().is_empty() {
            return Ok(());
        }
        match prefix {
            EntityPrefix::Prj => extend(&mut self.projects, source, filename),
            EntityPrefix::Stg => extend(&mut self.stages, source, filename),
            EntityPrefix::Tsk => extend(&mut self.tasks, source, filename),
            EntityPrefix::Doc => extend(&mut self.documents, source, filename),
            EntityPrefix::Log => extend(&mut self.audit, source, filename),
        }
    }

    /// Total number of records across all stores
    pub fn len(&self) -> usize {
        self.projects.len()
            + self.stages.len()
            + self.tasks.len()
            + self.documents.len()
            + self.audit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn extend<E: Entity>(store: &mut MemoryStore<E>, source: &str, filename: &str) -> Result<(), LoadError> {
    let records: Vec<E> = parse_yaml_str(source, filename)?;
    for record in records {
        if let Err(e) = store.create(record) {
            warn!(file = filename, error = %e, "skipping record");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::RecordStore;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_fixtures() {
        let data = DataSet::embedded().unwrap();
        assert_eq!(data.projects.len(), 5);
        assert!(data.tasks.list_all().iter().any(|t| t.name == "Build UI"));
        assert!(!data.audit.is_empty());
    }

    #[test]
    fn test_from_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tasks.yaml"),
            "- id: TSK-01J9ZK3Q8W00000000000T0001\n  name: Setup DB\n  created: 2024-08-05T09:00:00Z\n  author: alice\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.yaml"), "- just: notes\n").unwrap();
        fs::write(dir.path().join("README.md"), "# data\n").unwrap();

        let data = DataSet::from_dir(dir.path()).unwrap();
        assert_eq!(data.tasks.len(), 1);
        assert!(data.projects.is_empty());
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_are_skipped() {
        let dir = tempdir().unwrap();
        let record = "- id: TSK-01J9ZK3Q8W00000000000T0001\n  name: Setup DB\n  created: 2024-08-05T09:00:00Z\n  author: alice\n";
        fs::write(dir.path().join("tasks.yaml"), format!("{record}{record}")).unwrap();

        let data = DataSet::from_dir(dir.path()).unwrap();
        assert_eq!(data.tasks.len(), 1);
    }

    #[test]
    fn test_bad_yaml_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("projects.yaml"), "- id: PRJ-nope\n  name: x\n").unwrap();
        assert!(matches!(
            DataSet::from_dir(dir.path()),
            Err(LoadError::Yaml(_))
        ));
    }

    #[test]
    fn test_missing_dir() {
        assert!(matches!(
            DataSet::load(Some(Path::new("/nonexistent/ttk-data"))),
            Err(LoadError::MissingDir(_))
        ));
    }
}
