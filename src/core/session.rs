//! Session context - the signed-in user, with explicit load/save/clear
//!
//! The session is a plain object passed to whatever needs the current user.
//! Nothing reads ambient storage behind the caller's back; the file is only
//! touched by [`Session::load`], [`Session::save`] and [`Session::clear`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// User roles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Manager,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Member => write!(f, "member"),
            Role::Manager => write!(f, "manager"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Member
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            name: username.clone(),
            username,
            email: None,
            role: Role::Member,
        }
    }
}

/// Errors from session storage
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write session file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("session file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

/// Process-wide session state bound to one storage file
#[derive(Debug, Clone)]
pub struct Session {
    path: PathBuf,
    user: Option<User>,
}

impl Session {
    /// Default session file location in the user's data directory
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ttk").map(|dirs| dirs.data_dir().join("session.yaml"))
    }

    /// Load the session from a file; a missing file means nobody is signed in
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            debug!(path = %path.display(), "no session file");
            return Ok(Self {
                path: path.to_path_buf(),
                user: None,
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|source| SessionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: SessionFile = if contents.trim().is_empty() {
            SessionFile::default()
        } else {
            serde_yml::from_str(&contents).map_err(|e| SessionError::Corrupt {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Ok(Self {
            path: path.to_path_buf(),
            user: file.user,
        })
    }

    /// Write the current state back to the session file
    pub fn save(&self) -> Result<(), SessionError> {
        let write_err = |source| SessionError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let file = SessionFile {
            user: self.user.clone(),
        };
        let contents = serde_yml::to_string(&file).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, contents).map_err(write_err)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Sign out and remove the session file
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.user = None;
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|source| SessionError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        debug!(path = %self.path.display(), "session cleared");
        Ok(())
    }

    /// Sign a user in (call `save` to persist)
    pub fn login(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
