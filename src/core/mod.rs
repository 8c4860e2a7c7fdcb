//! Core module - fundamental types and utilities

pub mod config;
pub mod entity;
pub mod identity;
pub mod loader;
pub mod record;
pub mod session;
pub mod store;
pub mod value;
pub mod workflow;

pub use config::Config;
pub use entity::{Entity, Priority, Status};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use loader::{DataSet, LoadError};
pub use record::{FieldBag, Record};
pub use session::{Role, Session, SessionError, User};
pub use store::{MemoryStore, RecordStore, StoreError};
pub use value::Value;
pub use workflow::{WorkflowConfig, WorkflowEngine, WorkflowError};
