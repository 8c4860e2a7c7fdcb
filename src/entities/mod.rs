//! Entity type definitions
//!
//! - [`Project`] - Client projects moving through delivery stages
//! - [`Stage`] - Delivery phases within a project
//! - [`Task`] - Units of work, optionally tied to a project and stage
//! - [`Document`] - Uploaded files
//! - [`AuditLogEntry`] - Who did what, and when

pub mod audit;
pub mod document;
pub mod project;
pub mod stage;
pub mod task;

pub use audit::{AuditCategory, AuditLogEntry};
pub use document::{Document, DocumentKind};
pub use project::{Project, ProjectStage};
pub use stage::Stage;
pub use task::Task;
