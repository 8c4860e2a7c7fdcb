//! TTK: Tessera project tracker
//!
//! Projects, stages, tasks, documents and an audit log held in memory, with
//! a schema-driven query pipeline (search, field filters, stable sorting)
//! shared by every list view.

pub mod cli;
pub mod core;
pub mod entities;
pub mod query;
pub mod schema;
pub mod yaml;
