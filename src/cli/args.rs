//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    board::BoardArgs, list::ListArgs, new::NewArgs, schema::SchemaArgs, search::SearchArgs,
    session::SessionCommands,
};
use crate::core::identity::EntityPrefix;

#[derive(Parser)]
#[command(name = "ttk")]
#[command(author, version, about = "Tessera project tracker")]
#[command(
    long_about = "Query projects, stages, tasks, documents and the audit log from the command line."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Output format (default: config `default_format`, then auto)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Data directory holding the entity YAML files (default: bundled fixtures)
    #[arg(long, global = true, value_name = "DIR")]
    pub data: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List records of one entity type with search, filters and sorting
    List(ListArgs),

    /// Free-text search across all entity types
    Search(SearchArgs),

    /// Show projects on the stage board
    Board(BoardArgs),

    /// Show the fields, searchable fields and sort keys of an entity type
    Schema(SchemaArgs),

    /// Create a project, stage or task through its form
    New(NewArgs),

    /// Sign in, sign out, show the current user
    #[command(subcommand)]
    Session(SessionCommands),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned, coloured table for terminals (yaml for single records)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

/// Entity types addressable from the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    Stage,
    Task,
    Document,
    Audit,
}

impl EntityKind {
    pub fn prefix(&self) -> EntityPrefix {
        match self {
            EntityKind::Project => EntityPrefix::Prj,
            EntityKind::Stage => EntityPrefix::Stg,
            EntityKind::Task => EntityPrefix::Tsk,
            EntityKind::Document => EntityPrefix::Doc,
            EntityKind::Audit => EntityPrefix::Log,
        }
    }

    pub fn name(&self) -> &'static str {
        self.prefix().entity_name()
    }
}
