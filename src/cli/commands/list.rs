//! `ttk list` command - filtered, sorted listing of one entity type

use miette::Result;

use crate::cli::commands::{build_predicates, print_serialized, Context};
use crate::cli::table::TableFormatter;
use crate::cli::{EntityKind, GlobalOpts};
use crate::core::entity::Entity;
use crate::core::store::{MemoryStore, RecordStore};
use crate::query::evaluate;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Entity type to list
    pub entity: EntityKind,

    /// Case-insensitive text matched against the searchable fields
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Exact field filter; repeatable, an empty value clears the filter
    #[arg(long = "filter", short = 'F', value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Sort key (see `ttk schema <entity>`)
    #[arg(long)]
    pub sort: Option<String>,

    /// Reverse the sorted result
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Show at most N records
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only the number of matching records
    #[arg(long)]
    pub count: bool,
}

/// Columns shown by default for each entity type
fn default_columns(entity: EntityKind) -> &'static [&'static str] {
    match entity {
        EntityKind::Project => &["id", "name", "client", "stage", "priority", "manager", "due_date"],
        EntityKind::Stage => &["id", "name", "status", "owner", "start_date", "end_date"],
        EntityKind::Task => &["id", "name", "assignee", "status", "priority", "due_date"],
        EntityKind::Document => &["id", "name", "kind", "size_kb", "created"],
        EntityKind::Audit => &["id", "created", "user", "category", "action"],
    }
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global)?;
    match args.entity {
        EntityKind::Project => list_entity(&ctx.data.projects, &args, &ctx),
        EntityKind::Stage => list_entity(&ctx.data.stages, &args, &ctx),
        EntityKind::Task => list_entity(&ctx.data.tasks, &args, &ctx),
        EntityKind::Document => list_entity(&ctx.data.documents, &args, &ctx),
        EntityKind::Audit => list_entity(&ctx.data.audit, &args, &ctx),
    }
}

fn list_entity<E: Entity>(store: &MemoryStore<E>, args: &ListArgs, ctx: &Context) -> Result<()> {
    let predicates = build_predicates(
        store,
        &ctx.config,
        args.search.as_deref(),
        &args.filters,
        args.sort.as_deref(),
    )?;
    let view = evaluate(store, &predicates)?;

    if args.count {
        println!("{}", view.matched_count());
        return Ok(());
    }

    let mut records: Vec<&E> = view.iter().collect();
    if args.reverse {
        records.reverse();
    }
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    let formatter = TableFormatter::new(store.schema(), default_columns(args.entity));
    if !formatter.output(&records, ctx.format, view.total_count()) {
        print_serialized(&records, ctx.format)?;
    }
    Ok(())
}
