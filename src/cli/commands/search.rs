//! `ttk search` command - free-text search across all entity types

use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::{print_serialized, Context};
use crate::cli::helpers::{escape_md, escape_tsv, format_short_id_str, truncate_str};
use crate::cli::{EntityKind, GlobalOpts, OutputFormat};
use crate::query::{GlobalSearch, SearchHit};

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search text (matched case-insensitively against searchable fields)
    pub query: String,

    /// Restrict to entity type(s)
    #[arg(long = "type", short = 't', value_delimiter = ',')]
    pub entity_type: Option<Vec<EntityKind>>,

    /// Limit number of results
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: usize,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

pub fn run(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global)?;
    let data = &ctx.data;

    let search = GlobalSearch::new()
        .with(&data.projects)
        .with(&data.stages)
        .with(&data.tasks)
        .with(&data.documents)
        .with(&data.audit);

    let entities: Option<Vec<String>> = args
        .entity_type
        .as_ref()
        .map(|kinds| kinds.iter().map(|k| k.name().to_string()).collect());

    if args.count {
        let hits = search.search(&args.query, entities.as_deref(), None)?;
        println!("{}", hits.len());
        return Ok(());
    }

    let hits = search.search(&args.query, entities.as_deref(), Some(args.limit))?;
    output_hits(&hits, &args.query, ctx.format)
}

fn output_hits(hits: &[SearchHit], query: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_serialized(hits, format)?,
        OutputFormat::Id => {
            for hit in hits {
                println!("{}", hit.id);
            }
        }
        OutputFormat::Tsv => {
            println!("entity\tid\ttitle");
            for hit in hits {
                println!("{}\t{}\t{}", hit.entity, hit.id, escape_tsv(&hit.title));
            }
        }
        OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(["Type", "ID", "Title"]);
            for hit in hits {
                builder.push_record([hit.entity.clone(), hit.id.clone(), escape_md(&hit.title)]);
            }
            let mut table = builder.build();
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Auto => {
            if hits.is_empty() {
                println!("No results found for '{}'.", style(query).yellow());
                return Ok(());
            }
            println!(
                "{} results for '{}':",
                style(hits.len()).cyan(),
                style(query).yellow()
            );
            println!();
            println!(
                "{:<10} {:<17} {}",
                style("TYPE").bold(),
                style("ID").bold(),
                style("TITLE").bold()
            );
            println!("{}", "-".repeat(70));
            for hit in hits {
                let entity = match hit.entity.as_str() {
                    "project" => style(hit.entity.as_str()).blue(),
                    "stage" => style(hit.entity.as_str()).magenta(),
                    "task" => style(hit.entity.as_str()).green(),
                    "document" => style(hit.entity.as_str()).yellow(),
                    _ => style(hit.entity.as_str()).dim(),
                };
                println!(
                    "{:<10} {:<17} {}",
                    entity,
                    style(format_short_id_str(&hit.id)).cyan(),
                    truncate_str(&hit.title, 50)
                );
            }
        }
    }
    Ok(())
}
