//! `ttk board` command - projects grouped into stage columns

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::{build_predicates, print_serialized, Context};
use crate::cli::helpers::{escape_md, escape_tsv, format_short_id_str, parse_assignment};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::RecordStore;
use crate::core::workflow::WorkflowEngine;
use crate::entities::{Project, ProjectStage};
use crate::query::{Column, ListView, QueryError};

#[derive(clap::Args, Debug)]
pub struct BoardArgs {
    /// Case-insensitive text matched against project name, client and manager
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Exact field filter; repeatable
    #[arg(long = "filter", short = 'F', value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Move a project to an adjacent stage before showing the board
    /// (in memory only; the audit entry is printed to stderr)
    #[arg(long = "move", value_name = "ID=STAGE")]
    pub moves: Vec<String>,
}

#[derive(Serialize)]
struct BoardColumn<'a> {
    stage: &'a str,
    projects: &'a [Project],
}

pub fn run(args: BoardArgs, global: &GlobalOpts) -> Result<()> {
    let mut ctx = Context::load(global)?;

    let predicates = build_predicates(
        &ctx.data.projects,
        &ctx.config,
        args.search.as_deref(),
        &args.filters,
        None,
    )?;
    let mut board = ListView::with_predicates(&ctx.data.projects, predicates)?;

    if !args.moves.is_empty() {
        let engine = WorkflowEngine::new(ctx.config.workflow());
        let actor = ctx.actor()?;
        for arg in &args.moves {
            let (id, stage) = parse_assignment(arg)?;
            let to: ProjectStage = stage.parse().map_err(|e: String| miette::miette!("{}", e))?;
            let entry = engine
                .move_project(&mut ctx.data.projects, &id, to, &actor)
                .into_diagnostic()?;
            eprintln!("{} {}", style("✓").green(), entry.action);
        }
        board.refresh(&ctx.data.projects)?;
    }

    let stage_field = ctx
        .data
        .projects
        .schema()
        .field("stage")
        .cloned()
        .ok_or_else(|| QueryError::UnknownField {
            entity: "project".to_string(),
            field: "stage".to_string(),
            valid: ctx.data.projects.schema().field_names().join(", "),
        })?;
    let columns = board.view().group_by(&stage_field);
    output_board(&columns, ctx.format)
}

fn output_board(columns: &[Column<Project>], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let board: Vec<BoardColumn> = columns
                .iter()
                .map(|c| BoardColumn {
                    stage: &c.value,
                    projects: &c.records,
                })
                .collect();
            print_serialized(&board, format)?;
        }
        OutputFormat::Id => {
            for column in columns {
                for project in &column.records {
                    println!("{}", project.id);
                }
            }
        }
        OutputFormat::Tsv => {
            println!("stage\tid\tname\tclient");
            for column in columns {
                for p in &column.records {
                    println!(
                        "{}\t{}\t{}\t{}",
                        column.value,
                        p.id,
                        escape_tsv(&p.name),
                        escape_tsv(&p.client)
                    );
                }
            }
        }
        OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(["Stage", "Projects"]);
            for column in columns {
                let names: Vec<String> = column.records.iter().map(|p| escape_md(&p.name)).collect();
                builder.push_record([column.value.clone(), names.join("<br>")]);
            }
            let mut table = builder.build();
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Auto => {
            for column in columns {
                let title = if column.value.is_empty() {
                    "unstaged".to_string()
                } else {
                    column.value.to_uppercase()
                };
                println!("{} ({})", style(title).bold(), column.records.len());
                for p in &column.records {
                    println!(
                        "  {} {}  {}",
                        style(format_short_id_str(&p.id.to_string())).cyan(),
                        p.name,
                        style(&p.client).dim()
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}
