//! `ttk schema` command - fields, searchable fields and sort keys of an entity

use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::{print_serialized, resolve_format};
use crate::cli::helpers::escape_tsv;
use crate::cli::{EntityKind, GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::entity::Entity;
use crate::entities::{AuditLogEntry, Document, Project, Stage, Task};
use crate::schema::record::{FieldKind, RecordSchema};

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    /// Entity type
    pub entity: EntityKind,
}

pub fn schema_for(entity: EntityKind) -> RecordSchema {
    match entity {
        EntityKind::Project => Project::schema(),
        EntityKind::Stage => Stage::schema(),
        EntityKind::Task => Task::schema(),
        EntityKind::Document => Document::schema(),
        EntityKind::Audit => AuditLogEntry::schema(),
    }
}

pub fn run(args: SchemaArgs, global: &GlobalOpts) -> Result<()> {
    let format = resolve_format(global, &Config::load())?;
    let schema = schema_for(args.entity);

    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_serialized(&schema, format)?,
        OutputFormat::Id => {
            for name in schema.field_names() {
                println!("{}", name);
            }
        }
        OutputFormat::Tsv => {
            println!("field\tkind\toptions\tsearchable");
            for field in schema.fields() {
                let searchable = schema.searchable_fields().contains(&field.name);
                println!(
                    "{}\t{}\t{}\t{}",
                    field.name,
                    field.kind,
                    escape_tsv(&options(&field.kind)),
                    if searchable { "yes" } else { "no" }
                );
            }
        }
        OutputFormat::Auto | OutputFormat::Md => print_tables(&schema, format),
    }
    Ok(())
}

fn options(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Tag(options) => options.join(", "),
        _ => String::new(),
    }
}

fn print_tables(schema: &RecordSchema, format: OutputFormat) {
    let markdown = format == OutputFormat::Md;
    let heading = |text: &str| {
        if markdown {
            println!("## {}\n", text);
        } else {
            println!("{}", style(text).bold());
        }
    };

    heading(&format!("{} fields", schema.entity()));
    let mut fields = Builder::default();
    fields.push_record(["Field", "Label", "Kind", "Options", "Searchable"]);
    for field in schema.fields() {
        let searchable = schema.searchable_fields().contains(&field.name);
        fields.push_record([
            field.name.clone(),
            field.label.clone(),
            field.kind.to_string(),
            options(&field.kind),
            (if searchable { "yes" } else { "" }).to_string(),
        ]);
    }
    let mut table = fields.build();
    table.with(Style::markdown());
    println!("{}\n", table);

    heading("Sort keys");
    let mut keys = Builder::default();
    keys.push_record(["Key", "Label", "Field", "Order", "Default"]);
    for key in schema.sort_keys() {
        keys.push_record([
            key.name.clone(),
            key.label.clone(),
            key.field.clone(),
            key.order.to_string(),
            (if key.name == schema.default_sort() { "yes" } else { "" }).to_string(),
        ]);
    }
    let mut table = keys.build();
    table.with(Style::markdown());
    println!("{}", table);
}
