//! `ttk new` command - create a project, stage or task through its form
//!
//! Records are validated and added to the in-memory store, then printed.
//! Nothing is written back to the data directory.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::{print_serialized, Context};
use crate::cli::helpers::parse_assignment;
use crate::cli::{EntityKind, GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::schema::wizard::{FormDefinition, FormValues, SchemaWizard, Wizard};

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Entity type (project, stage or task)
    pub entity: EntityKind,

    /// Pre-fill a form field; repeatable
    #[arg(long = "set", short = 's', value_name = "FIELD=VALUE")]
    pub values: Vec<String>,

    /// Prompt for the remaining fields
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub fn run(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut ctx = Context::load(global)?;
    let prefix = args.entity.prefix();
    let form = FormDefinition::for_entity(prefix)
        .ok_or_else(|| miette::miette!("{} records cannot be created", args.entity.name()))?;

    let mut wizard = Wizard::new(form);
    for arg in &args.values {
        let (field, value) = parse_assignment(arg)?;
        wizard.set(&field, value)?;
    }

    let values = if args.interactive {
        SchemaWizard::new().run(wizard)?
    } else {
        complete(wizard)?
    };

    let author = ctx.actor()?;
    let format = match ctx.format {
        OutputFormat::Auto => OutputFormat::Yaml,
        f => f,
    };

    match prefix {
        EntityPrefix::Prj => {
            let project = values.into_project(&author)?;
            let id = project.id.to_string();
            ctx.data.projects.create(project.clone()).into_diagnostic()?;
            report(&id, &project, format)
        }
        EntityPrefix::Stg => {
            let stage = values.into_stage(&author)?;
            if ctx.data.projects.get(&stage.project.to_string()).is_none() {
                return Err(miette::miette!("no project with id '{}'", stage.project));
            }
            let id = stage.id.to_string();
            ctx.data.stages.create(stage.clone()).into_diagnostic()?;
            report(&id, &stage, format)
        }
        _ => {
            let task = values.into_task(&author)?;
            let id = task.id.to_string();
            ctx.data.tasks.create(task.clone()).into_diagnostic()?;
            report(&id, &task, format)
        }
    }
}

/// Walk a pre-filled wizard to submission without prompting
fn complete(mut wizard: Wizard) -> Result<FormValues> {
    while !wizard.is_last_step() {
        wizard.next()?;
    }
    Ok(wizard.submit()?)
}

fn report<T: serde::Serialize>(id: &str, record: &T, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Id {
        println!("{}", id);
        return Ok(());
    }
    eprintln!("{} Created {}", style("✓").green(), style(id).cyan());
    print_serialized(record, format)
}
