//! Multi-step creation forms as explicit state machines
//!
//! A [`Wizard`] walks a [`FormDefinition`] step by step. Moving forward and
//! submitting are guarded by presence checks on the current step's required
//! fields. [`SchemaWizard`] drives a wizard interactively with dialoguer.

use chrono::NaiveDate;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::core::entity::{Priority, Status};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::{Project, ProjectStage, Stage, Task};

/// How a form field is entered
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    Text,
    Number,
    /// `YYYY-MM-DD`
    Date,
    /// Entity id of the given type
    Reference(EntityPrefix),
    Choice(&'static [&'static str]),
}

/// One input on a form step
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
}

impl FormField {
    fn required(name: &'static str, label: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    fn optional(name: &'static str, label: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    /// Check a non-empty value against the field's input kind
    fn check(&self, value: &str) -> Result<(), String> {
        match &self.kind {
            InputKind::Text => Ok(()),
            InputKind::Number => value
                .parse::<f64>()
                .map(|_| ())
                .map_err(|_| format!("'{}' is not a number", value)),
            InputKind::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| format!("'{}' is not a date (YYYY-MM-DD)", value)),
            InputKind::Reference(prefix) => {
                let id = EntityId::parse(value).map_err(|e| e.to_string())?;
                if id.prefix() == *prefix {
                    Ok(())
                } else {
                    Err(format!("expected a {} id, got {}", prefix, id.prefix()))
                }
            }
            InputKind::Choice(options) => {
                if options.contains(&value) {
                    Ok(())
                } else {
                    Err(format!("expected one of: {}", options.join(", ")))
                }
            }
        }
    }
}

/// A page of the form
#[derive(Debug, Clone)]
pub struct FormStep {
    pub title: &'static str,
    pub fields: Vec<FormField>,
}

/// Ordered steps of a creation form
#[derive(Debug, Clone)]
pub struct FormDefinition {
    pub entity: EntityPrefix,
    pub steps: Vec<FormStep>,
}

impl FormDefinition {
    /// The creation form for an entity type, if it has one
    pub fn for_entity(prefix: EntityPrefix) -> Option<Self> {
        match prefix {
            EntityPrefix::Prj => Some(Self::project()),
            EntityPrefix::Stg => Some(Self::stage()),
            EntityPrefix::Tsk => Some(Self::task()),
            _ => None,
        }
    }

    /// Add Project: basics, schedule, budget
    pub fn project() -> Self {
        Self {
            entity: EntityPrefix::Prj,
            steps: vec![
                FormStep {
                    title: "Basics",
                    fields: vec![
                        FormField::required("name", "Project name", InputKind::Text),
                        FormField::required("client", "Client", InputKind::Text),
                        FormField::optional("manager", "Project manager", InputKind::Text),
                    ],
                },
                FormStep {
                    title: "Schedule",
                    fields: vec![
                        FormField::optional(
                            "stage",
                            "Stage",
                            InputKind::Choice(ProjectStage::OPTIONS),
                        ),
                        FormField::optional("start_date", "Start date", InputKind::Date),
                        FormField::required("due_date", "Due date", InputKind::Date),
                    ],
                },
                FormStep {
                    title: "Budget",
                    fields: vec![
                        FormField::optional(
                            "priority",
                            "Priority",
                            InputKind::Choice(Priority::OPTIONS),
                        ),
                        FormField::optional("budget", "Budget", InputKind::Number),
                        FormField::optional("description", "Description", InputKind::Text),
                    ],
                },
            ],
        }
    }

    /// Add Stage: details, dates
    pub fn stage() -> Self {
        Self {
            entity: EntityPrefix::Stg,
            steps: vec![
                FormStep {
                    title: "Details",
                    fields: vec![
                        FormField::required(
                            "project",
                            "Project id",
                            InputKind::Reference(EntityPrefix::Prj),
                        ),
                        FormField::required("name", "Stage name", InputKind::Text),
                        FormField::optional("owner", "Owner", InputKind::Text),
                    ],
                },
                FormStep {
                    title: "Dates",
                    fields: vec![
                        FormField::required("start_date", "Start date", InputKind::Date),
                        FormField::optional("end_date", "End date", InputKind::Date),
                        FormField::optional("status", "Status", InputKind::Choice(Status::OPTIONS)),
                    ],
                },
            ],
        }
    }

    /// Add Task: what, who and when
    pub fn task() -> Self {
        Self {
            entity: EntityPrefix::Tsk,
            steps: vec![
                FormStep {
                    title: "Task",
                    fields: vec![
                        FormField::required("name", "Task name", InputKind::Text),
                        FormField::optional(
                            "project",
                            "Project id",
                            InputKind::Reference(EntityPrefix::Prj),
                        ),
                        FormField::optional(
                            "stage",
                            "Stage id",
                            InputKind::Reference(EntityPrefix::Stg),
                        ),
                        FormField::optional("description", "Description", InputKind::Text),
                    ],
                },
                FormStep {
                    title: "Assignment",
                    fields: vec![
                        FormField::optional("assignee", "Assignee", InputKind::Text),
                        FormField::optional(
                            "priority",
                            "Priority",
                            InputKind::Choice(Priority::OPTIONS),
                        ),
                        FormField::optional("status", "Status", InputKind::Choice(Status::OPTIONS)),
                        FormField::optional("due_date", "Due date", InputKind::Date),
                        FormField::optional("estimate_hours", "Estimate (hours)", InputKind::Number),
                    ],
                },
            ],
        }
    }

    /// Find a field on any step
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.name == name)
    }

    fn field_names(&self) -> String {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter().map(|f| f.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Errors raised by wizard transitions and form builders
#[derive(Debug, Clone, PartialEq, Error, miette::Diagnostic)]
pub enum WizardError {
    #[error("{entity} form has no field '{field}'")]
    #[diagnostic(code(ttk::wizard::unknown_field), help("fields: {valid}"))]
    UnknownField {
        entity: String,
        field: String,
        valid: String,
    },

    #[error("invalid value for '{field}': {message}")]
    #[diagnostic(code(ttk::wizard::invalid_value))]
    InvalidValue { field: String, message: String },

    #[error("step '{step}' is missing required fields: {}", .missing.join(", "))]
    #[diagnostic(code(ttk::wizard::missing_required))]
    MissingRequired { step: String, missing: Vec<String> },

    #[error("the form can only be submitted from its last step")]
    #[diagnostic(code(ttk::wizard::not_last_step))]
    NotLastStep,

    #[error("the form has already been submitted")]
    #[diagnostic(code(ttk::wizard::submitted))]
    AlreadySubmitted,
}

/// Where the wizard is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Step(usize),
    Submitted,
}

/// Finite state machine over a form definition
#[derive(Debug, Clone)]
pub struct Wizard {
    form: FormDefinition,
    state: WizardState,
    values: BTreeMap<String, String>,
}

impl Wizard {
    pub fn new(form: FormDefinition) -> Self {
        Self {
            form,
            state: WizardState::Step(0),
            values: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    /// The step currently shown, `None` once submitted
    pub fn current_step(&self) -> Option<&FormStep> {
        match self.state {
            WizardState::Step(i) => self.form.steps.get(i),
            WizardState::Submitted => None,
        }
    }

    pub fn is_last_step(&self) -> bool {
        matches!(self.state, WizardState::Step(i) if i + 1 == self.form.steps.len())
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Record a value for any field of the form; an empty value clears it
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), WizardError> {
        if self.state == WizardState::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        let def = self
            .form
            .field(field)
            .ok_or_else(|| WizardError::UnknownField {
                entity: self.form.entity.entity_name().to_string(),
                field: field.to_string(),
                valid: self.form.field_names(),
            })?;

        let value = value.into().trim().to_string();
        if value.is_empty() {
            self.values.remove(field);
            return Ok(());
        }
        def.check(&value)
            .map_err(|message| WizardError::InvalidValue {
                field: field.to_string(),
                message,
            })?;
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    /// Required fields of the current step that have no value yet
    pub fn missing_fields(&self) -> Vec<String> {
        self.current_step()
            .map(|step| {
                step.fields
                    .iter()
                    .filter(|f| f.required && !self.values.contains_key(f.name))
                    .map(|f| f.name.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn guard_current_step(&self) -> Result<(), WizardError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        let step = self.current_step().map(|s| s.title).unwrap_or_default();
        Err(WizardError::MissingRequired {
            step: step.to_string(),
            missing,
        })
    }

    /// Advance one step; stays put on the last step
    pub fn next(&mut self) -> Result<WizardState, WizardError> {
        let WizardState::Step(i) = self.state else {
            return Err(WizardError::AlreadySubmitted);
        };
        self.guard_current_step()?;
        if i + 1 < self.form.steps.len() {
            self.state = WizardState::Step(i + 1);
            debug!(entity = self.form.entity.entity_name(), step = i + 1, "wizard advanced");
        }
        Ok(self.state)
    }

    /// Go back one step; stays put on the first step
    pub fn back(&mut self) -> Result<WizardState, WizardError> {
        let WizardState::Step(i) = self.state else {
            return Err(WizardError::AlreadySubmitted);
        };
        self.state = WizardState::Step(i.saturating_sub(1));
        Ok(self.state)
    }

    /// Finish the form from its last step
    pub fn submit(&mut self) -> Result<FormValues, WizardError> {
        if self.state == WizardState::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if !self.is_last_step() {
            return Err(WizardError::NotLastStep);
        }
        self.guard_current_step()?;

        // Earlier steps were checked on the way forward, but values may have
        // been cleared since.
        for step in &self.form.steps {
            let missing: Vec<String> = step
                .fields
                .iter()
                .filter(|f| f.required && !self.values.contains_key(f.name))
                .map(|f| f.name.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(WizardError::MissingRequired {
                    step: step.title.to_string(),
                    missing,
                });
            }
        }

        self.state = WizardState::Submitted;
        debug!(entity = self.form.entity.entity_name(), "wizard submitted");
        Ok(FormValues {
            entity: self.form.entity,
            values: self.values.clone(),
        })
    }
}

/// Values collected by a submitted wizard
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub entity: EntityPrefix,
    pub values: BTreeMap<String, String>,
}

impl FormValues {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    fn require(&self, field: &str) -> Result<String, WizardError> {
        self.get(field)
            .map(str::to_string)
            .ok_or_else(|| WizardError::MissingRequired {
                step: self.entity.entity_name().to_string(),
                missing: vec![field.to_string()],
            })
    }

    fn parse<T>(&self, field: &str) -> Result<Option<T>, WizardError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(field)
            .map(|v| {
                v.parse::<T>().map_err(|e| WizardError::InvalidValue {
                    field: field.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    fn date(&self, field: &str) -> Result<Option<NaiveDate>, WizardError> {
        self.get(field)
            .map(|v| {
                NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|e| WizardError::InvalidValue {
                    field: field.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    fn text(&self, field: &str) -> Option<String> {
        self.get(field).map(str::to_string)
    }

    pub fn into_project(self, author: &str) -> Result<Project, WizardError> {
        let mut project = Project::new(self.require("name")?, self.require("client")?, author.to_string());
        project.manager = self.text("manager");
        if let Some(stage) = self.parse::<ProjectStage>("stage")? {
            project.stage = stage;
        }
        if let Some(priority) = self.parse::<Priority>("priority")? {
            project.priority = priority;
        }
        project.start_date = self.date("start_date")?;
        project.due_date = self.date("due_date")?;
        project.budget = self.parse::<f64>("budget")?;
        project.description = self.text("description");
        Ok(project)
    }

    pub fn into_stage(self, author: &str) -> Result<Stage, WizardError> {
        let project = self
            .parse::<EntityId>("project")?
            .ok_or_else(|| WizardError::MissingRequired {
                step: "stage".to_string(),
                missing: vec!["project".to_string()],
            })?;
        let mut stage = Stage::new(self.require("name")?, project, author.to_string());
        stage.owner = self.text("owner");
        stage.start_date = self.date("start_date")?;
        stage.end_date = self.date("end_date")?;
        if let Some(status) = self.parse::<Status>("status")? {
            stage.status = status;
        }
        Ok(stage)
    }

    pub fn into_task(self, author: &str) -> Result<Task, WizardError> {
        let mut task = Task::new(self.require("name")?, author.to_string());
        task.project = self.parse::<EntityId>("project")?;
        task.stage = self.parse::<EntityId>("stage")?;
        task.assignee = self.text("assignee");
        if let Some(priority) = self.parse::<Priority>("priority")? {
            task.priority = priority;
        }
        if let Some(status) = self.parse::<Status>("status")? {
            task.status = status;
        }
        task.due_date = self.date("due_date")?;
        task.estimate_hours = self.parse::<f64>("estimate_hours")?;
        task.description = self.text("description");
        Ok(task)
    }
}

/// Interactive driver for a [`Wizard`]
pub struct SchemaWizard {
    theme: ColorfulTheme,
}

impl SchemaWizard {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Prompt for every field not already filled in, step by step
    pub fn run(&self, mut wizard: Wizard) -> Result<FormValues> {
        println!();
        println!(
            "{} New {}",
            style("◆").cyan(),
            style(wizard.form().entity.entity_name()).bold()
        );

        loop {
            let Some(step) = wizard.current_step().cloned() else {
                return Err(WizardError::AlreadySubmitted).into_diagnostic();
            };
            println!("{}", style("─".repeat(50)).dim());
            println!("{}", style(step.title).bold());

            for field in &step.fields {
                if wizard.value(field.name).is_some() {
                    continue;
                }
                loop {
                    let value = self.prompt_field(field)?;
                    match wizard.set(field.name, value) {
                        Ok(()) => break,
                        Err(e) => println!("{} {}", style("✗").red(), e),
                    }
                }
            }

            if wizard.is_last_step() {
                let values = wizard.submit().into_diagnostic()?;
                println!("{} Values collected!", style("✓").green());
                return Ok(values);
            }
            wizard.next().into_diagnostic()?;
        }
    }

    fn prompt_field(&self, field: &FormField) -> Result<String> {
        let prompt = if field.required {
            field.label.to_string()
        } else {
            format!("{} {}", field.label, style("(optional)").dim())
        };

        match &field.kind {
            InputKind::Choice(options) => {
                let mut items: Vec<&str> = options.to_vec();
                if !field.required {
                    items.insert(0, "-");
                }
                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(&items)
                    .default(0)
                    .interact()
                    .into_diagnostic()?;
                let chosen = items.get(selection).copied().unwrap_or("-");
                Ok(if chosen == "-" { String::new() } else { chosen.to_string() })
            }
            _ => Input::<String>::with_theme(&self.theme)
                .with_prompt(&prompt)
                .allow_empty(!field.required)
                .interact_text()
                .into_diagnostic(),
        }
    }
}

impl Default for SchemaWizard {
    fn default() -> Self {
        Self::new()
    }
}
