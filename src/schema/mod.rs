//! Schema system - record schemas and creation forms

pub mod record;
pub mod wizard;

pub use record::{FieldDef, FieldKind, RecordSchema, RecordSchemaBuilder, SortKey, SortOrder};
pub use wizard::{FormDefinition, FormValues, SchemaWizard, Wizard, WizardError, WizardState};
