//! Command implementations

pub mod board;
pub mod list;
pub mod new;
pub mod schema;
pub mod search;
pub mod session;

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tracing::debug;

use crate::cli::helpers::parse_assignment;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::loader::DataSet;
use crate::core::session::Session;
use crate::core::store::RecordStore;
use crate::query::PredicateSet;

/// Everything a command needs: merged config, loaded records, output format
pub struct Context {
    pub config: Config,
    pub data: DataSet,
    pub format: OutputFormat,
}

impl Context {
    pub fn load(global: &GlobalOpts) -> Result<Self> {
        let config = Config::load();
        let format = resolve_format(global, &config)?;
        let data_dir = global.data.clone().or_else(|| config.data_dir.clone());
        let data = DataSet::load(data_dir.as_deref())?;
        debug!(records = data.len(), ?format, "context loaded");
        Ok(Self {
            config,
            data,
            format,
        })
    }

    pub fn session(&self) -> Result<Session> {
        Session::load(&self.config.session_path()).into_diagnostic()
    }

    /// Name recorded as author/actor: the signed-in user, else the OS user
    pub fn actor(&self) -> Result<String> {
        let session = self.session()?;
        Ok(match session.current_user() {
            Some(user) => user.username.clone(),
            None => std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .unwrap_or_else(|_| "unknown".to_string()),
        })
    }
}

/// `--format` wins over config `default_format`, which wins over auto
pub fn resolve_format(global: &GlobalOpts, config: &Config) -> Result<OutputFormat> {
    if let Some(format) = global.format {
        return Ok(format);
    }
    match config.default_format.as_deref() {
        Some(name) => OutputFormat::from_str(name, true)
            .map_err(|e| miette::miette!("invalid default_format '{}': {}", name, e)),
        None => Ok(OutputFormat::Auto),
    }
}

/// Build a predicate set from command-line query options
///
/// Config overrides are applied first so explicit options take precedence.
pub fn build_predicates<S: RecordStore>(
    store: &S,
    config: &Config,
    search: Option<&str>,
    filters: &[String],
    sort: Option<&str>,
) -> Result<PredicateSet> {
    let mut predicates = PredicateSet::for_store(store);
    config.apply_to(&mut predicates)?;
    if let Some(text) = search {
        predicates.set_search_text(text);
    }
    for filter in filters {
        let (field, value) = parse_assignment(filter)?;
        predicates.set_field_filter(&field, value)?;
    }
    if let Some(key) = sort {
        predicates.set_sort_key(key)?;
    }
    Ok(predicates)
}

/// Print a serializable value as JSON or YAML
pub fn print_serialized<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
        }
        _ => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
        }
    }
    Ok(())
}
