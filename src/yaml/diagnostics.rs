//! YAML error diagnostics pointing at the offending line of a data file

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax or shape error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("invalid YAML in {file}: {message}")]
#[diagnostic(code(ttk::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    file: String,

    message: String,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = offset_of(source, line, column);
        let message = err.to_string();
        let help = suggest(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            file: filename.to_string(),
            message,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte offset of a 1-based line/column, clamped to the source length
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        source
            .match_indices('\n')
            .nth(line - 2)
            .map(|(i, _)| i + 1)
            .unwrap_or(source.len())
    };

    let rest = &source[line_start..];
    let col_offset = rest
        .char_indices()
        .take_while(|(_, c)| *c != '\n')
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or_else(|| rest.find('\n').unwrap_or(rest.len()));

    line_start + col_offset
}

fn suggest(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs".to_string());
    }
    if msg.contains("duplicate") {
        return Some("each key may only appear once per record".to_string());
    }
    if msg.contains("unknown variant") {
        return Some("check the allowed values with `ttk schema <entity>`".to_string());
    }
    if msg.contains("missing field") {
        return Some("every record needs at least an id, a name and a created timestamp".to_string());
    }
    if msg.contains("invalid") && msg.contains("id") {
        return Some("ids look like PRJ-01J9ZK3Q8W0000000000000001".to_string());
    }
    if msg.contains("mapping values are not allowed") {
        return Some("a space may be missing after ':', or the value needs quoting".to_string());
    }

    None
}
