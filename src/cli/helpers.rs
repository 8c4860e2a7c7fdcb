//! Shared helper functions for CLI commands

use miette::Result;

/// Format a string ID for display, truncating if too long
///
/// IDs longer than 16 characters are truncated to 13 chars with "..." suffix.
pub fn format_short_id_str(id: &str) -> String {
    truncate_str(id, 16)
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Split a `field=value` argument; the value may be empty
pub fn parse_assignment(arg: &str) -> Result<(String, String)> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| miette::miette!("expected FIELD=VALUE, got '{}'", arg))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(miette::miette!("missing field name in '{}'", arg));
    }
    Ok((field.to_string(), value.trim().to_string()))
}

/// Escape a cell for a markdown table
pub fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Escape a cell for tab-separated output
pub fn escape_tsv(s: &str) -> String {
    s.replace(['\t', '\n'], " ")
}
