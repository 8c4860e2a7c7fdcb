//! YAML parsing with source-located diagnostics

pub mod diagnostics;

pub use diagnostics::YamlSyntaxError;

use serde::de::DeserializeOwned;

/// Parse a YAML document, reporting failures against `filename`
pub fn parse_yaml_str<T: DeserializeOwned>(
    source: &str,
    filename: &str,
) -> Result<T, YamlSyntaxError> {
    serde_yml::from_str(source).map_err(|e| YamlSyntaxError::from_serde_error(&e, source, filename))
}
