//! ui::output
//!
//! Output format selection and dispatch to the renderers.
//!
//! # Design
//!
//! Three formats exist: `json` (default), `text`, and `table`. The
//! format for an invocation resolves as: `--output` flag, then the
//! profile's stored `output` default, then json. An unrecognized name
//! is a user error, not a silent fallback.

use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use super::{table, text};

/// Errors from format resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutputError {
    #[error("unknown output format '{0}' (valid: json, text, table)")]
    Unknown(String),
}

/// The formatting style for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
    Table,
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            "table" => Ok(OutputFormat::Table),
            other => Err(OutputError::Unknown(other.to_string())),
        }
    }
}

impl OutputFormat {
    /// Resolve the format for an invocation.
    pub fn resolve(
        flag: Option<&str>,
        profile_default: Option<&str>,
    ) -> Result<Self, OutputError> {
        match flag.or(profile_default) {
            Some(name) => name.parse(),
            None => Ok(OutputFormat::Json),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

/// Render a decoded payload in the requested format.
pub fn render(title: &str, payload: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
        }
        OutputFormat::Text => text::format_text(payload),
        OutputFormat::Table => table::format_table(title, payload),
    }
}
