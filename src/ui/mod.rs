//! ui
//!
//! Result rendering and user-facing messages.

pub mod output;
pub mod table;
pub mod text;

pub use output::{render, OutputFormat};

use std::fmt::Display;

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message.
pub fn warn(message: impl Display) {
    eprintln!("warning: {}", message);
}
