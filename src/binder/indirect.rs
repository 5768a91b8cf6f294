//! binder::indirect
//!
//! Indirection values: flag values that reference local files instead of
//! carrying literal data.
//!
//! Two prefixes are recognized, checked in order:
//!
//! - `file://<path>` - read as UTF-8 text
//! - `fileb://<path>` - read as raw bytes, converted lossily to text
//!   (the wire format carries strings; undecodable bytes become U+FFFD)
//!
//! A value with neither prefix passes through untouched. A reference
//! that cannot be read is a per-field user error, not a crash.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to resolve an indirection reference.
#[derive(Debug, Error)]
#[error("cannot read '{path}': {message}")]
pub struct IndirectError {
    pub path: PathBuf,
    pub message: String,
}

/// The recognized prefixes, in match order.
const PREFIXES: &[(&str, ReadMode)] = &[("file://", ReadMode::Text), ("fileb://", ReadMode::Binary)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    Text,
    Binary,
}

/// Resolve a single value.
///
/// Returns `None` when the value is literal, `Some(Ok(contents))` when a
/// reference was substituted, `Some(Err(..))` when a reference could not
/// be read.
pub fn resolve(value: &str) -> Option<Result<String, IndirectError>> {
    for (prefix, mode) in PREFIXES {
        if let Some(rest) = value.strip_prefix(prefix) {
            let path = PathBuf::from(rest);
            return Some(read(&path, *mode));
        }
    }
    None
}

fn read(path: &PathBuf, mode: ReadMode) -> Result<String, IndirectError> {
    match mode {
        ReadMode::Text => fs::read_to_string(path).map_err(|e| IndirectError {
            path: path.clone(),
            message: e.to_string(),
        }),
        ReadMode::Binary => fs::read(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|e| IndirectError {
                path: path.clone(),
                message: e.to_string(),
            }),
    }
}
