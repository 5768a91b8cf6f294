//! binder
//!
//! Maps parsed flag input into a resolved request schema.
//!
//! # Pipeline
//!
//! For each key in the [`KeyValueMap`], in order:
//!
//! 1. Normalize the key (leading `--` stripped - normally already done
//!    by the tokenizer, repeated here so handlers can feed raw keys).
//! 2. Resolve indirection (`file://` / `fileb://`) on every value; a
//!    reference that cannot be read records an error for that field and
//!    binding of the remaining fields continues.
//! 3. Skip the reserved identity/endpoint keys the transport layer owns.
//! 4. Assign the first value to the schema field of the same name.
//!    Unknown keys never fail the bind; they are recorded and surfaced
//!    as warnings, preserving forward compatibility with schemas the
//!    binder does not fully understand.
//! 5. If the schema declares a region field and nothing assigned it,
//!    inject the profile's default region. A schema without the field
//!    is left alone even when the profile has a region.
//!
//! Binding is deterministic and stateless: the same input against a
//! fresh schema always produces the same assignments.

pub mod indirect;

pub use indirect::IndirectError;

use thiserror::Error;

use crate::cli::parser::KeyValueMap;
use crate::profile::Profile;
use crate::schema::{RequestSchema, REGION_FIELD};

/// Keys the transport layer consumes; never bound into a schema.
pub const RESERVED_KEYS: &[&str] = &["AccessKeyId", "AccessKeySecret", "Endpoint"];

/// A per-field binding failure.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("parameter '{field}': {source}")]
    Indirection {
        field: String,
        source: IndirectError,
    },
}

/// The outcome of one bind pass.
#[derive(Debug, Default)]
pub struct BindReport {
    /// Fields successfully assigned, in key order.
    pub bound: Vec<String>,
    /// Keys the schema does not declare (dropped, reported).
    pub unknown: Vec<String>,
    /// Per-field failures; these never abort the rest of the bind.
    pub errors: Vec<BindError>,
    /// Whether the profile's default region was injected.
    pub injected_region: bool,
}

impl BindReport {
    /// Warnings a caller should surface (unknown keys, field errors).
    pub fn warnings(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .unknown
            .iter()
            .map(|key| format!("unknown parameter '--{}' ignored", key))
            .collect();
        out.extend(self.errors.iter().map(|e| e.to_string()));
        out
    }
}

/// Bind `input` into `schema`, injecting the profile default region
/// where the schema calls for one.
pub fn bind(
    schema: &mut dyn RequestSchema,
    input: &KeyValueMap,
    profile: &Profile,
) -> BindReport {
    let mut report = BindReport::default();

    for (key, values) in input.iter() {
        let field = KeyValueMap::normalize(key);

        if RESERVED_KEYS.iter().any(|r| *r == field) {
            continue;
        }
        let Some(first) = values.first() else {
            continue;
        };

        let value = match indirect::resolve(first) {
            None => first.clone(),
            Some(Ok(contents)) => contents,
            Some(Err(source)) => {
                report.errors.push(BindError::Indirection {
                    field: field.to_string(),
                    source,
                });
                continue;
            }
        };

        match schema.set_field(field, &value) {
            Ok(()) => report.bound.push(field.to_string()),
            Err(_) => report.unknown.push(field.to_string()),
        }
    }

    if schema.has_field(REGION_FIELD) && schema.field_value(REGION_FIELD).is_none() {
        if let Some(region) = profile.region.as_deref() {
            if schema.set_field(REGION_FIELD, region).is_ok() {
                report.injected_region = true;
                report.bound.push(REGION_FIELD.to_string());
            }
        }
    }

    report
}
