//! catalog::manifest
//!
//! Serde model of the catalog manifest.
//!
//! # Design
//!
//! The manifest is the generated data the rest of the catalog is built
//! from: every installed service, its API versions, and the request
//! fields of every operation at each version. It is embedded into the
//! binary at compile time and parsed once at startup; the catalog grows
//! by regenerating this file, not by writing code.
//!
//! A manifest declares which schema convention its generation uses
//! (`attribute` or `setter`); exactly one convention is active for a
//! given installed catalog generation.

use serde::Deserialize;
use thiserror::Error;

/// The embedded catalog data.
const EMBEDDED_MANIFEST: &str = include_str!("catalog.json");

/// Errors loading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to parse catalog manifest: {0}")]
    Parse(String),

    #[error("invalid catalog manifest: {0}")]
    Invalid(String),
}

/// Which request-schema convention a catalog generation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaConvention {
    /// Fields are directly settable public attributes.
    Attribute,
    /// Each field is exposed through a `set_<field>` setter.
    Setter,
}

/// A single request field: its wire name and whether the API requires it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

/// One operation at one (service, version).
#[derive(Debug, Clone, Deserialize)]
pub struct OperationSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// One API version of a service and its operation set.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionSpec {
    pub version: String,
    pub operations: Vec<OperationSpec>,
}

/// One service entry. Entries on the manifest denylist are shared
/// modules, not dispatchable services.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    pub versions: Vec<VersionSpec>,
}

/// The whole manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub generation: u32,
    pub convention: SchemaConvention,
    #[serde(default)]
    pub denylist: Vec<String>,
    pub services: Vec<ServiceSpec>,
}

impl Manifest {
    /// Parse the manifest embedded in the binary.
    pub fn embedded() -> Result<Self, ManifestError> {
        Self::from_json(EMBEDDED_MANIFEST)
    }

    /// Parse a manifest from JSON text and validate it.
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest =
            serde_json::from_str(text).map_err(|e| ManifestError::Parse(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Structural validation: listed services carry at least one version,
    /// and version tokens are 8-digit date strings.
    fn validate(&self) -> Result<(), ManifestError> {
        for service in &self.services {
            if service.versions.is_empty() {
                return Err(ManifestError::Invalid(format!(
                    "service '{}' has no versions",
                    service.name
                )));
            }
            for version in &service.versions {
                let token = &version.version;
                if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ManifestError::Invalid(format!(
                        "service '{}' has malformed version token '{}'",
                        service.name, token
                    )));
                }
            }
        }
        Ok(())
    }
}
