//! catalog
//!
//! The installed-service catalog.
//!
//! # Architecture
//!
//! The catalog is an in-memory registry built once per process from the
//! embedded manifest. It answers three questions:
//!
//! - which services are installed
//! - which API versions a service carries (newest first)
//! - which operations exist at a (service, version)
//!
//! Service and operation tokens coming from the command line are matched
//! case-insensitively and resolved to their exact catalog spelling.
//! Schema *field* names are case-sensitive wire names and are not
//! touched here.
//!
//! A manifest that fails to parse degrades to an empty catalog rather
//! than aborting: the user sees "unknown service" guidance, the same as
//! an uninstalled catalog.

pub mod manifest;

pub use manifest::{
    FieldSpec, Manifest, ManifestError, OperationSpec, SchemaConvention, ServiceSpec, VersionSpec,
};

use std::collections::BTreeSet;

use crate::version::ApiVersion;

/// Registry of installed services, versions and operations.
#[derive(Debug)]
pub struct CatalogIndex {
    convention: SchemaConvention,
    denylist: Vec<String>,
    services: Vec<ServiceSpec>,
}

impl CatalogIndex {
    /// Build the index from the manifest embedded in the binary.
    ///
    /// A manifest that cannot be parsed yields an empty index; the
    /// failure is reported on stderr once and every lookup then behaves
    /// as "not installed".
    pub fn builtin() -> Self {
        match Manifest::embedded() {
            Ok(manifest) => Self::from_manifest(manifest),
            Err(e) => {
                eprintln!("warning: catalog unavailable: {}", e);
                Self {
                    convention: SchemaConvention::Attribute,
                    denylist: Vec::new(),
                    services: Vec::new(),
                }
            }
        }
    }

    /// Build the index from an already-loaded manifest.
    pub fn from_manifest(manifest: Manifest) -> Self {
        Self {
            convention: manifest.convention,
            denylist: manifest.denylist,
            services: manifest.services,
        }
    }

    /// The schema convention of this catalog generation.
    pub fn convention(&self) -> SchemaConvention {
        self.convention
    }

    /// All installed service names, sorted, with denylisted shared
    /// entries removed.
    pub fn services(&self) -> BTreeSet<String> {
        self.services
            .iter()
            .map(|s| s.name.clone())
            .filter(|name| !self.is_denylisted(name))
            .collect()
    }

    /// Whether `token` names an installed service (case-insensitive).
    pub fn has_service(&self, token: &str) -> bool {
        self.resolve_service(token).is_some()
    }

    /// Resolve a user-supplied service token to its exact catalog name.
    pub fn resolve_service(&self, token: &str) -> Option<&str> {
        self.services
            .iter()
            .map(|s| s.name.as_str())
            .filter(|name| !self.is_denylisted(name))
            .find(|name| name.eq_ignore_ascii_case(token))
    }

    /// Versions of `service`, sorted descending so index 0 is latest.
    ///
    /// Unknown services and malformed tokens yield an empty list.
    pub fn versions(&self, service: &str) -> Vec<ApiVersion> {
        let Some(spec) = self.service_spec(service) else {
            return Vec::new();
        };
        let mut versions: Vec<ApiVersion> = spec
            .versions
            .iter()
            .filter_map(|v| ApiVersion::new(v.version.as_str()).ok())
            .collect();
        versions.sort();
        versions.reverse();
        versions
    }

    /// Operation names at a (service, version); empty for an unknown or
    /// absent version.
    pub fn operations(&self, service: &str, version: &ApiVersion) -> BTreeSet<String> {
        self.version_spec(service, version)
            .map(|v| v.operations.iter().map(|o| o.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Look up the catalog entry for an operation, matching the
    /// operation token case-insensitively.
    pub fn operation_spec(
        &self,
        service: &str,
        operation: &str,
        version: &ApiVersion,
    ) -> Option<&OperationSpec> {
        self.version_spec(service, version)?
            .operations
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(operation))
    }

    fn service_spec(&self, token: &str) -> Option<&ServiceSpec> {
        self.services
            .iter()
            .filter(|s| !self.is_denylisted(&s.name))
            .find(|s| s.name.eq_ignore_ascii_case(token))
    }

    fn version_spec(&self, service: &str, version: &ApiVersion) -> Option<&VersionSpec> {
        self.service_spec(service)?
            .versions
            .iter()
            .find(|v| v.version == version.as_str())
    }

    fn is_denylisted(&self, name: &str) -> bool {
        self.denylist.iter().any(|d| d.eq_ignore_ascii_case(name))
    }
}
