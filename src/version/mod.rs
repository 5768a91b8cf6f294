//! version
//!
//! API version tokens and the version-selection policy.
//!
//! # Precedence
//!
//! For each invocation the version of a service's API surface is chosen
//! deterministically:
//!
//! 1. An explicit `--version` flag, validated against the catalog.
//!    An unknown explicit version fails closed - no fallback, no dispatch.
//! 2. A version pinned for the service in the pinned-version store.
//! 3. The latest version the catalog lists for the service.

pub mod store;

pub use store::VersionStore;

use thiserror::Error;

use crate::catalog::CatalogIndex;

/// Errors from version parsing and selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("malformed version token '{0}': expected an 8-digit date like 20140526")]
    Malformed(String),

    #[error("wrong version: '{version}' is not an installed version of '{service}'")]
    UnknownVersion { service: String, version: String },

    #[error("service '{0}' has no installed versions")]
    NoVersions(String),
}

/// An opaque 8-character date-like version token (e.g. `20140526`).
///
/// Tokens are compared lexically; because they share a fixed length and a
/// fixed digits-only alphabet, lexical order is date order, and the
/// maximum is the latest version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Parse a version token, rejecting anything that is not 8 ASCII digits.
    pub fn new(token: impl Into<String>) -> Result<Self, VersionError> {
        let token = token.into();
        if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersionError::Malformed(token));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// State-free selection policy over a catalog and a pinned-version store.
pub struct VersionSelector<'a> {
    catalog: &'a CatalogIndex,
    store: &'a VersionStore,
}

impl<'a> VersionSelector<'a> {
    pub fn new(catalog: &'a CatalogIndex, store: &'a VersionStore) -> Self {
        Self { catalog, store }
    }

    /// Select the version to dispatch against for `service`.
    ///
    /// `explicit` is the raw `--version` flag value, if the user supplied
    /// one. A pinned version that has since disappeared from the catalog
    /// is ignored rather than failing the invocation.
    pub fn select(
        &self,
        service: &str,
        explicit: Option<&str>,
    ) -> Result<ApiVersion, VersionError> {
        let available = self.catalog.versions(service);
        if let Some(token) = explicit {
            let requested = ApiVersion::new(token)?;
            if available.contains(&requested) {
                return Ok(requested);
            }
            return Err(VersionError::UnknownVersion {
                service: service.to_string(),
                version: token.to_string(),
            });
        }

        if let Some(pinned) = self.store.pinned(service) {
            if available.contains(&pinned) {
                return Ok(pinned);
            }
        }

        available
            .first()
            .cloned()
            .ok_or_else(|| VersionError::NoVersions(service.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog() -> CatalogIndex {
        CatalogIndex::builtin()
    }

    #[test]
    fn token_must_be_eight_digits() {
        assert!(ApiVersion::new("20140526").is_ok());
        assert!(ApiVersion::new("2014052").is_err());
        assert!(ApiVersion::new("201405260").is_err());
        assert!(ApiVersion::new("2014052a").is_err());
        assert!(ApiVersion::new("").is_err());
    }

    #[test]
    fn lexical_order_is_date_order() {
        let older = ApiVersion::new("20131115").unwrap();
        let newer = ApiVersion::new("20140526").unwrap();
        assert!(newer > older);
    }

    #[test]
    fn explicit_version_wins_over_pin() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::at(temp.path().join("api_versions"));
        store.pin("ecs", &ApiVersion::new("20140526").unwrap()).unwrap();

        let catalog = catalog();
        let selector = VersionSelector::new(&catalog, &store);
        let picked = selector.select("ecs", Some("20131115")).unwrap();
        assert_eq!(picked.as_str(), "20131115");
    }

    #[test]
    fn unknown_explicit_version_fails_closed() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::at(temp.path().join("api_versions"));
        let catalog = catalog();
        let selector = VersionSelector::new(&catalog, &store);

        let err = selector.select("ecs", Some("19990101")).unwrap_err();
        assert_eq!(
            err,
            VersionError::UnknownVersion {
                service: "ecs".into(),
                version: "19990101".into()
            }
        );
    }

    #[test]
    fn pin_wins_over_latest() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::at(temp.path().join("api_versions"));
        store.pin("ecs", &ApiVersion::new("20131115").unwrap()).unwrap();

        let catalog = catalog();
        let selector = VersionSelector::new(&catalog, &store);
        let picked = selector.select("ecs", None).unwrap();
        assert_eq!(picked.as_str(), "20131115");
    }

    #[test]
    fn stale_pin_falls_back_to_latest() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::at(temp.path().join("api_versions"));
        store.pin("ecs", &ApiVersion::new("20090101").unwrap()).unwrap();

        let catalog = catalog();
        let selector = VersionSelector::new(&catalog, &store);
        let picked = selector.select("ecs", None).unwrap();
        assert_eq!(picked.as_str(), "20140526");
    }

    #[test]
    fn no_pin_no_flag_selects_latest() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::at(temp.path().join("api_versions"));
        let catalog = catalog();
        let selector = VersionSelector::new(&catalog, &store);

        let picked = selector.select("ecs", None).unwrap();
        assert_eq!(picked.as_str(), "20140526");
    }

    #[test]
    fn unknown_service_has_no_versions() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::at(temp.path().join("api_versions"));
        let catalog = catalog();
        let selector = VersionSelector::new(&catalog, &store);

        let err = selector.select("nosuch", None).unwrap_err();
        assert_eq!(err, VersionError::NoVersions("nosuch".into()));
    }
}
