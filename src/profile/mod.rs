//! profile
//!
//! Named credential/config profiles.
//!
//! # Overview
//!
//! A profile bundles the identity and preferences one invocation runs
//! under. It is assembled from two files in the configuration root:
//!
//! - `credentials` - `access_key_id` / `access_key_secret`
//! - `config` - `region` / `output` / `ignore`
//!
//! `--profile <name>` selects the `[profile <name>]` section of both
//! files; without the flag the `[default]` section applies. A missing
//! file or section yields an empty profile - absence of credentials is
//! only an error at dispatch time, so catalog browsing and help work
//! unconfigured.

pub mod ini;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::paths;

/// Credential file key for the access key id.
pub const KEY_ACCESS_KEY_ID: &str = "access_key_id";
/// Credential file key for the access key secret.
pub const KEY_ACCESS_KEY_SECRET: &str = "access_key_secret";
/// Config file key for the default region.
pub const KEY_REGION: &str = "region";
/// Config file key for the default output format.
pub const KEY_OUTPUT: &str = "output";
/// Config file key for the telemetry opt-out (`yes` disables the ping).
pub const KEY_IGNORE: &str = "ignore";

/// Errors from profile loading.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to locate configuration directory: {0}")]
    Location(#[from] paths::PathError),

    #[error("failed to read profile file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An identity pair for signing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

/// The active profile for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub name: String,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub region: Option<String>,
    pub output: Option<String>,
    pub ignore_telemetry: bool,
}

impl Profile {
    /// Load the named profile (or `default`) from the standard locations.
    pub fn load(name: Option<&str>) -> Result<Self, ProfileError> {
        let credentials = paths::credentials_file()?;
        let config = paths::config_file()?;
        Self::load_from(&credentials, &config, name)
    }

    /// Load from explicit file paths (used by tests).
    pub fn load_from(
        credentials_path: &Path,
        config_path: &Path,
        name: Option<&str>,
    ) -> Result<Self, ProfileError> {
        let name = name.unwrap_or("default");
        let section = ini::section_name(name);

        let creds = read_optional_section(credentials_path, &section)?;
        let config = read_optional_section(config_path, &section)?;

        Ok(Self {
            name: name.to_string(),
            access_key_id: creds.get(KEY_ACCESS_KEY_ID).cloned(),
            access_key_secret: creds.get(KEY_ACCESS_KEY_SECRET).cloned(),
            region: config.get(KEY_REGION).cloned(),
            output: config.get(KEY_OUTPUT).cloned(),
            ignore_telemetry: config
                .get(KEY_IGNORE)
                .map(|v| v.eq_ignore_ascii_case("yes"))
                .unwrap_or(false),
        })
    }

    /// Both halves of the identity, if configured.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.access_key_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(Credentials {
                    access_key_id: id.clone(),
                    access_key_secret: secret.clone(),
                })
            }
            _ => None,
        }
    }
}

fn read_optional_section(
    path: &Path,
    section: &str,
) -> Result<BTreeMap<String, String>, ProfileError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(ini::read_section(&contents, section)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(ProfileError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_files(temp: &TempDir) -> (PathBuf, PathBuf) {
        let creds = temp.path().join("credentials");
        let config = temp.path().join("config");
        fs::write(
            &creds,
            "[default]\naccess_key_id=AKID-default\naccess_key_secret=SECRET-default\n\n\
             [profile staging]\naccess_key_id=AKID-staging\naccess_key_secret=SECRET-staging\n",
        )
        .unwrap();
        fs::write(
            &config,
            "[default]\nregion=cn-hangzhou\noutput=table\nignore=no\n\n\
             [profile staging]\nregion=us-west-1\nignore=yes\n",
        )
        .unwrap();
        (creds, config)
    }

    #[test]
    fn default_profile() {
        let temp = TempDir::new().unwrap();
        let (creds, config) = write_files(&temp);
        let profile = Profile::load_from(&creds, &config, None).unwrap();

        assert_eq!(profile.name, "default");
        assert_eq!(profile.region.as_deref(), Some("cn-hangzhou"));
        assert_eq!(profile.output.as_deref(), Some("table"));
        assert!(!profile.ignore_telemetry);

        let identity = profile.credentials().unwrap();
        assert_eq!(identity.access_key_id, "AKID-default");
    }

    #[test]
    fn named_profile() {
        let temp = TempDir::new().unwrap();
        let (creds, config) = write_files(&temp);
        let profile = Profile::load_from(&creds, &config, Some("staging")).unwrap();

        assert_eq!(profile.region.as_deref(), Some("us-west-1"));
        assert!(profile.output.is_none());
        assert!(profile.ignore_telemetry);
        assert_eq!(
            profile.credentials().unwrap().access_key_id,
            "AKID-staging"
        );
    }

    #[test]
    fn missing_files_yield_empty_profile() {
        let temp = TempDir::new().unwrap();
        let profile = Profile::load_from(
            &temp.path().join("credentials"),
            &temp.path().join("config"),
            None,
        )
        .unwrap();
        assert!(profile.credentials().is_none());
        assert!(profile.region.is_none());
    }

    #[test]
    fn half_configured_identity_is_no_identity() {
        let temp = TempDir::new().unwrap();
        let creds = temp.path().join("credentials");
        fs::write(&creds, "[default]\naccess_key_id=AKID\n").unwrap();
        let profile =
            Profile::load_from(&creds, &temp.path().join("config"), None).unwrap();
        assert!(profile.credentials().is_none());
    }
}
