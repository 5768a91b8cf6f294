//! paths
//!
//! Locations of persisted state.
//!
//! All of cirrus's on-disk state lives in a single configuration root:
//!
//! 1. `$CIRRUS_CONFIG_DIR` if set (used by tests and scripting)
//! 2. `~/.cirrus/` otherwise
//!
//! Files inside the root:
//!
//! - `credentials` - INI-like sections with access keys
//! - `config` - INI-like sections with region/output/ignore
//! - `api_versions` - flat `service=version` pinned-version lines
//! - `endpoints` - flat `service.region=host` override lines

use std::path::PathBuf;
use thiserror::Error;

/// Environment variable that overrides the configuration root.
pub const CONFIG_DIR_ENV: &str = "CIRRUS_CONFIG_DIR";

/// Errors locating the configuration root.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("home directory not found")]
    NoHomeDir,
}

/// Resolve the configuration root directory.
///
/// The directory is not created here; writers create it on demand.
pub fn config_root() -> Result<PathBuf, PathError> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
    Ok(home.join(".cirrus"))
}

/// Path of the credentials file (access key id/secret per profile).
pub fn credentials_file() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join("credentials"))
}

/// Path of the general config file (region/output/ignore per profile).
pub fn config_file() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join("config"))
}

/// Path of the pinned-version store.
pub fn versions_file() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join("api_versions"))
}

/// Path of the endpoint override store.
pub fn endpoints_file() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join("endpoints"))
}
