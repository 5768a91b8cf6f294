//! version::store
//!
//! The per-service pinned-version store.
//!
//! # Format
//!
//! A flat file of `service=version` lines inside the configuration root,
//! one line per service:
//!
//! ```text
//! ecs=20140526
//! rds=20140815
//! ```
//!
//! Lines that do not parse are ignored on read and preserved on write.
//! Updates take an exclusive lock on a sidecar lock file and replace the
//! store atomically (temp file + rename), so concurrent `ConfigVersion`
//! invocations cannot interleave partial writes.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;
use thiserror::Error;

use super::ApiVersion;
use crate::paths;

/// Errors from pinned-version store operations.
#[derive(Debug, Error)]
pub enum VersionStoreError {
    #[error("failed to locate configuration directory: {0}")]
    Location(#[from] paths::PathError),

    #[error("failed to read version store '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write version store '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Handle on the pinned-version file.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    /// Open the store at its default location in the configuration root.
    pub fn open() -> Result<Self, VersionStoreError> {
        Ok(Self {
            path: paths::versions_file()?,
        })
    }

    /// Open the store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Look up the pinned version for `service`, if any.
    ///
    /// A missing file, a missing line, or a malformed version token all
    /// read as "no pin".
    pub fn pinned(&self, service: &str) -> Option<ApiVersion> {
        let contents = fs::read_to_string(&self.path).ok()?;
        for line in contents.lines() {
            if let Some((key, value)) = split_entry(line) {
                if key == service {
                    return ApiVersion::new(value).ok();
                }
            }
        }
        None
    }

    /// All pins in the store, in file order.
    pub fn all(&self) -> Vec<(String, ApiVersion)> {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        contents
            .lines()
            .filter_map(split_entry)
            .filter_map(|(key, value)| {
                ApiVersion::new(value).ok().map(|v| (key.to_string(), v))
            })
            .collect()
    }

    /// Pin `version` for `service`, creating the store if needed.
    ///
    /// The existing line for the service is rewritten in place; other
    /// lines (including unparseable ones) are preserved verbatim.
    pub fn pin(&self, service: &str, version: &ApiVersion) -> Result<(), VersionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| VersionStoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let lock_path = self.path.with_extension("lock");
        let lock = fs::File::create(&lock_path).map_err(|e| VersionStoreError::Write {
            path: lock_path.clone(),
            source: e,
        })?;
        lock.lock_exclusive().map_err(|e| VersionStoreError::Write {
            path: lock_path.clone(),
            source: e,
        })?;

        let result = self.pin_locked(service, version);
        let _ = fs2::FileExt::unlock(&lock);
        result
    }

    fn pin_locked(&self, service: &str, version: &ApiVersion) -> Result<(), VersionStoreError> {
        let mut lines: Vec<String> = match fs::read_to_string(&self.path) {
            Ok(contents) => contents.lines().map(str::to_string).collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(VersionStoreError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let new_line = format!("{}={}", service, version);
        let mut replaced = false;
        for line in &mut lines {
            if split_entry(line).map(|(key, _)| key) == Some(service) {
                *line = new_line.clone();
                replaced = true;
                break;
            }
        }
        if !replaced {
            lines.push(new_line);
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| VersionStoreError::Write {
            path: temp_path.clone(),
            source: e,
        })?;
        for line in &lines {
            writeln!(file, "{}", line).map_err(|e| VersionStoreError::Write {
                path: temp_path.clone(),
                source: e,
            })?;
        }
        file.sync_all().map_err(|e| VersionStoreError::Write {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| VersionStoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}

/// Split a `key=value` line; returns `None` for blank or malformed lines.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_no_pin() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::at(temp.path().join("api_versions"));
        assert!(store.pinned("ecs").is_none());
        assert!(store.all().is_empty());
    }

    #[test]
    fn pin_then_read_back() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::at(temp.path().join("api_versions"));
        let version = ApiVersion::new("20140526").unwrap();
        store.pin("ecs", &version).unwrap();
        assert_eq!(store.pinned("ecs"), Some(version));
    }

    #[test]
    fn pin_updates_in_place() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::at(temp.path().join("api_versions"));
        store.pin("ecs", &ApiVersion::new("20131115").unwrap()).unwrap();
        store.pin("rds", &ApiVersion::new("20140815").unwrap()).unwrap();
        store.pin("ecs", &ApiVersion::new("20140526").unwrap()).unwrap();

        assert_eq!(store.pinned("ecs").unwrap().as_str(), "20140526");
        assert_eq!(store.pinned("rds").unwrap().as_str(), "20140815");

        let contents = fs::read_to_string(temp.path().join("api_versions")).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn malformed_lines_ignored_and_preserved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("api_versions");
        fs::write(&path, "not a pin\necs=20140526\n").unwrap();

        let store = VersionStore::at(path.clone());
        assert_eq!(store.pinned("ecs").unwrap().as_str(), "20140526");

        store.pin("rds", &ApiVersion::new("20140815").unwrap()).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("not a pin"));
    }

    #[test]
    fn bad_version_token_reads_as_no_pin() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("api_versions");
        fs::write(&path, "ecs=latest\n").unwrap();
        let store = VersionStore::at(path);
        assert!(store.pinned("ecs").is_none());
    }
}
