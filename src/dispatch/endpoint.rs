//! dispatch::endpoint
//!
//! Endpoint resolution for the transport.
//!
//! Precedence: an explicit `--Endpoint` flag, then a persisted override
//! from the endpoint store, then the provider's conventional host
//! pattern. Overrides are persisted as flat `service.region=host` lines
//! by the `ModifyEndpoint` meta-operation.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::paths;

/// The provider's API domain for conventional endpoints.
const API_DOMAIN: &str = "cirrusapi.com";

/// Handle on the endpoint override file.
#[derive(Debug, Clone)]
pub struct EndpointStore {
    path: PathBuf,
}

impl EndpointStore {
    /// Open the store at its default location in the configuration root.
    pub fn open() -> Result<Self, paths::PathError> {
        Ok(Self {
            path: paths::endpoints_file()?,
        })
    }

    /// Open the store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persisted override for (service, region), if any.
    pub fn lookup(&self, service: &str, region: &str) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let wanted = format!("{}.{}", service, region);
        for line in contents.lines() {
            let line = line.trim();
            if let Some((key, value)) = line.split_once('=') {
                if key.trim() == wanted && !value.trim().is_empty() {
                    return Some(value.trim().to_string());
                }
            }
        }
        None
    }

    /// Persist an override, replacing an existing line for the same
    /// (service, region) pair.
    pub fn set(&self, service: &str, region: &str, host: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let key = format!("{}.{}", service, region);
        let mut lines: Vec<String> = match fs::read_to_string(&self.path) {
            Ok(contents) => contents.lines().map(str::to_string).collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };

        let new_line = format!("{}={}", key, host);
        let mut replaced = false;
        for line in &mut lines {
            if line.split_once('=').map(|(k, _)| k.trim()) == Some(key.as_str()) {
                *line = new_line.clone();
                replaced = true;
                break;
            }
        }
        if !replaced {
            lines.push(new_line);
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        for line in &lines {
            writeln!(file, "{}", line)?;
        }
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)
    }
}

/// Resolve the host to dispatch to.
pub fn resolve(
    service: &str,
    region: Option<&str>,
    explicit: Option<&str>,
    store: &EndpointStore,
) -> String {
    if let Some(host) = explicit {
        return host.to_string();
    }
    if let Some(region) = region {
        if let Some(host) = store.lookup(service, region) {
            return host;
        }
        return format!("{}.{}.{}", service, region, API_DOMAIN);
    }
    format!("{}.{}", service, API_DOMAIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_flag_wins() {
        let temp = TempDir::new().unwrap();
        let store = EndpointStore::at(temp.path().join("endpoints"));
        store.set("ecs", "cn-hangzhou", "stored.example.test").unwrap();

        let host = resolve("ecs", Some("cn-hangzhou"), Some("flag.example.test"), &store);
        assert_eq!(host, "flag.example.test");
    }

    #[test]
    fn stored_override_wins_over_convention() {
        let temp = TempDir::new().unwrap();
        let store = EndpointStore::at(temp.path().join("endpoints"));
        store.set("ecs", "cn-hangzhou", "stored.example.test").unwrap();

        let host = resolve("ecs", Some("cn-hangzhou"), None, &store);
        assert_eq!(host, "stored.example.test");
    }

    #[test]
    fn conventional_host_with_region() {
        let temp = TempDir::new().unwrap();
        let store = EndpointStore::at(temp.path().join("endpoints"));
        let host = resolve("ecs", Some("cn-hangzhou"), None, &store);
        assert_eq!(host, "ecs.cn-hangzhou.cirrusapi.com");
    }

    #[test]
    fn conventional_host_without_region() {
        let temp = TempDir::new().unwrap();
        let store = EndpointStore::at(temp.path().join("endpoints"));
        assert_eq!(resolve("ecs", None, None, &store), "ecs.cirrusapi.com");
    }

    #[test]
    fn set_replaces_existing_line() {
        let temp = TempDir::new().unwrap();
        let store = EndpointStore::at(temp.path().join("endpoints"));
        store.set("ecs", "cn-hangzhou", "a.example.test").unwrap();
        store.set("ecs", "cn-hangzhou", "b.example.test").unwrap();
        store.set("rds", "cn-hangzhou", "c.example.test").unwrap();

        assert_eq!(
            store.lookup("ecs", "cn-hangzhou").unwrap(),
            "b.example.test"
        );
        let contents = fs::read_to_string(temp.path().join("endpoints")).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
