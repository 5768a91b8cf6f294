//! extension::version_ops
//!
//! Version-pinning meta-operations.
//!
//! `ConfigVersion` persists a per-service version preference;
//! `ShowVersions` prints the current pin alongside everything the
//! catalog carries. The pin only accepts versions the catalog actually
//! lists - you cannot pin a version that is not installed.

use anyhow::{bail, Result};
use clap::Parser;

use crate::version::ApiVersion;

use super::ExtensionContext;

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct ConfigVersionArgs {
    /// Version token to pin.
    #[arg(long = "version")]
    version: Option<String>,
}

/// Handle `<service> ConfigVersion --version <token>`.
pub fn config_version(service: &str, ctx: &ExtensionContext<'_>) -> Result<()> {
    let args = ConfigVersionArgs::try_parse_from(ctx.raw_args)
        .map_err(|e| anyhow::anyhow!("invalid arguments: {}", e))?;

    let Some(token) = args.version else {
        bail!("an argument is needed: pass --version with the version to pin");
    };

    let version = ApiVersion::new(token.as_str())?;
    if !ctx.catalog.versions(service).contains(&version) {
        bail!(
            "wrong version: '{}' is not an installed version of '{}'",
            token,
            service
        );
    }

    ctx.version_store.pin(service, &version)?;
    println!("pinned {} to {}", service, version);
    Ok(())
}

/// Handle `<service> ShowVersions`.
pub fn show_versions(service: &str, ctx: &ExtensionContext<'_>) -> Result<()> {
    let pinned = ctx
        .version_store
        .pinned(service)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(not configured)".to_string());

    println!("* {}", pinned);
    for version in ctx.catalog.versions(service) {
        println!("  {}", version);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogIndex;
    use crate::dispatch::mock::MockTransport;
    use crate::dispatch::EndpointStore;
    use crate::profile::Profile;
    use crate::version::VersionStore;
    use tempfile::TempDir;

    struct Fixture {
        catalog: CatalogIndex,
        version: ApiVersion,
        version_store: VersionStore,
        endpoint_store: EndpointStore,
        profile: Profile,
        transport: MockTransport,
        _temp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            Self {
                catalog: CatalogIndex::builtin(),
                version: ApiVersion::new("20140526").unwrap(),
                version_store: VersionStore::at(temp.path().join("api_versions")),
                endpoint_store: EndpointStore::at(temp.path().join("endpoints")),
                profile: Profile::default(),
                transport: MockTransport::new(),
                _temp: temp,
            }
        }

        fn ctx<'a>(&'a self, raw_args: &'a [String]) -> ExtensionContext<'a> {
            ExtensionContext {
                catalog: &self.catalog,
                version: &self.version,
                version_store: &self.version_store,
                endpoint_store: &self.endpoint_store,
                profile: &self.profile,
                transport: &self.transport,
                secure: false,
                raw_args,
            }
        }
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn config_version_pins_installed_version() {
        let fixture = Fixture::new();
        let raw = args(&["ConfigVersion", "--version", "20131115"]);
        config_version("ecs", &fixture.ctx(&raw)).unwrap();

        assert_eq!(
            fixture.version_store.pinned("ecs").unwrap().as_str(),
            "20131115"
        );
    }

    #[test]
    fn config_version_rejects_unknown_version() {
        let fixture = Fixture::new();
        let raw = args(&["ConfigVersion", "--version", "19990101"]);
        let err = config_version("ecs", &fixture.ctx(&raw)).unwrap_err();
        assert!(err.to_string().contains("wrong version"));
        assert!(fixture.version_store.pinned("ecs").is_none());
    }

    #[test]
    fn config_version_requires_flag() {
        let fixture = Fixture::new();
        let raw = args(&["ConfigVersion"]);
        let err = config_version("ecs", &fixture.ctx(&raw)).unwrap_err();
        assert!(err.to_string().contains("--version"));
    }

    #[test]
    fn show_versions_runs_without_pin() {
        let fixture = Fixture::new();
        let raw = args(&["ShowVersions"]);
        show_versions("ecs", &fixture.ctx(&raw)).unwrap();
    }
}
