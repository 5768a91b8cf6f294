//! extension
//!
//! Operations outside the generic catalog-driven path.
//!
//! # Architecture
//!
//! Three kinds of non-generic invocations exist:
//!
//! - **Meta commands**: top-level tokens handled before any catalog
//!   lookup (`help`, `version`, `configure` and their flag spellings).
//! - **Extension operations**: per-service operations with bespoke
//!   handlers - version pinning (`ConfigVersion`, `ShowVersions`), the
//!   endpoint override (`ModifyEndpoint`), and the import/export
//!   transfer flows. Matching is case-insensitive. Each handler parses
//!   its own raw argument vector; nothing here goes through the generic
//!   argument binder.
//! - **Bespoke command families**: self-contained processors (bulk
//!   object storage and archive tooling) that take the whole argument
//!   vector and run their own sub-dispatch. The router only knows their
//!   names and hands off.

pub mod configure;
pub mod endpoint_op;
pub mod transfer;
pub mod version_ops;

use anyhow::Result;

use crate::catalog::CatalogIndex;
use crate::dispatch::{EndpointStore, Transport};
use crate::profile::Profile;
use crate::version::{ApiVersion, VersionStore};

/// Top-level tokens handled before catalog dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Help,
    Version,
    Configure,
}

/// Recognize a meta command token.
pub fn meta_command(token: &str) -> Option<MetaCommand> {
    match token.to_ascii_lowercase().as_str() {
        "help" | "-h" | "--help" => Some(MetaCommand::Help),
        "version" | "--version" => Some(MetaCommand::Version),
        "configure" => Some(MetaCommand::Configure),
        _ => None,
    }
}

/// A self-contained command family the core hands off to.
pub trait BespokeCommand {
    /// The top-level command name this family owns.
    fn name(&self) -> &str;

    /// Run the family's own sub-dispatch over the raw argument vector
    /// (everything after the command name).
    fn run(&self, raw_args: &[String]) -> Result<()>;
}

/// Extension operations every service carries.
const COMMON_OPERATIONS: &[&str] = &["ConfigVersion", "ShowVersions", "ModifyEndpoint"];

/// Per-service transfer operations.
const SERVICE_OPERATIONS: &[(&str, &[&str])] = &[
    ("ecs", &["ExportInstance", "ImportInstance"]),
    ("rds", &["ExportDBInstance", "ImportDBInstance"]),
];

/// Everything an extension handler may need.
pub struct ExtensionContext<'a> {
    pub catalog: &'a CatalogIndex,
    pub version: &'a ApiVersion,
    pub version_store: &'a VersionStore,
    pub endpoint_store: &'a EndpointStore,
    pub profile: &'a Profile,
    pub transport: &'a dyn Transport,
    pub secure: bool,
    /// The argument vector starting at the operation token.
    pub raw_args: &'a [String],
}

/// Router over the non-generic operation registry.
#[derive(Default)]
pub struct ExtensionRouter {
    bespoke: Vec<Box<dyn BespokeCommand>>,
}

impl ExtensionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bespoke command family.
    pub fn with_bespoke(mut self, command: Box<dyn BespokeCommand>) -> Self {
        self.bespoke.push(command);
        self
    }

    /// Look up a bespoke family by its top-level name.
    pub fn bespoke(&self, token: &str) -> Option<&dyn BespokeCommand> {
        self.bespoke
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(token))
            .map(Box::as_ref)
    }

    /// The extension operation names available on a service.
    pub fn operations_for(&self, service: &str) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = COMMON_OPERATIONS.to_vec();
        for (name, operations) in SERVICE_OPERATIONS {
            if name.eq_ignore_ascii_case(service) {
                out.extend_from_slice(operations);
            }
        }
        out
    }

    /// Whether (service, operation) names an extension operation.
    pub fn is_extension(&self, service: &str, operation: &str) -> bool {
        self.operations_for(service)
            .iter()
            .any(|op| op.eq_ignore_ascii_case(operation))
    }

    /// Dispatch an extension operation to its handler.
    pub fn dispatch(
        &self,
        service: &str,
        operation: &str,
        ctx: &ExtensionContext<'_>,
    ) -> Result<()> {
        match operation.to_ascii_lowercase().as_str() {
            "configversion" => version_ops::config_version(service, ctx),
            "showversions" => version_ops::show_versions(service, ctx),
            "modifyendpoint" => endpoint_op::modify_endpoint(service, ctx),
            "exportinstance" | "exportdbinstance" => transfer::export(service, ctx),
            "importinstance" | "importdbinstance" => transfer::import(service, ctx),
            other => anyhow::bail!("no extension handler for '{} {}'", service, other),
        }
    }

    /// Option names for an extension operation's parameter help.
    pub fn operation_options(&self, operation: &str) -> Vec<&'static str> {
        match operation.to_ascii_lowercase().as_str() {
            "configversion" => vec!["version"],
            "showversions" => vec![],
            "modifyendpoint" => vec!["RegionId", "Endpoint"],
            "exportinstance" => vec!["InstanceId", "filename"],
            "exportdbinstance" => vec!["DBInstanceId", "filename"],
            "importinstance" | "importdbinstance" => vec!["filename", "count"],
            _ => vec![],
        }
    }
}
