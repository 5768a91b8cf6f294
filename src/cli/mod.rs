//! cli
//!
//! Command-line entry point and top-level control flow.
//!
//! # Responsibilities
//!
//! - Tokenize argv and extract the cross-cutting flags
//! - Route meta commands and bespoke families before catalog dispatch
//! - Walk one invocation through service check, version selection,
//!   operation lookup (generic, then extension), bind, dispatch, render
//!
//! # Error boundaries
//!
//! Catalog and resolution misses are absorbed into help text here and
//! the process exits cleanly. Validation failures (missing credentials
//! or region, an explicit version the catalog does not carry) and
//! transport failures propagate to `main`, the only place that
//! terminates the process.

pub mod help;
pub mod parser;

use anyhow::Result;
use serde_json::json;

use crate::binder;
use crate::catalog::CatalogIndex;
use crate::dispatch::{CallContext, Dispatcher, DispatchResult, EndpointStore, HttpTransport};
use crate::extension::{self, ExtensionContext, ExtensionRouter, MetaCommand};
use crate::profile::{Credentials, Profile};
use crate::schema::SchemaResolver;
use crate::ui::{self, OutputFormat};
use crate::version::{VersionSelector, VersionStore};

use parser::GlobalFlags;

/// Run the CLI application. This is the entry point called from `main`.
pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    run_with_args(&args, &ExtensionRouter::new())
}

/// Run one invocation against an explicit router (tests register fake
/// bespoke families through it).
pub fn run_with_args(args: &[String], router: &ExtensionRouter) -> Result<()> {
    let invocation = parser::parse(args);
    let catalog = CatalogIndex::builtin();

    let Some(service_token) = invocation.service.clone() else {
        help::show_cli_help(&catalog);
        return Ok(());
    };

    if let Some(meta) = extension::meta_command(&service_token) {
        match meta {
            MetaCommand::Help => help::show_cli_help(&catalog),
            MetaCommand::Version => println!("{}", env!("CARGO_PKG_VERSION")),
            MetaCommand::Configure => extension::configure::run(args)?,
        }
        return Ok(());
    }

    if let Some(command) = router.bespoke(&service_token) {
        return command.run(&invocation.raw_operation_args);
    }

    let mut map = invocation.map.clone();
    let flags = GlobalFlags::take_from(&mut map);
    let profile = Profile::load(flags.profile.as_deref())?;
    let format = OutputFormat::resolve(flags.output.as_deref(), profile.output.as_deref())?;

    let Some(service) = catalog.resolve_service(&service_token).map(str::to_string) else {
        help::show_service_error(&service_token, &catalog);
        return Ok(());
    };

    let version_store = VersionStore::open()?;
    let selector = VersionSelector::new(&catalog, &version_store);
    let version = selector.select(&service, flags.version.as_deref())?;

    let Some(operation) = invocation.operation.clone() else {
        help::show_operation_error(&service, None, &version, &catalog, router);
        return Ok(());
    };

    let endpoint_store = EndpointStore::open()?;
    let transport = HttpTransport::new();

    if catalog.operation_spec(&service, &operation, &version).is_some() {
        let resolver = SchemaResolver::new(&catalog);
        let Some(mut schema) = resolver.resolve(&service, &operation, &version) else {
            // Listed but not instantiable: same guidance as a miss.
            help::show_operation_error(&service, Some(&operation), &version, &catalog, router);
            return Ok(());
        };

        if invocation.wants_parameter_help {
            help::show_parameter_help(&service, schema.operation(), schema.fields());
            return Ok(());
        }

        let report = binder::bind(schema.as_mut(), &map, &profile);
        for warning in report.warnings() {
            ui::warn(warning);
        }

        let credentials = resolve_credentials(&flags, &profile);
        let ctx = CallContext {
            credentials,
            endpoint_override: flags.endpoint.clone(),
            secure: flags.secure,
            telemetry: !profile.ignore_telemetry,
        };
        let dispatcher = Dispatcher::new(&transport, &endpoint_store);
        let runtime = tokio::runtime::Runtime::new()?;
        let result = runtime.block_on(dispatcher.execute(schema.as_ref(), &ctx))?;

        match result {
            DispatchResult::Success(payload) => {
                println!("{}", ui::render(&operation, &payload, format));
            }
            DispatchResult::ProviderError { code, message } => {
                // Provider errors are results, not crashes; they render
                // as json regardless of the requested format.
                let payload = json!({ "Code": code, "Message": message });
                println!("{}", ui::render("error", &payload, OutputFormat::Json));
            }
        }
        return Ok(());
    }

    if router.is_extension(&service, &operation) {
        if invocation.wants_parameter_help {
            help::show_extension_parameter_help(
                &service,
                &operation,
                &router.operation_options(&operation),
            );
            return Ok(());
        }
        let extension_args = strip_global_flags(&invocation.raw_operation_args);
        let ctx = ExtensionContext {
            catalog: &catalog,
            version: &version,
            version_store: &version_store,
            endpoint_store: &endpoint_store,
            profile: &profile,
            transport: &transport,
            secure: flags.secure,
            raw_args: &extension_args,
        };
        return router.dispatch(&service, &operation, &ctx);
    }

    help::show_operation_error(&service, Some(&operation), &version, &catalog, router);
    Ok(())
}

/// Identity precedence: explicit flags over the profile.
fn resolve_credentials(flags: &GlobalFlags, profile: &Profile) -> Option<Credentials> {
    match (&flags.access_key_id, &flags.access_key_secret) {
        (Some(id), Some(secret)) => Some(Credentials {
            access_key_id: id.clone(),
            access_key_secret: secret.clone(),
        }),
        _ => profile.credentials(),
    }
}

/// Flags the core already consumed; extension handlers must not see
/// them. `--version` stays (the pin operation parses it itself) and so
/// does `--Endpoint` (it is the endpoint override's operand).
const STRIPPED_VALUE_FLAGS: &[&str] = &[
    "--profile",
    "--output",
    "--AccessKeyId",
    "--AccessKeySecret",
];

fn strip_global_flags(raw: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(raw.len());
    let mut index = 0;
    while index < raw.len() {
        let token = &raw[index];
        if token == "--secure" {
            index += 1;
            continue;
        }
        if STRIPPED_VALUE_FLAGS.contains(&token.as_str()) {
            index += 1;
            if index < raw.len() && !raw[index].starts_with("--") {
                index += 1;
            }
            continue;
        }
        out.push(token.clone());
        index += 1;
    }
    out
}
