//! extension::transfer
//!
//! Bespoke import/export flows.
//!
//! These operations drive the generic dispatcher in a loop instead of
//! making a single call:
//!
//! - **Export** describes each named resource and writes the collected
//!   attribute payloads to a JSON descriptor file.
//! - **Import** reads a descriptor file and creates one resource per
//!   entry (times `--count`), binding only the fields the create schema
//!   declares - unknown descriptor keys drop the same way unknown flags
//!   do.
//!
//! Per-resource failures are reported and skipped; the flow finishes
//! the rest of the batch.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;

use crate::binder;
use crate::cli::parser::KeyValueMap;
use crate::dispatch::{CallContext, Dispatcher, DispatchResult};
use crate::schema::SchemaResolver;
use crate::ui;

use super::ExtensionContext;

/// Per-service wiring of the transfer flows onto catalog operations.
struct TransferSpec {
    id_field: &'static str,
    describe_operation: &'static str,
    create_operation: &'static str,
}

fn spec_for(service: &str) -> Result<TransferSpec> {
    match service.to_ascii_lowercase().as_str() {
        "ecs" => Ok(TransferSpec {
            id_field: "InstanceId",
            describe_operation: "DescribeInstanceAttribute",
            create_operation: "CreateInstance",
        }),
        "rds" => Ok(TransferSpec {
            id_field: "DBInstanceId",
            describe_operation: "DescribeDBInstanceAttribute",
            create_operation: "CreateDBInstance",
        }),
        other => bail!("no transfer flow for service '{}'", other),
    }
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct ExportArgs {
    /// Resource ids to export (repeatable). Flag name differs per
    /// service, so both spellings are accepted.
    #[arg(long = "InstanceId")]
    instance_ids: Vec<String>,

    #[arg(long = "DBInstanceId")]
    db_instance_ids: Vec<String>,

    #[arg(long)]
    filename: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct ImportArgs {
    #[arg(long)]
    filename: Option<PathBuf>,

    #[arg(long)]
    count: Option<u32>,
}

/// Handle `ecs ExportInstance` / `rds ExportDBInstance`.
pub fn export(service: &str, ctx: &ExtensionContext<'_>) -> Result<()> {
    let spec = spec_for(service)?;
    let args = ExportArgs::try_parse_from(ctx.raw_args)
        .map_err(|e| anyhow::anyhow!("invalid arguments: {}", e))?;

    let ids: Vec<String> = args
        .instance_ids
        .into_iter()
        .chain(args.db_instance_ids)
        .collect();
    if ids.is_empty() {
        bail!("nothing to export: pass at least one --{}", spec.id_field);
    }
    let Some(filename) = args.filename else {
        bail!("an argument is needed: pass --filename for the export file");
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let resolver = SchemaResolver::new(ctx.catalog);
    let dispatcher = Dispatcher::new(ctx.transport, ctx.endpoint_store);
    let call_ctx = call_context(ctx);

    let mut exported = Vec::new();
    for id in &ids {
        let Some(mut schema) = resolver.resolve(service, spec.describe_operation, ctx.version)
        else {
            bail!(
                "'{}' is unavailable at version {}",
                spec.describe_operation,
                ctx.version
            );
        };

        let mut input = KeyValueMap::default();
        input.insert(spec.id_field, vec![id.clone()]);
        binder::bind(schema.as_mut(), &input, ctx.profile);

        match runtime.block_on(dispatcher.execute(schema.as_ref(), &call_ctx))? {
            DispatchResult::Success(payload) => exported.push(payload),
            DispatchResult::ProviderError { code, message } => {
                ui::warn(format!("skipping {}: {} {}", id, code, message));
            }
        }
    }

    let text = serde_json::to_string_pretty(&Value::Array(exported.clone()))?;
    fs::write(&filename, text)
        .with_context(|| format!("failed to write '{}'", filename.display()))?;
    println!(
        "exported {} of {} to {}",
        exported.len(),
        ids.len(),
        filename.display()
    );
    Ok(())
}

/// Handle `ecs ImportInstance` / `rds ImportDBInstance`.
pub fn import(service: &str, ctx: &ExtensionContext<'_>) -> Result<()> {
    let spec = spec_for(service)?;
    let args = ImportArgs::try_parse_from(ctx.raw_args)
        .map_err(|e| anyhow::anyhow!("invalid arguments: {}", e))?;

    let Some(filename) = args.filename else {
        bail!("an argument is needed: pass --filename for the descriptor file");
    };
    let count = args.count.unwrap_or(1);

    let text = fs::read_to_string(&filename)
        .with_context(|| format!("failed to read '{}'", filename.display()))?;
    let descriptor: Value = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not valid JSON", filename.display()))?;
    let entries: Vec<Value> = match descriptor {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => bail!("'{}' must hold an object or an array", filename.display()),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let resolver = SchemaResolver::new(ctx.catalog);
    let dispatcher = Dispatcher::new(ctx.transport, ctx.endpoint_store);
    let call_ctx = call_context(ctx);

    let mut created = 0usize;
    for entry in &entries {
        let Some(object) = entry.as_object() else {
            ui::warn("skipping non-object descriptor entry");
            continue;
        };

        let mut input = KeyValueMap::default();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            input.insert(key, vec![text]);
        }

        for _ in 0..count {
            let Some(mut schema) = resolver.resolve(service, spec.create_operation, ctx.version)
            else {
                bail!(
                    "'{}' is unavailable at version {}",
                    spec.create_operation,
                    ctx.version
                );
            };
            binder::bind(schema.as_mut(), &input, ctx.profile);

            match runtime.block_on(dispatcher.execute(schema.as_ref(), &call_ctx))? {
                DispatchResult::Success(_) => created += 1,
                DispatchResult::ProviderError { code, message } => {
                    ui::warn(format!("create failed: {} {}", code, message));
                }
            }
        }
    }

    println!("created {} resource(s) from {}", created, filename.display());
    Ok(())
}

fn call_context(ctx: &ExtensionContext<'_>) -> CallContext {
    CallContext {
        credentials: ctx.profile.credentials(),
        endpoint_override: None,
        secure: ctx.secure,
        telemetry: !ctx.profile.ignore_telemetry,
    }
}
