//! extension::endpoint_op
//!
//! The `ModifyEndpoint` meta-operation: persist an endpoint override
//! for a (service, region) pair. The transport consults the override
//! store on every dispatch, so the new host takes effect immediately.

use anyhow::{bail, Result};
use clap::Parser;

use super::ExtensionContext;

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct ModifyEndpointArgs {
    #[arg(long = "RegionId")]
    region_id: Option<String>,

    #[arg(long = "Endpoint")]
    endpoint: Option<String>,
}

/// Handle `<service> ModifyEndpoint --RegionId <r> --Endpoint <host>`.
pub fn modify_endpoint(service: &str, ctx: &ExtensionContext<'_>) -> Result<()> {
    let args = ModifyEndpointArgs::try_parse_from(ctx.raw_args)
        .map_err(|e| anyhow::anyhow!("invalid arguments: {}", e))?;

    let (Some(region), Some(endpoint)) = (args.region_id, args.endpoint) else {
        bail!("RegionId/Endpoint is absent: pass both --RegionId and --Endpoint");
    };

    ctx.endpoint_store.set(service, &region, &endpoint)?;
    println!("endpoint for {}.{} set to {}", service, region, endpoint);
    Ok(())
}
