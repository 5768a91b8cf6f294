//! cli::help
//!
//! Usage and guidance text.
//!
//! Catalog misses are absorbed here: an unknown service or operation
//! prints the sorted list of what is actually available and the process
//! exits cleanly. Listings use a two-column layout.

use std::collections::BTreeSet;

use crate::catalog::CatalogIndex;
use crate::extension::ExtensionRouter;
use crate::schema::FieldDescriptor;
use crate::version::ApiVersion;

/// Cross-cutting options shown in every parameter listing.
const MAIN_OPTIONS: &[&str] = &[
    "output",
    "profile",
    "secure",
    "version",
    "AccessKeyId",
    "AccessKeySecret",
    "Endpoint",
];

pub fn show_usage() {
    println!("usage: cirrus <service> <operation> [options and parameters]");
}

/// The overall help page (`cirrus help`).
pub fn show_cli_help(catalog: &CatalogIndex) {
    println!("CIRRUS()");
    println!("\nNAME");
    println!("\tcirrus -");
    println!("\nDESCRIPTION");
    println!("\tThe Cirrus Command Line Interface is a unified tool to manage your cloud services.");
    println!("\nSYNOPSIS");
    println!("\tcirrus <service> <operation> [options and parameters]");
    println!("\nOPTIONS");
    println!("\tconfigure");
    println!("\n\tSave your access key pair, default region and favorite output format.");
    println!("\n\t--output (string)");
    println!("\n\tThe formatting style for command output: json, text or table.");
    println!("\n\t--profile (string)");
    println!("\n\tUse a named profile instead of [default].");
    println!("\n\t--secure");
    println!("\n\tForce HTTPS for this invocation.");
    println!("\nAVAILABLE SERVICES");
    for service in catalog.services() {
        println!("\n\to {}", service);
    }
}

/// Unknown service: usage plus the valid service list.
pub fn show_service_error(token: &str, catalog: &CatalogIndex) {
    show_usage();
    println!("'{}' is not a valid command. The valid commands are:\n", token);
    print!("{}", two_columns(catalog.services().iter().map(String::as_str)));
}

/// Unknown operation: usage plus the valid operation list (generic and
/// extension) at the selected version.
pub fn show_operation_error(
    service: &str,
    token: Option<&str>,
    version: &ApiVersion,
    catalog: &CatalogIndex,
    router: &ExtensionRouter,
) {
    show_usage();
    if let Some(token) = token {
        println!(
            "[{}] has no operation '{}'. The valid operations are:\n",
            service, token
        );
    } else {
        println!("[{}] valid operations as follows:\n", service);
    }

    let mut operations: BTreeSet<String> = catalog.operations(service, version);
    operations.extend(router.operations_for(service).iter().map(|s| s.to_string()));
    print!("{}", two_columns(operations.iter().map(String::as_str)));
}

/// Parameter help for a generic operation (`<service> <op> help`).
pub fn show_parameter_help(service: &str, operation: &str, fields: &[FieldDescriptor]) {
    show_usage();
    println!(
        "[{}.{}]: the operation accepts these parameters:\n",
        service, operation
    );
    let names: Vec<String> = MAIN_OPTIONS
        .iter()
        .map(|o| format!("--{}", o))
        .chain(fields.iter().map(|f| {
            if f.required {
                format!("--{} (required)", f.name)
            } else {
                format!("--{}", f.name)
            }
        }))
        .collect();
    print!("{}", two_columns(names.iter().map(String::as_str)));
}

/// Parameter help for an extension operation.
pub fn show_extension_parameter_help(service: &str, operation: &str, options: &[&str]) {
    show_usage();
    println!(
        "[{}.{}]: the operation accepts these parameters:\n",
        service, operation
    );
    let names: Vec<String> = MAIN_OPTIONS
        .iter()
        .chain(options.iter())
        .map(|o| format!("--{}", o))
        .collect();
    print!("{}", two_columns(names.iter().map(String::as_str)));
}

/// Sorted two-column listing.
fn two_columns<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let mut sorted: Vec<&str> = items.collect();
    sorted.sort_unstable();

    let mut out = String::new();
    for pair in sorted.chunks(2) {
        match pair {
            [left, right] => out.push_str(&format!("{:<40}\t|{}\n", left, right)),
            [last] => out.push_str(&format!("{}\n", last)),
            _ => {}
        }
    }
    out
}
