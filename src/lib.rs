//! Cirrus - a CLI for a versioned cloud OpenAPI surface
//!
//! Cirrus maps `cirrus <service> <operation> [--Flag value ...]`
//! invocations onto a cloud provider's RPC-over-REST API. Which
//! services, versions and operations exist is data, not code: a catalog
//! manifest embedded at build time drives resolution at runtime.
//!
//! # Architecture
//!
//! One invocation flows through the layers in order:
//!
//! - [`cli`] - tokenizes argv, owns the top-level control flow
//! - [`catalog`] - the installed service/version/operation registry
//! - [`version`] - version tokens and the selection precedence policy
//! - [`schema`] - request schemas resolved from the catalog
//! - [`binder`] - fills a schema from parsed flag input
//! - [`dispatch`] - signs, executes, classifies and post-processes
//! - [`extension`] - meta commands and bespoke operation families
//! - [`profile`] - credential/region/output profiles
//! - [`ui`] - json/text/table rendering
//!
//! # Correctness invariants
//!
//! 1. An explicitly requested version is validated against the catalog
//!    before anything is dispatched; an unknown version fails closed.
//! 2. The transport is never invoked without credentials and, when the
//!    schema declares a region field, a region.
//! 3. Catalog misses are guidance, not process failures.
//! 4. Best-effort side channels (the diagnostic ping) can never change
//!    an invocation's outcome.

pub mod binder;
pub mod catalog;
pub mod cli;
pub mod dispatch;
pub mod extension;
pub mod paths;
pub mod profile;
pub mod schema;
pub mod ui;
pub mod version;
