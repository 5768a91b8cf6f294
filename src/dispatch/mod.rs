//! dispatch
//!
//! Drives a bound request through the transport and classifies the
//! outcome.
//!
//! # Pipeline
//!
//! 1. Validate the dispatch context: access key id, access key secret,
//!    and a region when the schema declares the region field. Missing
//!    context fails fast with an actionable message - the transport is
//!    never invoked.
//! 2. Sign the request and hand it to the transport collaborator. The
//!    retry budget is the transport's, not ours.
//! 3. Decode the response body as JSON.
//! 4. Classify: a provider `Code` key means an error outcome carrying
//!    code and message; anything else is a success carrying the full
//!    decoded payload.
//! 5. Post-process: prune the documented noisy fields for operations on
//!    the prune table, then fire the best-effort diagnostic ping.
//!
//! A provider error outcome is data for the renderer, not a process
//! failure; transport and validation errors propagate to the top-level
//! handler, the only place allowed to terminate the process.

pub mod endpoint;
pub mod mock;
pub mod telemetry;
pub mod transport;

pub use endpoint::EndpointStore;
pub use transport::{HttpTransport, RequestTemplate, SignedRequest, Transport, TransportError};

use serde_json::Value;
use thiserror::Error;

use crate::profile::Credentials;
use crate::schema::{RequestSchema, REGION_FIELD};

/// Key the provider sets on error payloads.
const ERROR_CODE_KEY: &str = "Code";
/// Key carrying the provider's error detail.
const ERROR_MESSAGE_KEY: &str = "Message";
/// Key carrying the provider request id (echoed by telemetry).
const REQUEST_ID_KEY: &str = "RequestId";

/// Noisy fields stripped from success payloads, per operation.
const PRUNE_TABLE: &[(&str, &str, &[&str])] = &[(
    "ecs",
    "DescribeInstanceAttribute",
    &["Status", "OperationLocks"],
)];

/// Errors that abort a dispatch before or during the exchange.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(
        "access key id/secret is absent; run 'cirrus configure' or pass --AccessKeyId/--AccessKeySecret"
    )]
    MissingCredentials,

    #[error("'{operation}' needs a region; pass --RegionId or set one with 'cirrus configure'")]
    MissingRegion { operation: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode service response: {0}")]
    Decode(String),
}

/// The classified outcome of a dispatched call.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    /// Decoded success payload, pruned.
    Success(Value),
    /// Provider-reported logical error.
    ProviderError { code: String, message: String },
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchResult::Success(_))
    }
}

/// Per-invocation context the dispatcher needs besides the schema.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Resolved identity: flag overrides already applied over the profile.
    pub credentials: Option<Credentials>,
    /// `--Endpoint` override for this invocation.
    pub endpoint_override: Option<String>,
    /// Force HTTPS.
    pub secure: bool,
    /// Whether to fire the diagnostic ping.
    pub telemetry: bool,
}

/// Executes bound requests against a transport.
pub struct Dispatcher<'a> {
    transport: &'a dyn Transport,
    endpoints: &'a EndpointStore,
}

impl<'a> Dispatcher<'a> {
    pub fn new(transport: &'a dyn Transport, endpoints: &'a EndpointStore) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Dispatch a bound schema and classify the outcome.
    pub async fn execute(
        &self,
        schema: &dyn RequestSchema,
        ctx: &CallContext,
    ) -> Result<DispatchResult, DispatchError> {
        let credentials = ctx
            .credentials
            .as_ref()
            .ok_or(DispatchError::MissingCredentials)?;

        if schema.has_field(REGION_FIELD) && schema.field_value(REGION_FIELD).is_none() {
            return Err(DispatchError::MissingRegion {
                operation: schema.operation().to_string(),
            });
        }
        let region = schema.field_value(REGION_FIELD);

        let host = endpoint::resolve(
            schema.service(),
            region,
            ctx.endpoint_override.as_deref(),
            self.endpoints,
        );
        let template = RequestTemplate {
            service: schema.service(),
            action: schema.operation(),
            version: schema.version(),
            params: schema.wire_params(),
        };
        let signed = transport::sign(&template, credentials, host, ctx.secure);

        let body = self.transport.execute(&signed).await?;
        let payload: Value =
            serde_json::from_str(&body).map_err(|e| DispatchError::Decode(e.to_string()))?;

        let result = classify(payload, schema.service(), schema.operation());

        if ctx.telemetry {
            let request_id = match &result {
                DispatchResult::Success(value) => value
                    .get(REQUEST_ID_KEY)
                    .and_then(Value::as_str)
                    .map(str::to_string),
                DispatchResult::ProviderError { .. } => None,
            };
            telemetry::fire(request_id);
        }

        Ok(result)
    }
}

/// Classify a decoded payload and apply the prune table.
fn classify(mut payload: Value, service: &str, operation: &str) -> DispatchResult {
    if let Some(code) = payload.get(ERROR_CODE_KEY) {
        let code = code.as_str().unwrap_or_default().to_string();
        let message = payload
            .get(ERROR_MESSAGE_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return DispatchResult::ProviderError { code, message };
    }

    if let Some(object) = payload.as_object_mut() {
        for (svc, op, fields) in PRUNE_TABLE {
            if svc.eq_ignore_ascii_case(service) && op.eq_ignore_ascii_case(operation) {
                for field in *fields {
                    object.remove(*field);
                }
            }
        }
    }
    DispatchResult::Success(payload)
}
