//! dispatch::transport
//!
//! The wire layer: request signing and the HTTP transport collaborator.
//!
//! # Design
//!
//! The dispatcher hands a fully signed request to the [`Transport`]
//! trait and gets back a raw response body. The retry budget lives
//! here, not in the dispatcher: network failures and server errors are
//! retried up to [`RETRY_BUDGET`] attempts, client-side rejections
//! (4xx) are not. Exhausting the budget is a normal error outcome, not
//! a panic.
//!
//! # Signing
//!
//! Requests are RPC-style GETs: every parameter (operation fields plus
//! the common identity/version parameters) travels in the query string,
//! authenticated by an HMAC-SHA256 signature over the sorted parameter
//! list, keyed by the access key secret. The signature rides along as
//! the `Signature` parameter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::profile::Credentials;
use crate::version::ApiVersion;

/// Total attempts the transport makes for retryable failures.
pub const RETRY_BUDGET: u32 = 3;

/// Client-identifying string sent with every request.
pub const CLIENT_ID: &str = concat!("cirrus-cli/", env!("CARGO_PKG_VERSION"));

/// Errors from the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The service rejected the request as malformed (4xx). Not retried.
    #[error("request rejected by service: {status} {message}")]
    Client { status: u16, message: String },

    /// The service failed (5xx) on every attempt.
    #[error("service failure: {status} {message}")]
    Server { status: u16, message: String },

    /// No attempt produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
}

/// A request ready for the wire: resolved host plus signed parameters.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Host to dispatch to (no scheme).
    pub endpoint: String,
    /// Force HTTPS.
    pub secure: bool,
    /// Query parameters, signature included.
    pub params: BTreeMap<String, String>,
}

impl SignedRequest {
    /// The request URL without query parameters.
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}/", scheme, self.endpoint)
    }
}

/// The unsigned description of one call.
#[derive(Debug, Clone)]
pub struct RequestTemplate<'a> {
    pub service: &'a str,
    pub action: &'a str,
    pub version: &'a ApiVersion,
    pub params: BTreeMap<String, String>,
}

/// Sign a request with fresh timestamp and nonce.
pub fn sign(
    template: &RequestTemplate<'_>,
    credentials: &Credentials,
    endpoint: String,
    secure: bool,
) -> SignedRequest {
    let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let nonce = Uuid::new_v4().to_string();
    sign_at(template, credentials, endpoint, secure, &timestamp, &nonce)
}

/// Sign with an explicit timestamp and nonce (deterministic, for tests).
pub fn sign_at(
    template: &RequestTemplate<'_>,
    credentials: &Credentials,
    endpoint: String,
    secure: bool,
    timestamp: &str,
    nonce: &str,
) -> SignedRequest {
    let mut params = template.params.clone();
    params.insert("Action".into(), template.action.to_string());
    params.insert("Version".into(), template.version.as_str().to_string());
    params.insert("Format".into(), "JSON".into());
    params.insert("AccessKeyId".into(), credentials.access_key_id.clone());
    params.insert("SignatureMethod".into(), "HMAC-SHA256".into());
    params.insert("SignatureVersion".into(), "1.0".into());
    params.insert("SignatureNonce".into(), nonce.to_string());
    params.insert("Timestamp".into(), timestamp.to_string());

    // BTreeMap iteration is already the canonical (sorted) order.
    let canonical = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let signature = hex::encode(hmac_sha256(
        credentials.access_key_secret.as_bytes(),
        canonical.as_bytes(),
    ));
    params.insert("Signature".into(), signature);

    SignedRequest {
        endpoint,
        secure,
        params,
    }
}

/// Two-pass HMAC-SHA256 construction over the sha2 digest.
fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    const BLOCK: usize = 64;
    let mut key_block = [0u8; BLOCK];
    if key.len() > BLOCK {
        key_block[..32].copy_from_slice(&Sha256::digest(key));
    } else {
        key_block[..key.len()].copy_from_slice(key);
    }
    let mut ipad = [0u8; BLOCK];
    let mut opad = [0u8; BLOCK];
    for i in 0..BLOCK {
        ipad[i] = key_block[i] ^ 0x36;
        opad[i] = key_block[i] ^ 0x5c;
    }
    let inner = Sha256::new()
        .chain_update(ipad)
        .chain_update(message)
        .finalize();
    Sha256::new()
        .chain_update(opad)
        .chain_update(inner)
        .finalize()
        .into()
}

/// Black-box executor of signed requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a signed request and return the raw response body.
    async fn execute(&self, request: &SignedRequest) -> Result<String, TransportError>;
}

/// The production HTTP transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(CLIENT_ID)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &SignedRequest) -> Result<String, TransportError> {
        let mut last_error = TransportError::Network("no attempt made".into());

        for _ in 0..RETRY_BUDGET {
            let response = self
                .client
                .get(request.base_url())
                .query(&request.params)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = TransportError::Network(e.to_string());
                    continue;
                }
            };

            let status = response.status();
            if status.is_client_error() {
                let message = response.text().await.unwrap_or_default();
                return Err(TransportError::Client {
                    status: status.as_u16(),
                    message,
                });
            }
            if status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                last_error = TransportError::Server {
                    status: status.as_u16(),
                    message,
                };
                continue;
            }

            return response
                .text()
                .await
                .map_err(|e| TransportError::Network(e.to_string()));
        }

        Err(last_error)
    }
}
