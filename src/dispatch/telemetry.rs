//! dispatch::telemetry
//!
//! Best-effort diagnostic ping.
//!
//! After a dispatch completes, a small JSON payload carrying the
//! provider request id is posted to the diagnostics endpoint. The ping
//! is fire-and-forget: it is spawned onto the runtime, never joined,
//! and every failure path is swallowed. Setting `ignore=yes` in the
//! profile config suppresses it entirely (the caller checks that).

use std::time::Duration;

use uuid::Uuid;

use super::transport::CLIENT_ID;

/// Diagnostics collection endpoint.
const DIAGNOSTIC_URL: &str = "https://diag.cirrusapi.com/ping";

/// Upper bound on how long a ping may linger.
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Spawn the ping. Must be called from within a tokio runtime.
pub fn fire(request_id: Option<String>) {
    let payload = serde_json::json!({
        "client": CLIENT_ID,
        "invocation": Uuid::new_v4().to_string(),
        "request_id": request_id,
    });
    tokio::spawn(async move {
        let Ok(client) = reqwest::Client::builder().timeout(PING_TIMEOUT).build() else {
            return;
        };
        let _ = client.post(DIAGNOSTIC_URL).json(&payload).send().await;
    });
}
