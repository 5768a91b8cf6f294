//! dispatch::mock
//!
//! Scripted transport for tests.
//!
//! The mock records every signed request it receives and plays back a
//! queue of canned outcomes. An empty queue answers with an empty JSON
//! object.

use std::sync::Mutex;

use async_trait::async_trait;

use super::transport::{SignedRequest, Transport, TransportError};

/// One canned response.
pub type CannedResult = Result<String, TransportError>;

/// In-memory transport that records requests and replays responses.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<Vec<CannedResult>>,
    requests: Mutex<Vec<SignedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn respond_with(self, body: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(body.into()));
        self
    }

    /// Queue a transport failure.
    pub fn fail_with(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push(Err(error));
        self
    }

    /// Requests executed so far, in order.
    pub fn requests(&self) -> Vec<SignedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests executed.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &SignedRequest) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("{}".to_string())
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn request() -> SignedRequest {
        SignedRequest {
            endpoint: "ecs.cirrusapi.com".into(),
            secure: true,
            params: BTreeMap::new(),
        }
    }

    #[test]
    fn replays_in_order() {
        let mock = MockTransport::new()
            .respond_with(r#"{"A":1}"#)
            .respond_with(r#"{"B":2}"#);

        assert_eq!(
            tokio_test::block_on(mock.execute(&request())).unwrap(),
            r#"{"A":1}"#
        );
        assert_eq!(
            tokio_test::block_on(mock.execute(&request())).unwrap(),
            r#"{"B":2}"#
        );
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn empty_queue_answers_empty_object() {
        let mock = MockTransport::new();
        assert_eq!(tokio_test::block_on(mock.execute(&request())).unwrap(), "{}");
    }

    #[test]
    fn records_requests() {
        let mock = MockTransport::new();
        tokio_test::block_on(mock.execute(&request())).unwrap();
        assert_eq!(mock.requests()[0].endpoint, "ecs.cirrusapi.com");
    }
}
