//! In-memory transport for unit tests.

use std::sync::Mutex;

use sagepay_core::transport::{Transport, TransportResponse};
use url::Url;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// Replies to every request with the same canned result and records what was sent.
pub struct MockTransport {
    reply: Result<TransportResponse, MockError>,
    requests: Mutex<Vec<(Url, String)>>,
}

impl MockTransport {
    pub fn responding(body: &str) -> Self {
        MockTransport {
            reply: Ok(TransportResponse {
                status: 200,
                body: body.to_string(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        MockTransport {
            reply: Err(MockError(message.to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Url, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    type Error = MockError;

    async fn post_form(&self, url: &Url, body: String) -> Result<TransportResponse, Self::Error> {
        self.requests.lock().unwrap().push((url.clone(), body));
        self.reply.clone()
    }
}
