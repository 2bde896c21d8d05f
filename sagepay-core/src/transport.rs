//! The seam between request building and the network.

use url::Url;

/// A raw response received from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code of the response.
    pub status: u16,
    /// Response body, decoded as text.
    pub body: String,
}

/// Sends form-encoded bodies to the gateway.
///
/// An `Err` means no response was received at all. Any response that did
/// arrive, whatever its HTTP status, is returned as `Ok` so that its body
/// can be classified.
pub trait Transport {
    type Error: std::error::Error;

    fn post_form(
        &self,
        url: &Url,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, Self::Error>>;
}
