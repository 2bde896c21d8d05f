use http::{HeaderMap, HeaderName, HeaderValue, header::CONTENT_TYPE};
use sagepay_core::{
    config::{MerchantConfig, Timeouts},
    transport::{Transport, TransportResponse},
};
use url::Url;

/// A [`Transport`] that talks to the gateway over HTTPS with `reqwest`.
///
/// Certificates are always verified. The client applies the configured
/// [`Timeouts`]: the network timeout bounds connection set-up and the
/// execution ceiling bounds the whole request.
///
/// ```no_run
/// use sagepay_kit::gateway_client::GatewayClient;
///
/// let client = GatewayClient::new().expect("TLS backend available");
/// ```
#[derive(Debug, Clone)]
pub struct GatewayClient {
    pub client: reqwest::Client,
    pub headers: HeaderMap,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayClientError {
    #[error("HTTP request error: {0}")]
    HttpRequestError(#[from] reqwest::Error),
}

impl GatewayClient {
    /// A client with the default timeouts.
    pub fn new() -> Result<Self, GatewayClientError> {
        GatewayClient::with_timeouts(Timeouts::default())
    }

    pub fn with_timeouts(timeouts: Timeouts) -> Result<Self, GatewayClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeouts.network)
            .timeout(timeouts.execution)
            .build()?;

        Ok(GatewayClient::from_client(client))
    }

    pub fn from_config(config: &MerchantConfig) -> Result<Self, GatewayClientError> {
        GatewayClient::with_timeouts(config.timeouts)
    }

    /// Wrap an existing client, e.g. one sharing a connection pool.
    pub fn from_client(client: reqwest::Client) -> Self {
        GatewayClient {
            client,
            headers: HeaderMap::new(),
        }
    }

    /// Send an extra header with every request.
    pub fn header(mut self, key: &HeaderName, value: &HeaderValue) -> Self {
        self.headers.insert(key, value.to_owned());
        self
    }
}

impl Transport for GatewayClient {
    type Error = GatewayClientError;

    async fn post_form(&self, url: &Url, body: String) -> Result<TransportResponse, Self::Error> {
        let response = self
            .client
            .post(url.clone())
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_extra_headers() {
        let client = GatewayClient::new()
            .unwrap()
            .header(
                &http::header::USER_AGENT,
                &HeaderValue::from_static("teashop-checkout/1.0"),
            );

        assert_eq!(
            client.headers.get(http::header::USER_AGENT).unwrap(),
            "teashop-checkout/1.0"
        );
    }

    #[test]
    fn test_build_with_timeouts() {
        let timeouts = Timeouts::builder()
            .network(Duration::from_secs(5))
            .execution(Duration::from_secs(10))
            .build();

        assert!(GatewayClient::with_timeouts(timeouts).is_ok());
    }
}
