use sagepay_core::{
    outcome::{MessagePolicy, Outcome},
    transport::Transport,
    types::GatewayResponse,
};
use url::Url;

/// POST `body` to `url` and classify whatever comes back.
///
/// Transport errors become [`Outcome::TransportFailure`] and skip parsing.
pub(crate) async fn exchange<T: Transport>(
    transport: &T,
    url: &Url,
    body: String,
    policy: MessagePolicy,
) -> (Option<GatewayResponse>, Outcome) {
    let received = match transport.post_form(url, body).await {
        Ok(received) => received,
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Gateway request to '{}' failed: {err}", url);

            let mut message = err.to_string();
            if message.is_empty() {
                message = "The payment gateway could not be reached.".to_string();
            }
            return (None, Outcome::transport_failure(message));
        }
    };

    #[cfg(feature = "tracing")]
    tracing::debug!("Gateway responded: url='{}', http_status={}", url, received.status);

    let response = GatewayResponse::parse(&received.body);
    let outcome = Outcome::classify(&response, policy);

    #[cfg(feature = "tracing")]
    tracing::debug!("Gateway outcome: status='{}'", outcome.status());

    (Some(response), outcome)
}
