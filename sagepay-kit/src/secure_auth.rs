//! 3-D Secure completion.
//!
//! After a registration answered `3DAUTH`, the cardholder is sent to their
//! bank's ACS with the `PAReq` and `MD` tokens. The bank posts back a `PARes`,
//! which is forwarded to the gateway together with the original tokens by a
//! [`SecureAuthCompletion`].

use sagepay_core::{
    environment::{Environment, Service},
    errors::Result,
    outcome::{MessagePolicy, Outcome, OutcomeStatus, ThreeDSecureChallenge},
    transport::Transport,
    types::{Fields, GatewayResponse, keys},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::exchange::exchange;

/// Completion of a 3-D Secure challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureAuthCompletion {
    /// Merchant data token from the `3DAUTH` response.
    pub md: String,
    /// Authentication request from the `3DAUTH` response.
    pub pa_req: String,
    /// Authentication response posted back by the bank.
    pub pa_res: String,
    endpoint: Url,
}

impl SecureAuthCompletion {
    pub fn new(
        environment: Environment,
        md: impl Into<String>,
        pa_req: impl Into<String>,
        pa_res: impl Into<String>,
    ) -> Result<Self> {
        Ok(SecureAuthCompletion {
            md: md.into(),
            pa_req: pa_req.into(),
            pa_res: pa_res.into(),
            endpoint: environment.endpoint(Service::Direct3DCallback)?,
        })
    }

    /// Build the completion for a challenge returned by a transaction registration.
    pub fn from_challenge(
        environment: Environment,
        challenge: &ThreeDSecureChallenge,
        pa_res: impl Into<String>,
    ) -> Result<Self> {
        SecureAuthCompletion::new(
            environment,
            challenge.md.as_str(),
            challenge.pa_req.as_str(),
            pa_res,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn fields(&self) -> Fields {
        Fields::from([
            (keys::MD, self.md.as_str()),
            (keys::PA_REQ, self.pa_req.as_str()),
            (keys::PA_RES, self.pa_res.as_str()),
        ])
    }

    /// The form-encoded request body.
    pub fn encode(&self) -> String {
        self.fields().encode()
    }

    /// Send the completion and classify the response.
    ///
    /// Non-success outcomes carry fixed customer-facing messages, and the
    /// result includes a [`SurfacedError`] for the caller to persist.
    pub async fn execute<T: Transport>(&self, transport: &T) -> CompletionResult {
        #[cfg(feature = "tracing")]
        tracing::debug!("Completing 3-D Secure authentication: endpoint='{}'", self.endpoint);

        let (response, outcome) =
            exchange(transport, &self.endpoint, self.encode(), MessagePolicy::Fixed).await;

        let surfaced_error = SurfacedError::from_outcome(&outcome);

        CompletionResult {
            response,
            outcome,
            surfaced_error,
        }
    }
}

/// The classified result of a 3-D Secure completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    /// The parsed response; `None` when no response was received.
    pub response: Option<GatewayResponse>,
    pub outcome: Outcome,
    /// Present whenever the outcome is not a success.
    pub surfaced_error: Option<SurfacedError>,
}

impl CompletionResult {
    pub fn status(&self) -> OutcomeStatus {
        self.outcome.status()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.outcome.error_message()
    }
}

/// A failed completion, kept by the caller to show on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfacedError {
    pub status: OutcomeStatus,
    pub description: String,
}

impl SurfacedError {
    /// `None` for authorised outcomes.
    pub fn from_outcome(outcome: &Outcome) -> Option<Self> {
        if outcome.is_success() {
            return None;
        }

        Some(SurfacedError {
            status: outcome.status(),
            description: outcome.error_message().unwrap_or_default().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use sagepay_core::outcome::messages;

    use super::*;
    use crate::mock::MockTransport;

    fn completion() -> SecureAuthCompletion {
        SecureAuthCompletion::new(Environment::Test, "tok2", "tok1", "eJzVWNmS&=").unwrap()
    }

    #[test]
    fn test_fields_are_exactly_the_tokens() {
        let completion = completion();

        assert_eq!(
            completion.fields(),
            Fields::from([("MD", "tok2"), ("PAReq", "tok1"), ("PARes", "eJzVWNmS&=")])
        );
        assert_eq!(completion.encode(), "MD=tok2&PAReq=tok1&PARes=eJzVWNmS%26%3D");
    }

    #[test]
    fn test_endpoint_selection() {
        assert_eq!(
            completion().endpoint().as_str(),
            "https://test.sagepay.com/gateway/service/direct3dcallback.vsp"
        );

        let live = SecureAuthCompletion::new(Environment::Live, "a", "b", "c").unwrap();
        assert_eq!(
            live.endpoint().as_str(),
            "https://live.sagepay.com/gateway/service/direct3dcallback.vsp"
        );
    }

    #[test]
    fn test_from_challenge() {
        let challenge = ThreeDSecureChallenge {
            acs_url: "https://bank/x".to_string(),
            pa_req: "tok1".to_string(),
            md: "tok2".to_string(),
        };

        let completion =
            SecureAuthCompletion::from_challenge(Environment::Test, &challenge, "eJzVWNmS&=")
                .unwrap();

        assert_eq!(completion, self::completion());
    }

    #[tokio::test]
    async fn test_execute_success() {
        let transport = MockTransport::responding("Status=OK\r\nVPSTxId={X}\r\nTxAuthNo=42\r\n");

        let result = completion().execute(&transport).await;

        assert_eq!(result.status(), OutcomeStatus::Success);
        assert_eq!(result.surfaced_error, None);
        assert_eq!(
            result.outcome.as_authorised().unwrap().tx_auth_no.as_deref(),
            Some("42")
        );

        let sent = transport.requests();
        assert_eq!(sent[0].0, *completion().endpoint());
        assert_eq!(sent[0].1, completion().encode());
    }

    #[tokio::test]
    async fn test_execute_uses_fixed_messages() {
        let cases = [
            ("Status=INVALID\r\nStatusDetail=PARes bad\r\n", OutcomeStatus::Invalid, messages::INVALID),
            ("Status=FAIL\r\nStatusDetail=Oops\r\n", OutcomeStatus::Failed, messages::FAILED),
            ("Status=NOTAUTHED\r\n", OutcomeStatus::NotAuthenticated, messages::NOT_AUTHORISED),
            ("Status=REJECTED\r\n", OutcomeStatus::Declined, messages::NOT_AUTHORISED),
            ("Status=WHAT\r\nStatusDetail=Huh\r\n", OutcomeStatus::Unknown, messages::UNKNOWN),
        ];

        for (body, status, message) in cases {
            let result = completion().execute(&MockTransport::responding(body)).await;

            assert_eq!(result.status(), status);
            assert_eq!(result.error_message(), Some(message));
            assert_eq!(
                result.surfaced_error,
                Some(SurfacedError {
                    status,
                    description: message.to_string(),
                })
            );
        }
    }

    #[tokio::test]
    async fn test_execute_three_d_secure_again() {
        let transport =
            MockTransport::responding("Status=3DAUTH\r\nACSURL=https://bank/y\r\nPAReq=p2\r\nMD=m2\r\n");

        let result = completion().execute(&transport).await;

        assert_eq!(result.status(), OutcomeStatus::ThreeDSecureRequired);
        assert_eq!(result.outcome.as_three_d_secure().unwrap().md, "m2");
        assert_eq!(
            result.surfaced_error,
            Some(SurfacedError {
                status: OutcomeStatus::ThreeDSecureRequired,
                description: String::new(),
            })
        );
    }

    #[tokio::test]
    async fn test_execute_transport_failure() {
        let result = completion()
            .execute(&MockTransport::failing("dns error: no such host"))
            .await;

        assert_eq!(result.status(), OutcomeStatus::TransportFailure);
        assert_eq!(result.response, None);
        assert_eq!(
            result.surfaced_error.unwrap().description,
            "dns error: no such host"
        );
    }

    #[test]
    fn test_surfaced_error_serialization() {
        let error = SurfacedError {
            status: OutcomeStatus::NotAuthenticated,
            description: messages::NOT_AUTHORISED.to_string(),
        };

        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            serde_json::json!({
                "status": "notauthed",
                "description": messages::NOT_AUTHORISED,
            })
        );
    }
}
