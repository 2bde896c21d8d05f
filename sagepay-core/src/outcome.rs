//! Classification of gateway responses into application-level outcomes.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::types::GatewayResponse;

/// Customer-facing messages used when the gateway detail is not shown.
pub mod messages {
    pub const NOT_AUTHORISED: &str =
        "Your payment was not authorised by your bank or your card details were incorrect.";
    pub const INVALID: &str = "One or more of your card details were invalid. Please try again.";
    pub const FAILED: &str = "An unexpected error has occurred. Please try again.";
    pub const UNKNOWN: &str = "An error has occurred. Please try again.";
}

/// Where the message of a non-success outcome comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePolicy {
    /// Use the gateway's `StatusDetail` for invalid, failed and unknown
    /// outcomes, falling back to the fixed message when it is absent.
    GatewayDetail,
    /// Always use the fixed message.
    Fixed,
}

/// The result of one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `OK`: the payment was authorised.
    Authorised(Authorisation),
    /// `3DAUTH`: the cardholder must complete a 3-D Secure challenge.
    ThreeDSecureRequired(ThreeDSecureChallenge),
    /// `REJECTED`
    Declined(Rejection),
    /// `NOTAUTHED`
    NotAuthenticated(Rejection),
    /// `INVALID`: the gateway rejected the submitted data.
    Invalid(Rejection),
    /// `FAIL`: the gateway could not process the transaction.
    Failed(Rejection),
    /// Missing or unrecognised status.
    Unknown(Rejection),
    /// No response reached us.
    TransportFailure(Rejection),
}

/// Identifiers returned with an authorised payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorisation {
    /// The gateway's own transaction id (`VPSTxId`).
    pub vps_tx_id: Option<String>,
    /// The bank authorisation code (`TxAuthNo`).
    pub tx_auth_no: Option<String>,
}

/// Tokens needed to redirect the cardholder to their bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDSecureChallenge {
    /// The issuer's access control server (`ACSURL`).
    pub acs_url: String,
    /// Authentication request payload (`PAReq`).
    pub pa_req: String,
    /// Merchant data correlating the challenge with the transaction (`MD`).
    pub md: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub message: String,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Rejection {
            message: message.into(),
        }
    }
}

/// The kind of an [`Outcome`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeStatus {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "3dAuth")]
    ThreeDSecureRequired,
    #[serde(rename = "declined")]
    Declined,
    #[serde(rename = "notauthed")]
    NotAuthenticated,
    #[serde(rename = "invalid")]
    Invalid,
    #[serde(rename = "fail")]
    Failed,
    #[serde(rename = "error")]
    Unknown,
    #[serde(rename = "transport-failure")]
    TransportFailure,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::ThreeDSecureRequired => "3dAuth",
            OutcomeStatus::Declined => "declined",
            OutcomeStatus::NotAuthenticated => "notauthed",
            OutcomeStatus::Invalid => "invalid",
            OutcomeStatus::Failed => "fail",
            OutcomeStatus::Unknown => "error",
            OutcomeStatus::TransportFailure => "transport-failure",
        }
    }
}

impl Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Outcome {
    /// Classify a parsed gateway response by its `Status` field.
    ///
    /// A `3DAUTH` response missing any of `ACSURL`, `PAReq` or `MD` cannot be
    /// redirected and is classified as [`Outcome::Unknown`], not
    /// [`Outcome::ThreeDSecureRequired`].
    pub fn classify(response: &GatewayResponse, policy: MessagePolicy) -> Self {
        let message = |fixed: &str| match policy {
            MessagePolicy::GatewayDetail => Rejection::new(response.status_detail().unwrap_or(fixed)),
            MessagePolicy::Fixed => Rejection::new(fixed),
        };

        match response.status() {
            Some("OK") => Outcome::Authorised(Authorisation {
                vps_tx_id: response.vps_tx_id().map(str::to_string),
                tx_auth_no: response.tx_auth_no().map(str::to_string),
            }),
            Some("3DAUTH") => match (response.acs_url(), response.pa_req(), response.md()) {
                (Some(acs_url), Some(pa_req), Some(md)) => {
                    Outcome::ThreeDSecureRequired(ThreeDSecureChallenge {
                        acs_url: acs_url.to_string(),
                        pa_req: pa_req.to_string(),
                        md: md.to_string(),
                    })
                }
                _ => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("3DAUTH response is missing ACSURL, PAReq or MD");

                    Outcome::Unknown(message(messages::UNKNOWN))
                }
            },
            Some("REJECTED") => Outcome::Declined(Rejection::new(messages::NOT_AUTHORISED)),
            Some("NOTAUTHED") => Outcome::NotAuthenticated(Rejection::new(messages::NOT_AUTHORISED)),
            Some("INVALID") => Outcome::Invalid(message(messages::INVALID)),
            Some("FAIL") => Outcome::Failed(message(messages::FAILED)),
            _other => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Unrecognised gateway status: {:?}", _other);

                Outcome::Unknown(message(messages::UNKNOWN))
            }
        }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Outcome::TransportFailure(Rejection::new(message))
    }

    pub fn status(&self) -> OutcomeStatus {
        match self {
            Outcome::Authorised(_) => OutcomeStatus::Success,
            Outcome::ThreeDSecureRequired(_) => OutcomeStatus::ThreeDSecureRequired,
            Outcome::Declined(_) => OutcomeStatus::Declined,
            Outcome::NotAuthenticated(_) => OutcomeStatus::NotAuthenticated,
            Outcome::Invalid(_) => OutcomeStatus::Invalid,
            Outcome::Failed(_) => OutcomeStatus::Failed,
            Outcome::Unknown(_) => OutcomeStatus::Unknown,
            Outcome::TransportFailure(_) => OutcomeStatus::TransportFailure,
        }
    }

    /// The message to show the customer, for outcomes that carry one.
    pub fn error_message(&self) -> Option<&str> {
        self.as_rejection().map(|r| r.message.as_str())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Authorised(_))
    }

    pub fn as_authorised(&self) -> Option<&Authorisation> {
        match self {
            Outcome::Authorised(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_three_d_secure(&self) -> Option<&ThreeDSecureChallenge> {
        match self {
            Outcome::ThreeDSecureRequired(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Authorised(_) | Outcome::ThreeDSecureRequired(_) => None,
            Outcome::Declined(r)
            | Outcome::NotAuthenticated(r)
            | Outcome::Invalid(r)
            | Outcome::Failed(r)
            | Outcome::Unknown(r)
            | Outcome::TransportFailure(r) => Some(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(body: &str) -> Outcome {
        Outcome::classify(&GatewayResponse::parse(body), MessagePolicy::GatewayDetail)
    }

    #[test]
    fn test_classify_ok() {
        let outcome = classify("Status=OK\r\nVPSTxId=abc\r\nTxAuthNo=123\r\n");

        assert_eq!(outcome.status(), OutcomeStatus::Success);
        assert_eq!(outcome.error_message(), None);
        assert_eq!(
            outcome.as_authorised(),
            Some(&Authorisation {
                vps_tx_id: Some("abc".to_string()),
                tx_auth_no: Some("123".to_string()),
            })
        );
    }

    #[test]
    fn test_classify_ok_without_identifiers() {
        let outcome = classify("Status=OK\r\n");
        let authorisation = outcome.as_authorised().unwrap();
        assert_eq!(authorisation.vps_tx_id, None);
        assert_eq!(authorisation.tx_auth_no, None);
    }

    #[test]
    fn test_classify_invalid_uses_detail() {
        let outcome = classify("Status=INVALID\r\nStatusDetail=Bad card number\r\n");

        assert_eq!(outcome.status(), OutcomeStatus::Invalid);
        assert_eq!(outcome.error_message(), Some("Bad card number"));
    }

    #[test]
    fn test_classify_three_d_secure() {
        let outcome = classify("Status=3DAUTH\r\nACSURL=https://bank/x\r\nPAReq=tok1\r\nMD=tok2\r\n");

        assert_eq!(outcome.status(), OutcomeStatus::ThreeDSecureRequired);
        assert_eq!(outcome.error_message(), None);
        assert_eq!(
            outcome.as_three_d_secure(),
            Some(&ThreeDSecureChallenge {
                acs_url: "https://bank/x".to_string(),
                pa_req: "tok1".to_string(),
                md: "tok2".to_string(),
            })
        );
    }

    #[test]
    fn test_classify_three_d_secure_missing_token() {
        let outcome = classify("Status=3DAUTH\r\nACSURL=https://bank/x\r\nPAReq=tok1\r\n");

        assert_eq!(outcome.status(), OutcomeStatus::Unknown);
        assert_eq!(outcome.error_message(), Some(messages::UNKNOWN));
    }

    #[test]
    fn test_classify_refusals_use_fixed_message() {
        let outcome = classify("Status=REJECTED\r\nStatusDetail=AVS failure\r\n");
        assert_eq!(outcome.status(), OutcomeStatus::Declined);
        assert_eq!(outcome.error_message(), Some(messages::NOT_AUTHORISED));

        let outcome = classify("Status=NOTAUTHED\r\nStatusDetail=Bank said no\r\n");
        assert_eq!(outcome.status(), OutcomeStatus::NotAuthenticated);
        assert_eq!(outcome.error_message(), Some(messages::NOT_AUTHORISED));
    }

    #[test]
    fn test_classify_fail_and_unknown() {
        let outcome = classify("Status=FAIL\r\nStatusDetail=Gateway timeout\r\n");
        assert_eq!(outcome.status(), OutcomeStatus::Failed);
        assert_eq!(outcome.error_message(), Some("Gateway timeout"));

        let outcome = classify("Status=MALFORMED\r\nStatusDetail=Vendor not found\r\n");
        assert_eq!(outcome.status(), OutcomeStatus::Unknown);
        assert_eq!(outcome.error_message(), Some("Vendor not found"));

        let outcome = classify("");
        assert_eq!(outcome.status(), OutcomeStatus::Unknown);
        assert_eq!(outcome.error_message(), Some(messages::UNKNOWN));

        let outcome = classify("Status=FAIL\r\n");
        assert_eq!(outcome.error_message(), Some(messages::FAILED));
    }

    #[test]
    fn test_fixed_policy_ignores_detail() {
        let response = GatewayResponse::parse("Status=INVALID\r\nStatusDetail=Bad PARes\r\n");
        let outcome = Outcome::classify(&response, MessagePolicy::Fixed);
        assert_eq!(outcome.error_message(), Some(messages::INVALID));

        let response = GatewayResponse::parse("Status=3DAUTH\r\nACSURL=a\r\nPAReq=b\r\nMD=c\r\n");
        let outcome = Outcome::classify(&response, MessagePolicy::Fixed);
        assert!(outcome.as_three_d_secure().is_some());
    }

    #[test]
    fn test_transport_failure() {
        let outcome = Outcome::transport_failure("connection refused");
        assert_eq!(outcome.status(), OutcomeStatus::TransportFailure);
        assert_eq!(outcome.error_message(), Some("connection refused"));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(OutcomeStatus::ThreeDSecureRequired.to_string(), "3dAuth");
        assert_eq!(
            serde_json::to_value(OutcomeStatus::TransportFailure).unwrap(),
            serde_json::json!("transport-failure")
        );
        assert_eq!(
            serde_json::from_value::<OutcomeStatus>(serde_json::json!("notauthed")).unwrap(),
            OutcomeStatus::NotAuthenticated
        );
    }
}
