//! Card transaction registration.
//!
//! A [`TransactionRequest`] is assembled from the merchant configuration and
//! the canonical fields produced by
//! [`FieldMapper`](crate::field_mapper::FieldMapper). Building it performs no
//! I/O; [`TransactionRequest::execute`] sends it and returns a
//! [`TransactionResult`].

use sagepay_core::{
    config::MerchantConfig,
    environment::{Environment, Service},
    errors::{Error, Result},
    outcome::{MessagePolicy, Outcome, OutcomeStatus},
    transport::Transport,
    types::{Amount, Fields, GatewayResponse, keys},
};
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    exchange::exchange,
    field_mapper::{FieldMapper, check_vendor_tx_code},
};

/// Fields the request sets itself; submitted values for them are replaced.
const MANAGED_FIELDS: [&str; 11] = [
    keys::VPS_PROTOCOL,
    keys::TX_TYPE,
    keys::VENDOR,
    keys::VENDOR_TX_CODE,
    keys::AMOUNT,
    keys::CURRENCY,
    keys::DESCRIPTION,
    keys::START_DATE_MONTH,
    keys::START_DATE_YEAR,
    keys::EXPIRY_DATE_MONTH,
    keys::EXPIRY_DATE_YEAR,
];

/// Card data masked in debug output.
const REDACTED_FIELDS: [&str; 2] = [keys::CARD_NUMBER, keys::CV2];

/// A fully assembled transaction registration.
///
/// The `Debug` output masks the card number and CV2.
#[derive(Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    environment: Environment,
    endpoint: Url,
    vendor_tx_code: String,
    amount: Amount,
    description: String,
    fields: Fields,
}

impl TransactionRequest {
    /// Assemble the request from canonical payment fields.
    ///
    /// The protocol constants come from `config`. `VendorTxCode` is taken from
    /// `fields` when present and generated otherwise. `Amount`,
    /// `ExpiryDateMonth` and `ExpiryDateYear` are required; the amount is
    /// checked against and rendered in the minor unit of the configured
    /// currency.
    pub fn new(config: &MerchantConfig, fields: Fields) -> Result<Self> {
        let endpoint = config.endpoint(Service::Register)?;

        let vendor_tx_code = match fields.get_non_empty(keys::VENDOR_TX_CODE) {
            Some(code) => {
                check_vendor_tx_code(code)?;
                code.to_string()
            }
            None => FieldMapper::from_config(config).generate_vendor_tx_code()?,
        };

        let amount = Amount::parse_in(required(&fields, keys::AMOUNT)?, &config.currency)?;

        let description = fields
            .get(keys::DESCRIPTION)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(config.description.as_str())
            .to_string();

        let start_date = match fields.get_non_empty(keys::START_DATE_MONTH) {
            Some(month) => Some(format!(
                "{month}{}",
                required(&fields, keys::START_DATE_YEAR)?
            )),
            None => None,
        };
        let expiry_date = format!(
            "{}{}",
            required(&fields, keys::EXPIRY_DATE_MONTH)?,
            required(&fields, keys::EXPIRY_DATE_YEAR)?
        );

        let mut merged = Fields::new();
        merged.insert(keys::VPS_PROTOCOL, config.protocol_version.as_str());
        merged.insert(keys::TX_TYPE, config.tx_type.as_str());
        merged.insert(keys::VENDOR, config.vendor.as_str());
        merged.insert(keys::VENDOR_TX_CODE, vendor_tx_code.as_str());
        merged.insert(keys::AMOUNT, amount.to_string());
        merged.insert(keys::CURRENCY, config.currency.as_str());
        merged.insert(keys::DESCRIPTION, description.as_str());
        merged.extend(
            fields
                .into_iter()
                .filter(|(k, _)| !MANAGED_FIELDS.contains(&k.as_str())),
        );
        if let Some(start_date) = start_date {
            merged.insert(keys::START_DATE, start_date);
        }
        merged.insert(keys::EXPIRY_DATE, expiry_date);

        Ok(TransactionRequest {
            environment: config.environment,
            endpoint,
            vendor_tx_code,
            amount,
            description,
            fields: merged,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn vendor_tx_code(&self) -> &str {
        &self.vendor_tx_code
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Every field sent to the gateway, in wire order.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The form-encoded request body.
    pub fn encode(&self) -> String {
        self.fields.encode()
    }

    /// Send the request and classify the response.
    ///
    /// Never fails: transport errors are reported as
    /// [`Outcome::TransportFailure`].
    pub async fn execute<T: Transport>(&self, transport: &T) -> TransactionResult {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Registering transaction: vendor_tx_code='{}', amount='{}', environment='{}'",
            self.vendor_tx_code,
            self.amount,
            self.environment
        );

        let (response, outcome) = exchange(
            transport,
            &self.endpoint,
            self.encode(),
            MessagePolicy::GatewayDetail,
        )
        .await;

        TransactionResult {
            vendor_tx_code: self.vendor_tx_code.clone(),
            response,
            outcome,
        }
    }
}

impl fmt::Debug for TransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<(&str, &str)> = self
            .fields
            .iter()
            .map(|(key, value)| {
                if REDACTED_FIELDS.contains(&key) {
                    (key, "[redacted]")
                } else {
                    (key, value)
                }
            })
            .collect();

        f.debug_struct("TransactionRequest")
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint.as_str())
            .field("vendor_tx_code", &self.vendor_tx_code)
            .field("amount", &self.amount)
            .field("description", &self.description)
            .field("fields", &fields)
            .finish()
    }
}

fn required<'f>(fields: &'f Fields, key: &str) -> Result<&'f str> {
    fields
        .get_non_empty(key)
        .ok_or_else(|| Error::MissingField(key.to_string()))
}

/// The classified result of a transaction registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    pub vendor_tx_code: String,
    /// The parsed response; `None` when no response was received.
    pub response: Option<GatewayResponse>,
    pub outcome: Outcome,
}

impl TransactionResult {
    pub fn status(&self) -> OutcomeStatus {
        self.outcome.status()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.outcome.error_message()
    }

    /// Identifiers worth keeping with the order, for authorised payments.
    pub fn session_record(&self) -> Option<SessionTransaction> {
        self.outcome
            .as_authorised()
            .map(|authorisation| SessionTransaction {
                vendor_tx_code: self.vendor_tx_code.clone(),
                vps_tx_id: authorisation.vps_tx_id.clone(),
                tx_auth_no: authorisation.tx_auth_no.clone(),
            })
    }
}

/// The identifiers of an authorised payment, for the caller to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionTransaction {
    pub vendor_tx_code: String,
    #[serde(rename = "VPSTxId")]
    pub vps_tx_id: Option<String>,
    pub tx_auth_no: Option<String>,
}
