//! Merchant configuration.

use std::time::Duration;

use bon::Builder;
use url::Url;

use crate::{
    environment::{Environment, Service},
    errors::{Error, Result},
};

pub const DEFAULT_PROTOCOL_VERSION: &str = "2.23";
pub const DEFAULT_TX_TYPE: &str = "PAYMENT";
pub const DEFAULT_CURRENCY: &str = "GBP";
pub const DEFAULT_DESCRIPTION: &str = "New order from your online store";
pub const DEFAULT_VENDOR_TX_PREFIX: &str = "order_";

/// Merchant account settings shared by every request.
///
/// ```
/// use sagepay_core::{config::MerchantConfig, environment::Environment};
///
/// let config = MerchantConfig::builder()
///     .environment(Environment::Test)
///     .vendor("myshop")
///     .build();
///
/// assert_eq!(config.currency, "GBP");
/// assert_eq!(config.tx_type, "PAYMENT");
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct MerchantConfig {
    /// Which gateway to talk to.
    pub environment: Environment,
    /// Vendor name registered with SagePay.
    #[builder(into)]
    pub vendor: String,
    /// ISO 4217 currency code.
    #[builder(into, default = DEFAULT_CURRENCY.to_string())]
    pub currency: String,
    /// `VPSProtocol` sent with every request.
    #[builder(into, default = DEFAULT_PROTOCOL_VERSION.to_string())]
    pub protocol_version: String,
    /// `TxType`, e.g. `PAYMENT`, `DEFERRED` or `AUTHENTICATE`.
    #[builder(into, default = DEFAULT_TX_TYPE.to_string())]
    pub tx_type: String,
    /// Description used when the order does not provide one.
    #[builder(into, default = DEFAULT_DESCRIPTION.to_string())]
    pub description: String,
    /// Prefix of generated VendorTxCodes.
    #[builder(into, default = DEFAULT_VENDOR_TX_PREFIX.to_string())]
    pub vendor_tx_prefix: String,
    #[builder(default)]
    pub timeouts: Timeouts,
}

impl MerchantConfig {
    /// Load the configuration from `SAGEPAY_*` settings.
    ///
    /// `lookup` resolves a setting name to its value, e.g.
    /// `|key| std::env::var(key).ok()`. `SAGEPAY_ENV` and `SAGEPAY_VENDOR` are
    /// required; `SAGEPAY_CURRENCY`, `SAGEPAY_PROTOCOL_VERSION`,
    /// `SAGEPAY_TYPE`, `SAGEPAY_DESCRIPTION` and `SAGEPAY_TX_PREFIX` override
    /// the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = lookup("SAGEPAY_ENV")
            .ok_or(Error::MissingConfig("SAGEPAY_ENV"))?
            .parse::<Environment>()?;
        let vendor = lookup("SAGEPAY_VENDOR")
            .filter(|v| !v.trim().is_empty())
            .ok_or(Error::MissingConfig("SAGEPAY_VENDOR"))?;

        Ok(MerchantConfig::builder()
            .environment(environment)
            .vendor(vendor)
            .maybe_currency(lookup("SAGEPAY_CURRENCY"))
            .maybe_protocol_version(lookup("SAGEPAY_PROTOCOL_VERSION"))
            .maybe_tx_type(lookup("SAGEPAY_TYPE"))
            .maybe_description(lookup("SAGEPAY_DESCRIPTION"))
            .maybe_vendor_tx_prefix(lookup("SAGEPAY_TX_PREFIX"))
            .build())
    }

    /// Endpoint of `service` in the configured environment.
    pub fn endpoint(&self, service: Service) -> Result<Url> {
        self.environment.endpoint(service)
    }
}

/// Time limits applied to each gateway call.
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Limit for establishing the connection.
    #[builder(default = Duration::from_secs(30))]
    pub network: Duration,
    /// Ceiling for the whole request, response body included.
    #[builder(default = Duration::from_secs(60))]
    pub execution: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = MerchantConfig::builder()
            .environment(Environment::Live)
            .vendor("shop")
            .build();

        assert_eq!(config.protocol_version, DEFAULT_PROTOCOL_VERSION);
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert_eq!(config.vendor_tx_prefix, DEFAULT_VENDOR_TX_PREFIX);
        assert_eq!(config.timeouts.network, Duration::from_secs(30));
        assert_eq!(config.timeouts.execution, Duration::from_secs(60));
    }

    #[test]
    fn test_from_lookup() {
        let config = MerchantConfig::from_lookup(lookup_from(&[
            ("SAGEPAY_ENV", "DEVELOPMENT"),
            ("SAGEPAY_VENDOR", "shop"),
            ("SAGEPAY_CURRENCY", "EUR"),
            ("SAGEPAY_TYPE", "DEFERRED"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.vendor, "shop");
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.tx_type, "DEFERRED");
        assert_eq!(config.protocol_version, DEFAULT_PROTOCOL_VERSION);
        assert_eq!(
            config.endpoint(Service::Register).unwrap().as_str(),
            "https://test.sagepay.com/gateway/service/vspdirect-register.vsp"
        );
    }

    #[test]
    fn test_from_lookup_fails_closed() {
        let err = MerchantConfig::from_lookup(lookup_from(&[("SAGEPAY_VENDOR", "shop")]));
        assert!(matches!(err, Err(Error::MissingConfig("SAGEPAY_ENV"))));

        let err = MerchantConfig::from_lookup(lookup_from(&[
            ("SAGEPAY_ENV", "staging"),
            ("SAGEPAY_VENDOR", "shop"),
        ]));
        assert!(matches!(err, Err(Error::UnknownEnvironment(_))));

        let err = MerchantConfig::from_lookup(lookup_from(&[("SAGEPAY_ENV", "LIVE")]));
        assert!(matches!(err, Err(Error::MissingConfig("SAGEPAY_VENDOR"))));
    }
}
