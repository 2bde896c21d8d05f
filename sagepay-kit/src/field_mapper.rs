//! Mapping of submitted checkout forms onto gateway field names.

use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

use bon::Builder;
use rand::Rng;
use sagepay_core::{
    config::{DEFAULT_VENDOR_TX_PREFIX, MerchantConfig},
    errors::{Error, Result},
    types::{Fields, keys},
};

/// The gateway accepts VendorTxCodes of at most this many characters.
pub const MAX_VENDOR_TX_CODE_LEN: usize = 40;

/// Field names a checkout form may supply, in the order they are emitted.
pub const CANONICAL_FIELDS: [&str; 18] = [
    keys::CARD_HOLDER,
    keys::CARD_NUMBER,
    keys::START_DATE_MONTH,
    keys::START_DATE_YEAR,
    keys::EXPIRY_DATE_MONTH,
    keys::EXPIRY_DATE_YEAR,
    keys::CARD_TYPE,
    keys::ISSUE_NUMBER,
    keys::CV2,
    keys::BILLING_FIRSTNAMES,
    keys::BILLING_SURNAME,
    keys::BILLING_ADDRESS1,
    keys::BILLING_ADDRESS2,
    keys::BILLING_CITY,
    keys::BILLING_COUNTRY,
    keys::BILLING_POST_CODE,
    keys::AMOUNT,
    keys::DESCRIPTION,
];

/// Normalizes raw form input into the canonical field mapping.
///
/// The input is trusted to be validated already; the mapper only renames,
/// trims and drops unknown fields. It also stamps the mapping with a fresh
/// `VendorTxCode` of the form `prefix + unix seconds + random suffix`.
///
/// The code is unique with high probability only: two checkouts in the same
/// second collide when their 32-bit random suffixes match.
///
/// ```
/// use sagepay_kit::field_mapper::FieldMapper;
///
/// let mapper = FieldMapper::builder()
///     .prefix("shop_")
///     .build()
///     .alias("card_number", "CardNumber");
///
/// let fields = mapper
///     .map([("card_number", " 4929000000006 "), ("Amount", "10.00"), ("csrf", "x")])
///     .unwrap();
///
/// assert!(fields.get("VendorTxCode").unwrap().starts_with("shop_"));
/// assert_eq!(fields.get("CardNumber"), Some("4929000000006"));
/// assert_eq!(fields.get("csrf"), None);
/// ```
#[derive(Builder, Debug, Clone)]
pub struct FieldMapper {
    /// Prefix of generated VendorTxCodes.
    #[builder(into, default = DEFAULT_VENDOR_TX_PREFIX.to_string())]
    pub prefix: String,
    /// Form input name to canonical field name.
    #[builder(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for FieldMapper {
    fn default() -> Self {
        FieldMapper::builder().build()
    }
}

impl FieldMapper {
    pub fn from_config(config: &MerchantConfig) -> Self {
        FieldMapper::builder()
            .prefix(config.vendor_tx_prefix.clone())
            .build()
    }

    /// Accept `form_name` as the input name of `canonical`.
    pub fn alias(mut self, form_name: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(form_name.into(), canonical.into());
        self
    }

    /// Map a submitted form, generating the VendorTxCode from the thread RNG
    /// and the system clock.
    pub fn map<K, V>(&self, raw: impl IntoIterator<Item = (K, V)>) -> Result<Fields>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.map_with(raw, &mut rand::rng(), SystemTime::now())
    }

    /// Map a submitted form with an explicit RNG and clock.
    pub fn map_with<K, V>(
        &self,
        raw: impl IntoIterator<Item = (K, V)>,
        rng: &mut impl Rng,
        now: SystemTime,
    ) -> Result<Fields>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut submitted: HashMap<&'static str, String> = HashMap::new();
        for (name, value) in raw {
            let name = name.as_ref();
            let name = self.aliases.get(name).map(String::as_str).unwrap_or(name);
            match CANONICAL_FIELDS.iter().find(|c| **c == name) {
                Some(canonical) => {
                    submitted.insert(*canonical, value.as_ref().trim().to_string());
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!("Ignoring unmapped form field '{}'", name);
                }
            }
        }

        let mut fields = Fields::new();
        fields.insert(keys::VENDOR_TX_CODE, self.generate_vendor_tx_code_with(rng, now)?);
        for canonical in CANONICAL_FIELDS {
            if let Some(value) = submitted.remove(canonical) {
                fields.insert(canonical, value);
            }
        }

        Ok(fields)
    }

    pub fn generate_vendor_tx_code(&self) -> Result<String> {
        self.generate_vendor_tx_code_with(&mut rand::rng(), SystemTime::now())
    }

    pub fn generate_vendor_tx_code_with(
        &self,
        rng: &mut impl Rng,
        now: SystemTime,
    ) -> Result<String> {
        let seconds = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let suffix: u32 = rng.random();

        let code = format!("{}{}{:010}", self.prefix, seconds, suffix);
        check_vendor_tx_code(&code)?;
        Ok(code)
    }
}

pub(crate) fn check_vendor_tx_code(code: &str) -> Result<()> {
    let len = code.chars().count();
    if len > MAX_VENDOR_TX_CODE_LEN {
        return Err(Error::VendorTxCodeTooLong {
            code: code.to_string(),
            len,
            max: MAX_VENDOR_TX_CODE_LEN,
        });
    }
    Ok(())
}
