//! Ordered field mappings exchanged with the gateway.

use url::form_urlencoded;

/// Field names used by the SagePay Direct protocol.
pub mod keys {
    pub const VPS_PROTOCOL: &str = "VPSProtocol";
    pub const TX_TYPE: &str = "TxType";
    pub const VENDOR: &str = "Vendor";
    pub const VENDOR_TX_CODE: &str = "VendorTxCode";
    pub const AMOUNT: &str = "Amount";
    pub const CURRENCY: &str = "Currency";
    pub const DESCRIPTION: &str = "Description";

    pub const CARD_HOLDER: &str = "CardHolder";
    pub const CARD_NUMBER: &str = "CardNumber";
    pub const CARD_TYPE: &str = "CardType";
    pub const START_DATE: &str = "StartDate";
    pub const START_DATE_MONTH: &str = "StartDateMonth";
    pub const START_DATE_YEAR: &str = "StartDateYear";
    pub const EXPIRY_DATE: &str = "ExpiryDate";
    pub const EXPIRY_DATE_MONTH: &str = "ExpiryDateMonth";
    pub const EXPIRY_DATE_YEAR: &str = "ExpiryDateYear";
    pub const ISSUE_NUMBER: &str = "IssueNumber";
    pub const CV2: &str = "CV2";

    pub const BILLING_FIRSTNAMES: &str = "BillingFirstnames";
    pub const BILLING_SURNAME: &str = "BillingSurname";
    pub const BILLING_ADDRESS1: &str = "BillingAddress1";
    pub const BILLING_ADDRESS2: &str = "BillingAddress2";
    pub const BILLING_CITY: &str = "BillingCity";
    pub const BILLING_COUNTRY: &str = "BillingCountry";
    pub const BILLING_POST_CODE: &str = "BillingPostCode";

    pub const STATUS: &str = "Status";
    pub const STATUS_DETAIL: &str = "StatusDetail";
    pub const VPS_TX_ID: &str = "VPSTxId";
    pub const TX_AUTH_NO: &str = "TxAuthNo";
    pub const ACS_URL: &str = "ACSURL";
    pub const PA_REQ: &str = "PAReq";
    pub const PA_RES: &str = "PARes";
    pub const MD: &str = "MD";
}

/// An insertion-ordered mapping from field name to string value.
///
/// Keys are unique: inserting an existing key replaces its value and keeps
/// its original position, so encoding a given mapping is always stable.
///
/// ```
/// use sagepay_core::types::Fields;
///
/// let mut fields = Fields::new();
/// fields.insert("Amount", "10.00");
/// fields.insert("Description", "Tea & cake");
/// assert_eq!(fields.encode(), "Amount=10.00&Description=Tea+%26+cake");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    pub fn new() -> Self {
        Fields(Vec::new())
    }

    /// Insert a field, returning the previous value if the key was present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`Fields::get`], but treats an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    ///
    /// Every value is percent-encoded; keys are protocol names and sent as-is.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| {
                let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
                format!("{key}={encoded}")
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn decode(body: &str) -> Self {
        form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Fields {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Fields {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Fields {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}
