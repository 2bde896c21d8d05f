//! Parsing of the gateway's line-delimited `key=value` responses.

use crate::types::{Fields, keys};

/// A response body returned by the gateway.
///
/// The raw mapping is kept for inspection; the typed getters return `None`
/// for absent (or empty) keys rather than an empty string.
///
/// ```
/// use sagepay_core::types::GatewayResponse;
///
/// let response = GatewayResponse::parse("Status=OK\r\nVPSTxId=abc\r\nTxAuthNo=123\r\n");
/// assert_eq!(response.status(), Some("OK"));
/// assert_eq!(response.vps_tx_id(), Some("abc"));
/// assert_eq!(response.acs_url(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayResponse {
    pub fields: Fields,
}

impl GatewayResponse {
    /// Parse a response body.
    ///
    /// Lines are split on any line break and then at the first `=`; both
    /// sides are trimmed. Blank lines and lines without `=` are skipped. A
    /// repeated key keeps its last value.
    pub fn parse(body: &str) -> Self {
        let fields = body
            .lines()
            .flat_map(|line| line.split('\r'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim(), value.trim()))
            .filter(|(key, _)| !key.is_empty())
            .collect();

        GatewayResponse { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get_non_empty(key)
    }

    pub fn status(&self) -> Option<&str> {
        self.get(keys::STATUS)
    }

    pub fn status_detail(&self) -> Option<&str> {
        self.get(keys::STATUS_DETAIL)
    }

    pub fn vps_tx_id(&self) -> Option<&str> {
        self.get(keys::VPS_TX_ID)
    }

    pub fn tx_auth_no(&self) -> Option<&str> {
        self.get(keys::TX_AUTH_NO)
    }

    pub fn acs_url(&self) -> Option<&str> {
        self.get(keys::ACS_URL)
    }

    pub fn pa_req(&self) -> Option<&str> {
        self.get(keys::PA_REQ)
    }

    pub fn md(&self) -> Option<&str> {
        self.get(keys::MD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok_response() {
        let response = GatewayResponse::parse("Status=OK\r\nVPSTxId=abc\r\nTxAuthNo=123\r\n");

        assert_eq!(
            response.fields,
            Fields::from([("Status", "OK"), ("VPSTxId", "abc"), ("TxAuthNo", "123")])
        );
    }

    #[test]
    fn test_split_at_first_equals_and_trim() {
        let response = GatewayResponse::parse(
            "  VPSProtocol = 2.23 \nStatus=3DAUTH\rPAReq=eJxVUt1u==\r\nMD= abc=def \n",
        );

        assert_eq!(response.fields.get("VPSProtocol"), Some("2.23"));
        assert_eq!(response.status(), Some("3DAUTH"));
        assert_eq!(response.pa_req(), Some("eJxVUt1u=="));
        assert_eq!(response.md(), Some("abc=def"));
    }

    #[test]
    fn test_garbage_lines_are_skipped() {
        let response = GatewayResponse::parse("<html>\r\n\r\n=orphan\r\nStatus=FAIL\r\n</html>");

        assert_eq!(response.fields.len(), 1);
        assert_eq!(response.status(), Some("FAIL"));
    }

    #[test]
    fn test_missing_keys_are_none() {
        let response = GatewayResponse::parse("");
        assert!(response.fields.is_empty());
        assert_eq!(response.status(), None);
        assert_eq!(response.status_detail(), None);

        let response = GatewayResponse::parse("Status=OK\r\nTxAuthNo=\r\n");
        assert_eq!(response.tx_auth_no(), None);
        assert_eq!(response.fields.get("TxAuthNo"), Some(""));
    }

    #[test]
    fn test_duplicate_key_keeps_last_value() {
        let response = GatewayResponse::parse("Status=OK\nStatus=FAIL\n");
        assert_eq!(response.fields.len(), 1);
        assert_eq!(response.status(), Some("FAIL"));
    }
}
