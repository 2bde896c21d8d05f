//! [`Amount`] represents a transaction amount sent to the gateway.
//!
//! This module holds its type definition and implementations.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Decimal places of a currency's minor unit, per ISO 4217.
///
/// Codes not listed use two decimals.
///
/// ```
/// use sagepay_core::types::minor_unit_exponent;
///
/// assert_eq!(minor_unit_exponent("GBP"), 2);
/// assert_eq!(minor_unit_exponent("jpy"), 0);
/// assert_eq!(minor_unit_exponent("KWD"), 3);
/// ```
pub fn minor_unit_exponent(currency: &str) -> u8 {
    match currency.trim().to_ascii_uppercase().as_str() {
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF" | "UGX"
        | "UYI" | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        "CLF" | "UYW" => 4,
        _ => Amount::DEFAULT_EXPONENT,
    }
}

/// A monetary amount in minor units of its currency.
///
/// Parsed from checkout input such as `"12"`, `"12.5"` or `"12.50"` and
/// rendered with exactly as many decimals as the currency's minor unit, which
/// is the format the gateway expects.
///
/// ```
/// use sagepay_core::types::Amount;
///
/// let amount: Amount = "12.5".parse().unwrap();
/// assert_eq!(amount.minor_units(), 1250);
/// assert_eq!(amount.to_string(), "12.50");
///
/// let yen = Amount::parse_in("1000", "JPY").unwrap();
/// assert_eq!(yen.to_string(), "1000");
/// assert!(Amount::parse_in("1000.50", "JPY").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Amount {
    units: u64,
    exponent: u8,
}

impl Amount {
    /// Exponent used by [`FromStr`] and for currencies without a listed exponent.
    pub const DEFAULT_EXPONENT: u8 = 2;

    /// Parse `s` in the minor unit of `currency`.
    pub fn parse_in(s: &str, currency: &str) -> Result<Self, Error> {
        Amount::parse_with_exponent(s, minor_unit_exponent(currency))
    }

    /// Parse `s` allowing at most `exponent` decimals.
    pub fn parse_with_exponent(s: &str, exponent: u8) -> Result<Self, Error> {
        let invalid = || Error::InvalidAmount(s.to_string());
        let trimmed = s.trim();

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty()
            || !all_digits(whole)
            || !all_digits(fraction)
            || fraction.len() > exponent as usize
        {
            return Err(invalid());
        }

        let scale = 10u64.pow(exponent as u32);
        let whole = whole.parse::<u64>().map_err(|_| invalid())?;
        let fraction = if fraction.is_empty() {
            0
        } else {
            let padding = 10u64.pow((exponent as usize - fraction.len()) as u32);
            fraction.parse::<u64>().map_err(|_| invalid())? * padding
        };

        whole
            .checked_mul(scale)
            .and_then(|units| units.checked_add(fraction))
            .map(|units| Amount { units, exponent })
            .ok_or_else(invalid)
    }

    pub fn minor_units(&self) -> u64 {
        self.units
    }

    /// Decimal places the amount is rendered with.
    pub fn exponent(&self) -> u8 {
        self.exponent
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse_with_exponent(s, Amount::DEFAULT_EXPONENT)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.exponent == 0 {
            return write!(f, "{}", self.units);
        }

        let scale = 10u64.pow(self.exponent as u32);
        write!(
            f,
            "{}.{:0width$}",
            self.units / scale,
            self.units % scale,
            width = self.exponent as usize
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Amount>().map_err(serde::de::Error::custom)
    }
}
