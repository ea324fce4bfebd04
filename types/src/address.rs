//! Account address type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An account address: `0x` followed by 40 hex digits (20 bytes).
///
/// Stored in canonical lower-case form so that two spellings of the same
/// address compare equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// The standard prefix for all addresses.
    pub const PREFIX: &'static str = "0x";

    /// Number of raw bytes encoded by an address.
    pub const BYTE_LEN: usize = 20;

    /// Parse an address, normalising it to lower case.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let digits = raw
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| TypesError::InvalidAddress(raw.to_string()))?;
        let mut bytes = [0u8; Self::BYTE_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| TypesError::InvalidAddress(raw.to_string()))?;
        Ok(Self::from_bytes(bytes))
    }

    /// Build an address from its 20 raw bytes.
    pub fn from_bytes(bytes: [u8; Self::BYTE_LEN]) -> Self {
        Self(format!("{}{}", Self::PREFIX, hex::encode(bytes)))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_case() {
        let mixed = Address::parse("0x8626f6940E2eb28930eFb4CeF49B2d1F2C9C1199").unwrap();
        let lower = Address::parse("0x8626f6940e2eb28930efb4cef49b2d1f2c9c1199").unwrap();
        assert_eq!(mixed, lower);
        assert_eq!(mixed.as_str(), "0x8626f6940e2eb28930efb4cef49b2d1f2c9c1199");
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = Address::parse("8626f6940e2eb28930efb4cef49b2d1f2c9c1199").unwrap_err();
        assert!(matches!(err, TypesError::InvalidAddress(_)));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0x8626f6940e2eb28930efb4cef49b2d1f2c9c119900").is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(Address::parse("0xzz26f6940e2eb28930efb4cef49b2d1f2c9c1199").is_err());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<Address, _> =
            serde_json::from_str("\"0xdD2FD4581271e230360230F9337D5c0430Bf44C0\"");
        assert!(ok.is_ok());
        let bad: Result<Address, _> = serde_json::from_str("\"0xdead\"");
        assert!(bad.is_err());
    }
}
