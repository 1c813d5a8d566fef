use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use thiserror::Error;

use crate::constants::address::{ADDRESS_SIZE, HEX_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must be {HEX_LENGTH} hex characters, got {0}")]
    InvalidLength(usize),
    #[error("address contains non-hex characters")]
    InvalidHex,
    #[error("address has an invalid EIP-55 checksum")]
    BadChecksum,
}

/// A 20-byte account address.
///
/// Parsing accepts an optional `0x` prefix. All-lowercase and all-uppercase
/// input is accepted as is; mixed-case input must carry a valid EIP-55
/// checksum. `Display` always renders the checksummed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ADDRESS_SIZE {
            return Err(AddressError::InvalidLength(bytes.len() * 2));
        }
        let mut address = [0u8; ADDRESS_SIZE];
        address.copy_from_slice(bytes);
        Ok(Self(address))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Lowercase hex without the `0x` prefix.
    pub fn to_plain_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn to_checksum(&self) -> String {
        let lower = self.to_plain_hex();
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(HEX_LENGTH + 2);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if stripped.len() != HEX_LENGTH {
            return Err(AddressError::InvalidLength(stripped.len()));
        }

        let bytes = hex::decode(stripped).map_err(|_| AddressError::InvalidHex)?;
        let address = Self::from_slice(&bytes)?;

        let has_lower = stripped.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = stripped.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *stripped {
            return Err(AddressError::BadChecksum);
        }

        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vectors from EIP-55.
    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_checksum_matches_reference_vectors() {
        for expected in CHECKSUMMED {
            let address: Address = expected.parse().unwrap();
            assert_eq!(address.to_checksum(), expected);
        }
    }

    #[test]
    fn test_parse_accepts_lowercase_without_prefix() {
        let address: Address = "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(address.to_string(), CHECKSUMMED[0]);
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let address: Address = "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED".parse().unwrap();
        assert_eq!(address.to_string(), CHECKSUMMED[0]);
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        let err = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"
            .parse::<Address>()
            .unwrap_err();
        assert_eq!(err, AddressError::BadChecksum);
    }

    #[test]
    fn test_parse_rejects_wrong_length_and_hex() {
        assert_eq!(
            "0x1234".parse::<Address>().unwrap_err(),
            AddressError::InvalidLength(4)
        );
        assert_eq!(
            "0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed"
                .parse::<Address>()
                .unwrap_err(),
            AddressError::InvalidHex
        );
    }

    #[test]
    fn test_plain_hex_is_lowercase_without_prefix() {
        let address: Address = CHECKSUMMED[1].parse().unwrap();
        assert_eq!(
            address.to_plain_hex(),
            "fb6916095ca1df60bb79ce92ce3ea74c37c5d359"
        );
    }
}
