//! # Domain Value Objects
//!
//! Immutable value types: account identifiers and node capability flags.

use primitive_types::H160;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of hex digits in an account identifier.
const ACCOUNT_HEX_LEN: usize = 40;

/// Account parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Missing `0x` prefix.
    #[error("account id must start with 0x: {0}")]
    MissingPrefix(String),

    /// Wrong number of hex digits.
    #[error("account id must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    /// Non-hex characters.
    #[error("account id is not valid hex: {0}")]
    InvalidHex(String),

    /// Mixed-case id that fails its EIP-55 checksum.
    #[error("account id has an invalid checksum: {0}")]
    BadChecksum(String),
}

/// 20-byte account identifier.
///
/// Accepts all-lowercase, all-uppercase, or EIP-55 checksummed hex.
/// Displays in checksummed form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Account(H160);

impl Account {
    /// Build from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(H160(bytes))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        self.0.as_fixed_bytes()
    }

    /// Underlying `H160`.
    pub fn as_h160(&self) -> &H160 {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_lowercase_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_bytes()))
    }

    /// `0x`-prefixed EIP-55 checksummed hex.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0.as_bytes());
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(ACCOUNT_HEX_LEN + 2);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Account {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AccountError::MissingPrefix(s.to_string()))?;

        if digits.len() != ACCOUNT_HEX_LEN {
            return Err(AccountError::InvalidLength(digits.len()));
        }

        let bytes = hex::decode(digits).map_err(|_| AccountError::InvalidHex(s.to_string()))?;
        let account = Account(H160::from_slice(&bytes));

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && account.to_checksum()[2..] != *digits {
            return Err(AccountError::BadChecksum(s.to_string()));
        }

        Ok(account)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl From<H160> for Account {
    fn from(value: H160) -> Self {
        Self(value)
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Capability flags advertised by a node through its `props` field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeProps(u64);

impl NodeProps {
    /// Delivers proofs.
    pub const PROOF: u64 = 0x1;
    /// Serves multiple chains.
    pub const MULTICHAIN: u64 = 0x2;
    /// Keeps archive state.
    pub const ARCHIVE: u64 = 0x4;
    /// Plain HTTP transport.
    pub const HTTP: u64 = 0x8;
    /// Binary transport.
    pub const BINARY: u64 = 0x10;
    /// Reachable as an onion service.
    pub const ONION: u64 = 0x20;
    /// Signs block hashes.
    pub const SIGNER: u64 = 0x40;
    /// Serves raw data.
    pub const DATA: u64 = 0x80;
    /// Exposes statistics.
    pub const STATS: u64 = 0x100;

    /// Wrap raw bits.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Whether every bit of `flag` is set.
    pub const fn contains(&self, flag: u64) -> bool {
        self.0 & flag == flag
    }

    /// Minimum distance to the chain head a signer keeps, in blocks.
    pub const fn min_block_height(&self) -> u8 {
        ((self.0 >> 32) & 0xff) as u8
    }

    /// Whether the node delivers proofs.
    pub const fn supports_proof(&self) -> bool {
        self.contains(Self::PROOF)
    }

    /// Whether the node keeps archive state.
    pub const fn is_archive(&self) -> bool {
        self.contains(Self::ARCHIVE)
    }

    /// Whether the node signs block hashes.
    pub const fn is_signer(&self) -> bool {
        self.contains(Self::SIGNER)
    }
}
