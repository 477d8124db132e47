//! 20-byte account addresses.
//!
//! Addresses follow the Ethereum convention: the low 20 bytes of a
//! keccak-256 hash. Token addresses are derived deterministically from the
//! launch pad address and the token tick, so the claim digest can commit to
//! a stable identifier.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

/// A 20-byte account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address. Used as "no beneficiary" and rejected wherever
    /// a real destination is required.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Conventional burn destination for liquidity tokens.
    pub const BLACK_HOLE: Address = Address([
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0xde, 0xad,
    ]);

    /// Low 20 bytes of `keccak256(data)`.
    pub fn from_keccak(data: &[u8]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        let hash = hasher.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&hash[12..]);
        Address(out)
    }

    /// Deterministic child address: `keccak256(parent || label)`.
    pub fn derive(parent: &Address, label: &str) -> Self {
        let mut data = Vec::with_capacity(20 + label.len());
        data.extend_from_slice(&parent.0);
        data.extend_from_slice(label.as_bytes());
        Self::from_keccak(&data)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let mut out = [0u8; 20];
        hex::decode_to_slice(stripped, &mut out)?;
        Ok(Address(out))
    }
}

// Rendered as `0x`-prefixed hex in every serialized form, so addresses are
// readable in config files and event feeds alike.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
