//! The 32-byte hash type used for transaction identifiers.
//!
//! Wire data carries hashes in *internal* byte order; user-facing strings
//! and RPC interfaces show the same hash *byte-reversed* (display order).
//! [`Hash`] stores internal order and converts losslessly between the two.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Size of a [`Hash`] in bytes.
pub const HASH_LEN: usize = 32;

/// A 32-byte hash identifying a transaction.
///
/// Stored in internal (wire) byte order. `Display`, `FromStr`, and the
/// serde implementations all use the byte-reversed display order, matching
/// the convention of every UTXO-chain RPC interface.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    /// The all-zero hash, as referenced by coinbase inputs.
    pub const ZERO: Hash = Hash([0u8; HASH_LEN]);

    /// Create a hash from 32 bytes in internal (wire) order.
    pub const fn from_internal_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }

    /// Create a hash from 32 bytes in display (byte-reversed) order.
    pub fn from_display_bytes(mut bytes: [u8; HASH_LEN]) -> Self {
        bytes.reverse();
        Hash(bytes)
    }

    /// Create a hash from a slice of 32 internal-order bytes.
    ///
    /// # Returns
    /// `Ok(Hash)` if the slice is exactly 32 bytes, an error otherwise.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != HASH_LEN {
            return Err(PrimitivesError::InvalidHash(format!(
                "expected {} bytes, got {}",
                HASH_LEN,
                bytes.len()
            )));
        }
        let mut arr = [0u8; HASH_LEN];
        arr.copy_from_slice(bytes);
        Ok(Hash(arr))
    }

    /// Parse a hash from a 64-character display-order hex string.
    ///
    /// The string is the form produced by [`Display`](fmt::Display), so
    /// `Hash::from_hex(&h.to_string())` always reproduces `h`.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() != HASH_LEN * 2 {
            return Err(PrimitivesError::InvalidHash(format!(
                "expected {} hex characters, got {}",
                HASH_LEN * 2,
                hex_str.len()
            )));
        }
        let decoded = hex::decode(hex_str)?;
        let mut arr = [0u8; HASH_LEN];
        arr.copy_from_slice(&decoded);
        Ok(Hash::from_display_bytes(arr))
    }

    /// Compute the double SHA-256 of `data` as a hash identifier.
    pub fn double_sha256(data: &[u8]) -> Self {
        Hash(sha256d(data))
    }

    /// The internal-order bytes, as they appear inside serialized
    /// transactions.
    pub const fn as_internal_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// The display-order (byte-reversed) bytes.
    pub fn to_display_bytes(&self) -> [u8; HASH_LEN] {
        let mut reversed = self.0;
        reversed.reverse();
        reversed
    }
}

/// Displays as byte-reversed hex, the RPC convention.
impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_display_bytes()))
    }
}

impl FromStr for Hash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

/// Serializes as a display-order hex string.
impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Deserializes from a display-order hex string.
impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reverses_internal_bytes() {
        let mut internal = [0u8; HASH_LEN];
        internal[0] = 0x06;
        internal[1] = 0xe5;
        internal[31] = 0xaa;
        let hash = Hash::from_internal_bytes(internal);
        let display = hash.to_string();
        assert!(display.starts_with("aa"));
        assert!(display.ends_with("e506"));
    }

    #[test]
    fn internal_and_display_orders_are_mutually_inverse() {
        let mut bytes = [0u8; HASH_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        let hash = Hash::from_internal_bytes(bytes);
        assert_eq!(Hash::from_display_bytes(hash.to_display_bytes()), hash);
        assert_eq!(hash.as_internal_bytes(), &bytes);
    }

    #[test]
    fn hex_roundtrip() {
        let hex_str = "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d";
        let hash = Hash::from_hex(hex_str).unwrap();
        assert_eq!(hash.to_string(), hex_str);
        // The first display byte lands at the end of the internal array.
        assert_eq!(hash.as_internal_bytes()[31], 0x45);
        assert_eq!(hash.as_internal_bytes()[0], 0x1d);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(Hash::from_hex("ab").is_err());
        assert!(Hash::from_hex(&"ab".repeat(33)).is_err());
    }

    #[test]
    fn from_hex_rejects_invalid_characters() {
        assert!(Hash::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn from_slice_requires_exact_length() {
        assert!(Hash::from_slice(&[0u8; 31]).is_err());
        assert!(Hash::from_slice(&[0u8; 33]).is_err());
        assert!(Hash::from_slice(&[0u8; 32]).is_ok());
    }

    #[test]
    fn double_sha256_matches_known_vector() {
        let hash = Hash::double_sha256(b"hello");
        assert_eq!(
            hash.to_string(),
            "503d8319a48348cdc610a582f7bf754b5833df65038606eb48510790dfc99595"
        );
    }

    #[test]
    fn serde_uses_display_order() {
        let hex_str = "000000000003ba27aa200b1cecaad478d2b00432346c3f1f3986da1afd33e506";
        let hash = Hash::from_hex(hex_str).unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hex_str));
        let back: Hash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
