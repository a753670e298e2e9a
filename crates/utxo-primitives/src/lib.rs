//! UTXO wallet SDK - hashing, monetary amounts, and wire-format primitives.
//!
//! Provides the building blocks shared by the script and transaction crates:
//! SHA-256 / RIPEMD-160 hash functions, the 32-byte [`Hash`] identifier type,
//! the overflow-checked [`Satoshi`] amount, and the byte reader/writer used
//! for canonical wire serialization.

pub mod amount;
pub mod hash;
pub mod hash32;
pub mod wire;

mod error;
pub use amount::Satoshi;
pub use error::{ExceedsMaximumAmount, PrimitivesError};
pub use hash32::Hash;
