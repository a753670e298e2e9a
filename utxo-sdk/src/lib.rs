#![deny(missing_docs)]

//! UTXO wallet SDK - complete facade.
//!
//! Re-exports the SDK's member crates for single-dependency usage.

pub use utxo_primitives as primitives;
pub use utxo_script as script;
pub use utxo_transaction as transaction;
