//! UTXO wallet SDK - transaction model, serialization, fees, and building.
//!
//! The center of the SDK: immutable transaction value types with canonical
//! wire serialization, the value-committing signature digest, worst-case
//! fee estimation, deterministic output ordering, and the
//! [`TransactionBuilder`] that assembles fully signed transactions from
//! spendable coins.
//!
//! Every codec, ordering, fee, and digest path is a pure function over
//! its inputs — safe to call concurrently from any number of threads.
//! The builder keeps no shared state; its only collaborator call is the
//! [`Signer`], and per-input signing results are joined back in input
//! order so completion timing can never change the built transaction.

pub mod builder;
pub mod fees;
pub mod input;
pub mod ordering;
pub mod output;
pub mod sighash;
pub mod signer;
pub mod transaction;
pub mod utxo;

mod error;
pub use builder::{SigningMaterial, TransactionBuilder, DEFAULT_DUST_THRESHOLD};
pub use error::{BuildError, TransactionError};
pub use input::Input;
pub use ordering::OutputOrdering;
pub use output::Output;
pub use signer::{SignatureFormat, Signer, SignerError, SigningKey, SoftwareSigner};
pub use transaction::Transaction;
pub use utxo::UnspentOutput;
