use utxo_primitives::{ExceedsMaximumAmount, Hash, Satoshi};
use utxo_script::ScriptError;

use crate::signer::SignerError;

/// Errors from decoding or encoding wire-format transactions.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The data ended before a declared field could be read.
    #[error("truncated transaction while reading {0}")]
    TruncatedTransaction(&'static str),

    /// Bytes remained after the lock time field.
    #[error("{0} trailing bytes after the lock time field")]
    TrailingBytes(usize),

    /// An input index referenced a position past the input list.
    #[error("input index {index} out of range for a transaction with {count} inputs")]
    InputIndexOutOfRange {
        /// The requested input index.
        index: usize,
        /// Number of inputs the transaction has.
        count: usize,
    },

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Errors from the transaction build pipeline.
///
/// Building is all-or-nothing: any of these aborts the build and no
/// partially signed transaction is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A spendable coin was supplied without signing material.
    #[error("no signing key mapped for unspent output {txid}:{vout}")]
    UnmappedUnspentOutput {
        /// Transaction that created the coin, in display order.
        txid: Hash,
        /// Output index of the coin.
        vout: u32,
    },

    /// The coins do not cover the recipients plus the fee.
    #[error("insufficient funds: {shortfall} satoshis short of recipients plus fee")]
    InsufficientFunds {
        /// How many satoshis are missing.
        shortfall: Satoshi,
    },

    /// Summing input values, recipient values, or the fee overflowed.
    #[error(transparent)]
    AmountOverflow(#[from] ExceedsMaximumAmount),

    /// The signer collaborator failed for one input.
    #[error("signing input {index} failed: {source}")]
    SigningFailed {
        /// The input whose signing request failed.
        index: usize,
        /// The signer's opaque failure.
        #[source]
        source: SignerError,
    },

    /// A pay-to-script-hash coin was supplied without its redeem script.
    #[error("input {index} spends a pay-to-script-hash output but no redeem script was given")]
    MissingRedeemScript {
        /// The input missing a redeem script.
        index: usize,
    },

    /// The coin's locking script has no unlocking-script template.
    #[error("input {index} has a locking script this builder cannot produce an unlock for")]
    UnsupportedLockingScript {
        /// The input with the unsupported locking script.
        index: usize,
    },

    /// An underlying script codec error.
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// An underlying transaction codec error.
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}
