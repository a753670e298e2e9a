//! Fee estimation from worst-case serialized size.
//!
//! The estimate must never come in under the final signed size: a fee
//! computed from an undersized estimate risks rejection by the network,
//! while the byte or two of overpayment from a DER signature coming up
//! short of its maximum is deliberate slack.

use utxo_primitives::wire::VarInt;
use utxo_primitives::{ExceedsMaximumAmount, Satoshi};

use crate::output::Output;
use crate::signer::SignatureFormat;

/// The locking-script shape of an input, as far as fee estimation cares.
///
/// Carries the signature counts that determine unlocking-script size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputScriptKind {
    /// Spends a pay-to-public-key-hash output: one signature, one key.
    PayToPublicKeyHash,

    /// Spends a bare multisig output: `required` signatures.
    MultiSignature {
        /// Signatures required to spend.
        required: u8,
        /// Total keys in the locking script.
        total: u8,
    },

    /// Spends a pay-to-script-hash output whose redeem script is an
    /// m-of-n multisig: `required` signatures plus the redeem script
    /// itself.
    PayToScriptHash {
        /// Signatures required by the redeem script.
        required: u8,
        /// Total keys in the redeem script.
        total: u8,
    },
}

/// Worst-case length of the unlocking script for an input of the given
/// kind, signed in the given format.
pub fn worst_case_unlocking_len(kind: InputScriptKind, format: SignatureFormat) -> usize {
    // Push prefix is a single byte: max signature lengths stay below 76.
    let signature_push = 1 + format.max_signature_len();
    match kind {
        InputScriptKind::PayToPublicKeyHash => signature_push + 1 + 33,
        InputScriptKind::MultiSignature { required, .. } => {
            1 + required as usize * signature_push
        }
        InputScriptKind::PayToScriptHash { required, total } => {
            let redeem_len = 3 + 34 * total as usize;
            1 + required as usize * signature_push + push_prefix_len(redeem_len) + redeem_len
        }
    }
}

/// Estimated serialized size of a transaction with the given inputs and
/// outputs, assuming worst-case unlocking scripts.
pub fn estimated_size(
    input_kinds: &[InputScriptKind],
    outputs: &[Output],
    format: SignatureFormat,
) -> usize {
    let inputs: usize = input_kinds
        .iter()
        .map(|&kind| {
            let unlocking_len = worst_case_unlocking_len(kind, format);
            32 + 4 + VarInt::from(unlocking_len).size() + unlocking_len + 4
        })
        .sum();

    let outputs_size: usize = outputs
        .iter()
        .map(|output| {
            let script_len = output.locking_script.encoded_len();
            8 + VarInt::from(script_len).size() + script_len
        })
        .sum();

    4 + VarInt::from(input_kinds.len()).size()
        + inputs
        + VarInt::from(outputs.len()).size()
        + outputs_size
        + 4
}

/// The fee owed for a transaction of `size` bytes at the given rate.
pub fn fee_for_size(
    size: usize,
    fee_per_byte: Satoshi,
) -> Result<Satoshi, ExceedsMaximumAmount> {
    fee_per_byte.checked_mul(size as u64)
}

/// Length of the push prefix needed for `len` bytes of data.
fn push_prefix_len(len: usize) -> usize {
    match len {
        0..=75 => 1,
        76..=0xff => 2,
        0x100..=0xffff => 3,
        _ => 5,
    }
}
