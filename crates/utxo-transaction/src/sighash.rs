//! Signature digest computation for transaction signing.
//!
//! Implements the value-committing digest scheme: the per-input preimage
//! commits to the value of the output being spent alongside the usual
//! transaction fields, so a signature cannot be replayed against a
//! different-valued coin. The digest is double SHA-256 of the preimage.
//!
//! This module is the single digest entry point; callers select policy
//! through the sighash type flags.

use utxo_primitives::hash::sha256d;
use utxo_primitives::wire::{ByteWriter, VarInt};
use utxo_primitives::Satoshi;

use crate::transaction::Transaction;
use crate::TransactionError;

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output at the signed input's index.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Commit only to the signed input, allowing others to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask extracting the base type from a combined sighash value.
pub const SIGHASH_MASK: u32 = 0x1f;

/// Compute the signature digest for one input.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `script_code` - The script the signature commits to: the locking
///   script of the output being spent, or the redeem script for
///   pay-to-script-hash spends.
/// * `sighash_type` - Combined sighash flags.
/// * `value` - Value of the output being spent.
///
/// # Returns
/// The 32-byte digest handed to the signer.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
    value: Satoshi,
) -> Result<[u8; 32], TransactionError> {
    let preimage = sighash_preimage(tx, input_index, script_code, sighash_type, value)?;
    Ok(sha256d(&preimage))
}

/// Build the digest preimage for one input, before hashing.
///
/// Layout:
/// 1. version (4, LE)
/// 2. prevouts commitment (32) — double SHA-256 of every outpoint, or
///    zeros under `SIGHASH_ANYONECANPAY`
/// 3. sequence commitment (32) — double SHA-256 of every sequence, or
///    zeros under `ANYONECANPAY`, `SINGLE`, or `NONE`
/// 4. outpoint of the signed input (32 + 4)
/// 5. script code (VarInt + bytes)
/// 6. value of the spent output (8, LE)
/// 7. sequence of the signed input (4, LE)
/// 8. outputs commitment (32) — double SHA-256 of all outputs, of the
///    matching output under `SINGLE`, or zeros
/// 9. lock time (4, LE)
/// 10. sighash type (4, LE)
pub fn sighash_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
    value: Satoshi,
) -> Result<Vec<u8>, TransactionError> {
    let input = tx
        .inputs
        .get(input_index)
        .ok_or(TransactionError::InputIndexOutOfRange {
            index: input_index,
            count: tx.inputs.len(),
        })?;

    let base_type = sighash_type & SIGHASH_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

    let prevouts_commitment = if anyone_can_pay {
        [0u8; 32]
    } else {
        prevouts_hash(tx)
    };

    let sequence_commitment =
        if anyone_can_pay || base_type == SIGHASH_SINGLE || base_type == SIGHASH_NONE {
            [0u8; 32]
        } else {
            sequence_hash(tx)
        };

    let outputs_commitment = if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        outputs_hash(tx, None)
    } else if base_type == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        outputs_hash(tx, Some(input_index))
    } else {
        [0u8; 32]
    };

    let mut writer = ByteWriter::with_capacity(160 + script_code.len());
    writer.write_i32_le(tx.version);
    writer.write_bytes(&prevouts_commitment);
    writer.write_bytes(&sequence_commitment);
    input.write_outpoint_to(&mut writer);
    writer.write_varint(VarInt::from(script_code.len()));
    writer.write_bytes(script_code);
    writer.write_u64_le(value.to_sat());
    writer.write_u32_le(input.sequence);
    writer.write_bytes(&outputs_commitment);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);

    Ok(writer.into_bytes())
}

/// Double SHA-256 over every input's outpoint, concatenated.
fn prevouts_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        input.write_outpoint_to(&mut writer);
    }
    sha256d(writer.as_bytes())
}

/// Double SHA-256 over every input's sequence number, concatenated.
fn sequence_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence);
    }
    sha256d(writer.as_bytes())
}

/// Double SHA-256 over serialized outputs: all of them, or a single one.
fn outputs_hash(tx: &Transaction, only: Option<usize>) -> [u8; 32] {
    let mut writer = ByteWriter::new();
    match only {
        None => {
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
        Some(index) => tx.outputs[index].write_to(&mut writer),
    }
    sha256d(writer.as_bytes())
}
