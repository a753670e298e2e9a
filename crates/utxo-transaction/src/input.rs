//! Transaction input referencing a previously created output.

use utxo_primitives::wire::{ByteReader, ByteWriter, VarInt};
use utxo_primitives::Hash;
use utxo_script::Script;

use crate::TransactionError;

/// Sequence number of a finalized input (no relative lock time).
pub const FINAL_SEQUENCE: u32 = 0xFFFF_FFFF;

/// A single transaction input.
///
/// References the output being spent by its creating transaction's hash
/// (internal byte order on the wire) and output index, and carries the
/// unlocking script proving authorization to spend it.
///
/// # Wire format
///
/// | Field                  | Size           |
/// |------------------------|----------------|
/// | previous output hash   | 32 bytes       |
/// | previous output index  | 4 bytes (LE)   |
/// | script length          | VarInt         |
/// | unlocking script       | variable       |
/// | sequence               | 4 bytes (LE)   |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Input {
    /// Hash of the transaction that created the output being spent.
    pub previous_output_hash: Hash,

    /// Index of the output within that transaction.
    pub previous_output_index: u32,

    /// The unlocking script; empty until the input is signed.
    pub unlocking_script: Script,

    /// Sequence number. [`FINAL_SEQUENCE`] unless relative lock time or
    /// replacement signalling is in play.
    pub sequence: u32,
}

impl Input {
    /// Deserialize an input from the wire format.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let hash_bytes: [u8; 32] = reader
            .read_array()
            .map_err(|_| TransactionError::TruncatedTransaction("previous output hash"))?;

        let previous_output_index = reader
            .read_u32_le()
            .map_err(|_| TransactionError::TruncatedTransaction("previous output index"))?;

        let script_len = reader
            .read_varint()
            .map_err(|_| TransactionError::TruncatedTransaction("unlocking script length"))?;

        let script_bytes = reader
            .read_bytes(script_len.value() as usize)
            .map_err(|_| TransactionError::TruncatedTransaction("unlocking script"))?;

        let sequence = reader
            .read_u32_le()
            .map_err(|_| TransactionError::TruncatedTransaction("sequence"))?;

        Ok(Input {
            previous_output_hash: Hash::from_internal_bytes(hash_bytes),
            previous_output_index,
            unlocking_script: Script::decode_or_raw(script_bytes),
            sequence,
        })
    }

    /// Serialize this input into the wire format.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(self.previous_output_hash.as_internal_bytes());
        writer.write_u32_le(self.previous_output_index);

        let script_bytes = self.unlocking_script.encode();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(&script_bytes);

        writer.write_u32_le(self.sequence);
    }

    /// Serialize the outpoint alone (hash + index), as the signature
    /// digest's prevouts commitment requires.
    pub fn write_outpoint_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(self.previous_output_hash.as_internal_bytes());
        writer.write_u32_le(self.previous_output_index);
    }
}
