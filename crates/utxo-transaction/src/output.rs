//! Transaction output carrying a value and its locking script.

use utxo_primitives::wire::{ByteReader, ByteWriter, VarInt};
use utxo_primitives::Satoshi;
use utxo_script::Script;

use crate::TransactionError;

/// A single transaction output.
///
/// Pairs a satoshi value with the locking script that defines the
/// conditions under which the value may be spent.
///
/// # Wire format
///
/// | Field          | Size           |
/// |----------------|----------------|
/// | value          | 8 bytes (LE)   |
/// | script length  | VarInt         |
/// | locking script | variable       |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Output {
    /// Value locked by this output.
    pub value: Satoshi,

    /// The locking script (spending condition).
    pub locking_script: Script,
}

impl Output {
    /// Create an output from a value and locking script.
    pub fn new(value: Satoshi, locking_script: Script) -> Self {
        Output {
            value,
            locking_script,
        }
    }

    /// Deserialize an output from the wire format.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let value = reader
            .read_u64_le()
            .map_err(|_| TransactionError::TruncatedTransaction("output value"))?;

        let script_len = reader
            .read_varint()
            .map_err(|_| TransactionError::TruncatedTransaction("locking script length"))?;

        let script_bytes = reader
            .read_bytes(script_len.value() as usize)
            .map_err(|_| TransactionError::TruncatedTransaction("locking script"))?;

        Ok(Output {
            value: Satoshi::from_sat(value),
            locking_script: Script::decode_or_raw(script_bytes),
        })
    }

    /// Serialize this output into the wire format.
    ///
    /// The same byte form serves the signature digest's outputs
    /// commitment.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.value.to_sat());
        let script_bytes = self.locking_script.encode();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(&script_bytes);
    }

    /// Serialize this output to a standalone byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}
