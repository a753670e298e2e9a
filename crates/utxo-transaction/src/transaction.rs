//! The transaction value type and its canonical wire serialization.

use std::fmt;

use utxo_primitives::wire::{ByteReader, ByteWriter, VarInt};
use utxo_primitives::{ExceedsMaximumAmount, Hash, Satoshi};

use crate::input::Input;
use crate::output::Output;
use crate::TransactionError;

/// A complete transaction.
///
/// Immutable once built: decoding and the builder construct values, and
/// every transformation produces a new value rather than mutating one in
/// place.
///
/// # Wire format
///
/// | Field        | Size                  |
/// |--------------|-----------------------|
/// | version      | 4 bytes (LE, signed)  |
/// | input count  | VarInt                |
/// | inputs       | variable              |
/// | output count | VarInt                |
/// | outputs      | variable              |
/// | lock time    | 4 bytes (LE)          |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: i32,

    /// Ordered list of inputs.
    pub inputs: Vec<Input>,

    /// Ordered list of outputs.
    pub outputs: Vec<Output>,

    /// Earliest block height or timestamp at which the transaction is
    /// valid; zero for immediately spendable transactions.
    pub lock_time: u32,
}

impl Transaction {
    // -----------------------------------------------------------------
    // Decoding
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes =
            hex::decode(hex_str).map_err(|e| TransactionError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// The slice must contain exactly one transaction.
    ///
    /// # Errors
    /// [`TransactionError::TruncatedTransaction`] if the data ends before
    /// a declared field, [`TransactionError::TrailingBytes`] if bytes
    /// remain after the lock time.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::TrailingBytes(reader.remaining()));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a reader positioned at its start.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let version = reader
            .read_i32_le()
            .map_err(|_| TransactionError::TruncatedTransaction("version"))?;

        let input_count = reader
            .read_varint()
            .map_err(|_| TransactionError::TruncatedTransaction("input count"))?;

        // Bounded preallocation: the count is untrusted until the inputs
        // actually parse.
        let mut inputs = Vec::with_capacity(input_count.value().min(512) as usize);
        for _ in 0..input_count.value() {
            inputs.push(Input::read_from(reader)?);
        }

        let output_count = reader
            .read_varint()
            .map_err(|_| TransactionError::TruncatedTransaction("output count"))?;

        let mut outputs = Vec::with_capacity(output_count.value().min(512) as usize);
        for _ in 0..output_count.value() {
            outputs.push(Output::read_from(reader)?);
        }

        let lock_time = reader
            .read_u32_le()
            .map_err(|_| TransactionError::TruncatedTransaction("lock time"))?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------

    /// Serialize this transaction to its canonical wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.size());

        writer.write_i32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Serialize this transaction to a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The serialized length in bytes, computed without serializing.
    pub fn size(&self) -> usize {
        let inputs: usize = self
            .inputs
            .iter()
            .map(|i| {
                let script_len = i.unlocking_script.encoded_len();
                32 + 4 + VarInt::from(script_len).size() + script_len + 4
            })
            .sum();
        let outputs: usize = self
            .outputs
            .iter()
            .map(|o| {
                let script_len = o.locking_script.encoded_len();
                8 + VarInt::from(script_len).size() + script_len
            })
            .sum();
        4 + VarInt::from(self.inputs.len()).size()
            + inputs
            + VarInt::from(self.outputs.len()).size()
            + outputs
            + 4
    }

    // -----------------------------------------------------------------
    // Identifier
    // -----------------------------------------------------------------

    /// The transaction identifier: double SHA-256 of the serialized
    /// bytes.
    ///
    /// The returned [`Hash`] stores internal byte order; its `Display`
    /// implementation shows the conventional byte-reversed form.
    pub fn tx_id(&self) -> Hash {
        Hash::double_sha256(&self.to_bytes())
    }

    /// The transaction identifier as a display-order hex string.
    pub fn tx_id_hex(&self) -> String {
        self.tx_id().to_string()
    }

    // -----------------------------------------------------------------
    // Totals
    // -----------------------------------------------------------------

    /// Sum of all output values, with checked addition.
    pub fn total_output_value(&self) -> Result<Satoshi, ExceedsMaximumAmount> {
        let mut total = Satoshi::ZERO;
        for output in &self.outputs {
            total = total.checked_add(output.value)?;
        }
        Ok(total)
    }

    /// Whether this is a coinbase transaction: a single input spending
    /// the all-zero hash.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1
            && self.inputs[0].previous_output_hash == Hash::ZERO
            && self.inputs[0].previous_output_index == u32::MAX
    }
}

impl fmt::Display for Transaction {
    /// Displays the transaction as its hex-encoded serialization.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
