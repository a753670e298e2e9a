//! Spendable coins: outputs of prior transactions.

use utxo_primitives::{Hash, Satoshi};
use utxo_script::Script;

/// An unspent transaction output — a spendable coin.
///
/// Identifies the coin by its creating transaction's hash and output
/// index, and carries the value and locking script the spending input
/// must satisfy. Equality and hashing cover all four fields, so the type
/// is usable as a map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnspentOutput {
    /// Hash of the transaction that created this output.
    pub previous_transaction_hash: Hash,

    /// Index of this output within that transaction.
    pub previous_output_index: u32,

    /// Value of the coin.
    pub value: Satoshi,

    /// Locking script the spending input must satisfy.
    pub locking_script: Script,
}

impl UnspentOutput {
    /// Create an unspent output from its outpoint, value, and locking
    /// script.
    pub fn new(
        previous_transaction_hash: Hash,
        previous_output_index: u32,
        value: Satoshi,
        locking_script: Script,
    ) -> Self {
        UnspentOutput {
            previous_transaction_hash,
            previous_output_index,
            value,
            locking_script,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn usable_as_map_key_over_all_fields() {
        let hash = Hash::double_sha256(b"funding");
        let coin = UnspentOutput::new(
            hash,
            0,
            Satoshi::from_sat(10_000),
            Script::pay_to_public_key_hash([0xab; 20]),
        );

        let mut map = HashMap::new();
        map.insert(coin.clone(), "key material");
        assert_eq!(map.get(&coin), Some(&"key material"));

        // A different output index is a different coin.
        let sibling = UnspentOutput {
            previous_output_index: 1,
            ..coin
        };
        assert_eq!(map.get(&sibling), None);
    }
}
