//! Deterministic ordering of transaction outputs and inputs.
//!
//! The canonical ordering (BIP-69) removes the information leak of
//! wallet-chosen output placement: any party re-sorting the same output
//! set arrives at the identical transaction.

use std::cmp::Ordering;

use crate::input::Input;
use crate::output::Output;

/// How the builder arranges the combined recipient-plus-change outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputOrdering {
    /// Keep the caller's order. Needed when a protocol pins outputs to
    /// specific slots, e.g. data-payload-first transactions.
    AsGiven,

    /// Canonical BIP-69 order: value ascending, then encoded locking
    /// script bytes ascending.
    #[default]
    CanonicalBip69,
}

/// Apply an ordering strategy to an output set.
///
/// `CanonicalBip69` is a strict total order over
/// `(value, encoded script)`, so the result is independent of the input
/// permutation.
pub fn order_outputs(outputs: Vec<Output>, ordering: OutputOrdering) -> Vec<Output> {
    match ordering {
        OutputOrdering::AsGiven => outputs,
        OutputOrdering::CanonicalBip69 => {
            let mut sorted = outputs;
            sorted.sort_by(|a, b| match a.value.cmp(&b.value) {
                Ordering::Equal => a.locking_script.encode().cmp(&b.locking_script.encode()),
                other => other,
            });
            sorted
        }
    }
}

/// Sort inputs canonically: previous output hash (internal byte order)
/// ascending, then previous output index ascending.
pub fn sort_inputs(inputs: &mut [Input]) {
    inputs.sort_by(|a, b| {
        match a
            .previous_output_hash
            .as_internal_bytes()
            .cmp(b.previous_output_hash.as_internal_bytes())
        {
            Ordering::Equal => a.previous_output_index.cmp(&b.previous_output_index),
            other => other,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FINAL_SEQUENCE;
    use utxo_primitives::{Hash, Satoshi};
    use utxo_script::Script;

    fn output(value: u64, script_hex: &str) -> Output {
        Output::new(
            Satoshi::from_sat(value),
            Script::from_hex(script_hex).unwrap(),
        )
    }

    // Vectors from the BIP-69 published test set.

    #[test]
    fn outputs_sort_by_value_first() {
        let unsorted = vec![
            output(
                40_000_000_000,
                "76a9145be32612930b8323add2212a4ec03c1562084f8488ac",
            ),
            output(
                400_057_456,
                "76a9144a5fba237213a062f6f57978f796390bdcf8d01588ac",
            ),
        ];
        let sorted = order_outputs(unsorted, OutputOrdering::CanonicalBip69);
        assert_eq!(sorted[0].value, Satoshi::from_sat(400_057_456));
        assert_eq!(sorted[1].value, Satoshi::from_sat(40_000_000_000));
    }

    #[test]
    fn equal_values_sort_by_script_bytes() {
        let unsorted = vec![
            output(1_000, "76a9145be32612930b8323add2212a4ec03c1562084f8488ac"),
            output(1_000, "76a9144a5fba237213a062f6f57978f796390bdcf8d01588ac"),
        ];
        let sorted = order_outputs(unsorted, OutputOrdering::CanonicalBip69);
        assert_eq!(
            sorted[0].locking_script.to_hex(),
            "76a9144a5fba237213a062f6f57978f796390bdcf8d01588ac"
        );
        assert_eq!(
            sorted[1].locking_script.to_hex(),
            "76a9145be32612930b8323add2212a4ec03c1562084f8488ac"
        );
    }

    #[test]
    fn as_given_is_the_identity() {
        let outputs = vec![
            output(9_000, "76a9145be32612930b8323add2212a4ec03c1562084f8488ac"),
            output(1_000, "76a9144a5fba237213a062f6f57978f796390bdcf8d01588ac"),
        ];
        let kept = order_outputs(outputs.clone(), OutputOrdering::AsGiven);
        assert_eq!(kept, outputs);
    }

    #[test]
    fn canonical_order_is_permutation_independent() {
        let base = vec![
            output(3_000, "76a9145be32612930b8323add2212a4ec03c1562084f8488ac"),
            output(1_000, "76a9144a5fba237213a062f6f57978f796390bdcf8d01588ac"),
            output(1_000, "76a9145be32612930b8323add2212a4ec03c1562084f8488ac"),
            output(6_000, "76a9144a5fba237213a062f6f57978f796390bdcf8d01588ac"),
        ];
        let reference = order_outputs(base.clone(), OutputOrdering::CanonicalBip69);

        // Rotate through several permutations; all must agree.
        let mut permuted = base;
        for _ in 0..4 {
            permuted.rotate_left(1);
            let sorted = order_outputs(permuted.clone(), OutputOrdering::CanonicalBip69);
            assert_eq!(sorted, reference);
        }
    }

    fn input(hash_first_byte: u8, index: u32) -> Input {
        let mut bytes = [0u8; 32];
        bytes[0] = hash_first_byte;
        Input {
            previous_output_hash: Hash::from_internal_bytes(bytes),
            previous_output_index: index,
            unlocking_script: Script::empty(),
            sequence: FINAL_SEQUENCE,
        }
    }

    #[test]
    fn inputs_sort_by_internal_hash_bytes_then_index() {
        let mut inputs = vec![input(0xcc, 0), input(0xaa, 1), input(0xaa, 0), input(0x0b, 7)];
        sort_inputs(&mut inputs);
        assert_eq!(
            inputs
                .iter()
                .map(|i| (i.previous_output_hash.as_internal_bytes()[0], i.previous_output_index))
                .collect::<Vec<_>>(),
            vec![(0x0b, 7), (0xaa, 0), (0xaa, 1), (0xcc, 0)]
        );
    }

    #[test]
    fn same_outpoint_hash_orders_by_index() {
        let mut inputs = vec![input(0x35, 1), input(0x35, 0)];
        sort_inputs(&mut inputs);
        assert_eq!(inputs[0].previous_output_index, 0);
        assert_eq!(inputs[1].previous_output_index, 1);
    }
}
