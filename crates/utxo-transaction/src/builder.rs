//! Assembles fully signed transactions from spendable coins, recipients,
//! and policy.
//!
//! The build pipeline: validate signing material, total the coins and
//! recipients under checked arithmetic, compute the fee from a worst-case
//! size estimate, append change (or absorb sub-dust change into the fee),
//! order the outputs, then sign every input through the external
//! [`Signer`] and assemble the final immutable [`Transaction`]. Building
//! either fully succeeds or fails; no partially signed transaction is
//! ever returned.

use utxo_primitives::Satoshi;
use utxo_script::{append_push_data, opcodes, Script};

use crate::fees::{self, InputScriptKind};
use crate::input::{Input, FINAL_SEQUENCE};
use crate::ordering::{self, OutputOrdering};
use crate::output::Output;
use crate::sighash;
use crate::signer::{SignatureFormat, Signer, SigningKey};
use crate::transaction::Transaction;
use crate::utxo::UnspentOutput;
use crate::BuildError;

/// Smallest change value worth creating an output for; anything below is
/// left to the fee.
pub const DEFAULT_DUST_THRESHOLD: Satoshi = Satoshi::from_sat(546);

/// The signing material mapped to one spendable coin.
///
/// Keys are ordered: for multisig and pay-to-script-hash coins the
/// signatures must appear in the same relative order as the keys in the
/// (redeem) script, and the builder signs with the first `required` keys
/// as given here.
#[derive(Clone, Debug)]
pub struct SigningMaterial {
    /// The keys to sign with, in script key order.
    pub keys: Vec<SigningKey>,

    /// The redeem script, required when the coin's locking script is
    /// pay-to-script-hash.
    pub redeem_script: Option<Script>,
}

impl SigningMaterial {
    /// Material for a single-key coin.
    pub fn single(key: SigningKey) -> Self {
        SigningMaterial {
            keys: vec![key],
            redeem_script: None,
        }
    }

    /// Material for a multi-key coin.
    pub fn multi(keys: Vec<SigningKey>) -> Self {
        SigningMaterial {
            keys,
            redeem_script: None,
        }
    }

    /// Attach the redeem script for a pay-to-script-hash coin.
    pub fn with_redeem_script(mut self, redeem_script: Script) -> Self {
        self.redeem_script = Some(redeem_script);
        self
    }
}

/// Builds complete, signed transactions.
///
/// Configuration is policy: ordering strategy, signature format, fee
/// rate, dust threshold, and sighash type. The coin list, recipients,
/// and change script arrive per [`build`](TransactionBuilder::build)
/// call.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    version: i32,
    lock_time: u32,
    ordering: OutputOrdering,
    signature_format: SignatureFormat,
    fee_per_byte: Satoshi,
    dust_threshold: Satoshi,
    sighash_type: u32,
}

impl TransactionBuilder {
    /// A builder with default policy: version 1, lock time 0, canonical
    /// output ordering, ECDSA signatures, zero fee rate, and the standard
    /// dust threshold.
    pub fn new() -> Self {
        TransactionBuilder {
            version: 1,
            lock_time: 0,
            ordering: OutputOrdering::CanonicalBip69,
            signature_format: SignatureFormat::Ecdsa,
            fee_per_byte: Satoshi::ZERO,
            dust_threshold: DEFAULT_DUST_THRESHOLD,
            sighash_type: sighash::SIGHASH_ALL,
        }
    }

    /// Set the transaction version.
    pub fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Set the lock time.
    pub fn lock_time(mut self, lock_time: u32) -> Self {
        self.lock_time = lock_time;
        self
    }

    /// Set the output ordering strategy.
    pub fn ordering(mut self, ordering: OutputOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Set the signature format requested from the signer.
    pub fn signature_format(mut self, format: SignatureFormat) -> Self {
        self.signature_format = format;
        self
    }

    /// Set the fee rate in satoshis per serialized byte.
    pub fn fee_per_byte(mut self, rate: Satoshi) -> Self {
        self.fee_per_byte = rate;
        self
    }

    /// Set the dust threshold below which change is left to the fee.
    pub fn dust_threshold(mut self, threshold: Satoshi) -> Self {
        self.dust_threshold = threshold;
        self
    }

    /// Set the sighash type flags committed to by every signature.
    pub fn sighash_type(mut self, sighash_type: u32) -> Self {
        self.sighash_type = sighash_type;
        self
    }

    /// Build a fully signed transaction.
    ///
    /// # Arguments
    /// * `signer` - The signing collaborator.
    /// * `coins` - The coins to spend with their signing material; the
    ///   slice order is the input order of the final transaction.
    /// * `recipients` - Outputs to pay.
    /// * `change_script` - Locking script for the change output, if one
    ///   is created.
    ///
    /// # Errors
    /// Any of the [`BuildError`] variants; the build is all-or-nothing.
    pub fn build<S: Signer>(
        &self,
        signer: &S,
        coins: &[(UnspentOutput, SigningMaterial)],
        recipients: &[Output],
        change_script: &Script,
    ) -> Result<Transaction, BuildError> {
        // Every coin needs signing material before anything else runs.
        for (coin, material) in coins {
            if material.keys.is_empty() {
                return Err(unmapped(coin));
            }
        }

        let mut input_kinds = Vec::with_capacity(coins.len());
        for (index, (coin, material)) in coins.iter().enumerate() {
            input_kinds.push(input_script_kind(index, coin, material)?);
        }

        // Checked totals: no value may be created or lost.
        let mut total_input = Satoshi::ZERO;
        for (coin, _) in coins {
            total_input = total_input.checked_add(coin.value)?;
        }
        let mut total_recipient = Satoshi::ZERO;
        for output in recipients {
            total_recipient = total_recipient.checked_add(output.value)?;
        }

        // Fee from a worst-case size that already includes the change
        // output; overpaying a few bytes beats a rejected transaction.
        let mut planned = recipients.to_vec();
        planned.push(Output::new(Satoshi::ZERO, change_script.clone()));
        let size = fees::estimated_size(&input_kinds, &planned, self.signature_format);
        let fee = fees::fee_for_size(size, self.fee_per_byte)?;

        let needed = total_recipient.checked_add(fee)?;
        let mut outputs = recipients.to_vec();
        match total_input.checked_sub(needed) {
            None => {
                let shortfall = needed.checked_sub(total_input).unwrap_or(Satoshi::ZERO);
                return Err(BuildError::InsufficientFunds { shortfall });
            }
            Some(change) if change >= self.dust_threshold => {
                outputs.push(Output::new(change, change_script.clone()));
            }
            // Sub-dust change is absorbed into the fee.
            Some(_) => {}
        }

        let outputs = ordering::order_outputs(outputs, self.ordering);

        // Inputs in coin-slice order, unsigned.
        let inputs: Vec<Input> = coins
            .iter()
            .map(|(coin, _)| Input {
                previous_output_hash: coin.previous_transaction_hash,
                previous_output_index: coin.previous_output_index,
                unlocking_script: Script::empty(),
                sequence: FINAL_SEQUENCE,
            })
            .collect();

        let unsigned = Transaction {
            version: self.version,
            inputs,
            outputs,
            lock_time: self.lock_time,
        };

        // Each input's unlocking script is computed independently of the
        // others and joined back by index, so signing completion order
        // can never influence the final transaction.
        let mut unlocking_scripts: Vec<Option<Script>> = vec![None; coins.len()];
        for (index, (coin, material)) in coins.iter().enumerate() {
            let script = self.unlocking_script_for(signer, &unsigned, index, coin, material)?;
            unlocking_scripts[index] = Some(script);
        }

        let mut transaction = unsigned;
        for (input, script) in transaction.inputs.iter_mut().zip(unlocking_scripts) {
            if let Some(script) = script {
                input.unlocking_script = script;
            }
        }

        Ok(transaction)
    }

    /// Produce the unlocking script for one input.
    fn unlocking_script_for<S: Signer>(
        &self,
        signer: &S,
        tx: &Transaction,
        index: usize,
        coin: &UnspentOutput,
        material: &SigningMaterial,
    ) -> Result<Script, BuildError> {
        match &coin.locking_script {
            Script::PayToPublicKeyHash { .. } => {
                let script_code = coin.locking_script.encode();
                let key = &material.keys[0];
                let signature =
                    self.sign_input(signer, tx, index, &script_code, coin.value, key)?;

                // <signature> <compressed public key>
                let mut bytes = Vec::with_capacity(signature.len() + 35);
                append_push_data(&mut bytes, &signature)?;
                append_push_data(&mut bytes, key.public_key())?;
                Ok(Script::raw(bytes))
            }
            Script::MultiSignature { required, .. } => {
                let script_code = coin.locking_script.encode();
                self.multi_signature_unlock(
                    signer,
                    tx,
                    index,
                    &script_code,
                    coin.value,
                    material,
                    *required,
                    false,
                )
            }
            Script::PayToScriptHash { .. } => {
                let redeem = material
                    .redeem_script
                    .as_ref()
                    .ok_or(BuildError::MissingRedeemScript { index })?;
                let Script::MultiSignature { required, .. } = redeem else {
                    return Err(BuildError::UnsupportedLockingScript { index });
                };
                let script_code = redeem.encode();
                self.multi_signature_unlock(
                    signer,
                    tx,
                    index,
                    &script_code,
                    coin.value,
                    material,
                    *required,
                    true,
                )
            }
            Script::Raw(_) => Err(BuildError::UnsupportedLockingScript { index }),
        }
    }

    /// `OP_0 <sig>...` for bare multisig, plus the trailing redeem-script
    /// push for pay-to-script-hash spends.
    #[allow(clippy::too_many_arguments)]
    fn multi_signature_unlock<S: Signer>(
        &self,
        signer: &S,
        tx: &Transaction,
        index: usize,
        script_code: &[u8],
        value: Satoshi,
        material: &SigningMaterial,
        required: u8,
        push_redeem: bool,
    ) -> Result<Script, BuildError> {
        // The leading OP_0 feeds OP_CHECKMULTISIG's extra stack pop.
        let mut bytes = vec![opcodes::OP_0];
        for key in material.keys.iter().take(required as usize) {
            let signature = self.sign_input(signer, tx, index, script_code, value, key)?;
            append_push_data(&mut bytes, &signature)?;
        }
        if push_redeem {
            append_push_data(&mut bytes, script_code)?;
        }
        Ok(Script::raw(bytes))
    }

    /// Digest, sign, and append the sighash-type byte for one input.
    fn sign_input<S: Signer>(
        &self,
        signer: &S,
        tx: &Transaction,
        index: usize,
        script_code: &[u8],
        value: Satoshi,
        key: &SigningKey,
    ) -> Result<Vec<u8>, BuildError> {
        let digest = sighash::signature_hash(tx, index, script_code, self.sighash_type, value)?;
        let mut signature = signer
            .sign(&digest, key, self.signature_format)
            .map_err(|source| BuildError::SigningFailed { index, source })?;
        signature.push(self.sighash_type as u8);
        Ok(signature)
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The fee-relevant shape of a coin's locking script, with the signing
/// material validated against it.
fn input_script_kind(
    index: usize,
    coin: &UnspentOutput,
    material: &SigningMaterial,
) -> Result<InputScriptKind, BuildError> {
    match &coin.locking_script {
        Script::PayToPublicKeyHash { .. } => Ok(InputScriptKind::PayToPublicKeyHash),
        Script::MultiSignature {
            required,
            public_keys,
        } => {
            ensure_enough_keys(coin, material, *required)?;
            Ok(InputScriptKind::MultiSignature {
                required: *required,
                total: public_keys.len() as u8,
            })
        }
        Script::PayToScriptHash { .. } => {
            let redeem = material
                .redeem_script
                .as_ref()
                .ok_or(BuildError::MissingRedeemScript { index })?;
            match redeem {
                Script::MultiSignature {
                    required,
                    public_keys,
                } => {
                    ensure_enough_keys(coin, material, *required)?;
                    Ok(InputScriptKind::PayToScriptHash {
                        required: *required,
                        total: public_keys.len() as u8,
                    })
                }
                _ => Err(BuildError::UnsupportedLockingScript { index }),
            }
        }
        Script::Raw(_) => Err(BuildError::UnsupportedLockingScript { index }),
    }
}

/// A multisig coin without enough keys to reach its threshold is as
/// unspendable as one with none.
fn ensure_enough_keys(
    coin: &UnspentOutput,
    material: &SigningMaterial,
    required: u8,
) -> Result<(), BuildError> {
    if material.keys.len() < required as usize {
        return Err(unmapped(coin));
    }
    Ok(())
}

fn unmapped(coin: &UnspentOutput) -> BuildError {
    BuildError::UnmappedUnspentOutput {
        txid: coin.previous_transaction_hash,
        vout: coin.previous_output_index,
    }
}
