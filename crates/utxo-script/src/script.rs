//! The script codec: recognized locking-script templates and their
//! canonical opcode encoding.
//!
//! Decoding tokenizes the opcode stream once, fully consuming it, then
//! matches the token sequence against the known templates. Anything
//! well-formed but unrecognized becomes [`Script::Raw`], preserved
//! byte-for-byte, so decoding never rejects a script merely for being
//! nonstandard. Truncated push-data is the one structural error.

use std::fmt;

use crate::opcodes::*;
use crate::ScriptError;

/// Length of a HASH160 digest embedded in P2PKH and P2SH scripts.
pub const HASH160_LEN: usize = 20;

/// Length of a compressed secp256k1 public key.
pub const COMPRESSED_KEY_LEN: usize = 33;

/// A locking or unlocking script.
///
/// A closed set of recognized templates plus a raw fallback. The codec
/// guarantees `Script::decode(&s.encode()) == Ok(s)` for every value this
/// type can represent: template variants encode to their canonical minimal
/// opcode form, and `Raw` stores its bytes verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Script {
    /// `OP_DUP OP_HASH160 <20-byte hash> OP_EQUALVERIFY OP_CHECKSIG`
    PayToPublicKeyHash {
        /// HASH160 of the recipient's public key.
        hash: [u8; HASH160_LEN],
    },

    /// `OP_HASH160 <20-byte hash> OP_EQUAL`
    PayToScriptHash {
        /// HASH160 of the redeem script.
        hash: [u8; HASH160_LEN],
    },

    /// `OP_m <key>... OP_n OP_CHECKMULTISIG` over compressed public keys.
    MultiSignature {
        /// Number of signatures required to spend (`1..=16`).
        required: u8,
        /// The compressed public keys, in the order signatures must match.
        public_keys: Vec<[u8; COMPRESSED_KEY_LEN]>,
    },

    /// Any other opcode sequence, preserved byte-for-byte.
    Raw(Vec<u8>),
}

/// One parsed element of a script: an opcode, possibly carrying push data.
struct Token {
    op: u8,
    data: Option<Vec<u8>>,
}

impl Token {
    fn push_data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

impl Script {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// A pay-to-public-key-hash locking script for the given HASH160.
    pub fn pay_to_public_key_hash(hash: [u8; HASH160_LEN]) -> Self {
        Script::PayToPublicKeyHash { hash }
    }

    /// A pay-to-script-hash locking script for the given redeem-script
    /// HASH160.
    pub fn pay_to_script_hash(hash: [u8; HASH160_LEN]) -> Self {
        Script::PayToScriptHash { hash }
    }

    /// An m-of-n multisig locking script.
    ///
    /// # Returns
    /// The script, or [`ScriptError::InvalidPublicKeyCount`] unless
    /// `1 <= required <= public_keys.len() <= 16`.
    pub fn multi_signature(
        required: u8,
        public_keys: Vec<[u8; COMPRESSED_KEY_LEN]>,
    ) -> Result<Self, ScriptError> {
        let total = public_keys.len();
        if required == 0 || total == 0 || total > 16 || required as usize > total {
            return Err(ScriptError::InvalidPublicKeyCount { required, total });
        }
        Ok(Script::MultiSignature {
            required,
            public_keys,
        })
    }

    /// A raw script wrapping the given bytes verbatim.
    pub fn raw(bytes: Vec<u8>) -> Self {
        Script::Raw(bytes)
    }

    /// The empty script (an unsigned input's placeholder).
    pub fn empty() -> Self {
        Script::Raw(Vec::new())
    }

    // -----------------------------------------------------------------
    // Decoding
    // -----------------------------------------------------------------

    /// Decode a script from its opcode byte stream.
    ///
    /// Walks the stream once, consuming it fully. Recognition is tried in
    /// order: pay-to-public-key-hash, pay-to-script-hash, multisig; any
    /// other well-formed sequence decodes to [`Script::Raw`].
    ///
    /// Templates are recognized only in the canonical form the encoder
    /// emits (minimal direct pushes, compressed keys); look-alikes using
    /// longer push forms fall back to `Raw` so they re-encode unchanged.
    ///
    /// # Errors
    /// [`ScriptError::TruncatedScript`] when a push opcode runs past the
    /// end of the stream, and [`ScriptError::InvalidMultiSignatureScript`]
    /// when a multisig-shaped script declares a key count that does not
    /// match its embedded keys or has `required` exceeding it.
    pub fn decode(bytes: &[u8]) -> Result<Script, ScriptError> {
        let tokens = tokenize(bytes)?;

        if let Some(script) = match_pay_to_public_key_hash(&tokens) {
            return Ok(script);
        }
        if let Some(script) = match_pay_to_script_hash(&tokens) {
            return Ok(script);
        }
        if let Some(script) = match_multi_signature(&tokens)? {
            return Ok(script);
        }

        Ok(Script::Raw(bytes.to_vec()))
    }

    /// Decode a script embedded in transaction wire data.
    ///
    /// Transactions must round-trip even when they carry scripts whose
    /// push structure is malformed (the length prefix in the transaction,
    /// not the script's own opcodes, bounds the bytes). Such scripts are
    /// preserved as [`Script::Raw`] instead of failing the transaction.
    pub fn decode_or_raw(bytes: &[u8]) -> Script {
        match Script::decode(bytes) {
            Ok(script) => script,
            Err(_) => Script::Raw(bytes.to_vec()),
        }
    }

    /// Decode a script from a hex string.
    pub fn from_hex(hex_str: &str) -> Result<Script, ScriptError> {
        let bytes =
            hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Script::decode(&bytes)
    }

    // -----------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------

    /// Encode the script to its canonical opcode byte stream.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Script::PayToPublicKeyHash { hash } => {
                let mut bytes = Vec::with_capacity(25);
                bytes.push(OP_DUP);
                bytes.push(OP_HASH160);
                bytes.push(OP_DATA_20);
                bytes.extend_from_slice(hash);
                bytes.push(OP_EQUALVERIFY);
                bytes.push(OP_CHECKSIG);
                bytes
            }
            Script::PayToScriptHash { hash } => {
                let mut bytes = Vec::with_capacity(23);
                bytes.push(OP_HASH160);
                bytes.push(OP_DATA_20);
                bytes.extend_from_slice(hash);
                bytes.push(OP_EQUAL);
                bytes
            }
            Script::MultiSignature {
                required,
                public_keys,
            } => {
                let mut bytes = Vec::with_capacity(3 + 34 * public_keys.len());
                // Counts were validated at construction; fall back to OP_1
                // rather than panic if a hand-rolled value slips through.
                bytes.push(small_int_opcode(*required).unwrap_or(OP_1));
                for key in public_keys {
                    bytes.push(OP_DATA_33);
                    bytes.extend_from_slice(key);
                }
                bytes.push(small_int_opcode(public_keys.len() as u8).unwrap_or(OP_1));
                bytes.push(OP_CHECKMULTISIG);
                bytes
            }
            Script::Raw(bytes) => bytes.clone(),
        }
    }

    /// The length of [`encode`](Script::encode)'s output, without
    /// allocating.
    pub fn encoded_len(&self) -> usize {
        match self {
            Script::PayToPublicKeyHash { .. } => 25,
            Script::PayToScriptHash { .. } => 23,
            Script::MultiSignature { public_keys, .. } => 3 + 34 * public_keys.len(),
            Script::Raw(bytes) => bytes.len(),
        }
    }

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// Whether the script encodes to zero bytes.
    pub fn is_empty(&self) -> bool {
        self.encoded_len() == 0
    }
}

impl fmt::Display for Script {
    /// Displays the canonical encoding as lowercase hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------

/// Split a script byte stream into opcode tokens, validating push lengths.
fn tokenize(bytes: &[u8]) -> Result<Vec<Token>, ScriptError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];
        pos += 1;

        let push_len = match op {
            0x01..=OP_DATA_75 => Some(op as usize),
            OP_PUSHDATA1 => {
                let len = read_le_len(bytes, &mut pos, 1)?;
                Some(len)
            }
            OP_PUSHDATA2 => {
                let len = read_le_len(bytes, &mut pos, 2)?;
                Some(len)
            }
            OP_PUSHDATA4 => {
                let len = read_le_len(bytes, &mut pos, 4)?;
                Some(len)
            }
            _ => None,
        };

        match push_len {
            Some(len) => {
                let available = bytes.len() - pos;
                if len > available {
                    return Err(ScriptError::TruncatedScript {
                        wanted: len,
                        available,
                    });
                }
                tokens.push(Token {
                    op,
                    data: Some(bytes[pos..pos + len].to_vec()),
                });
                pos += len;
            }
            None => tokens.push(Token { op, data: None }),
        }
    }

    Ok(tokens)
}

/// Read an `n`-byte little-endian push length at `*pos`, advancing past it.
fn read_le_len(bytes: &[u8], pos: &mut usize, n: usize) -> Result<usize, ScriptError> {
    let available = bytes.len() - *pos;
    if n > available {
        return Err(ScriptError::TruncatedScript {
            wanted: n,
            available,
        });
    }
    let mut len = 0usize;
    for i in 0..n {
        len |= (bytes[*pos + i] as usize) << (8 * i);
    }
    *pos += n;
    Ok(len)
}

// ---------------------------------------------------------------------
// Template matchers
// ---------------------------------------------------------------------

/// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
fn match_pay_to_public_key_hash(tokens: &[Token]) -> Option<Script> {
    match tokens {
        [dup, hash160, push, equalverify, checksig]
            if dup.op == OP_DUP
                && hash160.op == OP_HASH160
                && push.op == OP_DATA_20
                && equalverify.op == OP_EQUALVERIFY
                && checksig.op == OP_CHECKSIG =>
        {
            let hash: [u8; HASH160_LEN] = push.push_data()?.try_into().ok()?;
            Some(Script::PayToPublicKeyHash { hash })
        }
        _ => None,
    }
}

/// `OP_HASH160 <20> OP_EQUAL`
fn match_pay_to_script_hash(tokens: &[Token]) -> Option<Script> {
    match tokens {
        [hash160, push, equal]
            if hash160.op == OP_HASH160 && push.op == OP_DATA_20 && equal.op == OP_EQUAL =>
        {
            let hash: [u8; HASH160_LEN] = push.push_data()?.try_into().ok()?;
            Some(Script::PayToScriptHash { hash })
        }
        _ => None,
    }
}

/// `OP_m <push>{1..16} OP_n OP_CHECKMULTISIG`
///
/// Returns `Ok(None)` when the token stream does not have the multisig
/// shape, `Err` when it does but its counts are inconsistent.
fn match_multi_signature(tokens: &[Token]) -> Result<Option<Script>, ScriptError> {
    if tokens.len() < 4 {
        return Ok(None);
    }
    let first = &tokens[0];
    let second_last = &tokens[tokens.len() - 2];
    let last = &tokens[tokens.len() - 1];
    let middle = &tokens[1..tokens.len() - 2];

    let shape_matches = last.op == OP_CHECKMULTISIG
        && is_small_int(first.op)
        && is_small_int(second_last.op)
        && middle.iter().all(|t| t.data.is_some());
    if !shape_matches {
        return Ok(None);
    }

    // The shape check guarantees both opcodes are small integers.
    let required = small_int_value(first.op).unwrap_or(0);
    let declared = small_int_value(second_last.op).unwrap_or(0);
    let actual = middle.len();

    if actual != declared as usize || required > declared {
        return Err(ScriptError::InvalidMultiSignatureScript {
            required,
            declared,
            actual: actual.min(u8::MAX as usize) as u8,
        });
    }

    // Counts line up; keys must additionally be canonical 33-byte pushes
    // for the template to round-trip, otherwise the script stays raw.
    let mut public_keys: Vec<[u8; COMPRESSED_KEY_LEN]> = Vec::with_capacity(actual);
    for token in middle {
        if token.op != OP_DATA_33 {
            return Ok(None);
        }
        match token.push_data().map(TryInto::try_into) {
            Some(Ok(key)) => public_keys.push(key),
            _ => return Ok(None),
        }
    }

    Ok(Some(Script::MultiSignature {
        required,
        public_keys,
    }))
}

// ---------------------------------------------------------------------
// Push-data assembly
// ---------------------------------------------------------------------

/// Append `data` to a script buffer under the minimal push prefix.
///
/// Direct push for up to 75 bytes, then `OP_PUSHDATA1`/`2`/`4` by range.
///
/// # Errors
/// [`ScriptError::PushTooLarge`] if `data` exceeds `u32::MAX` bytes.
pub fn append_push_data(script: &mut Vec<u8>, data: &[u8]) -> Result<(), ScriptError> {
    match data.len() {
        len if len <= OP_DATA_75 as usize => script.push(len as u8),
        len if len <= 0xff => {
            script.push(OP_PUSHDATA1);
            script.push(len as u8);
        }
        len if len <= 0xffff => {
            script.push(OP_PUSHDATA2);
            script.extend_from_slice(&(len as u16).to_le_bytes());
        }
        len if len <= 0xffff_ffff => {
            script.push(OP_PUSHDATA4);
            script.extend_from_slice(&(len as u32).to_le_bytes());
        }
        len => return Err(ScriptError::PushTooLarge(len)),
    }
    script.extend_from_slice(data);
    Ok(())
}
