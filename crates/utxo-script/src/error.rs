/// Error types for script encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// A push opcode declared more data than the script contains.
    #[error("script truncated inside a push of {wanted} bytes ({available} available)")]
    TruncatedScript {
        /// Bytes the push opcode declared.
        wanted: usize,
        /// Bytes actually remaining in the script.
        available: usize,
    },

    /// A multisig script's declared key count does not match its embedded
    /// keys, or its required/total counts are out of range.
    #[error(
        "invalid multisig script: {required} required of {declared} declared, \
         {actual} keys embedded"
    )]
    InvalidMultiSignatureScript {
        /// Required-signature count from the leading small-integer opcode.
        required: u8,
        /// Key count declared by the trailing small-integer opcode.
        declared: u8,
        /// Number of key pushes actually embedded.
        actual: u8,
    },

    /// Multisig construction with counts outside `1..=16` or with
    /// `required` exceeding the number of keys.
    #[error("multisig needs 1..=16 keys and required <= total, got {required} of {total}")]
    InvalidPublicKeyCount {
        /// Requested required-signature count.
        required: u8,
        /// Number of public keys supplied.
        total: usize,
    },

    /// Push data longer than the maximum encodable length.
    #[error("push of {0} bytes exceeds the maximum encodable length")]
    PushTooLarge(usize),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}
