/// Error types for primitive operations.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// Ran out of bytes while reading a fixed-size or length-prefixed field.
    #[error("unexpected end of data")]
    UnexpectedEof,

    /// A hash string or byte slice had the wrong length.
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

/// Arithmetic on [`Satoshi`](crate::Satoshi) values overflowed the maximum
/// representable amount.
///
/// Monetary arithmetic never wraps or saturates; any operation that would
/// exceed `u64::MAX` fails with this error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("amount exceeds the maximum representable value")]
pub struct ExceedsMaximumAmount;
