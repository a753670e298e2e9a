//! UTXO wallet SDK - locking/unlocking script codec.
//!
//! Provides the [`Script`] type: a closed set of recognized locking-script
//! templates with a raw fallback, and the bidirectional mapping between
//! those templates and the opcode byte stream.

pub mod opcodes;
pub mod script;

mod error;
pub use error::ScriptError;
pub use script::{append_push_data, Script};
