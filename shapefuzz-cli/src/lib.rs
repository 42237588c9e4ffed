//! Library entry for shapefuzz-cli used by integration tests and embedding.

pub mod commands;

// Re-export commands for convenience
pub use commands::*;

/// Cursor primitive replayed by `draw`
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    /// One raw byte
    U8,
    /// Two bytes plus an endianness control byte
    U16,
    /// One seed byte
    U32,
    /// Eight bytes plus an endianness control byte
    U64,
    /// One seed byte as a signed integer
    Int,
    /// One byte, even is true
    Bool,
    /// Four bytes plus an endianness control byte
    F32,
    /// Eight bytes plus an endianness control byte
    F64,
    /// Length-prefixed raw bytes
    Bytes,
    /// Length-prefixed text
    String,
    /// Length-prefixed text as characters
    Chars,
}
