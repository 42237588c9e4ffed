//! Defaults and caps shared by the cursor and the generator

/// Default recursion ceiling for a single traversal
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Default cap on cursor position and on any single length-framed read (2 MB)
pub const DEFAULT_MAX_CONSUMABLE: usize = 2_000_000;

/// Element cap for sequences of arbitrary element types
pub const DEFAULT_ELEMENT_CAP: u32 = 50;

/// Element cap for byte sequences
///
/// Bytes are cheap to materialize, so this is effectively unbounded; the
/// remaining cursor budget clamps the count well before it matters.
pub const BYTE_ELEMENT_CAP: u32 = 10_000_000;

/// Entry cap for associative collections
pub const MAP_ENTRY_CAP: i64 = 50;

/// Number of successfully populated elements after which a failing sequence
/// is truncated instead of discarded
pub const PARTIAL_SEQUENCE_MIN: usize = 10;

/// The nil gate byte is reduced modulo this scale before being compared
/// against `nil_chance * NIL_GATE_SCALE`
pub const NIL_GATE_SCALE: u8 = 10;

/// Size of the endianness control byte trailing multi-byte scalar reads
pub const ENDIAN_CONTROL_SIZE: usize = 1;
