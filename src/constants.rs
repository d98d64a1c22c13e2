//! Fixed header, MCF type tags, and normative limits for MAP v1.1.
//!
//! Nothing in this module is configurable: CANON_BYTES must be
//! byte-identical across implementations, so every value here is a
//! compile-time constant, never a runtime setting.

/// Five-byte canonical header: ASCII `"MAP1"` followed by a NUL terminator.
///
/// Fixed for the life of major version 1 — it is framing, not a
/// negotiable version field.
pub const CANON_HDR: &[u8; 5] = b"MAP1\0";

/// MCF tag byte for [`crate::value::CanonicalValue::String`].
pub const TAG_STRING: u8 = 0x01;
/// MCF tag byte for [`crate::value::CanonicalValue::Bytes`].
pub const TAG_BYTES: u8 = 0x02;
/// MCF tag byte for [`crate::value::CanonicalValue::List`].
pub const TAG_LIST: u8 = 0x03;
/// MCF tag byte for [`crate::value::CanonicalValue::Map`].
pub const TAG_MAP: u8 = 0x04;
/// MCF tag byte for [`crate::value::CanonicalValue::Boolean`] (v1.1).
pub const TAG_BOOLEAN: u8 = 0x05;
/// MCF tag byte for [`crate::value::CanonicalValue::Integer`] (v1.1).
pub const TAG_INTEGER: u8 = 0x06;

/// Minimum value representable by the INTEGER variant (signed 64-bit).
pub const INT64_MIN: i64 = i64::MIN;
/// Maximum value representable by the INTEGER variant (signed 64-bit).
pub const INT64_MAX: i64 = i64::MAX;

/// Maximum length, in bytes, of CANON_BYTES or any JSON-STRICT input (1 MiB).
pub const MAX_CANON_BYTES: usize = 1_048_576;
/// Maximum container nesting depth. The root container counts as depth 1.
pub const MAX_DEPTH: u32 = 32;
/// Maximum number of entries in a single MAP.
pub const MAX_MAP_ENTRIES: usize = 65_535;
/// Maximum number of entries in a single LIST.
pub const MAX_LIST_ENTRIES: usize = 65_535;
