//! The nine-code error taxonomy and its fixed precedence.
//!
//! When more than one violation applies to the same input, callers that
//! collect several candidate codes (the JSON-STRICT adapter's deferred
//! duplicate-key check is the one place this happens in practice) should
//! report [`MapError::highest_precedence`] rather than the first one
//! detected.

/// A MAP v1.1 processing error.
///
/// Every variant corresponds to exactly one `ERR_*` code.
/// The precedence order below (lowest index wins) is normative and is
/// exercised by [`MapError::precedence_index`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Bad 5-byte `CANON_HDR` prefix.
    #[error("bad CANON_HDR: {0}")]
    CanonHdr(String),
    /// Malformed MCF structure: truncation, unknown tag, bad boolean
    /// payload byte, trailing bytes, or a raw JSON parse failure.
    #[error("malformed MCF: {0}")]
    CanonMcf(String),
    /// Shape violation: non-MAP BIND root, malformed/duplicate pointer,
    /// LIST traversal under BIND, a UTF-8 BOM, or an unsupported host type.
    #[error("schema violation: {0}")]
    Schema(String),
    /// Present-but-forbidden value kind: JSON `null`, a float token, or
    /// an integer token outside the signed-64 range.
    #[error("forbidden type: {0}")]
    Type(String),
    /// Invalid UTF-8 or a surrogate code point (U+D800..=U+DFFF).
    #[error("invalid UTF-8: {0}")]
    Utf8(String),
    /// Duplicate key in a MAP or JSON object.
    #[error("duplicate key: {0}")]
    DupKey(String),
    /// MCF bytes present map keys out of ascending memcmp order.
    #[error("key order violation: {0}")]
    KeyOrder(String),
    /// Container nesting exceeds [`crate::constants::MAX_DEPTH`].
    #[error("nesting depth exceeds limit: {0}")]
    LimitDepth(String),
    /// Input/output size or container entry count exceeds a normative limit.
    #[error("size limit exceeded: {0}")]
    LimitSize(String),
}

impl MapError {
    /// Returns the `ERR_*` code conformance vectors compare against.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            MapError::CanonHdr(_) => "ERR_CANON_HDR",
            MapError::CanonMcf(_) => "ERR_CANON_MCF",
            MapError::Schema(_) => "ERR_SCHEMA",
            MapError::Type(_) => "ERR_TYPE",
            MapError::Utf8(_) => "ERR_UTF8",
            MapError::DupKey(_) => "ERR_DUP_KEY",
            MapError::KeyOrder(_) => "ERR_KEY_ORDER",
            MapError::LimitDepth(_) => "ERR_LIMIT_DEPTH",
            MapError::LimitSize(_) => "ERR_LIMIT_SIZE",
        }
    }

    /// Returns this error's position in the fixed precedence order
    /// (index 0 is highest precedence).
    #[must_use]
    pub fn precedence_index(&self) -> usize {
        match self {
            MapError::CanonHdr(_) => 0,
            MapError::CanonMcf(_) => 1,
            MapError::Schema(_) => 2,
            MapError::Type(_) => 3,
            MapError::Utf8(_) => 4,
            MapError::DupKey(_) => 5,
            MapError::KeyOrder(_) => 6,
            MapError::LimitDepth(_) => 7,
            MapError::LimitSize(_) => 8,
        }
    }

    /// Given several candidate violations, returns the one with the
    /// highest precedence (lowest [`Self::precedence_index`]).
    ///
    /// Mirrors the deferred-duplicate-key pattern: the JSON-STRICT
    /// adapter keeps parsing after the first duplicate key so that a
    /// later `ERR_TYPE` (null, float) or `ERR_UTF8` can still win.
    #[must_use]
    pub fn highest_precedence(errors: Vec<MapError>) -> Option<MapError> {
        errors
            .into_iter()
            .min_by_key(MapError::precedence_index)
    }
}

/// Result alias used throughout this crate's public API.
pub type MapResult<T> = Result<T, MapError>;
