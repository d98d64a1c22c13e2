//! The canonical value model: a tagged sum over exactly six
//! variants. No other shape is representable by this type — that is the
//! point. Hosts that need floats, `null`, or richer numeric types must
//! convert before reaching this layer (see [`crate::prepare`] for one
//! such lossy bridge).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A MAP v1.1 canonical value.
///
/// `Map` entries are stored in caller-supplied order. Sorting,
/// uniqueness, and UTF-8 validation of keys happen at encode/decode
/// time ([`crate::mcf`]), not here — this is what makes permuting a
/// `Map`'s entries before encoding a true no-op on the resulting
/// `CANON_BYTES` (the reordering-invariance property), rather than
/// something callers have to arrange themselves.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CanonicalValue {
    /// Well-formed scalar UTF-8 text.
    String(String),
    /// Arbitrary 8-bit bytes.
    Bytes(Vec<u8>),
    /// An ordered sequence of canonical values (at most 65,535 entries).
    List(Vec<CanonicalValue>),
    /// An unordered set of (key, value) pairs, keys are [`CanonicalValue::String`].
    ///
    /// Stored as a `Vec` rather than a `BTreeMap` deliberately: the
    /// key order is unsigned-octet memcmp order over UTF-8 bytes, not
    /// Rust `String`'s `Ord` (which happens to coincide for valid UTF-8,
    /// but this type does not rely on that coincidence — see
    /// [`crate::keycmp`]). A `Vec` also lets callers round-trip
    /// insertion order for non-canonical inspection before encoding.
    Map(Vec<(String, CanonicalValue)>),
    /// A single boolean bit.
    Boolean(bool),
    /// A signed 64-bit integer.
    Integer(i64),
}

impl CanonicalValue {
    /// Convenience constructor for [`CanonicalValue::String`].
    pub fn string(s: impl Into<String>) -> Self {
        CanonicalValue::String(s.into())
    }

    /// Convenience constructor for [`CanonicalValue::Bytes`].
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        CanonicalValue::Bytes(b.into())
    }

    /// Convenience constructor for [`CanonicalValue::Map`] from an
    /// iterator of (key, value) pairs in any order.
    pub fn map(entries: impl IntoIterator<Item = (String, CanonicalValue)>) -> Self {
        CanonicalValue::Map(entries.into_iter().collect())
    }

    /// Convenience constructor for [`CanonicalValue::List`].
    pub fn list(items: impl IntoIterator<Item = CanonicalValue>) -> Self {
        CanonicalValue::List(items.into_iter().collect())
    }
}

impl From<&str> for CanonicalValue {
    fn from(s: &str) -> Self {
        CanonicalValue::String(s.to_owned())
    }
}

impl From<String> for CanonicalValue {
    fn from(s: String) -> Self {
        CanonicalValue::String(s)
    }
}

impl From<bool> for CanonicalValue {
    fn from(b: bool) -> Self {
        CanonicalValue::Boolean(b)
    }
}

impl From<i64> for CanonicalValue {
    fn from(n: i64) -> Self {
        CanonicalValue::Integer(n)
    }
}

impl From<Vec<u8>> for CanonicalValue {
    fn from(b: Vec<u8>) -> Self {
        CanonicalValue::Bytes(b)
    }
}
