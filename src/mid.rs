//! MID composition: `"map1:"` + lowercase hex SHA-256 of `CANON_BYTES`.

use sha2::{Digest, Sha256};

use crate::error::MapError;
use crate::mcf::canon_bytes_from_value;
use crate::value::CanonicalValue;

/// The fixed MID prefix.
pub const MID_PREFIX: &str = "map1:";

fn to_lower_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

/// Computes the MID for `value`: encodes it to `CANON_BYTES`, then
/// hashes and prefixes.
pub fn mid_from_value(value: &CanonicalValue) -> Result<String, MapError> {
    let canon = canon_bytes_from_value(value)?;
    Ok(mid_from_canon_bytes_unchecked(&canon))
}

/// Computes the MID directly from an already-built `CANON_BYTES` buffer,
/// without re-deriving it from a [`CanonicalValue`] — the fast path used
/// by [`crate::mid_from_canon_bytes`], and the reason [`crate::mcf`]
/// exposes a standalone full-structure validator rather than requiring
/// every caller to decode-then-reencode to confirm canonicity.
pub fn mid_from_canon_bytes_unchecked(canon: &[u8]) -> String {
    let digest = Sha256::digest(canon);
    format!("{MID_PREFIX}{}", to_lower_hex(&digest))
}
