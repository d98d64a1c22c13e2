//! Scalar UTF-8 validation.
//!
//! "Scalar" means well-formed UTF-8 with no surrogate code points
//! (U+D800..=U+DFFF). Rust's `str` type already guarantees the former by
//! construction and the latter by definition (a `char` can never hold a
//! surrogate), so in practice this module only has teeth when validating
//! bytes that have *not* yet been proven to be a Rust `str` — raw STRING
//! payloads decoded off the wire, or raw bytes handed in from a JSON
//! adapter operating below the `str` layer.

use crate::error::MapError;

/// Validates that `bytes` is well-formed UTF-8 with no surrogate code
/// points, returning the borrowed `&str` view on success.
///
/// Hosts whose text type can represent lone surrogates (most JSON
/// parsers operating on UTF-16, some WTF-8 internals) must perform this
/// check explicitly; Rust's `str::from_utf8` already rejects surrogates
/// as part of standard UTF-8 validation, so this function's surrogate
/// scan is defense-in-depth rather than dead code: it documents the
/// invariant at the point it is required instead of relying
/// on an incidental property of `core::str`.
pub fn validate_scalar(bytes: &[u8]) -> Result<&str, MapError> {
    let s = std::str::from_utf8(bytes).map_err(|e| MapError::Utf8(e.to_string()))?;
    for ch in s.chars() {
        let cp = ch as u32;
        if (0xD800..=0xDFFF).contains(&cp) {
            return Err(MapError::Utf8(format!("surrogate code-point U+{cp:04X}")));
        }
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_ascii() {
        assert_eq!(validate_scalar(b"hello").unwrap(), "hello");
    }

    #[test]
    fn accepts_multibyte_scalar() {
        assert_eq!(validate_scalar("héllo 🦀".as_bytes()).unwrap(), "héllo 🦀");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let bad = [0xFF, 0xFE, 0x00];
        assert!(validate_scalar(&bad).is_err());
    }

    #[test]
    fn rejects_overlong_and_truncated_sequences() {
        let truncated = [0xE2, 0x82]; // incomplete 3-byte sequence
        assert!(validate_scalar(&truncated).is_err());
    }
}
