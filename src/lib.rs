#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used)]

//! Deterministic canonical encoding and identifier computation for MAP
//! v1.1 descriptors.
//!
//! # Overview
//! A MAP descriptor is a structured value built from six canonical
//! kinds — STRING, BYTES, LIST, MAP, BOOLEAN, INTEGER
//! ([`CanonicalValue`]). This crate turns such a value into
//! `CANON_BYTES`, a unique binary serialization (MCF, the Minimal
//! Canonical Form), and from there into a MID: a `map1:`-prefixed,
//! lowercase-hex SHA-256 digest that is identical across
//! implementations and insertion order for the same logical value.
//!
//! v1.1 adds BOOLEAN and INTEGER as first-class kinds, distinct from
//! their string renderings:
//! ```
//! use map1::{mid_full, CanonicalValue};
//!
//! let as_bool = CanonicalValue::map([("active".to_string(), CanonicalValue::Boolean(true))]);
//! let as_string = CanonicalValue::map([("active".to_string(), CanonicalValue::string("true"))]);
//! assert_ne!(mid_full(&as_bool).unwrap(), mid_full(&as_string).unwrap());
//! ```
//!
//! ## Computing a MID from a descriptor
//! ```
//! use map1::{mid_full, CanonicalValue};
//!
//! let descriptor = CanonicalValue::map([
//!     ("action".to_string(), CanonicalValue::string("deploy")),
//!     ("target".to_string(), CanonicalValue::string("prod")),
//!     ("version".to_string(), CanonicalValue::string("2.1.0")),
//! ]);
//! assert_eq!(
//!     mid_full(&descriptor).unwrap(),
//!     "map1:02f660092e372c2da0f87cefdecd1de9476eba39be2222b30637ba72178c5e7e",
//! );
//! ```
//!
//! ## Computing a MID from raw JSON
//! ```
//! use map1::mid_full_json;
//!
//! let mid = mid_full_json(br#"{"action":"deploy","target":"prod","version":"2.1.0"}"#).unwrap();
//! assert_eq!(
//!     mid,
//!     "map1:02f660092e372c2da0f87cefdecd1de9476eba39be2222b30637ba72178c5e7e",
//! );
//! ```
//!
//! ## Selecting a subset with BIND
//! ```
//! use map1::{mid_bind, CanonicalValue};
//!
//! let descriptor = CanonicalValue::map([
//!     ("action".to_string(), CanonicalValue::string("deploy")),
//!     ("target".to_string(), CanonicalValue::string("prod")),
//! ]);
//! let mid = mid_bind(&descriptor, &["/action".to_string()]).unwrap();
//! assert!(mid.starts_with("map1:"));
//! ```

pub mod constants;
pub mod error;
pub mod json_strict;
pub mod keycmp;
pub mod mcf;
pub mod mid;
pub mod prepare;
pub mod projection;
pub mod utf8;
pub mod value;

pub use error::{MapError, MapResult};
pub use prepare::{prepare, PrepareOptions};
pub use value::CanonicalValue;

use tracing::debug;

/// Computes the MID for `descriptor` under FULL projection (the identity
/// projection).
pub fn mid_full(descriptor: &CanonicalValue) -> MapResult<String> {
    debug!("computing mid_full");
    let projected = projection::full(descriptor);
    mid::mid_from_value(&projected)
}

/// Computes the MID for the subset of `descriptor` selected by
/// `pointers` under BIND projection.
pub fn mid_bind(descriptor: &CanonicalValue, pointers: &[String]) -> MapResult<String> {
    debug!(pointer_count = pointers.len(), "computing mid_bind");
    let projected = projection::bind(descriptor, pointers)?;
    mid::mid_from_value(&projected)
}

/// Returns `CANON_BYTES` (header + MCF body) for `descriptor` under
/// FULL projection.
pub fn canonical_bytes_full(descriptor: &CanonicalValue) -> MapResult<Vec<u8>> {
    debug!("computing canonical_bytes_full");
    let projected = projection::full(descriptor);
    mcf::canon_bytes_from_value(&projected)
}

/// Returns `CANON_BYTES` for the subset of `descriptor` selected by
/// `pointers` under BIND projection.
pub fn canonical_bytes_bind(descriptor: &CanonicalValue, pointers: &[String]) -> MapResult<Vec<u8>> {
    debug!(pointer_count = pointers.len(), "computing canonical_bytes_bind");
    let projected = projection::bind(descriptor, pointers)?;
    mcf::canon_bytes_from_value(&projected)
}

/// Computes a MID from raw UTF-8 JSON bytes under the JSON-STRICT
/// adapter and FULL projection.
pub fn mid_full_json(raw: &[u8]) -> MapResult<String> {
    debug!(bytes = raw.len(), "computing mid_full_json");
    let value = json_strict::parse(raw)?;
    mid::mid_from_value(&value)
}

/// Computes a MID from raw UTF-8 JSON bytes under the JSON-STRICT
/// adapter and BIND projection.
pub fn mid_bind_json(raw: &[u8], pointers: &[String]) -> MapResult<String> {
    debug!(
        bytes = raw.len(),
        pointer_count = pointers.len(),
        "computing mid_bind_json"
    );
    let value = json_strict::parse(raw)?;
    let projected = projection::bind(&value, pointers)?;
    mid::mid_from_value(&projected)
}

/// Validates a pre-built `CANON_BYTES` buffer and computes its MID,
/// hashing the caller's bytes directly rather than decoding and
/// re-encoding them.
pub fn mid_from_canon_bytes(canon_bytes: &[u8]) -> MapResult<String> {
    debug!(bytes = canon_bytes.len(), "computing mid_from_canon_bytes");
    mcf::decode_canon_bytes(canon_bytes)?;
    Ok(mid::mid_from_canon_bytes_unchecked(canon_bytes))
}
