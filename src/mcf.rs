//! Minimal Canonical Form (MCF) encoder and decoder.
//!
//! `encode` turns a [`CanonicalValue`] into `CANON_BYTES` (header + MCF
//! body). `mid_from_canon_bytes` performs the fast-path decode: it fully
//! validates a pre-built `CANON_BYTES` buffer's structure and hashes the
//! *caller's* bytes directly, rather than re-encoding through
//! [`encode`] and hashing that — re-encoding would silently accept
//! non-canonical-but-parseable input (trailing bytes, a different valid
//! serialization of the same logical value) as if it were the canonical
//! one.

use tracing::trace;

use crate::constants::{
    CANON_HDR, INT64_MAX, INT64_MIN, MAX_CANON_BYTES, MAX_DEPTH, MAX_LIST_ENTRIES,
    MAX_MAP_ENTRIES, TAG_BOOLEAN, TAG_BYTES, TAG_INTEGER, TAG_LIST, TAG_MAP, TAG_STRING,
};
use crate::error::MapError;
use crate::keycmp;
use crate::utf8::validate_scalar;
use crate::value::CanonicalValue;

fn push_u32be(out: &mut Vec<u8>, n: usize) -> Result<(), MapError> {
    let n =
        u32::try_from(n).map_err(|_| MapError::LimitSize(format!("count/length {n} exceeds u32")))?;
    out.extend_from_slice(&n.to_be_bytes());
    Ok(())
}

/// Encodes a [`CanonicalValue`] into its MCF body, starting at `depth`.
///
/// Root calls should pass `depth = 0`. Containers check `depth + 1 >
/// MAX_DEPTH` before descending; scalars never affect depth.
pub fn encode_value(value: &CanonicalValue, depth: u32) -> Result<Vec<u8>, MapError> {
    match value {
        // Boolean is its own tag; Rust's type system already keeps it
        // distinct from Integer (unlike hosts where bool is an int
        // subtype), so no dispatch-order hazard exists here, but the
        // encoding itself still must emit TAG_BOOLEAN, never TAG_INTEGER.
        CanonicalValue::Boolean(b) => Ok(vec![TAG_BOOLEAN, if *b { 0x01 } else { 0x00 }]),

        CanonicalValue::Integer(n) => {
            if *n < INT64_MIN || *n > INT64_MAX {
                // Unreachable in practice since the payload is already i64,
                // kept for defense-in-depth and to mirror the source model.
                return Err(MapError::Type(format!("integer {n} outside int64 range")));
            }
            let mut out = Vec::with_capacity(9);
            out.push(TAG_INTEGER);
            out.extend_from_slice(&n.to_be_bytes());
            Ok(out)
        }

        CanonicalValue::String(s) => {
            let raw = s.as_bytes();
            validate_scalar(raw)?;
            let mut out = Vec::with_capacity(5 + raw.len());
            out.push(TAG_STRING);
            push_u32be(&mut out, raw.len())?;
            out.extend_from_slice(raw);
            Ok(out)
        }

        CanonicalValue::Bytes(b) => {
            let mut out = Vec::with_capacity(5 + b.len());
            out.push(TAG_BYTES);
            push_u32be(&mut out, b.len())?;
            out.extend_from_slice(b);
            Ok(out)
        }

        CanonicalValue::List(items) => {
            if depth + 1 > MAX_DEPTH {
                return Err(MapError::LimitDepth(format!(
                    "list nesting exceeds {MAX_DEPTH}"
                )));
            }
            if items.len() > MAX_LIST_ENTRIES {
                return Err(MapError::LimitSize(format!(
                    "list has {} entries, limit is {MAX_LIST_ENTRIES}",
                    items.len()
                )));
            }
            let mut out = vec![TAG_LIST];
            push_u32be(&mut out, items.len())?;
            for item in items {
                out.extend(encode_value(item, depth + 1)?);
            }
            Ok(out)
        }

        CanonicalValue::Map(entries) => encode_map(entries, depth),
    }
}

fn encode_map(entries: &[(String, CanonicalValue)], depth: u32) -> Result<Vec<u8>, MapError> {
    if depth + 1 > MAX_DEPTH {
        return Err(MapError::LimitDepth(format!(
            "map nesting exceeds {MAX_DEPTH}"
        )));
    }
    if entries.len() > MAX_MAP_ENTRIES {
        return Err(MapError::LimitSize(format!(
            "map has {} entries, limit is {MAX_MAP_ENTRIES}",
            entries.len()
        )));
    }

    // Validate each key as scalar UTF-8, pair it with its raw bytes, then
    // sort by unsigned-octet order. Sorting here — rather
    // than requiring callers to pre-sort — is what makes permuting the
    // input a no-op on CANON_BYTES.
    let mut items: Vec<(Vec<u8>, &str, &CanonicalValue)> = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let raw = k.as_bytes();
        validate_scalar(raw)?;
        items.push((raw.to_vec(), k.as_str(), v));
    }
    items.sort_by(|a, b| keycmp::compare(&a.0, &b.0));
    ensure_sorted_unique(&items)?;

    let mut out = vec![TAG_MAP];
    push_u32be(&mut out, items.len())?;
    for (key_bytes, _key, val) in &items {
        // Keys are always STRING-framed, including their own tag byte,
        // never a bare length-prefixed byte run.
        out.push(TAG_STRING);
        push_u32be(&mut out, key_bytes.len())?;
        out.extend_from_slice(key_bytes);
        out.extend(encode_value(val, depth + 1)?);
    }
    Ok(out)
}

fn ensure_sorted_unique(items: &[(Vec<u8>, &str, &CanonicalValue)]) -> Result<(), MapError> {
    for w in items.windows(2) {
        match keycmp::compare(&w[0].0, &w[1].0) {
            std::cmp::Ordering::Equal => {
                return Err(MapError::DupKey(format!("duplicate key {:?}", w[0].1)))
            }
            std::cmp::Ordering::Greater => {
                // Unreachable after sort-then-scan on the encode path, but
                // the decode path relies on the identical check, so the
                // check lives in one shared function for both.
                return Err(MapError::KeyOrder(format!(
                    "key order violation at {:?}",
                    w[0].1
                )));
            }
            std::cmp::Ordering::Less => {}
        }
    }
    Ok(())
}

/// Encodes `value` into full `CANON_BYTES` (header + MCF body),
/// rejecting the result if it exceeds [`MAX_CANON_BYTES`].
pub fn canon_bytes_from_value(value: &CanonicalValue) -> Result<Vec<u8>, MapError> {
    let body = encode_value(value, 0)?;
    let mut canon = Vec::with_capacity(CANON_HDR.len() + body.len());
    canon.extend_from_slice(CANON_HDR);
    canon.extend_from_slice(&body);
    if canon.len() > MAX_CANON_BYTES {
        return Err(MapError::LimitSize(format!(
            "CANON_BYTES is {} bytes, limit is {MAX_CANON_BYTES}",
            canon.len()
        )));
    }
    trace!(bytes = canon.len(), "encoded CANON_BYTES");
    Ok(canon)
}

fn read_u32be(buf: &[u8], off: usize) -> Result<(usize, usize), MapError> {
    let end = off
        .checked_add(4)
        .filter(|&e| e <= buf.len())
        .ok_or_else(|| MapError::CanonMcf("truncated u32 length/count".into()))?;
    let n = u32::from_be_bytes(buf[off..end].try_into().unwrap());
    Ok((n as usize, end))
}

/// Decodes exactly one MCF value from `buf` at `off`, tracking `depth`
/// the same way [`encode_value`] does, and returns the decoded value
/// plus the offset just past it.
pub fn decode_one(buf: &[u8], off: usize, depth: u32) -> Result<(CanonicalValue, usize), MapError> {
    let tag = *buf
        .get(off)
        .ok_or_else(|| MapError::CanonMcf("truncated tag".into()))?;
    let off = off + 1;

    match tag {
        TAG_STRING => {
            let (n, off) = read_u32be(buf, off)?;
            let end = off
                .checked_add(n)
                .filter(|&e| e <= buf.len())
                .ok_or_else(|| MapError::CanonMcf("truncated string payload".into()))?;
            let s = validate_scalar(&buf[off..end])?;
            Ok((CanonicalValue::String(s.to_owned()), end))
        }
        TAG_BYTES => {
            let (n, off) = read_u32be(buf, off)?;
            let end = off
                .checked_add(n)
                .filter(|&e| e <= buf.len())
                .ok_or_else(|| MapError::CanonMcf("truncated bytes payload".into()))?;
            Ok((CanonicalValue::Bytes(buf[off..end].to_vec()), end))
        }
        TAG_LIST => {
            if depth + 1 > MAX_DEPTH {
                return Err(MapError::LimitDepth(format!(
                    "list nesting exceeds {MAX_DEPTH}"
                )));
            }
            let (count, mut off) = read_u32be(buf, off)?;
            if count > MAX_LIST_ENTRIES {
                return Err(MapError::LimitSize(format!(
                    "list has {count} entries, limit is {MAX_LIST_ENTRIES}"
                )));
            }
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                let (item, next) = decode_one(buf, off, depth + 1)?;
                items.push(item);
                off = next;
            }
            Ok((CanonicalValue::List(items), off))
        }
        TAG_MAP => decode_map(buf, off, depth),
        TAG_BOOLEAN => {
            let payload = *buf
                .get(off)
                .ok_or_else(|| MapError::CanonMcf("truncated boolean payload".into()))?;
            match payload {
                0x00 => Ok((CanonicalValue::Boolean(false), off + 1)),
                0x01 => Ok((CanonicalValue::Boolean(true), off + 1)),
                other => Err(MapError::CanonMcf(format!(
                    "invalid boolean payload 0x{other:02x}"
                ))),
            }
        }
        TAG_INTEGER => {
            let end = off
                .checked_add(8)
                .filter(|&e| e <= buf.len())
                .ok_or_else(|| MapError::CanonMcf("truncated integer payload".into()))?;
            let n = i64::from_be_bytes(buf[off..end].try_into().unwrap());
            Ok((CanonicalValue::Integer(n), end))
        }
        other => Err(MapError::CanonMcf(format!("unknown MCF tag 0x{other:02x}"))),
    }
}

fn decode_map(buf: &[u8], off: usize, depth: u32) -> Result<(CanonicalValue, usize), MapError> {
    if depth + 1 > MAX_DEPTH {
        return Err(MapError::LimitDepth(format!(
            "map nesting exceeds {MAX_DEPTH}"
        )));
    }
    let (count, mut off) = read_u32be(buf, off)?;
    if count > MAX_MAP_ENTRIES {
        return Err(MapError::LimitSize(format!(
            "map has {count} entries, limit is {MAX_MAP_ENTRIES}"
        )));
    }

    let mut entries: Vec<(String, CanonicalValue)> = Vec::with_capacity(count);
    let mut prev_key_bytes: Option<Vec<u8>> = None;
    for _ in 0..count {
        let key_tag = *buf
            .get(off)
            .ok_or_else(|| MapError::CanonMcf("truncated map key tag".into()))?;
        if key_tag != TAG_STRING {
            return Err(MapError::Schema("map key must be STRING-tagged".into()));
        }
        let (key_val, next) = decode_one(buf, off, depth + 1)?;
        let key = match key_val {
            CanonicalValue::String(s) => s,
            _ => unreachable!("TAG_STRING always decodes to CanonicalValue::String"),
        };
        off = next;

        if let Some(prev) = &prev_key_bytes {
            match keycmp::compare(prev, key.as_bytes()) {
                std::cmp::Ordering::Equal => {
                    return Err(MapError::DupKey(format!("duplicate key {key:?} in MCF")))
                }
                std::cmp::Ordering::Greater => {
                    return Err(MapError::KeyOrder(format!(
                        "key {key:?} out of order in MCF"
                    )))
                }
                std::cmp::Ordering::Less => {}
            }
        }
        prev_key_bytes = Some(key.as_bytes().to_vec());

        let (value, next) = decode_one(buf, off, depth + 1)?;
        off = next;
        entries.push((key, value));
    }

    Ok((CanonicalValue::Map(entries), off))
}

/// Fully validates a pre-built `CANON_BYTES` buffer and returns the
/// decoded root value along with the offset past the end of the MCF
/// body (always `buf.len()` on success — see [`validate_canon_bytes`]
/// for the variant that enforces no trailing bytes for callers that
/// don't need the decoded value).
pub fn decode_canon_bytes(buf: &[u8]) -> Result<CanonicalValue, MapError> {
    if buf.len() > MAX_CANON_BYTES {
        return Err(MapError::LimitSize(format!(
            "input is {} bytes, limit is {MAX_CANON_BYTES}",
            buf.len()
        )));
    }
    if !buf.starts_with(CANON_HDR) {
        return Err(MapError::CanonHdr("missing MAP1 header".into()));
    }
    let (value, end) = decode_one(buf, CANON_HDR.len(), 0)?;
    if end != buf.len() {
        return Err(MapError::CanonMcf("trailing bytes after MCF root".into()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02X} ")).collect()
    }

    #[test]
    fn boolean_true_encodes_to_known_wire_bytes() {
        let canon = canon_bytes_from_value(&CanonicalValue::Boolean(true)).unwrap();
        assert_eq!(hex(&canon).trim(), "4D 41 50 31 00 05 01");
    }

    #[test]
    fn boolean_false_encodes_to_known_wire_bytes() {
        let canon = canon_bytes_from_value(&CanonicalValue::Boolean(false)).unwrap();
        assert_eq!(hex(&canon).trim(), "4D 41 50 31 00 05 00");
    }

    #[test]
    fn integer_zero_minus_one_and_min_encode_to_known_wire_bytes() {
        assert_eq!(
            hex(&canon_bytes_from_value(&CanonicalValue::Integer(0)).unwrap()).trim(),
            "4D 41 50 31 00 06 00 00 00 00 00 00 00 00"
        );
        assert_eq!(
            hex(&canon_bytes_from_value(&CanonicalValue::Integer(-1)).unwrap()).trim(),
            "4D 41 50 31 00 06 FF FF FF FF FF FF FF FF"
        );
        assert_eq!(
            hex(&canon_bytes_from_value(&CanonicalValue::Integer(i64::MIN)).unwrap()).trim(),
            "4D 41 50 31 00 06 80 00 00 00 00 00 00 00"
        );
    }

    #[test]
    fn reordering_map_entries_is_a_no_op() {
        let a = CanonicalValue::map([
            ("b".to_string(), CanonicalValue::Integer(1)),
            ("a".to_string(), CanonicalValue::Integer(2)),
        ]);
        let b = CanonicalValue::map([
            ("a".to_string(), CanonicalValue::Integer(2)),
            ("b".to_string(), CanonicalValue::Integer(1)),
        ]);
        assert_eq!(
            canon_bytes_from_value(&a).unwrap(),
            canon_bytes_from_value(&b).unwrap()
        );
    }

    #[test]
    fn decode_then_reencode_round_trips_bytewise() {
        let value = CanonicalValue::map([
            ("action".to_string(), CanonicalValue::string("deploy")),
            ("retries".to_string(), CanonicalValue::Integer(3)),
            ("active".to_string(), CanonicalValue::Boolean(true)),
            (
                "tags".to_string(),
                CanonicalValue::list([CanonicalValue::string("a"), CanonicalValue::string("b")]),
            ),
        ]);
        let canon = canon_bytes_from_value(&value).unwrap();
        let decoded = decode_canon_bytes(&canon).unwrap();
        let reencoded = canon_bytes_from_value(&decoded).unwrap();
        assert_eq!(canon, reencoded);
    }

    #[test]
    fn bad_canon_hdr_is_rejected() {
        let bad = b"XXXX\0\x05\x01".to_vec();
        let err = decode_canon_bytes(&bad).unwrap_err();
        assert_eq!(err.code(), "ERR_CANON_HDR");
    }

    #[test]
    fn unsorted_map_keys_in_wire_bytes_yield_key_order_error() {
        // Hand-build MAP{"b":1,"a":2} — out of order on the wire.
        let mut buf = CANON_HDR.to_vec();
        buf.push(TAG_MAP);
        buf.extend_from_slice(&2u32.to_be_bytes());
        buf.push(TAG_STRING);
        buf.extend_from_slice(&1u32.to_be_bytes());
        buf.extend_from_slice(b"b");
        buf.push(TAG_INTEGER);
        buf.extend_from_slice(&1i64.to_be_bytes());
        buf.push(TAG_STRING);
        buf.extend_from_slice(&1u32.to_be_bytes());
        buf.extend_from_slice(b"a");
        buf.push(TAG_INTEGER);
        buf.extend_from_slice(&2i64.to_be_bytes());

        let err = decode_canon_bytes(&buf).unwrap_err();
        assert_eq!(err.code(), "ERR_KEY_ORDER");
    }

    #[test]
    fn deeply_nested_list_hits_depth_limit() {
        // 33 levels of nesting: 32 is allowed, 33 is not.
        let mut value = CanonicalValue::Integer(1);
        for _ in 0..33 {
            value = CanonicalValue::List(vec![value]);
        }
        let err = canon_bytes_from_value(&value).unwrap_err();
        assert_eq!(err.code(), "ERR_LIMIT_DEPTH");
    }

    #[test]
    fn bad_boolean_payload_is_rejected() {
        let mut buf = CANON_HDR.to_vec();
        buf.push(TAG_BOOLEAN);
        buf.push(0x02);
        let err = decode_canon_bytes(&buf).unwrap_err();
        assert_eq!(err.code(), "ERR_CANON_MCF");
    }

    #[test]
    fn duplicate_map_keys_are_rejected_on_encode() {
        let value = CanonicalValue::Map(vec![
            ("a".to_string(), CanonicalValue::Integer(1)),
            ("a".to_string(), CanonicalValue::Integer(2)),
        ]);
        let err = canon_bytes_from_value(&value).unwrap_err();
        assert_eq!(err.code(), "ERR_DUP_KEY");
    }
}
