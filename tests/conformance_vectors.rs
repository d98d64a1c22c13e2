//! Conformance vectors: fixed inputs with known CANON_BYTES/MID outputs,
//! plus the specific error vectors for each `ERR_*` code. Kept separate
//! from unit tests since these exercise the crate's full public surface
//! end to end rather than one module at a time.

use map1::{
    canonical_bytes_full, mid_bind, mid_bind_json, mid_from_canon_bytes, mid_full, mid_full_json,
    CanonicalValue,
};

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X} ")).collect::<String>().trim().to_string()
}

#[test]
fn deploy_descriptor_matches_published_mid() {
    let descriptor = CanonicalValue::map([
        ("action".to_string(), CanonicalValue::string("deploy")),
        ("target".to_string(), CanonicalValue::string("prod")),
        ("version".to_string(), CanonicalValue::string("2.1.0")),
    ]);
    assert_eq!(
        mid_full(&descriptor).unwrap(),
        "map1:02f660092e372c2da0f87cefdecd1de9476eba39be2222b30637ba72178c5e7e"
    );
}

#[test]
fn boolean_wire_vectors() {
    let canon_true = canonical_bytes_full(&CanonicalValue::Boolean(true)).unwrap();
    assert_eq!(hex(&canon_true), "4D 41 50 31 00 05 01");

    let canon_false = canonical_bytes_full(&CanonicalValue::Boolean(false)).unwrap();
    assert_eq!(hex(&canon_false), "4D 41 50 31 00 05 00");
}

#[test]
fn integer_wire_vectors() {
    assert_eq!(
        hex(&canonical_bytes_full(&CanonicalValue::Integer(0)).unwrap()),
        "4D 41 50 31 00 06 00 00 00 00 00 00 00 00"
    );
    assert_eq!(
        hex(&canonical_bytes_full(&CanonicalValue::Integer(-1)).unwrap()),
        "4D 41 50 31 00 06 FF FF FF FF FF FF FF FF"
    );
    assert_eq!(
        hex(&canonical_bytes_full(&CanonicalValue::Integer(i64::MIN)).unwrap()),
        "4D 41 50 31 00 06 80 00 00 00 00 00 00 00"
    );
}

#[test]
fn v1_1_splits_boolean_from_its_string_rendering() {
    let bool_descriptor = CanonicalValue::map([("k".to_string(), CanonicalValue::Boolean(true))]);
    let string_descriptor =
        CanonicalValue::map([("k".to_string(), CanonicalValue::string("true"))]);
    assert_ne!(
        mid_full(&bool_descriptor).unwrap(),
        mid_full(&string_descriptor).unwrap()
    );
}

#[test]
fn json_dup_key_is_rejected() {
    let err = mid_full_json(br#"{"a":1,"a":2}"#).unwrap_err();
    assert_eq!(err.code(), "ERR_DUP_KEY");
}

#[test]
fn json_null_is_rejected() {
    let err = mid_full_json(br#"{"a":null}"#).unwrap_err();
    assert_eq!(err.code(), "ERR_TYPE");
}

#[test]
fn json_bom_is_rejected() {
    let mut raw = vec![0xEF, 0xBB, 0xBF];
    raw.extend_from_slice(b"{}");
    let err = mid_full_json(&raw).unwrap_err();
    assert_eq!(err.code(), "ERR_SCHEMA");
}

#[test]
fn json_integer_overflow_is_rejected() {
    let err = mid_full_json(br#"{"a":9223372036854775808}"#).unwrap_err();
    assert_eq!(err.code(), "ERR_TYPE");
}

#[test]
fn json_float_is_rejected() {
    let err = mid_full_json(br#"{"a":1.0}"#).unwrap_err();
    assert_eq!(err.code(), "ERR_TYPE");
}

#[test]
fn mid_bind_selects_a_subset() {
    let descriptor = CanonicalValue::map([
        ("action".to_string(), CanonicalValue::string("deploy")),
        ("target".to_string(), CanonicalValue::string("prod")),
    ]);
    let full = mid_full(&descriptor).unwrap();
    let bound = mid_bind(&descriptor, &["/action".to_string()]).unwrap();
    assert_ne!(full, bound);
}

#[test]
fn mid_bind_json_matches_mid_bind_on_equivalent_descriptor() {
    let descriptor = CanonicalValue::map([
        ("action".to_string(), CanonicalValue::string("deploy")),
        ("target".to_string(), CanonicalValue::string("prod")),
    ]);
    let pointers = vec!["/action".to_string()];
    assert_eq!(
        mid_bind(&descriptor, &pointers).unwrap(),
        mid_bind_json(br#"{"action":"deploy","target":"prod"}"#, &pointers).unwrap()
    );
}

#[test]
fn mcf_key_order_violation_is_caught_by_mid_from_canon_bytes() {
    let mut buf = b"MAP1\0".to_vec();
    buf.push(0x04); // TAG_MAP
    buf.extend_from_slice(&2u32.to_be_bytes());
    buf.push(0x01); // TAG_STRING
    buf.extend_from_slice(&1u32.to_be_bytes());
    buf.extend_from_slice(b"b");
    buf.push(0x06); // TAG_INTEGER
    buf.extend_from_slice(&1i64.to_be_bytes());
    buf.push(0x01);
    buf.extend_from_slice(&1u32.to_be_bytes());
    buf.extend_from_slice(b"a");
    buf.push(0x06);
    buf.extend_from_slice(&2i64.to_be_bytes());

    let err = mid_from_canon_bytes(&buf).unwrap_err();
    assert_eq!(err.code(), "ERR_KEY_ORDER");
}

#[test]
fn mcf_bad_header_is_rejected() {
    let buf = b"XXXX\0\x05\x01".to_vec();
    let err = mid_from_canon_bytes(&buf).unwrap_err();
    assert_eq!(err.code(), "ERR_CANON_HDR");
}

#[test]
fn deeply_nested_structure_hits_depth_limit() {
    let mut value = CanonicalValue::Integer(1);
    for _ in 0..33 {
        value = CanonicalValue::List(vec![value]);
    }
    let err = mid_full(&value).unwrap_err();
    assert_eq!(err.code(), "ERR_LIMIT_DEPTH");
}

#[test]
fn json_input_over_one_mebibyte_hits_size_limit() {
    let mut raw = Vec::with_capacity(1_048_576 + 16);
    raw.extend_from_slice(br#"{"k":""#);
    raw.resize(raw.len() + 1_048_576 + 1, b'x');
    raw.extend_from_slice(br#""}"#);
    let err = mid_full_json(&raw).unwrap_err();
    assert_eq!(err.code(), "ERR_LIMIT_SIZE");
}

#[test]
fn list_entry_count_over_limit_hits_size_limit() {
    let items: Vec<CanonicalValue> = (0..65_536).map(CanonicalValue::Integer).collect();
    let value = CanonicalValue::List(items);
    let err = mid_full(&value).unwrap_err();
    assert_eq!(err.code(), "ERR_LIMIT_SIZE");
}
