//! FULL and BIND projection.
//!
//! FULL is the identity function. BIND selects a subset of a MAP
//! descriptor by RFC 6901 JSON Pointers, producing the minimal enclosing
//! structure that still holds every selected leaf. This module's central
//! hazard: tilde unescaping must decode `~0`/`~1` left to right in one
//! pass, since decoding `~1` before `~0` corrupts the token `~01`.

use crate::error::MapError;
use crate::value::CanonicalValue;

/// FULL projection: returns `descriptor` unchanged.
pub fn full(descriptor: &CanonicalValue) -> CanonicalValue {
    descriptor.clone()
}

/// Parses a single RFC 6901 pointer into its reference tokens.
///
/// `""` parses to an empty token list (the whole-document pointer, rule
/// e below). Any other pointer must start with `/`.
fn parse_pointer(ptr: &str) -> Result<Vec<String>, MapError> {
    if ptr.is_empty() {
        return Ok(Vec::new());
    }
    if !ptr.starts_with('/') {
        return Err(MapError::Schema("pointer must start with '/'".into()));
    }

    let mut tokens = Vec::new();
    for raw in ptr.split('/').skip(1) {
        let mut decoded = String::with_capacity(raw.len());
        let chars: Vec<char> = raw.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] != '~' {
                decoded.push(chars[i]);
                i += 1;
                continue;
            }
            let nxt = chars
                .get(i + 1)
                .ok_or_else(|| MapError::Schema("dangling ~ in pointer".into()))?;
            match nxt {
                '0' => decoded.push('~'),
                '1' => decoded.push('/'),
                other => {
                    return Err(MapError::Schema(format!("bad ~{other} escape in pointer")))
                }
            }
            i += 2;
        }
        tokens.push(decoded);
    }
    Ok(tokens)
}

fn map_entries(value: &CanonicalValue) -> Option<&[(String, CanonicalValue)]> {
    match value {
        CanonicalValue::Map(entries) => Some(entries),
        _ => None,
    }
}

fn map_get<'a>(entries: &'a [(String, CanonicalValue)], key: &str) -> Option<&'a CanonicalValue> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// BIND projection: selects fields of `descriptor` by a set of JSON
/// Pointers, per rules (a)-(e) and structural rules 1-4 below.
pub fn bind(descriptor: &CanonicalValue, pointers: &[String]) -> Result<CanonicalValue, MapError> {
    let root_entries = map_entries(descriptor)
        .ok_or_else(|| MapError::Schema("BIND root must be a MAP".into()))?;

    // Rule (b): reject duplicate pointer strings.
    let mut unique: std::collections::HashSet<&str> = std::collections::HashSet::new();
    for p in pointers {
        if !unique.insert(p.as_str()) {
            return Err(MapError::Schema("duplicate pointers".into()));
        }
    }

    // Rule (a): parse every pointer before traversing anything, so a
    // malformed pointer is reported before partial traversal side effects.
    let mut parsed: Vec<(&str, Vec<String>)> = Vec::with_capacity(pointers.len());
    for p in pointers {
        let tokens = parse_pointer(p)?;
        parsed.push((p.as_str(), tokens));
    }

    let mut matched_paths: Vec<&[String]> = Vec::new();
    let mut any_match = false;
    let mut any_unmatched = false;
    let mut any_empty_pointer = false;

    for (ptr, tokens) in &parsed {
        if ptr.is_empty() {
            // Rule (e): empty pointer always matches the MAP root.
            any_match = true;
            any_empty_pointer = true;
            continue;
        }

        let mut cur = descriptor;
        let mut ok = true;
        for tok in tokens {
            // Rule (4): LIST traversal is forbidden under BIND.
            if matches!(cur, CanonicalValue::List(_)) {
                return Err(MapError::Schema("BIND cannot traverse LIST".into()));
            }
            match map_entries(cur).and_then(|e| map_get(e, tok)) {
                Some(next) => cur = next,
                None => {
                    ok = false;
                    break;
                }
            }
        }

        if ok {
            any_match = true;
            matched_paths.push(tokens);
        } else {
            any_unmatched = true;
        }
    }

    // Rule (c) / (3): no pointer matched anything → empty MAP, not an error.
    if !any_match {
        return Ok(CanonicalValue::Map(Vec::new()));
    }
    // Rule (c): a mix of matched and unmatched pointers fails closed.
    if any_unmatched {
        return Err(MapError::Schema("unmatched pointer in set".into()));
    }
    // Rule (e): any empty-string pointer in the (fully matched) set
    // means the whole descriptor is selected.
    if any_empty_pointer {
        return Ok(descriptor.clone());
    }

    // Rule (d): discard pointers subsumed by a shorter matched pointer
    // that is a strict prefix of them.
    let is_subsumed = |toks: &[String]| {
        matched_paths
            .iter()
            .any(|other| other.len() < toks.len() && toks.starts_with(other))
    };
    let effective: Vec<&[String]> = matched_paths
        .iter()
        .copied()
        .filter(|toks| !is_subsumed(toks))
        .collect();

    // Rule (1) omit-siblings, rule (2) minimal enclosing structure: walk
    // each effective pointer's path once to resolve its leaf value, then
    // graft that leaf into a freshly built nested-MAP tree at the same
    // path, never copying any sibling key along the way.
    let mut projected: Vec<(String, CanonicalValue)> = Vec::new();
    for toks in &effective {
        let mut cur = descriptor;
        for tok in toks.iter() {
            match cur {
                CanonicalValue::List(_) => {
                    return Err(MapError::Schema("BIND cannot traverse LIST".into()))
                }
                CanonicalValue::Map(entries) => {
                    cur = map_get(entries, tok)
                        .ok_or_else(|| MapError::Schema("cannot traverse non-MAP".into()))?;
                }
                _ => return Err(MapError::Schema("cannot traverse non-MAP".into())),
            }
        }
        insert_at_path(&mut projected, toks, cur.clone())?;
    }

    Ok(CanonicalValue::Map(projected))
}

/// Inserts `leaf` into the nested-MAP tree `root` at `path`, creating
/// intermediate MAP entries as needed.
fn insert_at_path(
    root: &mut Vec<(String, CanonicalValue)>,
    path: &[String],
    leaf: CanonicalValue,
) -> Result<(), MapError> {
    let (last, rest) = path.split_last().expect("path is non-empty: caller only calls with matched pointer tokens");
    let mut target = root;
    for tok in rest {
        let idx = target.iter().position(|(k, _)| k == tok);
        let idx = match idx {
            Some(i) => i,
            None => {
                target.push((tok.clone(), CanonicalValue::Map(Vec::new())));
                target.len() - 1
            }
        };
        match &mut target[idx].1 {
            CanonicalValue::Map(entries) => target = entries,
            _ => return Err(MapError::Schema("BIND path conflict".into())),
        }
    }
    if target.iter().any(|(k, _)| k == last) {
        return Err(MapError::Schema("BIND path conflict".into()));
    }
    target.push((last.clone(), leaf));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> CanonicalValue {
        CanonicalValue::map([
            ("a".to_string(), CanonicalValue::string("A")),
            (
                "b".to_string(),
                CanonicalValue::map([
                    ("c".to_string(), CanonicalValue::Integer(1)),
                    ("d".to_string(), CanonicalValue::Integer(2)),
                ]),
            ),
        ])
    }

    #[test]
    fn full_is_identity() {
        let d = descriptor();
        assert_eq!(full(&d), d);
    }

    #[test]
    fn empty_pointer_equals_full() {
        let d = descriptor();
        let projected = bind(&d, &["".to_string()]).unwrap();
        assert_eq!(projected, d);
    }

    #[test]
    fn single_pointer_selects_minimal_structure() {
        let d = descriptor();
        let projected = bind(&d, &["/b/c".to_string()]).unwrap();
        let expected = CanonicalValue::map([(
            "b".to_string(),
            CanonicalValue::map([("c".to_string(), CanonicalValue::Integer(1))]),
        )]);
        assert_eq!(projected, expected);
    }

    #[test]
    fn no_match_yields_empty_map() {
        let d = descriptor();
        let projected = bind(&d, &["/missing".to_string()]).unwrap();
        assert_eq!(projected, CanonicalValue::Map(Vec::new()));
    }

    #[test]
    fn mixed_match_and_unmatched_fails_closed() {
        let d = descriptor();
        let err = bind(&d, &["/a".to_string(), "/missing".to_string()]).unwrap_err();
        assert_eq!(err.code(), "ERR_SCHEMA");
    }

    #[test]
    fn subsumed_pointer_is_discarded() {
        let d = descriptor();
        let projected = bind(&d, &["/b".to_string(), "/b/c".to_string()]).unwrap();
        let expected = CanonicalValue::map([(
            "b".to_string(),
            CanonicalValue::map([
                ("c".to_string(), CanonicalValue::Integer(1)),
                ("d".to_string(), CanonicalValue::Integer(2)),
            ]),
        )]);
        assert_eq!(projected, expected);
    }

    #[test]
    fn duplicate_pointers_are_rejected() {
        let d = descriptor();
        let err = bind(&d, &["/a".to_string(), "/a".to_string()]).unwrap_err();
        assert_eq!(err.code(), "ERR_SCHEMA");
    }

    #[test]
    fn list_traversal_is_forbidden() {
        let d = CanonicalValue::map([(
            "items".to_string(),
            CanonicalValue::list([CanonicalValue::Integer(1)]),
        )]);
        let err = bind(&d, &["/items/0".to_string()]).unwrap_err();
        assert_eq!(err.code(), "ERR_SCHEMA");
    }

    #[test]
    fn tilde_escapes_decode_left_to_right() {
        let d = CanonicalValue::map([("~0/1".to_string(), CanonicalValue::Integer(42))]);
        let projected = bind(&d, &["/~00~11".to_string()]).unwrap();
        let expected = CanonicalValue::map([("~0/1".to_string(), CanonicalValue::Integer(42))]);
        assert_eq!(projected, expected);
    }

    #[test]
    fn non_map_root_is_rejected() {
        let err = bind(&CanonicalValue::Integer(1), &["".to_string()]).unwrap_err();
        assert_eq!(err.code(), "ERR_SCHEMA");
    }

    #[test]
    fn pointer_set_order_does_not_affect_result() {
        let d = descriptor();
        let a = bind(&d, &["/a".to_string(), "/b/c".to_string()]).unwrap();
        let b = bind(&d, &["/b/c".to_string(), "/a".to_string()]).unwrap();
        assert_eq!(a, b);
    }
}
