//! `prepare` — a convenience bridge from loosely-typed `serde_json::Value`
//! trees to [`CanonicalValue`] (not part of the normative MAP v1.1 surface).
//!
//! Application code rarely hands this crate values that are already pure
//! canonical-model data. Floats need a deterministic string rendering
//! (MAP has no float type), `null` needs an explicit policy, and
//! integers need early range-checking instead of failing deep inside
//! [`crate::mcf`]. This function does not compute a MID — feed its
//! result to [`crate::mid_full`] or [`crate::mid_bind`].

use serde_json::Value;

use crate::constants::{INT64_MAX, INT64_MIN};
use crate::error::MapError;
use crate::value::CanonicalValue;

/// Options controlling [`prepare`]'s normalization of loosely-typed
/// JSON-ish values into the canonical model.
#[derive(Debug, Clone, Copy)]
pub struct PrepareOptions {
    /// Decimal places used when rendering a float as a string.
    pub float_precision: usize,
    /// When `true`, `null` values are dropped from maps/lists rather
    /// than raising [`MapError::Type`].
    pub omit_none: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        PrepareOptions {
            float_precision: 6,
            omit_none: true,
        }
    }
}

/// Normalizes a `serde_json::Value` into a [`CanonicalValue`] under
/// `opts`.
///
/// | Input            | Output                                          |
/// |-------------------|--------------------------------------------------|
/// | object            | `Map`, recursively prepared                      |
/// | array              | `List`, recursively prepared                     |
/// | string             | `String`, unchanged                              |
/// | bool               | `Boolean`, unchanged                             |
/// | integer (fits i64) | `Integer`, range-checked                         |
/// | float              | `String`, rendered with `opts.float_precision`   |
/// | null               | omitted if `opts.omit_none`, else `ERR_TYPE`     |
pub fn prepare(val: &Value, opts: PrepareOptions) -> Result<CanonicalValue, MapError> {
    match val {
        Value::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (k, v) in map {
                if v.is_null() {
                    if opts.omit_none {
                        continue;
                    }
                    return Err(MapError::Type(format!(
                        "prepare: null value for key '{k}'"
                    )));
                }
                entries.push((k.clone(), prepare(v, opts)?));
            }
            Ok(CanonicalValue::Map(entries))
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if item.is_null() && opts.omit_none {
                    continue;
                }
                out.push(prepare(item, opts)?);
            }
            Ok(CanonicalValue::List(out))
        }
        Value::Bool(b) => Ok(CanonicalValue::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if i < INT64_MIN || i > INT64_MAX {
                    return Err(MapError::Type(format!(
                        "prepare: integer {i} outside int64 range"
                    )));
                }
                return Ok(CanonicalValue::Integer(i));
            }
            if let Some(u) = n.as_u64() {
                if u > INT64_MAX as u64 {
                    return Err(MapError::Type(format!(
                        "prepare: integer {u} outside int64 range"
                    )));
                }
                return Ok(CanonicalValue::Integer(u as i64));
            }
            let f = n
                .as_f64()
                .ok_or_else(|| MapError::Schema("prepare: unrepresentable number".into()))?;
            Ok(CanonicalValue::String(format!(
                "{:.*}",
                opts.float_precision, f
            )))
        }
        Value::String(s) => Ok(CanonicalValue::String(s.clone())),
        Value::Null => Err(MapError::Type("prepare: null value at top level".into())),
    }
}
