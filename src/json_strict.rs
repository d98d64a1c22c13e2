//! Hand-rolled JSON-STRICT tokenizer/parser.
//!
//! `serde_json::Value` cannot represent this adapter's central
//! requirement: the JSON tokens `1` and `1.0` must be told apart *before*
//! either is coerced to a Rust number, because `1.0` is a forbidden float
//! token while `1` is a valid INTEGER. `serde_json` erases that
//! distinction once a `Value::Number` exists and offers no hook to
//! intercept the raw token, so a small recursive-descent parser that
//! inspects number tokens itself is the only way to preserve the
//! distinction — not a stdlib-fallback shortcut.
//!
//! This parser builds [`CanonicalValue`] directly in one pass rather than
//! parsing to an intermediate tree and converting afterward, since Rust's
//! ownership model makes building the final tree directly the more
//! natural shape.

use crate::constants::{INT64_MAX, INT64_MIN, MAX_CANON_BYTES, MAX_DEPTH};
use crate::error::MapError;
use crate::value::CanonicalValue;

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parses raw JSON bytes under JSON-STRICT rules into a
/// [`CanonicalValue`].
///
/// Duplicate object keys are detected but not reported immediately: the
/// parser keeps the first occurrence and continues, so that a later
/// higher-precedence error (an `ERR_TYPE` from a `null`, an `ERR_UTF8`
/// from a bad escape) still takes effect — only a fully successful
/// parse reports the deferred `ERR_DUP_KEY`.
pub fn parse(raw: &[u8]) -> Result<CanonicalValue, MapError> {
    if raw.len() > MAX_CANON_BYTES {
        return Err(MapError::LimitSize(format!(
            "JSON input is {} bytes, limit is {MAX_CANON_BYTES}",
            raw.len()
        )));
    }

    let ws_end = raw
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .unwrap_or(raw.len());
    if raw[ws_end..].starts_with(BOM) {
        return Err(MapError::Schema("UTF-8 BOM rejected".into()));
    }

    let text = std::str::from_utf8(raw).map_err(|e| MapError::Utf8(e.to_string()))?;

    let mut parser = Parser {
        s: text,
        pos: 0,
        dup_found: false,
    };
    parser.skip_ws();
    let value = parser.parse_value(1)?;
    parser.skip_ws();
    if parser.pos != text.len() {
        return Err(MapError::CanonMcf("trailing characters after JSON value".into()));
    }

    if parser.dup_found {
        return Err(MapError::DupKey("duplicate key in JSON object".into()));
    }
    Ok(value)
}

struct Parser<'a> {
    s: &'a str,
    pos: usize,
    dup_found: bool,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), MapError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            _ => Err(MapError::CanonMcf(format!("expected '{expected}'"))),
        }
    }

    fn expect_literal(&mut self, lit: &str) -> Result<(), MapError> {
        if self.rest().starts_with(lit) {
            self.pos += lit.len();
            Ok(())
        } else {
            Err(MapError::CanonMcf(format!("expected literal '{lit}'")))
        }
    }

    /// Parses one JSON value at `depth`: the depth bound is checked on
    /// entry, but a scalar child is parsed at its parent's depth, and
    /// only container children (object/array) are parsed one level
    /// deeper. Callers decide which depth to pass by peeking ahead.
    fn parse_value(&mut self, depth: u32) -> Result<CanonicalValue, MapError> {
        if depth > MAX_DEPTH {
            return Err(MapError::LimitDepth(format!("exceeds MAX_DEPTH {MAX_DEPTH}")));
        }
        match self.peek() {
            Some('{') => self.parse_object(depth),
            Some('[') => self.parse_array(depth),
            Some('"') => Ok(CanonicalValue::String(self.parse_string()?)),
            Some('t') => {
                self.expect_literal("true")?;
                Ok(CanonicalValue::Boolean(true))
            }
            Some('f') => {
                self.expect_literal("false")?;
                Ok(CanonicalValue::Boolean(false))
            }
            Some('n') => {
                self.expect_literal("null")?;
                Err(MapError::Type("JSON null not allowed".into()))
            }
            Some('N') if self.rest().starts_with("NaN") => {
                Err(MapError::CanonMcf("NaN extension token not allowed".into()))
            }
            Some('I') if self.rest().starts_with("Infinity") => Err(MapError::CanonMcf(
                "Infinity extension token not allowed".into(),
            )),
            Some('-') if self.rest().starts_with("-Infinity") => Err(MapError::CanonMcf(
                "-Infinity extension token not allowed".into(),
            )),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(MapError::CanonMcf(format!("unexpected character '{c}'"))),
            None => Err(MapError::CanonMcf("unexpected end of input".into())),
        }
    }

    /// Depth to use for a value about to be parsed: one deeper than
    /// `depth` if the next non-whitespace token opens a container,
    /// otherwise unchanged — decided here by peeking before descending
    /// since Rust builds the tree as it parses.
    fn child_depth(&self, depth: u32) -> u32 {
        match self.peek() {
            Some('{') | Some('[') => depth + 1,
            _ => depth,
        }
    }

    fn parse_object(&mut self, depth: u32) -> Result<CanonicalValue, MapError> {
        self.expect('{')?;
        self.skip_ws();
        let mut entries: Vec<(String, CanonicalValue)> = Vec::new();
        let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();

        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(CanonicalValue::Map(entries));
        }

        loop {
            self.skip_ws();
            if self.peek() != Some('"') {
                return Err(MapError::Schema("JSON object key must be a string".into()));
            }
            let key = self.parse_string()?;
            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            let child_depth = self.child_depth(depth);
            let value = self.parse_value(child_depth)?;

            if seen.contains(&key) {
                self.dup_found = true;
            } else {
                seen.insert(key.clone());
                entries.push((key, value));
            }

            self.skip_ws();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    continue;
                }
                Some('}') => break,
                _ => return Err(MapError::CanonMcf("expected ',' or '}' in object".into())),
            }
        }
        Ok(CanonicalValue::Map(entries))
    }

    fn parse_array(&mut self, depth: u32) -> Result<CanonicalValue, MapError> {
        self.expect('[')?;
        self.skip_ws();
        let mut items = Vec::new();

        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(CanonicalValue::List(items));
        }

        loop {
            self.skip_ws();
            let child_depth = self.child_depth(depth);
            items.push(self.parse_value(child_depth)?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    continue;
                }
                Some(']') => break,
                _ => return Err(MapError::CanonMcf("expected ',' or ']' in array".into())),
            }
        }
        Ok(CanonicalValue::List(items))
    }

    fn parse_string(&mut self) -> Result<String, MapError> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            let ch = self
                .bump()
                .ok_or_else(|| MapError::CanonMcf("unterminated string".into()))?;
            match ch {
                '"' => break,
                '\\' => {
                    let esc = self
                        .bump()
                        .ok_or_else(|| MapError::CanonMcf("unterminated escape".into()))?;
                    match esc {
                        '"' => out.push('"'),
                        '\\' => out.push('\\'),
                        '/' => out.push('/'),
                        'b' => out.push('\u{0008}'),
                        'f' => out.push('\u{000C}'),
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        'u' => {
                            let hi = self.parse_hex4()?;
                            if (0xD800..=0xDBFF).contains(&hi) {
                                if !self.rest().starts_with("\\u") {
                                    return Err(MapError::Utf8(format!(
                                        "unpaired high surrogate U+{hi:04X}"
                                    )));
                                }
                                self.pos += 2;
                                let lo = self.parse_hex4()?;
                                if !(0xDC00..=0xDFFF).contains(&lo) {
                                    return Err(MapError::Utf8(format!(
                                        "invalid low surrogate U+{lo:04X}"
                                    )));
                                }
                                let cp = 0x10000
                                    + (u32::from(hi) - 0xD800) * 0x400
                                    + (u32::from(lo) - 0xDC00);
                                let c = char::from_u32(cp).ok_or_else(|| {
                                    MapError::Utf8(format!("invalid surrogate pair U+{cp:04X}"))
                                })?;
                                out.push(c);
                            } else if (0xDC00..=0xDFFF).contains(&hi) {
                                return Err(MapError::Utf8(format!(
                                    "lone low surrogate U+{hi:04X}"
                                )));
                            } else {
                                let c = char::from_u32(u32::from(hi)).ok_or_else(|| {
                                    MapError::Utf8(format!("invalid code point U+{hi:04X}"))
                                })?;
                                out.push(c);
                            }
                        }
                        other => {
                            return Err(MapError::CanonMcf(format!(
                                "invalid escape '\\{other}'"
                            )))
                        }
                    }
                }
                c if (c as u32) < 0x20 => {
                    return Err(MapError::CanonMcf(format!(
                        "unescaped control character U+{:04X}",
                        c as u32
                    )))
                }
                c => out.push(c),
            }
        }
        Ok(out)
    }

    fn parse_hex4(&mut self) -> Result<u16, MapError> {
        let rest = self.rest();
        if rest.len() < 4 || !rest.is_char_boundary(4) {
            return Err(MapError::CanonMcf("truncated \\u escape".into()));
        }
        let digits = &rest[..4];
        let v = u16::from_str_radix(digits, 16)
            .map_err(|_| MapError::CanonMcf(format!("invalid \\u escape '{digits}'")))?;
        self.pos += 4;
        Ok(v)
    }

    fn parse_number(&mut self) -> Result<CanonicalValue, MapError> {
        let start = self.pos;
        let mut is_float = false;

        if self.peek() == Some('-') {
            self.pos += 1;
        }
        match self.peek() {
            Some('0') => {
                self.pos += 1;
            }
            Some(c) if c.is_ascii_digit() => {
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            _ => return Err(MapError::CanonMcf("invalid number token".into())),
        }
        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(MapError::CanonMcf("invalid number token".into()));
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(MapError::CanonMcf("invalid number token".into()));
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let token = &self.s[start..self.pos];
        if is_float {
            return Err(MapError::Type(format!("JSON float not allowed: {token}")));
        }
        let as_i128: i128 = token
            .parse()
            .map_err(|_| MapError::CanonMcf(format!("invalid integer token '{token}'")))?;
        if as_i128 < i128::from(INT64_MIN) || as_i128 > i128::from(INT64_MAX) {
            return Err(MapError::Type(format!("integer overflow: {token}")));
        }
        Ok(CanonicalValue::Integer(as_i128 as i64))
    }
}
