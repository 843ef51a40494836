//! Decoder for PHP `serialize()` output as stored in WordPress post meta.

use super::coerce::Parsed;
use super::error::PhpDecodeError;

/// Maximum array nesting accepted by [`decode`].
pub const MAX_DEPTH: usize = 32;

/// Array key.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpKey {
    Int(i64),
    Str(String),
}

impl PhpKey {
    /// Integer value of the key, accepting integer-like string keys.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            PhpKey::Int(i) => Some(*i),
            PhpKey::Str(s) => s.trim().parse().ok(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            PhpKey::Int(i) => name.parse::<i64>().is_ok_and(|n| n == *i),
            PhpKey::Str(s) => s == name,
        }
    }
}

/// Decoded value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Ordered key/value pairs as serialized.
    Array(Vec<(PhpKey, PhpValue)>),
}

impl PhpValue {
    /// Values under integer keys, sorted by key. Empty for scalars.
    pub fn as_list(&self) -> Vec<&PhpValue> {
        let PhpValue::Array(entries) = self else {
            return Vec::new();
        };
        let mut indexed: Vec<(i64, &PhpValue)> = entries
            .iter()
            .filter_map(|(k, v)| k.as_index().map(|i| (i, v)))
            .collect();
        indexed.sort_by_key(|(i, _)| *i);
        indexed.into_iter().map(|(_, v)| v).collect()
    }

    /// Looks up a key by name.
    pub fn get(&self, name: &str) -> Option<&PhpValue> {
        match self {
            PhpValue::Array(entries) => entries.iter().find(|(k, _)| k.matches(name)).map(|(_, v)| v),
            _ => None,
        }
    }

    /// First value whose string key contains `needle`.
    pub fn find_key_containing(&self, needle: &str) -> Option<&PhpValue> {
        match self {
            PhpValue::Array(entries) => entries
                .iter()
                .find(|(k, _)| matches!(k, PhpKey::Str(s) if s.contains(needle)))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Scalar rendered as trimmed text; arrays and null render empty.
    pub fn to_text(&self) -> String {
        match self {
            PhpValue::Null | PhpValue::Array(_) => String::new(),
            PhpValue::Bool(b) => String::from(if *b { "1" } else { "" }),
            PhpValue::Int(i) => i.to_string(),
            PhpValue::Float(f) => f.to_string(),
            PhpValue::Str(s) => s.trim().to_string(),
        }
    }

    /// Text of the first list element for arrays, the scalar text otherwise.
    pub fn first_text(&self) -> String {
        match self {
            PhpValue::Array(_) => self.as_list().first().map(|v| v.to_text()).unwrap_or_default(),
            other => other.to_text(),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, PhpValue::Array(_))
    }
}

/// Decodes one serialized value. Input must be fully consumed.
pub fn decode(input: &str) -> Result<PhpValue, PhpDecodeError> {
    let mut decoder = Decoder {
        bytes: input.trim().as_bytes(),
        pos: 0,
    };
    let value = decoder.value(0)?;
    if decoder.pos != decoder.bytes.len() {
        return Err(PhpDecodeError::TrailingData { offset: decoder.pos });
    }
    Ok(value)
}

/// Decodes a serialized array into its list values.
///
/// Missing or blank input is an empty list. Anything that is not a decodable
/// array degrades to an empty list with the reason attached.
pub fn decode_list(raw: Option<&str>) -> Parsed<Vec<PhpValue>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Parsed::Ok(Vec::new());
    };
    if !raw.starts_with("a:") {
        return Parsed::Degraded {
            value: Vec::new(),
            reason: "value is not a serialized array".to_string(),
        };
    }
    match decode(raw) {
        Ok(value) => Parsed::Ok(value.as_list().into_iter().cloned().collect()),
        Err(e) => Parsed::Degraded {
            value: Vec::new(),
            reason: e.to_string(),
        },
    }
}

/// Decodes a list of strings, accepting a plain (non-serialized) string as a
/// single-element list. Empty strings are dropped.
pub fn decode_string_list(raw: Option<&str>) -> Parsed<Vec<String>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Parsed::Ok(Vec::new());
    };
    if !raw.starts_with("a:") {
        return Parsed::Ok(vec![raw.to_string()]);
    }
    decode_list(Some(raw)).map(|values| {
        values
            .iter()
            .filter(|v| matches!(v, PhpValue::Str(_)))
            .map(PhpValue::to_text)
            .filter(|s| !s.is_empty())
            .collect()
    })
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn value(&mut self, depth: usize) -> Result<PhpValue, PhpDecodeError> {
        let tag = self.next()?;
        match tag {
            b'N' => {
                self.expect(b';')?;
                Ok(PhpValue::Null)
            }
            b'b' => {
                self.expect(b':')?;
                let v = self.int_until(b';')?;
                Ok(PhpValue::Bool(v != 0))
            }
            b'i' => {
                self.expect(b':')?;
                Ok(PhpValue::Int(self.int_until(b';')?))
            }
            b'd' => {
                self.expect(b':')?;
                let start = self.pos;
                let text = self.until(b';')?;
                let v = text.parse::<f64>().map_err(|e| PhpDecodeError::InvalidNumber {
                    offset: start,
                    reason: e.to_string(),
                })?;
                Ok(PhpValue::Float(v))
            }
            b's' => {
                self.expect(b':')?;
                let s = self.string_body()?;
                self.expect(b';')?;
                Ok(PhpValue::Str(s))
            }
            b'a' => {
                if depth >= MAX_DEPTH {
                    return Err(PhpDecodeError::TooDeep {
                        offset: self.pos - 1,
                        max_depth: MAX_DEPTH,
                    });
                }
                self.expect(b':')?;
                let len = self.len_until(b':')?;
                self.expect(b'{')?;
                // Bounded by remaining input so a forged length cannot over-allocate.
                let mut entries = Vec::with_capacity(len.min(self.bytes.len() - self.pos));
                for _ in 0..len {
                    let key = self.key()?;
                    let value = self.value(depth + 1)?;
                    entries.push((key, value));
                }
                self.expect(b'}')?;
                Ok(PhpValue::Array(entries))
            }
            other => Err(PhpDecodeError::UnsupportedType {
                offset: self.pos - 1,
                tag: other as char,
            }),
        }
    }

    fn key(&mut self) -> Result<PhpKey, PhpDecodeError> {
        let offset = self.pos;
        match self.next()? {
            b'i' => {
                self.expect(b':')?;
                Ok(PhpKey::Int(self.int_until(b';')?))
            }
            b's' => {
                self.expect(b':')?;
                let s = self.string_body()?;
                self.expect(b';')?;
                Ok(PhpKey::Str(s))
            }
            other => Err(PhpDecodeError::UnsupportedType {
                offset,
                tag: other as char,
            }),
        }
    }

    /// `<len>:"<bytes>"` with `len` counted in bytes.
    fn string_body(&mut self) -> Result<String, PhpDecodeError> {
        let len = self.len_until(b':')?;
        self.expect(b'"')?;
        let end = self.pos.checked_add(len).filter(|end| *end <= self.bytes.len());
        let Some(end) = end else {
            return Err(PhpDecodeError::UnexpectedEof {
                offset: self.bytes.len(),
            });
        };
        let s = String::from_utf8_lossy(&self.bytes[self.pos..end]).into_owned();
        self.pos = end;
        self.expect(b'"')?;
        Ok(s)
    }

    fn next(&mut self) -> Result<u8, PhpDecodeError> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or(PhpDecodeError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, expected: u8) -> Result<(), PhpDecodeError> {
        let offset = self.pos;
        let found = self.next()?;
        if found != expected {
            return Err(PhpDecodeError::UnexpectedByte {
                offset,
                expected: expected as char,
                found: found as char,
            });
        }
        Ok(())
    }

    /// Consumes up to and including `terminator`, returning the text before it.
    fn until(&mut self, terminator: u8) -> Result<&'a str, PhpDecodeError> {
        let bytes: &'a [u8] = self.bytes;
        let start = self.pos;
        let rel = bytes[start..]
            .iter()
            .position(|b| *b == terminator)
            .ok_or(PhpDecodeError::UnexpectedEof {
                offset: bytes.len(),
            })?;
        self.pos = start + rel + 1;
        std::str::from_utf8(&bytes[start..start + rel]).map_err(|e| {
            PhpDecodeError::InvalidNumber {
                offset: start,
                reason: e.to_string(),
            }
        })
    }

    fn int_until(&mut self, terminator: u8) -> Result<i64, PhpDecodeError> {
        let start = self.pos;
        let text = self.until(terminator)?;
        text.parse::<i64>().map_err(|e| PhpDecodeError::InvalidNumber {
            offset: start,
            reason: e.to_string(),
        })
    }

    fn len_until(&mut self, terminator: u8) -> Result<usize, PhpDecodeError> {
        let start = self.pos;
        let text = self.until(terminator)?;
        text.parse::<usize>().map_err(|e| PhpDecodeError::InvalidNumber {
            offset: start,
            reason: e.to_string(),
        })
    }
}
