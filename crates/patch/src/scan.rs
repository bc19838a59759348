//! Top-level field scanner
//!
//! Walks the document left to right, one top-level entry at a time. A value
//! is skipped by its leading byte: strings to the closing unescaped quote,
//! objects and arrays to the matching close (strings inside are skipped so
//! quoted brackets never count), numbers through the JSON number grammar,
//! and `true`/`false`/`null` as literals. Keys are only compared at depth 0,
//! so a name that appears solely inside a nested value is never matched.
//!
//! The scanner never allocates for well-formed input without escaped keys.

use crate::number;
use fieldpatch_core::{LimitError, Limits, PatchError, ValueKind};
use std::borrow::Cow;
use std::ops::Range;

/// Byte range and kind of one top-level field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocation {
    /// Offset of the key's opening quote
    pub key_start: usize,
    /// First byte of the value
    pub value_start: usize,
    /// One past the last byte of the value
    pub value_end: usize,
    /// Kind of the value
    pub kind: ValueKind,
}

impl FieldLocation {
    /// Half-open byte range of the value
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.value_start..self.value_end
    }

    /// The value's text within `doc`
    #[inline]
    pub fn value<'a>(&self, doc: &'a str) -> &'a str {
        &doc[self.range()]
    }
}

/// One top-level entry: decoded key and value location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Key with escapes decoded
    pub key: Cow<'a, str>,
    /// Where the value lives
    pub location: FieldLocation,
}

/// Locate `field` at the top level of `doc` using default limits
///
/// Returns `Ok(None)` when the field is absent. Absence is an ordinary
/// outcome here; the caller decides whether it is fatal.
///
/// # Example
///
/// ```
/// use fieldpatch_patch::scan::locate;
/// use fieldpatch_core::ValueKind;
///
/// let doc = r#"{"a":{"b":1},"b":"7"}"#;
/// let loc = locate(doc, "b").unwrap().unwrap();
/// assert_eq!(loc.value(doc), r#""7""#);
/// assert_eq!(loc.kind, ValueKind::NumericString);
/// ```
pub fn locate(doc: &str, field: &str) -> Result<Option<FieldLocation>, PatchError> {
    locate_with(doc, field, &Limits::default())
}

/// Locate `field` at the top level of `doc`
///
/// The first occurrence wins if a key is duplicated.
pub fn locate_with(
    doc: &str,
    field: &str,
    limits: &Limits,
) -> Result<Option<FieldLocation>, PatchError> {
    let mut scanner = Scanner::new(doc, limits.max_nesting_depth);
    scanner.open_object()?;
    while let Some(raw) = scanner.next_entry()? {
        if raw.key_matches(doc, field)? {
            return Ok(Some(raw.location));
        }
    }
    scanner.finish()?;
    Ok(None)
}

/// Scan every top-level entry of `doc`, in document order
///
/// Unlike [`locate_with`], this walks the whole document and so also
/// rejects trailing garbage after the closing brace.
pub fn entries<'a>(doc: &'a str, limits: &Limits) -> Result<Vec<Entry<'a>>, PatchError> {
    let mut scanner = Scanner::new(doc, limits.max_nesting_depth);
    scanner.open_object()?;
    let mut out = Vec::new();
    while let Some(raw) = scanner.next_entry()? {
        out.push(Entry {
            key: raw.decode_key(doc)?,
            location: raw.location,
        });
    }
    scanner.finish()?;
    Ok(out)
}

/// Classify `text` if it is exactly one JSON value
///
/// Surrounding whitespace is allowed; anything else after the value is
/// rejected, so the text can replace a field value without adding entries.
pub fn value_kind(text: &str, limits: &Limits) -> Result<ValueKind, PatchError> {
    let mut scanner = Scanner::new(text, limits.max_nesting_depth);
    scanner.skip_ws();
    let kind = scanner.scan_value()?;
    scanner.skip_ws();
    if scanner.pos != scanner.src.len() {
        return Err(PatchError::malformed(scanner.pos, "trailing characters after value"));
    }
    Ok(kind)
}

// =============================================================================
// Scanner
// =============================================================================

/// Key span and value location of one entry, before key decoding
struct RawEntry {
    /// Content range of the key, quotes excluded
    key: Range<usize>,
    key_has_escape: bool,
    location: FieldLocation,
}

impl RawEntry {
    fn key_matches(&self, doc: &str, field: &str) -> Result<bool, PatchError> {
        if !self.key_has_escape {
            return Ok(&doc[self.key.clone()] == field);
        }
        Ok(self.decode_key(doc)? == field)
    }

    fn decode_key<'a>(&self, doc: &'a str) -> Result<Cow<'a, str>, PatchError> {
        if !self.key_has_escape {
            return Ok(Cow::Borrowed(&doc[self.key.clone()]));
        }
        // Include the surrounding quotes so the slice is a JSON string literal
        let quoted = &doc[self.key.start - 1..self.key.end + 1];
        serde_json::from_str::<String>(quoted)
            .map(Cow::Owned)
            .map_err(|_| PatchError::malformed(self.key.start - 1, "invalid escape in field name"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Just consumed the opening brace
    First,
    /// Consumed at least one entry
    Rest,
    /// Consumed the closing brace
    Closed,
}

struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
    max_depth: usize,
    state: State,
}

impl<'a> Scanner<'a> {
    fn new(doc: &'a str, max_depth: usize) -> Self {
        Self {
            src: doc.as_bytes(),
            pos: 0,
            max_depth,
            state: State::First,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    #[inline]
    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8, reason: &'static str) -> Result<(), PatchError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(PatchError::malformed(self.pos, reason))
        }
    }

    fn open_object(&mut self) -> Result<(), PatchError> {
        self.skip_ws();
        self.expect(b'{', "document must be a JSON object")
    }

    /// Only whitespace may follow the closing brace
    fn finish(&mut self) -> Result<(), PatchError> {
        self.skip_ws();
        if self.pos != self.src.len() {
            return Err(PatchError::malformed(self.pos, "trailing characters after object"));
        }
        Ok(())
    }

    /// Advance over the next top-level entry, or the closing brace
    fn next_entry(&mut self) -> Result<Option<RawEntry>, PatchError> {
        self.skip_ws();
        match self.state {
            State::Closed => return Ok(None),
            State::First => {
                if self.peek() == Some(b'}') {
                    self.pos += 1;
                    self.state = State::Closed;
                    return Ok(None);
                }
            }
            State::Rest => match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                }
                Some(b'}') => {
                    self.pos += 1;
                    self.state = State::Closed;
                    return Ok(None);
                }
                _ => return Err(PatchError::malformed(self.pos, "expected ',' or '}'")),
            },
        }

        if self.peek() != Some(b'"') {
            return Err(PatchError::malformed(self.pos, "expected field name"));
        }
        let key_start = self.pos;
        let (key, key_has_escape) = self.scan_string()?;

        self.skip_ws();
        self.expect(b':', "expected ':' after field name")?;
        self.skip_ws();

        let value_start = self.pos;
        let kind = self.scan_value()?;
        let value_end = self.pos;

        // The delimiter is consumed by the next call, but checked now so a
        // returned location is always followed by ',' or '}'
        self.skip_ws();
        if !matches!(self.peek(), Some(b',' | b'}')) {
            return Err(PatchError::malformed(self.pos, "expected ',' or '}'"));
        }
        self.state = State::Rest;

        Ok(Some(RawEntry {
            key,
            key_has_escape,
            location: FieldLocation {
                key_start,
                value_start,
                value_end,
                kind,
            },
        }))
    }

    /// Skip the value at the cursor and classify it
    fn scan_value(&mut self) -> Result<ValueKind, PatchError> {
        match self.peek() {
            Some(b'"') => {
                let (content, has_escape) = self.scan_string()?;
                let text = &self.src[content];
                if !has_escape && number::is_json_number_bytes(text) {
                    Ok(ValueKind::NumericString)
                } else {
                    Ok(ValueKind::String)
                }
            }
            Some(b'{' | b'[') => {
                self.scan_nested()?;
                Ok(ValueKind::Other)
            }
            Some(b'-' | b'0'..=b'9') => {
                self.scan_number()?;
                Ok(ValueKind::Number)
            }
            Some(b't') => self.scan_literal(b"true"),
            Some(b'f') => self.scan_literal(b"false"),
            Some(b'n') => self.scan_literal(b"null"),
            Some(_) => Err(PatchError::malformed(self.pos, "unexpected character in value")),
            None => Err(PatchError::malformed(self.pos, "unexpected end of document")),
        }
    }

    /// Cursor on an opening quote; returns the content range
    fn scan_string(&mut self) -> Result<(Range<usize>, bool), PatchError> {
        let open = self.pos;
        let mut i = open + 1;
        let mut has_escape = false;
        loop {
            match self.src.get(i) {
                None => return Err(PatchError::malformed(open, "unterminated string")),
                Some(b'\\') => {
                    has_escape = true;
                    i += 2;
                }
                Some(b'"') => break,
                Some(_) => i += 1,
            }
        }
        self.pos = i + 1;
        Ok((open + 1..i, has_escape))
    }

    /// Cursor on `{` or `[`; skips to the matching close
    fn scan_nested(&mut self) -> Result<(), PatchError> {
        let open = self.pos;
        let mut closers: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                None => return Err(PatchError::malformed(open, "unbalanced brackets")),
                Some(b'"') => {
                    self.scan_string()?;
                }
                Some(b @ (b'{' | b'[')) => {
                    closers.push(if b == b'{' { b'}' } else { b']' });
                    if closers.len() > self.max_depth {
                        return Err(LimitError::NestingTooDeep {
                            actual: closers.len(),
                            max: self.max_depth,
                        }
                        .into());
                    }
                    self.pos += 1;
                }
                Some(b @ (b'}' | b']')) => {
                    if closers.pop() != Some(b) {
                        return Err(PatchError::malformed(self.pos, "mismatched closing bracket"));
                    }
                    self.pos += 1;
                    if closers.is_empty() {
                        return Ok(());
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn scan_number(&mut self) -> Result<(), PatchError> {
        let start = self.pos;
        while let Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E') = self.peek() {
            self.pos += 1;
        }
        if !number::is_json_number_bytes(&self.src[start..self.pos]) {
            return Err(PatchError::malformed(start, "invalid number"));
        }
        Ok(())
    }

    fn scan_literal(&mut self, literal: &'static [u8]) -> Result<ValueKind, PatchError> {
        if !self.src[self.pos..].starts_with(literal) {
            return Err(PatchError::malformed(self.pos, "invalid literal"));
        }
        self.pos += literal.len();
        Ok(ValueKind::Other)
    }
}
