//! TOON decoding.
//!
//! This module parses TOON text back into a [`Value`] tree. The pipeline:
//! a scanner turns the input into indent-annotated line records behind a
//! [`Cursor`], parser primitives pick apart array headers, keys and scalar
//! tokens, and the value decoder dispatches at each cursor position to the
//! object, array or root-primitive rules.
//!
//! ## Strict mode
//!
//! With `strict` enabled (the default), the decoder rejects tab
//! indentation, indents that are not a multiple of the indent unit,
//! declared array lengths that do not match the element count, and invalid
//! escape sequences. With it disabled, those conditions are tolerated: a
//! tab counts as one space, depth division floors, and the actual element
//! count wins.
//!
//! ## Usage
//!
//! ```rust
//! use toon_codec::{decode, DecodeOptions, Value};
//!
//! let value = decode("x: 1\ny: 2", &DecodeOptions::default()).unwrap();
//! assert_eq!(value.as_object().unwrap().get("x"), Some(&Value::Number(1.0)));
//! ```
//!
//! The serde bridge lives here too: [`ValueDeserializer`] drives
//! `Deserialize` impls from a decoded [`Value`] tree.

use crate::ser::{is_expandable_key, is_numeric_literal};
use crate::value::number_value;
use crate::{ArrayKind, DecodeOptions, Delimiter, Error, PathExpansion, Result, ToonMap, Value};
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// One non-blank input line with its indentation resolved to a depth.
#[derive(Debug, Clone)]
pub(crate) struct ParsedLine {
    pub content: String,
    pub indent: usize,
    pub depth: usize,
    pub line_number: usize,
}

/// A blank or whitespace-only line, kept out of the content stream.
#[derive(Debug, Clone)]
pub(crate) struct BlankLine {
    #[allow(dead_code)]
    pub indent: usize,
    pub line_number: usize,
}

pub(crate) enum ScannedLine {
    Content(ParsedLine),
    Blank(BlankLine),
}

/// Scan one raw line: count leading spaces, trim trailing whitespace,
/// resolve the depth. Strict mode rejects tabs in the indentation and
/// indents that are not a multiple of the unit; non-strict counts a tab as
/// one space and floors the division.
pub(crate) fn scan_line(
    raw: &str,
    line_number: usize,
    unit: usize,
    strict: bool,
) -> Result<ScannedLine> {
    let mut indent = 0usize;
    let mut offset = 0usize;
    for ch in raw.chars() {
        match ch {
            ' ' => {
                indent += 1;
                offset += 1;
            }
            '\t' => {
                if strict {
                    return Err(Error::TabsNotAllowed { line: line_number });
                }
                indent += 1;
                offset += 1;
            }
            _ => break,
        }
    }
    let content = raw[offset..].trim_end();
    if content.is_empty() {
        return Ok(ScannedLine::Blank(BlankLine {
            indent,
            line_number,
        }));
    }
    let unit = unit.max(1);
    if strict && indent % unit != 0 {
        return Err(Error::IndentNotMultiple {
            line: line_number,
            found: indent,
            unit,
        });
    }
    Ok(ScannedLine::Content(ParsedLine {
        content: content.to_string(),
        indent,
        depth: indent / unit,
        line_number,
    }))
}

/// Position over the scanned lines of one document. Advancing only moves
/// the position; the underlying line buffer is never mutated.
pub(crate) struct Cursor {
    lines: Vec<ParsedLine>,
    blank_lines: Vec<BlankLine>,
    pos: usize,
}

impl Cursor {
    pub(crate) fn new(lines: Vec<ParsedLine>, blank_lines: Vec<BlankLine>) -> Self {
        Cursor {
            lines,
            blank_lines,
            pos: 0,
        }
    }

    pub(crate) fn peek(&self) -> Option<&ParsedLine> {
        self.lines.get(self.pos)
    }

    pub(crate) fn peek_ahead(&self, k: usize) -> Option<&ParsedLine> {
        self.lines.get(self.pos + k)
    }

    pub(crate) fn advance(&mut self) {
        self.pos += 1;
    }

    pub(crate) fn remaining(&self) -> usize {
        self.lines.len() - self.pos
    }

    #[allow(dead_code)]
    pub(crate) fn blank_lines(&self) -> &[BlankLine] {
        &self.blank_lines
    }
}

/// Scan a whole document into a cursor.
pub(crate) fn scan_document(input: &str, options: &DecodeOptions) -> Result<Cursor> {
    scan_lines(input.lines(), options)
}

/// Scan an external line sequence into a cursor.
pub(crate) fn scan_lines<I, S>(lines: I, options: &DecodeOptions) -> Result<Cursor>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut content = Vec::new();
    let mut blanks = Vec::new();
    for (idx, raw) in lines.into_iter().enumerate() {
        match scan_line(raw.as_ref(), idx + 1, options.indent, options.strict)? {
            ScannedLine::Content(line) => content.push(line),
            ScannedLine::Blank(blank) => blanks.push(blank),
        }
    }
    Ok(Cursor::new(content, blanks))
}

// ---------------------------------------------------------------------------
// Parser primitives
// ---------------------------------------------------------------------------

/// First index of `target` outside any double-quoted run.
pub(crate) fn find_unquoted(s: &str, target: u8) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut in_quotes = false;
    while i < bytes.len() {
        let c = bytes[i];
        if in_quotes {
            if c == b'\\' {
                i += 2;
                continue;
            }
            if c == b'"' {
                in_quotes = false;
            }
        } else if c == b'"' {
            in_quotes = true;
        } else if c == target {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Index of the closing quote for a run whose opening quote sits just
/// before `start`, skipping escape sequences.
pub(crate) fn find_closing_quote(s: &str, start: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Undo JSON-style escapes. Strict mode raises [`Error::BadEscape`] for
/// unknown sequences; non-strict preserves them literally. `\uXXXX` with
/// bad hex is an error in both modes.
pub(crate) fn unescape(s: &str, strict: bool, line: usize) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let mut hex = String::with_capacity(4);
                for _ in 0..4 {
                    match chars.next() {
                        Some(h) if h.is_ascii_hexdigit() => hex.push(h),
                        _ => {
                            return Err(Error::BadEscape {
                                line,
                                sequence: format!("u{}", hex),
                            })
                        }
                    }
                }
                let code = u32::from_str_radix(&hex, 16).map_err(|_| Error::BadEscape {
                    line,
                    sequence: format!("u{}", hex),
                })?;
                match char::from_u32(code) {
                    Some(ch) => out.push(ch),
                    None => {
                        return Err(Error::BadEscape {
                            line,
                            sequence: format!("u{}", hex),
                        })
                    }
                }
            }
            Some(other) => {
                if strict {
                    return Err(Error::BadEscape {
                        line,
                        sequence: other.to_string(),
                    });
                }
                out.push('\\');
                out.push(other);
            }
            None => {
                if strict {
                    return Err(Error::BadEscape {
                        line,
                        sequence: String::new(),
                    });
                }
                out.push('\\');
            }
        }
    }
    Ok(out)
}

/// Parse a key at the start of `content`. Returns the key, the byte index
/// just past it, and whether it was quoted. Unquoted keys run to the first
/// `:` or `[`.
pub(crate) fn parse_key_token(
    content: &str,
    line: usize,
    strict: bool,
) -> Result<(String, usize, bool)> {
    if let Some(rest) = content.strip_prefix('"') {
        let close = find_closing_quote(rest, 0)
            .map(|i| i + 1)
            .ok_or_else(|| Error::syntax(line, "unterminated quoted key"))?;
        let key = unescape(&content[1..close], strict, line)?;
        Ok((key, close + 1, true))
    } else {
        let colon = content.find(':');
        let bracket = content.find('[');
        let end = match (colon, bracket) {
            (Some(c), Some(b)) => c.min(b),
            (Some(c), None) => c,
            (None, Some(b)) => b,
            (None, None) => content.len(),
        };
        Ok((content[..end].trim().to_string(), end, false))
    }
}

/// Parse one scalar token: `null`, booleans, numbers, quoted strings, bare
/// strings. A token matching the numeric pattern that does not parse to a
/// finite double is [`Error::BadNumber`] in strict mode and null otherwise.
pub(crate) fn parse_primitive_token(token: &str, strict: bool, line: usize) -> Result<Value> {
    let s = token.trim();
    if s.starts_with('"') {
        match find_closing_quote(s, 1) {
            Some(close) if close == s.len() - 1 => {
                return Ok(Value::String(unescape(&s[1..close], strict, line)?));
            }
            _ => return Err(Error::syntax(line, "unterminated quoted string")),
        }
    }
    match s {
        "null" => return Ok(Value::Null),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    if is_numeric_literal(s) {
        return match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(number_value(f)),
            _ => {
                if strict {
                    Err(Error::BadNumber {
                        line,
                        token: s.to_string(),
                    })
                } else {
                    Ok(Value::Null)
                }
            }
        };
    }
    Ok(Value::String(s.to_string()))
}

/// Split on the delimiter outside quoted runs; tokens are
/// whitespace-trimmed but keep their quotes for the scalar parser.
pub(crate) fn split_delimited(s: &str, delimiter: u8) -> Vec<String> {
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut in_quotes = false;
    while i < bytes.len() {
        let c = bytes[i];
        if in_quotes {
            if c == b'\\' {
                i += 2;
                continue;
            }
            if c == b'"' {
                in_quotes = false;
            }
        } else if c == b'"' {
            in_quotes = true;
        } else if c == delimiter {
            parts.push(s[start..i].trim().to_string());
            start = i + 1;
        }
        i += 1;
    }
    parts.push(s[start..].trim().to_string());
    parts
}

/// Parsed form of an array header line such as `key[3]{a,b}:` or
/// `[2|]: x|y`.
#[derive(Debug, Clone)]
pub(crate) struct ArrayHeader {
    pub key: Option<String>,
    pub key_was_quoted: bool,
    pub length: usize,
    pub delimiter: Delimiter,
    /// Column names with their was-quoted bits, for tabular headers.
    pub fields: Option<Vec<(String, bool)>>,
    pub inline_values: Option<String>,
    pub line: usize,
}

/// Try to read an array header from a line. Returns `Ok(None)` when the
/// line is not header-shaped (no unquoted `[`, or a key-value colon comes
/// first); malformed brackets are hard errors.
pub(crate) fn parse_array_header(
    content: &str,
    line: usize,
    strict: bool,
) -> Result<Option<ArrayHeader>> {
    let bracket = match find_unquoted(content, b'[') {
        Some(i) => i,
        None => return Ok(None),
    };
    if let Some(colon) = find_unquoted(content, b':') {
        if colon < bracket {
            return Ok(None);
        }
    }

    let (key, key_was_quoted) = if bracket == 0 {
        (None, false)
    } else {
        let prefix = &content[..bracket];
        let (key, end, quoted) = parse_key_token(prefix, line, strict)?;
        if !prefix[end..].trim().is_empty() {
            return Ok(None);
        }
        (Some(key), quoted)
    };

    let close = find_unquoted(&content[bracket..], b']')
        .map(|i| i + bracket)
        .ok_or_else(|| Error::bad_header(line, "missing `]`"))?;
    let interior = &content[bracket + 1..close];
    if interior.is_empty() {
        return Err(Error::bad_header(line, "empty brackets"));
    }
    if interior.starts_with('-') {
        return Err(Error::bad_header(line, "negative array length"));
    }
    let (digits, delimiter) = match interior.chars().last().and_then(Delimiter::from_marker) {
        Some(delim) => (&interior[..interior.len() - 1], delim),
        None => (interior, Delimiter::Comma),
    };
    let length: usize = digits
        .parse()
        .map_err(|_| Error::bad_header(line, format!("invalid array length `{}`", digits)))?;

    let mut rest = &content[close + 1..];
    let mut fields = None;
    if let Some(after_brace) = rest.strip_prefix('{') {
        let brace_close = find_unquoted(after_brace, b'}')
            .ok_or_else(|| Error::bad_header(line, "missing `}`"))?;
        let inner = &after_brace[..brace_close];
        if inner.trim().is_empty() {
            return Err(Error::bad_header(line, "empty field list"));
        }
        let mut parsed = Vec::new();
        for token in split_delimited(inner, delimiter.as_char() as u8) {
            if let Some(stripped) = token.strip_prefix('"') {
                match find_closing_quote(stripped, 0) {
                    Some(i) if i + 1 == stripped.len() => {
                        parsed.push((unescape(&stripped[..i], strict, line)?, true));
                    }
                    _ => return Err(Error::bad_header(line, "malformed quoted field name")),
                }
            } else if token.is_empty() {
                return Err(Error::bad_header(line, "empty field name"));
            } else {
                parsed.push((token, false));
            }
        }
        fields = Some(parsed);
        rest = &after_brace[brace_close + 1..];
    }

    let after_colon = rest
        .strip_prefix(':')
        .ok_or_else(|| Error::bad_header(line, "missing `:`"))?;
    let trimmed = after_colon.trim();
    let inline_values = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    };

    Ok(Some(ArrayHeader {
        key,
        key_was_quoted,
        length,
        delimiter,
        fields,
        inline_values,
        line,
    }))
}

/// Does an unquoted delimiter occur before any unquoted colon?
pub(crate) fn delimiter_before_colon(content: &str, delimiter: u8) -> bool {
    let delim = find_unquoted(content, delimiter);
    let colon = find_unquoted(content, b':');
    match (delim, colon) {
        (Some(d), Some(c)) => d < c,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Tabular rows and key-value lines can share a depth; decide which one a
/// line is. No colon means row; no delimiter means key-value; delimiter
/// before the colon means row; otherwise the next line at the same depth
/// settles it.
pub(crate) fn is_tabular_row(
    content: &str,
    delimiter: u8,
    next: Option<&ParsedLine>,
    row_depth: usize,
) -> bool {
    let colon = match find_unquoted(content, b':') {
        None => return true,
        Some(c) => c,
    };
    let delim = match find_unquoted(content, delimiter) {
        None => return false,
        Some(d) => d,
    };
    if delim < colon {
        return true;
    }
    match next {
        Some(line) if line.depth == row_depth => delimiter_before_colon(&line.content, delimiter),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Value decoder
// ---------------------------------------------------------------------------

/// Decode a whole document at the cursor.
pub(crate) fn decode_document(cursor: &mut Cursor, options: &DecodeOptions) -> Result<Value> {
    let first = match cursor.peek() {
        None => return Ok(Value::Object(ToonMap::new())),
        Some(line) => line.clone(),
    };

    if let Some(header) = parse_array_header(&first.content, first.line_number, options.strict)? {
        if header.key.is_none() {
            cursor.advance();
            let value = decode_array(header, cursor, first.depth, options)?;
            ensure_consumed(cursor)?;
            return Ok(value);
        }
    }

    if cursor.remaining() == 1 && find_unquoted(&first.content, b':').is_none() {
        cursor.advance();
        return parse_primitive_token(&first.content, options.strict, first.line_number);
    }

    let value = decode_object(cursor, first.depth, options)?;
    ensure_consumed(cursor)?;
    Ok(value)
}

fn ensure_consumed(cursor: &Cursor) -> Result<()> {
    match cursor.peek() {
        Some(line) => Err(Error::syntax(line.line_number, "unexpected content")),
        None => Ok(()),
    }
}

/// Decode the key-value lines of an object at an exact depth.
fn decode_object(cursor: &mut Cursor, depth: usize, options: &DecodeOptions) -> Result<Value> {
    let mut entries: Vec<(String, Value, bool)> = Vec::new();
    while let Some(line) = cursor.peek() {
        if line.depth < depth {
            break;
        }
        if line.depth > depth {
            return Err(Error::syntax(line.line_number, "unexpected indentation"));
        }
        let line = line.clone();
        cursor.advance();
        entries.push(decode_entry_line(&line, cursor, depth, options)?);
    }
    seal_object(entries, options)
}

/// Decode one `key: …` line (including `key[N]…` array headers). The four
/// value forms: keyed array, inline primitive, nested object when the next
/// line is deeper, and null when nothing follows.
fn decode_entry_line(
    line: &ParsedLine,
    cursor: &mut Cursor,
    kv_depth: usize,
    options: &DecodeOptions,
) -> Result<(String, Value, bool)> {
    let content = &line.content;
    let ln = line.line_number;

    if let Some(header) = parse_array_header(content, ln, options.strict)? {
        match header.key.clone() {
            Some(key) => {
                let quoted = header.key_was_quoted;
                let value = decode_array(header, cursor, kv_depth, options)?;
                return Ok((key, value, quoted));
            }
            None => return Err(Error::syntax(ln, "array header without a key")),
        }
    }

    let (key, end, was_quoted) = parse_key_token(content, ln, options.strict)?;
    let rest = content[end..].trim_start();
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| Error::syntax(ln, "expected `:` after key"))?
        .trim();

    if rest.is_empty() {
        if let Some(next) = cursor.peek() {
            if next.depth > kv_depth {
                let value = decode_object(cursor, kv_depth + 1, options)?;
                return Ok((key, value, was_quoted));
            }
        }
        return Ok((key, Value::Null, was_quoted));
    }

    let value = parse_primitive_token(rest, options.strict, ln)?;
    Ok((key, value, was_quoted))
}

/// Decode an array body given its parsed header. `header_depth` is the
/// depth of the line the header appeared on (logically — the first field of
/// a list item counts one level deeper than its hyphen line).
fn decode_array(
    header: ArrayHeader,
    cursor: &mut Cursor,
    header_depth: usize,
    options: &DecodeOptions,
) -> Result<Value> {
    let delim = header.delimiter.as_char() as u8;

    if let Some(inline) = &header.inline_values {
        let mut items = Vec::new();
        for token in split_delimited(inline, delim) {
            items.push(parse_primitive_token(&token, options.strict, header.line)?);
        }
        if options.strict && items.len() != header.length {
            return Err(Error::length_mismatch(
                header.line,
                header.length,
                items.len(),
                ArrayKind::Inline,
            ));
        }
        return Ok(Value::Array(items));
    }

    if let Some(fields) = &header.fields {
        let row_depth = header_depth + 1;
        let mut rows = Vec::new();
        loop {
            let line = match cursor.peek() {
                Some(l) if l.depth >= row_depth => l.clone(),
                _ => break,
            };
            if line.depth > row_depth {
                return Err(Error::syntax(line.line_number, "unexpected indentation"));
            }
            if !is_tabular_row(&line.content, delim, cursor.peek_ahead(1), row_depth) {
                break;
            }
            cursor.advance();
            let cells = split_delimited(&line.content, delim);
            if options.strict && cells.len() != fields.len() {
                return Err(Error::length_mismatch(
                    line.line_number,
                    fields.len(),
                    cells.len(),
                    ArrayKind::Tabular,
                ));
            }
            let mut entries = Vec::with_capacity(fields.len());
            for (i, (name, field_quoted)) in fields.iter().enumerate() {
                let value = match cells.get(i) {
                    Some(cell) => parse_primitive_token(cell, options.strict, line.line_number)?,
                    None => Value::Null,
                };
                entries.push((name.clone(), value, *field_quoted));
            }
            rows.push(seal_object(entries, options)?);
        }
        if options.strict && rows.len() != header.length {
            return Err(Error::length_mismatch(
                header.line,
                header.length,
                rows.len(),
                ArrayKind::Tabular,
            ));
        }
        return Ok(Value::Array(rows));
    }

    let item_depth = header_depth + 1;
    let mut items = Vec::new();
    loop {
        let line = match cursor.peek() {
            Some(l) if l.depth >= item_depth => l.clone(),
            _ => break,
        };
        if line.depth > item_depth {
            return Err(Error::syntax(line.line_number, "unexpected indentation"));
        }
        if line.content != "-" && !line.content.starts_with("- ") {
            break;
        }
        cursor.advance();
        items.push(decode_list_item(&line, cursor, item_depth, options)?);
    }
    if options.strict && items.len() != header.length {
        return Err(Error::length_mismatch(
            header.line,
            header.length,
            items.len(),
            ArrayKind::List,
        ));
    }
    Ok(Value::Array(items))
}

/// Decode one `- ` list item: a bare `-` is an empty object, a nested
/// array header continues on the following lines, a `key: value` opens an
/// object whose remaining fields sit one level deeper, anything else is a
/// primitive.
fn decode_list_item(
    line: &ParsedLine,
    cursor: &mut Cursor,
    item_depth: usize,
    options: &DecodeOptions,
) -> Result<Value> {
    let ln = line.line_number;
    let rest = if line.content == "-" {
        ""
    } else {
        line.content[2..].trim()
    };
    if rest.is_empty() {
        return Ok(Value::Object(ToonMap::new()));
    }

    if let Some(header) = parse_array_header(rest, ln, options.strict)? {
        match header.key.clone() {
            None => return decode_array(header, cursor, item_depth, options),
            Some(key) => {
                let quoted = header.key_was_quoted;
                let value = decode_array(header, cursor, item_depth + 1, options)?;
                let mut entries = vec![(key, value, quoted)];
                decode_item_fields(cursor, item_depth + 1, &mut entries, options)?;
                return seal_object(entries, options);
            }
        }
    }

    if find_unquoted(rest, b':').is_some() {
        let synthetic = ParsedLine {
            content: rest.to_string(),
            indent: line.indent,
            depth: item_depth,
            line_number: ln,
        };
        let first = decode_entry_line(&synthetic, cursor, item_depth + 1, options)?;
        let mut entries = vec![first];
        decode_item_fields(cursor, item_depth + 1, &mut entries, options)?;
        return seal_object(entries, options);
    }

    parse_primitive_token(rest, options.strict, ln)
}

/// Collect the continuation fields of an object that started on a hyphen
/// line.
fn decode_item_fields(
    cursor: &mut Cursor,
    field_depth: usize,
    entries: &mut Vec<(String, Value, bool)>,
    options: &DecodeOptions,
) -> Result<()> {
    while let Some(line) = cursor.peek() {
        if line.depth < field_depth {
            break;
        }
        if line.depth > field_depth {
            return Err(Error::syntax(line.line_number, "unexpected indentation"));
        }
        if line.content == "-" || line.content.starts_with("- ") {
            break;
        }
        let line = line.clone();
        cursor.advance();
        if find_unquoted(&line.content, b':').is_none()
            && parse_array_header(&line.content, line.line_number, options.strict)?.is_none()
        {
            return Err(Error::InvalidObjectListItem {
                line: line.line_number,
            });
        }
        entries.push(decode_entry_line(&line, cursor, field_depth, options)?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Path expander
// ---------------------------------------------------------------------------

/// Build an object from decoded `(key, value, was_quoted)` triples. With
/// path expansion on, unquoted identifier-safe dotted keys become nested
/// objects; everything else inserts literally, last occurrence winning.
pub(crate) fn seal_object(
    entries: Vec<(String, Value, bool)>,
    options: &DecodeOptions,
) -> Result<Value> {
    let mut map = ToonMap::new();
    for (key, value, was_quoted) in entries {
        if options.expand_paths == PathExpansion::Safe && !was_quoted && is_expandable_key(&key) {
            let segments: Vec<&str> = key.split('.').collect();
            insert_expanded(&mut map, &segments, value, options.strict, &key)?;
        } else {
            map.insert(key, value);
        }
    }
    Ok(Value::Object(map))
}

fn insert_expanded(
    map: &mut ToonMap,
    segments: &[&str],
    value: Value,
    strict: bool,
    full_path: &str,
) -> Result<()> {
    let (head, tail) = segments.split_first().expect("non-empty path");
    if tail.is_empty() {
        match map.get_mut(head) {
            Some(existing) => merge_value(existing, value, strict, full_path)?,
            None => {
                map.insert((*head).to_string(), value);
            }
        }
        return Ok(());
    }
    match map.get_mut(head) {
        Some(Value::Object(_)) => {}
        Some(_) => {
            if strict {
                return Err(Error::ExpansionConflict {
                    path: full_path.to_string(),
                });
            }
            map.insert((*head).to_string(), Value::Object(ToonMap::new()));
        }
        None => {
            map.insert((*head).to_string(), Value::Object(ToonMap::new()));
        }
    }
    if let Some(Value::Object(child)) = map.get_mut(head) {
        insert_expanded(child, tail, value, strict, full_path)?;
    }
    Ok(())
}

/// Deep-merge an incoming value into an existing slot. Object-into-object
/// merges key by key; any other pairing is a conflict in strict mode and a
/// last-write-wins overwrite otherwise.
fn merge_value(existing: &mut Value, incoming: Value, strict: bool, path: &str) -> Result<()> {
    match (existing, incoming) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, value) in b {
                match a.get_mut(&key) {
                    Some(slot) => merge_value(slot, value, strict, path)?,
                    None => {
                        a.insert(key, value);
                    }
                }
            }
            Ok(())
        }
        (slot, incoming) => {
            if strict {
                return Err(Error::ExpansionConflict {
                    path: path.to_string(),
                });
            }
            *slot = incoming;
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Serde bridge: Value -> T
// ---------------------------------------------------------------------------

/// Serde `Deserializer` over an owned [`Value`] tree.
///
/// Whole numbers are handed to visitors as integers (`u64` when
/// non-negative, `i64` otherwise) so integer struct fields deserialize
/// naturally from the f64 value model; everything else visits as its own
/// shape.
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

fn visit_number<'de, V>(f: f64, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    if f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64 {
        visitor.visit_u64(f as u64)
    } else if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        visitor.visit_i64(f as i64)
    } else {
        visitor.visit_f64(f)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(f) => visit_number(f, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) => {
                if obj.len() == 1 {
                    let (variant, value) = obj.into_iter().next().expect("len checked");
                    visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    })
                } else {
                    Err(Error::custom("expected single-entry object for enum"))
                }
            }
            _ => Err(Error::custom("expected enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: ToonMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            _ => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(obj)) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}
