//! TOON encoding.
//!
//! This module turns a [`Value`] tree into TOON text. The pipeline is:
//! quoting rules decide how scalars and keys appear, a shape analysis picks
//! the physical layout for each array, optional key collapsing fuses
//! single-key wrapper chains, and a line writer assembles the indented
//! output.
//!
//! ## Array layouts
//!
//! - **Inline**: every element is primitive — `key[3]: 1,2,3`
//! - **Tabular**: every element is an object with the same primitive-valued
//!   key set — `key[2]{id,name}:` followed by one row per element
//! - **List**: everything else — `key[2]:` followed by `- ` items
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use toon_codec::{encode, toon, EncodeOptions};
//!
//! let value = toon!({ "name": "Alice", "age": 30 });
//! let out = encode(&value, &EncodeOptions::default()).unwrap();
//! assert_eq!(out, "name: Alice\nage: 30");
//! ```
//!
//! The serde bridge lives here too: [`ValueSerializer`] normalizes any
//! `T: Serialize` into a [`Value`] tree (all numbers widen to `f64`,
//! non-finite floats become null, map keys coerce to strings).

use crate::value::number_value;
use crate::{EncodeOptions, Error, KeyCollapsing, Result, ToonMap, Value};
use serde::{ser, Serialize};
use std::collections::HashSet;

/// Maximum nesting depth accepted by the normalizer and the encoder.
pub(crate) const MAX_DEPTH: usize = 1000;

// ---------------------------------------------------------------------------
// Quoting
// ---------------------------------------------------------------------------

/// Test for the bare identifier pattern `^[A-Za-z_][A-Za-z0-9_]*$`.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Test whether a key would be eligible for path expansion: two or more
/// dot-separated segments, every one of them a bare identifier.
pub(crate) fn is_expandable_key(key: &str) -> bool {
    key.contains('.') && key.split('.').all(is_identifier)
}

/// Matches the numeric literal pattern `^-?\d+(\.\d+)?([eE][+-]?\d+)?$`.
pub(crate) fn is_numeric_literal(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && b[i] == b'-' {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return false;
    }
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == b.len()
}

/// Determine if a string value must be quoted to survive a round trip.
///
/// A string is quoted if it is empty or all whitespace, has leading or
/// trailing spaces, would read back as a keyword or number, contains
/// structural characters (`[` `]` `{` `}` `-` `:` `"` `\`), contains the
/// active delimiter, or contains newline/CR/tab.
pub(crate) fn needs_quoting(s: &str, delimiter: char) -> bool {
    if s.is_empty() || s.trim().is_empty() {
        return true;
    }
    // Any whitespace at the edges would be lost to indent counting or
    // trailing-whitespace trimming.
    if s.chars().next().is_some_and(char::is_whitespace)
        || s.chars().last().is_some_and(char::is_whitespace)
    {
        return true;
    }
    if s == "true" || s == "false" || s == "null" {
        return true;
    }
    if is_numeric_literal(s) {
        return true;
    }
    s.chars().any(|c| {
        c == delimiter
            || matches!(
                c,
                '[' | ']' | '{' | '}' | '-' | ':' | '"' | '\\' | '\n' | '\r' | '\t'
            )
    })
}

/// JSON-style escaping in a single pass. Only the characters that would
/// break the line grammar are escaped; other control characters pass
/// through literally.
fn write_escaped(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
}

fn write_string(s: &str, delimiter: char, out: &mut String) {
    if needs_quoting(s, delimiter) {
        out.push('"');
        write_escaped(s, out);
        out.push('"');
    } else {
        out.push_str(s);
    }
}

/// Format a number for the wire: non-finite prints as `null`, negative zero
/// as `0`, everything else via the shortest round-trip decimal form (Rust's
/// `Display` for `f64` never produces exponent notation).
pub(crate) fn format_number(f: f64) -> String {
    if !f.is_finite() {
        return "null".to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    format!("{}", f)
}

/// Emit a primitive value as its scalar literal.
pub(crate) fn encode_primitive(value: &Value, delimiter: char) -> String {
    let mut out = String::new();
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(f) => out.push_str(&format_number(*f)),
        Value::String(s) => write_string(s, delimiter, &mut out),
        Value::Array(_) | Value::Object(_) => out.push_str("null"),
    }
    out
}

/// Encode an object key. Keys follow the value quoting rules, and are
/// additionally quoted when they look like an expandable dotted path, so a
/// decoder running path expansion cannot mistake a literal key for a
/// collapsed chain.
fn encode_key(key: &str, delimiter: char) -> String {
    if needs_quoting(key, delimiter) || is_expandable_key(key) {
        let mut out = String::with_capacity(key.len() + 2);
        out.push('"');
        write_escaped(key, &mut out);
        out.push('"');
        out
    } else {
        key.to_string()
    }
}

// ---------------------------------------------------------------------------
// Line writer
// ---------------------------------------------------------------------------

/// Buffers `(depth, content)` pairs and renders them with the configured
/// indentation. Trailing whitespace is stripped per line; the rendered
/// document has no trailing newline.
pub(crate) struct LineWriter {
    indent: usize,
    lines: Vec<(usize, String)>,
}

impl LineWriter {
    pub(crate) fn new(indent: usize) -> Self {
        LineWriter {
            indent,
            lines: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, depth: usize, content: impl Into<String>) {
        self.lines.push((depth, content.into()));
    }

    pub(crate) fn into_lines(self) -> Vec<String> {
        let indent = self.indent;
        self.lines
            .into_iter()
            .map(|(depth, content)| {
                let mut line = " ".repeat(depth * indent);
                line.push_str(content.trim_end());
                line
            })
            .collect()
    }

    pub(crate) fn into_string(self) -> String {
        self.into_lines().join("\n")
    }
}

// ---------------------------------------------------------------------------
// Shape analysis
// ---------------------------------------------------------------------------

enum ArrayShape {
    Empty,
    InlinePrimitive,
    Tabular(Vec<String>),
    List,
}

/// Classify an array into its physical layout. Tabular requires every
/// element to be an object with the same key set as the first element and
/// only primitive values; column order is the first element's key order.
fn classify_array(items: &[Value]) -> ArrayShape {
    if items.is_empty() {
        return ArrayShape::Empty;
    }
    if items.iter().all(Value::is_primitive) {
        return ArrayShape::InlinePrimitive;
    }
    let first = match &items[0] {
        Value::Object(obj) if !obj.is_empty() => obj,
        _ => return ArrayShape::List,
    };
    if first.values().any(|v| !v.is_primitive()) {
        return ArrayShape::List;
    }
    let fields: Vec<String> = first.keys().cloned().collect();
    for item in &items[1..] {
        let obj = match item {
            Value::Object(obj) => obj,
            _ => return ArrayShape::List,
        };
        if obj.len() != fields.len() {
            return ArrayShape::List;
        }
        for field in &fields {
            match obj.get(field) {
                Some(v) if v.is_primitive() => {}
                _ => return ArrayShape::List,
            }
        }
    }
    ArrayShape::Tabular(fields)
}

// ---------------------------------------------------------------------------
// Key collapsing
// ---------------------------------------------------------------------------

struct CollapsedChain<'a> {
    dotted: String,
    segments: usize,
    leaf: &'a Value,
}

/// Walk a single-key wrapper chain starting at `(key, value)` and fuse it
/// into a dotted key. The walk stops at the flatten budget, at the first
/// non-identifier segment, or at any value that is not a one-entry object.
/// A chain is accepted only with two or more segments and no collision with
/// a sibling key or a root-level literal dotted key.
fn try_collapse<'a>(
    key: &'a str,
    value: &'a Value,
    siblings: &ToonMap,
    root_literals: &HashSet<String>,
    flatten_budget: usize,
) -> Option<CollapsedChain<'a>> {
    if !is_identifier(key) {
        return None;
    }
    let mut segments = vec![key];
    let mut cur = value;
    loop {
        if segments.len() >= flatten_budget {
            break;
        }
        let obj = match cur {
            Value::Object(obj) if obj.len() == 1 => obj,
            _ => break,
        };
        let (next_key, next_value) = obj.iter().next()?;
        if !is_identifier(next_key) {
            break;
        }
        segments.push(next_key.as_str());
        cur = next_value;
    }
    if segments.len() < 2 {
        return None;
    }
    let dotted = segments.join(".");
    if siblings.contains_key(&dotted) || root_literals.contains(&dotted) {
        return None;
    }
    Some(CollapsedChain {
        dotted,
        segments: segments.len(),
        leaf: cur,
    })
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Encode a value tree into TOON text.
pub(crate) fn encode_value(value: &Value, options: &EncodeOptions) -> Result<String> {
    Ok(encode_writer(value, options)?.into_string())
}

/// Encode a value tree into individual output lines.
pub(crate) fn encode_value_lines(value: &Value, options: &EncodeOptions) -> Result<Vec<String>> {
    Ok(encode_writer(value, options)?.into_lines())
}

fn encode_writer(value: &Value, options: &EncodeOptions) -> Result<LineWriter> {
    let mut writer = LineWriter::new(options.indent);
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            writer.push(0, encode_primitive(value, options.delimiter.as_char()));
        }
        Value::Array(items) => {
            encode_array("", items, &mut writer, 0, 1, &HashSet::new(), 1, options)?;
        }
        Value::Object(obj) => {
            if !obj.is_empty() {
                let root_literals: HashSet<String> = obj
                    .keys()
                    .filter(|k| k.contains('.'))
                    .cloned()
                    .collect();
                encode_entries(
                    obj,
                    &mut writer,
                    0,
                    &root_literals,
                    options.flatten_depth,
                    1,
                    options,
                )?;
            }
        }
    }
    Ok(writer)
}

fn encode_entries(
    obj: &ToonMap,
    writer: &mut LineWriter,
    depth: usize,
    root_literals: &HashSet<String>,
    flatten_budget: usize,
    guard: usize,
    options: &EncodeOptions,
) -> Result<()> {
    for (key, value) in obj.iter() {
        encode_entry(
            key,
            value,
            writer,
            depth,
            depth + 1,
            "",
            obj,
            root_literals,
            flatten_budget,
            guard,
            options,
        )?;
    }
    Ok(())
}

/// Emit one object entry. `line_depth` is where the key line goes;
/// `child_depth` is where a nested block under it starts. The two differ
/// only for the first field of a list item, where the `- ` prefix counts as
/// one level.
#[allow(clippy::too_many_arguments)]
fn encode_entry(
    key: &str,
    value: &Value,
    writer: &mut LineWriter,
    line_depth: usize,
    child_depth: usize,
    lead: &str,
    siblings: &ToonMap,
    root_literals: &HashSet<String>,
    flatten_budget: usize,
    guard: usize,
    options: &EncodeOptions,
) -> Result<()> {
    if guard > MAX_DEPTH {
        return Err(Error::DepthExceeded { max: MAX_DEPTH });
    }
    let delimiter = options.delimiter.as_char();

    if options.key_collapsing == KeyCollapsing::Safe {
        if let Some(chain) = try_collapse(key, value, siblings, root_literals, flatten_budget) {
            // A collapsed key is emitted raw: its dots are the point.
            match chain.leaf {
                Value::Array(items) => {
                    return encode_array(
                        &format!("{}{}", lead, chain.dotted),
                        items,
                        writer,
                        line_depth,
                        child_depth,
                        root_literals,
                        guard + 1,
                        options,
                    );
                }
                Value::Object(obj) => {
                    writer.push(line_depth, format!("{}{}:", lead, chain.dotted));
                    if !obj.is_empty() {
                        encode_entries(
                            obj,
                            writer,
                            child_depth,
                            root_literals,
                            flatten_budget.saturating_sub(chain.segments),
                            guard + 1,
                            options,
                        )?;
                    }
                    return Ok(());
                }
                leaf => {
                    writer.push(
                        line_depth,
                        format!("{}{}: {}", lead, chain.dotted, encode_primitive(leaf, delimiter)),
                    );
                    return Ok(());
                }
            }
        }
    }

    let ekey = encode_key(key, delimiter);
    match value {
        Value::Array(items) => encode_array(
            &format!("{}{}", lead, ekey),
            items,
            writer,
            line_depth,
            child_depth,
            root_literals,
            guard + 1,
            options,
        ),
        Value::Object(obj) => {
            writer.push(line_depth, format!("{}{}:", lead, ekey));
            if !obj.is_empty() {
                encode_entries(
                    obj,
                    writer,
                    child_depth,
                    root_literals,
                    options.flatten_depth,
                    guard + 1,
                    options,
                )?;
            }
            Ok(())
        }
        primitive => {
            writer.push(
                line_depth,
                format!("{}{}: {}", lead, ekey, encode_primitive(primitive, delimiter)),
            );
            Ok(())
        }
    }
}

/// Emit an array under an already-encoded line prefix (`""` at root, the
/// encoded key, or a `- ` list marker). The header goes at `line_depth`;
/// rows and list items go at `child_depth` and below.
#[allow(clippy::too_many_arguments)]
fn encode_array(
    prefix: &str,
    items: &[Value],
    writer: &mut LineWriter,
    line_depth: usize,
    child_depth: usize,
    root_literals: &HashSet<String>,
    guard: usize,
    options: &EncodeOptions,
) -> Result<()> {
    if guard > MAX_DEPTH {
        return Err(Error::DepthExceeded { max: MAX_DEPTH });
    }
    let delimiter = options.delimiter.as_char();
    // Non-comma delimiters are declared after the length so the decoder can
    // pick them up from the header alone.
    let marker = match options.delimiter {
        crate::Delimiter::Comma => String::new(),
        other => other.as_char().to_string(),
    };

    match classify_array(items) {
        ArrayShape::Empty => {
            writer.push(line_depth, format!("{}[0]:", prefix));
        }
        ArrayShape::InlinePrimitive => {
            let joined = items
                .iter()
                .map(|v| encode_primitive(v, delimiter))
                .collect::<Vec<_>>()
                .join(options.delimiter.as_str());
            writer.push(
                line_depth,
                format!("{}[{}{}]: {}", prefix, items.len(), marker, joined),
            );
        }
        ArrayShape::Tabular(fields) => {
            let header_fields = fields
                .iter()
                .map(|f| encode_key(f, delimiter))
                .collect::<Vec<_>>()
                .join(options.delimiter.as_str());
            writer.push(
                line_depth,
                format!("{}[{}{}]{{{}}}:", prefix, items.len(), marker, header_fields),
            );
            for item in items {
                if let Value::Object(obj) = item {
                    let row = fields
                        .iter()
                        .map(|f| encode_primitive(obj.get(f).unwrap_or(&Value::Null), delimiter))
                        .collect::<Vec<_>>()
                        .join(options.delimiter.as_str());
                    writer.push(child_depth, row);
                }
            }
        }
        ArrayShape::List => {
            writer.push(line_depth, format!("{}[{}]:", prefix, items.len()));
            for item in items {
                match item {
                    Value::Object(obj) if obj.is_empty() => {
                        writer.push(child_depth, "-");
                    }
                    Value::Object(obj) => {
                        let mut iter = obj.iter();
                        if let Some((first_key, first_value)) = iter.next() {
                            // First field rides the hyphen line; the marker
                            // itself counts as one indent level.
                            encode_entry(
                                first_key,
                                first_value,
                                writer,
                                child_depth,
                                child_depth + 2,
                                "- ",
                                obj,
                                root_literals,
                                options.flatten_depth,
                                guard + 1,
                                options,
                            )?;
                            for (key, value) in iter {
                                encode_entry(
                                    key,
                                    value,
                                    writer,
                                    child_depth + 1,
                                    child_depth + 2,
                                    "",
                                    obj,
                                    root_literals,
                                    options.flatten_depth,
                                    guard + 1,
                                    options,
                                )?;
                            }
                        }
                    }
                    Value::Array(inner) => {
                        encode_array(
                            "- ",
                            inner,
                            writer,
                            child_depth,
                            child_depth + 1,
                            root_literals,
                            guard + 1,
                            options,
                        )?;
                    }
                    primitive => {
                        writer.push(
                            child_depth,
                            format!("- {}", encode_primitive(primitive, delimiter)),
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Serde bridge: T -> Value normalization
// ---------------------------------------------------------------------------

/// Serde `Serializer` whose output is a normalized [`Value`] tree.
///
/// Every integer width widens to `f64`, non-finite floats become null,
/// negative zero becomes positive zero, map keys coerce to strings, and
/// enum variants take the externally-tagged form (`variant: value`).
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeTaggedSeq {
    variant: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: ToonMap,
    current_key: Option<String>,
}

pub struct SerializeTaggedMap {
    variant: &'static str,
    map: ToonMap,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTaggedSeq;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeTaggedMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(number_value(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(number_value(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        let vec = v.iter().map(|&b| Value::Number(b as f64)).collect();
        Ok(Value::Array(vec))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut map = ToonMap::new();
        map.insert(variant.to_string(), value.serialize(ValueSerializer)?);
        Ok(Value::Object(map))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec { vec: Vec::new() })
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec { vec: Vec::new() })
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec { vec: Vec::new() })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeTaggedSeq> {
        Ok(SerializeTaggedSeq {
            variant,
            vec: Vec::new(),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: ToonMap::new(),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: ToonMap::new(),
            current_key: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeTaggedMap> {
        Ok(SerializeTaggedMap {
            variant,
            map: ToonMap::new(),
        })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeTaggedSeq {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = ToonMap::new();
        map.insert(self.variant.to_string(), Value::Array(self.vec));
        Ok(Value::Object(map))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        // Non-string host keys coerce to their obvious string form.
        self.current_key = Some(match key.serialize(ValueSerializer)? {
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(f) => format_number(f),
            Value::Null => "null".to_string(),
            other => {
                return Err(Error::unsupported_type(&format!(
                    "map key must be a primitive, found {:?}",
                    other
                )))
            }
        });
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeTaggedMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = ToonMap::new();
        map.insert(self.variant.to_string(), Value::Object(self.map));
        Ok(Value::Object(map))
    }
}

/// Reject value trees nested beyond [`MAX_DEPTH`].
pub(crate) fn check_depth(value: &Value, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::DepthExceeded { max: MAX_DEPTH });
    }
    match value {
        Value::Array(items) => {
            for item in items {
                check_depth(item, depth + 1)?;
            }
        }
        Value::Object(obj) => {
            for (_, v) in obj.iter() {
                check_depth(v, depth + 1)?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toon;

    #[test]
    fn test_numeric_literal() {
        assert!(is_numeric_literal("42"));
        assert!(is_numeric_literal("-42"));
        assert!(is_numeric_literal("3.5"));
        assert!(is_numeric_literal("-0.5"));
        assert!(is_numeric_literal("1e6"));
        assert!(is_numeric_literal("1.5E-3"));
        assert!(!is_numeric_literal(""));
        assert!(!is_numeric_literal("-"));
        assert!(!is_numeric_literal("1."));
        assert!(!is_numeric_literal(".5"));
        assert!(!is_numeric_literal("1e"));
        assert!(!is_numeric_literal("abc"));
        assert!(!is_numeric_literal("1 2"));
    }

    #[test]
    fn test_needs_quoting() {
        assert!(needs_quoting("", ','));
        assert!(needs_quoting("  ", ','));
        assert!(needs_quoting(" x", ','));
        assert!(needs_quoting("x ", ','));
        assert!(needs_quoting("true", ','));
        assert!(needs_quoting("null", ','));
        assert!(needs_quoting("42", ','));
        assert!(needs_quoting("a,b", ','));
        assert!(needs_quoting("a:b", ','));
        assert!(needs_quoting("a-b", ','));
        assert!(needs_quoting("[x]", ','));
        assert!(!needs_quoting("hello world", ','));
        assert!(!needs_quoting("a|b", ','));
        assert!(needs_quoting("a|b", '|'));
        assert!(!needs_quoting("a,b", '|'));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(9.99), "9.99");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "null");
        assert_eq!(format_number(f64::INFINITY), "null");
    }

    #[test]
    fn test_classify() {
        let inline = vec![Value::from(1), Value::from("x")];
        assert!(matches!(classify_array(&inline), ArrayShape::InlinePrimitive));

        let tabular = vec![
            toon!({ "id": 1, "name": "Alice" }),
            toon!({ "id": 2, "name": "Bob" }),
        ];
        match classify_array(&tabular) {
            ArrayShape::Tabular(fields) => assert_eq!(fields, vec!["id", "name"]),
            _ => panic!("expected tabular"),
        }

        // Field-order uniformity is set-based; order comes from the first element
        let reordered = vec![
            toon!({ "id": 1, "name": "Alice" }),
            toon!({ "name": "Bob", "id": 2 }),
        ];
        assert!(matches!(classify_array(&reordered), ArrayShape::Tabular(_)));

        let mixed = vec![Value::from(1), toon!({ "a": 1 })];
        assert!(matches!(classify_array(&mixed), ArrayShape::List));

        let nested = vec![toon!({ "a": [1, 2] })];
        assert!(matches!(classify_array(&nested), ArrayShape::List));

        assert!(matches!(classify_array(&[]), ArrayShape::Empty));
    }

    #[test]
    fn test_collapse_chain() {
        let value = toon!({ "config": { "server": "localhost" } });
        let siblings = ToonMap::new();
        let chain =
            try_collapse("data", &value, &siblings, &HashSet::new(), usize::MAX).unwrap();
        assert_eq!(chain.dotted, "data.config.server");
        assert_eq!(chain.segments, 3);
        assert_eq!(chain.leaf, &Value::String("localhost".to_string()));
    }

    #[test]
    fn test_collapse_requires_two_segments() {
        let value = Value::from(1);
        let siblings = ToonMap::new();
        assert!(try_collapse("a", &value, &siblings, &HashSet::new(), usize::MAX).is_none());
    }

    #[test]
    fn test_collapse_rejects_collision() {
        let value = toon!({ "b": 1 });
        let mut siblings = ToonMap::new();
        siblings.insert("a.b".to_string(), Value::from(2));
        assert!(try_collapse("a", &value, &siblings, &HashSet::new(), usize::MAX).is_none());
    }

    #[test]
    fn test_collapse_respects_budget() {
        let value = toon!({ "b": { "c": 1 } });
        let siblings = ToonMap::new();
        let chain = try_collapse("a", &value, &siblings, &HashSet::new(), 2).unwrap();
        assert_eq!(chain.dotted, "a.b");
        assert_eq!(chain.leaf, &toon!({ "c": 1 }));
    }

    #[test]
    fn test_collapse_stops_at_non_identifier() {
        let value = toon!({ "not ok": 1 });
        let siblings = ToonMap::new();
        assert!(try_collapse("a", &value, &siblings, &HashSet::new(), usize::MAX).is_none());
    }

    #[test]
    fn test_key_encoding() {
        assert_eq!(encode_key("name", ','), "name");
        assert_eq!(encode_key("user-id", ','), "\"user-id\"");
        assert_eq!(encode_key("user.name", ','), "\"user.name\"");
        // Dots stay bare when a segment is not expansion-eligible
        assert_eq!(encode_key("v1.2", ','), "v1.2");
    }
}
