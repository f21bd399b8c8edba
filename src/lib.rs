//! # toon_codec
//!
//! Encoder, decoder and streaming event decoder for the TOON
//! (Token-Oriented Object Notation) format.
//!
//! ## What is TOON?
//!
//! TOON is a compact, human-readable data format designed for efficient
//! communication with Large Language Models (LLMs). It achieves 30-60%
//! fewer tokens than equivalent JSON while maintaining readability and
//! structure. See the [`spec`] module for the full format reference.
//!
//! ## Key Features
//!
//! - **Token-Efficient**: minimalist syntax eliminates unnecessary braces,
//!   brackets and quotes; uniform object arrays compress to tables
//! - **Three array layouts**: inline (`[3]: 1,2,3`), tabular
//!   (`[2]{id,name}:` with one row per element) and list (`- ` items),
//!   chosen automatically from the data's shape
//! - **Key collapsing / path expansion**: single-key wrapper chains can
//!   encode as dotted keys (`data.config.server: localhost`) and expand
//!   back losslessly
//! - **Strict validation**: declared array lengths, indentation and escape
//!   sequences are verified on decode
//! - **Streaming**: a lazy event decoder yields the document as a sequence
//!   of events without building the tree
//! - **Serde Compatible**: works with existing Rust types via
//!   `#[derive(Serialize, Deserialize)]`
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use toon_codec::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let toon_string = to_string(&user).unwrap();
//! assert_eq!(toon_string, "id: 123\nname: Alice\nactive: true");
//!
//! let user_back: User = from_str(&toon_string).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Tabular Arrays
//!
//! Arrays of homogeneous objects automatically serialize as tables:
//!
//! ```rust
//! use serde::Serialize;
//! use toon_codec::to_string;
//!
//! #[derive(Serialize)]
//! struct Product {
//!     id: u32,
//!     name: String,
//!     price: f64,
//! }
//!
//! let products = vec![
//!     Product { id: 1, name: "Widget".to_string(), price: 9.99 },
//!     Product { id: 2, name: "Gadget".to_string(), price: 14.99 },
//! ];
//!
//! let toon = to_string(&products).unwrap();
//! assert_eq!(toon, "[2]{id,name,price}:\n  1,Widget,9.99\n  2,Gadget,14.99");
//! ```
//!
//! ### Working with dynamic values
//!
//! ```rust
//! use toon_codec::{decode, toon, DecodeOptions, Value};
//!
//! let value = decode("scores[3]: 95, 87, 92", &DecodeOptions::default()).unwrap();
//! assert_eq!(value, toon!({ "scores": [95, 87, 92] }));
//! ```
//!
//! ### Key collapsing and path expansion
//!
//! ```rust
//! use toon_codec::{
//!     decode, encode, toon, DecodeOptions, EncodeOptions, KeyCollapsing, PathExpansion,
//! };
//!
//! let value = toon!({ "data": { "config": { "server": "localhost" } } });
//!
//! let opts = EncodeOptions::new().with_key_collapsing(KeyCollapsing::Safe);
//! let text = encode(&value, &opts).unwrap();
//! assert_eq!(text, "data.config.server: localhost");
//!
//! let opts = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
//! assert_eq!(decode(&text, &opts).unwrap(), value);
//! ```
//!
//! ### Streaming events
//!
//! ```rust
//! use toon_codec::{decode_events, events_to_value, DecodeOptions, Event};
//!
//! let mut events = decode_events("[3]: a,b,c", &DecodeOptions::default());
//! assert_eq!(events.next().unwrap().unwrap(), Event::StartArray { length: 3 });
//! // The rest of the stream is decoded only as it is consumed.
//! ```
//!
//! ## Number model
//!
//! All numbers decode to `f64`: integer identity is not preserved through
//! the wire format, non-finite floats normalize to null, and negative zero
//! to positive zero. Sets have no dedicated representation either; encode
//! a `BTreeSet` when a deterministic element order matters.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - All parsing is bounds-checked, single pass per line
//! - Proper error propagation with `Result` types

pub mod de;
pub mod error;
pub mod event;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod spec;
pub mod value;

pub use de::ValueDeserializer;
pub use error::{ArrayKind, Error, Result};
pub use event::{events_to_value, Event, Events};
pub use map::ToonMap;
pub use options::{DecodeOptions, Delimiter, EncodeOptions, KeyCollapsing, PathExpansion};
pub use ser::ValueSerializer;
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Encode a value tree to a TOON string.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{encode, toon, EncodeOptions};
///
/// let value = toon!({ "name": "Alice", "age": 30 });
/// let text = encode(&value, &EncodeOptions::default()).unwrap();
/// assert_eq!(text, "name: Alice\nage: 30");
/// ```
///
/// # Errors
///
/// Returns [`Error::DepthExceeded`] when the tree nests beyond the
/// supported depth.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<String> {
    ser::encode_value(value, options)
}

/// Encode a value tree to individual output lines (no trailing newline on
/// any element).
///
/// # Errors
///
/// Returns [`Error::DepthExceeded`] when the tree nests beyond the
/// supported depth.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_lines(value: &Value, options: &EncodeOptions) -> Result<Vec<String>> {
    ser::encode_value_lines(value, options)
}

/// Decode a TOON string into a value tree.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{decode, DecodeOptions, Value};
///
/// let value = decode("name: Alice", &DecodeOptions::default()).unwrap();
/// assert_eq!(
///     value.as_object().unwrap().get("name"),
///     Some(&Value::String("Alice".to_string()))
/// );
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid TOON; strict mode
/// additionally verifies indentation, declared array lengths and escape
/// sequences. Errors carry the offending line number.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(input: &str, options: &DecodeOptions) -> Result<Value> {
    let mut cursor = de::scan_document(input, options)?;
    de::decode_document(&mut cursor, options)
}

/// Decode a TOON document supplied as a sequence of lines.
///
/// # Errors
///
/// Same conditions as [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_from_lines<I, S>(lines: I, options: &DecodeOptions) -> Result<Value>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cursor = de::scan_lines(lines, options)?;
    de::decode_document(&mut cursor, options)
}

/// Decode TOON input into a lazy stream of [`Event`]s.
///
/// The returned iterator scans the input on demand: taking a prefix of the
/// stream does not parse the rest of the document, and dropping the
/// iterator cancels the decode. Strict-mode errors are yielded in the
/// stream at the point of detection.
///
/// Use [`events_to_value`] to rebuild a tree from the stream.
pub fn decode_events<'a>(input: &'a str, options: &DecodeOptions) -> Events<'a> {
    event::decode_events_impl(input, options)
}

/// Convert any `T: Serialize` to a normalized [`Value`] tree.
///
/// This is the normalization boundary: every integer width widens to
/// `f64`, non-finite floats become null, negative zero becomes positive
/// zero, and map keys coerce to strings.
///
/// # Errors
///
/// Returns an error for unsupported shapes (non-primitive map keys) or
/// trees nested beyond the supported depth.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    let value = value.serialize(ValueSerializer)?;
    ser::check_depth(&value, 1)?;
    Ok(value)
}

/// Deserialize a `T` from a [`Value`] tree.
///
/// # Errors
///
/// Returns an error when the tree does not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Serialize any `T: Serialize` to a TOON string with default options.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use toon_codec::to_string;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let toon = to_string(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(toon, "x: 1\ny: 2");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &EncodeOptions::default())
}

/// Serialize any `T: Serialize` to a TOON string with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &EncodeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    encode(&to_value(value)?, options)
}

/// Serialize any `T: Serialize` to a writer in TOON format.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &EncodeOptions::default())
}

/// Serialize any `T: Serialize` to a writer in TOON format with custom
/// options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &EncodeOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let toon_string = to_string_with_options(value, options)?;
    writer
        .write_all(toon_string.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a string of TOON text.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use toon_codec::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x: 1\ny: 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid TOON or cannot be
/// deserialized to type `T`. Error messages include line information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, &DecodeOptions::default())
}

/// Deserialize an instance of type `T` from TOON text with custom decode
/// options.
///
/// # Errors
///
/// Same conditions as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(decode(s, options)?)
}

/// Deserialize an instance of type `T` from an I/O stream of TOON.
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not
/// valid TOON, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of TOON text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid TOON, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
