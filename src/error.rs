//! Error types for TOON encoding and decoding.
//!
//! All fallible operations in this crate return [`Result`], whose error type
//! is the single [`Error`] enum below. Decode errors carry the 1-based line
//! number where the problem was found, and the `Display` output includes a
//! `Help:` suggestion for the common mistakes.
//!
//! ## Strict and non-strict decoding
//!
//! Several error conditions only fire when strict decoding is enabled (the
//! default). With strict mode off, tab indentation, non-multiple indents,
//! declared-length mismatches and path-expansion conflicts are tolerated as
//! documented on [`DecodeOptions`](crate::DecodeOptions).
//!
//! ## Examples
//!
//! ```rust
//! use toon_codec::{decode, DecodeOptions, Error};
//!
//! let err = decode("items[2]:\n  - Apple", &DecodeOptions::default()).unwrap_err();
//! assert!(matches!(err, Error::LengthMismatch { expected: 2, actual: 1, .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Which physical array layout a length mismatch was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    Inline,
    Tabular,
    List,
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArrayKind::Inline => "inline",
            ArrayKind::Tabular => "tabular",
            ArrayKind::List => "list",
        })
    }
}

/// Represents all possible errors that can occur while encoding or decoding
/// TOON documents.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A tab character was found in the indentation of a line (strict mode)
    #[error("tab in indentation at line {line}\nHelp: indent with spaces; tabs are only valid as a delimiter inside array rows")]
    TabsNotAllowed { line: usize },

    /// Line indentation is not a multiple of the indent unit (strict mode)
    #[error("indentation of {found} spaces at line {line} is not a multiple of {unit}\nHelp: each nesting level is exactly {unit} spaces")]
    IndentNotMultiple {
        line: usize,
        found: usize,
        unit: usize,
    },

    /// Malformed `[N]` array header
    #[error("malformed array header at line {line}: {msg}")]
    BadHeader { line: usize, msg: String },

    /// Declared array length does not match the number of decoded elements
    #[error("expected {expected} {kind} array item(s) but found {actual} at line {line}")]
    LengthMismatch {
        line: usize,
        expected: usize,
        actual: usize,
        kind: ArrayKind,
    },

    /// Invalid escape sequence inside a quoted string
    #[error("invalid escape sequence `\\{sequence}` at line {line}\nHelp: valid escapes are \\\\ \\\" \\n \\r \\t \\b \\f \\0 and \\uXXXX")]
    BadEscape { line: usize, sequence: String },

    /// A token that looks numeric but does not parse to a finite number
    #[error("invalid number `{token}` at line {line}")]
    BadNumber { line: usize, token: String },

    /// A value was required but none was present
    #[error("expected a value at line {line}")]
    ExpectedValue { line: usize },

    /// A list entry in object form has a continuation line that is not a field
    #[error("list item at line {line} is not a valid object field\nHelp: continuation lines of a `- key: value` item must be `key: value` pairs")]
    InvalidObjectListItem { line: usize },

    /// Generic syntax error with line information
    #[error("syntax error at line {line}: {msg}")]
    Syntax { line: usize, msg: String },

    /// Value tree nesting exceeds the supported depth
    #[error("nesting depth exceeds the maximum of {max}")]
    DepthExceeded { max: usize },

    /// Path expansion would merge an object into a non-object (strict mode)
    #[error("path expansion conflict at `{path}`\nHelp: a dotted key collides with a non-object value on the same path")]
    ExpansionConflict { path: String },

    /// An event stream ended with unclosed containers
    #[error("incomplete event stream: unmatched start event")]
    Incomplete,

    /// Unsupported type for serialization
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Generic message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a generic syntax error with line information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_codec::Error;
    ///
    /// let err = Error::syntax(10, "unexpected token");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, msg: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            msg: msg.into(),
        }
    }

    /// Creates a malformed-header error with line information.
    pub fn bad_header(line: usize, msg: impl Into<String>) -> Self {
        Error::BadHeader {
            line,
            msg: msg.into(),
        }
    }

    /// Creates a length-mismatch error for the given array layout.
    pub fn length_mismatch(line: usize, expected: usize, actual: usize, kind: ArrayKind) -> Self {
        Error::LengthMismatch {
            line,
            expected,
            actual,
            kind,
        }
    }

    /// Creates an unsupported type error for values that cannot be
    /// represented in TOON.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
