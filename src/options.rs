//! Configuration options for TOON encoding and decoding.
//!
//! This module provides the types that customize both directions of the
//! codec:
//!
//! - [`EncodeOptions`]: indentation, delimiter and key collapsing
//! - [`DecodeOptions`]: indentation, strict-mode validation and path expansion
//! - [`Delimiter`]: choice of delimiter for inline arrays and tabular rows
//!
//! ## Examples
//!
//! ```rust
//! use toon_codec::{encode, toon, Delimiter, EncodeOptions, KeyCollapsing};
//!
//! let value = toon!({ "tags": ["rust", "llm"] });
//!
//! let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
//! let out = encode(&value, &options).unwrap();
//! assert_eq!(out, "tags[2|]: rust|llm");
//!
//! // Collapse single-key wrapper chains into dotted keys
//! let options = EncodeOptions::new().with_key_collapsing(KeyCollapsing::Safe);
//! let value = toon!({ "server": { "host": "localhost" } });
//! assert_eq!(encode(&value, &options).unwrap(), "server.host: localhost");
//! ```

/// Delimiter choice for inline arrays and tabular rows.
///
/// TOON supports multiple delimiters to optimize for different contexts:
///
/// - **Comma**: default, most compact
/// - **Tab**: best for TSV-like output
/// - **Pipe**: readable for markdown-style tables
///
/// Non-comma delimiters are declared inside the array header bracket
/// (`[3|]:` or `[3\t]:`), which is how the decoder discovers the active
/// delimiter without a decode-side option.
///
/// # Examples
///
/// ```rust
/// use toon_codec::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_char(), ',');
/// assert_eq!(Delimiter::Tab.as_char(), '\t');
/// assert_eq!(Delimiter::Pipe.as_char(), '|');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Returns the delimiter character.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    /// Returns the string representation of this delimiter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    /// Maps a header-bracket marker character back to its delimiter.
    ///
    /// The comma delimiter has no marker; only tab and pipe appear inside
    /// `[N]` brackets.
    #[must_use]
    pub(crate) fn from_marker(ch: char) -> Option<Delimiter> {
        match ch {
            '\t' => Some(Delimiter::Tab),
            '|' => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

/// Key collapsing mode for the encoder.
///
/// When set to [`KeyCollapsing::Safe`], chains of single-key objects like
/// `{"a": {"b": {"c": 1}}}` are fused into a dotted key `a.b.c: 1`, provided
/// every segment is a plain identifier and the dotted key cannot collide
/// with a literal sibling key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyCollapsing {
    /// No key collapsing
    #[default]
    Off,
    /// Collapse only chains of identifier-safe segments
    Safe,
}

/// Path expansion mode for the decoder.
///
/// When set to [`PathExpansion::Safe`], unquoted dotted keys whose segments
/// are all plain identifiers are expanded back into nested objects,
/// reversing [`KeyCollapsing::Safe`]. Quoted keys are never expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PathExpansion {
    /// Keys are kept literal
    #[default]
    Off,
    /// Expand identifier-safe dotted keys into nested objects
    Safe,
}

/// Configuration options for encoding.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{Delimiter, EncodeOptions, KeyCollapsing};
///
/// let options = EncodeOptions::new()
///     .with_delimiter(Delimiter::Tab)
///     .with_key_collapsing(KeyCollapsing::Safe)
///     .with_flatten_depth(3);
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Number of spaces per indentation level (default: 2)
    pub indent: usize,
    /// Delimiter for inline arrays and tabular rows
    pub delimiter: Delimiter,
    /// Whether to collapse single-key wrapper chains into dotted keys
    pub key_collapsing: KeyCollapsing,
    /// Maximum number of segments a collapsed key may contain
    pub flatten_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: 2,
            delimiter: Delimiter::default(),
            key_collapsing: KeyCollapsing::default(),
            flatten_depth: usize::MAX,
        }
    }
}

impl EncodeOptions {
    /// Creates default options (comma delimiter, 2-space indent, no
    /// collapsing).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation size (number of spaces per level).
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the delimiter for inline arrays and tabular rows.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the key collapsing mode.
    #[must_use]
    pub fn with_key_collapsing(mut self, mode: KeyCollapsing) -> Self {
        self.key_collapsing = mode;
        self
    }

    /// Limits how many segments a collapsed key may contain.
    #[must_use]
    pub fn with_flatten_depth(mut self, depth: usize) -> Self {
        self.flatten_depth = depth;
        self
    }
}

/// Configuration options for decoding.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{DecodeOptions, PathExpansion};
///
/// let options = DecodeOptions::new()
///     .with_strict(false)
///     .with_expand_paths(PathExpansion::Safe);
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Number of spaces per indentation level (default: 2)
    pub indent: usize,
    /// When true, enforce tabs/indent multiples, declared array lengths and
    /// escape validity (default: true)
    pub strict: bool,
    /// Whether to expand dotted keys back into nested objects
    pub expand_paths: PathExpansion,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            indent: 2,
            strict: true,
            expand_paths: PathExpansion::default(),
        }
    }
}

impl DecodeOptions {
    /// Creates default options (strict, 2-space indent, no expansion).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation size (number of spaces per level).
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables strict-mode validation.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the path expansion mode.
    #[must_use]
    pub fn with_expand_paths(mut self, mode: PathExpansion) -> Self {
        self.expand_paths = mode;
        self
    }
}
