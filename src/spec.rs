//! TOON Format Reference
//!
//! This module documents the TOON (Token-Oriented Object Notation) wire
//! format as implemented by this library.
//!
//! # Overview
//!
//! TOON is a minimalist data serialization format designed for efficient
//! token usage in Large Language Model (LLM) contexts. It achieves 30-60%
//! token reduction compared to JSON while maintaining human readability and
//! structural clarity.
//!
//! ## Design Philosophy
//!
//! - **Token Efficiency**: eliminate syntactic overhead (braces, brackets,
//!   redundant quotes)
//! - **Readability**: maintain clarity through meaningful indentation
//! - **Structural Typing**: leverage homogeneous data patterns for tabular
//!   compression
//! - **Validatable**: declared array lengths let a strict decoder verify
//!   nothing was truncated
//!
//! # Core Syntax
//!
//! ## Objects
//!
//! Objects use newline-delimited key-value pairs with colon separation:
//!
//! ```text
//! name: Alice
//! age: 30
//! active: true
//! ```
//!
//! **Rules**:
//! - Nested objects are indented (default 2 spaces per level)
//! - A key with no inline value and no indented block decodes to `null`
//! - Duplicate keys are not emitted by the encoder; on decode the last
//!   occurrence wins
//! - Keys are unquoted when they need no quoting under the value rules and
//!   do not look like an expandable dotted path; all other keys are quoted:
//!   `"user-id"`, `"2ndPlace"`, `"user.name"`
//!
//! ## Primitives
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | Null | `null` | `value: null` |
//! | Boolean | `true` or `false` | `active: true` |
//! | Number | double precision, no exponent on output | `price: 19.99` |
//! | String | unquoted or `"quoted"` | `name: Alice` |
//!
//! All numbers decode to `f64`; integer identity is not preserved.
//! Non-finite numbers have no representation and encode as `null`;
//! negative zero encodes as `0`.
//!
//! ## Strings
//!
//! Strings are **unquoted by default** to minimize tokens. Quoting is
//! required when the string:
//!
//! - Is empty or contains only whitespace: `""`, `"  "`
//! - Starts or ends with a space (trimming ambiguity)
//! - Equals a reserved word: `true`, `false`, `null`
//! - Matches the numeric pattern `-?\d+(\.\d+)?([eE][+-]?\d+)?`
//! - Contains any of `[` `]` `{` `}` `-` `:` `"` `\`
//! - Contains the **active delimiter** (comma by default)
//! - Contains a newline, carriage return or tab
//!
//! **Escape sequences** (in quoted strings):
//! ```text
//! \"  - quote
//! \\  - backslash
//! \n  - newline
//! \r  - carriage return
//! \t  - tab
//! \b  - backspace
//! \f  - form feed
//! \0  - null character
//! \uXXXX - Unicode codepoint (4 hex digits)
//! ```
//!
//! The encoder emits only `\"`, `\\`, `\n`, `\r` and `\t`; the decoder
//! accepts the full set. In strict mode any other sequence is an error.
//!
//! # Array Formats
//!
//! TOON uses three array layouts based on content structure. Every header
//! declares the element count, which strict decoding verifies.
//!
//! ## Inline Arrays
//!
//! For **primitive values** (numbers, booleans, strings, null):
//!
//! ```text
//! [3]: 1,2,3
//! tags[2]: admin,ops
//! ```
//!
//! ## Tabular Arrays
//!
//! For **homogeneous objects with primitive fields** (TOON's signature
//! feature):
//!
//! ```text
//! [3]{id,name,price}:
//!   1,Widget,9.99
//!   2,Gadget,14.99
//!   3,Tool,19.99
//! ```
//!
//! - Headers in `{}` define the column order, taken from the first element
//! - One row per line, indented one level past the header
//! - All elements must share one key set with primitive values only
//!
//! ## List Arrays
//!
//! For everything else:
//!
//! ```text
//! items[3]:
//!   - 1
//!   - a: 1
//!   - text
//! ```
//!
//! - Each item gets a `- ` marker one level past the header
//! - An object item puts its first field on the hyphen line; remaining
//!   fields sit one level deeper
//! - A nested array item puts its header after the hyphen
//! - A bare `-` is an empty object
//!
//! # Delimiters
//!
//! Inline values and tabular rows are separated by the active delimiter:
//! comma (default), tab, or pipe. Non-comma delimiters are declared in the
//! header bracket after the length, so a decoder needs no out-of-band
//! configuration:
//!
//! ```text
//! [3|]: 1|2|3
//! [2|]{sku|qty}:
//!   A1|2
//!   B2|1
//! ```
//!
//! # Key Collapsing and Path Expansion
//!
//! With key collapsing enabled, the encoder fuses chains of single-key
//! objects into a dotted key:
//!
//! ```text
//! data.config.server: localhost
//! ```
//!
//! A chain collapses only when every segment matches
//! `[A-Za-z_][A-Za-z0-9_]*`, at least two segments fuse, and the dotted key
//! collides with neither a sibling key nor a root-level literal dotted key.
//! Path expansion reverses the transformation on decode, deep-merging
//! sibling chains; a collision between an object and a non-object is an
//! error in strict mode and last-write-wins otherwise. Quoted keys are
//! never expanded, which is why the encoder quotes literal keys that look
//! like expandable paths.
//!
//! # Strict Mode
//!
//! Strict decoding (the default) enforces:
//!
//! - No tabs in indentation
//! - Indentation is an exact multiple of the indent unit
//! - Declared array lengths match the decoded element counts
//! - Escape sequences are valid
//!
//! Non-strict decoding tolerates all four: a tab counts as one space,
//! depth division floors, the actual element count wins, and unknown
//! escapes pass through literally.
//!
//! # Edge Cases
//!
//! Empty array:
//! ```text
//! empty[0]:
//! ```
//!
//! Empty object value (decodes to `null`):
//! ```text
//! empty_object:
//! ```
//!
//! Root-level forms: a document may be a single scalar line, a root array
//! header, or key-value lines. An empty document decodes to an empty
//! object.
//!
//! # Format Comparison
//!
//! **JSON** (171 chars):
//! ```json
//! [
//!   {"id":1,"name":"Alice","email":"alice@ex.com","active":true},
//!   {"id":2,"name":"Bob","email":"bob@ex.com","active":true}
//! ]
//! ```
//!
//! **TOON** (88 chars, ~50% reduction):
//! ```text
//! [2]{id,name,email,active}:
//!   1,Alice,alice@ex.com,true
//!   2,Bob,bob@ex.com,true
//! ```
//!
//! # Conformance
//!
//! This implementation follows the TOON format from:
//! <https://github.com/johannschopplich/toon>

// This module contains only documentation; no implementation code
