//! Streaming event decoder.
//!
//! [`decode_events`] walks TOON input lazily, yielding one [`Event`] at a
//! time instead of building the whole value tree. The iterator scans input
//! lines on demand (with at most two lines of look-ahead for the tabular
//! row disambiguation), so taking a prefix of the stream does not parse the
//! rest of the document. Dropping the iterator cancels the decode; no
//! resources beyond its internal cursor are held.
//!
//! The event sequence is equivalent to what the eager decoder produces:
//! every `Start*` is balanced by a matching `End*`, each `Key` inside an
//! object is followed by exactly one value, and strict-mode errors surface
//! in the stream at the point of detection (after which the iterator
//! fuses).
//!
//! ```rust
//! use toon_codec::{decode_events, DecodeOptions, Event, Value};
//!
//! let events: Vec<_> = decode_events("[3]: a,b,c", &DecodeOptions::default())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(events[0], Event::StartArray { length: 3 });
//! assert_eq!(events[1], Event::Primitive(Value::String("a".into())));
//! assert_eq!(events[4], Event::EndArray);
//! ```
//!
//! [`events_to_value`] rebuilds a tree from any event sequence, failing
//! with [`Error::Incomplete`] on unmatched start events.

use crate::de::{
    find_unquoted, is_tabular_row, parse_array_header, parse_key_token, parse_primitive_token,
    scan_line, split_delimited, ParsedLine, ScannedLine,
};
use crate::{ArrayKind, DecodeOptions, Error, Result, ToonMap, Value};
use std::collections::VecDeque;

/// One step of the lazy decoder output.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartObject,
    EndObject,
    StartArray { length: usize },
    EndArray,
    Key { key: String, was_quoted: bool },
    Primitive(Value),
}

/// Line scanner that consumes the input incrementally. Blank lines are
/// dropped; strict-mode scan errors surface when the offending line is
/// first needed.
struct LazyScanner<'a> {
    lines: std::str::Lines<'a>,
    next_number: usize,
    unit: usize,
    strict: bool,
    buffer: VecDeque<ParsedLine>,
}

impl<'a> LazyScanner<'a> {
    fn new(input: &'a str, options: &DecodeOptions) -> Self {
        LazyScanner {
            lines: input.lines(),
            next_number: 1,
            unit: options.indent,
            strict: options.strict,
            buffer: VecDeque::new(),
        }
    }

    fn peek(&mut self, k: usize) -> Result<Option<&ParsedLine>> {
        while self.buffer.len() <= k {
            let raw = match self.lines.next() {
                Some(raw) => raw,
                None => return Ok(None),
            };
            let number = self.next_number;
            self.next_number += 1;
            match scan_line(raw, number, self.unit, self.strict)? {
                ScannedLine::Content(line) => self.buffer.push_back(line),
                ScannedLine::Blank(_) => {}
            }
        }
        Ok(self.buffer.get(k))
    }

    fn next_line(&mut self) -> Result<Option<ParsedLine>> {
        self.peek(0)?;
        Ok(self.buffer.pop_front())
    }
}

enum Frame {
    Object {
        depth: usize,
        /// Continuation of a `- key: value` item: hyphen lines end the
        /// object, and a field line without `:` is reported as an invalid
        /// list item rather than a generic syntax error.
        in_item: bool,
    },
    Tabular {
        row_depth: usize,
        fields: Vec<(String, bool)>,
        delimiter: u8,
        declared: usize,
        seen: usize,
        header_line: usize,
    },
    List {
        item_depth: usize,
        declared: usize,
        seen: usize,
        header_line: usize,
    },
}

/// Lazy iterator over the events of one TOON document.
///
/// Yields `Result<Event>`; after the first error the iterator is fused.
pub struct Events<'a> {
    scanner: LazyScanner<'a>,
    queue: VecDeque<Event>,
    frames: Vec<Frame>,
    strict: bool,
    started: bool,
    done: bool,
}

/// Decode TOON input into a lazy event stream.
pub(crate) fn decode_events_impl<'a>(input: &'a str, options: &DecodeOptions) -> Events<'a> {
    Events {
        scanner: LazyScanner::new(input, options),
        queue: VecDeque::new(),
        frames: Vec::new(),
        strict: options.strict,
        started: false,
        done: false,
    }
}

impl<'a> Iterator for Events<'a> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Result<Event>> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }
            if let Err(err) = self.step() {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}

impl<'a> Events<'a> {
    /// Advance the machine by at most one input line, refilling the event
    /// queue.
    fn step(&mut self) -> Result<()> {
        if !self.started {
            self.started = true;
            return self.start_document();
        }
        match self.frames.pop() {
            None => self.finish(),
            Some(Frame::Object { depth, in_item }) => self.step_object(depth, in_item),
            Some(Frame::Tabular {
                row_depth,
                fields,
                delimiter,
                declared,
                seen,
                header_line,
            }) => self.step_tabular(row_depth, fields, delimiter, declared, seen, header_line),
            Some(Frame::List {
                item_depth,
                declared,
                seen,
                header_line,
            }) => self.step_list(item_depth, declared, seen, header_line),
        }
    }

    fn start_document(&mut self) -> Result<()> {
        let first = match self.scanner.peek(0)? {
            None => {
                self.queue.push_back(Event::StartObject);
                self.queue.push_back(Event::EndObject);
                self.done = true;
                return Ok(());
            }
            Some(line) => line.clone(),
        };

        if let Some(header) = parse_array_header(&first.content, first.line_number, self.strict)? {
            if header.key.is_none() {
                self.scanner.next_line()?;
                return self.start_array(header, first.depth);
            }
        }

        if self.scanner.peek(1)?.is_none() && find_unquoted(&first.content, b':').is_none() {
            self.scanner.next_line()?;
            self.queue.push_back(Event::Primitive(parse_primitive_token(
                &first.content,
                self.strict,
                first.line_number,
            )?));
            self.done = true;
            return Ok(());
        }

        self.queue.push_back(Event::StartObject);
        self.frames.push(Frame::Object {
            depth: first.depth,
            in_item: false,
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(line) = self.scanner.peek(0)? {
            return Err(Error::syntax(line.line_number, "unexpected content"));
        }
        self.done = true;
        Ok(())
    }

    fn start_array(&mut self, header: crate::de::ArrayHeader, base_depth: usize) -> Result<()> {
        self.queue.push_back(Event::StartArray {
            length: header.length,
        });
        let delimiter = header.delimiter.as_char() as u8;

        if let Some(inline) = &header.inline_values {
            let tokens = split_delimited(inline, delimiter);
            if self.strict && tokens.len() != header.length {
                return Err(Error::length_mismatch(
                    header.line,
                    header.length,
                    tokens.len(),
                    ArrayKind::Inline,
                ));
            }
            for token in tokens {
                self.queue.push_back(Event::Primitive(parse_primitive_token(
                    &token,
                    self.strict,
                    header.line,
                )?));
            }
            self.queue.push_back(Event::EndArray);
            return Ok(());
        }

        if let Some(fields) = header.fields {
            self.frames.push(Frame::Tabular {
                row_depth: base_depth + 1,
                fields,
                delimiter,
                declared: header.length,
                seen: 0,
                header_line: header.line,
            });
            return Ok(());
        }

        self.frames.push(Frame::List {
            item_depth: base_depth + 1,
            declared: header.length,
            seen: 0,
            header_line: header.line,
        });
        Ok(())
    }

    fn step_object(&mut self, depth: usize, in_item: bool) -> Result<()> {
        let line = match self.scanner.peek(0)? {
            Some(line) if line.depth >= depth => line.clone(),
            _ => {
                self.queue.push_back(Event::EndObject);
                return Ok(());
            }
        };
        if line.depth > depth {
            return Err(Error::syntax(line.line_number, "unexpected indentation"));
        }
        if in_item {
            if line.content == "-" || line.content.starts_with("- ") {
                self.queue.push_back(Event::EndObject);
                return Ok(());
            }
            if find_unquoted(&line.content, b':').is_none()
                && parse_array_header(&line.content, line.line_number, self.strict)?.is_none()
            {
                return Err(Error::InvalidObjectListItem {
                    line: line.line_number,
                });
            }
        }
        self.frames.push(Frame::Object { depth, in_item });
        self.scanner.next_line()?;
        self.handle_entry_line(&line, depth)
    }

    fn handle_entry_line(&mut self, line: &ParsedLine, kv_depth: usize) -> Result<()> {
        let content = &line.content;
        let ln = line.line_number;

        if let Some(header) = parse_array_header(content, ln, self.strict)? {
            match header.key.clone() {
                Some(key) => {
                    self.queue.push_back(Event::Key {
                        key,
                        was_quoted: header.key_was_quoted,
                    });
                    return self.start_array(header, kv_depth);
                }
                None => return Err(Error::syntax(ln, "array header without a key")),
            }
        }

        let (key, end, was_quoted) = parse_key_token(content, ln, self.strict)?;
        let rest = content[end..].trim_start();
        let rest = rest
            .strip_prefix(':')
            .ok_or_else(|| Error::syntax(ln, "expected `:` after key"))?
            .trim();
        self.queue.push_back(Event::Key { key, was_quoted });

        if rest.is_empty() {
            if let Some(next) = self.scanner.peek(0)? {
                if next.depth > kv_depth {
                    self.queue.push_back(Event::StartObject);
                    self.frames.push(Frame::Object {
                        depth: kv_depth + 1,
                        in_item: false,
                    });
                    return Ok(());
                }
            }
            self.queue.push_back(Event::Primitive(Value::Null));
            return Ok(());
        }

        self.queue
            .push_back(Event::Primitive(parse_primitive_token(rest, self.strict, ln)?));
        Ok(())
    }

    fn step_tabular(
        &mut self,
        row_depth: usize,
        fields: Vec<(String, bool)>,
        delimiter: u8,
        declared: usize,
        seen: usize,
        header_line: usize,
    ) -> Result<()> {
        let candidate = match self.scanner.peek(0)? {
            Some(line) if line.depth >= row_depth => Some(line.clone()),
            _ => None,
        };
        let row = match candidate {
            Some(line) if line.depth > row_depth => {
                return Err(Error::syntax(line.line_number, "unexpected indentation"));
            }
            Some(line) => {
                let next = self.scanner.peek(1)?;
                if is_tabular_row(&line.content, delimiter, next, row_depth) {
                    Some(line)
                } else {
                    None
                }
            }
            None => None,
        };

        let line = match row {
            None => {
                if self.strict && seen != declared {
                    return Err(Error::length_mismatch(
                        header_line,
                        declared,
                        seen,
                        ArrayKind::Tabular,
                    ));
                }
                self.queue.push_back(Event::EndArray);
                return Ok(());
            }
            Some(line) => line,
        };

        self.scanner.next_line()?;
        let cells = split_delimited(&line.content, delimiter);
        if self.strict && cells.len() != fields.len() {
            return Err(Error::length_mismatch(
                line.line_number,
                fields.len(),
                cells.len(),
                ArrayKind::Tabular,
            ));
        }
        self.queue.push_back(Event::StartObject);
        for (i, (name, field_quoted)) in fields.iter().enumerate() {
            self.queue.push_back(Event::Key {
                key: name.clone(),
                was_quoted: *field_quoted,
            });
            let value = match cells.get(i) {
                Some(cell) => parse_primitive_token(cell, self.strict, line.line_number)?,
                None => Value::Null,
            };
            self.queue.push_back(Event::Primitive(value));
        }
        self.queue.push_back(Event::EndObject);
        self.frames.push(Frame::Tabular {
            row_depth,
            fields,
            delimiter,
            declared,
            seen: seen + 1,
            header_line,
        });
        Ok(())
    }

    fn step_list(
        &mut self,
        item_depth: usize,
        declared: usize,
        seen: usize,
        header_line: usize,
    ) -> Result<()> {
        let candidate = match self.scanner.peek(0)? {
            Some(line) if line.depth >= item_depth => Some(line.clone()),
            _ => None,
        };
        let item = match candidate {
            Some(line) if line.depth > item_depth => {
                return Err(Error::syntax(line.line_number, "unexpected indentation"));
            }
            Some(line) if line.content == "-" || line.content.starts_with("- ") => Some(line),
            _ => None,
        };

        let line = match item {
            None => {
                if self.strict && seen != declared {
                    return Err(Error::length_mismatch(
                        header_line,
                        declared,
                        seen,
                        ArrayKind::List,
                    ));
                }
                self.queue.push_back(Event::EndArray);
                return Ok(());
            }
            Some(line) => line,
        };

        self.scanner.next_line()?;
        self.frames.push(Frame::List {
            item_depth,
            declared,
            seen: seen + 1,
            header_line,
        });
        self.handle_list_item(&line, item_depth)
    }

    fn handle_list_item(&mut self, line: &ParsedLine, item_depth: usize) -> Result<()> {
        let ln = line.line_number;
        let rest = if line.content == "-" {
            ""
        } else {
            line.content[2..].trim()
        };
        if rest.is_empty() {
            self.queue.push_back(Event::StartObject);
            self.queue.push_back(Event::EndObject);
            return Ok(());
        }

        if let Some(header) = parse_array_header(rest, ln, self.strict)? {
            match header.key.clone() {
                None => return self.start_array(header, item_depth),
                Some(key) => {
                    self.queue.push_back(Event::StartObject);
                    self.frames.push(Frame::Object {
                        depth: item_depth + 1,
                        in_item: true,
                    });
                    self.queue.push_back(Event::Key {
                        key,
                        was_quoted: header.key_was_quoted,
                    });
                    return self.start_array(header, item_depth + 1);
                }
            }
        }

        if find_unquoted(rest, b':').is_some() {
            self.queue.push_back(Event::StartObject);
            self.frames.push(Frame::Object {
                depth: item_depth + 1,
                in_item: true,
            });
            let synthetic = ParsedLine {
                content: rest.to_string(),
                indent: line.indent,
                depth: item_depth,
                line_number: ln,
            };
            return self.handle_entry_line(&synthetic, item_depth + 1);
        }

        self.queue
            .push_back(Event::Primitive(parse_primitive_token(rest, self.strict, ln)?));
        Ok(())
    }
}

enum Partial {
    Object { map: ToonMap, pending: Option<String> },
    Array(Vec<Value>),
}

/// Rebuild a value tree from an event sequence.
///
/// Containers are assembled on a stack of partial values. An unmatched
/// start event (or an empty stream) is [`Error::Incomplete`]; a `Key` not
/// followed by a value is [`Error::ExpectedValue`].
pub fn events_to_value<I>(events: I) -> Result<Value>
where
    I: IntoIterator<Item = Result<Event>>,
{
    let mut stack: Vec<Partial> = Vec::new();
    let mut result: Option<Value> = None;

    for event in events {
        let event = event?;
        if result.is_some() {
            return Err(Error::custom("event after document end"));
        }
        match event {
            Event::StartObject => stack.push(Partial::Object {
                map: ToonMap::new(),
                pending: None,
            }),
            Event::StartArray { .. } => stack.push(Partial::Array(Vec::new())),
            Event::Key { key, .. } => match stack.last_mut() {
                Some(Partial::Object { pending, .. }) if pending.is_none() => {
                    *pending = Some(key);
                }
                _ => return Err(Error::custom("key event outside an object")),
            },
            Event::Primitive(value) => attach(&mut stack, &mut result, value)?,
            Event::EndObject => match stack.pop() {
                Some(Partial::Object { map, pending }) => {
                    if pending.is_some() {
                        return Err(Error::ExpectedValue { line: 0 });
                    }
                    attach(&mut stack, &mut result, Value::Object(map))?;
                }
                _ => return Err(Error::Incomplete),
            },
            Event::EndArray => match stack.pop() {
                Some(Partial::Array(items)) => {
                    attach(&mut stack, &mut result, Value::Array(items))?;
                }
                _ => return Err(Error::Incomplete),
            },
        }
    }

    if !stack.is_empty() {
        return Err(Error::Incomplete);
    }
    result.ok_or(Error::Incomplete)
}

fn attach(stack: &mut [Partial], result: &mut Option<Value>, value: Value) -> Result<()> {
    match stack.last_mut() {
        None => {
            *result = Some(value);
            Ok(())
        }
        Some(Partial::Array(items)) => {
            items.push(value);
            Ok(())
        }
        Some(Partial::Object { map, pending }) => match pending.take() {
            Some(key) => {
                map.insert(key, value);
                Ok(())
            }
            None => Err(Error::custom("value event without a key in object")),
        },
    }
}
