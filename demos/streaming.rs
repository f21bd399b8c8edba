//! Consuming a document as a lazy event stream.
//!
//! Run with: cargo run --example streaming

use std::error::Error;
use toon_codec::{decode_events, events_to_value, DecodeOptions, Event};

fn main() -> Result<(), Box<dyn Error>> {
    let input = "\
users[3]{id,name}:
  1,Alice
  2,Bob
  3,Carol
summary: three users";

    // Walk the stream event by event; input is scanned on demand
    for event in decode_events(input, &DecodeOptions::default()) {
        match event? {
            Event::StartObject => println!("start object"),
            Event::EndObject => println!("end object"),
            Event::StartArray { length } => println!("start array (declares {length})"),
            Event::EndArray => println!("end array"),
            Event::Key { key, .. } => println!("  key: {key}"),
            Event::Primitive(value) => println!("  value: {value:?}"),
        }
    }

    // Or rebuild the tree from the stream
    let value = events_to_value(decode_events(input, &DecodeOptions::default()))?;
    println!("\nrebuilt: {value:?}");

    Ok(())
}
