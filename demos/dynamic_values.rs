//! Working with dynamic values via the toon! macro and Value API.
//!
//! Run with: cargo run --example dynamic_values

use std::error::Error;
use toon_codec::{decode, encode, toon, DecodeOptions, EncodeOptions, Value};

fn main() -> Result<(), Box<dyn Error>> {
    let data = toon!({
        "name": "Alice",
        "age": 30,
        "tags": ["rust", "serde", "llm"],
        "metadata": {
            "verified": true
        }
    });

    let text = encode(&data, &EncodeOptions::default())?;
    println!("Encoded:\n{}\n", text);

    let back = decode(&text, &DecodeOptions::default())?;
    assert_eq!(data, back);

    // Inspect without knowing the shape up front
    if let Some(obj) = back.as_object() {
        println!("name  = {:?}", obj.get("name").and_then(Value::as_str));
        println!("age   = {:?}", obj.get("age").and_then(Value::as_i64));
        if let Some(tags) = obj.get("tags").and_then(Value::as_array) {
            println!("tags  = {} entries", tags.len());
        }
    }

    Ok(())
}
