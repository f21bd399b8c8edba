//! First look at TOON: uniform records compress to one header plus one
//! row per element.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use std::error::Error;
use toon_codec::{from_str, to_string};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Reading {
    sensor: String,
    celsius: f64,
    ok: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let readings = vec![
        Reading {
            sensor: "intake".to_string(),
            celsius: 21.4,
            ok: true,
        },
        Reading {
            sensor: "exhaust".to_string(),
            celsius: 68.0,
            ok: true,
        },
        Reading {
            sensor: "coolant".to_string(),
            celsius: 93.5,
            ok: false,
        },
    ];

    // The keys appear once, in the header, instead of once per record
    let toon = to_string(&readings)?;
    println!("TOON ({} bytes):\n{}\n", toon.len(), toon);

    let json = serde_json::to_string(&readings)?;
    println!("JSON ({} bytes):\n{}\n", json.len(), json);

    let back: Vec<Reading> = from_str(&toon)?;
    assert_eq!(readings, back);
    println!("✓ Round-trip successful");

    Ok(())
}
