//! Customizing delimiters, key collapsing and strictness.
//!
//! Run with: cargo run --example custom_options

use std::error::Error;
use toon_codec::{
    decode, encode, toon, DecodeOptions, Delimiter, EncodeOptions, KeyCollapsing, PathExpansion,
};

fn main() -> Result<(), Box<dyn Error>> {
    let value = toon!({
        "data": {
            "config": {
                "server": "localhost"
            }
        },
        "items": ["a,b", "c|d"]
    });

    // Pipe delimiter: commas become inert, pipes trigger quoting instead
    let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
    println!("Pipe delimited:\n{}\n", encode(&value, &options)?);

    // Key collapsing fuses single-key wrapper chains into dotted keys
    let options = EncodeOptions::new().with_key_collapsing(KeyCollapsing::Safe);
    let collapsed = encode(&value, &options)?;
    println!("Collapsed:\n{}\n", collapsed);

    // Path expansion reverses the collapse on decode
    let expanded = decode(
        &collapsed,
        &DecodeOptions::new().with_expand_paths(PathExpansion::Safe),
    )?;
    assert_eq!(value, expanded);
    println!("✓ Collapse/expand round-trip successful");

    Ok(())
}
