//! Literal wire-format fixtures: exact encoder output and exact decoder
//! results for each array layout, delimiter and key form.

use toon_codec::{
    decode, encode, encode_lines, toon, DecodeOptions, Delimiter, EncodeOptions, KeyCollapsing,
    PathExpansion, Value,
};

fn enc(value: &Value) -> String {
    encode(value, &EncodeOptions::default()).unwrap()
}

fn dec(input: &str) -> Value {
    decode(input, &DecodeOptions::default()).unwrap()
}

#[test]
fn test_flat_object() {
    let value = toon!({ "name": "Alice", "age": 30 });
    assert_eq!(enc(&value), "name: Alice\nage: 30");
    assert_eq!(dec("name: Alice\nage: 30"), value);
}

#[test]
fn test_tabular_array() {
    let value = toon!([
        { "id": 1, "name": "Alice" },
        { "id": 2, "name": "Bob" }
    ]);
    assert_eq!(enc(&value), "[2]{id,name}:\n  1,Alice\n  2,Bob");
    assert_eq!(dec("[2]{id,name}:\n  1,Alice\n  2,Bob"), value);
}

#[test]
fn test_mixed_array_uses_list_layout() {
    let value = toon!({ "items": [1, { "a": 1 }, "text"] });
    assert_eq!(enc(&value), "items[3]:\n  - 1\n  - a: 1\n  - text");
    assert_eq!(dec("items[3]:\n  - 1\n  - a: 1\n  - text"), value);
}

#[test]
fn test_inline_array_with_spaces() {
    assert_eq!(
        dec("scores[3]: 95, 87, 92"),
        toon!({ "scores": [95, 87, 92] })
    );
}

#[test]
fn test_collapse_and_expand() {
    let value = toon!({ "data": { "config": { "server": "localhost" } } });

    let collapsed = encode(
        &value,
        &EncodeOptions::new().with_key_collapsing(KeyCollapsing::Safe),
    )
    .unwrap();
    assert_eq!(collapsed, "data.config.server: localhost");

    let expanded = decode(
        &collapsed,
        &DecodeOptions::new().with_expand_paths(PathExpansion::Safe),
    )
    .unwrap();
    assert_eq!(expanded, value);
}

#[test]
fn test_quoted_key_is_not_expanded() {
    let value = decode(
        "\"user.name\": Alice",
        &DecodeOptions::new().with_expand_paths(PathExpansion::Safe),
    )
    .unwrap();
    assert_eq!(value, toon!({ "user.name": "Alice" }));
}

#[test]
fn test_literal_dotted_key_is_quoted_on_encode() {
    let value = toon!({ "user.name": "Alice" });
    assert_eq!(enc(&value), "\"user.name\": Alice");
}

#[test]
fn test_root_forms() {
    assert_eq!(enc(&Value::Null), "null");
    assert_eq!(enc(&Value::Bool(true)), "true");
    assert_eq!(enc(&Value::Number(3.5)), "3.5");
    assert_eq!(enc(&Value::String("hi there".into())), "hi there");
    assert_eq!(enc(&toon!([])), "[0]:");
    assert_eq!(enc(&toon!({})), "");

    assert_eq!(dec("null"), Value::Null);
    assert_eq!(dec("true"), Value::Bool(true));
    assert_eq!(dec("3.5"), Value::Number(3.5));
    assert_eq!(dec("hi there"), Value::String("hi there".into()));
    assert_eq!(dec("[0]:"), toon!([]));
    assert_eq!(dec(""), toon!({}));
}

#[test]
fn test_nested_object_block() {
    let value = toon!({
        "user": {
            "name": "Alice",
            "meta": { "verified": true }
        }
    });
    let expected = "user:\n  name: Alice\n  meta:\n    verified: true";
    assert_eq!(enc(&value), expected);
    assert_eq!(dec(expected), value);
}

#[test]
fn test_empty_object_value_decodes_to_null() {
    // A key with no inline value and no nested block reads back as null.
    let value = toon!({ "a": {} });
    assert_eq!(enc(&value), "a:");
    assert_eq!(dec("a:"), toon!({ "a": null }));
}

#[test]
fn test_list_of_multi_field_objects() {
    let value = toon!({
        "users": [
            { "name": "Alice", "role": "admin", "tags": ["a", "b"] },
            { "name": "Bob", "role": "user", "tags": [] }
        ]
    });
    let expected = "users[2]:\n  - name: Alice\n    role: admin\n    tags[2]: a,b\n  - name: Bob\n    role: user\n    tags[0]:";
    assert_eq!(enc(&value), expected);
    assert_eq!(dec(expected), value);
}

#[test]
fn test_tabular_inside_list_item() {
    let value = toon!({
        "items": [
            { "rows": [ { "a": 1, "b": 2 }, { "a": 3, "b": 4 } ], "note": "ok" }
        ]
    });
    let expected = "items[1]:\n  - rows[2]{a,b}:\n      1,2\n      3,4\n    note: ok";
    assert_eq!(enc(&value), expected);
    assert_eq!(dec(expected), value);
}

#[test]
fn test_nested_array_as_list_item() {
    let value = toon!({ "grid": [[1, 2], [3, 4]] });
    let expected = "grid[2]:\n  - [2]: 1,2\n  - [2]: 3,4";
    assert_eq!(enc(&value), expected);
    assert_eq!(dec(expected), value);
}

#[test]
fn test_empty_object_list_item() {
    let value = toon!({ "items": [{}, {}] });
    let expected = "items[2]:\n  -\n  -";
    assert_eq!(enc(&value), expected);
    assert_eq!(dec(expected), value);
}

#[test]
fn test_pipe_delimiter_layouts() {
    let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
    let inline = toon!({ "tags": ["a,b", "c"] });
    // Commas are inert under a pipe delimiter
    assert_eq!(encode(&inline, &options).unwrap(), "tags[2|]: a,b|c");
    assert_eq!(dec("tags[2|]: a,b|c"), inline);

    let table = toon!([{ "sku": "A1", "qty": 2 }, { "sku": "B2", "qty": 1 }]);
    assert_eq!(
        encode(&table, &options).unwrap(),
        "[2|]{sku|qty}:\n  A1|2\n  B2|1"
    );
    assert_eq!(dec("[2|]{sku|qty}:\n  A1|2\n  B2|1"), table);
}

#[test]
fn test_tab_delimiter_layouts() {
    let options = EncodeOptions::new().with_delimiter(Delimiter::Tab);
    let value = toon!({ "nums": [1, 2, 3] });
    assert_eq!(encode(&value, &options).unwrap(), "nums[3\t]: 1\t2\t3");
    assert_eq!(dec("nums[3\t]: 1\t2\t3"), value);
}

#[test]
fn test_quoting_in_rows_and_inline() {
    let value = toon!({
        "rows": [
            { "text": "a,b", "n": 1 },
            { "text": "true", "n": 2 }
        ]
    });
    let expected = "rows[2]{text,n}:\n  \"a,b\",1\n  \"true\",2";
    assert_eq!(enc(&value), expected);
    assert_eq!(dec(expected), value);

    let inline = toon!({ "vals": ["x,y", "3", ""] });
    assert_eq!(enc(&inline), "vals[3]: \"x,y\",\"3\",\"\"");
    assert_eq!(dec("vals[3]: \"x,y\",\"3\",\"\""), inline);
}

#[test]
fn test_escape_sequences_roundtrip() {
    let value = toon!({ "text": "line1\nline2\twith \"quotes\" and \\" });
    let encoded = enc(&value);
    assert_eq!(
        encoded,
        "text: \"line1\\nline2\\twith \\\"quotes\\\" and \\\\\""
    );
    assert_eq!(dec(&encoded), value);
}

#[test]
fn test_unicode_escape_decodes() {
    assert_eq!(
        dec("text: \"snow \\u2603\""),
        toon!({ "text": "snow \u{2603}" })
    );
}

#[test]
fn test_encode_lines_split() {
    let value = toon!({ "a": 1, "items": [1, 2] });
    let lines = encode_lines(&value, &EncodeOptions::default()).unwrap();
    assert_eq!(lines, vec!["a: 1".to_string(), "items[2]: 1,2".to_string()]);
}

#[test]
fn test_collapse_stops_at_multi_key_object() {
    let value = toon!({ "wrap": { "inner": { "a": 1, "b": 2 } } });
    let collapsed = encode(
        &value,
        &EncodeOptions::new().with_key_collapsing(KeyCollapsing::Safe),
    )
    .unwrap();
    assert_eq!(collapsed, "wrap.inner:\n  a: 1\n  b: 2");
    let expanded = decode(
        &collapsed,
        &DecodeOptions::new().with_expand_paths(PathExpansion::Safe),
    )
    .unwrap();
    assert_eq!(expanded, value);
}

#[test]
fn test_collapse_collision_with_literal_sibling() {
    let value = toon!({
        "a": { "b": 1 },
        "a.b": 2
    });
    let collapsed = encode(
        &value,
        &EncodeOptions::new().with_key_collapsing(KeyCollapsing::Safe),
    )
    .unwrap();
    // The chain must not collapse onto the literal sibling key
    assert_eq!(collapsed, "a:\n  b: 1\n\"a.b\": 2");
}

#[test]
fn test_collapse_respects_flatten_depth() {
    let value = toon!({ "a": { "b": { "c": { "d": 1 } } } });
    let options = EncodeOptions::new()
        .with_key_collapsing(KeyCollapsing::Safe)
        .with_flatten_depth(2);
    assert_eq!(encode(&value, &options).unwrap(), "a.b:\n  c:\n    d: 1");
}

#[test]
fn test_collapsed_array_leaf() {
    let value = toon!({ "data": { "scores": [1, 2, 3] } });
    let options = EncodeOptions::new().with_key_collapsing(KeyCollapsing::Safe);
    assert_eq!(encode(&value, &options).unwrap(), "data.scores[3]: 1,2,3");
    let expanded = decode(
        "data.scores[3]: 1,2,3",
        &DecodeOptions::new().with_expand_paths(PathExpansion::Safe),
    )
    .unwrap();
    assert_eq!(expanded, value);
}

#[test]
fn test_quoted_keys_roundtrip() {
    let value = toon!({
        "user-id": 7,
        "2nd": "place",
        "has space": true,
        "a:b": 1
    });
    let encoded = enc(&value);
    // Only keys carrying structural characters need quotes; digits and
    // inner spaces are safe bare.
    assert_eq!(
        encoded,
        "\"user-id\": 7\n2nd: place\nhas space: true\n\"a:b\": 1"
    );
    assert_eq!(dec(&encoded), value);
}

#[test]
fn test_negative_zero_and_nonfinite() {
    let mut map = toon_codec::ToonMap::new();
    map.insert("z".to_string(), Value::from(-0.0));
    assert_eq!(enc(&Value::Object(map)), "z: 0");
    assert_eq!(enc(&Value::Number(f64::NAN)), "null");
    assert_eq!(dec("z: -0"), toon!({ "z": 0 }));
}

#[test]
fn test_blank_lines_between_fields() {
    assert_eq!(dec("a: 1\n\nb: 2\n"), toon!({ "a": 1, "b": 2 }));
}
