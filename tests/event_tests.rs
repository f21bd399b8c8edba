//! Event decoder tests: exact event sequences, equivalence with the eager
//! decoder, laziness, and strict errors surfacing mid-stream.

use toon_codec::{
    decode, decode_events, events_to_value, DecodeOptions, Error, Event, Value,
};

fn collect(input: &str) -> Vec<Event> {
    decode_events(input, &DecodeOptions::default())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn key(k: &str) -> Event {
    Event::Key {
        key: k.to_string(),
        was_quoted: false,
    }
}

fn prim(v: impl Into<Value>) -> Event {
    Event::Primitive(v.into())
}

#[test]
fn test_inline_array_stream() {
    assert_eq!(
        collect("[3]: a,b,c"),
        vec![
            Event::StartArray { length: 3 },
            prim("a"),
            prim("b"),
            prim("c"),
            Event::EndArray,
        ]
    );
}

#[test]
fn test_tabular_stream() {
    assert_eq!(
        collect("[2]{id,name}:\n  1,Alice\n  2,Bob"),
        vec![
            Event::StartArray { length: 2 },
            Event::StartObject,
            key("id"),
            prim(1),
            key("name"),
            prim("Alice"),
            Event::EndObject,
            Event::StartObject,
            key("id"),
            prim(2),
            key("name"),
            prim("Bob"),
            Event::EndObject,
            Event::EndArray,
        ]
    );
}

#[test]
fn test_list_stream() {
    assert_eq!(
        collect("items[3]:\n  - 1\n  - a: 1\n  - text"),
        vec![
            Event::StartObject,
            key("items"),
            Event::StartArray { length: 3 },
            prim(1),
            Event::StartObject,
            key("a"),
            prim(1),
            Event::EndObject,
            prim("text"),
            Event::EndArray,
            Event::EndObject,
        ]
    );
}

#[test]
fn test_nested_object_stream() {
    assert_eq!(
        collect("user:\n  name: Alice"),
        vec![
            Event::StartObject,
            key("user"),
            Event::StartObject,
            key("name"),
            prim("Alice"),
            Event::EndObject,
            Event::EndObject,
        ]
    );
}

#[test]
fn test_root_primitive_stream() {
    assert_eq!(collect("42"), vec![prim(42)]);
}

#[test]
fn test_reducer_matches_eager_decoder() {
    let options = DecodeOptions::default();
    let inputs = [
        "",
        "42",
        "name: Alice\nage: 30",
        "[3]: 1,2,3",
        "[2]{id,name}:\n  1,Alice\n  2,Bob",
        "items[3]:\n  - 1\n  - a: 1\n  - text",
        "user:\n  name: Alice\n  tags[2]: a,b\nactive: true",
        "grid[2]:\n  - [2]: 1,2\n  - [2]: 3,4",
        "items[1]:\n  - rows[2]{a,b}:\n      1,2\n      3,4\n    note: ok",
        "empty[0]:",
    ];
    for input in inputs {
        let eager = decode(input, &options).unwrap();
        let streamed = events_to_value(decode_events(input, &options)).unwrap();
        assert_eq!(eager, streamed, "mismatch for {input:?}");
    }
}

#[test]
fn test_strict_error_surfaces_in_stream() {
    let mut events = decode_events("items[3]:\n  - only", &DecodeOptions::default());
    let mut saw_error = false;
    for event in &mut events {
        if let Err(err) = event {
            assert!(matches!(err, Error::LengthMismatch { .. }));
            saw_error = true;
            break;
        }
    }
    assert!(saw_error);
    // The iterator fuses after the error
    assert!(events.next().is_none());
}

#[test]
fn test_prefix_consumption_is_lazy() {
    // Build a large document; taking a handful of events must not visit
    // the malformed line at the bottom.
    let mut input = String::from("rows[1000]{id,name}:\n");
    for i in 0..1000 {
        input.push_str(&format!("  {i},user{i}\n"));
    }
    input.push_str("\tbroken");

    let events: Vec<_> = decode_events(&input, &DecodeOptions::default())
        .take(10)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(events[0], Event::StartArray { length: 1000 });
    assert_eq!(events.len(), 10);
}

#[test]
fn test_quoted_key_bit_flows_through() {
    let events = collect("\"user.name\": Alice");
    assert_eq!(
        events[1],
        Event::Key {
            key: "user.name".to_string(),
            was_quoted: true,
        }
    );
}

#[test]
fn test_reducer_rejects_unbalanced_streams() {
    assert!(matches!(
        events_to_value(vec![Ok(Event::StartObject)]),
        Err(Error::Incomplete)
    ));
    assert!(matches!(
        events_to_value(Vec::<Result<Event, Error>>::new()),
        Err(Error::Incomplete)
    ));
    assert!(matches!(
        events_to_value(vec![
            Ok(Event::StartObject),
            Ok(Event::Key {
                key: "a".to_string(),
                was_quoted: false
            }),
            Ok(Event::EndObject),
        ]),
        Err(Error::ExpectedValue { .. })
    ));
}

#[test]
fn test_dropping_stream_midway() {
    let mut events = decode_events("a: 1\nb: 2\nc: 3", &DecodeOptions::default());
    assert!(events.next().is_some());
    assert!(events.next().is_some());
    drop(events);
}
