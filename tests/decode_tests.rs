//! Decoder-focused tests: strict-mode validation, scanner edge cases,
//! header errors, layout termination and path expansion.

use toon_codec::{
    decode, ArrayKind, DecodeOptions, Error, PathExpansion, Value,
};

fn strict() -> DecodeOptions {
    DecodeOptions::default()
}

fn lenient() -> DecodeOptions {
    DecodeOptions::new().with_strict(false)
}

#[test]
fn test_list_length_mismatch() {
    let err = decode("items[2]:\n  - Apple", &strict()).unwrap_err();
    match err {
        Error::LengthMismatch {
            expected,
            actual,
            kind,
            ..
        } => {
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
            assert_eq!(kind, ArrayKind::List);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Non-strict keeps what is actually there
    let value = decode("items[2]:\n  - Apple", &lenient()).unwrap();
    let items = value.as_object().unwrap().get("items").unwrap();
    assert_eq!(items.as_array().unwrap().len(), 1);
}

#[test]
fn test_inline_length_mismatch() {
    let err = decode("nums[2]: 1,2,3", &strict()).unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            expected: 2,
            actual: 3,
            kind: ArrayKind::Inline,
            ..
        }
    ));
    let value = decode("nums[2]: 1,2,3", &lenient()).unwrap();
    let nums = value.as_object().unwrap().get("nums").unwrap();
    assert_eq!(nums.as_array().unwrap().len(), 3);
}

#[test]
fn test_tabular_length_mismatch() {
    let input = "rows[1]{a,b}:\n  1,2\n  3,4";
    let err = decode(input, &strict()).unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            expected: 1,
            actual: 2,
            kind: ArrayKind::Tabular,
            ..
        }
    ));
    assert!(decode(input, &lenient()).is_ok());
}

#[test]
fn test_tabular_cell_count_mismatch() {
    let err = decode("rows[1]{a,b}:\n  1", &strict()).unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { .. }));

    // Non-strict pads the missing cells with null
    let value = decode("rows[1]{a,b}:\n  1", &lenient()).unwrap();
    let row = &value.as_object().unwrap().get("rows").unwrap().as_array().unwrap()[0];
    assert_eq!(row.as_object().unwrap().get("b"), Some(&Value::Null));
}

#[test]
fn test_tabs_in_indentation() {
    let err = decode("a:\n\tb: 1", &strict()).unwrap_err();
    assert!(matches!(err, Error::TabsNotAllowed { line: 2 }));

    // Non-strict: one tab counts as a single space, flooring to depth 0,
    // which makes `b` a sibling of `a`
    let value = decode("a: 1\n\tb: 2", &lenient()).unwrap();
    assert_eq!(
        value.as_object().unwrap().get("b"),
        Some(&Value::Number(2.0))
    );
}

#[test]
fn test_indent_not_multiple() {
    let err = decode("a:\n   b: 1", &strict()).unwrap_err();
    assert!(matches!(
        err,
        Error::IndentNotMultiple {
            line: 2,
            found: 3,
            unit: 2
        }
    ));
    assert!(decode("a:\n   b: 1", &lenient()).is_ok());
}

#[test]
fn test_custom_indent_unit() {
    let options = DecodeOptions::new().with_indent(4);
    let value = decode("a:\n    b: 1", &options).unwrap();
    let a = value.as_object().unwrap().get("a").unwrap();
    assert_eq!(a.as_object().unwrap().get("b"), Some(&Value::Number(1.0)));

    assert!(matches!(
        decode("a:\n  b: 1", &options).unwrap_err(),
        Error::IndentNotMultiple { .. }
    ));
}

#[test]
fn test_bad_headers() {
    assert!(matches!(
        decode("items[]:", &strict()).unwrap_err(),
        Error::BadHeader { .. }
    ));
    assert!(matches!(
        decode("items[-1]:", &strict()).unwrap_err(),
        Error::BadHeader { .. }
    ));
    assert!(matches!(
        decode("items[abc]:", &strict()).unwrap_err(),
        Error::BadHeader { .. }
    ));
    assert!(matches!(
        decode("items[2] 1,2", &strict()).unwrap_err(),
        Error::BadHeader { .. }
    ));
    assert!(matches!(
        decode("items[2]{}:", &strict()).unwrap_err(),
        Error::BadHeader { .. }
    ));
}

#[test]
fn test_bad_escape_strict_only() {
    let err = decode("text: \"a\\qb\"", &strict()).unwrap_err();
    assert!(matches!(err, Error::BadEscape { .. }));

    let value = decode("text: \"a\\qb\"", &lenient()).unwrap();
    assert_eq!(
        value.as_object().unwrap().get("text"),
        Some(&Value::String("a\\qb".to_string()))
    );
}

#[test]
fn test_bad_number() {
    // Matches the numeric shape but overflows to infinity
    let err = decode("n: 1e999", &strict()).unwrap_err();
    assert!(matches!(err, Error::BadNumber { .. }));
    assert_eq!(
        decode("n: 1e999", &lenient())
            .unwrap()
            .as_object()
            .unwrap()
            .get("n"),
        Some(&Value::Null)
    );
}

#[test]
fn test_invalid_list_item_field() {
    let input = "items[1]:\n  - a: 1\n    garbage";
    let err = decode(input, &strict()).unwrap_err();
    assert!(matches!(err, Error::InvalidObjectListItem { line: 3 }));
}

#[test]
fn test_missing_colon() {
    assert!(matches!(
        decode("a: 1\nnot a field", &strict()).unwrap_err(),
        Error::Syntax { line: 2, .. }
    ));
}

#[test]
fn test_tabular_section_ends_at_key_value() {
    let input = "users[2]{id,name}:\n  1,Alice\n  2,Bob\nnote: done";
    let value = decode(input, &strict()).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.get("users").unwrap().as_array().unwrap().len(), 2);
    assert_eq!(obj.get("note"), Some(&Value::String("done".to_string())));
}

#[test]
fn test_row_with_colon_in_cell() {
    let input = "logs[2]{id,msg}:\n  1,\"see: appendix\"\n  2,ok";
    let value = decode(input, &strict()).unwrap();
    let rows = value.as_object().unwrap().get("logs").unwrap();
    assert_eq!(
        rows.as_array().unwrap()[0].as_object().unwrap().get("msg"),
        Some(&Value::String("see: appendix".to_string()))
    );
}

#[test]
fn test_key_with_no_value_is_null() {
    let value = decode("a:\nb: 1", &strict()).unwrap();
    assert_eq!(value.as_object().unwrap().get("a"), Some(&Value::Null));
}

#[test]
fn test_quoted_values_and_keywords() {
    let value = decode("a: \"true\"\nb: true\nc: \"42\"\nd: 42", &strict()).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.get("a"), Some(&Value::String("true".to_string())));
    assert_eq!(obj.get("b"), Some(&Value::Bool(true)));
    assert_eq!(obj.get("c"), Some(&Value::String("42".to_string())));
    assert_eq!(obj.get("d"), Some(&Value::Number(42.0)));
}

#[test]
fn test_expansion_deep_merge() {
    let options = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
    let value = decode("a.b.c: 1\na.b.d: 2\na.e: 3", &options).unwrap();
    let a = value.as_object().unwrap().get("a").unwrap();
    let b = a.as_object().unwrap().get("b").unwrap();
    assert_eq!(b.as_object().unwrap().get("c"), Some(&Value::Number(1.0)));
    assert_eq!(b.as_object().unwrap().get("d"), Some(&Value::Number(2.0)));
    assert_eq!(a.as_object().unwrap().get("e"), Some(&Value::Number(3.0)));
}

#[test]
fn test_expansion_conflict_modes() {
    let strict_expand = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
    let err = decode("a: 1\na.b: 2", &strict_expand).unwrap_err();
    assert!(matches!(err, Error::ExpansionConflict { .. }));

    let lenient_expand = strict_expand.with_strict(false);
    let value = decode("a: 1\na.b: 2", &lenient_expand).unwrap();
    let a = value.as_object().unwrap().get("a").unwrap();
    assert_eq!(a.as_object().unwrap().get("b"), Some(&Value::Number(2.0)));
}

#[test]
fn test_expansion_skips_non_identifier_segments() {
    let options = DecodeOptions::new().with_expand_paths(PathExpansion::Safe);
    // "2" is not an identifier segment, so the key stays literal
    let value = decode("v1.2: x", &options).unwrap();
    assert_eq!(
        value.as_object().unwrap().get("v1.2"),
        Some(&Value::String("x".to_string()))
    );
}

#[test]
fn test_expansion_off_keeps_dotted_keys() {
    let value = decode("a.b: 1", &strict()).unwrap();
    assert_eq!(
        value.as_object().unwrap().get("a.b"),
        Some(&Value::Number(1.0))
    );
}

#[test]
fn test_trailing_garbage_rejected() {
    let err = decode("[2]: 1,2\nextra: 1", &strict()).unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
}

#[test]
fn test_unexpected_indentation() {
    let err = decode("a: 1\n    b: 2", &strict()).unwrap_err();
    assert!(matches!(err, Error::Syntax { line: 2, .. }));
}

#[test]
fn test_crlf_input() {
    let value = decode("a: 1\r\nb: 2\r\n", &strict()).unwrap();
    assert_eq!(
        value.as_object().unwrap().get("b"),
        Some(&Value::Number(2.0))
    );
}

#[test]
fn test_delimiter_from_header_only_affects_that_array() {
    let input = "a[2|]: x|y\nb[2]: 1,2";
    let value = decode(input, &strict()).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.get("a").unwrap().as_array().unwrap().len(), 2);
    assert_eq!(obj.get("b").unwrap().as_array().unwrap().len(), 2);
}

#[test]
fn test_deeply_nested_blocks() {
    let input = "a:\n  b:\n    c:\n      d: leaf";
    let value = decode(input, &strict()).unwrap();
    let mut cur = &value;
    for key in ["a", "b", "c"] {
        cur = cur.as_object().unwrap().get(key).unwrap();
    }
    assert_eq!(
        cur.as_object().unwrap().get("d"),
        Some(&Value::String("leaf".to_string()))
    );
}
