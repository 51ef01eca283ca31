//! Fuzzing harnesses for `jt`.
//!
//! Each public function accepts raw bytes, builds inputs from them and drives
//! one part of `jt-core`. Decoding errors are swallowed so fuzzers can keep
//! exploring; broken invariants panic so they surface as crashes.
//!
//! # Examples
//!
//! ```
//! jt_fuzz::fuzz_decode(b"{\"a\":1}");
//! jt_fuzz::fuzz_resolve(&[1, 2, 3, 4]);
//! jt_fuzz::fuzz_multiset(b"example");
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use arbitrary::Unstructured;
use jt_core::{
    diff, equals_ordered, equals_unordered, AccessError, DecodeOptions, Document, Path, Value,
    ValueKind,
};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

const MAX_DEPTH: usize = 4;
const MAX_ARRAY_LEN: u8 = 6;
const MAX_OBJECT_LEN: u8 = 4;
const MAX_PATH_LEN: u8 = 5;
const KEY_ALPHABET: &[u8] = b"ab";

/// Feeds arbitrary bytes through the JSON and YAML decoders.
///
/// ```
/// jt_fuzz::fuzz_decode(b"key: value");
/// ```
pub fn fuzz_decode(data: &[u8]) {
    if let Ok(text) = std::str::from_utf8(data) {
        let float = DecodeOptions::default();
        let exact = DecodeOptions::exact_integers();
        let _ = Document::from_json_str_with(text, &float);
        let _ = Document::from_json_str_with(text, &exact);
        let _ = Document::from_yaml_str_with(text, &float);
        let _ = Document::from_yaml_str_with(text, &exact);
    }
}

/// Resolves random paths against random documents and checks that each
/// failure kind describes where the walk stopped.
///
/// ```
/// jt_fuzz::fuzz_resolve(b"seed");
/// ```
pub fn fuzz_resolve(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let Some(doc) = random_document(&mut unstructured) else {
        return;
    };
    let Ok(path) = random_path(&mut unstructured) else {
        return;
    };

    let outcome = doc.resolve(&path);
    assert_eq!(outcome, doc.resolve(&path), "resolution must be repeatable");

    match outcome {
        Ok(value) => {
            assert_eq!(doc.get(&path.to_string()), Ok(value));
        }
        Err(AccessError::PathIndexFailed) => {
            let blocked = (1..path.len()).filter_map(|len| path.prefix(len)).any(|prefix| {
                matches!(doc.resolve(&prefix), Ok(value) if value.kind() != ValueKind::Object)
            });
            assert!(blocked, "{path}: no proper prefix holds a primitive");
        }
        Err(AccessError::PropertyNotFound) => {
            for len in 1..=path.len() {
                if let Some(prefix) = path.prefix(len) {
                    assert_ne!(doc.resolve(&prefix), Err(AccessError::PathIndexFailed));
                }
            }
        }
        Err(other) => panic!("resolution produced {other:?}"),
    }
}

/// Compares and diffs random collections and checks the multiset laws.
///
/// ```
/// jt_fuzz::fuzz_multiset(b"multiset fuzz");
/// ```
pub fn fuzz_multiset(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let (Ok(a), Ok(b)) = (random_values(&mut unstructured), random_values(&mut unstructured)) else {
        return;
    };

    let equal = equals_unordered(&a, &b);
    assert_eq!(equal, equals_unordered(&b, &a), "unordered equality must be symmetric");
    assert!(equals_unordered(&a, &a), "unordered equality must be reflexive");
    if equals_ordered(&a, &b) {
        assert!(equal, "ordered equality implies unordered equality");
    }

    match diff(&a, &b) {
        Ok(()) => assert!(equal),
        Err(report) => {
            assert!(!equal);
            let shared_a = a.len() - report.only_in_a().len();
            let shared_b = b.len() - report.only_in_b().len();
            assert_eq!(shared_a, shared_b, "shared elements must balance");
            let _ = report.to_string();
        }
    }
}

fn random_document(unstructured: &mut Unstructured<'_>) -> Option<Document> {
    let value = object_from_unstructured(unstructured, 0).ok()?;
    Document::from_json_value(value, &DecodeOptions::default()).ok()
}

fn random_path(unstructured: &mut Unstructured<'_>) -> Result<Path, arbitrary::Error> {
    let len = unstructured.int_in_range::<u8>(1..=MAX_PATH_LEN)?;
    let mut path = Path::new(random_key(unstructured)?);
    for _ in 1..len {
        path = path.with_segment(random_key(unstructured)?);
    }
    Ok(path)
}

fn random_values(unstructured: &mut Unstructured<'_>) -> Result<Vec<Value>, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_ARRAY_LEN * 2)?);
    let mut items = Vec::with_capacity(len);
    for _ in 0..len {
        let json = json_leaf(unstructured)?;
        let value = Value::from_json_value(json, &DecodeOptions::exact_integers())
            .map_err(|_| arbitrary::Error::IncorrectFormat)?;
        items.push(value);
    }
    Ok(items)
}

fn object_from_unstructured(
    unstructured: &mut Unstructured<'_>,
    depth: usize,
) -> Result<JsonValue, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_OBJECT_LEN)?);
    let mut map = JsonMap::new();
    for _ in 0..len {
        let key = random_key(unstructured)?;
        let value = json_value_from_unstructured(unstructured, depth + 1)?;
        map.insert(key, value);
    }
    Ok(JsonValue::Object(map))
}

fn json_value_from_unstructured(
    unstructured: &mut Unstructured<'_>,
    depth: usize,
) -> Result<JsonValue, arbitrary::Error> {
    if depth >= MAX_DEPTH {
        return json_leaf(unstructured);
    }

    match unstructured.int_in_range::<u8>(0..=5)? {
        0..=2 => object_from_unstructured(unstructured, depth),
        3 => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_ARRAY_LEN)?);
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(json_value_from_unstructured(unstructured, depth + 1)?);
            }
            Ok(JsonValue::Array(items))
        }
        _ => json_leaf(unstructured),
    }
}

fn json_leaf(unstructured: &mut Unstructured<'_>) -> Result<JsonValue, arbitrary::Error> {
    match unstructured.int_in_range::<u8>(0..=3)? {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        _ => Ok(JsonValue::String(random_key(unstructured)?)),
    }
}

fn random_number(unstructured: &mut Unstructured<'_>) -> Result<JsonNumber, arbitrary::Error> {
    if unstructured.arbitrary()? {
        Ok(JsonNumber::from(unstructured.int_in_range::<i64>(-2..=2)?))
    } else {
        let numerator = f64::from(unstructured.int_in_range::<i8>(-4..=4)?);
        JsonNumber::from_f64(numerator / 2.0).ok_or(arbitrary::Error::IncorrectFormat)
    }
}

// Keys come from a tiny alphabet so random paths actually hit them.
fn random_key(unstructured: &mut Unstructured<'_>) -> Result<String, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=2)?);
    let mut key = String::with_capacity(len);
    for _ in 0..len {
        let index = usize::from(unstructured.int_in_range::<u8>(0..=1)?);
        key.push(char::from(KEY_ALPHABET[index]));
    }
    Ok(key)
}
