use std::collections::BTreeMap;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::{
    error::KeyFailure, AccessError, DecodeError, DecodeOptions, Extract, MissingKeys, Path, Value,
};

/// A decoded object: string keys mapped to [`Value`]s, in sorted key order.
///
/// Nothing in this type mutates a document once it is built; every query
/// borrows it immutably.
///
/// ```
/// use jt_core::{AccessError, Document};
///
/// let doc = Document::from_json_str(r#"{"value":{"othervalue":{"final":"foo"}}}"#)?;
/// assert_eq!(doc.get_str("value.othervalue.final"), Ok("foo"));
/// assert_eq!(doc.get_str("value.missing"), Err(AccessError::PropertyNotFound));
/// assert!(doc.has("value.othervalue"));
/// # Ok::<(), jt_core::DecodeError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Wraps an existing map of values.
    ///
    /// ```
    /// # use jt_core::{Document, Value};
    /// let doc = Document::from_map([("answer", Value::from(42))]);
    /// assert_eq!(doc.get_int64("answer"), Ok(42));
    /// ```
    pub fn from_map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self(entries.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }

    /// Parses a JSON object using the default [`DecodeOptions`].
    pub fn from_json_str(input: &str) -> Result<Self, DecodeError> {
        Self::from_json_str_with(input, &DecodeOptions::default())
    }

    /// Parses a JSON object with explicit decode options.
    pub fn from_json_str_with(input: &str, options: &DecodeOptions) -> Result<Self, DecodeError> {
        Self::from_root(Value::from_json_str(input, options)?)
    }

    /// Parses a YAML mapping using the default [`DecodeOptions`].
    ///
    /// ```
    /// # use jt_core::Document;
    /// let doc = Document::from_yaml_str("---\nanswer: 42\n")?;
    /// assert_eq!(doc.get_float64("answer"), Ok(42.0));
    /// # Ok::<(), jt_core::DecodeError>(())
    /// ```
    pub fn from_yaml_str(input: &str) -> Result<Self, DecodeError> {
        Self::from_yaml_str_with(input, &DecodeOptions::default())
    }

    /// Parses a YAML mapping with explicit decode options.
    pub fn from_yaml_str_with(input: &str, options: &DecodeOptions) -> Result<Self, DecodeError> {
        Self::from_root(Value::from_yaml_str(input, options)?)
    }

    /// Converts an already decoded serde JSON value.
    pub fn from_json_value(value: JsonValue, options: &DecodeOptions) -> Result<Self, DecodeError> {
        Self::from_root(Value::from_json_value(value, options)?)
    }

    fn from_root(root: Value) -> Result<Self, DecodeError> {
        match root {
            Value::Object(doc) => Ok(doc),
            other => Err(DecodeError::NotAnObject { found: other.kind() }),
        }
    }

    /// Converts the document into a serde JSON object.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        JsonValue::Object(
            self.0.iter().map(|(key, value)| (key.clone(), value.to_json_value())).collect(),
        )
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether the document has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level keys in sorted order.
    ///
    /// ```
    /// # use jt_core::{Document, Value};
    /// let doc = Document::from_map([("key2", Value::Null), ("key1", Value::from(true))]);
    /// assert_eq!(doc.keys().collect::<Vec<_>>(), ["key1", "key2"]);
    /// ```
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over top-level entries in key order.
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Borrows the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.0
    }

    /// Walks `path` from the root of the document.
    ///
    /// Every segment but the last must land on a nested object. Landing on
    /// anything else fails with [`AccessError::PathIndexFailed`]; a missing
    /// key fails with [`AccessError::PropertyNotFound`].
    ///
    /// ```
    /// # use jt_core::{AccessError, Document, Path};
    /// let doc = Document::from_json_str(r#"{"value":true}"#)?;
    /// let err = doc.resolve(&Path::parse("value.othervalue")).unwrap_err();
    /// assert_eq!(err, AccessError::PathIndexFailed);
    /// # Ok::<(), jt_core::DecodeError>(())
    /// ```
    pub fn resolve(&self, path: &Path) -> Result<&Value, AccessError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(AccessError::PropertyNotFound);
        };

        let mut current = self;
        for (depth, segment) in parents.iter().enumerate() {
            let Some(value) = current.0.get(segment) else {
                trace!(%path, depth, segment = %segment, "key not found");
                return Err(AccessError::PropertyNotFound);
            };
            current = match value {
                Value::Object(doc) => doc,
                other => {
                    trace!(%path, depth, kind = %other.kind(), "cannot index into value");
                    return Err(AccessError::PathIndexFailed);
                }
            };
        }

        current.0.get(last).ok_or_else(|| {
            trace!(%path, depth = parents.len(), segment = %last, "key not found");
            AccessError::PropertyNotFound
        })
    }

    /// Resolves a dotted path expression to an untyped value.
    pub fn get(&self, expression: &str) -> Result<&Value, AccessError> {
        self.resolve(&Path::parse(expression))
    }

    /// Reports whether `expression` resolves. Use [`Document::check`] to see
    /// why it does not.
    #[must_use]
    pub fn has(&self, expression: &str) -> bool {
        self.get(expression).is_ok()
    }

    /// Like [`Document::has`], but keeps the failure.
    pub fn check(&self, expression: &str) -> Result<(), AccessError> {
        self.get(expression).map(|_| ())
    }

    /// Checks every path, reporting all failures together.
    ///
    /// Paths are checked in order and none short-circuits the others.
    pub fn has_all_keys<I, S>(&self, expressions: I) -> Result<(), MissingKeys>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut failures = Vec::new();
        for expression in expressions {
            let expression = expression.as_ref();
            if let Err(error) = self.check(expression) {
                failures.push(KeyFailure { path: expression.to_owned(), error });
            }
        }

        if failures.is_empty() {
            return Ok(());
        }
        debug!(failed = failures.len(), "document is missing keys");
        Err(MissingKeys::new(failures))
    }

    /// Resolves `path` and narrows the value to `T`.
    pub fn resolve_as<'a, T>(&'a self, path: &Path) -> Result<T, AccessError>
    where
        T: Extract<'a>,
    {
        let value = self.resolve(path)?;
        T::extract(value).ok_or_else(|| {
            let err = AccessError::TypeMismatch { wanted: T::KIND, actual: value.kind() };
            debug!(%path, %err, "type mismatch");
            err
        })
    }

    /// Resolves a dotted path expression and narrows the value to `T`.
    ///
    /// ```
    /// # use jt_core::{Document, Value};
    /// let doc = Document::from_json_str(r#"{"tags":["a","b"]}"#)?;
    /// let tags: &[Value] = doc.get_as("tags")?;
    /// assert_eq!(tags.len(), 2);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn get_as<'a, T>(&'a self, expression: &str) -> Result<T, AccessError>
    where
        T: Extract<'a>,
    {
        self.resolve_as(&Path::parse(expression))
    }

    /// Like [`Document::get_as`], but hands back `T`'s placeholder next to
    /// the failure instead of a `Result`.
    ///
    /// ```
    /// # use jt_core::{AccessError, Document};
    /// let doc = Document::from_json_str(r#"{"n":1.5}"#)?;
    /// let (n, err) = doc.get_or_placeholder::<i64>("n");
    /// assert_eq!(n, -1);
    /// assert!(matches!(err, Some(AccessError::TypeMismatch { .. })));
    /// # Ok::<(), jt_core::DecodeError>(())
    /// ```
    pub fn get_or_placeholder<'a, T>(&'a self, expression: &str) -> (T, Option<AccessError>)
    where
        T: Extract<'a>,
    {
        match self.get_as(expression) {
            Ok(value) => (value, None),
            Err(err) => (T::placeholder(), Some(err)),
        }
    }

    /// Extracts a string.
    pub fn get_str(&self, expression: &str) -> Result<&str, AccessError> {
        self.get_as(expression)
    }

    /// Extracts a boolean.
    pub fn get_bool(&self, expression: &str) -> Result<bool, AccessError> {
        self.get_as(expression)
    }

    /// Extracts a 64-bit integer. Floats are not narrowed.
    ///
    /// ```
    /// # use jt_core::{AccessError, Document, ValueKind};
    /// let doc = Document::from_json_str(r#"{"foo":{"bar":{"baz":1000}}}"#)?;
    /// assert_eq!(
    ///     doc.get_int64("foo.bar.baz"),
    ///     Err(AccessError::TypeMismatch { wanted: ValueKind::Int64, actual: ValueKind::Float64 })
    /// );
    /// # Ok::<(), jt_core::DecodeError>(())
    /// ```
    pub fn get_int64(&self, expression: &str) -> Result<i64, AccessError> {
        self.get_as(expression)
    }

    /// Extracts a double. Integers are not widened.
    pub fn get_float64(&self, expression: &str) -> Result<f64, AccessError> {
        self.get_as(expression)
    }

    /// Extracts a sequence of values.
    pub fn get_array(&self, expression: &str) -> Result<&[Value], AccessError> {
        self.get_as(expression)
    }

    /// Extracts a nested document.
    pub fn get_object(&self, expression: &str) -> Result<&Document, AccessError> {
        self.get_as(expression)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_json_value(value, &DecodeOptions::default()).map_err(D::Error::custom)
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self(value)
    }
}

impl<K> FromIterator<(K, Value)> for Document
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::from_map(iter)
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;
    use proptest::{collection::btree_map, prelude::*};

    fn nested() -> Document {
        Document::from_json_str(r#"{"value":{"othervalue":{"final":"foo"}}}"#).unwrap()
    }

    fn mixed() -> Document {
        Document::from_json_str_with(
            r#"{
                "value": {
                    "str": "foo",
                    "bool": true,
                    "arr": [1, 2, 3],
                    "int": 7,
                    "float": 2.5,
                    "obj": {"k": "v"},
                    "nothing": null
                }
            }"#,
            &DecodeOptions::exact_integers(),
        )
        .unwrap()
    }

    #[test]
    fn resolves_simple_and_nested_paths() {
        let doc = nested();
        assert!(doc.has("value"));
        assert!(doc.has("value.othervalue.final"));
        assert_eq!(doc.get("value.othervalue.final"), Ok(&Value::from("foo")));
    }

    #[test]
    fn missing_key_is_property_not_found() {
        let doc = nested();
        assert_eq!(doc.check("value.missing.val"), Err(AccessError::PropertyNotFound));
        assert_eq!(doc.check("nope"), Err(AccessError::PropertyNotFound));
        assert!(!doc.has("value.missing.val"));
    }

    #[test]
    fn indexing_a_primitive_is_path_index_failed() {
        let doc = Document::from_json_str(r#"{"value":true}"#).unwrap();
        assert_eq!(doc.check("value.othervalue"), Err(AccessError::PathIndexFailed));
        assert!(!doc.has("value.othervalue"));
    }

    #[test]
    fn arrays_cannot_be_indexed() {
        let doc = Document::from_json_str(r#"{"list":[{"a":1}]}"#).unwrap();
        assert_eq!(doc.check("list.0"), Err(AccessError::PathIndexFailed));
        assert_eq!(doc.check("list.0.a"), Err(AccessError::PathIndexFailed));
    }

    #[test]
    fn resolution_returns_composites_untyped() {
        let doc = nested();
        let value = doc.get("value.othervalue").unwrap();
        assert_eq!(value.kind(), ValueKind::Object);
    }

    #[test]
    fn empty_expression_looks_up_the_empty_key() {
        let doc = nested();
        assert_eq!(doc.check(""), Err(AccessError::PropertyNotFound));

        let with_empty = Document::from_json_str(r#"{"":{"":1},"a":{"":{"b":true}}}"#).unwrap();
        assert_eq!(with_empty.get_float64(""), Err(AccessError::TypeMismatch {
            wanted: ValueKind::Float64,
            actual: ValueKind::Object,
        }));
        assert_eq!(with_empty.get_float64("."), Ok(1.0));
        assert_eq!(with_empty.get_bool("a..b"), Ok(true));
        assert_eq!(with_empty.check("a."), Ok(()));
        assert_eq!(with_empty.check("a.b"), Err(AccessError::PropertyNotFound));
    }

    #[test]
    fn typed_getters_return_matching_kinds() {
        let doc = mixed();
        assert_eq!(doc.get_str("value.str"), Ok("foo"));
        assert_eq!(doc.get_bool("value.bool"), Ok(true));
        assert_eq!(doc.get_int64("value.int"), Ok(7));
        assert_eq!(doc.get_float64("value.float"), Ok(2.5));
        assert_eq!(
            doc.get_array("value.arr"),
            Ok(&[Value::Int64(1), Value::Int64(2), Value::Int64(3)][..])
        );
        let obj = doc.get_object("value.obj").unwrap();
        assert_eq!(obj.get_str("k"), Ok("v"));
    }

    #[test]
    fn typed_getters_report_both_kinds() {
        let doc = mixed();
        assert_eq!(
            doc.get_str("value.bool"),
            Err(AccessError::TypeMismatch { wanted: ValueKind::String, actual: ValueKind::Bool })
        );
        assert_eq!(
            doc.get_float64("value.int"),
            Err(AccessError::TypeMismatch { wanted: ValueKind::Float64, actual: ValueKind::Int64 })
        );
        assert_eq!(
            doc.get_object("value.arr"),
            Err(AccessError::TypeMismatch { wanted: ValueKind::Object, actual: ValueKind::Array })
        );
        assert_eq!(
            doc.get_bool("value.nothing"),
            Err(AccessError::TypeMismatch { wanted: ValueKind::Bool, actual: ValueKind::Null })
        );
    }

    #[test]
    fn float_leaf_is_not_an_integer() {
        let doc = Document::from_json_str(r#"{"foo":{"bar":{"baz":1000}}}"#).unwrap();
        let err = doc.get_int64("foo.bar.baz").unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch { wanted: ValueKind::Int64, actual: ValueKind::Float64 }
        );
        assert_eq!(err.to_string(), "attempted to type float64 as int64");
    }

    #[test]
    fn typed_getters_propagate_resolution_failures() {
        let doc = mixed();
        assert_eq!(doc.get_int64("value.missing"), Err(AccessError::PropertyNotFound));
        assert_eq!(doc.get_str("value.str.deeper"), Err(AccessError::PathIndexFailed));
    }

    #[test]
    fn placeholders_accompany_failures() {
        let doc = mixed();
        assert_eq!(doc.get_or_placeholder::<&str>("value.missing"), (
            "",
            Some(AccessError::PropertyNotFound)
        ));
        assert_eq!(doc.get_or_placeholder::<i64>("value.float").0, -1);
        assert_eq!(doc.get_or_placeholder::<f64>("value.int").0, -1.0);
        let (arr, err) = doc.get_or_placeholder::<&[Value]>("value.str");
        assert!(arr.is_empty());
        assert!(err.is_some());
        let (obj, _) = doc.get_or_placeholder::<&Document>("value.str.x");
        assert!(obj.is_empty());
        assert_eq!(doc.get_or_placeholder::<bool>("value.bool"), (true, None));
    }

    #[test]
    fn has_all_keys_collects_every_failure() {
        let doc = mixed();
        assert_eq!(doc.has_all_keys(["value.str", "value.obj.k"]), Ok(()));

        let err = doc
            .has_all_keys(["value.str", "value.gone", "value.bool.x", "other"])
            .unwrap_err();
        assert_eq!(err.len(), 3);
        assert_eq!(
            err.failures(),
            [
                KeyFailure { path: "value.gone".into(), error: AccessError::PropertyNotFound },
                KeyFailure { path: "value.bool.x".into(), error: AccessError::PathIndexFailed },
                KeyFailure { path: "other".into(), error: AccessError::PropertyNotFound },
            ]
        );
        assert_eq!(
            err.to_string(),
            "value.gone: json path does not exist\n\
             value.bool.x: cannot index into non-map type\n\
             other: json path does not exist"
        );
    }

    #[test]
    fn has_all_keys_accepts_no_paths() {
        let doc = Document::new();
        assert_eq!(doc.has_all_keys(Vec::<String>::new()), Ok(()));
    }

    #[test]
    fn root_must_be_an_object() {
        let err = Document::from_json_str("[1,2]").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: ValueKind::Array }), "{err:?}");
        assert!(matches!(Document::from_json_str("{"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn yaml_documents_resolve_like_json() {
        let doc = Document::from_yaml_str("value:\n  othervalue:\n    final: foo\n").unwrap();
        assert_eq!(doc, nested());
    }

    #[test]
    fn keys_are_sorted() {
        let doc = Document::from_map([
            ("key3", Value::from(1)),
            ("key1", Value::from(true)),
            ("key4", Value::Null),
            ("key2", Value::from("foo")),
        ]);
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["key1", "key2", "key3", "key4"]);
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let doc = nested();
        let json = doc.to_json_value();
        let again = Document::from_json_value(json, &DecodeOptions::default()).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn serde_deserialize_keeps_numbers_as_floats() {
        let input = r#"{"n":1000,"nested":{"m":2}}"#;
        let via_serde: Document = serde_json::from_str(input).unwrap();
        assert_eq!(via_serde, Document::from_json_str(input).unwrap());
        assert_eq!(
            via_serde.get_int64("n"),
            Err(AccessError::TypeMismatch { wanted: ValueKind::Int64, actual: ValueKind::Float64 })
        );
        assert_eq!(via_serde.get_float64("nested.m"), Ok(2.0));
    }

    #[test]
    fn serde_deserialize_rejects_non_objects() {
        let err = serde_json::from_str::<Document>("[1]").unwrap_err();
        assert!(err.to_string().contains("expected an object at the document root"), "{err}");
    }

    fn arb_document() -> impl Strategy<Value = Document> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int64),
            "[a-z]{0,4}".prop_map(Value::String),
        ];
        let value = leaf.prop_recursive(3, 24, 3, |inner| {
            btree_map("[ab]{1,2}", inner, 0..3).prop_map(|map| Value::Object(Document::from(map)))
        });
        btree_map("[ab]{1,2}", value, 0..3).prop_map(Document::from)
    }

    proptest! {
        #[test]
        fn failures_say_where_the_walk_stopped(doc in arb_document(), expression in "[ab]{1,2}(\\.[ab]{1,2}){0,3}") {
            let path = Path::parse(&expression);
            match doc.resolve(&path) {
                Ok(_) => {}
                Err(AccessError::PathIndexFailed) => {
                    let hit = (1..path.len()).any(|len| {
                        let prefix = path.prefix(len).unwrap();
                        matches!(doc.resolve(&prefix), Ok(value) if value.kind() != ValueKind::Object)
                    });
                    prop_assert!(hit, "no proper prefix of {} is a primitive", path);
                }
                Err(AccessError::PropertyNotFound) => {
                    for len in 1..=path.len() {
                        let prefix = path.prefix(len).unwrap();
                        prop_assert_ne!(doc.resolve(&prefix), Err(AccessError::PathIndexFailed));
                    }
                }
                Err(other) => prop_assert!(false, "unexpected {other:?}"),
            }
        }

        #[test]
        fn resolution_is_idempotent(doc in arb_document(), expression in "[ab.]{0,6}") {
            prop_assert_eq!(doc.get(&expression), doc.get(&expression));
        }
    }
}
