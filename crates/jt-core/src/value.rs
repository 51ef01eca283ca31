use std::{
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
};

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::{DecodeError, DecodeOptions, Document, NumberMode};

/// Type tag of a [`Value`], compared by value.
///
/// The display names are the ones used in
/// [`AccessError::TypeMismatch`](crate::AccessError::TypeMismatch) messages.
///
/// ```
/// # use jt_core::{Value, ValueKind};
/// assert_eq!(Value::from(1.5).kind(), ValueKind::Float64);
/// assert_eq!(ValueKind::Float64.to_string(), "float64");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// `null`.
    Null,
    /// Boolean.
    Bool,
    /// 64-bit signed integer.
    Int64,
    /// Double-precision float.
    Float64,
    /// UTF-8 string.
    String,
    /// Sequence of values.
    Array,
    /// Nested document.
    Object,
}

impl ValueKind {
    /// Returns the stable lowercase name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of a decoded document.
///
/// Equality is structural. Floats compare numerically, so `0.0 == -0.0`, and
/// every `NaN` equals every other `NaN` so that `Value` can serve as a
/// multiset key. Integers and floats never compare equal to each other.
///
/// Deserializing through serde follows the default [`DecodeOptions`], so
/// numbers come back as `Float64` exactly as with [`Value::from_json_str`].
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON `null`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integral number, only produced by [`NumberMode::Exact`] decoding or by
    /// hand-built values.
    Int64(i64),
    /// Floating-point number.
    Float64(f64),
    /// String.
    String(String),
    /// Sequence of heterogeneous values.
    Array(Vec<Value>),
    /// Nested document.
    Object(Document),
}

impl Value {
    /// Returns the type tag of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int64(_) => ValueKind::Int64,
            Self::Float64(_) => ValueKind::Float64,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// Parses any JSON payload, not only objects.
    ///
    /// ```
    /// # use jt_core::{DecodeOptions, Value};
    /// let value = Value::from_json_str("[1, \"a\"]", &DecodeOptions::default())?;
    /// assert_eq!(value, Value::Array(vec![Value::from(1.0), Value::from("a")]));
    /// # Ok::<(), jt_core::DecodeError>(())
    /// ```
    pub fn from_json_str(input: &str, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let value: JsonValue = serde_json::from_str(input)?;
        Self::from_json_value(value, options)
    }

    /// Parses any YAML payload, not only mappings.
    pub fn from_yaml_str(input: &str, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let value: YamlValue = serde_yaml::from_str(input)?;
        Self::from_yaml_value(value, options)
    }

    /// Converts a serde JSON value.
    pub fn from_json_value(value: JsonValue, options: &DecodeOptions) -> Result<Self, DecodeError> {
        match value {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(v) => Ok(Self::Bool(v)),
            JsonValue::Number(num) => {
                if options.number_mode() == NumberMode::Exact {
                    if let Some(i) = num.as_i64() {
                        return Ok(Self::Int64(i));
                    }
                }
                match num.as_f64() {
                    Some(f) => Ok(Self::Float64(f)),
                    None => Err(DecodeError::NumberOutOfRange { value: num.to_string() }),
                }
            }
            JsonValue::String(s) => Ok(Self::String(s)),
            JsonValue::Array(values) => {
                let mut items = Vec::with_capacity(values.len());
                for value in values {
                    items.push(Self::from_json_value(value, options)?);
                }
                Ok(Self::Array(items))
            }
            JsonValue::Object(map) => {
                let mut object = BTreeMap::new();
                for (key, value) in map {
                    object.insert(key, Self::from_json_value(value, options)?);
                }
                Ok(Self::Object(Document::from(object)))
            }
        }
    }

    pub(crate) fn from_yaml_value(
        value: YamlValue,
        options: &DecodeOptions,
    ) -> Result<Self, DecodeError> {
        match value {
            YamlValue::Null => Ok(Self::Null),
            YamlValue::Bool(v) => Ok(Self::Bool(v)),
            YamlValue::Number(num) => {
                if options.number_mode() == NumberMode::Exact {
                    if let Some(i) = num.as_i64() {
                        return Ok(Self::Int64(i));
                    }
                }
                if let Some(f) = num.as_f64() {
                    return Ok(Self::Float64(f));
                }
                if let Some(i) = num.as_i64() {
                    return Ok(Self::Float64(i as f64));
                }
                if let Some(u) = num.as_u64() {
                    return Ok(Self::Float64(u as f64));
                }
                Err(DecodeError::NumberOutOfRange { value: num.to_string() })
            }
            YamlValue::String(s) => Ok(Self::String(s)),
            YamlValue::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for value in seq {
                    items.push(Self::from_yaml_value(value, options)?);
                }
                Ok(Self::Array(items))
            }
            YamlValue::Mapping(map) => {
                let mut object = BTreeMap::new();
                for (key, value) in map {
                    let key = match key {
                        YamlValue::String(s) => s,
                        other => {
                            return Err(DecodeError::NonStringYamlKey {
                                found: format!("{other:?}"),
                            });
                        }
                    };
                    object.insert(key, Self::from_yaml_value(value, options)?);
                }
                Ok(Self::Object(Document::from(object)))
            }
            YamlValue::Tagged(tagged) => {
                Err(DecodeError::UnsupportedYamlTag { tag: tagged.tag.to_string() })
            }
        }
    }

    /// Converts the value into a serde JSON value.
    ///
    /// Non-finite floats have no JSON form and become `null`.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Int64(i) => JsonValue::from(*i),
            Self::Float64(f) => JsonValue::from(*f),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Array(values) => JsonValue::Array(values.iter().map(Self::to_json_value).collect()),
            Self::Object(doc) => doc.to_json_value(),
        }
    }
}

fn float_eq(lhs: f64, rhs: f64) -> bool {
    lhs == rhs || (lhs.is_nan() && rhs.is_nan())
}

// Must agree with `float_eq`: both zeros share a key, as do all NaNs.
fn float_key(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Float64(a), Self::Float64(b)) => float_eq(*a, *b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::Int64(i) => i.hash(state),
            Self::Float64(f) => float_key(*f).hash(state),
            Self::String(s) => s.hash(state),
            Self::Array(values) => values.hash(state),
            Self::Object(doc) => doc.hash(state),
        }
    }
}

/// Strings print bare, everything else prints in a compact JSON-like form.
///
/// Numbers are written the same way at every depth, so a float holding an
/// integral value prints without a fraction both on its own and nested.
///
/// ```
/// # use jt_core::Value;
/// assert_eq!(Value::from("a").to_string(), "a");
/// assert_eq!(Value::from(1000.0).to_string(), "1000");
/// assert_eq!(Value::Array(vec![Value::from(1.0), Value::Null]).to_string(), "[1,null]");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            other => write_nested(f, other),
        }
    }
}

fn write_nested(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(v) => write!(f, "{v}"),
        Value::Int64(i) => write!(f, "{i}"),
        Value::Float64(n) => write!(f, "{n}"),
        Value::String(s) => write_quoted(f, s),
        Value::Array(items) => {
            f.write_str("[")?;
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    f.write_str(",")?;
                }
                write_nested(f, item)?;
            }
            f.write_str("]")
        }
        Value::Object(doc) => {
            f.write_str("{")?;
            for (idx, (key, item)) in doc.iter().enumerate() {
                if idx > 0 {
                    f.write_str(",")?;
                }
                write_quoted(f, key)?;
                f.write_str(":")?;
                write_nested(f, item)?;
            }
            f.write_str("}")
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int64(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Self::Object(value)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_json_value(value, &DecodeOptions::default()).map_err(D::Error::custom)
    }
}

impl TryFrom<JsonValue> for Value {
    type Error = DecodeError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_json_value(value, &DecodeOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{collection::vec, prelude::*, string::string_regex};
    use std::hash::DefaultHasher;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int64),
            proptest::num::f64::ANY.prop_map(Value::Float64),
            string_regex("[a-z]{0,6}").unwrap().prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| vec(inner, 0..4).prop_map(Value::Array))
    }

    #[test]
    fn json_numbers_decode_as_floats_by_default() {
        let value = Value::from_json_str("1000", &DecodeOptions::default()).unwrap();
        assert_eq!(value, Value::Float64(1000.0));
        assert_eq!(value.kind(), ValueKind::Float64);
    }

    #[test]
    fn exact_mode_keeps_integers() {
        let opts = DecodeOptions::exact_integers();
        assert_eq!(Value::from_json_str("1000", &opts).unwrap(), Value::Int64(1000));
        assert_eq!(Value::from_json_str("1000.5", &opts).unwrap(), Value::Float64(1000.5));
        assert_eq!(Value::from_json_str("1e3", &opts).unwrap(), Value::Float64(1000.0));
    }

    #[test]
    fn exact_mode_falls_back_to_float_beyond_i64() {
        let opts = DecodeOptions::exact_integers();
        let value = Value::from_json_str("18446744073709551615", &opts).unwrap();
        assert_eq!(value.kind(), ValueKind::Float64);
    }

    #[test]
    fn yaml_scalars_follow_number_mode() {
        let value = Value::from_yaml_str("- 3\n- 2.5\n- x\n", &DecodeOptions::default()).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Float64(3.0), Value::Float64(2.5), Value::from("x")])
        );
        let exact = Value::from_yaml_str("3", &DecodeOptions::exact_integers()).unwrap();
        assert_eq!(exact, Value::Int64(3));
    }

    #[test]
    fn yaml_non_string_key_errors() {
        let err = Value::from_yaml_str("? [1, 2]: 3", &DecodeOptions::default()).unwrap_err();
        let DecodeError::NonStringYamlKey { .. } = err else {
            panic!("expected NonStringYamlKey error");
        };
    }

    #[test]
    fn yaml_tags_are_rejected() {
        let err = Value::from_yaml_str("!thing 3", &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedYamlTag { .. }), "{err:?}");
    }

    #[test]
    fn integers_and_floats_are_distinct() {
        assert_ne!(Value::Int64(1), Value::Float64(1.0));
    }

    #[test]
    fn signed_zeros_are_equal_and_hash_alike() {
        let pos = Value::Float64(0.0);
        let neg = Value::Float64(-0.0);
        assert_eq!(pos, neg);
        assert_eq!(hash_of(&pos), hash_of(&neg));
    }

    #[test]
    fn nan_is_reflexive() {
        let nan = Value::Float64(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(hash_of(&nan), hash_of(&Value::Float64(-f64::NAN)));
    }

    #[test]
    fn display_is_bare_for_strings_and_json_otherwise() {
        assert_eq!(Value::from("foo").to_string(), "foo");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Float64(2.5).to_string(), "2.5");
        let nested = Value::from_json_str("{\"a\":[1,\"b\"]}", &DecodeOptions::default()).unwrap();
        assert_eq!(nested.to_string(), "{\"a\":[1,\"b\"]}");
    }

    #[test]
    fn numbers_print_alike_at_any_depth() {
        let one = Value::Float64(1.0);
        let wrapped = Value::Array(vec![one.clone(), Value::Float64(2.5), Value::Int64(3)]);
        assert_eq!(one.to_string(), "1");
        assert_eq!(wrapped.to_string(), "[1,2.5,3]");

        let doc = Document::from_map([("k\"ey", Value::Array(vec![Value::from("q\"s")]))]);
        assert_eq!(Value::Object(doc).to_string(), r#"{"k\"ey":["q\"s"]}"#);
    }

    #[test]
    fn serde_deserialize_matches_the_decoder() {
        let input = r#"[1000, 2.5, {"n": 7}, null]"#;
        let via_serde: Value = serde_json::from_str(input).unwrap();
        let via_decoder = Value::from_json_str(input, &DecodeOptions::default()).unwrap();
        assert_eq!(via_serde, via_decoder);
        let Value::Array(items) = via_serde else {
            panic!("expected an array");
        };
        assert_eq!(items[0].kind(), ValueKind::Float64);
    }

    #[test]
    fn kind_names_are_stable() {
        let names: Vec<_> = [
            ValueKind::Null,
            ValueKind::Bool,
            ValueKind::Int64,
            ValueKind::Float64,
            ValueKind::String,
            ValueKind::Array,
            ValueKind::Object,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(names, ["null", "bool", "int64", "float64", "string", "array", "object"]);
    }

    proptest! {
        #[test]
        fn equal_values_hash_alike(value in arb_value()) {
            let copy = value.clone();
            prop_assert_eq!(&copy, &value);
            prop_assert_eq!(hash_of(&copy), hash_of(&value));
        }
    }
}
