use crate::{Document, Value, ValueKind};

static EMPTY_DOCUMENT: Document = Document::new();

/// Types a resolved [`Value`] can be narrowed to.
///
/// Narrowing is exact: a [`Value::Float64`] never extracts as `i64` and a
/// [`Value::Int64`] never extracts as `f64`. Each type also names the
/// placeholder handed out by
/// [`Document::get_or_placeholder`](crate::Document::get_or_placeholder) when
/// extraction fails.
///
/// ```
/// # use jt_core::{Extract, Value, ValueKind};
/// let value = Value::from(1000.0);
/// assert_eq!(<f64 as Extract>::extract(&value), Some(1000.0));
/// assert_eq!(<i64 as Extract>::extract(&value), None);
/// assert_eq!(<i64 as Extract>::KIND, ValueKind::Int64);
/// ```
pub trait Extract<'a>: Sized {
    /// The kind a value must have to be extracted as `Self`.
    const KIND: ValueKind;

    /// Borrows or copies the payload out of `value` when its kind matches.
    fn extract(value: &'a Value) -> Option<Self>;

    /// The value reported alongside a failed extraction.
    fn placeholder() -> Self;
}

impl<'a> Extract<'a> for &'a str {
    const KIND: ValueKind = ValueKind::String;

    fn extract(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        ""
    }
}

impl<'a> Extract<'a> for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn extract(value: &'a Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        false
    }
}

impl<'a> Extract<'a> for i64 {
    const KIND: ValueKind = ValueKind::Int64;

    fn extract(value: &'a Value) -> Option<Self> {
        match value {
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        -1
    }
}

impl<'a> Extract<'a> for f64 {
    const KIND: ValueKind = ValueKind::Float64;

    fn extract(value: &'a Value) -> Option<Self> {
        match value {
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        -1.0
    }
}

impl<'a> Extract<'a> for &'a [Value] {
    const KIND: ValueKind = ValueKind::Array;

    fn extract(value: &'a Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        &[]
    }
}

impl<'a> Extract<'a> for &'a Document {
    const KIND: ValueKind = ValueKind::Object;

    fn extract(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(doc) => Some(doc),
            _ => None,
        }
    }

    fn placeholder() -> Self {
        &EMPTY_DOCUMENT
    }
}
