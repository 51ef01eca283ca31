use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A dotted property path such as `value.othervalue.final`.
///
/// A path always holds at least one segment. Segments are matched literally
/// against mapping keys: there is no escaping and no wildcard or index
/// syntax. Splitting keeps empty segments, so `""` is a single empty key and
/// `a..b` looks up `a`, then `""`, then `b`.
///
/// ```
/// # use jt_core::Path;
/// let path = Path::parse("value.othervalue.final");
/// assert_eq!(path.segments(), ["value", "othervalue", "final"]);
/// assert_eq!(path.to_string(), "value.othervalue.final");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path(Vec<String>);

#[allow(clippy::len_without_is_empty)]
impl Path {
    /// Creates a single-segment path. The key is not split on `.`.
    ///
    /// ```
    /// # use jt_core::Path;
    /// let path = Path::new("a.b");
    /// assert_eq!(path.len(), 1);
    /// ```
    #[must_use]
    pub fn new<S>(first: S) -> Self
    where
        S: Into<String>,
    {
        Self(vec![first.into()])
    }

    /// Splits a path expression on `.`.
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        Self(expression.split('.').map(str::to_owned).collect())
    }

    /// Appends a new segment, returning the extended path.
    ///
    /// ```
    /// # use jt_core::Path;
    /// let path = Path::new("foo").with_segment("bar");
    /// assert_eq!(path, Path::parse("foo.bar"));
    /// ```
    #[must_use]
    pub fn with_segment<S>(mut self, segment: S) -> Self
    where
        S: Into<String>,
    {
        self.0.push(segment.into());
        self
    }

    /// Returns the segments in lookup order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of segments, never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the path made of the first `len` segments, if that is a
    /// non-empty proper or full prefix.
    ///
    /// ```
    /// # use jt_core::Path;
    /// let path = Path::parse("a.b.c");
    /// assert_eq!(path.prefix(2), Some(Path::parse("a.b")));
    /// assert_eq!(path.prefix(0), None);
    /// ```
    #[must_use]
    pub fn prefix(&self, len: usize) -> Option<Self> {
        if len == 0 || len > self.0.len() {
            return None;
        }
        Some(Self(self.0[..len].to_vec()))
    }

    pub(crate) fn split_last(&self) -> Option<(&String, &[String])> {
        self.0.split_last()
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Path {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let expression = String::deserialize(deserializer)?;
        Ok(Self::parse(&expression))
    }
}
