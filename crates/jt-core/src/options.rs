use std::fmt;

use serde::{Deserialize, Serialize};

/// Controls how numeric literals are materialized while decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberMode {
    /// Every number decodes as [`Value::Float64`](crate::Value::Float64), the
    /// way generic structured-data decoders treat them (default).
    #[default]
    Float,
    /// Integral literals that fit in an `i64` decode as
    /// [`Value::Int64`](crate::Value::Int64); everything else as `Float64`.
    Exact,
}

/// Configuration knobs passed to the document decoders.
///
/// ```
/// # use jt_core::{DecodeOptions, Document, NumberMode};
/// let opts = DecodeOptions::default().with_number_mode(NumberMode::Exact);
/// let doc = Document::from_json_str_with(r#"{"n":7}"#, &opts)?;
/// assert_eq!(doc.get_int64("n"), Ok(7));
/// # Ok::<(), jt_core::DecodeError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    number_mode: NumberMode,
}

impl DecodeOptions {
    /// Returns the configured number mode.
    ///
    /// ```
    /// # use jt_core::{DecodeOptions, NumberMode};
    /// assert_eq!(DecodeOptions::default().number_mode(), NumberMode::Float);
    /// ```
    #[must_use]
    pub fn number_mode(&self) -> NumberMode {
        self.number_mode
    }

    /// Sets the number mode.
    #[must_use]
    pub fn with_number_mode(mut self, mode: NumberMode) -> Self {
        self.number_mode = mode;
        self
    }

    /// Shorthand for [`NumberMode::Exact`].
    #[must_use]
    pub fn exact_integers() -> Self {
        Self::default().with_number_mode(NumberMode::Exact)
    }
}

impl fmt::Display for NumberMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberMode::Float => f.write_str("float"),
            NumberMode::Exact => f.write_str("exact"),
        }
    }
}
