//! Request path and query-string construction.
//!
//! # Design
//! Query parameters are collected as ordered key/value pairs. `None` values
//! are omitted entirely rather than serialized empty, and booleans render in
//! the lowercase form the API expects. Encoding happens once, in
//! [`Query::append_to`], so tests can assert on the pair list directly.

use std::borrow::Cow;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except unreserved characters gets percent-encoded.
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a caller-supplied path segment or query component.
pub(crate) fn encode_segment(component: &str) -> Cow<'_, str> {
    utf8_percent_encode(component, ENCODE_SET).into()
}

/// Renders a value into its canonical query-string form.
pub trait QueryValue {
    fn render(&self) -> String;
}

impl QueryValue for bool {
    fn render(&self) -> String {
        if *self { "true" } else { "false" }.to_string()
    }
}

impl QueryValue for &str {
    fn render(&self) -> String {
        (*self).to_string()
    }
}

impl QueryValue for String {
    fn render(&self) -> String {
        self.clone()
    }
}

macro_rules! query_value_via_display {
    ($($ty:ty),*) => {
        $(impl QueryValue for $ty {
            fn render(&self) -> String {
                self.to_string()
            }
        })*
    };
}

query_value_via_display!(u32, u64, i32, i64, usize);

/// Ordered query-parameter builder.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always include `key=value`.
    pub fn set(mut self, key: &str, value: impl QueryValue) -> Self {
        self.pairs.push((key.to_string(), value.render()));
        self
    }

    /// Include `key=value` when present; `None` leaves no trace in the path.
    pub fn opt(self, key: &str, value: Option<impl QueryValue>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Append the encoded pairs to `path`, or return it untouched when no
    /// pair survived.
    pub fn append_to(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }
        let encoded: Vec<String> = self
            .pairs
            .iter()
            .map(|(key, value)| format!("{}={}", encode_segment(key), encode_segment(value)))
            .collect();
        format!("{path}?{}", encoded.join("&"))
    }
}
