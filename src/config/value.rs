//! Recursive theme values.
//!
//! Theme overrides are arbitrarily nested trees of selector-keyed style
//! rules. They are modelled as a tagged value so that merging is plain
//! structural recursion over three cases.

use indexmap::IndexMap;
use serde::Serialize;

/// An insertion-ordered theme mapping. Keys are unique per level.
///
/// Equality ignores insertion order.
pub type ThemeMap = IndexMap<String, ThemeValue>;

/// A node in a theme tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ThemeValue {
    /// A leaf value (color, length, weight, ...)
    Scalar(Scalar),
    /// An ordered list; always replaced wholesale by merges
    Sequence(Vec<ThemeValue>),
    /// A nested mapping, merged key-by-key
    Mapping(ThemeMap),
}

/// A leaf theme value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A string such as `"#fff"` or `"0.25rem"`
    String(String),
    /// An integer or float
    Number(serde_yaml::Number),
    /// A boolean flag
    Bool(bool),
}

impl ThemeValue {
    /// Builds a mapping value from `(key, value)` pairs.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the nested mapping, if this value is one.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&ThemeMap> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the string contents of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Follows `path` through nested mappings.
    #[must_use]
    pub fn lookup(&self, path: &[&str]) -> Option<&Self> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self.as_mapping()?.get(*head)?.lookup(rest),
        }
    }
}

/// Follows `path` from the root of a theme map.
#[must_use]
pub fn lookup<'a>(map: &'a ThemeMap, path: &[&str]) -> Option<&'a ThemeValue> {
    let (head, rest) = path.split_first()?;
    map.get(*head)?.lookup(rest)
}

impl From<&str> for ThemeValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for ThemeValue {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<i64> for ThemeValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Number(value.into()))
    }
}

impl From<bool> for ThemeValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<ThemeMap> for ThemeValue {
    fn from(value: ThemeMap) -> Self {
        Self::Mapping(value)
    }
}

impl From<Vec<Self>> for ThemeValue {
    fn from(value: Vec<Self>) -> Self {
        Self::Sequence(value)
    }
}
