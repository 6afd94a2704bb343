//! Attribute keys and property paths.
//!
//! A rule map is keyed either by a positional index or by a name. Names may
//! be dotted property paths (`"author.age"`), which [`Nested`] splits into
//! traversal segments.
//!
//! [`Nested`]: crate::rules::Nested

use std::borrow::Cow;
use std::fmt;

/// Key of a rule map entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    /// Positional key. At the top level it validates the whole payload.
    Index(usize),
    /// Attribute name or dotted property path.
    Name(Cow<'static, str>),
}

impl AttributeKey {
    /// Creates a named key.
    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Name(name.into())
    }

    /// Returns `true` for positional keys.
    #[must_use]
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    /// Splits the key into value-path segments.
    ///
    /// A positional key is a single segment; a name is split on `.`.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        match self {
            Self::Index(index) => vec![index.to_string()],
            Self::Name(name) => name.split('.').map(str::to_owned).collect(),
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<&'static str> for AttributeKey {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<String> for AttributeKey {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

impl From<usize> for AttributeKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_name_splits_into_segments() {
        let key = AttributeKey::from("author.age");
        assert_eq!(key.segments(), vec!["author", "age"]);
        assert!(!key.is_index());
    }

    #[test]
    fn index_is_single_segment() {
        let key = AttributeKey::from(0usize);
        assert_eq!(key.segments(), vec!["0"]);
        assert!(key.is_index());
        assert_eq!(key.to_string(), "0");
    }

    #[test]
    fn plain_name_is_single_segment() {
        assert_eq!(AttributeKey::name("email".to_string()).segments(), vec!["email"]);
    }
}
