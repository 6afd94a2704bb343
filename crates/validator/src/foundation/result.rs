//! Accumulated outcome of a validation pass.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::foundation::error::RuleError;

/// Ordered collection of [`RuleError`]s.
///
/// Append-only while a pass runs; merging two results concatenates their
/// errors and keeps the original order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    errors: Vec<RuleError>,
}

impl ValidationResult {
    /// Creates an empty (valid) result.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Appends an error.
    pub fn add_error(&mut self, error: RuleError) {
        self.errors.push(error);
    }

    /// Appends all errors of `other`, preserving their order.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// Returns `true` when no error was recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` when no error was reported under `attribute`.
    #[must_use]
    pub fn is_attribute_valid(&self, attribute: &str) -> bool {
        !self
            .errors
            .iter()
            .any(|error| error.attribute() == Some(attribute))
    }

    /// Errors reported under `attribute`, in order.
    pub fn attribute_errors<'r>(&'r self, attribute: &'r str) -> impl Iterator<Item = &'r RuleError> {
        self.errors
            .iter()
            .filter(move |error| error.attribute() == Some(attribute))
    }

    /// All errors, in order.
    #[must_use]
    pub fn errors(&self) -> &[RuleError] {
        &self.errors
    }

    /// Consumes the result, returning its errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<RuleError> {
        self.errors
    }

    /// Number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` when there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message templates of all errors.
    #[must_use]
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(RuleError::message).collect()
    }

    /// Errors grouped by their dotted value path, in first-seen order.
    ///
    /// Errors without a path are grouped under their attribute, or under
    /// the empty string when they have none.
    #[must_use]
    pub fn errors_by_path(&self) -> IndexMap<String, Vec<&RuleError>> {
        let mut grouped: IndexMap<String, Vec<&RuleError>> = IndexMap::new();
        for error in &self.errors {
            let key = if error.value_path().is_empty() {
                error.attribute().unwrap_or_default().to_owned()
            } else {
                error.value_path().join(".")
            };
            grouped.entry(key).or_default().push(error);
        }
        grouped
    }

    /// Converts to a `Result`, failing with `self` when invalid.
    #[must_use = "result must be used"]
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl FromIterator<RuleError> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = RuleError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl Extend<RuleError> for ValidationResult {
    fn extend<I: IntoIterator<Item = RuleError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for ValidationResult {
    type Item = RuleError;
    type IntoIter = std::vec::IntoIter<RuleError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationResult {}
