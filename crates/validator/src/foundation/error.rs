//! Error types.
//!
//! Two disjoint categories live here:
//!
//! - [`RuleError`]: a validation failure. Collected into a
//!   [`ValidationResult`](crate::foundation::ValidationResult), never thrown.
//! - [`ConfigError`]: a programming error in the rule configuration. Returned
//!   as `Err` and aborts the whole `validate` call.
//!
//! Message templates and parameter keys use `Cow<'static, str>` so the
//! default messages of built-in rules never allocate.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

use crate::foundation::message::MessageFormatter;

/// Interpolation parameters of an error, in insertion order.
///
/// Typically 0-2 entries.
pub type ErrorParams = SmallVec<[(Cow<'static, str>, Value); 2]>;

// ============================================================================
// RULE ERROR
// ============================================================================

/// A single validation failure.
///
/// The value path locates the failure relative to the value the rule set was
/// applied to; [`Nested`](crate::rules::Nested) and
/// [`Each`](crate::rules::Each) prefix it as they unwind. The parameters are
/// purely presentational.
///
/// # Examples
///
/// ```
/// use vigil_validator::foundation::RuleError;
///
/// let error = RuleError::new("Value must be no less than {min}.")
///     .with_param("min", 20)
///     .with_value_path(["age"]);
///
/// assert_eq!(error.value_path(), ["age"]);
/// assert_eq!(error.param("min"), Some(&serde_json::json!(20)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleError {
    /// Message template, e.g. `Value must be no less than {min}.`
    pub message: Cow<'static, str>,

    /// Parameters for the message template.
    pub params: ErrorParams,

    /// Traversal segments from the validated value to the failure.
    pub value_path: Vec<String>,

    /// Top-level attribute the error was reported under.
    ///
    /// Set by the [`Validator`](crate::engine::Validator), never by rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl RuleError {
    /// Creates an error with a message template and no path.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            params: SmallVec::new(),
            value_path: Vec::new(),
            attribute: None,
        }
    }

    /// Adds an interpolation parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Replaces the value path.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_value_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the attribute the error belongs to.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Re-homes the error under `prefix`: the new path is
    /// `prefix ++ value_path`.
    #[must_use]
    pub fn prefixed(mut self, prefix: &[String]) -> Self {
        if !prefix.is_empty() {
            let mut path = Vec::with_capacity(prefix.len() + self.value_path.len());
            path.extend_from_slice(prefix);
            path.append(&mut self.value_path);
            self.value_path = path;
        }
        self
    }

    /// Message template.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Value path segments.
    #[must_use]
    pub fn value_path(&self) -> &[String] {
        &self.value_path
    }

    /// Attribute the error was reported under, if any.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Renders the message with its parameters.
    #[must_use]
    pub fn format(&self, formatter: &dyn MessageFormatter) -> String {
        formatter.format(&self.message, &self.params)
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value_path.is_empty() {
            write!(f, "{}", self.message)?;
        } else {
            write!(f, "[{}] {}", self.value_path.join("."), self.message)?;
        }

        if !self.params.is_empty() {
            write!(f, " (params: [")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, "])")?;
        }

        Ok(())
    }
}

impl std::error::Error for RuleError {}

// ============================================================================
// CONFIGURATION ERROR
// ============================================================================

/// A fatal error in the rule configuration.
///
/// These never end up in a [`ValidationResult`](crate::foundation::ValidationResult):
/// the rule set itself cannot be trusted, so validation stops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A container rule was built without any rules.
    #[error("rule `{rule}` requires a non-empty rule set")]
    EmptyRules {
        /// Name of the container rule.
        rule: &'static str,
    },

    /// No handler is registered for the rule's type.
    #[error("no handler registered for rule `{rule}`")]
    UnregisteredRule {
        /// Name of the rule.
        rule: String,
    },

    /// A handler received a rule of a type it does not handle.
    #[error("handler for `{expected}` received rule `{actual}`")]
    HandlerMismatch {
        /// Rule type the handler was registered for.
        expected: &'static str,
        /// Name of the rule that was dispatched.
        actual: String,
    },

    /// A regular expression failed to compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A rule without a parameter contract was dumped in strict mode.
    #[error("rule `{rule}` does not expose options and cannot be dumped")]
    NotParametrized {
        /// Name of the rule.
        rule: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefixed_prepends_segments() {
        let error = RuleError::new("bad").with_value_path(["age"]);
        let prefix = vec!["author".to_owned()];
        assert_eq!(error.prefixed(&prefix).value_path(), ["author", "age"]);
    }

    #[test]
    fn prefixed_with_empty_prefix_is_identity() {
        let error = RuleError::new("bad").with_value_path(["age"]);
        assert_eq!(error.clone().prefixed(&[]), error);
    }

    #[test]
    fn params_keep_insertion_order() {
        let error = RuleError::new("m").with_param("min", 1).with_param("max", 2);
        let keys: Vec<&str> = error.params.iter().map(|(k, _)| k.as_ref()).collect();
        assert_eq!(keys, ["min", "max"]);
        assert_eq!(error.param("max"), Some(&json!(2)));
        assert_eq!(error.param("missing"), None);
    }

    #[test]
    fn static_message_is_borrowed() {
        let error = RuleError::new("Value cannot be blank.");
        assert!(matches!(error.message, Cow::Borrowed(_)));
    }

    #[test]
    fn display_includes_path_and_params() {
        let error = RuleError::new("Too small")
            .with_param("min", 3)
            .with_value_path(["a", "b"]);
        assert_eq!(error.to_string(), "[a.b] Too small (params: [min=3])");
    }

    #[test]
    fn config_error_messages() {
        let error = ConfigError::UnregisteredRule {
            rule: "custom".into(),
        };
        assert_eq!(error.to_string(), "no handler registered for rule `custom`");
    }
}
