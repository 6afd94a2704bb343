//! Regular expression matching.

use std::borrow::Cow;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleOptions, RuleSettings, ValidationContext,
    ValidationResult,
};
use crate::macros::impl_rule_ext;

/// Checks that a string matches (or, inverted, does not match) a pattern.
///
/// The pattern is compiled once, when the rule is built.
///
/// # Examples
///
/// ```
/// use vigil_validator::rules::Regex;
///
/// assert!(Regex::new(r"^\+\d{11}$").is_ok());
/// assert!(Regex::new(r"(unclosed").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: regex::Regex,
    not: bool,
    message: Cow<'static, str>,
    incorrect_input_message: Cow<'static, str>,
    settings: RuleSettings,
}

impl Regex {
    /// Compiles `pattern`.
    ///
    /// Returns [`ConfigError::InvalidPattern`] when it does not compile.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern,
            not: false,
            message: Cow::Borrowed("Value is invalid."),
            incorrect_input_message: Cow::Borrowed("Value should be string."),
            settings: RuleSettings::default(),
        })
    }

    /// Inverts the check: the value must not match.
    #[must_use = "builder methods must be chained or built"]
    pub fn not(mut self) -> Self {
        self.not = true;
        self
    }

    /// Message for strings failing the check.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Message for non-string values.
    #[must_use = "builder methods must be chained or built"]
    pub fn incorrect_input_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.incorrect_input_message = message.into();
        self
    }

    /// The source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Rule for Regex {
    fn name(&self) -> &str {
        "regex"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let mut options = RuleOptions::new();
        options.insert("pattern".into(), Value::String(self.pattern().to_owned()));
        options.insert("not".into(), Value::Bool(self.not));
        options.insert("message".into(), dumper.message(&self.message, &[]));
        options.insert(
            "incorrectInputMessage".into(),
            dumper.message(&self.incorrect_input_message, &[]),
        );
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

impl_rule_ext!(Regex);

/// Handler for [`Regex`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexHandler;

impl RuleHandler for RegexHandler {
    type Rule = Regex;

    fn handle(
        &self,
        value: &Value,
        rule: &Regex,
        _evaluator: &Evaluator<'_>,
        _context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();

        let Some(text) = value.as_str() else {
            result.add_error(RuleError::new(rule.incorrect_input_message.clone()));
            return Ok(result);
        };

        if rule.pattern.is_match(text) == rule.not {
            result.add_error(RuleError::new(rule.message.clone()));
        }
        Ok(result)
    }
}
