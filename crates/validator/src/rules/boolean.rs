//! Boolean-like values.

use std::borrow::Cow;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleOptions, RuleSettings, ValidationContext,
    ValidationResult, value,
};
use crate::macros::impl_rule_ext;

/// Checks that the value equals the configured "true" or "false" value.
///
/// By default `"1"` and `"0"` are accepted with loose comparison, so `true`,
/// `false`, `1` and `0` pass as well.
#[derive(Debug, Clone)]
pub struct Boolean {
    true_value: Value,
    false_value: Value,
    strict: bool,
    message: Cow<'static, str>,
    settings: RuleSettings,
}

impl Boolean {
    /// Creates the rule with `"1"`/`"0"` and loose comparison.
    #[must_use]
    pub fn new() -> Self {
        Self {
            true_value: Value::from("1"),
            false_value: Value::from("0"),
            strict: false,
            message: Cow::Borrowed(r#"The value must be either "{true}" or "{false}"."#),
            settings: RuleSettings::default(),
        }
    }

    /// Value representing `true`.
    #[must_use = "builder methods must be chained or built"]
    pub fn true_value(mut self, value: impl Into<Value>) -> Self {
        self.true_value = value.into();
        self
    }

    /// Value representing `false`.
    #[must_use = "builder methods must be chained or built"]
    pub fn false_value(mut self, value: impl Into<Value>) -> Self {
        self.false_value = value.into();
        self
    }

    /// Requires type and value to match exactly.
    #[must_use = "builder methods must be chained or built"]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Overrides the message.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    fn params(&self) -> [(Cow<'static, str>, Value); 2] {
        [
            (Cow::Borrowed("true"), self.true_value.clone()),
            (Cow::Borrowed("false"), self.false_value.clone()),
        ]
    }

    fn accepts(&self, candidate: &Value) -> bool {
        if self.strict {
            candidate == &self.true_value || candidate == &self.false_value
        } else {
            value::loose_eq(candidate, &self.true_value)
                || value::loose_eq(candidate, &self.false_value)
        }
    }
}

impl Default for Boolean {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Boolean {
    fn name(&self) -> &str {
        "boolean"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let mut options = RuleOptions::new();
        options.insert("trueValue".into(), self.true_value.clone());
        options.insert("falseValue".into(), self.false_value.clone());
        options.insert("strict".into(), Value::Bool(self.strict));
        options.insert("message".into(), dumper.message(&self.message, &self.params()));
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

impl_rule_ext!(Boolean);

/// Handler for [`Boolean`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanHandler;

impl RuleHandler for BooleanHandler {
    type Rule = Boolean;

    fn handle(
        &self,
        value: &Value,
        rule: &Boolean,
        _evaluator: &Evaluator<'_>,
        _context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();
        if !rule.accepts(value) {
            let mut error = RuleError::new(rule.message.clone());
            error.params.extend(rule.params());
            result.add_error(error);
        }
        Ok(result)
    }
}
