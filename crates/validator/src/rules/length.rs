//! String length bounds.

use std::borrow::Cow;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleOptions, RuleSettings, ValidationContext,
    ValidationResult,
};
use crate::macros::impl_rule_ext;

/// Checks that a string has between `min` and `max` characters.
///
/// Length is counted in Unicode scalar values, not bytes.
#[derive(Debug, Clone)]
pub struct HasLength {
    min: Option<usize>,
    max: Option<usize>,
    message: Cow<'static, str>,
    too_short_message: Cow<'static, str>,
    too_long_message: Cow<'static, str>,
    settings: RuleSettings,
}

impl HasLength {
    /// Accepts any string.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min: None,
            max: None,
            message: Cow::Borrowed("This value must be a string."),
            too_short_message: Cow::Borrowed(
                "This value should contain at least {min} characters.",
            ),
            too_long_message: Cow::Borrowed("This value should contain at most {max} characters."),
            settings: RuleSettings::default(),
        }
    }

    /// Minimum number of characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Maximum number of characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Message for non-string values.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Message for strings shorter than `min`.
    #[must_use = "builder methods must be chained or built"]
    pub fn too_short_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.too_short_message = message.into();
        self
    }

    /// Message for strings longer than `max`.
    #[must_use = "builder methods must be chained or built"]
    pub fn too_long_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.too_long_message = message.into();
        self
    }
}

impl Default for HasLength {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for HasLength {
    fn name(&self) -> &str {
        "hasLength"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let min: Vec<_> = self
            .min
            .map(|n| (Cow::Borrowed("min"), Value::from(n)))
            .into_iter()
            .collect();
        let max: Vec<_> = self
            .max
            .map(|n| (Cow::Borrowed("max"), Value::from(n)))
            .into_iter()
            .collect();

        let mut options = RuleOptions::new();
        options.insert("min".into(), self.min.map_or(Value::Null, Value::from));
        options.insert("max".into(), self.max.map_or(Value::Null, Value::from));
        options.insert("message".into(), dumper.message(&self.message, &[]));
        options.insert(
            "tooShortMessage".into(),
            dumper.message(&self.too_short_message, &min),
        );
        options.insert(
            "tooLongMessage".into(),
            dumper.message(&self.too_long_message, &max),
        );
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

impl_rule_ext!(HasLength);

/// Handler for [`HasLength`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HasLengthHandler;

impl RuleHandler for HasLengthHandler {
    type Rule = HasLength;

    fn handle(
        &self,
        value: &Value,
        rule: &HasLength,
        _evaluator: &Evaluator<'_>,
        _context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();

        let Some(text) = value.as_str() else {
            result.add_error(RuleError::new(rule.message.clone()));
            return Ok(result);
        };

        let length = text.chars().count();
        if let Some(min) = rule.min
            && length < min
        {
            result.add_error(RuleError::new(rule.too_short_message.clone()).with_param("min", min));
        }
        if let Some(max) = rule.max
            && length > max
        {
            result.add_error(RuleError::new(rule.too_long_message.clone()).with_param("max", max));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::rules::test_support::run;

    #[rstest]
    #[case(json!("ab"), &["This value should contain at least {min} characters."])]
    #[case(json!("abc"), &[])]
    #[case(json!("ÿÿÿÿÿ"), &[])]
    #[case(json!("abcdef"), &["This value should contain at most {max} characters."])]
    #[case(json!(12), &["This value must be a string."])]
    fn length_bounds(#[case] data: Value, #[case] expected: &[&str]) {
        let rule = HasLength::new().min(3).max(5);
        assert_eq!(run(&HasLengthHandler, &rule, &data).error_messages(), expected);
    }

    #[test]
    fn params_carry_bounds() {
        let result = run(&HasLengthHandler, &HasLength::new().min(3), &json!("a"));
        assert_eq!(result.errors()[0].param("min"), Some(&json!(3)));
    }
}
