//! Numeric checks with optional bounds.

use std::borrow::Cow;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleOptions, RuleSettings, ValidationContext,
    ValidationResult, value,
};
use crate::macros::impl_rule_ext;

/// Checks that the value is a number, optionally an integer, within bounds.
///
/// JSON numbers and numeric strings are accepted; booleans are not.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vigil_validator::prelude::*;
///
/// let validator = Validator::new();
/// let result = validator
///     .validate_value(&json!("17"), &rules![Number::integer().min(18)])
///     .unwrap();
/// assert_eq!(result.errors()[0].param("min"), Some(&json!(18)));
/// ```
#[derive(Debug, Clone)]
pub struct Number {
    as_integer: bool,
    min: Option<f64>,
    max: Option<f64>,
    not_number_message: Cow<'static, str>,
    not_integer_message: Cow<'static, str>,
    too_small_message: Cow<'static, str>,
    too_big_message: Cow<'static, str>,
    settings: RuleSettings,
}

impl Number {
    /// Accepts any number.
    #[must_use]
    pub fn new() -> Self {
        Self {
            as_integer: false,
            min: None,
            max: None,
            not_number_message: Cow::Borrowed("Value must be a number."),
            not_integer_message: Cow::Borrowed("Value must be an integer."),
            too_small_message: Cow::Borrowed("Value must be no less than {min}."),
            too_big_message: Cow::Borrowed("Value must be no greater than {max}."),
            settings: RuleSettings::default(),
        }
    }

    /// Accepts integers only.
    #[must_use]
    pub fn integer() -> Self {
        Self {
            as_integer: true,
            ..Self::new()
        }
    }

    /// Lower bound, inclusive.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, min: impl Into<f64>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Upper bound, inclusive.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, max: impl Into<f64>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Message for values that are not numbers.
    #[must_use = "builder methods must be chained or built"]
    pub fn not_number_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.not_number_message = message.into();
        self
    }

    /// Message for non-integral values when integers are required.
    #[must_use = "builder methods must be chained or built"]
    pub fn not_integer_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.not_integer_message = message.into();
        self
    }

    /// Message for values below the lower bound. `{min}` is available.
    #[must_use = "builder methods must be chained or built"]
    pub fn too_small_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.too_small_message = message.into();
        self
    }

    /// Message for values above the upper bound. `{max}` is available.
    #[must_use = "builder methods must be chained or built"]
    pub fn too_big_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.too_big_message = message.into();
        self
    }

    fn type_message(&self) -> &Cow<'static, str> {
        if self.as_integer {
            &self.not_integer_message
        } else {
            &self.not_number_message
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::new()
    }
}

fn bound(limit: Option<f64>) -> Value {
    limit.map_or(Value::Null, value::number_value)
}

/// Static message parameters; an unset bound leaves its placeholder.
fn bound_params(key: &'static str, limit: Option<f64>) -> Vec<(Cow<'static, str>, Value)> {
    limit
        .map(|l| (Cow::Borrowed(key), value::number_value(l)))
        .into_iter()
        .collect()
}

impl Rule for Number {
    fn name(&self) -> &str {
        "number"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let mut options = RuleOptions::new();
        options.insert("asInteger".into(), Value::Bool(self.as_integer));
        options.insert("min".into(), bound(self.min));
        options.insert("max".into(), bound(self.max));
        options.insert(
            "notNumberMessage".into(),
            dumper.message(self.type_message(), &[]),
        );
        options.insert(
            "tooSmallMessage".into(),
            dumper.message(&self.too_small_message, &bound_params("min", self.min)),
        );
        options.insert(
            "tooBigMessage".into(),
            dumper.message(&self.too_big_message, &bound_params("max", self.max)),
        );
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

impl_rule_ext!(Number);

/// Handler for [`Number`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberHandler;

impl RuleHandler for NumberHandler {
    type Rule = Number;

    fn handle(
        &self,
        value: &Value,
        rule: &Number,
        _evaluator: &Evaluator<'_>,
        _context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();

        let number = match value::as_number(value) {
            Some(n) if !rule.as_integer || value::is_integer(value) => n,
            _ => {
                result.add_error(RuleError::new(rule.type_message().clone()));
                return Ok(result);
            }
        };

        if let Some(min) = rule.min
            && number < min
        {
            result.add_error(
                RuleError::new(rule.too_small_message.clone())
                    .with_param("min", value::number_value(min)),
            );
        }
        if let Some(max) = rule.max
            && number > max
        {
            result.add_error(
                RuleError::new(rule.too_big_message.clone())
                    .with_param("max", value::number_value(max)),
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::engine::RuleDispatcher;

    fn check(rule: &Number, data: &Value) -> ValidationResult {
        let dispatcher = RuleDispatcher::new();
        let evaluator = Evaluator::new(&dispatcher, &value::is_empty);
        let context = ValidationContext::new(data);
        NumberHandler.handle(data, rule, &evaluator, &context).unwrap()
    }

    #[rstest]
    #[case(json!(5))]
    #[case(json!(-1.5))]
    #[case(json!("42"))]
    #[case(json!(" 3.14 "))]
    fn numbers_pass(#[case] data: Value) {
        assert!(check(&Number::new(), &data).is_valid());
    }

    #[rstest]
    #[case(json!("abc"), "Value must be a number.")]
    #[case(json!(true), "Value must be a number.")]
    #[case(json!(null), "Value must be a number.")]
    #[case(json!([1]), "Value must be a number.")]
    fn non_numbers_fail(#[case] data: Value, #[case] message: &str) {
        assert_eq!(check(&Number::new(), &data).error_messages(), [message]);
    }

    #[rstest]
    #[case(json!(4.5))]
    #[case(json!("4.5"))]
    fn integer_mode_rejects_fractions(#[case] data: Value) {
        assert_eq!(
            check(&Number::integer(), &data).error_messages(),
            ["Value must be an integer."]
        );
    }

    #[test]
    fn bounds_carry_params() {
        let rule = Number::new().min(-10).max(10);

        let too_small = check(&rule, &json!(-11));
        assert_eq!(too_small.error_messages(), ["Value must be no less than {min}."]);
        assert_eq!(too_small.errors()[0].param("min"), Some(&json!(-10)));

        let too_big = check(&rule, &json!(11));
        assert_eq!(too_big.errors()[0].param("max"), Some(&json!(10)));

        assert!(check(&rule, &json!(10)).is_valid());
    }

    #[test]
    fn options_format_static_bounds() {
        let options = Number::new()
            .min(20)
            .options(&RulesDumper::new())
            .unwrap()
            .unwrap();

        assert_eq!(options["min"], json!(20));
        assert_eq!(options["max"], Value::Null);
        assert_eq!(options["tooSmallMessage"], json!("Value must be no less than 20."));
        assert_eq!(options["tooBigMessage"], json!("Value must be no greater than {max}."));
    }
}
