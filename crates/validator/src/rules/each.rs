//! Per-element validation of collections.

use std::borrow::Cow;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleOptions, RuleSet, RuleSettings,
    ValidationContext, ValidationResult, value,
};
use crate::macros::impl_rule_ext;

/// Applies one rule set to every element of an array or every value of an
/// object.
///
/// Errors are re-homed under the element's index or key.
#[derive(Debug, Clone)]
pub struct Each {
    rules: RuleSet,
    incorrect_input_message: Cow<'static, str>,
    settings: RuleSettings,
}

impl Each {
    /// Creates the rule.
    ///
    /// Returns [`ConfigError::EmptyRules`] when `rules` is empty.
    pub fn new(rules: impl Into<RuleSet>) -> Result<Self, ConfigError> {
        let rules = rules.into();
        if rules.is_empty() {
            return Err(ConfigError::EmptyRules { rule: "each" });
        }

        Ok(Self {
            rules,
            incorrect_input_message: Cow::Borrowed("Value must be array or iterable."),
            settings: RuleSettings::default(),
        })
    }

    /// Message for values that are neither arrays nor objects. `{type}` is
    /// available.
    #[must_use = "builder methods must be chained or built"]
    pub fn incorrect_input_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.incorrect_input_message = message.into();
        self
    }
}

impl Rule for Each {
    fn name(&self) -> &str {
        "each"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let mut options = RuleOptions::new();
        options.insert("rules".into(), dumper.dump_rule_set(&self.rules)?);
        options.insert(
            "incorrectInputMessage".into(),
            dumper.message(&self.incorrect_input_message, &[]),
        );
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

impl_rule_ext!(Each);

/// Handler for [`Each`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EachHandler;

impl EachHandler {
    fn element(
        evaluator: &Evaluator<'_>,
        rules: &RuleSet,
        key: String,
        element: &Value,
        result: &mut ValidationResult,
    ) -> Result<(), ConfigError> {
        let mut context = ValidationContext::new(element);
        let outcome = evaluator.evaluate(element, rules, &mut context)?;
        let prefix = [key];
        result.extend(outcome.into_iter().map(|error| error.prefixed(&prefix)));
        Ok(())
    }
}

impl RuleHandler for EachHandler {
    type Rule = Each;

    fn handle(
        &self,
        value: &Value,
        rule: &Each,
        evaluator: &Evaluator<'_>,
        _context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();

        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    Self::element(evaluator, &rule.rules, index.to_string(), item, &mut result)?;
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    Self::element(evaluator, &rule.rules, key.clone(), item, &mut result)?;
                }
            }
            other => {
                result.add_error(
                    RuleError::new(rule.incorrect_input_message.clone())
                        .with_param("type", value::type_name(other)),
                );
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::foundation::RuleExt;
    use crate::rules::test_support::run;
    use crate::rules::{Number, Required};

    #[test]
    fn errors_are_rehomed_under_index() {
        let rule = Each::new(Number::new().max(13)).unwrap();
        let result = run(&EachHandler, &rule, &json!([10, 20, 30]));

        assert_eq!(result.len(), 2);
        assert_eq!(result.errors()[0].value_path(), ["1"]);
        assert_eq!(result.errors()[1].value_path(), ["2"]);
        assert_eq!(result.errors()[0].param("max"), Some(&json!(13)));
    }

    #[test]
    fn custom_message_is_kept() {
        let rule = Each::new(Number::new().max(13).too_big_message("Custom error")).unwrap();
        let result = run(&EachHandler, &rule, &json!([10, 20, 30]));
        assert_eq!(result.error_messages(), ["Custom error", "Custom error"]);
    }

    #[test]
    fn passes_when_all_elements_pass() {
        let rule = Each::new(Number::new().max(20)).unwrap();
        assert!(run(&EachHandler, &rule, &json!([10, 11])).is_valid());
    }

    #[test]
    fn objects_use_their_keys() {
        let rule = Each::new(Required::new()).unwrap();
        let result = run(&EachHandler, &rule, &json!({"a": "x", "b": ""}));
        assert_eq!(result.errors()[0].value_path(), ["b"]);
    }

    #[test]
    fn skip_on_error_is_scoped_per_element() {
        let rules = crate::rules![
            Number::new().max(5),
            Number::new().max(4).skip_on_error(true),
        ];
        let rule = Each::new(rules).unwrap();
        let result = run(&EachHandler, &rule, &json!([9, 5]));

        // the first element's failure must not skip the second rule on the second element
        assert_eq!(result.len(), 2);
        assert_eq!(result.errors()[0].value_path(), ["0"]);
        assert_eq!(result.errors()[1].value_path(), ["1"]);
        assert_eq!(result.errors()[1].param("max"), Some(&json!(4)));
    }

    #[test]
    fn scalars_are_rejected() {
        let rule = Each::new(Required::new()).unwrap();
        let result = run(&EachHandler, &rule, &json!(5));
        assert_eq!(result.error_messages(), ["Value must be array or iterable."]);
    }

    #[test]
    fn empty_rules_are_rejected() {
        assert_eq!(
            Each::new(RuleSet::new()).unwrap_err(),
            ConfigError::EmptyRules { rule: "each" }
        );
    }
}
