//! Validation of sub-structures addressed by property paths.

use std::borrow::Cow;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleMap, RuleOptions, RuleSettings,
    ValidationContext, ValidationResult, value,
};
use crate::macros::impl_rule_ext;

/// Applies rule sets to paths inside an object or array.
///
/// Keys are dotted property paths (`"author.age"`) or positional indices.
/// Each path is resolved one segment at a time: objects by key, arrays by
/// index. Errors from a path's rule set are re-homed under that path, so a
/// failure on `age` inside `author` reports the value path
/// `["author", "age"]`. Nested rules compose to any depth.
///
/// A path that does not resolve is skipped, unless
/// [`error_when_property_path_is_not_found`](Self::error_when_property_path_is_not_found)
/// is set, in which case it is reported as a validation error.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vigil_validator::prelude::*;
///
/// let nested = Nested::new(rule_map! {
///     "author.age" => Number::new().min(20),
/// })
/// .unwrap();
///
/// let data = json!({"author": {"name": "Dmitry", "age": 18}});
/// let result = Validator::new()
///     .validate_value(&data, &rules![nested])
///     .unwrap();
///
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.errors()[0].value_path(), ["author", "age"]);
/// ```
#[derive(Debug, Clone)]
pub struct Nested {
    rules: RuleMap,
    error_when_property_path_is_not_found: bool,
    property_path_is_not_found_message: Cow<'static, str>,
    incorrect_input_message: Cow<'static, str>,
    settings: RuleSettings,
}

impl Nested {
    /// Creates the rule.
    ///
    /// Returns [`ConfigError::EmptyRules`] when `rules` is empty.
    pub fn new(rules: RuleMap) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyRules { rule: "nested" });
        }

        Ok(Self {
            rules,
            error_when_property_path_is_not_found: false,
            property_path_is_not_found_message: Cow::Borrowed(
                r#"Property path "{path}" is not found."#,
            ),
            incorrect_input_message: Cow::Borrowed(
                "Value should be an array or an object. {type} given.",
            ),
            settings: RuleSettings::default(),
        })
    }

    /// Reports paths that do not resolve instead of skipping them.
    #[must_use = "builder methods must be chained or built"]
    pub fn error_when_property_path_is_not_found(mut self, strict: bool) -> Self {
        self.error_when_property_path_is_not_found = strict;
        self
    }

    /// Message for unresolved paths. `{path}` is available.
    #[must_use = "builder methods must be chained or built"]
    pub fn property_path_is_not_found_message(
        mut self,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.property_path_is_not_found_message = message.into();
        self
    }

    /// Message for values that are neither objects nor arrays. `{type}` is
    /// available.
    #[must_use = "builder methods must be chained or built"]
    pub fn incorrect_input_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.incorrect_input_message = message.into();
        self
    }

    /// Path to rule set mapping.
    #[must_use]
    pub fn rules(&self) -> &RuleMap {
        &self.rules
    }
}

impl Rule for Nested {
    fn name(&self) -> &str {
        "nested"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let mut options = RuleOptions::new();
        options.insert("rules".into(), dumper.dump(&self.rules)?);
        options.insert(
            "errorWhenPropertyPathIsNotFound".into(),
            Value::Bool(self.error_when_property_path_is_not_found),
        );
        options.insert(
            "propertyPathIsNotFoundMessage".into(),
            dumper.message(&self.property_path_is_not_found_message, &[]),
        );
        options.insert(
            "incorrectInputMessage".into(),
            dumper.message(&self.incorrect_input_message, &[]),
        );
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

impl_rule_ext!(Nested);

/// Handler for [`Nested`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NestedHandler;

impl RuleHandler for NestedHandler {
    type Rule = Nested;

    fn handle(
        &self,
        value: &Value,
        rule: &Nested,
        evaluator: &Evaluator<'_>,
        _context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();

        if !(value.is_object() || value.is_array()) {
            result.add_error(
                RuleError::new(rule.incorrect_input_message.clone())
                    .with_param("type", value::type_name(value)),
            );
            return Ok(result);
        }

        for (key, rules) in &rule.rules {
            let segments = key.segments();

            let Some(target) = value::resolve_path(value, &segments) else {
                if rule.error_when_property_path_is_not_found {
                    result.add_error(
                        RuleError::new(rule.property_path_is_not_found_message.clone())
                            .with_param("path", key.to_string())
                            .with_value_path(segments),
                    );
                }
                continue;
            };

            let mut context = ValidationContext::new(target);
            let outcome = evaluator.evaluate(target, rules, &mut context)?;
            result.extend(outcome.into_iter().map(|error| error.prefixed(&segments)));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::rule_map;
    use crate::rules::test_support::run;
    use crate::rules::{Number, Required};

    fn author_data() -> Value {
        json!({"author": {"name": "Dmitry", "age": 18}})
    }

    #[test]
    fn empty_rules_are_rejected() {
        let err = Nested::new(RuleMap::new()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyRules { rule: "nested" });
    }

    #[test]
    fn errors_are_rehomed_under_path() {
        let rule = Nested::new(rule_map! { "author.age" => Number::new().min(20) }).unwrap();
        let result = run(&NestedHandler, &rule, &author_data());

        assert_eq!(result.len(), 1);
        let error = &result.errors()[0];
        assert_eq!(error.value_path(), ["author", "age"]);
        assert_eq!(error.param("min"), Some(&json!(20)));
    }

    #[test]
    fn missing_path_is_skipped_by_default() {
        let rule = Nested::new(rule_map! { "author.sex" => Required::new() }).unwrap();
        assert!(run(&NestedHandler, &rule, &author_data()).is_valid());
    }

    #[test]
    fn missing_path_is_reported_when_strict() {
        let rule = Nested::new(rule_map! { "value" => Required::new() })
            .unwrap()
            .error_when_property_path_is_not_found(true);
        let result = run(&NestedHandler, &rule, &json!({}));

        assert_eq!(result.len(), 1);
        let error = &result.errors()[0];
        assert_eq!(error.message(), r#"Property path "{path}" is not found."#);
        assert_eq!(error.value_path(), ["value"]);
        assert_eq!(error.param("path"), Some(&json!("value")));
    }

    #[test]
    fn scalar_input_is_a_single_error() {
        let rule = Nested::new(rule_map! { "x" => Required::new() }).unwrap();
        let result = run(&NestedHandler, &rule, &json!(""));

        assert_eq!(result.len(), 1);
        assert!(result.errors()[0].value_path().is_empty());
        assert_eq!(result.errors()[0].param("type"), Some(&json!("string")));
    }

    #[test]
    fn positional_keys_compose() {
        let inner = Nested::new(rule_map! { 0usize => Number::new().min(-10).max(10) }).unwrap();
        let outer = Nested::new(rule_map! { 0usize => inner }).unwrap();

        let result = run(&NestedHandler, &outer, &json!({"0": {"0": -11}}));
        assert_eq!(result.len(), 1);
        assert_eq!(result.errors()[0].value_path(), ["0", "0"]);
        assert_eq!(result.errors()[0].message(), "Value must be no less than {min}.");
    }

    #[test]
    fn array_indices_resolve() {
        let rule = Nested::new(rule_map! { "items.1" => Number::new().max(5) }).unwrap();
        let result = run(&NestedHandler, &rule, &json!({"items": [1, 9]}));
        assert_eq!(result.errors()[0].value_path(), ["items", "1"]);
    }

    #[test]
    fn dump_contains_inner_rules() {
        let rule = Nested::new(rule_map! { "author.age" => Number::new().min(20) }).unwrap();
        let options = rule.options(&RulesDumper::new()).unwrap().unwrap();

        assert_eq!(options["rules"]["author.age"][0][0], json!("number"));
        assert_eq!(options["errorWhenPropertyPathIsNotFound"], json!(false));
        assert_eq!(
            options["propertyPathIsNotFoundMessage"],
            json!(r#"Property path "{path}" is not found."#)
        );
    }
}
