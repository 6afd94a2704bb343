//! Named groups of rules reported as one.

use std::borrow::Cow;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleOptions, RuleSet, RuleSettings,
    ValidationContext, ValidationResult,
};
use crate::macros::impl_rule_ext;

/// Bundles a rule set under its own name and message.
///
/// When any inner rule fails, the group reports a single error with its own
/// message instead of the inner errors. Useful for reusable composite checks
/// such as "valid login".
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vigil_validator::prelude::*;
///
/// let login = Group::new("login", rules![Required::new(), HasLength::new().min(3)])
///     .unwrap()
///     .message("Login is not valid.");
///
/// let result = Validator::new()
///     .validate_value(&json!("ab"), &rules![login])
///     .unwrap();
/// assert_eq!(result.error_messages(), ["Login is not valid."]);
/// ```
#[derive(Debug, Clone)]
pub struct Group {
    name: Cow<'static, str>,
    rules: RuleSet,
    message: Cow<'static, str>,
    settings: RuleSettings,
}

impl Group {
    /// Creates a group named `name`.
    ///
    /// Returns [`ConfigError::EmptyRules`] when `rules` is empty.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        rules: impl Into<RuleSet>,
    ) -> Result<Self, ConfigError> {
        let rules = rules.into();
        if rules.is_empty() {
            return Err(ConfigError::EmptyRules { rule: "group" });
        }

        Ok(Self {
            name: name.into(),
            rules,
            message: Cow::Borrowed("This value is not a valid."),
            settings: RuleSettings::default(),
        })
    }

    /// Overrides the message.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl Rule for Group {
    fn name(&self) -> &str {
        &self.name
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let mut options = RuleOptions::new();
        options.insert("rules".into(), dumper.dump_rule_set(&self.rules)?);
        options.insert("message".into(), dumper.message(&self.message, &[]));
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

impl_rule_ext!(Group);

/// Handler for [`Group`].
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupHandler;

impl RuleHandler for GroupHandler {
    type Rule = Group;

    fn handle(
        &self,
        value: &Value,
        rule: &Group,
        evaluator: &Evaluator<'_>,
        context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut inner = context.fresh();

        let mut result = ValidationResult::new();
        if !evaluator.evaluate(value, &rule.rules, &mut inner)?.is_valid() {
            result.add_error(RuleError::new(rule.message.clone()));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::rules;
    use crate::rules::test_support::run;
    use crate::rules::{Number, Required};

    #[test]
    fn inner_failures_collapse_into_one_error() {
        let rule = Group::new("age", rules![Number::new().min(18), Number::new().max(10)]).unwrap();
        let result = run(&GroupHandler, &rule, &json!(15));
        assert_eq!(result.error_messages(), ["This value is not a valid."]);
    }

    #[test]
    fn passing_group_is_silent() {
        let rule = Group::new("present", Required::new()).unwrap();
        assert!(run(&GroupHandler, &rule, &json!("x")).is_valid());
    }

    #[test]
    fn name_is_configurable() {
        let rule = Group::new("login", Required::new()).unwrap();
        assert_eq!(rule.name(), "login");
    }

    #[test]
    fn dump_lists_inner_rules() {
        let rule = Group::new("present", Required::new()).unwrap();
        let options = rule.options(&RulesDumper::new()).unwrap().unwrap();
        assert_eq!(options["rules"][0][0], json!("required"));
    }
}
