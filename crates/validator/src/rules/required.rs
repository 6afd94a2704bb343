//! Presence check.

use std::borrow::Cow;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleOptions, RuleSettings, ValidationContext,
    ValidationResult,
};
use crate::macros::impl_rule_ext;

/// Fails when the value is empty.
///
/// Emptiness is decided by the validator's emptiness predicate, by default
/// `null`, `""`, `[]` and `{}`.
#[derive(Debug, Clone)]
pub struct Required {
    message: Cow<'static, str>,
    settings: RuleSettings,
}

impl Required {
    /// Creates the rule with the default message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: Cow::Borrowed("Value cannot be blank."),
            settings: RuleSettings::default(),
        }
    }

    /// Overrides the message.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Required {
    fn name(&self) -> &str {
        "required"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let mut options = RuleOptions::new();
        options.insert("message".into(), dumper.message(&self.message, &[]));
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

impl_rule_ext!(Required);

/// Handler for [`Required`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredHandler;

impl RuleHandler for RequiredHandler {
    type Rule = Required;

    fn handle(
        &self,
        value: &Value,
        rule: &Required,
        evaluator: &Evaluator<'_>,
        _context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();
        if evaluator.is_empty(value) {
            result.add_error(RuleError::new(rule.message.clone()));
        }
        Ok(result)
    }
}
