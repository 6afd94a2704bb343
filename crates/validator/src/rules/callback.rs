//! Ad-hoc rules backed by closures.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::engine::Evaluator;
use crate::foundation::{
    ConfigError, Rule, RuleHandler, RuleSettings, ValidationContext, ValidationResult,
};
use crate::macros::impl_rule_ext;

/// Closure evaluated by a [`Callback`] rule.
pub type CallbackFn = Arc<dyn Fn(&Value, &ValidationContext<'_>) -> ValidationResult + Send + Sync>;

/// Wraps a closure as a rule.
///
/// Callbacks have no options, so the dumper skips them (or rejects them,
/// depending on its policy).
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vigil_validator::prelude::*;
///
/// let answer = Callback::new(|value, _| {
///     let mut result = ValidationResult::new();
///     if value != &json!(42) {
///         result.add_error(RuleError::new("Value should be 42!"));
///     }
///     result
/// });
///
/// let result = Validator::new()
///     .validate_value(&json!(41), &rules![answer])
///     .unwrap();
/// assert_eq!(result.error_messages(), ["Value should be 42!"]);
/// ```
#[derive(Clone)]
pub struct Callback {
    callback: CallbackFn,
    settings: RuleSettings,
}

impl Callback {
    /// Wraps `callback`.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> ValidationResult + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            settings: RuleSettings::default(),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Rule for Callback {
    fn name(&self) -> &str {
        "callback"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }
}

impl_rule_ext!(Callback);

/// Handler for [`Callback`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CallbackHandler;

impl RuleHandler for CallbackHandler {
    type Rule = Callback;

    fn handle(
        &self,
        value: &Value,
        rule: &Callback,
        _evaluator: &Evaluator<'_>,
        context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        Ok((rule.callback)(value, context))
    }
}
