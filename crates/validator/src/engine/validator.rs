//! The root orchestrator.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::engine::{Evaluator, RuleDispatcher};
use crate::foundation::{
    AttributeKey, AttributeSource, ConfigError, DataSet, RuleHandler, RuleMap, RuleSet,
    ValidationContext, ValidationResult, value,
};

/// Emptiness predicate used by `skip_on_empty` and [`Required`](crate::rules::Required).
pub type EmptyCheck = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Validates data sets against rule maps.
///
/// A `Validator` owns its [`RuleDispatcher`] and is `Send + Sync`; build it
/// once and share it.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vigil_validator::prelude::*;
///
/// let validator = Validator::new();
/// let data = json!({"name": "", "age": 17});
/// let rules = rule_map! {
///     "name" => Required::new(),
///     "age" => Number::new().min(18),
/// };
///
/// let result = validator.validate(&data, &rules).unwrap();
/// assert!(!result.is_attribute_valid("name"));
/// assert!(!result.is_attribute_valid("age"));
/// ```
pub struct Validator {
    dispatcher: RuleDispatcher,
    empty_check: EmptyCheck,
}

impl Validator {
    /// Creates a validator with the built-in rules and the default emptiness
    /// predicate.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts configuring a validator.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// The dispatcher rules are resolved against.
    #[must_use]
    pub fn dispatcher(&self) -> &RuleDispatcher {
        &self.dispatcher
    }

    /// Evaluator bound to this validator's dispatcher and emptiness predicate.
    #[must_use]
    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.dispatcher, self.empty_check.as_ref())
    }

    /// Validates `data` against `rules`.
    ///
    /// A self-describing data set supplies its own rules, which replace
    /// `rules`. Every attribute is evaluated with a fresh context; positional
    /// keys validate the whole payload. Errors carry the attribute they were
    /// reported under.
    ///
    /// Returns `Err` only for configuration errors; validation failures are in
    /// the returned result.
    pub fn validate<'a>(
        &self,
        data: impl Into<DataSet<'a>>,
        rules: &RuleMap,
    ) -> Result<ValidationResult, ConfigError> {
        let mut data = data.into();
        let own_rules = data.own_rules();
        let rules = own_rules.as_ref().unwrap_or(rules);

        let evaluator = self.evaluator();
        let payload = data.data();
        let source: &dyn AttributeSource = &data;
        let mut result = ValidationResult::new();

        for (key, rule_set) in rules {
            let attribute = key.to_string();
            let value = match key {
                AttributeKey::Index(_) => payload,
                AttributeKey::Name(name) => data.attribute_value(name),
            };

            let mut context = ValidationContext::new(payload)
                .with_attribute(attribute.as_str())
                .with_attribute_source(source);
            let outcome = evaluator.evaluate(value, rule_set, &mut context)?;
            result.extend(
                outcome
                    .into_iter()
                    .map(|error| error.with_attribute(attribute.as_str())),
            );
        }

        data.process_validation_result(&result);

        debug!(
            attributes = rules.len(),
            errors = result.len(),
            "validation finished"
        );
        Ok(result)
    }

    /// Validates a single value against one rule set.
    pub fn validate_value(
        &self,
        value: &Value,
        rules: &RuleSet,
    ) -> Result<ValidationResult, ConfigError> {
        let mut context = ValidationContext::new(value);
        self.evaluator().evaluate(value, rules, &mut context)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`Validator`].
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
/// use vigil_validator::prelude::*;
///
/// let validator = Validator::builder()
///     .empty_check(|value: &Value| value.is_null())
///     .build();
///
/// let rules = rules![Required::new()];
/// assert!(validator.validate_value(&json!(""), &rules).unwrap().is_valid());
/// ```
#[must_use = "builder methods must be chained or built"]
pub struct ValidatorBuilder {
    builtin_rules: bool,
    custom: RuleDispatcher,
    empty_check: Option<EmptyCheck>,
}

impl ValidatorBuilder {
    fn new() -> Self {
        Self {
            builtin_rules: true,
            custom: RuleDispatcher::new(),
            empty_check: None,
        }
    }

    /// Registers a handler to be constructed on first use.
    pub fn register<H>(mut self) -> Self
    where
        H: RuleHandler + Default,
    {
        self.custom.register::<H>();
        self
    }

    /// Registers a handler instance.
    pub fn with_handler<H: RuleHandler>(mut self, handler: H) -> Self {
        self.custom.register_handler(handler);
        self
    }

    /// Replaces the emptiness predicate.
    pub fn empty_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.empty_check = Some(Arc::new(check));
        self
    }

    /// Leaves the built-in rules unregistered.
    pub fn without_builtin_rules(mut self) -> Self {
        self.builtin_rules = false;
        self
    }

    /// Builds the validator. Custom handlers override built-in ones.
    pub fn build(self) -> Validator {
        let mut dispatcher = if self.builtin_rules {
            RuleDispatcher::with_builtin_rules()
        } else {
            RuleDispatcher::new()
        };
        dispatcher.absorb(self.custom);

        Validator {
            dispatcher,
            empty_check: self
                .empty_check
                .unwrap_or_else(|| Arc::new(value::is_empty) as EmptyCheck),
        }
    }
}

impl fmt::Debug for ValidatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBuilder")
            .field("builtin_rules", &self.builtin_rules)
            .field("custom", &self.custom)
            .field("empty_check", &self.empty_check.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::rules::{Number, Required};
    use crate::{rule_map, rules};

    #[test]
    fn positional_key_validates_whole_payload() {
        let validator = Validator::new();
        let rules = rule_map! { 0usize => Required::new() };
        let result = validator.validate(&json!({}), &rules).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.errors()[0].attribute(), Some("0"));
        assert!(result.errors()[0].value_path().is_empty());
    }

    #[test]
    fn errors_are_tagged_with_attribute() {
        let validator = Validator::new();
        let rules = rule_map! { "age" => Number::new().min(18) };
        let result = validator.validate(&json!({"age": 12}), &rules).unwrap();

        assert_eq!(result.errors()[0].attribute(), Some("age"));
        assert_eq!(result.errors()[0].param("min"), Some(&json!(18)));
    }

    #[test]
    fn missing_builtins_are_config_errors() {
        let validator = Validator::builder().without_builtin_rules().build();
        let err = validator
            .validate_value(&json!(1), &rules![Required::new()])
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnregisteredRule { .. }));
    }

    #[test]
    fn validator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
    }
}
