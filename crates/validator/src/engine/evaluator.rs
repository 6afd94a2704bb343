//! The per-value rule list evaluation primitive.

use std::fmt;

use serde_json::Value;
use tracing::trace;

use crate::engine::RuleDispatcher;
use crate::foundation::{ConfigError, RuleSet, ValidationContext, ValidationResult};

/// Applies a [`RuleSet`] to one value.
///
/// Handed to every handler so container rules can recurse without reaching
/// back into the [`Validator`](crate::engine::Validator).
#[derive(Clone, Copy)]
pub struct Evaluator<'v> {
    dispatcher: &'v RuleDispatcher,
    is_empty: &'v (dyn Fn(&Value) -> bool + Send + Sync),
}

impl<'v> Evaluator<'v> {
    /// Creates an evaluator over `dispatcher` using `is_empty` for
    /// `skip_on_empty` checks.
    #[must_use]
    pub fn new(
        dispatcher: &'v RuleDispatcher,
        is_empty: &'v (dyn Fn(&Value) -> bool + Send + Sync),
    ) -> Self {
        Self {
            dispatcher,
            is_empty,
        }
    }

    /// The dispatcher rules are resolved against.
    #[must_use]
    pub fn dispatcher(&self) -> &'v RuleDispatcher {
        self.dispatcher
    }

    /// Applies the configured emptiness predicate.
    #[must_use]
    pub fn is_empty(&self, value: &Value) -> bool {
        (self.is_empty)(value)
    }

    /// Evaluates every rule of `rules` against `value`, in order.
    ///
    /// A rule is skipped when its `when` predicate is false, when it skips
    /// empty values and `value` is empty, or when it skips after errors and a
    /// previous rule on this context failed. A failing rule marks the context
    /// and its errors are appended to the result.
    pub fn evaluate(
        &self,
        value: &Value,
        rules: &RuleSet,
        context: &mut ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();

        for rule in rules {
            let settings = rule.settings();

            if let Some(when) = settings.when()
                && !when(value, &*context)
            {
                trace!(rule = rule.name(), "skipped: condition not met");
                continue;
            }
            if settings.skip_on_empty() && self.is_empty(value) {
                trace!(rule = rule.name(), "skipped: empty value");
                continue;
            }
            if settings.skip_on_error() && context.previous_rules_errored() {
                trace!(rule = rule.name(), "skipped: previous rule failed");
                continue;
            }

            let outcome = self
                .dispatcher
                .dispatch(rule.as_ref(), value, self, context)?;
            if !outcome.is_valid() {
                context.mark_previous_rules_errored();
                result.merge(outcome);
            }
        }

        Ok(result)
    }
}

impl fmt::Debug for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("dispatcher", self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::foundation::{RuleError, RuleExt, value};
    use crate::rules::{Callback, Number, Required};

    fn evaluate(rules: &RuleSet, data: &Value) -> ValidationResult {
        let dispatcher = RuleDispatcher::with_builtin_rules();
        let evaluator = Evaluator::new(&dispatcher, &value::is_empty);
        let mut context = ValidationContext::new(data);
        evaluator.evaluate(data, rules, &mut context).unwrap()
    }

    #[test]
    fn errors_follow_rule_order() {
        let rules = RuleSet::new()
            .with(Callback::new(|_, _| {
                ValidationResult::from_iter([RuleError::new("first")])
            }))
            .with(Callback::new(|_, _| {
                ValidationResult::from_iter([RuleError::new("second")])
            }));
        assert_eq!(evaluate(&rules, &json!(1)).error_messages(), ["first", "second"]);
    }

    #[test]
    fn skip_on_error_prevents_evaluation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let rules = RuleSet::new().with(Number::new().min(10)).with(
            Callback::new(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                ValidationResult::from_iter([RuleError::new("never")])
            })
            .skip_on_error(true),
        );

        let result = evaluate(&rules, &json!(1));
        assert_eq!(result.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn skip_on_empty_ignores_verdict() {
        let rules = RuleSet::from(Number::new().skip_on_empty(true));
        assert!(evaluate(&rules, &json!("")).is_valid());
    }

    #[test]
    fn when_false_skips_rule() {
        let rules = RuleSet::from(Number::new().when(|_, context| {
            context.attribute_value("enabled") == &json!(true)
        }));
        assert!(evaluate(&rules, &json!({"enabled": false})).is_valid());
        assert!(!evaluate(&rules, &json!({"enabled": true})).is_valid());
    }

    #[test]
    fn required_fails_on_blank() {
        let rules = RuleSet::from(Required::new());
        assert_eq!(evaluate(&rules, &json!("")).error_messages(), ["Value cannot be blank."]);
    }

    #[test]
    fn custom_emptiness_predicate() {
        let dispatcher = RuleDispatcher::with_builtin_rules();
        let zero_is_empty = |v: &Value| v == &json!(0) || value::is_empty(v);
        let evaluator = Evaluator::new(&dispatcher, &zero_is_empty);
        let data = json!(0);
        let mut context = ValidationContext::new(&data);
        let rules = RuleSet::from(Number::new().min(5).skip_on_empty(true));

        let result = evaluator.evaluate(&data, &rules, &mut context).unwrap();
        assert!(result.is_valid());
        assert!(evaluator.is_empty(&data));
    }
}
