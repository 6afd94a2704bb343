//! Rule dispatch: maps a rule's type to the handler that evaluates it.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::engine::Evaluator;
use crate::foundation::{ConfigError, Rule, RuleHandler, ValidationContext, ValidationResult};

type HandlerFactory = Arc<dyn Fn() -> Arc<dyn ErasedHandler> + Send + Sync>;

/// Object-safe view of a [`RuleHandler`].
trait ErasedHandler: Send + Sync {
    fn handle_erased(
        &self,
        value: &Value,
        rule: &dyn Rule,
        evaluator: &Evaluator<'_>,
        context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError>;
}

impl<H: RuleHandler> ErasedHandler for H {
    fn handle_erased(
        &self,
        value: &Value,
        rule: &dyn Rule,
        evaluator: &Evaluator<'_>,
        context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let any: &dyn Any = rule;
        let Some(concrete) = any.downcast_ref::<H::Rule>() else {
            return Err(ConfigError::HandlerMismatch {
                expected: type_name::<H::Rule>(),
                actual: rule.name().to_owned(),
            });
        };
        self.handle(value, concrete, evaluator, context)
    }
}

/// Registry of rule handlers keyed by the rule's [`TypeId`].
///
/// Populated once at startup. Handlers registered by factory are built on
/// first use and cached for the dispatcher's lifetime; the cache is guarded by
/// a [`RwLock`] so a dispatcher can be shared between threads.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vigil_validator::engine::{Evaluator, RuleDispatcher};
/// use vigil_validator::foundation::{ValidationContext, value};
/// use vigil_validator::rules::Required;
///
/// let dispatcher = RuleDispatcher::with_builtin_rules();
/// let evaluator = Evaluator::new(&dispatcher, &value::is_empty);
/// let data = json!("");
/// let context = ValidationContext::new(&data);
///
/// let result = dispatcher
///     .dispatch(&Required::new(), &data, &evaluator, &context)
///     .unwrap();
/// assert!(!result.is_valid());
/// ```
#[derive(Default)]
pub struct RuleDispatcher {
    factories: HashMap<TypeId, HandlerFactory>,
    resolved: RwLock<HashMap<TypeId, Arc<dyn ErasedHandler>>>,
}

impl RuleDispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher with every built-in rule registered.
    #[must_use]
    pub fn with_builtin_rules() -> Self {
        let mut dispatcher = Self::new();
        crate::rules::register_builtin(&mut dispatcher);
        dispatcher
    }

    /// Registers a handler to be constructed on first use.
    ///
    /// Replaces any handler previously registered for the same rule type.
    pub fn register<H>(&mut self) -> &mut Self
    where
        H: RuleHandler + Default,
    {
        let id = TypeId::of::<H::Rule>();
        self.resolved.get_mut().remove(&id);
        self.factories.insert(
            id,
            Arc::new(|| Arc::new(H::default()) as Arc<dyn ErasedHandler>),
        );
        self
    }

    /// Registers a ready-made handler instance.
    ///
    /// Replaces any handler previously registered for the same rule type.
    pub fn register_handler<H: RuleHandler>(&mut self, handler: H) -> &mut Self {
        let id = TypeId::of::<H::Rule>();
        self.factories.remove(&id);
        self.resolved.get_mut().insert(id, Arc::new(handler));
        self
    }

    /// Returns `true` when a handler is registered for `R`.
    #[must_use]
    pub fn is_registered<R: Rule>(&self) -> bool {
        let id = TypeId::of::<R>();
        self.factories.contains_key(&id) || self.resolved.read().contains_key(&id)
    }

    /// Moves every registration of `other` into `self`, overriding on
    /// conflict.
    pub(crate) fn absorb(&mut self, other: Self) {
        let resolved = self.resolved.get_mut();
        for (id, factory) in other.factories {
            resolved.remove(&id);
            self.factories.insert(id, factory);
        }
        for (id, handler) in other.resolved.into_inner() {
            self.factories.remove(&id);
            resolved.insert(id, handler);
        }
    }

    /// Evaluates `rule` with its registered handler.
    ///
    /// Returns [`ConfigError::UnregisteredRule`] when no handler is known for
    /// the rule's type.
    pub fn dispatch(
        &self,
        rule: &dyn Rule,
        value: &Value,
        evaluator: &Evaluator<'_>,
        context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        self.resolve(rule)?
            .handle_erased(value, rule, evaluator, context)
    }

    fn resolve(&self, rule: &dyn Rule) -> Result<Arc<dyn ErasedHandler>, ConfigError> {
        let any: &dyn Any = rule;
        let id = any.type_id();

        if let Some(handler) = self.resolved.read().get(&id) {
            return Ok(Arc::clone(handler));
        }

        let Some(factory) = self.factories.get(&id) else {
            return Err(ConfigError::UnregisteredRule {
                rule: rule.name().to_owned(),
            });
        };

        let mut resolved = self.resolved.write();
        let handler = match resolved.entry(id) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                tracing::debug!(rule = rule.name(), "constructing rule handler");
                Arc::clone(entry.insert(factory()))
            }
        };
        Ok(handler)
    }
}

impl fmt::Debug for RuleDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDispatcher")
            .field("factories", &self.factories.len())
            .field("resolved", &self.resolved.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::foundation::{RuleError, RuleSettings, value};

    #[derive(Debug, Default)]
    struct Odd {
        settings: RuleSettings,
    }

    impl Rule for Odd {
        fn name(&self) -> &str {
            "odd"
        }

        fn settings(&self) -> &RuleSettings {
            &self.settings
        }
    }

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct OddHandler;

    impl Default for OddHandler {
        fn default() -> Self {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            Self
        }
    }

    impl RuleHandler for OddHandler {
        type Rule = Odd;

        fn handle(
            &self,
            value: &Value,
            _rule: &Odd,
            _evaluator: &Evaluator<'_>,
            _context: &ValidationContext<'_>,
        ) -> Result<ValidationResult, ConfigError> {
            let mut result = ValidationResult::new();
            if value.as_i64().is_none_or(|n| n % 2 == 0) {
                result.add_error(RuleError::new("Value must be odd."));
            }
            Ok(result)
        }
    }

    fn run(dispatcher: &RuleDispatcher, rule: &dyn Rule, data: &Value) -> Result<ValidationResult, ConfigError> {
        let evaluator = Evaluator::new(dispatcher, &value::is_empty);
        let context = ValidationContext::new(data);
        dispatcher.dispatch(rule, data, &evaluator, &context)
    }

    #[test]
    fn unregistered_rule_is_a_config_error() {
        let dispatcher = RuleDispatcher::new();
        let err = run(&dispatcher, &Odd::default(), &json!(1)).unwrap_err();
        assert_eq!(err, ConfigError::UnregisteredRule { rule: "odd".into() });
    }

    #[test]
    fn factory_handler_is_built_once() {
        let mut dispatcher = RuleDispatcher::new();
        dispatcher.register::<OddHandler>();
        assert!(dispatcher.is_registered::<Odd>());

        let before = CONSTRUCTED.load(Ordering::SeqCst);
        assert!(run(&dispatcher, &Odd::default(), &json!(3)).unwrap().is_valid());
        assert!(!run(&dispatcher, &Odd::default(), &json!(4)).unwrap().is_valid());
        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst) - before, 1);
    }

    #[test]
    fn instance_registration_overrides_factory() {
        let mut dispatcher = RuleDispatcher::new();
        dispatcher.register::<OddHandler>();
        dispatcher.register_handler(OddHandler);
        assert!(run(&dispatcher, &Odd::default(), &json!(5)).unwrap().is_valid());
    }

    #[test]
    fn absorb_keeps_both_registries() {
        let mut base = RuleDispatcher::with_builtin_rules();
        let mut extra = RuleDispatcher::new();
        extra.register::<OddHandler>();
        base.absorb(extra);

        assert!(base.is_registered::<Odd>());
        assert!(base.is_registered::<crate::rules::Required>());
    }
}
