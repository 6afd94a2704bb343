//! Core traits for the rule system.
//!
//! A rule is plain data: *what* to check and with which parameters. The
//! behaviour lives in a [`RuleHandler`] registered for the rule's type with
//! the [`RuleDispatcher`](crate::engine::RuleDispatcher).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::context::ValidationContext;
use crate::foundation::error::ConfigError;
use crate::foundation::key::AttributeKey;
use crate::foundation::result::ValidationResult;

/// Static options a rule exposes for dumping.
pub type RuleOptions = Map<String, Value>;

/// Predicate deciding whether a rule runs for the current value.
pub type WhenFn = Arc<dyn Fn(&Value, &ValidationContext<'_>) -> bool + Send + Sync>;

/// Attribute (or property path) to rule set mapping, iterated in insertion
/// order.
pub type RuleMap = IndexMap<AttributeKey, RuleSet>;

// ============================================================================
// RULE
// ============================================================================

/// A declarative validation rule.
///
/// Implementors are immutable values; configuration happens through
/// consuming builder methods before the rule is placed into a [`RuleSet`].
///
/// # Examples
///
/// ```
/// use vigil_validator::foundation::{Rule, RuleExt, RuleSettings};
///
/// #[derive(Debug, Default)]
/// struct Even {
///     settings: RuleSettings,
/// }
///
/// impl Rule for Even {
///     fn name(&self) -> &str {
///         "even"
///     }
///
///     fn settings(&self) -> &RuleSettings {
///         &self.settings
///     }
/// }
///
/// impl RuleExt for Even {
///     fn settings_mut(&mut self) -> &mut RuleSettings {
///         &mut self.settings
///     }
/// }
///
/// let rule = Even::default().skip_on_empty(true);
/// assert!(rule.settings().skip_on_empty());
/// ```
pub trait Rule: Any + Send + Sync + fmt::Debug {
    /// Canonical name, used as the rule's identity in dumps and errors.
    fn name(&self) -> &str;

    /// Guard conditions shared by every rule.
    fn settings(&self) -> &RuleSettings;

    /// Parameter contract for dumping.
    ///
    /// `Ok(None)` means the rule has no parameter contract; the dumper skips
    /// it or rejects it depending on its policy.
    fn options(&self, _dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        Ok(None)
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Guard conditions common to all rules.
#[derive(Clone, Default)]
pub struct RuleSettings {
    skip_on_empty: bool,
    skip_on_error: bool,
    when: Option<WhenFn>,
}

impl RuleSettings {
    /// Skip the rule when the value is empty.
    #[must_use]
    pub fn skip_on_empty(&self) -> bool {
        self.skip_on_empty
    }

    /// Skip the rule when a previous rule on the same target failed.
    #[must_use]
    pub fn skip_on_error(&self) -> bool {
        self.skip_on_error
    }

    /// Predicate deciding whether the rule runs.
    #[must_use]
    pub fn when(&self) -> Option<&WhenFn> {
        self.when.as_ref()
    }

    /// Options shared by every rule dump.
    #[must_use]
    pub fn options(&self) -> RuleOptions {
        let mut options = RuleOptions::new();
        options.insert("skipOnEmpty".into(), Value::Bool(self.skip_on_empty));
        options.insert("skipOnError".into(), Value::Bool(self.skip_on_error));
        options
    }
}

impl fmt::Debug for RuleSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSettings")
            .field("skip_on_empty", &self.skip_on_empty)
            .field("skip_on_error", &self.skip_on_error)
            .field("when", &self.when.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

// ============================================================================
// RULE EXTENSION TRAIT
// ============================================================================

/// Builder methods for the guard conditions of a rule.
///
/// Every method consumes the rule and returns the modified value, so a rule
/// that has been shared through a [`RuleSet`] can no longer change.
pub trait RuleExt: Rule + Sized {
    /// Mutable access to the settings, used by the provided methods.
    fn settings_mut(&mut self) -> &mut RuleSettings;

    /// Skips the rule when the value is empty.
    #[must_use = "builder methods must be chained or built"]
    fn skip_on_empty(mut self, value: bool) -> Self {
        self.settings_mut().skip_on_empty = value;
        self
    }

    /// Skips the rule when a previous rule on the same target failed.
    #[must_use = "builder methods must be chained or built"]
    fn skip_on_error(mut self, value: bool) -> Self {
        self.settings_mut().skip_on_error = value;
        self
    }

    /// Runs the rule only when `predicate` returns `true`.
    #[must_use = "builder methods must be chained or built"]
    fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.settings_mut().when = Some(Arc::new(predicate));
        self
    }

    /// Wraps the rule for sharing.
    fn shared(self) -> Arc<dyn Rule> {
        Arc::new(self)
    }
}

// ============================================================================
// RULE SET
// ============================================================================

/// Ordered list of rules applied to one value.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, rule: impl Rule) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Appends a rule in place.
    pub fn push(&mut self, rule: impl Rule) {
        self.rules.push(Arc::new(rule));
    }

    /// Appends an already shared rule.
    pub fn push_shared(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Iterates the rules in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn Rule>> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<R: Rule> From<R> for RuleSet {
    fn from(rule: R) -> Self {
        Self {
            rules: vec![Arc::new(rule)],
        }
    }
}

impl From<Arc<dyn Rule>> for RuleSet {
    fn from(rule: Arc<dyn Rule>) -> Self {
        Self { rules: vec![rule] }
    }
}

impl From<Vec<Arc<dyn Rule>>> for RuleSet {
    fn from(rules: Vec<Arc<dyn Rule>>) -> Self {
        Self { rules }
    }
}

impl FromIterator<Arc<dyn Rule>> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Rule>>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Arc<dyn Rule>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Rule>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

// ============================================================================
// RULE HANDLER
// ============================================================================

/// Evaluates one rule type.
///
/// Handlers are stateless: the same value and rule parameters always yield
/// the same result. Container rules use the [`Evaluator`] to recurse.
pub trait RuleHandler: Send + Sync + 'static {
    /// The rule type this handler evaluates.
    type Rule: Rule;

    /// Evaluates `rule` against `value`.
    fn handle(
        &self,
        value: &Value,
        rule: &Self::Rule,
        evaluator: &Evaluator<'_>,
        context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Probe {
        settings: RuleSettings,
    }

    impl Rule for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn settings(&self) -> &RuleSettings {
            &self.settings
        }
    }

    impl RuleExt for Probe {
        fn settings_mut(&mut self) -> &mut RuleSettings {
            &mut self.settings
        }
    }

    #[test]
    fn modifiers_return_new_values() {
        let rule = Probe::default().skip_on_empty(true).skip_on_error(true);
        assert!(rule.settings().skip_on_empty());
        assert!(rule.settings().skip_on_error());
        assert!(rule.settings().when().is_none());
    }

    #[test]
    fn when_predicate_is_stored() {
        let rule = Probe::default().when(|value, _| value.is_string());
        let data = Value::Null;
        let ctx = ValidationContext::new(&data);
        let when = rule.settings().when().expect("predicate set");
        assert!(when(&Value::String("x".into()), &ctx));
        assert!(!when(&Value::Null, &ctx));
    }

    #[test]
    fn single_rule_converts_to_rule_set() {
        let set = RuleSet::from(Probe::default());
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(|r| r.name()), Some("probe"));
    }

    #[test]
    fn settings_options_are_camel_case() {
        let options = Probe::default().skip_on_error(true).settings().options();
        assert_eq!(options["skipOnEmpty"], Value::Bool(false));
        assert_eq!(options["skipOnError"], Value::Bool(true));
    }
}
