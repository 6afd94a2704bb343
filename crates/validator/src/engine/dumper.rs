//! Serializes rule maps into plain JSON for client-side consumers.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::trace;

use crate::foundation::{
    ConfigError, MessageFormatter, Rule, RuleMap, RuleSet, SimpleFormatter,
};

/// What to do with a rule that exposes no options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnparametrizedPolicy {
    /// Leave the rule out of the dump.
    #[default]
    Skip,
    /// Fail with [`ConfigError::NotParametrized`].
    Reject,
}

/// Dumps rule maps to JSON.
///
/// The output is an object keyed by attribute or path. Each value is an
/// array with one entry per rule: `[name, {options}]`, or `[{options}]` when
/// rule names are excluded. Container rules dump their inner rules under a
/// `rules` option with the same policy.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vigil_validator::prelude::*;
///
/// let rules = rule_map! { "age" => Number::new().min(18) };
/// let dump = RulesDumper::new().dump(&rules).unwrap();
///
/// assert_eq!(dump["age"][0][0], json!("number"));
/// assert_eq!(dump["age"][0][1]["min"], json!(18));
/// assert_eq!(dump["age"][0][1]["tooSmallMessage"], json!("Value must be no less than 18."));
/// ```
#[derive(Clone)]
pub struct RulesDumper {
    include_rule_name: bool,
    unparametrized: UnparametrizedPolicy,
    formatter: Arc<dyn MessageFormatter>,
}

impl RulesDumper {
    /// Creates a dumper that includes rule names and skips rules without
    /// options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_rule_name: true,
            unparametrized: UnparametrizedPolicy::Skip,
            formatter: Arc::new(SimpleFormatter),
        }
    }

    /// Sets whether each entry starts with the rule name.
    #[must_use = "builder methods must be chained or built"]
    pub fn include_rule_name(mut self, include: bool) -> Self {
        self.include_rule_name = include;
        self
    }

    /// Sets the handling of rules without options.
    #[must_use = "builder methods must be chained or built"]
    pub fn unparametrized(mut self, policy: UnparametrizedPolicy) -> Self {
        self.unparametrized = policy;
        self
    }

    /// Replaces the formatter used for static message parameters.
    #[must_use = "builder methods must be chained or built"]
    pub fn formatter(mut self, formatter: impl MessageFormatter + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Dumps a whole rule map.
    pub fn dump(&self, rules: &RuleMap) -> Result<Value, ConfigError> {
        let mut out = Map::with_capacity(rules.len());
        for (key, rule_set) in rules {
            out.insert(key.to_string(), self.dump_rule_set(rule_set)?);
        }
        Ok(Value::Object(out))
    }

    /// Dumps one rule set as an array of entries.
    pub fn dump_rule_set(&self, rules: &RuleSet) -> Result<Value, ConfigError> {
        let mut entries = Vec::with_capacity(rules.len());
        for rule in rules {
            if let Some(entry) = self.dump_rule(rule.as_ref())? {
                entries.push(entry);
            }
        }
        Ok(Value::Array(entries))
    }

    /// Dumps one rule; `None` when the rule was skipped.
    pub fn dump_rule(&self, rule: &dyn Rule) -> Result<Option<Value>, ConfigError> {
        let Some(options) = rule.options(self)? else {
            return match self.unparametrized {
                UnparametrizedPolicy::Skip => {
                    trace!(rule = rule.name(), "rule has no options, skipped from dump");
                    Ok(None)
                }
                UnparametrizedPolicy::Reject => Err(ConfigError::NotParametrized {
                    rule: rule.name().to_owned(),
                }),
            };
        };

        let entry = if self.include_rule_name {
            vec![Value::String(rule.name().to_owned()), Value::Object(options)]
        } else {
            vec![Value::Object(options)]
        };
        Ok(Some(Value::Array(entry)))
    }

    /// Formats a message template with the parameters known when the rule was
    /// built. Placeholders for runtime values are kept.
    pub fn message(&self, template: &str, params: &[(Cow<'static, str>, Value)]) -> Value {
        Value::String(self.formatter.format(template, params))
    }
}

impl Default for RulesDumper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RulesDumper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RulesDumper")
            .field("include_rule_name", &self.include_rule_name)
            .field("unparametrized", &self.unparametrized)
            .finish_non_exhaustive()
    }
}

/// Dumps `rules` with the default policy.
pub fn dump_rules(rules: &RuleMap, include_rule_name: bool) -> Result<Value, ConfigError> {
    RulesDumper::new()
        .include_rule_name(include_rule_name)
        .dump(rules)
}
