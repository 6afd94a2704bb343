//! Membership checks against a fixed list of values.

use std::borrow::Cow;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleOptions, RuleSettings, ValidationContext,
    ValidationResult, value,
};
use crate::macros::impl_rule_ext;

fn contains(haystack: &[Value], needle: &Value, strict: bool) -> bool {
    haystack.iter().any(|candidate| {
        if strict {
            candidate == needle
        } else {
            value::loose_eq(candidate, needle)
        }
    })
}

/// Quoted, comma separated list used in messages.
fn quoted_list(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", value::display(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// IN RANGE
// ============================================================================

/// Checks that the value is one of a list.
#[derive(Debug, Clone)]
pub struct InRange {
    range: Vec<Value>,
    strict: bool,
    not: bool,
    message: Cow<'static, str>,
    settings: RuleSettings,
}

impl InRange {
    /// Accepts any of `range`.
    #[must_use]
    pub fn new<I, V>(range: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            range: range.into_iter().map(Into::into).collect(),
            strict: false,
            not: false,
            message: Cow::Borrowed("This value is invalid."),
            settings: RuleSettings::default(),
        }
    }

    /// Requires type and value to match exactly.
    #[must_use = "builder methods must be chained or built"]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Inverts the check: the value must not be in the list.
    #[must_use = "builder methods must be chained or built"]
    pub fn not(mut self) -> Self {
        self.not = true;
        self
    }

    /// Overrides the message.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl Rule for InRange {
    fn name(&self) -> &str {
        "inRange"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let mut options = RuleOptions::new();
        options.insert("range".into(), Value::Array(self.range.clone()));
        options.insert("strict".into(), Value::Bool(self.strict));
        options.insert("not".into(), Value::Bool(self.not));
        options.insert("message".into(), dumper.message(&self.message, &[]));
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

/// Handler for [`InRange`].
#[derive(Debug, Default, Clone, Copy)]
pub struct InRangeHandler;

impl RuleHandler for InRangeHandler {
    type Rule = InRange;

    fn handle(
        &self,
        value: &Value,
        rule: &InRange,
        _evaluator: &Evaluator<'_>,
        _context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();
        if contains(&rule.range, value, rule.strict) == rule.not {
            result.add_error(RuleError::new(rule.message.clone()));
        }
        Ok(result)
    }
}

// ============================================================================
// SUBSET
// ============================================================================

/// Checks that every element of an array belongs to a list.
#[derive(Debug, Clone)]
pub struct Subset {
    values: Vec<Value>,
    strict: bool,
    iterable_message: Cow<'static, str>,
    subset_message: Cow<'static, str>,
    settings: RuleSettings,
}

impl Subset {
    /// Accepts arrays whose elements are all in `values`.
    #[must_use]
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            strict: false,
            iterable_message: Cow::Borrowed("Value must be iterable."),
            subset_message: Cow::Borrowed("Values must be ordered subset of {values}."),
            settings: RuleSettings::default(),
        }
    }

    /// Requires type and value to match exactly.
    #[must_use = "builder methods must be chained or built"]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Message for values that are not arrays.
    #[must_use = "builder methods must be chained or built"]
    pub fn iterable_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.iterable_message = message.into();
        self
    }

    /// Message for arrays with foreign elements. `{values}` is available.
    #[must_use = "builder methods must be chained or built"]
    pub fn subset_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.subset_message = message.into();
        self
    }
}

impl Rule for Subset {
    fn name(&self) -> &str {
        "subset"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let params = [(Cow::Borrowed("values"), Value::String(quoted_list(&self.values)))];

        let mut options = RuleOptions::new();
        options.insert("values".into(), Value::Array(self.values.clone()));
        options.insert("strict".into(), Value::Bool(self.strict));
        options.insert(
            "iterableMessage".into(),
            dumper.message(&self.iterable_message, &[]),
        );
        options.insert(
            "subsetMessage".into(),
            dumper.message(&self.subset_message, &params),
        );
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

/// Handler for [`Subset`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SubsetHandler;

impl RuleHandler for SubsetHandler {
    type Rule = Subset;

    fn handle(
        &self,
        value: &Value,
        rule: &Subset,
        _evaluator: &Evaluator<'_>,
        _context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::new();

        let Some(items) = value.as_array() else {
            result.add_error(RuleError::new(rule.iterable_message.clone()));
            return Ok(result);
        };

        if !items.iter().all(|item| contains(&rule.values, item, rule.strict)) {
            result.add_error(
                RuleError::new(rule.subset_message.clone())
                    .with_param("values", quoted_list(&rule.values)),
            );
        }
        Ok(result)
    }
}

impl_rule_ext!(InRange, Subset);
