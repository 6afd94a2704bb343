//! Per-target evaluation state.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::foundation::value;

/// Resolves attribute names to values for a whole data set.
///
/// Implemented by [`DataSet`](crate::foundation::DataSet), so rules that read
/// other attributes see the same values the validator does.
pub trait AttributeSource: fmt::Debug {
    /// Value of one attribute, `null` when absent.
    fn attribute_value(&self, name: &str) -> &Value;
}

/// State threaded through the evaluation of one rule set.
///
/// A fresh context is created for every evaluation target: each top-level
/// attribute, each [`Nested`](crate::rules::Nested) path, each
/// [`Each`](crate::rules::Each) element. The "previous rule failed" flag
/// therefore never leaks from one target to another.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    data: &'a Value,
    source: Option<&'a (dyn AttributeSource + 'a)>,
    attribute: Option<Cow<'a, str>>,
    previous_rules_errored: bool,
}

impl<'a> ValidationContext<'a> {
    /// Creates a context rooted at `data`.
    #[must_use]
    pub fn new(data: &'a Value) -> Self {
        Self {
            data,
            source: None,
            attribute: None,
            previous_rules_errored: false,
        }
    }

    /// Sets the attribute currently being validated.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_attribute(mut self, attribute: impl Into<Cow<'a, str>>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Resolves [`attribute_value`](Self::attribute_value) through `source`
    /// instead of the raw payload.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_attribute_source(mut self, source: &'a (dyn AttributeSource + 'a)) -> Self {
        self.source = Some(source);
        self
    }

    /// Same target with the failure flag cleared.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self {
            previous_rules_errored: false,
            ..self.clone()
        }
    }

    /// Payload the context is rooted at.
    #[must_use]
    pub fn data(&self) -> &'a Value {
        self.data
    }

    /// Value of another attribute of the payload, `null` when absent.
    ///
    /// Goes through the attribute source when one is set. Otherwise dotted
    /// names descend into nested structures of the payload.
    #[must_use]
    pub fn attribute_value(&self, name: &str) -> &'a Value {
        if let Some(source) = self.source {
            return source.attribute_value(name);
        }
        let segments: Vec<&str> = name.split('.').collect();
        value::resolve_path(self.data, &segments).unwrap_or(value::null())
    }

    /// Attribute currently being validated.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Whether a previous rule on this target already failed.
    #[must_use]
    pub fn previous_rules_errored(&self) -> bool {
        self.previous_rules_errored
    }

    /// Records that a rule on this target failed.
    pub fn mark_previous_rules_errored(&mut self) {
        self.previous_rules_errored = true;
    }
}
