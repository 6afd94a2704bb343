//! Sources of attribute values.

use std::fmt;

use serde_json::Value;

use crate::foundation::context::AttributeSource;
use crate::foundation::result::ValidationResult;
use crate::foundation::traits::RuleMap;
use crate::foundation::value;

/// A payload that carries its own rules.
///
/// Typical implementors are form or request objects. When validated, their
/// [`rules`](Self::rules) replace whatever rules the caller passed, and
/// [`process_validation_result`](Self::process_validation_result) is called
/// once with the final result.
pub trait SelfDescribing {
    /// The raw payload.
    fn data(&self) -> &Value;

    /// Value of one attribute, `null` when absent.
    fn attribute_value(&self, name: &str) -> &Value {
        value::lookup(self.data(), name).unwrap_or(value::null())
    }

    /// Rules the payload should be validated with.
    fn rules(&self) -> RuleMap;

    /// Receives the final result of a validation pass.
    fn process_validation_result(&mut self, _result: &ValidationResult) {}
}

/// Normalized view over the data handed to the
/// [`Validator`](crate::engine::Validator).
///
/// The variant is chosen once, at conversion time.
pub enum DataSet<'a> {
    /// Object or array; attributes are keys or indices.
    Mapping(&'a Value),
    /// A single value; every attribute resolves to the value itself.
    Scalar(&'a Value),
    /// A payload with its own rules and post-validation hook.
    SelfDescribing(&'a mut (dyn SelfDescribing + 'a)),
}

impl DataSet<'_> {
    /// The whole payload.
    #[must_use]
    pub fn data(&self) -> &Value {
        match self {
            Self::Mapping(data) | Self::Scalar(data) => data,
            Self::SelfDescribing(source) => source.data(),
        }
    }

    /// Value of one attribute, `null` when absent.
    #[must_use]
    pub fn attribute_value(&self, name: &str) -> &Value {
        match self {
            Self::Mapping(data) => value::lookup(data, name).unwrap_or(value::null()),
            Self::Scalar(data) => data,
            Self::SelfDescribing(source) => source.attribute_value(name),
        }
    }

    /// Rules supplied by the data itself, if any.
    #[must_use]
    pub fn own_rules(&self) -> Option<RuleMap> {
        match self {
            Self::SelfDescribing(source) => Some(source.rules()),
            Self::Mapping(_) | Self::Scalar(_) => None,
        }
    }

    /// Hands the final result to a self-describing source.
    pub fn process_validation_result(&mut self, result: &ValidationResult) {
        if let Self::SelfDescribing(source) = self {
            source.process_validation_result(result);
        }
    }
}

impl AttributeSource for DataSet<'_> {
    /// Sibling lookups for rules. Mappings accept dotted paths.
    fn attribute_value(&self, name: &str) -> &Value {
        match self {
            Self::Mapping(data) => {
                let segments: Vec<&str> = name.split('.').collect();
                value::resolve_path(data, &segments).unwrap_or(value::null())
            }
            Self::Scalar(data) => data,
            Self::SelfDescribing(source) => source.attribute_value(name),
        }
    }
}

impl<'a> From<&'a Value> for DataSet<'a> {
    fn from(data: &'a Value) -> Self {
        match data {
            Value::Object(_) | Value::Array(_) => Self::Mapping(data),
            _ => Self::Scalar(data),
        }
    }
}

impl<'a, T> From<&'a mut T> for DataSet<'a>
where
    T: SelfDescribing + 'a,
{
    fn from(source: &'a mut T) -> Self {
        Self::SelfDescribing(source)
    }
}

impl fmt::Debug for DataSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapping(data) => f.debug_tuple("Mapping").field(data).finish(),
            Self::Scalar(data) => f.debug_tuple("Scalar").field(data).finish(),
            Self::SelfDescribing(source) => {
                f.debug_tuple("SelfDescribing").field(source.data()).finish()
            }
        }
    }
}
