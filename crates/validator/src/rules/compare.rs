//! Comparison with a constant or with another attribute.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use crate::engine::{Evaluator, RulesDumper};
use crate::foundation::{
    ConfigError, Rule, RuleError, RuleHandler, RuleOptions, RuleSettings, ValidationContext,
    ValidationResult, value,
};
use crate::macros::impl_rule_ext;

/// Comparison operator of [`CompareTo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareOperator {
    /// `==`
    #[default]
    Equal,
    /// `===`
    StrictEqual,
    /// `!=`
    NotEqual,
    /// `!==`
    StrictNotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
}

impl CompareOperator {
    /// Operator symbol, as dumped.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::StrictEqual => "===",
            Self::NotEqual => "!=",
            Self::StrictNotEqual => "!==",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::Equal | Self::StrictEqual => r#"Value must be equal to "{value}"."#,
            Self::NotEqual | Self::StrictNotEqual => r#"Value must not be equal to "{value}"."#,
            Self::Greater => r#"Value must be greater than "{value}"."#,
            Self::GreaterOrEqual => r#"Value must be greater than or equal to "{value}"."#,
            Self::Less => r#"Value must be less than "{value}"."#,
            Self::LessOrEqual => r#"Value must be less than or equal to "{value}"."#,
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How operands are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareType {
    /// As strings, except that two numeric operands compare numerically.
    #[default]
    String,
    /// As numbers; non-numeric operands never satisfy the comparison.
    Number,
}

impl CompareType {
    fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Value(Value),
    Attribute(String),
}

/// Compares the value with a constant or with another attribute.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vigil_validator::prelude::*;
///
/// let rules = rule_map! {
///     "password" => Required::new(),
///     "confirm" => CompareTo::attribute("password"),
/// };
/// let data = json!({"password": "secret", "confirm": "secrte"});
///
/// let result = Validator::new().validate(&data, &rules).unwrap();
/// assert!(!result.is_attribute_valid("confirm"));
/// ```
#[derive(Debug, Clone)]
pub struct CompareTo {
    target: Target,
    operator: CompareOperator,
    compare_type: CompareType,
    message: Option<Cow<'static, str>>,
    settings: RuleSettings,
}

impl CompareTo {
    /// Compares with a constant.
    #[must_use]
    pub fn value(target: impl Into<Value>) -> Self {
        Self::with_target(Target::Value(target.into()))
    }

    /// Compares with another attribute of the validated payload.
    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::with_target(Target::Attribute(name.into()))
    }

    fn with_target(target: Target) -> Self {
        Self {
            target,
            operator: CompareOperator::default(),
            compare_type: CompareType::default(),
            message: None,
            settings: RuleSettings::default(),
        }
    }

    /// Sets the operator.
    #[must_use = "builder methods must be chained or built"]
    pub fn operator(mut self, operator: CompareOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Sets how operands are compared.
    #[must_use = "builder methods must be chained or built"]
    pub fn compare_type(mut self, compare_type: CompareType) -> Self {
        self.compare_type = compare_type;
        self
    }

    /// Overrides the operator's default message. `{value}` is available.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn message_template(&self) -> Cow<'static, str> {
        self.message
            .clone()
            .unwrap_or(Cow::Borrowed(self.operator.default_message()))
    }

    /// The target value, or the attribute name when comparing attributes.
    fn target_display(&self) -> Value {
        match &self.target {
            Target::Value(v) => v.clone(),
            Target::Attribute(name) => Value::String(name.clone()),
        }
    }

    fn holds(&self, left: &Value, right: &Value) -> bool {
        match self.compare_type {
            CompareType::String => self.holds_loosely(left, right),
            CompareType::Number => {
                match (value::as_number(left), value::as_number(right)) {
                    (Some(l), Some(r)) => self.satisfied_by(l.partial_cmp(&r)),
                    _ => false,
                }
            }
        }
    }

    fn holds_loosely(&self, left: &Value, right: &Value) -> bool {
        let strict_eq = || match (value::scalar_string(left), value::scalar_string(right)) {
            (Some(l), Some(r)) => l == r,
            _ => left == right,
        };
        match self.operator {
            CompareOperator::Equal => value::loose_eq(left, right),
            CompareOperator::NotEqual => !value::loose_eq(left, right),
            CompareOperator::StrictEqual => strict_eq(),
            CompareOperator::StrictNotEqual => !strict_eq(),
            _ => self.satisfied_by(value::loose_cmp(left, right)),
        }
    }

    fn satisfied_by(&self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self.operator {
            CompareOperator::Equal | CompareOperator::StrictEqual => ordering.is_eq(),
            CompareOperator::NotEqual | CompareOperator::StrictNotEqual => ordering.is_ne(),
            CompareOperator::Greater => ordering.is_gt(),
            CompareOperator::GreaterOrEqual => ordering.is_ge(),
            CompareOperator::Less => ordering.is_lt(),
            CompareOperator::LessOrEqual => ordering.is_le(),
        }
    }
}

impl Rule for CompareTo {
    fn name(&self) -> &str {
        "compareTo"
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn options(&self, dumper: &RulesDumper) -> Result<Option<RuleOptions>, ConfigError> {
        let (target_value, target_attribute) = match &self.target {
            Target::Value(v) => (v.clone(), Value::Null),
            Target::Attribute(name) => (Value::Null, Value::String(name.clone())),
        };
        let params = [(Cow::Borrowed("value"), self.target_display())];

        let mut options = RuleOptions::new();
        options.insert("targetValue".into(), target_value);
        options.insert("targetAttribute".into(), target_attribute);
        options.insert("operator".into(), Value::from(self.operator.as_str()));
        options.insert("type".into(), Value::from(self.compare_type.as_str()));
        options.insert(
            "message".into(),
            dumper.message(&self.message_template(), &params),
        );
        options.extend(self.settings.options());
        Ok(Some(options))
    }
}

impl_rule_ext!(CompareTo);

/// Handler for [`CompareTo`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CompareToHandler;

impl RuleHandler for CompareToHandler {
    type Rule = CompareTo;

    fn handle(
        &self,
        value: &Value,
        rule: &CompareTo,
        _evaluator: &Evaluator<'_>,
        context: &ValidationContext<'_>,
    ) -> Result<ValidationResult, ConfigError> {
        let target = match &rule.target {
            Target::Value(v) => v,
            Target::Attribute(name) => context.attribute_value(name),
        };

        let mut result = ValidationResult::new();
        if !rule.holds(value, target) {
            result.add_error(
                RuleError::new(rule.message_template()).with_param("value", rule.target_display()),
            );
        }
        Ok(result)
    }
}
