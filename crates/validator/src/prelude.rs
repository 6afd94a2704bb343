//! Prelude module for convenient imports.
//!
//! Provides a single `use vigil_validator::prelude::*;` import that brings
//! in the validator, the rule traits, every built-in rule and the
//! declaration macros.
//!
//! # Examples
//!
//! ```
//! use vigil_validator::prelude::*;
//!
//! let rules = rule_map! {
//!     "email" => rules![Required::new(), Regex::new(r"^\S+@\S+$").unwrap()],
//! };
//! let validator = Validator::new();
//! # let _ = (rules, validator);
//! ```

// ============================================================================
// FOUNDATION: Core traits, errors, data
// ============================================================================

pub use crate::foundation::{
    AttributeKey, ConfigError, DataSet, MessageFormatter, Rule, RuleError, RuleExt, RuleHandler,
    RuleMap, RuleOptions, RuleSet, RuleSettings, SelfDescribing, SimpleFormatter,
    ValidationContext, ValidationResult,
};

// ============================================================================
// ENGINE: Orchestration and dumping
// ============================================================================

pub use crate::engine::{
    Evaluator, RuleDispatcher, RulesDumper, UnparametrizedPolicy, Validator, ValidatorBuilder,
    dump_rules,
};

// ============================================================================
// RULES: All built-in rules
// ============================================================================

pub use crate::rules::{
    Boolean, Callback, CompareOperator, CompareTo, CompareType, Each, Group, HasLength, InRange,
    Nested, Number, Regex, Required, Subset,
};

// ============================================================================
// MACROS
// ============================================================================

pub use crate::{rule_map, rules};
