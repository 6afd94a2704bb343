//! # vigil-validator
//!
//! A declarative, rule-based validation engine for JSON-shaped data.
//!
//! Rules are attached to attributes of a payload; the [`Validator`](engine::Validator)
//! evaluates them and returns a [`ValidationResult`](foundation::ValidationResult)
//! describing which attributes failed which rules, each error carrying the
//! value path that led to it.
//!
//! ## Quick Start
//!
//! ```
//! use serde_json::json;
//! use vigil_validator::prelude::*;
//!
//! let rules = rule_map! {
//!     "title" => rules![Required::new(), HasLength::new().max(100)],
//!     "author" => Nested::new(rule_map! {
//!         "age" => Number::integer().min(18),
//!     })
//!     .unwrap(),
//! };
//!
//! let data = json!({"title": "Rust", "author": {"age": 16}});
//! let result = Validator::new().validate(&data, &rules).unwrap();
//!
//! assert!(result.is_attribute_valid("title"));
//! let error = &result.errors()[0];
//! assert_eq!(error.attribute(), Some("author"));
//! assert_eq!(error.value_path(), ["age"]);
//! assert_eq!(error.format(&SimpleFormatter), "Value must be no less than 18.");
//! ```
//!
//! ## Custom Rules
//!
//! Implement [`Rule`](foundation::Rule) for the declaration and
//! [`RuleHandler`](foundation::RuleHandler) for the behaviour, then register
//! the handler with [`ValidatorBuilder::register`](engine::ValidatorBuilder::register).
//!
//! ## Built-in Rules
//!
//! - **Leaf**: [`Required`](rules::Required), [`Number`](rules::Number),
//!   [`HasLength`](rules::HasLength), [`Regex`](rules::Regex),
//!   [`Boolean`](rules::Boolean), [`CompareTo`](rules::CompareTo),
//!   [`InRange`](rules::InRange), [`Subset`](rules::Subset),
//!   [`Callback`](rules::Callback)
//! - **Container**: [`Nested`](rules::Nested), [`Each`](rules::Each),
//!   [`Group`](rules::Group)
//!
//! ## Dumping
//!
//! [`RulesDumper`](engine::RulesDumper) serializes rule maps to JSON so that a
//! client can re-implement the same checks.

pub mod engine;
pub mod foundation;
mod macros;
pub mod prelude;
pub mod rules;
