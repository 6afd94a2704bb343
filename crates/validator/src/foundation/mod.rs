//! Core validation types and traits
//!
//! This module contains the fundamental building blocks of the rule system:
//!
//! - **Rules**: [`Rule`], [`RuleExt`], [`RuleSet`], [`RuleMap`], [`RuleHandler`]
//! - **Data**: [`DataSet`], [`SelfDescribing`], [`AttributeKey`]
//! - **Outcome**: [`RuleError`], [`ValidationResult`], [`ConfigError`]
//! - **State**: [`ValidationContext`], [`AttributeSource`]
//! - **Messages**: [`MessageFormatter`], [`SimpleFormatter`]
//!
//! # Architecture
//!
//! ## 1. Rules are data
//!
//! A rule only describes what to check. It is immutable once placed into a
//! [`RuleSet`]; guard conditions are set through the consuming builder methods
//! of [`RuleExt`].
//!
//! ## 2. Handlers are behaviour
//!
//! Every rule type has a [`RuleHandler`], registered with the
//! [`RuleDispatcher`](crate::engine::RuleDispatcher) by the rule's `TypeId`.
//! Third-party rules plug in the same way the built-in ones do.
//!
//! ## 3. Two error categories
//!
//! [`RuleError`]s are collected; [`ConfigError`]s abort. A broken rule
//! configuration is never reported as invalid data.

pub mod context;
pub mod data_set;
pub mod error;
pub mod key;
pub mod message;
pub mod result;
pub mod traits;
pub mod value;

pub use context::{AttributeSource, ValidationContext};
pub use data_set::{DataSet, SelfDescribing};
pub use error::{ConfigError, ErrorParams, RuleError};
pub use key::AttributeKey;
pub use message::{MessageFormatter, SimpleFormatter};
pub use result::ValidationResult;
pub use traits::{Rule, RuleExt, RuleHandler, RuleMap, RuleOptions, RuleSet, RuleSettings, WhenFn};
