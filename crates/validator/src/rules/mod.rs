//! Built-in rules.
//!
//! Every rule comes with a stateless handler registered by
//! [`RuleDispatcher::with_builtin_rules`].
//!
//! ## Leaf rules
//!
//! - [`Required`] - value is not empty
//! - [`Number`] - numeric value within bounds
//! - [`HasLength`] - string length within bounds
//! - [`Regex`] - string matches a pattern
//! - [`Boolean`] - boolean-like value
//! - [`CompareTo`] - comparison with a constant or another attribute
//! - [`InRange`], [`Subset`] - membership in a fixed list
//! - [`Callback`] - arbitrary closure
//!
//! ## Container rules
//!
//! - [`Nested`] - rule sets for paths inside a structure
//! - [`Each`] - one rule set for every element
//! - [`Group`] - a rule set reported as a single error

mod boolean;
mod callback;
mod compare;
mod each;
mod group;
mod in_range;
mod length;
mod nested;
mod number;
mod pattern;
mod required;

pub use boolean::{Boolean, BooleanHandler};
pub use callback::{Callback, CallbackFn, CallbackHandler};
pub use compare::{CompareOperator, CompareTo, CompareToHandler, CompareType};
pub use each::{Each, EachHandler};
pub use group::{Group, GroupHandler};
pub use in_range::{InRange, InRangeHandler, Subset, SubsetHandler};
pub use length::{HasLength, HasLengthHandler};
pub use nested::{Nested, NestedHandler};
pub use number::{Number, NumberHandler};
pub use pattern::{Regex, RegexHandler};
pub use required::{Required, RequiredHandler};

use crate::engine::RuleDispatcher;

pub(crate) fn register_builtin(dispatcher: &mut RuleDispatcher) {
    dispatcher
        .register::<RequiredHandler>()
        .register::<NumberHandler>()
        .register::<HasLengthHandler>()
        .register::<RegexHandler>()
        .register::<BooleanHandler>()
        .register::<CompareToHandler>()
        .register::<InRangeHandler>()
        .register::<SubsetHandler>()
        .register::<CallbackHandler>()
        .register::<NestedHandler>()
        .register::<EachHandler>()
        .register::<GroupHandler>();
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::Value;

    use crate::engine::{Evaluator, RuleDispatcher};
    use crate::foundation::{RuleHandler, ValidationContext, ValidationResult, value};

    /// Runs `handler` directly, with every built-in registered for recursion.
    pub(crate) fn run<H: RuleHandler>(handler: &H, rule: &H::Rule, data: &Value) -> ValidationResult {
        let dispatcher = RuleDispatcher::with_builtin_rules();
        let evaluator = Evaluator::new(&dispatcher, &value::is_empty);
        let context = ValidationContext::new(data);
        handler
            .handle(data, rule, &evaluator, &context)
            .expect("rule configuration is valid")
    }
}
