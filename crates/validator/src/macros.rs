//! Macros for declaring rule sets with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`rules!`] - Build a [`RuleSet`](crate::foundation::RuleSet) from rules
//!   and `fn(closure)` callbacks
//! - [`rule_map!`] - Build a [`RuleMap`](crate::foundation::RuleMap) from
//!   `key => rules` pairs
//!
//! # Examples
//!
//! ```
//! use vigil_validator::prelude::*;
//!
//! let rules = rule_map! {
//!     "name" => rules![Required::new(), HasLength::new().max(50)],
//!     "author.age" => Number::new().min(18),
//!     0usize => Required::new(),
//! };
//!
//! assert_eq!(rules.len(), 3);
//! assert_eq!(rules[0].len(), 2);
//! ```

// ============================================================================
// RULES MACRO
// ============================================================================

/// Builds a [`RuleSet`](crate::foundation::RuleSet), keeping the given order.
///
/// An item written as `fn(closure)` is wrapped into a
/// [`Callback`](crate::rules::Callback) rule.
///
/// ```
/// use serde_json::json;
/// use vigil_validator::prelude::*;
///
/// let set = rules![Required::new(), Number::new().min(1)];
/// assert_eq!(set.len(), 2);
/// assert!(rules![].is_empty());
///
/// let set = rules![
///     Required::new(),
///     fn(|value, _| {
///         let mut result = ValidationResult::new();
///         if value != &json!(42) {
///             result.add_error(RuleError::new("Value should be 42!"));
///         }
///         result
///     }),
/// ];
/// let result = Validator::new().validate_value(&json!(41), &set).unwrap();
/// assert_eq!(result.error_messages(), ["Value should be 42!"]);
/// ```
#[macro_export]
macro_rules! rules {
    () => {
        $crate::foundation::RuleSet::new()
    };
    ($($items:tt)+) => {
        $crate::__rules_push!($crate::foundation::RuleSet::new(); $($items)+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __rules_push {
    ($set:expr;) => {
        $set
    };
    ($set:expr; fn($callback:expr) $(, $($rest:tt)*)?) => {
        $crate::__rules_push!(
            $set.with($crate::rules::Callback::new($callback));
            $($($rest)*)?
        )
    };
    ($set:expr; $rule:expr $(, $($rest:tt)*)?) => {
        $crate::__rules_push!($set.with($rule); $($($rest)*)?)
    };
}

// ============================================================================
// RULE MAP MACRO
// ============================================================================

/// Builds a [`RuleMap`](crate::foundation::RuleMap) in insertion order.
///
/// Keys convert into [`AttributeKey`](crate::foundation::AttributeKey)
/// (`&'static str`, `String` or `usize`); values convert into a
/// [`RuleSet`](crate::foundation::RuleSet) (a single rule or a rule set).
#[macro_export]
macro_rules! rule_map {
    () => {
        $crate::foundation::RuleMap::new()
    };
    ($($key:expr => $rules:expr),+ $(,)?) => {{
        let mut map = $crate::foundation::RuleMap::new();
        $(
            map.insert(
                $crate::foundation::AttributeKey::from($key),
                $crate::foundation::RuleSet::from($rules),
            );
        )+
        map
    }};
}

// ============================================================================
// INTERNAL
// ============================================================================

/// Implements [`RuleExt`](crate::foundation::RuleExt) for rules that keep
/// their guard conditions in a `settings` field.
macro_rules! impl_rule_ext {
    ($($rule:ty),+ $(,)?) => {
        $(
            impl $crate::foundation::RuleExt for $rule {
                fn settings_mut(&mut self) -> &mut $crate::foundation::RuleSettings {
                    &mut self.settings
                }
            }
        )+
    };
}

pub(crate) use impl_rule_ext;
