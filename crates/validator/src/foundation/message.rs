//! Message interpolation.
//!
//! Errors keep the raw template and parameters; a presentation layer decides
//! when to render them through a [`MessageFormatter`].

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::foundation::value;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// Renders a message template with interpolation parameters.
pub trait MessageFormatter: Send + Sync {
    /// Formats `template`, substituting `params`.
    fn format(&self, template: &str, params: &[(Cow<'static, str>, Value)]) -> String;
}

/// Replaces `{name}` placeholders with parameter values.
///
/// Strings are inserted bare, other values as JSON. Placeholders without a
/// matching parameter are left untouched, so templates can be partially
/// rendered ahead of time.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
///
/// use serde_json::json;
/// use vigil_validator::foundation::{MessageFormatter, SimpleFormatter};
///
/// let params = [(Cow::Borrowed("min"), json!(3))];
/// let text = SimpleFormatter.format("At least {min}, got {actual}.", &params);
/// assert_eq!(text, "At least 3, got {actual}.");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFormatter;

impl MessageFormatter for SimpleFormatter {
    fn format(&self, template: &str, params: &[(Cow<'static, str>, Value)]) -> String {
        if params.is_empty() {
            return template.to_owned();
        }
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                params
                    .iter()
                    .find(|(k, _)| k == &caps[1])
                    .map_or_else(|| caps[0].to_owned(), |(_, v)| value::display(v))
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&'static str, Value)]) -> Vec<(Cow<'static, str>, Value)> {
        pairs
            .iter()
            .map(|(k, v)| (Cow::Borrowed(*k), v.clone()))
            .collect()
    }

    #[test]
    fn strings_are_inserted_bare() {
        let text = SimpleFormatter.format(
            "Property path \"{path}\" is not found.",
            &params(&[("path", json!("author.sex"))]),
        );
        assert_eq!(text, "Property path \"author.sex\" is not found.");
    }

    #[test]
    fn numbers_and_booleans_render_as_json() {
        let text = SimpleFormatter.format(
            "{min}..{max} strict={strict}",
            &params(&[("min", json!(1)), ("max", json!(2.5)), ("strict", json!(true))]),
        );
        assert_eq!(text, "1..2.5 strict=true");
    }

    #[test]
    fn unknown_placeholders_survive() {
        let text = SimpleFormatter.format("{a} {b}", &params(&[("a", json!("x"))]));
        assert_eq!(text, "x {b}");
    }

    #[test]
    fn no_params_returns_template() {
        assert_eq!(SimpleFormatter.format("{a}", &[]), "{a}");
    }
}
