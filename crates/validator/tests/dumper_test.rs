//! Rule map dumps consumed by client-side validators.

use pretty_assertions::assert_eq;
use serde_json::json;
use vigil_validator::prelude::*;

fn registration_rules() -> RuleMap {
    rule_map! {
        "name" => rules![Required::new(), HasLength::new().min(2).skip_on_error(true)],
        "age" => Number::integer().min(18),
        "tags" => Each::new(HasLength::new().max(10)).unwrap(),
        "address" => Nested::new(rule_map! {
            "zip" => Regex::new(r"^\d{5}$").unwrap(),
        })
        .unwrap(),
    }
}

#[test]
fn dumps_names_and_static_options() {
    let dump = dump_rules(&registration_rules(), true).unwrap();

    assert_eq!(
        dump,
        json!({
            "name": [
                ["required", {
                    "message": "Value cannot be blank.",
                    "skipOnEmpty": false,
                    "skipOnError": false,
                }],
                ["hasLength", {
                    "min": 2,
                    "max": null,
                    "message": "This value must be a string.",
                    "tooShortMessage": "This value should contain at least 2 characters.",
                    "tooLongMessage": "This value should contain at most {max} characters.",
                    "skipOnEmpty": false,
                    "skipOnError": true,
                }],
            ],
            "age": [
                ["number", {
                    "asInteger": true,
                    "min": 18,
                    "max": null,
                    "notNumberMessage": "Value must be an integer.",
                    "tooSmallMessage": "Value must be no less than 18.",
                    "tooBigMessage": "Value must be no greater than {max}.",
                    "skipOnEmpty": false,
                    "skipOnError": false,
                }],
            ],
            "tags": [
                ["each", {
                    "rules": [
                        ["hasLength", {
                            "min": null,
                            "max": 10,
                            "message": "This value must be a string.",
                            "tooShortMessage": "This value should contain at least {min} characters.",
                            "tooLongMessage": "This value should contain at most 10 characters.",
                            "skipOnEmpty": false,
                            "skipOnError": false,
                        }],
                    ],
                    "incorrectInputMessage": "Value must be array or iterable.",
                    "skipOnEmpty": false,
                    "skipOnError": false,
                }],
            ],
            "address": [
                ["nested", {
                    "rules": {
                        "zip": [
                            ["regex", {
                                "pattern": r"^\d{5}$",
                                "not": false,
                                "message": "Value is invalid.",
                                "incorrectInputMessage": "Value should be string.",
                                "skipOnEmpty": false,
                                "skipOnError": false,
                            }],
                        ],
                    },
                    "errorWhenPropertyPathIsNotFound": false,
                    "propertyPathIsNotFoundMessage": r#"Property path "{path}" is not found."#,
                    "incorrectInputMessage": "Value should be an array or an object. {type} given.",
                    "skipOnEmpty": false,
                    "skipOnError": false,
                }],
            ],
        })
    );
}

#[test]
fn name_policy_applies_to_nested_dumps() {
    let dump = dump_rules(&registration_rules(), false).unwrap();

    let nested = &dump["address"][0];
    assert_eq!(nested.as_array().map(Vec::len), Some(1));
    let inner = &nested[0]["rules"]["zip"][0];
    assert_eq!(inner.as_array().map(Vec::len), Some(1));
    assert_eq!(inner[0]["pattern"], json!(r"^\d{5}$"));
}

#[test]
fn keys_keep_configuration_order() {
    let dump = dump_rules(&registration_rules(), true).unwrap();
    let keys: Vec<&str> = dump
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["name", "age", "tags", "address"]);
}

#[test]
fn callbacks_are_skipped_or_rejected() {
    let rules = rule_map! {
        "n" => rules![Required::new(), Callback::new(|_, _| ValidationResult::new())],
    };

    let dump = RulesDumper::new().dump(&rules).unwrap();
    assert_eq!(dump["n"].as_array().map(Vec::len), Some(1));

    let err = RulesDumper::new()
        .unparametrized(UnparametrizedPolicy::Reject)
        .dump(&rules)
        .unwrap_err();
    assert_eq!(err, ConfigError::NotParametrized { rule: "callback".into() });
}

#[test]
fn dumping_has_no_side_effects_on_validation() {
    let rules = registration_rules();
    let data = json!({"name": "A", "age": 20, "tags": [], "address": {"zip": "1234"}});
    let validator = Validator::new();

    let before = validator.validate(&data, &rules).unwrap();
    dump_rules(&rules, true).unwrap();
    let after = validator.validate(&data, &rules).unwrap();

    assert_eq!(before, after);
    assert_eq!(before.len(), 2);
}
