//! Built-in rule specs and their English default messages.

use crate::validation::rules::{Directive, MessageTemplate, ValidationRuleSpec};
use crate::validation::Value;

pub(crate) fn default_rules() -> Vec<ValidationRuleSpec> {
    vec![
        ValidationRuleSpec::new("exact_length")
            .with_params(&["exact"])
            .with_default("is not %{exact} characters"),
        ValidationRuleSpec::new("format")
            .with_params(&["with"])
            .with_default("is invalid"),
        ValidationRuleSpec::new("includes")
            .with_params(&["set"])
            .with_default("is not in range or set: %{set}"),
        ValidationRuleSpec::new("integer").with_default("is not a number"),
        ValidationRuleSpec::new("length_range")
            .with_params(&["range"])
            .with_default("is too short or too long"),
        // A nil value is reported as absent under the `.nil` key suffix.
        ValidationRuleSpec::new("max_length")
            .with_params(&["max", "value"])
            .with_template(MessageTemplate::directive(|args| match args.get("value") {
                Some(Value::Nil) => Directive {
                    default: "is not present".to_string(),
                    suffix: Some("nil".to_string()),
                },
                _ => Directive {
                    default: format!("is longer than {} characters", args.text("max")),
                    suffix: None,
                },
            })),
        ValidationRuleSpec::new("max_value")
            .with_params(&["max"])
            .with_default("is greater than maximum allowed value"),
        ValidationRuleSpec::new("min_length")
            .with_params(&["min"])
            .with_default("is shorter than %{min} characters"),
        ValidationRuleSpec::new("min_value")
            .with_params(&["min"])
            .with_default("is less than minimum allowed value"),
        ValidationRuleSpec::new("no_null_byte").with_default("contains a null byte"),
        ValidationRuleSpec::new("not_null").with_default("is not present"),
        ValidationRuleSpec::new("numeric").with_default("is not a number"),
        ValidationRuleSpec::new("operator")
            .with_params(&["op", "rhs"])
            .with_default("is not %{op} %{rhs}"),
        ValidationRuleSpec::new("presence").with_default("is not present"),
        // One expected type reads "a valid integer"; several join with "or".
        ValidationRuleSpec::new("type")
            .with_params(&["type"])
            .with_template(MessageTemplate::directive(|args| match args.get("type") {
                Some(Value::List(types)) if types.len() > 1 => {
                    let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
                    Directive {
                        default: format!("is not a valid {}", names.join(" or ")),
                        suffix: Some("multiple".to_string()),
                    }
                }
                other => Directive {
                    default: format!(
                        "is not a valid {}",
                        other.map(|t| t.to_string()).unwrap_or_default()
                    ),
                    suffix: Some("singular".to_string()),
                },
            })),
        ValidationRuleSpec::new("unique")
            .with_params(&["columns"])
            .with_default("is already taken"),
    ]
}
