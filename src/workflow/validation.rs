//! Field-level validation of phase payloads against the phase table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Phase, PhaseConfig, PhaseData, ValidationRule};

/// Field name to user-facing error message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: FieldErrors,
}

impl ValidationResult {
    fn from_errors(errors: FieldErrors) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate `data` against the configuration of `phase`.
///
/// Each field reports at most one message. A field that fails its required
/// check is not rule-checked; otherwise rules run in the order min length,
/// max length, min, max, min count, max count and the first violation wins.
pub fn validate_phase_data(phase: Phase, data: &PhaseData) -> ValidationResult {
    let config = PhaseConfig::for_phase(phase);
    let mut errors = FieldErrors::new();

    for field in config.required_fields {
        if is_missing(data.get(*field)) {
            errors.insert(field.to_string(), format!("{} is required", label(field)));
        }
    }

    for (field, rule) in config.validations {
        if errors.contains_key(*field) {
            continue;
        }
        let Some(value) = data.get(*field) else {
            continue;
        };
        if let Some(message) = check_rule(field, rule, value) {
            errors.insert(field.to_string(), message);
        }
    }

    ValidationResult::from_errors(errors)
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn check_rule(field: &str, rule: &ValidationRule, value: &Value) -> Option<String> {
    let name = label(field);
    match value {
        Value::String(s) => {
            let len = s.chars().count();
            if let Some(min) = rule.min_length.filter(|min| len < *min) {
                return Some(format!("{} must be at least {} characters", name, min));
            }
            if let Some(max) = rule.max_length.filter(|max| len > *max) {
                return Some(format!("{} must be no more than {} characters", name, max));
            }
        }
        Value::Number(n) => {
            let n = n.as_f64()?;
            if let Some(min) = rule.min.filter(|min| n < *min) {
                return Some(format!("{} must be at least {}", name, min));
            }
            if let Some(max) = rule.max.filter(|max| n > *max) {
                return Some(format!("{} must be no more than {}", name, max));
            }
        }
        Value::Array(items) => {
            let count = items.len();
            if let Some(min) = rule.min_count.filter(|min| count < *min) {
                return Some(format!("{} must contain at least {} items", name, min));
            }
            if let Some(max) = rule.max_count.filter(|max| count > *max) {
                return Some(format!("{} must contain no more than {} items", name, max));
            }
        }
        _ => {}
    }
    None
}

/// `targetAudience` -> `Target audience`
fn label(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.extend(c.to_lowercase());
        } else if c == '_' {
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}
