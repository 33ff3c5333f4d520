//! Post-hoc validation of provider output against the result contract.
//!
//! Providers with native structured output should already honor the
//! contract, but the parsed body is validated regardless: presence, types,
//! enums, bounds and patterns. Integers are never coerced from floats.

use super::models::AnalysisResult;
use super::schema::{contract, SchemaNode};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// The provider's answer does not satisfy the result contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("Response body is empty")]
    EmptyBody,

    #[error("Response body is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Provider envelope could not be read: {0}")]
    Envelope(String),

    #[error("Missing required field '{0}'")]
    MissingField(String),

    #[error("Field '{path}' must be {expected}, got {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field '{path}' has value '{value}' which is not one of the allowed values")]
    NotAllowed { path: String, value: String },

    #[error("Field '{path}' is {value}, outside [{min}, {max}]")]
    OutOfRange {
        path: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Field '{path}' value '{value}' does not match {pattern}")]
    PatternMismatch {
        path: String,
        value: String,
        pattern: &'static str,
    },
}

lazy_static! {
    static ref PATTERNS: HashMap<&'static str, Regex> = {
        let mut patterns = HashMap::new();
        collect_patterns(contract(), &mut patterns);
        patterns
    };
}

fn collect_patterns(node: &SchemaNode, out: &mut HashMap<&'static str, Regex>) {
    match node {
        SchemaNode::Object { properties, .. } => {
            for property in properties {
                collect_patterns(&property.node, out);
            }
        }
        SchemaNode::String {
            pattern: Some(pattern),
            ..
        } => {
            // Patterns are compile-time constants covered by tests.
            if let Ok(regex) = Regex::new(pattern) {
                out.insert(*pattern, regex);
            }
        }
        _ => {}
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// Checks `value` against `node`. The first violation found is returned.
pub fn validate_node(node: &SchemaNode, value: &Value, path: &str) -> Result<(), ContractViolation> {
    let wrong_type = |expected: &'static str| ContractViolation::WrongType {
        path: path.to_string(),
        expected,
        found: json_type_name(value),
    };

    match node {
        SchemaNode::Object { properties, .. } => {
            let object = value.as_object().ok_or_else(|| wrong_type("an object"))?;
            for property in properties {
                let child_path = join_path(path, property.name);
                match object.get(property.name) {
                    None | Some(Value::Null) if property.required => {
                        return Err(ContractViolation::MissingField(child_path));
                    }
                    None | Some(Value::Null) => {}
                    Some(child) => validate_node(&property.node, child, &child_path)?,
                }
            }
            Ok(())
        }
        SchemaNode::String {
            allowed, pattern, ..
        } => {
            let text = value.as_str().ok_or_else(|| wrong_type("a string"))?;
            if let Some(allowed) = allowed {
                if !allowed.iter().any(|candidate| *candidate == text) {
                    return Err(ContractViolation::NotAllowed {
                        path: path.to_string(),
                        value: text.to_string(),
                    });
                }
            }
            if let Some(pattern) = pattern {
                let matches = PATTERNS
                    .get(pattern)
                    .map(|regex| regex.is_match(text))
                    .unwrap_or(false);
                if !matches {
                    return Err(ContractViolation::PatternMismatch {
                        path: path.to_string(),
                        value: text.to_string(),
                        pattern: *pattern,
                    });
                }
            }
            Ok(())
        }
        SchemaNode::Number {
            minimum, maximum, ..
        } => {
            let number = value.as_f64().ok_or_else(|| wrong_type("a number"))?;
            let below = minimum.map(|min| number < min).unwrap_or(false);
            let above = maximum.map(|max| number > max).unwrap_or(false);
            if below || above || !number.is_finite() {
                return Err(out_of_range(path, number, *minimum, *maximum));
            }
            Ok(())
        }
        SchemaNode::Integer {
            minimum, maximum, ..
        } => {
            let number = value.as_i64().ok_or_else(|| wrong_type("an integer"))?;
            let below = minimum.map(|min| number < min).unwrap_or(false);
            let above = maximum.map(|max| number > max).unwrap_or(false);
            if below || above {
                return Err(out_of_range(path, number, *minimum, *maximum));
            }
            Ok(())
        }
    }
}

fn out_of_range<T: ToString>(
    path: &str,
    value: T,
    min: Option<T>,
    max: Option<T>,
) -> ContractViolation {
    let bound = |b: Option<T>, unbounded: &str| {
        b.map(|b| b.to_string())
            .unwrap_or_else(|| unbounded.to_string())
    };
    ContractViolation::OutOfRange {
        path: path.to_string(),
        value: value.to_string(),
        min: bound(min, "-inf"),
        max: bound(max, "inf"),
    }
}

/// Removes a surrounding Markdown code fence (```json ... ```), which some
/// OpenAI-compatible backends add even in JSON mode.
fn strip_code_fence(body: &str) -> &str {
    let trimmed = body.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Validates an already parsed JSON value and converts it into a result.
pub fn validate_value(value: Value) -> Result<AnalysisResult, ContractViolation> {
    validate_node(contract(), &value, "")?;
    serde_json::from_value(value).map_err(|e| ContractViolation::MalformedJson(e.to_string()))
}

/// Parses the raw text the provider produced into a contract-conformant result.
pub fn parse_analysis(body: &str) -> Result<AnalysisResult, ContractViolation> {
    let body = strip_code_fence(body);
    if body.is_empty() {
        return Err(ContractViolation::EmptyBody);
    }
    let value: Value =
        serde_json::from_str(body).map_err(|e| ContractViolation::MalformedJson(e.to_string()))?;
    validate_value(value)
}
