//! Configuration validation against type descriptors

use super::descriptor::{Constraint, FieldType, TypeDescriptor};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// A single way in which a value departs from its descriptor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeViolation {
    /// Type mismatch
    #[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// Required field missing
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    /// Unknown field
    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    /// Array item validation failed
    #[error("Array item validation failed at index {index}: {message}")]
    ArrayItemError { index: usize, message: String },

    /// A declared constraint does not hold
    #[error("{field} {constraint}")]
    ConstraintViolated { field: String, constraint: Constraint },

    /// The descriptor itself carries a pattern that does not compile
    #[error("Invalid pattern for field '{field}': {message}")]
    InvalidPattern { field: String, message: String },
}

impl ShapeViolation {
    /// Whether the value has the right shape but fails a constraint
    pub fn is_constraint(&self) -> bool {
        matches!(self, ShapeViolation::ConstraintViolated { .. })
    }
}

/// Validator for configuration values against descriptors
///
/// `Pattern` constraints are compiled on first use and kept for the lifetime
/// of the validator.
pub struct ShapeValidator {
    /// Whether to allow unknown fields
    allow_unknown_fields: bool,

    /// Compiled patterns keyed by their source
    patterns: RwLock<HashMap<String, Regex>>,
}

impl ShapeValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            allow_unknown_fields: false,
            patterns: RwLock::new(HashMap::new()),
        }
    }

    /// Allow unknown fields in validation
    pub fn allow_unknown_fields(mut self, allow: bool) -> Self {
        self.allow_unknown_fields = allow;
        self
    }

    /// Validate a value against a descriptor, collecting every violation
    pub fn validate(
        &self,
        value: &Value,
        descriptor: &TypeDescriptor,
    ) -> Result<(), Vec<ShapeViolation>> {
        let mut violations = Vec::new();

        let obj = match value {
            Value::Object(obj) => obj,
            _ => {
                violations.push(ShapeViolation::TypeMismatch {
                    field: "root".to_string(),
                    expected: "object".to_string(),
                    actual: value_type_name(value).to_string(),
                });
                return Err(violations);
            }
        };

        for field in &descriptor.fields {
            let present = obj.get(&field.name).map(|v| !v.is_null()).unwrap_or(false);
            if field.required && !present {
                violations.push(ShapeViolation::RequiredFieldMissing {
                    field: field.name.clone(),
                });
            }
        }

        for (field_name, field_value) in obj {
            match descriptor.get_field(field_name) {
                Some(field) => {
                    if field_value.is_null() {
                        continue;
                    }
                    if let Err(violation) =
                        self.validate_type(field_name, field_value, &field.field_type)
                    {
                        violations.push(violation);
                        continue;
                    }
                    for constraint in &field.constraints {
                        if let Err(violation) =
                            self.check_constraint(field_name, field_value, constraint)
                        {
                            violations.push(violation);
                        }
                    }
                }
                None => {
                    if !self.allow_unknown_fields {
                        violations.push(ShapeViolation::UnknownField {
                            field: field_name.clone(),
                        });
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn validate_type(
        &self,
        field_name: &str,
        value: &Value,
        field_type: &FieldType,
    ) -> Result<(), ShapeViolation> {
        let matches = match field_type {
            FieldType::Boolean => value.is_boolean(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::String => value.is_string(),
            FieldType::Any => true,
            FieldType::Array { item_type } => {
                let Value::Array(items) = value else {
                    return Err(type_mismatch(field_name, field_type, value));
                };
                for (index, item) in items.iter().enumerate() {
                    if let Err(err) = self.validate_type("item", item, item_type) {
                        return Err(ShapeViolation::ArrayItemError {
                            index,
                            message: err.to_string(),
                        });
                    }
                }
                true
            }
        };

        if matches {
            Ok(())
        } else {
            Err(type_mismatch(field_name, field_type, value))
        }
    }

    fn check_constraint(
        &self,
        field_name: &str,
        value: &Value,
        constraint: &Constraint,
    ) -> Result<(), ShapeViolation> {
        let holds = match constraint {
            Constraint::Minimum(min) => value.as_f64().map(|n| n >= *min as f64).unwrap_or(true),
            Constraint::Maximum(max) => value.as_f64().map(|n| n <= *max as f64).unwrap_or(true),
            Constraint::NotBlank => value
                .as_str()
                .map(|s| !s.trim().is_empty())
                .unwrap_or(true),
            Constraint::MaxLength(len) => match value {
                Value::String(s) => s.chars().count() <= *len,
                Value::Array(items) => items.len() <= *len,
                _ => true,
            },
            Constraint::Pattern(pattern) => match value.as_str() {
                Some(s) => self.pattern_matches(field_name, pattern, s)?,
                None => true,
            },
        };

        if holds {
            Ok(())
        } else {
            Err(ShapeViolation::ConstraintViolated {
                field: field_name.to_string(),
                constraint: constraint.clone(),
            })
        }
    }

    fn pattern_matches(
        &self,
        field_name: &str,
        pattern: &str,
        text: &str,
    ) -> Result<bool, ShapeViolation> {
        {
            let patterns = self.patterns.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(re) = patterns.get(pattern) {
                return Ok(re.is_match(text));
            }
        }

        let re = Regex::new(pattern).map_err(|e| ShapeViolation::InvalidPattern {
            field: field_name.to_string(),
            message: e.to_string(),
        })?;
        let matched = re.is_match(text);

        self.patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern.to_string(), re);

        Ok(matched)
    }

    /// Number of compiled patterns held
    pub fn compiled_patterns(&self) -> usize {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for ShapeValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn type_mismatch(field_name: &str, expected: &FieldType, value: &Value) -> ShapeViolation {
    ShapeViolation::TypeMismatch {
        field: field_name.to_string(),
        expected: expected.type_name().to_string(),
        actual: value_type_name(value).to_string(),
    }
}

/// Get the type name of a JSON value
fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
