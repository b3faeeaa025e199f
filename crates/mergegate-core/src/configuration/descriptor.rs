//! Type descriptors for rule configurations
//!
//! A descriptor states the shape a rule expects its configuration to have,
//! together with field-level constraints such as "integer, minimum 1".

use serde::{Deserialize, Serialize};

/// Describes the configuration type a rule accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Stable type tag used in persisted payloads
    pub type_tag: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Fields of the configuration object, in declaration order
    pub fields: Vec<FieldDescriptor>,
}

/// A field of a configuration type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name as it appears in the serialized configuration
    pub name: String,

    /// Field type
    pub field_type: FieldType,

    /// Whether this field is required
    #[serde(default)]
    pub required: bool,

    /// Constraints checked on the field value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

/// Field type enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum FieldType {
    /// Boolean type
    Boolean,

    /// Whole number
    Integer,

    /// Any number (int or float)
    Number,

    /// String type
    String,

    /// Array type
    Array {
        /// Type of array elements
        item_type: Box<FieldType>,
    },

    /// Any type (no validation)
    Any,
}

/// Field-level constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "constraint", content = "value")]
pub enum Constraint {
    /// Numeric lower bound (inclusive)
    Minimum(i64),

    /// Numeric upper bound (inclusive)
    Maximum(i64),

    /// String must contain a non-whitespace character
    NotBlank,

    /// Upper bound on string length or array size
    MaxLength(usize),

    /// String must match the regular expression
    Pattern(String),
}

impl TypeDescriptor {
    /// Create a new descriptor
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a field
    pub fn add_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a field by name
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if a field is required
    pub fn is_required(&self, name: &str) -> bool {
        self.get_field(name).map(|f| f.required).unwrap_or(false)
    }
}

impl FieldDescriptor {
    /// Create a new field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// Mark field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Add a constraint
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

impl FieldType {
    /// Create an array type
    pub fn array(item_type: FieldType) -> Self {
        FieldType::Array {
            item_type: Box::new(item_type),
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Array { .. } => "array",
            FieldType::Any => "any",
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Minimum(min) => write!(f, "must be >= {}", min),
            Constraint::Maximum(max) => write!(f, "must be <= {}", max),
            Constraint::NotBlank => write!(f, "must not be blank"),
            Constraint::MaxLength(len) => write!(f, "must not be longer than {}", len),
            Constraint::Pattern(pattern) => write!(f, "must match '{}'", pattern),
        }
    }
}
