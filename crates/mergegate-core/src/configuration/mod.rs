//! Typed rule configuration
//!
//! - `descriptor`: shapes and field constraints a rule declares
//! - `validator`: checks a submitted JSON value against a descriptor
//! - `value`: the typed trait rules implement and the erased value the engine carries
//! - `payload`: the tagged form written to configuration stores

pub mod descriptor;
pub mod payload;
pub mod validator;
pub mod value;

pub use descriptor::{Constraint, FieldDescriptor, FieldType, TypeDescriptor};
pub use payload::TaggedPayload;
pub use validator::{ShapeValidator, ShapeViolation};
pub use value::{ConfigurationType, ConfigurationValue};
