//! Configuration codecs
//!
//! One codec per configuration type tag knows how to parse a submitted JSON
//! value (checking the declared shape and constraints), and how to turn a
//! typed value into a [`TaggedPayload`] and back. The set of codecs is fixed
//! when the registry is built, so nothing is discovered or cached at runtime.

use crate::error::{Result, RuntimeError};
use mergegate_core::configuration::ShapeViolation;
use mergegate_core::{
    ConfigurationError, ConfigurationType, ConfigurationValue, ShapeValidator, TaggedPayload,
    TypeDescriptor,
};
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

/// Serializer, deserializer and validator of one configuration type
pub trait ConfigurationCodec: Send + Sync {
    /// Tag of the handled type
    fn type_tag(&self) -> &'static str;

    /// Declared shape of the handled type
    fn descriptor(&self) -> &TypeDescriptor;

    /// Parse and validate a submitted configuration
    fn parse(&self, raw: &Value) -> ConfigResult<ConfigurationValue>;

    /// Render a value in its submitted (JSON) form
    fn to_json(&self, value: &ConfigurationValue) -> ConfigResult<Value>;

    /// Encode a value for persistence
    fn encode(&self, value: &ConfigurationValue) -> ConfigResult<TaggedPayload>;

    /// Decode a persisted value
    fn decode(&self, payload: &TaggedPayload) -> ConfigResult<ConfigurationValue>;
}

/// Codec for a statically known [`ConfigurationType`]
pub struct TypedCodec<T> {
    descriptor: TypeDescriptor,
    validator: ShapeValidator,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ConfigurationType> TypedCodec<T> {
    pub fn new() -> Self {
        Self {
            descriptor: T::descriptor(),
            validator: ShapeValidator::new(),
            _marker: PhantomData,
        }
    }

    fn typed<'a>(&self, value: &'a ConfigurationValue) -> ConfigResult<&'a T> {
        value
            .downcast_ref::<T>()
            .ok_or_else(|| ConfigurationError::Encoding {
                type_tag: T::TYPE_TAG.to_string(),
                message: format!("value has type '{}'", value.type_tag()),
            })
    }
}

impl<T: ConfigurationType> Default for TypedCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConfigurationType> ConfigurationCodec for TypedCodec<T> {
    fn type_tag(&self) -> &'static str {
        T::TYPE_TAG
    }

    fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn parse(&self, raw: &Value) -> ConfigResult<ConfigurationValue> {
        if let Err(violations) = self.validator.validate(raw, &self.descriptor) {
            return Err(violations_to_error(violations));
        }

        let value: T = serde_json::from_value(raw.clone())
            .map_err(|e| ConfigurationError::parse("", e.to_string()))?;

        Ok(ConfigurationValue::new(value))
    }

    fn to_json(&self, value: &ConfigurationValue) -> ConfigResult<Value> {
        serde_json::to_value(self.typed(value)?).map_err(|e| ConfigurationError::Encoding {
            type_tag: T::TYPE_TAG.to_string(),
            message: e.to_string(),
        })
    }

    fn encode(&self, value: &ConfigurationValue) -> ConfigResult<TaggedPayload> {
        let bytes = serde_json::to_vec(self.typed(value)?).map_err(|e| {
            ConfigurationError::Encoding {
                type_tag: T::TYPE_TAG.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(TaggedPayload::new(T::TYPE_TAG, bytes))
    }

    fn decode(&self, payload: &TaggedPayload) -> ConfigResult<ConfigurationValue> {
        if payload.type_tag != T::TYPE_TAG {
            return Err(ConfigurationError::Encoding {
                type_tag: T::TYPE_TAG.to_string(),
                message: format!("payload is tagged '{}'", payload.type_tag),
            });
        }

        let value: T = serde_json::from_slice(&payload.payload).map_err(|e| {
            ConfigurationError::Encoding {
                type_tag: T::TYPE_TAG.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(ConfigurationValue::new(value))
    }
}

/// Shape errors make the submission unparseable; only constraint failures on an
/// otherwise well-formed value count as validation errors.
fn violations_to_error(violations: Vec<ShapeViolation>) -> ConfigurationError {
    let join = |items: Vec<&ShapeViolation>| {
        items
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    };

    let (constraints, structural): (Vec<_>, Vec<_>) =
        violations.iter().partition(|v| v.is_constraint());

    if structural.is_empty() {
        ConfigurationError::validation("", join(constraints))
    } else {
        ConfigurationError::parse("", join(structural))
    }
}

/// All configuration codecs, keyed by type tag
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<&'static str, Arc<dyn ConfigurationCodec>>,
}

impl CodecRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the codec of `T`
    pub fn register<T: ConfigurationType>(&mut self) -> Result<()> {
        self.register_codec(Arc::new(TypedCodec::<T>::new()))
    }

    /// Register a codec
    pub fn register_codec(&mut self, codec: Arc<dyn ConfigurationCodec>) -> Result<()> {
        let tag = codec.type_tag();
        if self.codecs.contains_key(tag) {
            return Err(RuntimeError::DuplicateConfigurationType(tag.to_string()));
        }
        self.codecs.insert(tag, codec);
        Ok(())
    }

    /// Codec for a type tag
    pub fn get(&self, type_tag: &str) -> Option<&Arc<dyn ConfigurationCodec>> {
        self.codecs.get(type_tag)
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.codecs.contains_key(type_tag)
    }

    /// Registered type tags in sorted order
    pub fn type_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.codecs.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    fn require(&self, type_tag: &str) -> ConfigResult<&Arc<dyn ConfigurationCodec>> {
        self.get(type_tag)
            .ok_or_else(|| ConfigurationError::UnknownType {
                type_tag: type_tag.to_string(),
            })
    }

    /// Encode a value with the codec of its own type
    pub fn encode(&self, value: &ConfigurationValue) -> ConfigResult<TaggedPayload> {
        self.require(value.type_tag())?.encode(value)
    }

    /// Decode a payload with the codec named by its tag
    pub fn decode(&self, payload: &TaggedPayload) -> ConfigResult<ConfigurationValue> {
        self.require(&payload.type_tag)?.decode(payload)
    }

    /// Render a value in its JSON form
    pub fn to_json(&self, value: &ConfigurationValue) -> ConfigResult<Value> {
        self.require(value.type_tag())?.to_json(value)
    }

    /// Parse a submitted value as the given type
    pub fn parse(&self, type_tag: &str, raw: &Value) -> ConfigResult<ConfigurationValue> {
        self.require(type_tag)?.parse(raw)
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("type_tags", &self.type_tags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergegate_core::{Constraint, FieldDescriptor, FieldType};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Quorum {
        min_votes: u32,
        #[serde(default)]
        label: Option<String>,
    }

    impl ConfigurationType for Quorum {
        const TYPE_TAG: &'static str = "quorum";

        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::new(Self::TYPE_TAG)
                .add_field(
                    FieldDescriptor::new("minVotes", FieldType::Integer)
                        .required()
                        .with_constraint(Constraint::Minimum(1)),
                )
                .add_field(FieldDescriptor::new("label", FieldType::String))
        }
    }

    fn registry() -> CodecRegistry {
        let mut codecs = CodecRegistry::new();
        codecs.register::<Quorum>().unwrap();
        codecs
    }

    #[test]
    fn test_parse_valid_configuration() {
        let value = registry()
            .parse("quorum", &json!({"minVotes": 2, "label": "core"}))
            .unwrap();

        assert_eq!(
            value.downcast_ref::<Quorum>(),
            Some(&Quorum {
                min_votes: 2,
                label: Some("core".to_string())
            })
        );
    }

    #[test]
    fn test_parse_shape_error() {
        let err = registry()
            .parse("quorum", &json!({"minVotes": "two"}))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse { .. }));
    }

    #[test]
    fn test_parse_constraint_error() {
        let err = registry().parse("quorum", &json!({"minVotes": 0})).unwrap_err();

        match err {
            ConfigurationError::Validation { violation, .. } => {
                assert_eq!(violation, "minVotes must be >= 1");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_out_of_range_fails_deserialization() {
        // a valid integer for the descriptor, but too large for u32
        let err = registry()
            .parse("quorum", &json!({"minVotes": 5000000000u64}))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse { .. }));
    }

    #[test]
    fn test_unknown_type() {
        let err = registry().parse("nope", &json!({})).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownType {
                type_tag: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_encode_decode() {
        let codecs = registry();
        let original = ConfigurationValue::new(Quorum {
            min_votes: 3,
            label: None,
        });

        let payload = codecs.encode(&original).unwrap();
        assert_eq!(payload.type_tag, "quorum");

        let decoded = codecs.decode(&payload).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_rejects_foreign_tag() {
        let codec = TypedCodec::<Quorum>::new();
        let err = codec
            .decode(&TaggedPayload::new("other", b"{}".to_vec()))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Encoding { .. }));
    }

    #[test]
    fn test_decode_corrupt_payload() {
        let err = registry()
            .decode(&TaggedPayload::new("quorum", b"not json".to_vec()))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Encoding { .. }));
    }

    #[test]
    fn test_to_json() {
        let json = registry()
            .to_json(&ConfigurationValue::new(Quorum {
                min_votes: 1,
                label: None,
            }))
            .unwrap();
        assert_eq!(json, json!({"minVotes": 1, "label": null}));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut codecs = registry();
        assert_eq!(
            codecs.register::<Quorum>().unwrap_err(),
            RuntimeError::DuplicateConfigurationType("quorum".to_string())
        );
    }
}
