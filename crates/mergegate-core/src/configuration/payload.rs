//! Tagged payloads for persisting configuration values
//!
//! The outer configuration store never needs to know a rule's configuration
//! type: it stores the type tag next to opaque bytes and hands both back to
//! the codec registry on load.

use serde::{Deserialize, Serialize};

/// Persisted form of a configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedPayload {
    /// Tag of the configuration type
    pub type_tag: String,

    /// Serialized configuration
    #[serde(with = "payload_text")]
    pub payload: Vec<u8>,
}

impl TaggedPayload {
    /// Create a new payload
    pub fn new(type_tag: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            type_tag: type_tag.into(),
            payload,
        }
    }
}

/// Payload bytes are written as text so stored rulesets stay readable
mod payload_text {
    use serde::{ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let text = std::str::from_utf8(bytes).map_err(ser::Error::custom)?;
        serializer.serialize_str(text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(String::deserialize(deserializer)?.into_bytes())
    }
}
