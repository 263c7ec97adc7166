//! Request and response documents
//!
//! Field names here are the wire contract shared with the host.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::encoding::{base64_bytes, KeyBytes};
use super::error::PluginError;

/// Opaque `external_data` blob
///
/// Produced by a key provider, persisted by the host next to the ciphertext
/// and handed back verbatim on the next run. Only a key derivation policy
/// looks inside it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds metadata from any value that serializes to a JSON object
    pub fn from_typed<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "metadata must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Reads the blob back as a policy-specific type
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `null | {"external_data": {...}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyProviderRequest {
    #[serde(default)]
    pub external_data: Option<Metadata>,
}

impl KeyProviderRequest {
    /// Decodes stdin; empty input, `null` and a null `external_data` all
    /// mean there is no prior metadata
    pub fn parse(input: &[u8]) -> Result<Option<Metadata>, PluginError> {
        if is_blank(input) {
            return Ok(None);
        }

        match parse_document(input)? {
            Value::Null => Ok(None),
            doc @ Value::Object(_) => {
                let request: KeyProviderRequest =
                    serde_json::from_value(doc).map_err(PluginError::malformed)?;
                Ok(request.external_data)
            }
            other => Err(PluginError::malformed(format!(
                "expected null or an object, got {}",
                json_type(&other)
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keys {
    pub encryption_key: KeyBytes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decryption_key: Option<KeyBytes>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meta {
    pub external_data: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyProviderResponse {
    pub keys: Keys,
    pub meta: Meta,
}

/// `{"key": <base64>, "payload": <base64>}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodRequest {
    pub key: KeyBytes,

    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

impl MethodRequest {
    pub fn parse(input: &[u8]) -> Result<Self, PluginError> {
        if is_blank(input) {
            return Err(PluginError::malformed("empty request"));
        }

        match parse_document(input)? {
            doc @ Value::Object(_) => serde_json::from_value(doc).map_err(PluginError::malformed),
            other => Err(PluginError::malformed(format!(
                "expected an object, got {}",
                json_type(&other)
            ))),
        }
    }
}

/// `{"payload": <base64>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResponse {
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

fn is_blank(input: &[u8]) -> bool {
    input.iter().all(u8::is_ascii_whitespace)
}

// Derived struct deserializers also accept sequences, so the document shape
// is checked on the untyped value first.
fn parse_document(input: &[u8]) -> Result<Value, PluginError> {
    serde_json::from_slice(input).map_err(PluginError::malformed)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
