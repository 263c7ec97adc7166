//! Host-side reading of plugin output
//!
//! The host treats an invocation as failed unless stdout starts with a
//! handshake line for the expected plugin kind and is followed by one
//! schema-valid response document. Spawning the plugin, timeouts and
//! persisting the results are the host's own business.

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::header::{Handshake, PluginKind, PROTOCOL_VERSION};
use super::messages::{KeyProviderResponse, MethodResponse};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Plugin produced no output")]
    NoOutput,

    #[error("Plugin handshake is not valid: {0}")]
    InvalidHandshake(String),

    #[error("Plugin magic mismatch: expected '{expected}', got '{actual}'")]
    MagicMismatch { expected: String, actual: String },

    #[error("Unsupported plugin protocol version: {0}")]
    UnsupportedVersion(u32),

    #[error("Plugin response is not valid: {0}")]
    InvalidResponse(String),

    #[error("Key provider {0} a decryption key but the request {1} metadata")]
    DecryptionKeyMismatch(&'static str, &'static str),
}

/// Splits captured stdout into the validated handshake and the response body
pub fn read_handshake(kind: PluginKind, stdout: &[u8]) -> Result<(Handshake, &[u8]), HostError> {
    if stdout.is_empty() {
        return Err(HostError::NoOutput);
    }

    let (line, rest) = match stdout.iter().position(|b| *b == b'\n') {
        Some(pos) => (&stdout[..pos], &stdout[pos + 1..]),
        None => (stdout, &stdout[stdout.len()..]),
    };

    let header: Handshake =
        serde_json::from_slice(line).map_err(|e| HostError::InvalidHandshake(e.to_string()))?;

    if header.magic != kind.magic() {
        return Err(HostError::MagicMismatch {
            expected: kind.magic().to_string(),
            actual: header.magic,
        });
    }
    if header.version != PROTOCOL_VERSION {
        return Err(HostError::UnsupportedVersion(header.version));
    }

    Ok((header, rest))
}

fn read_response<T: DeserializeOwned>(kind: PluginKind, stdout: &[u8]) -> Result<T, HostError> {
    let (_, body) = read_handshake(kind, stdout)?;
    serde_json::from_slice(body).map_err(|e| HostError::InvalidResponse(e.to_string()))
}

/// Reads a key provider's output for a request that did or did not carry
/// metadata
pub fn read_key_provider_output(
    stdout: &[u8],
    request_had_metadata: bool,
) -> Result<KeyProviderResponse, HostError> {
    let response: KeyProviderResponse = read_response(PluginKind::KeyProvider, stdout)?;

    match (request_had_metadata, response.keys.decryption_key.is_some()) {
        (true, false) => Err(HostError::DecryptionKeyMismatch("omitted", "carried")),
        (false, true) => Err(HostError::DecryptionKeyMismatch("returned", "carried no")),
        _ => Ok(response),
    }
}

pub fn read_method_output(stdout: &[u8]) -> Result<MethodResponse, HostError> {
    read_response(PluginKind::EncryptionMethod, stdout)
}
