//! Repeating-key XOR method
//!
//! Output byte `i` is `payload[i] ^ key[i % key.len()]`. Applying it twice
//! with the same key gives back the input, so one transform serves both
//! directions. Not authenticated and not secure; reference only.

use crate::config::XorConfig;
use crate::plugin::{Direction, Method};
use crate::protocol::PluginError;

pub fn xor_transform(key: &[u8], payload: &[u8]) -> Result<Vec<u8>, PluginError> {
    if key.is_empty() {
        return Err(PluginError::EmptyKey);
    }

    Ok(payload
        .iter()
        .zip(key.iter().cycle())
        .map(|(p, k)| p ^ k)
        .collect())
}

#[derive(Debug, Clone, Default)]
pub struct XorMethod {
    require_direction: bool,
}

impl XorMethod {
    pub fn new(config: &XorConfig) -> Self {
        Self {
            require_direction: config.require_direction,
        }
    }
}

impl Method for XorMethod {
    fn requires_direction(&self) -> bool {
        self.require_direction
    }

    fn transform(
        &self,
        _direction: Option<Direction>,
        key: &[u8],
        payload: &[u8],
    ) -> Result<Vec<u8>, PluginError> {
        xor_transform(key, payload)
    }
}
