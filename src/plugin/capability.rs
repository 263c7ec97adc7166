//! Capability interfaces implemented by concrete plugins
//!
//! The adapter only ever talks to these traits, so a policy can be exercised
//! directly in tests without a process boundary.

use crate::protocol::{KeyBytes, KeyProviderResponse, Keys, Meta, Metadata, PluginError};

/// Keys for state that has never been encrypted
#[derive(Debug, Clone)]
pub struct FreshKeys {
    pub encryption_key: KeyBytes,

    /// Metadata for the host to persist with the new ciphertext
    pub meta: Metadata,
}

/// Keys for state encrypted on an earlier run
///
/// The two keys are independent outputs; a policy may return different
/// values for each.
#[derive(Debug, Clone)]
pub struct RestoredKeys {
    pub encryption_key: KeyBytes,
    pub decryption_key: KeyBytes,
    pub meta: Metadata,
}

impl From<FreshKeys> for KeyProviderResponse {
    fn from(keys: FreshKeys) -> Self {
        KeyProviderResponse {
            keys: Keys {
                encryption_key: keys.encryption_key,
                decryption_key: None,
            },
            meta: Meta {
                external_data: keys.meta,
            },
        }
    }
}

impl From<RestoredKeys> for KeyProviderResponse {
    fn from(keys: RestoredKeys) -> Self {
        KeyProviderResponse {
            keys: Keys {
                encryption_key: keys.encryption_key,
                decryption_key: Some(keys.decryption_key),
            },
            meta: Meta {
                external_data: keys.meta,
            },
        }
    }
}

/// Key derivation policy
pub trait KeyProvider {
    /// Derives keys when no metadata has been persisted yet
    fn fresh_keys(&self) -> Result<FreshKeys, PluginError>;

    /// Derives keys from the metadata persisted on the previous run
    fn restore_keys(&self, prior: &Metadata) -> Result<RestoredKeys, PluginError>;

    fn provide_keys(&self, prior: Option<&Metadata>) -> Result<KeyProviderResponse, PluginError> {
        match prior {
            None => self.fresh_keys().map(Into::into),
            Some(meta) => self.restore_keys(meta).map(Into::into),
        }
    }
}

/// Transform direction, selected at invocation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Payload transform
pub trait Method {
    /// Whether the host must pick a direction for this method
    fn requires_direction(&self) -> bool {
        false
    }

    fn transform(
        &self,
        direction: Option<Direction>,
        key: &[u8],
        payload: &[u8],
    ) -> Result<Vec<u8>, PluginError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl KeyProvider for Fixed {
        fn fresh_keys(&self) -> Result<FreshKeys, PluginError> {
            Ok(FreshKeys {
                encryption_key: KeyBytes::new(vec![1]),
                meta: Metadata::empty(),
            })
        }

        fn restore_keys(&self, _prior: &Metadata) -> Result<RestoredKeys, PluginError> {
            Ok(RestoredKeys {
                encryption_key: KeyBytes::new(vec![1]),
                decryption_key: KeyBytes::new(vec![2]),
                meta: Metadata::empty(),
            })
        }
    }

    #[test]
    fn no_metadata_gives_no_decryption_key() {
        let response = Fixed.provide_keys(None).unwrap();
        assert!(response.keys.decryption_key.is_none());
    }

    #[test]
    fn metadata_gives_independent_decryption_key() {
        let response = Fixed.provide_keys(Some(&Metadata::empty())).unwrap();
        assert_eq!(response.keys.encryption_key.as_bytes(), &[1u8]);
        assert_eq!(
            response.keys.decryption_key.as_ref().map(KeyBytes::as_bytes),
            Some(&[2u8][..])
        );
    }
}
