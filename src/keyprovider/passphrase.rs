//! Passphrase key provider (Argon2id)
//!
//! Each run derives a new encryption key under a fresh random salt and
//! records the salt and cost parameters as metadata. When the host hands that
//! metadata back, the decryption key is re-derived from it, so the stored
//! parameters rather than the current configuration decide how old state is
//! read.

use argon2::Argon2;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::config::PassphraseConfig;
use crate::plugin::{FreshKeys, KeyProvider, RestoredKeys};
use crate::protocol::encoding;
use crate::protocol::{KeyBytes, Metadata, PluginError};

/// Shortest passphrase accepted
pub const MINIMUM_PASSPHRASE_LENGTH: usize = 16;

/// Persisted as `external_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct KdfMetadata {
    salt: String,
    memory_cost: u32,
    iterations: u32,
    parallelism: u32,
    key_length: usize,
}

impl KdfMetadata {
    fn params(&self, salt_length: usize) -> PassphraseConfig {
        PassphraseConfig {
            memory_cost: self.memory_cost,
            iterations: self.iterations,
            parallelism: self.parallelism,
            key_length: self.key_length,
            salt_length,
        }
    }
}

pub struct PassphraseKeyProvider {
    passphrase: Zeroizing<String>,
    params: PassphraseConfig,
}

impl PassphraseKeyProvider {
    pub fn new(passphrase: impl Into<String>, params: PassphraseConfig) -> Result<Self, PluginError> {
        let passphrase = Zeroizing::new(passphrase.into());

        if passphrase.is_empty() {
            return Err(PluginError::InvalidConfiguration(
                "no passphrase provided".to_string(),
            ));
        }
        if passphrase.chars().count() < MINIMUM_PASSPHRASE_LENGTH {
            return Err(PluginError::InvalidConfiguration(format!(
                "passphrase is too short (minimum {} characters)",
                MINIMUM_PASSPHRASE_LENGTH
            )));
        }
        params
            .validate()
            .map_err(|e| PluginError::InvalidConfiguration(e.to_string()))?;

        Ok(Self { passphrase, params })
    }

    fn derive(&self, salt: &[u8], params: &PassphraseConfig) -> Result<KeyBytes, PluginError> {
        let argon2_params = argon2::Params::new(
            params.memory_cost,
            params.iterations,
            params.parallelism,
            Some(params.key_length),
        )
        .map_err(|e| PluginError::derivation(format!("invalid KDF params: {}", e)))?;

        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            argon2_params,
        );

        let mut output = vec![0u8; params.key_length];
        argon2
            .hash_password_into(self.passphrase.as_bytes(), salt, &mut output)
            .map_err(|e| PluginError::derivation(format!("KDF failed: {}", e)))?;

        Ok(KeyBytes::new(output))
    }

    /// New key under a new salt, plus the metadata to reproduce it
    fn derive_new(&self) -> Result<(KeyBytes, Metadata), PluginError> {
        let mut salt = vec![0u8; self.params.salt_length];
        rand::rng().fill_bytes(&mut salt);

        let key = self.derive(&salt, &self.params)?;
        let meta = Metadata::from_typed(&KdfMetadata {
            salt: encoding::encode(&salt),
            memory_cost: self.params.memory_cost,
            iterations: self.params.iterations,
            parallelism: self.params.parallelism,
            key_length: self.params.key_length,
        })
        .map_err(PluginError::derivation)?;

        Ok((key, meta))
    }
}

impl KeyProvider for PassphraseKeyProvider {
    fn fresh_keys(&self) -> Result<FreshKeys, PluginError> {
        let (encryption_key, meta) = self.derive_new()?;
        Ok(FreshKeys {
            encryption_key,
            meta,
        })
    }

    fn restore_keys(&self, prior: &Metadata) -> Result<RestoredKeys, PluginError> {
        let stored: KdfMetadata = prior
            .to_typed()
            .map_err(|e| PluginError::derivation(format!("unreadable key metadata: {}", e)))?;

        let salt = encoding::decode(&stored.salt)
            .map_err(|e| PluginError::derivation(format!("invalid salt in key metadata: {}", e)))?;

        let params = stored.params(salt.len());
        params
            .validate()
            .map_err(|e| PluginError::derivation(format!("stored KDF parameters: {}", e)))?;

        let decryption_key = self.derive(&salt, &params)?;
        let (encryption_key, meta) = self.derive_new()?;

        Ok(RestoredKeys {
            encryption_key,
            decryption_key,
            meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PASSPHRASE: &str = "correct horse battery staple";

    fn cheap() -> PassphraseConfig {
        PassphraseConfig {
            memory_cost: 256,
            iterations: 1,
            parallelism: 1,
            key_length: 32,
            salt_length: 16,
        }
    }

    fn provider() -> PassphraseKeyProvider {
        PassphraseKeyProvider::new(PASSPHRASE, cheap()).unwrap()
    }

    #[test]
    fn rejects_short_passphrase() {
        let err = PassphraseKeyProvider::new("short", cheap()).err().unwrap();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn rejects_missing_passphrase() {
        let err = PassphraseKeyProvider::new("", cheap()).err().unwrap();
        assert!(matches!(err, PluginError::InvalidConfiguration(_)));
    }

    #[test]
    fn fresh_keys_record_salt_and_params() {
        let keys = provider().fresh_keys().unwrap();
        assert_eq!(keys.encryption_key.len(), 32);

        let stored: KdfMetadata = keys.meta.to_typed().unwrap();
        assert_eq!(encoding::decode(&stored.salt).unwrap().len(), 16);
        assert_eq!(stored.memory_cost, 256);
        assert_eq!(stored.key_length, 32);
    }

    #[test]
    fn decryption_key_reproduces_previous_encryption_key() {
        let provider = provider();
        let first = provider.fresh_keys().unwrap();
        let second = provider.restore_keys(&first.meta).unwrap();

        assert_eq!(second.decryption_key, first.encryption_key);
    }

    #[test]
    fn every_run_rotates_the_salt() {
        let provider = provider();
        let first = provider.fresh_keys().unwrap();
        let second = provider.restore_keys(&first.meta).unwrap();

        assert_ne!(second.meta, first.meta);
        assert_ne!(second.encryption_key, second.decryption_key);
    }

    #[test]
    fn stored_params_win_over_current_config() {
        let old = provider().fresh_keys().unwrap();

        let stronger = PassphraseConfig {
            iterations: 2,
            key_length: 24,
            ..cheap()
        };
        let provider = PassphraseKeyProvider::new(PASSPHRASE, stronger).unwrap();
        let restored = provider.restore_keys(&old.meta).unwrap();

        assert_eq!(restored.decryption_key, old.encryption_key);
        assert_eq!(restored.encryption_key.len(), 24);
    }

    #[test]
    fn wrong_passphrase_gives_different_key() {
        let old = provider().fresh_keys().unwrap();
        let other = PassphraseKeyProvider::new("a different passphrase!", cheap()).unwrap();
        let restored = other.restore_keys(&old.meta).unwrap();

        assert_ne!(restored.decryption_key, old.encryption_key);
    }

    #[test]
    fn corrupted_metadata_is_a_derivation_failure() {
        let cases = [
            json!({}),
            json!({"salt": "!!!", "memory_cost": 256, "iterations": 1, "parallelism": 1, "key_length": 32}),
            json!({"salt": "c2FsdA==", "memory_cost": 256, "iterations": 1, "parallelism": 1, "key_length": 32}),
            json!({"salt": "c2FsdHNhbHRzYWx0", "memory_cost": 256, "iterations": 0, "parallelism": 1, "key_length": 32}),
            json!({"salt": "c2FsdHNhbHRzYWx0", "memory_cost": 256, "iterations": 1, "parallelism": 536870912, "key_length": 32}),
            json!({"salt": "c2FsdHNhbHRzYWx0", "memory_cost": 4294967295u32, "iterations": 1, "parallelism": 1, "key_length": 32}),
            json!({"salt": "c2FsdHNhbHRzYWx0", "memory_cost": 256, "iterations": 4294967295u32, "parallelism": 1, "key_length": 32}),
            json!({"salt": "c2FsdHNhbHRzYWx0", "memory_cost": 256, "iterations": 1, "parallelism": 1, "key_length": 1u64 << 40}),
        ];

        for case in cases {
            let meta = Metadata::from_typed(&case).unwrap();
            let err = provider().restore_keys(&meta).err().unwrap();
            assert!(
                matches!(err, PluginError::InternalDerivationFailure(_)),
                "{} -> {}",
                case,
                err
            );
        }
    }
}
