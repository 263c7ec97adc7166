//! Static reference key provider
//!
//! Always hands out the same 16-byte key and persists empty metadata. Only
//! useful for exercising the protocol end to end.

use crate::plugin::{FreshKeys, KeyProvider, RestoredKeys};
use crate::protocol::{KeyBytes, Metadata, PluginError};

/// Bytes `0x01..=0x10`
pub const STATIC_KEY: [u8; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];

#[derive(Debug, Clone, Copy, Default)]
pub struct StaticKeyProvider;

impl KeyProvider for StaticKeyProvider {
    fn fresh_keys(&self) -> Result<FreshKeys, PluginError> {
        Ok(FreshKeys {
            encryption_key: KeyBytes::from(&STATIC_KEY[..]),
            meta: Metadata::empty(),
        })
    }

    // The prior metadata is ignored; the key never changes, so reusing it
    // for decryption is correct.
    fn restore_keys(&self, _prior: &Metadata) -> Result<RestoredKeys, PluginError> {
        Ok(RestoredKeys {
            encryption_key: KeyBytes::from(&STATIC_KEY[..]),
            decryption_key: KeyBytes::from(&STATIC_KEY[..]),
            meta: Metadata::empty(),
        })
    }
}
