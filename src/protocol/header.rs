//! Handshake header
//!
//! The first line a plugin writes to stdout. It names the plugin kind and the
//! protocol revision, and is flushed on its own so the host can validate it
//! before sending a request.

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::error::PluginError;

/// Magic string identifying key provider plugins
pub const KEY_PROVIDER_MAGIC: &str = "OpenTofu-External-Key-Provider";

/// Magic string identifying encryption method plugins
pub const ENCRYPTION_METHOD_MAGIC: &str = "OpenTofu-External-Encryption-Method";

/// Protocol revision implemented by this crate
pub const PROTOCOL_VERSION: u32 = 1;

/// Kind of plugin, selecting the magic string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    KeyProvider,
    EncryptionMethod,
}

impl PluginKind {
    pub fn magic(&self) -> &'static str {
        match self {
            PluginKind::KeyProvider => KEY_PROVIDER_MAGIC,
            PluginKind::EncryptionMethod => ENCRYPTION_METHOD_MAGIC,
        }
    }
}

/// `{"magic": ..., "version": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
    pub magic: String,
    pub version: u32,
}

impl Handshake {
    pub fn for_kind(kind: PluginKind) -> Self {
        Self {
            magic: kind.magic().to_string(),
            version: PROTOCOL_VERSION,
        }
    }

    /// Writes the header as one line and flushes it
    pub fn write_to(&self, out: &mut impl Write) -> Result<(), PluginError> {
        let line = serde_json::to_string(self).map_err(std::io::Error::other)?;
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}
