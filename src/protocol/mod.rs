//! # Plugin Protocol
//!
//! Wire contract between a host and its external encryption plugins.
//!
//! ## Overview
//!
//! Each plugin run is one request and one response over stdio. The host
//! spawns the plugin, the plugin announces itself, reads a single JSON
//! document from stdin until end of stream, and answers with a single JSON
//! document on stdout.
//!
//! ```text
//! Host                                   Plugin
//!  │                                       │
//!  │  Stdout: {"magic": "...", "version": 1}
//!  │                                       │
//!  ├── Stdin: request document, then EOF   │
//!  │                                       │
//!  │  Stdout: response document            │
//!  │  Exit:   0 (anything else = failure)  │
//! ```
//!
//! ## Plugin Kinds
//!
//! | Kind | Request | Response |
//! |------|---------|----------|
//! | Key provider | `null` or `{"external_data": {...}}` | `{"keys": {...}, "meta": {"external_data": {...}}}` |
//! | Encryption method | `{"key": b64, "payload": b64}` | `{"payload": b64}` |
//!
//! Byte-valued fields are standard base64. Stderr carries human-readable
//! diagnostics only.

pub mod encoding;
mod error;
mod header;
pub mod host;
mod messages;

pub use encoding::KeyBytes;
pub use error::PluginError;
pub use header::{
    Handshake, PluginKind, ENCRYPTION_METHOD_MAGIC, KEY_PROVIDER_MAGIC, PROTOCOL_VERSION,
};
pub use host::HostError;
pub use messages::{
    KeyProviderRequest, KeyProviderResponse, Keys, Meta, Metadata, MethodRequest, MethodResponse,
};
