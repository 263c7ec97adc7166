//! extcrypt - External encryption plugins for state-at-rest encryption
//!
//! A host program delegates two concerns to separately executed plugins:
//! producing key material (key providers) and transforming payloads under a
//! key (encryption methods). This crate holds the stdio protocol, a reusable
//! adapter around it, and reference plugins.

pub mod protocol;
pub mod plugin;
pub mod keyprovider;
pub mod method;
pub mod config;
pub mod cli;

pub use plugin::{Direction, KeyProvider, Method, OutputProbe};
pub use protocol::{Handshake, Metadata, PluginError, PluginKind};
