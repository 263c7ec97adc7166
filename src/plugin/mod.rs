//! # Plugin Runtime
//!
//! Reusable adapter that turns a key derivation policy or a payload
//! transform into a protocol-speaking plugin process.
//!
//! ## Overview
//!
//! Concrete plugins implement one of two capability traits. The adapter owns
//! everything else: the interactive-use guard, the handshake, reading the
//! request to end of stream, decoding, and writing a complete response.
//!
//! ```text
//! Guard ─► Handshake ─► read stdin ─► decode ─► KeyProvider / Method ─► respond
//!   │                                   │              │
//!   └── terminal: refuse, no stdout     └──────────────┴── error: no response
//! ```
//!
//! ## Key Types
//!
//! - [`KeyProvider`] - Fresh and restored key derivation
//! - [`Method`] - Payload transform under a key
//! - [`OutputProbe`] - Terminal detection, injectable for tests
//! - [`StdioAdapter`] - Process framing around the traits

mod adapter;
mod capability;
mod guard;

pub use adapter::{Exchange, StdioAdapter};
pub use capability::{Direction, FreshKeys, KeyProvider, Method, RestoredKeys};
pub use guard::{ensure_piped, OutputProbe, StdoutProbe};
