//! # Command-Line Interface
//!
//! Entry point the host invokes to run a plugin.
//!
//! ## Commands
//!
//! | Command | Plugin kind |
//! |---------|-------------|
//! | `key-provider static` | Key provider, fixed reference key |
//! | `key-provider passphrase` | Key provider, Argon2id over `EXTCRYPT_PASSPHRASE` |
//! | `method xor [--encrypt\|--decrypt]` | Encryption method, repeating-key XOR |
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! echo null | extcrypt --verbose key-provider static
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and serve one exchange.

mod app;
mod key_provider_cmd;
mod method_cmd;
mod output;

pub use app::{run, Cli, Commands};
pub use output::Output;
