//! Key provider implementations
//!
//! | Name | Policy |
//! |------|--------|
//! | `static` | Fixed 16-byte key, empty metadata |
//! | `passphrase` | Argon2id over a passphrase, salt and costs kept in metadata |

mod passphrase;
mod static_key;

pub use passphrase::{PassphraseKeyProvider, MINIMUM_PASSPHRASE_LENGTH};
pub use static_key::{StaticKeyProvider, STATIC_KEY};
