//! Key provider commands

use std::io;

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::config::Config;
use crate::keyprovider::{PassphraseKeyProvider, StaticKeyProvider};
use crate::plugin::{KeyProvider, StdioAdapter, StdoutProbe};

#[derive(Subcommand)]
pub enum KeyProviderCommands {
    /// Fixed reference key (testing only)
    Static,

    /// Argon2id key derived from a passphrase
    Passphrase {
        /// Passphrase (at least 16 characters)
        #[arg(long, env = "EXTCRYPT_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },
}

pub fn run(cmd: KeyProviderCommands, config: &Config, output: &Output) -> Result<()> {
    let provider: Box<dyn KeyProvider> = match cmd {
        KeyProviderCommands::Static => {
            output.verbose_ctx("key-provider", "Using static reference key");
            Box::new(StaticKeyProvider)
        }
        KeyProviderCommands::Passphrase { passphrase } => {
            output.verbose_ctx(
                "key-provider",
                &format!(
                    "Using Argon2id: memory_cost={} iterations={} parallelism={}",
                    config.passphrase.memory_cost,
                    config.passphrase.iterations,
                    config.passphrase.parallelism
                ),
            );
            Box::new(PassphraseKeyProvider::new(
                passphrase.unwrap_or_default(),
                config.passphrase.clone(),
            )?)
        }
    };

    let exchange = StdioAdapter::new(&StdoutProbe, io::stdin().lock(), io::stdout().lock())
        .serve_key_provider(provider.as_ref())?;

    output.verbose_ctx(
        "key-provider",
        &format!(
            "Read {} bytes, prior metadata: {}, wrote {} bytes",
            exchange.request_bytes,
            exchange.prior_metadata.unwrap_or(false),
            exchange.response_bytes
        ),
    );

    Ok(())
}
