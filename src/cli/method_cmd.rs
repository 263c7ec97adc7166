//! Encryption method commands

use std::io;

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::config::Config;
use crate::method::XorMethod;
use crate::plugin::{Direction, StdioAdapter, StdoutProbe};

#[derive(Subcommand)]
pub enum MethodCommands {
    /// Repeating-key XOR (testing only, not secure)
    Xor {
        /// Treat the payload as plaintext
        #[arg(long, conflicts_with = "decrypt")]
        encrypt: bool,

        /// Treat the payload as ciphertext
        #[arg(long)]
        decrypt: bool,
    },
}

fn direction(encrypt: bool, decrypt: bool) -> Option<Direction> {
    match (encrypt, decrypt) {
        (true, _) => Some(Direction::Encrypt),
        (_, true) => Some(Direction::Decrypt),
        _ => None,
    }
}

pub fn run(cmd: MethodCommands, config: &Config, output: &Output) -> Result<()> {
    match cmd {
        MethodCommands::Xor { encrypt, decrypt } => {
            let direction = direction(encrypt, decrypt);
            output.verbose_ctx("method", &format!("XOR, direction: {:?}", direction));

            let method = XorMethod::new(&config.xor);
            let exchange = StdioAdapter::new(&StdoutProbe, io::stdin().lock(), io::stdout().lock())
                .serve_method(&method, direction)?;

            output.verbose_ctx(
                "method",
                &format!(
                    "Read {} bytes, wrote {} bytes",
                    exchange.request_bytes, exchange.response_bytes
                ),
            );
        }
    }

    Ok(())
}
