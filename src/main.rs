//! extcrypt - External key provider and encryption method plugins

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = extcrypt::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
