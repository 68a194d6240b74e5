//! Avance storefront CLI
//!
//! Terminal rendition of the storefront pages (shop, product detail, cart) over a cart kept in
//! a file-backed storage slot.

use std::{io, process::ExitCode};

use tracing::error;

use crate::config::CliConfig;

mod commands;
mod config;
mod error;
mod observability;
mod render;

fn main() -> ExitCode {
    let config = CliConfig::load().unwrap_or_else(|err| err.exit());

    if let Err(err) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{err}");
        }

        return ExitCode::FAILURE;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match commands::run(&config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");

            #[expect(clippy::print_stderr, reason = "user-facing error message")]
            {
                eprintln!("error: {err}");
            }

            ExitCode::FAILURE
        }
    }
}
