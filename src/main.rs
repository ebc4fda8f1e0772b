//! modpkg CLI entry point
//!
//! This is the main executable for the module packaging tool. It handles
//! command-line argument parsing, error display, and command execution.
//!
//! Available commands:
//! - `build` - Package the module against its host application
//! - `deploy` - Upload a packaged module archive to a remote repository

use anyhow::Result;
use clap::Parser;
use modpkg_cli::cli;
use modpkg_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
