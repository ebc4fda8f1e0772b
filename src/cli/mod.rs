//! Command-line interface for the modpkg packaging tool.
//!
//! This module defines the top-level CLI structure and dispatches to the
//! individual subcommands. The CLI follows a standard pattern: global flags
//! control logging and configuration, while subcommands implement the actual
//! operations.
//!
//! # Command Structure
//!
//! - [`build`]: Package a module artifact together with the dependencies the
//!   host application does not already provide
//! - [`deploy`]: Upload a packaged module archive to a remote repository
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: Enable debug-level logging
//! - `--quiet` / `-q`: Suppress everything except errors
//! - `--config` / `-c`: Path to the global credentials file
//!   (default `~/.modpkg/config.toml`)
//! - `--project-file`: Path to the project file (`modpkg.toml`); by default
//!   the current directory and its parents are searched
//! - `--no-progress`: Disable progress bars for CI and scripted runs
//!
//! # Examples
//!
//! ```bash
//! modpkg build                          # Package using modpkg.toml settings
//! modpkg build --separate-output        # Dependencies in their own archive
//! modpkg -v build --exclude com.x:y     # Verbose, with a manual exclusion
//! modpkg deploy --file target/app.zip   # Upload a specific archive
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub mod build;
pub mod deploy;

/// Configuration derived from global CLI flags.
///
/// This struct decouples flag parsing from flag application so that tests can
/// construct a configuration directly instead of going through the parser.
/// [`apply_to_env`](Self::apply_to_env) publishes the settings that other
/// modules read back from the environment.
///
/// # Examples
///
/// ```rust,ignore
/// use modpkg_cli::cli::CliConfig;
///
/// let config = CliConfig {
///     log_level: Some("debug".to_string()),
///     no_progress: true,
///     config_path: None,
/// };
/// config.apply_to_env();
/// ```
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level filter, or `None` to disable logging entirely (quiet mode).
    pub log_level: Option<String>,
    /// Disable progress bars and spinners.
    pub no_progress: bool,
    /// Override path for the global credentials file.
    pub config_path: Option<String>,
}

impl CliConfig {
    /// Create a configuration with default settings (info logging, progress on).
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: Some("info".to_string()),
            ..Self::default()
        }
    }

    /// Publish the configuration to the process environment.
    ///
    /// Sets `MODPKG_NO_PROGRESS` for the progress-bar module and
    /// `MODPKG_CONFIG_PATH` for the global configuration loader. Must be
    /// called from the main thread before any tasks are spawned.
    pub fn apply_to_env(&self) {
        if self.no_progress {
            unsafe {
                std::env::set_var("MODPKG_NO_PROGRESS", "1");
            }
        }
        if let Some(config_path) = &self.config_path {
            unsafe {
                std::env::set_var("MODPKG_CONFIG_PATH", config_path);
            }
        }
    }
}

/// Top-level CLI parser for the `modpkg` binary.
#[derive(Parser)]
#[command(
    name = "modpkg",
    about = "Package modular application artifacts against a host application",
    version,
    author,
    long_about = "modpkg bundles a module artifact together with the runtime dependencies \
                  that its host application does not already provide, producing a deployable \
                  archive via an external assembler."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    ///
    /// Shows debug-level messages, including dependency-graph details and the
    /// full assembler invocation. Equivalent to `RUST_LOG=debug`. Mutually
    /// exclusive with `--quiet`.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    ///
    /// Useful for scripts and CI pipelines where only failures matter.
    /// Mutually exclusive with `--verbose`.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global configuration file with server credentials.
    ///
    /// Overrides the default location (`~/.modpkg/config.toml`). The file
    /// holds credentials for the repositories that `deploy` uploads to.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the project file (modpkg.toml).
    ///
    /// By default the current directory and its parents are searched. An
    /// explicit path is useful when running from outside the project root or
    /// in CI layouts where the checkout lives elsewhere.
    #[arg(long, global = true)]
    project_file: Option<PathBuf>,

    /// Disable progress bars and spinners for automation.
    ///
    /// Plain text status messages are logged instead. Recommended for CI
    /// systems and terminals without ANSI support.
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Package the module against its host application.
    ///
    /// Loads the dependency graph, subtracts everything the host application
    /// already provides, enriches the artifact manifest, and invokes the
    /// assembler to produce the final archive.
    ///
    /// See [`build::BuildCommand`] for detailed options.
    Build(build::BuildCommand),

    /// Upload a packaged module archive to a remote repository.
    ///
    /// Reads repository settings from `[deploy.repository]` in the project
    /// file and credentials from the global configuration.
    ///
    /// See [`deploy::DeployCommand`] for detailed options.
    Deploy(deploy::DeployCommand),
}

impl Cli {
    /// Execute the CLI with configuration derived from the parsed flags.
    ///
    /// This is the main entry point: it builds a [`CliConfig`] from the global
    /// flags and delegates to [`execute_with_config`](Self::execute_with_config).
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed global flags.
    ///
    /// Verbose maps to debug-level logging, quiet disables logging entirely,
    /// and the default is info level (overridable through `RUST_LOG`).
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    /// Execute the CLI with an explicit configuration.
    ///
    /// Separated from [`execute`](Self::execute) so tests can inject a
    /// configuration without touching the parser.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        init_logging(&config);
        config.apply_to_env();

        match self.command {
            Commands::Build(cmd) => cmd.execute_with_project_file(self.project_file).await,
            Commands::Deploy(cmd) => cmd.execute_with_project_file(self.project_file).await,
        }
    }
}

/// Install the global tracing subscriber according to the CLI configuration.
///
/// Quiet mode installs no subscriber at all; errors still reach the user
/// through the error display in `main`. At the default info level an existing
/// `RUST_LOG` setting takes precedence, so power users can enable per-module
/// filters without `--verbose`.
fn init_logging(config: &CliConfig) {
    let filter = match config.log_level.as_deref() {
        None => return,
        Some("info") => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        }
        Some(level) => EnvFilter::new(level),
    };

    // try_init: integration tests may execute several commands in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
