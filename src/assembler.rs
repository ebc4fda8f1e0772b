//! Type-safe assembler command builder for consistent invocation
//!
//! modpkg never builds the final archive itself: it emits an assembly
//! descriptor and delegates to an external assembler executable. This module
//! provides a fluent API for constructing and executing that invocation,
//! ensuring consistent discovery, timeout handling, and error capture.
//!
//! The assembler contract is deliberately small: it is called as
//! `<assembler> --descriptor <path> --output <path>` and must exit zero after
//! producing the archive at the output path. Invocation is a single attempt;
//! a failed or timed-out assembly is fatal and never retried.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::assembler_timeout;
use crate::core::ModpkgError;

/// Captured output of a completed assembler run.
#[derive(Debug, Clone)]
pub struct AssemblerOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Builder for constructing and executing assembler invocations.
///
/// # Examples
///
/// ```rust,ignore
/// use modpkg_cli::assembler::AssemblerCommand;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// AssemblerCommand::assemble(
///     "module-assembler",
///     Path::new("target/assembly/my-module-assembly-descriptor.json"),
///     Path::new("target/my-module-1.0.0.zip"),
/// )
/// .execute_success()
/// .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// New commands are created with:
/// - **Timeout**: 300 seconds
/// - **Output capture**: enabled
/// - **Working directory**: current process directory
pub struct AssemblerCommand {
    /// Name or path of the assembler executable
    program: String,

    /// Arguments passed to the assembler
    args: Vec<String>,

    /// Working directory for the assembler process
    current_dir: Option<PathBuf>,

    /// Environment variables to set for the assembler process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string for log messages
    context: Option<String>,
}

impl AssemblerCommand {
    /// Create a builder for the given assembler executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: Some(assembler_timeout()),
            context: None,
        }
    }

    /// The standard assembly invocation: consume a descriptor, produce an archive.
    pub fn assemble(program: impl Into<String>, descriptor: &Path, output: &Path) -> Self {
        Self::new(program)
            .arg("--descriptor")
            .arg(descriptor.display().to_string())
            .arg("--output")
            .arg(output.display().to_string())
    }

    /// Set the working directory for the assembler process.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the assembler process.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Override the default timeout. `None` disables the timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Attach a context string included in log messages.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Resolve the assembler executable.
    ///
    /// Values containing a path separator are taken as explicit paths and only
    /// checked for existence; bare names are looked up on `PATH`.
    fn resolve_program(&self) -> Result<PathBuf> {
        let program = Path::new(&self.program);
        if self.program.contains(std::path::MAIN_SEPARATOR) || program.is_absolute() {
            if program.exists() {
                return Ok(program.to_path_buf());
            }
            return Err(ModpkgError::AssemblerNotFound {
                name: self.program.clone(),
            }
            .into());
        }

        which::which(&self.program).map_err(|_| {
            ModpkgError::AssemblerNotFound {
                name: self.program.clone(),
            }
            .into()
        })
    }

    /// Execute the assembler and capture its output.
    ///
    /// Returns the captured output on success. A non-zero exit or a timeout
    /// maps to [`ModpkgError::AssemblerCommandError`] carrying the process
    /// standard error.
    pub async fn execute(self) -> Result<AssemblerOutput> {
        let start = std::time::Instant::now();
        let program = self.resolve_program()?;
        let mut cmd = Command::new(&program);

        cmd.args(&self.args);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        if let Some(ref ctx) = self.context {
            tracing::debug!(
                target: "assembler",
                "({}) Executing command: {} {}",
                ctx,
                program.display(),
                self.args.join(" ")
            );
        } else {
            tracing::debug!(
                target: "assembler",
                "Executing command: {} {}",
                program.display(),
                self.args.join(" ")
            );
        }

        for (key, value) in &self.env_vars {
            tracing::trace!(target: "assembler", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output_future = cmd.output();

        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.context(format!("Failed to execute {}", program.display()))?
            } else {
                tracing::warn!(
                    target: "assembler",
                    "Assembler timed out after {} seconds: {} {}",
                    duration.as_secs(),
                    program.display(),
                    self.args.join(" ")
                );
                return Err(ModpkgError::AssemblerCommandError {
                    operation: "assemble".to_string(),
                    stderr: format!(
                        "Assembler timed out after {} seconds. The process was killed and \
                         the assembly is not retried. Try running it manually: {} {}",
                        duration.as_secs(),
                        program.display(),
                        self.args.join(" ")
                    ),
                }
                .into());
            }
        } else {
            output_future.await.context(format!("Failed to execute {}", program.display()))?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);

            tracing::debug!(
                target: "assembler",
                "Assembler failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "assembler", "Error: {}", stderr);
            }

            return Err(ModpkgError::AssemblerCommandError {
                operation: "assemble".to_string(),
                stderr: if stderr.is_empty() {
                    stdout.to_string()
                } else {
                    stderr.to_string()
                },
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stdout.is_empty() {
            tracing::debug!(target: "assembler", "{}", stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "assembler", "{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "assembler",
                "Assembly took {:.2}s",
                elapsed.as_secs_f64()
            );
        }

        Ok(AssemblerOutput {
            stdout,
            stderr,
        })
    }

    /// Execute the assembler and discard the captured output.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}
