//! Error handling for modpkg
//!
//! This module provides the error types and user-friendly error reporting used across
//! the packaging pipeline. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`ModpkgError`] - Enumerated error types for all failure cases in modpkg
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! modpkg errors are organized into several categories:
//! - **Host application**: [`ModpkgError::HostApplicationNotFound`], [`ModpkgError::HostApplicationNotConfigured`]
//! - **Dependency graph**: [`ModpkgError::GraphNotFound`], [`ModpkgError::GraphParseError`]
//! - **Assembly**: [`ModpkgError::AssemblerNotFound`], [`ModpkgError::AssemblerCommandError`], [`ModpkgError::DescriptorWriteError`]
//! - **Artifact rewriting**: [`ModpkgError::ArchiveError`]
//! - **Configuration**: [`ModpkgError::ProjectConfigNotFound`], [`ModpkgError::ProjectConfigParseError`], [`ModpkgError::ConfigError`]
//! - **Deployment**: [`ModpkgError::ServerNotConfigured`], [`ModpkgError::UploadFailed`], [`ModpkgError::UnsupportedRepositoryKind`]
//!
//! # Error Conversion and Context
//!
//! Common standard library and ecosystem errors are automatically converted:
//! - [`std::io::Error`] → [`ModpkgError::IoError`]
//! - [`toml::de::Error`] → [`ModpkgError::TomlError`]
//! - [`serde_json::Error`] → [`ModpkgError::JsonError`]
//! - [`reqwest::Error`] → [`ModpkgError::HttpError`]
//!
//! Use [`user_friendly_error`] to convert any error into a user-friendly format with
//! contextual suggestions.
//!
//! # Examples
//!
//! ## Basic Error Handling
//!
//! ```rust,no_run
//! use modpkg_cli::core::{ModpkgError, ErrorContext, user_friendly_error};
//!
//! fn locate_assembler() -> Result<(), ModpkgError> {
//!     // Simulate a missing assembler executable
//!     Err(ModpkgError::AssemblerNotFound { name: "module-assembler".to_string() })
//! }
//!
//! match locate_assembler() {
//!     Ok(_) => println!("Success!"),
//!     Err(e) => {
//!         let ctx = user_friendly_error(anyhow::Error::from(e));
//!         ctx.display(); // Shows colored error with suggestions
//!     }
//! }
//! ```
//!
//! ## Creating Error Context Manually
//!
//! ```rust,no_run
//! use modpkg_cli::core::{ModpkgError, ErrorContext};
//!
//! let error = ModpkgError::ProjectConfigNotFound;
//! let context = ErrorContext::new(error)
//!     .with_suggestion("Create a modpkg.toml file in your project directory")
//!     .with_details("modpkg searches for modpkg.toml in current and parent directories");
//!
//! // Display with colors in terminal
//! context.display();
//!
//! // Or get as string for logging
//! let message = format!("{}", context);
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for modpkg operations
///
/// This enum represents all failures that can occur while packaging or deploying a
/// module. Each variant carries the context needed to explain the failure and to
/// choose an appropriate recovery suggestion.
///
/// # Design Philosophy
///
/// - **Specific Error Types**: Each variant represents one failure mode
/// - **Rich Context**: Errors include relevant details like file paths, coordinates, and reasons
/// - **User-Friendly**: Error messages are written for end users, not just developers
/// - **Actionable**: Most errors provide clear guidance on how to resolve the issue
///
/// # Examples
///
/// ## Pattern Matching on Errors
///
/// ```rust,no_run
/// use modpkg_cli::core::ModpkgError;
///
/// fn handle_error(error: ModpkgError) {
///     match error {
///         ModpkgError::AssemblerNotFound { name } => {
///             eprintln!("Install {} or set [assembly].assembler in modpkg.toml", name);
///             std::process::exit(1);
///         }
///         ModpkgError::HostApplicationNotFound { group, artifact, version } => {
///             eprintln!("{}:{}:{} is not in the dependency graph", group, artifact, version);
///         }
///         ModpkgError::UploadFailed { url, .. } => {
///             eprintln!("Upload to {} failed: check your connection", url);
///         }
///         _ => {
///             eprintln!("Unexpected error: {}", error);
///         }
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum ModpkgError {
    /// Host application artifact not present in the dependency graph
    ///
    /// This error occurs when a host application was configured (explicitly or via
    /// the conventional coordinates plus a version) but no node in the resolved
    /// dependency graph matches it. Packaging cannot continue because the
    /// exclusion set would silently be wrong.
    ///
    /// # Fields
    /// - `group`: Group identifier of the configured host
    /// - `artifact`: Artifact identifier of the configured host
    /// - `version`: Version of the configured host
    #[error("Host application '{group}:{artifact}:{version}' not found in the dependency graph")]
    HostApplicationNotFound {
        /// Group identifier of the configured host application
        group: String,
        /// Artifact identifier of the configured host application
        artifact: String,
        /// Version of the configured host application
        version: String,
    },

    /// No host application configured while the missing-host policy is `fail`
    ///
    /// The packaging step can run without a host (everything gets bundled), but
    /// only when the configuration explicitly opts into that behavior with
    /// `on_missing = "warn"`. Under the `fail` policy an absent host is a
    /// configuration error.
    #[error("No host application configured and [host].on_missing is set to 'fail'")]
    HostApplicationNotConfigured,

    /// Artifact coordinates string could not be parsed
    ///
    /// Coordinates are expected as `group:artifact:version` with all three
    /// segments non-blank.
    #[error("Invalid artifact coordinates '{value}': {reason}")]
    InvalidCoordinates {
        /// The coordinate string that failed to parse
        value: String,
        /// Specific reason the coordinates are invalid
        reason: String,
    },

    /// Dependency graph file missing
    ///
    /// The resolved dependency graph is produced by the build orchestrator before
    /// modpkg runs. A missing graph file usually means the resolve step was
    /// skipped or the `[build].graph` path is wrong.
    #[error("Dependency graph not found: {path}")]
    GraphNotFound {
        /// Path where the dependency graph was expected
        path: String,
    },

    /// Dependency graph parsing error
    #[error("Invalid dependency graph in {file}")]
    GraphParseError {
        /// Path to the graph file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Assembler executable not found
    ///
    /// modpkg delegates archive creation to an external assembler executable,
    /// located on `PATH` or configured via `[assembly].assembler`.
    #[error("Assembler '{name}' is not installed or not found in PATH")]
    AssemblerNotFound {
        /// Name or path of the assembler executable that could not be located
        name: String,
    },

    /// Assembler invocation failed
    ///
    /// This error occurs when the assembler process returns a non-zero exit code
    /// or cannot be spawned. The captured standard error output is preserved for
    /// diagnosis. Assembly is never retried.
    ///
    /// # Fields
    /// - `operation`: What the assembler was asked to do
    /// - `stderr`: The error output from the assembler process
    #[error("Assembler invocation failed: {operation}")]
    AssemblerCommandError {
        /// The assembler operation that failed
        operation: String,
        /// The error output from the assembler process
        stderr: String,
    },

    /// Assembly descriptor could not be written
    #[error("Failed to write assembly descriptor to {path}")]
    DescriptorWriteError {
        /// Path of the descriptor file that could not be written
        path: String,
        /// Reason the write failed
        reason: String,
    },

    /// Artifact archive rewrite failed
    ///
    /// Raised when the packaged artifact cannot be opened, read, or rewritten
    /// during manifest enrichment or bundled-configuration stripping.
    #[error("Failed to rewrite artifact archive {file}")]
    ArchiveError {
        /// Path of the archive being rewritten
        file: String,
        /// Reason the rewrite failed
        reason: String,
    },

    /// Embedded JAR manifest could not be parsed
    #[error("Invalid manifest content: {reason}")]
    ManifestParseError {
        /// Description of the malformed manifest line
        reason: String,
    },

    /// Packaged module file missing
    ///
    /// The deploy command requires the packaged archive produced by a previous
    /// build invocation.
    #[error("Packaged module file not found: {path}")]
    PackageFileNotFound {
        /// Path where the packaged module was expected
        path: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Project configuration file (modpkg.toml) not found
    ///
    /// modpkg searches for modpkg.toml starting from the current working
    /// directory and walking up the directory tree, similar to how git searches
    /// for .git.
    #[error("Project file modpkg.toml not found in current directory or any parent directory")]
    ProjectConfigNotFound,

    /// Project configuration parsing error
    #[error("Invalid project file syntax in {file}")]
    ProjectConfigParseError {
        /// Path to the project file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Global config file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the configuration file that was not found
        path: String,
    },

    /// Deploy repository not configured
    #[error("No [deploy.repository] section configured in modpkg.toml")]
    RepositoryNotConfigured,

    /// Repository kind not supported for upload
    #[error("Repository kind '{kind}' is not supported for upload")]
    UnsupportedRepositoryKind {
        /// The unsupported repository kind
        kind: String,
    },

    /// Server credentials missing from the global configuration
    #[error("Server '{id}' is not configured in the global config")]
    ServerNotConfigured {
        /// Identifier of the server entry that is missing
        id: String,
    },

    /// Module upload failed
    ///
    /// Uploads are a single attempt; transport-level robustness is out of scope.
    #[error("Failed to upload module to {url}")]
    UploadFailed {
        /// Repository URL the upload targeted
        url: String,
        /// Reason the upload failed
        reason: String,
    },

    /// Network error
    #[error("Network error: {operation}")]
    NetworkError {
        /// The network operation that failed
        operation: String,
        /// Reason for the network failure
        reason: String,
    },

    /// File system error
    #[error("File system error: {operation}")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// Path where the file system error occurred
        path: String,
    },

    /// Permission denied
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// The operation that was denied due to insufficient permissions
        operation: String,
        /// Path where permission was denied
        path: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for ModpkgError {
    fn clone(&self) -> Self {
        match self {
            Self::HostApplicationNotFound {
                group,
                artifact,
                version,
            } => Self::HostApplicationNotFound {
                group: group.clone(),
                artifact: artifact.clone(),
                version: version.clone(),
            },
            Self::HostApplicationNotConfigured => Self::HostApplicationNotConfigured,
            Self::InvalidCoordinates {
                value,
                reason,
            } => Self::InvalidCoordinates {
                value: value.clone(),
                reason: reason.clone(),
            },
            Self::GraphNotFound {
                path,
            } => Self::GraphNotFound {
                path: path.clone(),
            },
            Self::GraphParseError {
                file,
                reason,
            } => Self::GraphParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::AssemblerNotFound {
                name,
            } => Self::AssemblerNotFound {
                name: name.clone(),
            },
            Self::AssemblerCommandError {
                operation,
                stderr,
            } => Self::AssemblerCommandError {
                operation: operation.clone(),
                stderr: stderr.clone(),
            },
            Self::DescriptorWriteError {
                path,
                reason,
            } => Self::DescriptorWriteError {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ArchiveError {
                file,
                reason,
            } => Self::ArchiveError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ManifestParseError {
                reason,
            } => Self::ManifestParseError {
                reason: reason.clone(),
            },
            Self::PackageFileNotFound {
                path,
            } => Self::PackageFileNotFound {
                path: path.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ProjectConfigNotFound => Self::ProjectConfigNotFound,
            Self::ProjectConfigParseError {
                file,
                reason,
            } => Self::ProjectConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            Self::RepositoryNotConfigured => Self::RepositoryNotConfigured,
            Self::UnsupportedRepositoryKind {
                kind,
            } => Self::UnsupportedRepositoryKind {
                kind: kind.clone(),
            },
            Self::ServerNotConfigured {
                id,
            } => Self::ServerNotConfigured {
                id: id.clone(),
            },
            Self::UploadFailed {
                url,
                reason,
            } => Self::UploadFailed {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::NetworkError {
                operation,
                reason,
            } => Self::NetworkError {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::PermissionDenied {
                operation,
                path,
            } => Self::PermissionDenied {
                operation: operation.clone(),
                path: path.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::TomlSerError(e) => Self::Other {
                message: format!("TOML serialization error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::HttpError(e) => Self::Other {
                message: format!("HTTP error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`ModpkgError`] and adds optional user-friendly messages,
/// suggestions for resolution, and additional details. This is the primary way
/// modpkg presents errors to CLI users.
///
/// # Display Format
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use modpkg_cli::core::{ModpkgError, ErrorContext};
///
/// let error = ModpkgError::AssemblerNotFound { name: "module-assembler".to_string() };
/// let context = ErrorContext::new(error)
///     .with_suggestion("Install the assembler or set [assembly].assembler to its path")
///     .with_details("modpkg delegates archive creation to an external assembler");
///
/// // Display to terminal with colors
/// context.display();
///
/// // Or convert to string for logging
/// let message = context.to_string();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying modpkg error
    pub error: ModpkgError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`ModpkgError`]
    ///
    /// This creates a basic error context with no additional suggestions or details.
    /// Use the builder methods [`with_suggestion`] and [`with_details`] to add
    /// user-friendly information.
    ///
    /// [`with_suggestion`]: ErrorContext::with_suggestion
    /// [`with_details`]: ErrorContext::with_details
    #[must_use]
    pub const fn new(error: ModpkgError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions should be actionable steps that users can take to resolve
    /// the error. They are displayed in green in the terminal to draw attention.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    ///
    /// Details provide context about why the error occurred or what it means.
    /// They are displayed in yellow in the terminal.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// This method prints the error, details, and suggestion to stderr using
    /// color coding:
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }

    /// Create an [`ErrorContext`] with only a suggestion (no specific error)
    ///
    /// This is useful for generic errors where you want to provide a suggestion
    /// but don't have a specific [`ModpkgError`] variant.
    pub fn suggestion(suggestion: impl Into<String>) -> Self {
        Self {
            error: ModpkgError::Other {
                message: String::new(),
            },
            suggestion: Some(suggestion.into()),
            details: None,
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Extension trait for converting [`ModpkgError`] to [`anyhow::Error`] with context
///
/// This trait provides a method to convert modpkg-specific errors into generic
/// [`anyhow::Error`] instances while preserving user-friendly context information.
pub trait IntoAnyhowWithContext {
    /// Convert the error to an [`anyhow::Error`] with the provided context
    fn into_anyhow_with_context(self, context: ErrorContext) -> anyhow::Error;
}

impl IntoAnyhowWithContext for ModpkgError {
    fn into_anyhow_with_context(self, context: ErrorContext) -> anyhow::Error {
        anyhow::Error::new(ErrorContext {
            error: self,
            suggestion: context.suggestion,
            details: context.details,
        })
    }
}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// This function is the main entry point for converting arbitrary errors into
/// user-friendly error messages for CLI display. It recognizes common error types
/// and provides appropriate context and suggestions.
///
/// # Error Recognition
///
/// The function recognizes and provides specific handling for:
/// - [`ModpkgError`] variants with tailored suggestions
/// - [`std::io::Error`] with filesystem-specific guidance
/// - [`toml::de::Error`] with TOML syntax help
/// - Generic errors with basic context
///
/// # Examples
///
/// ```rust,no_run
/// use modpkg_cli::core::user_friendly_error;
///
/// let error = anyhow::anyhow!("Something went wrong");
/// let context = user_friendly_error(error);
///
/// context.display(); // Shows the error with generic formatting
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    // An already-built context wins, falling back to the default suggestion
    // and details for its error variant where it left them unset
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        let defaults = create_error_context(ctx.error.clone());
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone().or(defaults.suggestion),
            details: ctx.details.clone().or(defaults.details),
        };
    }

    // Check for specific error types and provide helpful suggestions
    if let Some(modpkg_error) = error.downcast_ref::<ModpkgError>() {
        return create_error_context(modpkg_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ModpkgError::PermissionDenied {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Try running with elevated permissions (sudo/Administrator) or check file ownership")
                .with_details("This error occurs when modpkg doesn't have permission to read or write files");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ModpkgError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(
                    "This error occurs when a required file or directory cannot be found",
                );
            }
            std::io::ErrorKind::AlreadyExists => {
                return ErrorContext::new(ModpkgError::FileSystemError {
                    operation: "file creation".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Remove the existing file or choose a different output path")
                .with_details("The target file or directory already exists");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(ModpkgError::ProjectConfigParseError {
            file: "modpkg.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your modpkg.toml file. Verify quotes, brackets, and indentation")
        .with_details("TOML parsing errors are usually caused by syntax issues like missing quotes or mismatched brackets");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    // Append error chain if available
    let chain: Vec<String> = error
        .chain()
        .skip(1) // Skip the root cause which is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ModpkgError::Other {
        message,
    })
}

/// Create appropriate [`ErrorContext`] with suggestions for specific modpkg errors
///
/// This internal function maps each [`ModpkgError`] variant to an appropriate
/// [`ErrorContext`] with tailored suggestions and details. It's used by
/// [`user_friendly_error`] to provide consistent, helpful error messages.
fn create_error_context(error: ModpkgError) -> ErrorContext {
    match &error {
        ModpkgError::HostApplicationNotFound { group, artifact, version } => {
            ErrorContext::new(error.clone())
                .with_suggestion(format!(
                    "Verify that '{group}:{artifact}:{version}' matches a dependency of this module, or remove the host configuration to bundle all dependencies"
                ))
                .with_details("The host application's dependency subtree is subtracted from the package. A host that is not in the graph would silently produce a wrong package, so this is a hard failure")
        }

        ModpkgError::HostApplicationNotConfigured => ErrorContext::new(error.clone())
            .with_suggestion("Set [host].version or [host].coordinates in modpkg.toml, or relax the policy with on_missing = \"warn\"")
            .with_details("Under on_missing = \"fail\" the packaging step refuses to run without a host application"),

        ModpkgError::InvalidCoordinates { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Use the form group:artifact:version with all three segments non-empty, e.g. 'com.acme:platform-app:6.1.0'"),

        ModpkgError::GraphNotFound { path } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Run the orchestrator's dependency resolution step first, or point [build].graph at the resolved graph file (looked in {path})"
            ))
            .with_details("modpkg consumes the dependency graph resolved by the surrounding build tool; it does not resolve versions itself"),

        ModpkgError::GraphParseError { file, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Regenerate {file} with the orchestrator's resolve step; the file must be a JSON tree of group/artifact/version nodes"
            )),

        ModpkgError::AssemblerNotFound { name } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Install '{name}' and ensure it is in your PATH, or set [assembly].assembler to an absolute path"
            ))
            .with_details("modpkg emits an assembly descriptor and delegates archive creation to an external assembler executable"),

        ModpkgError::AssemblerCommandError { stderr, .. } => ErrorContext::new(error.clone())
            .with_suggestion("Inspect the assembler output below and the generated descriptor under the build directory's assembly/ folder")
            .with_details(stderr.clone()),

        ModpkgError::DescriptorWriteError { path, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Check that the build directory containing {path} exists and is writable")),

        ModpkgError::ArchiveError { file, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Verify that {file} is a valid zip-based artifact produced by the build and is not open in another process"
            )),

        ModpkgError::ManifestParseError { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check that META-INF/MANIFEST.MF inside the artifact follows the 'Name: value' attribute format"),

        ModpkgError::PackageFileNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Run 'modpkg build' first, or pass --file with the path to the packaged archive"),

        ModpkgError::ProjectConfigNotFound => ErrorContext::new(error.clone())
            .with_suggestion("Create a modpkg.toml file in your project directory. See documentation for the project file format")
            .with_details("modpkg looks for modpkg.toml in the current directory and parent directories up to the filesystem root"),

        ModpkgError::ProjectConfigParseError { file, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Check the TOML syntax in {file}. Common issues: missing quotes, unmatched brackets, invalid characters"
            )),

        ModpkgError::ConfigNotFound { path } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Create the configuration file at {path} or set MODPKG_CONFIG_PATH")),

        ModpkgError::RepositoryNotConfigured => ErrorContext::new(error.clone())
            .with_suggestion("Add a [deploy.repository] section with url, kind, and server_id to modpkg.toml"),

        ModpkgError::UnsupportedRepositoryKind { kind } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Repository kind '{kind}' cannot be uploaded to; use 'nexus' or 'http'")),

        ModpkgError::ServerNotConfigured { id } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Add a [servers.{id}] entry with username and password to ~/.modpkg/config.toml"
            ))
            .with_details("Deployment credentials live in the global config so they are never committed to version control"),

        ModpkgError::UploadFailed { reason, .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check the repository URL, your network connection, and the server credentials. Uploads are not retried automatically")
            .with_details(reason.clone()),

        ModpkgError::NetworkError { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check your internet connection and the repository URL"),

        ModpkgError::PermissionDenied { path, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Check permissions for {path} or run with appropriate privileges")),

        _ => ErrorContext::new(error.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_not_found_message_carries_coordinates() {
        let err = ModpkgError::HostApplicationNotFound {
            group: "com.acme".to_string(),
            artifact: "platform-app".to_string(),
            version: "6.1.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("com.acme:platform-app:6.1.0"));
    }

    #[test]
    fn test_error_context_builder() {
        let ctx = ErrorContext::new(ModpkgError::ProjectConfigNotFound)
            .with_suggestion("create modpkg.toml")
            .with_details("searched parent directories");

        assert_eq!(ctx.suggestion.as_deref(), Some("create modpkg.toml"));
        assert_eq!(ctx.details.as_deref(), Some("searched parent directories"));

        let rendered = ctx.to_string();
        assert!(rendered.contains("modpkg.toml not found"));
        assert!(rendered.contains("Suggestion: create modpkg.toml"));
        assert!(rendered.contains("Details: searched parent directories"));
    }

    #[test]
    fn test_clone_converts_io_error_to_other() {
        let err = ModpkgError::IoError(std::io::Error::other("boom"));
        let cloned = err.clone();
        match cloned {
            ModpkgError::Other { message } => assert!(message.contains("boom")),
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[test]
    fn test_user_friendly_error_downcasts_modpkg_error() {
        let err = anyhow::Error::from(ModpkgError::AssemblerNotFound {
            name: "module-assembler".to_string(),
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.is_some());
        assert!(ctx.to_string().contains("module-assembler"));
    }

    #[test]
    fn test_user_friendly_error_recognizes_permission_denied() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let ctx = user_friendly_error(anyhow::Error::from(io));
        assert!(matches!(ctx.error, ModpkgError::PermissionDenied { .. }));
    }

    #[test]
    fn test_user_friendly_error_generic_includes_chain() {
        let err = anyhow::anyhow!("root cause").context("outer context");
        let ctx = user_friendly_error(err);
        match ctx.error {
            ModpkgError::Other { message } => {
                assert!(message.contains("outer context"));
                assert!(message.contains("Caused by:"));
                assert!(message.contains("root cause"));
            }
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[test]
    fn test_into_anyhow_with_context_preserves_suggestion() {
        let context = ErrorContext::suggestion("try --verbose");
        let err = ModpkgError::RepositoryNotConfigured.into_anyhow_with_context(context);
        let ctx = err.downcast_ref::<ErrorContext>().unwrap();
        assert_eq!(ctx.suggestion.as_deref(), Some("try --verbose"));
        assert!(matches!(ctx.error, ModpkgError::RepositoryNotConfigured));
    }
}
