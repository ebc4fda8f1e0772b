//! Core types and functionality for modpkg
//!
//! This module forms the foundation of modpkg's type system. It currently hosts
//! the error handling layer shared by every other module.
//!
//! # Error Management
//!
//! modpkg uses an error handling system designed for both developer ergonomics
//! and end-user experience:
//! - **Strongly-typed errors** ([`ModpkgError`]) for precise error handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions for CLI users
//! - **Automatic error conversion** from common standard library errors
//! - **Contextual suggestions** tailored to specific error conditions
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use modpkg_cli::core::{ModpkgError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     // Simulate an operation that might fail
//!     Err(ModpkgError::ProjectConfigNotFound.into())
//! }
//!
//! fn handle_operation() {
//!     match example_operation() {
//!         Ok(result) => println!("Success: {}", result),
//!         Err(e) => {
//!             // Convert to user-friendly error and display
//!             let friendly = user_friendly_error(e);
//!             friendly.display(); // Shows colored error with suggestions
//!         }
//!     }
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, IntoAnyhowWithContext, ModpkgError, user_friendly_error};
