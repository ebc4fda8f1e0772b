//! Utilities and helpers
//!
//! This module provides utility functions for file operations and user
//! interface elements like progress bars.
//!
//! # Modules
//!
//! - [`fs`] - File system operations with atomic writes and checksums
//! - [`progress`] - Progress bars and spinners for long-running operations

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, calculate_checksum, ensure_dir, safe_write};
pub use progress::{ProgressBar, ProgressStyle};
