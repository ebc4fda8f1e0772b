//! Global constants used throughout the modpkg codebase.
//!
//! This module contains canonical file names, timeout durations, and other
//! constants that are used across multiple modules. Defining them centrally
//! improves maintainability and makes magic values more discoverable.

use std::time::Duration;

/// Name of the project configuration file.
///
/// modpkg searches for this file starting from the current working directory
/// and walking up the directory tree.
pub const PROJECT_FILE: &str = "modpkg.toml";

/// Name of the resolved dependency graph file inside the build directory.
///
/// The graph is produced by the surrounding build orchestrator's resolve step;
/// modpkg only reads it.
pub const DEPENDENCY_GRAPH_FILE: &str = "dependency-graph.json";

/// Subdirectory of the build directory where assembly descriptors are written.
pub const ASSEMBLY_DIR: &str = "assembly";

/// Suffix appended to the artifact identifier to form the descriptor id.
///
/// The descriptor file is `<artifact><suffix>.json` inside [`ASSEMBLY_DIR`].
pub const DESCRIPTOR_SUFFIX: &str = "-assembly-descriptor";

/// Default name of the external assembler executable.
///
/// Resolved through `PATH` unless `[assembly].assembler` points at an
/// absolute path.
pub const DEFAULT_ASSEMBLER: &str = "module-assembler";

/// Default build output directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "target";

/// Default compiled-classes directory, relative to the project root.
pub const DEFAULT_CLASSES_DIR: &str = "target/classes";

/// Default packaging extension of the module artifact.
pub const DEFAULT_PACKAGING: &str = "jar";

/// Timeout for a single assembler invocation (300 seconds).
///
/// Assembling a large module with many bundled dependencies can take a while;
/// the timeout only guards against a hung assembler process. Assembly is never
/// retried after a timeout.
pub fn assembler_timeout() -> Duration {
    Duration::from_secs(300)
}
