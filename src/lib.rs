//! modpkg - Module Packaging Tool
//!
//! A packaging step for modular applications: modpkg bundles a built module
//! artifact together with exactly the runtime dependencies its host
//! application does not already provide, and hands the external assembler a
//! descriptor telling it what goes into the final archive.
//!
//! # Architecture Overview
//!
//! modpkg sits between two neighbors it does not replace:
//! - The **build orchestrator** compiles the module and resolves its full
//!   transitive dependency graph, which it emits as a JSON tree
//!   (`dependency-graph.json`)
//! - The **assembler** consumes the assembly descriptor modpkg writes and
//!   produces the final zip archive
//!
//! Between those two, the packaging pipeline is pure bookkeeping:
//!
//! 1. Find the host application's node in the dependency graph
//! 2. Flatten its subtree into the set of artifacts the host already ships
//! 3. Compose the exclusion set (host, its subtree, manual patterns)
//! 4. Post-process the built artifact: enrich `META-INF/MANIFEST.MF` with
//!    module metadata, generate the Spring auto-configuration imports file,
//!    strip bundled `application.*` configuration
//! 5. Write the assembly descriptor and invoke the assembler
//!
//! The result is an archive carrying the module plus only its unique
//! dependencies, so deploying a module into a running host never duplicates
//! (or worse, downgrades) libraries the host already loads.
//!
//! # Core Modules
//!
//! ## Packaging Pipeline
//! - [`graph`] - Dependency tree model, host lookup, subtree flattening
//! - [`hostapp`] - Host application selection and missing-host policy
//! - [`exclusions`] - Exclusion set composition with stable ordering
//! - [`descriptor`] - Assembly descriptor model and the two output layouts
//! - [`assembler`] - External assembler invocation with timeout and capture
//!
//! ## Artifact Post-Processing
//! - [`archive`] - Jar manifest parsing/enrichment and config stripping
//! - [`scan`] - Auto-configuration class scan over compiled classes
//!
//! ## Supporting Modules
//! - [`artifact`] - `group:artifact:version` coordinate type
//! - [`cli`] - Command-line interface (`build`, `deploy`)
//! - [`config`] - Project (`modpkg.toml`) and global configuration
//! - [`core`] - Error types and user-facing error presentation
//! - [`utils`] - File system helpers and progress reporting
//!
//! # Project File (modpkg.toml)
//!
//! ```toml
//! [project]
//! group = "com.example"
//! artifact = "my-module"
//! version = "1.0.0"
//! developers = ["Jane Doe"]
//!
//! [host]
//! group = "com.acme"
//! artifact = "platform-app"
//! version = "6.1.0"
//!
//! [assembly]
//! excludes = ["com.acme:internal-tools:2.0"]
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use modpkg_cli::artifact::ArtifactCoords;
//! use modpkg_cli::graph::{DependencyGraph, flatten};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let graph = DependencyGraph::load(Path::new("target/dependency-graph.json"))?;
//! let host = graph.find_node(&ArtifactCoords::new("com.acme", "platform-app", "6.1.0"));
//! let provided = flatten(host);
//! println!("host ships {} artifacts", provided.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod artifact;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod descriptor;
pub mod exclusions;
pub mod graph;
pub mod hostapp;
pub mod scan;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
