//! Assembly descriptor model and serialization.
//!
//! The descriptor is the contract between modpkg and the external assembler:
//! a JSON document telling it what goes into the final archive and, through
//! exclusion entries, what stays out. modpkg writes the descriptor into the
//! build directory's `assembly/` folder and passes its path to the assembler.
//!
//! Descriptors come in exactly two shapes, built by the constructors in
//! [`builder`]. Once constructed a descriptor is an immutable value; nothing
//! mutates it between construction and serialization, which is what makes
//! repeated builds byte-identical.

mod builder;

pub use builder::DescriptorContext;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::ModpkgError;
use crate::utils::fs::safe_write;

/// Archive format emitted by the assembler.
pub const ARCHIVE_FORMAT: &str = "zip";

/// Dependency scope included in the package.
pub const RUNTIME_SCOPE: &str = "runtime";

/// Output directory for bundled dependencies in single-output mode.
pub const LIBS_OUTPUT_DIR: &str = "/libs";

/// Output directory for bundled dependencies in separate-output mode.
pub const ROOT_OUTPUT_DIR: &str = "/";

/// A complete assembly descriptor.
///
/// Serialized as snake_case JSON. Field order is fixed by declaration order,
/// and the exclusion lists arrive pre-sorted, so the serialized form is
/// deterministic for a given build input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingDescriptor {
    /// Descriptor identifier; also the file stem of the written descriptor.
    pub id: String,
    /// Archive format, always `zip`.
    pub format: String,
    /// Whether the archive wraps its content in a base directory. Always false.
    pub include_base_directory: bool,
    /// Plain files copied into the archive.
    pub file_sets: Vec<FileSet>,
    /// Dependency selections resolved by the assembler.
    pub dependency_sets: Vec<DependencySet>,
}

/// A set of plain files to copy into the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    /// Directory the includes are relative to.
    pub directory: String,
    /// Directory inside the archive the files land in.
    pub output_directory: String,
    /// Exact file names to include.
    pub includes: Vec<String>,
}

/// A dependency selection for the assembler to resolve and copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySet {
    /// Directory inside the archive the dependencies land in.
    pub output_directory: String,
    /// Dependency scope to draw from, always `runtime`.
    pub scope: String,
    /// Whether archives are exploded into the package. Always false.
    pub unpack: bool,
    /// Whether the module's own artifact is part of this set.
    pub use_project_artifact: bool,
    /// Whether excludes also prune the subtrees of excluded artifacts.
    pub use_transitive_filtering: bool,
    /// Exclusion entries, sorted.
    pub excludes: Vec<String>,
}

impl PackagingDescriptor {
    /// Write the descriptor as pretty JSON into `dir`.
    ///
    /// The directory is created when missing. The file name is `<id>.json`.
    /// Returns the path of the written descriptor.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.json", self.id));

        let mut content =
            serde_json::to_string_pretty(self).map_err(ModpkgError::JsonError)?;
        content.push('\n');

        safe_write(&path, &content).map_err(|e| ModpkgError::DescriptorWriteError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Wrote assembly descriptor to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> PackagingDescriptor {
        PackagingDescriptor {
            id: "my-module-assembly-descriptor".to_string(),
            format: ARCHIVE_FORMAT.to_string(),
            include_base_directory: false,
            file_sets: vec![FileSet {
                directory: "/project/target".to_string(),
                output_directory: ROOT_OUTPUT_DIR.to_string(),
                includes: vec!["my-module-1.0.0.jar".to_string()],
            }],
            dependency_sets: vec![DependencySet {
                output_directory: LIBS_OUTPUT_DIR.to_string(),
                scope: RUNTIME_SCOPE.to_string(),
                unpack: false,
                use_project_artifact: false,
                use_transitive_filtering: true,
                excludes: vec!["com.acme:platform-app:6.1.0".to_string()],
            }],
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(descriptor()).unwrap();
        assert_eq!(json["format"], "zip");
        assert_eq!(json["include_base_directory"], false);
        assert_eq!(json["file_sets"][0]["output_directory"], "/");
        assert_eq!(json["dependency_sets"][0]["scope"], "runtime");
        assert_eq!(json["dependency_sets"][0]["unpack"], false);
        assert_eq!(json["dependency_sets"][0]["use_transitive_filtering"], true);
    }

    #[test]
    fn test_write_creates_dir_and_file() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("assembly");

        let path = descriptor().write(&dir).unwrap();
        assert_eq!(path, dir.join("my-module-assembly-descriptor.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: PackagingDescriptor = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, descriptor());
    }

    #[test]
    fn test_write_is_deterministic() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("assembly");

        let path = descriptor().write(&dir).unwrap();
        let first = std::fs::read(&path).unwrap();
        let path = descriptor().write(&dir).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }
}
