//! Descriptor construction.
//!
//! Two shapes exist, selected by the `single_output` configuration flag:
//!
//! - **Single output**: the final module archive contains the module artifact
//!   at the root plus its unique dependencies under `/libs`. One file set
//!   carries the artifact, one dependency set carries the dependencies, and
//!   the project artifact is excluded from the dependency set to avoid
//!   shipping it twice.
//! - **Separate output**: the archive contains only dependencies at the root,
//!   with the module artifact folded into the dependency set via
//!   `use_project_artifact`. Used when the artifact itself is distributed
//!   through a different channel.
//!
//! Both constructors return complete immutable values; there is no partially
//! built descriptor state to share or mutate.

use std::path::Path;

use crate::constants::DESCRIPTOR_SUFFIX;
use crate::exclusions::ExclusionSet;

use super::{
    ARCHIVE_FORMAT, DependencySet, FileSet, LIBS_OUTPUT_DIR, PackagingDescriptor,
    ROOT_OUTPUT_DIR, RUNTIME_SCOPE,
};

/// Project-side inputs of descriptor construction.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorContext<'a> {
    /// Artifact identifier of the module being packaged.
    pub artifact: &'a str,
    /// Build output directory holding the module artifact.
    pub build_dir: &'a Path,
    /// File name of the module artifact, e.g. `my-module-1.0.0.jar`.
    pub artifact_file: &'a str,
}

impl DescriptorContext<'_> {
    /// Descriptor identifier derived from the artifact identifier.
    #[must_use]
    pub fn descriptor_id(&self) -> String {
        format!("{}{}", self.artifact, DESCRIPTOR_SUFFIX)
    }

    /// Build the single-output descriptor: artifact at the archive root,
    /// unique dependencies under `/libs`.
    #[must_use]
    pub fn single_output(&self, excludes: ExclusionSet) -> PackagingDescriptor {
        PackagingDescriptor {
            id: self.descriptor_id(),
            format: ARCHIVE_FORMAT.to_string(),
            include_base_directory: false,
            file_sets: vec![FileSet {
                directory: self.build_dir.display().to_string(),
                output_directory: ROOT_OUTPUT_DIR.to_string(),
                includes: vec![self.artifact_file.to_string()],
            }],
            dependency_sets: vec![DependencySet {
                output_directory: LIBS_OUTPUT_DIR.to_string(),
                scope: RUNTIME_SCOPE.to_string(),
                unpack: false,
                use_project_artifact: false,
                use_transitive_filtering: true,
                excludes: excludes.into_entries(),
            }],
        }
    }

    /// Build the separate-output descriptor: dependencies only, at the
    /// archive root, with the project artifact drawn in through the
    /// dependency set.
    #[must_use]
    pub fn separate_output(&self, excludes: ExclusionSet) -> PackagingDescriptor {
        PackagingDescriptor {
            id: self.descriptor_id(),
            format: ARCHIVE_FORMAT.to_string(),
            include_base_directory: false,
            file_sets: Vec::new(),
            dependency_sets: vec![DependencySet {
                output_directory: ROOT_OUTPUT_DIR.to_string(),
                scope: RUNTIME_SCOPE.to_string(),
                unpack: false,
                use_project_artifact: true,
                use_transitive_filtering: true,
                excludes: excludes.into_entries(),
            }],
        }
    }
}
