//! Exclusion set construction.
//!
//! The exclusion set is the package's negative space: the host application
//! itself, every artifact the host already ships (its flattened subtree), and
//! any manually configured exclude patterns. Dependency sets in the assembly
//! descriptor carry these entries so the assembler leaves them out.
//!
//! Entries are plain strings. Graph-derived entries are always exact
//! `group:artifact:version` renderings; manual patterns pass through verbatim
//! because the assembler owns pattern semantics. A `BTreeSet` keeps the set
//! duplicate-free and its serialized order stable, so repeated builds produce
//! byte-identical descriptors.

use std::collections::BTreeSet;

use crate::artifact::ArtifactCoords;

/// Ordered, duplicate-free set of exclusion entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    entries: BTreeSet<String>,
}

impl ExclusionSet {
    /// Empty exclusion set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose the full exclusion set for a build.
    ///
    /// Takes the optional host coordinates, the flattened host subtree, and
    /// the manually configured exclude patterns. Duplicates between any of the
    /// three sources collapse to a single entry. Blank manual patterns are
    /// ignored.
    #[must_use]
    pub fn from_parts(
        host: Option<&ArtifactCoords>,
        host_subtree: &BTreeSet<ArtifactCoords>,
        manual: &[String],
    ) -> Self {
        let mut set = Self::new();
        if let Some(host) = host {
            set.add_coords(host);
        }
        for coords in host_subtree {
            set.add_coords(coords);
        }
        for pattern in manual {
            set.add_pattern(pattern.clone());
        }
        set
    }

    /// Add the exact entry for one artifact.
    pub fn add_coords(&mut self, coords: &ArtifactCoords) {
        self.entries.insert(coords.to_string());
    }

    /// Add a manual exclude pattern verbatim. Blank patterns are dropped.
    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !pattern.trim().is_empty() {
            self.entries.insert(pattern);
        }
    }

    /// Whether an exact entry is present.
    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.contains(entry)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Consume the set into a sorted entry list for the descriptor.
    #[must_use]
    pub fn into_entries(self) -> Vec<String> {
        self.entries.into_iter().collect()
    }
}
