//! Resolved dependency graph handling.
//!
//! The surrounding build orchestrator resolves the module's full transitive
//! dependency graph and hands it to modpkg as a JSON tree. This module owns
//! the wire model of that tree plus the two traversals the packaging pipeline
//! needs: locating the host application node and flattening a subtree into a
//! coordinate set.
//!
//! The graph is a tree, not a DAG: the same coordinates reached through two
//! paths appear as two distinct nodes. modpkg never mutates the tree after
//! loading it.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::artifact::ArtifactCoords;
use crate::core::ModpkgError;

/// One node of the resolved dependency tree.
///
/// The root node is the module project itself; every other node is a direct
/// or transitive dependency. Children appear in the order the orchestrator
/// emitted them, and that order is what makes lookups deterministic.
#[derive(Debug, Clone, Deserialize)]
pub struct DependencyNode {
    /// Group identifier of the artifact at this node
    pub group: String,
    /// Artifact identifier at this node
    pub artifact: String,
    /// Resolved version at this node
    pub version: String,
    /// Direct dependencies of this node, in resolution order
    #[serde(default)]
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    /// Coordinates of this node.
    #[must_use]
    pub fn coords(&self) -> ArtifactCoords {
        ArtifactCoords::new(self.group.clone(), self.artifact.clone(), self.version.clone())
    }

    /// Depth-first search for the first node matching `target`.
    ///
    /// A node is tested before its children, and children are visited in wire
    /// order, so when the same coordinates occur more than once the match
    /// closest to the root (and earliest among siblings) wins. Matching is
    /// case-insensitive on all three coordinate segments.
    #[must_use]
    pub fn find(&self, target: &ArtifactCoords) -> Option<&DependencyNode> {
        if target.matches(self) {
            return Some(self);
        }
        for child in &self.children {
            if let Some(found) = child.find(target) {
                return Some(found);
            }
        }
        None
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// The module's resolved dependency graph.
///
/// Thin wrapper around the root [`DependencyNode`] that owns loading and the
/// whole-tree queries.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    root: DependencyNode,
}

impl DependencyGraph {
    /// Load the graph from the orchestrator's JSON file.
    ///
    /// A missing file and a malformed file are distinct errors: the former
    /// usually means the resolve step never ran, the latter that it produced
    /// something modpkg does not understand.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ModpkgError::GraphNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dependency graph: {}", path.display()))?;

        let root: DependencyNode =
            serde_json::from_str(&content).map_err(|e| ModpkgError::GraphParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            root,
        })
    }

    /// Wrap an already-built tree. Used by tests and fixtures.
    #[must_use]
    pub const fn from_root(root: DependencyNode) -> Self {
        Self {
            root,
        }
    }

    /// The root node (the module project itself).
    #[must_use]
    pub const fn root(&self) -> &DependencyNode {
        &self.root
    }

    /// First node matching `target`, searching depth-first from the root.
    #[must_use]
    pub fn find_node(&self, target: &ArtifactCoords) -> Option<&DependencyNode> {
        self.root.find(target)
    }

    /// Total number of nodes in the tree, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count(node: &DependencyNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    /// Distinct coordinates of every node in the tree.
    ///
    /// Used for near-miss suggestions when a configured host application is
    /// not present in the graph.
    #[must_use]
    pub fn all_coords(&self) -> BTreeSet<ArtifactCoords> {
        fn collect(node: &DependencyNode, out: &mut BTreeSet<ArtifactCoords>) {
            out.insert(node.coords());
            for child in &node.children {
                collect(child, out);
            }
        }
        let mut out = BTreeSet::new();
        collect(&self.root, &mut out);
        out
    }
}

/// Flatten a subtree into the set of its strict descendants' coordinates.
///
/// The node itself is excluded; `None` yields an empty set. Coordinates
/// occurring in several branches collapse to one entry.
///
/// The input must be acyclic. Orchestrator-resolved graphs are trees by
/// construction, so no cycle guard is carried here.
#[must_use]
pub fn flatten(node: Option<&DependencyNode>) -> BTreeSet<ArtifactCoords> {
    fn collect(node: &DependencyNode, out: &mut BTreeSet<ArtifactCoords>) {
        for child in &node.children {
            out.insert(child.coords());
            collect(child, out);
        }
    }

    let mut out = BTreeSet::new();
    if let Some(node) = node {
        collect(node, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(group: &str, artifact: &str, version: &str) -> DependencyNode {
        node(group, artifact, version, Vec::new())
    }

    fn node(
        group: &str,
        artifact: &str,
        version: &str,
        children: Vec<DependencyNode>,
    ) -> DependencyNode {
        DependencyNode {
            group: group.to_string(),
            artifact: artifact.to_string(),
            version: version.to_string(),
            children,
        }
    }

    fn sample_graph() -> DependencyGraph {
        // module
        // ├── host (com.acme:platform-app:6.1.0)
        // │   ├── com.acme:platform-core:6.1.0
        // │   │   └── org.slf4j:slf4j-api:2.0.13
        // │   └── org.springframework:spring-web:6.2.0
        // └── com.example:extra-lib:1.4.0
        //     └── org.slf4j:slf4j-api:2.0.13
        DependencyGraph::from_root(node(
            "com.example",
            "my-module",
            "1.0.0",
            vec![
                node(
                    "com.acme",
                    "platform-app",
                    "6.1.0",
                    vec![
                        node(
                            "com.acme",
                            "platform-core",
                            "6.1.0",
                            vec![leaf("org.slf4j", "slf4j-api", "2.0.13")],
                        ),
                        leaf("org.springframework", "spring-web", "6.2.0"),
                    ],
                ),
                node(
                    "com.example",
                    "extra-lib",
                    "1.4.0",
                    vec![leaf("org.slf4j", "slf4j-api", "2.0.13")],
                ),
            ],
        ))
    }

    #[test]
    fn test_find_node_matches_root() {
        let graph = sample_graph();
        let target = ArtifactCoords::new("com.example", "my-module", "1.0.0");
        let found = graph.find_node(&target).unwrap();
        assert_eq!(found.artifact, "my-module");
    }

    #[test]
    fn test_find_node_nested() {
        let graph = sample_graph();
        let target = ArtifactCoords::new("com.acme", "platform-core", "6.1.0");
        let found = graph.find_node(&target).unwrap();
        assert_eq!(found.children.len(), 1);
    }

    #[test]
    fn test_find_node_case_insensitive() {
        let graph = sample_graph();
        let target = ArtifactCoords::new("COM.ACME", "Platform-App", "6.1.0");
        assert!(graph.find_node(&target).is_some());
    }

    #[test]
    fn test_find_node_absent() {
        let graph = sample_graph();
        let target = ArtifactCoords::new("com.acme", "platform-app", "9.9.9");
        assert!(graph.find_node(&target).is_none());
    }

    #[test]
    fn test_find_node_first_match_wins() {
        // The same coordinates appear under two siblings; the earlier sibling's
        // subtree must win.
        let graph = DependencyGraph::from_root(node(
            "com.example",
            "root",
            "1.0",
            vec![
                node(
                    "a",
                    "first",
                    "1.0",
                    vec![node("dup", "lib", "1.0", vec![leaf("marker", "left", "1")])],
                ),
                node(
                    "b",
                    "second",
                    "1.0",
                    vec![node("dup", "lib", "1.0", vec![leaf("marker", "right", "1")])],
                ),
            ],
        ));

        let found = graph.find_node(&ArtifactCoords::new("dup", "lib", "1.0")).unwrap();
        assert_eq!(found.children[0].artifact, "left");
    }

    #[test]
    fn test_find_node_parent_before_children() {
        // A matching node with a matching descendant: the parent is returned.
        let graph = DependencyGraph::from_root(node(
            "root",
            "root",
            "1.0",
            vec![node(
                "dup",
                "lib",
                "1.0",
                vec![node("dup", "lib", "1.0", vec![leaf("marker", "inner", "1")])],
            )],
        ));

        let found = graph.find_node(&ArtifactCoords::new("dup", "lib", "1.0")).unwrap();
        // The outer node has one child (the inner duplicate), not the marker.
        assert_eq!(found.children[0].artifact, "lib");
    }

    #[test]
    fn test_flatten_none_is_empty() {
        assert!(flatten(None).is_empty());
    }

    #[test]
    fn test_flatten_leaf_is_empty() {
        let node = leaf("com.acme", "platform-app", "6.1.0");
        assert!(flatten(Some(&node)).is_empty());
    }

    #[test]
    fn test_flatten_excludes_node_itself() {
        let graph = sample_graph();
        let host = graph.find_node(&ArtifactCoords::new("com.acme", "platform-app", "6.1.0"));
        let set = flatten(host);

        assert!(!set.contains(&ArtifactCoords::new("com.acme", "platform-app", "6.1.0")));
        assert!(set.contains(&ArtifactCoords::new("com.acme", "platform-core", "6.1.0")));
        assert!(set.contains(&ArtifactCoords::new("org.springframework", "spring-web", "6.2.0")));
        assert!(set.contains(&ArtifactCoords::new("org.slf4j", "slf4j-api", "2.0.13")));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_flatten_deduplicates_repeated_coordinates() {
        let tree = node(
            "root",
            "root",
            "1.0",
            vec![
                node("x", "shared", "1.0", vec![leaf("y", "leaf", "1.0")]),
                node("z", "other", "1.0", vec![leaf("y", "leaf", "1.0")]),
            ],
        );
        let set = flatten(Some(&tree));
        // shared, other, leaf (once)
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_node_count() {
        assert_eq!(sample_graph().node_count(), 7);
    }

    #[test]
    fn test_all_coords_deduplicates() {
        let coords = sample_graph().all_coords();
        // 7 nodes, slf4j-api appears twice
        assert_eq!(coords.len(), 6);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = DependencyGraph::load(&temp.path().join("dependency-graph.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModpkgError>(),
            Some(ModpkgError::GraphNotFound { .. })
        ));
    }

    #[test]
    fn test_load_malformed_json() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("dependency-graph.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DependencyGraph::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModpkgError>(),
            Some(ModpkgError::GraphParseError { .. })
        ));
    }

    #[test]
    fn test_load_children_key_optional() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("dependency-graph.json");
        std::fs::write(
            &path,
            r#"{"group": "com.example", "artifact": "my-module", "version": "1.0.0"}"#,
        )
        .unwrap();

        let graph = DependencyGraph::load(&path).unwrap();
        assert!(graph.root().children.is_empty());
        assert_eq!(graph.node_count(), 1);
    }
}
