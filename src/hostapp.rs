//! Host application selection.
//!
//! A module is packaged relative to a host application: everything the host
//! already ships is excluded from the package. The host can be named two ways
//! in configuration, with a fixed priority:
//!
//! 1. A bare version string combined with the conventional host group and
//!    artifact identifiers (`[host].version`). This is the common case and
//!    always wins when present.
//! 2. Explicit full coordinates (`[host].coordinates`), used only when they
//!    are complete. Incomplete coordinates count as "not configured" rather
//!    than an error.
//!
//! When neither yields a host, the explicit `on_missing` policy decides
//! whether packaging proceeds without host-based exclusion (bundling every
//! dependency) or stops with a configuration error. A host that *is*
//! configured but absent from the dependency graph is always fatal: the
//! resulting package would silently contain the wrong dependency set.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::artifact::ArtifactCoords;
use crate::core::{ErrorContext, IntoAnyhowWithContext, ModpkgError};
use crate::graph::{DependencyGraph, DependencyNode};

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
/// This represents a 50% similarity threshold for near-miss coordinate suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Policy applied when no host application is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingHostPolicy {
    /// Log a warning and package the module with its full dependency set.
    #[default]
    Warn,
    /// Treat a missing host as a configuration error.
    Fail,
}

/// Host application configuration, after config file and CLI flags are layered.
#[derive(Debug, Clone, Default)]
pub struct HostSpec {
    /// Conventional host group identifier, combined with `version`.
    pub convention_group: String,
    /// Conventional host artifact identifier, combined with `version`.
    pub convention_artifact: String,
    /// Bare host version. Takes priority over `coordinates` when non-blank.
    pub version: Option<String>,
    /// Explicit host coordinates. Used only when complete.
    pub coordinates: Option<ArtifactCoords>,
    /// What to do when neither of the above names a host.
    pub on_missing: MissingHostPolicy,
}

impl HostSpec {
    /// The host coordinates this configuration names, if any.
    ///
    /// A non-blank version string wins over explicit coordinates; explicit
    /// coordinates apply only when all three segments are present.
    #[must_use]
    pub fn effective_coords(&self) -> Option<ArtifactCoords> {
        if let Some(version) = &self.version {
            if !version.trim().is_empty() {
                return Some(ArtifactCoords::new(
                    self.convention_group.clone(),
                    self.convention_artifact.clone(),
                    version.clone(),
                ));
            }
        }

        if let Some(coords) = &self.coordinates {
            if coords.is_valid() {
                return Some(coords.clone());
            }
        }

        None
    }
}

/// Resolve the configured host application against the dependency graph.
///
/// Returns the host's graph node, or `None` when no host is configured and
/// the policy allows continuing. A configured host that is not in the graph
/// is a hard error carrying the unresolved coordinates, with a near-miss
/// suggestion when the graph contains something similar.
pub fn resolve_host<'a>(
    graph: &'a DependencyGraph,
    spec: &HostSpec,
) -> Result<Option<&'a DependencyNode>> {
    let Some(coords) = spec.effective_coords() else {
        return match spec.on_missing {
            MissingHostPolicy::Warn => {
                tracing::warn!(
                    "No host application configured; packaging all runtime dependencies"
                );
                Ok(None)
            }
            MissingHostPolicy::Fail => Err(ModpkgError::HostApplicationNotConfigured.into()),
        };
    };

    match graph.find_node(&coords) {
        Some(node) => {
            tracing::debug!("Host application resolved to graph node {node}");
            Ok(Some(node))
        }
        None => {
            let error = ModpkgError::HostApplicationNotFound {
                group: coords.group.clone(),
                artifact: coords.artifact.clone(),
                version: coords.version.clone(),
            };

            let available: Vec<String> =
                graph.all_coords().iter().map(ToString::to_string).collect();
            if let Some(nearest) = find_similar_coords(&coords.to_string(), &available) {
                return Err(error.into_anyhow_with_context(ErrorContext::suggestion(format!(
                    "Did you mean '{nearest}'? Check the host version against the module's resolved dependencies"
                ))));
            }

            Err(error.into())
        }
    }
}

/// Find the closest coordinate string using Levenshtein distance.
fn find_similar_coords(target: &str, available: &[String]) -> Option<String> {
    let mut scored: Vec<_> = available
        .iter()
        .map(|coords| {
            let distance = levenshtein(target, coords);
            (coords.clone(), distance)
        })
        .collect();

    // Sort by distance (closest first)
    scored.sort_by_key(|(_, dist)| *dist);

    scored
        .into_iter()
        .find(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .map(|(coords, _)| coords)
}
