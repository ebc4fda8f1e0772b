//! Configuration management for modpkg.
//!
//! Two configuration layers feed a packaging run:
//!
//! 1. **Project configuration** (`modpkg.toml`) — committed next to the
//!    module sources, discovered by walking up from the current directory.
//!    Describes the module coordinates, build layout, host application, and
//!    assembly behavior.
//! 2. **Global configuration** (`~/.modpkg/config.toml`) — per-user, never
//!    committed, holds deploy server credentials. See [`global`].
//!
//! CLI flags layer on top of the project configuration; file values are the
//! defaults, flags win.
//!
//! # Project file format
//!
//! ```toml
//! [project]
//! group = "com.example"
//! artifact = "payments-module"
//! version = "1.4.0"
//! name = "Payments Module"
//! developers = ["Jana Kovac <jana@example.com>"]
//!
//! [build]
//! dir = "target"                  # defaults shown
//! classes_dir = "target/classes"
//! packaging = "jar"
//!
//! [host]
//! group = "com.example"
//! artifact = "application-engine"
//! version = "6.3.1"               # or: coordinates = "com.example:application-engine:6.3.1"
//! on_missing = "warn"             # or "fail"
//!
//! [assembly]
//! single_output = true
//! excludes = ["org.slf4j:slf4j-api:2.0.13"]
//!
//! [deploy.repository]
//! url = "https://nexus.example.com/service/rest/v1/modules"
//! kind = "nexus"
//! server_id = "company-nexus"
//! ```
//!
//! Relative paths in `[build]` resolve against the directory containing
//! `modpkg.toml`, so commands behave the same from any subdirectory. A
//! leading `~` is expanded to the user's home directory.

pub mod global;

pub use global::{GlobalConfig, ServerCredentials};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactCoords;
use crate::constants::{
    DEFAULT_ASSEMBLER, DEFAULT_BUILD_DIR, DEFAULT_CLASSES_DIR, DEFAULT_PACKAGING,
    DEPENDENCY_GRAPH_FILE, PROJECT_FILE,
};
use crate::core::ModpkgError;
use crate::hostapp::{HostSpec, MissingHostPolicy};
use crate::scan::DEFAULT_ANNOTATIONS;

/// Project-level configuration loaded from `modpkg.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Module identity and metadata, also the source of manifest attributes.
    pub project: ProjectSection,

    /// Build tree layout.
    #[serde(default)]
    pub build: BuildSection,

    /// Host application selection.
    #[serde(default)]
    pub host: HostSection,

    /// Assembly descriptor and artifact post-processing behavior.
    #[serde(default)]
    pub assembly: AssemblySection,

    /// Auto-configuration registration scan.
    #[serde(default)]
    pub scan: ScanSection,

    /// Deploy target.
    #[serde(default)]
    pub deploy: DeploySection,

    /// Directory containing the configuration file, used to resolve relative
    /// paths. Set by [`ProjectConfig::load`].
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

/// The `[project]` section: module coordinates and descriptive metadata.
///
/// Everything beyond the three coordinate fields is optional and only feeds
/// the `Module-*` manifest attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Module group identifier.
    pub group: String,
    /// Module artifact identifier.
    pub artifact: String,
    /// Module version.
    pub version: String,
    /// Human-readable module name. Falls back to the artifact id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_connection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_url: Option<String>,
    /// Developers credited in the `Module-Authors` manifest attribute.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub developers: Vec<String>,
}

/// The `[build]` section: where the toolchain put its outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    /// Build output directory, relative to the project file.
    #[serde(default = "default_build_dir")]
    pub dir: String,
    /// Compiled classes directory scanned for auto-configuration classes.
    #[serde(default = "default_classes_dir")]
    pub classes_dir: String,
    /// Artifact file name without extension. Defaults to
    /// `<artifact>-<version>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_name: Option<String>,
    /// Artifact file extension.
    #[serde(default = "default_packaging")]
    pub packaging: String,
    /// Dependency graph location. Defaults to `<dir>/dependency-graph.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            dir: default_build_dir(),
            classes_dir: default_classes_dir(),
            final_name: None,
            packaging: default_packaging(),
            graph: None,
        }
    }
}

/// The `[host]` section: which dependency is the host application.
///
/// `group` and `artifact` name the conventional host; together with
/// `version` they form the usual way of selecting it. `coordinates` is the
/// explicit `group:artifact:version` alternative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    /// Policy when no host ends up configured.
    #[serde(default)]
    pub on_missing: MissingHostPolicy,
}

/// The `[assembly]` section: descriptor shape and artifact post-processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblySection {
    /// Bundle the module artifact and its dependencies into one archive
    /// (true), or emit a dependencies-only archive (false).
    #[serde(default = "default_single_output")]
    pub single_output: bool,
    /// Extra `group:artifact:version` patterns excluded from the dependency
    /// set, on top of the host-derived exclusions.
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Assembler executable invoked with the generated descriptor.
    #[serde(default = "default_assembler")]
    pub assembler: String,
    /// Keep `application-worker.*` configuration in the artifact.
    #[serde(default)]
    pub force_worker_profile: bool,
    /// Write the enriched manifest to a `-with-manifest` sibling instead of
    /// rewriting the artifact in place.
    #[serde(default)]
    pub manifest_copy: bool,
}

impl Default for AssemblySection {
    fn default() -> Self {
        Self {
            single_output: default_single_output(),
            excludes: Vec::new(),
            assembler: default_assembler(),
            force_worker_profile: false,
            manifest_copy: false,
        }
    }
}

/// The `[scan]` section: which annotations mark auto-configuration classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSection {
    /// Fully-qualified annotation class names. An empty list disables the
    /// scan.
    #[serde(default = "default_annotations")]
    pub annotations: Vec<String>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            annotations: default_annotations(),
        }
    }
}

/// The `[deploy]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploySection {
    /// Module repository the packaged archive is uploaded to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryConfig>,
}

/// A `[deploy.repository]` target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Upload endpoint.
    pub url: String,
    /// Repository flavor.
    pub kind: RepositoryKind,
    /// Server id looked up in the global configuration for credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}

/// Supported module repository flavors.
///
/// `nexus` and `http` both upload via multipart POST; `ftp` is recognized in
/// configuration but not supported for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryKind {
    Nexus,
    Http,
    Ftp,
}

impl std::fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nexus => write!(f, "nexus"),
            Self::Http => write!(f, "http"),
            Self::Ftp => write!(f, "ftp"),
        }
    }
}

fn default_build_dir() -> String {
    DEFAULT_BUILD_DIR.to_string()
}

fn default_classes_dir() -> String {
    DEFAULT_CLASSES_DIR.to_string()
}

fn default_packaging() -> String {
    DEFAULT_PACKAGING.to_string()
}

fn default_assembler() -> String {
    DEFAULT_ASSEMBLER.to_string()
}

const fn default_single_output() -> bool {
    true
}

fn default_annotations() -> Vec<String> {
    DEFAULT_ANNOTATIONS.iter().map(|s| (*s).to_string()).collect()
}

impl ProjectConfig {
    /// Load and validate a project configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ModpkgError::ProjectConfigParseError`] for invalid TOML and
    /// a validation error for structurally valid but incoherent
    /// configuration (blank coordinates, a host version without the host
    /// convention, a blank repository url).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read project configuration from {}", path.display())
        })?;

        let mut config: Self =
            toml::from_str(&content).map_err(|e| ModpkgError::ProjectConfigParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        config.config_dir = Some(
            path.parent()
                .ok_or_else(|| {
                    anyhow::anyhow!("Project configuration path has no parent directory")
                })?
                .to_path_buf(),
        );

        config.validate()?;
        Ok(config)
    }

    /// Validate coherence rules that the TOML schema cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ModpkgError::InvalidCoordinates`] when the `[project]`
    /// coordinates are incomplete, and [`ModpkgError::ConfigError`] for the
    /// remaining rules.
    pub fn validate(&self) -> Result<()> {
        let coords = self.project_coords();
        if !coords.is_valid() {
            return Err(ModpkgError::InvalidCoordinates {
                value: coords.to_string(),
                reason: "the [project] section requires non-blank group, artifact, and version"
                    .to_string(),
            }
            .into());
        }

        if self.build.packaging.trim().is_empty() {
            return Err(ModpkgError::ConfigError {
                message: "'[build] packaging' must not be blank".to_string(),
            }
            .into());
        }

        if self.assembly.assembler.trim().is_empty() {
            return Err(ModpkgError::ConfigError {
                message: "'[assembly] assembler' must not be blank".to_string(),
            }
            .into());
        }

        let version_set = self
            .host
            .version
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty());
        if version_set && (is_blank(&self.host.group) || is_blank(&self.host.artifact)) {
            return Err(ModpkgError::ConfigError {
                message: "'[host] version' requires '[host] group' and '[host] artifact' to name \
                          the host application"
                    .to_string(),
            }
            .into());
        }

        if let Some(repository) = &self.deploy.repository {
            if repository.url.trim().is_empty() {
                return Err(ModpkgError::ConfigError {
                    message: "'[deploy.repository] url' must not be blank".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// The module's own coordinates.
    #[must_use]
    pub fn project_coords(&self) -> ArtifactCoords {
        ArtifactCoords::new(
            self.project.group.clone(),
            self.project.artifact.clone(),
            self.project.version.clone(),
        )
    }

    /// Host application selection derived from the `[host]` section.
    #[must_use]
    pub fn host_spec(&self) -> HostSpec {
        HostSpec {
            convention_group: self.host.group.clone().unwrap_or_default(),
            convention_artifact: self.host.artifact.clone().unwrap_or_default(),
            version: self.host.version.clone(),
            coordinates: self
                .host
                .coordinates
                .as_deref()
                .map(|raw| raw.parse::<ArtifactCoords>().unwrap_or_default()),
            on_missing: self.host.on_missing,
        }
    }

    /// Absolute build directory.
    #[must_use]
    pub fn build_dir(&self) -> PathBuf {
        self.resolve_path(&self.build.dir)
    }

    /// Absolute compiled-classes directory.
    #[must_use]
    pub fn classes_dir(&self) -> PathBuf {
        self.resolve_path(&self.build.classes_dir)
    }

    /// Absolute dependency graph path.
    #[must_use]
    pub fn graph_path(&self) -> PathBuf {
        match &self.build.graph {
            Some(path) => self.resolve_path(path),
            None => self.build_dir().join(DEPENDENCY_GRAPH_FILE),
        }
    }

    /// Artifact file name without extension.
    #[must_use]
    pub fn final_name(&self) -> String {
        self.build.final_name.clone().unwrap_or_else(|| {
            format!("{}-{}", self.project.artifact, self.project.version)
        })
    }

    /// Artifact file name with the packaging extension.
    #[must_use]
    pub fn artifact_file_name(&self) -> String {
        format!("{}.{}", self.final_name(), self.build.packaging)
    }

    /// Absolute path of the built module artifact.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.build_dir().join(self.artifact_file_name())
    }

    /// Resolve a configured path: expand `~`, then anchor relative paths at
    /// the project file's directory.
    fn resolve_path(&self, value: &str) -> PathBuf {
        let expanded = shellexpand::tilde(value);
        let path = PathBuf::from(expanded.as_ref());
        if path.is_absolute() {
            return path;
        }
        match &self.config_dir {
            Some(dir) => dir.join(path),
            None => path,
        }
    }
}

/// Find `modpkg.toml` by searching up from the current directory.
///
/// # Errors
///
/// Returns [`ModpkgError::ProjectConfigNotFound`] if no project file exists
/// between the current directory and the filesystem root.
pub fn find_project_file() -> Result<PathBuf> {
    let current = std::env::current_dir().context(
        "Cannot determine current working directory. This may indicate a permission issue",
    )?;
    find_project_file_from(current)
}

/// Find `modpkg.toml` by searching up from a specific starting directory.
///
/// # Errors
///
/// Returns [`ModpkgError::ProjectConfigNotFound`] if the walk reaches the
/// filesystem root without finding a project file.
pub fn find_project_file_from(mut current: PathBuf) -> Result<PathBuf> {
    loop {
        let candidate = current.join(PROJECT_FILE);
        if candidate.exists() {
            return Ok(candidate);
        }

        if !current.pop() {
            return Err(ModpkgError::ProjectConfigNotFound.into());
        }
    }
}

/// Find the project file, honoring an explicit `--project-file` path.
///
/// # Errors
///
/// Returns [`ModpkgError::ConfigNotFound`] when an explicit path is given
/// but does not exist, and otherwise the discovery errors of
/// [`find_project_file`].
pub fn find_project_file_with_optional(explicit_path: Option<PathBuf>) -> Result<PathBuf> {
    match explicit_path {
        Some(path) => {
            if path.exists() {
                Ok(path)
            } else {
                Err(ModpkgError::ConfigNotFound {
                    path: path.display().to_string(),
                }
                .into())
            }
        }
        None => find_project_file(),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
[project]
group = "com.example"
artifact = "payments-module"
version = "1.4.0"
"#;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(PROJECT_FILE);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), MINIMAL);

        let config = ProjectConfig::load(&path).unwrap();

        assert_eq!(config.build.dir, "target");
        assert_eq!(config.build.packaging, "jar");
        assert!(config.assembly.single_output);
        assert!(!config.assembly.force_worker_profile);
        assert_eq!(config.assembly.assembler, DEFAULT_ASSEMBLER);
        assert_eq!(config.scan.annotations, default_annotations());
        assert_eq!(config.final_name(), "payments-module-1.4.0");
        assert_eq!(config.artifact_file_name(), "payments-module-1.4.0.jar");
    }

    #[test]
    fn paths_resolve_against_config_dir() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), MINIMAL);

        let config = ProjectConfig::load(&path).unwrap();

        assert_eq!(config.build_dir(), temp.path().join("target"));
        assert_eq!(
            config.graph_path(),
            temp.path().join("target").join(DEPENDENCY_GRAPH_FILE)
        );
        assert_eq!(
            config.artifact_path(),
            temp.path().join("target").join("payments-module-1.4.0.jar")
        );
    }

    #[test]
    fn explicit_graph_and_final_name_win() {
        let temp = TempDir::new().unwrap();
        let content = format!(
            "{MINIMAL}\n[build]\nfinal_name = \"payments\"\ngraph = \"graphs/deps.json\"\n"
        );
        let path = write_config(temp.path(), &content);

        let config = ProjectConfig::load(&path).unwrap();

        assert_eq!(config.final_name(), "payments");
        assert_eq!(config.graph_path(), temp.path().join("graphs/deps.json"));
    }

    #[test]
    fn host_section_builds_host_spec() {
        let temp = TempDir::new().unwrap();
        let content = format!(
            "{MINIMAL}\n[host]\ngroup = \"com.example\"\nartifact = \"engine\"\nversion = \"6.3.1\"\non_missing = \"fail\"\n"
        );
        let path = write_config(temp.path(), &content);

        let config = ProjectConfig::load(&path).unwrap();
        let spec = config.host_spec();

        assert_eq!(spec.on_missing, MissingHostPolicy::Fail);
        assert_eq!(
            spec.effective_coords(),
            Some(ArtifactCoords::new("com.example", "engine", "6.3.1"))
        );
    }

    #[test]
    fn host_coordinates_parse_leniently() {
        let temp = TempDir::new().unwrap();
        let content = format!("{MINIMAL}\n[host]\ncoordinates = \"com.example:engine\"\n");
        let path = write_config(temp.path(), &content);

        let config = ProjectConfig::load(&path).unwrap();

        // incomplete coordinates count as "no host configured"
        assert_eq!(config.host_spec().effective_coords(), None);
    }

    #[test]
    fn blank_project_coordinates_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            "[project]\ngroup = \"com.example\"\nartifact = \" \"\nversion = \"1.0\"\n",
        );

        let error = ProjectConfig::load(&path).unwrap_err();
        let modpkg_error = error.downcast_ref::<ModpkgError>().unwrap();
        assert!(matches!(modpkg_error, ModpkgError::InvalidCoordinates { .. }));
    }

    #[test]
    fn host_version_without_convention_is_rejected() {
        let temp = TempDir::new().unwrap();
        let content = format!("{MINIMAL}\n[host]\nversion = \"6.3.1\"\n");
        let path = write_config(temp.path(), &content);

        let error = ProjectConfig::load(&path).unwrap_err();
        let modpkg_error = error.downcast_ref::<ModpkgError>().unwrap();
        assert!(matches!(modpkg_error, ModpkgError::ConfigError { .. }));
    }

    #[test]
    fn invalid_toml_reports_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "[project\ngroup = \"x\"\n");

        let error = ProjectConfig::load(&path).unwrap_err();
        let modpkg_error = error.downcast_ref::<ModpkgError>().unwrap();
        assert!(matches!(modpkg_error, ModpkgError::ProjectConfigParseError { .. }));
    }

    #[test]
    fn repository_kind_parses_lowercase() {
        let temp = TempDir::new().unwrap();
        let content = format!(
            "{MINIMAL}\n[deploy.repository]\nurl = \"https://nexus.example.com/upload\"\nkind = \"nexus\"\nserver_id = \"company\"\n"
        );
        let path = write_config(temp.path(), &content);

        let config = ProjectConfig::load(&path).unwrap();
        let repository = config.deploy.repository.unwrap();

        assert_eq!(repository.kind, RepositoryKind::Nexus);
        assert_eq!(repository.server_id.as_deref(), Some("company"));
    }

    #[test]
    fn find_walks_up_to_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), MINIMAL);
        let nested = temp.path().join("src").join("main");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_project_file_from(nested).unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn find_reports_missing_project_file() {
        let temp = TempDir::new().unwrap();
        let error = find_project_file_from(temp.path().to_path_buf()).unwrap_err();
        let modpkg_error = error.downcast_ref::<ModpkgError>().unwrap();
        assert!(matches!(modpkg_error, ModpkgError::ProjectConfigNotFound));
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let error =
            find_project_file_with_optional(Some(PathBuf::from("/nonexistent/modpkg.toml")))
                .unwrap_err();
        let modpkg_error = error.downcast_ref::<ModpkgError>().unwrap();
        assert!(matches!(modpkg_error, ModpkgError::ConfigNotFound { .. }));
    }
}
