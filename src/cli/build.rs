//! Package a module artifact against its host application.
//!
//! This module implements the `build` command, the packaging pipeline at the
//! center of modpkg. The pipeline is strictly sequential and every failure is
//! fatal; there is nothing to retry because every step is either pure
//! computation or a single local I/O operation:
//!
//! 1. Load `modpkg.toml` and layer CLI overrides on top
//! 2. Load the resolved dependency graph emitted by the build orchestrator
//! 3. Resolve the host application node and flatten its subtree
//! 4. Post-process the built artifact: manifest enrichment, auto-configuration
//!    scan, bundled-configuration stripping
//! 5. Compose the exclusion set and write the assembly descriptor
//! 6. Invoke the external assembler to produce the final archive
//!
//! Steps 4's sub-steps are skipped with a warning when the artifact or the
//! classes directory has not been built yet; the descriptor and assembler
//! steps always run.
//!
//! # Examples
//!
//! ```bash
//! modpkg build                                   # Settings from modpkg.toml
//! modpkg build --host-version 6.4.0              # Pin the host release
//! modpkg build --separate-output                 # Dependencies-only archive
//! modpkg build --exclude com.acme:shaded-lib:1.0 # Extra manual exclusion
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::archive::{enrich_manifest, module_attributes, strip_bundled_config};
use crate::assembler::AssemblerCommand;
use crate::config::{ProjectConfig, find_project_file_with_optional};
use crate::constants::ASSEMBLY_DIR;
use crate::descriptor::DescriptorContext;
use crate::exclusions::ExclusionSet;
use crate::graph::{DependencyGraph, flatten};
use crate::hostapp::{MissingHostPolicy, resolve_host};
use crate::utils::progress::ProgressBar;
use crate::scan::generate_autoconfiguration_imports;

/// Command-line arguments for the `build` command.
///
/// Every flag is an override of the corresponding `modpkg.toml` setting, so a
/// fully configured project needs no flags at all. Flags are the escape hatch
/// for CI pipelines that vary one dimension per job, typically the host
/// version.
#[derive(Args)]
pub struct BuildCommand {
    /// Host application version to package against.
    ///
    /// Combined with the conventional host group and artifact from `[host]`
    /// in modpkg.toml. Takes priority over explicit coordinates.
    #[arg(long, value_name = "VERSION")]
    pub host_version: Option<String>,

    /// Full host application coordinates (`group:artifact:version`).
    ///
    /// Overrides the whole `[host]` selection, including a version configured
    /// in the project file.
    #[arg(long, value_name = "COORDS")]
    pub host_app: Option<String>,

    /// Additional exclusion pattern, repeatable.
    ///
    /// Appended to `[assembly].excludes`. Patterns are passed to the
    /// assembler verbatim.
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,

    /// Package dependencies into their own archive, without the module artifact.
    ///
    /// The default layout puts the artifact at the archive root and its
    /// unique dependencies under `/libs`; with this flag the archive holds
    /// only the dependency closure.
    #[arg(long)]
    pub separate_output: bool,

    /// What to do when no host application is configured.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_missing_host: Option<MissingHostPolicy>,

    /// Dependency graph file, overriding `[build].graph`.
    ///
    /// Relative paths are resolved against the current working directory.
    #[arg(long, value_name = "FILE")]
    pub graph: Option<PathBuf>,

    /// Assembler executable, overriding `[assembly].assembler`.
    #[arg(long, value_name = "PROGRAM")]
    pub assembler: Option<String>,

    /// Keep worker-profile configuration files bundled in the artifact.
    ///
    /// By default `application-worker.*` files are stripped together with the
    /// main `application.*` files.
    #[arg(long)]
    pub force_worker_profile: bool,

    /// Write manifest enrichment to a `-with-manifest` sibling copy.
    ///
    /// The built artifact is left untouched; useful when another build step
    /// still needs the original archive.
    #[arg(long)]
    pub manifest_copy: bool,
}

impl BuildCommand {
    /// Execute the build, discovering the project file when no explicit path
    /// was given on the command line.
    pub async fn execute_with_project_file(self, project_file: Option<PathBuf>) -> Result<()> {
        let project_file = find_project_file_with_optional(project_file)?;
        self.execute_from_path(project_file).await
    }

    /// Execute the full packaging pipeline against a specific project file.
    pub async fn execute_from_path(self, project_file: PathBuf) -> Result<()> {
        let mut config = ProjectConfig::load(&project_file)?;
        self.apply_overrides(&mut config)?;

        let coords = config.project_coords();
        tracing::info!("Packaging module {coords}");

        let graph_path = config.graph_path();
        let graph = DependencyGraph::load(&graph_path)?;
        tracing::debug!(
            "Loaded dependency graph with {} nodes from {}",
            graph.node_count(),
            graph_path.display()
        );

        let host = resolve_host(&graph, &config.host_spec())?;
        let host_coords = host.map(|node| node.coords());
        let host_subtree = flatten(host);
        if let Some(host_coords) = &host_coords {
            tracing::info!(
                "Host application {} provides {} artifacts",
                host_coords,
                host_subtree.len()
            );
            for provided in &host_subtree {
                tracing::debug!("Host provides {provided}");
            }
        }

        postprocess_artifact(&config)?;

        let excludes =
            ExclusionSet::from_parts(host_coords.as_ref(), &host_subtree, &config.assembly.excludes);
        tracing::debug!("Composed {} exclusion entries", excludes.len());

        let build_dir = config.build_dir();
        let artifact_file = config.artifact_file_name();
        let context = DescriptorContext {
            artifact: &config.project.artifact,
            build_dir: &build_dir,
            artifact_file: &artifact_file,
        };
        let descriptor = if config.assembly.single_output {
            context.single_output(excludes)
        } else {
            context.separate_output(excludes)
        };

        let descriptor_path = descriptor.write(&build_dir.join(ASSEMBLY_DIR))?;
        tracing::info!("Assembly descriptor written to {}", descriptor_path.display());

        let package_path = build_dir.join(format!("{}.zip", config.final_name()));
        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("Assembling {}", config.final_name()));
        let assembled =
            AssemblerCommand::assemble(&config.assembly.assembler, &descriptor_path, &package_path)
                .with_context(config.project.artifact.clone())
                .execute_success()
                .await;
        spinner.finish_and_clear();
        assembled?;

        println!("{} Packaged {} at {}", "✓".green(), coords, package_path.display());
        Ok(())
    }

    /// Layer the command-line flags over the loaded project configuration.
    fn apply_overrides(&self, config: &mut ProjectConfig) -> Result<()> {
        if let Some(host_app) = &self.host_app {
            // An explicit coordinate override also clears a configured bare
            // version, which would otherwise take priority over it.
            config.host.coordinates = Some(host_app.clone());
            config.host.version = None;
        }
        if let Some(host_version) = &self.host_version {
            config.host.version = Some(host_version.clone());
        }
        if let Some(on_missing) = self.on_missing_host {
            config.host.on_missing = on_missing;
        }
        if !self.excludes.is_empty() {
            config.assembly.excludes.extend(self.excludes.iter().cloned());
        }
        if self.separate_output {
            config.assembly.single_output = false;
        }
        if let Some(graph) = &self.graph {
            let graph = if graph.is_absolute() {
                graph.clone()
            } else {
                std::env::current_dir()?.join(graph)
            };
            config.build.graph = Some(graph.display().to_string());
        }
        if let Some(assembler) = &self.assembler {
            config.assembly.assembler = assembler.clone();
        }
        if self.force_worker_profile {
            config.assembly.force_worker_profile = true;
        }
        if self.manifest_copy {
            config.assembly.manifest_copy = true;
        }
        Ok(())
    }
}

/// Post-process the built artifact before the assembler runs.
///
/// Order matters and mirrors the packaging contract: the manifest is enriched
/// first, then the auto-configuration imports file is generated into the
/// classes directory, then bundled configuration files are stripped from the
/// artifact. A missing artifact or classes directory downgrades the affected
/// step to a warning so that descriptor generation still works in dry build
/// layouts; genuine I/O failures abort the build.
fn postprocess_artifact(config: &ProjectConfig) -> Result<()> {
    let artifact = config.artifact_path();

    if artifact.exists() {
        let attributes = module_attributes(&config.project);
        enrich_manifest(&artifact, &attributes, config.assembly.manifest_copy)?;
    } else {
        tracing::warn!(
            "Module artifact {} not found; skipping manifest enrichment",
            artifact.display()
        );
    }

    let classes_dir = config.classes_dir();
    if classes_dir.exists() {
        generate_autoconfiguration_imports(&classes_dir, &config.scan.annotations)?;
    } else {
        tracing::warn!(
            "Classes directory {} not found; skipping auto-configuration scan",
            classes_dir.display()
        );
    }

    if artifact.exists() {
        let removed = strip_bundled_config(&artifact, config.assembly.force_worker_profile)?;
        if !removed.is_empty() {
            tracing::info!("Stripped {} bundled configuration files", removed.len());
        }
    }

    Ok(())
}
