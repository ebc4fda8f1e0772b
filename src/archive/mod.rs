//! Module artifact post-processing.
//!
//! After the compiler toolchain produces the module archive, modpkg rewrites
//! it before handing it to the assembler:
//!
//! - **Manifest enrichment** merges `Module-*` metadata attributes derived
//!   from the project configuration into `META-INF/MANIFEST.MF`, in place by
//!   default or as a `-with-manifest` sibling copy.
//! - **Configuration stripping** removes bundled `application.*` resources
//!   so the module cannot shadow the host application's own configuration.
//!
//! Rewrites go through a temporary sibling file that replaces the original
//! only after the new archive is fully written. Entries that are not touched
//! are copied raw, without recompression.

pub mod manifest;

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::config::ProjectSection;
use crate::core::ModpkgError;
use manifest::JarManifest;

/// Path of the main manifest inside the archive.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Classpath prefix used by repackaged boot archives.
const BOOT_CLASSES_PREFIX: &str = "BOOT-INF/classes/";

/// Bundled application configuration stripped from every build.
const APPLICATION_CONFIGS: [&str; 3] = [
    "application.properties",
    "application.yaml",
    "application.yml",
];

/// Worker-profile variants, stripped unless the worker profile is forced.
const WORKER_CONFIGS: [&str; 3] = [
    "application-worker.properties",
    "application-worker.yaml",
    "application-worker.yml",
];

/// Derive the `Module-*` manifest attributes from project metadata.
///
/// Blank and missing fields are skipped rather than emitted empty. The module
/// name falls back to the artifact id when no display name is configured, and
/// developers are joined into a single `Module-Authors` value. A build
/// timestamp is always appended.
pub fn module_attributes(project: &ProjectSection) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    push_attr(
        &mut attrs,
        "Module-Name",
        project.name.as_deref().unwrap_or(&project.artifact),
    );
    push_attr(&mut attrs, "Module-Version", &project.version);
    push_attr(&mut attrs, "Module-Group", &project.group);
    push_attr(&mut attrs, "Module-Artifact", &project.artifact);
    push_attr(
        &mut attrs,
        "Module-Description",
        project.description.as_deref().unwrap_or_default(),
    );
    push_attr(&mut attrs, "Module-Url", project.url.as_deref().unwrap_or_default());
    push_attr(
        &mut attrs,
        "Module-Scm-Connection",
        project.scm_connection.as_deref().unwrap_or_default(),
    );
    push_attr(
        &mut attrs,
        "Module-Scm-Url",
        project.scm_url.as_deref().unwrap_or_default(),
    );
    push_attr(
        &mut attrs,
        "Module-License",
        project.license.as_deref().unwrap_or_default(),
    );
    push_attr(
        &mut attrs,
        "Module-Organization",
        project.organization.as_deref().unwrap_or_default(),
    );
    push_attr(
        &mut attrs,
        "Module-Issue-System",
        project.issue_system.as_deref().unwrap_or_default(),
    );
    push_attr(
        &mut attrs,
        "Module-Issue-Url",
        project.issue_url.as_deref().unwrap_or_default(),
    );
    push_attr(&mut attrs, "Module-Authors", &project.developers.join(", "));
    attrs.push((
        "Module-Build-Timestamp".to_string(),
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    ));
    attrs
}

fn push_attr(attrs: &mut Vec<(String, String)>, key: &str, value: &str) {
    if !value.trim().is_empty() {
        attrs.push((key.to_string(), value.to_string()));
    }
}

/// Rewrite the archive manifest with the given attributes.
///
/// The existing main section is kept and the attributes are merged into it;
/// an archive without a manifest gets a fresh `Manifest-Version: 1.0` one.
/// The manifest is written as the first entry of the rewritten archive, the
/// position `java.util.jar` readers expect.
///
/// With `write_copy` false the artifact is replaced in place; with
/// `write_copy` true the original stays untouched and a
/// `<stem>-with-manifest.<ext>` sibling is written instead. Returns the path
/// that now carries the enriched manifest.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or rewritten, or if its
/// existing manifest is malformed.
pub fn enrich_manifest(
    artifact: &Path,
    attributes: &[(String, String)],
    write_copy: bool,
) -> Result<PathBuf> {
    let file = File::open(artifact)
        .with_context(|| format!("Failed to open artifact {}", artifact.display()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| archive_error(artifact, e))?;

    let raw_manifest = match archive.by_name(MANIFEST_PATH) {
        Ok(mut entry) => {
            let mut raw = Vec::new();
            entry.read_to_end(&mut raw).with_context(|| {
                format!("Failed to read {MANIFEST_PATH} from {}", artifact.display())
            })?;
            Some(raw)
        }
        Err(ZipError::FileNotFound) => None,
        Err(error) => return Err(archive_error(artifact, error).into()),
    };
    let mut manifest = match raw_manifest {
        Some(bytes) => JarManifest::parse(&bytes)?,
        None => JarManifest::default(),
    };
    manifest.ensure_version();
    for (key, value) in attributes {
        manifest.set(key, value.clone());
    }

    let destination = if write_copy {
        sibling_with_suffix(artifact, "-with-manifest")
    } else {
        artifact.to_path_buf()
    };
    let temp = destination.with_extension("tmp");
    let out = File::create(&temp)
        .with_context(|| format!("Failed to create temporary archive {}", temp.display()))?;
    let mut writer = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer
        .start_file(MANIFEST_PATH, options)
        .map_err(|e| archive_error(artifact, e))?;
    writer
        .write_all(&manifest.to_bytes())
        .with_context(|| format!("Failed to write {MANIFEST_PATH}"))?;
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(|e| archive_error(artifact, e))?;
        if entry.name() == MANIFEST_PATH {
            continue;
        }
        writer.raw_copy_file(entry).map_err(|e| archive_error(artifact, e))?;
    }
    writer.finish().map_err(|e| archive_error(artifact, e))?;
    std::fs::rename(&temp, &destination)
        .with_context(|| format!("Failed to move rewritten archive to {}", destination.display()))?;

    if write_copy {
        info!("Created artifact copy with enriched manifest: {}", destination.display());
    } else {
        debug!("Enriched manifest in place: {}", destination.display());
    }
    Ok(destination)
}

/// Remove bundled application configuration from the artifact archive.
///
/// `application.properties|yaml|yml` at the archive root or under
/// `BOOT-INF/classes/` are always removed. The `application-worker.*`
/// variants are removed too unless `force_worker_profile` is set, which keeps
/// them so the module boots with the worker profile regardless of the host.
/// Returns the removed entry names.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or rewritten.
pub fn strip_bundled_config(artifact: &Path, force_worker_profile: bool) -> Result<Vec<String>> {
    let file = File::open(artifact)
        .with_context(|| format!("Failed to open artifact {}", artifact.display()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| archive_error(artifact, e))?;

    let temp = artifact.with_extension("tmp");
    let out = File::create(&temp)
        .with_context(|| format!("Failed to create temporary archive {}", temp.display()))?;
    let mut writer = ZipWriter::new(out);
    let mut removed = Vec::new();

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(|e| archive_error(artifact, e))?;
        let name = entry.name().to_string();
        if is_stripped_config(&name, force_worker_profile) {
            info!("Removing bundled configuration from archive: {name}");
            removed.push(name);
            continue;
        }
        writer.raw_copy_file(entry).map_err(|e| archive_error(artifact, e))?;
    }
    writer.finish().map_err(|e| archive_error(artifact, e))?;
    std::fs::rename(&temp, artifact)
        .with_context(|| format!("Failed to move rewritten archive to {}", artifact.display()))?;

    Ok(removed)
}

/// Whether an archive entry is a bundled configuration resource to strip.
///
/// Matches on the entry's file name, at the archive root or anywhere under
/// the boot classpath.
fn is_stripped_config(entry: &str, force_worker_profile: bool) -> bool {
    if entry.contains('/') && !entry.starts_with(BOOT_CLASSES_PREFIX) {
        return false;
    }
    let file_name = entry.rsplit('/').next().unwrap_or(entry);
    if APPLICATION_CONFIGS.contains(&file_name) {
        return true;
    }
    !force_worker_profile && WORKER_CONFIGS.contains(&file_name)
}

/// Build `<stem><suffix>.<ext>` next to the given path.
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

fn archive_error(file: &Path, error: impl std::fmt::Display) -> ModpkgError {
    ModpkgError::ArchiveError {
        file: file.display().to_string(),
        reason: error.to_string(),
    }
}
