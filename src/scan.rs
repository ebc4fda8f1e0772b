//! Auto-configuration registration scan.
//!
//! Walks the module's compiled-classes directory, detects classes that carry
//! one of the configured auto-configuration annotations, and writes the
//! sorted class list to the Spring Boot registration file
//! (`META-INF/spring/org.springframework.boot.autoconfigure.AutoConfiguration.imports`)
//! inside the classes directory.
//!
//! Detection is a byte-pattern search for the annotation's JVM type
//! descriptor (`Lcom/example/Anno;`) in the class file's constant pool. A
//! class that merely references the annotation type in a signature would
//! match too; for configuration annotations that distinction does not come
//! up in practice.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::bytes::Regex;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::utils::{ensure_dir, safe_write};

/// Registration file consumed by Spring Boot's auto-configuration loader.
pub const IMPORTS_FILE: &str = "org.springframework.boot.autoconfigure.AutoConfiguration.imports";

/// Directory under the classes root that holds the registration file.
pub const SPRING_META_INF_DIR: &str = "META-INF/spring";

/// Annotations scanned for when the project does not configure its own list.
pub const DEFAULT_ANNOTATIONS: [&str; 2] = [
    "org.springframework.context.annotation.Configuration",
    "org.springframework.boot.autoconfigure.AutoConfiguration",
];

/// Scan compiled classes and write the auto-configuration registration file.
///
/// Returns the sorted class names that were registered. When no class
/// matches, no file is written and the list is empty; an empty annotation
/// list disables the scan entirely.
///
/// # Errors
///
/// Returns an error if the classes directory cannot be walked, a class file
/// cannot be read, or the registration file cannot be written.
pub fn generate_autoconfiguration_imports(
    classes_dir: &Path,
    annotations: &[String],
) -> Result<Vec<String>> {
    if annotations.is_empty() {
        debug!("No auto-configuration annotations configured, skipping scan");
        return Ok(Vec::new());
    }

    let spring_dir = classes_dir.join(SPRING_META_INF_DIR);
    ensure_dir(&spring_dir)?;

    let matcher = annotation_matcher(annotations)?;
    let mut classes = BTreeSet::new();

    for entry in WalkDir::new(classes_dir).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("class") {
            continue;
        }
        let Some(class_name) = class_name_for(classes_dir, path) else {
            continue;
        };

        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read class file {}", path.display()))?;
        if matcher.is_match(&bytes) {
            classes.insert(class_name);
        }
    }

    if classes.is_empty() {
        debug!("No auto-configuration classes found under {}", classes_dir.display());
        return Ok(Vec::new());
    }

    let classes: Vec<String> = classes.into_iter().collect();
    let mut content = String::new();
    for class_name in &classes {
        info!("Adding to imports: {class_name}");
        content.push_str(class_name);
        content.push('\n');
    }

    let imports_path = spring_dir.join(IMPORTS_FILE);
    safe_write(&imports_path, &content)?;
    info!(
        "Generated {} with {} auto-configuration entries",
        imports_path.display(),
        classes.len()
    );

    Ok(classes)
}

/// Compile the descriptor matcher for the configured annotation names.
///
/// Each fully-qualified name becomes its JVM type descriptor and the set is
/// joined into a single alternation.
fn annotation_matcher(annotations: &[String]) -> Result<Regex> {
    let descriptors: Vec<String> = annotations
        .iter()
        .map(|name| regex::escape(&format!("L{};", name.replace('.', "/"))))
        .collect();
    Regex::new(&descriptors.join("|")).context("Failed to compile annotation matcher")
}

/// Binary class name for a class file, derived from its path relative to the
/// classes root. Synthetic `module-info` and `package-info` entries are not
/// classes a registration file could name.
fn class_name_for(classes_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(classes_dir).ok()?;
    let stem = relative.with_extension("");
    let segments: Vec<String> = stem
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let class_name = segments.join(".");
    if class_name.ends_with("module-info") || class_name.ends_with("package-info") {
        return None;
    }
    Some(class_name)
}
