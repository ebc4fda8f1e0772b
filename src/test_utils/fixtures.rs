//! Test fixtures for creating sample data structures
//!
//! This module provides builders for the three inputs a packaging run needs:
//! a `modpkg.toml` project file, a resolved dependency graph, and a built
//! module artifact (a small but structurally valid jar).

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Test fixture for creating sample `modpkg.toml` files
#[derive(Clone, Debug)]
pub struct ProjectFixture {
    pub content: String,
    pub name: String,
}

impl ProjectFixture {
    /// Complete project: metadata, host selection, and assembly settings.
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            content: r#"
[project]
group = "com.example"
artifact = "my-module"
version = "1.0.0"
name = "My Module"
description = "Example module used in tests"
developers = ["Jane Doe", "John Smith"]

[host]
group = "com.acme"
artifact = "platform-app"
version = "6.1.0"

[assembly]
excludes = ["com.acme:internal-tools:2.0"]
"#
            .trim()
            .to_string(),
        }
    }

    /// Smallest valid project: coordinates only, no host configured.
    pub fn minimal() -> Self {
        Self {
            name: "minimal".to_string(),
            content: r#"
[project]
group = "com.example"
artifact = "my-module"
version = "1.0.0"
"#
            .trim()
            .to_string(),
        }
    }

    /// Project with a deploy repository pointing at `url`.
    pub fn with_repository(url: &str, server_id: Option<&str>) -> Self {
        let server_line = match server_id {
            Some(id) => format!("server_id = \"{id}\"\n"),
            None => String::new(),
        };
        Self {
            name: "with_repository".to_string(),
            content: format!(
                r#"
[project]
group = "com.example"
artifact = "my-module"
version = "1.0.0"

[deploy.repository]
url = "{url}"
kind = "nexus"
{server_line}"#
            )
            .trim()
            .to_string(),
        }
    }

    /// Project file with invalid TOML syntax.
    pub fn invalid_syntax() -> Self {
        Self {
            name: "invalid_syntax".to_string(),
            content: r#"
[project
group = "com.example"
"#
            .trim()
            .to_string(),
        }
    }

    /// Write the project file into a directory.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("modpkg.toml");
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write project fixture to {}", path.display()))?;
        Ok(path)
    }
}

/// Test fixture for creating resolved dependency graph files
///
/// The graphs match the shapes the packaging pipeline cares about: a host
/// node with a subtree to flatten, a shared dependency appearing under two
/// parents, and a variant with no host at all.
#[derive(Clone, Debug)]
pub struct GraphFixture {
    pub content: String,
    pub name: String,
}

impl GraphFixture {
    /// Module with a host application subtree and one extra library.
    ///
    /// `org.slf4j:slf4j-api` appears both under the host and under the extra
    /// library, which exercises exclusion dedupe.
    pub fn with_host() -> Self {
        Self {
            name: "with_host".to_string(),
            content: r#"{
  "group": "com.example", "artifact": "my-module", "version": "1.0.0",
  "children": [
    {
      "group": "com.acme", "artifact": "platform-app", "version": "6.1.0",
      "children": [
        {
          "group": "com.acme", "artifact": "platform-core", "version": "6.1.0",
          "children": [
            {"group": "org.slf4j", "artifact": "slf4j-api", "version": "2.0.13"}
          ]
        },
        {"group": "org.springframework", "artifact": "spring-web", "version": "6.2.0"}
      ]
    },
    {
      "group": "com.example", "artifact": "extra-lib", "version": "1.4.0",
      "children": [
        {"group": "org.slf4j", "artifact": "slf4j-api", "version": "2.0.13"}
      ]
    }
  ]
}"#
            .to_string(),
        }
    }

    /// Module with dependencies but no host application anywhere.
    pub fn without_host() -> Self {
        Self {
            name: "without_host".to_string(),
            content: r#"{
  "group": "com.example", "artifact": "my-module", "version": "1.0.0",
  "children": [
    {"group": "com.example", "artifact": "extra-lib", "version": "1.4.0"}
  ]
}"#
            .to_string(),
        }
    }

    /// Write the graph to `<dir>/target/dependency-graph.json`, the default
    /// location the pipeline loads from.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let target = dir.join("target");
        fs::create_dir_all(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;
        let path = target.join("dependency-graph.json");
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write graph fixture to {}", path.display()))?;
        Ok(path)
    }

    /// Write the graph to an explicit path.
    pub fn write_to_path(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, &self.content)
            .with_context(|| format!("Failed to write graph fixture to {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

/// Test fixture for creating small but structurally valid jar archives
#[derive(Clone, Debug)]
pub struct JarFixture {
    entries: Vec<(String, Vec<u8>)>,
    pub name: String,
}

impl JarFixture {
    /// Jar shaped like a Spring Boot module: a manifest, bundled application
    /// configuration at the root and under `BOOT-INF/classes/`, and one class
    /// entry that must survive stripping.
    pub fn spring_boot() -> Self {
        Self {
            name: "spring_boot".to_string(),
            entries: vec![
                entry(
                    "META-INF/MANIFEST.MF",
                    "Manifest-Version: 1.0\r\nImplementation-Title: sample\r\n\r\n",
                ),
                entry("application.properties", "server.port=8080\n"),
                entry("BOOT-INF/classes/application-worker.yml", "worker: true\n"),
                entry("com/example/Module.class", "stub"),
            ],
        }
    }

    /// Jar with a single content entry and no manifest at all.
    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            entries: vec![entry("com/example/Module.class", "stub")],
        }
    }

    /// Write the jar to an explicit path.
    pub fn write_to_path(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create jar fixture at {}", path.display()))?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, content) in &self.entries {
            writer
                .start_file(name.as_str(), options)
                .with_context(|| format!("Failed to start jar entry {name}"))?;
            writer
                .write_all(content)
                .with_context(|| format!("Failed to write jar entry {name}"))?;
        }
        writer.finish().context("Failed to finish jar fixture")?;
        Ok(path.to_path_buf())
    }
}

fn entry(name: &str, content: &str) -> (String, Vec<u8>) {
    (name.to_string(), content.as_bytes().to_vec())
}

/// Entry names of a jar archive, in archive order.
pub fn jar_entry_names(path: &Path) -> Result<Vec<String>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open jar {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("Failed to read jar {}", path.display()))?;
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        names.push(archive.by_index(index)?.name().to_string());
    }
    Ok(names)
}

/// Read one UTF-8 entry out of a jar archive.
pub fn read_jar_entry(path: &Path, name: &str) -> Result<String> {
    use std::io::Read;

    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open jar {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("Failed to read jar {}", path.display()))?;
    let mut entry = archive
        .by_name(name)
        .with_context(|| format!("Entry {name} not found in {}", path.display()))?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_fixture_parses() {
        let temp = tempfile::tempdir().unwrap();
        let path = ProjectFixture::basic().write_to(temp.path()).unwrap();
        let config = crate::config::ProjectConfig::load(&path).unwrap();
        assert_eq!(config.project.artifact, "my-module");
        assert!(config.host_spec().effective_coords().is_some());
    }

    #[test]
    fn test_graph_fixture_loads() {
        let temp = tempfile::tempdir().unwrap();
        let path = GraphFixture::with_host().write_to(temp.path()).unwrap();
        let graph = crate::graph::DependencyGraph::load(&path).unwrap();
        assert_eq!(graph.node_count(), 7);
    }

    #[test]
    fn test_jar_fixture_is_readable_archive() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("module.jar");
        JarFixture::spring_boot().write_to_path(&path).unwrap();

        let file = fs::File::open(&path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 4);
    }
}
