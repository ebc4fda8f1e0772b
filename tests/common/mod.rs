//! Common test utilities for modpkg integration tests
//!
//! This module consolidates frequently used test patterns: setting up an
//! isolated project directory, installing fake assembler scripts, and running
//! the modpkg binary against it.

// Allow dead code because these utilities are shared across test files and
// not every test file uses all of them
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated project directory for exercising the modpkg binary.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
}

impl TestProject {
    /// Create an empty project directory.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&project_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// The project directory path.
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// The build output directory (`target/` inside the project).
    pub fn target_path(&self) -> PathBuf {
        self.project_dir.join("target")
    }

    /// Write `modpkg.toml` into the project directory.
    pub fn write_project_file(&self, content: &str) -> Result<()> {
        let path = self.project_dir.join("modpkg.toml");
        fs::write(&path, content)
            .with_context(|| format!("Failed to write project file to {}", path.display()))?;
        Ok(())
    }

    /// Write the dependency graph to the default location.
    pub fn write_graph(&self, content: &str) -> Result<()> {
        let target = self.target_path();
        fs::create_dir_all(&target)?;
        fs::write(target.join("dependency-graph.json"), content)
            .context("Failed to write dependency graph")?;
        Ok(())
    }

    /// Install a fake assembler that records its arguments and creates the
    /// requested output file. Returns the script path for `modpkg.toml`.
    #[cfg(unix)]
    pub fn install_fake_assembler(&self) -> Result<PathBuf> {
        self.install_assembler_script(
            "#!/bin/sh\n\
             echo \"$@\" > \"$(dirname \"$0\")/assembler-args.txt\"\n\
             touch \"$4\"\n",
        )
    }

    /// Install a fake assembler that fails with a message on stderr.
    #[cfg(unix)]
    pub fn install_failing_assembler(&self, message: &str) -> Result<PathBuf> {
        self.install_assembler_script(&format!("#!/bin/sh\necho \"{message}\" >&2\nexit 2\n"))
    }

    #[cfg(unix)]
    fn install_assembler_script(&self, script: &str) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.project_dir.join("fake-assembler");
        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Arguments the fake assembler was last invoked with.
    pub fn assembler_args(&self) -> Result<String> {
        let path = self.project_dir.join("assembler-args.txt");
        fs::read_to_string(&path).context("Fake assembler was not invoked")
    }

    /// A modpkg command rooted in the project directory.
    ///
    /// Progress bars and colors are disabled so output assertions see plain
    /// text.
    pub fn modpkg_command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(env!("CARGO_BIN_EXE_modpkg"));
        cmd.current_dir(&self.project_dir).env("NO_COLOR", "1").env("MODPKG_NO_PROGRESS", "1");
        cmd
    }
}
