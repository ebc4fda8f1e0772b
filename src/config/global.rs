//! Global configuration management for modpkg.
//!
//! Handles the per-user configuration file holding deploy server credentials.
//! This file lives outside the project tree and is never committed; the
//! project-level `modpkg.toml` stays free of secrets and refers to servers by
//! id only.
//!
//! # Location
//!
//! - Unix/macOS: `~/.modpkg/config.toml`
//! - Windows: `%LOCALAPPDATA%\modpkg\config.toml`
//!
//! The location can be overridden with the `MODPKG_CONFIG_PATH` environment
//! variable, which tests also use to isolate themselves from the real user
//! configuration.
//!
//! # File format
//!
//! ```toml
//! [servers.company-nexus]
//! username = "ci-deploy"
//! password = "s3cret"
//!
//! [servers.staging]
//! username = "deployer"
//! password = "hunter2"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Per-user configuration stored outside the project tree.
///
/// Maps server ids referenced by `[deploy.repository] server_id` in
/// `modpkg.toml` to the credentials used when uploading packaged modules.
///
/// # Security Considerations
///
/// - **Never commit** this file to version control
/// - Contains plain credentials; keep file permissions restrictive
/// - Credentials are never logged, only the server id is
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GlobalConfig {
    /// Deploy server credentials, keyed by server id.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub servers: HashMap<String, ServerCredentials>,
}

/// Credentials for one deploy server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCredentials {
    /// Username sent with the upload request.
    pub username: String,
    /// Password or access token sent with the upload request.
    pub password: String,
}

impl GlobalConfig {
    /// Load the global configuration from the default location.
    ///
    /// A missing file is not an error: deploy to servers without credentials
    /// is legitimate, so an absent configuration simply yields an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the default path cannot be determined, or the file
    /// exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load the global configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse global config from {}", path.display()))
    }

    /// Look up credentials for a server id.
    #[must_use]
    pub fn server(&self, id: &str) -> Option<&ServerCredentials> {
        self.servers.get(id)
    }

    /// Default platform-specific path of the global configuration file.
    ///
    /// `MODPKG_CONFIG_PATH` overrides the computed location when set.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory (or the local data directory on
    /// Windows) cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("MODPKG_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("modpkg")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".modpkg")
        };

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_from_parses_servers() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[servers.company-nexus]
username = "ci-deploy"
password = "s3cret"
"#,
        )
        .unwrap();

        let config = GlobalConfig::load_from(&path).await.unwrap();

        let creds = config.server("company-nexus").unwrap();
        assert_eq!(creds.username, "ci-deploy");
        assert_eq!(creds.password, "s3cret");
        assert!(config.server("unknown").is_none());
    }

    #[tokio::test]
    #[serial]
    async fn load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        unsafe {
            std::env::set_var("MODPKG_CONFIG_PATH", temp.path().join("absent.toml"));
        }

        let result = GlobalConfig::load().await;
        unsafe {
            std::env::remove_var("MODPKG_CONFIG_PATH");
        }

        assert!(result.unwrap().servers.is_empty());
    }

    #[tokio::test]
    async fn load_from_rejects_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[servers.broken\n").unwrap();

        assert!(GlobalConfig::load_from(&path).await.is_err());
    }

    #[test]
    #[serial]
    fn default_path_honors_env_override() {
        unsafe {
            std::env::set_var("MODPKG_CONFIG_PATH", "/custom/location/config.toml");
        }

        let path = GlobalConfig::default_path().unwrap();
        assert_eq!(path, PathBuf::from("/custom/location/config.toml"));

        unsafe {
            std::env::remove_var("MODPKG_CONFIG_PATH");
        }
    }

    #[test]
    #[serial]
    fn default_path_without_override_lives_under_user_dir() {
        unsafe {
            std::env::remove_var("MODPKG_CONFIG_PATH");
        }

        let path = GlobalConfig::default_path().unwrap();
        assert!(path.ends_with("config.toml"));
        let parent = path.parent().unwrap().file_name().unwrap();
        assert!(parent == ".modpkg" || parent == "modpkg");
    }

    #[test]
    fn serializes_round_trip() {
        let mut config = GlobalConfig::default();
        config.servers.insert(
            "staging".to_string(),
            ServerCredentials {
                username: "deployer".to_string(),
                password: "hunter2".to_string(),
            },
        );

        let rendered = toml::to_string(&config).unwrap();
        let reparsed: GlobalConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.server("staging"), config.server("staging"));
    }
}
