//! Upload a packaged module archive to a remote repository.
//!
//! This module implements the `deploy` command. The repository is configured
//! in the `[deploy.repository]` table of `modpkg.toml`; credentials live in
//! the global configuration (`~/.modpkg/config.toml`) keyed by the
//! repository's `server_id`, so they never end up in a committed file.
//!
//! The upload is a single multipart POST with the archive as a binary `file`
//! part. `nexus` and `http` repositories share that transport; `ftp` is
//! recognized in configuration but rejected here. Uploads are one attempt
//! with no retry: a failed deploy should be re-run deliberately, not
//! hammered.
//!
//! # Examples
//!
//! ```bash
//! modpkg deploy                           # Upload <build_dir>/<final_name>.zip
//! modpkg deploy --file target/app.zip     # Upload a specific archive
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures::StreamExt;
use reqwest::multipart;
use std::path::{Path, PathBuf};

use crate::config::{
    GlobalConfig, ProjectConfig, RepositoryKind, ServerCredentials, find_project_file_with_optional,
};
use crate::core::ModpkgError;
use crate::utils::fs::calculate_checksum;
use crate::utils::progress::ProgressBar;

/// Upload chunk size; each chunk advances the progress bar once.
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Command-line arguments for the `deploy` command.
#[derive(Args)]
pub struct DeployCommand {
    /// Archive to upload, overriding the default package path.
    ///
    /// Defaults to `<build_dir>/<final_name>.zip`, the archive the `build`
    /// command produces.
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl DeployCommand {
    /// Execute the deploy, discovering the project file when no explicit path
    /// was given on the command line.
    pub async fn execute_with_project_file(self, project_file: Option<PathBuf>) -> Result<()> {
        let project_file = find_project_file_with_optional(project_file)?;
        self.execute_from_path(project_file).await
    }

    /// Execute the deploy against a specific project file.
    ///
    /// Validates configuration and the package file before any network
    /// traffic, so misconfiguration fails fast and offline.
    pub async fn execute_from_path(self, project_file: PathBuf) -> Result<()> {
        let config = ProjectConfig::load(&project_file)?;

        let repository = config
            .deploy
            .repository
            .as_ref()
            .ok_or(ModpkgError::RepositoryNotConfigured)?;

        if matches!(repository.kind, RepositoryKind::Ftp) {
            return Err(ModpkgError::UnsupportedRepositoryKind {
                kind: repository.kind.to_string(),
            }
            .into());
        }

        let package = match &self.file {
            Some(file) => file.clone(),
            None => config.build_dir().join(format!("{}.zip", config.final_name())),
        };
        if !package.exists() {
            return Err(ModpkgError::PackageFileNotFound {
                path: package.display().to_string(),
            }
            .into());
        }

        let checksum = calculate_checksum(&package)?;
        tracing::info!("Package SHA-256: {checksum}");

        let global = GlobalConfig::load().await?;
        let credentials = match &repository.server_id {
            Some(id) => Some(global.server(id).ok_or_else(|| ModpkgError::ServerNotConfigured {
                id: id.clone(),
            })?),
            None => None,
        };

        tracing::info!(
            "Deploying {} to {} repository {}",
            package.display(),
            repository.kind,
            repository.url
        );
        upload_package(&repository.url, &package, credentials).await?;

        println!(
            "{} Deployed {} to {}",
            "✓".green(),
            package.display(),
            repository.url
        );
        Ok(())
    }
}

/// Upload the archive as a multipart POST with a binary `file` part.
///
/// The body is streamed in fixed-size chunks so a progress bar can track the
/// transfer. Basic authentication is attached when credentials are present.
/// A non-success status is a typed upload failure carrying the response body.
async fn upload_package(
    url: &str,
    package: &Path,
    credentials: Option<&ServerCredentials>,
) -> Result<()> {
    let file_name = package
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("module.zip")
        .to_string();

    let data = tokio::fs::read(package)
        .await
        .with_context(|| format!("Failed to read package {}", package.display()))?;
    let total = data.len() as u64;

    let progress = ProgressBar::new_bytes(total);
    progress.set_prefix(file_name.clone());

    let tracker = progress.clone();
    let chunks: Vec<Vec<u8>> = data.chunks(UPLOAD_CHUNK_BYTES).map(<[u8]>::to_vec).collect();
    let stream = futures::stream::iter(chunks).map(move |chunk| {
        tracker.inc(chunk.len() as u64);
        Ok::<Vec<u8>, std::io::Error>(chunk)
    });

    let part = multipart::Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
        .file_name(file_name)
        .mime_str("application/octet-stream")?;
    let form = multipart::Form::new().part("file", part);

    let client = reqwest::Client::new();
    let mut request = client.post(url).multipart(form);
    if let Some(credentials) = credentials {
        request = request.basic_auth(&credentials.username, Some(&credentials.password));
    }

    let response = request.send().await.map_err(|e| ModpkgError::NetworkError {
        operation: format!("upload to {url}"),
        reason: e.to_string(),
    })?;
    progress.finish_and_clear();

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ModpkgError::UploadFailed {
            url: url.to_string(),
            reason: format!("HTTP {status}: {}", body.trim()),
        }
        .into());
    }

    tracing::debug!("Repository responded with HTTP {status}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    fn write_project(dir: &Path, deploy_section: &str) -> PathBuf {
        let path = dir.join("modpkg.toml");
        fs::write(
            &path,
            format!(
                r#"
[project]
group = "com.example"
artifact = "my-module"
version = "1.0.0"

{deploy_section}
"#
            ),
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_repository_is_typed_error() {
        let temp = tempfile::tempdir().unwrap();
        let project_file = write_project(temp.path(), "");

        let cmd = DeployCommand {
            file: None,
        };
        let err = cmd.execute_from_path(project_file).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModpkgError>(),
            Some(ModpkgError::RepositoryNotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_ftp_repository_is_unsupported() {
        let temp = tempfile::tempdir().unwrap();
        let project_file = write_project(
            temp.path(),
            "[deploy.repository]\nurl = \"ftp://repo.example.com\"\nkind = \"ftp\"\n",
        );

        let cmd = DeployCommand {
            file: None,
        };
        let err = cmd.execute_from_path(project_file).await.unwrap_err();
        match err.downcast_ref::<ModpkgError>() {
            Some(ModpkgError::UnsupportedRepositoryKind {
                kind,
            }) => assert_eq!(kind, "ftp"),
            other => panic!("expected UnsupportedRepositoryKind, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_package_file_is_typed_error() {
        let temp = tempfile::tempdir().unwrap();
        let project_file = write_project(
            temp.path(),
            "[deploy.repository]\nurl = \"https://repo.example.com/upload\"\nkind = \"http\"\n",
        );

        let cmd = DeployCommand {
            file: None,
        };
        let err = cmd.execute_from_path(project_file).await.unwrap_err();
        match err.downcast_ref::<ModpkgError>() {
            Some(ModpkgError::PackageFileNotFound {
                path,
            }) => assert!(path.ends_with("my-module-1.0.0.zip")),
            other => panic!("expected PackageFileNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_file_override_is_checked() {
        let temp = tempfile::tempdir().unwrap();
        let project_file = write_project(
            temp.path(),
            "[deploy.repository]\nurl = \"https://repo.example.com/upload\"\nkind = \"nexus\"\n",
        );

        let cmd = DeployCommand {
            file: Some(temp.path().join("custom.zip")),
        };
        let err = cmd.execute_from_path(project_file).await.unwrap_err();
        match err.downcast_ref::<ModpkgError>() {
            Some(ModpkgError::PackageFileNotFound {
                path,
            }) => assert!(path.ends_with("custom.zip")),
            other => panic!("expected PackageFileNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_server_id_is_typed_error() {
        let temp = tempfile::tempdir().unwrap();

        // Global config without any [servers] entries.
        let global_path = temp.path().join("global-config.toml");
        fs::write(&global_path, "").unwrap();
        unsafe {
            std::env::set_var("MODPKG_CONFIG_PATH", &global_path);
        }

        let package = temp.path().join("my-module-1.0.0.zip");
        fs::write(&package, b"not really a zip").unwrap();

        let project_file = write_project(
            temp.path(),
            "[deploy.repository]\nurl = \"https://repo.example.com/upload\"\nkind = \"nexus\"\nserver_id = \"releases\"\n",
        );

        let cmd = DeployCommand {
            file: Some(package),
        };
        let result = cmd.execute_from_path(project_file).await;
        unsafe {
            std::env::remove_var("MODPKG_CONFIG_PATH");
        }

        let err = result.unwrap_err();
        match err.downcast_ref::<ModpkgError>() {
            Some(ModpkgError::ServerNotConfigured {
                id,
            }) => assert_eq!(id, "releases"),
            other => panic!("expected ServerNotConfigured, got {other:?}"),
        }
    }
}
