//! Apache site configuration store
//!
//! Wraps the `sites-available` / `sites-enabled` directory listings and the
//! `a2ensite` command family behind the `SiteProvider` trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::{fs, process::Command, time::timeout};

use crate::errors::AppError;

pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteCommand {
    EnableSite(String),
    DisableSite(String),
    ConfigTest,
    ReloadServer,
    RestartServer,
}

impl SiteCommand {
    pub fn argv(&self) -> Vec<&str> {
        match self {
            Self::EnableSite(site) => vec!["sudo", "a2ensite", site],
            Self::DisableSite(site) => vec!["sudo", "a2dissite", site],
            Self::ConfigTest => vec!["sudo", "apache2ctl", "configtest"],
            Self::ReloadServer => vec!["sudo", "service", "apache2", "reload"],
            Self::RestartServer => vec!["sudo", "service", "apache2", "restart"],
        }
    }
}

/// Captured result of one command invocation. Failures are encoded in the
/// value rather than raised, so handlers can report them as readable text.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait SiteProvider: Send + Sync {
    async fn list_available_sites(&self) -> Result<Vec<String>, AppError>;
    async fn list_enabled_sites(&self) -> Result<Vec<String>, AppError>;
    async fn is_site_enabled(&self, site: &str) -> bool;
    /// `None` means the configuration file does not exist; an existing but
    /// empty file is `Some("")`.
    async fn site_config(&self, site: &str) -> Result<Option<String>, AppError>;
    async fn run_site_command(&self, command: SiteCommand) -> CommandOutput;
    fn available_dir(&self) -> String;
    fn enabled_dir(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct ApacheSiteClient {
    sites_available: PathBuf,
    sites_enabled: PathBuf,
}

impl ApacheSiteClient {
    pub fn new(sites_available: impl Into<PathBuf>, sites_enabled: impl Into<PathBuf>) -> Self {
        Self {
            sites_available: sites_available.into(),
            sites_enabled: sites_enabled.into(),
        }
    }

    async fn list_sites(&self, directory: &Path) -> Result<Vec<String>, AppError> {
        let mut entries = match fs::read_dir(directory).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => {
                return Err(AppError::internal(format!(
                    "failed to list {}: {err}",
                    directory.display()
                )))
            }
        };

        let mut sites = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|err| {
            AppError::internal(format!("failed to read {}: {err}", directory.display()))
        })? {
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(_) => continue,
            };
            if !file_type.is_file() && !file_type.is_symlink() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name == "README" {
                continue;
            }
            sites.push(name);
        }

        sites.sort();
        Ok(sites)
    }
}

#[async_trait]
impl SiteProvider for ApacheSiteClient {
    async fn list_available_sites(&self) -> Result<Vec<String>, AppError> {
        self.list_sites(&self.sites_available).await
    }

    async fn list_enabled_sites(&self) -> Result<Vec<String>, AppError> {
        self.list_sites(&self.sites_enabled).await
    }

    async fn is_site_enabled(&self, site: &str) -> bool {
        fs::metadata(self.sites_enabled.join(site)).await.is_ok()
    }

    async fn site_config(&self, site: &str) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.sites_available.join(site)).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::internal(format!(
                "failed to read configuration for {site}: {err}"
            ))),
        }
    }

    async fn run_site_command(&self, command: SiteCommand) -> CommandOutput {
        let argv = command.argv();
        let mut invocation = Command::new(argv[0]);
        invocation.args(&argv[1..]).kill_on_drop(true);

        match timeout(COMMAND_TIMEOUT, invocation.output()).await {
            Ok(Ok(output)) => CommandOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Ok(Err(err)) => CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: err.to_string(),
            },
            Err(_) => CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: "Command timed out".to_string(),
            },
        }
    }

    fn available_dir(&self) -> String {
        self.sites_available.display().to_string()
    }

    fn enabled_dir(&self) -> String {
        self.sites_enabled.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{ApacheSiteClient, SiteCommand, SiteProvider};

    fn client_for(dir: &tempfile::TempDir) -> ApacheSiteClient {
        let available = dir.path().join("sites-available");
        let enabled = dir.path().join("sites-enabled");
        std::fs::create_dir_all(&available).expect("create sites-available");
        std::fs::create_dir_all(&enabled).expect("create sites-enabled");
        ApacheSiteClient::new(available, enabled)
    }

    #[tokio::test]
    async fn lists_sites_sorted_and_skips_readme() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = client_for(&dir);
        for name in ["zzz.conf", "000-default.conf", "README"] {
            std::fs::write(dir.path().join("sites-available").join(name), "x")
                .expect("write site file");
        }

        let sites = client.list_available_sites().await.expect("listing");
        assert_eq!(sites, vec!["000-default.conf", "zzz.conf"]);
    }

    #[tokio::test]
    async fn missing_directory_lists_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = ApacheSiteClient::new(dir.path().join("nope"), dir.path().join("also-nope"));

        let sites = client.list_available_sites().await.expect("listing");
        assert!(sites.is_empty());
    }

    #[tokio::test]
    async fn enabled_check_reflects_filesystem() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = client_for(&dir);
        std::fs::write(dir.path().join("sites-enabled").join("blog.conf"), "x")
            .expect("write enabled marker");

        assert!(client.is_site_enabled("blog.conf").await);
        assert!(!client.is_site_enabled("shop.conf").await);
    }

    #[tokio::test]
    async fn empty_config_is_present_but_absent_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = client_for(&dir);
        std::fs::write(dir.path().join("sites-available").join("empty.conf"), "")
            .expect("write empty config");

        let empty = client.site_config("empty.conf").await.expect("read");
        assert_eq!(empty.as_deref(), Some(""));

        let absent = client.site_config("ghost.conf").await.expect("read");
        assert!(absent.is_none());
    }

    #[test]
    fn command_argv_shapes() {
        assert_eq!(
            SiteCommand::EnableSite("blog.conf".to_string()).argv(),
            vec!["sudo", "a2ensite", "blog.conf"]
        );
        assert_eq!(
            SiteCommand::ReloadServer.argv(),
            vec!["sudo", "service", "apache2", "reload"]
        );
    }
}
