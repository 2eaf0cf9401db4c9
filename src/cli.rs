use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::ReconcilerConfig;
use crate::credential::{CredentialSpec, parse_list};
use crate::error::SyncError;
use crate::workspace::DEFAULT_ARTIFACTS;

#[derive(Debug, Parser)]
#[command(name = "credsync")]
#[command(about = "Add or update Jenkins credentials from a JSON list")]
#[command(version)]
pub struct Cli {
    /// Action to perform
    #[arg(short, long, value_enum, default_value_t = CliAction::AddUpdate)]
    pub action: CliAction,

    /// Jenkins URL
    #[arg(short, long, env = "JENKINS_URL")]
    pub url: String,

    /// Credential store name
    #[arg(short, long, env = "CREDSYNC_STORE")]
    pub store: String,

    /// Credential domain (usually the Jenkins folder name)
    #[arg(short, long, env = "CREDSYNC_DOMAIN")]
    pub domain: String,

    /// Working directory holding the Jenkins CLI wrapper
    #[arg(short, long, env = "CREDSYNC_WORKSPACE")]
    pub workspace: PathBuf,

    /// JSON list of credentials
    #[arg(short, long, conflicts_with = "list_file", required_unless_present = "list_file")]
    pub list: Option<String>,

    /// Read the JSON list from a file ("-" for stdin)
    #[arg(long)]
    pub list_file: Option<PathBuf>,

    /// Wrapper executable (defaults to <workspace>/jenkins_cli_wrapper.sh)
    #[arg(long, env = "CREDSYNC_WRAPPER")]
    pub wrapper: Option<PathBuf>,

    /// Per-invocation timeout in seconds (0 disables)
    #[arg(long, env = "CREDSYNC_TIMEOUT_SECS", default_value_t = 0)]
    pub timeout_secs: u64,

    /// Remove wrapper artifacts from the workspace when the run ends
    #[arg(long)]
    pub cleanup: bool,

    /// Artifact to remove with --cleanup, relative to the workspace
    #[arg(long = "cleanup-artifact", requires = "cleanup")]
    pub cleanup_artifacts: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliAction {
    /// Add missing credentials, update the ones that differ
    #[value(name = "add_update")]
    AddUpdate,
}

impl Cli {
    pub fn reconciler_config(&self) -> Result<ReconcilerConfig, SyncError> {
        let mut config = ReconcilerConfig::new(
            self.url.clone(),
            self.store.clone(),
            self.domain.clone(),
            self.workspace.clone(),
        )?
        .with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(wrapper) = &self.wrapper {
            config = config.with_wrapper(wrapper.clone());
        }
        Ok(config)
    }

    /// Artifacts to clean up, or `None` when cleanup is off.
    pub fn cleanup_artifacts(&self) -> Option<Vec<PathBuf>> {
        if !self.cleanup {
            return None;
        }
        if self.cleanup_artifacts.is_empty() {
            Some(DEFAULT_ARTIFACTS.iter().map(PathBuf::from).collect())
        } else {
            Some(self.cleanup_artifacts.clone())
        }
    }

    /// Load the credential list from `--list` or `--list-file`.
    pub fn credentials(&self) -> Result<Vec<CredentialSpec>, SyncError> {
        match (&self.list, &self.list_file) {
            (Some(list), _) => parse_list(list),
            (None, Some(path)) => parse_list(&read_list_file(path)?),
            (None, None) => Err(SyncError::InvalidArgument(
                "one of --list or --list-file is required".into(),
            )),
        }
    }
}

fn read_list_file(path: &Path) -> Result<String, SyncError> {
    let read_err = |source| SyncError::ReadList {
        path: path.to_path_buf(),
        source,
    };
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(read_err)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(read_err)
    }
}
