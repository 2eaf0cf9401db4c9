use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SyncError;
use crate::validation::{check_name, check_no_nul, check_present, check_url};

/// Wrapper script name the Jenkins automation role drops into the workspace.
pub const DEFAULT_WRAPPER_NAME: &str = "jenkins_cli_wrapper.sh";

/// Where to reach Jenkins and which domain to reconcile into.
///
/// Immutable once built; every wrapper invocation of a run sees the same
/// values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    pub url: String,
    pub store: String,
    pub domain: String,
    pub workspace: PathBuf,
    pub wrapper: PathBuf,
    pub timeout: Option<Duration>,
}

impl ReconcilerConfig {
    pub fn new(
        url: impl Into<String>,
        store: impl Into<String>,
        domain: impl Into<String>,
        workspace: impl Into<PathBuf>,
    ) -> Result<Self, SyncError> {
        let url = url.into();
        let store = store.into();
        let domain = domain.into();
        let workspace = workspace.into();

        check_url(&url).map_err(SyncError::InvalidArgument)?;
        check_name("store", &store).map_err(SyncError::InvalidArgument)?;
        check_name("domain", &domain).map_err(SyncError::InvalidArgument)?;
        check_workspace(&workspace).map_err(SyncError::InvalidArgument)?;

        let wrapper = workspace.join(DEFAULT_WRAPPER_NAME);
        Ok(Self {
            url,
            store,
            domain,
            workspace,
            wrapper,
            timeout: None,
        })
    }

    #[must_use]
    pub fn with_wrapper(mut self, wrapper: impl Into<PathBuf>) -> Self {
        self.wrapper = wrapper.into();
        self
    }

    /// A zero duration means "no timeout".
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }
}

fn check_workspace(path: &Path) -> Result<(), String> {
    let Some(display) = path.to_str() else {
        return Err("workspace path must be valid UTF-8".into());
    };
    check_present("workspace", display)?;
    check_no_nul("workspace", display)
}
