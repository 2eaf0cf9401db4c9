use std::ffi::OsStr;

use super::Action;
use crate::config::ReconcilerConfig;
use crate::credential::CredentialSpec;

/// One wrapper invocation, described by its fields rather than a command
/// string.
///
/// Every value becomes its own argv entry, so quotes, spaces and shell
/// metacharacters reach the wrapper exactly as written.
#[derive(Debug, Clone, Copy)]
pub struct CliRequest<'a> {
    action: Action,
    config: &'a ReconcilerConfig,
    credential: Option<&'a CredentialSpec>,
}

impl<'a> CliRequest<'a> {
    pub fn set_domain(config: &'a ReconcilerConfig) -> Self {
        Self {
            action: Action::SetDomain,
            config,
            credential: None,
        }
    }

    pub fn add_update(config: &'a ReconcilerConfig, credential: &'a CredentialSpec) -> Self {
        Self {
            action: Action::AddUpdate,
            config,
            credential: Some(credential),
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Name used in logs and errors: the credential id, or the domain for
    /// `set_domain`.
    pub fn target(&self) -> &'a str {
        self.credential
            .map_or(self.config.domain.as_str(), |c| c.id.as_str())
    }

    /// `(flag, value)` pairs in wrapper order. Optional credential fields are
    /// present only when set on the credential.
    pub fn fields(&self) -> Vec<(&'static str, &'a OsStr)> {
        let config = self.config;
        let mut fields: Vec<(&'static str, &'a OsStr)> = vec![
            ("-a", OsStr::new(self.action.as_str())),
            ("-u", OsStr::new(&config.url)),
            ("-s", OsStr::new(&config.store)),
            ("-w", config.workspace.as_os_str()),
            ("-d", OsStr::new(&config.domain)),
        ];

        if let Some(spec) = self.credential {
            fields.extend([
                ("-i", OsStr::new(&spec.id)),
                ("-c", OsStr::new(&spec.description)),
                ("-v", OsStr::new(&spec.value)),
                ("-t", OsStr::new(&spec.kind)),
            ]);
            if let Some(username) = &spec.username {
                fields.push(("-U", OsStr::new(username)));
            }
            if let Some(value2) = &spec.value2 {
                fields.push(("-V", OsStr::new(value2)));
            }
        }

        fields
    }

    /// Flattened argv for the wrapper process.
    pub fn args(&self) -> Vec<&'a OsStr> {
        self.fields()
            .into_iter()
            .flat_map(|(flag, value)| [OsStr::new(flag), value])
            .collect()
    }
}
