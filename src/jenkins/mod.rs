//! Boundary to the external Jenkins CLI wrapper.
//!
//! The reconciler never builds command lines itself: it hands a structured
//! [`CliRequest`] to a [`CredentialCli`] implementation and gets back the
//! wrapper's stdout.

pub mod request;
pub mod wrapper;

use std::fmt;
use std::future::Future;

pub use request::CliRequest;
pub use wrapper::WrapperCli;

use crate::error::SyncError;

/// Action selector understood by the wrapper (`-a`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SetDomain,
    AddUpdate,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetDomain => "set_domain",
            Self::AddUpdate => "add_update",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Executes wrapper requests.
///
/// Implementations must treat a non-zero exit as an error
/// ([`SyncError::CommandFailed`]) and return stdout untouched on success.
pub trait CredentialCli: Send + Sync {
    fn execute(
        &self,
        request: &CliRequest<'_>,
    ) -> impl Future<Output = Result<String, SyncError>> + Send;
}

impl<T: CredentialCli> CredentialCli for &T {
    fn execute(
        &self,
        request: &CliRequest<'_>,
    ) -> impl Future<Output = Result<String, SyncError>> + Send {
        (**self).execute(request)
    }
}
