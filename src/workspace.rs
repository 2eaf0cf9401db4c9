//! Cleanup of files the wrapper leaves in the working directory.
//!
//! The wrapper downloads the Jenkins CLI jar into the workspace on every run.
//! A [`WorkspaceGuard`] removes those artifacts when it is dropped, so they
//! are released on success, on error, on early return and while a panic
//! unwinds. The release profile keeps the default `panic = "unwind"` for the
//! same reason.

use std::path::{Component, Path, PathBuf};

/// Artifact the wrapper downloads next to itself.
pub const DEFAULT_ARTIFACTS: &[&str] = &["jenkins-cli.jar"];

#[derive(Debug)]
pub struct WorkspaceGuard {
    root: PathBuf,
    artifacts: Vec<PathBuf>,
}

impl WorkspaceGuard {
    /// Guard `artifacts` (paths relative to `root`).
    ///
    /// Entries that are absolute or climb out of `root` are rejected.
    pub fn new<I, P>(root: impl Into<PathBuf>, artifacts: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let root = root.into();
        let artifacts = artifacts
            .into_iter()
            .map(|artifact| resolve_artifact(&root, artifact.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { root, artifacts })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    fn cleanup(&self) {
        for path in &self.artifacts {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed workspace artifact"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove workspace artifact");
                }
            }
        }
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn resolve_artifact(root: &Path, artifact: &Path) -> Result<PathBuf, String> {
    if artifact.as_os_str().is_empty() {
        return Err("artifact path must not be empty".into());
    }
    let escapes = artifact
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(format!(
            "artifact path must stay inside the workspace: {}",
            artifact.display()
        ));
    }
    Ok(root.join(artifact))
}
