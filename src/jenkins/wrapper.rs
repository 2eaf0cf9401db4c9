use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use super::{CliRequest, CredentialCli};
use crate::config::ReconcilerConfig;
use crate::error::SyncError;

/// Runs `jenkins_cli_wrapper.sh` as a child process.
///
/// The wrapper inherits this process's environment, which is where
/// `JENKINS_USERNAME` and `JENKINS_TOKEN` are expected to live. On unix it
/// runs in its own process group so a timeout also stops the Jenkins CLI it
/// started.
#[derive(Debug, Clone)]
pub struct WrapperCli {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl WrapperCli {
    pub fn from_config(config: &ReconcilerConfig) -> Self {
        Self {
            program: config.wrapper.clone(),
            timeout: config.timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl CredentialCli for WrapperCli {
    #[tracing::instrument(
        skip_all,
        fields(action = %request.action(), target_name = %request.target()),
        err
    )]
    async fn execute(&self, request: &CliRequest<'_>) -> Result<String, SyncError> {
        let action = request.action();
        let target = request.target();
        let spawn_err = |source| SyncError::Spawn {
            action,
            target: target.to_owned(),
            source,
        };

        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(spawn_err)?;
        let pid = child.id();

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    kill_process_group(pid);
                    return Err(SyncError::Timeout {
                        action,
                        target: target.to_owned(),
                        secs: limit.as_secs(),
                    });
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(spawn_err)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SyncError::CommandFailed {
                action,
                target: target.to_owned(),
                status: output.status,
                stderr: stderr.trim().to_owned(),
            });
        }

        tracing::debug!(stdout_bytes = output.stdout.len(), "wrapper finished");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Kill everything left in the wrapper's process group.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    match killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(error) => tracing::warn!(pid, %error, "failed to kill wrapper process group"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
