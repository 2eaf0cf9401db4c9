#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::process::ExitStatus;
use std::sync::Mutex;

use credsync::config::ReconcilerConfig;
use credsync::credential::CredentialSpec;
use credsync::error::SyncError;
use credsync::jenkins::{Action, CliRequest, CredentialCli};
use credsync::reconcile::{ReconcileEvent, ReconcileObserver};

pub fn test_config() -> ReconcilerConfig {
    ReconcilerConfig::new("http://jenkins.test:8080", "_", "team-a", "/tmp/credsync-ws").unwrap()
}

pub fn spec(id: &str) -> CredentialSpec {
    CredentialSpec::new(id, format!("{id} description"), format!("{id}-secret"), "password")
}

/// Exit status with the given code, as a failed wrapper would report it.
pub fn exit_status(code: i32) -> ExitStatus {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(code.cast_unsigned())
    }
}

// ---------------------------------------------------------------------------
// Fake wrapper
// ---------------------------------------------------------------------------

/// One request seen by [`FakeCli`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub action: Action,
    pub target: String,
    pub args: Vec<String>,
}

impl RecordedCall {
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    pub fn count_of(&self, flag: &str) -> usize {
        self.args.iter().filter(|a| *a == flag).count()
    }
}

/// In-memory stand-in for the Jenkins wrapper.
///
/// Remembers the last arguments per credential id so a repeated identical
/// request reports `up-to-date`, like the real wrapper does.
#[derive(Default)]
pub struct FakeCli {
    calls: Mutex<Vec<RecordedCall>>,
    stored: Mutex<HashMap<String, Vec<String>>>,
    fail_domain: bool,
    fail_ids: Vec<String>,
}

impl FakeCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_domain() -> Self {
        Self {
            fail_domain: true,
            ..Self::default()
        }
    }

    pub fn failing_on(id: &str) -> Self {
        Self {
            fail_ids: vec![id.to_owned()],
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn upsert_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.action == Action::AddUpdate)
            .map(|c| c.target)
            .collect()
    }

    fn failure(action: Action, target: &str) -> SyncError {
        SyncError::CommandFailed {
            action,
            target: target.to_owned(),
            status: exit_status(1),
            stderr: "ERROR: wrapper failed".into(),
        }
    }
}

impl CredentialCli for FakeCli {
    async fn execute(&self, request: &CliRequest<'_>) -> Result<String, SyncError> {
        let args: Vec<String> = request
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let target = request.target().to_owned();
        self.calls.lock().unwrap().push(RecordedCall {
            action: request.action(),
            target: target.clone(),
            args: args.clone(),
        });

        match request.action() {
            Action::SetDomain if self.fail_domain => Err(Self::failure(Action::SetDomain, &target)),
            Action::SetDomain => Ok(String::new()),
            Action::AddUpdate if self.fail_ids.contains(&target) => {
                Err(Self::failure(Action::AddUpdate, &target))
            }
            Action::AddUpdate => {
                let mut stored = self.stored.lock().unwrap();
                let outcome = match stored.insert(target, args.clone()) {
                    None => "added",
                    Some(previous) if previous == args => "up-to-date",
                    Some(_) => "updated",
                };
                Ok(format!("{outcome}\n"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Recording observer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ReconcileObserver for RecordingObserver {
    fn record(&self, event: &ReconcileEvent<'_>) {
        let line = match event {
            ReconcileEvent::DomainEnsured { domain, .. } => format!("domain:{domain}"),
            ReconcileEvent::UpsertStarted { id, .. } => format!("start:{id}"),
            ReconcileEvent::UpsertFinished { id, outcome, .. } => format!("finish:{id}={outcome}"),
            ReconcileEvent::Failed { target, .. } => format!("failed:{target}"),
            ReconcileEvent::RunFinished { total, .. } => format!("run:{total}"),
        };
        self.events.lock().unwrap().push(line);
    }
}

// ---------------------------------------------------------------------------
// Fake wrapper script
// ---------------------------------------------------------------------------

/// Fake wrapper: logs its argv (one argument per line, calls separated by
/// `--`), fails for id `boom` or domain `broken`. For id `slow` it starts a
/// child that writes `slow.done` after 3s, then waits for it.
pub const FAKE_WRAPPER: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
log="$dir/calls.log"
for arg in "$@"; do printf '%s\n' "$arg" >> "$log"; done
printf '%s\n' '--' >> "$log"

action=''; id=''; domain=''
while [ $# -gt 1 ]; do
  case "$1" in
    -a) action="$2" ;;
    -i) id="$2" ;;
    -d) domain="$2" ;;
  esac
  shift 2
done

if [ "$domain" = broken ]; then
  echo "ERROR: cannot create domain" >&2
  exit 2
fi
case "$id" in
  boom) echo "ERROR: credential rejected" >&2; exit 3 ;;
  slow) sh -c 'sleep 3; touch "$1"' slow "$dir/slow.done" ;;
esac
if [ "$action" = add_update ]; then
  echo "added"
fi
exit 0
"#;

#[cfg(unix)]
pub struct FakeWorkspace {
    dir: tempfile::TempDir,
}

#[cfg(unix)]
impl FakeWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("jenkins_cli_wrapper.sh");
        std::fs::write(&script, FAKE_WRAPPER).unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self, domain: &str) -> ReconcilerConfig {
        ReconcilerConfig::new("http://jenkins.test:8080", "_", domain, self.path()).unwrap()
    }

    /// Argument vectors of every wrapper call, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        let Ok(log) = std::fs::read_to_string(self.path().join("calls.log")) else {
            return Vec::new();
        };
        log.split_terminator("--\n")
            .map(|call| call.lines().map(str::to_owned).collect())
            .collect()
    }
}

pub fn value_of<'a>(call: &'a [String], flag: &str) -> Option<&'a str> {
    call.iter()
        .position(|a| a == flag)
        .and_then(|i| call.get(i + 1))
        .map(String::as_str)
}
