//! Reporting hook for reconciliation progress.
//!
//! The reconciler is handed an observer instead of writing to a global
//! logger, so callers choose where progress goes and tests can inspect it.

use std::collections::BTreeMap;
use std::time::Duration;

use super::report::OutcomeKind;
use crate::error::SyncError;

/// Discrete reconciliation events.
#[derive(Debug, Clone, Copy)]
pub enum ReconcileEvent<'a> {
    DomainEnsured {
        domain: &'a str,
        duration: Duration,
    },
    UpsertStarted {
        id: &'a str,
        kind: &'a str,
    },
    UpsertFinished {
        id: &'a str,
        outcome: &'a str,
        duration: Duration,
    },
    Failed {
        target: &'a str,
        error: &'a SyncError,
    },
    RunFinished {
        total: usize,
        summary: &'a BTreeMap<OutcomeKind, usize>,
        duration: Duration,
    },
}

pub trait ReconcileObserver: Send + Sync {
    fn record(&self, event: &ReconcileEvent<'_>);
}

impl<T: ReconcileObserver + ?Sized> ReconcileObserver for &T {
    fn record(&self, event: &ReconcileEvent<'_>) {
        (**self).record(event);
    }
}

/// Emits every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ReconcileObserver for TracingObserver {
    fn record(&self, event: &ReconcileEvent<'_>) {
        match *event {
            ReconcileEvent::DomainEnsured { domain, duration } => {
                tracing::info!(
                    domain,
                    duration_ms = duration_ms(duration),
                    "credential domain ensured"
                );
            }
            ReconcileEvent::UpsertStarted { id, kind } => {
                tracing::debug!(credential_id = id, kind, "upserting credential");
            }
            ReconcileEvent::UpsertFinished {
                id,
                outcome,
                duration,
            } => {
                let class = OutcomeKind::classify(outcome);
                if class.is_failure() {
                    tracing::warn!(
                        credential_id = id,
                        outcome,
                        duration_ms = duration_ms(duration),
                        "wrapper reported a failed upsert"
                    );
                } else {
                    tracing::info!(
                        credential_id = id,
                        outcome,
                        duration_ms = duration_ms(duration),
                        "credential upserted"
                    );
                }
            }
            ReconcileEvent::Failed { target, error } => {
                tracing::error!(target_name = target, error = %error, "reconciliation aborted");
            }
            ReconcileEvent::RunFinished {
                total,
                summary,
                duration,
            } => {
                let summary: BTreeMap<&str, usize> =
                    summary.iter().map(|(k, v)| (k.as_str(), *v)).collect();
                tracing::info!(
                    total,
                    summary = ?summary,
                    duration_ms = duration_ms(duration),
                    "credential reconciliation finished"
                );
            }
        }
    }
}

/// Discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReconcileObserver for NoopObserver {
    #[inline]
    fn record(&self, _event: &ReconcileEvent<'_>) {}
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_observer_handles_every_event() {
        let obs = TracingObserver;
        let error = SyncError::InvalidArgument("x".into());
        let summary = BTreeMap::from([(OutcomeKind::Added, 1)]);
        obs.record(&ReconcileEvent::DomainEnsured {
            domain: "d",
            duration: Duration::from_millis(3),
        });
        obs.record(&ReconcileEvent::UpsertStarted {
            id: "c1",
            kind: "password",
        });
        obs.record(&ReconcileEvent::UpsertFinished {
            id: "c1",
            outcome: "added-failed",
            duration: Duration::ZERO,
        });
        obs.record(&ReconcileEvent::Failed {
            target: "c1",
            error: &error,
        });
        obs.record(&ReconcileEvent::RunFinished {
            total: 1,
            summary: &summary,
            duration: Duration::from_secs(1),
        });
    }

    #[test]
    fn duration_ms_saturates() {
        assert_eq!(duration_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }
}
