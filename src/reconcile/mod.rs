pub mod observer;
pub mod report;

use std::time::Instant;

pub use observer::{NoopObserver, ReconcileEvent, ReconcileObserver, TracingObserver};
pub use report::{OutcomeKind, OutcomeRecord, Report};

use crate::config::ReconcilerConfig;
use crate::credential::{CredentialSpec, validate_all};
use crate::error::SyncError;
use crate::jenkins::{CliRequest, CredentialCli};

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Upserts credentials into one Jenkins domain.
///
/// A `Reconciler` only exists once its domain has been ensured: [`connect`]
/// runs `set_domain` before handing the value out.
///
/// [`connect`]: Reconciler::connect
pub struct Reconciler<C, O = TracingObserver> {
    config: ReconcilerConfig,
    cli: C,
    observer: O,
}

impl<C: CredentialCli, O: ReconcileObserver> Reconciler<C, O> {
    /// Ensure the domain exists, then return a reconciler bound to it.
    pub async fn connect(config: ReconcilerConfig, cli: C, observer: O) -> Result<Self, SyncError> {
        let reconciler = Self {
            config,
            cli,
            observer,
        };
        reconciler.ensure_domain().await?;
        Ok(reconciler)
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    async fn ensure_domain(&self) -> Result<(), SyncError> {
        let started = Instant::now();
        let request = CliRequest::set_domain(&self.config);
        if let Err(error) = self.cli.execute(&request).await {
            self.observer.record(&ReconcileEvent::Failed {
                target: &self.config.domain,
                error: &error,
            });
            return Err(error);
        }
        self.observer.record(&ReconcileEvent::DomainEnsured {
            domain: &self.config.domain,
            duration: started.elapsed(),
        });
        Ok(())
    }

    /// Create or update one credential and return the wrapper's outcome line.
    ///
    /// The spec is validated first; an invalid spec never reaches the
    /// wrapper. The outcome is opaque: only the trailing line terminator is
    /// removed.
    pub async fn upsert(&self, spec: &CredentialSpec) -> Result<String, SyncError> {
        spec.validate()
            .map_err(|reason| SyncError::InvalidCredential {
                id: spec.id.clone(),
                reason,
            })?;
        self.upsert_validated(spec).await
    }

    async fn upsert_validated(&self, spec: &CredentialSpec) -> Result<String, SyncError> {
        let started = Instant::now();
        self.observer.record(&ReconcileEvent::UpsertStarted {
            id: &spec.id,
            kind: &spec.kind,
        });

        let request = CliRequest::add_update(&self.config, spec);
        let stdout = match self.cli.execute(&request).await {
            Ok(stdout) => stdout,
            Err(error) => {
                self.observer.record(&ReconcileEvent::Failed {
                    target: &spec.id,
                    error: &error,
                });
                return Err(error);
            }
        };

        let outcome = stdout.trim_end_matches(['\r', '\n']).to_owned();
        self.observer.record(&ReconcileEvent::UpsertFinished {
            id: &spec.id,
            outcome: &outcome,
            duration: started.elapsed(),
        });
        Ok(outcome)
    }

    /// Upsert every spec in order. Stops at the first failure.
    ///
    /// The whole list is validated (including duplicate ids) before the
    /// first wrapper call.
    pub async fn upsert_all(&self, specs: &[CredentialSpec]) -> Result<Report, SyncError> {
        validate_all(specs)?;
        let started = Instant::now();
        let mut report = Report::with_capacity(specs.len());
        for spec in specs {
            let outcome = self.upsert_validated(spec).await?;
            report.push(OutcomeRecord::new(spec.id.clone(), outcome));
        }
        self.observer.record(&ReconcileEvent::RunFinished {
            total: report.len(),
            summary: &report.summary(),
            duration: started.elapsed(),
        });
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Validate `specs`, ensure the domain, upsert each spec in order and collect
/// the outcomes.
///
/// Nothing reaches the wrapper if any spec is invalid. Any wrapper failure
/// aborts the run and no report is produced.
pub async fn collect<C, O>(
    config: ReconcilerConfig,
    cli: C,
    observer: O,
    specs: &[CredentialSpec],
) -> Result<Report, SyncError>
where
    C: CredentialCli,
    O: ReconcileObserver,
{
    validate_all(specs)?;
    let reconciler = Reconciler::connect(config, cli, observer).await?;
    reconciler.upsert_all(specs).await
}

/// [`collect`], rendered as the JSON report printed by the binary.
pub async fn run<C, O>(
    config: ReconcilerConfig,
    cli: C,
    observer: O,
    specs: &[CredentialSpec],
) -> Result<String, SyncError>
where
    C: CredentialCli,
    O: ReconcileObserver,
{
    collect(config, cli, observer, specs).await?.to_json()
}
