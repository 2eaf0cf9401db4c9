use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use credsync::cli::Cli;
use credsync::jenkins::WrapperCli;
use credsync::reconcile::{self, TracingObserver};
use credsync::workspace::WorkspaceGuard;

/// Variables the wrapper reads to authenticate against Jenkins.
const JENKINS_AUTH_VARS: [&str; 2] = ["JENKINS_USERNAME", "JENKINS_TOKEN"];

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Stdout carries the report; logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("CREDSYNC_LOG").unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<String> {
    let cli = Cli::parse();

    let config = cli.reconciler_config().context("invalid configuration")?;
    let specs = cli.credentials().context("invalid credential list")?;

    for var in JENKINS_AUTH_VARS {
        if std::env::var_os(var).is_none() {
            tracing::warn!(var, "Jenkins auth variable not set; the wrapper may fail to log in");
        }
    }

    let _guard = cli
        .cleanup_artifacts()
        .map(|artifacts| WorkspaceGuard::new(config.workspace.clone(), artifacts))
        .transpose()
        .map_err(anyhow::Error::msg)
        .context("invalid --cleanup-artifact")?;

    tracing::info!(
        url = %config.url,
        store = %config.store,
        domain = %config.domain,
        credentials = specs.len(),
        "reconciling credentials"
    );

    let wrapper = WrapperCli::from_config(&config);
    let report = reconcile::run(config, wrapper, TracingObserver, &specs).await?;
    Ok(report)
}
