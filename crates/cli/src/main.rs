//! Shunt CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: read flags and `INPUT_<NAME>` variables into
//!    [`board::RunParameters`] (see [`config`]).
//! 2. **Wire observability**: configure `tracing-subscriber` with a text or
//!    JSON layer and an optional OpenTelemetry OTLP exporter. All `tracing`
//!    spans and events emitted by every crate in the workspace flow through it.
//! 3. **Construct infrastructure**: create the concrete `ZenhubClient` and
//!    `GithubClient` and inject them into [`board::Orchestrator`].
//! 4. **Report**: write step outputs to `GITHUB_OUTPUT`, emit `::error::`
//!    workflow commands for failures, and set the exit status.

mod actions;
mod config;
mod observability;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use board::{Orchestrator, RunReport};
use clap::Parser;
use github::GithubClient;
use tracing::{error, info, warn};
use zenhub::ZenhubClient;

use crate::config::CliArgs;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let telemetry = match observability::init(args.log_format, args.verbose) {
        Ok(telemetry) => telemetry,
        Err(err) => {
            fail(&format!("{err:#}"));
            return ExitCode::FAILURE;
        }
    };

    let code = match run(args).await {
        Ok(report) => finish(&report),
        Err(err) => {
            error!(error = %format!("{err:#}"), "Run failed");
            fail(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}

async fn run(args: CliArgs) -> anyhow::Result<RunReport> {
    let settings = args.into_settings()?;

    let zenhub = ZenhubClient::new(settings.zh_api_url.as_str())
        .context("building ZenHub client")?;
    let github = GithubClient::new(settings.github_graphql_url.as_str())
        .context("building GitHub client")?;

    let orchestrator = Orchestrator::new(Arc::new(zenhub), Arc::new(github));
    Ok(orchestrator.run(&settings.params).await?)
}

fn finish(report: &RunReport) -> ExitCode {
    if let Some(path) = std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from) {
        if let Err(err) = actions::append_outputs(&path, &actions::outputs(report)) {
            warn!(path = %path.display(), error = %err, "Failed to write step outputs");
        }
    }

    info!(
        run_id = %report.run_id,
        moved = report.successes().count(),
        failed = report.failures().count(),
        elapsed_ms = report.finished_at.millis_since(report.started_at),
        "Run finished"
    );

    match actions::failure_summary(report) {
        Some(summary) => {
            fail(&summary);
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

/// Surfaces a failure as an Actions annotation, or on stderr outside Actions.
fn fail(message: &str) {
    if actions::in_actions(std::env::var("GITHUB_ACTIONS").ok().as_deref()) {
        println!("{}", actions::error_command(message));
    } else {
        eprintln!("error: {message}");
    }
}
