//! Tracing subscriber and OpenTelemetry wiring.
//!
//! Events go to stderr so stdout stays free for GitHub Actions workflow
//! commands. Filtering honours `RUST_LOG`; without it the level is `info`, or
//! `debug` when `--verbose` is given or the runner has debug logging enabled
//! (`RUNNER_DEBUG=1`).
//!
//! Setting `OTEL_EXPORTER_OTLP_ENDPOINT` adds an OTLP (gRPC) span exporter.

use anyhow::Context;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace::TracerProvider, Resource};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
const SERVICE_NAME: &str = "shunt";

/// Handle that flushes exported spans on shutdown.
pub struct Telemetry {
    provider: Option<TracerProvider>,
}

impl Telemetry {
    /// Flushes and stops the span exporter, if one was installed.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to flush OpenTelemetry spans: {err}");
            }
        }
    }
}

/// Returns the default filter directive for the given verbosity.
pub fn default_directive(verbose: bool, runner_debug: Option<&str>) -> &'static str {
    if verbose || runner_debug == Some("1") {
        "debug"
    } else {
        "info"
    }
}

fn otlp_provider(endpoint: &str) -> anyhow::Result<TracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("building OTLP span exporter")?;
    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
        .build())
}

/// Installs the global subscriber.
///
/// Must be called from within the Tokio runtime when OTLP export is enabled.
///
/// # Errors
///
/// Returns an error if the exporter cannot be built or a global subscriber is
/// already installed.
pub fn init(format: LogFormat, verbose: bool) -> anyhow::Result<Telemetry> {
    let runner_debug = std::env::var("RUNNER_DEBUG").ok();
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, runner_debug.as_deref())));

    let provider = match std::env::var(OTLP_ENDPOINT_VAR) {
        Ok(endpoint) if !endpoint.is_empty() => Some(otlp_provider(&endpoint)?),
        _ => None,
    };
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    let (text_layer, json_layer) = match format {
        LogFormat::Text => (
            Some(fmt::layer().with_target(true).with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer)
        .with(text_layer)
        .with(json_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(Telemetry { provider })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_selects_debug() {
        assert_eq!(default_directive(false, None), "info");
        assert_eq!(default_directive(true, None), "debug");
        assert_eq!(default_directive(false, Some("1")), "debug");
        assert_eq!(default_directive(false, Some("0")), "info");
    }
}
