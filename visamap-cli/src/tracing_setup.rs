//! Tracing setup for the visamap CLI
//!
//! Usage:
//!   visamap --debug ...              # Debug logging to console
//!   visamap --otel ...               # Also export spans over OTLP (telemetry feature)
//!   RUST_LOG=visamap_server=debug    # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                         # Log filter (default: info)
//!   OTEL_EXPORTER_OTLP_ENDPOINT      # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                # Service name (default: visamap)
//!
//! Logs go to stderr; stdout is reserved for command output.

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Default the filter to `debug` when RUST_LOG is unset
    pub debug: bool,
    /// Enable OpenTelemetry OTLP export
    pub otel: bool,
}

impl TracingConfig {
    fn env_filter(&self) -> EnvFilter {
        let default = if self.debug { "debug" } else { "info" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    }
}

/// Install the global subscriber: env filter, compact stderr output, and the
/// OTLP layer when requested and compiled in.
pub fn init(config: &TracingConfig) -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer);

    #[cfg(feature = "telemetry")]
    let registry = registry.with(if config.otel {
        Some(otel::layer()?)
    } else {
        None
    });

    registry.try_init().map_err(|err| anyhow!(err))?;

    #[cfg(feature = "telemetry")]
    if config.otel {
        tracing::info!("OpenTelemetry tracing initialized");
    }
    if config.otel && cfg!(not(feature = "telemetry")) {
        tracing::warn!("--otel ignored: built without the telemetry feature");
    }
    Ok(())
}

/// Flush pending spans. No-op without the telemetry feature.
pub fn shutdown_otel() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(feature = "telemetry")]
mod otel {
    use anyhow::{anyhow, Result};
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::{Tracer, TracerProvider};
    use tracing_opentelemetry::OpenTelemetryLayer;
    use tracing_subscriber::registry::LookupSpan;

    /// Build the OTLP span layer and register its provider globally.
    pub fn layer<S>() -> Result<OpenTelemetryLayer<S, Tracer>>
    where
        S: tracing::Subscriber + for<'span> LookupSpan<'span>,
    {
        let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4317".to_string());
        let service_name =
            std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "visamap".to_string());

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&endpoint)
            .build()
            .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
            .with_resource(opentelemetry_sdk::Resource::new(vec![KeyValue::new(
                "service.name",
                service_name,
            )]))
            .build();

        let tracer = provider.tracer("visamap");
        // The provider must outlive the layer or export stops
        let _ = opentelemetry::global::set_tracer_provider(provider);

        Ok(tracing_opentelemetry::layer().with_tracer(tracer))
    }
}
