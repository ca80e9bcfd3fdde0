use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize structured logging on stderr; stdout is left to command output.
/// RUST_LOG wins over the configured level when it is set.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!("Workflow engine telemetry initialized");
    Ok(())
}

/// Create a span with common workflow transition attributes
pub fn transition_span(workflow: &str, transition: &str) -> tracing::Span {
    tracing::info_span!(
        "workflow_transition",
        workflow.name = workflow,
        transition.name = transition,
        otel.kind = "internal"
    )
}
