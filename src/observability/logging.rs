//! Structured logging.
//!
//! `tracing` with an `EnvFilter` (`RUST_LOG` overrides the default).
//! Production emits JSON lines for log aggregation; every other
//! environment gets the human-readable formatter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

const DEFAULT_FILTER: &str = "microsuite=info,tower_http=info";

/// Install the global subscriber. Calling it a second time is a no-op.
pub fn init(service: &'static str, environment: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if environment.is_production() {
        registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(false))
            .try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    if installed.is_ok() {
        tracing::info!(
            service,
            version = env!("CARGO_PKG_VERSION"),
            environment = %environment,
            "Logging initialized"
        );
    }
}
