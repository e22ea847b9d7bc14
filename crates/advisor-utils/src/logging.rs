//! Tracing setup shared by the binaries

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is unset: info for the advisor crates,
/// warn for everything else so dependency noise stays out of session logs
const DEFAULT_FILTER: &str = "warn,advisor_agent=info,advisor_market=info,advisor_tools=info,\
                              advisor_llm=info,advisor_cli=info";

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the default filter. Call once at process start.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
