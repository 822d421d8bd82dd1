//! Logging setup for the binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "learngraph=info,tower_http=info";
const VERBOSE_FILTER: &str = "learngraph=debug,tower_http=debug,info";

/// Install the global subscriber. `RUST_LOG` takes precedence over `verbose`.
///
/// Calling this twice is harmless; the second subscriber is ignored.
pub fn init_logging(verbose: bool, json: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).json())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Logging already initialised: {}", e);
    }
}
