//! Log setup for the `quill` binary.
//!
//! `quill review --format json > review.json` and `quill prompt | pbcopy`
//! treat stdout as the product, so every log line, per-dimension warnings
//! included, is written to stderr. A slow or failing backend therefore shows
//! up on the terminal without corrupting the JSON a caller is capturing.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide subscriber.
///
/// `RUST_LOG` wins over `level` when set. With `json`, each line is a JSON
/// object carrying the review id and dimension fields, for log shippers.
/// A subscriber that is already installed (a test harness, a second call)
/// is left alone.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}

