//! Logging: tracing events rendered to stderr by tracing-subscriber.
//!
//! `RUST_LOG` overrides the default directives entirely.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

// HTTP internals only log at warn and above.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

fn build_env_filter(verbose: bool) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = if verbose { "debug" } else { "info" };
    let mut directives = vec![level.to_string()];
    for target in QUIET_TARGETS {
        directives.push(format!("{target}=warn"));
    }
    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{filter_str}': {e}"))
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbose)?)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}
