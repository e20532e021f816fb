//! Tracing subscriber setup shared by every Lantern binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Without it, `default_level` applies to the
/// given binary and to the `lantern_*` crates, and everything else stays at
/// `warn`.
///
/// # Arguments
///
/// * `bin_name` - Name of the running binary (usually `env!("CARGO_BIN_NAME")`)
/// * `default_level` - Level used when `RUST_LOG` is not set (e.g. "info")
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_directives(bin_name, default_level))
    });

    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let mut targets = vec![bin_name.replace('-', "_")];
    for crate_target in ["lantern_client", "lantern_shared"] {
        if !targets.iter().any(|t| t == crate_target) {
            targets.push(crate_target.to_string());
        }
    }

    let mut directives = vec!["warn".to_string()];
    directives.extend(targets.iter().map(|t| format!("{t}={default_level}")));
    directives.join(",")
}
