//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "HDLWS_LOG";

/// Default directive for the given verbosity flags.
///
/// `quiet` wins when both flags are set.
pub fn default_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "hdlws=error"
    } else if verbose {
        "hdlws=debug"
    } else {
        "hdlws=info"
    }
}

/// Installs a stderr subscriber.
///
/// `HDLWS_LOG` overrides the flag-derived level. Returns `false` if a
/// subscriber was already installed.
pub fn init(quiet: bool, verbose: bool) -> bool {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .try_init()
        .is_ok()
}
