//! Diagnostic logging.
//!
//! Logs go to stderr so stdout stays reserved for the report, which matters when
//! the JSON format is piped into another program.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for a `-v` count: warnings by default, then info, then debug.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "sortdir=warn",
        1 => "sortdir=info",
        _ => "sortdir=debug",
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `verbosity` when set.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(0), "sortdir=warn");
        assert_eq!(default_directive(1), "sortdir=info");
        assert_eq!(default_directive(2), "sortdir=debug");
        assert_eq!(default_directive(9), "sortdir=debug");
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(0);
        init_logging(2);
    }
}
