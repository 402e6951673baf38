//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the `-v` count picks the level
//! (none: info, one: debug, more: trace).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        default_filter(verbose)
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0).to_string().to_lowercase(), "info");
        assert_eq!(default_filter(1).to_string().to_lowercase(), "debug");
        assert_eq!(default_filter(5).to_string().to_lowercase(), "trace");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(0);
        init(2);
    }
}
