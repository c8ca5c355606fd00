//! Diagnostic logging setup.
//!
//! Everything goes to stderr so command output on stdout stays clean for
//! piping. `RUST_LOG` wins over the verbosity flag when it is set.

use tracing_subscriber::EnvFilter;

const QUIET_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,eve_client=debug";

pub fn filter_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        QUIET_FILTER
    }
}

pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose)));

    // A second init (e.g. from tests) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flag_enables_crate_debug_logs() {
        assert_eq!(filter_directive(false), "warn");
        assert!(filter_directive(true).contains("eve_client=debug"));
        assert!(EnvFilter::try_new(filter_directive(true)).is_ok());
    }
}
