use tracing_subscriber::EnvFilter;

/// Default log directive when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "tariff_compare=info";

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over the default directive. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
