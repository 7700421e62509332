use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber, once per process.
///
/// Uses `RUST_LOG` when set, otherwise `default_level`. Output goes to
/// stderr so JSON on stdout stays machine-readable.
pub fn init_tracing(default_level: &str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
