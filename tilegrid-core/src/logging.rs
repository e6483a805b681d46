//! Tracing setup shared by binaries embedding the grid

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_DIRECTIVES: &[&str] = &["tilegrid_core=debug", "tilegrid_monitor=info"];

/// Build the log filter. A valid `RUST_LOG` value replaces the defaults.
fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES.join(",")))
}

/// Install the fmt subscriber once per process. Later calls are ignored.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

        // try_init: a host application may already own the global subscriber
        let _ = tracing_subscriber::fmt()
            .with_target(false)
            .with_env_filter(env_filter(rust_log.as_deref()))
            .with_writer(std::io::stderr)
            .try_init();
    });
}
