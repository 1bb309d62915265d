//! Tracing configuration.
//!
//! The subscriber is only initialised when `DTX_LOG` (or `RUST_LOG`) is set,
//! so there is zero overhead in normal builds. Values use `RUST_LOG` syntax
//! (e.g. `debug`, `dtx_checker=trace`). All output goes to stderr so it
//! never interferes with stdout.

use tracing_subscriber::EnvFilter;

/// Build an `EnvFilter` from `DTX_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("DTX_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `DTX_LOG` nor `RUST_LOG` is set.
pub fn init_tracing() {
    let has_dtx_log = std::env::var("DTX_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_dtx_log && !has_rust_log {
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
