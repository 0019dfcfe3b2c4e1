//! DICT workspace facade
//!
//! Re-exports the client crate and provides the logging setup shared by the
//! demo programs.

pub use dict_client::*;

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` (trace, debug, info, warn,
/// error) applies.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
