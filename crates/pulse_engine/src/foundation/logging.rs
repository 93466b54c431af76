//! Logging setup for the engine and its host applications

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from the `RUST_LOG` environment variable.
///
/// Falls back to the `info` level when the variable is unset so engine
/// lifecycle messages are visible out of the box.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
