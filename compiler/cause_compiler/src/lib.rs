//! Portable Cause driver.
//!
//! Runs one parsed file through the whole pipeline without touching the
//! filesystem: AST building, type resolution, then evaluation of an entry
//! function. Suitable for embedding and for end-to-end tests.
//!
//! ```text
//! cause_ir (lower) -> cause_types (resolve) -> cause_eval (Interpreter)
//!                            \
//!                      cause_compiler  <- this crate
//! ```

mod output;
mod pipeline;

pub use output::{ErrorPhase, RunOutput};
pub use pipeline::{run_file, RunConfig};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=cause_eval=trace` or
/// similar; nothing is installed when `RUST_LOG` is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests;
