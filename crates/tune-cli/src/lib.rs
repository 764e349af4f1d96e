//! Tune interpreter: orchestrates the full pipeline.
//!
//! ```text
//! Tune Source → Lexer → Parser → Expr → Evaluator → Value
//!                                          ↓
//!                                 ConsoleHost (stdin/stdout, MIDI, player)
//! ```
//!
//! [`Session`] runs one top-level expression at a time; the interactive
//! driver in [`repl`] and the batch runner in the `tune` binary both feed it.

pub mod config;
pub mod console;
pub mod error;
pub mod repl;
pub mod session;

pub use config::Config;
pub use console::{ConsoleHost, LineSource};
pub use error::{CliError, CliResult};
pub use session::{Outcome, Session};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the `tracing` subscriber.
///
/// Only does anything when `RUST_LOG` is set, e.g. `RUST_LOG=tune_eval=debug`.
/// Logs go to stderr. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
