//! Logger setup for the binary.
//!
//! The library only uses the `log` macros; installing a logger is the
//! binary's job. Dependencies log at `warn`, this crate at `info` (`debug`
//! with `--debug`). A non-empty `RUST_LOG` replaces those defaults entirely.

use env_logger::{Builder, DEFAULT_FILTER_ENV, DEFAULT_WRITE_STYLE_ENV};
use log::{Level, LevelFilter};
use std::io::Write;

pub fn setup_logging(verbose: bool) {
    let env_filters = std::env::var(DEFAULT_FILTER_ENV).ok();
    let mut builder = logging_builder(verbose, env_filters.as_deref());
    if let Ok(style) = std::env::var(DEFAULT_WRITE_STYLE_ENV) {
        builder.parse_write_style(&style);
    }
    builder.init();
}

/// Builder with the filters for one run. `env_filters` is the raw `RUST_LOG`
/// value, if any.
fn logging_builder(verbose: bool, env_filters: Option<&str>) -> Builder {
    let mut builder = Builder::new();
    match env_filters.map(str::trim).filter(|f| !f.is_empty()) {
        Some(filters) => {
            builder.parse_filters(filters);
        }
        None => {
            let level = if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            builder
                .filter_level(LevelFilter::Warn)
                .filter_module(env!("CARGO_PKG_NAME"), level);
        }
    }

    builder.format(|buf, record| {
        let name = env!("CARGO_PKG_NAME");
        match record.level() {
            Level::Error | Level::Warn => writeln!(
                buf,
                "[{} {} {}] {}",
                name,
                record.level(),
                record.target(),
                record.args()
            ),
            _ => writeln!(buf, "[{}] {}", name, record.args()),
        }
    });
    builder
}
