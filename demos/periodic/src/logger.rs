//! Minimal stderr logger for the demo binary.
//!
//! The level comes from the `DES_LOG` environment variable (`error`, `warn`,
//! `info`, `debug`, `trace` or `off`); unset or unparsable means `info`.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut err = std::io::stderr().lock();
        // A closed stderr is not worth failing the run for.
        let _ = writeln!(err, "[{:<5}] {}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parse `DES_LOG` into a level filter.
pub fn level_from_env() -> LevelFilter {
    std::env::var("DES_LOG")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the logger.  Fails if another logger is already set.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
