use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::sync::OnceLock;

struct StderrLogger {
    level: LevelFilter,
    echo_stderr: bool,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.echo_stderr || !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(std::io::stderr(), "[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the CLI logger. Level comes from `RUST_LOG` (default `info`).
pub fn init(quiet: bool) {
    let level = level_from_env(std::env::var("RUST_LOG").ok().as_deref());

    let echo_stderr = !quiet
        && std::env::var("SIMPLE_EQ_LOG_STDERR")
            .map(|value| value != "0")
            .unwrap_or(true);

    let logger_ref = LOGGER.get_or_init(|| StderrLogger { level, echo_stderr });
    if log::set_logger(logger_ref).is_ok() {
        log::set_max_level(level);
    }
}

fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.map(str::to_lowercase).as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(level_from_env(Some("DEBUG")), LevelFilter::Debug);
        assert_eq!(level_from_env(Some("off")), LevelFilter::Off);
        assert_eq!(level_from_env(Some("verbose")), LevelFilter::Info);
        assert_eq!(level_from_env(None), LevelFilter::Info);
    }
}
