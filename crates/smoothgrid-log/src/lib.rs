//! Structured logging for SmoothGrid tooling.
//!
//! Installs a `tracing` subscriber with human-readable console output and, if
//! a log directory is configured, a JSON log file for machine parsing. The
//! filter comes from `RUST_LOG` when set, otherwise from the config.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use smoothgrid_config::Config;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Default filter when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file created inside the configured directory.
pub const LOG_FILE_NAME: &str = "smoothgrid.log";

/// Initialize the global tracing subscriber.
///
/// Does nothing if a global subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use smoothgrid_config::Config;
/// use smoothgrid_log::init_logging;
///
/// init_logging(None);
///
/// let config = Config::default();
/// init_logging(Some(&config));
/// ```
pub fn init_logging(config: Option<&Config>) {
    let filter_str = config
        .map(|c| c.log.level.as_str())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER);

    // RUST_LOG overrides the configured level
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    let log_file = config
        .and_then(|c| c.log.file_dir.as_deref())
        .and_then(open_log_file);

    let _ = tracing::subscriber::set_global_default(build_subscriber(env_filter, log_file));
}

/// Builds the subscriber without installing it.
///
/// With `log_file`, events are also written to it as one JSON object per line.
pub fn build_subscriber(
    filter: EnvFilter,
    log_file: Option<File>,
) -> Box<dyn Subscriber + Send + Sync> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer);

    match log_file {
        Some(file) => {
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false) // No ANSI color codes in file output
                .with_target(true)
                .with_timer(fmt::time::uptime())
                .json();
            Box::new(subscriber.with(file_layer))
        }
        None => Box::new(subscriber),
    }
}

/// Creates `dir` if needed and opens a fresh log file inside it.
pub fn open_log_file(dir: &Path) -> Option<File> {
    std::fs::create_dir_all(dir).ok()?;
    File::create(dir.join(LOG_FILE_NAME)).ok()
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        assert!(format!("{filter}").contains("info"));
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,smoothgrid=trace",
            "warn,smoothgrid::blob=debug",
            "error",
        ];

        for filter_str in &valid_filters {
            let result = EnvFilter::try_new(filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {filter_str}");
        }
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");
        assert!(open_log_file(&log_dir).is_some());
        assert!(log_dir.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_json_file_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = open_log_file(temp_dir.path()).unwrap();
        let subscriber = build_subscriber(EnvFilter::new("debug"), Some(file));

        tracing::subscriber::with_default(subscriber, || {
            let bytes = smoothgrid::Blob::default().encode();
            smoothgrid::decode(&bytes).unwrap();
        });

        let contents = std::fs::read_to_string(temp_dir.path().join(LOG_FILE_NAME)).unwrap();
        let events: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert!(events.iter().any(|e| {
            e["fields"]["message"] == "decoded SmoothGrid blob" && e["fields"]["chunks"] == 0
        }));
        assert!(events.iter().all(|e| e["level"] == "DEBUG"));
    }

    #[test]
    fn test_filter_drops_lower_levels() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = open_log_file(temp_dir.path()).unwrap();
        let subscriber = build_subscriber(EnvFilter::new("warn"), Some(file));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("not recorded");
            tracing::warn!("recorded");
        });

        let contents = std::fs::read_to_string(temp_dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("recorded"));
    }
}
