//! Logging system configuration and initialization
//!
//! Console output by default, with optional file output that can be written
//! as JSON. Timestamps use the local timezone. A log file left over from a
//! previous run is renamed with its timestamp before the new one is opened.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::Directive,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking file writers alive for the life of the process
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());
}

/// Local time with millisecond precision
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %z"))
    }
}

/// Log directory from the configuration, resolved against the working directory
pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    let directory = Path::new(&config.directory);
    if directory.is_absolute() {
        return directory.to_path_buf();
    }
    std::env::current_dir().unwrap_or_default().join(directory)
}

/// Rename an existing log file to `<stem>.<timestamp>.log`
fn rotate_existing_log_file(log_dir: &Path, log_file_name: &str) -> Result<Option<PathBuf>> {
    let log_file_path = log_dir.join(log_file_name);
    if !log_file_path.exists() {
        return Ok(None);
    }

    let metadata = std::fs::metadata(&log_file_path).map_err(|e| anyhow!("Failed to get log file metadata: {}", e))?;
    let file_time = metadata
        .modified()
        .or_else(|_| metadata.created())
        .unwrap_or_else(|_| std::time::SystemTime::now());
    let datetime: DateTime<Local> = file_time.into();

    let file_stem = log_file_name.trim_end_matches(".log");
    let rotated_path = log_dir.join(format!("{}.{}.log", file_stem, datetime.format("%Y%m%dT%H%M%S")));
    std::fs::rename(&log_file_path, &rotated_path).map_err(|e| {
        anyhow!(
            "Failed to rotate log file {} to {}: {}",
            log_file_path.display(),
            rotated_path.display(),
            e
        )
    })?;

    Ok(Some(rotated_path))
}

/// Filter from `RUST_LOG` when set, otherwise from the configured level with
/// the noisy HTTP and HTML crates quieted unless tracing everything.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level).map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    if !config.level.to_lowercase().contains("trace") {
        for (module, level) in &config.module_filters {
            let directive = format!("{module}={level}")
                .parse::<Directive>()
                .map_err(|e| anyhow!("Invalid log filter '{}={}': {}", module, level, e))?;
            filter = filter.add_directive(directive);
        }
    }

    Ok(filter)
}

fn keep_guard(guard: WorkerGuard) {
    if let Ok(mut guards) = LOG_GUARDS.lock() {
        guards.push(guard);
    }
}

/// Initialize the global subscriber. Fails if one is already installed.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;
    let registry = Registry::default().with(env_filter);

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    });

    let log_dir = get_log_directory(config);
    let mut rotated = None;
    let (plain_file_layer, json_file_layer) = if config.file_output {
        std::fs::create_dir_all(&log_dir).map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;
        rotated = rotate_existing_log_file(&log_dir, &config.file_name)?;

        let (file_writer, file_guard) = non_blocking(rolling::never(&log_dir, &config.file_name));
        keep_guard(file_guard);

        if config.json_format {
            let layer = fmt::Layer::new()
                .json()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false);
            (None, Some(layer))
        } else {
            let layer = fmt::Layer::new()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(false)
                .with_ansi(false);
            (Some(layer), None)
        }
    } else {
        (None, None)
    };

    if console_layer.is_none() && plain_file_layer.is_none() && json_file_layer.is_none() {
        return Err(anyhow!("No logging output configured"));
    }

    registry
        .with(console_layer)
        .with(plain_file_layer)
        .with(json_file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    info!("Logging initialized at level {}", config.level);
    if config.file_output {
        info!("Log file: {:?}", log_dir.join(&config.file_name));
    }
    if let Some(path) = rotated {
        info!("Rotated previous log file to {:?}", path);
    }

    Ok(())
}

/// Log build and host information for diagnostics
pub fn log_system_info() {
    info!("spoiler-sync {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(!config.file_output);
    }

    #[test]
    fn relative_log_directory_is_resolved() {
        let config = LoggingConfig::default();
        let log_dir = get_log_directory(&config);
        assert!(log_dir.is_absolute());
        assert!(log_dir.ends_with("logs"));
    }

    #[test]
    fn existing_log_file_is_rotated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sync.log"), "previous run").unwrap();

        let rotated = rotate_existing_log_file(dir.path(), "sync.log").unwrap().unwrap();

        assert!(!dir.path().join("sync.log").exists());
        assert!(rotated.exists());
        let name = rotated.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("sync.") && name.ends_with(".log"));
    }

    #[test]
    fn missing_log_file_is_not_rotated() {
        let dir = tempfile::tempdir().unwrap();
        assert!(rotate_existing_log_file(dir.path(), "sync.log").unwrap().is_none());
    }

    #[test]
    fn invalid_level_is_rejected() {
        let config = LoggingConfig {
            level: "spoiler_sync=loud".to_string(),
            ..LoggingConfig::default()
        };
        // RUST_LOG takes precedence when set in the test environment
        if std::env::var("RUST_LOG").is_err() {
            assert!(build_env_filter(&config).is_err());
        }
    }
}
