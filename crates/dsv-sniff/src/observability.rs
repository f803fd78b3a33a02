//! Logging setup.
//!
//! Human-readable events go to stderr. When a log location can be resolved,
//! JSONL events are also written to a daily-rotated file through a
//! non-blocking `tracing-appender` writer.
//!
//! Log file location, first match wins:
//! 1. `DSV_SNIFF_LOG_PATH` (explicit file)
//! 2. `DSV_SNIFF_LOG_DIR`
//! 3. `log_dir` from the config file
//! 4. The platform data-local directory (`~/.local/share/dsv-sniff/logs`)

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_PATH_ENV: &str = "DSV_SNIFF_LOG_PATH";
const LOG_DIR_ENV: &str = "DSV_SNIFF_LOG_DIR";
const DEFAULT_LOG_FILE: &str = "dsv-sniff.jsonl";

/// Where (if anywhere) to write the JSONL log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Directory holding the log file.
    pub log_dir: Option<PathBuf>,
    /// File name prefix inside `log_dir`.
    pub file_name: String,
}

impl ObservabilityConfig {
    /// Resolve the log location from the environment, falling back to the
    /// configured directory and then the platform default.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = log_path
            && let Some(name) = path.file_name()
        {
            return Self {
                log_dir: Some(path.parent().map_or_else(PathBuf::new, Path::to_path_buf)),
                file_name: name.to_string_lossy().into_owned(),
            };
        }

        let log_dir = env_dir.or(config_dir).or_else(|| {
            dsv_sniff_core::config::user_data_local_dir()
                .map(|dir| dir.join("logs").into_std_path_buf())
        });

        Self {
            log_dir,
            file_name: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

/// Build the stderr filter.
///
/// `RUST_LOG` wins when set. Otherwise `--quiet` forces `error`, `-v` selects
/// `debug` and `-vv` or more selects `trace`, whatever the configured level.
/// With neither flag the configured level applies.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level_directive(quiet, verbose, config_level))
}

fn level_directive(quiet: bool, verbose: u8, config_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => config_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Hold the returned guard until exit so buffered file output is flushed.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match config.log_dir.as_deref() {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, &config.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(guard)
}
