//! Logger setup for the dashboard binary.
//!
//! Log records go to a file (`./dashboard.log` unless overridden) and, with
//! `--verbose`, to the terminal as well.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const DEFAULT_LOG_FILE: &str = "./dashboard.log";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    File,
    /// Terminal (stderr) and file.
    Both,
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub destination: LogDestination,
    pub level: LevelFilter,
    pub file: PathBuf,
}

impl LogSettings {
    pub fn from_flags(verbose: bool, file: Option<&Path>) -> Self {
        Self {
            destination: if verbose {
                LogDestination::Both
            } else {
                LogDestination::File
            },
            level: if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            file: file.map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), Path::to_path_buf),
        }
    }
}

pub fn initialize(settings: &LogSettings) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if settings.destination == LogDestination::Both {
        loggers.push(TermLogger::new(
            settings.level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if let Some(file_logger) = create_file_logger(settings.level, config, &settings.file) {
        loggers.push(file_logger);
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!(
                "Warning: Could not create log file at {}: {err}",
                log_path.display()
            );
            None
        }
    }
}
