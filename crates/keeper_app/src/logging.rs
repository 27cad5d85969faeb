//! Logging initialization for the `keeper` binary.
//!
//! Terminal output goes to stderr so progress lines on stdout stay readable.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
pub enum LogDestination {
    Terminal,
    /// Write to the terminal and to the given file.
    Both(PathBuf),
}

impl LogDestination {
    pub fn from_option(log_file: Option<&Path>) -> Self {
        match log_file {
            Some(path) => Self::Both(path.to_path_buf()),
            None => Self::Terminal,
        }
    }
}

/// Initialize the global logger. Later calls are ignored.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let LogDestination::Both(path) = destination {
        if let Some(file_logger) = create_file_logger(&path, level, config) {
            loggers.push(file_logger);
        }
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
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
