//! `[logging]` section: the level of msgscope's own events and the
//! optional JSON log file next to the TUI buffer or stderr

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};

/// Levels accepted by `level` and `MSGSCOPE_LOG`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file for every run
    Never,
}

impl LogRotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    fn rotation(self) -> Rotation {
        match self {
            Self::Hourly => Rotation::HOURLY,
            Self::Daily => Rotation::DAILY,
            Self::Never => Rotation::NEVER,
        }
    }
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "unknown log rotation '{}' (expected hourly, daily or never)",
                other
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for `msgscope` events; RUST_LOG replaces the whole filter
    pub level: String,
    /// Also write JSON lines to `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name stem: "msgscope" gives "msgscope.2024-01-15.log"
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: default_log_dir(),
            file_rotation: LogRotation::Daily,
            file_prefix: "msgscope".to_string(),
        }
    }
}

/// `~/.local/share/msgscope/logs` or the platform equivalent
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("msgscope").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Merge the file section and an env level over the defaults
    ///
    /// Unknown levels and rotations keep their defaults; the subscriber is
    /// not installed yet, so nothing can be logged about them here.
    pub fn from_file(file: Option<FileLogging>, env_level: Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let level = env_level
            .or(file.level)
            .map(|l| l.trim().to_lowercase())
            .filter(|l| LOG_LEVELS.contains(&l.as_str()))
            .unwrap_or(defaults.level);

        Self {
            level,
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file
                .file_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.file_dir),
            file_rotation: file
                .file_rotation
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.file_rotation),
            file_prefix: file
                .file_prefix
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(defaults.file_prefix),
        }
    }

    /// Filter directive used when RUST_LOG is unset
    pub fn directive(&self) -> String {
        format!("msgscope={}", self.level)
    }

    /// Rolling appender for `file_dir`, creating the directory first
    pub fn appender(&self) -> Result<RollingFileAppender, InitError> {
        RollingFileAppender::builder()
            .rotation(self.file_rotation.rotation())
            .filename_prefix(&self.file_prefix)
            .filename_suffix("log")
            .build(&self.file_dir)
    }
}
