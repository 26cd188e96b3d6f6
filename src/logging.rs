use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use crate::error::{NodeSyncError, Result};

/// Symlink kept pointing at the newest log file.
const LATEST_LOG_NAME: &str = "NodeSync.log";

/// Debug verbosity.
///
/// - 0: no debug output (warnings and errors only)
/// - 1: basic debug information
/// - 2: advanced debug information
/// - 3: verbose, including internal state changes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum DebugLevel {
    #[default]
    Off,
    Basic,
    Advanced,
    Verbose,
}

impl DebugLevel {
    /// Values above 3 clamp to `Verbose`.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => DebugLevel::Off,
            1 => DebugLevel::Basic,
            2 => DebugLevel::Advanced,
            _ => DebugLevel::Verbose,
        }
    }

    pub fn as_level(self) -> u8 {
        match self {
            DebugLevel::Off => 0,
            DebugLevel::Basic => 1,
            DebugLevel::Advanced => 2,
            DebugLevel::Verbose => 3,
        }
    }

    pub fn is_enabled(self) -> bool {
        self != DebugLevel::Off
    }

    /// Maximum level the subscriber lets through at this verbosity.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            DebugLevel::Off => LevelFilter::WARN,
            DebugLevel::Basic => LevelFilter::INFO,
            DebugLevel::Advanced => LevelFilter::DEBUG,
            DebugLevel::Verbose => LevelFilter::TRACE,
        }
    }
}

impl From<u8> for DebugLevel {
    fn from(level: u8) -> Self {
        DebugLevel::from_level(level)
    }
}

impl From<DebugLevel> for u8 {
    fn from(level: DebugLevel) -> Self {
        level.as_level()
    }
}

impl From<bool> for DebugLevel {
    fn from(enabled: bool) -> Self {
        if enabled {
            DebugLevel::Basic
        } else {
            DebugLevel::Off
        }
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_level())
    }
}

/// Prepends `HH:MM:SS.mmm` local time to every line.
struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Timestamped log file name, e.g. `20260119-142501-NodeSync.log`.
pub fn log_file_name<Tz>(now: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: fmt::Display,
{
    now.format("%Y%m%d-%H%M%S-NodeSync.log").to_string()
}

/// Creates a timestamped log file in `log_dir` and updates the
/// `NodeSync.log` symlink (Unix only).
fn open_log_file(log_dir: &Path) -> Result<(std::fs::File, PathBuf)> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| NodeSyncError::Logging(format!("Failed to create log dir: {}", e)))?;

    let filename = log_file_name(&chrono::Local::now());
    let log_path = log_dir.join(&filename);

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| NodeSyncError::Logging(format!("Failed to create log file: {}", e)))?;

    // Windows symlinks require elevated privileges
    #[cfg(unix)]
    {
        let symlink_path = log_dir.join(LATEST_LOG_NAME);
        let _ = std::fs::remove_file(&symlink_path);
        if let Err(e) = std::os::unix::fs::symlink(&filename, &symlink_path) {
            eprintln!("[logging] Failed to create {} symlink: {}", LATEST_LOG_NAME, e);
        }
    }

    Ok((file, log_path))
}

/// Install the global subscriber.
///
/// Output goes to stderr, and additionally to a timestamped file when
/// `log_dir` is given. Returns the log file path, if any. A second call
/// leaves the first subscriber in place.
pub fn init_logging(level: DebugLevel, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let (writer, log_path) = match log_dir {
        Some(dir) => {
            let (file, path) = open_log_file(dir)?;
            let writer = BoxMakeWriter::new(std::io::stderr.and(Arc::new(file)));
            (writer, Some(path))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let installed = tracing_subscriber::fmt()
        .with_max_level(level.level_filter())
        .with_timer(LocalClock)
        .with_target(false)
        .with_ansi(log_path.is_none())
        .with_writer(writer)
        .try_init();

    match installed {
        Ok(()) => {
            if let Some(ref path) = log_path {
                tracing::info!("[logging] File logging started: {}", path.display());
            }
        }
        Err(e) => tracing::debug!("[logging] Subscriber already installed: {}", e),
    }

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_debug_level_from_integer() {
        assert_eq!(DebugLevel::from(0), DebugLevel::Off);
        assert_eq!(DebugLevel::from(1), DebugLevel::Basic);
        assert_eq!(DebugLevel::from(2), DebugLevel::Advanced);
        assert_eq!(DebugLevel::from(3), DebugLevel::Verbose);
        assert_eq!(DebugLevel::from(42), DebugLevel::Verbose); // clamped
    }

    #[test]
    fn test_debug_level_from_bool() {
        assert_eq!(DebugLevel::from(false), DebugLevel::Off);
        assert_eq!(DebugLevel::from(true), DebugLevel::Basic);
    }

    #[test]
    fn test_level_filters() {
        assert_eq!(DebugLevel::Off.level_filter(), LevelFilter::WARN);
        assert_eq!(DebugLevel::Basic.level_filter(), LevelFilter::INFO);
        assert_eq!(DebugLevel::Advanced.level_filter(), LevelFilter::DEBUG);
        assert_eq!(DebugLevel::Verbose.level_filter(), LevelFilter::TRACE);
    }

    #[test]
    fn test_debug_level_ordering() {
        assert!(DebugLevel::Verbose > DebugLevel::Basic);
        assert!(!DebugLevel::Off.is_enabled());
        assert!(DebugLevel::Advanced.is_enabled());
    }

    #[test]
    fn test_debug_level_serde_as_integer() {
        let json = serde_json::to_string(&DebugLevel::Advanced).unwrap();
        assert_eq!(json, "2");
        let level: DebugLevel = serde_json::from_str("7").unwrap();
        assert_eq!(level, DebugLevel::Verbose);
    }

    #[test]
    fn test_log_file_name() {
        let now = chrono::Utc.with_ymd_and_hms(2026, 1, 19, 14, 25, 1).unwrap();
        assert_eq!(log_file_name(&now), "20260119-142501-NodeSync.log");
    }

    #[test]
    fn test_open_log_file_creates_file() {
        let dir = std::env::temp_dir().join(format!("nodesync-log-{}", std::process::id()));
        let (_file, path) = open_log_file(&dir).unwrap();
        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with("-NodeSync.log"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
