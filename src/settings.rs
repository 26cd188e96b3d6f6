use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NodeSyncError, Result};
use crate::io::SerialLineConfig;
use crate::logging::DebugLevel;

/// Environment variable naming the serial port to open.
pub const PORT_ENV: &str = "NODESYNC_PORT";
/// Environment variable holding the debug level (0-3).
pub const DEBUG_ENV: &str = "NODESYNC_DEBUG";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Serial port, e.g. "/dev/ttyUSB0" or "COM3". None = auto-detect.
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub line: SerialLineConfig,
    #[serde(default)]
    pub debug_level: DebugLevel,
    /// Directory for timestamped log files. None = stderr only.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// `<config dir>/nodesync/settings.json`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| NodeSyncError::Settings("Failed to get config dir".to_string()))?;
        Ok(config_dir.join("nodesync").join("settings.json"))
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Settings> {
        if !path.exists() {
            tracing::debug!("[settings] {} not found, using defaults", path.display());
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeSyncError::Settings(format!("Failed to read settings: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| NodeSyncError::Settings(format!("Failed to parse settings: {}", e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NodeSyncError::Settings(format!("Failed to create settings dir: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| NodeSyncError::Settings(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| NodeSyncError::Settings(format!("Failed to write settings: {}", e)))
    }

    /// Apply `NODESYNC_PORT` and `NODESYNC_DEBUG` from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var(PORT_ENV).ok(),
            std::env::var(DEBUG_ENV).ok(),
        )
    }

    /// Empty values are ignored. A debug value that is not an integer is an error.
    pub fn apply_overrides(&mut self, port: Option<String>, debug: Option<String>) -> Result<()> {
        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            self.port = Some(port.trim().to_string());
        }
        if let Some(debug) = debug.filter(|d| !d.trim().is_empty()) {
            let level: u8 = debug.trim().parse().map_err(|_| {
                NodeSyncError::Settings(format!("Invalid {} value: {:?}", DEBUG_ENV, debug))
            })?;
            self.debug_level = DebugLevel::from(level);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Parity;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("nodesync-settings-{}-{}", std::process::id(), name))
            .join("settings.json")
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.port, None);
        assert_eq!(settings.debug_level, DebugLevel::Off);
        assert_eq!(settings.line.baud_rate, 115_200);
        assert!(settings.log_dir.is_none());
    }

    #[test]
    fn test_empty_object_parses_to_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = scratch_path("missing");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("roundtrip");
        let settings = Settings {
            port: Some("/dev/ttyACM0".to_string()),
            line: SerialLineConfig {
                parity: Parity::Even,
                ..SerialLineConfig::default()
            },
            debug_level: DebugLevel::Advanced,
            log_dir: Some(PathBuf::from("/tmp/nodesync-logs")),
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_file_is_settings_error() {
        let path = scratch_path("invalid");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(NodeSyncError::Settings(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_overrides() {
        let mut settings = Settings::default();
        settings
            .apply_overrides(Some(" COM5 ".to_string()), Some("2".to_string()))
            .unwrap();
        assert_eq!(settings.port.as_deref(), Some("COM5"));
        assert_eq!(settings.debug_level, DebugLevel::Advanced);
    }

    #[test]
    fn test_empty_overrides_ignored() {
        let mut settings = Settings {
            port: Some("COM1".to_string()),
            ..Settings::default()
        };
        settings
            .apply_overrides(Some(String::new()), Some("  ".to_string()))
            .unwrap();
        assert_eq!(settings.port.as_deref(), Some("COM1"));
        assert_eq!(settings.debug_level, DebugLevel::Off);
    }

    #[test]
    fn test_bad_debug_override_rejected() {
        let mut settings = Settings::default();
        let err = settings
            .apply_overrides(None, Some("loud".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(DEBUG_ENV));
    }
}
