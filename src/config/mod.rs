// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_DOWNLOADS_DIR, DEFAULT_LOG_LEVEL, DEFAULT_OS_VERSION};
use crate::permissions::PermissionStatus;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub permissions: PermissionAnswers,
    #[serde(default)]
    pub marker: MarkerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DOWNLOADS_DIR)
}

/// Where saved photos go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Public downloads directory (default: "Downloads")
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            downloads_dir: default_downloads_dir(),
        }
    }
}

fn default_os_version() -> String {
    DEFAULT_OS_VERSION.to_string()
}

/// What the static device info reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// OS version string, e.g. "12" or "14" (default: "14")
    #[serde(default = "default_os_version")]
    pub os_version: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            os_version: default_os_version(),
        }
    }
}

fn default_granted() -> PermissionStatus {
    PermissionStatus::Granted
}

/// Answers given by the static permission broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionAnswers {
    /// Camera permission answer (default: granted)
    #[serde(default = "default_granted")]
    pub camera: PermissionStatus,

    /// Legacy storage write permission answer (default: granted)
    #[serde(default = "default_granted")]
    pub write_external_storage: PermissionStatus,
}

impl Default for PermissionAnswers {
    fn default() -> Self {
        Self {
            camera: default_granted(),
            write_external_storage: default_granted(),
        }
    }
}

/// Marking engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Directory for file output; system temp dir when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl MarkerConfig {
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level when RUST_LOG is unset (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format (default: pretty)
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        // An empty document means "all defaults"
        if substituted.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        let config = Self::from_yaml_with_env(&yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.storage.downloads_dir.as_os_str().is_empty() {
            return Err("storage.downloads_dir cannot be empty".to_string());
        }

        if self.device.os_version.trim().is_empty() {
            return Err("device.os_version cannot be empty".to_string());
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Supported levels: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }
}
