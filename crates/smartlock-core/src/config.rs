use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get the local data directory for smartlock.
///
/// # Errors
///
/// Returns an error if the local data directory cannot be determined.
pub fn get_data_dir() -> Result<PathBuf> {
    let mut path =
        dirs::data_local_dir().ok_or_else(|| anyhow::anyhow!("Failed to get local data dir"))?;
    path.push("smartlock");
    Ok(path)
}

/// Upper bound for `enforcement.lookback_secs` (one day)
pub const MAX_LOOKBACK_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnforcementConfig {
    /// Tick period of the enforcement loop
    pub tick_interval_ms: u64,
    /// Trailing window in which an app counts as "recently active"
    pub lookback_secs: u64,
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            lookback_secs: 60,
        }
    }
}

impl EnforcementConfig {
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn lookback(&self) -> Duration {
        Duration::from_secs(self.lookback_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Raise a low-priority "Focus Mode Active" notice when a session starts
    pub session_notice: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            session_notice: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub enforcement: EnforcementConfig,
    pub notifications: NotificationConfig,
}

impl Config {
    /// Default config file location
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_data_dir()?.join("config.toml"))
    }

    /// Load from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds an invalid value
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self =
            toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location
    ///
    /// # Errors
    ///
    /// See [`Config::load`]
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path()?)
    }

    /// # Errors
    ///
    /// Returns an error naming the first invalid key
    pub fn validate(&self) -> Result<()> {
        if self.enforcement.tick_interval_ms == 0 {
            anyhow::bail!("enforcement.tick_interval_ms must be greater than 0");
        }
        if self.enforcement.lookback_secs == 0 {
            anyhow::bail!("enforcement.lookback_secs must be greater than 0");
        }
        if self.enforcement.lookback_secs > MAX_LOOKBACK_SECS {
            anyhow::bail!("enforcement.lookback_secs must be at most {MAX_LOOKBACK_SECS}");
        }
        Ok(())
    }

    /// Render as TOML, for display
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.enforcement.tick_interval(), Duration::from_millis(1000));
        assert_eq!(config.enforcement.lookback(), Duration::from_secs(60));
        assert!(config.notifications.session_notice);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[enforcement]\nlookback_secs = 5\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.enforcement.lookback_secs, 5);
        assert_eq!(config.enforcement.tick_interval_ms, 1000);
        assert!(config.notifications.session_notice);
    }

    #[test]
    fn test_full_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[enforcement]\ntick_interval_ms = 500\nlookback_secs = 30\n\n[notifications]\nsession_notice = false\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.enforcement.tick_interval(), Duration::from_millis(500));
        assert_eq!(config.enforcement.lookback(), Duration::from_secs(30));
        assert!(!config.notifications.session_notice);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[enforcement]\ntick_interval_ms = 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("tick_interval_ms"));
    }

    #[test]
    fn test_zero_lookback_rejected() {
        let mut config = Config::default();
        config.enforcement.lookback_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_lookback_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[enforcement]\nlookback_secs = 10000000000000\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("lookback_secs"));

        let mut config = Config::default();
        config.enforcement.lookback_secs = MAX_LOOKBACK_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[enforcement\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let rendered = Config::default().to_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
