// Configuration management

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the poller serving `/service`
    pub server_url: String,
    pub refresh_interval_secs: u64,
    pub message_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Log file; defaults to `svcpoll.log` in the temp directory
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            refresh_interval_secs: 60,
            message_timeout_secs: 15,
            request_timeout_secs: 10,
            log_file: None,
        }
    }
}

impl Config {
    /// Get default config path: ~/.config/svcpoll/config.yaml
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("svcpoll").join("config.yaml"))
    }

    /// Load config from path, falling back to defaults if not found
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Self::default_path().unwrap_or_default());

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_yaml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to path
    pub fn save(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Reject settings that would spin the ticker or never expire anything
    pub fn validate(&self) -> Result<()> {
        use crate::error::SvcpollError;

        if self.refresh_interval_secs == 0 {
            return Err(SvcpollError::Config("refresh_interval_secs must be at least 1".to_string()).into());
        }
        if self.message_timeout_secs == 0 {
            return Err(SvcpollError::Config("message_timeout_secs must be at least 1".to_string()).into());
        }
        if self.request_timeout_secs == 0 {
            return Err(SvcpollError::Config("request_timeout_secs must be at least 1".to_string()).into());
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("svcpoll.log"))
    }
}
