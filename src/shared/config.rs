use crate::shared::error::ConfigError;
use crate::shared::traits::Validatable;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/smartctl.yaml";
pub const DEFAULT_SMARTCTL_PATH: &str = "/usr/sbin/smartctl";

/// What a non-empty stderr stream means for a command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StderrPolicy {
    /// Any stderr output fails the call, whatever the exit status.
    #[default]
    Strict,
    /// Stderr is only logged; the exit status decides.
    Lenient,
}

/// What a malformed attribute row means for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    #[default]
    Strict,
    Lenient,
}

/// How the data rows of an attribute report are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// Skip the 7 header lines and the trailing blank line.
    #[default]
    Fixed,
    /// Pick out every line shaped like an attribute row.
    Detect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartctlConfig {
    pub path: String,
    pub hostname: String,
    pub sudo: Option<String>,
    pub timeout_secs: Option<u64>,
    pub stderr_policy: StderrPolicy,
    pub parse_policy: ParsePolicy,
    pub framing: Framing,
    pub interval_secs: u64,
    pub discovery_interval_secs: u64,
    pub queue_capacity: usize,
}

impl Default for SmartctlConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_SMARTCTL_PATH.to_string(),
            hostname: whoami::hostname(),
            sudo: Some("sudo".to_string()),
            timeout_secs: Some(30),
            stderr_policy: StderrPolicy::default(),
            parse_policy: ParsePolicy::default(),
            framing: Framing::default(),
            interval_secs: 60,
            discovery_interval_secs: 3600,
            queue_capacity: 100,
        }
    }
}

impl SmartctlConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: SmartctlConfig = serde_yaml::from_str(content)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Reading config from: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Like `from_file`, but a missing file yields the defaults.
    pub fn from_file_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn discovery_interval(&self) -> Duration {
        Duration::from_secs(self.discovery_interval_secs)
    }
}

impl Validatable for SmartctlConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("path cannot be empty".to_string());
        }
        if self.hostname.trim().is_empty() {
            return Err("hostname cannot be empty".to_string());
        }
        if let Some(ref sudo) = self.sudo {
            if sudo.trim().is_empty() {
                return Err("sudo cannot be empty when provided".to_string());
            }
        }
        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        if self.interval_secs == 0 || self.discovery_interval_secs == 0 {
            return Err("intervals must be greater than zero".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be greater than zero".to_string());
        }
        Ok(())
    }
}
