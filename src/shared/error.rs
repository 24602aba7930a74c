use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("can not exec \"{command}\" ({reason})")]
    Execution { command: String, reason: String },

    #[error("\"{command}\" did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("Failed to parse attributes of {device}: {reason} (line: {line:?})")]
    Parse {
        device: String,
        line: String,
        reason: String,
    },
}

impl CollectionError {
    /// Execution-class failures: the tool could not produce usable output.
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. } | Self::Timeout { .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to serialize item: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Write operation failed: {0}")]
    Write(String),
}

/// Outbound queue rejections. These never abort a poll cycle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue is full")]
    Full,

    #[error("queue is closed")]
    Closed,
}
