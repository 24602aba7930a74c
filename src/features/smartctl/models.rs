use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const PING_KEY: &str = "blackbird.smartctl.ping";
pub const VERSION_KEY: &str = "blackbird.smartctl.version";
pub const DISCOVERY_KEY: &str = "smartctl.attribute.LLD";

/// Device identifier exactly as `smartctl --scan` reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Device(String);

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Device {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartAttribute {
    pub raw_value: i64,
    pub when_failed: String,
}

/// Attribute name to reading; empty for devices without SMART attribute support.
pub type AttributeMap = BTreeMap<String, SmartAttribute>;

pub fn raw_value_key(device: &Device, attribute: &str) -> String {
    format!("smartctl[{},{}]", device, attribute)
}

pub fn when_failed_key(device: &Device, attribute: &str) -> String {
    format!("smartctl.failed[{},{}]", device, attribute)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(value) => write!(f, "{}", value),
            MetricValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Integer(value)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricItem {
    pub key: String,
    pub value: MetricValue,
    pub host: String,
    pub clock: i64,
}

impl MetricItem {
    pub fn new(key: impl Into<String>, value: impl Into<MetricValue>, host: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            host: host.into(),
            clock: Utc::now().timestamp(),
        }
    }
}

/// One device/attribute pair, named with the backend's LLD macros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryEntry {
    #[serde(rename = "{#SMART_DEVICE}")]
    pub device: String,
    #[serde(rename = "{#SMART_ATTR_NAME}")]
    pub attribute_name: String,
}

impl DiscoveryEntry {
    pub fn new(device: impl Into<String>, attribute_name: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            attribute_name: attribute_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryItem {
    pub key: String,
    pub value: Vec<DiscoveryEntry>,
    pub host: String,
    pub clock: i64,
}

impl DiscoveryItem {
    pub fn new(key: impl Into<String>, value: Vec<DiscoveryEntry>, host: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value,
            host: host.into(),
            clock: Utc::now().timestamp(),
        }
    }
}

/// Everything the collector pushes to the outbound queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueueItem {
    Metric(MetricItem),
    Discovery(DiscoveryItem),
}

impl QueueItem {
    pub fn key(&self) -> &str {
        match self {
            QueueItem::Metric(item) => &item.key,
            QueueItem::Discovery(item) => &item.key,
        }
    }

    pub fn host(&self) -> &str {
        match self {
            QueueItem::Metric(item) => &item.host,
            QueueItem::Discovery(item) => &item.host,
        }
    }
}

impl fmt::Display for QueueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueItem::Metric(item) => write!(f, "{}:{}", item.key, item.value),
            QueueItem::Discovery(item) => write!(f, "{}:{} entries", item.key, item.value.len()),
        }
    }
}

impl From<MetricItem> for QueueItem {
    fn from(item: MetricItem) -> Self {
        QueueItem::Metric(item)
    }
}

impl From<DiscoveryItem> for QueueItem {
    fn from(item: DiscoveryItem) -> Self {
        QueueItem::Discovery(item)
    }
}

/// Outcome of one emission pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub devices: usize,
    pub unsupported: usize,
    pub enqueued: usize,
    pub dropped: usize,
}
