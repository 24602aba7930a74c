pub mod collector;
pub mod models;
pub mod parser;
pub mod scanner;

#[cfg(test)]
pub(crate) mod testing;

pub use collector::SmartctlCollector;
pub use models::{
    AttributeMap, CycleReport, Device, DiscoveryEntry, DiscoveryItem, MetricItem, MetricValue,
    QueueItem, SmartAttribute,
};
pub use parser::{parse_attribute_report, AttributeParser};
pub use scanner::{parse_scan_output, DeviceScanner};
