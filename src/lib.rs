pub mod features;
pub mod shared;

// Re-export commonly used items from features
pub use features::smartctl::{
    AttributeMap,
    AttributeParser,
    CycleReport,
    Device,
    DeviceScanner,
    DiscoveryEntry,
    DiscoveryItem,
    MetricItem,
    MetricValue,
    QueueItem,
    SmartAttribute,
    SmartctlCollector,
    parse_attribute_report,
    parse_scan_output,
};

// Re-export shared functionality
pub use shared::traits::{
    AsyncDataCollector,
    CommandExecutor,
    DataCollector,
    DataStorage,
    MetadataProvider,
    Validatable,
};
pub use shared::error::{
    AgentError,
    CollectionError,
    ConfigError,
    QueueError,
    StorageError,
};
pub use shared::command::SmartctlRunner;
pub use shared::config::{Framing, ParsePolicy, SmartctlConfig, StderrPolicy};
pub use shared::storage::JsonLinesStorage;
