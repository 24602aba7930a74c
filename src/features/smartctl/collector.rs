use crate::features::smartctl::models::{
    raw_value_key, when_failed_key, CycleReport, DiscoveryEntry, DiscoveryItem, MetricItem,
    MetricValue, QueueItem, DISCOVERY_KEY, PING_KEY, VERSION_KEY,
};
use crate::features::smartctl::parser::AttributeParser;
use crate::features::smartctl::scanner::DeviceScanner;
use crate::shared::command::SmartctlRunner;
use crate::shared::config::SmartctlConfig;
use crate::shared::error::{CollectionError, QueueError};
use crate::shared::traits::{
    AsyncDataCollector, CommandExecutor, DataCollector, MetadataProvider, Validatable,
};
use log::{debug, info, warn};
use tokio::sync::mpsc::{error::TrySendError, Sender};

/// Polls smartctl and pushes metric and discovery items onto the outbound queue.
pub struct SmartctlCollector<E: CommandExecutor = SmartctlRunner> {
    config: SmartctlConfig,
    executor: E,
    queue: Sender<QueueItem>,
}

impl SmartctlCollector<SmartctlRunner> {
    pub fn new(config: SmartctlConfig, queue: Sender<QueueItem>) -> Self {
        let executor = SmartctlRunner::new(&config);
        Self::with_executor(config, executor, queue)
    }
}

impl<E: CommandExecutor> SmartctlCollector<E> {
    pub fn with_executor(config: SmartctlConfig, executor: E, queue: Sender<QueueItem>) -> Self {
        Self {
            config,
            executor,
            queue,
        }
    }

    pub fn config(&self) -> &SmartctlConfig {
        &self.config
    }

    /// Liveness and version items, then raw value and WHEN_FAILED for every attribute of every
    /// supported device.
    pub fn build_items(&self) -> Result<CycleReport, CollectionError> {
        let mut report = CycleReport::default();

        self.ping(&mut report);
        self.smart_attributes(&mut report)?;

        info!(
            "smartctl cycle: {} devices ({} unsupported), {} items enqueued, {} dropped",
            report.devices, report.unsupported, report.enqueued, report.dropped
        );
        Ok(report)
    }

    /// One discovery item per supported device listing all of its attribute names.
    pub fn build_discovery_items(&self) -> Result<CycleReport, CollectionError> {
        let mut report = CycleReport::default();
        let parser = self.parser();

        for device in self.scanner().scan()? {
            report.devices += 1;
            let attributes = parser.attributes(&device)?;
            if attributes.is_empty() {
                report.unsupported += 1;
                continue;
            }

            let entries = attributes
                .keys()
                .map(|name| DiscoveryEntry::new(device.as_str(), name.as_str()))
                .collect();
            let item = DiscoveryItem::new(DISCOVERY_KEY, entries, self.config.hostname.as_str());
            self.enqueue(item.into(), &mut report);
        }

        info!(
            "smartctl discovery: {} devices ({} unsupported), {} items enqueued, {} dropped",
            report.devices, report.unsupported, report.enqueued, report.dropped
        );
        Ok(report)
    }

    fn ping(&self, report: &mut CycleReport) {
        self.enqueue_metric(PING_KEY, 1_i64, report);
        self.enqueue_metric(VERSION_KEY, self.version(), report);
    }

    fn smart_attributes(&self, report: &mut CycleReport) -> Result<(), CollectionError> {
        let parser = self.parser();

        for device in self.scanner().scan()? {
            report.devices += 1;
            let attributes = parser.attributes(&device)?;

            if attributes.is_empty() {
                debug!("[blackbird smartctl] {} does not support smart", device);
                report.unsupported += 1;
                continue;
            }

            for (name, attribute) in attributes {
                self.enqueue_metric(raw_value_key(&device, &name), attribute.raw_value, report);
                self.enqueue_metric(when_failed_key(&device, &name), attribute.when_failed, report);
            }
        }

        if report.devices == 0 {
            info!("smartctl --scan reported no devices");
        }
        Ok(())
    }

    fn scanner(&self) -> DeviceScanner<'_, E> {
        DeviceScanner::new(&self.executor)
    }

    fn parser(&self) -> AttributeParser<'_, E> {
        AttributeParser::new(&self.executor, self.config.framing, self.config.parse_policy)
    }

    fn enqueue_metric(
        &self,
        key: impl Into<String>,
        value: impl Into<MetricValue>,
        report: &mut CycleReport,
    ) {
        let item = MetricItem::new(key, value, self.config.hostname.as_str());
        self.enqueue(item.into(), report);
    }

    fn enqueue(&self, item: QueueItem, report: &mut CycleReport) {
        let summary = item.to_string();
        match self.try_push(item) {
            Ok(()) => {
                report.enqueued += 1;
                debug!("Inserted to queue {}", summary);
            }
            Err(e) => {
                report.dropped += 1;
                warn!("Dropped {}: {}", summary, e);
            }
        }
    }

    fn try_push(&self, item: QueueItem) -> Result<(), QueueError> {
        self.queue.try_send(item).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Full,
            TrySendError::Closed(_) => QueueError::Closed,
        })
    }

    fn internal_validate(&self) -> Result<(), CollectionError> {
        self.config
            .validate()
            .map_err(|reason| CollectionError::Execution {
                command: self.config.path.clone(),
                reason,
            })?;

        if !self.executor.is_available() {
            return Err(CollectionError::Execution {
                command: self.config.path.clone(),
                reason: "smartctl command not found".to_string(),
            });
        }
        Ok(())
    }
}

impl<E: CommandExecutor> MetadataProvider for SmartctlCollector<E> {
    fn name(&self) -> &str {
        "smartctl"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &str {
        "S.M.A.R.T. attributes gathered with smartctl"
    }
}

impl<E: CommandExecutor> DataCollector<CycleReport> for SmartctlCollector<E> {
    fn collect(&mut self) -> Result<CycleReport, CollectionError> {
        self.build_items()
    }

    fn validate(&self) -> Result<(), CollectionError> {
        self.internal_validate()
    }

    fn health_check(&self) -> bool {
        self.internal_validate().is_ok()
    }
}

#[async_trait::async_trait]
impl<E: CommandExecutor> AsyncDataCollector<CycleReport> for SmartctlCollector<E> {
    /// Needs the multi-threaded runtime: smartctl is run on the current worker thread.
    async fn collect(&mut self) -> Result<CycleReport, CollectionError> {
        tokio::task::block_in_place(|| self.build_items())
    }

    async fn validate(&self) -> Result<(), CollectionError> {
        self.internal_validate()
    }

    async fn health_check(&self) -> bool {
        self.internal_validate().is_ok()
    }
}
