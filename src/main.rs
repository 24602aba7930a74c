use blackbird_smartctl::{
    features::smartctl::SmartctlCollector,
    shared::{
        config::{SmartctlConfig, DEFAULT_CONFIG_PATH},
        error::{AgentError, ConfigError},
        storage::{forward_queue, JsonLinesStorage},
        traits::{AsyncDataCollector, DataCollector, MetadataProvider, Validatable},
    },
};
use log::{error, info, warn};
use tokio::sync::mpsc::channel;
use tokio::time;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AgentError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SmartctlConfig::from_file(path)?,
        None => SmartctlConfig::from_file_or_default(DEFAULT_CONFIG_PATH)?,
    };
    info!("Loaded config: {:?}", config);

    let (tx, rx) = channel(config.queue_capacity);
    let mut collector = SmartctlCollector::new(config, tx);
    collector.config().validate().map_err(ConfigError::Invalid)?;
    if let Err(e) = DataCollector::validate(&collector) {
        warn!("smartctl is not ready yet, cycles will fail until it is: {}", e);
    }

    let interval = collector.config().interval();
    let discovery = collector.config().discovery_interval();
    info!(
        "Starting {} collector {} (metrics every {:?}, discovery every {:?})",
        collector.name(),
        collector.version(),
        interval,
        discovery
    );

    let mut consumer = tokio::spawn(forward_queue(rx, JsonLinesStorage::new(std::io::stdout())));
    let mut metrics_interval = time::interval(interval);
    let mut discovery_interval = time::interval(discovery);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let finished = loop {
        tokio::select! {
            _ = metrics_interval.tick() => {
                if let Err(e) = AsyncDataCollector::collect(&mut collector).await {
                    error!("Error collecting smartctl metrics: {}", e);
                }
            }
            _ = discovery_interval.tick() => {
                if let Err(e) = tokio::task::block_in_place(|| collector.build_discovery_items()) {
                    error!("Error discovering smartctl attributes: {}", e);
                }
            }
            finished = &mut consumer => break Some(finished),
            _ = &mut shutdown => {
                info!("Shutting down");
                break None;
            }
        }
    };

    // Closing the last sender lets the consumer drain and finish.
    drop(collector);
    let finished = match finished {
        Some(finished) => finished,
        None => consumer.await,
    };
    match finished {
        Ok(stored) => info!("Forwarded {} items", stored?),
        Err(e) => error!("Queue consumer failed: {}", e),
    }
    Ok(())
}


