pub mod json_lines;

pub use json_lines::JsonLinesStorage;

use crate::features::smartctl::QueueItem;
use crate::shared::error::StorageError;
use crate::shared::traits::DataStorage;
use tokio::sync::mpsc::Receiver;

/// Drains the outbound queue into `storage` until every sender is gone.
/// Stops at the first failed write: the sink is gone and nothing further can be delivered.
pub async fn forward_queue<S>(mut rx: Receiver<QueueItem>, storage: S) -> Result<usize, StorageError>
where
    S: DataStorage<QueueItem> + Send + Sync,
{
    let mut stored = 0;
    while let Some(item) = rx.recv().await {
        storage.store(item).await?;
        stored += 1;
    }
    Ok(stored)
}
