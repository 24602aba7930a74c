use crate::features::smartctl::QueueItem;
use crate::shared::error::StorageError;
use crate::shared::traits::DataStorage;
use async_trait::async_trait;
use log::debug;
use std::io::Write;
use std::sync::Mutex;

/// Writes every queue item as one JSON document per line.
pub struct JsonLinesStorage<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesStorage<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_items(&self, items: &[QueueItem]) -> Result<(), StorageError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;

        for item in items {
            serde_json::to_writer(&mut *writer, item)?;
            writer
                .write_all(b"\n")
                .map_err(|e| StorageError::Write(e.to_string()))?;
            debug!("Stored item {}", item.key());
        }

        writer.flush().map_err(|e| StorageError::Write(e.to_string()))
    }
}

#[async_trait]
impl<W: Write + Send> DataStorage<QueueItem> for JsonLinesStorage<W> {
    async fn store(&self, data: QueueItem) -> Result<(), StorageError> {
        self.write_items(std::slice::from_ref(&data))
    }

    async fn batch_store(&self, data: Vec<QueueItem>) -> Result<(), StorageError> {
        self.write_items(&data)
    }

    async fn health_check(&self) -> bool {
        self.writer.lock().is_ok()
    }
}
