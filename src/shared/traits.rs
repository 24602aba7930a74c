use async_trait::async_trait;
use crate::shared::error::{CollectionError, StorageError};

/// Runs the wrapped tool with the given arguments and returns its stdout lines.
pub trait CommandExecutor: Send + Sync {
    fn run(&self, args: &[&str]) -> Result<Vec<String>, CollectionError>;

    fn is_available(&self) -> bool {
        true
    }
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &E {
    fn run(&self, args: &[&str]) -> Result<Vec<String>, CollectionError> {
        (**self).run(args)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

pub trait DataCollector<T> {
    fn collect(&mut self) -> Result<T, CollectionError>;
    fn validate(&self) -> Result<(), CollectionError>;
    fn health_check(&self) -> bool;
}

#[async_trait]
pub trait AsyncDataCollector<T: Send> {
    async fn collect(&mut self) -> Result<T, CollectionError>;
    async fn validate(&self) -> Result<(), CollectionError>;
    async fn health_check(&self) -> bool;
}

#[async_trait]
pub trait DataStorage<T: Send + Sync> {
    async fn store(&self, data: T) -> Result<(), StorageError>;
    async fn batch_store(&self, data: Vec<T>) -> Result<(), StorageError>;
    async fn health_check(&self) -> bool;
}

pub trait MetadataProvider {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn description(&self) -> &str;
}

pub trait Validatable {
    fn validate(&self) -> Result<(), String>;
}
