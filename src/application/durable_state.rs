// Durable state port - keyed text blobs that survive a restart
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DurableStateError {
    #[error("failed to read durable key {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write durable key {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait DurableState: Send + Sync {
    /// Read the blob stored under `key`, `None` when nothing is stored
    async fn read(&self, key: &str) -> Result<Option<String>, DurableStateError>;

    /// Replace the blob under `key`. Must be durable when this returns.
    async fn write(&self, key: &str, value: &str) -> Result<(), DurableStateError>;

    /// Remove `key`; removing an absent key succeeds
    async fn remove(&self, key: &str) -> Result<(), DurableStateError>;
}
