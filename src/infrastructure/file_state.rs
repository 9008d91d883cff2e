// File-backed durable state - one JSON file per key under a data directory
use crate::application::durable_state::{DurableState, DurableStateError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct FileDurableState {
    dir: PathBuf,
}

impl FileDurableState {
    pub async fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!("Durable state directory: {}", dir.display());
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, std::io::Error> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid durable key: {:?}", key),
            ));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

/// Write to a sibling temp file, flush it to disk, then rename over the target
async fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    let mut file = tokio::fs::File::create(&temp_path).await?;
    file.write_all(content.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(&temp_path, path).await
}

#[async_trait]
impl DurableState for FileDurableState {
    async fn read(&self, key: &str) -> Result<Option<String>, DurableStateError> {
        let read_err = |source: std::io::Error| DurableStateError::Read {
            key: key.to_string(),
            source,
        };
        let path = self.path_for(key).map_err(read_err)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(read_err(e)),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), DurableStateError> {
        let write_err = |source: std::io::Error| DurableStateError::Write {
            key: key.to_string(),
            source,
        };
        let path = self.path_for(key).map_err(write_err)?;

        atomic_write(&path, value).await.map_err(write_err)?;
        tracing::debug!("Persisted {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DurableStateError> {
        let write_err = |source: std::io::Error| DurableStateError::Write {
            key: key.to_string(),
            source,
        };
        let path = self.path_for(key).map_err(write_err)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(write_err(e)),
        }
    }
}
