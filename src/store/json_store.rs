use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, warn};

/// Interface for abstracting storage of application state.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `default` when nothing well-formed is there.
    fn load<T: DeserializeOwned + Send>(
        &self,
        key: &str,
        default: T,
    ) -> impl Future<Output = Result<T>> + Send;

    /// Serializes `value` under `key`, overwriting whatever was stored before. The value is on
    /// disk once the future resolves.
    fn save<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Deref + Sync> KeyValueStore for T
where
    T::Target: KeyValueStore,
{
    fn load<V: DeserializeOwned + Send>(
        &self,
        key: &str,
        default: V,
    ) -> impl Future<Output = Result<V>> + Send {
        self.deref().load(key, default)
    }

    fn save<V: Serialize + Sync>(
        &self,
        key: &str,
        value: &V,
    ) -> impl Future<Output = Result<()>> + Send {
        self.deref().save(key, value)
    }
}

/// The main realization of [KeyValueStore]. One `<key>.json` file per key.
pub struct JsonFileStore {
    store_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(store_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&store_dir)?;

        Ok(Self { store_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.store_dir.join(format!("{key}.json"))
    }

    async fn read_inner(path: &Path) -> Result<Option<Vec<u8>>, std::io::Error> {
        async fn extract(path: &Path) -> Result<Vec<u8>, std::io::Error> {
            debug!("Reading {path:?}");
            let mut file = File::open(path).await?;
            file.lock_shared()?;
            let mut content = vec![];
            let result = file.read_to_end(&mut content).await;
            file.unlock_async().await?;
            result.map(|_| content)
        }

        match extract(path).await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write_inner(path: &Path, buffer: &[u8]) -> Result<(), std::io::Error> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await?;

        // Truncation waits for the lock so a concurrent reader never sees a half-empty file.
        file.lock_exclusive()?;
        let result = async {
            file.set_len(0).await?;
            file.write_all(buffer).await?;
            file.flush().await?;
            file.sync_data().await
        }
        .await;
        file.unlock_async().await?;
        result
    }
}

impl KeyValueStore for JsonFileStore {
    async fn load<T: DeserializeOwned + Send>(&self, key: &str, default: T) -> Result<T> {
        let path = self.path_for(key);
        let Some(content) = Self::read_inner(&path).await? else {
            debug!("Nothing stored under {key}, using default");
            return Ok(default);
        };

        match serde_json::from_slice::<T>(&content) {
            Ok(v) => Ok(v),
            Err(e) => {
                // Hand edits or an interrupted write. Falling back keeps the app usable.
                warn!("Stored value for {key} in {path:?} is malformed, using default: {e}");
                Ok(default)
            }
        }
    }

    async fn save<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let buffer = serde_json::to_vec_pretty(value)?;
        let path = self.path_for(key);
        Self::write_inner(&path, &buffer).await?;
        debug!("Saved {} bytes under {key}", buffer.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::{JsonFileStore, KeyValueStore};

    #[tokio::test]
    async fn test_store_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path().to_path_buf())?;

        store.save("numbers", &vec![3u32, 1, 2]).await?;
        let loaded: Vec<u32> = store.load("numbers", vec![]).await?;

        assert_eq!(loaded, vec![3, 1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_store_missing_key_returns_default() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path().join("nested"))?;

        let loaded: u64 = store.load("focus-sessions", 7).await?;

        assert_eq!(loaded, 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_store_malformed_value_returns_default() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path().to_path_buf())?;
        std::fs::write(dir.path().join("tasks.json"), "[{\"id\": ")?;

        let loaded: Vec<String> = store.load("tasks", vec!["fallback".into()]).await?;

        assert_eq!(loaded, vec!["fallback".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_store_undecodable_bytes_return_default() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path().to_path_buf())?;
        std::fs::write(dir.path().join("focus-sessions.json"), [0xff, 0xfe, 0x31])?;

        let loaded: u64 = store.load("focus-sessions", 0).await?;

        assert_eq!(loaded, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_store_overwrites_longer_value() -> Result<()> {
        let dir = tempdir()?;
        let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf())?);

        store.save("text", &"a rather long value".to_string()).await?;
        store.save("text", &"short".to_string()).await?;
        let loaded: String = store.load("text", String::new()).await?;

        assert_eq!(loaded, "short");
        Ok(())
    }
}
