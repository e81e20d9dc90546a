use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use super::json_store::KeyValueStore;

/// In-memory value mirrored to a [KeyValueStore] key. The value can only be changed through
/// [Persisted::replace], which writes first and swaps second, so memory never runs ahead of
/// the disk.
pub struct Persisted<T, S> {
    store: S,
    key: &'static str,
    value: T,
}

impl<T, S> Persisted<T, S>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    S: KeyValueStore,
{
    #[instrument(skip(store, default))]
    pub async fn load(store: S, key: &'static str, default: T) -> Result<Self> {
        let value = store.load(key, default).await?;
        Ok(Self { store, key, value })
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub async fn replace(&mut self, value: T) -> Result<()> {
        self.store.save(self.key, &value).await?;
        self.value = value;
        Ok(())
    }

    /// Convenience over [Persisted::replace] for derived values.
    pub async fn update(&mut self, f: impl FnOnce(&T) -> T) -> Result<()> {
        let next = f(&self.value);
        self.replace(next).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::store::{json_store::JsonFileStore, FOCUS_SESSIONS_KEY};

    use super::Persisted;

    #[tokio::test]
    async fn test_persisted_replace_is_visible_to_fresh_load() -> Result<()> {
        let dir = tempdir()?;
        let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf())?);

        let mut counter = Persisted::load(store.clone(), FOCUS_SESSIONS_KEY, 0u64).await?;
        counter.update(|v| v + 1).await?;
        counter.update(|v| v + 1).await?;
        assert_eq!(*counter.get(), 2);

        let reloaded = Persisted::load(store, FOCUS_SESSIONS_KEY, 0u64).await?;
        assert_eq!(*reloaded.get(), 2);
        Ok(())
    }
}
