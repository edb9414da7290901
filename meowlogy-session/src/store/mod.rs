mod file_store;
mod memory_store;
mod redis_store;

use std::path::{Path, PathBuf};

use file_store::FileSessionStore;
use memory_store::MemorySessionStore;
use redis_store::RedisSessionStore;

pub const DEFAULT_KEY_PREFIX: &str = "meowlogy";

#[derive(Clone, Debug)]
enum StoreBackend {
    Memory(MemorySessionStore),
    File(FileSessionStore),
    Redis(RedisSessionStore),
}

/// Flat string key-value store holding the persisted session. No schema, no
/// versioning, no expiry.
#[derive(Clone, Debug)]
pub struct SessionStore {
    key_prefix: String,
    backend: StoreBackend,
}

impl SessionStore {
    pub fn memory(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: StoreBackend::Memory(MemorySessionStore::default()),
        }
    }

    pub fn file(path: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: StoreBackend::File(FileSessionStore::new(path)),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: StoreBackend::Redis(RedisSessionStore::from_url(redis_url)?),
        })
    }

    /// `<config dir>/meowlogy/session.json`, or a dotfile in the working
    /// directory when the platform has no config dir.
    pub fn default_file_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("meowlogy").join("session.json"))
            .unwrap_or_else(|| Path::new(".meowlogy-session.json").to_path_buf())
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            StoreBackend::Memory(_) => "memory",
            StoreBackend::File(_) => "file",
            StoreBackend::Redis(_) => "redis",
        }
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, StoreBackend::Redis(_))
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        match &self.backend {
            StoreBackend::Memory(store) => store.get(key).await,
            StoreBackend::File(store) => store.get(key).await,
            StoreBackend::Redis(store) => store.get(key).await,
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        match &self.backend {
            StoreBackend::Memory(store) => store.set(key, value).await,
            StoreBackend::File(store) => store.set(key, value).await,
            StoreBackend::Redis(store) => store.set(key, value).await,
        }
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            StoreBackend::Memory(store) => store.del(key).await,
            StoreBackend::File(store) => store.del(key).await,
            StoreBackend::Redis(store) => store.del(key).await,
        }
    }

    /// Connectivity check; only meaningful for redis.
    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            StoreBackend::Redis(store) => store.ping().await,
            StoreBackend::Memory(_) | StoreBackend::File(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStore;

    #[tokio::test]
    async fn memory_store_round_trips_and_deletes() {
        let store = SessionStore::memory("test");
        let key = store.key("username");
        assert_eq!(key, "test:username");

        assert_eq!(store.get(&key).await.unwrap(), None);
        store.set(&key, "JAY").await.unwrap();
        assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("JAY"));
        store.del(&key).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), None);
        assert_eq!(store.backend_name(), "memory");
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn clones_share_memory_state() {
        let store = SessionStore::memory("test");
        let other = store.clone();
        store.set("k", "v").await.unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
