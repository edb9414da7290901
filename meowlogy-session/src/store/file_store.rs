use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context as _;

/// All keys live in one small JSON object on disk, rewritten on every change.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_all(&self) -> anyhow::Result<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).with_context(|| {
                format!("session file `{}` is not a JSON object", self.path.display())
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e)
                .with_context(|| format!("failed to read session file `{}`", self.path.display())),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }

        let payload = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, payload)
            .await
            .with_context(|| format!("failed to write session file `{}`", self.path.display()))
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    pub async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.read_all().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(&entries).await
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FileSessionStore;

    #[tokio::test]
    async fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileSessionStore::new(&path);
        assert_eq!(store.get("username").await.unwrap(), None);
        store.set("username", "JAY").await.unwrap();
        store.set("isAuthenticated", "true").await.unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get("username").await.unwrap().as_deref(), Some("JAY"));

        reopened.del("username").await.unwrap();
        assert_eq!(store.get("username").await.unwrap(), None);
        assert_eq!(store.get("isAuthenticated").await.unwrap().as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn corrupt_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"[1, 2]").await.unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.get("username").await.is_err());
    }
}
