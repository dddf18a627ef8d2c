use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::sync::Mutex;
use trail_compass_logic::KeyValueStore;

pub mod prelude {
    pub use anyhow::{Context, anyhow, bail};
    pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
}

pub use prelude::*;

type Items = BTreeMap<String, String>;

/// [KeyValueStore] kept in a JSON file, stands in for on-device storage on desktop.
///
/// The file holds one object mapping keys to string blobs. Writes go to a sibling temp file that
/// is then renamed over the original, so a crash never leaves a half-written store.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_items(&self) -> Result<Items> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a valid store file", self.path.display())),
            Err(why) if why.kind() == ErrorKind::NotFound => Ok(Items::new()),
            Err(why) => {
                Err(why).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        }
    }
}

impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_items().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: String) -> Result {
        let _guard = self.write_lock.lock().await;

        let mut items = self.read_items().await?;
        items.insert(key.to_string(), value);
        let raw = serde_json::to_string_pretty(&items).context("Failed to serialize store")?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))
    }
}
