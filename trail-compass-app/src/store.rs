use std::sync::Arc;

use tauri::{AppHandle, Runtime};
use tauri_plugin_store::{Store, StoreExt};
use trail_compass_logic::{KeyValueStore, prelude::*};

const STORE_NAME: &str = "pins.json";

/// [KeyValueStore] backed by a tauri-plugin-store file.
///
/// Blobs are stored as parsed JSON so the file on disk holds the pin array itself.
pub struct TauriStore<R: Runtime>(AppHandle<R>);

impl<R: Runtime> TauriStore<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self(app)
    }

    fn get_store(&self) -> Result<Arc<Store<R>>> {
        self.0.store(STORE_NAME).context("Failed to open pin store")
    }
}

impl<R: Runtime> KeyValueStore for TauriStore<R> {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let store = self.get_store()?;
        Ok(store.get(key).map(|value| value.to_string()))
    }

    async fn set_item(&self, key: &str, value: String) -> Result {
        let store = self.get_store()?;
        let value = serde_json::from_str::<serde_json::Value>(&value)
            .context("Refusing to store a blob that isn't JSON")?;
        store.set(key, value);
        store.save().context("Failed to flush pin store to disk")
    }
}
