use log::{error, warn};

use crate::{error::CompassError, pin::Pin, prelude::*};

/// Key the pin collection lives under. The suffix is the schema version, a breaking change to
/// [Pin] needs a new key rather than a migration.
pub const PINS_KEY: &str = "TRAIL_COMPASS_PINS_V1";

/// A string-to-string key-value store, as provided by the platform
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `Ok(None)` if nothing is stored there
    fn get_item(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;
    /// Replace the value under `key` as a single write
    fn set_item(&self, key: &str, value: String) -> impl Future<Output = Result> + Send;
}

/// Persists the whole pin collection as one JSON blob.
///
/// Every save rewrites the full collection. There's no locking here, two saves racing on the
/// same store are last-write-wins, use a [crate::PinBook] to serialize writes.
pub struct PinStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PinStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Read all saved pins, `Ok` with no pins if nothing was ever saved.
    ///
    /// Unreadable or malformed data is a [CompassError::StorageReadFailure], the cause is logged.
    pub async fn try_load(&self) -> Result<Vec<Pin>, CompassError> {
        let raw = match self.store.get_item(PINS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Vec::new()),
            Err(why) => {
                warn!("Failed to read saved pins: {why:?}");
                return Err(CompassError::StorageReadFailure);
            }
        };

        serde_json::from_str::<Vec<Pin>>(&raw).map_err(|why| {
            warn!("Saved pins are malformed: {why}");
            CompassError::StorageReadFailure
        })
    }

    /// Read all saved pins. Missing, malformed, or unreadable data all mean no pins.
    pub async fn load(&self) -> Vec<Pin> {
        self.try_load().await.unwrap_or_default()
    }

    async fn try_save(&self, pins: &[Pin]) -> Result {
        let blob = serde_json::to_string(pins).context("Failed to serialize pins")?;
        self.store
            .set_item(PINS_KEY, blob)
            .await
            .context("Failed to write pins")
    }

    /// Write the full collection, returns whether the write went through
    pub async fn save(&self, pins: &[Pin]) -> bool {
        match self.try_save(pins).await {
            Ok(()) => true,
            Err(why) => {
                error!("Error occurred while storing pins: {why:?}");
                false
            }
        }
    }
}
