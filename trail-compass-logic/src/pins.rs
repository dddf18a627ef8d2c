use log::info;
use tokio::sync::Mutex;

use crate::{
    error::CompassError,
    location::Fix,
    pin::{Pin, prepend_pin, remove_pin},
    storage::{KeyValueStore, PinStore},
};

/// The app's working copy of the pin collection.
///
/// Every mutation replaces the collection and writes it back through the [PinStore] while still
/// holding the lock, so writes made through one book never interleave. A failed write leaves the
/// new collection in memory and reports [CompassError::StorageWriteFailure].
pub struct PinBook<S: KeyValueStore> {
    store: PinStore<S>,
    pins: Mutex<Vec<Pin>>,
}

impl<S: KeyValueStore> PinBook<S> {
    /// Load whatever is saved and start from that
    pub async fn open(store: S) -> Self {
        let store = PinStore::new(store);
        let pins = store.load().await;
        info!("Loaded {} saved pins", pins.len());
        Self {
            store,
            pins: Mutex::new(pins),
        }
    }

    /// Throw away the working copy and read it from storage again
    pub async fn reload(&self) -> Vec<Pin> {
        let mut pins = self.pins.lock().await;
        *pins = self.store.load().await;
        pins.clone()
    }

    pub async fn pins(&self) -> Vec<Pin> {
        self.pins.lock().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Pin> {
        self.pins.lock().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.pins.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn replace(&self, pins: &mut Vec<Pin>, next: Vec<Pin>) -> Result<(), CompassError> {
        *pins = next;
        if self.store.save(pins).await {
            Ok(())
        } else {
            Err(CompassError::StorageWriteFailure)
        }
    }

    /// Save a new pin at `fix`, it becomes the first pin in the collection
    pub async fn drop_pin(&self, fix: Fix, heading: Option<f64>) -> Result<Pin, CompassError> {
        let mut pins = self.pins.lock().await;
        let pin = Pin::new(fix, heading, &pins);
        let next = prepend_pin(&pins, pin.clone());
        self.replace(&mut pins, next).await?;
        info!("Dropped pin {} at {}, {}", pin.id, pin.lat, pin.lon);
        Ok(pin)
    }

    /// Delete the pin with `id`, returns whether there was one
    pub async fn remove(&self, id: &str) -> Result<bool, CompassError> {
        let mut pins = self.pins.lock().await;
        let next = remove_pin(&pins, id);
        if next.len() == pins.len() {
            return Ok(false);
        }
        self.replace(&mut pins, next).await?;
        Ok(true)
    }

    /// Delete every pin
    pub async fn clear(&self) -> Result<(), CompassError> {
        let mut pins = self.pins.lock().await;
        self.replace(&mut pins, Vec::new()).await
    }
}
