use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::anyhow;
use tokio::sync::{Mutex, Notify};

use crate::{
    Fix, LocationService, Pin, PushRegistrar, StateUpdateSender, prelude::*,
    storage::KeyValueStore,
};

#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn with_value(key: &str, value: &str) -> Self {
        Self {
            items: Mutex::new(HashMap::from([(key.to_string(), value.to_string())])),
        }
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().await.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key).await)
    }

    async fn set_item(&self, key: &str, value: String) -> Result {
        self.items.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Every read and write fails
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    async fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("Disk on fire"))
    }

    async fn set_item(&self, _key: &str, _value: String) -> Result {
        Err(anyhow!("Disk on fire"))
    }
}

/// Reads as empty, writes fail
#[derive(Default)]
pub struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    async fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_item(&self, _key: &str, _value: String) -> Result {
        Err(anyhow!("Store is read only"))
    }
}

pub struct MockLocation {
    granted: bool,
    fix: Option<Fix>,
    gate: Option<Arc<Notify>>,
}

impl MockLocation {
    pub fn at(fix: Fix) -> Self {
        Self {
            granted: true,
            fix: Some(fix),
            gate: None,
        }
    }

    pub fn no_fix() -> Self {
        Self {
            granted: true,
            fix: None,
            gate: None,
        }
    }

    pub fn denied() -> Self {
        Self {
            granted: false,
            fix: None,
            gate: None,
        }
    }

    /// Only hands out `fix` once `gate` is notified
    pub fn gated(fix: Fix, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::at(fix)
        }
    }
}

impl LocationService for MockLocation {
    async fn request_permission(&self) -> bool {
        self.granted
    }

    async fn current_fix(&self) -> Option<Fix> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.fix
    }
}

#[derive(Default)]
pub struct CountingSender(AtomicUsize);

impl CountingSender {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl StateUpdateSender for CountingSender {
    fn send_update(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockRegistrar {
    pub physical: bool,
    pub granted: bool,
    pub grant_on_request: bool,
    pub project_id: Option<String>,
    pub token_fails: bool,
    pub channel_fails: bool,
    pub prompt_count: AtomicUsize,
    pub channel_count: AtomicUsize,
}

impl Default for MockRegistrar {
    fn default() -> Self {
        Self {
            physical: true,
            granted: true,
            grant_on_request: true,
            project_id: Some("trail-compass".to_string()),
            token_fails: false,
            channel_fails: false,
            prompt_count: AtomicUsize::new(0),
            channel_count: AtomicUsize::new(0),
        }
    }
}

impl MockRegistrar {
    pub fn prompts(&self) -> usize {
        self.prompt_count.load(Ordering::SeqCst)
    }

    pub fn channels(&self) -> usize {
        self.channel_count.load(Ordering::SeqCst)
    }
}

impl PushRegistrar for MockRegistrar {
    fn create_default_channel(&self) -> Result {
        self.channel_count.fetch_add(1, Ordering::SeqCst);
        if self.channel_fails {
            Err(anyhow!("Channels unsupported"))
        } else {
            Ok(())
        }
    }

    fn is_physical_device(&self) -> bool {
        self.physical
    }

    async fn permission_granted(&self) -> bool {
        self.granted
    }

    async fn request_permission(&self) -> bool {
        self.prompt_count.fetch_add(1, Ordering::SeqCst);
        self.grant_on_request
    }

    fn project_id(&self) -> Option<String> {
        self.project_id.clone()
    }

    async fn fetch_token(&self, project_id: &str) -> Result<String> {
        if self.token_fails {
            Err(anyhow!("Push service unreachable"))
        } else {
            Ok(format!("token-for-{project_id}"))
        }
    }
}

/// `count` pins, newest first
pub fn mk_pins(count: usize) -> Vec<Pin> {
    (0..count)
        .rev()
        .map(|i| Pin {
            id: (1717000000000_i64 + i as i64).to_string(),
            lat: 37.7749 + i as f64,
            lon: -122.4194,
            heading: (i * 45) as f64,
            ts: format!("2024-05-29T12:00:{:02}.000Z", i % 60),
        })
        .collect()
}
