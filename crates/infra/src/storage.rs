//! In-memory image storage adapter.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use gearbase_app::{ImageStorage, ImageUpload, PortError, PortResult};

/// Keeps uploads in a map and remembers every delete, so tests can assert
/// that compensation actually ran.
#[derive(Debug, Default)]
pub struct InMemoryImageStorage {
    files: RwLock<HashMap<String, ImageUpload>>,
    deleted: RwLock<Vec<String>>,
    counter: AtomicU64,
}

impl InMemoryImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.files
            .read()
            .map(|files| files.contains_key(url))
            .unwrap_or(false)
    }

    pub fn stored_urls(&self) -> Vec<String> {
        self.files
            .read()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn deleted_urls(&self) -> Vec<String> {
        self.deleted
            .read()
            .map(|deleted| deleted.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn upload(&self, image: ImageUpload, identifier_hint: &str) -> PortResult<String> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let url = format!("memory://images/{}-{n}", identifier_hint.to_lowercase());
        self.files
            .write()
            .map_err(|_| PortError::Backend("lock poisoned".to_string()))?
            .insert(url.clone(), image);
        Ok(url)
    }

    async fn delete(&self, url: &str) -> PortResult<()> {
        let mut files = self
            .files
            .write()
            .map_err(|_| PortError::Backend("lock poisoned".to_string()))?;
        if files.remove(url).is_none() {
            return Err(PortError::NotFound);
        }
        self.deleted
            .write()
            .map_err(|_| PortError::Backend("lock poisoned".to_string()))?
            .push(url.to_string());
        Ok(())
    }
}
