//! The on-disk JSON document and the file-backed store

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use entities::{Device, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;

use crate::store::{attribute_matches, user_matches};
use crate::{DeviceField, InventoryStore, StoreConfig, StoreError, StoreResult, UserField};

/// Persisted document layout: one logical table per entity type, keyed by
/// the record's natural key
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    devices: BTreeMap<String, Device>,
    #[serde(default)]
    users: BTreeMap<String, User>,
}

/// File-backed store over a single human-readable JSON document
///
/// Every operation re-reads the whole document, mutates it in memory and
/// rewrites the file before returning. A mutex serializes operations within
/// the process; across processes the document stays last-writer-wins at file
/// granularity, which is acceptable for the single-operator deployment
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    /// Creates a store backed by the document at `path`. The file does not
    /// need to exist yet; the first write creates it
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Creates a store at the configured document path
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.database_path.clone())
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StoreResult<Document> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            // A store that was never written is an empty store
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Document::default()),
            Err(err) => return Err(StoreError::Unavailable(err)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_document(&self, document: &Document) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(document)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        // Write a sibling file and rename it into place so a crashed write
        // never leaves a half-written document behind
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for JsonStore {
    async fn store_device(&self, device: &Device) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        let replaced = document
            .devices
            .insert(device.device_id.to_string(), device.clone())
            .is_some();
        self.write_document(&document).await?;
        tracing::debug!(device_id = device.device_id, replaced, "stored device");
        Ok(())
    }

    async fn get_device(&self, device_id: i64) -> StoreResult<Option<Device>> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document.devices.get(&device_id.to_string()).cloned())
    }

    async fn find_all_devices(&self) -> StoreResult<Vec<Device>> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document.devices.into_values().collect())
    }

    async fn find_devices_by_attribute(
        &self,
        field: DeviceField,
        value: &Value,
        limit: usize,
    ) -> StoreResult<Vec<Device>> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document
            .devices
            .into_values()
            .filter(|device| attribute_matches(device, field.as_str(), value))
            .take(limit)
            .collect())
    }

    async fn delete_device(&self, device_id: i64) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        if document.devices.remove(&device_id.to_string()).is_some() {
            self.write_document(&document).await?;
            tracing::debug!(device_id, "deleted device");
        } else {
            tracing::debug!(device_id, "no device to delete");
        }
        Ok(())
    }

    async fn store_user(&self, user: &User) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        let replaced = document
            .users
            .insert(user.id.clone(), user.clone())
            .is_some();
        self.write_document(&document).await?;
        tracing::debug!(user_id = %user.id, replaced, "stored user");
        Ok(())
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document.users.get(id).cloned())
    }

    async fn find_all_users(&self) -> StoreResult<Vec<User>> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document.users.into_values().collect())
    }

    async fn find_users_by_attribute(
        &self,
        field: UserField,
        value: &str,
        limit: usize,
    ) -> StoreResult<Vec<User>> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document
            .users
            .into_values()
            .filter(|user| user_matches(user, field, value))
            .take(limit)
            .collect())
    }

    async fn delete_user(&self, id: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        if document.users.remove(id).is_some() {
            self.write_document(&document).await?;
            tracing::debug!(user_id = %id, "deleted user");
        } else {
            tracing::debug!(user_id = %id, "no user to delete");
        }
        Ok(())
    }
}
