//! Store trait definitions and the in-memory implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use entities::{Device, User};
use serde::Serialize;
use serde_json::Value;

use crate::StoreResult;

/// Device fields available to attribute queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceField {
    /// Unique device id
    DeviceId,
    /// Display name
    DeviceName,
    /// Responsible user id
    ManagedByUserId,
    /// In-service flag
    IsActive,
}

impl DeviceField {
    /// Field name as it appears in the stored record
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceId => "device_id",
            Self::DeviceName => "device_name",
            Self::ManagedByUserId => "managed_by_user_id",
            Self::IsActive => "is_active",
        }
    }

    /// Parses a field selector from a record field name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "device_id" => Some(Self::DeviceId),
            "device_name" => Some(Self::DeviceName),
            "managed_by_user_id" => Some(Self::ManagedByUserId),
            "is_active" => Some(Self::IsActive),
            _ => None,
        }
    }
}

/// User fields available to attribute queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    /// Unique user id (email-like)
    Id,
    /// Display name
    Name,
}

impl UserField {
    /// Field name as it appears in the stored record
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
        }
    }

    /// Parses a field selector from a record field name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

/// Trait for device and user storage operations
///
/// Both entity types share the same contract: upsert by natural key, point
/// lookup, full listing, exact-equality attribute search, and delete-by-key
/// where a missing key is a no-op. Storage failures are the only errors;
/// absence is a normal outcome.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    // ========== Device Operations ==========

    /// Inserts or replaces the device stored under its `device_id`
    async fn store_device(&self, device: &Device) -> StoreResult<()>;

    /// Gets a device by id
    async fn get_device(&self, device_id: i64) -> StoreResult<Option<Device>>;

    /// Lists all devices
    async fn find_all_devices(&self) -> StoreResult<Vec<Device>>;

    /// Lists up to `limit` devices whose `field` equals `value` exactly.
    /// An empty result is the not-found signal
    async fn find_devices_by_attribute(
        &self,
        field: DeviceField,
        value: &Value,
        limit: usize,
    ) -> StoreResult<Vec<Device>>;

    /// Deletes a device by id; a missing id is a no-op
    async fn delete_device(&self, device_id: i64) -> StoreResult<()>;

    // ========== User Operations ==========

    /// Inserts or replaces the user stored under its `id`
    async fn store_user(&self, user: &User) -> StoreResult<()>;

    /// Gets a user by id
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>>;

    /// Lists all users
    async fn find_all_users(&self) -> StoreResult<Vec<User>>;

    /// Lists up to `limit` users whose `field` equals `value` exactly.
    /// An empty result is the not-found signal
    async fn find_users_by_attribute(
        &self,
        field: UserField,
        value: &str,
        limit: usize,
    ) -> StoreResult<Vec<User>>;

    /// Deletes a user by id; a missing id is a no-op
    async fn delete_user(&self, id: &str) -> StoreResult<()>;
}

/// Compares one field of a record's serialized form against `value`.
/// Exact equality only; records that fail to serialize never match
pub(crate) fn attribute_matches<T: Serialize>(record: &T, field: &str, value: &Value) -> bool {
    serde_json::to_value(record)
        .ok()
        .and_then(|record| record.get(field).cloned())
        .is_some_and(|field_value| field_value == *value)
}

pub(crate) fn user_matches(user: &User, field: UserField, value: &str) -> bool {
    match field {
        UserField::Id => user.id == value,
        UserField::Name => user.name == value,
    }
}

/// In-memory implementation for tests and previews
#[derive(Debug, Default)]
pub struct MemoryStore {
    devices: RwLock<HashMap<i64, Device>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    /// Creates a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn store_device(&self, device: &Device) -> StoreResult<()> {
        let mut devices = self.devices.write().unwrap();
        devices.insert(device.device_id, device.clone());
        Ok(())
    }

    async fn get_device(&self, device_id: i64) -> StoreResult<Option<Device>> {
        let devices = self.devices.read().unwrap();
        Ok(devices.get(&device_id).cloned())
    }

    async fn find_all_devices(&self) -> StoreResult<Vec<Device>> {
        let devices = self.devices.read().unwrap();
        Ok(devices.values().cloned().collect())
    }

    async fn find_devices_by_attribute(
        &self,
        field: DeviceField,
        value: &Value,
        limit: usize,
    ) -> StoreResult<Vec<Device>> {
        let devices = self.devices.read().unwrap();
        Ok(devices
            .values()
            .filter(|device| attribute_matches(*device, field.as_str(), value))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete_device(&self, device_id: i64) -> StoreResult<()> {
        let mut devices = self.devices.write().unwrap();
        devices.remove(&device_id);
        Ok(())
    }

    async fn store_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    async fn find_all_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().unwrap();
        Ok(users.values().cloned().collect())
    }

    async fn find_users_by_attribute(
        &self,
        field: UserField,
        value: &str,
        limit: usize,
    ) -> StoreResult<Vec<User>> {
        let users = self.users.read().unwrap();
        Ok(users
            .values()
            .filter(|user| user_matches(user, field, value))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete_user(&self, id: &str) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        users.remove(id);
        Ok(())
    }
}
