//! Saved shipping address.
//!
//! At most one address per user, replaced wholesale on save. Validation is
//! the address form's job ([`ShippingAddress::validate`]); the store
//! persists whatever it is given.

use std::sync::Arc;

use tokio::sync::RwLock;

use sundrop_core::Email;

use crate::models::ShippingAddress;
use crate::storage::{self, Storage, StorageError, StorageKey};

struct ActiveAddress {
    owner: Email,
    saved: Option<ShippingAddress>,
}

/// Per-user saved shipping address.
pub struct AddressStore {
    storage: Arc<dyn Storage>,
    active: RwLock<Option<ActiveAddress>>,
}

impl AddressStore {
    /// Create an address store with no user loaded.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            active: RwLock::new(None),
        }
    }

    /// Load `owner`'s saved address, if any. Called at login.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn load(&self, owner: &Email) -> Result<(), StorageError> {
        let saved: Option<ShippingAddress> =
            storage::read_json(self.storage.as_ref(), &StorageKey::ShippingAddress(owner))
                .await?;

        *self.active.write().await = Some(ActiveAddress {
            owner: owner.clone(),
            saved,
        });
        Ok(())
    }

    /// Drop the in-memory copy at logout. Persisted storage is untouched.
    pub async fn clear_session(&self) {
        *self.active.write().await = None;
    }

    /// The active user's saved address, if any.
    pub async fn saved(&self) -> Option<ShippingAddress> {
        self.active
            .read()
            .await
            .as_ref()
            .and_then(|active| active.saved.clone())
    }

    /// Save an address for the active user, replacing any prior one.
    /// Returns `false` (no-op) when no user is loaded.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn save(&self, address: ShippingAddress) -> Result<bool, StorageError> {
        let mut guard = self.active.write().await;
        let Some(active) = guard.as_mut() else {
            return Ok(false);
        };

        storage::write_json(
            self.storage.as_ref(),
            &StorageKey::ShippingAddress(&active.owner),
            &address,
        )
        .await?;
        active.saved = Some(address);
        Ok(true)
    }

    /// Remove the active user's saved address. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn clear_saved(&self) -> Result<bool, StorageError> {
        let mut guard = self.active.write().await;
        let Some(active) = guard.as_mut() else {
            return Ok(false);
        };

        let existed = active.saved.take().is_some();
        self.storage
            .remove(&StorageKey::ShippingAddress(&active.owner))
            .await?;
        Ok(existed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn address(city: &str) -> ShippingAddress {
        ShippingAddress {
            full_name: "Ada Lovelace".to_owned(),
            line1: "1 Analytical Way".to_owned(),
            city: city.to_owned(),
            postal_code: "N1 9GU".to_owned(),
            country: "GB".to_owned(),
            ..ShippingAddress::default()
        }
    }

    #[tokio::test]
    async fn test_save_requires_loaded_user() {
        let store = AddressStore::new(Arc::new(MemoryStorage::new()));
        assert!(!store.save(address("London")).await.unwrap());
        assert!(store.saved().await.is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_wholesale() {
        let store = AddressStore::new(Arc::new(MemoryStorage::new()));
        let owner = Email::parse("a@x.com").unwrap();
        store.load(&owner).await.unwrap();

        store.save(address("London")).await.unwrap();
        store.save(address("Leeds")).await.unwrap();
        assert_eq!(store.saved().await.unwrap().city, "Leeds");
    }

    #[tokio::test]
    async fn test_address_survives_logout_login() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = AddressStore::new(Arc::clone(&storage));
        let owner = Email::parse("a@x.com").unwrap();

        store.load(&owner).await.unwrap();
        store.save(address("London")).await.unwrap();
        store.clear_session().await;
        assert!(store.saved().await.is_none());

        store.load(&owner).await.unwrap();
        assert_eq!(store.saved().await.unwrap().city, "London");
    }

    #[tokio::test]
    async fn test_clear_saved_removes_persisted_copy() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = AddressStore::new(Arc::clone(&storage));
        let owner = Email::parse("a@x.com").unwrap();

        store.load(&owner).await.unwrap();
        store.save(address("London")).await.unwrap();
        assert!(store.clear_saved().await.unwrap());
        assert!(!store.clear_saved().await.unwrap());

        store.load(&owner).await.unwrap();
        assert!(store.saved().await.is_none());
    }
}
