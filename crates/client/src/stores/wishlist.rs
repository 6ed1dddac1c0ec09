//! Per-user wishlist.
//!
//! Holds the logged-in user's saved products in memory and writes every
//! mutation through to storage. There is no anonymous wishlist: with no user
//! loaded, every operation is a silent no-op.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use sundrop_core::{Email, ProductId};

use crate::models::{NewWishlistItem, WishlistItem};
use crate::storage::{self, Storage, StorageError, StorageKey};

/// Contract violations on wishlist operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WishlistError {
    /// A reorder tried to insert or delete items instead of permuting them.
    #[error("reorder must keep the same items")]
    MembershipChanged,
}

struct ActiveWishlist {
    owner: Email,
    items: Vec<WishlistItem>,
}

/// Ordered, persisted collection of saved products for the active user.
pub struct WishlistStore {
    storage: Arc<dyn Storage>,
    active: RwLock<Option<ActiveWishlist>>,
}

impl WishlistStore {
    /// Create a wishlist store with no user loaded.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            active: RwLock::new(None),
        }
    }

    /// Load `owner`'s persisted wishlist, replacing whatever was loaded
    /// before. Called at login so a previous user's items never leak into
    /// the new session.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn load(&self, owner: &Email) -> Result<(), StorageError> {
        let items: Vec<WishlistItem> =
            storage::read_json(self.storage.as_ref(), &StorageKey::Wishlist(owner))
                .await?
                .unwrap_or_default();

        tracing::debug!(user = %owner, count = items.len(), "wishlist loaded");
        *self.active.write().await = Some(ActiveWishlist {
            owner: owner.clone(),
            items,
        });
        Ok(())
    }

    /// Drop the in-memory copy at logout. Persisted storage is untouched.
    pub async fn clear_session(&self) {
        *self.active.write().await = None;
    }

    /// The active user's items in their saved order; empty when no user is
    /// loaded.
    pub async fn items(&self) -> Vec<WishlistItem> {
        self.active
            .read()
            .await
            .as_ref()
            .map(|active| active.items.clone())
            .unwrap_or_default()
    }

    /// Add a product to the wishlist.
    ///
    /// Idempotent: a product id that is already saved is left untouched.
    /// Returns whether an item was inserted; `false` also covers the
    /// no-user-loaded no-op.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn add(&self, item: NewWishlistItem) -> Result<bool, StorageError> {
        let mut guard = self.active.write().await;
        let Some(active) = guard.as_mut() else {
            return Ok(false);
        };

        if active.items.iter().any(|existing| existing.id == item.id) {
            tracing::debug!(product = %item.id, "wishlist add skipped, already saved");
            return Ok(false);
        }

        active.items.push(item.into_item(Utc::now()));
        storage::write_json(
            self.storage.as_ref(),
            &StorageKey::Wishlist(&active.owner),
            &active.items,
        )
        .await?;
        Ok(true)
    }

    /// Remove a product by id. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn remove(&self, id: &ProductId) -> Result<bool, StorageError> {
        let mut guard = self.active.write().await;
        let Some(active) = guard.as_mut() else {
            return Ok(false);
        };

        let before = active.items.len();
        active.items.retain(|item| &item.id != id);
        if active.items.len() == before {
            return Ok(false);
        }

        storage::write_json(
            self.storage.as_ref(),
            &StorageKey::Wishlist(&active.owner),
            &active.items,
        )
        .await?;
        Ok(true)
    }

    /// Commit a drag-and-drop permutation.
    ///
    /// The caller supplies the product ids in their new order; items are
    /// rebuilt from the stored entries, so reordering can never alter item
    /// data. Silent no-op when no user is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::MembershipChanged`] if `new_order` is not a
    /// permutation of the saved ids, and propagates storage failures (as
    /// [`crate::AppError`]).
    pub async fn reorder(&self, new_order: &[ProductId]) -> crate::Result<()> {
        let mut guard = self.active.write().await;
        let Some(active) = guard.as_mut() else {
            return Ok(());
        };

        if new_order.len() != active.items.len() {
            return Err(WishlistError::MembershipChanged.into());
        }
        let saved: HashSet<&ProductId> = active.items.iter().map(|item| &item.id).collect();
        let incoming: HashSet<&ProductId> = new_order.iter().collect();
        if saved != incoming || incoming.len() != new_order.len() {
            return Err(WishlistError::MembershipChanged.into());
        }

        let mut reordered = Vec::with_capacity(active.items.len());
        for id in new_order {
            if let Some(item) = active.items.iter().find(|item| &item.id == id) {
                reordered.push(item.clone());
            }
        }
        active.items = reordered;

        storage::write_json(
            self.storage.as_ref(),
            &StorageKey::Wishlist(&active.owner),
            &active.items,
        )
        .await
        .map_err(Into::into)
    }
}
