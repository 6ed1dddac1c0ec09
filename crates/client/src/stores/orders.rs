//! Order recorder.
//!
//! Snapshots the cart into an immutable [`Order`] at checkout completion and
//! prepends it to the current user's persisted history. A monotonic version
//! counter serves as the change signal for dependent views - a plain
//! counter, not an event bus.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::Order;
use crate::storage::{self, Storage, StorageKey};
use crate::stores::{CartStore, SessionStore};

/// Records completed orders into per-user history.
pub struct OrderLog {
    storage: Arc<dyn Storage>,
    // Serializes the read-prepend-write sequence on the persisted list.
    write_lock: Mutex<()>,
    version: AtomicU64,
}

impl OrderLog {
    /// Create an order log over the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
            version: AtomicU64::new(0),
        }
    }

    /// Record the current cart as a new order for the logged-in user.
    ///
    /// Returns `Ok(None)` without touching history when no user is logged
    /// in. Does **not** clear the cart: the caller decides when to clear,
    /// e.g., only after a downstream payment confirmation succeeds. The
    /// returned future resolves once the updated history is durable.
    ///
    /// # Errors
    ///
    /// Propagates storage failures and money arithmetic errors from the cart
    /// snapshot.
    pub async fn complete_order(
        &self,
        session: &SessionStore,
        cart: &CartStore,
    ) -> Result<Option<Order>> {
        let Some(user) = session.current_user().await else {
            tracing::debug!("order completion skipped, no user logged in");
            return Ok(None);
        };

        // Lines and total come from one cart lock acquisition, so the
        // recorded total always equals the recorded lines.
        let snapshot = cart.snapshot().await?;

        let _guard = self.write_lock.lock().await;

        let key = StorageKey::Orders(&user);
        let mut orders: Vec<Order> = storage::read_json(self.storage.as_ref(), &key)
            .await?
            .unwrap_or_default();

        let order = Order::record(snapshot.lines, snapshot.total, Utc::now());
        orders.insert(0, order.clone());
        storage::write_json(self.storage.as_ref(), &key, &orders).await?;

        self.version.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            user = %user,
            order = %order.id,
            total = %order.total,
            "order recorded"
        );
        Ok(Some(order))
    }

    /// The current user's order history, most-recent-first.
    ///
    /// Always read from storage, so it reflects the latest completion
    /// without a restart. Empty when no user is logged in.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn orders(&self, session: &SessionStore) -> Result<Vec<Order>> {
        let Some(user) = session.current_user().await else {
            return Ok(Vec::new());
        };

        let orders = storage::read_json(self.storage.as_ref(), &StorageKey::Orders(&user))
            .await?
            .unwrap_or_default();
        Ok(orders)
    }

    /// Monotonic counter incremented on every recorded order. Dependent
    /// views re-fetch when the value changes.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }
}
