//! Integration tests for Sundrop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sundrop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart, payment sheet, and order recording end-to-end
//! - `session_isolation` - Per-user persistence across logout/login cycles
//! - `wishlist_flow` - Wishlist mutation and reorder through the app state
//!
//! The scenarios run against in-memory storage and collaborator doubles;
//! nothing here talks to a real backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use sundrop_client::AppState;
use sundrop_client::config::{ClientConfig, CommerceConfig, GeocodingConfig};
use sundrop_client::payment::{PaymentError, PaymentIntent, PaymentIntents, PaymentSheet};
use sundrop_client::storage::{MemoryStorage, Storage};
use sundrop_core::{CustomerId, Money, PaymentOutcome};

/// Initialize test logging once; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A payment backend double that mints an intent for any amount.
pub struct StaticPayments;

#[async_trait]
impl PaymentIntents for StaticPayments {
    async fn create_intent(
        &self,
        _amount: Money,
        _customer: Option<&CustomerId>,
    ) -> Result<PaymentIntent, PaymentError> {
        Ok(PaymentIntent::new(
            SecretString::from("pi_secret_test"),
            SecretString::from("ek_test"),
            CustomerId::new("cus_test"),
            "pk_test",
        ))
    }
}

/// A payment sheet double that resolves to a fixed outcome.
pub struct StaticSheet(pub PaymentOutcome);

#[async_trait]
impl PaymentSheet for StaticSheet {
    async fn present(&self, _intent: &PaymentIntent) -> PaymentOutcome {
        self.0.clone()
    }
}

/// Configuration pointing at nothing; the doubles never dial out.
#[must_use]
pub fn test_config() -> ClientConfig {
    ClientConfig {
        commerce: CommerceConfig {
            base_url: "http://localhost:9000".to_owned(),
            publishable_key: "pk_test".to_owned(),
        },
        payment_url: "http://localhost:9000".to_owned(),
        geocoding: GeocodingConfig {
            base_url: "http://localhost:9000".to_owned(),
            api_key: None,
        },
        storage_path: None,
        http_timeout: Duration::from_secs(5),
    }
}

/// Build an app over the given storage, so tests can "restart" by building
/// a second app over the same storage.
///
/// # Panics
///
/// Panics if the app state cannot be composed.
pub async fn app_over(storage: Arc<dyn Storage>) -> AppState {
    init_tracing();
    AppState::with_collaborators(
        test_config(),
        storage,
        reqwest::Client::new(),
        Arc::new(StaticPayments),
        None,
    )
    .await
    .expect("failed to compose app state")
}

/// Build an app over fresh in-memory storage, returning the storage handle
/// for direct inspection.
///
/// # Panics
///
/// Panics if the app state cannot be composed.
pub async fn fresh_app() -> (AppState, Arc<dyn Storage>) {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = app_over(Arc::clone(&storage)).await;
    (app, storage)
}
