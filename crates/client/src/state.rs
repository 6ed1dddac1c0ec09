//! Application state shared across the UI tree.
//!
//! The stores and collaborator clients are composed here once at process
//! start and handed to whatever builds the UI, instead of living in ambient
//! globals. Lifecycle orchestration lives here too: login loads the new
//! user's persisted collections, logout unloads them, checkout sequences
//! intent creation, the payment sheet, order recording, and cart clearing.

use std::sync::Arc;

use secrecy::SecretString;

use sundrop_core::{BiometricOutcome, PaymentOutcome};

use crate::catalog::CatalogClient;
use crate::config::ClientConfig;
use crate::device::biometrics::BiometricAuthenticator;
use crate::device::geocode::{GeocodedAddress, ReverseGeocoder};
use crate::device::location::LocationProvider;
use crate::error::{AppError, Result};
use crate::models::Order;
use crate::payment::{PaymentClient, PaymentIntents, PaymentSheet};
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::stores::{AddressStore, CartStore, OrderLog, SessionStore, WishlistStore};

/// Terminal outcome of a checkout attempt.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Payment confirmed; the order was recorded and the cart cleared.
    Completed(Order),
    /// The user dismissed the payment sheet; cart and history untouched.
    Canceled,
    /// The payment provider reported a failure; cart and history untouched.
    Failed(String),
    /// Checkout requires a logged-in user.
    NotLoggedIn,
    /// Nothing to pay for.
    EmptyCart,
}

/// Application state shared across the UI tree.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// stores and collaborator clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    session: SessionStore,
    cart: CartStore,
    orders: OrderLog,
    wishlist: WishlistStore,
    addresses: AddressStore,
    catalog: CatalogClient,
    payments: Arc<dyn PaymentIntents>,
    geocoder: Option<ReverseGeocoder>,
}

impl AppState {
    /// Load configuration from the environment and build the state.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing/invalid or the storage
    /// file cannot be opened.
    pub async fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?).await
    }

    /// Build the state from a configuration.
    ///
    /// Opens file-backed storage when a storage path is configured,
    /// memory-only storage otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file cannot be opened or the HTTP
    /// client fails to initialize.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let storage: Arc<dyn Storage> = match &config.storage_path {
            Some(path) => Arc::new(FileStorage::open(path.clone()).await?),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::with_storage(config, storage).await
    }

    /// Build the state over the given storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize or the
    /// persisted settings cannot be read.
    pub async fn with_storage(config: ClientConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(AppError::Init)?;

        let payments: Arc<dyn PaymentIntents> =
            Arc::new(PaymentClient::new(http.clone(), config.payment_url.clone()));
        let geocoder = config.geocoding.api_key.clone().map(|key: SecretString| {
            ReverseGeocoder::new(http.clone(), config.geocoding.base_url.clone(), key)
        });

        Self::with_collaborators(config, storage, http, payments, geocoder).await
    }

    /// Build the state with explicit collaborators (used by tests to inject
    /// doubles).
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted settings cannot be read.
    pub async fn with_collaborators(
        config: ClientConfig,
        storage: Arc<dyn Storage>,
        http: reqwest::Client,
        payments: Arc<dyn PaymentIntents>,
        geocoder: Option<ReverseGeocoder>,
    ) -> Result<Self> {
        let catalog = CatalogClient::new(http, &config.commerce);
        let session = SessionStore::new(Arc::clone(&storage));
        session.load().await?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                session,
                cart: CartStore::new(),
                orders: OrderLog::new(Arc::clone(&storage)),
                wishlist: WishlistStore::new(Arc::clone(&storage)),
                addresses: AddressStore::new(storage),
                catalog,
                payments,
                geocoder,
                config,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the order recorder.
    #[must_use]
    pub fn orders(&self) -> &OrderLog {
        &self.inner.orders
    }

    /// Get a reference to the wishlist store.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }

    /// Get a reference to the address store.
    #[must_use]
    pub fn addresses(&self) -> &AddressStore {
        &self.inner.addresses
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the payment backend.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentIntents {
        self.inner.payments.as_ref()
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Log in and load the user's persisted collections.
    ///
    /// # Errors
    ///
    /// Propagates storage failures; a rejected credential pair is
    /// `Ok(false)`.
    pub async fn login(&self, identifier: &str, credential: &str) -> Result<bool> {
        if !self.inner.session.login(identifier, credential).await? {
            return Ok(false);
        }
        self.reload_user_collections().await?;
        Ok(true)
    }

    /// Sign up and load the user's persisted collections.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn signup(&self, identifier: &str, credential: &str) -> Result<bool> {
        if !self.inner.session.signup(identifier, credential).await? {
            return Ok(false);
        }
        self.reload_user_collections().await?;
        Ok(true)
    }

    /// Log out, dropping the in-memory per-user collections. Their persisted
    /// copies survive for the next login.
    pub async fn logout(&self) {
        self.inner.session.logout().await;
        self.inner.wishlist.clear_session().await;
        self.inner.addresses.clear_session().await;
    }

    /// Re-login as the last registered identity after a successful biometric
    /// prompt.
    ///
    /// Returns `Ok(false)` when biometric login is disabled, no identity is
    /// saved, or the prompt did not succeed.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn biometric_login(
        &self,
        authenticator: &dyn BiometricAuthenticator,
    ) -> Result<bool> {
        if !self.inner.session.biometrics_enabled().await {
            return Ok(false);
        }
        let Some(email) = self.inner.session.last_registered_email().await? else {
            return Ok(false);
        };

        match authenticator.try_authenticate("Login with biometrics").await {
            BiometricOutcome::Success => self.login(email.as_str(), "biometric").await,
            outcome => {
                tracing::debug!(?outcome, "biometric login not completed");
                Ok(false)
            }
        }
    }

    /// Fresh collections must be loaded before the new session touches them;
    /// the previous user's in-memory copies are replaced wholesale.
    async fn reload_user_collections(&self) -> Result<()> {
        let Some(user) = self.inner.session.current_user().await else {
            return Ok(());
        };
        self.inner.wishlist.load(&user).await?;
        self.inner.addresses.load(&user).await?;
        Ok(())
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Record the current cart as an order for the logged-in user, leaving
    /// the cart untouched.
    ///
    /// # Errors
    ///
    /// Propagates storage and money arithmetic failures.
    pub async fn complete_order(&self) -> Result<Option<Order>> {
        self.inner
            .orders
            .complete_order(&self.inner.session, &self.inner.cart)
            .await
    }

    /// Run the full checkout flow: create a payment intent for the cart
    /// total, present the hosted payment sheet, and on confirmation record
    /// the order and clear the cart. On cancel or failure nothing changes.
    ///
    /// # Errors
    ///
    /// Propagates intent-creation, storage, and money arithmetic failures.
    pub async fn checkout(&self, sheet: &dyn PaymentSheet) -> Result<CheckoutOutcome> {
        if !self.inner.session.is_logged_in().await {
            return Ok(CheckoutOutcome::NotLoggedIn);
        }

        let snapshot = self.inner.cart.snapshot().await?;
        if snapshot.lines.is_empty() {
            return Ok(CheckoutOutcome::EmptyCart);
        }

        let intent = self
            .inner
            .payments
            .create_intent(snapshot.total, None)
            .await?;

        match sheet.present(&intent).await {
            PaymentOutcome::Completed => match self.complete_order().await? {
                Some(order) => {
                    // Clear only after the order is durably recorded.
                    self.inner.cart.clear().await;
                    Ok(CheckoutOutcome::Completed(order))
                }
                None => Ok(CheckoutOutcome::NotLoggedIn),
            },
            PaymentOutcome::Canceled => {
                tracing::info!("payment sheet dismissed, cart kept");
                Ok(CheckoutOutcome::Canceled)
            }
            PaymentOutcome::Failed(message) => {
                tracing::warn!(error = %message, "payment failed");
                Ok(CheckoutOutcome::Failed(message))
            }
        }
    }

    // =========================================================================
    // Address prefill
    // =========================================================================

    /// Suggest a shipping address from the device's position.
    ///
    /// Requests location permission if needed; returns `Ok(None)` when
    /// permission stays denied, no geocoding key is configured, or the
    /// service has no match for the coordinates.
    ///
    /// # Errors
    ///
    /// Propagates position and geocoding failures.
    pub async fn prefill_address(
        &self,
        location: &dyn LocationProvider,
    ) -> Result<Option<GeocodedAddress>> {
        let Some(geocoder) = &self.inner.geocoder else {
            tracing::debug!("address prefill skipped, no geocoding key configured");
            return Ok(None);
        };

        let mut permission = location.permission_status().await;
        if !permission.is_granted() {
            permission = location.request_permission().await;
        }
        if !permission.is_granted() {
            tracing::debug!("address prefill skipped, location permission denied");
            return Ok(None);
        }

        let position = location.current_position().await?;
        let suggestion = geocoder
            .reverse(position.latitude, position.longitude)
            .await?;
        Ok(suggestion)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    use sundrop_core::{CurrencyCode, CustomerId, Money, PermissionStatus, ProductId};

    use crate::config::{CommerceConfig, GeocodingConfig};
    use crate::device::location::{LocationError, Position};
    use crate::models::{CartItem, NewWishlistItem};
    use crate::payment::{PaymentError, PaymentIntent};
    use crate::storage::MemoryStorage;

    fn config() -> ClientConfig {
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
            http_timeout: std::time::Duration::from_secs(10),
        }
    }

    struct FakePayments {
        calls: AtomicU32,
        fail: bool,
    }

    impl FakePayments {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl PaymentIntents for FakePayments {
        async fn create_intent(
            &self,
            _amount: Money,
            _customer: Option<&CustomerId>,
        ) -> std::result::Result<PaymentIntent, PaymentError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                return Err(PaymentError::Status {
                    status: 500,
                    message: "boom".to_owned(),
                });
            }
            Ok(PaymentIntent::new(
                SecretString::from("pi_secret"),
                SecretString::from("ek"),
                CustomerId::new("cus_1"),
                "pk_test",
            ))
        }
    }

    struct FakeSheet(PaymentOutcome);

    #[async_trait]
    impl PaymentSheet for FakeSheet {
        async fn present(&self, _intent: &PaymentIntent) -> PaymentOutcome {
            self.0.clone()
        }
    }

    struct FakeAuthenticator(BiometricOutcome);

    #[async_trait]
    impl BiometricAuthenticator for FakeAuthenticator {
        fn supported(&self) -> bool {
            true
        }

        fn enrolled(&self) -> bool {
            true
        }

        async fn authenticate(&self, _prompt: &str) -> BiometricOutcome {
            self.0
        }
    }

    struct FakeLocation {
        permission: PermissionStatus,
        granted_on_request: bool,
    }

    #[async_trait]
    impl LocationProvider for FakeLocation {
        async fn permission_status(&self) -> PermissionStatus {
            self.permission
        }

        async fn request_permission(&self) -> PermissionStatus {
            if self.granted_on_request {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            }
        }

        async fn current_position(&self) -> std::result::Result<Position, LocationError> {
            Err(LocationError::Unavailable("no fix in tests".to_owned()))
        }
    }

    async fn app() -> AppState {
        app_with(Arc::new(FakePayments::new())).await
    }

    async fn app_with(payments: Arc<dyn PaymentIntents>) -> AppState {
        AppState::with_collaborators(
            config(),
            Arc::new(MemoryStorage::new()),
            reqwest::Client::new(),
            payments,
            None,
        )
        .await
        .unwrap()
    }

    fn line(id: &str, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: id.to_owned(),
            unit_price: Money::from_minor_units(cents, CurrencyCode::USD),
            quantity,
            thumbnail: None,
        }
    }

    #[tokio::test]
    async fn test_login_loads_and_logout_unloads_collections() {
        let app = app().await;
        assert!(app.login("a@x.com", "pw").await.unwrap());

        app.wishlist()
            .add(NewWishlistItem {
                id: ProductId::new("p1"),
                name: "Tea".to_owned(),
                price: Money::from_minor_units(500, CurrencyCode::USD),
                thumbnail: None,
            })
            .await
            .unwrap();
        assert_eq!(app.wishlist().items().await.len(), 1);

        app.logout().await;
        assert!(app.wishlist().items().await.is_empty());
        assert!(app.addresses().saved().await.is_none());

        // A different user must not see the first user's data.
        assert!(app.login("b@x.com", "pw").await.unwrap());
        assert!(app.wishlist().items().await.is_empty());

        // The original user gets their data back.
        app.logout().await;
        assert!(app.login("a@x.com", "pw").await.unwrap());
        assert_eq!(app.wishlist().items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_requires_login_and_lines() {
        let app = app().await;
        let sheet = FakeSheet(PaymentOutcome::Completed);

        assert!(matches!(
            app.checkout(&sheet).await.unwrap(),
            CheckoutOutcome::NotLoggedIn
        ));

        app.login("a@x.com", "pw").await.unwrap();
        assert!(matches!(
            app.checkout(&sheet).await.unwrap(),
            CheckoutOutcome::EmptyCart
        ));
    }

    #[tokio::test]
    async fn test_checkout_completed_records_order_and_clears_cart() {
        let app = app().await;
        app.login("a@x.com", "pw").await.unwrap();
        app.cart().add_item(line("p1", 1000, 2)).await;

        let outcome = app
            .checkout(&FakeSheet(PaymentOutcome::Completed))
            .await
            .unwrap();
        let CheckoutOutcome::Completed(order) = outcome else {
            panic!("expected completed checkout");
        };

        assert_eq!(order.total, Money::from_minor_units(2000, CurrencyCode::USD));
        assert!(app.cart().is_empty().await);
        assert_eq!(
            app.orders().orders(app.session()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_checkout_cancel_keeps_cart_and_history() {
        let app = app().await;
        app.login("a@x.com", "pw").await.unwrap();
        app.cart().add_item(line("p1", 1000, 1)).await;

        let outcome = app
            .checkout(&FakeSheet(PaymentOutcome::Canceled))
            .await
            .unwrap();
        assert!(matches!(outcome, CheckoutOutcome::Canceled));
        assert_eq!(app.cart().items().await.len(), 1);
        assert!(app.orders().orders(app.session()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_surfaces_intent_failure() {
        let payments = Arc::new(FakePayments {
            calls: AtomicU32::new(0),
            fail: true,
        });
        let app = app_with(payments).await;
        app.login("a@x.com", "pw").await.unwrap();
        app.cart().add_item(line("p1", 1000, 1)).await;

        let result = app.checkout(&FakeSheet(PaymentOutcome::Completed)).await;
        assert!(matches!(result, Err(AppError::Payment(_))));
        // Nothing was recorded and the cart survives for a retry.
        assert_eq!(app.cart().items().await.len(), 1);
        assert!(app.orders().orders(app.session()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_biometric_login_uses_saved_identity() {
        let app = app().await;
        app.login("a@x.com", "pw").await.unwrap();
        app.session().set_biometrics_enabled(true).await.unwrap();
        app.logout().await;

        let authenticator = FakeAuthenticator(BiometricOutcome::Success);
        assert!(app.biometric_login(&authenticator).await.unwrap());
        assert_eq!(
            app.session().current_user().await.unwrap().as_str(),
            "a@x.com"
        );
    }

    #[tokio::test]
    async fn test_biometric_login_respects_preference_and_outcome() {
        let app = app().await;
        app.login("a@x.com", "pw").await.unwrap();
        app.logout().await;

        // Preference off: never prompts.
        let authenticator = FakeAuthenticator(BiometricOutcome::Success);
        assert!(!app.biometric_login(&authenticator).await.unwrap());

        app.session().set_biometrics_enabled(true).await.unwrap();
        let cancelled = FakeAuthenticator(BiometricOutcome::Cancelled);
        assert!(!app.biometric_login(&cancelled).await.unwrap());
        assert!(!app.session().is_logged_in().await);
    }

    #[tokio::test]
    async fn test_prefill_without_geocoder_is_none() {
        let app = app().await;
        let location = FakeLocation {
            permission: PermissionStatus::Granted,
            granted_on_request: false,
        };
        assert!(app.prefill_address(&location).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prefill_stops_on_denied_permission() {
        let geocoder = ReverseGeocoder::new(
            reqwest::Client::new(),
            "http://localhost:9000",
            SecretString::from("test-key"),
        );
        let app = AppState::with_collaborators(
            config(),
            Arc::new(MemoryStorage::new()),
            reqwest::Client::new(),
            Arc::new(FakePayments::new()),
            Some(geocoder),
        )
        .await
        .unwrap();

        let location = FakeLocation {
            permission: PermissionStatus::Undetermined,
            granted_on_request: false,
        };
        assert!(app.prefill_address(&location).await.unwrap().is_none());
    }
}
