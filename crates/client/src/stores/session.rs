//! Session and authentication state.
//!
//! Authentication is simulated: any non-empty identifier/credential pair is
//! accepted and the identifier becomes the account identity. There is no
//! account database; a user exists as soon as something is persisted under
//! their email. Sign-up is behaviorally identical to login and kept as a
//! separate method only so call sites read like the flows they implement.

use std::sync::Arc;

use tokio::sync::RwLock;

use sundrop_core::Email;

use crate::storage::{self, Storage, StorageError, StorageKey};

/// Holds the current logged-in identity and the device-wide login settings.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    current: RwLock<Option<Email>>,
    biometrics_enabled: RwLock<bool>,
}

impl SessionStore {
    /// Create a session store with no user logged in.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
            biometrics_enabled: RwLock::new(false),
        }
    }

    /// Load device-wide settings from storage. Called once at process start.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn load(&self) -> Result<(), StorageError> {
        let enabled: Option<bool> =
            storage::read_json(self.storage.as_ref(), &StorageKey::BiometricsEnabled).await?;
        *self.biometrics_enabled.write().await = enabled.unwrap_or(false);
        Ok(())
    }

    /// Log in with an identifier and credential.
    ///
    /// Succeeds whenever both inputs are non-empty; there is no credential
    /// verification. On success the identifier becomes the current user and
    /// is recorded as the last-registered email for biometric re-login.
    ///
    /// # Errors
    ///
    /// Propagates storage failures; a rejected credential pair is `Ok(false)`,
    /// not an error.
    pub async fn login(&self, identifier: &str, credential: &str) -> Result<bool, StorageError> {
        self.authenticate(identifier, credential, "login").await
    }

    /// Sign up with an identifier and credential.
    ///
    /// Same contract as [`login`](Self::login): no duplicate detection, no
    /// separate account store.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn signup(&self, identifier: &str, credential: &str) -> Result<bool, StorageError> {
        self.authenticate(identifier, credential, "signup").await
    }

    async fn authenticate(
        &self,
        identifier: &str,
        credential: &str,
        flow: &'static str,
    ) -> Result<bool, StorageError> {
        if credential.is_empty() {
            return Ok(false);
        }
        let Ok(email) = Email::parse(identifier) else {
            return Ok(false);
        };

        storage::write_json(
            self.storage.as_ref(),
            &StorageKey::LastRegisteredEmail,
            email.as_str(),
        )
        .await?;

        *self.current.write().await = Some(email.clone());
        tracing::info!(user = %email, flow, "session started");
        Ok(true)
    }

    /// Clear the current-user reference.
    ///
    /// Persisted per-user collections are untouched, so logging back in
    /// restores them.
    pub async fn logout(&self) {
        let mut current = self.current.write().await;
        if let Some(user) = current.take() {
            tracing::info!(user = %user, "session ended");
        }
    }

    /// The currently logged-in identity, if any.
    pub async fn current_user(&self) -> Option<Email> {
        self.current.read().await.clone()
    }

    /// Whether a user is logged in.
    pub async fn is_logged_in(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Whether biometric login is enabled on this device.
    pub async fn biometrics_enabled(&self) -> bool {
        *self.biometrics_enabled.read().await
    }

    /// Persist the biometric-login preference.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn set_biometrics_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        let mut flag = self.biometrics_enabled.write().await;
        storage::write_json(
            self.storage.as_ref(),
            &StorageKey::BiometricsEnabled,
            &enabled,
        )
        .await?;
        *flag = enabled;
        Ok(())
    }

    /// The last identity that authenticated on this device, offered for
    /// biometric re-login.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn last_registered_email(&self) -> Result<Option<Email>, StorageError> {
        let raw: Option<String> =
            storage::read_json(self.storage.as_ref(), &StorageKey::LastRegisteredEmail).await?;
        Ok(raw.and_then(|s| Email::parse(&s).ok()))
    }
}
