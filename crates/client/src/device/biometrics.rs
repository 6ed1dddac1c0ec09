//! Biometric authentication seam.

use async_trait::async_trait;

use sundrop_core::BiometricOutcome;

/// The platform's biometric authenticator.
#[async_trait]
pub trait BiometricAuthenticator: Send + Sync {
    /// Whether the device has biometric hardware.
    fn supported(&self) -> bool;

    /// Whether the user has enrolled biometrics.
    fn enrolled(&self) -> bool;

    /// Present the authentication prompt and wait for its outcome.
    async fn authenticate(&self, prompt: &str) -> BiometricOutcome;

    /// Authenticate after checking capability, mapping a missing capability
    /// to its outcome instead of prompting.
    async fn try_authenticate(&self, prompt: &str) -> BiometricOutcome {
        if !self.supported() {
            return BiometricOutcome::NotSupported;
        }
        if !self.enrolled() {
            return BiometricOutcome::NotEnrolled;
        }
        self.authenticate(prompt).await
    }
}
