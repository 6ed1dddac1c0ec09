//! Outcome enums for device and payment collaborators.
//!
//! The client only ever consumes terminal outcomes from the platform SDKs it
//! wraps; cancellation and timeout handling happen inside the SDKs.

use serde::{Deserialize, Serialize};

/// Terminal outcome of a biometric authentication prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiometricOutcome {
    /// The user authenticated successfully.
    Success,
    /// The user (or system) dismissed the prompt.
    Cancelled,
    /// The device has no biometric hardware.
    NotSupported,
    /// Hardware exists but no biometrics are enrolled.
    NotEnrolled,
    /// The SDK reported a failure.
    Error,
}

/// Terminal outcome of a hosted payment sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOutcome {
    /// Payment confirmed by the provider.
    Completed,
    /// The user dismissed the sheet.
    Canceled,
    /// The provider reported a failure.
    Failed(String),
}

/// Platform permission state for a device capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Permission has not been requested yet.
    #[default]
    Undetermined,
    /// The user granted permission.
    Granted,
    /// The user denied permission.
    Denied,
}

impl PermissionStatus {
    /// Whether the capability may be used.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_biometric_outcome_serde() {
        let json = serde_json::to_string(&BiometricOutcome::NotEnrolled).unwrap();
        assert_eq!(json, "\"NOT_ENROLLED\"");
    }

    #[test]
    fn test_permission_granted() {
        assert!(PermissionStatus::Granted.is_granted());
        assert!(!PermissionStatus::Undetermined.is_granted());
        assert!(!PermissionStatus::Denied.is_granted());
    }
}
