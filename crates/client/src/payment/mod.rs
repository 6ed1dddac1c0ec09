//! Payment collaborator.
//!
//! Payment happens in two halves: the backend creates a payment intent
//! (server-held provider credentials) and hands back the client pieces; the
//! platform's hosted payment sheet consumes them and reports a terminal
//! outcome. [`PaymentClient`] does the first half over HTTP; the sheet is
//! behind the [`PaymentSheet`] trait because it is pure vendor SDK.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use sundrop_core::{CustomerId, Money, PaymentOutcome};

/// Errors from payment-intent creation.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Transport-level failure.
    #[error("payment request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request.
    #[error("payment backend returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the backend, if it sent one.
        message: String,
    },

    /// The response body did not parse.
    #[error("failed to parse payment response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client-side pieces of a created payment intent.
///
/// The client secret and ephemeral key are sensitive: they are redacted from
/// `Debug` output and only exposed to the payment sheet implementation.
#[derive(Clone)]
pub struct PaymentIntent {
    client_secret: SecretString,
    ephemeral_key: SecretString,
    /// Provider customer reference.
    pub customer: CustomerId,
    /// Publishable key the sheet initializes with.
    pub publishable_key: String,
}

impl PaymentIntent {
    /// Assemble an intent from its client-side pieces.
    #[must_use]
    pub fn new(
        client_secret: SecretString,
        ephemeral_key: SecretString,
        customer: CustomerId,
        publishable_key: impl Into<String>,
    ) -> Self {
        Self {
            client_secret,
            ephemeral_key,
            customer,
            publishable_key: publishable_key.into(),
        }
    }

    /// The intent's client secret, consumed by the payment sheet.
    #[must_use]
    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    /// The customer-scoped ephemeral key, consumed by the payment sheet.
    #[must_use]
    pub fn ephemeral_key(&self) -> &SecretString {
        &self.ephemeral_key
    }
}

impl std::fmt::Debug for PaymentIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentIntent")
            .field("client_secret", &"[REDACTED]")
            .field("ephemeral_key", &"[REDACTED]")
            .field("customer", &self.customer)
            .field("publishable_key", &self.publishable_key)
            .finish()
    }
}

// Wire shape of the intent-creation response.
#[derive(Deserialize)]
struct PaymentIntentResponse {
    #[serde(rename = "paymentIntent")]
    payment_intent: SecretString,
    #[serde(rename = "ephemeralKey")]
    ephemeral_key: SecretString,
    customer: CustomerId,
    #[serde(rename = "publishableKey")]
    publishable_key: String,
}

#[derive(Deserialize)]
struct PaymentErrorResponse {
    #[serde(default)]
    message: String,
}

/// The hosted payment sheet the platform SDK presents.
///
/// Cancellation and timeout semantics live inside the SDK; implementations
/// only report the terminal outcome.
#[async_trait]
pub trait PaymentSheet: Send + Sync {
    /// Present the sheet for the given intent and wait for its outcome.
    async fn present(&self, intent: &PaymentIntent) -> PaymentOutcome;
}

/// Server-side intent creation, behind a trait so checkout can run against
/// a test double.
#[async_trait]
pub trait PaymentIntents: Send + Sync {
    /// Create a payment intent for the given amount.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` when the backend rejects or the transport
    /// fails.
    async fn create_intent(
        &self,
        amount: Money,
        customer: Option<&CustomerId>,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Client for the backend's payment-intent endpoint.
#[derive(Clone)]
pub struct PaymentClient {
    inner: Arc<PaymentClientInner>,
}

struct PaymentClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl PaymentClient {
    /// Create a new payment client sharing the given HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(PaymentClientInner {
                client,
                base_url: base_url.into(),
            }),
        }
    }
}

#[async_trait]
impl PaymentIntents for PaymentClient {
    /// Create a payment intent for the given amount.
    ///
    /// The amount is sent in minor units with a lowercase ISO currency code.
    /// Passing the provider customer reference from a previous intent reuses
    /// that customer.
    #[instrument(skip(self, customer), fields(amount = %amount))]
    async fn create_intent(
        &self,
        amount: Money,
        customer: Option<&CustomerId>,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/payment-intent", self.inner.base_url);
        let body = serde_json::json!({
            "amount": amount.amount_minor,
            "currency": amount.currency_code.code().to_ascii_lowercase(),
            "customer_id": customer.map(CustomerId::as_str),
        });

        let response = self.inner.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<PaymentErrorResponse>(&response_text)
                .map(|e| e.message)
                .unwrap_or_else(|_| response_text.chars().take(200).collect());
            tracing::error!(status = %status, message, "payment intent creation failed");
            return Err(PaymentError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: PaymentIntentResponse = serde_json::from_str(&response_text)?;
        Ok(PaymentIntent {
            client_secret: parsed.payment_intent,
            ephemeral_key: parsed.ephemeral_key,
            customer: parsed.customer,
            publishable_key: parsed.publishable_key,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_debug_redacts_secrets() {
        let intent = PaymentIntent {
            client_secret: SecretString::from("pi_secret_123"),
            ephemeral_key: SecretString::from("ek_456"),
            customer: CustomerId::new("cus_1"),
            publishable_key: "pk_test_1".to_owned(),
        };
        let rendered = format!("{intent:?}");
        assert!(!rendered.contains("pi_secret_123"));
        assert!(!rendered.contains("ek_456"));
        assert!(rendered.contains("pk_test_1"));
    }

    #[test]
    fn test_response_wire_shape() {
        let parsed: PaymentIntentResponse = serde_json::from_str(
            r#"{
                "paymentIntent": "pi_secret_123",
                "ephemeralKey": "ek_456",
                "customer": "cus_1",
                "publishableKey": "pk_test_1"
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.customer, CustomerId::new("cus_1"));
        assert_eq!(parsed.publishable_key, "pk_test_1");
    }
}
