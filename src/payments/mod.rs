//! Payment provider integration.
//!
//! The pre-payment half of the reconciliation protocol: a payment intent is
//! created with the external provider and its client secret handed back to
//! the caller, who completes the charge out of band and then posts the
//! settlement. The provider is abstracted behind [`PaymentGateway`] so the
//! Stripe-backed implementation and the always-succeeding mock are
//! interchangeable.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod stripe;

pub use stripe::StripeGateway;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockPaymentGateway;

/// Fixed settlement currency.
pub const CURRENCY: &str = "usd";

/// Payment gateway failures.
#[derive(Debug, Error, Clone)]
pub enum GatewayError {
    /// The provider rejected or failed the request.
    #[error("payment provider error: {0}")]
    Provider(String),
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// A created payment intent.
///
/// Only the client secret crosses back to the caller; everything else about
/// the intent lives with the provider.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Secret the client uses to confirm the payment with the provider.
    pub client_secret: String,
}

/// Abstraction over payment-intent–creating providers (Stripe and friends).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the given amount in minor units.
    ///
    /// # Errors
    ///
    /// Returns error when the provider call fails; no retry is attempted.
    async fn create_payment_intent(&self, amount: u64) -> Result<PaymentIntent>;
}

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use super::{PaymentGateway, PaymentIntent, Result};
    use async_trait::async_trait;

    /// Mock payment gateway (always succeeds for development and tests).
    #[derive(Clone, Debug, Default)]
    pub struct MockPaymentGateway;

    impl MockPaymentGateway {
        /// Creates a new mock payment gateway.
        #[must_use]
        pub const fn new() -> Self {
            Self
        }
    }

    #[async_trait]
    impl PaymentGateway for MockPaymentGateway {
        async fn create_payment_intent(&self, amount: u64) -> Result<PaymentIntent> {
            let client_secret =
                format!("pi_mock_{}_secret_{}", uuid::Uuid::new_v4().simple(), amount);

            tracing::info!(amount, client_secret = %client_secret, "Mock payment intent created");

            Ok(PaymentIntent { client_secret })
        }
    }
}
