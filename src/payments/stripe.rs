//! Stripe-backed payment gateway.
//!
//! Talks to the `PaymentIntents` endpoint of the Stripe REST API with the
//! secret key as a bearer credential. Card is the only accepted method and
//! the currency is fixed; the amount is caller-supplied minor units.

use super::{CURRENCY, GatewayError, PaymentGateway, PaymentIntent, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PAYMENT_INTENTS_URL: &str = "https://api.stripe.com/v1/payment_intents";

/// Stripe payment gateway.
#[derive(Clone)]
pub struct StripeGateway {
    http_client: Client,
    secret_key: String,
}

impl StripeGateway {
    /// Create a gateway with the account's secret API key.
    #[must_use]
    pub fn new(secret_key: String) -> Self {
        Self {
            http_client: Client::new(),
            secret_key,
        }
    }
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The API key stays out of logs.
        f.debug_struct("StripeGateway").finish_non_exhaustive()
    }
}

/// Stripe's payment-intent response, reduced to what the core consumes.
#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    client_secret: String,
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(&self, amount: u64) -> Result<PaymentIntent> {
        // Stripe takes form-encoded bodies; method types use array syntax.
        let params = [
            ("amount", amount.to_string()),
            ("currency", CURRENCY.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .http_client
            .post(PAYMENT_INTENTS_URL)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| GatewayError::Provider(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Stripe rejected payment intent creation");
            return Err(GatewayError::Provider(format!(
                "payment intent creation failed with status {status}: {body}"
            )));
        }

        let intent: PaymentIntentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Provider(format!("malformed response: {e}")))?;

        Ok(PaymentIntent {
            client_secret: intent.client_secret,
        })
    }
}
