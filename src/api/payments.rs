//! Payment reconciliation endpoints.
//!
//! Two independent operations linked by a booking id, invoked in sequence
//! by the client but served as separate calls with no shared transaction:
//!
//! - POST /create-payment-intent: pre-payment; obtains the provider's
//!   client secret for price × 100 minor units.
//! - POST /payments: post-payment settlement; records the Payment and
//!   marks the referenced Booking paid.

use crate::error::AppError;
use crate::payments::PaymentIntent;
use crate::server::state::AppState;
use crate::types::{BookingId, Payment, PaymentId};
use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for payment-intent creation.
#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    /// Treatment price in major currency units.
    pub price: u64,
}

/// Create a payment intent with the external provider.
///
/// Pure delegation: the amount is the caller-supplied price converted to
/// minor units, the currency is fixed. Only the client secret is returned.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreateIntentRequest>,
) -> Result<Json<PaymentIntent>, AppError> {
    let amount = request.price.saturating_mul(100);
    let intent = state.gateway.create_payment_intent(amount).await?;

    Ok(Json(intent))
}

/// Request body for settlement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    /// The booking being settled.
    pub booking_id: Uuid,
    /// Provider transaction reference.
    pub transaction_id: String,
    /// Amount charged, in minor currency units.
    pub amount: i64,
}

/// Settlement acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleAck {
    /// Whether the payment was recorded.
    pub acknowledged: bool,
    /// Identity of the recorded payment.
    pub inserted_id: PaymentId,
}

/// Record a completed payment and mark its booking paid.
///
/// The booking must exist; orphan payments are refused with 404. The two
/// writes (insert Payment, update Booking) are not one transaction: a
/// concurrent reader may observe the payment row before the booking flips
/// paid. That transient window is inherent to the protocol; neither write
/// is retried or compensated.
pub async fn settle(
    State(state): State<AppState>,
    Json(request): Json<SettleRequest>,
) -> Result<Json<SettleAck>, AppError> {
    let booking_id = BookingId::from_uuid(request.booking_id);

    state
        .bookings
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

    let payment = Payment {
        id: PaymentId::new(),
        booking_id,
        transaction_id: request.transaction_id.clone(),
        amount: request.amount,
        created_at: Utc::now(),
    };

    state.payments.insert(&payment).await?;

    let updated = state
        .bookings
        .mark_paid(booking_id, &request.transaction_id)
        .await?;
    if updated {
        tracing::info!(
            booking_id = %booking_id,
            payment_id = %payment.id,
            "Payment settled"
        );
    } else {
        // The booking vanished between the existence check and the update;
        // the payment row stands and the settlement is still acknowledged.
        tracing::warn!(
            booking_id = %booking_id,
            payment_id = %payment.id,
            "Payment recorded but booking update matched no row"
        );
    }

    Ok(Json(SettleAck {
        acknowledged: true,
        inserted_id: payment.id,
    }))
}
