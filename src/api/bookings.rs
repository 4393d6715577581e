//! Booking lifecycle endpoints.
//!
//! - POST /bookings: public; conflict-guarded creation
//! - GET /bookings?email=E: authenticated; caller email must match
//! - GET /bookings/:id: public; single lookup for payment linkage

use crate::auth::AuthenticatedUser;
use crate::booking::{self, BookingAck, BookingDecision};
use crate::error::AppError;
use crate::server::state::AppState;
use crate::store::StoreError;
use crate::types::{Booking, BookingId, BookingRequest};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

/// Create a booking.
///
/// The conflict guard reads the requester's existing bookings and rejects a
/// duplicate (email, treatment, date) triple with a message naming the date.
/// The read-decide-insert sequence is not atomic, so the storage layer's
/// unique index backstops it: losing the race surfaces as the same rejection
/// acknowledgement. Rejection is not an HTTP error: the response is 200
/// with `acknowledged: false`.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<BookingAck>, AppError> {
    let existing = state
        .bookings
        .find_matching(&request.email, &request.treatment, &request.appointment_date)
        .await?;

    if let BookingDecision::Rejected { message } = booking::evaluate(&request, &existing) {
        return Ok(Json(BookingAck::rejected(message)));
    }

    let date = request.appointment_date.clone();
    let record = Booking::from_request(request);

    match state.bookings.insert(&record).await {
        Ok(()) => {
            tracing::info!(booking_id = %record.id, "Booking created");
            Ok(Json(BookingAck::accepted(record.id)))
        }
        // Concurrent duplicate that slipped past the guard.
        Err(StoreError::Conflict) => Ok(Json(BookingAck::rejected(format!(
            "You already have a booking on {date}"
        )))),
        Err(err) => Err(err.into()),
    }
}

/// Query string for the per-requester booking list.
#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    /// Requester email; must equal the authenticated caller's email.
    pub email: String,
}

/// List a requester's bookings.
///
/// Authenticated, and the caller may only read their own: a verified
/// credential for a different email is Forbidden.
pub async fn list_bookings(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    if query.email != user.email {
        return Err(AppError::forbidden("forbidden access"));
    }

    let bookings = state.bookings.find_by_email(&query.email).await?;

    Ok(Json(bookings))
}

/// Single booking lookup (public, used by the payment page).
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .bookings
        .find_by_id(BookingId::from_uuid(id))
        .await?
        .ok_or_else(|| AppError::not_found("Booking", id))?;

    Ok(Json(booking))
}
