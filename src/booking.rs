//! Booking conflict guard.
//!
//! A pure predicate deciding whether a booking request is accepted against
//! the requester's existing bookings. Uniqueness is on the triple
//! (email, treatment, appointment date); the requested slot plays no part.
//!
//! Acceptance does not re-validate that the requested slot is still in the
//! derived-available set; two different requesters can claim the same slot.
//! The check-then-insert sequence is also racy on its own, which is why the
//! storage layer additionally enforces a unique index on the triple.

use crate::types::{Booking, BookingRequest};
use serde::Serialize;

/// Outcome of evaluating a booking request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingDecision {
    /// No conflicting booking exists; the request may be persisted.
    Accepted,
    /// The requester already holds a booking for this treatment and date.
    Rejected {
        /// Human-readable reason, naming the conflicting date.
        message: String,
    },
}

/// Evaluate a booking request against existing bookings.
///
/// `existing` may be any superset of the requester's bookings; only entries
/// matching the full (email, treatment, date) triple cause rejection.
#[must_use]
pub fn evaluate(request: &BookingRequest, existing: &[Booking]) -> BookingDecision {
    let conflict = existing.iter().any(|booking| {
        booking.email == request.email
            && booking.treatment == request.treatment
            && booking.appointment_date == request.appointment_date
    });

    if conflict {
        BookingDecision::Rejected {
            message: format!(
                "You already have a booking on {}",
                request.appointment_date
            ),
        }
    } else {
        BookingDecision::Accepted
    }
}

/// Acknowledgement body returned by the booking endpoint.
///
/// Duplicate requests are not an HTTP error: the endpoint answers 200 with
/// `acknowledged: false` and the rejection message, which the booking form
/// surfaces as a toast.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingAck {
    /// Whether the booking was persisted.
    pub acknowledged: bool,
    /// Identity of the persisted booking, when acknowledged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_id: Option<crate::types::BookingId>,
    /// Rejection reason, when not acknowledged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BookingAck {
    /// Acknowledge a persisted booking.
    #[must_use]
    pub const fn accepted(id: crate::types::BookingId) -> Self {
        Self {
            acknowledged: true,
            inserted_id: Some(id),
            message: None,
        }
    }

    /// Report a rejected booking.
    #[must_use]
    pub const fn rejected(message: String) -> Self {
        Self {
            acknowledged: false,
            inserted_id: None,
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, treatment: &str, date: &str, slot: &str) -> BookingRequest {
        BookingRequest {
            treatment: treatment.to_string(),
            appointment_date: date.to_string(),
            email: email.to_string(),
            slot: slot.to_string(),
        }
    }

    fn booking(email: &str, treatment: &str, date: &str, slot: &str) -> Booking {
        Booking::from_request(request(email, treatment, date, slot))
    }

    #[test]
    fn first_booking_is_accepted() {
        let decision = evaluate(&request("a@x.com", "Checkup", "2024-01-01", "9am"), &[]);
        assert_eq!(decision, BookingDecision::Accepted);
    }

    #[test]
    fn same_triple_is_rejected_regardless_of_slot() {
        let existing = vec![booking("a@x.com", "Checkup", "2024-01-01", "9am")];
        let decision = evaluate(
            &request("a@x.com", "Checkup", "2024-01-01", "10am"),
            &existing,
        );
        let BookingDecision::Rejected { message } = decision else {
            panic!("expected rejection");
        };
        assert_eq!(message, "You already have a booking on 2024-01-01");
    }

    #[test]
    fn differing_email_is_accepted() {
        let existing = vec![booking("a@x.com", "Checkup", "2024-01-01", "9am")];
        let decision = evaluate(&request("b@x.com", "Checkup", "2024-01-01", "9am"), &existing);
        assert_eq!(decision, BookingDecision::Accepted);
    }

    #[test]
    fn differing_treatment_is_accepted() {
        let existing = vec![booking("a@x.com", "Checkup", "2024-01-01", "9am")];
        let decision = evaluate(&request("a@x.com", "Scaling", "2024-01-01", "9am"), &existing);
        assert_eq!(decision, BookingDecision::Accepted);
    }

    #[test]
    fn differing_date_is_accepted() {
        let existing = vec![booking("a@x.com", "Checkup", "2024-01-01", "9am")];
        let decision = evaluate(&request("a@x.com", "Checkup", "2024-01-02", "9am"), &existing);
        assert_eq!(decision, BookingDecision::Accepted);
    }

    #[test]
    fn unrelated_bookings_in_the_set_are_ignored() {
        let existing = vec![
            booking("b@x.com", "Checkup", "2024-01-01", "9am"),
            booking("a@x.com", "Scaling", "2024-01-01", "9am"),
        ];
        let decision = evaluate(&request("a@x.com", "Checkup", "2024-01-01", "9am"), &existing);
        assert_eq!(decision, BookingDecision::Accepted);
    }
}
