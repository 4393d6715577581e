//! Per-date slot availability, derived from the catalog and existing bookings.
//!
//! This is a pure, request-scoped computation: nothing in storage is mutated.
//! For each treatment, the slots already consumed by bookings on the queried
//! date are subtracted from the treatment's master slot list, preserving the
//! master list's original ordering.

use crate::types::{Booking, TreatmentOption};
use std::collections::HashSet;

/// Compute the remaining bookable slots per treatment for one date.
///
/// `bookings_on_date` must already be restricted to the queried date; the
/// date itself is an opaque filter key and is not validated here. A date
/// with no bookings yields full master availability for every option, and a
/// treatment with zero master slots yields an empty (not absent) list.
///
/// Complexity is O(options × bookings-on-date), which is fine at catalog
/// scale.
#[must_use]
pub fn remaining_options(
    catalog: Vec<TreatmentOption>,
    bookings_on_date: &[Booking],
) -> Vec<TreatmentOption> {
    catalog
        .into_iter()
        .map(|option| remaining_for(option, bookings_on_date))
        .collect()
}

/// Subtract one treatment's booked slots from its master list.
fn remaining_for(mut option: TreatmentOption, bookings_on_date: &[Booking]) -> TreatmentOption {
    let booked: HashSet<&str> = bookings_on_date
        .iter()
        .filter(|booking| booking.treatment == option.name)
        .map(|booking| booking.slot.as_str())
        .collect();

    option.slots.retain(|slot| !booked.contains(slot.as_str()));
    option
}
