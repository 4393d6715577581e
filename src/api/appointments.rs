//! Treatment catalog queries.
//!
//! - GET /appointmentOptions?date=D: catalog with per-date remaining slots
//! - GET /appointmentSpecialty: catalog names only

use crate::availability;
use crate::error::AppError;
use crate::server::state::AppState;
use crate::types::TreatmentOption;
use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};

/// Query string for the availability endpoint.
#[derive(Debug, Deserialize)]
pub struct OptionsQuery {
    /// Date filter key, carried verbatim; absent behaves like a date with no
    /// bookings.
    #[serde(default)]
    pub date: String,
}

/// Catalog with per-date remaining slots.
///
/// The remaining-slot view is derived per request; nothing is written back
/// to the catalog.
///
/// # Example
///
/// ```bash
/// curl 'http://localhost:5000/appointmentOptions?date=2024-01-01'
/// ```
pub async fn list_options(
    State(state): State<AppState>,
    Query(query): Query<OptionsQuery>,
) -> Result<Json<Vec<TreatmentOption>>, AppError> {
    let catalog = state.catalog.list().await?;
    let booked = state.bookings.find_on_date(&query.date).await?;

    Ok(Json(availability::remaining_options(catalog, &booked)))
}

/// A catalog entry projected to its name.
#[derive(Debug, Serialize)]
pub struct Specialty {
    /// Treatment name
    pub name: String,
}

/// Catalog names only (the specialty list).
pub async fn list_specialties(
    State(state): State<AppState>,
) -> Result<Json<Vec<Specialty>>, AppError> {
    let names = state.catalog.list_names().await?;

    Ok(Json(names.into_iter().map(|name| Specialty { name }).collect()))
}
