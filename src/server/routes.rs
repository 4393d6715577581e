//! Router configuration.
//!
//! The route table mirrors the public API surface, with per-route auth
//! applied through extractors rather than middleware layers: handlers that
//! take `AuthenticatedUser` or `RequireAdmin` are gated, the rest are
//! public.

use super::health::{health_check, liveness};
use super::state::AppState;
use crate::api::{appointments, bookings, doctors, payments, users};
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(liveness))
        .route("/health", get(health_check))
        // Catalog (public)
        .route("/appointmentOptions", get(appointments::list_options))
        .route("/appointmentSpecialty", get(appointments::list_specialties))
        // Bookings
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings", get(bookings::list_bookings))
        .route("/bookings/:id", get(bookings::get_booking))
        // Payments
        .route("/payments", post(payments::settle))
        .route("/create-payment-intent", post(payments::create_payment_intent))
        // Users and credentials
        .route("/jwt", get(users::issue_token))
        .route("/users", post(users::create_user))
        .route("/users", get(users::list_users))
        // One registration: GET reads status by email, PUT elevates by id
        .route(
            "/users/admin/:key",
            get(users::admin_status).put(users::grant_admin),
        )
        // Practitioners (admin only)
        .route("/doctors", post(doctors::create_doctor))
        .route("/doctors", get(doctors::list_doctors))
        .route("/doctors/:id", delete(doctors::delete_doctor))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
