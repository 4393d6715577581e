//! Doctors Portal - appointment booking service for a dental practice.
//!
//! An HTTP API that lets patients browse a fixed catalog of treatments,
//! book appointment slots for a chosen date, and pay for bookings, with an
//! administrative tier for managing practitioners and user roles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  HTTP API (axum)                    │
//! │  appointments │ bookings │ payments │ users │ docs  │
//! └───────┬──────────────┬───────────────┬──────────────┘
//!         │              │               │
//!         ▼              ▼               ▼
//!   availability      booking        payments
//!   (slot math)    (conflict guard) (gateway trait)
//!         │              │               │
//!         └──────────────┴───────────────┘
//!                        │
//!                 store traits
//!            (Postgres / in-memory)
//! ```
//!
//! # Key behaviors
//!
//! - **Availability**: remaining slots for a date are the catalog's master
//!   slot lists minus the slots already booked on that date, computed per
//!   treatment and preserving slot order.
//! - **Conflict guard**: one booking per (email, treatment, date) triple.
//!   A duplicate attempt is a 200 response with `acknowledged: false` and
//!   an explanatory message, not an error.
//! - **Payments**: a two-step flow. Create a payment intent for the
//!   client, then settle by recording the payment and marking the booking
//!   paid.
//! - **Auth**: a two-stage gate. Bearer extraction and signature
//!   verification first (401 missing, 403 invalid), then an optional
//!   role lookup for administrator-only routes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod config;
pub mod error;
pub mod payments;
pub mod server;
pub mod store;
pub mod types;
