//! HTTP handlers.
//!
//! One module per resource, mirroring the route groups in
//! [`crate::server::routes`].

pub mod appointments;
pub mod bookings;
pub mod doctors;
pub mod payments;
pub mod users;
