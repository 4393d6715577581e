//! Storage adapters.
//!
//! One repository trait per entity collection. The traits are interfaces,
//! not implementations: handlers depend on `Arc<dyn …>` handles so the
//! PostgreSQL-backed store and the in-memory test store are interchangeable.
//! The backing store is the single source of truth: no entity is cached
//! in-process across requests, since availability and conflict checks must
//! see the latest committed state.

use crate::types::{
    Booking, BookingId, Doctor, DoctorId, Payment, TreatmentOption, User, UserId,
};
use async_trait::async_trait;
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflicting record already exists")]
    Conflict,
    /// Query execution failed.
    #[error("database error: {0}")]
    Database(String),
}

/// Read access to the treatment catalog.
///
/// The catalog has no mutation surface here: options are seeded data, and
/// per-date slot availability is derived per request, never written back.
#[async_trait]
pub trait TreatmentCatalog: Send + Sync {
    /// All treatment options with their master slot lists.
    async fn list(&self) -> Result<Vec<TreatmentOption>>;

    /// Treatment names only (the specialty projection).
    async fn list_names(&self) -> Result<Vec<String>>;
}

/// Create/read access to bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking.
    ///
    /// Returns [`StoreError::Conflict`] when a booking with the same
    /// (email, treatment, date) triple already exists, the storage-level
    /// backstop for the conflict guard's non-atomic check-then-insert.
    async fn insert(&self, booking: &Booking) -> Result<()>;

    /// All bookings on a date, across treatments and requesters.
    async fn find_on_date(&self, date: &str) -> Result<Vec<Booking>>;

    /// Bookings matching the conflict triple exactly.
    async fn find_matching(&self, email: &str, treatment: &str, date: &str)
    -> Result<Vec<Booking>>;

    /// All bookings made by one requester.
    async fn find_by_email(&self, email: &str) -> Result<Vec<Booking>>;

    /// Single booking lookup, for payment linkage.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>>;

    /// Mark a booking paid with its transaction reference.
    ///
    /// Returns `false` when no booking with that id exists.
    async fn mark_paid(&self, id: BookingId, transaction_id: &str) -> Result<bool>;
}

/// Append-only payment records.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Record a settled payment. Payments are immutable once inserted.
    async fn insert(&self, payment: &Payment) -> Result<()>;

    /// Payments recorded against a booking (expected unique in practice).
    async fn find_by_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>>;
}

/// User accounts and role state.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a user. Email is the natural key.
    async fn insert(&self, user: &User) -> Result<()>;

    /// All registered users.
    async fn list(&self) -> Result<Vec<User>>;

    /// Lookup by the natural key.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lookup by generated id (the elevation operation is keyed by id).
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Elevate a user to administrator.
    ///
    /// Idempotent: elevating an existing administrator is a no-op success.
    /// Returns `false` when no user with that id exists.
    async fn grant_admin(&self, id: UserId) -> Result<bool>;
}

/// Practitioner roster, administrator-managed.
#[async_trait]
pub trait DoctorRoster: Send + Sync {
    /// Add a practitioner.
    async fn insert(&self, doctor: &Doctor) -> Result<()>;

    /// All practitioners.
    async fn list(&self) -> Result<Vec<Doctor>>;

    /// Remove a practitioner. Returns the number of rows removed (0 or 1).
    async fn delete(&self, id: DoctorId) -> Result<u64>;
}
