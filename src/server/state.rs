//! Application state shared across HTTP handlers.

use crate::auth::TokenSigner;
use crate::payments::PaymentGateway;
use crate::store::{
    BookingRepository, DoctorRoster, PaymentRepository, PgStore, TreatmentCatalog, UserDirectory,
};
use std::sync::Arc;

/// Shared resources for the HTTP handlers, cloned cheaply per request.
///
/// Repositories are trait objects so the PostgreSQL store and the in-memory
/// test store are interchangeable; the payment gateway likewise. The token
/// signer holds the process-wide credential secret.
#[derive(Clone)]
pub struct AppState {
    /// Treatment catalog reads
    pub catalog: Arc<dyn TreatmentCatalog>,
    /// Booking create/read
    pub bookings: Arc<dyn BookingRepository>,
    /// Payment records
    pub payments: Arc<dyn PaymentRepository>,
    /// User accounts and roles
    pub users: Arc<dyn UserDirectory>,
    /// Practitioner roster
    pub doctors: Arc<dyn DoctorRoster>,
    /// External payment provider
    pub gateway: Arc<dyn PaymentGateway>,
    /// Credential issuing/verification
    pub signer: TokenSigner,
}

impl AppState {
    /// Build state over the PostgreSQL store.
    #[must_use]
    pub fn new(store: PgStore, gateway: Arc<dyn PaymentGateway>, signer: TokenSigner) -> Self {
        Self {
            catalog: Arc::new(store.clone()),
            bookings: Arc::new(store.clone()),
            payments: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            doctors: Arc::new(store),
            gateway,
            signer,
        }
    }

    /// Build state over the in-memory store and the mock payment gateway.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn in_memory(store: crate::store::MemoryStore, signer: TokenSigner) -> Self {
        Self {
            catalog: Arc::new(store.clone()),
            bookings: Arc::new(store.clone()),
            payments: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            doctors: Arc::new(store),
            gateway: Arc::new(crate::payments::MockPaymentGateway::new()),
            signer,
        }
    }
}
