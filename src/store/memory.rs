//! In-memory store for tests and development.
//!
//! Mirrors the PostgreSQL store's observable behavior, including the unique
//! (email, treatment, date) constraint on bookings, so the integration suite
//! exercises the same conflict paths without a database.

use super::{
    BookingRepository, DoctorRoster, PaymentRepository, Result, StoreError, TreatmentCatalog,
    UserDirectory,
};
use crate::types::{
    Booking, BookingId, Doctor, DoctorId, Payment, Role, TreatmentOption, User, UserId,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared in-memory collections behind one handle.
///
/// Clones share state, the same way `PgStore` clones share a pool.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
}

#[derive(Debug, Default)]
struct Collections {
    catalog: Vec<TreatmentOption>,
    bookings: Vec<Booking>,
    payments: Vec<Payment>,
    users: Vec<User>,
    doctors: Vec<Doctor>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a treatment catalog.
    #[must_use]
    pub fn with_catalog(catalog: Vec<TreatmentOption>) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.lock() {
            inner.catalog = catalog;
        }
        store
    }

    /// Register a user directly, bypassing the HTTP surface.
    ///
    /// Test setup helper for seeding identities and administrators.
    pub fn seed_user(&self, email: &str, role: Role) -> UserId {
        let mut user = User::new(email, None);
        user.role = role;
        let id = user.id;
        if let Ok(mut inner) = self.inner.lock() {
            inner.users.push(user);
        }
        id
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Database("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl TreatmentCatalog for MemoryStore {
    async fn list(&self) -> Result<Vec<TreatmentOption>> {
        Ok(self.lock()?.catalog.clone())
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        Ok(self
            .lock()?
            .catalog
            .iter()
            .map(|option| option.name.clone())
            .collect())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        let mut inner = self.lock()?;
        let duplicate = inner.bookings.iter().any(|existing| {
            existing.email == booking.email
                && existing.treatment == booking.treatment
                && existing.appointment_date == booking.appointment_date
        });
        if duplicate {
            return Err(StoreError::Conflict);
        }
        inner.bookings.push(booking.clone());
        Ok(())
    }

    async fn find_on_date(&self, date: &str) -> Result<Vec<Booking>> {
        Ok(self
            .lock()?
            .bookings
            .iter()
            .filter(|booking| booking.appointment_date == date)
            .cloned()
            .collect())
    }

    async fn find_matching(
        &self,
        email: &str,
        treatment: &str,
        date: &str,
    ) -> Result<Vec<Booking>> {
        Ok(self
            .lock()?
            .bookings
            .iter()
            .filter(|booking| {
                booking.email == email
                    && booking.treatment == treatment
                    && booking.appointment_date == date
            })
            .cloned()
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Booking>> {
        Ok(self
            .lock()?
            .bookings
            .iter()
            .filter(|booking| booking.email == email)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self
            .lock()?
            .bookings
            .iter()
            .find(|booking| booking.id == id)
            .cloned())
    }

    async fn mark_paid(&self, id: BookingId, transaction_id: &str) -> Result<bool> {
        let mut inner = self.lock()?;
        match inner.bookings.iter_mut().find(|booking| booking.id == id) {
            Some(booking) => {
                booking.paid = true;
                booking.transaction_id = Some(transaction_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn insert(&self, payment: &Payment) -> Result<()> {
        self.lock()?.payments.push(payment.clone());
        Ok(())
    }

    async fn find_by_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>> {
        Ok(self
            .lock()?
            .payments
            .iter()
            .filter(|payment| payment.booking_id == booking_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn insert(&self, user: &User) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict);
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.lock()?.users.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.lock()?.users.iter().find(|user| user.id == id).cloned())
    }

    async fn grant_admin(&self, id: UserId) -> Result<bool> {
        let mut inner = self.lock()?;
        match inner.users.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                user.role = Role::Admin;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DoctorRoster for MemoryStore {
    async fn insert(&self, doctor: &Doctor) -> Result<()> {
        self.lock()?.doctors.push(doctor.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Doctor>> {
        Ok(self.lock()?.doctors.clone())
    }

    async fn delete(&self, id: DoctorId) -> Result<u64> {
        let mut inner = self.lock()?;
        let before = inner.doctors.len();
        inner.doctors.retain(|doctor| doctor.id != id);
        Ok((before - inner.doctors.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BookingRequest;

    fn booking(email: &str, treatment: &str, date: &str) -> Booking {
        Booking::from_request(BookingRequest {
            treatment: treatment.to_string(),
            appointment_date: date.to_string(),
            email: email.to_string(),
            slot: "9am".to_string(),
        })
    }

    #[tokio::test]
    async fn duplicate_triple_insert_is_a_conflict() {
        let store = MemoryStore::new();
        BookingRepository::insert(&store, &booking("a@x.com", "Checkup", "2024-01-01"))
            .await
            .expect("first insert");
        let err = BookingRepository::insert(&store, &booking("a@x.com", "Checkup", "2024-01-01"))
            .await
            .expect_err("duplicate triple");
        assert_eq!(err, StoreError::Conflict);
    }

    #[tokio::test]
    async fn mark_paid_on_unknown_booking_reports_false() {
        let store = MemoryStore::new();
        let updated = store
            .mark_paid(BookingId::new(), "txn_1")
            .await
            .expect("mark paid");
        assert!(!updated);
    }

    #[tokio::test]
    async fn grant_admin_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.seed_user("boss@x.com", Role::Admin);
        assert!(store.grant_admin(id).await.expect("grant"));
        let user = UserDirectory::find_by_id(&store, id)
            .await
            .expect("lookup")
            .expect("user exists");
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn duplicate_email_registration_is_a_conflict() {
        let store = MemoryStore::new();
        UserDirectory::insert(&store, &User::new("a@x.com", None))
            .await
            .expect("first registration");
        let err = UserDirectory::insert(&store, &User::new("a@x.com", Some("again".to_string())))
            .await
            .expect_err("duplicate email");
        assert_eq!(err, StoreError::Conflict);
    }
}
