//! PostgreSQL store.
//!
//! One handle over a connection pool implements every repository trait.
//! Queries are runtime-checked (`sqlx::query`) so the crate builds without a
//! live database. The bookings table carries a unique index over
//! (email, treatment, appointment_date): the storage-level enforcement of
//! the booking-uniqueness invariant that the conflict guard's
//! check-then-insert cannot guarantee under concurrency.

use super::{
    BookingRepository, DoctorRoster, PaymentRepository, Result, StoreError, TreatmentCatalog,
    UserDirectory,
};
use crate::types::{
    Booking, BookingId, Doctor, DoctorId, Payment, PaymentId, Role, TreatmentOption, User, UserId,
};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    /// Connection pool, shared by clone.
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run embedded database migrations.
    ///
    /// # Errors
    ///
    /// Returns error if a migration fails to apply.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {e}")))?;
        Ok(())
    }
}

fn db_err(context: &str, e: &sqlx::Error) -> StoreError {
    StoreError::Database(format!("{context}: {e}"))
}

fn booking_from_row(row: &PgRow) -> Booking {
    Booking {
        id: BookingId::from_uuid(row.get("id")),
        treatment: row.get("treatment"),
        appointment_date: row.get("appointment_date"),
        email: row.get("email"),
        slot: row.get("slot"),
        paid: row.get("paid"),
        transaction_id: row.get("transaction_id"),
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: UserId::from_uuid(row.get("id")),
        email: row.get("email"),
        name: row.get("name"),
        role: Role::from_str_lossy(row.get::<String, _>("role").as_str()),
    }
}

#[async_trait]
impl TreatmentCatalog for PgStore {
    async fn list(&self) -> Result<Vec<TreatmentOption>> {
        let rows = sqlx::query(
            "SELECT name, price, slots FROM treatment_options ORDER BY position, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("failed to list treatment options", &e))?;

        Ok(rows
            .iter()
            .map(|row| TreatmentOption {
                name: row.get("name"),
                price: row.get::<i64, _>("price").unsigned_abs(),
                slots: row.get("slots"),
            })
            .collect())
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        let rows =
            sqlx::query("SELECT name FROM treatment_options ORDER BY position, name")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_err("failed to list treatment names", &e))?;

        Ok(rows.iter().map(|row| row.get("name")).collect())
    }
}

#[async_trait]
impl BookingRepository for PgStore {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO bookings
                (id, treatment, appointment_date, email, slot, paid, transaction_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(booking.id.as_uuid())
        .bind(&booking.treatment)
        .bind(&booking.appointment_date)
        .bind(&booking.email)
        .bind(&booking.slot)
        .bind(booking.paid)
        .bind(&booking.transaction_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return StoreError::Conflict;
                }
            }
            db_err("failed to insert booking", &e)
        })?;
        Ok(())
    }

    async fn find_on_date(&self, date: &str) -> Result<Vec<Booking>> {
        let rows = sqlx::query("SELECT * FROM bookings WHERE appointment_date = $1")
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("failed to query bookings by date", &e))?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    async fn find_matching(
        &self,
        email: &str,
        treatment: &str,
        date: &str,
    ) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM bookings
            WHERE email = $1 AND treatment = $2 AND appointment_date = $3
            ",
        )
        .bind(email)
        .bind(treatment)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("failed to query conflicting bookings", &e))?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            "SELECT * FROM bookings WHERE email = $1 ORDER BY appointment_date",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("failed to query bookings by email", &e))?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("failed to query booking by id", &e))?;

        Ok(row.as_ref().map(booking_from_row))
    }

    async fn mark_paid(&self, id: BookingId, transaction_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET paid = TRUE, transaction_id = $2 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(transaction_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("failed to mark booking paid", &e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PaymentRepository for PgStore {
    async fn insert(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO payments (id, booking_id, transaction_id, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(payment.id.as_uuid())
        .bind(payment.booking_id.as_uuid())
        .bind(&payment.transaction_id)
        .bind(payment.amount)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("failed to insert payment", &e))?;
        Ok(())
    }

    async fn find_by_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>> {
        let rows = sqlx::query("SELECT * FROM payments WHERE booking_id = $1")
            .bind(booking_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("failed to query payments by booking", &e))?;

        Ok(rows
            .iter()
            .map(|row| Payment {
                id: PaymentId::from_uuid(row.get("id")),
                booking_id: BookingId::from_uuid(row.get("booking_id")),
                transaction_id: row.get("transaction_id"),
                amount: row.get("amount"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT INTO users (id, email, name, role) VALUES ($1, $2, $3, $4)")
            .bind(user.id.as_uuid())
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.role.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return StoreError::Conflict;
                    }
                }
                db_err("failed to insert user", &e)
            })?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY email")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("failed to list users", &e))?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("failed to query user by email", &e))?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("failed to query user by id", &e))?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn grant_admin(&self, id: UserId) -> Result<bool> {
        // Setting role = 'admin' unconditionally makes re-elevation a no-op
        // success; the role only ever moves administrator-ward.
        let result = sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("failed to grant admin role", &e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DoctorRoster for PgStore {
    async fn insert(&self, doctor: &Doctor) -> Result<()> {
        sqlx::query("INSERT INTO doctors (id, name, specialty, slots) VALUES ($1, $2, $3, $4)")
            .bind(doctor.id.as_uuid())
            .bind(&doctor.name)
            .bind(&doctor.specialty)
            .bind(&doctor.slots)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("failed to insert doctor", &e))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Doctor>> {
        let rows = sqlx::query("SELECT * FROM doctors ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("failed to list doctors", &e))?;

        Ok(rows
            .iter()
            .map(|row| Doctor {
                id: DoctorId::from_uuid(row.get("id")),
                name: row.get("name"),
                specialty: row.get("specialty"),
                slots: row.get("slots"),
            })
            .collect())
    }

    async fn delete(&self, id: DoctorId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("failed to delete doctor", &e))?;

        Ok(result.rows_affected())
    }
}
