//! Domain types for the Doctors Portal booking service.
//!
//! This module contains the value objects and entities shared by the
//! availability calculator, the booking conflict guard, the payment
//! reconciler, and the HTTP layer. All wire types serialize with camelCase
//! field names to match the public API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a payment record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Creates a new random `PaymentId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `PaymentId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a registered user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a practitioner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoctorId(Uuid);

impl DoctorId {
    /// Creates a new random `DoctorId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `DoctorId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DoctorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// A bookable treatment with its master slot list.
///
/// Identity is the human-chosen `name`. The `slots` field is the master
/// availability, independent of date; the availability calculator derives
/// per-date remaining slots from it without mutating the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentOption {
    /// Treatment name (unique key, referenced by bookings)
    pub name: String,
    /// Price in major currency units
    pub price: u64,
    /// Master list of slot labels, order is significant
    pub slots: Vec<String>,
}

// ============================================================================
// Bookings
// ============================================================================

/// A client's claim on one slot of one treatment on one date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Generated identity
    pub id: BookingId,
    /// Treatment name (references `TreatmentOption` by name)
    pub treatment: String,
    /// Appointment date, carried verbatim as a filter key
    pub appointment_date: String,
    /// Requester email
    pub email: String,
    /// Chosen slot label
    pub slot: String,
    /// Set by the payment reconciler, never otherwise
    pub paid: bool,
    /// Transaction reference, absent until paid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl Booking {
    /// Create an unpaid booking from an accepted request.
    #[must_use]
    pub fn from_request(request: BookingRequest) -> Self {
        Self {
            id: BookingId::new(),
            treatment: request.treatment,
            appointment_date: request.appointment_date,
            email: request.email,
            slot: request.slot,
            paid: false,
            transaction_id: None,
        }
    }
}

/// A client-facing request to create a booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Treatment name
    pub treatment: String,
    /// Appointment date
    pub appointment_date: String,
    /// Requester email
    pub email: String,
    /// Requested slot label
    pub slot: String,
}

// ============================================================================
// Payments
// ============================================================================

/// A settled payment, immutable once recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Generated identity
    pub id: PaymentId,
    /// The booking this payment settles
    pub booking_id: BookingId,
    /// Provider transaction reference
    pub transaction_id: String,
    /// Amount in minor currency units (cents)
    pub amount: i64,
    /// Recording time
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Users and roles
// ============================================================================

/// User role. Defaults to an ordinary user; the only transition is
/// administrator-ward (no demotion path exists).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary user (default)
    #[default]
    User,
    /// Administrator: may manage practitioners and elevate users
    Admin,
}

impl Role {
    /// String form as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse the stored string form; anything unrecognized is an ordinary
    /// user, so a bad role value can never grant elevated access.
    #[must_use]
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user. Email is the natural key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Generated identity
    pub id: UserId,
    /// Email, the natural key
    pub email: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role, defaults to ordinary user
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Create an ordinary user.
    #[must_use]
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            name,
            role: Role::User,
        }
    }

    /// Whether this user may pass the administrator gate.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

// ============================================================================
// Practitioners
// ============================================================================

/// A practitioner managed through the administrator surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Generated identity
    pub id: DoctorId,
    /// Practitioner name
    pub name: String,
    /// Specialty (a treatment name)
    pub specialty: String,
    /// Available slot labels
    pub slots: Vec<String>,
}
