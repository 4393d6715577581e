//! Identity gate: credential verification and role authorization.
//!
//! Every protected operation passes through here before any domain logic
//! runs. The gate has two stages, composed as Axum extractors:
//!
//! 1. [`AuthenticatedUser`] verifies the bearer credential and attaches
//!    the claimed email. A missing credential is 401; invalid or expired
//!    is 403.
//! 2. [`RequireAdmin`] looks the claimed email up in the user directory
//!    and requires the administrator role, 403 otherwise. Always runs after
//!    stage one; an unauthenticated caller can never reach it.
//!
//! Both stages are read-only.

pub mod extractors;
pub mod token;

pub use extractors::{AuthenticatedUser, BearerToken, RequireAdmin};
pub use token::{Claims, TokenError, TokenSigner};
