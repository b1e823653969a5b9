//! Service layer for the car-doctor backend.
//! - Repository traits over the `services` and `booking` collections, with MongoDB and in-memory backends.
//! - Catalog and booking application services holding the few business rules (validation, listing ownership).
//! - Token issuance and verification for the bearer gate.

pub mod errors;
pub mod auth;
pub mod catalog;
pub mod booking;
pub mod storage;
