//! Record types, request schemas and store handles for the car-doctor collections.

pub mod errors;
pub mod id;
pub mod validation;
pub mod service;
pub mod booking;
pub mod ack;
pub mod db;

pub use ack::{DeleteAck, InsertAck, UpdateAck};
pub use booking::{Booking, BookingInput, StatusUpdate};
pub use id::RecordId;
pub use service::{Service, ServiceInput, ServiceSummary};
