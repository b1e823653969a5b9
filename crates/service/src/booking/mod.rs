//! Bookings: repository abstraction plus the application service enforcing listing ownership.

pub mod repository;
pub mod service;

pub use service::BookingService;
