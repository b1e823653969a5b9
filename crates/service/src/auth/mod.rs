//! Auth module: token claims (domain), error taxonomy, and the signing/verifying service.

pub mod domain;
pub mod errors;
pub mod service;

pub use service::TokenService;
