//! Cross-cutting helpers shared by the workspace binaries and crates.

pub mod shutdown;
pub mod utils;

/// Liveness text served at `/`.
pub const LIVENESS_TEXT: &str = "Car-doctor-server is running";
