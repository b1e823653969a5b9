//! Storage backends for the repositories
//!
//! The MongoDB repositories live next to their traits; this module holds the
//! in-memory backend used by tests and local runs without a database.

pub mod memory;
