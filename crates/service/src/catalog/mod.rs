//! Service catalog: repository abstraction plus the application service over it.

pub mod repository;
pub mod service;

pub use service::CatalogService;
