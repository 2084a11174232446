// strata-core/src/domain/mod.rs

pub mod config;
pub mod error;
pub mod merge;

// Re-exports to keep imports short elsewhere
pub use error::DomainError;
