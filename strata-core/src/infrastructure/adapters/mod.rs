// strata-core/src/infrastructure/adapters/mod.rs

pub mod columns;

pub use columns::StaticColumnSource;
