// strata-core/src/application/mod.rs

pub mod cache;
pub mod merge;

// --- RE-EXPORTS (FACADE) ---
pub use cache::ConfigCache;
pub use merge::MergeSqlService;
