// strata-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (traits the core needs from the outside world)
// Config loader, shared settings source, column metadata.
pub mod ports;

// 2. Domain
// Step/job configuration model, base paths, MERGE generation.
// Depends on nothing but the ports.
pub mod domain;

// 3. Infrastructure (Adapters)
// JSON/YAML documents on disk, settings files, static column metadata.
pub mod infrastructure;

// 4. Application (Use Cases)
// Per-job configuration cache, MERGE rendering for a configured step.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::StrataError;
