// strata-core/src/infrastructure/config/mod.rs

pub mod document;
pub mod loader;
pub mod settings;

pub use document::DocumentFormat;
pub use loader::{JobFileLoader, RootFileLoader};
pub use settings::{Settings, load_settings};
