// strata-core/src/ports/mod.rs

pub mod columns;
pub mod loader;
pub mod settings;

pub use columns::ColumnSource;
pub use loader::ConfigLoader;
pub use settings::SettingsSource;
