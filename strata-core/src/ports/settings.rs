// strata-core/src/ports/settings.rs

use std::collections::HashMap;

/// Flat key -> string mapping holding the shared (common) settings.
pub trait SettingsSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

impl SettingsSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}
