// strata-core/src/infrastructure/adapters/columns.rs

use std::collections::HashMap;

use crate::error::StrataError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::ColumnSource;

/// Column metadata known up front (CLI arguments, fixtures).
/// Table names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticColumnSource {
    tables: HashMap<String, Vec<String>>,
}

impl StaticColumnSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table<I, S>(mut self, table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.insert(
            table.to_lowercase(),
            columns.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl ColumnSource for StaticColumnSource {
    fn fetch_columns(&self, table: &str) -> Result<Vec<String>, StrataError> {
        self.tables
            .get(&table.to_lowercase())
            .cloned()
            .ok_or_else(|| {
                InfrastructureError::UnknownTable {
                    table: table.to_string(),
                }
                .into()
            })
    }
}
