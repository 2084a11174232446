// strata-core/src/ports/columns.rs

// Column metadata normally comes from a live connection. The core only
// needs the ordered list of names, so the lookup stays behind this trait.

use crate::error::StrataError;

pub trait ColumnSource: Send + Sync {
    /// Every column of `table`, in table definition order.
    fn fetch_columns(&self, table: &str) -> Result<Vec<String>, StrataError>;
}
