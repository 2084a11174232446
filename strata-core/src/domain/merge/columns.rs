// strata-core/src/domain/merge/columns.rs

use std::collections::HashSet;

use crate::domain::error::DomainError;
use crate::domain::merge::MergeRequest;

/// The three column lists of a MERGE statement, validated together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeColumns<'a> {
    /// Match predicate columns, in configured order.
    pub merge_on: Vec<&'a str>,
    /// Columns assigned on match. May be empty; each dialect decides what that means.
    pub update: Vec<&'a str>,
    /// Every table column, in table order.
    pub insert: Vec<&'a str>,
}

fn same_column(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

impl<'a> MergeColumns<'a> {
    pub fn plan(request: &MergeRequest<'a>) -> Result<Self, DomainError> {
        let invalid = |field: &str, reason: String| {
            DomainError::invalid(field, reason, request.job_id, request.step_id)
        };

        // 1. Table columns, first spelling wins
        if request.all_columns.iter().any(|c| c.trim().is_empty()) {
            return Err(invalid(
                "columns",
                format!("entries of table [{}] must not be blank", request.table),
            ));
        }
        let mut seen = HashSet::new();
        let insert: Vec<&'a str> = request
            .all_columns
            .iter()
            .map(String::as_str)
            .filter(|c| seen.insert(c.to_lowercase()))
            .collect();
        if insert.is_empty() {
            return Err(invalid(
                "columns",
                format!("table [{}] has no column", request.table),
            ));
        }
        let is_table_column = |c: &str| insert.iter().any(|t| same_column(t, c));

        // 2. Merge-on columns
        if request.merge_on_columns.is_empty() {
            return Err(DomainError::required(
                "mergeOnColumns",
                request.job_id,
                request.step_id,
            ));
        }
        let mut seen = HashSet::new();
        let mut merge_on = Vec::with_capacity(request.merge_on_columns.len());
        for column in request.merge_on_columns {
            if !seen.insert(column.to_lowercase()) {
                return Err(invalid(
                    "mergeOnColumns",
                    format!("duplicate column [{}]", column),
                ));
            }
            if !is_table_column(column.as_str()) {
                return Err(invalid(
                    "mergeOnColumns",
                    format!("column [{}] is not a column of table [{}]", column, request.table),
                ));
            }
            merge_on.push(column.as_str());
        }
        let is_key = |c: &str| merge_on.iter().any(|k| same_column(k, c));

        // 3. Update columns: merge-on columns never get assigned
        let update: Vec<&'a str> = match request.update_columns {
            Some(explicit) => {
                let mut seen = HashSet::new();
                let mut update = Vec::with_capacity(explicit.len());
                for column in explicit {
                    if !is_table_column(column.as_str()) {
                        return Err(invalid(
                            "updateColumns",
                            format!("column [{}] is not a column of table [{}]", column, request.table),
                        ));
                    }
                    if !is_key(column.as_str()) && seen.insert(column.to_lowercase()) {
                        update.push(column.as_str());
                    }
                }
                update
            }
            None => insert.iter().copied().filter(|c| !is_key(*c)).collect(),
        };

        Ok(Self {
            merge_on,
            update,
            insert,
        })
    }
}
