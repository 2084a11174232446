// strata-core/src/domain/merge/dialect.rs

use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::merge::MergeSqlGenerator;
use crate::domain::merge::ansi::{OracleMergeSqlGenerator, SqlServerMergeSqlGenerator};
use crate::domain::merge::h2::H2MergeSqlGenerator;

/// Database families that support MERGE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Oracle,
    H2,
    SqlServer,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Oracle, Dialect::H2, Dialect::SqlServer];

    /// URL scheme token identifying the family.
    pub fn scheme(self) -> &'static str {
        match self {
            Dialect::Oracle => "oracle",
            Dialect::H2 => "h2",
            Dialect::SqlServer => "sqlserver",
        }
    }

    /// Detects the family from a connection URL or a bare dialect name.
    ///
    /// The hint is trimmed and lower-cased, a leading `jdbc:` is skipped, and
    /// what remains must start with a known scheme.
    pub fn from_hint(hint: &str) -> Result<Self, DomainError> {
        let normalized = hint.trim().to_lowercase();
        let url = normalized.strip_prefix("jdbc:").unwrap_or(&normalized);

        Self::ALL
            .into_iter()
            .find(|dialect| !url.is_empty() && url.starts_with(dialect.scheme()))
            .ok_or_else(|| DomainError::UnsupportedDialect {
                hint: hint.to_string(),
            })
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

static ORACLE: OracleMergeSqlGenerator = OracleMergeSqlGenerator;
static H2: H2MergeSqlGenerator = H2MergeSqlGenerator;
static SQL_SERVER: SqlServerMergeSqlGenerator = SqlServerMergeSqlGenerator;

pub struct MergeSqlGeneratorFactory;

impl MergeSqlGeneratorFactory {
    /// Picks the generator matching a connection URL / dialect hint.
    pub fn create(hint: &str) -> Result<&'static dyn MergeSqlGenerator, DomainError> {
        let dialect = Dialect::from_hint(hint)?;
        tracing::debug!(%dialect, hint, "Selected MERGE generator");
        Ok(Self::for_dialect(dialect))
    }

    pub fn for_dialect(dialect: Dialect) -> &'static dyn MergeSqlGenerator {
        match dialect {
            Dialect::Oracle => &ORACLE,
            Dialect::H2 => &H2,
            Dialect::SqlServer => &SQL_SERVER,
        }
    }
}
