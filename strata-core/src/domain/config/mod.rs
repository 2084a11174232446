// strata-core/src/domain/config/mod.rs

pub mod base_path;
pub mod job;
pub mod step;

pub use base_path::{BasePath, CommonConfig, PathResolver};
pub use job::{JobConfig, JobDocument, RootConfig, RootDocument};
pub use step::{
    DbToDbDefinition, DbToDbStepConfig, DbToFileDefinition, DbToFileStepConfig,
    FileToDbDefinition, FileToDbStepConfig, SqlSource, StepConfig, StepDefinition, StepKind,
    TruncateDefinition, TruncateStepConfig, ValidationDefinition, ValidationMode,
    ValidationStepConfig,
};
