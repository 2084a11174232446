// strata/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "ETL job configuration resolver & MERGE SQL generator", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📋 Loads one job and prints its steps
    Show {
        /// Directory holding one document per job (<jobId>.json|yaml|yml)
        #[arg(long, default_value = ".")]
        config_dir: PathBuf,

        /// Job id
        #[arg(long, short)]
        job: String,

        /// Shared settings file (flat YAML/JSON mapping)
        #[arg(long, env = "STRATA_SETTINGS")]
        settings: Option<PathBuf>,

        /// Output format: table | json
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// ✅ Loads and validates every job
    Check {
        /// Directory holding one document per job
        #[arg(long, conflicts_with = "root_config", required_unless_present = "root_config")]
        config_dir: Option<PathBuf>,

        /// Single document holding every job ({ "jobs": { ... } })
        #[arg(long)]
        root_config: Option<PathBuf>,

        /// Shared settings file (flat YAML/JSON mapping)
        #[arg(long, env = "STRATA_SETTINGS")]
        settings: Option<PathBuf>,
    },

    /// 🔀 Prints the MERGE statement of a db2db step
    Merge {
        #[arg(long, default_value = ".")]
        config_dir: PathBuf,

        #[arg(long, short)]
        job: String,

        #[arg(long, short)]
        step: String,

        /// Connection URL or dialect name (oracle, h2, sqlserver)
        #[arg(long, env = "STRATA_DATABASE_URL")]
        url: String,

        /// Columns of the target table, in table order (ex: "id,name,age")
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        #[arg(long, env = "STRATA_SETTINGS")]
        settings: Option<PathBuf>,
    },
}
