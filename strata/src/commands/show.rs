// strata/src/commands/show.rs
//
// USE CASE: Load one job and print its steps as a table or as JSON.

use comfy_table::{Table, presets::UTF8_FULL};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use strata_core::application::ConfigCache;
use strata_core::domain::config::{SqlSource, StepConfig, ValidationMode};
use strata_core::infrastructure::config::JobFileLoader;

use super::{path_resolver, settings_label};
use crate::cli::OutputFormat;

pub fn execute(
    config_dir: PathBuf,
    job: String,
    settings: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    // JSON output stays parseable: no banner lines
    let json = format == OutputFormat::Json;
    if !json {
        println!("⚙️  Loading job '{}' from {}", job, config_dir.display());
        println!("   Settings: {}", settings_label(&settings));
    }

    let resolver = path_resolver(settings.as_deref())?;
    let cache = ConfigCache::new(Arc::new(JobFileLoader::new(&config_dir)), resolver);
    let config = cache.get_or_load(&job)?;
    info!(job = %job, steps = config.len(), "Job loaded");

    if json {
        println!("{}", serde_json::to_string_pretty(&*config)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Step", "Type", "Details"]);
    for step in config.steps() {
        table.add_row(vec![
            step.step_id().to_string(),
            step.kind().to_string(),
            describe(step),
        ]);
    }

    println!("{table}");
    println!("✨ {} step(s) in job '{}'", config.len(), config.job_id());
    Ok(())
}

fn describe(step: &StepConfig) -> String {
    match step {
        StepConfig::FileToDb(s) => format!("{} <- {}", s.bean, s.input_file().display()),
        StepConfig::DbToFile(s) => {
            let sql = match &s.sql {
                SqlSource::Inline(_) => "inline sql".to_string(),
                SqlSource::Named(id) => format!("sqlId {}", id),
            };
            format!("{} ({}) -> {}", s.bean, sql, s.output_file().display())
        }
        StepConfig::DbToDb(s) => format!(
            "{} -> {} on [{}]",
            s.bean,
            s.table,
            s.merge_on_columns.join(", ")
        ),
        StepConfig::Validation(s) => {
            let mode = match s.mode {
                ValidationMode::Continue => "CONTINUE",
                ValidationMode::Abort => "ABORT",
            };
            let limit = s
                .error_limit
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unlimited".to_string());
            format!("{} -> {} ({}, limit {})", s.bean, s.error_entity, mode, limit)
        }
        StepConfig::Truncate(s) => s.entities.join(", "),
    }
}
