//! `ossror run` / `validate` / `sources`: config-driven reconciliation.

use std::path::{Path, PathBuf};

use ossror_io::{export_hierarchical, export_tabular, load_all};
use ossror_recon::{PipelineConfig, SourceKind};

use crate::CliError;

fn load_config(config_path: &Path) -> Result<PipelineConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::usage(format!("cannot read config {}: {e}", config_path.display())))?;
    PipelineConfig::from_toml(&config_str).map_err(CliError::recon)
}

/// Directory that relative paths in the config resolve against.
fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    csv_out: Option<PathBuf>,
    json_out: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = base_dir(&config_path);

    let csv_path = csv_out.unwrap_or_else(|| base_dir.join(&config.output.csv));
    let json_path = json_out.unwrap_or_else(|| base_dir.join(&config.output.json));
    if csv_path == json_path {
        return Err(CliError::usage(format!(
            "CSV and JSON outputs both point at {}",
            csv_path.display()
        )));
    }

    tracing::info!(pipeline = %config.name, sources = config.sources.len(), policy = %config.on_malformed, "starting run");

    let batches = load_all(&config, base_dir).map_err(CliError::source)?;
    let result = ossror_recon::run(&batches, config.on_malformed).map_err(CliError::recon)?;

    export_tabular(&result.links, &csv_path).map_err(CliError::write)?;
    eprintln!("wrote {}", csv_path.display());
    export_hierarchical(&result.links, &json_path).map_err(CliError::write)?;
    eprintln!("wrote {}", json_path.display());

    if json_output {
        let json_str = result
            .report(&config.name)
            .to_json_pretty()
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "wrote {} software-ror links containing {} distinct ROR ids",
        s.links, s.distinct_rors
    );
    if s.skipped_malformed > 0 {
        eprintln!("skipped {} malformed record(s)", s.skipped_malformed);
    }
    if s.slug_conflicts > 0 {
        eprintln!(
            "{} slug conflict(s); first slug kept (details in --json report)",
            s.slug_conflicts
        );
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)
        .map_err(|e| e.with_hint("`ossror sources` lists the supported source kinds"))?;
    eprintln!(
        "valid: pipeline '{}' with {} source(s)",
        config.name,
        config.sources.len(),
    );
    Ok(())
}

pub fn cmd_sources() -> Result<(), CliError> {
    for kind in SourceKind::ALL {
        let tag = kind.default_tag().unwrap_or("(tag required)");
        println!("{:<22}{}", kind.to_string(), tag);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_dir_of_bare_file_is_empty_relative() {
        assert_eq!(base_dir(Path::new("pipeline.toml")).join("a.csv"), PathBuf::from("a.csv"));
        assert_eq!(base_dir(Path::new("conf/pipeline.toml")).join("a.csv"), PathBuf::from("conf/a.csv"));
    }
}
