// src/pipeline.rs

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info};

use crate::{
    combine::combine_tables,
    config::Config,
    discover::{discover_inputs, InputFile},
    process::{load_table, NormalizedTable},
    sink::{output_file_name, write_parquet, COMBINED_FILE},
    summary::{summarize_outputs, OutputSummary},
};

/// An input that could not be loaded or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedInput {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// What one run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<WrittenFile>,
    pub failures: Vec<FailedInput>,
    /// Row count of `herg_combined.parquet`, if it was written.
    pub combined_rows: Option<usize>,
    pub outputs: Vec<OutputSummary>,
}

/// Load every input, one outcome per file, in discovery order.
///
/// Each file's outcome is logged right after its `Processing` line.
pub fn load_inputs(inputs: &[InputFile]) -> Vec<Result<NormalizedTable, FailedInput>> {
    inputs
        .iter()
        .map(|input| {
            info!("Processing {}...", input.path.display());
            match load_table(input) {
                Ok(table) => {
                    info!("  - Loaded {} records", table.num_rows());
                    Ok(table)
                }
                Err(e) => {
                    error!(path = %input.path.display(), "  - Error: {:#}", e);
                    Err(FailedInput {
                        path: input.path.clone(),
                        error: format!("{:#}", e),
                    })
                }
            }
        })
        .collect()
}

/// Write each table to `{source}_{dataset}.parquet` in `out_dir`.
pub fn persist_tables(
    tables: &[NormalizedTable],
    out_dir: &Path,
) -> (Vec<WrittenFile>, Vec<FailedInput>) {
    let mut written = Vec::with_capacity(tables.len());
    let mut failures = Vec::new();

    for table in tables {
        let path = out_dir.join(output_file_name(table.source, &table.dataset));
        match write_parquet(&path, &table.batch) {
            Ok(_) => {
                info!("  - Saved {} records to {}", table.num_rows(), path.display());
                written.push(WrittenFile {
                    path,
                    rows: table.num_rows(),
                });
            }
            Err(e) => {
                error!("  - Error: {:#}", e);
                failures.push(FailedInput {
                    path,
                    error: format!("{:#}", e),
                });
            }
        }
    }
    (written, failures)
}

/// Run discovery, loading, per-source writes, the combined write and the summary.
pub fn run(cfg: &Config) -> Result<RunReport> {
    // ─── 1) output dir ───────────────────────────────────────────────
    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("creating output directory {:?}", cfg.output_dir))?;

    // ─── 2) discover + load ──────────────────────────────────────────
    let inputs = discover_inputs(&cfg.input_dir)?;
    info!("{} input files under {}", inputs.len(), cfg.input_dir.display());

    let mut report = RunReport::default();
    let mut tables = Vec::with_capacity(inputs.len());
    for outcome in load_inputs(&inputs) {
        match outcome {
            Ok(table) => tables.push(table),
            Err(failed) => report.failures.push(failed),
        }
    }

    // ─── 3) per-source bricks ────────────────────────────────────────
    let (written, failures) = persist_tables(&tables, &cfg.output_dir);
    report.written = written;
    report.failures.extend(failures);

    // ─── 4) combined dataset ─────────────────────────────────────────
    match combine_tables(&tables)? {
        Some(combined) => {
            let path = cfg.output_dir.join(COMBINED_FILE);
            write_parquet(&path, &combined)?;
            info!("Combined dataset: {} total records", combined.num_rows());
            report.combined_rows = Some(combined.num_rows());
        }
        None => info!("Combined dataset: no table has a smiles column, nothing written"),
    }

    // ─── 5) read everything back ─────────────────────────────────────
    report.outputs = summarize_outputs(&cfg.output_dir)?;
    info!("Output files:");
    for out in &report.outputs {
        info!(
            "  - {}: {} rows, {} columns",
            out.file_name(),
            out.rows,
            out.columns
        );
    }

    Ok(report)
}
