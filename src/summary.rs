// src/summary.rs

use anyhow::{Context, Result};
use glob::{glob, Pattern};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

/// Shape of one parquet file in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

impl OutputSummary {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Fully read one parquet file back and count its rows and columns.
pub fn read_back(path: &Path) -> Result<OutputSummary> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading parquet metadata of {}", path.display()))?;
    let columns = builder.schema().fields().len();
    let reader = builder
        .build()
        .with_context(|| format!("building reader for {}", path.display()))?;

    let mut rows = 0;
    for batch in reader {
        let batch = batch.with_context(|| format!("reading batch from {}", path.display()))?;
        rows += batch.num_rows();
    }

    Ok(OutputSummary {
        path: path.to_path_buf(),
        rows,
        columns,
    })
}

/// Read back every `*.parquet` at the top of `output_dir`, sorted by name.
///
/// These are files this program just wrote, so any failure is returned to the caller.
pub fn summarize_outputs(output_dir: &Path) -> Result<Vec<OutputSummary>> {
    let root = Pattern::escape(&output_dir.to_string_lossy());
    let pattern = format!("{}/*.parquet", root.trim_end_matches('/'));
    let mut paths: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .collect::<std::result::Result<Vec<PathBuf>, _>>()
        .with_context(|| format!("listing {}", output_dir.display()))?;
    paths.sort();

    paths.iter().map(|p| read_back(p)).collect()
}
