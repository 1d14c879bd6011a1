// src/discover.rs

use anyhow::{Context, Result};
use glob::{glob, Pattern};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// The hERG-QSAR (ChEMBL-derived) release ships these three files at the top level.
pub const HERG_QSAR_FILES: [&str; 3] = ["Training_Set.csv", "Validation_Set.csv", "External_set.csv"];

/// Which collection an input file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    HergQsar,
    CardioTox,
}

impl Source {
    /// Value stored in the `source` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::HergQsar => "hERG-QSAR",
            Source::CardioTox => "CardioTox",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CSV file to be loaded, tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub source: Source,
    /// File stem, e.g. `Training_Set` for `Training_Set.csv`.
    pub dataset: String,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>, source: Source) -> Self {
        let path = path.into();
        let dataset = dataset_name(&path);
        Self {
            path,
            source,
            dataset,
        }
    }
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_herg_qsar_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| HERG_QSAR_FILES.contains(&n))
        .unwrap_or(false)
}

/// Find the files to process, in processing order.
///
/// The fixed hERG-QSAR files come first (only those that exist), followed by every
/// other `*.csv` below `input_dir`, which are treated as CardioTox data.
pub fn discover_inputs(input_dir: &Path) -> Result<Vec<InputFile>> {
    let mut inputs = Vec::new();

    if !input_dir.is_dir() {
        warn!(dir = %input_dir.display(), "input directory not found, nothing to discover");
        return Ok(inputs);
    }

    // ─── 1) fixed hERG-QSAR set ──────────────────────────────────────
    for name in HERG_QSAR_FILES {
        let path = input_dir.join(name);
        if path.is_file() {
            inputs.push(InputFile::new(path, Source::HergQsar));
        } else {
            debug!(file = %path.display(), "expected hERG-QSAR file absent");
        }
    }

    // ─── 2) everything else is CardioTox ─────────────────────────────
    let root = Pattern::escape(&input_dir.to_string_lossy());
    let pattern = format!("{}/**/*.csv", root.trim_end_matches('/'));
    let entries =
        glob(&pattern).with_context(|| format!("Failed to read glob pattern '{}'", pattern))?;

    for entry in entries {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("skipping unreadable path {}: {}", e.path().display(), e);
                continue;
            }
        };
        if !path.is_file() || is_herg_qsar_name(&path) {
            continue;
        }
        inputs.push(InputFile::new(path, Source::CardioTox));
    }

    debug!(count = inputs.len(), "discovered input files");
    Ok(inputs)
}
