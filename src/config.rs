// src/config.rs

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_INPUT_DIR: &str = "download";
pub const DEFAULT_OUTPUT_DIR: &str = "brick";

pub const USAGE: &str = "Usage: herg-brick [INPUT_DIR] [OUTPUT_DIR]\n\
    \n\
    INPUT_DIR   directory holding the downloaded CSV files (default: download)\n\
    OUTPUT_DIR  directory receiving the parquet bricks (default: brick)";

/// Where to read CSVs from and where to write parquet files to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Parse positional arguments (program name already skipped).
    /// Returns `Ok(None)` when help was requested.
    pub fn from_args<I, S>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.iter().any(|a| a == "-h" || a == "--help") {
            return Ok(None);
        }
        if let Some(flag) = args.iter().find(|a| a.starts_with('-')) {
            bail!("unknown option {}\n\n{}", flag, USAGE);
        }
        if args.len() > 2 {
            bail!("expected at most 2 arguments, got {}\n\n{}", args.len(), USAGE);
        }

        let mut cfg = Config::default();
        let mut it = args.into_iter();
        if let Some(input) = it.next() {
            cfg.input_dir = PathBuf::from(input);
        }
        if let Some(output) = it.next() {
            cfg.output_dir = PathBuf::from(output);
        }
        Ok(Some(cfg))
    }
}
