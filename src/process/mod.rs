// src/process/mod.rs
pub mod normalize;
pub mod raw_table;

use anyhow::{bail, Context, Result};
use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::DataType,
    record_batch::RecordBatch,
};
use csv::ReaderBuilder;
use std::{fs::File, io::BufReader, path::Path, sync::Arc};
use tracing::{debug, trace};

use crate::discover::{InputFile, Source};
use crate::schema::{build_arrow_schema, build_column};

pub use normalize::{make_unique_columns, normalize_column_name};
pub use raw_table::RawTable;

pub const SOURCE_COLUMN: &str = "source";
pub const DATASET_COLUMN: &str = "dataset";

/// One input file after loading: typed columns, normalized names, provenance attached.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub source: Source,
    pub dataset: String,
    pub batch: RecordBatch,
}

impl NormalizedTable {
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }
}

/// Read a header-first CSV into memory.
///
/// Blank header cells become `Unnamed: {idx}`. Invalid UTF-8 is replaced
/// rather than rejected. Short rows are padded; a row
/// with more fields than the header is an error.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short rows are padded below
        .from_reader(BufReader::new(file));

    let mut headers: Vec<String> = rdr
        .byte_headers()
        .with_context(|| format!("Failed to read header row of {:?}", path))?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }
    if headers.is_empty() {
        bail!("No columns to parse from file {:?}", path);
    }
    // blank header cells are positional, e.g. an exported index column
    for (idx, h) in headers.iter_mut().enumerate() {
        if h.is_empty() {
            *h = format!("Unnamed: {}", idx);
        }
    }

    let width = headers.len();
    let mut rows = Vec::new();
    for (idx, result) in rdr.byte_records().enumerate() {
        let record = result
            .with_context(|| format!("CSV parse error in {:?} at record {}", path, idx + 1))?;
        if record.len() > width {
            // line numbers count the header as line 1
            let line = record.position().map(|p| p.line()).unwrap_or(idx as u64 + 2);
            bail!(
                "Error tokenizing data in {:?}. Expected {} fields in line {}, saw {}",
                path,
                width,
                line,
                record.len()
            );
        }
        let mut row: Vec<String> = record
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    trace!(rows = rows.len(), cols = width, "parsed csv");
    Ok(RawTable { headers, rows })
}

/// Turn a raw table into a typed batch with normalized, unique names and the
/// `source` / `dataset` provenance columns.
///
/// An existing `source` or `dataset` column is overwritten in place.
pub fn normalize_table(raw: &RawTable, source: Source, dataset: &str) -> Result<RecordBatch> {
    let normalized: Vec<String> = raw
        .headers
        .iter()
        .map(|h| normalize_column_name(h))
        .collect();
    let mut names = make_unique_columns(&normalized);

    let mut types: Vec<DataType> = Vec::with_capacity(names.len() + 2);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(names.len() + 2);
    for idx in 0..raw.num_columns() {
        let (dt, arr) = build_column(&raw.column(idx));
        types.push(dt);
        arrays.push(arr);
    }

    let rows = raw.num_rows();
    for (col, value) in [(SOURCE_COLUMN, source.as_str()), (DATASET_COLUMN, dataset)] {
        let arr: ArrayRef = Arc::new(StringArray::from(vec![value; rows]));
        match names.iter().position(|n| n == col) {
            Some(pos) => {
                debug!(column = col, "overwriting existing provenance column");
                types[pos] = DataType::Utf8;
                arrays[pos] = arr;
            }
            None => {
                names.push(col.to_string());
                types.push(DataType::Utf8);
                arrays.push(arr);
            }
        }
    }

    let schema = build_arrow_schema(names.iter().map(String::as_str).zip(types));
    RecordBatch::try_new(schema, arrays).context("building record batch")
}

/// Load one discovered file end to end.
#[tracing::instrument(level = "debug", skip(input), fields(path = %input.path.display()))]
pub fn load_table(input: &InputFile) -> Result<NormalizedTable> {
    let raw = load_csv(&input.path)?;
    let batch = normalize_table(&raw, input.source, &input.dataset)
        .with_context(|| format!("normalizing {:?}", input.path))?;
    Ok(NormalizedTable {
        source: input.source,
        dataset: input.dataset.clone(),
        batch,
    })
}
