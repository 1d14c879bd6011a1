// src/sink.rs

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use parquet::{
    arrow::ArrowWriter,
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    path::Path,
};
use tracing::debug;

use crate::discover::Source;

pub const PARQUET_EXT: &str = "parquet";
pub const COMBINED_FILE: &str = "herg_combined.parquet";

/// `hERG-QSAR` + `Training_Set` → `herg_qsar_training_set.parquet`
///
/// Hyphens are replaced in the source label only; `test-set` and `test_set`
/// stay two files.
pub fn output_file_name(source: Source, dataset: &str) -> String {
    let source = source.as_str().to_lowercase().replace([' ', '-'], "_");
    let dataset = dataset.to_lowercase().replace(' ', "_");
    format!("{}_{}.{}", source, dataset, PARQUET_EXT)
}

/// Write `batch` as a single parquet file, replacing whatever is at `output_path`.
/// Returns the size of the written file in bytes.
pub fn write_parquet(output_path: &Path, batch: &RecordBatch) -> Result<u64> {
    let file = File::create(output_path)
        .with_context(|| format!("creating file {}", output_path.display()))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating parquet writer")?;

    writer.write(batch).context("writing batch to parquet")?;
    writer.close().context("closing parquet writer")?;

    let metadata = fs::metadata(output_path).context("getting file metadata")?;
    debug!(
        path = %output_path.display(),
        rows = batch.num_rows(),
        bytes = metadata.len(),
        "wrote parquet"
    );

    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::{
        array::{ArrayRef, Int64Array, StringArray},
        datatypes::{DataType, Field, Schema},
    };
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn output_names() {
        assert_eq!(
            output_file_name(Source::HergQsar, "Training_Set"),
            "herg_qsar_training_set.parquet"
        );
        assert_eq!(
            output_file_name(Source::HergQsar, "External_set"),
            "herg_qsar_external_set.parquet"
        );
        assert_eq!(
            output_file_name(Source::CardioTox, "Test Set-2"),
            "cardiotox_test_set-2.parquet"
        );
        assert_ne!(
            output_file_name(Source::CardioTox, "test-set"),
            output_file_name(Source::CardioTox, "test_set")
        );
        assert_ne!(output_file_name(Source::CardioTox, "x"), COMBINED_FILE);
    }

    #[test]
    fn write_and_overwrite() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("t.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("smiles", DataType::Utf8, true),
            Field::new("activity", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["CCO", "CCN", "CCC"])) as ArrayRef,
                Arc::new(Int64Array::from(vec![Some(1), None, Some(0)])) as ArrayRef,
            ],
        )?;
        let bytes = write_parquet(&path, &batch)?;
        assert!(bytes > 0);

        // second write with fewer rows replaces the file
        let smaller = batch.slice(0, 1);
        write_parquet(&path, &smaller)?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?.build()?;
        let mut rows = 0;
        for b in reader {
            let b = b?;
            assert_eq!(b.schema().fields().len(), 2);
            rows += b.num_rows();
        }
        assert_eq!(rows, 1);
        Ok(())
    }
}
