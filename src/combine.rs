// src/combine.rs

use anyhow::{Context, Result};
use arrow::{
    array::{new_null_array, ArrayRef},
    compute::{cast, concat_batches},
    datatypes::DataType,
    record_batch::RecordBatch,
};

use crate::process::{NormalizedTable, DATASET_COLUMN, SOURCE_COLUMN};
use crate::schema::{build_arrow_schema, widen_type};

pub const SMILES_COLUMN: &str = "smiles";
pub const ACTIVITY_COLUMN: &str = "activity";

/// Columns kept in the combined dataset, in output order.
pub const KEY_COLUMNS: [&str; 4] = [SMILES_COLUMN, ACTIVITY_COLUMN, SOURCE_COLUMN, DATASET_COLUMN];

/// Project a table onto whichever key columns it has.
/// Tables without a `smiles` column do not take part in the union.
pub fn project_key_columns(table: &NormalizedTable) -> Result<Option<RecordBatch>> {
    if !table.has_column(SMILES_COLUMN) {
        return Ok(None);
    }
    let schema = table.batch.schema();
    let indices: Vec<usize> = KEY_COLUMNS
        .iter()
        .filter_map(|c| schema.index_of(c).ok())
        .collect();
    let projected = table
        .batch
        .project(&indices)
        .with_context(|| format!("projecting key columns of {}", table.dataset))?;
    Ok(Some(projected))
}

/// Concatenate key-column fragments row-wise, fragment order preserved.
///
/// The result has every key column that any fragment has, in key order. A
/// fragment lacking a column contributes nulls; columns whose types differ
/// between fragments are widened before concatenation.
pub fn concat_fragments(fragments: &[RecordBatch]) -> Result<Option<RecordBatch>> {
    if fragments.is_empty() {
        return Ok(None);
    }

    let mut columns: Vec<(&str, DataType)> = Vec::new();
    for key in KEY_COLUMNS {
        let mut dt: Option<DataType> = None;
        for frag in fragments {
            if let Ok(field) = frag.schema().field_with_name(key) {
                dt = Some(match dt {
                    Some(prev) => widen_type(&prev, field.data_type()),
                    None => field.data_type().clone(),
                });
            }
        }
        if let Some(dt) = dt {
            columns.push((key, dt));
        }
    }
    let schema = build_arrow_schema(columns.iter().map(|(n, dt)| (*n, dt.clone())));

    let mut aligned = Vec::with_capacity(fragments.len());
    for frag in fragments {
        let arrays = columns
            .iter()
            .map(|(name, dt)| -> Result<ArrayRef> {
                match frag.column_by_name(name) {
                    Some(arr) if arr.data_type() == dt => Ok(arr.clone()),
                    Some(arr) => cast(arr, dt)
                        .with_context(|| format!("casting column {} to {}", name, dt)),
                    None => Ok(new_null_array(dt, frag.num_rows())),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        aligned.push(RecordBatch::try_new(schema.clone(), arrays)?);
    }

    let combined = concat_batches(&schema, &aligned).context("concatenating fragments")?;
    Ok(Some(combined))
}

/// Project every smiles-bearing table and stack them into one batch.
pub fn combine_tables(tables: &[NormalizedTable]) -> Result<Option<RecordBatch>> {
    let mut fragments = Vec::new();
    for table in tables {
        if let Some(frag) = project_key_columns(table)? {
            fragments.push(frag);
        }
    }
    concat_fragments(&fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::Source;
    use crate::process::{normalize_table, RawTable};
    use arrow::array::{Array, Float64Array, StringArray};

    fn table(source: Source, dataset: &str, headers: &[&str], rows: &[&[&str]]) -> NormalizedTable {
        let raw = RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        };
        let batch = normalize_table(&raw, source, dataset).expect("normalize");
        NormalizedTable {
            source,
            dataset: dataset.to_string(),
            batch,
        }
    }

    fn names(batch: &RecordBatch) -> Vec<String> {
        batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    #[test]
    fn projection_keeps_present_key_columns_in_order() -> Result<()> {
        let t = table(
            Source::CardioTox,
            "train",
            &["ID", "Activity", "Smiles", "pIC50"],
            &[&["1", "1", "CCO", "5.1"]],
        );
        let frag = project_key_columns(&t)?.expect("has smiles");
        assert_eq!(names(&frag), vec!["smiles", "activity", "source", "dataset"]);

        let no_smiles = table(Source::CardioTox, "desc", &["ID", "Activity"], &[&["1", "0"]]);
        assert!(project_key_columns(&no_smiles)?.is_none());
        Ok(())
    }

    #[test]
    fn combined_rows_keep_fragment_order() -> Result<()> {
        let a = table(
            Source::HergQsar,
            "Training_Set",
            &["Smiles", "Activity"],
            &[&["A1", "1"], &["A2", "0"], &["A3", "1"]],
        );
        let b = table(
            Source::CardioTox,
            "test",
            &["smiles", "activity"],
            &[&["B1", "0"], &["B2", "1"]],
        );
        let combined = combine_tables(&[a, b])?.expect("combined");
        assert_eq!(combined.num_rows(), 5);

        let smiles = combined
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("smiles is Utf8");
        let order: Vec<&str> = (0..smiles.len()).map(|i| smiles.value(i)).collect();
        assert_eq!(order, vec!["A1", "A2", "A3", "B1", "B2"]);

        let source = combined
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("source is Utf8");
        assert_eq!(source.value(0), "hERG-QSAR");
        assert_eq!(source.value(4), "CardioTox");
        Ok(())
    }

    #[test]
    fn missing_columns_become_nulls_and_types_widen() -> Result<()> {
        let ints = table(Source::CardioTox, "ints", &["smiles", "activity"], &[&["C", "1"]]);
        let floats = table(
            Source::CardioTox,
            "floats",
            &["smiles", "activity"],
            &[&["CC", "0.5"]],
        );
        let no_activity = table(Source::CardioTox, "bare", &["smiles"], &[&["CCC"]]);

        let combined = combine_tables(&[ints, floats, no_activity])?.expect("combined");
        assert_eq!(names(&combined), vec!["smiles", "activity", "source", "dataset"]);
        assert_eq!(combined.num_rows(), 3);

        let activity = combined
            .column(1)
            .as_any()
            .downcast_ref::<Float64Array>()
            .expect("activity widened to Float64");
        assert_eq!(activity.value(0), 1.0);
        assert_eq!(activity.value(1), 0.5);
        assert!(activity.is_null(2));
        Ok(())
    }

    #[test]
    fn text_and_numbers_widen_to_text() -> Result<()> {
        let labels = table(
            Source::CardioTox,
            "labels",
            &["smiles", "activity"],
            &[&["C", "blocker"]],
        );
        let ints = table(Source::CardioTox, "ints", &["smiles", "activity"], &[&["CC", "1"]]);
        let combined = combine_tables(&[labels, ints])?.expect("combined");
        let activity = combined
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("activity widened to Utf8");
        assert_eq!(activity.value(0), "blocker");
        assert_eq!(activity.value(1), "1");
        Ok(())
    }

    #[test]
    fn nothing_to_combine() -> Result<()> {
        let t = table(Source::CardioTox, "desc", &["name"], &[&["x"]]);
        assert!(combine_tables(&[t])?.is_none());
        assert!(concat_fragments(&[])?.is_none());
        Ok(())
    }
}
