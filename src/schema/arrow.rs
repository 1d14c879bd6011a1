// src/schema/arrow.rs

use arrow::{
    array::{ArrayRef, Float64Builder, Int64Builder, StringBuilder},
    datatypes::{DataType, Field, Schema},
};
use std::sync::Arc;

use super::types::CellValue;

/// Pick one Arrow type for a column from its parsed cells.
///
/// - every non-null cell an integer      → Int64
/// - every non-null cell a number        → Float64
/// - any text, or no non-null cell at all → Utf8
pub fn infer_arrow_type(cells: &[CellValue]) -> DataType {
    let mut seen_value = false;
    let mut all_int = true;
    for cell in cells {
        match cell {
            CellValue::Null => continue,
            CellValue::Int(_) => {}
            CellValue::Float(_) => all_int = false,
            CellValue::Text(_) => return DataType::Utf8,
        }
        seen_value = true;
    }
    match (seen_value, all_int) {
        (false, _) => DataType::Utf8,
        (true, true) => DataType::Int64,
        (true, false) => DataType::Float64,
    }
}

/// Build a typed, nullable Arrow array from the raw text of one column.
///
/// Utf8 columns keep the raw field text; only NA spellings become nulls.
pub fn build_column<S: AsRef<str>>(raw: &[S]) -> (DataType, ArrayRef) {
    let cells: Vec<CellValue> = raw.iter().map(|s| CellValue::parse(s.as_ref())).collect();
    let dt = infer_arrow_type(&cells);

    let array: ArrayRef = match dt {
        DataType::Int64 => {
            let mut b = Int64Builder::with_capacity(cells.len());
            for cell in &cells {
                b.append_option(cell.as_i64());
            }
            Arc::new(b.finish())
        }
        DataType::Float64 => {
            let mut b = Float64Builder::with_capacity(cells.len());
            for cell in &cells {
                b.append_option(cell.as_f64());
            }
            Arc::new(b.finish())
        }
        _ => {
            let mut b = StringBuilder::with_capacity(cells.len(), 0);
            for (cell, text) in cells.iter().zip(raw) {
                if cell.is_null() {
                    b.append_null();
                } else {
                    b.append_value(text.as_ref());
                }
            }
            Arc::new(b.finish())
        }
    };
    (dt, array)
}

/// Common type for a column whose fragments disagree.
pub fn widen_type(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        (x, y) if x == y => x.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}

/// Build an Arrow schema of nullable fields from `(name, type)` pairs.
pub fn build_arrow_schema<'a, I>(cols: I) -> Arc<Schema>
where
    I: IntoIterator<Item = (&'a str, DataType)>,
{
    let fields: Vec<Field> = cols
        .into_iter()
        .map(|(name, dt)| Field::new(name, dt, /* nullable = */ true))
        .collect();
    Arc::new(Schema::new(fields))
}
