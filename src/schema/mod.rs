pub mod arrow;
pub mod types;

pub use self::arrow::{build_arrow_schema, build_column, infer_arrow_type, widen_type};
pub use self::types::{CellValue, NA_VALUES};
