#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawTable {
    /// Column names exactly as the header row spells them. May repeat.
    pub headers: Vec<String>,
    /// Each data row, one String per header (short rows padded with "").
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    /// Values of column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
            .collect()
    }
}
