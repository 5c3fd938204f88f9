//! Import options for CSV point loading

/// Options for reading a point CSV
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Column holding the x coordinate
    pub x_column: usize,
    /// Column holding the y coordinate
    pub y_column: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            x_column: 0,
            y_column: 1,
        }
    }
}

impl ImportOptions {
    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}
