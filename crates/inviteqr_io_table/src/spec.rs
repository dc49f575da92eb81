//! Table specification models and top-level error types.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::conf::{C_MSG_NO_DATA, C_MSG_UNSUPPORTED_FORMAT};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Declared upload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumTableFormat {
    /// Comma-delimited text with a header line.
    DelimitedText,
    /// Binary spreadsheet container (`.xlsx` / `.xls`).
    Spreadsheet,
}

/// Normalized cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

impl EnumCellValue {
    /// Borrow the text payload; numbers and booleans are not textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::String(val) => Some(val.as_str()),
            _ => None,
        }
    }

    /// Whether the cell counts as filled in.
    ///
    /// Empty text, zero/NaN numbers, `false` and missing values are blank.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::String(val) => !val.is_empty(),
            Self::Number(val) => *val != 0.0 && !val.is_nan(),
            Self::Boolean(val) => *val,
        }
    }

    /// Text rendering used when a non-text cell has to be read as a name.
    pub fn to_display_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::String(val) => val.clone(),
            Self::Number(val) => val.to_string(),
            Self::Boolean(val) => val.to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// One record keyed by column name.
///
/// Absent keys read as missing cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecRow {
    cells: BTreeMap<String, EnumCellValue>,
}

impl SpecRow {
    /// Build a row from `(column, value)` pairs.
    pub fn from_cells<I, K>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, EnumCellValue)>,
        K: Into<String>,
    {
        Self {
            cells: cells
                .into_iter()
                .map(|(c_name, value)| (c_name.into(), value))
                .collect(),
        }
    }

    /// Cell at `column`, `None` when the key is absent.
    pub fn get(&self, column: &str) -> Option<&EnumCellValue> {
        self.cells.get(column)
    }

}

/// Parsed upload: ordered column names plus rows sharing that column set.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecTable {
    columns: Vec<String>,
    rows: Vec<SpecRow>,
    format: EnumTableFormat,
}

impl SpecTable {
    /// Build a table, rejecting a row-less result.
    pub fn new(
        columns: Vec<String>,
        rows: Vec<SpecRow>,
        format: EnumTableFormat,
    ) -> Result<Self, TableError> {
        if rows.is_empty() {
            return Err(TableError::NoData);
        }
        Ok(Self {
            columns,
            rows,
            format,
        })
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in input order.
    pub fn rows(&self) -> &[SpecRow] {
        &self.rows
    }

    /// Source format.
    pub fn format(&self) -> EnumTableFormat {
        self.format
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Human-readable one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "Found {} rows with columns: {}",
            self.rows.len(),
            self.columns.join(", ")
        )
    }
}

/// Upload failures. Any of them aborts the whole upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// File name does not carry an accepted extension.
    #[error("{}", C_MSG_UNSUPPORTED_FORMAT)]
    UnsupportedFormat {
        /// Rejected file name.
        file_name: String,
    },
    /// Bytes could not be read as the declared format.
    #[error("{0}")]
    Parse(String),
    /// Parsing succeeded but yielded zero rows.
    #[error("{}", C_MSG_NO_DATA)]
    NoData,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_truthiness_follows_blank_rules() {
        assert!(!EnumCellValue::None.is_truthy());
        assert!(!EnumCellValue::String(String::new()).is_truthy());
        assert!(EnumCellValue::String(" ".to_string()).is_truthy());
        assert!(!EnumCellValue::Number(0.0).is_truthy());
        assert!(!EnumCellValue::Number(f64::NAN).is_truthy());
        assert!(EnumCellValue::Number(7.0).is_truthy());
        assert!(!EnumCellValue::Boolean(false).is_truthy());
        assert!(EnumCellValue::Boolean(true).is_truthy());
    }

    #[test]
    fn cell_display_text_drops_integral_fraction() {
        assert_eq!(EnumCellValue::Number(42.0).to_display_text(), "42");
        assert_eq!(EnumCellValue::Number(1.5).to_display_text(), "1.5");
        assert_eq!(EnumCellValue::Boolean(true).to_display_text(), "true");
        assert_eq!(EnumCellValue::None.to_display_text(), "");
    }

    #[test]
    fn table_new_rejects_zero_rows() {
        let err = SpecTable::new(
            vec!["Name".to_string()],
            vec![],
            EnumTableFormat::DelimitedText,
        )
        .expect_err("empty table must fail");
        assert_eq!(err, TableError::NoData);
        assert_eq!(err.to_string(), "No data found in the uploaded file");
    }

    #[test]
    fn table_summary_lists_columns_in_order() {
        let table = SpecTable::new(
            vec!["First".to_string(), "Last".to_string()],
            vec![SpecRow::from_cells([(
                "First",
                EnumCellValue::String("Ada".to_string()),
            )])],
            EnumTableFormat::Spreadsheet,
        )
        .expect("table");

        assert_eq!(table.summary(), "Found 1 rows with columns: First, Last");
        assert_eq!(table.rows()[0].get("Last"), None);
    }
}
