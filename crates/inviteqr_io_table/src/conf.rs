//! Tabular upload constants.

/// File-name globs routed to the delimited-text reader.
pub const TUP_TABLE_PATTERNS_CSV: [&str; 1] = ["*.csv"];
/// File-name globs routed to the spreadsheet reader.
pub const TUP_TABLE_PATTERNS_SPREADSHEET: [&str; 2] = ["*.xlsx", "*.xls"];

/// Message shown for any upload outside the accepted extensions.
pub const C_MSG_UNSUPPORTED_FORMAT: &str =
    "Please upload a CSV or Excel file (.csv, .xlsx, .xls)";
/// Message shown when parsing succeeded but produced zero rows.
pub const C_MSG_NO_DATA: &str = "No data found in the uploaded file";

/// Prefix of delimited-text parse failures.
pub const C_PREFIX_CSV_ERROR: &str = "Error parsing CSV";
/// Prefix of spreadsheet parse failures.
pub const C_PREFIX_SPREADSHEET_ERROR: &str = "Failed to parse Excel file";

/// Column name given to a blank spreadsheet header cell.
pub const C_COLUMN_NAME_EMPTY: &str = "__EMPTY";

/// UTF-8 byte order mark stripped before delimited-text parsing.
pub const V_UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
