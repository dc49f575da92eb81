//! `inviteqr_io_table` v1:
//! Rust-side tabular upload reader.
//!
//! Architecture:
//! - `conf`   : constants and fixed user messages
//! - `spec`   : table/cell models and errors
//! - `util`   : pure helper functions (format detection, header naming)
//! - `reader` : delimited-text and spreadsheet readers
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;

pub use conf::{
    C_MSG_NO_DATA, C_MSG_UNSUPPORTED_FORMAT, TUP_TABLE_PATTERNS_CSV,
    TUP_TABLE_PATTERNS_SPREADSHEET,
};
pub use reader::{read_table, read_table_from_upload};
pub use spec::{EnumCellValue, EnumTableFormat, SpecRow, SpecTable, TableError};
pub use util::{derive_unique_column_names, detect_table_format};
