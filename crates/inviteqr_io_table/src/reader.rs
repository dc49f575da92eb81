//! Table readers turning uploaded bytes into a [`SpecTable`].

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use polars::prelude::{AnyValue, CsvReadOptions, DataFrame, SerReader};

use crate::conf::{C_PREFIX_CSV_ERROR, C_PREFIX_SPREADSHEET_ERROR};
use crate::spec::{EnumCellValue, EnumTableFormat, SpecRow, SpecTable, TableError};
use crate::util::{
    derive_unique_column_names, detect_table_format, is_blank_payload, strip_blank_lines,
    strip_utf8_bom,
};

/// Detect the format from `file_name`, then parse `v_bytes`.
pub fn read_table_from_upload(file_name: &str, v_bytes: &[u8]) -> Result<SpecTable, TableError> {
    let enum_format = detect_table_format(file_name)?;
    let table = read_table(v_bytes, enum_format)?;
    tracing::info!(
        file_name,
        n_rows = table.height(),
        n_cols = table.columns().len(),
        "upload parsed"
    );
    Ok(table)
}

/// Parse `v_bytes` as `enum_format`.
///
/// The whole upload fails on the first problem; no partial table is returned.
pub fn read_table(v_bytes: &[u8], enum_format: EnumTableFormat) -> Result<SpecTable, TableError> {
    match enum_format {
        EnumTableFormat::DelimitedText => read_delimited_text(v_bytes),
        EnumTableFormat::Spreadsheet => read_spreadsheet(v_bytes),
    }
}

////////////////////////////////////////////////////////////////////////////////
// #region DelimitedText

fn read_delimited_text(v_bytes: &[u8]) -> Result<SpecTable, TableError> {
    let v_payload = strip_utf8_bom(v_bytes);
    if is_blank_payload(v_payload) {
        return Err(TableError::Parse(format!(
            "{C_PREFIX_CSV_ERROR}: file is empty"
        )));
    }

    // The header is read as a data row so its names go through the same
    // normalization as spreadsheet headers. Zero-length schema inference keeps
    // every column as text.
    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(strip_blank_lines(v_payload)))
        .finish()
        .map_err(|err| TableError::Parse(format!("{C_PREFIX_CSV_ERROR}: {err}")))?;

    derive_table_from_dataframe(&df)
}

fn derive_table_from_dataframe(df: &DataFrame) -> Result<SpecTable, TableError> {
    let l_cols = df.get_columns();
    let derive_text = |n_idx_col: usize, n_idx_row: usize| -> Result<EnumCellValue, TableError> {
        let value = l_cols[n_idx_col]
            .get(n_idx_row)
            .map_err(|err| TableError::Parse(format!("{C_PREFIX_CSV_ERROR}: {err}")))?;
        Ok(derive_cell_value_from_any_value(value))
    };

    if df.height() == 0 {
        return Err(TableError::NoData);
    }
    let mut l_header_raw = Vec::with_capacity(l_cols.len());
    for n_idx_col in 0..l_cols.len() {
        l_header_raw.push(derive_text(n_idx_col, 0)?.to_display_text());
    }
    let l_colnames = derive_unique_column_names(&l_header_raw);

    let mut l_rows = Vec::with_capacity(df.height() - 1);
    for n_idx_row in 1..df.height() {
        let mut l_cells = Vec::with_capacity(l_colnames.len());
        for (n_idx_col, c_name) in l_colnames.iter().enumerate() {
            l_cells.push((c_name.clone(), derive_text(n_idx_col, n_idx_row)?));
        }
        l_rows.push(SpecRow::from_cells(l_cells));
    }

    SpecTable::new(l_colnames, l_rows, EnumTableFormat::DelimitedText)
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        // Delimited text has no notion of a missing field: it is empty text.
        AnyValue::Null => EnumCellValue::String(String::new()),
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        _ => EnumCellValue::String(value.to_string()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Spreadsheet

fn read_spreadsheet(v_bytes: &[u8]) -> Result<SpecTable, TableError> {
    if v_bytes.is_empty() {
        return Err(TableError::Parse(format!(
            "{C_PREFIX_SPREADSHEET_ERROR}: file is empty"
        )));
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(v_bytes.to_vec()))
        .map_err(|err| TableError::Parse(format!("{C_PREFIX_SPREADSHEET_ERROR}: {err}")))?;

    let l_sheet_names = workbook.sheet_names();
    let Some(c_sheet_name) = l_sheet_names.first() else {
        return Err(TableError::Parse(format!(
            "{C_PREFIX_SPREADSHEET_ERROR}: workbook has no worksheets"
        )));
    };
    let range = workbook
        .worksheet_range(c_sheet_name)
        .map_err(|err| TableError::Parse(format!("{C_PREFIX_SPREADSHEET_ERROR}: {err}")))?;

    let mut iter_rows = range
        .rows()
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)));

    let Some(row_header) = iter_rows.next() else {
        return Err(TableError::NoData);
    };
    let l_header_raw: Vec<String> = row_header.iter().map(ToString::to_string).collect();
    let l_colnames = derive_unique_column_names(&l_header_raw);

    let mut l_rows = Vec::new();
    for row in iter_rows {
        let l_cells = row
            .iter()
            .zip(l_colnames.iter())
            .filter_map(|(cell, c_name)| match derive_cell_value_from_data(cell) {
                EnumCellValue::None => None,
                value => Some((c_name.clone(), value)),
            })
            .collect::<Vec<_>>();
        l_rows.push(SpecRow::from_cells(l_cells));
    }

    SpecTable::new(l_colnames, l_rows, EnumTableFormat::Spreadsheet)
}

fn derive_cell_value_from_data(value: &Data) -> EnumCellValue {
    match value {
        Data::Empty => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Bool(val) => EnumCellValue::Boolean(*val),
        Data::DateTime(val) => EnumCellValue::Number(val.as_f64()),
        other => EnumCellValue::String(other.to_string()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rust_xlsxwriter::Workbook;

    use super::*;

    fn text(value: &str) -> EnumCellValue {
        EnumCellValue::String(value.to_string())
    }

    fn build_xlsx(fill: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        fill(worksheet);
        workbook.save_to_buffer().expect("xlsx buffer")
    }

    #[test]
    fn read_csv_keeps_header_order_and_text_cells() {
        let v_bytes = b"Full Name,Age,Surname\nJane Doe,31,Smith\n  Bob  ,,\n";
        let table = read_table(v_bytes, EnumTableFormat::DelimitedText).expect("csv");

        assert_eq!(table.columns(), ["Full Name", "Age", "Surname"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.rows()[0].get("Age"), Some(&text("31")));
        assert_eq!(table.rows()[1].get("Full Name"), Some(&text("  Bob  ")));
        assert_eq!(table.rows()[1].get("Surname"), Some(&text("")));
        assert_eq!(table.format(), EnumTableFormat::DelimitedText);
    }

    #[test]
    fn read_csv_strips_bom_and_skips_blank_lines() {
        let v_bytes = b"\xEF\xBB\xBFName,Note\nAda,x\n\n  \r\n,\nGrace,y\n";
        let table = read_table(v_bytes, EnumTableFormat::DelimitedText).expect("csv");

        assert_eq!(table.columns(), ["Name", "Note"]);
        let l_names: Vec<_> = table
            .rows()
            .iter()
            .map(|row| row.get("Name").cloned())
            .collect();
        // A line of empty fields is a row, not a blank line.
        assert_eq!(
            l_names,
            vec![Some(text("Ada")), Some(text("")), Some(text("Grace"))]
        );
    }

    #[test]
    fn read_csv_names_blank_and_duplicate_headers() {
        let v_bytes = b"Name,,Note,Name\nAda,x,y,z\n";
        let table = read_table(v_bytes, EnumTableFormat::DelimitedText).expect("csv");

        assert_eq!(table.columns(), ["Name", "__EMPTY", "Note", "Name_1"]);
        let row = &table.rows()[0];
        assert_eq!(row.get("Name"), Some(&text("Ada")));
        assert_eq!(row.get("__EMPTY"), Some(&text("x")));
        assert_eq!(row.get("Name_1"), Some(&text("z")));
    }

    #[test]
    fn read_csv_keeps_blank_lines_inside_quotes() {
        let v_bytes = b"Name,Note\nAda,\"line one\n\nline three\"\n";
        let table = read_table(v_bytes, EnumTableFormat::DelimitedText).expect("csv");

        assert_eq!(table.height(), 1);
        assert_eq!(
            table.rows()[0].get("Note"),
            Some(&text("line one\n\nline three"))
        );
    }

    #[test]
    fn read_csv_empty_file_is_parse_error() {
        let err = read_table(b"  \n", EnumTableFormat::DelimitedText).expect_err("empty");
        assert!(matches!(err, TableError::Parse(_)));
        assert!(err.to_string().starts_with("Error parsing CSV"));
    }

    #[test]
    fn read_csv_header_only_is_no_data() {
        let err = read_table(b"First,Last\n", EnumTableFormat::DelimitedText)
            .expect_err("header only");
        assert_eq!(err, TableError::NoData);
    }

    #[test]
    fn read_csv_ragged_row_is_parse_error() {
        let err = read_table(b"a,b\n1,2,3,4\n", EnumTableFormat::DelimitedText)
            .expect_err("ragged");
        assert!(err.to_string().starts_with("Error parsing CSV: "));
    }

    #[test]
    fn read_xlsx_uses_first_row_as_header_and_keeps_types() {
        let v_bytes = build_xlsx(|ws| {
            ws.write_string(0, 0, "Name").expect("cell");
            ws.write_string(0, 1, "Table").expect("cell");
            ws.write_string(0, 2, "VIP").expect("cell");
            ws.write_string(1, 0, "Jane Doe").expect("cell");
            ws.write_number(1, 1, 12.0).expect("cell");
            ws.write_boolean(1, 2, true).expect("cell");
            ws.write_number(2, 0, 404.0).expect("cell");
        });

        let table = read_table(&v_bytes, EnumTableFormat::Spreadsheet).expect("xlsx");
        assert_eq!(table.columns(), ["Name", "Table", "VIP"]);
        assert_eq!(table.height(), 2);

        let row_0 = &table.rows()[0];
        assert_eq!(row_0.get("Name"), Some(&text("Jane Doe")));
        assert_eq!(row_0.get("Table"), Some(&EnumCellValue::Number(12.0)));
        assert_eq!(row_0.get("VIP"), Some(&EnumCellValue::Boolean(true)));

        let row_1 = &table.rows()[1];
        assert_eq!(row_1.get("Name"), Some(&EnumCellValue::Number(404.0)));
        assert_eq!(row_1.get("Table"), None);
    }

    #[test]
    fn read_xlsx_names_blank_and_duplicate_headers() {
        let v_bytes = build_xlsx(|ws| {
            ws.write_string(0, 0, "Name").expect("cell");
            ws.write_string(0, 2, "Name").expect("cell");
            ws.write_string(1, 0, "a").expect("cell");
            ws.write_string(1, 1, "b").expect("cell");
            ws.write_string(1, 2, "c").expect("cell");
        });

        let table = read_table(&v_bytes, EnumTableFormat::Spreadsheet).expect("xlsx");
        assert_eq!(table.columns(), ["Name", "__EMPTY", "Name_1"]);
        assert_eq!(table.rows()[0].get("Name_1"), Some(&text("c")));
    }

    #[test]
    fn read_xlsx_header_only_is_no_data() {
        let v_bytes = build_xlsx(|ws| {
            ws.write_string(0, 0, "First Name").expect("cell");
        });
        let err = read_table(&v_bytes, EnumTableFormat::Spreadsheet).expect_err("no rows");
        assert_eq!(err, TableError::NoData);
    }

    #[test]
    fn read_spreadsheet_garbage_is_parse_error() {
        let err = read_table(b"definitely not a workbook", EnumTableFormat::Spreadsheet)
            .expect_err("garbage");
        assert!(err.to_string().starts_with("Failed to parse Excel file: "));

        let err = read_table(b"", EnumTableFormat::Spreadsheet).expect_err("empty");
        assert!(matches!(err, TableError::Parse(_)));
    }

    #[test]
    fn read_table_from_upload_rejects_before_parsing() {
        let err = read_table_from_upload("guests.pdf", b"Name\nAda\n").expect_err("pdf");
        assert!(matches!(err, TableError::UnsupportedFormat { .. }));

        let table = read_table_from_upload("GUESTS.CSV", b"Name\nAda\n").expect("csv");
        assert_eq!(table.height(), 1);
    }
}
