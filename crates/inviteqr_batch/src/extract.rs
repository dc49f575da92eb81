//! Row to name-pair extraction.

use inviteqr_io_table::{SpecRow, SpecTable};

use crate::spec::{BatchError, SpecColumnSelection, SpecNamePair};

/// Check that every selected column exists in `columns`.
pub fn validate_column_selection(
    columns: &[String],
    selection: &SpecColumnSelection,
) -> Result<(), BatchError> {
    let l_selected = [
        selection.first_column.as_deref(),
        selection.last_column.as_deref(),
    ];
    for c_column in l_selected.into_iter().flatten() {
        if !columns.iter().any(|c_name| c_name == c_column) {
            return Err(BatchError::InvalidSelection(format!(
                "Column not found: {c_column}"
            )));
        }
    }
    Ok(())
}

/// Split a full name on whitespace runs into `(first, rest)`.
///
/// The rest is rejoined with single spaces; both parts may be empty.
pub fn split_full_name(value: &str) -> (String, String) {
    let mut tokens = value.split_whitespace();
    let c_first = tokens.next().unwrap_or_default().to_string();
    let c_rest = tokens.collect::<Vec<_>>().join(" ");
    (c_first, c_rest)
}

/// Convert rows to name pairs in input order.
///
/// Rows without a textual, non-blank first cell are dropped. Duplicates pass
/// through unchanged.
pub fn extract_names(table: &SpecTable, selection: &SpecColumnSelection) -> Vec<SpecNamePair> {
    let Some(c_first_column) = selection.first_column.as_deref() else {
        return Vec::new();
    };
    let c_last_column = selection.last_column.as_deref();

    let l_pairs: Vec<SpecNamePair> = table
        .rows()
        .iter()
        .filter_map(|row| derive_name_pair_from_row(row, c_first_column, c_last_column))
        .collect();

    tracing::debug!(
        cnt_rows = table.height(),
        cnt_names = l_pairs.len(),
        "names extracted"
    );
    l_pairs
}

fn derive_name_pair_from_row(
    row: &SpecRow,
    first_column: &str,
    last_column: Option<&str>,
) -> Option<SpecNamePair> {
    let c_primary = row.get(first_column)?.as_text()?.trim();
    if c_primary.is_empty() {
        return None;
    }

    let cell_last = last_column
        .and_then(|c_column| row.get(c_column))
        .filter(|value| value.is_truthy());

    let (c_first, c_last) = match cell_last {
        Some(value) => (
            c_primary.to_string(),
            value.to_display_text().trim().to_string(),
        ),
        None => split_full_name(c_primary),
    };

    if c_first.is_empty() {
        return None;
    }
    Some(SpecNamePair::new(c_first, c_last))
}
