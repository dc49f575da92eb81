//! Stateless helpers used by the table readers.

use std::collections::BTreeSet;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::conf::{
    C_COLUMN_NAME_EMPTY, TUP_TABLE_PATTERNS_CSV, TUP_TABLE_PATTERNS_SPREADSHEET, V_UTF8_BOM,
};
use crate::spec::{EnumTableFormat, TableError};

////////////////////////////////////////////////////////////////////////////////
// #region FormatDetection

fn derive_glob_set(patterns: &[&str]) -> Result<GlobSet, String> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|e| format!("Invalid upload pattern {pattern:?}: {e}"))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| format!("Failed to build upload pattern set: {e}"))
}

/// Route an uploaded file name to a reader by its extension.
///
/// Matching is case-insensitive and only looks at the base name.
pub fn detect_table_format(file_name: &str) -> Result<EnumTableFormat, TableError> {
    let c_base_name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    let glob_csv = derive_glob_set(&TUP_TABLE_PATTERNS_CSV).map_err(TableError::Parse)?;
    if glob_csv.is_match(c_base_name) {
        return Ok(EnumTableFormat::DelimitedText);
    }

    let glob_sheet =
        derive_glob_set(&TUP_TABLE_PATTERNS_SPREADSHEET).map_err(TableError::Parse)?;
    if glob_sheet.is_match(c_base_name) {
        return Ok(EnumTableFormat::Spreadsheet);
    }

    Err(TableError::UnsupportedFormat {
        file_name: file_name.to_string(),
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderNormalization

/// Make header names unique and non-blank.
///
/// Blank names become `__EMPTY`; repeats get `_1`, `_2`, ... in order of
/// appearance, skipping suffixes already taken.
pub fn derive_unique_column_names(header: &[String]) -> Vec<String> {
    let mut set_names_existing: BTreeSet<String> = BTreeSet::new();
    let mut l_names = Vec::with_capacity(header.len());

    for c_raw in header {
        let c_base_name = if c_raw.trim().is_empty() {
            C_COLUMN_NAME_EMPTY.to_string()
        } else {
            c_raw.clone()
        };

        if set_names_existing.insert(c_base_name.clone()) {
            l_names.push(c_base_name);
            continue;
        }

        let mut n_idx = 1usize;
        loop {
            let candidate = format!("{c_base_name}_{n_idx}");
            if set_names_existing.insert(candidate.clone()) {
                l_names.push(candidate);
                break;
            }
            n_idx += 1;
        }
    }

    l_names
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ByteUtils

/// Drop a leading UTF-8 BOM.
pub fn strip_utf8_bom(v_bytes: &[u8]) -> &[u8] {
    v_bytes.strip_prefix(&V_UTF8_BOM[..]).unwrap_or(v_bytes)
}

/// Drop lines holding only whitespace, leaving quoted fields intact.
///
/// A line of delimiters alone (`,`) is kept: it is a row of empty fields.
pub fn strip_blank_lines(v_bytes: &[u8]) -> Vec<u8> {
    let mut v_out = Vec::with_capacity(v_bytes.len());
    let mut if_in_quotes = false;
    for v_line in v_bytes.split_inclusive(|b| *b == b'\n') {
        if !if_in_quotes && is_blank_payload(v_line) {
            continue;
        }
        let cnt_quotes = v_line.iter().filter(|b| **b == b'"').count();
        if cnt_quotes % 2 == 1 {
            if_in_quotes = !if_in_quotes;
        }
        v_out.extend_from_slice(v_line);
    }
    v_out
}

/// Whether the payload holds nothing but whitespace.
pub fn is_blank_payload(v_bytes: &[u8]) -> bool {
    v_bytes.iter().all(|b| b.is_ascii_whitespace())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
