//! Pure helpers for archive naming.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::conf::{C_EXT_ARCHIVE, C_FMT_TIMESTAMP, C_PREFIX_ARCHIVE};

/// `qr_codes_<YYYY-MM-DDTHH-MM-SS>.zip` for the instant `now`.
pub fn derive_archive_file_name(now: DateTime<Utc>) -> String {
    format!(
        "{C_PREFIX_ARCHIVE}{}.{C_EXT_ARCHIVE}",
        now.format(C_FMT_TIMESTAMP)
    )
}

/// Return `name` if unused, otherwise `<stem>_<n>.<ext>` with the smallest free `n >= 2`.
///
/// The chosen name is recorded in `set_existing`.
pub fn derive_unique_entry_name(name: &str, set_existing: &mut BTreeSet<String>) -> String {
    if set_existing.insert(name.to_string()) {
        return name.to_string();
    }

    let (c_stem, c_ext) = match name.rsplit_once('.') {
        Some((c_stem, c_ext)) => (c_stem, Some(c_ext)),
        None => (name, None),
    };
    let mut n_idx = 2usize;
    loop {
        let candidate = match c_ext {
            Some(c_ext) => format!("{c_stem}_{n_idx}.{c_ext}"),
            None => format!("{c_stem}_{n_idx}"),
        };
        if set_existing.insert(candidate.clone()) {
            return candidate;
        }
        n_idx += 1;
    }
}
