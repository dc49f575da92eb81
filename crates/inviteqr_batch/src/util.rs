//! Stateless helpers shared by extraction, generation and archiving.

use crate::conf::{C_IMAGE_EXTENSION, C_QUERY_KEY_FIRST, C_QUERY_KEY_LAST};

/// Reduce `value` to `[A-Za-z0-9_]` for use in a file name.
///
/// Every other character becomes `_`, runs of `_` collapse into one, and
/// leading/trailing `_` are stripped.
pub fn sanitize_filename(value: &str) -> String {
    let mut c_out = String::with_capacity(value.len());
    for ch in value.chars() {
        let ch = if ch.is_ascii_alphanumeric() { ch } else { '_' };
        if ch == '_' && c_out.ends_with('_') {
            continue;
        }
        c_out.push(ch);
    }
    c_out.trim_matches('_').to_string()
}

/// `<first>_<last>.png` from sanitized name parts.
pub fn derive_item_filename(first_name: &str, last_name: &str) -> String {
    format!(
        "{}_{}.{C_IMAGE_EXTENSION}",
        sanitize_filename(first_name),
        sanitize_filename(last_name)
    )
}

/// Landing URL carrying both name parts as percent-encoded query parameters.
///
/// Both parameters are always present, even when empty.
pub fn derive_target_url(url_base: &str, first_name: &str, last_name: &str) -> String {
    format!(
        "{url_base}?{C_QUERY_KEY_FIRST}={}&{C_QUERY_KEY_LAST}={}",
        urlencoding::encode(first_name),
        urlencoding::encode(last_name)
    )
}
