//! Batch constants and default preset factories.

use crate::spec::{SpecBatchOptions, SpecInferOptions};

/// Landing page every QR code points to.
pub const C_URL_LANDING_PAGE: &str = "https://invite-wedding.netlify.app/welcome.html";
/// Query parameter carrying the first name.
pub const C_QUERY_KEY_FIRST: &str = "first";
/// Query parameter carrying the last name.
pub const C_QUERY_KEY_LAST: &str = "last";

/// Rendered QR image edge length in pixels.
pub const N_QR_WIDTH_PX: u32 = 200;
/// Quiet zone around the symbol, in modules.
pub const N_QR_MARGIN_MODULES: u32 = 2;
/// Foreground color.
pub const C_QR_COLOR_DARK: &str = "#000000";
/// Background color.
pub const C_QR_COLOR_LIGHT: &str = "#FFFFFF";

/// The loop hands control back to the host once per this many items.
pub const N_YIELD_EVERY_ITEMS: usize = 10;
/// Items shown by a preview.
pub const N_PREVIEW_ITEMS_MAX: usize = 5;

/// Extension of generated image files.
pub const C_IMAGE_EXTENSION: &str = "png";

/// Whole-name patterns for a combined name column.
pub const TUP_PATTERNS_FULL_NAME: [&str; 3] = [r"full\s?name", r"name", r"fullname"];
/// Whole-name patterns for a first-name column.
pub const TUP_PATTERNS_FIRST_NAME: [&str; 4] =
    [r"first\s?name", r"first", r"fname", r"given\s?name"];
/// Whole-name patterns for a last-name column.
pub const TUP_PATTERNS_LAST_NAME: [&str; 5] = [
    r"last\s?name",
    r"last",
    r"lname",
    r"surname",
    r"family\s?name",
];

/// Message for a selection that yields no usable first name.
pub const C_MSG_NO_VALID_NAMES: &str = "No valid names found in the selected columns";
/// Message for a run in which every item failed.
pub const C_MSG_NO_QR_GENERATED: &str = "Failed to generate any QR codes";

/// Build default inference options.
pub fn derive_default_infer_options() -> SpecInferOptions {
    SpecInferOptions::default()
}

/// Build default batch options.
pub fn derive_default_batch_options() -> SpecBatchOptions {
    SpecBatchOptions::default()
}
