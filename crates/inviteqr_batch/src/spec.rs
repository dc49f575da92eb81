//! Batch specification models, options and top-level error types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use thiserror::Error;

use crate::conf::{
    C_MSG_NO_QR_GENERATED, C_MSG_NO_VALID_NAMES, C_QR_COLOR_DARK, C_QR_COLOR_LIGHT,
    C_URL_LANDING_PAGE, N_QR_MARGIN_MODULES, N_QR_WIDTH_PX, N_YIELD_EVERY_ITEMS,
    TUP_PATTERNS_FIRST_NAME, TUP_PATTERNS_FULL_NAME, TUP_PATTERNS_LAST_NAME,
};
use crate::util::derive_item_filename;

////////////////////////////////////////////////////////////////////////////////
// #region SelectionAndNames

/// Which columns hold the first and (optional) last name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecColumnSelection {
    /// Column holding the first name, or a combined full name.
    pub first_column: Option<String>,
    /// Column holding the last name.
    pub last_column: Option<String>,
}

impl SpecColumnSelection {
    /// Build a selection; empty names mean "unset".
    pub fn new(first_column: Option<&str>, last_column: Option<&str>) -> Self {
        let normalize = |value: Option<&str>| {
            value
                .filter(|c_name| !c_name.is_empty())
                .map(ToString::to_string)
        };
        Self {
            first_column: normalize(first_column),
            last_column: normalize(last_column),
        }
    }

    /// Generation needs at least a first column.
    pub fn is_ready(&self) -> bool {
        self.first_column.is_some()
    }
}

/// Canonical name extracted from one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecNamePair {
    /// Never empty once extracted.
    pub first_name: String,
    /// May be empty.
    pub last_name: String,
}

impl SpecNamePair {
    /// Build a pair from any string-like parts.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// `"<first> <last>"`, as shown next to a preview.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One successfully rendered QR code. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGeneratedItem {
    first_name: String,
    last_name: String,
    image_png: Vec<u8>,
    filename: String,
}

impl SpecGeneratedItem {
    /// Attach rendered PNG bytes to `pair` and derive the file name.
    pub fn from_pair(pair: &SpecNamePair, image_png: Vec<u8>) -> Self {
        Self {
            first_name: pair.first_name.clone(),
            last_name: pair.last_name.clone(),
            filename: derive_item_filename(&pair.first_name, &pair.last_name),
            image_png,
        }
    }

    /// First name the code was generated for.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Last name the code was generated for.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Raw PNG payload.
    pub fn image_png(&self) -> &[u8] {
        &self.image_png
    }

    /// Sanitized `<first>_<last>.png`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// `"<first> <last>"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Inline `data:` URL for previews.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", B64.encode(&self.image_png))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Raster settings handed to the QR encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecQrRenderOptions {
    /// Square image edge in pixels.
    pub width_px: u32,
    /// Quiet zone in modules.
    pub margin_modules: u32,
    /// Foreground `#RRGGBB`.
    pub color_dark: String,
    /// Background `#RRGGBB`.
    pub color_light: String,
}

impl Default for SpecQrRenderOptions {
    fn default() -> Self {
        Self {
            width_px: N_QR_WIDTH_PX,
            margin_modules: N_QR_MARGIN_MODULES,
            color_dark: C_QR_COLOR_DARK.to_string(),
            color_light: C_QR_COLOR_LIGHT.to_string(),
        }
    }
}

/// Header-name patterns for column inference.
///
/// Each entry is a regex body matched case-insensitively against the whole name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecInferOptions {
    /// Combined full-name column patterns.
    pub patterns_full_name: Vec<String>,
    /// First-name column patterns.
    pub patterns_first_name: Vec<String>,
    /// Last-name column patterns.
    pub patterns_last_name: Vec<String>,
}

impl Default for SpecInferOptions {
    fn default() -> Self {
        let to_vec = |patterns: &[&str]| patterns.iter().map(ToString::to_string).collect();
        Self {
            patterns_full_name: to_vec(&TUP_PATTERNS_FULL_NAME),
            patterns_first_name: to_vec(&TUP_PATTERNS_FIRST_NAME),
            patterns_last_name: to_vec(&TUP_PATTERNS_LAST_NAME),
        }
    }
}

/// Options for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecBatchOptions {
    /// Landing page address the names are appended to.
    pub url_base: String,
    /// Raster settings.
    pub render: SpecQrRenderOptions,
    /// Emit a yield event once per this many items.
    pub yield_every: usize,
}

impl Default for SpecBatchOptions {
    fn default() -> Self {
        Self {
            url_base: C_URL_LANDING_PAGE.to_string(),
            render: SpecQrRenderOptions::default(),
            yield_every: N_YIELD_EVERY_ITEMS,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RunState

/// Lifecycle of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumBatchState {
    /// Not started.
    #[default]
    Idle,
    /// Items are being processed.
    Running,
    /// Finished with at least one item.
    Completed,
    /// Finished with nothing to show.
    Aborted,
}

impl EnumBatchState {
    /// Lower-case state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

/// Progress after one processed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecBatchProgress {
    /// Items processed so far, failures included.
    pub n_processed: usize,
    /// Items in the run.
    pub n_total: usize,
}

/// Events emitted by the batch loop to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumBatchEvent {
    /// One more item processed.
    Progress(SpecBatchProgress),
    /// Host may run pending work before the loop continues.
    Yield {
        /// Items processed so far.
        n_processed: usize,
    },
}

/// One item that failed to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecItemError {
    /// Zero-based position in the run.
    pub n_idx: usize,
    /// `"<first> <last>"`.
    pub name: String,
    /// Encoder error text.
    pub exception: String,
}

/// "Top-level call failed" errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// No name pair survived extraction.
    #[error("{}", C_MSG_NO_VALID_NAMES)]
    NoData,
    /// Every item failed to render.
    #[error("{}", C_MSG_NO_QR_GENERATED)]
    EmptyBatch {
        /// Items attempted.
        cnt_failed: usize,
    },
    /// Selection refers to a column outside the table.
    #[error("{0}")]
    InvalidSelection(String),
    /// Options failed validation.
    #[error("{0}")]
    InvalidOptions(String),
    /// Inference pattern does not compile.
    #[error("{0}")]
    InvalidPattern(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_new_treats_empty_as_unset() {
        let selection = SpecColumnSelection::new(Some(""), Some("Surname"));
        assert_eq!(selection.first_column, None);
        assert_eq!(selection.last_column.as_deref(), Some("Surname"));
        assert!(!selection.is_ready());
        assert!(SpecColumnSelection::new(Some("Name"), None).is_ready());
    }

    #[test]
    fn generated_item_derives_filename_and_data_url() {
        let pair = SpecNamePair::new("Zoë", "van der Berg");
        let item = SpecGeneratedItem::from_pair(&pair, vec![1, 2, 3]);

        assert_eq!(item.filename(), "Zo_van_der_Berg.png");
        assert_eq!(item.display_name(), "Zoë van der Berg");
        assert_eq!(item.data_url(), "data:image/png;base64,AQID");
        assert_eq!(item.image_png(), [1, 2, 3]);
    }

    #[test]
    fn batch_error_messages_are_user_facing() {
        assert_eq!(
            BatchError::NoData.to_string(),
            "No valid names found in the selected columns"
        );
        assert_eq!(
            BatchError::EmptyBatch { cnt_failed: 3 }.to_string(),
            "Failed to generate any QR codes"
        );
    }
}
