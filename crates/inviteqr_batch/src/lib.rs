//! `inviteqr_batch` v1:
//! Name extraction and QR batch generation kernel.
//!
//! Architecture:
//! - `conf`     : constants and default preset factories
//! - `spec`     : selection/name/item models, options, errors
//! - `util`     : pure helpers (filename sanitizing, target URL)
//! - `infer`    : column inference from header names
//! - `extract`  : row to name-pair extraction
//! - `encoder`  : QR raster encoder seam and PNG implementation
//! - `report`   : run report model and mutable builder
//! - `generate` : sequential batch loop
pub mod conf;
pub mod encoder;
pub mod extract;
pub mod generate;
pub mod infer;
pub mod report;
pub mod spec;
pub mod util;

pub use conf::{
    C_URL_LANDING_PAGE, N_PREVIEW_ITEMS_MAX, N_QR_MARGIN_MODULES, N_QR_WIDTH_PX,
    N_YIELD_EVERY_ITEMS, derive_default_batch_options, derive_default_infer_options,
};
pub use encoder::{PngQrEncoder, QrImageEncoder};
pub use extract::{extract_names, split_full_name, validate_column_selection};
pub use generate::{SpecBatchOutput, generate_batch, validate_batch_options};
pub use infer::ColumnInferrer;
pub use report::{ReportBatch, ReportBatchBuilder};
pub use spec::{
    BatchError, EnumBatchEvent, EnumBatchState, SpecBatchOptions, SpecBatchProgress,
    SpecColumnSelection, SpecGeneratedItem, SpecInferOptions, SpecItemError, SpecNamePair,
    SpecQrRenderOptions,
};
pub use util::{derive_item_filename, derive_target_url, sanitize_filename};
