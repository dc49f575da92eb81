//! Session options, run tickets and top-level error types.

use inviteqr_batch::{
    BatchError, SpecBatchOptions, SpecInferOptions, SpecNamePair, derive_default_batch_options,
    derive_default_infer_options,
};
use inviteqr_io_table::TableError;
use inviteqr_io_zip::{ArchiveError, SpecArchiveOptions, derive_default_archive_options};
use thiserror::Error;

/// Number of items a preview shows by default.
pub const N_PREVIEW_ITEMS_DEFAULT: usize = inviteqr_batch::N_PREVIEW_ITEMS_MAX;

/// Message when an operation needs an uploaded table.
pub const C_MSG_NO_TABLE: &str = "Please upload a file first";
/// Message when an operation needs a finished batch.
pub const C_MSG_NO_BATCH: &str = "No QR codes generated yet";
/// Message when generation is requested without a first-name column.
pub const C_MSG_NO_FIRST_COLUMN: &str = "Please select at least the first name column";

/// All knobs of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSessionOptions {
    /// Column inference patterns.
    pub infer: SpecInferOptions,
    /// Generation settings.
    pub batch: SpecBatchOptions,
    /// Packaging settings.
    pub archive: SpecArchiveOptions,
}

impl Default for SpecSessionOptions {
    fn default() -> Self {
        Self {
            infer: derive_default_infer_options(),
            batch: derive_default_batch_options(),
            archive: derive_default_archive_options(),
        }
    }
}

/// Handle for one generation run, tagged with the epoch it started in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGenerationTicket {
    /// Epoch the run belongs to.
    pub n_epoch: u64,
    /// Names to render, in row order.
    pub names: Vec<SpecNamePair>,
}

/// Session failures. Each maps to one short user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// No table loaded yet.
    #[error("{}", C_MSG_NO_TABLE)]
    NoTable,
    /// No first-name column selected.
    #[error("{}", C_MSG_NO_FIRST_COLUMN)]
    NoFirstColumn,
    /// No batch to preview or package.
    #[error("{}", C_MSG_NO_BATCH)]
    NoBatch,
}
