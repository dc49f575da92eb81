//! `inviteqr_io_zip` v1:
//! In-memory archive assembly for generated QR images.
//!
//! Architecture:
//! - `conf`   : layout constants and the static greeting page
//! - `spec`   : archive models, options and errors
//! - `util`   : pure helpers (archive naming, entry de-duplication)
//! - `writer` : zip writer and one-shot builder
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_DIR_QR_CODES, C_FILE_WELCOME, C_HTML_WELCOME, derive_default_archive_options,
};
pub use spec::{ArchiveError, EnumArchiveCompression, SpecArchive, SpecArchiveOptions};
pub use util::{derive_archive_file_name, derive_unique_entry_name};
pub use writer::{ArchiveWriter, build_archive};
