//! In-memory archive writer.

use std::collections::BTreeSet;
use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use inviteqr_batch::SpecGeneratedItem;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::conf::{C_DIR_QR_CODES, C_FILE_WELCOME, C_HTML_WELCOME};
use crate::spec::{ArchiveError, EnumArchiveCompression, SpecArchive, SpecArchiveOptions};
use crate::util::{derive_archive_file_name, derive_unique_entry_name};

/// Streams items into a zip held in memory.
///
/// Nothing is handed out until [`Self::finish`] succeeds.
pub struct ArchiveWriter {
    zip_writer: ZipWriter<Cursor<Vec<u8>>>,
    file_options: SimpleFileOptions,
    set_image_names_existing: BTreeSet<String>,
    l_entries: Vec<String>,
    l_warnings: Vec<String>,
}

impl ArchiveWriter {
    /// Empty archive using `options`.
    pub fn new(options: SpecArchiveOptions) -> Self {
        let method = match options.compression {
            EnumArchiveCompression::Stored => CompressionMethod::Stored,
            EnumArchiveCompression::Deflated => CompressionMethod::Deflated,
        };
        Self {
            zip_writer: ZipWriter::new(Cursor::new(Vec::new())),
            file_options: SimpleFileOptions::default().compression_method(method),
            set_image_names_existing: BTreeSet::new(),
            l_entries: Vec::new(),
            l_warnings: Vec::new(),
        }
    }

    /// Store one image under the image folder.
    ///
    /// A name already used in this archive gets a numeric suffix and a warning.
    pub fn add_item(&mut self, item: &SpecGeneratedItem) -> Result<(), ArchiveError> {
        let c_name =
            derive_unique_entry_name(item.filename(), &mut self.set_image_names_existing);
        if c_name != item.filename() {
            let warning = format!(
                "Duplicate file name {} stored as {c_name}",
                item.filename()
            );
            tracing::warn!(
                filename = item.filename(),
                renamed = %c_name,
                "archive name collision"
            );
            self.l_warnings.push(warning);
        }
        self.write_entry(&format!("{C_DIR_QR_CODES}/{c_name}"), item.image_png())
    }

    /// Write the greeting page and seal the archive.
    pub fn finish(mut self, now: DateTime<Utc>) -> Result<SpecArchive, ArchiveError> {
        self.write_entry(C_FILE_WELCOME, C_HTML_WELCOME.as_bytes())?;
        let cursor = self
            .zip_writer
            .finish()
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        let archive = SpecArchive {
            name: derive_archive_file_name(now),
            bytes: cursor.into_inner(),
            entries: self.l_entries,
            warnings: self.l_warnings,
        };
        tracing::info!(
            name = %archive.name,
            cnt_entries = archive.entries.len(),
            n_bytes = archive.bytes.len(),
            "archive built"
        );
        Ok(archive)
    }

    fn write_entry(&mut self, path: &str, payload: &[u8]) -> Result<(), ArchiveError> {
        self.zip_writer
            .start_file(path, self.file_options)
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        self.zip_writer
            .write_all(payload)
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        self.l_entries.push(path.to_string());
        Ok(())
    }
}

/// Package `items` plus the greeting page, named after `now`.
///
/// # Errors
/// - `NoItems` when `items` is empty.
/// - `Write` when the zip writer fails.
pub fn build_archive(
    items: &[SpecGeneratedItem],
    now: DateTime<Utc>,
    options: &SpecArchiveOptions,
) -> Result<SpecArchive, ArchiveError> {
    if items.is_empty() {
        return Err(ArchiveError::NoItems);
    }
    let mut writer = ArchiveWriter::new(options.clone());
    for item in items {
        writer.add_item(item)?;
    }
    writer.finish(now)
}
