//! Single-owner session: uploaded table, column selection and current batch.

use chrono::{DateTime, Utc};
use inviteqr_batch::{
    ColumnInferrer, EnumBatchEvent, PngQrEncoder, QrImageEncoder, ReportBatch, SpecBatchOutput,
    SpecColumnSelection, SpecGeneratedItem, extract_names, generate_batch, validate_batch_options,
    validate_column_selection,
};
use inviteqr_io_table::{SpecTable, read_table_from_upload};
use inviteqr_io_zip::{SpecArchive, build_archive};

use crate::spec::{SessionError, SpecGenerationTicket, SpecSessionOptions};

/// Interactive state of one user.
///
/// Every upload and every generation run starts a new epoch. Results tagged
/// with an older epoch are dropped on arrival.
#[derive(Debug)]
pub struct Session {
    options: SpecSessionOptions,
    inferrer: ColumnInferrer,
    encoder: PngQrEncoder,
    table: Option<SpecTable>,
    selection: SpecColumnSelection,
    l_items: Vec<SpecGeneratedItem>,
    report: Option<ReportBatch>,
    n_epoch: u64,
}

impl Session {
    /// New empty session; options are validated up front.
    pub fn new(options: SpecSessionOptions) -> Result<Self, SessionError> {
        validate_batch_options(&options.batch)?;
        let inferrer = ColumnInferrer::new(&options.infer)?;
        let encoder = PngQrEncoder::new(options.batch.render.clone());
        Ok(Self {
            options,
            inferrer,
            encoder,
            table: None,
            selection: SpecColumnSelection::default(),
            l_items: Vec::new(),
            report: None,
            n_epoch: 0,
        })
    }

    /// Session options.
    pub fn options(&self) -> &SpecSessionOptions {
        &self.options
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.n_epoch
    }

    /// Loaded table, if any.
    pub fn table(&self) -> Option<&SpecTable> {
        self.table.as_ref()
    }

    /// Column names of the loaded table; empty without one.
    pub fn columns(&self) -> &[String] {
        self.table.as_ref().map(SpecTable::columns).unwrap_or_default()
    }

    /// Row count of the loaded table; zero without one.
    pub fn row_count(&self) -> usize {
        self.table.as_ref().map_or(0, SpecTable::height)
    }

    /// Current column selection.
    pub fn selection(&self) -> &SpecColumnSelection {
        &self.selection
    }

    /// Items of the current batch.
    pub fn items(&self) -> &[SpecGeneratedItem] {
        &self.l_items
    }

    /// Report of the last accepted run.
    pub fn report(&self) -> Option<&ReportBatch> {
        self.report.as_ref()
    }

    /// Parse an upload and replace the session state with it.
    ///
    /// On success the selection is re-inferred, the batch is cleared and a
    /// new epoch starts. On failure the previous state is kept.
    pub fn load_file(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, SessionError> {
        let table = read_table_from_upload(file_name, bytes)?;
        let c_summary = table.summary();

        self.selection = self.inferrer.infer(table.columns());
        self.table = Some(table);
        self.clear_batch();
        self.n_epoch += 1;

        tracing::info!(file_name, n_epoch = self.n_epoch, "{c_summary}");
        Ok(c_summary)
    }

    /// Override the selection. Empty names mean "unset".
    pub fn set_selection(
        &mut self,
        first_column: Option<&str>,
        last_column: Option<&str>,
    ) -> Result<(), SessionError> {
        let table = self.table.as_ref().ok_or(SessionError::NoTable)?;
        let selection = SpecColumnSelection::new(first_column, last_column);
        validate_column_selection(table.columns(), &selection)?;
        self.selection = selection;
        Ok(())
    }

    /// Whether a table is loaded and a first-name column is selected.
    pub fn can_generate(&self) -> bool {
        self.table.is_some() && self.selection.is_ready()
    }

    /// Start a run: extract names, open a new epoch and clear the batch.
    pub fn begin_generation(&mut self) -> Result<SpecGenerationTicket, SessionError> {
        let table = self.table.as_ref().ok_or(SessionError::NoTable)?;
        if !self.selection.is_ready() {
            return Err(SessionError::NoFirstColumn);
        }
        let names = extract_names(table, &self.selection);

        self.n_epoch += 1;
        self.clear_batch();
        if names.is_empty() {
            return Err(inviteqr_batch::BatchError::NoData.into());
        }
        Ok(SpecGenerationTicket {
            n_epoch: self.n_epoch,
            names,
        })
    }

    /// Accept the output of a run unless a newer epoch superseded it.
    ///
    /// Returns whether the output was accepted.
    pub fn complete_generation(&mut self, n_epoch: u64, output: SpecBatchOutput) -> bool {
        if n_epoch != self.n_epoch {
            tracing::debug!(
                n_epoch,
                n_epoch_current = self.n_epoch,
                "stale batch discarded"
            );
            return false;
        }
        self.l_items = output.items;
        self.report = Some(output.report);
        true
    }

    /// Run a whole batch with the session encoder.
    pub fn generate<F>(&mut self, on_event: F) -> Result<ReportBatch, SessionError>
    where
        F: FnMut(EnumBatchEvent),
    {
        let encoder = self.encoder.clone();
        self.generate_with(&encoder, on_event)
    }

    /// Run a whole batch with `encoder`.
    pub fn generate_with<E, F>(
        &mut self,
        encoder: &E,
        on_event: F,
    ) -> Result<ReportBatch, SessionError>
    where
        E: QrImageEncoder + ?Sized,
        F: FnMut(EnumBatchEvent),
    {
        let ticket = self.begin_generation()?;
        let output = generate_batch(&ticket.names, encoder, &self.options.batch, on_event)?;
        let report = output.report.clone();
        self.complete_generation(ticket.n_epoch, output);
        Ok(report)
    }

    /// First `min(n, len)` items of the current batch.
    pub fn preview(&self, n: usize) -> &[SpecGeneratedItem] {
        &self.l_items[..n.min(self.l_items.len())]
    }

    /// Package the current batch, stamped with the current time.
    pub fn build_archive(&self) -> Result<SpecArchive, SessionError> {
        self.build_archive_at(Utc::now())
    }

    /// Package the current batch, stamped with `now`.
    pub fn build_archive_at(&self, now: DateTime<Utc>) -> Result<SpecArchive, SessionError> {
        if self.l_items.is_empty() {
            return Err(SessionError::NoBatch);
        }
        Ok(build_archive(&self.l_items, now, &self.options.archive)?)
    }

    fn clear_batch(&mut self) {
        self.l_items.clear();
        self.report = None;
    }
}
