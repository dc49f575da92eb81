//! Batch report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::{EnumBatchState, SpecItemError};

/// Aggregate counters and diagnostics for one `generate_batch` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportBatch {
    /// Name pairs handed to the run.
    pub cnt_total: u64,
    /// Items processed, failures included.
    pub cnt_processed: u64,
    /// Items rendered successfully.
    pub cnt_generated: u64,
    /// Items whose encoding failed.
    pub cnt_failed: u64,
    /// Non-fatal warnings collected during the run.
    pub warnings: Vec<String>,
    /// Per-item failures.
    pub errors: Vec<SpecItemError>,
    /// Final run state.
    pub state: EnumBatchState,
}

impl ReportBatch {
    /// Number of collected item errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_total".to_string(), self.cnt_total);
        dict_counts.insert("cnt_processed".to_string(), self.cnt_processed);
        dict_counts.insert("cnt_generated".to_string(), self.cnt_generated);
        dict_counts.insert("cnt_failed".to_string(), self.cnt_failed);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} state={} total={} processed={} generated={} failed={} warnings={}",
            self.state.as_str(),
            dict_counts["cnt_total"],
            dict_counts["cnt_processed"],
            dict_counts["cnt_generated"],
            dict_counts["cnt_failed"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[QR]"))
    }
}

/// Mutable accumulator for batch statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportBatchBuilder {
    /// See [`ReportBatch::cnt_total`].
    pub cnt_total: u64,
    /// See [`ReportBatch::cnt_processed`].
    pub cnt_processed: u64,
    /// See [`ReportBatch::cnt_generated`].
    pub cnt_generated: u64,
    /// See [`ReportBatch::cnt_failed`].
    pub cnt_failed: u64,
    /// See [`ReportBatch::warnings`].
    pub warnings: Vec<String>,
    /// See [`ReportBatch::errors`].
    pub errors: Vec<SpecItemError>,
}

impl ReportBatchBuilder {
    /// Builder for a run over `cnt_total` name pairs.
    pub fn new(cnt_total: u64) -> Self {
        Self {
            cnt_total,
            ..Self::default()
        }
    }

    /// Count one successfully rendered item.
    pub fn add_generated(&mut self) {
        self.cnt_processed += 1;
        self.cnt_generated += 1;
    }

    /// Count one failed item and keep its error.
    pub fn add_error(&mut self, n_idx: usize, name: String, exception: String) {
        self.cnt_processed += 1;
        self.cnt_failed += 1;
        self.warnings
            .push(format!("Failed to generate QR for {name}: {exception}"));
        self.errors.push(SpecItemError {
            n_idx,
            name,
            exception,
        });
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize into an immutable report.
    ///
    /// The run completes when at least one item was generated.
    pub fn build(self) -> ReportBatch {
        let state = if self.cnt_generated > 0 {
            EnumBatchState::Completed
        } else {
            EnumBatchState::Aborted
        };
        ReportBatch {
            cnt_total: self.cnt_total,
            cnt_processed: self.cnt_processed,
            cnt_generated: self.cnt_generated,
            cnt_failed: self.cnt_failed,
            warnings: self.warnings,
            errors: self.errors,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_batch_to_dict_and_format() {
        let mut builder = ReportBatchBuilder::new(3);
        builder.add_generated();
        builder.add_error(1, "Jane Doe".to_string(), "boom".to_string());
        builder.add_generated();
        let report = builder.build();

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_total"], 3);
        assert_eq!(dict_counts["cnt_processed"], 3);
        assert_eq!(dict_counts["cnt_generated"], 2);
        assert_eq!(dict_counts["cnt_failed"], 1);
        assert_eq!(dict_counts["cnt_errors"], 1);
        assert_eq!(dict_counts["cnt_warnings"], 1);

        assert_eq!(report.state, EnumBatchState::Completed);
        assert_eq!(report.warnings, vec!["Failed to generate QR for Jane Doe: boom"]);
        let txt = report.format("[QR]");
        assert_eq!(
            txt,
            "[QR] state=completed total=3 processed=3 generated=2 failed=1 warnings=1"
        );
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn report_batch_without_items_is_aborted() {
        let mut builder = ReportBatchBuilder::new(1);
        builder.add_error(0, "A ".to_string(), "nope".to_string());
        let report = builder.build();
        assert_eq!(report.state, EnumBatchState::Aborted);
        assert_eq!(report.errors[0].n_idx, 0);
    }
}
