//! Sequential batch loop: one QR image per name pair.

use crate::encoder::{QrImageEncoder, parse_hex_color};
use crate::report::{ReportBatch, ReportBatchBuilder};
use crate::spec::{
    BatchError, EnumBatchEvent, SpecBatchOptions, SpecBatchProgress, SpecGeneratedItem,
    SpecNamePair,
};
use crate::util::derive_target_url;

/// Items of one finished run plus its report.
#[derive(Debug, Clone)]
pub struct SpecBatchOutput {
    /// Generated items in input order.
    pub items: Vec<SpecGeneratedItem>,
    /// Counters and per-item failures.
    pub report: ReportBatch,
}

/// Reject options the loop cannot run with.
pub fn validate_batch_options(options: &SpecBatchOptions) -> Result<(), BatchError> {
    if options.url_base.trim().is_empty() {
        return Err(BatchError::InvalidOptions(
            "url_base must not be empty".to_string(),
        ));
    }
    if options.render.width_px == 0 {
        return Err(BatchError::InvalidOptions(
            "width_px must be >= 1".to_string(),
        ));
    }
    if options.yield_every == 0 {
        return Err(BatchError::InvalidOptions(
            "yield_every must be >= 1".to_string(),
        ));
    }
    parse_hex_color(&options.render.color_dark).map_err(BatchError::InvalidOptions)?;
    parse_hex_color(&options.render.color_light).map_err(BatchError::InvalidOptions)?;
    Ok(())
}

/// Render every pair in order, isolating per-item failures.
///
/// `on_event` receives a progress event after every item and a yield event
/// after items whose zero-based index is a multiple of `yield_every`.
///
/// # Errors
/// - `NoData` when `names` is empty (nothing is encoded).
/// - `EmptyBatch` when every item failed.
/// - `InvalidOptions` when `options` do not validate.
pub fn generate_batch<E, F>(
    names: &[SpecNamePair],
    encoder: &E,
    options: &SpecBatchOptions,
    mut on_event: F,
) -> Result<SpecBatchOutput, BatchError>
where
    E: QrImageEncoder + ?Sized,
    F: FnMut(EnumBatchEvent),
{
    validate_batch_options(options)?;
    if names.is_empty() {
        return Err(BatchError::NoData);
    }

    let n_total = names.len();
    tracing::info!(cnt_total = n_total, "batch started");

    let mut builder = ReportBatchBuilder::new(n_total as u64);
    let mut l_items = Vec::with_capacity(n_total);

    for (n_idx, pair) in names.iter().enumerate() {
        let c_url = derive_target_url(&options.url_base, &pair.first_name, &pair.last_name);
        match encoder.encode_png(&c_url) {
            Ok(v_png) => {
                l_items.push(SpecGeneratedItem::from_pair(pair, v_png));
                builder.add_generated();
            }
            Err(exception) => {
                tracing::warn!(
                    n_idx,
                    first_name = %pair.first_name,
                    last_name = %pair.last_name,
                    error = %exception,
                    "QR generation failed"
                );
                builder.add_error(n_idx, pair.display_name(), exception);
            }
        }

        let n_processed = n_idx + 1;
        on_event(EnumBatchEvent::Progress(SpecBatchProgress {
            n_processed,
            n_total,
        }));
        if n_idx % options.yield_every == 0 {
            tracing::debug!(n_processed, "batch yield");
            on_event(EnumBatchEvent::Yield { n_processed });
        }
    }

    let report = builder.build();
    tracing::info!("{report}");
    if l_items.is_empty() {
        return Err(BatchError::EmptyBatch {
            cnt_failed: report.cnt_failed as usize,
        });
    }
    Ok(SpecBatchOutput {
        items: l_items,
        report,
    })
}
