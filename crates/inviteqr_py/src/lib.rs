use std::collections::BTreeMap;

use inviteqr_batch::{
    BatchError, C_URL_LANDING_PAGE, EnumBatchEvent, ReportBatch, SpecItemError,
    derive_target_url as rs_derive_target_url, sanitize_filename as rs_sanitize_filename,
};
use inviteqr_io_table::TableError;
use inviteqr_io_zip::{ArchiveError, EnumArchiveCompression};
use inviteqr_session::{N_PREVIEW_ITEMS_DEFAULT, Session, SessionError, SpecSessionOptions};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "inviteqr.session.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

#[pyclass(name = "SpecItemError")]
#[derive(Debug, Clone)]
struct PySpecItemError {
    #[pyo3(get)]
    n_idx: usize,
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    exception: String,
}

impl From<SpecItemError> for PySpecItemError {
    fn from(spec_error: SpecItemError) -> Self {
        Self {
            n_idx: spec_error.n_idx,
            name: spec_error.name,
            exception: spec_error.exception,
        }
    }
}

#[pyclass(name = "ReportBatch")]
#[derive(Debug, Clone)]
struct PyReportBatch {
    #[pyo3(get)]
    cnt_total: u64,
    #[pyo3(get)]
    cnt_processed: u64,
    #[pyo3(get)]
    cnt_generated: u64,
    #[pyo3(get)]
    cnt_failed: u64,
    #[pyo3(get)]
    warnings: Vec<String>,
    #[pyo3(get)]
    errors: Vec<PySpecItemError>,
    #[pyo3(get)]
    state: String,
    inner: ReportBatch,
}

impl From<ReportBatch> for PyReportBatch {
    fn from(report_batch: ReportBatch) -> Self {
        Self {
            cnt_total: report_batch.cnt_total,
            cnt_processed: report_batch.cnt_processed,
            cnt_generated: report_batch.cnt_generated,
            cnt_failed: report_batch.cnt_failed,
            warnings: report_batch.warnings.clone(),
            errors: report_batch
                .errors
                .iter()
                .cloned()
                .map(PySpecItemError::from)
                .collect(),
            state: report_batch.state.as_str().to_string(),
            inner: report_batch,
        }
    }
}

#[pymethods]
impl PyReportBatch {
    #[getter]
    fn error_count(&self) -> usize {
        self.inner.error_count()
    }

    #[getter]
    fn warning_count(&self) -> usize {
        self.inner.warning_count()
    }

    fn to_dict(&self) -> BTreeMap<String, u64> {
        self.inner.to_dict()
    }

    #[pyo3(signature = (prefix = "[QR]"))]
    fn format(&self, prefix: &str) -> String {
        self.inner.format(prefix)
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

#[pyclass(name = "Session")]
struct PySession {
    inner: Session,
}

#[pymethods]
impl PySession {
    #[new]
    #[pyo3(signature = (url_base = None, yield_every = None, compression = None))]
    fn new(
        url_base: Option<String>,
        yield_every: Option<usize>,
        compression: Option<&str>,
    ) -> PyResult<Self> {
        let mut spec_options = SpecSessionOptions::default();
        if let Some(url_base) = url_base {
            spec_options.batch.url_base = url_base;
        }
        if let Some(yield_every) = yield_every {
            spec_options.batch.yield_every = yield_every;
        }
        if let Some(compression) = compression {
            spec_options.archive.compression = EnumArchiveCompression::from_token(compression)
                .map_err(|e| map_session_error(e.into()))?;
        }
        let inner = Session::new(spec_options).map_err(map_session_error)?;
        Ok(Self { inner })
    }

    #[getter]
    fn columns(&self) -> Vec<String> {
        self.inner.columns().to_vec()
    }

    #[getter]
    fn row_count(&self) -> usize {
        self.inner.row_count()
    }

    #[getter]
    fn selection(&self) -> (Option<String>, Option<String>) {
        let selection = self.inner.selection();
        (selection.first_column.clone(), selection.last_column.clone())
    }

    #[getter]
    fn can_generate(&self) -> bool {
        self.inner.can_generate()
    }

    #[getter]
    fn epoch(&self) -> u64 {
        self.inner.epoch()
    }

    fn load_file(&mut self, py: Python<'_>, file_name: &str, data: &[u8]) -> PyResult<String> {
        let inner = &mut self.inner;
        py.allow_threads(|| inner.load_file(file_name, data))
            .map_err(map_session_error)
    }

    #[pyo3(signature = (first = None, last = None))]
    fn set_selection(&mut self, first: Option<&str>, last: Option<&str>) -> PyResult<()> {
        self.inner
            .set_selection(first, last)
            .map_err(map_session_error)
    }

    /// Run a batch. `on_progress(n_processed, n_total)` is called after every item.
    #[pyo3(signature = (on_progress = None))]
    fn generate(
        &mut self,
        py: Python<'_>,
        on_progress: Option<Bound<'_, PyAny>>,
    ) -> PyResult<PyReportBatch> {
        let mut err_callback: Option<PyErr> = None;
        let report_batch = self.inner.generate(|event| match event {
            EnumBatchEvent::Progress(progress) => {
                if let Some(callback) = &on_progress
                    && err_callback.is_none()
                    && let Err(e) = callback.call1((progress.n_processed, progress.n_total))
                {
                    err_callback = Some(e);
                }
            }
            EnumBatchEvent::Yield { .. } => py.allow_threads(|| ()),
        });
        let report_batch = report_batch.map_err(map_session_error)?;
        if let Some(e) = err_callback {
            return Err(e);
        }
        Ok(PyReportBatch::from(report_batch))
    }

    /// `(first, last, filename, data_url)` for the first `n` items.
    #[pyo3(signature = (n = N_PREVIEW_ITEMS_DEFAULT))]
    fn preview(&self, n: usize) -> Vec<(String, String, String, String)> {
        self.inner
            .preview(n)
            .iter()
            .map(|item| {
                (
                    item.first_name().to_string(),
                    item.last_name().to_string(),
                    item.filename().to_string(),
                    item.data_url(),
                )
            })
            .collect()
    }

    /// `(archive_name, archive_bytes)` for the current batch.
    fn build_archive<'py>(&self, py: Python<'py>) -> PyResult<(String, Bound<'py, PyBytes>)> {
        let inner = &self.inner;
        let archive = py
            .allow_threads(|| inner.build_archive())
            .map_err(map_session_error)?;
        Ok((archive.name, PyBytes::new(py, &archive.bytes)))
    }
}

fn map_session_error(exception: SessionError) -> PyErr {
    match exception {
        SessionError::Table(
            TableError::UnsupportedFormat { .. } | TableError::Parse(_) | TableError::NoData,
        ) => PyValueError::new_err(exception.to_string()),
        SessionError::Batch(BatchError::EmptyBatch { .. }) => {
            PyRuntimeError::new_err(exception.to_string())
        }
        SessionError::Batch(_) => PyValueError::new_err(exception.to_string()),
        SessionError::Archive(ArchiveError::InvalidOptions(_)) => {
            PyValueError::new_err(exception.to_string())
        }
        SessionError::Archive(_)
        | SessionError::NoTable
        | SessionError::NoFirstColumn
        | SessionError::NoBatch => PyRuntimeError::new_err(exception.to_string()),
    }
}

#[pyfunction(name = "sanitize_filename")]
fn sanitize_filename_py(text: &str) -> String {
    rs_sanitize_filename(text)
}

#[pyfunction(name = "derive_target_url")]
#[pyo3(signature = (first, last = ""))]
fn derive_target_url_py(first: &str, last: &str) -> String {
    rs_derive_target_url(C_URL_LANDING_PAGE, first, last)
}

#[pyfunction(name = "init_logging")]
#[pyo3(signature = (level = "info"))]
fn init_logging_py(level: &str) -> PyResult<bool> {
    inviteqr_log::init_tracing(level).map_err(PyValueError::new_err)
}

#[pymodule]
fn _inviteqr_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PySpecItemError>()?;
    module.add_class::<PyReportBatch>()?;
    module.add_class::<PySession>()?;
    module.add_function(wrap_pyfunction!(sanitize_filename_py, module)?)?;
    module.add_function(wrap_pyfunction!(derive_target_url_py, module)?)?;
    module.add_function(wrap_pyfunction!(init_logging_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
