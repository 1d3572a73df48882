//! Dashboard engine: backend client, effect execution, and exports.
mod api;
mod engine;
mod export;
mod normalize;
mod pdf;
mod persist;
mod types;

pub use api::{resume_file_url, ApiSettings, DashboardApi, ReqwestApi, DEFAULT_API_BASE};
pub use engine::{EngineCommand, EngineHandle};
pub use export::{
    csv_row, pdf_row, render_csv, render_pdf, write_csv_export, write_pdf_export, ExportError,
    ExportOptions, CSV_FILENAME, CSV_HEADERS, PDF_FILENAME, PDF_HEADERS,
};
pub use normalize::{normalize_jobs, normalize_list, normalize_matches, JOBS_KEY, MATCHES_KEY};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{ApiError, EngineEvent};
