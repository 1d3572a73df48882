use std::io;
use std::path::PathBuf;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use dashboard_core::{match_label, percent_label, CandidateMatchRecord};
use dashboard_logging::dash_info;
use thiserror::Error;

use crate::pdf::{render_table, Table};
use crate::persist::{AtomicFileWriter, PersistError};

pub const CSV_FILENAME: &str = "resume_dashboard.csv";
pub const PDF_FILENAME: &str = "resume_dashboard.pdf";

pub const CSV_HEADERS: [&str; 13] = [
    "Name",
    "Email",
    "Experience",
    "Location",
    "Skills",
    "Education",
    "Job 1",
    "Job 1 Score",
    "Job 2",
    "Job 2 Score",
    "Job 3",
    "Job 3 Score",
    "Status",
];

pub const PDF_HEADERS: [&str; 8] = [
    "Name",
    "Email",
    "Experience",
    "Location",
    "Skills",
    "Education",
    "Top Matches",
    "Status",
];

const LIST_SEPARATOR: &str = "; ";
const CSV_MATCH_COLUMNS: usize = 3;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("pdf error: {0}")]
    Pdf(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub title: String,
    /// Shown under the PDF title when set.
    pub generated_at: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            title: "Resume Dashboard".to_string(),
            generated_at: None,
        }
    }
}

fn status_cell(record: &CandidateMatchRecord) -> String {
    record
        .status
        .map(|status| status.as_str().to_string())
        .unwrap_or_default()
}

/// One CSV line: candidate fields, the first three matches, and the status.
/// Missing values are empty strings.
pub fn csv_row(record: &CandidateMatchRecord) -> Vec<String> {
    let candidate = &record.candidate;
    let mut row = vec![
        candidate.name.clone(),
        candidate.email.clone(),
        candidate.experience.clone(),
        candidate.location.clone(),
        candidate.skills.join(LIST_SEPARATOR),
        candidate.education.join(LIST_SEPARATOR),
    ];
    for slot in 0..CSV_MATCH_COLUMNS {
        match record.matches.get(slot) {
            Some(m) => {
                row.push(m.title.clone());
                row.push(percent_label(m.scores.final_score));
            }
            None => row.extend([String::new(), String::new()]),
        }
    }
    row.push(status_cell(record));
    row
}

/// One PDF table row; all matches go into a single cell, one per line.
pub fn pdf_row(record: &CandidateMatchRecord) -> Vec<String> {
    let candidate = &record.candidate;
    vec![
        candidate.name.clone(),
        candidate.email.clone(),
        candidate.experience.clone(),
        candidate.location.clone(),
        candidate.skills.join(LIST_SEPARATOR),
        candidate.education.join(LIST_SEPARATOR),
        record
            .matches
            .iter()
            .map(match_label)
            .collect::<Vec<_>>()
            .join("\n"),
        status_cell(record),
    ]
}

pub fn render_csv(records: &[CandidateMatchRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record(csv_row(record))?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

pub fn render_pdf(
    records: &[CandidateMatchRecord],
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let rows: Vec<Vec<String>> = records.iter().map(pdf_row).collect();
    let subtitle = options
        .generated_at
        .as_ref()
        .map(|at| format!("Generated {at} - {} candidates", records.len()));
    render_table(&Table {
        title: &options.title,
        subtitle: subtitle.as_deref(),
        headers: &PDF_HEADERS,
        rows: &rows,
    })
}

pub fn write_csv_export(
    records: &[CandidateMatchRecord],
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let bytes = render_csv(records)?;
    let path = AtomicFileWriter::new(options.output_dir.clone()).write(CSV_FILENAME, &bytes)?;
    dash_info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}

pub fn write_pdf_export(
    records: &[CandidateMatchRecord],
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let bytes = render_pdf(records, options)?;
    let path = AtomicFileWriter::new(options.output_dir.clone()).write(PDF_FILENAME, &bytes)?;
    dash_info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}
