use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dashboard_core::{CandidateStatus, ExportFormat, SortKey, StatusFilter};

#[derive(Debug, Parser)]
#[command(name = "recruit-dashboard")]
#[command(about = "Review resume matches, manage job postings, and upload resumes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level and mirror the log to the terminal
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: ./recruit_dashboard.ron)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file (default: ./dashboard.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Forget the saved search, filter, and sort settings
    #[arg(long, global = true)]
    pub reset_prefs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List candidates with their top match and the dashboard statistics
    Candidates(CandidatesArgs),

    /// Show every match for one candidate
    Show {
        email: String,
    },

    /// Set a recruiter status (shortlisted, rejected, under-review)
    SetStatus {
        email: String,
        #[arg(value_parser = parse_status)]
        status: CandidateStatus,
    },

    /// Print the URL of a candidate's stored resume
    ResumeUrl {
        email: String,
    },

    /// Manage job postings
    #[command(subcommand)]
    Jobs(JobsCommand),

    /// Upload a PDF resume for parsing
    Upload {
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct CandidatesArgs {
    /// Case-insensitive search over name, email, location, and skills
    #[arg(short, long)]
    pub search: Option<String>,

    /// all, pending, shortlisted, rejected, or under-review
    #[arg(long, value_parser = parse_filter)]
    pub status: Option<StatusFilter>,

    /// name, score, or status
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortKey>,

    /// Export the listed candidates
    #[arg(short, long)]
    pub export: Option<ExportChoice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportChoice {
    Csv,
    Pdf,
    Both,
}

impl ExportChoice {
    pub fn formats(self) -> Vec<ExportFormat> {
        match self {
            ExportChoice::Csv => vec![ExportFormat::Csv],
            ExportChoice::Pdf => vec![ExportFormat::Pdf],
            ExportChoice::Both => vec![ExportFormat::Csv, ExportFormat::Pdf],
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List job postings
    List {
        /// Case-insensitive search over title, company, location, and skills
        #[arg(short, long)]
        search: Option<String>,

        /// Server-side status filter
        #[arg(long)]
        status: Option<String>,
    },

    /// Create a job posting
    Add(JobFields),

    /// Edit an existing job posting; omitted fields keep their value
    Edit {
        id: String,
        #[command(flatten)]
        fields: JobFields,
    },

    /// Delete a job posting
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct JobFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub requirements: Option<String>,
    #[arg(long)]
    pub salary: Option<String>,
    /// Comma-separated, at most 20
    #[arg(long)]
    pub skills: Option<String>,
    #[arg(long)]
    pub experience: Option<String>,
}

fn parse_status(raw: &str) -> Result<CandidateStatus, String> {
    CandidateStatus::parse(raw).ok_or_else(|| {
        format!("unknown status {raw:?}; use shortlisted, rejected, or under-review")
    })
}

fn parse_filter(raw: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(raw).ok_or_else(|| {
        format!("unknown filter {raw:?}; use all, pending, shortlisted, rejected, or under-review")
    })
}

fn parse_sort(raw: &str) -> Result<SortKey, String> {
    SortKey::parse(raw).ok_or_else(|| format!("unknown sort key {raw:?}; use name, score, or status"))
}
