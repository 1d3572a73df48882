//! Dashboard core: pure state machine, projections, and view-model helpers.
mod effect;
mod failure;
mod format;
mod model;
mod msg;
mod projection;
mod state;
mod stats;
mod update;
mod validation;
mod view_model;
mod wire;

pub use effect::Effect;
pub use failure::{ApiFailure, FailureKind};
pub use format::{match_label, percent, percent_label, ScoreBand};
pub use model::{
    Candidate, CandidateMatchRecord, CandidateStatus, ExportFormat, Job, JobDraft, JobId,
    MatchResult, ParseOutcome, ParsedProfile, Scores,
};
pub use msg::Msg;
pub use projection::{filter_jobs, matches_search, project, SortKey, StatusFilter};
pub use state::{AppState, RequestId, ViewPrefs};
pub use stats::DashboardStats;
pub use update::update;
pub use validation::{
    validate_resume, JobField, JobForm, ResumeSelection, ValidationError, MAX_RESUME_BYTES,
    MAX_SKILLS,
};
pub use view_model::{
    AppViewModel, Banner, CandidateDetailView, CandidateRowView, JobRowView, LoadingFlags,
    MatchView, Severity,
};
