use crate::{
    ApiFailure, CandidateMatchRecord, CandidateStatus, ExportFormat, Job, JobField, JobId,
    ParseOutcome, RequestId, ResumeSelection, SortKey, StatusFilter, ViewPrefs,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Candidate dashboard mounted.
    DashboardOpened,
    /// Job board mounted.
    JobBoardOpened,
    /// View torn down; results of in-flight requests are discarded.
    DashboardClosed,
    /// User asked for a fresh candidate list.
    RefreshClicked,
    /// Restore search/filter/sort saved by a previous session.
    RestoreViewPrefs(ViewPrefs),
    SearchChanged(String),
    StatusFilterChanged(StatusFilter),
    SortChanged(SortKey),
    CandidateSelected {
        email: String,
    },
    CandidateDeselected,
    /// User set a recruiter status on a candidate.
    StatusChangeRequested {
        email: String,
        status: CandidateStatus,
    },
    ResumeFileRequested {
        email: String,
    },
    ExportRequested(ExportFormat),
    ExportFinished {
        format: ExportFormat,
        result: Result<String, String>,
    },
    /// Saved search/filter/sort could not be written.
    ViewPrefsSaveFailed(String),
    BannerDismissed,
    /// Backend answered the candidate match fetch.
    MatchesLoaded {
        request: RequestId,
        result: Result<Vec<CandidateMatchRecord>, ApiFailure>,
    },
    /// Backend answered a status update.
    StatusUpdateFinished {
        request: RequestId,
        email: String,
        status: CandidateStatus,
        result: Result<(), ApiFailure>,
    },
    JobsRefreshClicked,
    JobSearchChanged(String),
    /// Server-side status filter for `/jobs`; `None` means all.
    JobStatusFilterChanged(Option<String>),
    JobsLoaded {
        request: RequestId,
        result: Result<Vec<Job>, ApiFailure>,
    },
    JobFieldChanged {
        field: JobField,
        value: String,
    },
    JobSubmitClicked,
    JobEditClicked {
        id: JobId,
    },
    JobEditCancelled,
    JobDeleteClicked {
        id: JobId,
    },
    /// Backend answered a job create, update, or delete.
    JobWriteFinished {
        request: RequestId,
        result: Result<(), ApiFailure>,
    },
    ResumeSelected(ResumeSelection),
    ResumeSubmitClicked,
    ResumeParsed {
        request: RequestId,
        result: Result<ParseOutcome, ApiFailure>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
