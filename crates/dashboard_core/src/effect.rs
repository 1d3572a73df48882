use crate::{CandidateMatchRecord, CandidateStatus, ExportFormat, JobDraft, JobId, RequestId, ViewPrefs};

/// I/O requested by [`crate::update`]. Effects carrying a `request` report
/// back through the matching `Msg` with the same id.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchMatches {
        request: RequestId,
    },
    FetchJobs {
        request: RequestId,
        status: Option<String>,
    },
    UpdateStatus {
        request: RequestId,
        email: String,
        status: CandidateStatus,
    },
    CreateJob {
        request: RequestId,
        draft: JobDraft,
    },
    UpdateJob {
        request: RequestId,
        id: JobId,
        draft: JobDraft,
    },
    DeleteJob {
        request: RequestId,
        id: JobId,
    },
    UploadResume {
        request: RequestId,
        path: String,
    },
    /// Snapshot of the filtered view at the time of the request.
    Export {
        format: ExportFormat,
        records: Vec<CandidateMatchRecord>,
    },
    /// Open the stored resume in a separate view context; never fetched here.
    OpenResumeFile {
        email: String,
    },
    PersistViewPrefs(ViewPrefs),
}
