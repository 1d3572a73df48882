use dashboard_core::{
    ApiFailure, CandidateMatchRecord, CandidateStatus, FailureKind, Job, Msg, ParseOutcome,
    RequestId,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<ApiError> for ApiFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Server { status, message } => ApiFailure::server(status, message),
            ApiError::Network(message) => ApiFailure::network(message),
            ApiError::Timeout => ApiFailure::timeout(),
            ApiError::InvalidRequest(message) => ApiFailure::new(FailureKind::Request, message),
        }
    }
}

/// Completion of one engine command, tagged with the request that issued it.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    MatchesFetched {
        request: RequestId,
        result: Result<Vec<CandidateMatchRecord>, ApiError>,
    },
    StatusUpdated {
        request: RequestId,
        email: String,
        status: CandidateStatus,
        result: Result<(), ApiError>,
    },
    JobsFetched {
        request: RequestId,
        result: Result<Vec<Job>, ApiError>,
    },
    JobWritten {
        request: RequestId,
        result: Result<(), ApiError>,
    },
    ResumeParsed {
        request: RequestId,
        result: Result<ParseOutcome, ApiError>,
    },
}

impl EngineEvent {
    pub fn request(&self) -> RequestId {
        match self {
            EngineEvent::MatchesFetched { request, .. }
            | EngineEvent::StatusUpdated { request, .. }
            | EngineEvent::JobsFetched { request, .. }
            | EngineEvent::JobWritten { request, .. }
            | EngineEvent::ResumeParsed { request, .. } => *request,
        }
    }

    /// Converts the event into the message the state machine expects.
    pub fn into_msg(self) -> Msg {
        match self {
            EngineEvent::MatchesFetched { request, result } => Msg::MatchesLoaded {
                request,
                result: result.map_err(ApiFailure::from),
            },
            EngineEvent::StatusUpdated {
                request,
                email,
                status,
                result,
            } => Msg::StatusUpdateFinished {
                request,
                email,
                status,
                result: result.map_err(ApiFailure::from),
            },
            EngineEvent::JobsFetched { request, result } => Msg::JobsLoaded {
                request,
                result: result.map_err(ApiFailure::from),
            },
            EngineEvent::JobWritten { request, result } => Msg::JobWriteFinished {
                request,
                result: result.map_err(ApiFailure::from),
            },
            EngineEvent::ResumeParsed { request, result } => Msg::ResumeParsed {
                request,
                result: result.map_err(ApiFailure::from),
            },
        }
    }
}
