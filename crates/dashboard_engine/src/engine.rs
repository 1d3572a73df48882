use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_core::{CandidateStatus, JobDraft, JobId, ParseOutcome, RequestId};
use dashboard_logging::{dash_debug, dash_warn};

use crate::{ApiError, DashboardApi, EngineEvent};

/// Work the engine performs on its runtime. Each command answers with exactly
/// one [`EngineEvent`] carrying the same request id.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    FetchMatches {
        request: RequestId,
    },
    UpdateStatus {
        request: RequestId,
        email: String,
        status: CandidateStatus,
    },
    FetchJobs {
        request: RequestId,
        status: Option<String>,
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
        path: PathBuf,
    },
}

impl EngineCommand {
    fn name(&self) -> &'static str {
        match self {
            EngineCommand::FetchMatches { .. } => "fetch matches",
            EngineCommand::UpdateStatus { .. } => "update status",
            EngineCommand::FetchJobs { .. } => "fetch jobs",
            EngineCommand::CreateJob { .. } => "create job",
            EngineCommand::UpdateJob { .. } => "update job",
            EngineCommand::DeleteJob { .. } => "delete job",
            EngineCommand::UploadResume { .. } => "upload resume",
        }
    }
}

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(api.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, command: EngineCommand) {
        dash_debug!("Submitting {}", command.name());
        if self.cmd_tx.send(command).is_err() {
            dash_warn!("Engine thread has stopped; command dropped");
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(api: &dyn DashboardApi, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::FetchMatches { request } => EngineEvent::MatchesFetched {
            request,
            result: api.fetch_matches().await,
        },
        EngineCommand::UpdateStatus {
            request,
            email,
            status,
        } => {
            let result = api.update_status(&email, status).await;
            EngineEvent::StatusUpdated {
                request,
                email,
                status,
                result,
            }
        }
        EngineCommand::FetchJobs { request, status } => EngineEvent::JobsFetched {
            request,
            result: api.fetch_jobs(status.as_deref()).await,
        },
        EngineCommand::CreateJob { request, draft } => EngineEvent::JobWritten {
            request,
            result: api.create_job(&draft).await,
        },
        EngineCommand::UpdateJob { request, id, draft } => EngineEvent::JobWritten {
            request,
            result: api.update_job(&id, &draft).await,
        },
        EngineCommand::DeleteJob { request, id } => EngineEvent::JobWritten {
            request,
            result: api.delete_job(&id).await,
        },
        EngineCommand::UploadResume { request, path } => EngineEvent::ResumeParsed {
            request,
            result: upload(api, &path).await,
        },
    }
}

async fn upload(api: &dyn DashboardApi, path: &Path) -> Result<ParseOutcome, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| ApiError::InvalidRequest(format!("{}: {err}", path.display())))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume.pdf".to_string());
    api.parse_resume(&file_name, bytes).await
}
