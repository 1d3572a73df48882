use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashboard_core::{
    CandidateMatchRecord, CandidateStatus, FailureKind, Job, JobDraft, Msg, ParseOutcome,
    ParsedProfile,
};
use dashboard_engine::{ApiError, DashboardApi, EngineCommand, EngineEvent, EngineHandle};

#[derive(Default)]
struct FakeApi {
    uploads: Mutex<Vec<(String, usize)>>,
}

#[async_trait::async_trait]
impl DashboardApi for FakeApi {
    async fn fetch_matches(&self) -> Result<Vec<CandidateMatchRecord>, ApiError> {
        Ok(vec![CandidateMatchRecord::default()])
    }

    async fn update_status(&self, _email: &str, _status: CandidateStatus) -> Result<(), ApiError> {
        Err(ApiError::Timeout)
    }

    async fn fetch_jobs(&self, status: Option<&str>) -> Result<Vec<Job>, ApiError> {
        Ok(vec![Job {
            id: status.unwrap_or("all").to_string(),
            ..Job::default()
        }])
    }

    async fn create_job(&self, _draft: &JobDraft) -> Result<(), ApiError> {
        Ok(())
    }

    async fn update_job(&self, _id: &str, _draft: &JobDraft) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        Err(ApiError::Server {
            status: 404,
            message: format!("{id} not found"),
        })
    }

    async fn parse_resume(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ParseOutcome, ApiError> {
        self.uploads
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes.len()));
        Ok(ParseOutcome {
            profile: ParsedProfile::default(),
            partial: false,
            details: Vec::new(),
        })
    }
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(5))
        .expect("engine answered")
}

#[test]
fn commands_answer_with_matching_request_ids() {
    let engine = EngineHandle::new(Arc::new(FakeApi::default()));

    engine.submit(EngineCommand::FetchMatches { request: 7 });
    let event = next_event(&engine);
    assert_eq!(event.request(), 7);
    match event.into_msg() {
        Msg::MatchesLoaded { request, result } => {
            assert_eq!(request, 7);
            assert_eq!(result.unwrap().len(), 1);
        }
        other => panic!("unexpected message {other:?}"),
    }

    engine.submit(EngineCommand::FetchJobs {
        request: 8,
        status: Some("active".to_string()),
    });
    match next_event(&engine) {
        EngineEvent::JobsFetched { request, result } => {
            assert_eq!(request, 8);
            assert_eq!(result.unwrap()[0].id, "active");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn failures_become_categorized_messages() {
    let engine = EngineHandle::new(Arc::new(FakeApi::default()));

    engine.submit(EngineCommand::UpdateStatus {
        request: 1,
        email: "a@x.com".to_string(),
        status: CandidateStatus::Rejected,
    });
    match next_event(&engine).into_msg() {
        Msg::StatusUpdateFinished {
            email,
            status,
            result,
            ..
        } => {
            assert_eq!(email, "a@x.com");
            assert_eq!(status, CandidateStatus::Rejected);
            assert_eq!(result.unwrap_err().kind, FailureKind::Timeout);
        }
        other => panic!("unexpected message {other:?}"),
    }

    engine.submit(EngineCommand::DeleteJob {
        request: 2,
        id: "j1".to_string(),
    });
    match next_event(&engine).into_msg() {
        Msg::JobWriteFinished { result, .. } => {
            let failure = result.unwrap_err();
            assert_eq!(failure.kind, FailureKind::Server { status: 404 });
            assert_eq!(failure.message, "j1 not found");
        }
        other => panic!("unexpected message {other:?}"),
    }
}

#[test]
fn upload_reads_the_file_from_disk() {
    let api = Arc::new(FakeApi::default());
    let engine = EngineHandle::new(api.clone());
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"%PDF-1.4 resume").unwrap();

    engine.submit(EngineCommand::UploadResume {
        request: 3,
        path: file.path().to_path_buf(),
    });
    match next_event(&engine) {
        EngineEvent::ResumeParsed { request, result } => {
            assert_eq!(request, 3);
            assert!(result.is_ok());
        }
        other => panic!("unexpected event {other:?}"),
    }
    let uploads = api.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].0.ends_with(".pdf"));
    assert_eq!(uploads[0].1, 15);
}

#[test]
fn missing_upload_file_is_a_request_failure() {
    let engine = EngineHandle::new(Arc::new(FakeApi::default()));
    engine.submit(EngineCommand::UploadResume {
        request: 4,
        path: "/definitely/not/here.pdf".into(),
    });
    match next_event(&engine).into_msg() {
        Msg::ResumeParsed { result, .. } => {
            assert_eq!(result.unwrap_err().kind, FailureKind::Request);
        }
        other => panic!("unexpected message {other:?}"),
    }
}
