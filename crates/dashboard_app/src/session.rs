use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context};
use dashboard_core::{update, AppState, CandidateStatus, JobField, Msg, ResumeSelection, Severity};
use dashboard_logging::{dash_debug, dash_info};

use crate::cli::{CandidatesArgs, JobFields};
use crate::effects::EffectRunner;
use crate::prefs::load_prefs;
use crate::render;

/// Drives one CLI command through the state machine: messages go through
/// `update`, effects through the runner, until nothing is in flight.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    reported: Vec<String>,
}

impl Session {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            reported: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn view(&self) -> dashboard_core::AppViewModel {
        self.state.view()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            inbox.extend(self.runner.run(effects));
        }
    }

    /// Waits until every outstanding request has answered. Each wait is
    /// bounded by the slowest configured call.
    pub fn settle(&mut self) -> anyhow::Result<()> {
        let wait = self.runner.config().longest_call();
        while self.state.is_busy() {
            dash_debug!("Waiting for backend: {:?}", self.state.view().loading);
            match self.runner.next_event(wait) {
                Some(msg) => self.dispatch(msg),
                None => bail!(
                    "no answer from {} within {}s",
                    self.runner.config().api_base,
                    wait.as_secs()
                ),
            }
        }
        Ok(())
    }

    /// Discards anything still in flight.
    pub fn close(&mut self) {
        self.dispatch(Msg::DashboardClosed);
    }

    /// Prints messages that appeared since the last report. Fails when the
    /// view shows an error.
    fn report(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        if !self.state.consume_dirty() {
            return Ok(());
        }
        let view = self.state.view();
        let lines = render::messages(&view);
        for line in lines.iter().filter(|line| !self.reported.contains(line)) {
            writeln!(out, "{line}")?;
        }
        self.reported = lines;

        let mut errors = view.form_errors.clone();
        errors.extend(view.resume_error.clone());
        if let Some(banner) = view.banner.filter(|b| b.severity == Severity::Error) {
            errors.push(banner.message);
        }
        if !errors.is_empty() {
            bail!(errors.join("; "));
        }
        Ok(())
    }

    fn open_dashboard(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        self.dispatch(Msg::DashboardOpened);
        self.settle()?;
        self.report(out)
    }

    fn select_candidate(&mut self, email: &str) -> anyhow::Result<()> {
        self.dispatch(Msg::CandidateSelected {
            email: email.to_string(),
        });
        if self.state.view().selected.is_none() {
            bail!("no candidate with email {email}");
        }
        Ok(())
    }

    pub fn candidates(&mut self, args: CandidatesArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        if let Some(prefs) = load_prefs(&self.runner.config().output_dir) {
            self.dispatch(Msg::RestoreViewPrefs(prefs));
        }
        if let Some(search) = args.search {
            self.dispatch(Msg::SearchChanged(search));
        }
        if let Some(filter) = args.status {
            self.dispatch(Msg::StatusFilterChanged(filter));
        }
        if let Some(sort) = args.sort {
            self.dispatch(Msg::SortChanged(sort));
        }
        self.open_dashboard(out)?;
        writeln!(out, "{}", render::candidates(&self.state.view()))?;

        for format in args.export.map(|choice| choice.formats()).unwrap_or_default() {
            self.dispatch(Msg::ExportRequested(format));
            self.report(out)?;
        }
        Ok(())
    }

    pub fn show(&mut self, email: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        self.open_dashboard(out)?;
        self.select_candidate(email)?;
        if let Some(detail) = self.state.view().selected {
            writeln!(out, "{}", render::candidate_detail(&detail))?;
        }
        Ok(())
    }

    pub fn set_status(
        &mut self,
        email: &str,
        status: CandidateStatus,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        self.open_dashboard(out)?;
        self.select_candidate(email)?;
        self.dispatch(Msg::StatusChangeRequested {
            email: email.to_string(),
            status,
        });
        self.settle()?;
        self.report(out)?;

        let view = self.state.view();
        writeln!(out, "{}", render::stats_line(&view.stats))?;
        if let Some(detail) = view.selected {
            let label = detail.status.map_or("pending", CandidateStatus::as_str);
            writeln!(out, "{email}: {label}")?;
        }
        Ok(())
    }

    pub fn resume_url(&mut self, email: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        self.dispatch(Msg::ResumeFileRequested {
            email: email.to_string(),
        });
        let urls = self.runner.take_resume_urls();
        if urls.is_empty() {
            bail!("could not build a resume URL for {email:?}");
        }
        for url in urls {
            writeln!(out, "{url}")?;
        }
        Ok(())
    }

    pub fn list_jobs(
        &mut self,
        search: Option<String>,
        status: Option<String>,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        if let Some(search) = search {
            self.dispatch(Msg::JobSearchChanged(search));
        }
        match status {
            Some(status) => self.dispatch(Msg::JobStatusFilterChanged(Some(status))),
            None => self.dispatch(Msg::JobBoardOpened),
        }
        self.settle()?;
        self.report(out)?;
        writeln!(out, "{}", render::jobs(&self.state.view()))?;
        Ok(())
    }

    pub fn add_job(&mut self, fields: JobFields, out: &mut dyn Write) -> anyhow::Result<()> {
        self.fill_job_form(fields);
        self.submit_job(out)
    }

    pub fn edit_job(
        &mut self,
        id: &str,
        fields: JobFields,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        self.dispatch(Msg::JobBoardOpened);
        self.settle()?;
        self.report(out)?;
        self.dispatch(Msg::JobEditClicked { id: id.to_string() });
        if self.state.view().editing_job.as_deref() != Some(id) {
            bail!("no job posting with id {id}");
        }
        self.fill_job_form(fields);
        self.submit_job(out)
    }

    pub fn delete_job(&mut self, id: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        self.dispatch(Msg::JobDeleteClicked { id: id.to_string() });
        self.settle()?;
        self.report(out)
    }

    fn fill_job_form(&mut self, fields: JobFields) {
        let provided = [
            (JobField::Title, fields.title),
            (JobField::Company, fields.company),
            (JobField::Location, fields.location),
            (JobField::Description, fields.description),
            (JobField::Requirements, fields.requirements),
            (JobField::Salary, fields.salary),
            (JobField::Skills, fields.skills),
            (JobField::Experience, fields.experience),
        ];
        for (field, value) in provided {
            if let Some(value) = value {
                self.dispatch(Msg::JobFieldChanged { field, value });
            }
        }
    }

    fn submit_job(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        self.dispatch(Msg::JobSubmitClicked);
        self.settle()?;
        self.report(out)
    }

    pub fn upload(&mut self, path: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
        let metadata =
            fs::metadata(path).with_context(|| format!("could not read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        dash_info!("Uploading {file_name} ({} bytes)", metadata.len());

        self.dispatch(Msg::ResumeSelected(ResumeSelection {
            path: path.to_string_lossy().into_owned(),
            file_name,
            size_bytes: metadata.len(),
        }));
        self.dispatch(Msg::ResumeSubmitClicked);
        self.settle()?;
        if let Some(profile) = self.state.view().parsed_profile {
            writeln!(out, "{}", render::profile(&profile))?;
        }
        self.report(out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use dashboard_core::{
        Candidate, CandidateMatchRecord, Job, JobDraft, MatchResult, ParseOutcome, ParsedProfile,
        Scores,
    };
    use dashboard_engine::{ApiError, DashboardApi};

    use super::*;
    use crate::config::AppConfig;

    #[derive(Default)]
    struct ScriptedApi {
        fail_matches: bool,
        fail_status: bool,
        created: Mutex<Vec<JobDraft>>,
        deleted: Mutex<Vec<String>>,
    }

    fn record(email: &str, score: f64) -> CandidateMatchRecord {
        CandidateMatchRecord {
            candidate: Candidate {
                name: email.split('@').next().unwrap_or_default().to_string(),
                email: email.to_string(),
                ..Candidate::default()
            },
            matches: vec![MatchResult {
                title: "Backend Engineer".to_string(),
                scores: Scores {
                    final_score: score,
                    ..Scores::default()
                },
                ..MatchResult::default()
            }],
            status: None,
        }
    }

    #[async_trait]
    impl DashboardApi for ScriptedApi {
        async fn fetch_matches(&self) -> Result<Vec<CandidateMatchRecord>, ApiError> {
            if self.fail_matches {
                return Err(ApiError::Timeout);
            }
            Ok(vec![record("ann@x.com", 0.91), record("bo@x.com", 0.42)])
        }
        async fn update_status(&self, _: &str, _: CandidateStatus) -> Result<(), ApiError> {
            if self.fail_status {
                return Err(ApiError::Server {
                    status: 500,
                    message: "database locked".to_string(),
                });
            }
            Ok(())
        }
        async fn fetch_jobs(&self, _: Option<&str>) -> Result<Vec<Job>, ApiError> {
            Ok(vec![Job {
                id: "j1".to_string(),
                title: "Data Engineer".to_string(),
                company: "Company Not Specified".to_string(),
                skills: vec!["python".to_string()],
                experience: "3 years".to_string(),
                ..Job::default()
            }])
        }
        async fn create_job(&self, draft: &JobDraft) -> Result<(), ApiError> {
            self.created.lock().unwrap().push(draft.clone());
            Ok(())
        }
        async fn update_job(&self, _: &str, draft: &JobDraft) -> Result<(), ApiError> {
            self.created.lock().unwrap().push(draft.clone());
            Ok(())
        }
        async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(())
        }
        async fn parse_resume(&self, _: &str, _: Vec<u8>) -> Result<ParseOutcome, ApiError> {
            Ok(ParseOutcome {
                profile: ParsedProfile {
                    name: "Ann".to_string(),
                    ..ParsedProfile::default()
                },
                partial: true,
                details: vec!["phone missing".to_string()],
            })
        }
    }

    fn session(api: Arc<ScriptedApi>, dir: &Path) -> Session {
        dashboard_logging::initialize_for_tests();
        let config = AppConfig {
            output_dir: dir.to_path_buf(),
            ..AppConfig::default()
        };
        Session::new(EffectRunner::new(api, config))
    }

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn candidates_lists_and_exports() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(Arc::new(ScriptedApi::default()), dir.path());
        let mut out = Vec::new();
        let args = CandidatesArgs {
            search: None,
            status: None,
            sort: None,
            export: Some(crate::cli::ExportChoice::Both),
        };
        session.candidates(args, &mut out).unwrap();
        let out = text(out);
        assert!(out.starts_with("Total 2 |"));
        assert!(out.contains("ann@x.com"));
        assert!(out.contains("Exported csv to"));
        assert!(out.contains("Exported pdf to"));
        assert!(dir.path().join("resume_dashboard.pdf").exists());
    }

    #[test]
    fn search_flag_is_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi::default());
        let mut first = session(api.clone(), dir.path());
        let args = CandidatesArgs {
            search: Some("bo@".to_string()),
            status: None,
            sort: None,
            export: None,
        };
        first.candidates(args, &mut Vec::new()).unwrap();

        let mut second = session(api, dir.path());
        let args = CandidatesArgs {
            search: None,
            status: None,
            sort: None,
            export: None,
        };
        second.candidates(args, &mut Vec::new()).unwrap();
        let view = second.view();
        assert_eq!(view.search, "bo@");
        assert_eq!(view.rows.len(), 1);
    }

    #[test]
    fn fetch_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi {
            fail_matches: true,
            ..ScriptedApi::default()
        });
        let mut session = session(api, dir.path());
        let err = session.show("ann@x.com", &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Request timeout. Please try again.");
    }

    #[test]
    fn set_status_reports_new_stats() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(Arc::new(ScriptedApi::default()), dir.path());
        let mut out = Vec::new();
        session
            .set_status("bo@x.com", CandidateStatus::Rejected, &mut out)
            .unwrap();
        let out = text(out);
        assert!(out.contains("Rejected 1 | Pending 1"));
        assert!(out.ends_with("bo@x.com: Rejected\n"));
    }

    #[test]
    fn failed_status_update_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi {
            fail_status: true,
            ..ScriptedApi::default()
        });
        let mut session = session(api, dir.path());
        let err = session
            .set_status("ann@x.com", CandidateStatus::Shortlisted, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Error updating status: database locked");
        assert_eq!(session.view().stats.shortlisted, 0);
    }

    #[test]
    fn unknown_candidate_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(Arc::new(ScriptedApi::default()), dir.path());
        let err = session.show("zed@x.com", &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("zed@x.com"));
    }

    #[test]
    fn add_job_validates_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi::default());
        let mut session = session(api.clone(), dir.path());
        let fields = JobFields {
            title: Some("Engineer".to_string()),
            ..JobFields::default()
        };
        let err = session.add_job(fields, &mut Vec::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Skills are required; Experience requirement is required"
        );
        assert!(api.created.lock().unwrap().is_empty());
    }

    #[test]
    fn edit_job_keeps_untouched_fields() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi::default());
        let mut session = session(api.clone(), dir.path());
        let fields = JobFields {
            salary: Some("90k".to_string()),
            ..JobFields::default()
        };
        let mut out = Vec::new();
        session.edit_job("j1", fields, &mut out).unwrap();
        let created = api.created.lock().unwrap();
        assert_eq!(created[0].title, "Data Engineer");
        assert_eq!(created[0].salary, "90k");
        assert_eq!(created[0].company, "Company Not Specified");
        assert!(text(out).contains("Job saved successfully"));
    }

    #[test]
    fn delete_job_calls_backend() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi::default());
        let mut session = session(api.clone(), dir.path());
        let mut out = Vec::new();
        session.delete_job("j1", &mut out).unwrap();
        assert_eq!(*api.deleted.lock().unwrap(), vec!["j1".to_string()]);
        assert_eq!(text(out), "Job deleted\n");
    }

    #[test]
    fn partial_upload_prints_profile_and_warning() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("ann.pdf");
        fs::write(&resume, b"%PDF-1.4").unwrap();
        let mut session = session(Arc::new(ScriptedApi::default()), dir.path());
        let mut out = Vec::new();
        session.upload(&resume, &mut out).unwrap();
        let out = text(out);
        assert!(out.starts_with("Parsed profile\n  Name: Ann"));
        assert!(out.contains("warning: Resume parsed with warnings: phone missing"));
    }

    #[test]
    fn unwritable_prefs_warn_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("exports");
        fs::write(&blocked, b"file").unwrap();
        let mut session = session(Arc::new(ScriptedApi::default()), &blocked);
        let args = CandidatesArgs {
            search: Some("ann".to_string()),
            status: None,
            sort: None,
            export: None,
        };
        let mut out = Vec::new();
        session.candidates(args, &mut out).unwrap();
        assert!(text(out).contains("warning: View preferences were not saved"));
    }

    #[test]
    fn nothing_is_reported_twice() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(Arc::new(ScriptedApi::default()), dir.path());
        let mut out = Vec::new();
        session.delete_job("j1", &mut out).unwrap();
        session.report(&mut out).unwrap();
        assert_eq!(text(out), "Job deleted\n");
    }

    #[test]
    fn non_pdf_upload_is_rejected_locally() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("ann.docx");
        fs::write(&resume, b"doc").unwrap();
        let mut session = session(Arc::new(ScriptedApi::default()), dir.path());
        let err = session.upload(&resume, &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Only PDF files are allowed.");
    }
}
