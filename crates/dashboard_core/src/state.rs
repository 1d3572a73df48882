use std::collections::BTreeMap;

use crate::projection::{filter_jobs, project};
use crate::view_model::{
    AppViewModel, Banner, CandidateDetailView, CandidateRowView, JobRowView, LoadingFlags,
    Severity,
};
use crate::{
    CandidateMatchRecord, CandidateStatus, DashboardStats, Job, JobForm, JobId, ParsedProfile,
    ResumeSelection, SortKey, StatusFilter, ValidationError,
};

/// Identifies one outstanding backend call.
pub type RequestId = u64;

/// Search, filter, and sort settings that survive between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewPrefs {
    pub search: String,
    pub status_filter: StatusFilter,
    pub sort_key: SortKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JobWrite {
    Save,
    Delete,
}

/// Requests whose results the state still wants. Anything else that comes
/// back is stale and gets dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct PendingRequests {
    matches: Option<RequestId>,
    jobs: Option<RequestId>,
    job_write: Option<(RequestId, JobWrite)>,
    upload: Option<RequestId>,
    status: BTreeMap<RequestId, String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    records: Vec<CandidateMatchRecord>,
    stats: DashboardStats,
    prefs: ViewPrefs,
    selected_email: Option<String>,
    jobs: Vec<Job>,
    job_search: String,
    jobs_status: Option<String>,
    job_form: JobForm,
    editing_job: Option<JobId>,
    form_errors: Vec<ValidationError>,
    resume: Option<ResumeSelection>,
    resume_error: Option<ValidationError>,
    parsed_profile: Option<ParsedProfile>,
    banner: Option<Banner>,
    notice: Option<String>,
    next_request: RequestId,
    pending: PendingRequests,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .filtered()
            .into_iter()
            .map(CandidateRowView::from_record)
            .collect();
        let selected = self
            .selected_email
            .as_deref()
            .and_then(|email| self.record(email))
            .map(CandidateDetailView::from_record);
        let jobs = filter_jobs(&self.jobs, &self.job_search)
            .into_iter()
            .map(JobRowView::from_job)
            .collect();

        AppViewModel {
            loading: self.loading(),
            stats: self.stats,
            search: self.prefs.search.clone(),
            status_filter: self.prefs.status_filter,
            sort_key: self.prefs.sort_key,
            rows,
            selected,
            job_search: self.job_search.clone(),
            jobs,
            job_form: self.job_form.clone(),
            editing_job: self.editing_job.clone(),
            form_errors: self.form_errors.iter().map(ToString::to_string).collect(),
            resume: self.resume.clone(),
            resume_error: self.resume_error.as_ref().map(ToString::to_string),
            parsed_profile: self.parsed_profile.clone(),
            banner: self.banner.clone(),
            notice: self.notice.clone(),
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn records(&self) -> &[CandidateMatchRecord] {
        &self.records
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn stats(&self) -> DashboardStats {
        self.stats
    }

    pub fn view_prefs(&self) -> ViewPrefs {
        self.prefs.clone()
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// True while any backend call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.loading().any()
    }

    pub(crate) fn loading(&self) -> LoadingFlags {
        LoadingFlags {
            matches: self.pending.matches.is_some(),
            jobs: self.pending.jobs.is_some(),
            job_write: self.pending.job_write.is_some(),
            upload: self.pending.upload.is_some(),
            status_updates: self.pending.status.len(),
        }
    }

    pub(crate) fn filtered(&self) -> Vec<&CandidateMatchRecord> {
        project(
            &self.records,
            &self.prefs.search,
            self.prefs.status_filter,
            self.prefs.sort_key,
        )
    }

    pub(crate) fn record(&self, email: &str) -> Option<&CandidateMatchRecord> {
        self.records.iter().find(|record| record.email() == email)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn issue_request(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    // --- candidate records -------------------------------------------------

    pub(crate) fn begin_matches_fetch(&mut self) -> RequestId {
        let request = self.issue_request();
        self.pending.matches = Some(request);
        self.mark_dirty();
        request
    }

    pub(crate) fn finish_matches_fetch(&mut self, request: RequestId) -> bool {
        if self.pending.matches == Some(request) {
            self.pending.matches = None;
            true
        } else {
            false
        }
    }

    /// Replaces the whole batch; nothing from the previous fetch survives.
    pub(crate) fn replace_records(&mut self, records: Vec<CandidateMatchRecord>) {
        self.records = records;
        self.stats = DashboardStats::compute(&self.records);
        if let Some(email) = self.selected_email.as_deref() {
            if self.record(email).is_none() {
                self.selected_email = None;
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn begin_status_update(&mut self, email: String) -> RequestId {
        let request = self.issue_request();
        self.pending.status.insert(request, email);
        self.mark_dirty();
        request
    }

    pub(crate) fn finish_status_update(&mut self, request: RequestId) -> bool {
        let known = self.pending.status.remove(&request).is_some();
        if known {
            self.mark_dirty();
        }
        known
    }

    /// Sets the status of the record with `email` and recomputes the stats
    /// from the full set. Returns false when no record has that email.
    pub(crate) fn apply_status(&mut self, email: &str, status: CandidateStatus) -> bool {
        let Some(record) = self
            .records
            .iter_mut()
            .find(|record| record.email() == email)
        else {
            return false;
        };
        record.status = Some(status);
        self.stats = DashboardStats::compute(&self.records);
        self.mark_dirty();
        true
    }

    pub(crate) fn set_search(&mut self, search: String) {
        self.prefs.search = search;
        self.mark_dirty();
    }

    pub(crate) fn set_status_filter(&mut self, filter: StatusFilter) {
        self.prefs.status_filter = filter;
        self.mark_dirty();
    }

    pub(crate) fn set_sort_key(&mut self, sort: SortKey) {
        self.prefs.sort_key = sort;
        self.mark_dirty();
    }

    pub(crate) fn restore_prefs(&mut self, prefs: ViewPrefs) {
        self.prefs = prefs;
        self.mark_dirty();
    }

    pub(crate) fn select(&mut self, email: Option<String>) {
        self.selected_email = email;
        self.mark_dirty();
    }

    // --- jobs --------------------------------------------------------------

    pub(crate) fn jobs_status(&self) -> Option<String> {
        self.jobs_status.clone()
    }

    pub(crate) fn set_jobs_status(&mut self, status: Option<String>) {
        self.jobs_status = status;
        self.mark_dirty();
    }

    pub(crate) fn set_job_search(&mut self, search: String) {
        self.job_search = search;
        self.mark_dirty();
    }

    pub(crate) fn begin_jobs_fetch(&mut self) -> RequestId {
        let request = self.issue_request();
        self.pending.jobs = Some(request);
        self.mark_dirty();
        request
    }

    pub(crate) fn finish_jobs_fetch(&mut self, request: RequestId) -> bool {
        if self.pending.jobs == Some(request) {
            self.pending.jobs = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn replace_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
        self.mark_dirty();
    }

    pub(crate) fn job_form(&self) -> &JobForm {
        &self.job_form
    }

    pub(crate) fn job_form_mut(&mut self) -> &mut JobForm {
        self.mark_dirty();
        &mut self.job_form
    }

    pub(crate) fn editing_job(&self) -> Option<&JobId> {
        self.editing_job.as_ref()
    }

    pub(crate) fn start_editing(&mut self, id: JobId, form: JobForm) {
        self.editing_job = Some(id);
        self.job_form = form;
        self.form_errors.clear();
        self.mark_dirty();
    }

    pub(crate) fn reset_job_form(&mut self) {
        self.job_form = JobForm::default();
        self.editing_job = None;
        self.form_errors.clear();
        self.mark_dirty();
    }

    pub(crate) fn set_form_errors(&mut self, errors: Vec<ValidationError>) {
        self.form_errors = errors;
        self.mark_dirty();
    }

    pub(crate) fn job_write_in_flight(&self) -> bool {
        self.pending.job_write.is_some()
    }

    pub(crate) fn begin_job_write(&mut self, kind: JobWrite) -> RequestId {
        let request = self.issue_request();
        self.pending.job_write = Some((request, kind));
        self.mark_dirty();
        request
    }

    pub(crate) fn finish_job_write(&mut self, request: RequestId) -> Option<JobWrite> {
        match self.pending.job_write {
            Some((pending, kind)) if pending == request => {
                self.pending.job_write = None;
                self.mark_dirty();
                Some(kind)
            }
            _ => None,
        }
    }

    // --- resume upload -----------------------------------------------------

    pub(crate) fn resume(&self) -> Option<&ResumeSelection> {
        self.resume.as_ref()
    }

    pub(crate) fn select_resume(&mut self, selection: Option<ResumeSelection>) {
        self.resume = selection;
        self.resume_error = None;
        self.mark_dirty();
    }

    pub(crate) fn set_resume_error(&mut self, error: ValidationError) {
        self.resume_error = Some(error);
        self.mark_dirty();
    }

    pub(crate) fn upload_in_flight(&self) -> bool {
        self.pending.upload.is_some()
    }

    pub(crate) fn begin_upload(&mut self) -> RequestId {
        let request = self.issue_request();
        self.pending.upload = Some(request);
        self.resume_error = None;
        self.mark_dirty();
        request
    }

    pub(crate) fn finish_upload(&mut self, request: RequestId) -> bool {
        if self.pending.upload == Some(request) {
            self.pending.upload = None;
            self.mark_dirty();
            true
        } else {
            false
        }
    }

    pub(crate) fn set_parsed_profile(&mut self, profile: ParsedProfile) {
        self.parsed_profile = Some(profile);
        self.mark_dirty();
    }

    // --- messages ----------------------------------------------------------

    pub(crate) fn show_banner(&mut self, banner: Banner) {
        self.banner = Some(banner);
        self.mark_dirty();
    }

    pub(crate) fn clear_banner(&mut self) {
        if self.banner.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Clears the banner only when it reports an error; warnings stay until
    /// dismissed.
    pub(crate) fn clear_error_banner(&mut self) {
        if matches!(&self.banner, Some(banner) if banner.severity == Severity::Error) {
            self.clear_banner();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
        self.mark_dirty();
    }

    /// Forgets every outstanding request so late results are discarded.
    pub(crate) fn abandon_requests(&mut self) {
        if self.pending != PendingRequests::default() {
            self.pending = PendingRequests::default();
            self.mark_dirty();
        }
    }
}
