use crate::state::JobWrite;
use crate::validation::validate_resume;
use crate::view_model::Banner;
use crate::{ApiFailure, AppState, Effect, FailureKind, JobForm, Msg, ParseOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DashboardOpened | Msg::RefreshClicked => {
            let request = state.begin_matches_fetch();
            vec![Effect::FetchMatches { request }]
        }
        Msg::JobBoardOpened | Msg::JobsRefreshClicked => fetch_jobs(&mut state),
        Msg::DashboardClosed => {
            state.abandon_requests();
            Vec::new()
        }
        Msg::RestoreViewPrefs(prefs) => {
            state.restore_prefs(prefs);
            Vec::new()
        }
        Msg::SearchChanged(search) => {
            state.set_search(search);
            vec![Effect::PersistViewPrefs(state.view_prefs())]
        }
        Msg::StatusFilterChanged(filter) => {
            state.set_status_filter(filter);
            vec![Effect::PersistViewPrefs(state.view_prefs())]
        }
        Msg::SortChanged(sort) => {
            state.set_sort_key(sort);
            vec![Effect::PersistViewPrefs(state.view_prefs())]
        }
        Msg::CandidateSelected { email } => {
            if state.record(&email).is_some() {
                state.select(Some(email));
            }
            Vec::new()
        }
        Msg::CandidateDeselected => {
            state.select(None);
            Vec::new()
        }
        Msg::StatusChangeRequested { email, status } => {
            if email.trim().is_empty() {
                return (state, Vec::new());
            }
            let request = state.begin_status_update(email.clone());
            vec![Effect::UpdateStatus {
                request,
                email,
                status,
            }]
        }
        Msg::StatusUpdateFinished {
            request,
            email,
            status,
            result,
        } => {
            if !state.finish_status_update(request) {
                return (state, Vec::new());
            }
            match result {
                Ok(()) => {
                    if !state.apply_status(&email, status) {
                        state.set_notice(format!(
                            "Status saved as {status}, but {email} is no longer listed"
                        ));
                    }
                }
                Err(failure) => {
                    state.show_banner(Banner::error(format!(
                        "Error updating status: {}",
                        failure.message
                    )));
                }
            }
            Vec::new()
        }
        Msg::MatchesLoaded { request, result } => {
            if !state.finish_matches_fetch(request) {
                return (state, Vec::new());
            }
            match result {
                Ok(records) => {
                    state.replace_records(records);
                    state.clear_error_banner();
                }
                Err(failure) => state.show_banner(Banner::error(matches_failure_text(&failure))),
            }
            Vec::new()
        }
        Msg::ResumeFileRequested { email } => {
            if email.trim().is_empty() {
                Vec::new()
            } else {
                vec![Effect::OpenResumeFile { email }]
            }
        }
        Msg::ExportRequested(format) => {
            let records = state.filtered().into_iter().cloned().collect();
            vec![Effect::Export { format, records }]
        }
        Msg::ExportFinished { format, result } => {
            match result {
                Ok(path) => state.set_notice(format!("Exported {} to {path}", format.as_str())),
                Err(message) => state.show_banner(Banner::error(format!(
                    "Export to {} failed: {message}",
                    format.as_str()
                ))),
            }
            Vec::new()
        }
        Msg::ViewPrefsSaveFailed(message) => {
            state.show_banner(Banner::warning(format!(
                "View preferences were not saved: {message}"
            )));
            Vec::new()
        }
        Msg::BannerDismissed => {
            state.clear_banner();
            Vec::new()
        }
        Msg::JobSearchChanged(search) => {
            state.set_job_search(search);
            Vec::new()
        }
        Msg::JobStatusFilterChanged(status) => {
            let status = status.filter(|s| !s.trim().is_empty() && s != "all");
            state.set_jobs_status(status);
            fetch_jobs(&mut state)
        }
        Msg::JobsLoaded { request, result } => {
            if !state.finish_jobs_fetch(request) {
                return (state, Vec::new());
            }
            match result {
                Ok(jobs) => state.replace_jobs(jobs),
                Err(_) => {
                    state.replace_jobs(Vec::new());
                    state.show_banner(Banner::error("Failed to load jobs. Please try again."));
                }
            }
            Vec::new()
        }
        Msg::JobFieldChanged { field, value } => {
            state.job_form_mut().set(field, value);
            state.set_form_errors(Vec::new());
            Vec::new()
        }
        Msg::JobEditClicked { id } => {
            if let Some(job) = state.job(&id) {
                let form = JobForm::from_job(job);
                state.start_editing(id, form);
            }
            Vec::new()
        }
        Msg::JobEditCancelled => {
            state.reset_job_form();
            Vec::new()
        }
        Msg::JobSubmitClicked => {
            if state.job_write_in_flight() {
                return (state, Vec::new());
            }
            let errors = state.job_form().validate();
            if !errors.is_empty() {
                state.set_form_errors(errors);
                return (state, Vec::new());
            }
            state.set_form_errors(Vec::new());
            let draft = state.job_form().to_draft();
            let editing = state.editing_job().cloned();
            let request = state.begin_job_write(JobWrite::Save);
            match editing {
                Some(id) => vec![Effect::UpdateJob { request, id, draft }],
                None => vec![Effect::CreateJob { request, draft }],
            }
        }
        Msg::JobDeleteClicked { id } => {
            if state.job_write_in_flight() || id.trim().is_empty() {
                return (state, Vec::new());
            }
            let request = state.begin_job_write(JobWrite::Delete);
            vec![Effect::DeleteJob { request, id }]
        }
        Msg::JobWriteFinished { request, result } => {
            let Some(kind) = state.finish_job_write(request) else {
                return (state, Vec::new());
            };
            match (kind, result) {
                (JobWrite::Save, Ok(())) => {
                    state.reset_job_form();
                    state.set_notice("Job saved successfully");
                    fetch_jobs(&mut state)
                }
                (JobWrite::Delete, Ok(())) => {
                    state.set_notice("Job deleted");
                    fetch_jobs(&mut state)
                }
                (JobWrite::Save, Err(failure)) => {
                    let message = match failure.kind {
                        FailureKind::Server { .. } if !failure.message.is_empty() => {
                            failure.message
                        }
                        _ => "Failed to save job. Please try again.".to_string(),
                    };
                    state.show_banner(Banner::error(message));
                    Vec::new()
                }
                (JobWrite::Delete, Err(_)) => {
                    state.show_banner(Banner::error("Failed to delete job. Please try again."));
                    Vec::new()
                }
            }
        }
        Msg::ResumeSelected(selection) => {
            state.select_resume(Some(selection));
            Vec::new()
        }
        Msg::ResumeSubmitClicked => {
            if state.upload_in_flight() {
                return (state, Vec::new());
            }
            if let Err(error) = validate_resume(state.resume()) {
                state.set_resume_error(error);
                return (state, Vec::new());
            }
            let path = state
                .resume()
                .map(|selection| selection.path.clone())
                .unwrap_or_default();
            let request = state.begin_upload();
            vec![Effect::UploadResume { request, path }]
        }
        Msg::ResumeParsed { request, result } => {
            if !state.finish_upload(request) {
                return (state, Vec::new());
            }
            match result {
                Ok(outcome) => apply_parse_outcome(&mut state, outcome),
                Err(failure) => {
                    state.show_banner(Banner::error(upload_failure_text(&failure)));
                    Vec::new()
                }
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fetch_jobs(state: &mut AppState) -> Vec<Effect> {
    let request = state.begin_jobs_fetch();
    vec![Effect::FetchJobs {
        request,
        status: state.jobs_status(),
    }]
}

/// A partial profile still counts as success: it is shown with a warning and
/// the match list is refreshed either way.
fn apply_parse_outcome(state: &mut AppState, outcome: ParseOutcome) -> Vec<Effect> {
    if outcome.partial {
        let details = if outcome.details.is_empty() {
            "Some information may be incomplete".to_string()
        } else {
            outcome.details.join(", ")
        };
        state.show_banner(Banner::warning(format!(
            "Resume parsed with warnings: {details}"
        )));
    } else {
        state.set_notice("Resume submitted");
    }
    state.set_parsed_profile(outcome.profile);
    state.select_resume(None);
    let request = state.begin_matches_fetch();
    vec![Effect::FetchMatches { request }]
}

fn matches_failure_text(failure: &ApiFailure) -> String {
    match failure.kind {
        FailureKind::Server { .. } => format!("Server error: {}", failure.message),
        FailureKind::Network => {
            "Network error. Please check your connection and try again.".to_string()
        }
        FailureKind::Timeout => "Request timeout. Please try again.".to_string(),
        FailureKind::Request => {
            format!("Failed to fetch resume matches: {}", failure.message)
        }
    }
}

fn upload_failure_text(failure: &ApiFailure) -> String {
    match failure.kind {
        FailureKind::Server { status } if failure.message.is_empty() => {
            format!("Server error: {status}")
        }
        FailureKind::Server { .. } => failure.message.clone(),
        FailureKind::Network => {
            "Network error. Please check your connection and try again.".to_string()
        }
        FailureKind::Timeout => "Upload timeout. Please try again with a smaller file.".to_string(),
        FailureKind::Request => format!("Could not read the resume file: {}", failure.message),
    }
}
