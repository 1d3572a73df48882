use std::sync::Once;

use dashboard_core::{
    update, ApiFailure, AppState, Candidate, CandidateMatchRecord, CandidateStatus, Effect,
    ExportFormat, FailureKind, Msg, Severity, SortKey, StatusFilter, ViewPrefs,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

fn record(name: &str, email: &str, status: Option<CandidateStatus>) -> CandidateMatchRecord {
    CandidateMatchRecord {
        candidate: Candidate {
            name: name.to_string(),
            email: email.to_string(),
            ..Candidate::default()
        },
        matches: Vec::new(),
        status,
    }
}

fn fetch_request(effects: &[Effect]) -> u64 {
    match effects {
        [Effect::FetchMatches { request }] => *request,
        other => panic!("expected a single fetch, got {other:?}"),
    }
}

#[test]
fn opening_the_dashboard_fetches_matches() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::DashboardOpened);

    let request = fetch_request(&effects);
    assert!(request > 0);
    assert!(state.view().loading.matches);
    assert!(state.is_busy());
    assert!(state.consume_dirty());
}

#[test]
fn loaded_batch_replaces_previous_records() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DashboardOpened);
    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: fetch_request(&effects),
            result: Ok(vec![record("Ann", "a@x.com", None), record("Bo", "b@x.com", None)]),
        },
    );
    assert_eq!(state.records().len(), 2);

    let (state, effects) = update(state, Msg::RefreshClicked);
    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: fetch_request(&effects),
            result: Ok(vec![record("Cy", "c@x.com", None)]),
        },
    );

    let emails: Vec<&str> = state.records().iter().map(|r| r.email()).collect();
    assert_eq!(emails, vec!["c@x.com"]);
    assert_eq!(state.stats().total, 1);
    assert!(!state.is_busy());
}

#[test]
fn superseded_fetch_result_is_discarded() {
    init_logging();
    let (state, first) = update(AppState::new(), Msg::DashboardOpened);
    let (state, second) = update(state, Msg::RefreshClicked);
    let first = fetch_request(&first);
    let second = fetch_request(&second);
    assert_ne!(first, second);

    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: second,
            result: Ok(vec![record("New", "new@x.com", None)]),
        },
    );
    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: first,
            result: Ok(vec![record("Old", "old@x.com", None)]),
        },
    );

    assert_eq!(state.records().len(), 1);
    assert_eq!(state.records()[0].email(), "new@x.com");
}

#[test]
fn closed_dashboard_ignores_late_results() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DashboardOpened);
    let request = fetch_request(&effects);
    let (state, _) = update(
        state,
        Msg::StatusChangeRequested {
            email: "a@x.com".to_string(),
            status: CandidateStatus::Shortlisted,
        },
    );
    let (state, _) = update(state, Msg::DashboardClosed);
    assert!(!state.is_busy());

    let closed = state.clone();
    let (state, effects) = update(
        state,
        Msg::MatchesLoaded {
            request,
            result: Ok(vec![record("Late", "late@x.com", None)]),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state, closed);
    assert!(state.records().is_empty());
}

#[test]
fn fetch_failures_map_to_banner_text() {
    init_logging();
    let cases = [
        (
            ApiFailure::server(500, "database unavailable"),
            "Server error: database unavailable",
        ),
        (
            ApiFailure::network("connection refused"),
            "Network error. Please check your connection and try again.",
        ),
        (ApiFailure::timeout(), "Request timeout. Please try again."),
        (
            ApiFailure::new(FailureKind::Request, "relative URL without a base"),
            "Failed to fetch resume matches: relative URL without a base",
        ),
    ];

    for (failure, expected) in cases {
        let (state, effects) = update(AppState::new(), Msg::DashboardOpened);
        let (state, _) = update(
            state,
            Msg::MatchesLoaded {
                request: fetch_request(&effects),
                result: Err(failure),
            },
        );
        let banner = state.view().banner.expect("banner shown");
        assert_eq!(banner.severity, Severity::Error);
        assert_eq!(banner.message, expected);
        assert!(!state.view().loading.matches);
    }
}

#[test]
fn successful_fetch_clears_previous_error() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DashboardOpened);
    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: fetch_request(&effects),
            result: Err(ApiFailure::timeout()),
        },
    );
    assert!(state.view().banner.is_some());

    let (state, effects) = update(state, Msg::RefreshClicked);
    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: fetch_request(&effects),
            result: Ok(Vec::new()),
        },
    );
    assert!(state.view().banner.is_none());
}

#[test]
fn view_changes_persist_prefs() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SearchChanged("rust".to_string()));
    assert_eq!(
        effects,
        vec![Effect::PersistViewPrefs(ViewPrefs {
            search: "rust".to_string(),
            ..ViewPrefs::default()
        })]
    );

    let (state, _) = update(state, Msg::SortChanged(SortKey::Score));
    let (state, effects) = update(state, Msg::StatusFilterChanged(StatusFilter::Pending));
    assert_eq!(
        effects,
        vec![Effect::PersistViewPrefs(ViewPrefs {
            search: "rust".to_string(),
            status_filter: StatusFilter::Pending,
            sort_key: SortKey::Score,
        })]
    );
    assert_eq!(state.view().sort_key, SortKey::Score);
}

#[test]
fn failed_prefs_write_is_shown_as_warning() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::ViewPrefsSaveFailed("permission denied".to_string()),
    );
    assert!(effects.is_empty());
    let banner = state.view().banner.expect("warning shown");
    assert_eq!(banner.severity, Severity::Warning);
    assert_eq!(
        banner.message,
        "View preferences were not saved: permission denied"
    );
}

#[test]
fn restored_prefs_shape_the_view_without_persisting() {
    init_logging();
    let prefs = ViewPrefs {
        search: String::new(),
        status_filter: StatusFilter::Only(CandidateStatus::Rejected),
        sort_key: SortKey::Name,
    };
    let (state, effects) = update(AppState::new(), Msg::RestoreViewPrefs(prefs));
    assert!(effects.is_empty());

    let (state, fetch) = update(state, Msg::DashboardOpened);
    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: fetch_request(&fetch),
            result: Ok(vec![
                record("Ann", "a@x.com", Some(CandidateStatus::Rejected)),
                record("Bo", "b@x.com", None),
            ]),
        },
    );

    let rows = state.view().rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "a@x.com");
    assert_eq!(rows[0].status, "Rejected");
}

#[test]
fn export_snapshots_the_filtered_view() {
    init_logging();
    let (state, fetch) = update(AppState::new(), Msg::DashboardOpened);
    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: fetch_request(&fetch),
            result: Ok(vec![
                record("Cy", "c@x.com", None),
                record("Ann", "a@x.com", Some(CandidateStatus::Shortlisted)),
                record("Bo", "b@x.com", None),
            ]),
        },
    );
    let (state, _) = update(state, Msg::StatusFilterChanged(StatusFilter::Pending));
    let (_state, effects) = update(state, Msg::ExportRequested(ExportFormat::Csv));

    match effects.as_slice() {
        [Effect::Export { format, records }] => {
            assert_eq!(*format, ExportFormat::Csv);
            let emails: Vec<&str> = records.iter().map(|r| r.email()).collect();
            assert_eq!(emails, vec!["b@x.com", "c@x.com"]);
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn export_outcome_is_reported() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::ExportFinished {
            format: ExportFormat::Pdf,
            result: Ok("out/resume_dashboard.pdf".to_string()),
        },
    );
    assert_eq!(
        state.view().notice.as_deref(),
        Some("Exported pdf to out/resume_dashboard.pdf")
    );

    let (state, _) = update(
        state,
        Msg::ExportFinished {
            format: ExportFormat::Csv,
            result: Err("permission denied".to_string()),
        },
    );
    assert_eq!(
        state.view().banner.map(|b| b.message),
        Some("Export to csv failed: permission denied".to_string())
    );
}

#[test]
fn selection_is_cleared_when_record_disappears() {
    init_logging();
    let (state, fetch) = update(AppState::new(), Msg::DashboardOpened);
    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: fetch_request(&fetch),
            result: Ok(vec![record("Ann", "a@x.com", None)]),
        },
    );
    let (state, _) = update(
        state,
        Msg::CandidateSelected {
            email: "a@x.com".to_string(),
        },
    );
    assert!(state.view().selected.is_some());

    let (state, fetch) = update(state, Msg::RefreshClicked);
    let (state, _) = update(
        state,
        Msg::MatchesLoaded {
            request: fetch_request(&fetch),
            result: Ok(vec![record("Bo", "b@x.com", None)]),
        },
    );
    assert!(state.view().selected.is_none());
}

#[test]
fn resume_file_request_opens_by_email() {
    init_logging();
    let (_state, effects) = update(
        AppState::new(),
        Msg::ResumeFileRequested {
            email: "a@x.com".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::OpenResumeFile {
            email: "a@x.com".to_string()
        }]
    );
}
