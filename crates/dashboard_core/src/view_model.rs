use crate::format::{match_label, percent, ScoreBand};
use crate::{
    Candidate, CandidateMatchRecord, CandidateStatus, DashboardStats, Job, JobForm, JobId,
    MatchResult, ParsedProfile, ResumeSelection, SortKey, StatusFilter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Dismissible message shown above the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub severity: Severity,
    pub message: String,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingFlags {
    pub matches: bool,
    pub jobs: bool,
    pub job_write: bool,
    pub upload: bool,
    pub status_updates: usize,
}

impl LoadingFlags {
    pub fn any(&self) -> bool {
        self.matches || self.jobs || self.job_write || self.upload || self.status_updates > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub loading: LoadingFlags,
    pub stats: DashboardStats,
    pub search: String,
    pub status_filter: StatusFilter,
    pub sort_key: SortKey,
    pub rows: Vec<CandidateRowView>,
    pub selected: Option<CandidateDetailView>,
    pub job_search: String,
    pub jobs: Vec<JobRowView>,
    pub job_form: JobForm,
    pub editing_job: Option<JobId>,
    pub form_errors: Vec<String>,
    pub resume: Option<ResumeSelection>,
    pub resume_error: Option<String>,
    pub parsed_profile: Option<ParsedProfile>,
    pub banner: Option<Banner>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRowView {
    pub name: String,
    pub email: String,
    pub location: String,
    pub experience: String,
    pub skills: Vec<String>,
    /// `"Title (87%)"` for the top match.
    pub top_match: Option<String>,
    pub top_score: Option<u32>,
    pub band: Option<ScoreBand>,
    pub status: String,
}

impl CandidateRowView {
    pub(crate) fn from_record(record: &CandidateMatchRecord) -> Self {
        let candidate = &record.candidate;
        let top = record.top_match();
        let top_score = top.map(|m| percent(m.scores.final_score));
        Self {
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            location: candidate.location.clone(),
            experience: candidate.experience.clone(),
            skills: candidate.skills.clone(),
            top_match: top.map(match_label),
            top_score,
            band: top_score.map(ScoreBand::from_percent),
            status: record.status_label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDetailView {
    pub candidate: Candidate,
    pub status: Option<CandidateStatus>,
    pub matches: Vec<MatchView>,
}

impl CandidateDetailView {
    pub(crate) fn from_record(record: &CandidateMatchRecord) -> Self {
        Self {
            candidate: record.candidate.clone(),
            status: record.status,
            matches: record.matches.iter().map(MatchView::from_match).collect(),
        }
    }
}

/// Match scores as displayed: whole percentages of the raw server values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchView {
    pub title: String,
    pub company: String,
    pub location: String,
    pub experience_required: String,
    pub final_pct: u32,
    pub skill_pct: u32,
    pub experience_pct: u32,
    pub education_pct: u32,
    /// Absent when the match carries no location bonus.
    pub location_bonus_pct: Option<u32>,
    pub band: ScoreBand,
    pub skill_matches: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl MatchView {
    fn from_match(result: &MatchResult) -> Self {
        let scores = &result.scores;
        let final_pct = percent(scores.final_score);
        Self {
            title: result.title.clone(),
            company: result.company.clone(),
            location: result.location.clone(),
            experience_required: result.experience_required.clone(),
            final_pct,
            skill_pct: percent(scores.skill),
            experience_pct: percent(scores.experience),
            education_pct: percent(scores.education),
            location_bonus_pct: (scores.location_bonus > 0.0)
                .then(|| percent(scores.location_bonus)),
            band: ScoreBand::from_percent(final_pct),
            skill_matches: result.skill_matches.iter().cloned().collect(),
            missing_skills: result.missing_skills.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub experience: String,
    pub skills: Vec<String>,
    pub created_at: String,
}

impl JobRowView {
    pub(crate) fn from_job(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            salary: job.salary.clone(),
            experience: job.experience.clone(),
            skills: job.skills.clone(),
            created_at: job.created_at.clone(),
        }
    }
}
