//! Pure filter/sort projections over fetched records.

use std::cmp::Ordering;
use std::fmt;

use crate::{CandidateMatchRecord, CandidateStatus, Job};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Records whose status is unset.
    Pending,
    Only(CandidateStatus),
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Some(StatusFilter::All),
            "pending" => Some(StatusFilter::Pending),
            other => CandidateStatus::parse(other).map(StatusFilter::Only),
        }
    }

    pub fn admits(self, status: Option<CandidateStatus>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status.is_none(),
            StatusFilter::Only(wanted) => status == Some(wanted),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Pending => f.write_str("pending"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Score,
    Status,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Some(SortKey::Name),
            "score" => Some(SortKey::Score),
            "status" => Some(SortKey::Status),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Score => "score",
            SortKey::Status => "status",
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive substring match on name, email, location, or any skill.
/// An empty search matches everything.
pub fn matches_search(record: &CandidateMatchRecord, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    let candidate = &record.candidate;
    contains_folded(&candidate.name, &needle)
        || contains_folded(&candidate.email, &needle)
        || contains_folded(&candidate.location, &needle)
        || candidate
            .skills
            .iter()
            .any(|skill| contains_folded(skill, &needle))
}

fn compare(a: &CandidateMatchRecord, b: &CandidateMatchRecord, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Name => a
            .candidate
            .name
            .to_lowercase()
            .cmp(&b.candidate.name.to_lowercase()),
        SortKey::Score => b.top_score().total_cmp(&a.top_score()),
        SortKey::Status => a
            .status_label()
            .to_lowercase()
            .cmp(&b.status_label().to_lowercase()),
    }
}

/// Filtered and sorted view of `records`.
///
/// The sort is stable, so ties keep fetch order.
pub fn project<'a>(
    records: &'a [CandidateMatchRecord],
    search: &str,
    filter: StatusFilter,
    sort: SortKey,
) -> Vec<&'a CandidateMatchRecord> {
    let mut rows: Vec<&CandidateMatchRecord> = records
        .iter()
        .filter(|record| filter.admits(record.status) && matches_search(record, search))
        .collect();
    rows.sort_by(|a, b| compare(a, b, sort));
    rows
}

/// Case-insensitive substring match on title, company, location, or any skill.
pub fn filter_jobs<'a>(jobs: &'a [Job], search: &str) -> Vec<&'a Job> {
    if search.is_empty() {
        return jobs.iter().collect();
    }
    let needle = search.to_lowercase();
    jobs.iter()
        .filter(|job| {
            contains_folded(&job.title, &needle)
                || contains_folded(&job.company, &needle)
                || contains_folded(&job.location, &needle)
                || job.skills.iter().any(|skill| contains_folded(skill, &needle))
        })
        .collect()
}
