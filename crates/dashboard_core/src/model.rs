use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wire;

/// Recruiter-assigned status. An unset status is modelled as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CandidateStatus {
    #[serde(rename = "Shortlisted")]
    Shortlisted,
    #[serde(rename = "Rejected")]
    Rejected,
    #[serde(rename = "Under Review")]
    UnderReview,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 3] = [
        CandidateStatus::Shortlisted,
        CandidateStatus::Rejected,
        CandidateStatus::UnderReview,
    ];

    /// Wire representation, as the backend stores it.
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateStatus::Shortlisted => "Shortlisted",
            CandidateStatus::Rejected => "Rejected",
            CandidateStatus::UnderReview => "Under Review",
        }
    }

    /// Case-insensitive; `-` and `_` are accepted in place of the space in
    /// "Under Review" so the value can be typed on a command line.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    #[serde(deserialize_with = "wire::lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub experience: String,
    #[serde(deserialize_with = "wire::string_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "wire::string_list")]
    pub education: Vec<String>,
}

/// Sub-scores of a match, each a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scores {
    #[serde(rename = "final", deserialize_with = "wire::lenient_score")]
    pub final_score: f64,
    #[serde(deserialize_with = "wire::lenient_score")]
    pub skill: f64,
    #[serde(deserialize_with = "wire::lenient_score")]
    pub experience: f64,
    #[serde(deserialize_with = "wire::lenient_score")]
    pub education: f64,
    #[serde(deserialize_with = "wire::lenient_score")]
    pub location_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchResult {
    #[serde(deserialize_with = "wire::lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub experience_required: String,
    #[serde(deserialize_with = "wire::null_as_default")]
    pub scores: Scores,
    #[serde(deserialize_with = "wire::string_set")]
    pub skill_matches: BTreeSet<String>,
    #[serde(deserialize_with = "wire::string_set")]
    pub missing_skills: BTreeSet<String>,
}

/// One candidate with their matches, as returned by `/resume_matches`.
///
/// `matches` is kept in server order, which is descending by final score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateMatchRecord {
    #[serde(deserialize_with = "wire::null_as_default")]
    pub candidate: Candidate,
    #[serde(deserialize_with = "wire::null_as_default")]
    pub matches: Vec<MatchResult>,
    #[serde(deserialize_with = "wire::lenient_status")]
    pub status: Option<CandidateStatus>,
}

impl CandidateMatchRecord {
    pub fn email(&self) -> &str {
        &self.candidate.email
    }

    pub fn top_match(&self) -> Option<&MatchResult> {
        self.matches.first()
    }

    /// Final score of the top match, or 0 when there are no matches.
    pub fn top_score(&self) -> f64 {
        self.top_match()
            .map(|m| m.scores.final_score)
            .unwrap_or(0.0)
    }

    /// Status string used for sorting and display; unset reads as "pending".
    pub fn status_label(&self) -> &'static str {
        self.status.map(CandidateStatus::as_str).unwrap_or("pending")
    }
}

pub type JobId = String;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    #[serde(deserialize_with = "wire::lenient_string")]
    pub id: JobId,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub requirements: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub salary: String,
    #[serde(deserialize_with = "wire::string_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub experience: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub created_at: String,
}

/// Outgoing payload for `POST /add_job` and `PUT /jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary: String,
    pub skills: Vec<String>,
    pub experience: String,
}

/// Profile extracted by the backend from an uploaded resume.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedProfile {
    #[serde(deserialize_with = "wire::lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "wire::lenient_string")]
    pub experience: String,
    #[serde(deserialize_with = "wire::string_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "wire::string_list")]
    pub education: Vec<String>,
}

/// Result of a resume upload.
///
/// `partial` is set when the backend answered 422 but still returned a usable
/// profile; `details` then lists what it could not extract.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutcome {
    pub profile: ParsedProfile,
    pub partial: bool,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}
