//! Score display helpers.

use crate::MatchResult;

/// Converts a score fraction into a whole percentage, rounding halves up.
pub fn percent(score: f64) -> u32 {
    let scaled = (score * 100.0 + 0.5).floor();
    if scaled.is_finite() && scaled > 0.0 {
        scaled as u32
    } else {
        0
    }
}

pub fn percent_label(score: f64) -> String {
    format!("{}%", percent(score))
}

/// `"Title (87%)"`, the form used in the PDF export and the candidate list.
pub fn match_label(result: &MatchResult) -> String {
    format!("{} ({})", result.title, percent_label(result.scores.final_score))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Poor,
}

impl ScoreBand {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            80.. => ScoreBand::Excellent,
            60..=79 => ScoreBand::Good,
            _ => ScoreBand::Poor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Poor => "poor",
        }
    }
}
