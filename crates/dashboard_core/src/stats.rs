use crate::{CandidateMatchRecord, CandidateStatus};

/// Aggregate counts shown above the candidate list.
///
/// Always computed from the full record set, never adjusted incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total: usize,
    pub shortlisted: usize,
    pub rejected: usize,
    /// Everything neither shortlisted nor rejected, including "Under Review".
    pub pending: usize,
    /// Mean top-match score as a whole percentage.
    pub avg_match_score: u32,
}

impl DashboardStats {
    pub fn compute(records: &[CandidateMatchRecord]) -> Self {
        let total = records.len();
        let count = |wanted: CandidateStatus| {
            records
                .iter()
                .filter(|record| record.status == Some(wanted))
                .count()
        };
        let shortlisted = count(CandidateStatus::Shortlisted);
        let rejected = count(CandidateStatus::Rejected);

        let score_sum: f64 = records
            .iter()
            .map(|record| record.top_score() * 100.0)
            .sum();
        let avg_match_score = if total > 0 {
            let mean = (score_sum / total as f64 + 0.5).floor();
            if mean.is_finite() && mean > 0.0 {
                mean as u32
            } else {
                0
            }
        } else {
            0
        };

        Self {
            total,
            shortlisted,
            rejected,
            pending: total - shortlisted - rejected,
            avg_match_score,
        }
    }
}
