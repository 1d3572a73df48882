//! Plain-text rendering of the view model.

use std::fmt::Write;

use dashboard_core::{
    AppViewModel, Banner, CandidateDetailView, CandidateRowView, DashboardStats, JobRowView,
    ParsedProfile, Severity,
};

const NO_MATCH: &str = "-";

pub fn stats_line(stats: &DashboardStats) -> String {
    format!(
        "Total {} | Shortlisted {} | Rejected {} | Pending {} | Avg match {}%",
        stats.total, stats.shortlisted, stats.rejected, stats.pending, stats.avg_match_score
    )
}

fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    } else {
        format!("{text}{}", " ".repeat(width - count))
    }
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    const MAX_WIDTH: usize = 36;
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row.get(i).map_or(0, |cell| cell.chars().count()))
                .chain([header.len()])
                .max()
                .unwrap_or(0)
                .min(MAX_WIDTH)
        })
        .collect();

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.iter().map(|h| h.to_string()).collect());
    out.push('\n');
    out.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        out.push('\n');
        out.push_str(&line(row.clone()));
    }
    out
}

fn candidate_cells(row: &CandidateRowView) -> Vec<String> {
    vec![
        row.name.clone(),
        row.email.clone(),
        row.location.clone(),
        row.top_match.clone().unwrap_or_else(|| NO_MATCH.to_string()),
        row.band.map_or(NO_MATCH, |band| band.as_str()).to_string(),
        row.status.clone(),
    ]
}

pub fn candidates(view: &AppViewModel) -> String {
    let mut out = stats_line(&view.stats);
    out.push('\n');
    if view.rows.is_empty() {
        out.push_str("No candidates match the current view.");
        return out;
    }
    let rows: Vec<Vec<String>> = view.rows.iter().map(candidate_cells).collect();
    out.push_str(&table(
        &["Name", "Email", "Location", "Top match", "Band", "Status"],
        &rows,
    ));
    out
}

pub fn candidate_detail(detail: &CandidateDetailView) -> String {
    let candidate = &detail.candidate;
    let mut out = String::new();
    let _ = writeln!(out, "{} <{}>", candidate.name, candidate.email);
    let _ = writeln!(out, "Location:   {}", candidate.location);
    let _ = writeln!(out, "Experience: {}", candidate.experience);
    let _ = writeln!(out, "Skills:     {}", candidate.skills.join(", "));
    let _ = writeln!(out, "Education:  {}", candidate.education.join(", "));
    let _ = write!(
        out,
        "Status:     {}",
        detail.status.map_or("pending", |status| status.as_str())
    );

    if detail.matches.is_empty() {
        out.push_str("\nNo job matches.");
    }
    for m in &detail.matches {
        let _ = write!(
            out,
            "\n\n{} at {} ({}) {}% [{}]",
            m.title,
            m.company,
            m.location,
            m.final_pct,
            m.band.as_str()
        );
        let _ = write!(
            out,
            "\n  skills {}% | experience {}% | education {}%",
            m.skill_pct, m.experience_pct, m.education_pct
        );
        if let Some(bonus) = m.location_bonus_pct {
            let _ = write!(out, " | location bonus {bonus}%");
        }
        if !m.experience_required.is_empty() {
            let _ = write!(out, "\n  requires {}", m.experience_required);
        }
        if !m.skill_matches.is_empty() {
            let _ = write!(out, "\n  matched: {}", m.skill_matches.join(", "));
        }
        if !m.missing_skills.is_empty() {
            let _ = write!(out, "\n  missing: {}", m.missing_skills.join(", "));
        }
    }
    out
}

fn job_cells(job: &JobRowView) -> Vec<String> {
    vec![
        job.id.clone(),
        job.title.clone(),
        job.company.clone(),
        job.location.clone(),
        job.experience.clone(),
        job.skills.join(", "),
        job.created_at.clone(),
    ]
}

pub fn jobs(view: &AppViewModel) -> String {
    if view.jobs.is_empty() {
        return "No job postings.".to_string();
    }
    let rows: Vec<Vec<String>> = view.jobs.iter().map(job_cells).collect();
    table(
        &["Id", "Title", "Company", "Location", "Experience", "Skills", "Posted"],
        &rows,
    )
}

pub fn profile(profile: &ParsedProfile) -> String {
    let mut out = String::from("Parsed profile");
    let fields = [
        ("Name", profile.name.clone()),
        ("Email", profile.email.clone()),
        ("Phone", profile.phone.clone()),
        ("Location", profile.location.clone()),
        ("Experience", profile.experience.clone()),
        ("Skills", profile.skills.join(", ")),
        ("Education", profile.education.join(", ")),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            let _ = write!(out, "\n  {label}: {value}");
        }
    }
    out
}

fn banner_line(banner: &Banner) -> String {
    match banner.severity {
        Severity::Warning => format!("warning: {}", banner.message),
        Severity::Error => format!("error: {}", banner.message),
    }
}

/// Notice, banner, and inline validation errors, one per line.
pub fn messages(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(notice) = &view.notice {
        lines.push(notice.clone());
    }
    if !view.form_errors.is_empty() {
        lines.push(format!("error: {}", view.form_errors.join(", ")));
    }
    if let Some(error) = &view.resume_error {
        lines.push(format!("error: {error}"));
    }
    if let Some(banner) = &view.banner {
        lines.push(banner_line(banner));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{Candidate, CandidateStatus, ScoreBand};

    fn row(name: &str, top: Option<(&str, u32)>) -> CandidateRowView {
        CandidateRowView {
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            location: "Lisbon".to_string(),
            experience: String::new(),
            skills: Vec::new(),
            top_match: top.map(|(title, pct)| format!("{title} ({pct}%)")),
            top_score: top.map(|(_, pct)| pct),
            band: top.map(|(_, pct)| ScoreBand::from_percent(pct)),
            status: "pending".to_string(),
        }
    }

    #[test]
    fn candidate_table_has_header_and_rows() {
        let view = AppViewModel {
            rows: vec![row("Ann", Some(("Data Engineer", 87))), row("Bo", None)],
            stats: DashboardStats {
                total: 2,
                pending: 2,
                avg_match_score: 44,
                ..DashboardStats::default()
            },
            ..AppViewModel::default()
        };
        let text = candidates(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Total 2 | Shortlisted 0 | Rejected 0 | Pending 2 | Avg match 44%"
        );
        assert!(lines[1].starts_with("Name"));
        assert!(lines[3].contains("Data Engineer (87%)"));
        assert!(lines[3].contains("excellent"));
        assert!(lines[4].contains(" - "));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn empty_view_says_so() {
        let text = candidates(&AppViewModel::default());
        assert!(text.ends_with("No candidates match the current view."));
        assert_eq!(jobs(&AppViewModel::default()), "No job postings.");
    }

    #[test]
    fn long_cells_are_cut() {
        assert_eq!(pad("abcdef", 4), "abc~");
        assert_eq!(pad("ab", 4), "ab  ");
    }

    #[test]
    fn detail_lists_scores() {
        let detail = CandidateDetailView {
            candidate: Candidate {
                name: "Ann".to_string(),
                email: "ann@x.com".to_string(),
                ..Candidate::default()
            },
            status: Some(CandidateStatus::Shortlisted),
            matches: Vec::new(),
        };
        let text = candidate_detail(&detail);
        assert!(text.starts_with("Ann <ann@x.com>"));
        assert!(text.contains("Status:     Shortlisted"));
        assert!(text.ends_with("No job matches."));
    }

    #[test]
    fn messages_put_banner_last() {
        let view = AppViewModel {
            notice: Some("Job deleted".to_string()),
            banner: Some(Banner::warning("Resume parsed with warnings: x")),
            form_errors: vec!["Job title is required".to_string()],
            ..AppViewModel::default()
        };
        assert_eq!(
            messages(&view),
            vec![
                "Job deleted".to_string(),
                "error: Job title is required".to_string(),
                "warning: Resume parsed with warnings: x".to_string(),
            ]
        );
    }
}
