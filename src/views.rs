//! Pure views over materialized reports: visibility scoping, list filters,
//! dashboard counts and the per-division summary.

use std::{collections::BTreeMap, fmt::Display};

use prettytable::{row, Table};

use crate::models::{Account, Report, ReportStatus, ReportType};

/// Admins see every report; everyone else sees their own division.
pub fn visible_reports<'a>(viewer: &Account, reports: &'a [Report]) -> Vec<&'a Report> {
    if viewer.is_admin() {
        reports.iter().collect()
    } else {
        reports.iter().filter(|r| r.division == viewer.division).collect()
    }
}

pub fn sort_newest_first(reports: &mut [&Report]) {
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Report list filters. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub search: Option<String>,
    pub status: Option<ReportStatus>,
    pub report_type: Option<ReportType>,
}

impl ReportFilter {
    pub fn is_active(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.status.is_some()
            || self.report_type.is_some()
    }

    /// Case-insensitive substring match on title or content. A blank search
    /// matches everything; otherwise the text is matched as typed, spaces
    /// included.
    pub fn matches(&self, report: &Report) -> bool {
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let needle = search.to_lowercase();
            if !report.title.to_lowercase().contains(&needle)
                && !report.content.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if self.status.is_some_and(|status| report.status != status) {
            return false;
        }
        if self.report_type.is_some_and(|t| report.report_type != t) {
            return false;
        }
        true
    }

    /// Matching reports, newest first.
    pub fn apply<'a>(&self, reports: impl IntoIterator<Item = &'a Report>) -> Vec<&'a Report> {
        let mut matched: Vec<&Report> = reports.into_iter().filter(|r| self.matches(r)).collect();
        sort_newest_first(&mut matched);
        matched
    }
}

/// The `n` most recently created reports.
pub fn recent<'a>(reports: impl IntoIterator<Item = &'a Report>, n: usize) -> Vec<&'a Report> {
    let mut all: Vec<&Report> = reports.into_iter().collect();
    sort_newest_first(&mut all);
    all.truncate(n);
    all
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub draft: usize,
    pub submitted: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn tally<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Self {
        let mut counts = StatusCounts::default();
        for report in reports {
            counts.total += 1;
            match report.status {
                ReportStatus::Draft => counts.draft += 1,
                ReportStatus::Submitted => counts.submitted += 1,
                ReportStatus::Approved => counts.approved += 1,
                ReportStatus::Rejected => counts.rejected += 1,
            }
        }
        counts
    }
}

impl Display for StatusCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = Table::new();
        table.set_titles(row!["Total", "Draft", "Submitted", "Approved", "Rejected"]);
        table.add_row(row![self.total, self.draft, self.submitted, self.approved, self.rejected]);
        write!(f, "{}", table)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DivisionTotals {
    pub total: usize,
    pub weekly: usize,
    pub monthly: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Anything not yet approved or rejected.
    pub pending: usize,
}

/// Per-division totals, keyed by division name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivisionSummary(pub BTreeMap<String, DivisionTotals>);

impl DivisionSummary {
    pub fn build<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Self {
        let mut divisions: BTreeMap<String, DivisionTotals> = BTreeMap::new();
        for report in reports {
            let totals = divisions.entry(report.division.clone()).or_default();
            totals.total += 1;
            match report.report_type {
                ReportType::Weekly => totals.weekly += 1,
                ReportType::Monthly => totals.monthly += 1,
            }
            match report.status {
                ReportStatus::Approved => totals.approved += 1,
                ReportStatus::Rejected => totals.rejected += 1,
                ReportStatus::Draft | ReportStatus::Submitted => totals.pending += 1,
            }
        }
        DivisionSummary(divisions)
    }

    pub fn get(&self, division: &str) -> Option<&DivisionTotals> {
        self.0.get(division)
    }
}

impl Display for DivisionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = Table::new();
        table.set_titles(row!["Division", "Total", "Weekly", "Monthly", "Approved", "Rejected", "Pending"]);
        for (division, t) in &self.0 {
            table.add_row(row![division, t.total, t.weekly, t.monthly, t.approved, t.rejected, t.pending]);
        }
        write!(f, "{}", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, WeekNumber};
    use time::{macros::datetime, Duration};

    fn report(id: &str, division: &str, report_type: ReportType, status: ReportStatus, minute: i64) -> Report {
        let at = datetime!(2025-01-01 00:00 UTC) + Duration::minutes(minute);
        Report {
            id: id.to_string(),
            title: format!("Report {}", id),
            content: format!("Body of report {} for {}", id, division),
            report_type,
            week_number: match report_type {
                ReportType::Weekly => Some(WeekNumber::One),
                ReportType::Monthly => None,
            },
            category: None,
            created_by: "x".to_string(),
            author_name: "X".to_string(),
            division: division.to_string(),
            created_at: at,
            updated_at: at,
            status,
        }
    }

    fn viewer(role: Role, division: &str) -> Account {
        Account {
            id: "v".to_string(),
            username: "viewer".to_string(),
            password: "pw".to_string(),
            role,
            display_name: "Viewer".to_string(),
            division: division.to_string(),
        }
    }

    fn sample() -> Vec<Report> {
        vec![
            report("1", "IT", ReportType::Weekly, ReportStatus::Draft, 1),
            report("2", "Writer", ReportType::Monthly, ReportStatus::Approved, 2),
            report("3", "IT", ReportType::Monthly, ReportStatus::Rejected, 3),
            report("4", "IT", ReportType::Weekly, ReportStatus::Submitted, 4),
        ]
    }

    fn ids(reports: &[&Report]) -> Vec<String> {
        reports.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_visibility() {
        let reports = sample();
        assert_eq!(visible_reports(&viewer(Role::Admin, "Admin"), &reports).len(), 4);
        assert_eq!(ids(&visible_reports(&viewer(Role::It, "IT"), &reports)), vec!["1", "3", "4"]);
        assert!(visible_reports(&viewer(Role::Desain, "Desain"), &reports).is_empty());
    }

    #[test]
    fn test_filter() {
        let reports = sample();
        assert!(!ReportFilter::default().is_active());
        assert_eq!(ids(&ReportFilter::default().apply(&reports)), vec!["4", "3", "2", "1"]);

        let search = ReportFilter {
            search: Some("WRITER".to_string()),
            ..Default::default()
        };
        assert!(search.is_active());
        assert_eq!(ids(&search.apply(&reports)), vec!["2"]);

        let combined = ReportFilter {
            search: Some("it".to_string()),
            status: Some(ReportStatus::Draft),
            report_type: Some(ReportType::Weekly),
        };
        assert_eq!(ids(&combined.apply(&reports)), vec!["1"]);

        // surrounding spaces are part of the needle
        let padded = ReportFilter {
            search: Some("  report".to_string()),
            ..Default::default()
        };
        assert!(ids(&padded.apply(&reports)).is_empty());
        let padded = ReportFilter {
            search: Some("report 3".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&padded.apply(&reports)), vec!["3"]);

        let blank = ReportFilter {
            search: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!blank.is_active());
        assert_eq!(blank.apply(&reports).len(), 4);
    }

    #[test]
    fn test_recent() {
        let reports = sample();
        assert_eq!(ids(&recent(&reports, 2)), vec!["4", "3"]);
        assert_eq!(recent(&reports, 10).len(), 4);
    }

    #[test]
    fn test_status_counts() {
        let counts = StatusCounts::tally(&sample());
        assert_eq!(
            counts,
            StatusCounts {
                draft: 1,
                submitted: 1,
                approved: 1,
                rejected: 1,
                total: 4
            }
        );
        assert!(counts.to_string().contains("Submitted"));
    }

    #[test]
    fn test_division_summary() {
        let summary = DivisionSummary::build(&sample());
        let it = summary.get("IT").unwrap();
        assert_eq!(it.total, 3);
        assert_eq!(it.weekly, 2);
        assert_eq!(it.monthly, 1);
        assert_eq!(it.rejected, 1);
        assert_eq!(it.pending, 2);
        assert_eq!(summary.get("Writer").unwrap().approved, 1);
        assert!(summary.get("Riset").is_none());
        assert!(summary.to_string().contains("Pending"));
    }
}
