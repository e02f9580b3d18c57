use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use super::{Account, Category, Report, ReportStatus, ReportType, Role, WeekNumber};

/// An account as submitted by the user management form; the id is assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
    pub role: Role,
    #[validate(length(min = 1, message = "is required"))]
    pub display_name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub division: String,
}

impl NewAccount {
    pub fn with_id(self, id: String) -> Account {
        Account {
            id,
            username: self.username,
            password: self.password,
            role: self.role,
            display_name: self.display_name,
            division: self.division,
        }
    }
}

/// Partial account update. `None` leaves the field as it is; the id cannot
/// be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub display_name: Option<String>,
    pub division: Option<String>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        self == &AccountPatch::default()
    }

    pub fn apply(&self, account: &Account) -> Account {
        Account {
            id: account.id.clone(),
            username: self.username.clone().unwrap_or_else(|| account.username.clone()),
            password: self.password.clone().unwrap_or_else(|| account.password.clone()),
            role: self.role.unwrap_or(account.role),
            display_name: self.display_name.clone().unwrap_or_else(|| account.display_name.clone()),
            division: self.division.clone().unwrap_or_else(|| account.division.clone()),
        }
    }
}

/// The fields a report author fills in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    #[validate(length(min = 5, message = "must be at least 5 characters"))]
    pub title: String,
    #[validate(length(min = 20, message = "must be at least 20 characters"))]
    pub content: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub week_number: Option<WeekNumber>,
    pub category: Option<Category>,
    #[serde(default)]
    pub status: ReportStatus,
}

/// A report ready to be stored, minus the id and timestamps the store
/// stamps on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub title: String,
    pub content: String,
    pub report_type: ReportType,
    pub week_number: Option<WeekNumber>,
    pub category: Option<Category>,
    pub created_by: String,
    pub author_name: String,
    pub division: String,
    pub status: ReportStatus,
}

impl NewReport {
    /// Attributes a draft to its author. The author's display name and
    /// division are copied here once and are never re-derived, even if the
    /// account is later renamed or moved to another division.
    pub fn authored_by(author: &Account, draft: ReportDraft) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            report_type: draft.report_type,
            week_number: draft.week_number,
            category: draft.category,
            created_by: author.id.clone(),
            author_name: author.display_name.clone(),
            division: author.division.clone(),
            status: draft.status,
        }
    }

    pub fn into_report(self, id: String, now: OffsetDateTime) -> Report {
        Report {
            id,
            title: self.title,
            content: self.content,
            report_type: self.report_type,
            week_number: self.week_number,
            category: self.category,
            created_by: self.created_by,
            author_name: self.author_name,
            division: self.division,
            created_at: now,
            updated_at: now,
            status: self.status,
        }
    }
}

/// Partial report update. Authorship fields and timestamps are not
/// patchable. Setting `report_type` to monthly does not clear a previously
/// stored week number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportPatch {
    #[validate(length(min = 5, message = "must be at least 5 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 20, message = "must be at least 20 characters"))]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub report_type: Option<ReportType>,
    pub week_number: Option<WeekNumber>,
    pub category: Option<Category>,
    pub status: Option<ReportStatus>,
}

impl ReportPatch {
    pub fn status(status: ReportStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &ReportPatch::default()
    }

    /// Returns the merged report with `updated_at` restamped. The stamp never
    /// moves backwards even if the clock does.
    pub fn apply(&self, report: &Report, now: OffsetDateTime) -> Report {
        Report {
            id: report.id.clone(),
            title: self.title.clone().unwrap_or_else(|| report.title.clone()),
            content: self.content.clone().unwrap_or_else(|| report.content.clone()),
            report_type: self.report_type.unwrap_or(report.report_type),
            week_number: self.week_number.or(report.week_number),
            category: self.category.or(report.category),
            created_by: report.created_by.clone(),
            author_name: report.author_name.clone(),
            division: report.division.clone(),
            created_at: report.created_at,
            updated_at: now.max(report.updated_at),
            status: self.status.unwrap_or(report.status),
        }
    }
}
