use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

pub mod write;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Generates the lowercase string mapping shared by `Display`, `FromStr`
/// and serde for the small closed enums below.
macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ParseEnumError::new($kind, s)),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    It,
    Riset,
    Writer,
    Content,
    Desain,
}

string_enum!(Role, "role", {
    Admin => "admin",
    It => "it",
    Riset => "riset",
    Writer => "writer",
    Content => "content",
    Desain => "desain",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Weekly,
    Monthly,
}

string_enum!(ReportType, "report type", {
    Weekly => "weekly",
    Monthly => "monthly",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Straight,
    Breaking,
    Opini,
    Other,
}

string_enum!(Category, "category", {
    Straight => "straight",
    Breaking => "breaking",
    Opini => "opini",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
}

string_enum!(ReportStatus, "status", {
    Draft => "draft",
    Submitted => "submitted",
    Approved => "approved",
    Rejected => "rejected",
});

impl ReportStatus {
    /// Statuses only an admin may assign.
    pub fn is_review_decision(&self) -> bool {
        matches!(self, ReportStatus::Approved | ReportStatus::Rejected)
    }
}

/// Week of the month a weekly report covers. Persisted as the strings
/// `"1"` through `"4"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeekNumber {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
}

string_enum!(WeekNumber, "week number", {
    One => "1",
    Two => "2",
    Three => "3",
    Four => "4",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub username: String,
    /// Stored as entered. Comparison goes through a credential verifier.
    pub password: String,
    pub role: Role,
    pub display_name: String,
    pub division: String,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_number: Option<WeekNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub created_by: String,
    /// Author display name as it was when the report was created.
    pub author_name: String,
    /// Author division as it was when the report was created.
    pub division: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default)]
    pub status: ReportStatus,
}

impl Report {
    /// `weekly - Week 2`, or just the type when no week is set.
    pub fn type_label(&self) -> String {
        match self.week_number {
            Some(week) => format!("{} - Week {}", self.report_type, week),
            None => self.report_type.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_report() -> Report {
        Report {
            id: "r1".to_string(),
            title: "Weekly wrap".to_string(),
            content: "Everything that happened this week.".to_string(),
            report_type: ReportType::Weekly,
            week_number: Some(WeekNumber::Two),
            category: Some(Category::Breaking),
            created_by: "4".to_string(),
            author_name: "Writer Team".to_string(),
            division: "Writer".to_string(),
            created_at: datetime!(2025-03-01 08:30 UTC),
            updated_at: datetime!(2025-03-01 08:30 UTC),
            status: ReportStatus::Draft,
        }
    }

    #[test]
    fn test_report_wire_keys() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["type"], "weekly");
        assert_eq!(json["weekNumber"], "2");
        assert_eq!(json["category"], "breaking");
        assert_eq!(json["createdBy"], "4");
        assert_eq!(json["authorName"], "Writer Team");
        assert_eq!(json["createdAt"], "2025-03-01T08:30:00Z");
        assert_eq!(json["status"], "draft");
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let mut report = sample_report();
        report.report_type = ReportType::Monthly;
        report.week_number = None;
        report.category = None;
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("weekNumber").is_none());
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_missing_status_defaults_to_draft() {
        let json = r#"{
            "id": "x", "title": "t", "content": "c", "type": "monthly",
            "createdBy": "1", "authorName": "A", "division": "IT",
            "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-01T00:00:00Z"
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.status, ReportStatus::Draft);
        assert_eq!(report.week_number, None);
    }

    #[test]
    fn test_account_wire_keys() {
        let account = Account {
            id: "1".to_string(),
            username: "Superadminit".to_string(),
            password: "Admin@10".to_string(),
            role: Role::Admin,
            display_name: "Super Admin".to_string(),
            division: "Admin".to_string(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["displayName"], "Super Admin");
        assert_eq!(json["role"], "admin");
        assert!(account.is_admin());
    }

    #[test]
    fn test_enum_strings() {
        assert_eq!("desain".parse::<Role>().unwrap(), Role::Desain);
        assert_eq!("3".parse::<WeekNumber>().unwrap(), WeekNumber::Three);
        assert!("Weekly".parse::<ReportType>().is_err());
        assert_eq!(ReportStatus::Rejected.to_string(), "rejected");
        assert!(ReportStatus::Approved.is_review_decision());
        assert!(!ReportStatus::Submitted.is_review_decision());
    }

    #[test]
    fn test_type_label() {
        let mut report = sample_report();
        assert_eq!(report.type_label(), "weekly - Week 2");
        report.week_number = None;
        assert_eq!(report.type_label(), "weekly");
    }
}
