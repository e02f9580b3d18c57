//! Form checks for reports and accounts. Field rules live on the write types
//! as `#[validate]` attributes; the role-dependent status rule is added here.

use std::borrow::Cow;

use validator::{Validate, ValidationError};

pub use validator::ValidationErrors;

use crate::models::{NewAccount, ReportDraft, ReportPatch, ReportStatus, Role};

/// True when `errors` holds at least one error for `field`.
pub fn has_field_error(errors: &ValidationErrors, field: &str) -> bool {
    errors.field_errors().contains_key(field)
}

fn review_status_error(status: ReportStatus) -> ValidationError {
    let mut error = ValidationError::new("admin_only_status");
    error.message = Some(Cow::Owned(format!("only admins can set {}", status)));
    error
}

fn check_status(errors: &mut ValidationErrors, status: Option<ReportStatus>, role: Role) {
    if let Some(status) = status {
        if status.is_review_decision() && role != Role::Admin {
            errors.add("status", review_status_error(status));
        }
    }
}

fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks a report form. Lengths count characters as entered. Only admins
/// may record a review decision.
pub fn validate_report_draft(draft: &ReportDraft, author_role: Role) -> Result<(), ValidationErrors> {
    let mut errors = draft.validate().err().unwrap_or_else(ValidationErrors::new);
    check_status(&mut errors, Some(draft.status), author_role);
    finish(errors)
}

/// Checks only the fields an edit actually changes.
pub fn validate_report_patch(patch: &ReportPatch, editor_role: Role) -> Result<(), ValidationErrors> {
    let mut errors = patch.validate().err().unwrap_or_else(ValidationErrors::new);
    check_status(&mut errors, patch.status, editor_role);
    finish(errors)
}

pub fn validate_new_account(account: &NewAccount) -> Result<(), ValidationErrors> {
    account.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportType, WeekNumber};

    fn draft(title: &str, content: &str, status: ReportStatus) -> ReportDraft {
        ReportDraft {
            title: title.to_string(),
            content: content.to_string(),
            report_type: ReportType::Weekly,
            week_number: Some(WeekNumber::One),
            category: None,
            status,
        }
    }

    #[test]
    fn test_valid_draft() {
        let d = draft("Weekly", "Twenty characters min.", ReportStatus::Submitted);
        assert!(validate_report_draft(&d, Role::It).is_ok());
    }

    #[test]
    fn test_short_fields() {
        let errors = validate_report_draft(&draft("Hey", "too short", ReportStatus::Draft), Role::It).unwrap_err();
        assert!(has_field_error(&errors, "title"));
        assert!(has_field_error(&errors, "content"));
        assert_eq!(errors.field_errors().len(), 2);
        assert!(errors.to_string().contains("at least 5"));
    }

    #[test]
    fn test_length_counts_raw_characters() {
        // padding counts towards the minimum, as it does in the form
        let d = draft("  Q3 ", "Twenty characters min.", ReportStatus::Draft);
        assert!(validate_report_draft(&d, Role::It).is_ok());

        let errors = validate_report_draft(&draft("", "Twenty characters min.", ReportStatus::Draft), Role::It)
            .unwrap_err();
        assert!(has_field_error(&errors, "title"));
    }

    #[test]
    fn test_review_status_needs_admin() {
        let d = draft("Weekly", "Twenty characters min.", ReportStatus::Approved);
        let errors = validate_report_draft(&d, Role::Writer).unwrap_err();
        assert!(has_field_error(&errors, "status"));
        assert!(errors.to_string().contains("only admins can set approved"));
        assert!(validate_report_draft(&d, Role::Admin).is_ok());
    }

    #[test]
    fn test_patch_checks_only_present_fields() {
        assert!(validate_report_patch(&ReportPatch::default(), Role::It).is_ok());

        let patch = ReportPatch {
            content: Some("short".to_string()),
            status: Some(ReportStatus::Rejected),
            ..Default::default()
        };
        let errors = validate_report_patch(&patch, Role::Riset).unwrap_err();
        assert!(has_field_error(&errors, "content"));
        assert!(has_field_error(&errors, "status"));
        assert!(!has_field_error(&errors, "title"));

        assert!(validate_report_patch(&ReportPatch::status(ReportStatus::Rejected), Role::Admin).is_ok());
    }

    #[test]
    fn test_new_account_required_fields() {
        let account = NewAccount {
            username: "user".to_string(),
            password: String::new(),
            role: Role::Content,
            display_name: "User".to_string(),
            division: String::new(),
        };
        let errors = validate_new_account(&account).unwrap_err();
        assert!(has_field_error(&errors, "password"));
        assert!(has_field_error(&errors, "division"));
        assert!(!has_field_error(&errors, "username"));
    }
}
