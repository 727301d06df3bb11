use crate::errors::AppError;
use crate::models::ApplicationDraft;

/// Rejects drafts whose required text fields are blank.
/// Status and dates are already enforced by deserialization.
pub fn validate_draft(draft: &ApplicationDraft) -> Result<(), AppError> {
    let mut blank = Vec::new();
    if draft.company.trim().is_empty() {
        blank.push("company");
    }
    if draft.role.trim().is_empty() {
        blank.push("role");
    }

    if blank.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must not be blank",
            blank.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::Status;

    fn draft(company: &str, role: &str) -> ApplicationDraft {
        ApplicationDraft {
            company: company.to_string(),
            role: role.to_string(),
            status: Status::Applied,
            applied_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate_draft(&draft("Acme", "Engineer")).is_ok());
    }

    #[test]
    fn test_blank_company_fails() {
        let err = validate_draft(&draft("   ", "Engineer")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "company must not be blank"));
    }

    #[test]
    fn test_both_blank_lists_both_fields() {
        let err = validate_draft(&draft("", "\t")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "company, role must not be blank"));
    }

    #[test]
    fn test_notes_may_be_empty() {
        let mut d = draft("Acme", "Engineer");
        d.notes = Some(String::new());
        assert!(validate_draft(&d).is_ok());
    }
}
