use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of days after the reference date before a follow-up is due.
pub const FOLLOW_UP_AFTER_DAYS: u64 = 7;

/// Pipeline stage of an application. The member names double as the CSV
/// and JSON wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Accepted,
    Withdrawn,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Applied,
        Status::Interviewing,
        Status::Offer,
        Status::Rejected,
        Status::Accepted,
        Status::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Applied => "APPLIED",
            Status::Interviewing => "INTERVIEWING",
            Status::Offer => "OFFER",
            Status::Rejected => "REJECTED",
            Status::Accepted => "ACCEPTED",
            Status::Withdrawn => "WITHDRAWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    /// Exact, case-sensitive match against the member names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Caller-supplied fields of an application, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub company: String,
    pub role: String,
    pub status: Status,
    pub applied_on: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A stored job application. Values are immutable once built; the store
/// replaces them wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: u64,
    pub company: String,
    pub role: String,
    pub status: Status,
    pub applied_on: NaiveDate,
    pub notes: Option<String>,
    pub last_update: Option<NaiveDate>,
}

impl ApplicationRecord {
    pub fn from_draft(id: u64, draft: ApplicationDraft, last_update: Option<NaiveDate>) -> Self {
        let ApplicationDraft {
            company,
            role,
            status,
            applied_on,
            notes,
        } = draft;
        Self {
            id,
            company,
            role,
            status,
            applied_on,
            notes,
            last_update,
        }
    }

    /// `last_update` when present, otherwise `applied_on`.
    pub fn reference_date(&self) -> NaiveDate {
        self.last_update.unwrap_or(self.applied_on)
    }

    /// True once more than a week has passed since the reference date.
    pub fn follow_up_due_on(&self, today: NaiveDate) -> bool {
        self.reference_date()
            .checked_add_days(Days::new(FOLLOW_UP_AFTER_DAYS))
            .is_some_and(|due| due < today)
    }

    pub fn follow_up_due(&self) -> bool {
        self.follow_up_due_on(Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(applied_on: NaiveDate, last_update: Option<NaiveDate>) -> ApplicationRecord {
        ApplicationRecord {
            id: 1,
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            status: Status::Applied,
            applied_on,
            notes: None,
            last_update,
        }
    }

    #[test]
    fn test_status_parse_every_member() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
    }

    #[test]
    fn test_status_parse_is_case_sensitive() {
        assert_eq!(
            "offer".parse::<Status>(),
            Err(UnknownStatus("offer".to_string()))
        );
        assert!("BOGUS".parse::<Status>().is_err());
        assert!(" OFFER".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_serde_uses_member_names() {
        let json = serde_json::to_string(&Status::Interviewing).unwrap();
        assert_eq!(json, r#""INTERVIEWING""#);
        let status: Status = serde_json::from_str(r#""WITHDRAWN""#).unwrap();
        assert_eq!(status, Status::Withdrawn);
    }

    #[test]
    fn test_reference_date_falls_back_to_applied_on() {
        let applied = date(2024, 3, 1);
        assert_eq!(record(applied, None).reference_date(), applied);
        let updated = date(2024, 3, 9);
        assert_eq!(record(applied, Some(updated)).reference_date(), updated);
    }

    #[test]
    fn test_follow_up_not_due_on_seventh_day() {
        let r = record(date(2024, 3, 1), None);
        assert!(!r.follow_up_due_on(date(2024, 3, 8)));
    }

    #[test]
    fn test_follow_up_due_after_seventh_day() {
        let r = record(date(2024, 3, 1), None);
        assert!(r.follow_up_due_on(date(2024, 3, 9)));
    }

    #[test]
    fn test_follow_up_uses_last_update() {
        let r = record(date(2024, 1, 1), Some(date(2024, 3, 5)));
        assert!(!r.follow_up_due_on(date(2024, 3, 10)));
        assert!(r.follow_up_due_on(date(2024, 3, 13)));
    }

    #[test]
    fn test_record_json_is_camel_case() {
        let r = record(date(2024, 3, 1), Some(date(2024, 3, 2)));
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["appliedOn"], "2024-03-01");
        assert_eq!(value["lastUpdate"], "2024-03-02");
        assert_eq!(value["status"], "APPLIED");
        assert!(value["notes"].is_null());
    }
}
