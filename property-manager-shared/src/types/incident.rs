use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{not_blank, ValidationErrors};
use super::RecordId;

pub const DEFAULT_INCIDENT_STATUS: &str = "pending";

/// An incident reported on a unit. `reported_on` is set at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: RecordId,
    pub unit_id: RecordId,
    pub description: String,
    pub status: String,
    pub reported_on: NaiveDate,
    pub resolved_on: Option<NaiveDate>,
}

impl Incident {
    pub fn display_name(&self, unit_label: &str) -> String {
        format!(
            "{} · {} · {}",
            unit_label,
            self.status,
            self.reported_on.format("%Y-%m-%d")
        )
    }
}

/// Create/edit payload for an incident. A blank status becomes `pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IncidentInput {
    pub unit_id: RecordId,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub status: String,
    #[serde(default)]
    pub resolved_on: Option<NaiveDate>,
}

impl IncidentInput {
    /// Validates the input; `reported_on` is the report date of the record
    /// being edited, or today for a new incident.
    pub fn check(&self, reported_on: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::collect(self);
        if matches!(self.resolved_on, Some(resolved) if resolved < reported_on) {
            errors.add("resolved_on", "The resolution date cannot precede the report date.");
        }
        errors.into_result()
    }

    pub fn effective_status(&self) -> String {
        let status = self.status.trim();
        if status.is_empty() {
            DEFAULT_INCIDENT_STATUS.to_string()
        } else {
            status.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> IncidentInput {
        IncidentInput {
            unit_id: 1,
            description: "Leaking tap".to_string(),
            status: "  ".to_string(),
            resolved_on: None,
        }
    }

    #[test]
    fn test_blank_status_defaults_to_pending() {
        assert_eq!(input().effective_status(), "pending");
        let resolved = IncidentInput {
            status: "resolved".to_string(),
            ..input()
        };
        assert_eq!(resolved.effective_status(), "resolved");
    }

    #[test]
    fn test_resolution_before_report_is_rejected() {
        let reported = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let early = IncidentInput {
            resolved_on: NaiveDate::from_ymd_opt(2024, 3, 9),
            ..input()
        };
        assert!(early.check(reported).is_err());
        let same_day = IncidentInput {
            resolved_on: Some(reported),
            ..input()
        };
        assert!(same_day.check(reported).is_ok());
    }

    #[test]
    fn test_blank_description_is_required() {
        let blank = IncidentInput {
            description: " ".to_string(),
            status: "x".repeat(51),
            ..input()
        };
        let errors = blank
            .check(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
            .unwrap_err();
        assert_eq!(
            errors.field("description").unwrap(),
            ["This field is required."]
        );
        assert!(errors.field("status").is_some());
    }
}
