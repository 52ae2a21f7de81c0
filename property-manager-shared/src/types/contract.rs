use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{non_negative_money, ValidationErrors};
use super::RecordId;

/// A rental contract on a unit. A missing end date means the contract is
/// open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: RecordId,
    pub unit_id: RecordId,
    pub owner_id: RecordId,
    pub tenant_ids: Vec<RecordId>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub monthly_price: BigDecimal,
    pub terms: String,
}

impl Contract {
    /// Whether `start_date <= date` and the contract has not ended before `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| end >= date)
    }

    /// `"{unit} · {start}→{end|open}"`, given the unit's display label.
    pub fn display_name(&self, unit_label: &str) -> String {
        let end = self
            .end_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "open".to_string());
        format!(
            "{} · {}→{}",
            unit_label,
            self.start_date.format("%Y-%m-%d"),
            end
        )
    }
}

/// Picks the contract in force for `unit_id` on `date`.
///
/// Among the unit's contracts covering the date, the one with the latest start
/// date wins; equal start dates resolve to the highest id.
pub fn select_active_contract<'a, I>(
    contracts: I,
    unit_id: RecordId,
    date: NaiveDate,
) -> Option<&'a Contract>
where
    I: IntoIterator<Item = &'a Contract>,
{
    contracts
        .into_iter()
        .filter(|c| c.unit_id == unit_id && c.covers(date))
        .max_by_key(|c| (c.start_date, c.id))
}

/// Contract row in the contract list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractListing {
    #[serde(flatten)]
    pub contract: Contract,
    pub unit_label: String,
    pub owner_name: String,
    pub tenant_names: Vec<String>,
}

/// Create/edit payload for a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContractInput {
    pub unit_id: RecordId,
    pub owner_id: RecordId,
    #[validate(length(min = 1, message = "Select at least one tenant."))]
    pub tenant_ids: Vec<RecordId>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[validate(custom(function = "non_negative_money"))]
    pub monthly_price: BigDecimal,
    #[serde(default)]
    pub terms: String,
}

impl ContractInput {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::collect(self);
        if matches!(self.end_date, Some(end) if end < self.start_date) {
            errors.add("end_date", "The end date cannot precede the start date.");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn contract(id: RecordId, unit_id: RecordId, start: &str, end: Option<&str>) -> Contract {
        Contract {
            id,
            unit_id,
            owner_id: 1,
            tenant_ids: vec![1],
            start_date: date(start),
            end_date: end.map(date),
            monthly_price: BigDecimal::from(700),
            terms: String::new(),
        }
    }

    #[test]
    fn test_covers_closed_range_is_inclusive() {
        let c = contract(1, 1, "2023-01-01", Some("2023-12-31"));
        assert!(c.covers(date("2023-01-01")));
        assert!(c.covers(date("2023-06-15")));
        assert!(c.covers(date("2023-12-31")));
        assert!(!c.covers(date("2022-12-31")));
        assert!(!c.covers(date("2024-01-15")));
    }

    #[test]
    fn test_covers_open_ended() {
        let c = contract(1, 1, "2023-01-01", None);
        assert!(c.covers(date("2099-01-01")));
        assert!(!c.covers(date("2022-06-01")));
    }

    #[test]
    fn test_select_latest_start_wins() {
        let contracts = vec![
            contract(1, 1, "2023-01-01", None),
            contract(2, 1, "2023-05-01", Some("2023-12-31")),
            contract(3, 2, "2023-06-01", None),
        ];
        let active = select_active_contract(&contracts, 1, date("2023-06-15")).unwrap();
        assert_eq!(active.id, 2);

        let active = select_active_contract(&contracts, 1, date("2024-02-01")).unwrap();
        assert_eq!(active.id, 1);

        assert!(select_active_contract(&contracts, 1, date("2022-01-01")).is_none());
    }

    #[test]
    fn test_select_never_crosses_units() {
        let contracts = vec![contract(3, 2, "2023-06-01", None)];
        assert!(select_active_contract(&contracts, 1, date("2023-07-01")).is_none());
    }

    #[test]
    fn test_select_tie_breaks_on_highest_id() {
        let contracts = vec![
            contract(7, 1, "2023-01-01", None),
            contract(9, 1, "2023-01-01", Some("2023-12-31")),
            contract(8, 1, "2023-01-01", None),
        ];
        let active = select_active_contract(&contracts, 1, date("2023-03-01")).unwrap();
        assert_eq!(active.id, 9);
    }

    #[test]
    fn test_display_name() {
        let c = contract(1, 1, "2023-01-01", None);
        assert_eq!(c.display_name("Apartment · Calle Mayor 1"), "Apartment · Calle Mayor 1 · 2023-01-01→open");
    }

    #[test]
    fn test_validate() {
        let input = ContractInput {
            unit_id: 1,
            owner_id: 1,
            tenant_ids: vec![],
            start_date: date("2023-05-01"),
            end_date: Some(date("2023-04-01")),
            monthly_price: BigDecimal::from_str("-5").unwrap(),
            terms: String::new(),
        };
        let errors = input.check().unwrap_err();
        assert_eq!(
            errors.field("tenant_ids").unwrap(),
            ["Select at least one tenant."]
        );
        assert!(errors.field("end_date").is_some());
        assert_eq!(
            errors.field("monthly_price").unwrap(),
            ["Ensure this value is greater than or equal to 0."]
        );
    }
}
