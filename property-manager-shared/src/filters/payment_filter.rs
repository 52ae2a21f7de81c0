use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::types::{PayerRole, PaymentListing, RecordId};

use super::params::ListParams;
use super::sort::SortDirection;
use super::unit_filter::contains_ignore_case;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentSortKey {
    Date,
    Amount,
}

impl PaymentSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentSortKey::Date => "date",
            PaymentSortKey::Amount => "amount",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(PaymentSortKey::Date),
            "amount" => Some(PaymentSortKey::Amount),
            _ => None,
        }
    }
}

/// Payment list ordering. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOrdering {
    pub key: PaymentSortKey,
    pub direction: SortDirection,
}

impl Default for PaymentOrdering {
    fn default() -> Self {
        Self {
            key: PaymentSortKey::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl PaymentOrdering {
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(|v| {
                let (direction, key) = SortDirection::split(v);
                PaymentSortKey::parse(key).map(|key| PaymentOrdering { key, direction })
            })
            .unwrap_or_default()
    }

    pub fn as_param(&self) -> String {
        format!("{}{}", self.direction.prefix(), self.key.as_str())
    }

    pub fn compare(&self, a: &PaymentListing, b: &PaymentListing) -> Ordering {
        let (a, b) = (&a.payment, &b.payment);
        let primary = match self.key {
            PaymentSortKey::Date => a.date.cmp(&b.date),
            PaymentSortKey::Amount => a.amount.cmp(&b.amount),
        };
        self.direction.apply(primary.then_with(|| a.id.cmp(&b.id)))
    }
}

/// The payment-type criterion.
///
/// Unlike every other criterion, a value that is not an integer does not get
/// ignored: it makes the whole filter match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentTypeCriterion {
    #[default]
    Any,
    Only(RecordId),
    Unmatchable,
}

impl PaymentTypeCriterion {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => PaymentTypeCriterion::Any,
            Some(raw) => raw
                .parse::<RecordId>()
                .map(PaymentTypeCriterion::Only)
                .unwrap_or(PaymentTypeCriterion::Unmatchable),
        }
    }
}

/// Criteria for the payment list and its totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
    pub unit_id: Option<RecordId>,
    /// Case-insensitive substring of the unit address.
    pub unit_address: Option<String>,
    pub payment_type: PaymentTypeCriterion,
    pub paid: Option<bool>,
    pub payer: Option<PayerRole>,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    pub ordering: PaymentOrdering,
}

impl PaymentFilter {
    /// Builds the criteria from `q`, `unit`, `unit_q`, `payment_type`, `paid`
    /// (`yes`/`no`), `payer`, `from`, `to` and `sort`.
    pub fn from_params(params: &ListParams) -> Self {
        Self {
            description: params.non_empty("q").map(str::to_string),
            unit_id: params.parse_lenient("unit"),
            unit_address: params.non_empty("unit_q").map(str::to_string),
            payment_type: PaymentTypeCriterion::parse(params.non_empty("payment_type")),
            paid: params.non_empty("paid").and_then(|v| match v {
                "yes" => Some(true),
                "no" => Some(false),
                _ => None,
            }),
            payer: params.non_empty("payer").and_then(PayerRole::parse),
            from: parse_date(params.non_empty("from")),
            to: parse_date(params.non_empty("to")),
            ordering: PaymentOrdering::parse(params.non_empty("sort")),
        }
    }

    /// True when no payment can ever satisfy the criteria.
    pub fn is_unsatisfiable(&self) -> bool {
        self.payment_type == PaymentTypeCriterion::Unmatchable
    }

    pub fn matches(&self, listing: &PaymentListing) -> bool {
        let payment = &listing.payment;
        match self.payment_type {
            PaymentTypeCriterion::Any => {}
            PaymentTypeCriterion::Only(id) if payment.payment_type_id == id => {}
            _ => return false,
        }
        if let Some(needle) = &self.description {
            if !contains_ignore_case(&payment.description, needle) {
                return false;
            }
        }
        if matches!(self.unit_id, Some(id) if payment.unit_id != id) {
            return false;
        }
        if let Some(needle) = &self.unit_address {
            if !contains_ignore_case(&listing.unit_address, needle) {
                return false;
            }
        }
        if matches!(self.paid, Some(paid) if payment.paid != paid) {
            return false;
        }
        if matches!(self.payer, Some(payer) if payment.payer != payer) {
            return false;
        }
        if matches!(self.from, Some(from) if payment.date < from) {
            return false;
        }
        if matches!(self.to, Some(to) if payment.date > to) {
            return false;
        }
        true
    }

    pub fn compare(&self, a: &PaymentListing, b: &PaymentListing) -> Ordering {
        self.ordering.compare(a, b)
    }
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
}
