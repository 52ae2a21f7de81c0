use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{money, ValidationErrors};
use super::{Page, PayerRole, RecordId};

/// A payment record on a unit, optionally linked to the contract that was in
/// force on its date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: RecordId,
    pub unit_id: RecordId,
    pub contract_id: Option<RecordId>,
    pub payment_type_id: RecordId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: BigDecimal,
    pub paid: bool,
    pub payer: PayerRole,
}

impl Payment {
    /// `"{type} · {amount}€ · {Paid|Pending} · {date}"`.
    pub fn display_name(&self, payment_type_name: &str) -> String {
        let status = if self.paid { "Paid" } else { "Pending" };
        format!(
            "{} · {}€ · {} · {}",
            payment_type_name,
            self.amount,
            status,
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Payment row as produced by the payment filter engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentListing {
    #[serde(flatten)]
    pub payment: Payment,
    pub unit_address: String,
    pub payment_type_name: String,
}

/// Create/edit payload for a payment. A missing date means "today" on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PaymentInput {
    pub unit_id: RecordId,
    pub payment_type_id: RecordId,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub description: String,
    #[validate(custom(function = "money"))]
    pub amount: BigDecimal,
    #[serde(default)]
    pub paid: bool,
    pub payer: PayerRole,
}

impl PaymentInput {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::collect(self).into_result()
    }

    /// Resolves the input into the record to store, given the effective date.
    pub fn into_new_payment(self, date: NaiveDate) -> NewPayment {
        NewPayment {
            unit_id: self.unit_id,
            payment_type_id: self.payment_type_id,
            date,
            description: self.description,
            amount: self.amount,
            paid: self.paid,
            payer: self.payer,
        }
    }
}

/// A payment ready to be stored, with its date resolved. The store links the
/// contract in force on that date when the payment is created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub unit_id: RecordId,
    pub payment_type_id: RecordId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: BigDecimal,
    pub paid: bool,
    pub payer: PayerRole,
}

/// Sums over a filtered payment set. `all == paid + pending` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTotals {
    pub all: BigDecimal,
    pub paid: BigDecimal,
    pub pending: BigDecimal,
}

impl Default for PaymentTotals {
    fn default() -> Self {
        Self {
            all: BigDecimal::from(0),
            paid: BigDecimal::from(0),
            pending: BigDecimal::from(0),
        }
    }
}

/// A page of filtered payments together with the totals over every match,
/// read from the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPage {
    pub page: Page<PaymentListing>,
    pub totals: PaymentTotals,
}

impl PaymentTotals {
    /// Builds the totals from the paid and pending sums; a missing sum (no rows)
    /// counts as zero.
    pub fn from_sums(paid: Option<BigDecimal>, pending: Option<BigDecimal>) -> Self {
        let paid = paid.unwrap_or_else(|| BigDecimal::from(0));
        let pending = pending.unwrap_or_else(|| BigDecimal::from(0));
        Self {
            all: &paid + &pending,
            paid,
            pending,
        }
    }

    pub fn accumulate<'a, I>(payments: I) -> Self
    where
        I: IntoIterator<Item = &'a Payment>,
    {
        let mut totals = Self::default();
        for payment in payments {
            totals.all += &payment.amount;
            if payment.paid {
                totals.paid += &payment.amount;
            } else {
                totals.pending += &payment.amount;
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payment(id: RecordId, amount: &str, paid: bool) -> Payment {
        Payment {
            id,
            unit_id: 1,
            contract_id: None,
            payment_type_id: 1,
            date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            description: String::new(),
            amount: BigDecimal::from_str(amount).unwrap(),
            paid,
            payer: PayerRole::Tenant,
        }
    }

    #[test]
    fn test_accumulate_splits_paid_and_pending() {
        let payments = vec![
            payment(1, "100.50", true),
            payment(2, "20.25", false),
            payment(3, "9.25", false),
        ];
        let totals = PaymentTotals::accumulate(&payments);
        assert_eq!(totals.all, BigDecimal::from_str("130.00").unwrap());
        assert_eq!(totals.paid, BigDecimal::from_str("100.50").unwrap());
        assert_eq!(totals.pending, BigDecimal::from_str("29.50").unwrap());
        assert_eq!(totals.all, &totals.paid + &totals.pending);
    }

    #[test]
    fn test_empty_totals_are_zero() {
        let totals = PaymentTotals::accumulate(std::iter::empty());
        assert_eq!(totals, PaymentTotals::default());
        assert_eq!(PaymentTotals::from_sums(None, None), PaymentTotals::default());
    }

    #[test]
    fn test_from_sums() {
        let totals = PaymentTotals::from_sums(Some(BigDecimal::from(10)), None);
        assert_eq!(totals.all, BigDecimal::from(10));
        assert_eq!(totals.pending, BigDecimal::from(0));
    }

    #[test]
    fn test_input_check_rejects_extra_decimals() {
        let input = PaymentInput {
            unit_id: 1,
            payment_type_id: 1,
            date: None,
            description: "x".repeat(201),
            amount: BigDecimal::from_str("12.345").unwrap(),
            paid: false,
            payer: PayerRole::Tenant,
        };
        let errors = input.check().unwrap_err();
        assert_eq!(
            errors.field("amount").unwrap(),
            ["Ensure that there are no more than 2 decimal places."]
        );
        assert!(errors.field("description").is_some());
    }

    #[test]
    fn test_display_name() {
        let p = payment(1, "650.00", false);
        assert_eq!(p.display_name("Rent"), "Rent · 650.00€ · Pending · 2023-06-15");
    }
}
