//! List view models handed to the rendering layer.
//!
//! Each view carries the page of results, the criteria exactly as they were
//! received (so the filter form can be redrawn), the effective sort key and
//! the query string to append to page links.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::filters::ListParams;
use crate::types::{
    Page, PayerRole, PaymentListing, PaymentTotals, PaymentType, RecordId, UnitCategory,
    UnitListing,
};

/// One option of a select input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn from_pairs(pairs: Vec<(&'static str, &'static str)>) -> Vec<Choice> {
        pairs.into_iter().map(|(v, l)| Choice::new(v, l)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCriteria {
    pub q: String,
    pub category: String,
    pub owner: String,
    pub floor: String,
    pub area_min: String,
    pub area_max: String,
    pub rooms_min: String,
    pub rooms_max: String,
    pub rented: String,
}

impl UnitCriteria {
    pub fn echo(params: &ListParams) -> Self {
        Self {
            q: params.echo("q"),
            category: params.echo("category"),
            owner: params.echo("owner"),
            floor: params.echo("floor"),
            area_min: params.echo("area_min"),
            area_max: params.echo("area_max"),
            rooms_min: params.echo("rooms_min"),
            rooms_max: params.echo("rooms_max"),
            rented: params.echo("rented"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitListView {
    pub page: Page<UnitListing>,
    pub criteria: UnitCriteria,
    pub sort: String,
    pub query_string: String,
    pub category_choices: Vec<Choice>,
}

impl UnitListView {
    pub fn new(page: Page<UnitListing>, params: &ListParams, sort: String) -> Self {
        Self {
            page,
            criteria: UnitCriteria::echo(params),
            sort,
            query_string: params.query_string(),
            category_choices: Choice::from_pairs(UnitCategory::choices()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCriteria {
    pub q: String,
    pub unit: String,
    pub unit_q: String,
    pub payment_type: String,
    pub paid: String,
    pub payer: String,
    pub from: String,
    pub to: String,
}

impl PaymentCriteria {
    pub fn echo(params: &ListParams) -> Self {
        Self {
            q: params.echo("q"),
            unit: params.echo("unit"),
            unit_q: params.echo("unit_q"),
            payment_type: params.echo("payment_type"),
            paid: params.echo("paid"),
            payer: params.echo("payer"),
            from: params.echo("from"),
            to: params.echo("to"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentListView {
    pub page: Page<PaymentListing>,
    /// Sums over every matching payment, not only the current page.
    pub totals: PaymentTotals,
    pub criteria: PaymentCriteria,
    pub sort: String,
    pub query_string: String,
    pub payment_types: Vec<PaymentType>,
    pub payer_choices: Vec<Choice>,
}

impl PaymentListView {
    pub fn new(
        page: Page<PaymentListing>,
        totals: PaymentTotals,
        params: &ListParams,
        sort: String,
        payment_types: Vec<PaymentType>,
    ) -> Self {
        Self {
            page,
            totals,
            criteria: PaymentCriteria::echo(params),
            sort,
            query_string: params.query_string(),
            payment_types,
            payer_choices: Choice::from_pairs(PayerRole::choices()),
        }
    }
}

/// Pre-filled values for a new payment form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFormInitial {
    pub unit_id: Option<RecordId>,
    pub payment_type_id: Option<RecordId>,
    pub date: NaiveDate,
    pub payer: Option<PayerRole>,
}

/// A list of simple records with its echoed criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordListView<T> {
    pub page: Page<T>,
    pub criteria: BTreeMap<String, String>,
    pub query_string: String,
}

impl<T> RecordListView<T> {
    pub fn new(page: Page<T>, params: &ListParams, keys: &[&str]) -> Self {
        Self {
            page,
            criteria: keys
                .iter()
                .map(|key| (key.to_string(), params.echo(key)))
                .collect(),
            query_string: params.query_string(),
        }
    }
}
