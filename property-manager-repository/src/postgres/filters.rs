//! Translation of the list criteria into SQL conditions.

use chrono::NaiveDate;
use property_manager_shared::filters::{PaymentSortKey, UnitSortKey};
use property_manager_shared::{PaymentFilter, PaymentTypeCriterion, RentalStatus, UnitFilter};
use sqlx::{Postgres, QueryBuilder};

/// `%needle%` with LIKE wildcards in the needle escaped.
pub(crate) fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Pushes a subquery selecting the contracts of `u` that cover `date`.
pub(crate) fn push_covering_contracts(qb: &mut QueryBuilder<'_, Postgres>, date: NaiveDate) {
    qb.push("SELECT 1 FROM contracts c WHERE c.unit_id = u.id AND c.start_date <= ")
        .push_bind(date)
        .push(" AND (c.end_date IS NULL OR c.end_date >= ")
        .push_bind(date)
        .push(")");
}

/// `FROM` and `WHERE` clauses of the unit list. Aliases: `u` units, `o` owners.
pub(crate) fn push_unit_conditions(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &UnitFilter,
    today: NaiveDate,
) {
    qb.push(" FROM units u JOIN owners o ON o.id = u.owner_id WHERE TRUE");
    if let Some(address) = &filter.address {
        qb.push(" AND u.address ILIKE ").push_bind(like_pattern(address));
    }
    if let Some(category) = filter.category {
        qb.push(" AND u.category = ").push_bind(category.as_str());
    }
    if let Some(owner_name) = &filter.owner_name {
        qb.push(" AND o.name ILIKE ").push_bind(like_pattern(owner_name));
    }
    if let Some(floor) = &filter.floor {
        qb.push(" AND u.floor = ").push_bind(floor.clone());
    }
    if let Some(area_min) = filter.area_min {
        qb.push(" AND u.area >= ").push_bind(area_min);
    }
    if let Some(area_max) = filter.area_max {
        qb.push(" AND u.area <= ").push_bind(area_max);
    }
    if let Some(rooms_min) = filter.rooms_min {
        qb.push(" AND u.rooms >= ").push_bind(rooms_min);
    }
    if let Some(rooms_max) = filter.rooms_max {
        qb.push(" AND u.rooms <= ").push_bind(rooms_max);
    }
    if let Some(status) = filter.rental_status {
        qb.push(match status {
            RentalStatus::Rented => " AND EXISTS (",
            RentalStatus::NotRented => " AND NOT EXISTS (",
        });
        push_covering_contracts(qb, today);
        qb.push(")");
    }
}

pub(crate) fn push_unit_ordering(qb: &mut QueryBuilder<'_, Postgres>, filter: &UnitFilter) {
    let column = match filter.ordering.key {
        UnitSortKey::Address => "u.address",
        UnitSortKey::Area => "u.area",
        UnitSortKey::Rooms => "u.rooms",
    };
    let direction = filter.ordering.direction.sql();
    qb.push(format!(" ORDER BY {column} {direction}, u.id {direction}"));
}

/// `FROM` and `WHERE` clauses of the payment list and totals. Aliases: `p`
/// payments, `u` units, `pt` payment types.
pub(crate) fn push_payment_conditions(qb: &mut QueryBuilder<'_, Postgres>, filter: &PaymentFilter) {
    qb.push(
        " FROM payments p JOIN units u ON u.id = p.unit_id \
         JOIN payment_types pt ON pt.id = p.payment_type_id WHERE TRUE",
    );
    match filter.payment_type {
        PaymentTypeCriterion::Any => {}
        PaymentTypeCriterion::Only(id) => {
            qb.push(" AND p.payment_type_id = ").push_bind(id);
        }
        PaymentTypeCriterion::Unmatchable => {
            qb.push(" AND FALSE");
        }
    }
    if let Some(description) = &filter.description {
        qb.push(" AND p.description ILIKE ")
            .push_bind(like_pattern(description));
    }
    if let Some(unit_id) = filter.unit_id {
        qb.push(" AND p.unit_id = ").push_bind(unit_id);
    }
    if let Some(address) = &filter.unit_address {
        qb.push(" AND u.address ILIKE ").push_bind(like_pattern(address));
    }
    if let Some(paid) = filter.paid {
        qb.push(" AND p.paid = ").push_bind(paid);
    }
    if let Some(payer) = filter.payer {
        qb.push(" AND p.payer = ").push_bind(payer.as_str());
    }
    if let Some(from) = filter.from {
        qb.push(" AND p.date >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND p.date <= ").push_bind(to);
    }
}

pub(crate) fn push_payment_ordering(qb: &mut QueryBuilder<'_, Postgres>, filter: &PaymentFilter) {
    let column = match filter.ordering.key {
        PaymentSortKey::Date => "p.date",
        PaymentSortKey::Amount => "p.amount",
    };
    let direction = filter.ordering.direction.sql();
    qb.push(format!(" ORDER BY {column} {direction}, p.id {direction}"));
}

#[cfg(test)]
mod tests {
    use property_manager_shared::ListParams;

    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("mayor"), "%mayor%");
    }

    #[test]
    fn test_unit_conditions_only_include_supplied_criteria() {
        let filter = UnitFilter::from_params(&ListParams::parse("area_min=70&rooms_min=x&rented=no"));
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_unit_conditions(&mut qb, &filter, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let sql = qb.sql();
        assert!(sql.contains("u.area >= $1"));
        assert!(!sql.contains("u.rooms"));
        assert!(sql.contains("AND NOT EXISTS (SELECT 1 FROM contracts c"));
    }

    #[test]
    fn test_unmatchable_payment_type_becomes_false() {
        let filter = PaymentFilter::from_params(&ListParams::parse("payment_type=abc"));
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_payment_conditions(&mut qb, &filter);
        assert!(qb.sql().ends_with("WHERE TRUE AND FALSE"));
    }

    #[test]
    fn test_payment_ordering_breaks_ties_on_id() {
        let filter = PaymentFilter::from_params(&ListParams::parse("sort=amount"));
        let mut qb = QueryBuilder::<Postgres>::new("SELECT p.id");
        push_payment_ordering(&mut qb, &filter);
        assert!(qb.sql().ends_with(" ORDER BY p.amount ASC, p.id ASC"));
    }
}
