use std::cmp::Ordering;

use crate::types::{UnitCategory, UnitListing};

use super::params::ListParams;
use super::sort::{cmp_nulls_last, compare_text, SortDirection};

/// Rental status criterion, evaluated against "a contract covers today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalStatus {
    Rented,
    NotRented,
}

impl RentalStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(RentalStatus::Rented),
            "no" => Some(RentalStatus::NotRented),
            _ => None,
        }
    }

    pub fn accepts(&self, rented: bool) -> bool {
        match self {
            RentalStatus::Rented => rented,
            RentalStatus::NotRented => !rented,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSortKey {
    Address,
    Area,
    Rooms,
}

impl UnitSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSortKey::Address => "address",
            UnitSortKey::Area => "area",
            UnitSortKey::Rooms => "rooms",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "address" => Some(UnitSortKey::Address),
            "area" => Some(UnitSortKey::Area),
            "rooms" => Some(UnitSortKey::Rooms),
            _ => None,
        }
    }
}

/// Unit list ordering. Defaults to address ascending; ties fall back to the
/// unit id in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitOrdering {
    pub key: UnitSortKey,
    pub direction: SortDirection,
}

impl Default for UnitOrdering {
    fn default() -> Self {
        Self {
            key: UnitSortKey::Address,
            direction: SortDirection::Ascending,
        }
    }
}

impl UnitOrdering {
    /// Parses `address`, `-address`, `area`, `-area`, `rooms`, `-rooms`;
    /// anything else falls back to the default ordering.
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(|v| {
                let (direction, key) = SortDirection::split(v);
                UnitSortKey::parse(key).map(|key| UnitOrdering { key, direction })
            })
            .unwrap_or_default()
    }

    /// The effective sort key as a query-string value, e.g. `-area`.
    pub fn as_param(&self) -> String {
        format!("{}{}", self.direction.prefix(), self.key.as_str())
    }

    pub fn compare(&self, a: &UnitListing, b: &UnitListing) -> Ordering {
        let (a, b) = (&a.unit, &b.unit);
        let primary = match self.key {
            UnitSortKey::Address => compare_text(&a.address, &b.address),
            UnitSortKey::Area => a.area.partial_cmp(&b.area).unwrap_or(Ordering::Equal),
            UnitSortKey::Rooms => cmp_nulls_last(a.rooms, b.rooms),
        };
        self.direction.apply(primary.then_with(|| a.id.cmp(&b.id)))
    }
}

/// Criteria for the unit list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitFilter {
    /// Case-insensitive substring of the address.
    pub address: Option<String>,
    pub category: Option<UnitCategory>,
    /// Case-insensitive substring of the owner's name.
    pub owner_name: Option<String>,
    /// Exact floor.
    pub floor: Option<String>,
    pub area_min: Option<f64>,
    pub area_max: Option<f64>,
    pub rooms_min: Option<i32>,
    pub rooms_max: Option<i32>,
    pub rental_status: Option<RentalStatus>,
    pub ordering: UnitOrdering,
}

impl UnitFilter {
    /// Builds the criteria from `q`, `category`, `owner`, `floor`, `area_min`,
    /// `area_max`, `rooms_min`, `rooms_max`, `rented` (`yes`/`no`) and `sort`.
    pub fn from_params(params: &ListParams) -> Self {
        Self {
            address: params.non_empty("q").map(str::to_string),
            category: params.non_empty("category").and_then(UnitCategory::parse),
            owner_name: params.non_empty("owner").map(str::to_string),
            floor: params.non_empty("floor").map(str::to_string),
            area_min: finite(params.parse_lenient("area_min")),
            area_max: finite(params.parse_lenient("area_max")),
            rooms_min: params.parse_lenient("rooms_min"),
            rooms_max: params.parse_lenient("rooms_max"),
            rental_status: params.non_empty("rented").and_then(RentalStatus::parse),
            ordering: UnitOrdering::parse(params.non_empty("sort")),
        }
    }

    /// Whether the listing satisfies every supplied criterion. A unit without
    /// a room count never satisfies a room bound.
    pub fn matches(&self, listing: &UnitListing) -> bool {
        let unit = &listing.unit;
        if let Some(needle) = &self.address {
            if !contains_ignore_case(&unit.address, needle) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if unit.category != category {
                return false;
            }
        }
        if let Some(needle) = &self.owner_name {
            if !contains_ignore_case(&listing.owner_name, needle) {
                return false;
            }
        }
        if let Some(floor) = &self.floor {
            if &unit.floor != floor {
                return false;
            }
        }
        if matches!(self.area_min, Some(min) if unit.area < min) {
            return false;
        }
        if matches!(self.area_max, Some(max) if unit.area > max) {
            return false;
        }
        if let Some(min) = self.rooms_min {
            if !matches!(unit.rooms, Some(rooms) if rooms >= min) {
                return false;
            }
        }
        if let Some(max) = self.rooms_max {
            if !matches!(unit.rooms, Some(rooms) if rooms <= max) {
                return false;
            }
        }
        if let Some(status) = self.rental_status {
            if !status.accepts(listing.rented) {
                return false;
            }
        }
        true
    }

    pub fn compare(&self, a: &UnitListing, b: &UnitListing) -> Ordering {
        self.ordering.compare(a, b)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
