use std::cmp::Ordering;

/// Sort direction, written as a `-` prefix on the sort key for descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Splits `"-key"` into `(Descending, "key")` and `"key"` into `(Ascending, "key")`.
    pub fn split(value: &str) -> (SortDirection, &str) {
        match value.strip_prefix('-') {
            Some(key) => (SortDirection::Descending, key),
            None => (SortDirection::Ascending, value),
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "",
            SortDirection::Descending => "-",
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Compares optional values the way PostgreSQL orders NULLs by default:
/// NULL sorts after every value in ascending order.
pub(crate) fn cmp_nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

/// Orders text case-insensitively, falling back to the exact text so the
/// order stays total. Accented letters still follow code-point order, which
/// can differ from the database collation.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_text_ignores_case() {
        let mut addresses = vec!["Zeta 1", "calle b", "Calle A"];
        addresses.sort_by(|a, b| compare_text(a, b));
        assert_eq!(addresses, vec!["Calle A", "calle b", "Zeta 1"]);
        assert_eq!(compare_text("Luna", "luna"), Ordering::Less);
    }

    #[test]
    fn test_split() {
        assert_eq!(SortDirection::split("-area"), (SortDirection::Descending, "area"));
        assert_eq!(SortDirection::split("area"), (SortDirection::Ascending, "area"));
    }

    #[test]
    fn test_nulls_sort_last_ascending_and_first_descending() {
        let mut values = vec![Some(3), None, Some(1)];
        values.sort_by(|a, b| SortDirection::Ascending.apply(cmp_nulls_last(*a, *b)));
        assert_eq!(values, vec![Some(1), Some(3), None]);
        values.sort_by(|a, b| SortDirection::Descending.apply(cmp_nulls_last(*a, *b)));
        assert_eq!(values, vec![None, Some(3), Some(1)]);
    }
}
