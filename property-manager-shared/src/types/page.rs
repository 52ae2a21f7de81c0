use serde::{Deserialize, Serialize};

/// A requested page: 1-based number and fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Parses the `page` query parameter. Missing, non-numeric or zero values
    /// select the first page.
    pub fn from_param(value: Option<&str>, size: u64) -> Self {
        let number = value
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(1);
        Self::new(number, size)
    }

    /// Number of pages needed for `total` items; an empty set still has one page.
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.size).max(1)
    }

    /// The requested page clamped to the last available page.
    pub fn clamp_to(&self, total: u64) -> PageRequest {
        PageRequest {
            number: self.number.min(self.page_count(total)),
            size: self.size,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }

    /// Slices an already filtered and sorted sequence into this page,
    /// clamping the page number first.
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let request = self.clamp_to(total);
        let page_items = items
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();
        Page::new(page_items, request, total)
    }
}

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub num_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// `request` must already be clamped to `total_items`.
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let num_pages = request.page_count(total_items);
        Self {
            items,
            number: request.number,
            page_size: request.size,
            total_items,
            num_pages,
            has_previous: request.number > 1,
            has_next: request.number < num_pages,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            page_size: self.page_size,
            total_items: self.total_items,
            num_pages: self.num_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_param_defaults_to_first_page() {
        assert_eq!(PageRequest::from_param(None, 15).number, 1);
        assert_eq!(PageRequest::from_param(Some("abc"), 15).number, 1);
        assert_eq!(PageRequest::from_param(Some("0"), 15).number, 1);
        assert_eq!(PageRequest::from_param(Some("-2"), 15).number, 1);
        assert_eq!(PageRequest::from_param(Some("3"), 15).number, 3);
    }

    #[test]
    fn test_clamps_past_last_page() {
        let request = PageRequest::new(9, 15);
        let clamped = request.clamp_to(31);
        assert_eq!(clamped.number, 3);
        assert_eq!(clamped.offset(), 30);
        assert_eq!(PageRequest::new(4, 15).clamp_to(0).number, 1);
    }

    #[test]
    fn test_slice() {
        let page = PageRequest::new(2, 2).slice(vec![1, 2, 3, 4, 5]);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.num_pages, 3);
        assert!(page.has_previous);
        assert!(page.has_next);

        let empty: Page<i32> = PageRequest::new(1, 20).slice(vec![]);
        assert!(empty.items.is_empty());
        assert_eq!(empty.num_pages, 1);
        assert!(!empty.has_next);
    }
}
