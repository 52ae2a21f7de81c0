//! Configuration types for the PropertyService.

/// Page sizes used by the list operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub unit_page_size: u64,
    pub payment_page_size: u64,
    /// Page size for every other record list.
    pub record_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            unit_page_size: 15,
            payment_page_size: 20,
            record_page_size: 20,
        }
    }
}
