// App state for the axum server
use chrono::{Local, NaiveDate};
use property_manager_repository::PropertyService;

/// Where handlers get "today" from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// The local calendar date.
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: PropertyService,
    /// Unauthenticated callers are redirected here with a `next` parameter.
    pub login_url: String,
    pub clock: Clock,
}

impl AppState {
    pub fn new(service: PropertyService, login_url: String) -> Self {
        Self {
            service,
            login_url,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
