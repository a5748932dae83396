//! Time source for every date-sensitive rule in the domain.
//!
//! Entities never read the wall clock directly. Callers pass a [`Clock`] into
//! loan creation, membership validation and publication year checks, so the
//! same rules can be evaluated deterministically in tests.

use chrono::{Datelike, NaiveDate, Utc};
use std::sync::{Mutex, MutexGuard};

/// Provides the current date and year.
pub trait Clock: Send + Sync {
    /// Returns today's date.
    fn today(&self) -> NaiveDate;

    /// Returns the current calendar year.
    fn current_year(&self) -> i32 {
        self.today().year()
    }
}

/// Real-time clock backed by the system time (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock frozen at a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
    year: Option<i32>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today, year: None }
    }

    /// Pins the current year independently of the pinned date.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn current_year(&self) -> i32 {
        self.year.unwrap_or_else(|| self.today.year())
    }
}

#[derive(Debug, Default)]
struct Overrides {
    today: Option<NaiveDate>,
    year: Option<i32>,
}

/// Real-time clock whose date and year can be pinned and later reset.
///
/// Overrides are scoped to this instance; two services holding different
/// clocks never observe each other's overrides.
#[derive(Debug, Default)]
pub struct AdjustableClock {
    overrides: Mutex<Overrides>,
}

impl AdjustableClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins "today" to `date`.
    pub fn set_today(&self, date: NaiveDate) {
        self.lock().today = Some(date);
    }

    /// Pins the current year to `year`.
    pub fn set_year(&self, year: i32) {
        self.lock().year = Some(year);
    }

    /// Drops all overrides and returns to real time.
    pub fn reset(&self) {
        *self.lock() = Overrides::default();
    }

    fn lock(&self) -> MutexGuard<'_, Overrides> {
        // Overrides are plain values, a poisoned lock still holds a usable state.
        self.overrides.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for AdjustableClock {
    fn today(&self) -> NaiveDate {
        self.lock().today.unwrap_or_else(|| SystemClock.today())
    }

    fn current_year(&self) -> i32 {
        let overrides = self.lock();
        match (overrides.year, overrides.today) {
            (Some(year), _) => year,
            (None, Some(today)) => today.year(),
            (None, None) => SystemClock.current_year(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_clock_returns_given_date() {
        let clock = FixedClock::new(date(2024, 1, 15));

        assert_eq!(clock.today(), date(2024, 1, 15));
        assert_eq!(clock.current_year(), 2024);
    }

    #[test]
    fn test_fixed_clock_year_override() {
        let clock = FixedClock::new(date(2024, 1, 15)).with_year(1999);

        assert_eq!(clock.today(), date(2024, 1, 15));
        assert_eq!(clock.current_year(), 1999);
    }

    #[test]
    fn test_adjustable_clock_defaults_to_system_time() {
        let clock = AdjustableClock::new();

        assert_eq!(clock.today(), SystemClock.today());
        assert_eq!(clock.current_year(), SystemClock.current_year());
    }

    #[test]
    fn test_adjustable_clock_set_and_reset() {
        let clock = AdjustableClock::new();

        clock.set_today(date(2020, 6, 1));
        assert_eq!(clock.today(), date(2020, 6, 1));
        assert_eq!(clock.current_year(), 2020);

        clock.set_year(2030);
        assert_eq!(clock.current_year(), 2030);
        assert_eq!(clock.today(), date(2020, 6, 1));

        clock.reset();
        assert_eq!(clock.today(), SystemClock.today());
    }

    #[test]
    fn test_clock_trait_object_works() {
        let clock: Box<dyn Clock> = Box::new(FixedClock::new(date(2025, 10, 2)));

        assert_eq!(clock.today(), date(2025, 10, 2));
    }
}
