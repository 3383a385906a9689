//! Wall-clock access for plugins.
//!
//! Plugins that reason about "today" read time through a [`Clock`] so tests
//! can pin it with [`MockClock`].

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// ClockProvider Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for providing current time.
///
/// Implement this for custom time providers (e.g., mock clock for testing).
///
/// # Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use habitat_features::ClockProvider;
///
/// /// A clock that always returns a fixed time.
/// struct FixedClock(DateTime<Utc>);
///
/// impl ClockProvider for FixedClock {
///     fn now(&self) -> DateTime<Utc> {
///         self.0
///     }
/// }
/// ```
pub trait ClockProvider: Send + Sync + 'static {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// System clock provider using [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
struct SystemClock;

impl ClockProvider for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock
// ─────────────────────────────────────────────────────────────────────────────

/// Time source shared by plugins. Uses the system clock by default.
#[derive(Clone)]
pub struct Clock {
    provider: Arc<dyn ClockProvider>,
}

impl Clock {
    /// Creates a Clock using the system clock.
    #[must_use]
    pub fn system() -> Self {
        Self {
            provider: Arc::new(SystemClock),
        }
    }

    /// Creates a Clock with a custom provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn ClockProvider>) -> Self {
        Self { provider }
    }

    /// Returns the current time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.provider.now()
    }

    /// Returns the current UTC calendar day.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MockClock for Testing
// ─────────────────────────────────────────────────────────────────────────────

/// Mock clock for testing with controllable time.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use chrono::{Duration, Utc};
/// use habitat_features::{Clock, MockClock};
///
/// let mock = Arc::new(MockClock::new(Utc::now()));
/// let clock = Clock::with_provider(mock.clone());
///
/// // Later, advance time
/// mock.advance(Duration::days(1));
/// ```
#[cfg(any(test, feature = "test-utils"))]
pub struct MockClock {
    current: parking_lot::RwLock<DateTime<Utc>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockClock {
    /// Creates a mock clock set to the given time.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: parking_lot::RwLock::new(start),
        }
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, duration: chrono::Duration) {
        *self.current.write() += duration;
    }

    /// Sets the clock to a specific time.
    pub fn set(&self, time: DateTime<Utc>) {
        *self.current.write() = time;
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl ClockProvider for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mock_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        let mock = Arc::new(MockClock::new(start));
        let clock = Clock::with_provider(mock.clone());

        assert_eq!(clock.now(), start);
        mock.advance(chrono::Duration::hours(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());

        mock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = Clock::default();
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
