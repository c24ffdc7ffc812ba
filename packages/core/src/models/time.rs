//! Time Provider Abstraction
//!
//! Every "now" read in the repository and the session binder goes through
//! [`TimeProvider`], so note timestamps and stale-tab sweeps can be tested
//! without sleeping.
//!
//! # Examples
//!
//! ```rust
//! use swiftnote_core::models::time::{ManualTimeProvider, TimeProvider};
//! use chrono::Duration;
//!
//! let clock = ManualTimeProvider::from_millis(1_000);
//! clock.advance(Duration::milliseconds(500));
//! assert_eq!(clock.now_millis(), 1_500);
//! ```

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;

/// Trait for providing current time
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Current time as milliseconds since the Unix epoch
    ///
    /// This is the unit stored in `createdAt`/`updatedAt` and embedded in tab ids.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// System time provider using actual system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock
///
/// Shared behind an `Arc` by the services under test; advancing it is
/// visible to every holder.
#[derive(Debug)]
pub struct ManualTimeProvider {
    current_time: Mutex<DateTime<Utc>>,
}

impl ManualTimeProvider {
    /// Create a manual clock starting at the current system time
    pub fn new() -> Self {
        Self::with_time(Utc::now())
    }

    /// Create a manual clock with a specific starting time
    pub fn with_time(time: DateTime<Utc>) -> Self {
        Self {
            current_time: Mutex::new(time),
        }
    }

    /// Create a manual clock from epoch milliseconds
    pub fn from_millis(millis: i64) -> Self {
        let time = Utc
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or_else(Utc::now);
        Self::with_time(time)
    }

    /// Set the current time to a specific value
    pub fn set_time(&self, time: DateTime<Utc>) {
        if let Ok(mut current) = self.current_time.lock() {
            *current = time;
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: chrono::Duration) {
        if let Ok(mut current) = self.current_time.lock() {
            *current += duration;
        }
    }
}

impl TimeProvider for ManualTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        self.current_time
            .lock()
            .map(|time| *time)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

impl Default for ManualTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}
