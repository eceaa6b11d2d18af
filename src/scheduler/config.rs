//! Scheduler configuration.
//!
//! The week shape (weekday names and the daily slot calendar) is passed
//! in rather than hard-coded, so the same algorithm schedules a 6×7 week
//! or any other calendar.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::error::TimetableError;
use crate::models::SlotCalendar;

/// Default retry budget for whole-week attempts.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// What the allocator does when no binding is under its daily cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapPolicy {
    /// Ignore daily caps and pick among all bindings with quota left.
    /// Every such pick is counted in the outcome.
    #[default]
    Lenient,
    /// Abandon the day; the week is retried.
    Strict,
}

/// Configuration of a scheduling run.
///
/// # Example
///
/// ```
/// use u_timetable::scheduler::{CapPolicy, SchedulerConfig};
///
/// let config = SchedulerConfig::default()
///     .with_seed(7)
///     .with_cap_policy(CapPolicy::Strict);
/// assert_eq!(config.required_weekly_slots(), 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Weekday names in scheduling order.
    pub weekdays: Vec<String>,
    /// The slot calendar every weekday uses.
    pub daily_slots: SlotCalendar,
    /// Whole-week attempts before giving up.
    pub max_attempts: usize,
    /// Daily cap relaxation policy.
    pub cap_policy: CapPolicy,
    /// Seed for the random source. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Wall-clock budget for all attempts (ms). `None` = unbounded.
    pub time_budget_ms: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            weekdays: default_weekdays(),
            daily_slots: SlotCalendar::reference(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cap_policy: CapPolicy::Lenient,
            seed: None,
            time_budget_ms: None,
        }
    }
}

/// Monday through Saturday.
pub fn default_weekdays() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

impl SchedulerConfig {
    /// Sets the weekdays.
    pub fn with_weekdays<I, S>(mut self, weekdays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.weekdays = weekdays.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the daily slot calendar.
    pub fn with_daily_slots(mut self, calendar: SlotCalendar) -> Self {
        self.daily_slots = calendar;
        self
    }

    /// Sets the retry budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the cap relaxation policy.
    pub fn with_cap_policy(mut self, policy: CapPolicy) -> Self {
        self.cap_policy = policy;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(budget.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Working slots in the whole week.
    pub fn required_weekly_slots(&self) -> u64 {
        (self.weekdays.len() * self.daily_slots.working_slot_count()) as u64
    }

    /// Checks that the configuration describes a usable week.
    pub fn validate(&self) -> Result<(), TimetableError> {
        if self.weekdays.is_empty() {
            return Err(TimetableError::InvalidConfig("no weekdays configured".into()));
        }
        let mut days = HashSet::new();
        for day in &self.weekdays {
            if !days.insert(day.as_str()) {
                return Err(TimetableError::InvalidConfig(format!(
                    "duplicate weekday '{day}'"
                )));
            }
        }
        if self.daily_slots.working_slot_count() == 0 {
            return Err(TimetableError::InvalidConfig(
                "daily calendar has no working slots".into(),
            ));
        }
        let mut ids = HashSet::new();
        for slot in self.daily_slots.slots() {
            if !ids.insert(slot.id.as_str()) {
                return Err(TimetableError::InvalidConfig(format!(
                    "duplicate slot id '{}'",
                    slot.id
                )));
            }
        }
        if self.max_attempts == 0 {
            return Err(TimetableError::InvalidConfig(
                "max attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
