//! Weekly timetable auto-scheduler.
//!
//! Converts subject-teacher bindings into a day-by-day, slot-by-slot
//! timetable for one class.
//!
//! # Algorithm
//!
//! `DayAllocator` fills one day by uniform random choice among bindings
//! that still have quota and are under their daily cap, placing
//! practicals only where two consecutive working slots exist.
//! `WeekScheduler` runs it over the weekdays, carrying quotas forward,
//! and retries the whole week until every quota reaches zero or the
//! attempt budget runs out.
//!
//! The search is randomized and seeks any feasible timetable, not an
//! optimal one. Pass a seeded random source for reproducible results.
//!
//! # Summary
//!
//! `TimetableSummary` reports per-binding allocation, teacher load,
//! empty slots, and daily cap breaches of a finished week.

mod allocator;
mod config;
mod summary;
mod week;

pub use allocator::{DayAllocation, DayAllocator, DayInfeasible};
pub use config::{default_weekdays, CapPolicy, SchedulerConfig, DEFAULT_MAX_ATTEMPTS};
pub use summary::{CapBreach, SubjectAllocation, TimetableSummary};
pub use week::{ScheduleOutcome, WeekScheduler};
