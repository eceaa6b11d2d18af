//! Weekly class timetable scheduling.
//!
//! Turns subject-teacher bindings (weekly lesson quotas with per-day caps)
//! into a concrete timetable: for each weekday, one entry per slot of the
//! daily calendar, with practicals on two consecutive working slots.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `SlotCalendar`, `TimeSlot`, `BindingSpec`,
//!   `Binding`, `DaySchedule`, `WeeklySchedule`
//! - **`validation`**: Binding shape, weekly totals, duplicate bindings, and
//!   hand-edited day checks
//! - **`scheduler`**: `DayAllocator`, `WeekScheduler`, `TimetableSummary`
//! - **`store`**: Idempotent per-day persistence boundary
//!
//! # Example
//!
//! ```
//! use u_timetable::models::BindingSpec;
//! use u_timetable::scheduler::{SchedulerConfig, WeekScheduler};
//! use u_timetable::TimetableError;
//!
//! // 40 slot units for a 42-slot week: rejected before scheduling.
//! let bindings = vec![
//!     BindingSpec::lecture("Math", "T1", 20, 4),
//!     BindingSpec::practical("Physics", "T2", 10, 2),
//! ];
//! let scheduler = WeekScheduler::new(SchedulerConfig::default());
//! assert!(matches!(
//!     scheduler.run(&bindings),
//!     Err(TimetableError::QuotaMismatch(_))
//! ));
//! ```

pub mod error;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use error::TimetableError;
