//! Timetable domain models.
//!
//! Provides the data types the scheduler consumes and produces.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | Input record |
//! |-------------|--------|--------------|
//! | SlotCalendar | Bell schedule | daily time slots |
//! | BindingSpec | Subject-teacher binding | `{subject, teacher, type, total, max}` |
//! | Binding | Binding in slot units | derived by `normalize` |
//! | WeeklySchedule | Class timetable | one day list per weekday |

mod binding;
mod calendar;
mod schedule;

pub use binding::{normalize, Binding, BindingSpec, LessonType};
pub use calendar::{SlotCalendar, TimeSlot};
pub(crate) use calendar::pair_fits;
pub use schedule::{DaySchedule, Lesson, LessonBlock, SlotAssignment, SlotContent, WeeklySchedule};
