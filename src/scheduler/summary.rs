//! Timetable allocation report.
//!
//! Compares a weekly schedule against the bindings it was built from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Subject allocation | Slot units placed vs. weekly quota, per binding |
//! | Teacher load | Slots taught across the week, per teacher |
//! | Unallocated slots | Empty working slots, per day |
//! | Daily cap breaches | Days where a binding exceeds its daily cap |

use std::collections::BTreeMap;

use crate::models::{Binding, LessonType, WeeklySchedule};

/// Weekly allocation of one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAllocation {
    /// Subject identifier.
    pub subject_id: String,
    /// Lecture or practical.
    pub lesson_type: LessonType,
    /// Required slot units.
    pub weekly_quota: u32,
    /// Placed slot units.
    pub allocated: u32,
}

/// A day on which a binding went over its daily cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapBreach {
    /// Weekday.
    pub day: String,
    /// Subject identifier.
    pub subject_id: String,
    /// Lecture or practical.
    pub lesson_type: LessonType,
    /// Slot units placed that day.
    pub allocated: u32,
    /// Daily cap in slot units.
    pub daily_cap: u32,
}

/// Allocation report for a weekly schedule.
#[derive(Debug, Clone)]
pub struct TimetableSummary {
    /// One entry per binding, in binding order.
    pub subjects: Vec<SubjectAllocation>,
    /// Slots taught per teacher.
    pub teacher_load: BTreeMap<String, u32>,
    /// `(day, empty working slots)` for days with gaps.
    pub unallocated: Vec<(String, usize)>,
    cap_breaches: Vec<CapBreach>,
}

impl TimetableSummary {
    /// Computes the report.
    ///
    /// # Arguments
    /// * `schedule` - The weekly schedule.
    /// * `bindings` - The bindings it was built from (for quotas and caps).
    pub fn calculate(schedule: &WeeklySchedule, bindings: &[Binding]) -> Self {
        let subjects = bindings
            .iter()
            .map(|b| SubjectAllocation {
                subject_id: b.subject_id.clone(),
                lesson_type: b.lesson_type,
                weekly_quota: b.weekly_quota,
                allocated: schedule.units_for(&b.subject_id, b.lesson_type),
            })
            .collect();

        let mut teacher_load: BTreeMap<String, u32> = BTreeMap::new();
        for lesson in schedule.days().iter().flat_map(|d| d.lessons()) {
            *teacher_load.entry(lesson.teacher_id.clone()).or_insert(0) += 1;
        }

        let unallocated = schedule
            .days()
            .iter()
            .map(|d| (d.day.clone(), d.unallocated_count()))
            .filter(|(_, n)| *n > 0)
            .collect();

        let mut cap_breaches = Vec::new();
        for day in schedule.days() {
            for b in bindings {
                let allocated = day.units_for(&b.subject_id, b.lesson_type);
                if allocated > b.daily_cap {
                    cap_breaches.push(CapBreach {
                        day: day.day.clone(),
                        subject_id: b.subject_id.clone(),
                        lesson_type: b.lesson_type,
                        allocated,
                        daily_cap: b.daily_cap,
                    });
                }
            }
        }

        Self {
            subjects,
            teacher_load,
            unallocated,
            cap_breaches,
        }
    }

    /// Days where a binding exceeded its daily cap.
    pub fn daily_cap_breaches(&self) -> &[CapBreach] {
        &self.cap_breaches
    }

    /// Every quota met and no working slot left empty.
    pub fn is_complete(&self) -> bool {
        self.unallocated.is_empty()
            && self.subjects.iter().all(|s| s.allocated == s.weekly_quota)
    }
}
