//! Subject-teacher bindings.
//!
//! A binding says "this subject, taught by this teacher, as this lesson
//! type, needs `total` occurrences per week, at most `max` per day".
//!
//! # Slot units
//! Quotas are counted in slot units. A practical occupies two consecutive
//! slots, so its weekly quota and daily cap are twice the raw figures:
//!
//! | type | raw total | raw max | weekly quota | daily cap |
//! |------|-----------|---------|--------------|-----------|
//! | lecture | 6 | 2 | 6 | 2 |
//! | practical | 3 | 1 | 6 | 2 |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::{ValidationError, ValidationErrorKind};

/// Kind of lesson a binding schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    /// One slot.
    Lecture,
    /// Two consecutive slots, same subject and teacher.
    Practical,
}

impl LessonType {
    /// Slots one occurrence of this lesson occupies.
    #[inline]
    pub fn slot_units(self) -> u32 {
        match self {
            LessonType::Lecture => 1,
            LessonType::Practical => 2,
        }
    }

    /// Lowercase name as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            LessonType::Lecture => "lecture",
            LessonType::Practical => "practical",
        }
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lecture" => Ok(LessonType::Lecture),
            "practical" => Ok(LessonType::Practical),
            other => Err(ValidationError::new(
                ValidationErrorKind::InvalidLessonType,
                format!("Invalid lesson type '{other}', expected lecture or practical"),
            )),
        }
    }
}

/// A binding as entered by the user or stored by the persistence layer.
///
/// `total` and `max` are raw occurrence counts, not slot units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSpec {
    /// Subject identifier.
    #[serde(alias = "subject")]
    pub subject_id: String,
    /// Teacher identifier.
    #[serde(alias = "teacher")]
    pub teacher_id: String,
    /// Lecture or practical.
    #[serde(alias = "type")]
    pub lesson_type: LessonType,
    /// Occurrences per week.
    pub total: u32,
    /// Occurrences per day at most.
    pub max: u32,
}

impl BindingSpec {
    /// Creates a lecture binding.
    pub fn lecture(
        subject_id: impl Into<String>,
        teacher_id: impl Into<String>,
        total: u32,
        max: u32,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            teacher_id: teacher_id.into(),
            lesson_type: LessonType::Lecture,
            total,
            max,
        }
    }

    /// Creates a practical binding.
    pub fn practical(
        subject_id: impl Into<String>,
        teacher_id: impl Into<String>,
        total: u32,
        max: u32,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            teacher_id: teacher_id.into(),
            lesson_type: LessonType::Practical,
            total,
            max,
        }
    }

    /// Weekly demand in slot units.
    #[inline]
    pub fn weekly_slot_units(&self) -> u64 {
        u64::from(self.total) * u64::from(self.lesson_type.slot_units())
    }

    /// Weekly quota and daily cap in slot units, if both fit in `u32`.
    pub fn checked_slot_units(&self) -> Option<(u32, u32)> {
        let units = self.lesson_type.slot_units();
        Some((self.total.checked_mul(units)?, self.max.checked_mul(units)?))
    }
}

/// A binding with slot-unit quotas, as used by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Subject identifier.
    pub subject_id: String,
    /// Teacher identifier.
    pub teacher_id: String,
    /// Lecture or practical.
    pub lesson_type: LessonType,
    /// Slot units required per week.
    pub weekly_quota: u32,
    /// Slot units allowed per day.
    pub daily_cap: u32,
    /// Slot units still to place. `0 <= remaining_quota <= weekly_quota`.
    pub remaining_quota: u32,
}

impl Binding {
    /// Normalizes a raw binding into slot units.
    ///
    /// Counts too large for `u32` slot units saturate; validated bindings
    /// never reach that point.
    pub fn from_spec(spec: &BindingSpec) -> Self {
        let units = spec.lesson_type.slot_units();
        let weekly_quota = spec.total.saturating_mul(units);
        Self {
            subject_id: spec.subject_id.clone(),
            teacher_id: spec.teacher_id.clone(),
            lesson_type: spec.lesson_type,
            weekly_quota,
            daily_cap: spec.max.saturating_mul(units),
            remaining_quota: weekly_quota,
        }
    }

    /// A copy with the remaining quota reset to the weekly quota.
    pub fn fresh(&self) -> Self {
        Self {
            remaining_quota: self.weekly_quota,
            ..self.clone()
        }
    }

    /// Whether enough quota remains for one more occurrence.
    #[inline]
    pub fn can_place(&self) -> bool {
        self.remaining_quota >= self.lesson_type.slot_units()
    }

    /// Slot units placed so far.
    #[inline]
    pub fn allocated(&self) -> u32 {
        self.weekly_quota - self.remaining_quota
    }

    /// Whether this binding is for `subject_id` as `lesson_type`.
    pub fn matches(&self, subject_id: &str, lesson_type: LessonType) -> bool {
        self.subject_id == subject_id && self.lesson_type == lesson_type
    }
}

/// Normalizes raw bindings into slot-unit bindings. No side effects.
pub fn normalize(specs: &[BindingSpec]) -> Vec<Binding> {
    specs.iter().map(Binding::from_spec).collect()
}
