//! Input validation for timetable scheduling.
//!
//! Checks bindings before the scheduler runs and day timetables that were
//! edited by hand. Detects:
//! - Malformed bindings (missing subject/teacher, zero or oversized total/max)
//! - Duplicate bindings for the same subject and lesson type
//! - A weekly demand that does not match the number of working slots
//! - Hand-edited days that break the structural rules the auto-scheduler
//!   follows (practical pairs, breaks, daily caps)

use std::collections::{HashMap, HashSet};

use crate::models::{
    pair_fits, BindingSpec, DaySchedule, LessonType, SlotCalendar, SlotContent,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No bindings were given.
    EmptyBindings,
    /// A binding or slot lacks subject or teacher.
    MissingField,
    /// A binding's weekly total is zero.
    NonPositiveTotal,
    /// A binding's daily max is zero.
    NonPositiveMax,
    /// A binding's counts do not fit in slot units.
    QuotaOverflow,
    /// Lesson type is neither lecture nor practical.
    InvalidLessonType,
    /// Two bindings share subject and lesson type.
    DuplicateBinding,
    /// Day name is not one of the configured weekdays.
    InvalidDay,
    /// A day timetable has no slots.
    EmptySlots,
    /// A day timetable does not have one entry per calendar slot.
    SlotCountMismatch,
    /// A break is missing, misplaced, or covers a working slot.
    BreakMismatch,
    /// A working slot has no lesson.
    MissingLesson,
    /// A lesson has no matching binding.
    UnknownBinding,
    /// A practical is not placed on two consecutive working slots.
    PracticalPlacement,
    /// A subject exceeds its daily maximum.
    DailyCapExceeded,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The weekly demand of a binding set does not match the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Total allocated hours must be exactly {required}, got {actual}")]
pub struct QuotaMismatch {
    /// Working slots in the week.
    pub required: u64,
    /// Slot units demanded by the bindings.
    pub actual: u64,
}

/// Checks the shape of a single binding.
pub fn validate_binding_shape(spec: &BindingSpec) -> Result<(), ValidationError> {
    if spec.subject_id.trim().is_empty() || spec.teacher_id.trim().is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::MissingField,
            "Each binding must have subject, teacher, and type",
        ));
    }
    if spec.total == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::NonPositiveTotal,
            format!("Invalid total slots for subject '{}'", spec.subject_id),
        ));
    }
    if spec.max == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::NonPositiveMax,
            format!("Invalid max daily slots for subject '{}'", spec.subject_id),
        ));
    }
    if spec.checked_slot_units().is_none() {
        return Err(ValidationError::new(
            ValidationErrorKind::QuotaOverflow,
            format!(
                "Slot counts for subject '{}' are too large (total {}, max {})",
                spec.subject_id, spec.total, spec.max
            ),
        ));
    }
    Ok(())
}

/// Checks that the bindings demand exactly `required` slot units per week.
///
/// `required` is the number of working slots in the week (42 for six days
/// of seven teaching slots). The scheduler never corrects an imbalance.
pub fn validate_totals(specs: &[BindingSpec], required: u64) -> Result<(), QuotaMismatch> {
    let actual = specs
        .iter()
        .map(BindingSpec::weekly_slot_units)
        .fold(0u64, u64::saturating_add);
    if actual == required {
        Ok(())
    } else {
        Err(QuotaMismatch { required, actual })
    }
}

/// Validates a binding set.
///
/// Checks:
/// 1. At least one binding
/// 2. Every binding is well formed
/// 3. At most one binding per subject and lesson type
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_bindings(specs: &[BindingSpec]) -> ValidationResult {
    let mut errors = Vec::new();

    if specs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyBindings,
            "Invalid bindings: none given",
        ));
    }

    let mut seen = HashSet::new();
    for spec in specs {
        if let Err(e) = validate_binding_shape(spec) {
            errors.push(e);
        }
        if !seen.insert((spec.subject_id.as_str(), spec.lesson_type)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateBinding,
                format!(
                    "Subject '{}' already has a {} binding",
                    spec.subject_id, spec.lesson_type
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a hand-edited day against the rules the auto-scheduler keeps.
///
/// Checks:
/// 1. The day is one of `weekdays`
/// 2. There is one assignment per calendar slot
/// 3. Breaks sit exactly where the calendar has them
/// 4. Every working slot has a lesson with subject and teacher
/// 5. Every lesson matches a binding (subject, teacher, lesson type)
/// 6. Practicals occupy two consecutive working slots and never start on
///    the last slot or right before a break
/// 7. No subject exceeds its daily maximum
pub fn validate_day_timetable(
    day: &DaySchedule,
    calendar: &SlotCalendar,
    weekdays: &[String],
    bindings: &[BindingSpec],
) -> ValidationResult {
    let mut errors = Vec::new();

    if !weekdays.iter().any(|d| *d == day.day) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDay,
            format!("Invalid day '{}'", day.day),
        ));
    }

    if day.slots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptySlots,
            "No slots provided",
        ));
        return Err(errors);
    }

    if day.slots.len() != calendar.len() {
        errors.push(ValidationError::new(
            ValidationErrorKind::SlotCountMismatch,
            format!(
                "Expected {} slots for {}, got {}",
                calendar.len(),
                day.day,
                day.slots.len()
            ),
        ));
        return Err(errors);
    }

    // Structural pass: breaks and missing lessons.
    for (slot, assignment) in calendar.slots().iter().zip(&day.slots) {
        match (&assignment.content, slot.is_break) {
            (SlotContent::Break { .. }, true) => {}
            (SlotContent::Break { .. }, false) | (_, true) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::BreakMismatch,
                    format!("Slot {} does not match the calendar break layout", slot.time),
                ));
            }
            (SlotContent::Empty, false) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingLesson,
                    format!("Slot {} must have subject, teacher, and type", slot.time),
                ));
            }
            (SlotContent::Lesson(lesson), false) => {
                if lesson.subject_id.trim().is_empty() || lesson.teacher_id.trim().is_empty() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MissingField,
                        format!("Slot {} must have subject, teacher, and type", slot.time),
                    ));
                } else if !bindings.iter().any(|b| {
                    b.subject_id == lesson.subject_id
                        && b.teacher_id == lesson.teacher_id
                        && b.lesson_type == lesson.lesson_type
                }) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownBinding,
                        format!(
                            "No {} binding for subject '{}' with teacher '{}'",
                            lesson.lesson_type, lesson.subject_id, lesson.teacher_id
                        ),
                    ));
                }
            }
        }
    }

    // Practical pairing over working slots.
    let positions = calendar.working_positions();
    let mut i = 0;
    while i < positions.len() {
        let Some(lesson) = day.slots[positions[i]].as_lesson() else {
            i += 1;
            continue;
        };
        if lesson.lesson_type != LessonType::Practical {
            i += 1;
            continue;
        }
        let time = &day.slots[positions[i]].time;
        if !pair_fits(&positions, i) {
            let message = if i + 1 >= positions.len() {
                format!("Practical cannot be assigned in the last hour ({time})")
            } else {
                format!("Practical cannot be assigned before break ({time})")
            };
            errors.push(ValidationError::new(
                ValidationErrorKind::PracticalPlacement,
                message,
            ));
            i += 1;
            continue;
        }
        if day.slots[positions[i + 1]].as_lesson() != Some(lesson) {
            errors.push(ValidationError::new(
                ValidationErrorKind::PracticalPlacement,
                format!("Practical at {time} must span two consecutive slots"),
            ));
            i += 1;
            continue;
        }
        i += 2;
    }

    // Daily caps, in slot units.
    let mut used: HashMap<(&str, LessonType), u32> = HashMap::new();
    for lesson in day.lessons() {
        *used
            .entry((lesson.subject_id.as_str(), lesson.lesson_type))
            .or_insert(0) += 1;
    }
    let mut over: Vec<_> = used
        .into_iter()
        .filter_map(|((subject, lesson_type), units)| {
            bindings
                .iter()
                .find(|b| b.subject_id == subject && b.lesson_type == lesson_type)
                .map(|b| b.max * lesson_type.slot_units())
                .filter(|&cap| units > cap)
                .map(|cap| (subject, lesson_type, units, cap))
        })
        .collect();
    over.sort();
    for (subject, lesson_type, units, cap) in over {
        errors.push(ValidationError::new(
            ValidationErrorKind::DailyCapExceeded,
            format!(
                "Subject '{subject}' ({lesson_type}) exceeds daily slot limit: {units} > {cap}"
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lesson, SlotAssignment};

    fn reference_bindings() -> Vec<BindingSpec> {
        vec![
            BindingSpec::lecture("Math", "T1", 6, 2),
            BindingSpec::practical("Physics", "T2", 3, 1),
            BindingSpec::lecture("Chem", "T3", 6, 2),
            BindingSpec::practical("Bio", "T4", 3, 1),
            BindingSpec::lecture("English", "T5", 6, 2),
            BindingSpec::lecture("History", "T6", 6, 2),
            BindingSpec::lecture("Art", "T7", 6, 2),
        ]
    }

    fn weekdays() -> Vec<String> {
        ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"]
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    /// Builds a reference-calendar day from the 7 working-slot lessons.
    fn day_of(lessons: [Option<Lesson>; 7]) -> DaySchedule {
        let cal = SlotCalendar::reference();
        let mut lessons = lessons.into_iter();
        let slots = cal
            .slots()
            .iter()
            .map(|s| {
                if s.is_break {
                    SlotAssignment::break_of(s)
                } else {
                    match lessons.next().flatten() {
                        Some(l) => SlotAssignment::lesson(s, l),
                        None => SlotAssignment::empty(s),
                    }
                }
            })
            .collect();
        DaySchedule::new("Monday", slots)
    }

    fn lec(subject: &str, teacher: &str) -> Option<Lesson> {
        Some(Lesson::new(subject, teacher, LessonType::Lecture))
    }

    fn prac(subject: &str, teacher: &str) -> Option<Lesson> {
        Some(Lesson::new(subject, teacher, LessonType::Practical))
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_totals_exact() {
        assert!(validate_totals(&reference_bindings(), 42).is_ok());
    }

    #[test]
    fn test_totals_short() {
        let mut specs = reference_bindings();
        specs[0].total = 4; // 40 in total
        let err = validate_totals(&specs, 42).unwrap_err();
        assert_eq!(err, QuotaMismatch { required: 42, actual: 40 });
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_totals_over() {
        let mut specs = reference_bindings();
        specs.push(BindingSpec::lecture("Music", "T8", 1, 1));
        assert!(validate_totals(&specs, 42).is_err());
    }

    #[test]
    fn test_totals_weight_practicals() {
        let specs = vec![BindingSpec::practical("Lab", "T1", 21, 4)];
        assert!(validate_totals(&specs, 42).is_ok());
        assert!(validate_totals(&specs, 21).is_err());
    }

    #[test]
    fn test_shape_ok() {
        assert!(validate_binding_shape(&BindingSpec::lecture("Math", "T1", 1, 1)).is_ok());
    }

    #[test]
    fn test_shape_missing_teacher() {
        let err = validate_binding_shape(&BindingSpec::lecture("Math", " ", 1, 1)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
    }

    #[test]
    fn test_shape_zero_total_and_max() {
        let err = validate_binding_shape(&BindingSpec::lecture("Math", "T1", 0, 1)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NonPositiveTotal);
        let err = validate_binding_shape(&BindingSpec::lecture("Math", "T1", 1, 0)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NonPositiveMax);
    }

    #[test]
    fn test_shape_rejects_oversized_counts() {
        let huge = BindingSpec::practical("Lab", "T1", 3_000_000_000, 1);
        let err = validate_binding_shape(&huge).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::QuotaOverflow);

        let huge_max = BindingSpec::practical("Lab", "T1", 1, u32::MAX);
        let err = validate_binding_shape(&huge_max).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::QuotaOverflow);

        // Lectures take one unit, so any count fits.
        assert!(validate_binding_shape(&BindingSpec::lecture("Math", "T1", u32::MAX, 1)).is_ok());
    }

    #[test]
    fn test_totals_do_not_wrap() {
        // 2^31 + 21 practicals would wrap to 42 units in u32.
        let specs = vec![BindingSpec::practical("Lab", "T1", (1 << 31) + 21, 4)];
        let err = validate_totals(&specs, 42).unwrap_err();
        assert_eq!(err.actual, (1u64 << 32) + 42);
    }

    #[test]
    fn test_bindings_empty() {
        assert_eq!(kinds(validate_bindings(&[])), vec![ValidationErrorKind::EmptyBindings]);
    }

    #[test]
    fn test_bindings_duplicate() {
        let specs = vec![
            BindingSpec::lecture("Math", "T1", 3, 1),
            BindingSpec::lecture("Math", "T2", 3, 1),
            BindingSpec::practical("Math", "T1", 3, 1),
        ];
        assert_eq!(kinds(validate_bindings(&specs)), vec![ValidationErrorKind::DuplicateBinding]);
    }

    #[test]
    fn test_bindings_multiple_errors() {
        let specs = vec![
            BindingSpec::lecture("", "T1", 3, 1),
            BindingSpec::lecture("Math", "T2", 0, 1),
        ];
        let errors = validate_bindings(&specs).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_valid_day() {
        let day = day_of([
            prac("Physics", "T2"),
            prac("Physics", "T2"),
            lec("Math", "T1"),
            lec("Math", "T1"),
            lec("Chem", "T3"),
            lec("English", "T5"),
            lec("Art", "T7"),
        ]);
        let result = validate_day_timetable(
            &day,
            &SlotCalendar::reference(),
            &weekdays(),
            &reference_bindings(),
        );
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn test_invalid_day_name() {
        let mut day = day_of([
            lec("Math", "T1"),
            lec("Chem", "T3"),
            lec("English", "T5"),
            lec("Art", "T7"),
            lec("History", "T6"),
            lec("Math", "T1"),
            lec("Chem", "T3"),
        ]);
        day.day = "Sunday".into();
        let result = validate_day_timetable(
            &day,
            &SlotCalendar::reference(),
            &weekdays(),
            &reference_bindings(),
        );
        assert_eq!(kinds(result), vec![ValidationErrorKind::InvalidDay]);
    }

    #[test]
    fn test_empty_and_short_days() {
        let cal = SlotCalendar::reference();
        let empty = DaySchedule::new("Monday", vec![]);
        let result = validate_day_timetable(&empty, &cal, &weekdays(), &reference_bindings());
        assert_eq!(kinds(result), vec![ValidationErrorKind::EmptySlots]);

        let short = DaySchedule::new(
            "Monday",
            vec![SlotAssignment::lesson(&cal.slots()[0], Lesson::new("Math", "T1", LessonType::Lecture))],
        );
        let result = validate_day_timetable(&short, &cal, &weekdays(), &reference_bindings());
        assert_eq!(kinds(result), vec![ValidationErrorKind::SlotCountMismatch]);
    }

    #[test]
    fn test_missing_lesson() {
        let day = day_of([
            lec("Math", "T1"),
            None,
            lec("English", "T5"),
            lec("Art", "T7"),
            lec("History", "T6"),
            lec("Math", "T1"),
            lec("Chem", "T3"),
        ]);
        let result = validate_day_timetable(
            &day,
            &SlotCalendar::reference(),
            &weekdays(),
            &reference_bindings(),
        );
        assert_eq!(kinds(result), vec![ValidationErrorKind::MissingLesson]);
    }

    #[test]
    fn test_break_overwritten() {
        let cal = SlotCalendar::reference();
        let mut day = DaySchedule::blank("Monday", &cal);
        for (slot, assignment) in cal.slots().iter().zip(day.slots.iter_mut()) {
            *assignment = SlotAssignment::lesson(slot, Lesson::new("Math", "T1", LessonType::Lecture));
        }
        let result = validate_day_timetable(&day, &cal, &weekdays(), &reference_bindings());
        let kinds = kinds(result);
        assert_eq!(
            kinds.iter().filter(|k| **k == ValidationErrorKind::BreakMismatch).count(),
            2
        );
    }

    #[test]
    fn test_practical_before_break() {
        let day = day_of([
            lec("Math", "T1"),
            lec("Chem", "T3"),
            prac("Physics", "T2"),
            prac("Physics", "T2"),
            lec("History", "T6"),
            lec("English", "T5"),
            lec("Art", "T7"),
        ]);
        let result = validate_day_timetable(
            &day,
            &SlotCalendar::reference(),
            &weekdays(),
            &reference_bindings(),
        );
        let errors = result.unwrap_err();
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::PracticalPlacement));
        assert!(errors[0].message.contains("before break"));
    }

    #[test]
    fn test_practical_last_hour() {
        let day = day_of([
            lec("Math", "T1"),
            lec("Chem", "T3"),
            lec("English", "T5"),
            lec("History", "T6"),
            lec("Art", "T7"),
            lec("Math", "T1"),
            prac("Physics", "T2"),
        ]);
        let errors = validate_day_timetable(
            &day,
            &SlotCalendar::reference(),
            &weekdays(),
            &reference_bindings(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("last hour"));
    }

    #[test]
    fn test_practical_half_pair() {
        let day = day_of([
            prac("Physics", "T2"),
            lec("Math", "T1"),
            lec("Chem", "T3"),
            lec("English", "T5"),
            lec("History", "T6"),
            lec("Art", "T7"),
            lec("Math", "T1"),
        ]);
        let result = validate_day_timetable(
            &day,
            &SlotCalendar::reference(),
            &weekdays(),
            &reference_bindings(),
        );
        assert_eq!(kinds(result), vec![ValidationErrorKind::PracticalPlacement]);
    }

    #[test]
    fn test_daily_cap_exceeded() {
        let day = day_of([
            lec("Math", "T1"),
            lec("Math", "T1"),
            lec("Math", "T1"),
            lec("English", "T5"),
            lec("History", "T6"),
            lec("Art", "T7"),
            lec("Chem", "T3"),
        ]);
        let errors = validate_day_timetable(
            &day,
            &SlotCalendar::reference(),
            &weekdays(),
            &reference_bindings(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DailyCapExceeded);
        assert!(errors[0].message.contains("Math"));
    }

    #[test]
    fn test_unknown_binding() {
        let day = day_of([
            lec("Math", "T9"),
            lec("Chem", "T3"),
            lec("English", "T5"),
            lec("History", "T6"),
            lec("Art", "T7"),
            lec("Math", "T1"),
            lec("Chem", "T3"),
        ]);
        let result = validate_day_timetable(
            &day,
            &SlotCalendar::reference(),
            &weekdays(),
            &reference_bindings(),
        );
        assert_eq!(kinds(result), vec![ValidationErrorKind::UnknownBinding]);
    }
}
