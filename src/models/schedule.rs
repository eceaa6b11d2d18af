//! Timetable (solution) model.
//!
//! A weekly schedule maps each weekday to a day schedule. A day schedule
//! holds one assignment per calendar slot, in calendar order: breaks are
//! copied from the calendar, working slots carry a lesson or are left
//! empty when allocation ran out of quota.
//!
//! # Wire shape
//!
//! A slot serializes as `{slotId, time, isBreak, ...}`: breaks add
//! `breakType`, lessons add `subjectId`, `teacherId` and `lessonType`, and
//! an empty working slot carries nothing more. A week serializes as a map
//! from weekday to its slot list, keys in weekday order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Binding, LessonType, SlotCalendar, TimeSlot};

/// A lesson placed in a working slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    /// Subject identifier.
    pub subject_id: String,
    /// Teacher identifier.
    pub teacher_id: String,
    /// Lecture or practical.
    pub lesson_type: LessonType,
}

impl Lesson {
    /// Creates a lesson.
    pub fn new(
        subject_id: impl Into<String>,
        teacher_id: impl Into<String>,
        lesson_type: LessonType,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            teacher_id: teacher_id.into(),
            lesson_type,
        }
    }

    /// The lesson a binding produces.
    pub fn of(binding: &Binding) -> Self {
        Self::new(&binding.subject_id, &binding.teacher_id, binding.lesson_type)
    }
}

/// What occupies a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotContent {
    /// A break, copied verbatim from the calendar.
    Break {
        /// Break label.
        break_type: Option<String>,
    },
    /// A scheduled lesson.
    Lesson(Lesson),
    /// A working slot nothing was placed in.
    Empty,
}

/// One slot of a day schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SlotRecord", try_from = "SlotRecord")]
pub struct SlotAssignment {
    /// Calendar slot id.
    pub slot_id: String,
    /// Display time, copied from the calendar.
    pub time: String,
    /// Slot content.
    pub content: SlotContent,
}

/// Flat JSON form of a [`SlotAssignment`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotRecord {
    slot_id: String,
    time: String,
    is_break: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    break_type: Option<String>,
    #[serde(default, alias = "subject", skip_serializing_if = "Option::is_none")]
    subject_id: Option<String>,
    #[serde(default, alias = "teacher", skip_serializing_if = "Option::is_none")]
    teacher_id: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    lesson_type: Option<LessonType>,
}

impl From<SlotAssignment> for SlotRecord {
    fn from(slot: SlotAssignment) -> Self {
        let mut record = SlotRecord {
            slot_id: slot.slot_id,
            time: slot.time,
            ..Default::default()
        };
        match slot.content {
            SlotContent::Break { break_type } => {
                record.is_break = true;
                record.break_type = break_type;
            }
            SlotContent::Lesson(lesson) => {
                record.subject_id = Some(lesson.subject_id);
                record.teacher_id = Some(lesson.teacher_id);
                record.lesson_type = Some(lesson.lesson_type);
            }
            SlotContent::Empty => {}
        }
        record
    }
}

impl TryFrom<SlotRecord> for SlotAssignment {
    type Error = String;

    fn try_from(record: SlotRecord) -> Result<Self, Self::Error> {
        let content = if record.is_break {
            SlotContent::Break {
                break_type: record.break_type,
            }
        } else {
            match (record.subject_id, record.teacher_id, record.lesson_type) {
                (None, None, None) => SlotContent::Empty,
                // A partly filled slot is kept so day validation can report it.
                (subject_id, teacher_id, Some(lesson_type)) => SlotContent::Lesson(Lesson::new(
                    subject_id.unwrap_or_default(),
                    teacher_id.unwrap_or_default(),
                    lesson_type,
                )),
                (_, _, None) => {
                    return Err(format!("slot '{}' has a lesson without lessonType", record.slot_id))
                }
            }
        };
        Ok(Self {
            slot_id: record.slot_id,
            time: record.time,
            content,
        })
    }
}

impl SlotAssignment {
    /// A break assignment for a calendar slot.
    pub fn break_of(slot: &TimeSlot) -> Self {
        Self {
            slot_id: slot.id.clone(),
            time: slot.time.clone(),
            content: SlotContent::Break {
                break_type: slot.break_type.clone(),
            },
        }
    }

    /// A lesson assignment for a calendar slot.
    pub fn lesson(slot: &TimeSlot, lesson: Lesson) -> Self {
        Self {
            slot_id: slot.id.clone(),
            time: slot.time.clone(),
            content: SlotContent::Lesson(lesson),
        }
    }

    /// An empty working slot.
    pub fn empty(slot: &TimeSlot) -> Self {
        Self {
            slot_id: slot.id.clone(),
            time: slot.time.clone(),
            content: SlotContent::Empty,
        }
    }

    /// Whether this slot is a break.
    pub fn is_break(&self) -> bool {
        matches!(self.content, SlotContent::Break { .. })
    }

    /// The lesson in this slot, if any.
    pub fn as_lesson(&self) -> Option<&Lesson> {
        match &self.content {
            SlotContent::Lesson(lesson) => Some(lesson),
            _ => None,
        }
    }
}

/// A run of slots shown as one cell: a practical pair collapses to one
/// block spanning two slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonBlock<'a> {
    /// The first slot of the block.
    pub first: &'a SlotAssignment,
    /// Number of slots covered.
    pub span: usize,
}

/// The schedule of one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Weekday name.
    pub day: String,
    /// One assignment per calendar slot, in calendar order.
    pub slots: Vec<SlotAssignment>,
}

impl DaySchedule {
    /// Creates a day schedule.
    pub fn new(day: impl Into<String>, slots: Vec<SlotAssignment>) -> Self {
        Self {
            day: day.into(),
            slots,
        }
    }

    /// A day where every working slot is empty.
    pub fn blank(day: impl Into<String>, calendar: &SlotCalendar) -> Self {
        let slots = calendar
            .slots()
            .iter()
            .map(|s| {
                if s.is_break {
                    SlotAssignment::break_of(s)
                } else {
                    SlotAssignment::empty(s)
                }
            })
            .collect();
        Self::new(day, slots)
    }

    /// Placed lessons in calendar order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> + '_ {
        self.slots.iter().filter_map(SlotAssignment::as_lesson)
    }

    /// Working slots left empty.
    pub fn unallocated_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s.content, SlotContent::Empty))
            .count()
    }

    /// Slot units placed for a subject as a lesson type.
    pub fn units_for(&self, subject_id: &str, lesson_type: LessonType) -> u32 {
        self.lessons()
            .filter(|l| l.subject_id == subject_id && l.lesson_type == lesson_type)
            .count() as u32
    }

    /// Slots grouped for display.
    ///
    /// Two adjacent practical slots with the same subject and teacher form
    /// one block of span 2. Everything else is a block of span 1.
    pub fn blocks(&self) -> Vec<LessonBlock<'_>> {
        let mut blocks = Vec::with_capacity(self.slots.len());
        let mut i = 0;
        while i < self.slots.len() {
            let current = &self.slots[i];
            let paired = match (current.as_lesson(), self.slots.get(i + 1).and_then(|s| s.as_lesson())) {
                (Some(a), Some(b)) => a.lesson_type == LessonType::Practical && a == b,
                _ => false,
            };
            let span = if paired { 2 } else { 1 };
            blocks.push(LessonBlock {
                first: current,
                span,
            });
            i += span;
        }
        blocks
    }
}

/// A full week: weekday → day schedule, in weekday order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: Vec<DaySchedule>,
}

impl WeeklySchedule {
    /// Creates an empty weekly schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a day.
    pub fn insert(&mut self, day: DaySchedule) {
        match self.days.iter_mut().find(|d| d.day == day.day) {
            Some(existing) => *existing = day,
            None => self.days.push(day),
        }
    }

    /// Schedule of one weekday.
    pub fn day(&self, day: &str) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Days in weekday order.
    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no day has been added.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Slot units placed across the week for a subject as a lesson type.
    pub fn units_for(&self, subject_id: &str, lesson_type: LessonType) -> u32 {
        self.days
            .iter()
            .map(|d| d.units_for(subject_id, lesson_type))
            .sum()
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            map.serialize_entry(&day.day, &day.slots)?;
        }
        map.end()
    }
}

struct WeekVisitor;

impl<'de> Visitor<'de> for WeekVisitor {
    type Value = WeeklySchedule;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from weekday to slot list")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut week = WeeklySchedule::new();
        while let Some((day, slots)) = access.next_entry::<String, Vec<SlotAssignment>>()? {
            week.insert(DaySchedule::new(day, slots));
        }
        Ok(week)
    }
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WeekVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_day() -> DaySchedule {
        let cal = SlotCalendar::reference();
        let slots = cal.slots();
        let physics = Lesson::new("Physics", "T2", LessonType::Practical);
        let math = Lesson::new("Math", "T1", LessonType::Lecture);
        DaySchedule::new(
            "Monday",
            vec![
                SlotAssignment::lesson(&slots[0], physics.clone()),
                SlotAssignment::lesson(&slots[1], physics),
                SlotAssignment::lesson(&slots[2], math.clone()),
                SlotAssignment::break_of(&slots[3]),
                SlotAssignment::lesson(&slots[4], math),
                SlotAssignment::empty(&slots[5]),
                SlotAssignment::break_of(&slots[6]),
                SlotAssignment::empty(&slots[7]),
                SlotAssignment::empty(&slots[8]),
            ],
        )
    }

    #[test]
    fn test_day_counts() {
        let day = sample_day();
        assert_eq!(day.lessons().count(), 4);
        assert_eq!(day.unallocated_count(), 3);
        assert_eq!(day.units_for("Physics", LessonType::Practical), 2);
        assert_eq!(day.units_for("Math", LessonType::Lecture), 2);
        assert_eq!(day.units_for("Math", LessonType::Practical), 0);
    }

    #[test]
    fn test_blocks_merge_practicals() {
        let day = sample_day();
        let blocks = day.blocks();
        assert_eq!(blocks.len(), 8);
        assert_eq!(blocks[0].span, 2);
        assert_eq!(blocks[0].first.slot_id, "1");
        assert_eq!(blocks[1].first.slot_id, "3");
        assert!(blocks[1..].iter().all(|b| b.span == 1));
    }

    #[test]
    fn test_blank_day() {
        let day = DaySchedule::blank("Friday", &SlotCalendar::reference());
        assert_eq!(day.slots.len(), 9);
        assert_eq!(day.unallocated_count(), 7);
        assert!(day.slots[3].is_break());
    }

    #[test]
    fn test_weekly_insert_replaces() {
        let mut week = WeeklySchedule::new();
        week.insert(sample_day());
        week.insert(DaySchedule::blank("Tuesday", &SlotCalendar::reference()));
        week.insert(DaySchedule::blank("Monday", &SlotCalendar::reference()));
        assert_eq!(week.len(), 2);
        assert_eq!(week.days()[0].day, "Monday");
        assert_eq!(week.day("Monday").unwrap().unallocated_count(), 7);
        assert!(week.day("Sunday").is_none());
    }

    #[test]
    fn test_assignment_json_shape() {
        let day = sample_day();
        let value = serde_json::to_value(&day.slots[0]).unwrap();
        assert_eq!(value["isBreak"], false);
        assert_eq!(value["subjectId"], "Physics");
        assert_eq!(value["teacherId"], "T2");
        assert_eq!(value["lessonType"], "practical");
        assert!(value.get("breakType").is_none());

        let value = serde_json::to_value(&day.slots[3]).unwrap();
        assert_eq!(value["isBreak"], true);
        assert_eq!(value["breakType"], "Long Break");
        assert_eq!(value["time"], "1:15 PM - 1:45 PM");
        assert!(value.get("subjectId").is_none());

        let value = serde_json::to_value(&day.slots[5]).unwrap();
        assert_eq!(value["isBreak"], false);
        assert!(value.get("subjectId").is_none());

        let back: DaySchedule =
            serde_json::from_str(&serde_json::to_string(&day).unwrap()).unwrap();
        assert_eq!(back, day);
    }

    #[test]
    fn test_assignment_reads_original_fields() {
        let json = r#"{"slotId": "1", "time": "08:00", "isBreak": false,
                       "subject": "Math", "teacher": "T1", "type": "lecture"}"#;
        let slot: SlotAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(slot.as_lesson(), Some(&Lesson::new("Math", "T1", LessonType::Lecture)));

        let json = r#"{"slotId": "1", "time": "08:00", "isBreak": false, "lessonType": "lecture"}"#;
        let slot: SlotAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(slot.as_lesson().unwrap().subject_id, "");

        let json = r#"{"slotId": "1", "time": "08:00", "isBreak": false, "subjectId": "Math"}"#;
        assert!(serde_json::from_str::<SlotAssignment>(json).is_err());
    }

    #[test]
    fn test_week_json_is_weekday_map() {
        let mut week = WeeklySchedule::new();
        week.insert(DaySchedule::blank("Tuesday", &SlotCalendar::reference()));
        week.insert(sample_day());

        let json = serde_json::to_string(&week).unwrap();
        assert!(json.starts_with(r#"{"Tuesday":["#));
        assert!(json.find("Tuesday").unwrap() < json.find("Monday").unwrap());

        let value = serde_json::to_value(&week).unwrap();
        assert_eq!(value["Monday"].as_array().unwrap().len(), 9);
        assert_eq!(value["Monday"][3]["isBreak"], true);

        let back: WeeklySchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, week);
        assert_eq!(back.days()[0].day, "Tuesday");
    }
}
