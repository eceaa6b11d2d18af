//! Daily slot calendar.
//!
//! A day is an ordered list of time slots. Each slot is either a working
//! slot (can host a lesson) or a break. The order of the list is the
//! chronological order of the day and adjacency checks rely on it.
//!
//! # Adjacency
//! Two working slots are *consecutive* iff they sit next to each other in
//! the full day sequence, with no break in between. A practical needs two
//! consecutive working slots, so it can never start on the last working
//! slot of the day or on the slot right before a break.

use serde::{Deserialize, Serialize};

/// One slot of the daily calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Slot identifier (unique within a calendar).
    pub id: String,
    /// Display label, e.g. `"10:15 AM - 11:15 AM"`.
    pub time: String,
    /// Whether the slot is a break.
    #[serde(default)]
    pub is_break: bool,
    /// Break label (`"Long Break"`). Only meaningful for breaks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_type: Option<String>,
}

impl TimeSlot {
    /// Creates a working slot.
    pub fn working(id: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            time: time.into(),
            is_break: false,
            break_type: None,
        }
    }

    /// Creates a break slot.
    pub fn break_slot(
        id: impl Into<String>,
        time: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            time: time.into(),
            is_break: true,
            break_type: Some(label.into()),
        }
    }
}

/// The ordered slots of one day.
///
/// Every weekday uses the same calendar. Serialized as a plain slot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TimeSlot>", into = "Vec<TimeSlot>")]
pub struct SlotCalendar {
    slots: Vec<TimeSlot>,
    /// Positions of the working slots, derived from `slots`.
    working_positions: Vec<usize>,
}

impl SlotCalendar {
    /// Creates a calendar from slots in chronological order.
    pub fn new(slots: Vec<TimeSlot>) -> Self {
        let working_positions = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_break)
            .map(|(pos, _)| pos)
            .collect();
        Self {
            slots,
            working_positions,
        }
    }

    /// The reference calendar: 7 teaching slots, a long break after the
    /// third and a short break after the fifth.
    pub fn reference() -> Self {
        Self::new(vec![
            TimeSlot::working("1", "10:15 AM - 11:15 AM"),
            TimeSlot::working("2", "11:15 AM - 12:15 PM"),
            TimeSlot::working("3", "12:15 PM - 1:15 PM"),
            TimeSlot::break_slot("4", "1:15 PM - 1:45 PM", "Long Break"),
            TimeSlot::working("5", "1:45 PM - 2:45 PM"),
            TimeSlot::working("6", "2:45 PM - 3:45 PM"),
            TimeSlot::break_slot("7", "3:45 PM - 4:00 PM", "Short Break"),
            TimeSlot::working("8", "4:00 PM - 5:00 PM"),
            TimeSlot::working("9", "5:00 PM - 6:00 PM"),
        ])
    }

    /// All slots, breaks included, in chronological order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Number of slots in the day (breaks included).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the calendar has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Working (non-break) slots in chronological order.
    ///
    /// The iterator is cheap to clone, so it can be restarted.
    pub fn working_slots(&self) -> impl Iterator<Item = &TimeSlot> + Clone + '_ {
        self.slots.iter().filter(|s| !s.is_break)
    }

    /// Break slots in chronological order.
    pub fn break_slots(&self) -> impl Iterator<Item = &TimeSlot> + Clone + '_ {
        self.slots.iter().filter(|s| s.is_break)
    }

    /// Number of working slots per day.
    pub fn working_slot_count(&self) -> usize {
        self.working_positions.len()
    }

    /// Positions (in the full day) of the working slots.
    ///
    /// `working_positions()[i]` is where the i-th working slot sits.
    pub fn working_positions(&self) -> &[usize] {
        &self.working_positions
    }

    /// Whether a two-slot practical may start at working slot `index`.
    ///
    /// True iff working slots `index` and `index + 1` both exist and are
    /// adjacent in the full day, i.e. no break sits between them.
    pub fn can_host_consecutive_pair(&self, index: usize) -> bool {
        pair_fits(&self.working_positions, index)
    }

    /// Finds a slot position by id.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }
}

impl From<Vec<TimeSlot>> for SlotCalendar {
    fn from(slots: Vec<TimeSlot>) -> Self {
        Self::new(slots)
    }
}

impl From<SlotCalendar> for Vec<TimeSlot> {
    fn from(calendar: SlotCalendar) -> Self {
        calendar.slots
    }
}

impl Default for SlotCalendar {
    fn default() -> Self {
        Self::reference()
    }
}

/// Adjacency test over precomputed working positions.
pub(crate) fn pair_fits(working_positions: &[usize], index: usize) -> bool {
    let Some(next) = index.checked_add(1) else {
        return false;
    };
    match (working_positions.get(index), working_positions.get(next)) {
        (Some(&first), Some(&second)) => second == first + 1,
        _ => false,
    }
}
