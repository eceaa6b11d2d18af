//! Timetable persistence boundary.
//!
//! The scheduler itself does no I/O. Once a week has been generated, it is
//! written one day at a time through a [`TimetableStore`]. Writes are
//! upserts keyed by `(class_id, day)`, so repeating a save (for instance
//! after a partially failed run) leaves the store as a single save would.

use log::{debug, info};
use std::collections::HashMap;

use crate::models::{DaySchedule, WeeklySchedule};

/// Persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Nothing has been saved for the class.
    #[error("no timetable found for class '{0}'")]
    UnknownClass(String),
}

/// Storage for generated timetables.
pub trait TimetableStore {
    /// Inserts or replaces the schedule of `day.day` for a class.
    fn save_day(&mut self, class_id: &str, day: &DaySchedule) -> Result<(), StoreError>;

    /// The stored schedule of one day.
    fn load_day(&self, class_id: &str, day: &str) -> Option<DaySchedule>;

    /// Days stored for a class. A re-saved day moves to the end.
    fn saved_days(&self, class_id: &str) -> Vec<String>;

    /// Marks the class timetable as submitted and locked.
    fn submit(&mut self, class_id: &str) -> Result<(), StoreError>;

    /// Whether the class timetable was submitted.
    fn is_locked(&self, class_id: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
struct ClassRecord {
    week: Vec<DaySchedule>,
    locked: bool,
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    classes: HashMap<String, ClassRecord>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimetableStore for MemoryStore {
    fn save_day(&mut self, class_id: &str, day: &DaySchedule) -> Result<(), StoreError> {
        let record = self.classes.entry(class_id.to_string()).or_default();
        record.week.retain(|d| d.day != day.day);
        record.week.push(day.clone());
        debug!("saved {} for class {class_id}", day.day);
        Ok(())
    }

    fn load_day(&self, class_id: &str, day: &str) -> Option<DaySchedule> {
        self.classes
            .get(class_id)?
            .week
            .iter()
            .find(|d| d.day == day)
            .cloned()
    }

    fn saved_days(&self, class_id: &str) -> Vec<String> {
        self.classes
            .get(class_id)
            .map(|r| r.week.iter().map(|d| d.day.clone()).collect())
            .unwrap_or_default()
    }

    fn submit(&mut self, class_id: &str) -> Result<(), StoreError> {
        let record = self
            .classes
            .get_mut(class_id)
            .ok_or_else(|| StoreError::UnknownClass(class_id.to_string()))?;
        record.locked = true;
        info!("timetable for class {class_id} submitted and locked");
        Ok(())
    }

    fn is_locked(&self, class_id: &str) -> bool {
        self.classes.get(class_id).is_some_and(|r| r.locked)
    }
}

/// Writes every day of a week, in weekday order.
///
/// Safe to repeat after a partial failure.
pub fn persist_week<S: TimetableStore + ?Sized>(
    store: &mut S,
    class_id: &str,
    week: &WeeklySchedule,
) -> Result<(), StoreError> {
    for day in week.days() {
        store.save_day(class_id, day)?;
    }
    info!("persisted {} day(s) for class {class_id}", week.len());
    Ok(())
}

/// Reads back the stored days of a class, ordered by `weekdays`.
///
/// Days missing from the store are skipped.
pub fn load_week<S: TimetableStore + ?Sized>(
    store: &S,
    class_id: &str,
    weekdays: &[String],
) -> WeeklySchedule {
    let mut week = WeeklySchedule::new();
    for day in weekdays {
        if let Some(schedule) = store.load_day(class_id, day) {
            week.insert(schedule);
        }
    }
    week
}
