//! Single-day allocation.
//!
//! # Algorithm
//!
//! Walk the working slots of the day in order. At working slot `i`:
//! 1. Eligible = bindings with quota left for one more occurrence and
//!    fewer than `daily_cap` slot units placed today (per subject and
//!    lesson type).
//! 2. If nothing is eligible, relax the cap (lenient policy: every
//!    binding with quota left, counted as a forced allocation; strict
//!    policy: give up on the day). With no quota left at all, the rest of
//!    the day stays empty.
//! 3. If no practical can start at `i` (last slot, or a break follows),
//!    keep only lectures. None left means the day is a dead end.
//! 4. Pick uniformly at random. A practical takes slots `i` and `i + 1`
//!    and two units of quota; a lecture takes slot `i` and one unit.
//!
//! Breaks are then laid back in at their calendar positions.
//!
//! The allocator is greedy and does not look ahead: a bad draw is
//! recovered by the week scheduler retrying the whole week.

use log::debug;
use rand::prelude::IndexedRandom;
use rand::Rng;
use std::collections::HashMap;

use super::CapPolicy;
use crate::models::{
    pair_fits, Binding, DaySchedule, Lesson, LessonType, SlotAssignment, SlotCalendar,
};

/// A day that cannot be completed with the current draw.
///
/// This is the error of [`DayAllocator::allocate`], so callers driving
/// single days see it. [`WeekScheduler`](super::WeekScheduler) treats it
/// as a failed attempt and retries; it never leaves a week run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DayInfeasible {
    /// Slot cannot host a practical and no lecture is eligible.
    #[error("no lecture can fill slot '{slot}' on {day}")]
    NoLectureForSlot {
        /// Weekday.
        day: String,
        /// Calendar slot id.
        slot: String,
    },
    /// Every binding with quota left is at its daily cap (strict policy).
    #[error("all bindings are at their daily cap at slot '{slot}' on {day}")]
    CapsExhausted {
        /// Weekday.
        day: String,
        /// Calendar slot id.
        slot: String,
    },
}

/// Result of allocating one day.
#[derive(Debug, Clone)]
pub struct DayAllocation {
    /// The day's slots in calendar order.
    pub schedule: DaySchedule,
    /// Bindings with quotas reduced by what this day placed.
    pub bindings: Vec<Binding>,
    /// Picks made while ignoring daily caps.
    pub forced_allocations: usize,
}

/// Fills the working slots of one day.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_timetable::models::{normalize, BindingSpec, SlotCalendar};
/// use u_timetable::scheduler::{CapPolicy, DayAllocator};
///
/// let calendar = SlotCalendar::reference();
/// let bindings = normalize(&[
///     BindingSpec::lecture("Math", "T1", 4, 4),
///     BindingSpec::lecture("Chem", "T2", 4, 4),
/// ]);
/// let allocator = DayAllocator::new(&calendar, CapPolicy::Lenient);
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let day = allocator.allocate("Monday", &bindings, &mut rng).unwrap();
/// assert_eq!(day.schedule.unallocated_count(), 0);
/// let left: u32 = day.bindings.iter().map(|b| b.remaining_quota).sum();
/// assert_eq!(left, 1);
/// ```
#[derive(Debug, Clone)]
pub struct DayAllocator<'a> {
    calendar: &'a SlotCalendar,
    cap_policy: CapPolicy,
    working_positions: &'a [usize],
}

impl<'a> DayAllocator<'a> {
    /// Creates an allocator for a calendar.
    pub fn new(calendar: &'a SlotCalendar, cap_policy: CapPolicy) -> Self {
        Self {
            calendar,
            cap_policy,
            working_positions: calendar.working_positions(),
        }
    }

    /// Allocates one day.
    ///
    /// `bindings` is not modified; the returned allocation carries the
    /// updated quotas.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        day: &str,
        bindings: &[Binding],
        rng: &mut R,
    ) -> Result<DayAllocation, DayInfeasible> {
        let slot_count = self.working_positions.len();
        let mut pool = bindings.to_vec();
        let mut placed: Vec<Option<Lesson>> = vec![None; slot_count];
        let mut today: HashMap<(String, LessonType), u32> = HashMap::new();
        let mut forced_allocations = 0;

        let mut i = 0;
        while i < slot_count {
            let slot_id = &self.calendar.slots()[self.working_positions[i]].id;

            let mut eligible: Vec<usize> = (0..pool.len())
                .filter(|&k| {
                    let b = &pool[k];
                    let used = today
                        .get(&(b.subject_id.clone(), b.lesson_type))
                        .copied()
                        .unwrap_or(0);
                    b.can_place() && used < b.daily_cap
                })
                .collect();

            if eligible.is_empty() {
                eligible = (0..pool.len()).filter(|&k| pool[k].can_place()).collect();
                if eligible.is_empty() {
                    debug!("{day}: quota exhausted with {} slots left", slot_count - i);
                    break;
                }
                match self.cap_policy {
                    CapPolicy::Strict => {
                        return Err(DayInfeasible::CapsExhausted {
                            day: day.to_string(),
                            slot: slot_id.clone(),
                        });
                    }
                    CapPolicy::Lenient => {
                        debug!("{day}: forced allocation at slot '{slot_id}'");
                        forced_allocations += 1;
                    }
                }
            }

            if !pair_fits(&self.working_positions, i) {
                eligible.retain(|&k| pool[k].lesson_type == LessonType::Lecture);
            }

            let Some(&pick) = eligible.choose(rng) else {
                return Err(DayInfeasible::NoLectureForSlot {
                    day: day.to_string(),
                    slot: slot_id.clone(),
                });
            };

            let binding = &mut pool[pick];
            let units = binding.lesson_type.slot_units();
            binding.remaining_quota -= units;
            *today
                .entry((binding.subject_id.clone(), binding.lesson_type))
                .or_insert(0) += units;

            let lesson = Lesson::of(binding);
            for slot in placed.iter_mut().skip(i).take(units as usize) {
                *slot = Some(lesson.clone());
            }
            i += units as usize;
        }

        Ok(DayAllocation {
            schedule: self.lay_out(day, placed),
            bindings: pool,
            forced_allocations,
        })
    }

    /// Merges placed lessons with the calendar's breaks, in calendar order.
    fn lay_out(&self, day: &str, placed: Vec<Option<Lesson>>) -> DaySchedule {
        let mut placed = placed.into_iter();
        let slots = self
            .calendar
            .slots()
            .iter()
            .map(|slot| {
                if slot.is_break {
                    SlotAssignment::break_of(slot)
                } else {
                    match placed.next().flatten() {
                        Some(lesson) => SlotAssignment::lesson(slot, lesson),
                        None => SlotAssignment::empty(slot),
                    }
                }
            })
            .collect();
        DaySchedule::new(day, slots)
    }
}
