//! Whole-week scheduling with retry.
//!
//! # Algorithm
//!
//! 1. Start every binding at its full weekly quota.
//! 2. For each weekday in order, sort bindings by remaining quota
//!    (descending) and allocate the day, carrying the returned quotas
//!    into the next day.
//! 3. If every quota reached zero, the attempt succeeded.
//! 4. Otherwise (residual quota, or a day hit a dead end) discard the
//!    attempt and start over, up to `max_attempts` times.
//!
//! Attempts are independent and sequential; nothing from a failed
//! attempt is kept. A run never returns a partial week.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use super::{DayAllocator, DayInfeasible, SchedulerConfig};
use crate::error::TimetableError;
use crate::models::{normalize, Binding, BindingSpec, WeeklySchedule};
use crate::validation::{validate_bindings, validate_totals};

/// A successful scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// The completed week.
    pub schedule: WeeklySchedule,
    /// Attempts used, including the successful one.
    pub attempts: usize,
    /// Picks that ignored a daily cap in the successful attempt.
    ///
    /// Zero means every daily cap was respected.
    pub forced_allocations: usize,
}

/// One finished (not necessarily complete) attempt.
struct Attempt {
    schedule: WeeklySchedule,
    residual: u32,
    forced_allocations: usize,
}

/// Drives the day allocator across the week.
///
/// # Example
///
/// ```
/// use u_timetable::models::BindingSpec;
/// use u_timetable::scheduler::{SchedulerConfig, WeekScheduler};
///
/// let bindings = vec![
///     BindingSpec::lecture("Math", "T1", 6, 2),
///     BindingSpec::practical("Physics", "T2", 3, 1),
///     BindingSpec::lecture("Chem", "T3", 6, 2),
///     BindingSpec::practical("Bio", "T4", 3, 1),
///     BindingSpec::lecture("English", "T5", 6, 2),
///     BindingSpec::lecture("History", "T6", 6, 2),
///     BindingSpec::lecture("Art", "T7", 6, 2),
/// ];
/// let scheduler = WeekScheduler::new(SchedulerConfig::default().with_seed(11));
/// let outcome = scheduler.run(&bindings).unwrap();
///
/// assert_eq!(outcome.schedule.len(), 6);
/// assert!(outcome.schedule.days().iter().all(|d| d.unallocated_count() == 0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct WeekScheduler {
    config: SchedulerConfig,
}

impl WeekScheduler {
    /// Creates a scheduler.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Validates raw bindings and schedules them.
    ///
    /// Uses the configured seed, or OS entropy when none is set.
    pub fn run(&self, specs: &[BindingSpec]) -> Result<ScheduleOutcome, TimetableError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.run_with_rng(specs, &mut rng)
    }

    /// Validates raw bindings and schedules them with the given random source.
    ///
    /// Malformed bindings and a weekly demand that does not match the
    /// calendar are rejected before any allocation is attempted.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        specs: &[BindingSpec],
        rng: &mut R,
    ) -> Result<ScheduleOutcome, TimetableError> {
        self.config.validate()?;
        validate_bindings(specs)?;
        validate_totals(specs, self.config.required_weekly_slots())?;
        self.schedule(&normalize(specs), rng)
    }

    /// Schedules already-normalized bindings.
    ///
    /// Does not check totals: a set that cannot balance simply exhausts
    /// the retry budget.
    pub fn schedule<R: Rng + ?Sized>(
        &self,
        bindings: &[Binding],
        rng: &mut R,
    ) -> Result<ScheduleOutcome, TimetableError> {
        self.config.validate()?;
        let allocator = DayAllocator::new(&self.config.daily_slots, self.config.cap_policy);
        let budget = self.config.time_budget_ms.map(Duration::from_millis);
        let started = Instant::now();

        for attempt in 1..=self.config.max_attempts {
            match self.attempt(&allocator, bindings, rng) {
                Ok(result) if result.residual == 0 => {
                    info!(
                        "weekly timetable generated after {attempt} attempt(s), {} forced allocation(s)",
                        result.forced_allocations
                    );
                    if result.forced_allocations > 0 {
                        warn!(
                            "{} slot(s) were filled ignoring daily caps",
                            result.forced_allocations
                        );
                    }
                    return Ok(ScheduleOutcome {
                        schedule: result.schedule,
                        attempts: attempt,
                        forced_allocations: result.forced_allocations,
                    });
                }
                Ok(result) => {
                    debug!(
                        "attempt {attempt}: {} slot unit(s) left unallocated, retrying",
                        result.residual
                    );
                }
                Err(dead_end) => {
                    debug!("attempt {attempt}: {dead_end}, retrying");
                }
            }

            if let Some(budget) = budget {
                if started.elapsed() >= budget {
                    warn!("time budget exhausted after {attempt} attempt(s)");
                    return Err(TimetableError::TimeBudgetExceeded {
                        attempts: attempt,
                        budget_ms: budget.as_millis() as u64,
                    });
                }
            }
        }

        warn!(
            "could not generate a valid timetable after {} attempts",
            self.config.max_attempts
        );
        Err(TimetableError::SchedulingInfeasible {
            attempts: self.config.max_attempts,
        })
    }

    /// Runs one whole-week attempt from fresh quotas.
    fn attempt<R: Rng + ?Sized>(
        &self,
        allocator: &DayAllocator<'_>,
        bindings: &[Binding],
        rng: &mut R,
    ) -> Result<Attempt, DayInfeasible> {
        let mut pool: Vec<Binding> = bindings.iter().map(Binding::fresh).collect();
        let mut schedule = WeeklySchedule::new();
        let mut forced_allocations = 0;

        for day in &self.config.weekdays {
            pool.sort_by(|a, b| b.remaining_quota.cmp(&a.remaining_quota));
            let allocation = allocator.allocate(day, &pool, rng)?;
            schedule.insert(allocation.schedule);
            forced_allocations += allocation.forced_allocations;
            pool = allocation.bindings;
        }

        Ok(Attempt {
            schedule,
            residual: pool.iter().map(|b| b.remaining_quota).sum(),
            forced_allocations,
        })
    }
}
