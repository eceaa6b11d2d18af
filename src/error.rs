//! Error types for timetable scheduling.

use crate::validation::{QuotaMismatch, ValidationError};

/// Errors surfaced to callers of the scheduler.
///
/// Day-level dead ends never appear here: the week scheduler recovers
/// from them by retrying the whole week.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// One or more bindings are malformed or duplicated.
    #[error("invalid bindings: {}", join_messages(.0))]
    InvalidBindings(Vec<ValidationError>),

    /// The weekly demand does not match the working slots of the week.
    #[error(transparent)]
    QuotaMismatch(#[from] QuotaMismatch),

    /// The scheduler configuration cannot describe a week.
    #[error("invalid scheduler configuration: {0}")]
    InvalidConfig(String),

    /// Every attempt ended with unplaced quota.
    #[error("unable to auto-schedule after {attempts} attempts, adjust bindings")]
    SchedulingInfeasible {
        /// Attempts made.
        attempts: usize,
    },

    /// The time budget ran out before an attempt succeeded.
    #[error("scheduling time budget of {budget_ms} ms exhausted after {attempts} attempts")]
    TimeBudgetExceeded {
        /// Attempts made.
        attempts: usize,
        /// Configured budget.
        budget_ms: u64,
    },
}

impl From<Vec<ValidationError>> for TimetableError {
    fn from(errors: Vec<ValidationError>) -> Self {
        TimetableError::InvalidBindings(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_messages() {
        let err = TimetableError::from(vec![
            ValidationError::new(ValidationErrorKind::MissingField, "a"),
            ValidationError::new(ValidationErrorKind::NonPositiveMax, "b"),
        ]);
        assert_eq!(err.to_string(), "invalid bindings: a; b");

        let err = TimetableError::from(QuotaMismatch {
            required: 42,
            actual: 40,
        });
        assert_eq!(err.to_string(), "Total allocated hours must be exactly 42, got 40");

        let err = TimetableError::SchedulingInfeasible { attempts: 100 };
        assert!(err.to_string().contains("100 attempts"));
    }
}
