use chrono::NaiveDate;
use thiserror::Error;

use crate::models::PlanEntryStatus;

/// Validation failures raised by the explicit checks around the scheduling core.
///
/// The generators themselves are total and never return these; callers that
/// want strict input handling run the matching `validate` helper first.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("Workout frequency must be between 1 and 6 sessions per week, got {0}")]
    InvalidFrequency(u8),
    #[error("Training days exceed one week: {run} run + {cross_train} cross-train + {rest} rest")]
    TooManyTrainingDays { run: u8, cross_train: u8, rest: u8 },
    #[error("A race plan needs at least one run day per week")]
    NoRunDays,
    #[error("Race day {race_date} is before the training start {training_start}")]
    RaceBeforeTrainingStart {
        race_date: NaiveDate,
        training_start: NaiveDate,
    },
    #[error("Cannot move plan entry from {from} to {to}")]
    InvalidStatusTransition {
        from: PlanEntryStatus,
        to: PlanEntryStatus,
    },
    #[error("Unknown phase: {0}")]
    UnknownPhase(String),
}
