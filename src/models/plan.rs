use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::phase::Phase;
use super::workout::WorkoutCatalogEntry;
use crate::errors::PlanError;

pub const PLAN_HORIZON_DAYS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Workout,
    Meditation,
    Rest,
}

/// What the user is asked to do on a plan day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanActivity {
    Workout { workout: WorkoutCatalogEntry },
    Meditation { session: WorkoutCatalogEntry },
    Rest,
}

/// Lifecycle of a plan entry once it leaves the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanEntryStatus {
    #[default]
    Suggested,
    Scheduled,
    Completed,
    Skipped,
    Confirmed,
}

impl PlanEntryStatus {
    pub fn can_transition_to(self, next: PlanEntryStatus) -> bool {
        use PlanEntryStatus::*;

        matches!(
            (self, next),
            (Suggested, Scheduled)
                | (Suggested, Completed)
                | (Suggested, Skipped)
                | (Scheduled, Completed)
                | (Scheduled, Skipped)
                | (Skipped, Scheduled)
                | (Completed, Confirmed)
        )
    }

    pub fn transition(self, next: PlanEntryStatus) -> Result<PlanEntryStatus, PlanError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PlanError::InvalidStatusTransition { from: self, to: next })
        }
    }
}

impl fmt::Display for PlanEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlanEntryStatus::Suggested => "suggested",
            PlanEntryStatus::Scheduled => "scheduled",
            PlanEntryStatus::Completed => "completed",
            PlanEntryStatus::Skipped => "skipped",
            PlanEntryStatus::Confirmed => "confirmed",
        };
        write!(f, "{}", label)
    }
}

/// One dated row of a generated fitness plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub date: NaiveDate,
    pub day_type: DayType,
    pub activity: PlanActivity,
    pub phase: Phase,
    #[serde(default)]
    pub status: PlanEntryStatus,
    #[serde(default)]
    pub is_favorite: bool,
    /// Set when the only remaining classes conflict with a logged injury.
    #[serde(default)]
    pub injury_caution: bool,
}

impl PlanEntry {
    pub fn rest(date: NaiveDate, phase: Phase) -> Self {
        Self {
            date,
            day_type: DayType::Rest,
            activity: PlanActivity::Rest,
            phase,
            status: PlanEntryStatus::Suggested,
            is_favorite: false,
            injury_caution: false,
        }
    }

    pub fn meditation(date: NaiveDate, phase: Phase, session: WorkoutCatalogEntry) -> Self {
        Self {
            date,
            day_type: DayType::Meditation,
            activity: PlanActivity::Meditation { session },
            phase,
            status: PlanEntryStatus::Suggested,
            is_favorite: false,
            injury_caution: false,
        }
    }

    pub fn workout(date: NaiveDate, phase: Phase, workout: WorkoutCatalogEntry) -> Self {
        Self {
            date,
            day_type: DayType::Workout,
            activity: PlanActivity::Workout { workout },
            phase,
            status: PlanEntryStatus::Suggested,
            is_favorite: false,
            injury_caution: false,
        }
    }

    pub fn workout_entry(&self) -> Option<&WorkoutCatalogEntry> {
        match &self.activity {
            PlanActivity::Workout { workout } => Some(workout),
            _ => None,
        }
    }

    /// Class name for workout and meditation days.
    pub fn activity_name(&self) -> Option<&str> {
        match &self.activity {
            PlanActivity::Workout { workout } => Some(&workout.name),
            PlanActivity::Meditation { session } => Some(&session.name),
            PlanActivity::Rest => None,
        }
    }

    pub fn set_status(&mut self, next: PlanEntryStatus) -> Result<(), PlanError> {
        self.status = self.status.transition(next)?;
        Ok(())
    }
}

/// Day-type counts of a generated plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanBreakdown {
    pub workout_days: usize,
    pub meditation_days: usize,
    pub rest_days: usize,
}

impl PlanBreakdown {
    pub fn from_entries(entries: &[PlanEntry]) -> Self {
        entries
            .iter()
            .fold(PlanBreakdown::default(), |mut acc, entry| {
                match entry.day_type {
                    DayType::Workout => acc.workout_days += 1,
                    DayType::Meditation => acc.meditation_days += 1,
                    DayType::Rest => acc.rest_days += 1,
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_status_lifecycle() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let mut entry = PlanEntry::rest(date, Phase::Luteal);

        assert!(entry.set_status(PlanEntryStatus::Scheduled).is_ok());
        assert!(entry.set_status(PlanEntryStatus::Completed).is_ok());
        assert!(entry.set_status(PlanEntryStatus::Confirmed).is_ok());
        assert_matches!(
            entry.set_status(PlanEntryStatus::Suggested),
            Err(PlanError::InvalidStatusTransition { .. })
        );
        assert_eq!(entry.status, PlanEntryStatus::Confirmed);
    }

    #[test]
    fn test_skipped_entry_can_be_rescheduled() {
        assert!(PlanEntryStatus::Skipped.can_transition_to(PlanEntryStatus::Scheduled));
        assert!(!PlanEntryStatus::Skipped.can_transition_to(PlanEntryStatus::Confirmed));
        assert!(!PlanEntryStatus::Completed.can_transition_to(PlanEntryStatus::Completed));
    }

    #[test]
    fn test_activity_serialization_is_tagged() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let entry = PlanEntry::rest(date, Phase::Follicular);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["activity"]["kind"], "rest");
        assert_eq!(value["phase"], "follicular");
        assert_eq!(value["status"], "suggested");
    }
}
