use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cycle::CycleProfile;
use super::phase::{IntensityTier, Phase};
use crate::errors::PlanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceType {
    #[serde(rename = "5k")]
    FiveK,
    #[serde(rename = "10k")]
    TenK,
    #[serde(rename = "half_marathon")]
    HalfMarathon,
    #[serde(rename = "marathon")]
    Marathon,
}

impl RaceType {
    pub fn distance_km(self) -> f64 {
        match self {
            RaceType::FiveK => 5.0,
            RaceType::TenK => 10.0,
            RaceType::HalfMarathon => 21.1,
            RaceType::Marathon => 42.2,
        }
    }
}

impl fmt::Display for RaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceType::FiveK => write!(f, "5K"),
            RaceType::TenK => write!(f, "10K"),
            RaceType::HalfMarathon => write!(f, "Half Marathon"),
            RaceType::Marathon => write!(f, "Marathon"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceGoal {
    Finish,
    PersonalBest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPhase {
    BaseBuilding,
    Interval,
    SpeedStrength,
    Taper,
}

impl TrainingPhase {
    /// Phase for a week by elapsed fraction of the plan.
    pub fn for_fraction(fraction: f64) -> Self {
        if fraction < 0.4 {
            TrainingPhase::BaseBuilding
        } else if fraction < 0.7 {
            TrainingPhase::Interval
        } else if fraction < 0.9 {
            TrainingPhase::SpeedStrength
        } else {
            TrainingPhase::Taper
        }
    }
}

impl fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingPhase::BaseBuilding => write!(f, "Base Building"),
            TrainingPhase::Interval => write!(f, "Interval"),
            TrainingPhase::SpeedStrength => write!(f, "Speed & Strength"),
            TrainingPhase::Taper => write!(f, "Taper"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceDayType {
    Run,
    CrossTrain,
    Rest,
    Race,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceWorkoutKind {
    EasyRun,
    LongRun,
    Tempo,
    Intervals,
    Speed,
    Hills,
    CrossTraining,
    Race,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceWorkout {
    pub kind: RaceWorkoutKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub duration_minutes: u32,
    pub intensity: IntensityTier,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceDay {
    pub date: NaiveDate,
    pub day_type: RaceDayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout: Option<RaceWorkout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_phase: Option<Phase>,
    /// Cycle-aware guidance layered on top of the workout numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceWeek {
    pub week_number: usize,
    pub start_date: NaiveDate,
    pub phase: TrainingPhase,
    pub is_down_week: bool,
    pub total_distance_km: f64,
    pub days: Vec<RaceDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacePlan {
    pub race_type: RaceType,
    pub race_date: NaiveDate,
    pub training_start: NaiveDate,
    pub runner_level: RunnerLevel,
    pub goal: RaceGoal,
    pub total_weeks: usize,
    pub weeks: Vec<RaceWeek>,
}

impl RacePlan {
    pub fn days(&self) -> impl Iterator<Item = &RaceDay> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }
}

/// Inputs for a race training plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacePlanRequest {
    pub race_type: RaceType,
    pub race_date: NaiveDate,
    pub training_start: NaiveDate,
    pub runner_level: RunnerLevel,
    pub run_days: u8,
    #[serde(default)]
    pub cross_train_days: u8,
    #[serde(default)]
    pub rest_days: u8,
    pub goal: RaceGoal,
    /// Enables per-day cycle advisories when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_profile: Option<CycleProfile>,
}

impl RacePlanRequest {
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.race_date < self.training_start {
            return Err(PlanError::RaceBeforeTrainingStart {
                race_date: self.race_date,
                training_start: self.training_start,
            });
        }
        if self.run_days == 0 {
            return Err(PlanError::NoRunDays);
        }
        let total = self.run_days as u32 + self.cross_train_days as u32 + self.rest_days as u32;
        if total > 7 {
            return Err(PlanError::TooManyTrainingDays {
                run: self.run_days,
                cross_train: self.cross_train_days,
                rest: self.rest_days,
            });
        }
        Ok(())
    }
}
