use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::phase::Phase;

pub const DEFAULT_CYCLE_LENGTH: i32 = 28;
pub const DEFAULT_PERIOD_LENGTH: i32 = 5;
pub const OVULATION_DURATION: i32 = 3;
/// Longest cycle or period length taken at face value; longer values fall back.
pub const MAX_LENGTH_DAYS: i32 = 365;

/// How cycle phases are derived for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleMode {
    #[default]
    Regular,
    Irregular,
    /// No bleed on record; `period_length` holds the symptom length.
    Symptomatic,
    Lunar,
}

/// Snapshot of a user's stored cycle data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleProfile {
    #[serde(default = "default_cycle_length")]
    pub cycle_length: i32,
    #[serde(default = "default_period_length")]
    pub period_length: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_cycle_start: Option<NaiveDate>,
    #[serde(default)]
    pub mode: CycleMode,
    #[serde(default)]
    pub irregular: bool,
}

fn default_cycle_length() -> i32 {
    DEFAULT_CYCLE_LENGTH
}

fn default_period_length() -> i32 {
    DEFAULT_PERIOD_LENGTH
}

impl Default for CycleProfile {
    fn default() -> Self {
        Self {
            cycle_length: DEFAULT_CYCLE_LENGTH,
            period_length: DEFAULT_PERIOD_LENGTH,
            last_cycle_start: None,
            mode: CycleMode::Regular,
            irregular: false,
        }
    }
}

impl CycleProfile {
    pub fn new(cycle_length: i32, period_length: i32, last_cycle_start: NaiveDate) -> Self {
        Self {
            cycle_length,
            period_length,
            last_cycle_start: Some(last_cycle_start),
            ..Self::default()
        }
    }

    /// Profile that follows the moon instead of a tracked bleed.
    pub fn lunar(period_length: i32) -> Self {
        Self {
            period_length,
            mode: CycleMode::Lunar,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: CycleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_irregular(mut self, irregular: bool) -> Self {
        self.irregular = irregular;
        self
    }

    /// Cycle length with the 28-day fallback for values outside `1..=365`.
    pub fn effective_cycle_length(&self) -> i32 {
        if (1..=MAX_LENGTH_DAYS).contains(&self.cycle_length) {
            self.cycle_length
        } else {
            DEFAULT_CYCLE_LENGTH
        }
    }

    pub fn effective_period_length(&self) -> i32 {
        if (1..=MAX_LENGTH_DAYS).contains(&self.period_length) {
            self.period_length
        } else {
            DEFAULT_PERIOD_LENGTH
        }
    }

    pub fn is_lunar(&self) -> bool {
        self.mode == CycleMode::Lunar
    }

    pub fn is_irregular(&self) -> bool {
        self.irregular || self.mode == CycleMode::Irregular
    }

    /// Problems with the stored data. None of them stop phase computation.
    pub fn validate(&self) -> Vec<ProfileWarning> {
        let mut warnings = Vec::new();

        if self.is_lunar() {
            warnings.extend(self.period_length_warning());
            return warnings;
        }

        if self.last_cycle_start.is_none() {
            warnings.push(ProfileWarning::MissingCycleStart);
        }
        if self.cycle_length <= 0 {
            warnings.push(ProfileWarning::NonPositiveCycleLength(self.cycle_length));
        } else if self.cycle_length > MAX_LENGTH_DAYS {
            warnings.push(ProfileWarning::ImplausibleCycleLength(self.cycle_length));
        } else if !(21..=45).contains(&self.cycle_length) {
            warnings.push(ProfileWarning::UnusualCycleLength(self.cycle_length));
        }
        warnings.extend(self.period_length_warning());

        let boundaries = PhaseBoundaries::for_profile(self);
        if boundaries.is_degenerate() {
            warnings.push(ProfileWarning::DegenerateFollicularPhase(boundaries.follicular_days()));
        }

        warnings
    }

    fn period_length_warning(&self) -> Option<ProfileWarning> {
        if self.period_length <= 0 {
            Some(ProfileWarning::NonPositivePeriodLength(self.period_length))
        } else if self.period_length > MAX_LENGTH_DAYS {
            Some(ProfileWarning::ImplausiblePeriodLength(self.period_length))
        } else {
            None
        }
    }
}

/// Non-fatal issues found in a [`CycleProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfileWarning {
    MissingCycleStart,
    NonPositiveCycleLength(i32),
    NonPositivePeriodLength(i32),
    ImplausibleCycleLength(i32),
    ImplausiblePeriodLength(i32),
    UnusualCycleLength(i32),
    DegenerateFollicularPhase(i32),
}

impl fmt::Display for ProfileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileWarning::MissingCycleStart => {
                write!(f, "no cycle start on record, phases default to follicular")
            }
            ProfileWarning::NonPositiveCycleLength(days) => {
                write!(f, "cycle length {} is not positive, using {}", days, DEFAULT_CYCLE_LENGTH)
            }
            ProfileWarning::NonPositivePeriodLength(days) => {
                write!(f, "period length {} is not positive, using {}", days, DEFAULT_PERIOD_LENGTH)
            }
            ProfileWarning::ImplausibleCycleLength(days) => {
                write!(f, "cycle length {} exceeds {} days, using {}", days, MAX_LENGTH_DAYS, DEFAULT_CYCLE_LENGTH)
            }
            ProfileWarning::ImplausiblePeriodLength(days) => {
                write!(f, "period length {} exceeds {} days, using {}", days, MAX_LENGTH_DAYS, DEFAULT_PERIOD_LENGTH)
            }
            ProfileWarning::UnusualCycleLength(days) => {
                write!(f, "cycle length {} is outside the usual 21-45 day range", days)
            }
            ProfileWarning::DegenerateFollicularPhase(days) => {
                write!(f, "follicular phase collapses to {} days for this cycle/period length", days)
            }
        }
    }
}

/// Phase boundaries of one solar cycle, as 1-indexed cycle days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBoundaries {
    pub cycle_length: i32,
    pub menstrual_end: i32,
    pub follicular_end: i32,
    pub ovulation_end: i32,
    pub luteal_days: i32,
}

impl PhaseBoundaries {
    pub fn for_profile(profile: &CycleProfile) -> Self {
        let cycle_length = profile.effective_cycle_length();
        let period = profile.effective_period_length();
        let luteal_days = luteal_duration(cycle_length);
        let follicular_days = cycle_length - (period + OVULATION_DURATION + luteal_days);

        Self {
            cycle_length,
            menstrual_end: period,
            follicular_end: period + follicular_days,
            ovulation_end: period + follicular_days + OVULATION_DURATION,
            luteal_days,
        }
    }

    pub fn follicular_days(&self) -> i32 {
        self.follicular_end - self.menstrual_end
    }

    /// True when the follicular phase has no days left.
    pub fn is_degenerate(&self) -> bool {
        self.follicular_days() <= 0
    }

    /// Step function from cycle day to phase; total for any input.
    pub fn classify(&self, cycle_day: i32) -> Phase {
        if cycle_day <= self.menstrual_end {
            Phase::Menstrual
        } else if cycle_day <= self.follicular_end {
            Phase::Follicular
        } else if cycle_day <= self.ovulation_end {
            Phase::Ovulatory
        } else {
            Phase::Luteal
        }
    }
}

/// Luteal phase length by cycle-length bucket.
///
/// Buckets extend upward to the next documented boundary: 21-23 days use the
/// short-cycle value and 27 days uses the 24-26 value.
pub fn luteal_duration(cycle_length: i32) -> i32 {
    match cycle_length {
        i32::MIN..=23 => 10,
        24..=27 => 11,
        28..=30 => 12,
        31..=34 => 13,
        _ => 14,
    }
}

/// Phase of a single date, with the cycle position when one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDetail {
    pub date: NaiveDate,
    pub phase: Phase,
    pub cycle_day: Option<i32>,
    pub late_luteal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedCycle {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPhase {
    pub date: NaiveDate,
    pub phase: Phase,
    pub is_widening_window: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePrediction {
    pub predicted_cycles: Vec<PredictedCycle>,
    pub daily_phases: Vec<DailyPhase>,
}

impl CyclePrediction {
    pub fn predicted_starts(&self) -> Vec<NaiveDate> {
        self.predicted_cycles.iter().map(|c| c.start).collect()
    }

    pub fn widening_dates(&self) -> Vec<NaiveDate> {
        self.daily_phases
            .iter()
            .filter(|d| d.is_widening_window)
            .map(|d| d.date)
            .collect()
    }
}

/// Where a profile stands on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub date: NaiveDate,
    pub phase: Phase,
    pub cycle_day: Option<i32>,
    pub next_cycle_start: Option<NaiveDate>,
    pub days_until_next_cycle: Option<i64>,
    pub in_fertile_window: bool,
}

/// One logged cycle from the user's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedCycle {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleStats {
    pub total_cycles: usize,
    pub average_cycle_length: Option<f64>,
    pub average_period_length: Option<f64>,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub cycle_length_std_dev: Option<f64>,
    pub last_cycle_start: Option<NaiveDate>,
    pub suggests_irregular: bool,
}
