use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean new-moon to new-moon interval in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588853;

// Reference new moon: 2000-01-06 18:14 UTC, as a day offset into that date.
const EPOCH_NEW_MOON_OFFSET: f64 = 0.759722;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhaseName {
    pub fn is_new_moon(self) -> bool {
        self == MoonPhaseName::NewMoon
    }

    pub fn is_full_moon(self) -> bool {
        self == MoonPhaseName::FullMoon
    }
}

impl fmt::Display for MoonPhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoonPhaseName::NewMoon => "New Moon",
            MoonPhaseName::WaxingCrescent => "Waxing Crescent",
            MoonPhaseName::FirstQuarter => "First Quarter",
            MoonPhaseName::WaxingGibbous => "Waxing Gibbous",
            MoonPhaseName::FullMoon => "Full Moon",
            MoonPhaseName::WaningGibbous => "Waning Gibbous",
            MoonPhaseName::LastQuarter => "Last Quarter",
            MoonPhaseName::WaningCrescent => "Waning Crescent",
        };
        write!(f, "{}", name)
    }
}

/// Names the moon phase of a calendar day.
///
/// Only consulted for lunar-mode profiles. Implementations must be pure:
/// the same date always yields the same name.
pub trait LunarPhaseOracle: Send + Sync {
    fn phase_name(&self, date: NaiveDate) -> MoonPhaseName;
}

/// Mean-motion moon model.
///
/// A day is "New Moon" or "Full Moon" when the mean event instant falls
/// inside that UTC day; every other day is named by the moon's age at noon.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynodicMoonOracle;

impl SynodicMoonOracle {
    pub fn new() -> Self {
        Self
    }

    /// Days elapsed since the reference new moon at the start of `date`.
    fn days_since_epoch(date: NaiveDate) -> f64 {
        let epoch = NaiveDate::from_ymd_opt(2000, 1, 6).unwrap_or(NaiveDate::MIN);
        (date - epoch).num_days() as f64 - EPOCH_NEW_MOON_OFFSET
    }

    /// Moon age in days, in `[0, SYNODIC_MONTH_DAYS)`.
    pub fn age_at(date: NaiveDate, day_fraction: f64) -> f64 {
        (Self::days_since_epoch(date) + day_fraction).rem_euclid(SYNODIC_MONTH_DAYS)
    }

    fn event_within_day(age_at_midnight: f64) -> bool {
        age_at_midnight == 0.0 || SYNODIC_MONTH_DAYS - age_at_midnight < 1.0
    }
}

impl LunarPhaseOracle for SynodicMoonOracle {
    fn phase_name(&self, date: NaiveDate) -> MoonPhaseName {
        let age = Self::age_at(date, 0.0);
        if Self::event_within_day(age) {
            return MoonPhaseName::NewMoon;
        }

        let half = SYNODIC_MONTH_DAYS / 2.0;
        let full_age = (age - half).rem_euclid(SYNODIC_MONTH_DAYS);
        if Self::event_within_day(full_age) {
            return MoonPhaseName::FullMoon;
        }

        let fraction = Self::age_at(date, 0.5) / SYNODIC_MONTH_DAYS;
        let waxing = fraction < 0.5;
        match ((fraction * 8.0).round() as u32) % 8 {
            0 | 1 if !waxing => MoonPhaseName::WaningCrescent,
            0 | 1 => MoonPhaseName::WaxingCrescent,
            2 => MoonPhaseName::FirstQuarter,
            3 | 4 if waxing => MoonPhaseName::WaxingGibbous,
            3 | 4 | 5 => MoonPhaseName::WaningGibbous,
            6 => MoonPhaseName::LastQuarter,
            _ => MoonPhaseName::WaningCrescent,
        }
    }
}
