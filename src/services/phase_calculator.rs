use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{CycleProfile, Phase, PhaseBoundaries, PhaseDetail};
use crate::services::lunar_oracle::{LunarPhaseOracle, SynodicMoonOracle};

/// Days around a lunar reference date searched for new and full moons.
pub const LUNAR_SCAN_DAYS: i64 = 30;
/// Half-width of the menstrual-moon and ovulatory-moon windows.
pub const LUNAR_WINDOW_DAYS: i64 = 3;
/// Trailing days of a cycle treated as late luteal.
pub const LATE_LUTEAL_DAYS: i32 = 5;

/// Phase used whenever no cycle position can be derived.
pub const FALLBACK_PHASE: Phase = Phase::Follicular;

/// Maps a calendar date to a cycle phase for a profile.
///
/// Solar profiles use the bucketed boundary table; lunar profiles consult
/// the configured [`LunarPhaseOracle`]. Every method is total: missing or
/// nonsensical profile data falls back instead of failing.
#[derive(Clone)]
pub struct PhaseCalculator {
    oracle: Arc<dyn LunarPhaseOracle>,
}

impl Default for PhaseCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseCalculator {
    pub fn new() -> Self {
        Self::with_oracle(Arc::new(SynodicMoonOracle::new()))
    }

    pub fn with_oracle(oracle: Arc<dyn LunarPhaseOracle>) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &dyn LunarPhaseOracle {
        self.oracle.as_ref()
    }

    pub fn boundaries(&self, profile: &CycleProfile) -> PhaseBoundaries {
        PhaseBoundaries::for_profile(profile)
    }

    /// 1-indexed position inside the current solar cycle.
    ///
    /// Dates before the recorded start wrap backwards, so the result is
    /// always within `1..=cycle_length`. `None` for lunar profiles and
    /// profiles without a recorded start.
    pub fn cycle_day(&self, date: NaiveDate, profile: &CycleProfile) -> Option<i32> {
        if profile.is_lunar() {
            return None;
        }
        let start = profile.last_cycle_start?;
        let cycle_length = profile.effective_cycle_length() as i64;
        let days_since_start = (date - start).num_days();
        Some((days_since_start.rem_euclid(cycle_length) + 1) as i32)
    }

    pub fn phase_for_date(&self, date: NaiveDate, profile: &CycleProfile) -> Phase {
        if profile.is_lunar() {
            return self.lunar_phase(date);
        }

        let Some(cycle_day) = self.cycle_day(date, profile) else {
            debug!("No cycle start on record, using {} for {}", FALLBACK_PHASE, date);
            return FALLBACK_PHASE;
        };

        self.boundaries(profile).classify(cycle_day)
    }

    /// Log the profile's validation warnings once, before a batch of lookups.
    pub fn log_profile_warnings(&self, profile: &CycleProfile) {
        for warning in profile.validate() {
            warn!("Cycle profile: {}", warning);
        }
    }

    pub fn phase_detail(&self, date: NaiveDate, profile: &CycleProfile) -> PhaseDetail {
        let phase = self.phase_for_date(date, profile);
        let cycle_day = self.cycle_day(date, profile);

        let late_luteal = match (phase, cycle_day) {
            (Phase::Luteal, Some(day)) => {
                day > profile.effective_cycle_length() - LATE_LUTEAL_DAYS
            }
            (Phase::LutealMoon, _) => self.new_moon_within(date, LATE_LUTEAL_DAYS as i64 + LUNAR_WINDOW_DAYS),
            _ => false,
        };

        PhaseDetail {
            date,
            phase,
            cycle_day,
            late_luteal,
        }
    }

    /// Lunar-mode classification around the nearest new and full moons.
    pub fn lunar_phase(&self, date: NaiveDate) -> Phase {
        let mut new_moons = Vec::new();
        let mut full_moons = Vec::new();

        for offset in -LUNAR_SCAN_DAYS..=LUNAR_SCAN_DAYS {
            let Some(day) = date.checked_add_signed(Duration::days(offset)) else {
                continue;
            };
            let name = self.oracle.phase_name(day);
            if name.is_new_moon() {
                new_moons.push(offset);
            } else if name.is_full_moon() {
                full_moons.push(offset);
            }
        }

        let nearest = |offsets: &[i64]| offsets.iter().map(|o| o.abs()).min();

        if nearest(&new_moons).is_some_and(|d| d <= LUNAR_WINDOW_DAYS) {
            return Phase::MenstrualMoon;
        }
        if nearest(&full_moons).is_some_and(|d| d <= LUNAR_WINDOW_DAYS) {
            return Phase::OvulatoryMoon;
        }

        let last_new = new_moons.iter().copied().filter(|o| *o <= 0).max();
        let last_full = full_moons.iter().copied().filter(|o| *o <= 0).max();

        match (last_new, last_full) {
            (Some(new), Some(full)) if new > full => Phase::FollicularMoon,
            (Some(_), Some(_)) => Phase::LutealMoon,
            (Some(_), None) => Phase::FollicularMoon,
            (None, Some(_)) => Phase::LutealMoon,
            (None, None) => {
                warn!("No moon reference found within {} days of {}", LUNAR_SCAN_DAYS, date);
                Phase::FollicularMoon
            }
        }
    }

    /// First new moon strictly after `date`, looking at most `horizon` days ahead.
    pub fn next_new_moon(&self, date: NaiveDate, horizon: i64) -> Option<NaiveDate> {
        (1..=horizon)
            .map_while(|offset| date.checked_add_signed(Duration::days(offset)))
            .find(|d| self.oracle.phase_name(*d).is_new_moon())
    }

    fn new_moon_within(&self, date: NaiveDate, days: i64) -> bool {
        self.next_new_moon(date, days).is_some()
    }
}
