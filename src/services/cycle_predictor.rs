use chrono::{Duration, Months, NaiveDate};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::models::{CyclePrediction, CycleProfile, CycleSummary, DailyPhase, Phase, PredictedCycle};
use crate::services::phase_calculator::PhaseCalculator;

pub const DEFAULT_CYCLES_AHEAD: usize = 3;
/// Largest number of cycles predicted in one call; larger requests are capped.
pub const MAX_CYCLES_AHEAD: usize = 12;
/// Days on either side of a predicted start that count as uncertain.
pub const WIDENING_WINDOW_DAYS: i64 = 4;
/// Upper bound on the forward search for each lunar cycle start.
pub const LUNAR_SEARCH_DAYS: i64 = 45;
const FERTILE_DAYS_BEFORE_OVULATION: i32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PredictionKey {
    profile: CycleProfile,
    today: NaiveDate,
    cycles_ahead: usize,
}

/// Forward predictions of cycle starts and daily phases.
pub struct CyclePredictor {
    calculator: PhaseCalculator,
    last: Mutex<Option<(PredictionKey, CyclePrediction)>>,
}

impl CyclePredictor {
    pub fn new(calculator: PhaseCalculator) -> Self {
        Self {
            calculator,
            last: Mutex::new(None),
        }
    }

    pub fn calculator(&self) -> &PhaseCalculator {
        &self.calculator
    }

    pub fn predict(&self, profile: &CycleProfile, today: NaiveDate) -> CyclePrediction {
        self.predict_cycles(profile, today, DEFAULT_CYCLES_AHEAD)
    }

    /// Predictions for `cycles_ahead` cycles plus a daily phase table
    /// covering `today` through three months later.
    ///
    /// `cycles_ahead` is capped at [`MAX_CYCLES_AHEAD`], and starts that
    /// fall outside the representable calendar are left out. Repeated calls
    /// with the same inputs are served from a single-slot cache; the result
    /// never depends on it.
    pub fn predict_cycles(
        &self,
        profile: &CycleProfile,
        today: NaiveDate,
        cycles_ahead: usize,
    ) -> CyclePrediction {
        let cycles_ahead = cycles_ahead.min(MAX_CYCLES_AHEAD);
        let key = PredictionKey {
            profile: profile.clone(),
            today,
            cycles_ahead,
        };

        if let Ok(slot) = self.last.lock() {
            if let Some((cached_key, prediction)) = slot.as_ref() {
                if *cached_key == key {
                    debug!("Serving cached prediction for {}", today);
                    return prediction.clone();
                }
            }
        }

        let prediction = self.compute(profile, today, cycles_ahead);

        if let Ok(mut slot) = self.last.lock() {
            *slot = Some((key, prediction.clone()));
        }

        prediction
    }

    fn compute(&self, profile: &CycleProfile, today: NaiveDate, cycles_ahead: usize) -> CyclePrediction {
        self.calculator.log_profile_warnings(profile);

        let starts = self.predicted_starts(profile, today, cycles_ahead);
        let period = Duration::days(profile.effective_period_length() as i64);
        let predicted_cycles: Vec<PredictedCycle> = starts
            .iter()
            .map_while(|start| {
                start
                    .checked_add_signed(period)
                    .map(|end| PredictedCycle { start: *start, end })
            })
            .collect();

        let widening = profile.is_irregular();
        let horizon = today.checked_add_months(Months::new(3)).unwrap_or(NaiveDate::MAX);

        let daily_phases: Vec<DailyPhase> = today
            .iter_days()
            .take_while(|date| *date <= horizon)
            .map(|date| DailyPhase {
                date,
                phase: self.calculator.phase_for_date(date, profile),
                is_widening_window: widening
                    && starts
                        .iter()
                        .any(|start| (date - *start).num_days().abs() <= WIDENING_WINDOW_DAYS),
            })
            .collect();

        info!(
            "Predicted {} cycle starts and {} daily phases from {}",
            predicted_cycles.len(),
            daily_phases.len(),
            today
        );

        CyclePrediction {
            predicted_cycles,
            daily_phases,
        }
    }

    fn predicted_starts(&self, profile: &CycleProfile, today: NaiveDate, cycles_ahead: usize) -> Vec<NaiveDate> {
        if profile.is_lunar() {
            let mut starts = Vec::with_capacity(cycles_ahead);
            // today itself counts when it is a new moon
            let mut cursor = today.pred_opt().unwrap_or(today);
            for _ in 0..cycles_ahead {
                match self.calculator.next_new_moon(cursor, LUNAR_SEARCH_DAYS) {
                    Some(start) => {
                        starts.push(start);
                        cursor = start;
                    }
                    None => break,
                }
            }
            return starts;
        }

        let Some(last_start) = profile.last_cycle_start else {
            debug!("No cycle start on record, skipping start predictions");
            return Vec::new();
        };
        let cycle_length = profile.effective_cycle_length() as i64;

        (1..=cycles_ahead as i64)
            .map_while(|k| last_start.checked_add_signed(Duration::days(k * cycle_length)))
            .collect()
    }

    /// Where the profile stands on `today`.
    pub fn summary(&self, profile: &CycleProfile, today: NaiveDate) -> CycleSummary {
        let detail = self.calculator.phase_detail(today, profile);

        let next_cycle_start = if profile.is_lunar() {
            self.calculator.next_new_moon(today, LUNAR_SEARCH_DAYS)
        } else {
            detail.cycle_day.and_then(|day| {
                let remaining = profile.effective_cycle_length() - day + 1;
                today.checked_add_signed(Duration::days(remaining as i64))
            })
        };

        let in_fertile_window = if profile.is_lunar() {
            detail.phase == Phase::OvulatoryMoon
        } else {
            let boundaries = self.calculator.boundaries(profile);
            let opens = (boundaries.follicular_end - FERTILE_DAYS_BEFORE_OVULATION).max(1);
            detail
                .cycle_day
                .is_some_and(|day| (opens..=boundaries.ovulation_end).contains(&day))
        };

        CycleSummary {
            date: today,
            phase: detail.phase,
            cycle_day: detail.cycle_day,
            next_cycle_start,
            days_until_next_cycle: next_cycle_start.map(|start| (start - today).num_days()),
            in_fertile_window,
        }
    }
}
