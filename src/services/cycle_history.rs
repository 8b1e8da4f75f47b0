use tracing::debug;

use crate::models::{CycleMode, CycleProfile, CycleStats, LoggedCycle};

/// Number of most recent cycles considered for averages.
pub const RECENT_CYCLES: usize = 6;
/// Spread between shortest and longest cycle above which cycles count as irregular.
pub const IRREGULAR_SPREAD_DAYS: i64 = 7;

/// Statistics over a user's logged cycle starts.
pub struct CycleHistory;

impl CycleHistory {
    pub fn stats(cycles: &[LoggedCycle]) -> CycleStats {
        let mut sorted: Vec<&LoggedCycle> = cycles.iter().collect();
        sorted.sort_by_key(|c| c.start_date);
        sorted.dedup_by_key(|c| c.start_date);

        let skip = sorted.len().saturating_sub(RECENT_CYCLES);
        let recent = &sorted[skip..];

        let cycle_lengths: Vec<i64> = recent
            .windows(2)
            .map(|w| (w[1].start_date - w[0].start_date).num_days())
            .collect();

        let period_lengths: Vec<f64> = recent
            .iter()
            .filter_map(|c| {
                c.end_date
                    .filter(|end| *end >= c.start_date)
                    .map(|end| (end - c.start_date).num_days() as f64 + 1.0)
            })
            .collect();

        let lengths: Vec<f64> = cycle_lengths.iter().map(|l| *l as f64).collect();
        let shortest_cycle = cycle_lengths.iter().copied().min();
        let longest_cycle = cycle_lengths.iter().copied().max();

        let suggests_irregular = matches!(
            (shortest_cycle, longest_cycle),
            (Some(short), Some(long)) if long - short > IRREGULAR_SPREAD_DAYS
        );

        debug!(
            "Computed stats over {} cycles ({} lengths)",
            sorted.len(),
            cycle_lengths.len()
        );

        CycleStats {
            total_cycles: sorted.len(),
            average_cycle_length: mean(&lengths),
            average_period_length: mean(&period_lengths),
            shortest_cycle,
            longest_cycle,
            cycle_length_std_dev: std_deviation(&lengths),
            last_cycle_start: sorted.last().map(|c| c.start_date),
            suggests_irregular,
        }
    }

    /// Profile derived from logged history, keeping `base` where history is silent.
    pub fn profile_from(cycles: &[LoggedCycle], base: &CycleProfile) -> CycleProfile {
        let stats = Self::stats(cycles);
        let mut profile = base.clone();

        if let Some(average) = stats.average_cycle_length {
            profile.cycle_length = average.round() as i32;
        }
        if let Some(average) = stats.average_period_length {
            profile.period_length = average.round() as i32;
        }
        if stats.last_cycle_start.is_some() {
            profile.last_cycle_start = stats.last_cycle_start;
        }
        if stats.suggests_irregular && profile.mode == CycleMode::Regular {
            profile.irregular = true;
        }

        profile
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn std_deviation(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
