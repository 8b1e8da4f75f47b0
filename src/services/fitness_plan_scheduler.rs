use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::models::{
    CycleProfile, DayType, Phase, PlanBreakdown, PlanEntry, UserFitnessPreferences, WorkoutCatalogEntry,
    PLAN_HORIZON_DAYS,
};
use crate::services::phase_calculator::PhaseCalculator;

const DAYS_PER_WEEK: usize = 7;
const DISLIKED_PENALTY: i32 = 10;

/// Builds the 14-day workout / meditation / rest schedule.
#[derive(Clone, Default)]
pub struct FitnessPlanScheduler {
    calculator: PhaseCalculator,
}

/// Names and favorites already used in the current 7-day half.
#[derive(Debug, Default)]
struct WeekTracker {
    used_names: HashSet<String>,
    favorite_used: bool,
}

struct Selection<'a> {
    workout: &'a WorkoutCatalogEntry,
    is_favorite: bool,
    injury_caution: bool,
}

impl FitnessPlanScheduler {
    pub fn new(calculator: PhaseCalculator) -> Self {
        Self { calculator }
    }

    /// First plan day: today, or tomorrow when the user asked to start then.
    pub fn start_date_for(today: NaiveDate, start_tomorrow: bool) -> NaiveDate {
        if start_tomorrow {
            today + Duration::days(1)
        } else {
            today
        }
    }

    /// Generate a plan of exactly 14 consecutive entries from `start_date`.
    ///
    /// Custom workouts from the preferences are appended after `catalog`.
    /// An empty catalog yields a plan of rest days.
    pub fn generate(
        &self,
        profile: &CycleProfile,
        preferences: &UserFitnessPreferences,
        start_date: NaiveDate,
        catalog: &[WorkoutCatalogEntry],
    ) -> Vec<PlanEntry> {
        if let Err(e) = preferences.validate() {
            warn!("{}; clamping to {}", e, preferences.effective_frequency());
        }
        self.calculator.log_profile_warnings(profile);

        let pool: Vec<WorkoutCatalogEntry> = catalog
            .iter()
            .cloned()
            .chain(preferences.custom_workouts.iter().map(|c| c.to_catalog_entry()))
            .collect();

        let dates: Vec<NaiveDate> = start_date.iter_days().take(PLAN_HORIZON_DAYS).collect();

        if pool.is_empty() {
            warn!("Workout catalog is empty, emitting a rest-only plan from {}", start_date);
            return dates
                .into_iter()
                .map(|date| PlanEntry::rest(date, self.calculator.phase_for_date(date, profile)))
                .collect();
        }

        let (meditations, workouts): (Vec<&WorkoutCatalogEntry>, Vec<&WorkoutCatalogEntry>) =
            pool.iter().partition(|entry| entry.is_meditation());

        let day_types = allocate_day_types(
            preferences.effective_frequency(),
            start_date,
            &preferences.rest_days,
        );

        let mut tracker = WeekTracker::default();
        let mut entries = Vec::with_capacity(PLAN_HORIZON_DAYS);

        for (index, (date, day_type)) in dates.into_iter().zip(day_types).enumerate() {
            if index == DAYS_PER_WEEK {
                tracker = WeekTracker::default();
            }

            let phase = self.calculator.phase_for_date(date, profile);

            let entry = match day_type {
                DayType::Workout => match select_workout(phase, &workouts, preferences, &tracker) {
                    Some(selection) => {
                        debug!("{}: {} ({})", date, selection.workout.name, phase);
                        tracker.used_names.insert(selection.workout.name.clone());
                        tracker.favorite_used |= selection.is_favorite;

                        let mut entry = PlanEntry::workout(date, phase, selection.workout.clone());
                        entry.is_favorite = selection.is_favorite;
                        entry.injury_caution = selection.injury_caution;
                        entry
                    }
                    None => {
                        debug!("{}: no workout-capable entries, resting", date);
                        PlanEntry::rest(date, phase)
                    }
                },
                DayType::Meditation => {
                    PlanEntry::meditation(date, phase, select_meditation(phase, &meditations))
                }
                DayType::Rest => PlanEntry::rest(date, phase),
            };

            entries.push(entry);
        }

        let breakdown = PlanBreakdown::from_entries(&entries);
        info!(
            "Generated fitness plan from {}: {} workouts, {} meditations, {} rest days",
            start_date, breakdown.workout_days, breakdown.meditation_days, breakdown.rest_days
        );

        entries
    }
}

fn select_workout<'a>(
    phase: Phase,
    workouts: &[&'a WorkoutCatalogEntry],
    preferences: &UserFitnessPreferences,
    tracker: &WeekTracker,
) -> Option<Selection<'a>> {
    let mut candidates: Vec<&'a WorkoutCatalogEntry> =
        workouts.iter().copied().filter(|w| w.applies_to(phase)).collect();
    if candidates.is_empty() {
        debug!("No catalog entry targets {}, using the full catalog", phase);
        candidates = workouts.to_vec();
    }
    if candidates.is_empty() {
        return None;
    }

    let mut injury_caution = false;
    if !preferences.injuries.is_empty() {
        let safe: Vec<_> = candidates
            .iter()
            .copied()
            .filter(|w| !w.conflicts_with(&preferences.injuries))
            .collect();
        if safe.is_empty() {
            injury_caution = true;
        } else {
            candidates = safe;
        }
    }

    let fresh: Vec<_> = candidates
        .iter()
        .copied()
        .filter(|w| !tracker.used_names.contains(&w.name))
        .collect();
    if !fresh.is_empty() {
        candidates = fresh;
    }

    if !tracker.favorite_used {
        let favorites: Vec<_> = candidates
            .iter()
            .copied()
            .filter(|w| preferences.is_favorite(w))
            .collect();
        if !favorites.is_empty() {
            candidates = favorites;
        }
    }

    // min_by_key keeps the first of equal keys, so ties go to catalog order
    let workout = candidates.into_iter().min_by_key(|w| {
        let penalty = if preferences.is_disliked(w) { DISLIKED_PENALTY } else { 0 };
        Reverse(phase.intensity_fit(w.intensity) as i32 - penalty)
    })?;

    Some(Selection {
        workout,
        is_favorite: preferences.is_favorite(workout),
        injury_caution,
    })
}

fn select_meditation(phase: Phase, meditations: &[&WorkoutCatalogEntry]) -> WorkoutCatalogEntry {
    meditations
        .iter()
        .find(|m| m.applies_to(phase))
        .or_else(|| meditations.first())
        .map(|m| (*m).clone())
        .unwrap_or_else(WorkoutCatalogEntry::meditation_placeholder)
}

/// Day types for the 14 days starting at `start_date`.
///
/// Each 7-day half gets `frequency` workouts (clamped to 1..=6), one
/// meditation day and rest for the remainder. Preferred rest weekdays are
/// kept free of workouts first. The remaining free days are placed to keep
/// workout streaks short across the whole fortnight: the layout with the
/// shortest longest streak wins, then the smallest sum of squared streak
/// lengths, then the first layout found.
pub fn allocate_day_types(frequency: u8, start_date: NaiveDate, preferred_rest: &[Weekday]) -> Vec<DayType> {
    let workouts = frequency.clamp(1, 6) as u32;
    let free_days = DAYS_PER_WEEK as u32 - workouts;

    let weekdays: Vec<Weekday> = start_date
        .iter_days()
        .take(PLAN_HORIZON_DAYS)
        .map(|d| d.weekday())
        .collect();

    let half_masks: Vec<(u8, Vec<u8>)> = weekdays
        .chunks(DAYS_PER_WEEK)
        .map(|week| {
            let preferred = preferred_mask(week, preferred_rest, free_days);
            (preferred, free_day_layouts(free_days, preferred))
        })
        .collect();

    let (first_preferred, first_layouts) = &half_masks[0];
    let (second_preferred, second_layouts) = &half_masks[1];

    let best = first_layouts
        .iter()
        .flat_map(|a| second_layouts.iter().map(move |b| (*a, *b)))
        .min_by_key(|(a, b)| streak_score(*a, *b))
        .unwrap_or_default();

    let mut day_types = week_day_types(best.0, *first_preferred);
    day_types.extend(week_day_types(best.1, *second_preferred));
    day_types
}

/// Bitmask of preferred rest weekdays in a week, capped at `limit` days.
fn preferred_mask(week: &[Weekday], preferred_rest: &[Weekday], limit: u32) -> u8 {
    let mut mask = 0u8;
    for (index, weekday) in week.iter().enumerate() {
        if mask.count_ones() >= limit {
            break;
        }
        if preferred_rest.contains(weekday) {
            mask |= 1 << index;
        }
    }
    mask
}

/// Every 7-bit mask with `free_days` bits set that keeps `required` free.
fn free_day_layouts(free_days: u32, required: u8) -> Vec<u8> {
    (0u8..128)
        .filter(|mask| mask.count_ones() == free_days && mask & required == required)
        .collect()
}

fn streak_score(first: u8, second: u8) -> (u32, u32) {
    let free = first as u16 | ((second as u16) << DAYS_PER_WEEK);
    let mut longest = 0;
    let mut squares = 0;
    let mut run = 0;

    for index in 0..=PLAN_HORIZON_DAYS {
        if index < PLAN_HORIZON_DAYS && free & (1 << index) == 0 {
            run += 1;
        } else {
            longest = longest.max(run);
            squares += run * run;
            run = 0;
        }
    }

    (longest, squares)
}

/// Meditation takes the first free day that is not a preferred rest day,
/// or the last free day when every free day is preferred.
fn week_day_types(free: u8, preferred: u8) -> Vec<DayType> {
    let free_indices: Vec<usize> = (0..DAYS_PER_WEEK).filter(|i| free & (1 << i) != 0).collect();
    let meditation = free_indices
        .iter()
        .copied()
        .find(|i| preferred & (1 << i) == 0)
        .or_else(|| free_indices.last().copied());

    (0..DAYS_PER_WEEK)
        .map(|index| {
            if free & (1 << index) == 0 {
                DayType::Workout
            } else if Some(index) == meditation {
                DayType::Meditation
            } else {
                DayType::Rest
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Injury, IntensityTier, PlanActivity};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn longest_workout_streak(day_types: &[DayType]) -> usize {
        day_types
            .split(|d| *d != DayType::Workout)
            .map(|run| run.len())
            .max()
            .unwrap_or(0)
    }

    fn catalog() -> Vec<WorkoutCatalogEntry> {
        vec![
            WorkoutCatalogEntry::new("Restorative Yoga", IntensityTier::Low)
                .for_phases(&[Phase::Menstrual, Phase::Luteal])
                .with_tags(&["yoga"]),
            WorkoutCatalogEntry::new("HIIT Circuit", IntensityTier::High)
                .for_phases(&[Phase::Follicular, Phase::Ovulatory])
                .with_tags(&["hiit"])
                .with_contraindications(&["knee"]),
            WorkoutCatalogEntry::new("Power Pilates", IntensityTier::Moderate).with_tags(&["pilates"]),
            WorkoutCatalogEntry::new("Spin Class", IntensityTier::High)
                .for_phases(&[Phase::Follicular, Phase::Ovulatory])
                .with_tags(&["cycling"])
                .with_contraindications(&["knee"]),
            WorkoutCatalogEntry::new("Barre", IntensityTier::Moderate).with_tags(&["barre"]),
            WorkoutCatalogEntry::new("Breathwork", IntensityTier::Low).with_tags(&["meditation"]),
        ]
    }

    #[test]
    fn test_allocation_counts() {
        let start = date(2026, 5, 4);
        for frequency in 1..=6u8 {
            let day_types = allocate_day_types(frequency, start, &[]);
            assert_eq!(day_types.len(), 14);
            let count = |t: DayType| day_types.iter().filter(|d| **d == t).count();
            assert_eq!(count(DayType::Workout), 2 * frequency as usize);
            assert_eq!(count(DayType::Meditation), 2);
            assert_eq!(count(DayType::Rest), 12 - 2 * frequency as usize);
        }
    }

    #[test]
    fn test_allocation_avoids_long_streaks() {
        let start = date(2026, 5, 4);
        for frequency in 1..=5u8 {
            let day_types = allocate_day_types(frequency, start, &[]);
            assert!(longest_workout_streak(&day_types) <= 2, "frequency {}", frequency);
        }
    }

    #[test]
    fn test_preferred_rest_days_stay_free() {
        // 2026-05-04 is a Monday
        let start = date(2026, 5, 4);
        let day_types = allocate_day_types(4, start, &[Weekday::Sat, Weekday::Sun]);

        for (offset, day_type) in day_types.iter().enumerate() {
            let weekday = (start + Duration::days(offset as i64)).weekday();
            if weekday == Weekday::Sat || weekday == Weekday::Sun {
                assert_eq!(*day_type, DayType::Rest, "offset {}", offset);
            }
        }
    }

    #[test]
    fn test_generate_returns_fourteen_consecutive_days() {
        let scheduler = FitnessPlanScheduler::default();
        let profile = CycleProfile::new(28, 5, date(2026, 5, 1));
        let start = date(2026, 5, 4);
        let entries = scheduler.generate(&profile, &UserFitnessPreferences::with_frequency(4), start, &catalog());

        assert_eq!(entries.len(), 14);
        for (offset, entry) in entries.iter().enumerate() {
            assert_eq!(entry.date, start + Duration::days(offset as i64));
        }

        let breakdown = PlanBreakdown::from_entries(&entries);
        assert_eq!(breakdown.workout_days, 8);
        assert_eq!(breakdown.meditation_days, 2);
        assert_eq!(breakdown.rest_days, 4);
    }

    #[test]
    fn test_no_duplicate_names_within_a_week() {
        let scheduler = FitnessPlanScheduler::default();
        let profile = CycleProfile::new(28, 5, date(2026, 5, 1));
        let entries = scheduler.generate(
            &profile,
            &UserFitnessPreferences::with_frequency(3),
            date(2026, 5, 4),
            &catalog(),
        );

        for week in entries.chunks(7) {
            let names: Vec<&str> = week
                .iter()
                .filter_map(|e| e.workout_entry().map(|w| w.name.as_str()))
                .collect();
            let unique: HashSet<&str> = names.iter().copied().collect();
            assert_eq!(names.len(), unique.len());
        }
    }

    #[test]
    fn test_small_catalog_repeats_only_after_every_class_is_used() {
        let scheduler = FitnessPlanScheduler::default();
        let two_classes = vec![
            WorkoutCatalogEntry::new("Core Pilates", IntensityTier::Moderate),
            WorkoutCatalogEntry::new("Easy Jog", IntensityTier::Low),
        ];
        let entries = scheduler.generate(
            &CycleProfile::new(28, 5, date(2026, 5, 1)),
            &UserFitnessPreferences::with_frequency(4),
            date(2026, 5, 4),
            &two_classes,
        );

        let breakdown = PlanBreakdown::from_entries(&entries);
        assert_eq!(breakdown.workout_days, 8);

        for week in entries.chunks(7) {
            let names: Vec<&str> = week
                .iter()
                .filter_map(|e| e.workout_entry().map(|w| w.name.as_str()))
                .collect();
            assert_eq!(names.len(), 4);

            for (index, name) in names.iter().enumerate() {
                let earlier = &names[..index];
                if earlier.contains(name) {
                    assert!(
                        two_classes.iter().all(|c| earlier.contains(&c.name.as_str())),
                        "{} repeated before every class was used: {:?}",
                        name,
                        names
                    );
                }
            }
        }
    }

    #[test]
    fn test_disliked_tags_outweigh_intensity_fit() {
        let scheduler = FitnessPlanScheduler::default();
        // no start on record, so every day is follicular and favors high intensity
        let catalog = vec![
            WorkoutCatalogEntry::new("HIIT Circuit", IntensityTier::High).with_tags(&["hiit"]),
            WorkoutCatalogEntry::new("Barre", IntensityTier::Moderate).with_tags(&["barre"]),
        ];
        let preferences = UserFitnessPreferences {
            disliked_types: vec!["hiit".to_string()],
            ..UserFitnessPreferences::with_frequency(1)
        };
        let entries = scheduler.generate(&CycleProfile::default(), &preferences, date(2026, 5, 4), &catalog);

        let names: Vec<&str> = entries
            .iter()
            .filter_map(|e| e.workout_entry().map(|w| w.name.as_str()))
            .collect();
        assert_eq!(names, vec!["Barre", "Barre"]);
    }

    #[test]
    fn test_identical_inputs_give_identical_plans() {
        let scheduler = FitnessPlanScheduler::default();
        let profile = CycleProfile::new(31, 4, date(2026, 4, 20)).with_irregular(true);
        let preferences = UserFitnessPreferences {
            favorite_types: vec!["pilates".to_string()],
            disliked_types: vec!["cycling".to_string()],
            rest_days: vec![Weekday::Sun],
            injuries: vec![Injury::new("knee")],
            ..UserFitnessPreferences::with_frequency(4)
        };
        let start = date(2026, 5, 4);

        let first = scheduler.generate(&profile, &preferences, start, &catalog());
        let second = scheduler.generate(&profile, &preferences, start, &catalog());
        assert_eq!(first, second);
    }

    #[test]
    fn test_favorite_is_used_each_week() {
        let scheduler = FitnessPlanScheduler::default();
        let profile = CycleProfile::new(28, 5, date(2026, 5, 1));
        let preferences = UserFitnessPreferences {
            favorite_types: vec!["barre".to_string()],
            ..UserFitnessPreferences::with_frequency(2)
        };
        let entries = scheduler.generate(&profile, &preferences, date(2026, 5, 4), &catalog());

        for week in entries.chunks(7) {
            assert!(week
                .iter()
                .any(|e| e.is_favorite && e.activity_name() == Some("Barre")));
        }
    }

    #[test]
    fn test_injuries_filter_contraindicated_classes() {
        let scheduler = FitnessPlanScheduler::default();
        // follicular across the whole first week
        let profile = CycleProfile::new(35, 3, date(2026, 5, 1));
        let preferences = UserFitnessPreferences {
            injuries: vec![Injury::new("knee")],
            ..UserFitnessPreferences::with_frequency(3)
        };
        let entries = scheduler.generate(&profile, &preferences, date(2026, 5, 4), &catalog());

        assert!(entries
            .iter()
            .filter_map(|e| e.workout_entry())
            .all(|w| !w.contraindications.iter().any(|c| c == "knee")));
        assert!(entries.iter().all(|e| !e.injury_caution));
    }

    #[test]
    fn test_injury_caution_when_nothing_else_fits() {
        let scheduler = FitnessPlanScheduler::default();
        let only_running = vec![WorkoutCatalogEntry::new("Track Run", IntensityTier::High)
            .with_contraindications(&["knee"])];
        let preferences = UserFitnessPreferences {
            injuries: vec![Injury::new("knee")],
            ..UserFitnessPreferences::with_frequency(1)
        };
        let entries =
            scheduler.generate(&CycleProfile::default(), &preferences, date(2026, 5, 4), &only_running);

        let workouts: Vec<&PlanEntry> = entries.iter().filter(|e| e.day_type == DayType::Workout).collect();
        assert_eq!(workouts.len(), 2);
        assert!(workouts.iter().all(|e| e.injury_caution));
    }

    #[test]
    fn test_meditation_days_use_catalog_sessions() {
        let scheduler = FitnessPlanScheduler::default();
        let entries = scheduler.generate(
            &CycleProfile::default(),
            &UserFitnessPreferences::default(),
            date(2026, 5, 4),
            &catalog(),
        );

        let sessions: Vec<&str> = entries
            .iter()
            .filter_map(|e| match &e.activity {
                PlanActivity::Meditation { session } => Some(session.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(sessions, vec!["Breathwork", "Breathwork"]);
    }

    #[test]
    fn test_placeholder_meditation_without_catalog_sessions() {
        let scheduler = FitnessPlanScheduler::default();
        let catalog = vec![WorkoutCatalogEntry::new("Walk", IntensityTier::Low)];
        let entries = scheduler.generate(
            &CycleProfile::default(),
            &UserFitnessPreferences::default(),
            date(2026, 5, 4),
            &catalog,
        );
        assert!(entries
            .iter()
            .filter(|e| e.day_type == DayType::Meditation)
            .all(|e| e.activity_name() == Some("Guided Meditation")));
    }

    #[test]
    fn test_empty_catalog_gives_rest_only_plan() {
        let scheduler = FitnessPlanScheduler::default();
        let entries = scheduler.generate(
            &CycleProfile::default(),
            &UserFitnessPreferences::with_frequency(5),
            date(2026, 5, 4),
            &[],
        );
        assert_eq!(entries.len(), 14);
        assert!(entries.iter().all(|e| e.day_type == DayType::Rest));
    }

    #[test]
    fn test_custom_workouts_join_the_pool() {
        let scheduler = FitnessPlanScheduler::default();
        let preferences: UserFitnessPreferences = serde_json::from_value(serde_json::json!({
            "workouts_per_week": 1,
            "favorite_types": ["custom"],
            "custom_workouts": [{"name": "Lake Swim", "intensity": "moderate"}]
        }))
        .unwrap();
        let entries = scheduler.generate(&CycleProfile::default(), &preferences, date(2026, 5, 4), &catalog());

        assert!(entries.iter().any(|e| e.activity_name() == Some("Lake Swim")));
    }

    #[test]
    fn test_start_date_resolution() {
        let today = date(2026, 5, 4);
        assert_eq!(FitnessPlanScheduler::start_date_for(today, false), today);
        assert_eq!(FitnessPlanScheduler::start_date_for(today, true), date(2026, 5, 5));
    }
}
