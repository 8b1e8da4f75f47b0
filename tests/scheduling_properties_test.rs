use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use std::collections::HashSet;

use cyclefit::config::default_catalog;
use cyclefit::models::*;
use cyclefit::services::{allocate_day_types, CyclePredictor, FitnessPlanScheduler, PhaseCalculator};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

fn weekday_strategy() -> impl Strategy<Value = Weekday> {
    (0u8..7).prop_map(|n| match n {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    })
}

proptest! {
    #[test]
    fn phase_is_a_total_step_function(cycle_length in 21i32..=45, period in 2i32..=7, start_offset in 0i64..400) {
        let calculator = PhaseCalculator::new();
        let start = base_date() + Duration::days(start_offset);
        let profile = CycleProfile::new(cycle_length, period, start);
        let boundaries = calculator.boundaries(&profile);

        let mut previous = Phase::Menstrual;
        for cycle_day in 1..=cycle_length {
            let date = start + Duration::days((cycle_day - 1) as i64);
            let phase = calculator.phase_for_date(date, &profile);

            prop_assert!(Phase::SOLAR.contains(&phase));
            prop_assert_eq!(phase, boundaries.classify(cycle_day));
            // phases never step backwards inside a cycle
            prop_assert!(phase as usize >= previous as usize);
            previous = phase;

            let next_cycle = date + Duration::days(cycle_length as i64);
            prop_assert_eq!(calculator.phase_for_date(next_cycle, &profile), phase);
        }
    }

    #[test]
    fn predicted_starts_are_spaced_by_cycle_length(
        cycle_length in 21i32..=45,
        period in 2i32..=7,
        start_offset in 0i64..60,
        today_offset in 0i64..60,
    ) {
        let predictor = CyclePredictor::new(PhaseCalculator::new());
        let profile = CycleProfile::new(cycle_length, period, base_date() + Duration::days(start_offset));
        let prediction = predictor.predict(&profile, base_date() + Duration::days(today_offset));
        let starts = prediction.predicted_starts();

        prop_assert_eq!(starts.len(), 3);
        for pair in starts.windows(2) {
            prop_assert_eq!((pair[1] - pair[0]).num_days(), cycle_length as i64);
        }
    }

    #[test]
    fn widening_dates_are_union_of_windows(
        cycle_length in 21i32..=45,
        irregular in any::<bool>(),
        today_offset in 0i64..30,
    ) {
        let predictor = CyclePredictor::new(PhaseCalculator::new());
        let profile = CycleProfile::new(cycle_length, 5, base_date()).with_irregular(irregular);
        let today = base_date() + Duration::days(today_offset);
        let prediction = predictor.predict(&profile, today);

        let expected: HashSet<NaiveDate> = if irregular {
            prediction
                .predicted_starts()
                .iter()
                .flat_map(|start| (-4..=4).map(move |d| *start + Duration::days(d)))
                .filter(|d| prediction.daily_phases.iter().any(|p| p.date == *d))
                .collect()
        } else {
            HashSet::new()
        };
        let actual: HashSet<NaiveDate> = prediction.widening_dates().into_iter().collect();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn plan_has_fourteen_consecutive_entries(
        frequency in 1u8..=6,
        cycle_length in 21i32..=45,
        start_offset in 0i64..60,
        rest_days in proptest::collection::vec(weekday_strategy(), 0..3),
    ) {
        let scheduler = FitnessPlanScheduler::default();
        let profile = CycleProfile::new(cycle_length, 5, base_date());
        let preferences = UserFitnessPreferences {
            rest_days,
            ..UserFitnessPreferences::with_frequency(frequency)
        };
        let start = base_date() + Duration::days(start_offset);
        let entries = scheduler.generate(&profile, &preferences, start, &default_catalog());

        prop_assert_eq!(entries.len(), 14);
        for (offset, entry) in entries.iter().enumerate() {
            prop_assert_eq!(entry.date, start + Duration::days(offset as i64));
            prop_assert_eq!(entry.status, PlanEntryStatus::Suggested);
        }

        let breakdown = PlanBreakdown::from_entries(&entries);
        prop_assert_eq!(breakdown.workout_days, 2 * frequency as usize);
        prop_assert_eq!(breakdown.meditation_days, 2);
        prop_assert_eq!(breakdown.rest_days, 12 - 2 * frequency as usize);
    }

    #[test]
    fn allocation_respects_preferred_rest_days(
        frequency in 1u8..=6,
        start_offset in 0i64..7,
        rest_days in proptest::collection::vec(weekday_strategy(), 0..4),
    ) {
        let start = base_date() + Duration::days(start_offset);
        let day_types = allocate_day_types(frequency, start, &rest_days);
        let unique: HashSet<Weekday> = rest_days.iter().copied().collect();

        // Only checkable when every preferred day fits in the free slots.
        prop_assume!(unique.len() <= 7 - frequency as usize);
        for (offset, day_type) in day_types.iter().enumerate() {
            let weekday = (start + Duration::days(offset as i64)).weekday();
            if unique.contains(&weekday) {
                prop_assert_ne!(*day_type, DayType::Workout);
            }
        }
    }

    #[test]
    fn no_repeated_class_within_a_week(frequency in 1u8..=6, cycle_length in 21i32..=45, start_offset in 0i64..60) {
        let scheduler = FitnessPlanScheduler::default();
        let profile = CycleProfile::new(cycle_length, 5, base_date());
        let entries = scheduler.generate(
            &profile,
            &UserFitnessPreferences::with_frequency(frequency),
            base_date() + Duration::days(start_offset),
            &default_catalog(),
        );

        for week in entries.chunks(7) {
            let names: Vec<&str> = week
                .iter()
                .filter_map(|e| e.workout_entry().map(|w| w.name.as_str()))
                .collect();
            let unique: HashSet<&str> = names.iter().copied().collect();
            prop_assert_eq!(names.len(), unique.len());
        }
    }

    #[test]
    fn favorite_is_scheduled_each_week(frequency in 1u8..=6, cycle_length in 21i32..=45, start_offset in 0i64..60) {
        let scheduler = FitnessPlanScheduler::default();
        let profile = CycleProfile::new(cycle_length, 5, base_date());
        // "mobility" is tagged on an all-phase class, so it applies on every workout day.
        let preferences = UserFitnessPreferences {
            favorite_types: vec!["mobility".to_string()],
            ..UserFitnessPreferences::with_frequency(frequency)
        };
        let entries = scheduler.generate(
            &profile,
            &preferences,
            base_date() + Duration::days(start_offset),
            &default_catalog(),
        );

        for week in entries.chunks(7) {
            prop_assert!(week.iter().any(|e| e.is_favorite));
        }
    }

    #[test]
    fn serialized_profile_predicts_identically(
        cycle_length in 21i32..=45,
        period in 2i32..=7,
        irregular in any::<bool>(),
    ) {
        let predictor = CyclePredictor::new(PhaseCalculator::new());
        let profile = CycleProfile::new(cycle_length, period, base_date()).with_irregular(irregular);
        let reloaded: CycleProfile = serde_json::from_str(&serde_json::to_string(&profile).unwrap()).unwrap();

        prop_assert_eq!(&reloaded, &profile);
        let today = base_date() + Duration::days(3);
        prop_assert_eq!(predictor.predict(&profile, today), predictor.predict(&reloaded, today));
    }
}

#[test]
fn twenty_eight_day_cycle_boundaries() {
    let calculator = PhaseCalculator::new();
    let start = base_date();
    let profile = CycleProfile::new(28, 5, start);

    let phases: Vec<Phase> = (0..28)
        .map(|offset| calculator.phase_for_date(start + Duration::days(offset), &profile))
        .collect();

    assert!(phases[0..5].iter().all(|p| *p == Phase::Menstrual));
    assert!(phases[5..13].iter().all(|p| *p == Phase::Follicular));
    assert!(phases[13..16].iter().all(|p| *p == Phase::Ovulatory));
    assert!(phases[16..28].iter().all(|p| *p == Phase::Luteal));
}

#[test]
fn four_workouts_a_week_gives_eight_two_four() {
    let day_types = allocate_day_types(4, base_date(), &[]);
    let count = |t: DayType| day_types.iter().filter(|d| **d == t).count();
    assert_eq!(count(DayType::Workout), 8);
    assert_eq!(count(DayType::Meditation), 2);
    assert_eq!(count(DayType::Rest), 4);
}
