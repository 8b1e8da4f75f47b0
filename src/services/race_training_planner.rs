use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

use crate::models::{
    CycleProfile, IntensityTier, RaceDay, RaceDayType, RaceGoal, RacePlan, RacePlanRequest, RaceType,
    RaceWeek, RaceWorkout, RaceWorkoutKind, RunnerLevel, TrainingPhase, LATE_LUTEAL_ADVISORY,
};
use crate::services::phase_calculator::PhaseCalculator;

const DAYS_PER_WEEK: i64 = 7;
const DOWN_WEEK_INTERVAL: usize = 4;
const DOWN_WEEK_FACTOR: f64 = 0.8;
const TAPER_CROSS_TRAIN_FACTOR: f64 = 0.75;

/// Multi-week race preparation planner.
#[derive(Clone, Default)]
pub struct RaceTrainingPlanner {
    calculator: PhaseCalculator,
}

impl RaceTrainingPlanner {
    pub fn new(calculator: PhaseCalculator) -> Self {
        Self { calculator }
    }

    pub fn generate(&self, request: &RacePlanRequest) -> RacePlan {
        if let Err(e) = request.validate() {
            warn!("Race plan request is invalid ({}), generating a best-effort plan", e);
        }
        if let Some(profile) = &request.cycle_profile {
            self.calculator.log_profile_warnings(profile);
        }

        let total_days = (request.race_date - request.training_start).num_days();
        let total_weeks = ((total_days / DAYS_PER_WEEK).max(1)) as usize;

        info!(
            "Generating {} week {} plan for {:?} runner, race on {}",
            total_weeks, request.race_type, request.runner_level, request.race_date
        );

        let weeks = (0..total_weeks)
            .map(|index| self.build_week(request, index, total_weeks))
            .collect();

        RacePlan {
            race_type: request.race_type,
            race_date: request.race_date,
            training_start: request.training_start,
            runner_level: request.runner_level,
            goal: request.goal,
            total_weeks,
            weeks,
        }
    }

    fn build_week(&self, request: &RacePlanRequest, index: usize, total_weeks: usize) -> RaceWeek {
        let phase = TrainingPhase::for_fraction(index as f64 / total_weeks as f64);
        let is_down_week = (index + 1) % DOWN_WEEK_INTERVAL == 0 && phase != TrainingPhase::Taper;
        let start_date = request.training_start + Duration::days(index as i64 * DAYS_PER_WEEK);

        let run_days = request.run_days.min(7) as usize;
        let cross_train_days = (request.cross_train_days as usize).min(7 - run_days);

        let race_inside_plan = request.race_date >= request.training_start;
        let mut days = Vec::with_capacity(DAYS_PER_WEEK as usize);

        for position in 0..DAYS_PER_WEEK as usize {
            let date = start_date + Duration::days(position as i64);
            if race_inside_plan && date > request.race_date {
                break;
            }

            let (day_type, workout) = if date == request.race_date {
                (RaceDayType::Race, Some(race_workout(request)))
            } else if position < run_days {
                let kind = run_kind(position, run_days, phase, is_down_week);
                (RaceDayType::Run, Some(run_workout(request, kind, phase, is_down_week)))
            } else if position < run_days + cross_train_days {
                (RaceDayType::CrossTrain, Some(cross_training(request.runner_level, phase)))
            } else {
                (RaceDayType::Rest, None)
            };

            days.push(self.with_cycle_advice(
                RaceDay {
                    date,
                    day_type,
                    workout,
                    cycle_phase: None,
                    advisory: None,
                },
                request.cycle_profile.as_ref(),
            ));
        }

        let total_distance_km = round_tenth(
            days.iter()
                .filter_map(|d| d.workout.as_ref().and_then(|w| w.distance_km))
                .sum(),
        );

        debug!(
            "Week {}: {} ({}), {:.1} km",
            index + 1,
            phase,
            if is_down_week { "down week" } else { "build" },
            total_distance_km
        );

        RaceWeek {
            week_number: index + 1,
            start_date,
            phase,
            is_down_week,
            total_distance_km,
            days,
        }
    }

    /// Advisories only annotate; distances and durations stay as planned.
    fn with_cycle_advice(&self, mut day: RaceDay, profile: Option<&CycleProfile>) -> RaceDay {
        let Some(profile) = profile else {
            return day;
        };

        let detail = self.calculator.phase_detail(day.date, profile);
        day.cycle_phase = Some(detail.phase);

        if day.day_type != RaceDayType::Rest {
            day.advisory = if detail.late_luteal {
                Some(LATE_LUTEAL_ADVISORY.to_string())
            } else {
                detail.phase.traits().race_advisory.map(str::to_string)
            };
        }

        day
    }
}

fn run_kind(position: usize, run_days: usize, phase: TrainingPhase, is_down_week: bool) -> RaceWorkoutKind {
    let kind = if run_days == 1 {
        match phase {
            TrainingPhase::Taper => RaceWorkoutKind::EasyRun,
            _ => RaceWorkoutKind::LongRun,
        }
    } else if position == 0 {
        RaceWorkoutKind::EasyRun
    } else if position == run_days - 1 {
        RaceWorkoutKind::LongRun
    } else {
        let middle = position - 1;
        match phase {
            TrainingPhase::BaseBuilding => RaceWorkoutKind::EasyRun,
            TrainingPhase::Interval => RaceWorkoutKind::Intervals,
            TrainingPhase::SpeedStrength if middle % 2 == 0 => RaceWorkoutKind::Speed,
            TrainingPhase::SpeedStrength => RaceWorkoutKind::Hills,
            TrainingPhase::Taper if middle == 0 => RaceWorkoutKind::Tempo,
            TrainingPhase::Taper => RaceWorkoutKind::EasyRun,
        }
    };

    if is_down_week && is_quality(kind) {
        RaceWorkoutKind::EasyRun
    } else {
        kind
    }
}

fn is_quality(kind: RaceWorkoutKind) -> bool {
    matches!(
        kind,
        RaceWorkoutKind::Tempo | RaceWorkoutKind::Intervals | RaceWorkoutKind::Speed | RaceWorkoutKind::Hills
    )
}

/// Easy-run distance in km for a race and runner level.
pub fn base_distance_km(race_type: RaceType, level: RunnerLevel) -> f64 {
    use RunnerLevel::*;

    match (race_type, level) {
        (RaceType::FiveK, Beginner) => 3.0,
        (RaceType::FiveK, Intermediate) => 5.0,
        (RaceType::FiveK, Advanced) => 6.0,
        (RaceType::TenK, Beginner) => 5.0,
        (RaceType::TenK, Intermediate) => 7.0,
        (RaceType::TenK, Advanced) => 9.0,
        (RaceType::HalfMarathon, Beginner) => 8.0,
        (RaceType::HalfMarathon, Intermediate) => 11.0,
        (RaceType::HalfMarathon, Advanced) => 14.0,
        (RaceType::Marathon, Beginner) => 10.0,
        (RaceType::Marathon, Intermediate) => 14.0,
        (RaceType::Marathon, Advanced) => 18.0,
    }
}

fn phase_multiplier(phase: TrainingPhase) -> f64 {
    match phase {
        TrainingPhase::BaseBuilding => 1.0,
        TrainingPhase::Interval => 1.1,
        TrainingPhase::SpeedStrength => 1.15,
        TrainingPhase::Taper => 0.6,
    }
}

fn kind_multiplier(kind: RaceWorkoutKind) -> f64 {
    match kind {
        RaceWorkoutKind::EasyRun => 1.0,
        RaceWorkoutKind::Tempo => 0.9,
        RaceWorkoutKind::Intervals => 0.8,
        RaceWorkoutKind::Speed | RaceWorkoutKind::Hills => 0.7,
        RaceWorkoutKind::LongRun => 1.6,
        RaceWorkoutKind::CrossTraining | RaceWorkoutKind::Race => 1.0,
    }
}

/// Easy pace in minutes per km.
fn easy_pace(level: RunnerLevel) -> f64 {
    match level {
        RunnerLevel::Beginner => 7.5,
        RunnerLevel::Intermediate => 6.5,
        RunnerLevel::Advanced => 5.5,
    }
}

fn pace_factor(kind: RaceWorkoutKind) -> f64 {
    match kind {
        RaceWorkoutKind::EasyRun | RaceWorkoutKind::CrossTraining => 1.0,
        RaceWorkoutKind::LongRun => 1.05,
        RaceWorkoutKind::Tempo => 0.9,
        RaceWorkoutKind::Intervals => 0.85,
        RaceWorkoutKind::Speed => 0.8,
        RaceWorkoutKind::Hills => 0.95,
        RaceWorkoutKind::Race => 0.92,
    }
}

fn run_workout(
    request: &RacePlanRequest,
    kind: RaceWorkoutKind,
    phase: TrainingPhase,
    is_down_week: bool,
) -> RaceWorkout {
    let mut distance = base_distance_km(request.race_type, request.runner_level)
        * phase_multiplier(phase)
        * kind_multiplier(kind);
    if is_down_week {
        distance *= DOWN_WEEK_FACTOR;
    }
    let distance = round_tenth(distance);

    let intensity = if is_quality(kind) {
        match request.goal {
            RaceGoal::Finish => IntensityTier::Moderate,
            RaceGoal::PersonalBest => IntensityTier::High,
        }
    } else {
        IntensityTier::Low
    };

    RaceWorkout {
        kind,
        distance_km: Some(distance),
        duration_minutes: minutes_for(distance, request.runner_level, kind),
        intensity,
        description: describe(kind, distance),
    }
}

fn race_workout(request: &RacePlanRequest) -> RaceWorkout {
    let distance = request.race_type.distance_km();
    RaceWorkout {
        kind: RaceWorkoutKind::Race,
        distance_km: Some(distance),
        duration_minutes: minutes_for(distance, request.runner_level, RaceWorkoutKind::Race),
        intensity: IntensityTier::High,
        description: format!("Race day: {} ({:.1} km)", request.race_type, distance),
    }
}

fn cross_training(level: RunnerLevel, phase: TrainingPhase) -> RaceWorkout {
    let minutes = match level {
        RunnerLevel::Beginner => 30.0,
        RunnerLevel::Intermediate => 40.0,
        RunnerLevel::Advanced => 45.0,
    };
    let minutes = if phase == TrainingPhase::Taper {
        minutes * TAPER_CROSS_TRAIN_FACTOR
    } else {
        minutes
    };

    RaceWorkout {
        kind: RaceWorkoutKind::CrossTraining,
        distance_km: None,
        duration_minutes: minutes.round() as u32,
        intensity: IntensityTier::Low,
        description: format!("{} min low-impact cross-training (bike, swim or strength)", minutes.round()),
    }
}

fn minutes_for(distance: f64, level: RunnerLevel, kind: RaceWorkoutKind) -> u32 {
    (distance * easy_pace(level) * pace_factor(kind)).round() as u32
}

fn describe(kind: RaceWorkoutKind, distance: f64) -> String {
    match kind {
        RaceWorkoutKind::EasyRun => format!("Easy run: {:.1} km at conversational pace", distance),
        RaceWorkoutKind::LongRun => format!("Long run: {:.1} km, steady and relaxed", distance),
        RaceWorkoutKind::Tempo => format!("Tempo run: {:.1} km with the middle third at comfortably hard effort", distance),
        RaceWorkoutKind::Intervals => format!("Intervals: {:.1} km total, 400-800 m repeats with jog recoveries", distance),
        RaceWorkoutKind::Speed => format!("Speed work: {:.1} km total, short fast strides and 200 m repeats", distance),
        RaceWorkoutKind::Hills => format!("Hill repeats: {:.1} km total, strong uphill efforts and easy descents", distance),
        RaceWorkoutKind::CrossTraining | RaceWorkoutKind::Race => format!("{:.1} km", distance),
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phase;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(weeks: i64) -> RacePlanRequest {
        let training_start = date(2026, 3, 2);
        RacePlanRequest {
            race_type: RaceType::HalfMarathon,
            race_date: training_start + Duration::days(weeks * 7),
            training_start,
            runner_level: RunnerLevel::Intermediate,
            run_days: 4,
            cross_train_days: 1,
            rest_days: 2,
            goal: RaceGoal::PersonalBest,
            cycle_profile: None,
        }
    }

    #[test]
    fn test_week_phases_follow_fractions() {
        let plan = RaceTrainingPlanner::default().generate(&request(10));
        assert_eq!(plan.total_weeks, 10);

        let phases: Vec<TrainingPhase> = plan.weeks.iter().map(|w| w.phase).collect();
        use TrainingPhase::*;
        assert_eq!(
            phases,
            vec![
                BaseBuilding, BaseBuilding, BaseBuilding, BaseBuilding, Interval, Interval, Interval,
                SpeedStrength, SpeedStrength, Taper
            ]
        );
    }

    #[test]
    fn test_every_fourth_week_is_down_week() {
        let plan = RaceTrainingPlanner::default().generate(&request(12));
        let down: Vec<usize> = plan
            .weeks
            .iter()
            .filter(|w| w.is_down_week)
            .map(|w| w.week_number)
            .collect();
        assert_eq!(down, vec![4, 8]);

        // Week 12 is taper and not reduced twice.
        assert_eq!(plan.weeks[11].phase, TrainingPhase::Taper);
        assert!(!plan.weeks[11].is_down_week);
    }

    #[test]
    fn test_down_week_turns_quality_into_easy_runs() {
        let plan = RaceTrainingPlanner::default().generate(&request(10));
        // Week 8 is speed/strength and a down week.
        let week = &plan.weeks[7];
        assert!(week.is_down_week);
        assert!(week
            .days
            .iter()
            .filter_map(|d| d.workout.as_ref())
            .all(|w| !is_quality(w.kind)));
    }

    #[test]
    fn test_day_layout_by_position() {
        let plan = RaceTrainingPlanner::default().generate(&request(10));
        let week = &plan.weeks[4];
        let types: Vec<RaceDayType> = week.days.iter().map(|d| d.day_type).collect();
        assert_eq!(
            types,
            vec![
                RaceDayType::Run,
                RaceDayType::Run,
                RaceDayType::Run,
                RaceDayType::Run,
                RaceDayType::CrossTrain,
                RaceDayType::Rest,
                RaceDayType::Rest
            ]
        );

        let kinds: Vec<RaceWorkoutKind> = week.days[..4]
            .iter()
            .filter_map(|d| d.workout.as_ref().map(|w| w.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                RaceWorkoutKind::EasyRun,
                RaceWorkoutKind::Intervals,
                RaceWorkoutKind::Intervals,
                RaceWorkoutKind::LongRun
            ]
        );
        assert_eq!(week.days[1].workout.as_ref().unwrap().intensity, IntensityTier::High);
    }

    #[test]
    fn test_distances_scale_with_phase() {
        let plan = RaceTrainingPlanner::default().generate(&request(10));
        let long_run = |week: usize| {
            plan.weeks[week]
                .days
                .iter()
                .find_map(|d| d.workout.as_ref().filter(|w| w.kind == RaceWorkoutKind::LongRun))
                .and_then(|w| w.distance_km)
                .unwrap()
        };

        assert_eq!(long_run(0), 17.6);
        assert_eq!(long_run(4), 19.4);
        assert_eq!(long_run(9), 10.6);
    }

    #[test]
    fn test_race_day_ends_the_plan() {
        let mut req = request(3);
        req.race_date = req.training_start + Duration::days(17);
        let plan = RaceTrainingPlanner::default().generate(&req);

        assert_eq!(plan.total_weeks, 2);
        let last = plan.days().last().unwrap();
        assert!(last.date < req.race_date);

        req.race_date = req.training_start + Duration::days(6);
        let plan = RaceTrainingPlanner::default().generate(&req);
        assert_eq!(plan.total_weeks, 1);
        let last = plan.days().last().unwrap();
        assert_eq!(last.date, req.race_date);
        assert_eq!(last.day_type, RaceDayType::Race);
        assert_eq!(last.workout.as_ref().unwrap().distance_km, Some(21.1));
    }

    #[test]
    fn test_short_lead_time_gives_single_week() {
        let mut req = request(0);
        req.race_date = req.training_start + Duration::days(3);
        let plan = RaceTrainingPlanner::default().generate(&req);
        assert_eq!(plan.total_weeks, 1);
        assert_eq!(plan.weeks[0].days.len(), 4);
    }

    #[test]
    fn test_excess_day_counts_are_truncated() {
        let mut req = request(8);
        req.run_days = 6;
        req.cross_train_days = 3;
        req.rest_days = 2;
        let plan = RaceTrainingPlanner::default().generate(&req);
        let week = &plan.weeks[0];
        let runs = week.days.iter().filter(|d| d.day_type == RaceDayType::Run).count();
        let cross = week.days.iter().filter(|d| d.day_type == RaceDayType::CrossTrain).count();
        assert_eq!(runs, 6);
        assert_eq!(cross, 1);
        assert_eq!(week.days.len(), 7);
    }

    #[test]
    fn test_cycle_advisories_do_not_change_numbers() {
        let plain = RaceTrainingPlanner::default().generate(&request(6));

        let mut req = request(6);
        req.cycle_profile = Some(CycleProfile::new(28, 5, req.training_start));
        let advised = RaceTrainingPlanner::default().generate(&req);

        for (a, b) in plain.days().zip(advised.days()) {
            assert_eq!(a.workout, b.workout);
            assert!(b.cycle_phase.is_some());
            if b.day_type == RaceDayType::Rest {
                assert!(b.advisory.is_none());
            }
        }

        let first = &advised.weeks[0].days[0];
        assert_eq!(first.cycle_phase, Some(Phase::Menstrual));
        assert!(first.advisory.is_some());

        // Cycle day 25 of 28 sits in the late luteal window.
        let late = &advised.weeks[3].days[3];
        assert_eq!(late.cycle_phase, Some(Phase::Luteal));
        assert_eq!(late.advisory.as_deref(), Some(LATE_LUTEAL_ADVISORY));
    }
}
