use colored::{ColoredString, Colorize};
use cyclefit::models::{
    CyclePrediction, CycleSummary, DayType, Phase, PhaseDetail, PlanActivity, PlanBreakdown, PlanEntry,
    ProfileWarning, RaceDayType, RacePlan, WorkoutCatalogEntry,
};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn phase_label(phase: Phase) -> ColoredString {
    let name = phase.display_name();
    match phase.solar_counterpart() {
        Phase::Menstrual => name.red(),
        Phase::Follicular => name.green(),
        Phase::Ovulatory => name.yellow(),
        _ => name.magenta(),
    }
}

fn header(title: &str) {
    println!("{}", title.bold());
    println!("────────────────────────────────");
}

pub fn print_warnings(warnings: &[ProfileWarning]) {
    for warning in warnings {
        println!("{} {}", "!".yellow().bold(), warning);
    }
}

pub fn print_phase(detail: &PhaseDetail, summary: &CycleSummary, date_format: &str) {
    header("Cycle Phase");
    println!("Date:        {}", detail.date.format(date_format));
    println!("Phase:       {}", phase_label(detail.phase));
    if let Some(day) = detail.cycle_day {
        println!("Cycle day:   {}", day);
    }
    println!("Energy:      {}", detail.phase.traits().energy);
    if let (Some(next), Some(days)) = (summary.next_cycle_start, summary.days_until_next_cycle) {
        println!("Next cycle:  {} ({} days)", next.format(date_format), days);
    }
    if summary.in_fertile_window {
        println!("{}", "Fertile window".cyan());
    }
    if detail.late_luteal {
        println!("{}", "Late luteal: consider easing intensity".dimmed());
    }
}

pub fn print_prediction(prediction: &CyclePrediction, date_format: &str) {
    header("Predicted Cycles");
    if prediction.predicted_cycles.is_empty() {
        println!("No cycle start on record.");
    }
    for cycle in &prediction.predicted_cycles {
        println!(
            "{} → {}",
            cycle.start.format(date_format),
            cycle.end.format(date_format)
        );
    }

    println!();
    header("Daily Phases");
    let mut current: Option<Phase> = None;
    for day in &prediction.daily_phases {
        if current != Some(day.phase) {
            println!("{}  {}", day.date.format(date_format), phase_label(day.phase));
            current = Some(day.phase);
        }
    }

    let widening = prediction.widening_dates();
    if let (Some(first), Some(last)) = (widening.first(), widening.last()) {
        println!();
        println!(
            "{} {} days between {} and {} are uncertain",
            "~".yellow(),
            widening.len(),
            first.format(date_format),
            last.format(date_format)
        );
    }
}

fn entry_line(entry: &PlanEntry) -> String {
    match &entry.activity {
        PlanActivity::Workout { workout } => {
            let mut line = format!("{} ({})", workout.name.bold(), workout.intensity);
            if let Some(minutes) = workout.duration_minutes {
                line.push_str(&format!(" {} min", minutes));
            }
            if entry.is_favorite {
                line.push_str(&format!(" {}", "★".yellow()));
            }
            if entry.injury_caution {
                line.push_str(&format!(" {}", "mind your injury".red()));
            }
            line
        }
        PlanActivity::Meditation { session } => format!("{}", session.name.cyan()),
        PlanActivity::Rest => format!("{}", "Rest".dimmed()),
    }
}

pub fn print_plan(entries: &[PlanEntry], date_format: &str) {
    header("Fitness Plan");
    for (index, entry) in entries.iter().enumerate() {
        if index == 7 {
            println!();
        }
        let marker = match entry.day_type {
            DayType::Workout => "W",
            DayType::Meditation => "M",
            DayType::Rest => "-",
        };
        println!(
            "{}  {}  {:<28} {}",
            entry.date.format(date_format),
            marker,
            phase_label(entry.phase),
            entry_line(entry)
        );
    }

    let breakdown = PlanBreakdown::from_entries(entries);
    println!();
    println!(
        "{} workouts, {} meditations, {} rest days",
        breakdown.workout_days, breakdown.meditation_days, breakdown.rest_days
    );
}

pub fn print_race_plan(plan: &RacePlan, date_format: &str) {
    header(&format!("{} Training Plan", plan.race_type));
    println!(
        "{} weeks from {} to race day {}",
        plan.total_weeks,
        plan.training_start.format(date_format),
        plan.race_date.format(date_format)
    );

    for week in &plan.weeks {
        println!();
        let title = format!("Week {}: {} ({:.1} km)", week.week_number, week.phase, week.total_distance_km);
        if week.is_down_week {
            println!("{} {}", title.bold(), "down week".dimmed());
        } else {
            println!("{}", title.bold());
        }

        for day in &week.days {
            let description = match (&day.workout, day.day_type) {
                (Some(workout), RaceDayType::Race) => workout.description.red().bold().to_string(),
                (Some(workout), _) => workout.description.clone(),
                (None, _) => "Rest".dimmed().to_string(),
            };
            println!("  {}  {}", day.date.format(date_format), description);
            if let Some(advisory) = &day.advisory {
                println!("      {}", advisory.italic());
            }
        }
    }
}

pub fn print_catalog(catalog: &[WorkoutCatalogEntry]) {
    header("Workout Catalog");
    for entry in catalog {
        let phases: Vec<String> = entry.phases.iter().map(|p| String::from(*p)).collect();
        println!(
            "{:<24} {:<9} {:<28} {}",
            entry.name.bold(),
            entry.intensity.to_string(),
            phases.join(", "),
            entry.type_tags.join(", ").dimmed()
        );
    }
}
