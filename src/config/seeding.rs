use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::models::{IntensityTier, Phase, WorkoutCatalogEntry};

/// Built-in studio classes and meditation sessions, in selection order.
pub fn default_catalog() -> Vec<WorkoutCatalogEntry> {
    use IntensityTier::*;
    use Phase::*;

    vec![
        // Menstrual
        WorkoutCatalogEntry::new("Restorative Yoga", Low)
            .for_phases(&[Menstrual])
            .with_tags(&["yoga", "recovery"])
            .with_instructor("Maya")
            .with_duration(30)
            .with_equipment(&["mat", "bolster"])
            .with_benefits(&["Eases cramps", "Lowers stress"]),
        WorkoutCatalogEntry::new("Gentle Walk", Low)
            .for_phases(&[Menstrual, Luteal])
            .with_tags(&["walking", "outdoor"])
            .with_duration(25)
            .with_benefits(&["Light circulation", "Mood support"]),
        WorkoutCatalogEntry::new("Yin Stretch", Low)
            .for_phases(&[Menstrual])
            .with_tags(&["yoga", "mobility"])
            .with_instructor("Leah")
            .with_duration(20)
            .with_equipment(&["mat"])
            .with_benefits(&["Hip and lower back release"]),
        // Follicular
        WorkoutCatalogEntry::new("HIIT Circuit", High)
            .for_phases(&[Follicular, Ovulatory])
            .with_tags(&["hiit", "cardio"])
            .with_instructor("Jordan")
            .with_duration(30)
            .with_benefits(&["Builds aerobic capacity"])
            .with_contraindications(&["knee", "ankle"]),
        WorkoutCatalogEntry::new("Dance Cardio", Moderate)
            .for_phases(&[Follicular])
            .with_tags(&["dance", "cardio"])
            .with_instructor("Sam")
            .with_duration(35)
            .with_benefits(&["Coordination", "Rising energy outlet"])
            .with_contraindications(&["ankle"]),
        WorkoutCatalogEntry::new("Power Vinyasa", Moderate)
            .for_phases(&[Follicular])
            .with_tags(&["yoga", "strength"])
            .with_instructor("Maya")
            .with_duration(45)
            .with_equipment(&["mat"])
            .with_contraindications(&["wrist"]),
        // Ovulatory
        WorkoutCatalogEntry::new("Strength Training", High)
            .for_phases(&[Ovulatory, Follicular])
            .with_tags(&["strength", "weights"])
            .with_instructor("Alex")
            .with_duration(45)
            .with_equipment(&["dumbbells", "bench"])
            .with_benefits(&["Peak force output"])
            .with_contraindications(&["back", "shoulder"]),
        WorkoutCatalogEntry::new("Spin Intervals", High)
            .for_phases(&[Ovulatory])
            .with_tags(&["cycling", "cardio"])
            .with_instructor("Jordan")
            .with_duration(40)
            .with_equipment(&["bike"])
            .with_contraindications(&["knee"]),
        WorkoutCatalogEntry::new("Kickboxing", High)
            .for_phases(&[Ovulatory])
            .with_tags(&["boxing", "cardio"])
            .with_duration(40)
            .with_equipment(&["gloves"])
            .with_contraindications(&["wrist", "shoulder"]),
        // Luteal
        WorkoutCatalogEntry::new("Mat Pilates", Moderate)
            .for_phases(&[Luteal])
            .with_tags(&["pilates", "core"])
            .with_instructor("Leah")
            .with_duration(40)
            .with_equipment(&["mat"])
            .with_benefits(&["Core stability"]),
        WorkoutCatalogEntry::new("Barre Sculpt", Moderate)
            .for_phases(&[Luteal, Follicular])
            .with_tags(&["barre", "strength"])
            .with_instructor("Sam")
            .with_duration(35)
            .with_benefits(&["Muscular endurance"]),
        WorkoutCatalogEntry::new("Steady Swim", Moderate)
            .for_phases(&[Luteal])
            .with_tags(&["swimming", "cardio"])
            .with_duration(30)
            .with_benefits(&["Low impact", "Cooling"])
            .with_contraindications(&["shoulder"]),
        // Any phase
        WorkoutCatalogEntry::new("Mobility Flow", Low)
            .with_tags(&["mobility"])
            .with_duration(20)
            .with_equipment(&["mat"]),
        WorkoutCatalogEntry::new("Full Body Pilates", Moderate)
            .with_tags(&["pilates"])
            .with_instructor("Leah")
            .with_duration(45),
        // Meditation
        WorkoutCatalogEntry::new("Body Scan Meditation", Low)
            .for_phases(&[Menstrual, Luteal])
            .with_tags(&["meditation"])
            .with_instructor("Maya")
            .with_duration(15)
            .with_benefits(&["Rest", "Body awareness"]),
        WorkoutCatalogEntry::new("Energising Breathwork", Low)
            .for_phases(&[Follicular, Ovulatory])
            .with_tags(&["meditation", "breathwork"])
            .with_duration(10)
            .with_benefits(&["Focus"]),
    ]
}

/// Catalog from a JSON file, or the built-in one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Vec<WorkoutCatalogEntry>> {
    let Some(path) = path else {
        return Ok(default_catalog());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let catalog: Vec<WorkoutCatalogEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

    tracing::info!("Loaded {} catalog entries from {}", catalog.len(), path.display());
    Ok(catalog)
}
