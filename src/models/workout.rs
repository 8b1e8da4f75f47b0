use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::phase::{IntensityTier, Phase, PhaseTag};
use crate::errors::PlanError;

pub const MEDITATION_TAG: &str = "meditation";
pub const CUSTOM_TAG: &str = "custom";
pub const MAX_WORKOUTS_PER_WEEK: u8 = 6;

/// Immutable reference data describing one class in the workout catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkoutCatalogEntry {
    pub name: String,
    #[serde(default = "all_phases")]
    pub phases: Vec<PhaseTag>,
    #[serde(default)]
    pub type_tags: Vec<String>,
    pub intensity: IntensityTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Injury areas this class is unsafe for, e.g. "knee".
    #[serde(default)]
    pub contraindications: Vec<String>,
}

fn all_phases() -> Vec<PhaseTag> {
    vec![PhaseTag::All]
}

impl WorkoutCatalogEntry {
    pub fn new(name: impl Into<String>, intensity: IntensityTier) -> Self {
        Self {
            name: name.into(),
            phases: all_phases(),
            type_tags: Vec::new(),
            intensity,
            instructor: None,
            equipment: Vec::new(),
            benefits: Vec::new(),
            duration_minutes: None,
            contraindications: Vec::new(),
        }
    }

    pub fn for_phases(mut self, phases: &[Phase]) -> Self {
        self.phases = phases.iter().copied().map(PhaseTag::Only).collect();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.type_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_equipment(mut self, equipment: &[&str]) -> Self {
        self.equipment = equipment.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_benefits(mut self, benefits: &[&str]) -> Self {
        self.benefits = benefits.iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn with_contraindications(mut self, areas: &[&str]) -> Self {
        self.contraindications = areas.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Used on meditation days when the catalog has no meditation session.
    pub fn meditation_placeholder() -> Self {
        Self::new("Guided Meditation", IntensityTier::Low)
            .with_tags(&[MEDITATION_TAG])
            .with_duration(10)
            .with_benefits(&["Stress relief", "Recovery"])
    }

    pub fn applies_to(&self, phase: Phase) -> bool {
        self.phases.iter().any(|tag| tag.matches(phase))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.type_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag))
    }

    pub fn is_meditation(&self) -> bool {
        self.has_tag(MEDITATION_TAG)
    }

    pub fn conflicts_with(&self, injuries: &[Injury]) -> bool {
        injuries.iter().any(|injury| {
            self.contraindications
                .iter()
                .any(|area| area.eq_ignore_ascii_case(&injury.area))
        })
    }
}

/// A workout the user defined themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomWorkout {
    pub name: String,
    pub intensity: IntensityTier,
    #[serde(default = "all_phases")]
    pub phases: Vec<PhaseTag>,
    #[serde(default)]
    pub type_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl CustomWorkout {
    pub fn to_catalog_entry(&self) -> WorkoutCatalogEntry {
        let mut type_tags = self.type_tags.clone();
        if !type_tags.iter().any(|t| t.eq_ignore_ascii_case(CUSTOM_TAG)) {
            type_tags.push(CUSTOM_TAG.to_string());
        }

        WorkoutCatalogEntry {
            name: self.name.clone(),
            phases: self.phases.clone(),
            type_tags,
            intensity: self.intensity,
            instructor: None,
            equipment: Vec::new(),
            benefits: Vec::new(),
            duration_minutes: self.duration_minutes,
            contraindications: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    pub area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Injury {
    pub fn new(area: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            notes: None,
        }
    }
}

/// Workout preferences as stored for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFitnessPreferences {
    #[serde(default = "default_workouts_per_week")]
    pub workouts_per_week: u8,
    #[serde(default)]
    pub favorite_types: Vec<String>,
    #[serde(default)]
    pub disliked_types: Vec<String>,
    #[serde(default)]
    pub rest_days: Vec<Weekday>,
    #[serde(default)]
    pub injuries: Vec<Injury>,
    #[serde(default)]
    pub custom_workouts: Vec<CustomWorkout>,
}

fn default_workouts_per_week() -> u8 {
    3
}

impl Default for UserFitnessPreferences {
    fn default() -> Self {
        Self {
            workouts_per_week: default_workouts_per_week(),
            favorite_types: Vec::new(),
            disliked_types: Vec::new(),
            rest_days: Vec::new(),
            injuries: Vec::new(),
            custom_workouts: Vec::new(),
        }
    }
}

impl UserFitnessPreferences {
    pub fn with_frequency(workouts_per_week: u8) -> Self {
        Self {
            workouts_per_week,
            ..Self::default()
        }
    }

    /// At least one rest day per week is mandatory.
    pub fn validate(&self) -> Result<(), PlanError> {
        if (1..=MAX_WORKOUTS_PER_WEEK).contains(&self.workouts_per_week) {
            Ok(())
        } else {
            Err(PlanError::InvalidFrequency(self.workouts_per_week))
        }
    }

    pub fn effective_frequency(&self) -> u8 {
        self.workouts_per_week.clamp(1, MAX_WORKOUTS_PER_WEEK)
    }

    pub fn is_favorite(&self, entry: &WorkoutCatalogEntry) -> bool {
        entry.has_any_tag(&self.favorite_types)
    }

    pub fn is_disliked(&self, entry: &WorkoutCatalogEntry) -> bool {
        entry.has_any_tag(&self.disliked_types)
    }
}
