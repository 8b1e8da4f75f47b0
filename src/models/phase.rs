use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PlanError;

/// Physiological phase of a cycle, solar or lunar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulatory,
    Luteal,
    MenstrualMoon,
    FollicularMoon,
    OvulatoryMoon,
    LutealMoon,
}

/// Relative effort of a workout class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityTier {
    Low,
    Moderate,
    High,
}

/// Per-phase attributes shared by the scheduler, the race planner and the shells.
#[derive(Debug)]
pub struct PhaseTraits {
    pub phase: Phase,
    pub key: &'static str,
    pub display_name: &'static str,
    pub solar: Phase,
    /// Most suitable intensity first.
    pub intensity_order: [IntensityTier; 3],
    pub energy: &'static str,
    pub race_advisory: Option<&'static str>,
}

const REDUCE_ADVISORY: &str =
    "Energy may be lower today: keep the numbers but feel free to run by effort and back off the pace";
const PUSH_ADVISORY: &str =
    "Hormones favour performance now: a good day to push the quality segments";

pub const LATE_LUTEAL_ADVISORY: &str =
    "Late luteal phase: expect higher perceived effort, prioritise hydration and consider easing intensity";

// Indexed by `Phase as usize`.
static PHASE_TRAITS: [PhaseTraits; 8] = [
    PhaseTraits {
        phase: Phase::Menstrual,
        key: "menstrual",
        display_name: "Menstrual",
        solar: Phase::Menstrual,
        intensity_order: [IntensityTier::Low, IntensityTier::Moderate, IntensityTier::High],
        energy: "Restore: gentle movement and recovery",
        race_advisory: Some(REDUCE_ADVISORY),
    },
    PhaseTraits {
        phase: Phase::Follicular,
        key: "follicular",
        display_name: "Follicular",
        solar: Phase::Follicular,
        intensity_order: [IntensityTier::High, IntensityTier::Moderate, IntensityTier::Low],
        energy: "Rising energy: try new and challenging workouts",
        race_advisory: Some(PUSH_ADVISORY),
    },
    PhaseTraits {
        phase: Phase::Ovulatory,
        key: "ovulatory",
        display_name: "Ovulatory",
        solar: Phase::Ovulatory,
        intensity_order: [IntensityTier::High, IntensityTier::Moderate, IntensityTier::Low],
        energy: "Peak energy: high intensity and strength",
        race_advisory: Some(PUSH_ADVISORY),
    },
    PhaseTraits {
        phase: Phase::Luteal,
        key: "luteal",
        display_name: "Luteal",
        solar: Phase::Luteal,
        intensity_order: [IntensityTier::Moderate, IntensityTier::Low, IntensityTier::High],
        energy: "Winding down: steady, moderate sessions",
        race_advisory: None,
    },
    PhaseTraits {
        phase: Phase::MenstrualMoon,
        key: "menstrual_moon",
        display_name: "Menstrual (New Moon)",
        solar: Phase::Menstrual,
        intensity_order: [IntensityTier::Low, IntensityTier::Moderate, IntensityTier::High],
        energy: "New moon: rest and reflect",
        race_advisory: Some(REDUCE_ADVISORY),
    },
    PhaseTraits {
        phase: Phase::FollicularMoon,
        key: "follicular_moon",
        display_name: "Follicular (Waxing Moon)",
        solar: Phase::Follicular,
        intensity_order: [IntensityTier::High, IntensityTier::Moderate, IntensityTier::Low],
        energy: "Waxing moon: build momentum",
        race_advisory: Some(PUSH_ADVISORY),
    },
    PhaseTraits {
        phase: Phase::OvulatoryMoon,
        key: "ovulatory_moon",
        display_name: "Ovulatory (Full Moon)",
        solar: Phase::Ovulatory,
        intensity_order: [IntensityTier::High, IntensityTier::Moderate, IntensityTier::Low],
        energy: "Full moon: peak energy",
        race_advisory: Some(PUSH_ADVISORY),
    },
    PhaseTraits {
        phase: Phase::LutealMoon,
        key: "luteal_moon",
        display_name: "Luteal (Waning Moon)",
        solar: Phase::Luteal,
        intensity_order: [IntensityTier::Moderate, IntensityTier::Low, IntensityTier::High],
        energy: "Waning moon: slow down and turn inward",
        race_advisory: None,
    },
];

impl Phase {
    pub const SOLAR: [Phase; 4] = [
        Phase::Menstrual,
        Phase::Follicular,
        Phase::Ovulatory,
        Phase::Luteal,
    ];

    pub const LUNAR: [Phase; 4] = [
        Phase::MenstrualMoon,
        Phase::FollicularMoon,
        Phase::OvulatoryMoon,
        Phase::LutealMoon,
    ];

    pub fn traits(self) -> &'static PhaseTraits {
        &PHASE_TRAITS[self as usize]
    }

    pub fn is_lunar(self) -> bool {
        self.traits().solar != self
    }

    pub fn solar_counterpart(self) -> Phase {
        self.traits().solar
    }

    pub fn display_name(self) -> &'static str {
        self.traits().display_name
    }

    /// 2 for the phase's preferred intensity, 1 for the second choice, 0 otherwise.
    pub fn intensity_fit(self, tier: IntensityTier) -> u8 {
        let order = &self.traits().intensity_order;
        match order.iter().position(|t| *t == tier) {
            Some(0) => 2,
            Some(1) => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.traits().key)
    }
}

impl FromStr for Phase {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(|c: char| c == '-' || c == ' ', "_");
        PHASE_TRAITS
            .iter()
            .find(|t| t.key == normalized)
            .map(|t| t.phase)
            .ok_or_else(|| PlanError::UnknownPhase(s.to_string()))
    }
}

impl fmt::Display for IntensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntensityTier::Low => write!(f, "low"),
            IntensityTier::Moderate => write!(f, "moderate"),
            IntensityTier::High => write!(f, "high"),
        }
    }
}

/// Phase applicability of a catalog entry: a concrete phase or every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhaseTag {
    All,
    Only(Phase),
}

impl PhaseTag {
    /// Lunar phases match entries tagged with their solar analog.
    pub fn matches(self, phase: Phase) -> bool {
        match self {
            PhaseTag::All => true,
            PhaseTag::Only(tagged) => tagged == phase || tagged == phase.solar_counterpart(),
        }
    }
}

impl TryFrom<String> for PhaseTag {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(PhaseTag::All);
        }
        value.parse().map(PhaseTag::Only)
    }
}

impl From<PhaseTag> for String {
    fn from(tag: PhaseTag) -> Self {
        match tag {
            PhaseTag::All => "all".to_string(),
            PhaseTag::Only(phase) => phase.to_string(),
        }
    }
}
