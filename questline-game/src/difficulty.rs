//! Difficulty modes and the fixed policy table consumed by triage, rewards,
//! darkness, and streak evaluation.
use serde::{Deserialize, Serialize};

/// Player-selected difficulty mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyMode {
    Story,
    #[default]
    Normal,
    Hardcore,
}

impl DifficultyMode {
    pub const ALL: [Self; 3] = [Self::Story, Self::Normal, Self::Hardcore];

    /// Policy row for this mode.
    #[must_use]
    pub const fn policy(self) -> DifficultyPolicy {
        match self {
            Self::Story => DifficultyPolicy {
                mode: Self::Story,
                xp_multiplier: 1.0,
                streak_threshold_pct: 0.0,
                darkness_threshold_pct: 100.0,
                penalize_overtime: false,
                main_quest_streak: false,
            },
            Self::Normal => DifficultyPolicy {
                mode: Self::Normal,
                xp_multiplier: 1.0,
                streak_threshold_pct: 80.0,
                darkness_threshold_pct: 30.0,
                penalize_overtime: true,
                main_quest_streak: false,
            },
            Self::Hardcore => DifficultyPolicy {
                mode: Self::Hardcore,
                xp_multiplier: 1.5,
                streak_threshold_pct: 100.0,
                darkness_threshold_pct: 10.0,
                penalize_overtime: true,
                main_quest_streak: true,
            },
        }
    }

    #[must_use]
    pub const fn is_hardcore(self) -> bool {
        matches!(self, Self::Hardcore)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Normal => "normal",
            Self::Hardcore => "hardcore",
        }
    }
}

impl std::fmt::Display for DifficultyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DifficultyMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "story" => Ok(Self::Story),
            "normal" => Ok(Self::Normal),
            "hardcore" => Ok(Self::Hardcore),
            other => Err(format!("unknown difficulty mode: {other}")),
        }
    }
}

/// One row of the difficulty table. Percentages are expressed on a 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyPolicy {
    pub mode: DifficultyMode,
    pub xp_multiplier: f64,
    /// Minimum completion percentage that keeps the streak alive.
    pub streak_threshold_pct: f64,
    /// Failure percentage at which darkness starts to accumulate; 100 disables it.
    pub darkness_threshold_pct: f64,
    pub penalize_overtime: bool,
    /// Every main quest must be completed for the streak to continue.
    pub main_quest_streak: bool,
}

impl DifficultyPolicy {
    #[must_use]
    pub const fn for_mode(mode: DifficultyMode) -> Self {
        mode.policy()
    }

    #[must_use]
    pub fn darkness_disabled(&self) -> bool {
        self.darkness_threshold_pct >= 100.0
    }

    #[must_use]
    pub fn always_keeps_streak(&self) -> bool {
        self.streak_threshold_pct <= 0.0
    }
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        DifficultyMode::default().policy()
    }
}
