//! Engine configuration and the validation errors shared with day plans.
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boss::BossId;
use crate::constants::{MAIN_QUEST_BASE_XP, SIDE_QUEST_BASE_XP};
use crate::difficulty::DifficultyMode;
use crate::profile::Profile;
use crate::quest::{QuestId, QuestType};

/// Errors raised when a day plan or engine configuration is malformed.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("quest {quest_id} must have a positive duration")]
    NonPositiveDuration { quest_id: QuestId },
    #[error("quest {quest_id} links {count} attributes (at most {max})")]
    TooManyAttributes {
        quest_id: QuestId,
        count: usize,
        max: usize,
    },
    #[error("quest id {0} appears more than once")]
    DuplicateQuestId(QuestId),
    #[error("quest {quest_id} links boss {boss_id:?}, which is not part of the plan")]
    UnknownBoss { quest_id: QuestId, boss_id: BossId },
    #[error("bedtime {bedtime} must be after wake time {wake_time}")]
    BedtimeNotAfterWake {
        wake_time: NaiveTime,
        bedtime: NaiveTime,
    },
    #[error("{field} must be positive")]
    ZeroBaseXp { field: &'static str },
    #[error("invalid day plan json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime knobs for a day engine. Balance math lives in `constants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bedtime given to new profiles.
    #[serde(default = "EngineConfig::default_bedtime")]
    pub default_bedtime: NaiveTime,
    #[serde(default = "EngineConfig::default_wake_time")]
    pub default_wake_time: NaiveTime,
    /// Run sacrifice triage right after a quest starts.
    #[serde(default = "EngineConfig::default_triage_on_start")]
    pub triage_on_start: bool,
    #[serde(default = "EngineConfig::default_main_base_xp")]
    pub main_base_xp: u32,
    #[serde(default = "EngineConfig::default_side_base_xp")]
    pub side_base_xp: u32,
    /// Seed for boss loot draws.
    #[serde(default)]
    pub loot_seed: u64,
}

impl EngineConfig {
    #[must_use]
    pub fn default_bedtime() -> NaiveTime {
        NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    #[must_use]
    pub fn default_wake_time() -> NaiveTime {
        NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    #[must_use]
    pub const fn default_triage_on_start() -> bool {
        true
    }

    #[must_use]
    pub const fn default_main_base_xp() -> u32 {
        MAIN_QUEST_BASE_XP
    }

    #[must_use]
    pub const fn default_side_base_xp() -> u32 {
        SIDE_QUEST_BASE_XP
    }

    #[must_use]
    pub const fn with_loot_seed(mut self, seed: u64) -> Self {
        self.loot_seed = seed;
        self
    }

    /// Base XP assigned to a new quest of `quest_type`.
    #[must_use]
    pub const fn base_xp_for(&self, quest_type: QuestType) -> u32 {
        match quest_type {
            QuestType::Main => self.main_base_xp,
            QuestType::Side => self.side_base_xp,
        }
    }

    /// A fresh profile carrying this configuration's default day bounds.
    #[must_use]
    pub const fn new_profile(&self, mode: DifficultyMode) -> Profile {
        Profile::new(mode, self.default_wake_time, self.default_bedtime)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` when a base XP is zero or bedtime does not follow wake time.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.main_base_xp == 0 {
            return Err(PlanError::ZeroBaseXp {
                field: "main_base_xp",
            });
        }
        if self.side_base_xp == 0 {
            return Err(PlanError::ZeroBaseXp {
                field: "side_base_xp",
            });
        }
        check_bounds(self.default_wake_time, self.default_bedtime)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_bedtime: Self::default_bedtime(),
            default_wake_time: Self::default_wake_time(),
            triage_on_start: Self::default_triage_on_start(),
            main_base_xp: Self::default_main_base_xp(),
            side_base_xp: Self::default_side_base_xp(),
            loot_seed: 0,
        }
    }
}

pub(crate) fn check_bounds(wake_time: NaiveTime, bedtime: NaiveTime) -> Result<(), PlanError> {
    if bedtime <= wake_time {
        return Err(PlanError::BedtimeNotAfterWake { wake_time, bedtime });
    }
    Ok(())
}
