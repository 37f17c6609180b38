//! Persistent player progression and the pending game-over flag.
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::attributes::ClassId;
use crate::difficulty::{DifficultyMode, DifficultyPolicy};
use crate::reward::{LevelProgress, level_for_xp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub total_xp: u64,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub difficulty_mode: DifficultyMode,
    pub default_bedtime: NaiveTime,
    pub default_wake_time: NaiveTime,
    #[serde(default)]
    pub class: Option<ClassId>,
    /// Set by the game-over trigger; only `acknowledge_game_over` clears it.
    #[serde(default)]
    pub game_over: bool,
}

impl Profile {
    #[must_use]
    pub const fn new(
        difficulty_mode: DifficultyMode,
        default_wake_time: NaiveTime,
        default_bedtime: NaiveTime,
    ) -> Self {
        Self {
            total_xp: 0,
            current_streak: 0,
            longest_streak: 0,
            difficulty_mode,
            default_bedtime,
            default_wake_time,
            class: None,
            game_over: false,
        }
    }

    /// Seed a profile from a character class's default day bounds.
    #[must_use]
    pub fn from_class(class: ClassId, difficulty_mode: DifficultyMode) -> Self {
        let template = class.class();
        let mut profile = Self::new(
            difficulty_mode,
            template.default_wake_time,
            template.default_bedtime,
        );
        profile.class = Some(class);
        profile
    }

    #[must_use]
    pub const fn policy(&self) -> DifficultyPolicy {
        self.difficulty_mode.policy()
    }

    #[must_use]
    pub fn level(&self) -> LevelProgress {
        level_for_xp(self.total_xp)
    }

    /// Add earned XP, returning the new total.
    pub fn award_xp(&mut self, xp: u32) -> u64 {
        self.total_xp = self.total_xp.saturating_add(u64::from(xp));
        self.total_xp
    }

    /// Fold one closed day into the streak counters.
    pub fn apply_streak(&mut self, maintained: bool) {
        if maintained {
            self.current_streak = self.current_streak.saturating_add(1);
            self.longest_streak = self.longest_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
    }

    /// Dismiss a pending game over; the streak does not survive it.
    pub const fn acknowledge_game_over(&mut self) {
        self.game_over = false;
        self.current_streak = 0;
    }
}
