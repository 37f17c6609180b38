//! Quest records and the status state machine.
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::AttributeLinks;
use crate::boss::BossId;
use crate::constants::{MAIN_QUEST_BASE_XP, SIDE_QUEST_BASE_XP};

/// Stable identifier of a quest, assigned by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestId(pub String);

impl QuestId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QuestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestType {
    Main,
    Side,
}

impl QuestType {
    /// Conventional base XP for a freshly created quest of this type.
    #[must_use]
    pub const fn default_base_xp(self) -> u32 {
        match self {
            Self::Main => MAIN_QUEST_BASE_XP,
            Self::Side => SIDE_QUEST_BASE_XP,
        }
    }

    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Self::Main)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Sacrificed,
    Failed,
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quest cannot move from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: QuestStatus,
    pub to: QuestStatus,
}

impl QuestStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Sacrificed | Self::Failed)
    }

    /// Pending and active quests still compete for the remaining time budget.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    /// Validate a move through the quest lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the edge is not part of the lifecycle,
    /// including any move out of a terminal state.
    pub const fn transition(self, to: Self) -> Result<Self, TransitionError> {
        match (self, to) {
            (Self::Pending, Self::Active | Self::Sacrificed | Self::Failed)
            | (Self::Active, Self::Completed | Self::Sacrificed | Self::Failed) => Ok(to),
            _ => Err(TransitionError { from: self, to }),
        }
    }
}

/// One schedulable, time-boxed unit of work within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub quest_type: QuestType,
    /// Queue order within the day; lower runs earlier.
    pub position: u32,
    pub duration_minutes: u32,
    pub planned_start: NaiveDateTime,
    pub planned_end: NaiveDateTime,
    #[serde(default)]
    pub actual_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub actual_end: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: QuestStatus,
    pub base_xp: u32,
    #[serde(default)]
    pub earned_xp: u32,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub boss_damage: u32,
    #[serde(default)]
    pub boss_id: Option<BossId>,
    #[serde(default)]
    pub attribute_ids: AttributeLinks,
}

impl Quest {
    /// Build a pending quest whose planned block starts at `planned_start`.
    #[must_use]
    pub fn new(
        id: impl Into<QuestId>,
        title: impl Into<String>,
        quest_type: QuestType,
        duration_minutes: u32,
        planned_start: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            quest_type,
            position: 0,
            duration_minutes,
            planned_start,
            planned_end: planned_start + minutes(duration_minutes),
            actual_start: None,
            actual_end: None,
            status: QuestStatus::Pending,
            base_xp: quest_type.default_base_xp(),
            earned_xp: 0,
            accuracy: None,
            boss_damage: 0,
            boss_id: None,
            attribute_ids: AttributeLinks::new(),
        }
    }

    #[must_use]
    pub fn at_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_boss(mut self, boss_id: BossId) -> Self {
        self.boss_id = Some(boss_id);
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeLinks) -> Self {
        self.attribute_ids = attributes;
        self
    }

    #[must_use]
    pub const fn is_main(&self) -> bool {
        self.quest_type.is_main()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.is_open()
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The planned block length as a chrono duration.
    #[must_use]
    pub fn planned_duration(&self) -> Duration {
        minutes(self.duration_minutes)
    }

    /// Move the quest to `to`, leaving it untouched on rejection.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] for edges outside the lifecycle.
    pub fn set_status(&mut self, to: QuestStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition(to)?;
        Ok(())
    }
}

/// Whole minutes as a chrono duration.
#[must_use]
pub fn minutes(value: u32) -> Duration {
    Duration::minutes(i64::from(value))
}
