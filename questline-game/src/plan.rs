//! JSON-loadable day plans and the quest drafts they contain.
use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::attributes::AttributeLinks;
use crate::boss::{Boss, BossId};
use crate::config::{PlanError, check_bounds};
use crate::constants::MAX_ATTRIBUTES_PER_QUEST;
use crate::difficulty::DifficultyMode;
use crate::quest::{Quest, QuestId, QuestType};

/// A quest as the caller describes it, before the engine assigns position and times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDraft {
    pub id: QuestId,
    pub title: String,
    pub quest_type: QuestType,
    pub duration_minutes: u32,
    #[serde(default)]
    pub boss_id: Option<BossId>,
    #[serde(default)]
    pub attribute_ids: AttributeLinks,
}

impl QuestDraft {
    #[must_use]
    pub fn new(
        id: impl Into<QuestId>,
        title: impl Into<String>,
        quest_type: QuestType,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            quest_type,
            duration_minutes,
            boss_id: None,
            attribute_ids: AttributeLinks::new(),
        }
    }

    #[must_use]
    pub fn with_boss(mut self, boss_id: impl Into<BossId>) -> Self {
        self.boss_id = Some(boss_id.into());
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeLinks) -> Self {
        self.attribute_ids = attributes;
        self
    }

    /// # Errors
    ///
    /// Returns `PlanError` for a zero duration or more than two attribute links.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.duration_minutes == 0 {
            return Err(PlanError::NonPositiveDuration {
                quest_id: self.id.clone(),
            });
        }
        if self.attribute_ids.len() > MAX_ATTRIBUTES_PER_QUEST {
            return Err(PlanError::TooManyAttributes {
                quest_id: self.id.clone(),
                count: self.attribute_ids.len(),
                max: MAX_ATTRIBUTES_PER_QUEST,
            });
        }
        Ok(())
    }

    /// Materialize a pending quest at `position`, planned to start at `planned_start`.
    #[must_use]
    pub fn into_quest(self, position: u32, planned_start: NaiveDateTime, base_xp: u32) -> Quest {
        let mut quest = Quest::new(
            self.id,
            self.title,
            self.quest_type,
            self.duration_minutes,
            planned_start,
        )
        .at_position(position)
        .with_attributes(self.attribute_ids);
        quest.boss_id = self.boss_id;
        quest.base_xp = base_xp;
        quest
    }
}

/// One day's plan with its bounds, boss and ordered quests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    #[serde(default)]
    pub bedtime: Option<NaiveTime>,
    #[serde(default)]
    pub wake_time: Option<NaiveTime>,
    #[serde(default)]
    pub mode: Option<DifficultyMode>,
    #[serde(default)]
    pub boss: Option<Boss>,
    #[serde(default)]
    pub quests: Vec<QuestDraft>,
}

impl DayPlan {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            bedtime: None,
            wake_time: None,
            mode: None,
            boss: None,
            quests: Vec::new(),
        }
    }

    /// Parse and validate a plan from JSON.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::Parse` for malformed JSON and any validation error otherwise.
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let plan: Self = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// # Errors
    ///
    /// Returns the first invalid quest draft, duplicate id, unknown boss link,
    /// or inverted day bounds.
    pub fn validate(&self) -> Result<(), PlanError> {
        if let (Some(wake_time), Some(bedtime)) = (self.wake_time, self.bedtime) {
            check_bounds(wake_time, bedtime)?;
        }
        let mut seen = HashSet::new();
        for draft in &self.quests {
            draft.validate()?;
            if !seen.insert(&draft.id) {
                return Err(PlanError::DuplicateQuestId(draft.id.clone()));
            }
            if let Some(boss_id) = &draft.boss_id
                && self.boss.as_ref().is_none_or(|boss| &boss.id != boss_id)
            {
                return Err(PlanError::UnknownBoss {
                    quest_id: draft.id.clone(),
                    boss_id: boss_id.clone(),
                });
            }
        }
        Ok(())
    }
}
