//! Presentation signals and persistence write-intents emitted by engine actions.
//!
//! Every state-changing action returns both streams: events describe what
//! happened for the UI to animate, intents describe the new field values the
//! persistence collaborator should store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::attributes::AttributeId;
use crate::boss::{BossId, BossReward, BossStatus, DamageOutcome};
use crate::quest::{Quest, QuestId, QuestStatus};
use crate::reward::RewardBreakdown;
use crate::streak::StreakVerdict;

/// Severity tier for an engine event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    Warning,
    Critical,
}

/// Hint for how the UI should surface an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiSurfaceHint {
    Log,
    Toast,
    Modal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    QuestStarted {
        quest_id: QuestId,
        at: NaiveDateTime,
    },
    QuestCompleted {
        quest_id: QuestId,
        reward: RewardBreakdown,
    },
    /// Skipped by the player; `status` is sacrificed, or failed for a hardcore main quest.
    QuestSkipped {
        quest_id: QuestId,
        status: QuestStatus,
    },
    XpAwarded {
        amount: u32,
        total_xp: u64,
    },
    AttributeXpAwarded {
        attribute: AttributeId,
        amount: u32,
        total_xp: u64,
    },
    BossDamaged {
        boss_id: BossId,
        outcome: DamageOutcome,
    },
    BossDefeated {
        boss_id: BossId,
        title: String,
    },
    LootDropped {
        boss_id: BossId,
        reward: BossReward,
    },
    QuestsSacrificed {
        quest_ids: Vec<QuestId>,
    },
    MainQuestsAtRisk {
        quest_ids: Vec<QuestId>,
    },
    GameOver,
    DayClosed {
        verdict: StreakVerdict,
        current_streak: u32,
        longest_streak: u32,
    },
}

impl EngineEvent {
    #[must_use]
    pub const fn severity(&self) -> EventSeverity {
        match self {
            Self::QuestsSacrificed { .. } | Self::MainQuestsAtRisk { .. } => {
                EventSeverity::Warning
            }
            Self::QuestSkipped {
                status: QuestStatus::Failed,
                ..
            }
            | Self::GameOver => EventSeverity::Critical,
            _ => EventSeverity::Info,
        }
    }

    #[must_use]
    pub const fn ui_surface_hint(&self) -> UiSurfaceHint {
        match self {
            Self::GameOver | Self::BossDefeated { .. } | Self::LootDropped { .. } => {
                UiSurfaceHint::Modal
            }
            Self::BossDamaged { .. }
            | Self::XpAwarded { .. }
            | Self::QuestsSacrificed { .. }
            | Self::MainQuestsAtRisk { .. } => UiSurfaceHint::Toast,
            _ => UiSurfaceHint::Log,
        }
    }
}

/// New field values the persistence collaborator should store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WriteIntent {
    QuestInsert {
        quest: Quest,
    },
    QuestUpdate {
        quest: Quest,
    },
    QuestDelete {
        quest_id: QuestId,
    },
    BossUpdate {
        boss_id: BossId,
        current_hp: u32,
        status: BossStatus,
        defeated_at: Option<NaiveDateTime>,
    },
    ProfileUpdate {
        total_xp: u64,
        current_streak: u32,
        longest_streak: u32,
        game_over: bool,
    },
    AttributeUpdate {
        attribute: AttributeId,
        total_xp: u64,
    },
    RewardClaim {
        boss_id: BossId,
        reward_id: String,
    },
}

impl WriteIntent {
    /// Short label for logs and flush reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::QuestInsert { .. } => "quest_insert",
            Self::QuestUpdate { .. } => "quest_update",
            Self::QuestDelete { .. } => "quest_delete",
            Self::BossUpdate { .. } => "boss_update",
            Self::ProfileUpdate { .. } => "profile_update",
            Self::AttributeUpdate { .. } => "attribute_update",
            Self::RewardClaim { .. } => "reward_claim",
        }
    }
}

/// Everything one engine action produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub events: Vec<EngineEvent>,
    pub outbox: Vec<WriteIntent>,
}

impl ActionOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.outbox.is_empty()
    }

    pub(crate) fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    pub(crate) fn write(&mut self, intent: WriteIntent) {
        self.outbox.push(intent);
    }

    /// True when any event matches `predicate`.
    pub fn any_event(&self, predicate: impl Fn(&EngineEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}
