//! Streak continuation and the hardcore game-over trigger.
use serde::{Deserialize, Serialize};

use crate::difficulty::{DifficultyMode, DifficultyPolicy};
use crate::numbers::usize_to_f64;
use crate::quest::{Quest, QuestStatus};

/// Why a day did or did not keep the streak alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakVerdict {
    /// The mode never breaks streaks.
    Waived,
    /// Completion rate met the mode threshold.
    Met,
    /// A main quest was left incomplete under a main-quest streak rule.
    MainQuestMissed,
    /// Completion rate fell below the mode threshold.
    BelowThreshold,
    /// Nothing countable was planned.
    NothingCounted,
}

impl StreakVerdict {
    #[must_use]
    pub const fn maintained(self) -> bool {
        matches!(self, Self::Waived | Self::Met)
    }
}

/// Completion percentage over countable quests; sacrificed and failed quests
/// are left out of the denominator.
#[must_use]
pub fn completion_pct(quests: &[Quest]) -> Option<f64> {
    let countable = quests
        .iter()
        .filter(|quest| !matches!(quest.status, QuestStatus::Sacrificed | QuestStatus::Failed))
        .count();
    if countable == 0 {
        return None;
    }
    let completed = quests
        .iter()
        .filter(|quest| quest.status == QuestStatus::Completed)
        .count();
    Some(usize_to_f64(completed) / usize_to_f64(countable) * 100.0)
}

#[must_use]
pub fn evaluate_streak(quests: &[Quest], policy: &DifficultyPolicy) -> StreakVerdict {
    if policy.always_keeps_streak() {
        return StreakVerdict::Waived;
    }
    if policy.main_quest_streak
        && quests
            .iter()
            .any(|quest| quest.is_main() && quest.status != QuestStatus::Completed)
    {
        return StreakVerdict::MainQuestMissed;
    }
    match completion_pct(quests) {
        None => StreakVerdict::NothingCounted,
        Some(pct) if pct >= policy.streak_threshold_pct => StreakVerdict::Met,
        Some(_) => StreakVerdict::BelowThreshold,
    }
}

#[must_use]
pub fn should_maintain_streak(quests: &[Quest], policy: &DifficultyPolicy) -> bool {
    evaluate_streak(quests, policy).maintained()
}

/// Hardcore only: any failed or sacrificed main quest ends the run.
#[must_use]
pub fn should_trigger_game_over(quests: &[Quest], mode: DifficultyMode) -> bool {
    mode.is_hardcore()
        && quests.iter().any(|quest| {
            quest.is_main() && matches!(quest.status, QuestStatus::Failed | QuestStatus::Sacrificed)
        })
}
