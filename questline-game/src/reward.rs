//! XP, accuracy and boss damage for completed quests.
//!
//! Accuracy compares the actual block length against the planned duration:
//! finishing early earns up to 120% accuracy and a 1.2x bonus, finishing late
//! decays the multiplier linearly to zero at three times the plan (unless the
//! difficulty policy waives overtime penalties).
use serde::{Deserialize, Serialize};

use crate::attributes::AttributeId;
use crate::constants::{
    ACCURACY_EARLY_CAP, ACCURACY_PERFECT, BOSS_DAMAGE_MINUTES_PER_POINT, EARLY_BONUS_CAP,
    EARLY_BONUS_SLOPE, LEVEL_XP_STEP, MAIN_QUEST_TYPE_MULTIPLIER, MS_PER_MINUTE,
    OVERTIME_PENALTY_SLOPE, SIDE_QUEST_TYPE_MULTIPLIER,
};
use crate::difficulty::DifficultyPolicy;
use crate::numbers::{i64_to_f64, round_f64_to_u32, round_to_hundredths, usize_to_f64};
use crate::quest::{Quest, QuestType};

/// Reward figures for one completed quest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub earned_xp: u32,
    /// Percentage, two decimals.
    pub accuracy: f64,
    /// Timing multiplier before type and difficulty scaling, two decimals.
    pub multiplier: f64,
    pub boss_damage: u32,
}

impl RewardBreakdown {
    const ZERO: Self = Self {
        earned_xp: 0,
        accuracy: 0.0,
        multiplier: 0.0,
        boss_damage: 0,
    };
}

/// Accuracy and multiplier for an actual/planned ratio, unrounded.
#[must_use]
pub fn timing_factors(ratio: f64, policy: &DifficultyPolicy) -> (f64, f64) {
    if ratio <= 1.0 {
        let accuracy = if ratio <= 0.0 {
            ACCURACY_EARLY_CAP
        } else {
            (ACCURACY_PERFECT / ratio).min(ACCURACY_EARLY_CAP)
        };
        let multiplier = (1.0 + (1.0 - ratio) * EARLY_BONUS_SLOPE).min(EARLY_BONUS_CAP);
        (accuracy, multiplier)
    } else {
        let accuracy = ACCURACY_PERFECT / ratio;
        let multiplier = if policy.penalize_overtime {
            (1.0 - (ratio - 1.0) * OVERTIME_PENALTY_SLOPE).max(0.0)
        } else {
            1.0
        };
        (accuracy, multiplier)
    }
}

#[must_use]
pub const fn type_multiplier(quest_type: QuestType) -> f64 {
    match quest_type {
        QuestType::Main => MAIN_QUEST_TYPE_MULTIPLIER,
        QuestType::Side => SIDE_QUEST_TYPE_MULTIPLIER,
    }
}

/// Compute the reward for a quest with both actual timestamps recorded.
///
/// A quest missing either timestamp, or with a zero planned duration, earns nothing.
#[must_use]
pub fn calculate_reward(quest: &Quest, policy: &DifficultyPolicy) -> RewardBreakdown {
    let (Some(start), Some(end)) = (quest.actual_start, quest.actual_end) else {
        return RewardBreakdown::ZERO;
    };
    if quest.duration_minutes == 0 {
        return RewardBreakdown::ZERO;
    }

    let planned_ms = f64::from(quest.duration_minutes) * MS_PER_MINUTE;
    let actual_ms = i64_to_f64((end - start).num_milliseconds()).max(0.0);
    let ratio = actual_ms / planned_ms;

    let (accuracy, multiplier) = timing_factors(ratio, policy);
    let earned_xp = round_f64_to_u32(
        f64::from(quest.base_xp)
            * multiplier
            * type_multiplier(quest.quest_type)
            * policy.xp_multiplier,
    );
    let accuracy = round_to_hundredths(accuracy);

    RewardBreakdown {
        earned_xp,
        accuracy,
        multiplier: round_to_hundredths(multiplier),
        boss_damage: boss_damage(quest, accuracy),
    }
}

/// Damage a completed quest deals to its linked boss.
///
/// Only main quests with a boss link deal damage: one point per six planned
/// minutes, scaled down by accuracy below 100%.
#[must_use]
pub fn boss_damage(quest: &Quest, accuracy: f64) -> u32 {
    if !quest.is_main() || quest.boss_id.is_none() {
        return 0;
    }
    let base = round_f64_to_u32(f64::from(quest.duration_minutes) / BOSS_DAMAGE_MINUTES_PER_POINT);
    let scale = (accuracy / ACCURACY_PERFECT).min(1.0);
    round_f64_to_u32(f64::from(base) * scale)
}

/// Split earned XP evenly across attribute links; the remainder is dropped.
#[must_use]
pub fn split_attribute_xp(earned_xp: u32, attributes: &[AttributeId]) -> Vec<(AttributeId, u32)> {
    let Ok(count) = u32::try_from(attributes.len()) else {
        return Vec::new();
    };
    if count == 0 {
        return Vec::new();
    }
    let share = earned_xp / count;
    attributes.iter().map(|id| (*id, share)).collect()
}

/// Progress through the level curve, where leaving level N costs N*100 XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp_into_level: u64,
    pub xp_for_next_level: u64,
}

#[must_use]
pub fn level_for_xp(total_xp: u64) -> LevelProgress {
    let mut level: u32 = 1;
    let mut spent: u64 = 0;
    let mut next = LEVEL_XP_STEP;
    while total_xp >= spent.saturating_add(next) {
        spent += next;
        level += 1;
        next = u64::from(level) * LEVEL_XP_STEP;
    }
    LevelProgress {
        level,
        xp_into_level: total_xp - spent,
        xp_for_next_level: next,
    }
}

/// Mean of the given accuracies, or `None` when there are none.
#[must_use]
pub fn average_accuracy(accuracies: &[f64]) -> Option<f64> {
    if accuracies.is_empty() {
        return None;
    }
    Some(accuracies.iter().sum::<f64>() / usize_to_f64(accuracies.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::BossId;
    use crate::difficulty::DifficultyMode;
    use chrono::{NaiveDate, NaiveDateTime};
    use smallvec::smallvec;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn finished(kind: QuestType, planned: u32, actual_minutes: i64) -> Quest {
        let mut quest = Quest::new("q", "Quest", kind, planned, at(9, 0));
        quest.actual_start = Some(at(9, 0));
        quest.actual_end = Some(at(9, 0) + chrono::Duration::minutes(actual_minutes));
        quest
    }

    fn normal() -> DifficultyPolicy {
        DifficultyMode::Normal.policy()
    }

    #[test]
    fn on_time_is_perfect() {
        let reward = calculate_reward(&finished(QuestType::Side, 60, 60), &normal());
        assert!((reward.accuracy - 100.0).abs() < 1e-9);
        assert!((reward.multiplier - 1.0).abs() < 1e-9);
        assert_eq!(reward.earned_xp, 10);
    }

    #[test]
    fn instant_finish_hits_caps() {
        let reward = calculate_reward(&finished(QuestType::Main, 30, 0), &normal());
        assert!((reward.accuracy - 120.0).abs() < 1e-9);
        assert!((reward.multiplier - 1.2).abs() < 1e-9);
        assert_eq!(reward.earned_xp, 48);
    }

    #[test]
    fn triple_overtime_earns_nothing_when_penalized() {
        let reward = calculate_reward(&finished(QuestType::Main, 20, 60), &normal());
        assert!(reward.multiplier.abs() < 1e-9);
        assert_eq!(reward.earned_xp, 0);
        assert!((reward.accuracy - 33.33).abs() < 1e-9);
    }

    #[test]
    fn story_mode_waives_overtime() {
        let story = DifficultyMode::Story.policy();
        let reward = calculate_reward(&finished(QuestType::Main, 20, 60), &story);
        assert!((reward.multiplier - 1.0).abs() < 1e-9);
        assert_eq!(reward.earned_xp, 40);
    }

    #[test]
    fn hardcore_scales_xp() {
        let hardcore = DifficultyMode::Hardcore.policy();
        let reward = calculate_reward(&finished(QuestType::Main, 60, 60), &hardcore);
        assert_eq!(reward.earned_xp, 60);
    }

    #[test]
    fn double_time_halves_multiplier() {
        let reward = calculate_reward(&finished(QuestType::Side, 30, 60), &normal());
        assert!((reward.multiplier - 0.5).abs() < 1e-9);
        assert!((reward.accuracy - 50.0).abs() < 1e-9);
        assert_eq!(reward.earned_xp, 5);
    }

    #[test]
    fn missing_timestamps_earn_nothing() {
        let mut quest = finished(QuestType::Main, 30, 30);
        quest.actual_end = None;
        assert_eq!(calculate_reward(&quest, &normal()), RewardBreakdown::ZERO);
    }

    #[test]
    fn boss_damage_needs_main_link_and_scales_with_accuracy() {
        let mut quest = finished(QuestType::Main, 60, 120);
        assert_eq!(boss_damage(&quest, 100.0), 0);
        quest.boss_id = Some(BossId::new("boss"));
        assert_eq!(boss_damage(&quest, 100.0), 10);
        assert_eq!(boss_damage(&quest, 120.0), 10);
        assert_eq!(boss_damage(&quest, 50.0), 5);

        let reward = calculate_reward(&quest, &normal());
        assert_eq!(reward.boss_damage, 5);

        let mut side = finished(QuestType::Side, 60, 60);
        side.boss_id = Some(BossId::new("boss"));
        assert_eq!(boss_damage(&side, 100.0), 0);
    }

    #[test]
    fn attribute_split_floors_and_drops_remainder() {
        let split = split_attribute_xp(25, &[AttributeId::Int, AttributeId::Foc]);
        assert_eq!(split, vec![(AttributeId::Int, 12), (AttributeId::Foc, 12)]);
        assert!(split_attribute_xp(25, &[]).is_empty());

        let links: crate::attributes::AttributeLinks = smallvec![AttributeId::Vit];
        assert_eq!(split_attribute_xp(7, &links), vec![(AttributeId::Vit, 7)]);
    }

    #[test]
    fn level_curve_grows_linearly() {
        assert_eq!(level_for_xp(0).level, 1);
        assert_eq!(level_for_xp(99).level, 1);
        let two = level_for_xp(100);
        assert_eq!(two.level, 2);
        assert_eq!(two.xp_into_level, 0);
        assert_eq!(two.xp_for_next_level, 200);
        let three = level_for_xp(350);
        assert_eq!(three.level, 3);
        assert_eq!(three.xp_into_level, 50);
        assert_eq!(three.xp_for_next_level, 300);
    }

    #[test]
    fn average_accuracy_ignores_empty_sets() {
        assert_eq!(average_accuracy(&[]), None);
        assert_eq!(average_accuracy(&[80.0, 60.0]), Some(70.0));
    }
}
