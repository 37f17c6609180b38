//! Darkness: a 0..=100 signal for how far the day has gone off-plan.
use crate::constants::{
    DARKNESS_ACCURACY_BANDS, DARKNESS_HARDCORE_SCALE, DARKNESS_MAX, DARKNESS_PER_FAILED_MAIN,
    DARKNESS_PER_SACRIFICE,
};
use crate::difficulty::{DifficultyMode, DifficultyPolicy};
use crate::numbers::{round_f64_to_u32, usize_to_f64};
use crate::quest::{Quest, QuestStatus};
use crate::reward::average_accuracy;

/// Counts that feed the darkness formula.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DarknessInputs {
    pub total: usize,
    pub sacrificed: usize,
    pub failed_main: usize,
    pub completed_accuracies: Vec<f64>,
}

impl DarknessInputs {
    #[must_use]
    pub fn from_quests(quests: &[Quest]) -> Self {
        let mut inputs = Self {
            total: quests.len(),
            ..Self::default()
        };
        for quest in quests {
            match quest.status {
                QuestStatus::Sacrificed => inputs.sacrificed += 1,
                QuestStatus::Failed if quest.is_main() => inputs.failed_main += 1,
                QuestStatus::Completed => {
                    if let Some(accuracy) = quest.accuracy {
                        inputs.completed_accuracies.push(accuracy);
                    }
                }
                _ => {}
            }
        }
        inputs
    }

    /// Share of the day's quests that were dropped or failed, as a percentage.
    #[must_use]
    pub fn failure_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        usize_to_f64(self.sacrificed + self.failed_main) / usize_to_f64(self.total) * 100.0
    }
}

#[must_use]
pub fn darkness_level(quests: &[Quest], policy: &DifficultyPolicy) -> u8 {
    darkness_from_inputs(&DarknessInputs::from_quests(quests), policy)
}

#[must_use]
pub fn darkness_from_inputs(inputs: &DarknessInputs, policy: &DifficultyPolicy) -> u8 {
    if policy.darkness_disabled() || inputs.total == 0 {
        return 0;
    }
    if inputs.failure_pct() < policy.darkness_threshold_pct {
        return 0;
    }

    let mut darkness = usize_to_f64(inputs.sacrificed) * DARKNESS_PER_SACRIFICE
        + usize_to_f64(inputs.failed_main) * DARKNESS_PER_FAILED_MAIN
        + accuracy_penalty(&inputs.completed_accuracies);
    if matches!(policy.mode, DifficultyMode::Hardcore) {
        darkness *= DARKNESS_HARDCORE_SCALE;
    }

    let clamped = round_f64_to_u32(darkness).min(u32::from(DARKNESS_MAX));
    u8::try_from(clamped).unwrap_or(DARKNESS_MAX)
}

fn accuracy_penalty(accuracies: &[f64]) -> f64 {
    let Some(average) = average_accuracy(accuracies) else {
        return 0.0;
    };
    DARKNESS_ACCURACY_BANDS
        .iter()
        .find(|(threshold, _)| average < *threshold)
        .map_or(0.0, |(_, penalty)| *penalty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::QuestType;
    use chrono::NaiveDate;

    fn quest(id: &str, kind: QuestType, status: QuestStatus, accuracy: Option<f64>) -> Quest {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut quest = Quest::new(id, id, kind, 30, start);
        quest.status = status;
        quest.accuracy = accuracy;
        quest
    }

    #[test]
    fn story_mode_never_darkens() {
        let quests = vec![
            quest("a", QuestType::Side, QuestStatus::Sacrificed, None),
            quest("b", QuestType::Main, QuestStatus::Sacrificed, None),
        ];
        assert_eq!(darkness_level(&quests, &DifficultyMode::Story.policy()), 0);
    }

    #[test]
    fn below_threshold_stays_bright() {
        // 1 of 4 sacrificed = 25% < 30%.
        let quests = vec![
            quest("a", QuestType::Side, QuestStatus::Sacrificed, None),
            quest("b", QuestType::Side, QuestStatus::Completed, Some(40.0)),
            quest("c", QuestType::Main, QuestStatus::Completed, Some(40.0)),
            quest("d", QuestType::Main, QuestStatus::Pending, None),
        ];
        assert_eq!(darkness_level(&quests, &DifficultyMode::Normal.policy()), 0);
    }

    #[test]
    fn accumulates_sacrifices_failures_and_accuracy() {
        let quests = vec![
            quest("a", QuestType::Side, QuestStatus::Sacrificed, None),
            quest("b", QuestType::Main, QuestStatus::Failed, None),
            quest("c", QuestType::Main, QuestStatus::Completed, Some(60.0)),
        ];
        // 5 + 25 + 15
        assert_eq!(darkness_level(&quests, &DifficultyMode::Normal.policy()), 45);
        // Hardcore scales by 1.5.
        assert_eq!(darkness_level(&quests, &DifficultyMode::Hardcore.policy()), 68);
    }

    #[test]
    fn clamps_at_one_hundred() {
        let mut quests: Vec<Quest> = (0..5)
            .map(|i| quest(&format!("m{i}"), QuestType::Main, QuestStatus::Failed, None))
            .collect();
        quests.push(quest("c", QuestType::Side, QuestStatus::Completed, Some(10.0)));
        assert_eq!(darkness_level(&quests, &DifficultyMode::Normal.policy()), 100);
    }

    #[test]
    fn empty_day_is_bright() {
        assert_eq!(darkness_level(&[], &DifficultyMode::Hardcore.policy()), 0);
        assert!(DarknessInputs::default().failure_pct().abs() < f64::EPSILON);
    }

    #[test]
    fn accuracy_bands() {
        assert!((accuracy_penalty(&[49.0]) - 30.0).abs() < f64::EPSILON);
        assert!((accuracy_penalty(&[69.9]) - 15.0).abs() < f64::EPSILON);
        assert!((accuracy_penalty(&[84.0]) - 5.0).abs() < f64::EPSILON);
        assert!(accuracy_penalty(&[85.0]).abs() < f64::EPSILON);
        assert!(accuracy_penalty(&[]).abs() < f64::EPSILON);
    }
}
