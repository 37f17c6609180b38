//! Day bounds and the per-day aggregates derived from the quest set.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::darkness::darkness_level;
use crate::difficulty::DifficultyPolicy;
use crate::quest::{Quest, QuestStatus};
use crate::reward::average_accuracy;
use crate::schedule::free_time_minutes;

/// One calendar day. Unset bounds fall back to the profile defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    #[serde(default)]
    pub bedtime: Option<NaiveTime>,
    #[serde(default)]
    pub wake_time: Option<NaiveTime>,
    /// Set once by `DayEngine::close_day`.
    #[serde(default)]
    pub closed: bool,
}

impl Day {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            bedtime: None,
            wake_time: None,
            closed: false,
        }
    }

    #[must_use]
    pub const fn with_bounds(mut self, wake_time: NaiveTime, bedtime: NaiveTime) -> Self {
        self.wake_time = Some(wake_time);
        self.bedtime = Some(bedtime);
        self
    }

    /// Bedtime on this day's date, using `fallback` when the day leaves it unset.
    #[must_use]
    pub fn bedtime_at(&self, fallback: NaiveTime) -> NaiveDateTime {
        self.date.and_time(self.bedtime.unwrap_or(fallback))
    }

    #[must_use]
    pub fn wake_at(&self, fallback: NaiveTime) -> NaiveDateTime {
        self.date.and_time(self.wake_time.unwrap_or(fallback))
    }
}

/// Counters recomputed from the quest set after every operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub xp_earned: u64,
    pub quests_completed: usize,
    pub quests_sacrificed: usize,
    pub quests_failed: usize,
    /// Mean accuracy of completed quests with a recorded accuracy.
    pub accuracy_score: Option<f64>,
    pub darkness_level: u8,
    pub free_time_minutes: u32,
}

impl DaySummary {
    #[must_use]
    pub fn from_quests(
        quests: &[Quest],
        policy: &DifficultyPolicy,
        bedtime: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Self {
        let mut summary = Self::default();
        let mut accuracies = Vec::new();
        for quest in quests {
            match quest.status {
                QuestStatus::Completed => {
                    summary.quests_completed += 1;
                    summary.xp_earned += u64::from(quest.earned_xp);
                    accuracies.extend(quest.accuracy);
                }
                QuestStatus::Sacrificed => summary.quests_sacrificed += 1,
                QuestStatus::Failed => summary.quests_failed += 1,
                QuestStatus::Pending | QuestStatus::Active => {}
            }
        }
        summary.accuracy_score = average_accuracy(&accuracies);
        summary.darkness_level = darkness_level(quests, policy);
        summary.free_time_minutes = free_time_minutes(quests, bedtime, now);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::DifficultyMode;
    use crate::quest::QuestType;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn bounds_fall_back_to_defaults() {
        let day = Day::new(date());
        assert_eq!(day.bedtime_at(time(22, 0)), date().and_time(time(22, 0)));
        let custom = Day::new(date()).with_bounds(time(6, 0), time(21, 30));
        assert_eq!(custom.bedtime_at(time(22, 0)), date().and_time(time(21, 30)));
        assert_eq!(custom.wake_at(time(7, 0)), date().and_time(time(6, 0)));
    }

    #[test]
    fn summary_is_derived_from_statuses() {
        let start = date().and_time(time(9, 0));
        let mut done = Quest::new("a", "a", QuestType::Main, 60, start);
        done.status = QuestStatus::Completed;
        done.earned_xp = 40;
        done.accuracy = Some(90.0);
        let mut dropped = Quest::new("b", "b", QuestType::Side, 30, start);
        dropped.status = QuestStatus::Sacrificed;
        let open = Quest::new("c", "c", QuestType::Side, 45, start);

        let quests = vec![done, dropped, open];
        let summary = DaySummary::from_quests(
            &quests,
            &DifficultyMode::Normal.policy(),
            date().and_time(time(12, 0)),
            start,
        );
        assert_eq!(summary.xp_earned, 40);
        assert_eq!(summary.quests_completed, 1);
        assert_eq!(summary.quests_sacrificed, 1);
        assert_eq!(summary.quests_failed, 0);
        assert_eq!(summary.accuracy_score, Some(90.0));
        assert_eq!(summary.darkness_level, 5);
        assert_eq!(summary.free_time_minutes, 135);
    }
}
