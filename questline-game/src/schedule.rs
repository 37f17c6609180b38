//! Cascading planned-time recalculation and free-time accounting.
use chrono::NaiveDateTime;

use crate::numbers::{i64_to_f64, round_f64_to_u32};
use crate::quest::{Quest, QuestStatus, minutes};

/// Lay out every pending quest at or after `start_from_position` back-to-back
/// from `anchor`, in ascending position order.
///
/// Quests below the cursor and terminal quests keep their history. An active
/// quest keeps its planned start; its planned end is re-derived from the
/// actual start, and the running clock continues from there.
pub fn recalculate_schedule(quests: &mut [Quest], start_from_position: u32, anchor: NaiveDateTime) {
    quests.sort_by_key(|quest| quest.position);

    let mut running = anchor;
    for quest in quests.iter_mut() {
        if quest.position < start_from_position || quest.is_terminal() {
            continue;
        }
        match quest.status {
            QuestStatus::Active => {
                if let Some(actual_start) = quest.actual_start {
                    let end = actual_start + quest.planned_duration();
                    quest.planned_end = end;
                    running = end;
                    continue;
                }
                // An active quest without a recorded start is laid out like a pending one.
                lay_out(quest, &mut running);
            }
            QuestStatus::Pending => lay_out(quest, &mut running),
            QuestStatus::Completed | QuestStatus::Sacrificed | QuestStatus::Failed => {}
        }
    }
    log::debug!(
        "recalculated schedule from position {start_from_position}, clock ends at {running}"
    );
}

fn lay_out(quest: &mut Quest, running: &mut NaiveDateTime) {
    quest.planned_start = *running;
    quest.planned_end = *running + minutes(quest.duration_minutes);
    *running = quest.planned_end;
}
/// Minutes between `now` and `bedtime`, fractional to the millisecond and floored at zero.
/// Whole minutes between `now` and `bedtime`, floored at zero.
#[must_use]
pub fn minutes_until(bedtime: NaiveDateTime, now: NaiveDateTime) -> f64 {
    let millis = (bedtime - now).num_milliseconds();
    (i64_to_f64(millis) / crate::constants::MS_PER_MINUTE).max(0.0)
}

/// Minutes left before bedtime after every open quest is accounted for.
#[must_use]
pub fn free_time_minutes(quests: &[Quest], bedtime: NaiveDateTime, now: NaiveDateTime) -> u32 {
    let committed: u64 = quests
        .iter()
        .filter(|quest| quest.is_open())
        .map(|quest| u64::from(quest.duration_minutes))
        .sum();
    let committed = i64_to_f64(i64::try_from(committed).unwrap_or(i64::MAX));
    round_f64_to_u32(minutes_until(bedtime, now) - committed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::QuestType;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn queue() -> Vec<Quest> {
        vec![
            Quest::new("a", "Deep work", QuestType::Main, 60, at(8, 0)).at_position(0),
            Quest::new("b", "Email", QuestType::Side, 30, at(9, 0)).at_position(1),
            Quest::new("c", "Gym", QuestType::Side, 45, at(9, 30)).at_position(2),
        ]
    }

    #[test]
    fn minutes_until_keeps_partial_minutes() {
        let now = at(21, 0) + chrono::Duration::seconds(30);
        assert!((minutes_until(at(22, 0), now) - 59.5).abs() < f64::EPSILON);
        assert!(minutes_until(at(21, 0), now).abs() < f64::EPSILON);
    }

    #[test]
    fn pending_quests_cascade_back_to_back() {
        let mut quests = queue();
        recalculate_schedule(&mut quests, 0, at(10, 0));
        assert_eq!(quests[0].planned_start, at(10, 0));
        assert_eq!(quests[0].planned_end, at(11, 0));
        assert_eq!(quests[1].planned_start, at(11, 0));
        assert_eq!(quests[2].planned_start, at(11, 30));
        assert_eq!(quests[2].planned_end, at(12, 15));
    }

    #[test]
    fn history_and_earlier_positions_do_not_reflow() {
        let mut quests = queue();
        quests[0].status = QuestStatus::Completed;
        quests[1].status = QuestStatus::Sacrificed;
        let before = quests.clone();
        recalculate_schedule(&mut quests, 0, at(13, 0));
        assert_eq!(quests[0], before[0]);
        assert_eq!(quests[1], before[1]);
        assert_eq!(quests[2].planned_start, at(13, 0));

        let mut quests = queue();
        recalculate_schedule(&mut quests, 2, at(14, 0));
        assert_eq!(quests[0].planned_start, at(8, 0));
        assert_eq!(quests[2].planned_start, at(14, 0));
    }

    #[test]
    fn active_quest_follows_its_actual_start() {
        let mut quests = queue();
        quests[0].status = QuestStatus::Active;
        quests[0].actual_start = Some(at(8, 20));
        recalculate_schedule(&mut quests, 0, at(8, 30));
        assert_eq!(quests[0].planned_start, at(8, 0));
        assert_eq!(quests[0].planned_end, at(9, 20));
        assert_eq!(quests[1].planned_start, at(9, 20));
    }

    #[test]
    fn sorting_follows_position_not_input_order() {
        let mut quests = queue();
        quests.reverse();
        recalculate_schedule(&mut quests, 0, at(8, 0));
        let ids: Vec<&str> = quests.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn free_time_counts_only_open_quests() {
        let mut quests = queue();
        assert_eq!(free_time_minutes(&quests, at(12, 0), at(8, 0)), 105);
        quests[2].status = QuestStatus::Sacrificed;
        assert_eq!(free_time_minutes(&quests, at(12, 0), at(8, 0)), 150);
        assert_eq!(free_time_minutes(&quests, at(8, 0), at(9, 0)), 0);
    }
}
