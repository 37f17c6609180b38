//! The ordered quest list for one day.
//!
//! Positions are kept dense (0..N-1) across structural changes, and at most
//! one quest may be active at a time.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::quest::{Quest, QuestId, QuestStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestQueue {
    quests: Vec<Quest>,
}

impl QuestQueue {
    /// Build a queue, ordering by the quests' existing positions.
    #[must_use]
    pub fn new(mut quests: Vec<Quest>) -> Self {
        quests.sort_by_key(|quest| quest.position);
        Self { quests }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Quest] {
        &self.quests
    }

    pub fn as_mut_slice(&mut self) -> &mut [Quest] {
        &mut self.quests
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    #[must_use]
    pub fn index_of(&self, id: &QuestId) -> Option<usize> {
        self.quests.iter().position(|quest| &quest.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &QuestId) -> Option<&Quest> {
        self.quests.iter().find(|quest| &quest.id == id)
    }

    pub fn get_mut(&mut self, id: &QuestId) -> Option<&mut Quest> {
        self.quests.iter_mut().find(|quest| &quest.id == id)
    }

    #[must_use]
    pub fn active(&self) -> Option<&Quest> {
        self.quests
            .iter()
            .find(|quest| quest.status == QuestStatus::Active)
    }

    /// Planned end of the last quest still in play, if any.
    #[must_use]
    pub fn open_tail_end(&self) -> Option<NaiveDateTime> {
        self.quests
            .iter()
            .filter(|quest| quest.is_open())
            .map(|quest| quest.planned_end)
            .max()
    }

    /// Append at the end of the queue, overwriting the quest's position.
    pub fn push(&mut self, mut quest: Quest) {
        quest.position = self.next_position();
        self.quests.push(quest);
    }

    /// Remove a quest and close the gap it leaves.
    pub fn remove(&mut self, id: &QuestId) -> Option<Quest> {
        let index = self.index_of(id)?;
        let removed = self.quests.remove(index);
        self.densify();
        Some(removed)
    }

    /// Move `moved` to the slot currently held by `target`, shifting the
    /// quests in between by one. Returns false when either id is unknown.
    pub fn move_to(&mut self, moved: &QuestId, target: &QuestId) -> bool {
        let (Some(from), Some(to)) = (self.index_of(moved), self.index_of(target)) else {
            return false;
        };
        let quest = self.quests.remove(from);
        self.quests.insert(to, quest);
        self.densify();
        true
    }

    /// Renumber positions to 0..N-1 in the current order.
    pub fn densify(&mut self) {
        for (index, quest) in self.quests.iter_mut().enumerate() {
            quest.position = u32::try_from(index).unwrap_or(u32::MAX);
        }
    }

    #[must_use]
    pub fn positions_are_dense(&self) -> bool {
        self.quests
            .iter()
            .enumerate()
            .all(|(index, quest)| usize::try_from(quest.position).is_ok_and(|pos| pos == index))
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.quests
            .iter()
            .filter(|quest| quest.status == QuestStatus::Active)
            .count()
    }

    fn next_position(&self) -> u32 {
        self.quests
            .iter()
            .map(|quest| quest.position.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Quest> {
        self.quests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::QuestType;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn queue() -> QuestQueue {
        QuestQueue::new(vec![
            Quest::new("c", "c", QuestType::Side, 30, at(10)).at_position(2),
            Quest::new("a", "a", QuestType::Main, 60, at(8)).at_position(0),
            Quest::new("b", "b", QuestType::Side, 60, at(9)).at_position(1),
        ])
    }

    fn order(queue: &QuestQueue) -> Vec<&str> {
        queue.iter().map(|quest| quest.id.as_str()).collect()
    }

    #[test]
    fn construction_sorts_by_position() {
        let queue = queue();
        assert_eq!(order(&queue), ["a", "b", "c"]);
        assert!(queue.positions_are_dense());
        assert_eq!(queue.open_tail_end(), Some(at(10) + chrono::Duration::minutes(30)));
    }

    #[test]
    fn removal_redensifies() {
        let mut queue = queue();
        let removed = queue.remove(&QuestId::new("b")).unwrap();
        assert_eq!(removed.id.as_str(), "b");
        assert_eq!(order(&queue), ["a", "c"]);
        assert_eq!(queue.get(&QuestId::new("c")).unwrap().position, 1);
        assert!(queue.remove(&QuestId::new("zzz")).is_none());
    }

    #[test]
    fn moving_shifts_neighbours() {
        let mut queue = queue();
        assert!(queue.move_to(&QuestId::new("c"), &QuestId::new("a")));
        assert_eq!(order(&queue), ["c", "a", "b"]);
        assert!(queue.positions_are_dense());

        assert!(queue.move_to(&QuestId::new("c"), &QuestId::new("b")));
        assert_eq!(order(&queue), ["a", "b", "c"]);
        assert!(!queue.move_to(&QuestId::new("c"), &QuestId::new("nope")));
    }

    #[test]
    fn push_appends_after_last_position() {
        let mut queue = queue();
        queue.push(Quest::new("d", "d", QuestType::Side, 15, at(12)).at_position(99));
        assert_eq!(queue.get(&QuestId::new("d")).unwrap().position, 3);
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn tracks_the_active_quest() {
        let mut queue = queue();
        assert!(queue.active().is_none());
        queue.get_mut(&QuestId::new("b")).unwrap().status = QuestStatus::Active;
        assert_eq!(queue.active().unwrap().id.as_str(), "b");
        assert_eq!(queue.active_count(), 1);
    }
}
