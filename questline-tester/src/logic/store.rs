//! In-memory sink for engine write-intents. Replaying every outbox into it
//! must land on the same records the engine holds.
use std::collections::HashMap;
use std::convert::Infallible;

use questline_game::{
    AttributeId, BossStatus, DaySnapshot, Quest, QuestId, QuestStorage, WriteIntent,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    quests: HashMap<QuestId, Quest>,
    boss: Option<(u32, BossStatus)>,
    total_xp: u64,
    current_streak: u32,
    game_over: bool,
    attributes: HashMap<AttributeId, u64>,
    claimed: Vec<String>,
}

impl MemoryStore {
    /// Start from the records a freshly planned day would have written.
    #[must_use]
    pub fn seeded(snapshot: &DaySnapshot) -> Self {
        Self {
            quests: snapshot
                .quests
                .iter()
                .map(|quest| (quest.id.clone(), quest.clone()))
                .collect(),
            boss: snapshot
                .boss
                .as_ref()
                .map(|boss| (boss.current_hp, boss.status)),
            total_xp: snapshot.profile.total_xp,
            current_streak: snapshot.profile.current_streak,
            game_over: snapshot.profile.game_over,
            attributes: AttributeId::ALL
                .into_iter()
                .map(|attribute| (attribute, snapshot.attributes.get(attribute)))
                .collect(),
            claimed: Vec::new(),
        }
    }

    #[must_use]
    pub fn claimed(&self) -> &[String] {
        &self.claimed
    }

    /// Differences between the stored records and `snapshot`.
    #[must_use]
    pub fn diff(&self, snapshot: &DaySnapshot) -> Vec<String> {
        let mut drift = Vec::new();
        for quest in snapshot.quests.iter() {
            match self.quests.get(&quest.id) {
                Some(stored) if stored == quest => {}
                Some(_) => drift.push(format!("stored quest {} is stale", quest.id)),
                None => drift.push(format!("quest {} was never stored", quest.id)),
            }
        }
        if self.quests.len() != snapshot.quests.len() {
            drift.push(format!(
                "store holds {} quests, engine holds {}",
                self.quests.len(),
                snapshot.quests.len()
            ));
        }
        if let Some(boss) = &snapshot.boss
            && self.boss != Some((boss.current_hp, boss.status))
        {
            drift.push(format!("stored boss {} is stale", boss.id.0));
        }
        let profile = &snapshot.profile;
        if (self.total_xp, self.current_streak, self.game_over)
            != (profile.total_xp, profile.current_streak, profile.game_over)
        {
            drift.push("stored profile is stale".to_string());
        }
        for attribute in AttributeId::ALL {
            let stored = self.attributes.get(&attribute).copied().unwrap_or(0);
            if stored != snapshot.attributes.get(attribute) {
                drift.push(format!("stored {attribute:?} total is stale"));
            }
        }
        drift
    }
}

impl QuestStorage for MemoryStore {
    type Error = Infallible;

    fn apply(&mut self, intent: &WriteIntent) -> Result<(), Self::Error> {
        match intent {
            WriteIntent::QuestInsert { quest } | WriteIntent::QuestUpdate { quest } => {
                self.quests.insert(quest.id.clone(), quest.clone());
            }
            WriteIntent::QuestDelete { quest_id } => {
                self.quests.remove(quest_id);
            }
            WriteIntent::BossUpdate {
                current_hp, status, ..
            } => {
                self.boss = Some((*current_hp, *status));
            }
            WriteIntent::ProfileUpdate {
                total_xp,
                current_streak,
                game_over,
                ..
            } => {
                self.total_xp = *total_xp;
                self.current_streak = *current_streak;
                self.game_over = *game_over;
            }
            WriteIntent::AttributeUpdate {
                attribute,
                total_xp,
            } => {
                self.attributes.insert(*attribute, *total_xp);
            }
            WriteIntent::RewardClaim { reward_id, .. } => {
                self.claimed.push(reward_id.clone());
            }
        }
        Ok(())
    }
}
