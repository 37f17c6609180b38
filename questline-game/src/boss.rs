//! Boss HP pools absorbing main-quest damage, and their loot tables.
use chrono::NaiveDateTime;
use hmac::{Hmac, Mac};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BossId(pub String);

impl BossId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl From<&str> for BossId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossStatus {
    #[default]
    Active,
    Defeated,
    Failed,
}

/// Real-world reward the player unlocks by defeating a boss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossReward {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_claimed: bool,
}

impl BossReward {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_claimed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boss {
    pub id: BossId,
    pub title: String,
    pub total_hp: u32,
    pub current_hp: u32,
    #[serde(default)]
    pub status: BossStatus,
    #[serde(default)]
    pub defeated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub rewards: Vec<BossReward>,
}

/// Result of applying one hit to a boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub damage: u32,
    pub hp_before: u32,
    pub hp_after: u32,
    /// True only on the hit that moved the boss from alive to zero.
    pub defeated: bool,
}

impl Boss {
    #[must_use]
    pub fn new(id: impl Into<BossId>, title: impl Into<String>, total_hp: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            total_hp,
            current_hp: total_hp,
            status: BossStatus::Active,
            defeated_at: None,
            rewards: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rewards(mut self, rewards: Vec<BossReward>) -> Self {
        self.rewards = rewards;
        self
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, BossStatus::Active)
    }

    /// Apply damage, clamping HP at zero. Damage against a boss that is no
    /// longer active is ignored.
    pub fn apply_damage(&mut self, damage: u32, now: NaiveDateTime) -> DamageOutcome {
        let hp_before = self.current_hp;
        if !self.is_active() || damage == 0 {
            return DamageOutcome {
                damage: 0,
                hp_before,
                hp_after: hp_before,
                defeated: false,
            };
        }
        self.current_hp = hp_before.saturating_sub(damage);
        let defeated = hp_before > 0 && self.current_hp == 0;
        if defeated {
            self.status = BossStatus::Defeated;
            self.defeated_at = Some(now);
            log::info!("boss '{}' defeated", self.title);
        }
        DamageOutcome {
            damage,
            hp_before,
            hp_after: self.current_hp,
            defeated,
        }
    }

    /// Rewards that have not been claimed yet.
    pub fn unclaimed_rewards(&self) -> impl Iterator<Item = &BossReward> {
        self.rewards.iter().filter(|reward| !reward.is_claimed)
    }

    /// Draw one unclaimed reward uniformly at random.
    pub fn roll_loot<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<BossReward> {
        let pool: Vec<&BossReward> = self.unclaimed_rewards().collect();
        if pool.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..pool.len());
        pool.get(index).map(|reward| (*reward).clone())
    }

    /// Mark a reward as claimed; returns false when it is unknown or already claimed.
    pub fn claim_reward(&mut self, reward_id: &str) -> bool {
        match self
            .rewards
            .iter_mut()
            .find(|reward| reward.id == reward_id && !reward.is_claimed)
        {
            Some(reward) => {
                reward.is_claimed = true;
                true
            }
            None => false,
        }
    }
}

/// Deterministic loot stream for one boss, derived from the engine seed.
#[must_use]
pub fn loot_rng(seed: u64, boss_id: &BossId) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, boss_id.0.as_bytes()))
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(b"loot:");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
