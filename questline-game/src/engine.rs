//! The day engine: the single owner of one day's quests along with the
//! profile, boss and attribute totals.
//!
//! Each action reads the clock once, validates against the current snapshot,
//! and either fails without touching state or applies the change and returns
//! the resulting presentation events plus the write-intents to persist.
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::{AttributeId, AttributeTotals};
use crate::boss::{Boss, BossId, BossReward, loot_rng};
use crate::clock::{Clock, SystemClock};
use crate::config::{EngineConfig, PlanError, check_bounds};
use crate::darkness::darkness_level;
use crate::day::{Day, DaySummary};
use crate::difficulty::DifficultyPolicy;
use crate::event::{ActionOutcome, EngineEvent, WriteIntent};
use crate::plan::{DayPlan, QuestDraft};
use crate::profile::Profile;
use crate::queue::QuestQueue;
use crate::quest::{Quest, QuestId, QuestStatus, TransitionError};
use crate::reward::{RewardBreakdown, calculate_reward, split_attribute_xp};
use crate::schedule::{free_time_minutes, recalculate_schedule};
use crate::streak::{StreakVerdict, evaluate_streak, should_trigger_game_over};
use crate::triage::{TriageReport, run_triage};

/// Rejected engine action. No state is changed when one of these is returned.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("no quest with id {0}")]
    UnknownQuest(QuestId),
    #[error("quest {quest_id}: {source}")]
    Transition {
        quest_id: QuestId,
        source: TransitionError,
    },
    #[error("quest {active} is already active")]
    AnotherQuestActive { active: QuestId },
    #[error("quest {0} has no recorded start")]
    MissingStart(QuestId),
    #[error("quest {0} is finished and can no longer change")]
    TerminalQuest(QuestId),
    #[error("quest {0} is not pending")]
    NotPending(QuestId),
    #[error("no unclaimed reward {0}")]
    UnknownReward(String),
    #[error("a game over is waiting to be acknowledged")]
    GameOverPending,
    #[error("no game over is waiting to be acknowledged")]
    NoGameOver,
    #[error("day {0} is already closed")]
    DayClosed(NaiveDate),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Everything the engine owns for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub day: Day,
    pub quests: QuestQueue,
    pub profile: Profile,
    #[serde(default)]
    pub boss: Option<Boss>,
    #[serde(default)]
    pub attributes: AttributeTotals,
}

/// Transient signals for the presentation layer, kept until cleared.
#[derive(Debug, Clone, Default)]
struct Signals {
    recent_damage: Option<u32>,
    recent_sacrifices: Vec<QuestId>,
    at_risk: Vec<QuestId>,
    last_triage: Option<TriageReport>,
    dropped_loot: Option<BossReward>,
    defeated_boss_title: Option<String>,
}

#[derive(Debug)]
pub struct DayEngine<C: Clock = SystemClock> {
    config: EngineConfig,
    clock: C,
    state: DaySnapshot,
    signals: Signals,
}

impl<C: Clock> DayEngine<C> {
    /// Resume an engine over an existing snapshot.
    pub fn new(config: EngineConfig, state: DaySnapshot, clock: C) -> Self {
        Self {
            config,
            clock,
            state,
            signals: Signals::default(),
        }
    }

    /// Build a day from a plan, laying the quests out back-to-back from wake time.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` when the configuration or the plan is invalid, or
    /// when the resolved day bounds are inverted.
    pub fn from_plan(
        config: EngineConfig,
        plan: DayPlan,
        mut profile: Profile,
        clock: C,
    ) -> Result<Self, PlanError> {
        config.validate()?;
        plan.validate()?;
        if let Some(mode) = plan.mode {
            profile.difficulty_mode = mode;
        }

        let day = Day {
            date: plan.date,
            bedtime: plan.bedtime,
            wake_time: plan.wake_time,
            closed: false,
        };
        let wake = day.wake_at(profile.default_wake_time);
        let bedtime = day.bedtime_at(profile.default_bedtime);
        check_bounds(wake.time(), bedtime.time())?;

        let quests = plan
            .quests
            .into_iter()
            .zip(0u32..)
            .map(|(draft, position)| {
                let base_xp = config.base_xp_for(draft.quest_type);
                draft.into_quest(position, wake, base_xp)
            })
            .collect();
        let mut queue = QuestQueue::new(quests);
        recalculate_schedule(queue.as_mut_slice(), 0, wake);

        log::debug!(
            "planned {} quests for {} in {} mode",
            queue.len(),
            day.date,
            profile.difficulty_mode
        );
        let state = DaySnapshot {
            day,
            quests: queue,
            profile,
            boss: plan.boss,
            attributes: AttributeTotals::new(),
        };
        Ok(Self::new(config, state, clock))
    }

    // Accessors -------------------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub const fn snapshot(&self) -> &DaySnapshot {
        &self.state
    }

    #[must_use]
    pub fn into_snapshot(self) -> DaySnapshot {
        self.state
    }

    #[must_use]
    pub fn quests(&self) -> &[Quest] {
        self.state.quests.as_slice()
    }

    #[must_use]
    pub fn quest(&self, id: &QuestId) -> Option<&Quest> {
        self.state.quests.get(id)
    }

    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.state.profile
    }

    #[must_use]
    pub const fn boss(&self) -> Option<&Boss> {
        self.state.boss.as_ref()
    }

    #[must_use]
    pub const fn attributes(&self) -> &AttributeTotals {
        &self.state.attributes
    }

    #[must_use]
    pub const fn policy(&self) -> DifficultyPolicy {
        self.state.profile.policy()
    }

    #[must_use]
    pub fn bedtime(&self) -> NaiveDateTime {
        self.state.day.bedtime_at(self.state.profile.default_bedtime)
    }

    #[must_use]
    pub fn wake_time(&self) -> NaiveDateTime {
        self.state.day.wake_at(self.state.profile.default_wake_time)
    }

    // Presentation signals --------------------------------------------------

    /// Damage dealt by the most recent boss hit.
    #[must_use]
    pub const fn recent_damage(&self) -> Option<u32> {
        self.signals.recent_damage
    }

    /// Quests flagged by the most recent triage pass.
    #[must_use]
    pub fn recent_sacrifices(&self) -> &[QuestId] {
        &self.signals.recent_sacrifices
    }

    #[must_use]
    pub fn at_risk(&self) -> &[QuestId] {
        &self.signals.at_risk
    }

    #[must_use]
    pub const fn last_triage(&self) -> Option<&TriageReport> {
        self.signals.last_triage.as_ref()
    }

    #[must_use]
    pub const fn dropped_loot(&self) -> Option<&BossReward> {
        self.signals.dropped_loot.as_ref()
    }

    #[must_use]
    pub fn defeated_boss_title(&self) -> Option<&str> {
        self.signals.defeated_boss_title.as_deref()
    }

    #[must_use]
    pub fn darkness_level(&self) -> u8 {
        darkness_level(self.quests(), &self.policy())
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.state.profile.game_over
    }

    #[must_use]
    pub fn free_time_minutes(&self) -> u32 {
        free_time_minutes(self.quests(), self.bedtime(), self.clock.now())
    }

    #[must_use]
    pub fn summary(&self) -> DaySummary {
        DaySummary::from_quests(
            self.quests(),
            &self.policy(),
            self.bedtime(),
            self.clock.now(),
        )
    }

    /// Drop transient signals once the presentation layer has shown them.
    pub fn clear_signals(&mut self) {
        self.signals = Signals::default();
    }

    // Quest actions ---------------------------------------------------------

    /// Start a pending quest, re-plan everything after it, then triage the rest
    /// of the day against bedtime.
    ///
    /// # Errors
    ///
    /// Returns `ActionError` for an unknown quest, a quest that is not pending,
    /// another quest already active, a pending game over, or a closed day.
    pub fn start_quest(&mut self, id: &QuestId) -> Result<ActionOutcome, ActionError> {
        self.ensure_playable()?;
        let now = self.clock.now();
        let before = self.state.clone();

        let quest = self.lookup(id)?;
        let status = guarded(quest, QuestStatus::Active)?;
        if let Some(active) = self.state.quests.active() {
            return Err(ActionError::AnotherQuestActive {
                active: active.id.clone(),
            });
        }
        let position = quest.position;

        let mut outcome = ActionOutcome::default();
        let quest = self.lookup_mut(id)?;
        quest.status = status;
        quest.actual_start = Some(now);
        outcome.emit(EngineEvent::QuestStarted {
            quest_id: id.clone(),
            at: now,
        });

        recalculate_schedule(self.state.quests.as_mut_slice(), position, now);
        if self.config.triage_on_start {
            let report = self.triage_at(now, &mut outcome);
            if !report.sacrificed.is_empty() {
                recalculate_schedule(self.state.quests.as_mut_slice(), position, now);
            }
        }
        self.refresh_game_over(&before, &mut outcome);
        self.write_changes(&before, &mut outcome);
        Ok(outcome)
    }

    /// Complete the active quest, award XP and attribute XP, damage the linked
    /// boss, and re-plan the quests after it from now.
    ///
    /// # Errors
    ///
    /// Returns `ActionError` for an unknown quest, a quest that is not active,
    /// a missing actual start, a pending game over, or a closed day.
    pub fn complete_quest(&mut self, id: &QuestId) -> Result<ActionOutcome, ActionError> {
        self.ensure_playable()?;
        let now = self.clock.now();
        let before = self.state.clone();
        let policy = self.policy();

        let quest = self.lookup(id)?;
        let status = guarded(quest, QuestStatus::Completed)?;
        if quest.actual_start.is_none() {
            return Err(ActionError::MissingStart(id.clone()));
        }

        let quest = self.lookup_mut(id)?;
        quest.status = status;
        quest.actual_end = Some(now);
        let reward = calculate_reward(quest, &policy);
        quest.earned_xp = reward.earned_xp;
        quest.accuracy = Some(reward.accuracy);
        let position = quest.position;
        let boss_id = quest.boss_id.clone();
        let attributes = quest.attribute_ids.clone();

        let mut outcome = ActionOutcome::default();
        outcome.emit(EngineEvent::QuestCompleted {
            quest_id: id.clone(),
            reward,
        });
        self.award(&reward, &attributes, &mut outcome);
        if let Some(boss_id) = boss_id {
            let dealt = self.damage_boss(&boss_id, reward.boss_damage, now, &mut outcome);
            self.lookup_mut(id)?.boss_damage = dealt;
        }

        recalculate_schedule(
            self.state.quests.as_mut_slice(),
            position.saturating_add(1),
            now,
        );
        self.refresh_game_over(&before, &mut outcome);
        self.write_changes(&before, &mut outcome);
        Ok(outcome)
    }

    /// Give up on a pending or active quest. Hardcore fails main quests
    /// instead of sacrificing them.
    ///
    /// # Errors
    ///
    /// Returns `ActionError` for an unknown or finished quest, a pending game over,
    /// or a closed day.
    pub fn skip_quest(&mut self, id: &QuestId) -> Result<ActionOutcome, ActionError> {
        self.ensure_playable()?;
        let now = self.clock.now();
        let before = self.state.clone();
        let hardcore = self.state.profile.difficulty_mode.is_hardcore();

        let quest = self.lookup(id)?;
        let target = if hardcore && quest.is_main() {
            QuestStatus::Failed
        } else {
            QuestStatus::Sacrificed
        };
        let status = guarded(quest, target)?;
        let position = quest.position;

        self.lookup_mut(id)?.status = status;
        let mut outcome = ActionOutcome::default();
        outcome.emit(EngineEvent::QuestSkipped {
            quest_id: id.clone(),
            status,
        });

        recalculate_schedule(
            self.state.quests.as_mut_slice(),
            position.saturating_add(1),
            now,
        );
        self.refresh_game_over(&before, &mut outcome);
        self.write_changes(&before, &mut outcome);
        Ok(outcome)
    }

    /// Append a quest to the end of the queue, planned after the last open quest.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::Plan` for an invalid draft, a duplicate id, or a
    /// boss link to a boss the day does not carry.
    pub fn add_quest(&mut self, draft: QuestDraft) -> Result<ActionOutcome, ActionError> {
        self.ensure_playable()?;
        let now = self.clock.now();
        draft.validate()?;
        if self.state.quests.get(&draft.id).is_some() {
            return Err(PlanError::DuplicateQuestId(draft.id).into());
        }
        if let Some(boss_id) = &draft.boss_id
            && self.boss().is_none_or(|boss| &boss.id != boss_id)
        {
            return Err(PlanError::UnknownBoss {
                quest_id: draft.id.clone(),
                boss_id: boss_id.clone(),
            }
            .into());
        }

        let before = self.state.clone();
        let planned_start = self
            .state
            .quests
            .open_tail_end()
            .unwrap_or_else(|| self.wake_time().max(now));
        let base_xp = self.config.base_xp_for(draft.quest_type);
        self.state
            .quests
            .push(draft.into_quest(0, planned_start, base_xp));

        let mut outcome = ActionOutcome::default();
        self.write_changes(&before, &mut outcome);
        Ok(outcome)
    }

    /// Remove a quest that has not finished yet; later quests move up one slot.
    ///
    /// # Errors
    ///
    /// Returns `ActionError` for an unknown or finished quest, a pending game over,
    /// or a closed day.
    pub fn delete_quest(&mut self, id: &QuestId) -> Result<ActionOutcome, ActionError> {
        self.ensure_playable()?;
        if self.lookup(id)?.is_terminal() {
            return Err(ActionError::TerminalQuest(id.clone()));
        }
        let before = self.state.clone();
        self.state.quests.remove(id);

        let mut outcome = ActionOutcome::default();
        self.write_changes(&before, &mut outcome);
        Ok(outcome)
    }

    /// Move a pending quest into another pending quest's slot and re-plan the
    /// day from wake time.
    ///
    /// # Errors
    ///
    /// Returns `ActionError` when either quest is unknown or not pending, or a
    /// game over is pending.
    pub fn reorder_quests(
        &mut self,
        moved: &QuestId,
        target: &QuestId,
    ) -> Result<ActionOutcome, ActionError> {
        self.ensure_playable()?;
        for id in [moved, target] {
            if self.lookup(id)?.status != QuestStatus::Pending {
                return Err(ActionError::NotPending(id.clone()));
            }
        }
        let before = self.state.clone();
        self.state.quests.move_to(moved, target);
        let wake = self.wake_time();
        recalculate_schedule(self.state.quests.as_mut_slice(), 0, wake);

        let mut outcome = ActionOutcome::default();
        self.write_changes(&before, &mut outcome);
        Ok(outcome)
    }

    /// Re-plan every pending quest from `start_from_position`, starting at `anchor`.
    pub fn recalculate_schedule(
        &mut self,
        start_from_position: u32,
        anchor: NaiveDateTime,
    ) -> ActionOutcome {
        if self.state.day.closed {
            return ActionOutcome::default();
        }
        let before = self.state.clone();
        recalculate_schedule(self.state.quests.as_mut_slice(), start_from_position, anchor);
        let mut outcome = ActionOutcome::default();
        self.write_changes(&before, &mut outcome);
        outcome
    }

    /// Triage the open plan against bedtime as of now.
    pub fn run_triage(&mut self) -> ActionOutcome {
        if self.state.day.closed {
            return ActionOutcome::default();
        }
        let now = self.clock.now();
        let before = self.state.clone();
        let mut outcome = ActionOutcome::default();
        let report = self.triage_at(now, &mut outcome);
        if !report.sacrificed.is_empty()
            && let Some(first_open) = self.first_open_position()
        {
            recalculate_schedule(self.state.quests.as_mut_slice(), first_open, now);
        }
        self.refresh_game_over(&before, &mut outcome);
        self.write_changes(&before, &mut outcome);
        outcome
    }

    // Progression actions ---------------------------------------------------

    /// # Errors
    ///
    /// Returns `ActionError::UnknownReward` when the day has no boss or the
    /// reward is unknown or already claimed.
    pub fn claim_reward(&mut self, reward_id: &str) -> Result<ActionOutcome, ActionError> {
        let Some(boss) = self.state.boss.as_mut() else {
            return Err(ActionError::UnknownReward(reward_id.to_string()));
        };
        if !boss.claim_reward(reward_id) {
            return Err(ActionError::UnknownReward(reward_id.to_string()));
        }
        let mut outcome = ActionOutcome::default();
        outcome.write(WriteIntent::RewardClaim {
            boss_id: boss.id.clone(),
            reward_id: reward_id.to_string(),
        });
        Ok(outcome)
    }

    /// Fold the day into the profile's streak counters. A day closes once;
    /// afterwards its quests no longer change.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::DayClosed` when the day was already closed.
    pub fn close_day(&mut self) -> Result<ActionOutcome, ActionError> {
        if self.state.day.closed {
            return Err(ActionError::DayClosed(self.state.day.date));
        }
        let before = self.state.clone();
        self.state.day.closed = true;
        let verdict: StreakVerdict = evaluate_streak(self.quests(), &self.policy());
        let profile = &mut self.state.profile;
        profile.apply_streak(verdict.maintained());
        log::info!(
            "closed {} with {:?}: streak {} (longest {})",
            self.state.day.date,
            verdict,
            profile.current_streak,
            profile.longest_streak
        );

        let mut outcome = ActionOutcome::default();
        outcome.emit(EngineEvent::DayClosed {
            verdict,
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
        });
        self.write_changes(&before, &mut outcome);
        Ok(outcome)
    }

    /// Dismiss a pending game over, resetting the streak.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::NoGameOver` when nothing is waiting to be acknowledged.
    pub fn acknowledge_game_over(&mut self) -> Result<ActionOutcome, ActionError> {
        if !self.state.profile.game_over {
            return Err(ActionError::NoGameOver);
        }
        let before = self.state.clone();
        self.state.profile.acknowledge_game_over();
        let mut outcome = ActionOutcome::default();
        self.write_changes(&before, &mut outcome);
        Ok(outcome)
    }

    // Internals -------------------------------------------------------------

    const fn ensure_playable(&self) -> Result<(), ActionError> {
        if self.state.day.closed {
            return Err(ActionError::DayClosed(self.state.day.date));
        }
        if self.state.profile.game_over {
            return Err(ActionError::GameOverPending);
        }
        Ok(())
    }

    fn lookup(&self, id: &QuestId) -> Result<&Quest, ActionError> {
        self.state
            .quests
            .get(id)
            .ok_or_else(|| ActionError::UnknownQuest(id.clone()))
    }

    fn lookup_mut(&mut self, id: &QuestId) -> Result<&mut Quest, ActionError> {
        self.state
            .quests
            .get_mut(id)
            .ok_or_else(|| ActionError::UnknownQuest(id.clone()))
    }

    fn first_open_position(&self) -> Option<u32> {
        self.state
            .quests
            .iter()
            .filter(|quest| quest.is_open())
            .map(|quest| quest.position)
            .min()
    }

    fn triage_at(&mut self, now: NaiveDateTime, outcome: &mut ActionOutcome) -> TriageReport {
        let bedtime = self.bedtime();
        let report = run_triage(self.state.quests.as_mut_slice(), bedtime, now);
        if !report.sacrificed.is_empty() {
            outcome.emit(EngineEvent::QuestsSacrificed {
                quest_ids: report.sacrificed.clone(),
            });
        }
        if !report.at_risk.is_empty() {
            outcome.emit(EngineEvent::MainQuestsAtRisk {
                quest_ids: report.at_risk.clone(),
            });
        }
        self.signals.recent_sacrifices.clone_from(&report.sacrificed);
        self.signals.at_risk.clone_from(&report.at_risk);
        self.signals.last_triage = Some(report.clone());
        report
    }

    fn award(
        &mut self,
        reward: &RewardBreakdown,
        attributes: &[AttributeId],
        outcome: &mut ActionOutcome,
    ) {
        if reward.earned_xp == 0 {
            return;
        }
        let total_xp = self.state.profile.award_xp(reward.earned_xp);
        outcome.emit(EngineEvent::XpAwarded {
            amount: reward.earned_xp,
            total_xp,
        });
        for (attribute, amount) in split_attribute_xp(reward.earned_xp, attributes) {
            if amount == 0 {
                continue;
            }
            let total_xp = self.state.attributes.add(attribute, amount);
            outcome.emit(EngineEvent::AttributeXpAwarded {
                attribute,
                amount,
                total_xp,
            });
        }
    }

    /// Damage actually dealt; 0 when the day's boss is absent, another boss or
    /// already defeated.
    fn damage_boss(
        &mut self,
        boss_id: &BossId,
        damage: u32,
        now: NaiveDateTime,
        outcome: &mut ActionOutcome,
    ) -> u32 {
        let Some(boss) = self
            .state
            .boss
            .as_mut()
            .filter(|boss| &boss.id == boss_id)
        else {
            return 0;
        };
        let hit = boss.apply_damage(damage, now);
        if hit.damage == 0 {
            return 0;
        }
        self.signals.recent_damage = Some(hit.damage);
        outcome.emit(EngineEvent::BossDamaged {
            boss_id: boss.id.clone(),
            outcome: hit,
        });
        if !hit.defeated {
            return hit.damage;
        }

        outcome.emit(EngineEvent::BossDefeated {
            boss_id: boss.id.clone(),
            title: boss.title.clone(),
        });
        self.signals.defeated_boss_title = Some(boss.title.clone());
        let mut rng = loot_rng(self.config.loot_seed, &boss.id);
        if let Some(reward) = boss.roll_loot(&mut rng) {
            self.signals.dropped_loot = Some(reward.clone());
            outcome.emit(EngineEvent::LootDropped {
                boss_id: boss.id.clone(),
                reward,
            });
        }
        hit.damage
    }

    /// Trip the game over when this action lost a main quest under hardcore.
    fn refresh_game_over(&mut self, before: &DaySnapshot, outcome: &mut ActionOutcome) {
        if self.state.profile.game_over {
            return;
        }
        let changed: Vec<Quest> = self
            .quests()
            .iter()
            .filter(|quest| {
                before
                    .quests
                    .get(&quest.id)
                    .is_none_or(|previous| previous.status != quest.status)
            })
            .cloned()
            .collect();
        if should_trigger_game_over(&changed, self.state.profile.difficulty_mode) {
            self.state.profile.game_over = true;
            log::info!("game over triggered on {}", self.state.day.date);
            outcome.emit(EngineEvent::GameOver);
        }
    }

    /// Queue write-intents for every record that differs from `before`.
    fn write_changes(&self, before: &DaySnapshot, outcome: &mut ActionOutcome) {
        for quest in before.quests.iter() {
            if self.state.quests.get(&quest.id).is_none() {
                outcome.write(WriteIntent::QuestDelete {
                    quest_id: quest.id.clone(),
                });
            }
        }
        for quest in self.state.quests.iter() {
            match before.quests.get(&quest.id) {
                None => outcome.write(WriteIntent::QuestInsert {
                    quest: quest.clone(),
                }),
                Some(previous) if previous != quest => outcome.write(WriteIntent::QuestUpdate {
                    quest: quest.clone(),
                }),
                Some(_) => {}
            }
        }

        if let Some(boss) = &self.state.boss {
            let changed = before.boss.as_ref().is_none_or(|previous| {
                previous.current_hp != boss.current_hp
                    || previous.status != boss.status
                    || previous.defeated_at != boss.defeated_at
            });
            if changed {
                outcome.write(WriteIntent::BossUpdate {
                    boss_id: boss.id.clone(),
                    current_hp: boss.current_hp,
                    status: boss.status,
                    defeated_at: boss.defeated_at,
                });
            }
        }

        for attribute in AttributeId::ALL {
            let total_xp = self.state.attributes.get(attribute);
            if total_xp != before.attributes.get(attribute) {
                outcome.write(WriteIntent::AttributeUpdate {
                    attribute,
                    total_xp,
                });
            }
        }

        let profile = &self.state.profile;
        if *profile != before.profile {
            outcome.write(WriteIntent::ProfileUpdate {
                total_xp: profile.total_xp,
                current_streak: profile.current_streak,
                longest_streak: profile.longest_streak,
                game_over: profile.game_over,
            });
        }
    }
}

fn guarded(quest: &Quest, to: QuestStatus) -> Result<QuestStatus, ActionError> {
    quest
        .status
        .transition(to)
        .map_err(|source| ActionError::Transition {
            quest_id: quest.id.clone(),
            source,
        })
}
