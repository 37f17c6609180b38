//! Headless day simulator: plays a planned day through the engine with a
//! seeded play style and records everything the engine reported.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use questline_game::numbers::round_f64_to_u32;
use questline_game::{
    ActionOutcome, BossReward, Clock, DayEngine, DayPlan, DaySnapshot, DaySummary,
    DifficultyMode, EngineConfig, EngineEvent, ManualClock, Quest, QuestId, QuestStatus,
    StreakVerdict, flush_outbox,
};

use super::store::MemoryStore;

const DRIFT_SKIP_CHANCE: f64 = 0.1;
const DRIFT_MIN_FACTOR: f64 = 0.5;
const DRIFT_MAX_FACTOR: f64 = 3.0;

/// How the simulated player works through the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    /// Works every quest for exactly its planned duration.
    Punctual,
    /// Works each quest for half to three times its plan, and sometimes gives up.
    Drifting,
    /// Skips every main quest and works side quests on plan.
    Avoidant,
}

impl PlayStyle {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Punctual => "punctual",
            Self::Drifting => "drifting",
            Self::Avoidant => "avoidant",
        }
    }

    fn choose(self, quest: &Quest, rng: &mut ChaCha20Rng) -> Move {
        match self {
            Self::Punctual => Move::Work(quest.duration_minutes),
            Self::Avoidant if quest.is_main() => Move::Skip,
            Self::Avoidant => Move::Work(quest.duration_minutes),
            Self::Drifting => {
                if rng.gen_bool(DRIFT_SKIP_CHANCE) {
                    return Move::Skip;
                }
                let factor = rng.gen_range(DRIFT_MIN_FACTOR..=DRIFT_MAX_FACTOR);
                Move::Work(round_f64_to_u32(f64::from(quest.duration_minutes) * factor))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Move {
    Work(u32),
    Skip,
}

/// Where a simulated day's plan comes from.
#[derive(Debug, Clone)]
pub enum DaySource {
    Builtin(fn(NaiveDate) -> DayPlan),
    Custom(DayPlan),
}

impl DaySource {
    fn day_plan(&self, date: NaiveDate) -> DayPlan {
        match self {
            Self::Builtin(build) => build(date),
            Self::Custom(plan) => plan.clone(),
        }
    }
}

/// Declarative plan for running one simulated day.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub mode: DifficultyMode,
    pub style: PlayStyle,
    pub source: DaySource,
    /// Clock time the player starts working; wake time when unset.
    pub start_at: Option<NaiveTime>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(mode: DifficultyMode, style: PlayStyle, source: DaySource) -> Self {
        Self {
            mode,
            style,
            source,
            start_at: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: DifficultyMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn starting_at(mut self, start_at: NaiveTime) -> Self {
        self.start_at = Some(start_at);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulated day completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// # Errors
    ///
    /// Returns the expectation's failure.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// One action the simulated player took.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub quest_id: Option<QuestId>,
    pub action: &'static str,
    pub at: NaiveDateTime,
}

/// Complete record of a simulated day.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub mode: DifficultyMode,
    pub style: PlayStyle,
    pub steps: Vec<StepRecord>,
    /// Quests dropped by triage, in the order they were dropped.
    pub triaged: Vec<QuestId>,
    pub at_risk: Vec<QuestId>,
    pub game_overs: usize,
    pub boss_defeated: bool,
    pub loot: Option<BossReward>,
    pub verdict: Option<StreakVerdict>,
    pub writes_applied: usize,
    pub violations: Vec<String>,
    pub day: DaySummary,
    pub final_state: DaySnapshot,
}

impl SimulationSummary {
    #[must_use]
    pub fn quests(&self) -> &[Quest] {
        self.final_state.quests.as_slice()
    }

    /// Quests that ended the day in `status`, optionally limited to one type.
    #[must_use]
    pub fn ended(&self, status: QuestStatus, main: Option<bool>) -> Vec<&Quest> {
        self.quests()
            .iter()
            .filter(|quest| quest.status == status)
            .filter(|quest| main.is_none_or(|main| quest.is_main() == main))
            .collect()
    }

    #[must_use]
    pub fn streak_kept(&self) -> bool {
        self.verdict.is_some_and(StreakVerdict::maintained)
    }
}

/// Headless deterministic runner over the day engine.
#[derive(Debug, Clone)]
pub struct DayTester {
    verbose: bool,
    config: EngineConfig,
}

impl DayTester {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            config: EngineConfig::default(),
        }
    }

    /// Play `plan` once with `seed` driving both the play style and loot.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be built or the engine rejects an
    /// action the simulated player only takes when it should be legal.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let mut day_plan = plan.source.day_plan(simulation_date());
        day_plan.mode = Some(plan.mode);
        let config = self.config.clone().with_loot_seed(seed);
        let profile = config.new_profile(plan.mode);
        let wake = day_plan.wake_time.unwrap_or(profile.default_wake_time);
        let clock = ManualClock::new(day_plan.date.and_time(plan.start_at.unwrap_or(wake)));
        let mut day = DayEngine::from_plan(config, day_plan, profile, &clock)
            .context("failed to build the simulated day")?;

        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut store = MemoryStore::seeded(day.snapshot());
        let mut run = Recorder::default();
        let mut watch = InvariantWatch::default();
        watch.check(&day, "plan", &mut run.violations);

        let step_limit = day.quests().len().saturating_mul(2).saturating_add(1);
        while let Some(quest) = next_pending(day.quests()) {
            if run.steps.len() >= step_limit {
                run.violations.push(format!("no progress after {step_limit} steps"));
                break;
            }
            let id = quest.id.clone();
            match plan.style.choose(quest, &mut rng) {
                Move::Skip => {
                    let outcome = day
                        .skip_quest(&id)
                        .with_context(|| format!("skipping {id}"))?;
                    run.absorb(Some(&id), "skip", clock.now(), &outcome, &mut store);
                }
                Move::Work(minutes) => {
                    let started = day
                        .start_quest(&id)
                        .with_context(|| format!("starting {id}"))?;
                    run.absorb(Some(&id), "start", clock.now(), &started, &mut store);
                    // Triage can drop the side quest that was just started.
                    if day
                        .quest(&id)
                        .is_some_and(|quest| quest.status == QuestStatus::Active)
                    {
                        clock.advance_minutes(minutes);
                        let completed = day
                            .complete_quest(&id)
                            .with_context(|| format!("completing {id}"))?;
                        run.absorb(Some(&id), "complete", clock.now(), &completed, &mut store);
                    }
                }
            }
            watch.check(&day, id.as_str(), &mut run.violations);

            if day.is_game_over() {
                let acknowledged = day
                    .acknowledge_game_over()
                    .context("acknowledging game over")?;
                run.absorb(None, "acknowledge", clock.now(), &acknowledged, &mut store);
            }
        }

        if let Some(loot) = run.loot.clone() {
            let claimed = day
                .claim_reward(&loot.id)
                .with_context(|| format!("claiming {}", loot.id))?;
            run.absorb(None, "claim", clock.now(), &claimed, &mut store);
            if !store.claimed().contains(&loot.id) {
                run.violations
                    .push(format!("reward {} was never stored as claimed", loot.id));
            }
        }

        let closed = day.close_day().context("closing the day")?;
        run.absorb(None, "close_day", clock.now(), &closed, &mut store);
        run.violations.extend(store.diff(day.snapshot()));
        if day.close_day().is_ok() {
            run.violations.push("day closed a second time".to_string());
        }

        if self.verbose {
            log::info!(
                "seed {seed}: {} steps, {} writes, verdict {:?}",
                run.steps.len(),
                run.writes_applied,
                run.verdict
            );
        }

        Ok(SimulationSummary {
            seed,
            mode: plan.mode,
            style: plan.style,
            steps: run.steps,
            triaged: run.triaged,
            at_risk: run.at_risk,
            game_overs: run.game_overs,
            boss_defeated: run.boss_defeated,
            loot: run.loot,
            verdict: run.verdict,
            writes_applied: run.writes_applied,
            violations: run.violations,
            day: day.summary(),
            final_state: day.into_snapshot(),
        })
    }
}

/// Fixed calendar day every simulation runs on.
#[must_use]
pub fn simulation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap_or_default()
}

fn next_pending(quests: &[Quest]) -> Option<&Quest> {
    quests
        .iter()
        .filter(|quest| quest.status == QuestStatus::Pending)
        .min_by_key(|quest| quest.position)
}

#[derive(Debug, Default)]
struct Recorder {
    steps: Vec<StepRecord>,
    triaged: Vec<QuestId>,
    at_risk: Vec<QuestId>,
    game_overs: usize,
    boss_defeated: bool,
    loot: Option<BossReward>,
    verdict: Option<StreakVerdict>,
    writes_applied: usize,
    violations: Vec<String>,
}

impl Recorder {
    fn absorb(
        &mut self,
        quest_id: Option<&QuestId>,
        action: &'static str,
        at: NaiveDateTime,
        outcome: &ActionOutcome,
        store: &mut MemoryStore,
    ) {
        self.steps.push(StepRecord {
            quest_id: quest_id.cloned(),
            action,
            at,
        });
        for event in &outcome.events {
            match event {
                EngineEvent::QuestsSacrificed { quest_ids } => {
                    self.triaged.extend(quest_ids.iter().cloned());
                }
                EngineEvent::MainQuestsAtRisk { quest_ids } => {
                    for id in quest_ids {
                        if !self.at_risk.contains(id) {
                            self.at_risk.push(id.clone());
                        }
                    }
                }
                EngineEvent::GameOver => self.game_overs += 1,
                EngineEvent::BossDefeated { .. } => self.boss_defeated = true,
                EngineEvent::LootDropped { reward, .. } => self.loot = Some(reward.clone()),
                EngineEvent::DayClosed { verdict, .. } => self.verdict = Some(*verdict),
                _ => {}
            }
        }

        let report = flush_outbox(store, &outcome.outbox);
        self.writes_applied += report.applied;
        for failure in report.failures {
            self.violations.push(format!(
                "{action}: write #{} ({}) failed: {}",
                failure.index, failure.op, failure.message
            ));
        }
    }
}

/// Checks that must hold after every simulated action.
#[derive(Debug, Default)]
struct InvariantWatch {
    total_xp: u64,
    finished: HashMap<QuestId, QuestStatus>,
}

impl InvariantWatch {
    fn check<C: Clock>(&mut self, day: &DayEngine<C>, label: &str, violations: &mut Vec<String>) {
        let queue = &day.snapshot().quests;
        if queue.active_count() > 1 {
            violations.push(format!("{label}: more than one active quest"));
        }
        if !queue.positions_are_dense() {
            violations.push(format!("{label}: queue positions are not dense"));
        }
        if let Some(boss) = day.boss()
            && boss.current_hp > boss.total_hp
        {
            violations.push(format!(
                "{label}: boss hp {} above total {}",
                boss.current_hp, boss.total_hp
            ));
        }
        let darkness = day.darkness_level();
        if darkness > 100 {
            violations.push(format!("{label}: darkness {darkness} out of range"));
        }

        let total_xp = day.profile().total_xp;
        if total_xp < self.total_xp {
            violations.push(format!(
                "{label}: total XP dropped from {} to {total_xp}",
                self.total_xp
            ));
        }
        self.total_xp = total_xp;

        for quest in day.quests() {
            if let Some(previous) = self.finished.get(&quest.id)
                && *previous != quest.status
            {
                violations.push(format!(
                    "{label}: quest {} left terminal status {previous:?}",
                    quest.id
                ));
            }
            if quest.is_terminal() {
                self.finished.insert(quest.id.clone(), quest.status);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questline_game::QuestDraft;
    use questline_game::QuestType;

    fn two_quest_day(date: NaiveDate) -> DayPlan {
        let mut plan = DayPlan::new(date);
        plan.quests = vec![
            QuestDraft::new("focus", "Focus block", QuestType::Main, 60),
            QuestDraft::new("walk", "Walk", QuestType::Side, 30),
        ];
        plan
    }

    fn plan(style: PlayStyle) -> SimulationPlan {
        SimulationPlan::new(DifficultyMode::Normal, style, DaySource::Builtin(two_quest_day))
    }

    #[test]
    fn punctual_day_completes_everything() {
        let summary = DayTester::new(false)
            .run_plan(&plan(PlayStyle::Punctual), 1)
            .unwrap();
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
        assert_eq!(summary.ended(QuestStatus::Completed, None).len(), 2);
        assert_eq!(summary.day.xp_earned, 50);
        assert_eq!(summary.verdict, Some(StreakVerdict::Met));
        assert_eq!(summary.steps.last().unwrap().action, "close_day");
    }

    #[test]
    fn avoidant_player_skips_main_quests() {
        let summary = DayTester::new(false)
            .run_plan(&plan(PlayStyle::Avoidant), 1)
            .unwrap();
        assert_eq!(summary.ended(QuestStatus::Sacrificed, Some(true)).len(), 1);
        assert_eq!(summary.game_overs, 0);
        // Sacrificed quests leave the streak denominator.
        assert!(summary.streak_kept());

        let hardcore = plan(PlayStyle::Avoidant).with_mode(DifficultyMode::Hardcore);
        let summary = DayTester::new(false).run_plan(&hardcore, 1).unwrap();
        assert_eq!(summary.ended(QuestStatus::Failed, Some(true)).len(), 1);
        assert_eq!(summary.game_overs, 1);
        assert_eq!(summary.final_state.profile.current_streak, 0);
    }

    #[test]
    fn drifting_runs_are_reproducible_per_seed() {
        let tester = DayTester::new(false);
        let first = tester.run_plan(&plan(PlayStyle::Drifting), 99).unwrap();
        let second = tester.run_plan(&plan(PlayStyle::Drifting), 99).unwrap();
        assert_eq!(first.final_state, second.final_state);
        assert!(first.violations.is_empty(), "{:?}", first.violations);
    }

    #[test]
    fn late_start_respects_the_start_time() {
        let late =
            plan(PlayStyle::Punctual).starting_at(NaiveTime::from_hms_opt(21, 30, 0).unwrap());
        let summary = DayTester::new(false).run_plan(&late, 5).unwrap();
        assert_eq!(summary.triaged, vec![QuestId::new("walk")]);
        assert_eq!(summary.at_risk, vec![QuestId::new("focus")]);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
    }
}
