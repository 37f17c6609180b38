//! Questline Game Engine
//!
//! Platform-agnostic daily schedule and consequence engine for Questline.
//! This crate owns the quest queue, schedule recalculation, sacrifice triage,
//! rewards, and failure signals without UI or storage dependencies.

pub mod attributes;
pub mod boss;
pub mod clock;
pub mod config;
pub mod constants;
pub mod darkness;
pub mod day;
pub mod difficulty;
pub mod engine;
pub mod event;
pub mod numbers;
pub mod plan;
pub mod profile;
pub mod quest;
pub mod queue;
pub mod reward;
pub mod schedule;
pub mod storage;
pub mod streak;
pub mod triage;

// Re-export commonly used types
pub use attributes::{AttributeId, AttributeLinks, AttributeTotals, CharacterClass, ClassId};
pub use boss::{Boss, BossId, BossReward, BossStatus, DamageOutcome, loot_rng};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, PlanError};
pub use darkness::{DarknessInputs, darkness_level};
pub use day::{Day, DaySummary};
pub use difficulty::{DifficultyMode, DifficultyPolicy};
pub use engine::{ActionError, DayEngine, DaySnapshot};
pub use event::{ActionOutcome, EngineEvent, EventSeverity, UiSurfaceHint, WriteIntent};
pub use plan::{DayPlan, QuestDraft};
pub use profile::Profile;
pub use quest::{Quest, QuestId, QuestStatus, QuestType, TransitionError};
pub use queue::QuestQueue;
pub use reward::{LevelProgress, RewardBreakdown, calculate_reward, level_for_xp};
pub use schedule::{free_time_minutes, recalculate_schedule};
#[cfg(feature = "async")]
pub use storage::{AsyncQuestStorage, flush_outbox_async};
pub use storage::{FlushFailure, FlushReport, QuestStorage, flush_outbox};
pub use streak::{StreakVerdict, should_maintain_streak, should_trigger_game_over};
pub use triage::{TriageReport, TriageVerdict, run_triage};

use chrono::NaiveDate;

/// Trait for abstracting profile and day-plan loading
/// Platform-specific implementations should provide this
pub trait PlanLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the player's profile, if one exists yet
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be loaded.
    fn load_profile(&self) -> Result<Option<Profile>, Self::Error>;

    /// Load the plan for a calendar day
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be loaded or parsed.
    fn load_day_plan(&self, date: NaiveDate) -> Result<Option<DayPlan>, Self::Error>;
}

/// Entry point binding a plan loader and a store to day engines
pub struct QuestlineEngine<L, S>
where
    L: PlanLoader,
    S: QuestStorage,
{
    loader: L,
    storage: S,
    config: EngineConfig,
}

impl<L, S> QuestlineEngine<L, S>
where
    L: PlanLoader,
    S: QuestStorage,
{
    /// Create a new engine over a loader and a store
    pub const fn new(loader: L, storage: S, config: EngineConfig) -> Self {
        Self {
            loader,
            storage,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Open a day engine for `date`. Missing profiles start fresh in
    /// `default_mode`; missing plans start as an empty day.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the loaded plan is invalid.
    pub fn open_day<C: Clock>(
        &self,
        date: NaiveDate,
        default_mode: DifficultyMode,
        clock: C,
    ) -> Result<DayEngine<C>, anyhow::Error> {
        let profile = self
            .loader
            .load_profile()?
            .unwrap_or_else(|| self.config.new_profile(default_mode));
        let plan = self
            .loader
            .load_day_plan(date)?
            .unwrap_or_else(|| DayPlan::new(date));
        Ok(DayEngine::from_plan(self.config.clone(), plan, profile, clock)?)
    }

    /// Hand an action's outbox to the store. Failures are reported, never rolled back.
    pub fn persist(&mut self, outcome: &ActionOutcome) -> FlushReport {
        flush_outbox(&mut self.storage, &outcome.outbox)
    }
}
