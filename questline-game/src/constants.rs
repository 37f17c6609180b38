//! Centralized balance and tuning constants for Questline engine logic.
//!
//! These values define the deterministic math for rewards, triage, and
//! failure signals. Gameplay can only be adjusted via code changes reviewed
//! in version control, rather than through runtime configuration.

// Base rewards -------------------------------------------------------------
pub const MAIN_QUEST_BASE_XP: u32 = 20;
pub const SIDE_QUEST_BASE_XP: u32 = 10;
pub(crate) const MAIN_QUEST_TYPE_MULTIPLIER: f64 = 2.0;
pub(crate) const SIDE_QUEST_TYPE_MULTIPLIER: f64 = 1.0;

// Accuracy and multiplier curve --------------------------------------------
pub(crate) const ACCURACY_PERFECT: f64 = 100.0;
pub(crate) const ACCURACY_EARLY_CAP: f64 = 120.0;
pub(crate) const EARLY_BONUS_SLOPE: f64 = 0.5;
pub(crate) const EARLY_BONUS_CAP: f64 = 1.2;
pub(crate) const OVERTIME_PENALTY_SLOPE: f64 = 0.5;
pub(crate) const REPORT_DECIMALS_SCALE: f64 = 100.0;

// Boss damage --------------------------------------------------------------
pub(crate) const BOSS_DAMAGE_MINUTES_PER_POINT: f64 = 6.0;

// Attributes ---------------------------------------------------------------
pub const MAX_ATTRIBUTES_PER_QUEST: usize = 2;

// Darkness weights ---------------------------------------------------------
pub(crate) const DARKNESS_MAX: u8 = 100;
pub(crate) const DARKNESS_PER_SACRIFICE: f64 = 5.0;
pub(crate) const DARKNESS_PER_FAILED_MAIN: f64 = 25.0;
pub(crate) const DARKNESS_HARDCORE_SCALE: f64 = 1.5;
/// Average-accuracy bands, checked in order: below `threshold` adds `penalty`.
pub(crate) const DARKNESS_ACCURACY_BANDS: [(f64, f64); 3] =
    [(50.0, 30.0), (70.0, 15.0), (85.0, 5.0)];

// Level curve --------------------------------------------------------------
pub(crate) const LEVEL_XP_STEP: u64 = 100;

// Clock --------------------------------------------------------------------
pub(crate) const MS_PER_MINUTE: f64 = 60_000.0;
