use anyhow::{Result, ensure};
use chrono::{NaiveDate, NaiveTime};

use crate::common::scenario::TestScenario;
use crate::logic::{DaySource, DayTester, PlayStyle, SimulationPlan, SimulationSummary};
use questline_game::{
    AttributeId, AttributeLinks, Boss, BossReward, DayPlan, DifficultyMode, QuestDraft,
    QuestStatus, QuestType, StreakVerdict,
};

/// One runnable entry in the scenario catalog.
pub struct CatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> SimulationPlan,
}

impl CatalogEntry {
    #[must_use]
    pub fn scenario(&self) -> TestScenario {
        TestScenario::simulation(self.key, self.name, (self.build)())
    }
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "smoke",
        name: "Smoke",
        description: "Punctual sprint day: everything completes and the boss falls",
        build: smoke_plan,
    },
    CatalogEntry {
        key: "overbooked",
        name: "Overbooked Evening",
        description: "Late start: trailing side quests are sacrificed, mains survive",
        build: overbooked_plan,
    },
    CatalogEntry {
        key: "main-overflow",
        name: "Main Quest Overflow",
        description: "Mains alone exceed the time left: flagged at risk, never dropped",
        build: main_overflow_plan,
    },
    CatalogEntry {
        key: "hardcore-skip",
        name: "Hardcore Skip",
        description: "Every main quest is skipped: hardcore fails them and ends the run",
        build: hardcore_skip_plan,
    },
    CatalogEntry {
        key: "boss-raid",
        name: "Boss Raid",
        description: "Boss-linked mains defeat the boss with a seed-stable loot drop",
        build: boss_raid_plan,
    },
    CatalogEntry {
        key: "drifting-day",
        name: "Drifting Day",
        description: "Random overruns and skips; engine invariants hold throughout",
        build: drifting_day_plan,
    },
];

pub fn find_catalog_scenario(key: &str) -> Option<TestScenario> {
    CATALOG
        .iter()
        .find(|entry| entry.key == key)
        .map(CatalogEntry::scenario)
}

// Days ------------------------------------------------------------------------

fn time(hour: u32, minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn links(attributes: &[AttributeId]) -> AttributeLinks {
    attributes.iter().copied().collect()
}

fn main_quest(id: &str, title: &str, minutes: u32, attrs: &[AttributeId]) -> QuestDraft {
    QuestDraft::new(id, title, QuestType::Main, minutes).with_attributes(links(attrs))
}

fn side_quest(id: &str, title: &str, minutes: u32, attrs: &[AttributeId]) -> QuestDraft {
    QuestDraft::new(id, title, QuestType::Side, minutes).with_attributes(links(attrs))
}

/// Six quests, 08:00 to 22:00, three of them chipping at a 30 HP boss.
pub fn sprint_day(date: NaiveDate) -> DayPlan {
    use AttributeId::{Cha, Cre, Foc, Int, Str, Vit};

    let mut plan = DayPlan::new(date);
    plan.wake_time = time(8, 0);
    plan.bedtime = time(22, 0);
    plan.boss = Some(Boss::new("sprint", "Close the Sprint", 30).with_rewards(vec![
        BossReward::new("coffee", "Fancy coffee"),
        BossReward::new("park", "Afternoon in the park"),
    ]));
    plan.quests = vec![
        main_quest("plan", "Sprint planning", 60, &[Int, Foc]).with_boss("sprint"),
        side_quest("gym", "Gym session", 45, &[Str, Vit]),
        main_quest("build", "Build the feature", 90, &[Cre, Int]).with_boss("sprint"),
        side_quest("email", "Answer email", 30, &[Cha]),
        main_quest("review", "Code review", 45, &[Foc]).with_boss("sprint"),
        side_quest("read", "Read a chapter", 30, &[Int]),
    ];
    plan
}

/// Long boss day: 45 damage available against 40 HP.
pub fn raid_day(date: NaiveDate) -> DayPlan {
    use AttributeId::{Cre, Foc, Int, Vit};

    let mut plan = DayPlan::new(date);
    plan.wake_time = time(7, 0);
    plan.bedtime = time(23, 0);
    plan.boss = Some(Boss::new("report", "Quarterly Report", 40).with_rewards(vec![
        BossReward::new("spa", "Spa afternoon"),
        BossReward::new("concert", "Concert tickets"),
        BossReward::new("ramen", "Ramen night"),
    ]));
    plan.quests = vec![
        main_quest("draft", "Draft the report", 120, &[Int, Foc]).with_boss("report"),
        main_quest("numbers", "Crunch the numbers", 90, &[Int]).with_boss("report"),
        side_quest("lunch", "Proper lunch", 30, &[Vit]),
        main_quest("polish", "Polish and send", 60, &[Cre]).with_boss("report"),
    ];
    plan
}

// Plans -----------------------------------------------------------------------

fn smoke_plan() -> SimulationPlan {
    SimulationPlan::new(
        DifficultyMode::Normal,
        PlayStyle::Punctual,
        DaySource::Builtin(sprint_day),
    )
    .with_expectation(everything_completed)
    .with_expectation(boss_falls)
    .with_expectation(xp_is_banked)
}

fn overbooked_plan() -> SimulationPlan {
    SimulationPlan::new(
        DifficultyMode::Normal,
        PlayStyle::Punctual,
        DaySource::Builtin(sprint_day),
    )
    .starting_at(NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default())
    .with_expectation(trailing_sides_sacrificed)
    .with_expectation(no_main_lost)
    .with_expectation(boss_falls)
}

fn main_overflow_plan() -> SimulationPlan {
    SimulationPlan::new(
        DifficultyMode::Normal,
        PlayStyle::Punctual,
        DaySource::Builtin(sprint_day),
    )
    .starting_at(NaiveTime::from_hms_opt(20, 30, 0).unwrap_or_default())
    .with_expectation(mains_flagged_at_risk)
    .with_expectation(no_main_lost)
}

fn hardcore_skip_plan() -> SimulationPlan {
    SimulationPlan::new(
        DifficultyMode::Hardcore,
        PlayStyle::Avoidant,
        DaySource::Builtin(sprint_day),
    )
    .with_expectation(skipped_mains_follow_mode)
}

fn boss_raid_plan() -> SimulationPlan {
    SimulationPlan::new(
        DifficultyMode::Normal,
        PlayStyle::Punctual,
        DaySource::Builtin(raid_day),
    )
    .with_expectation(boss_falls)
    .with_expectation(loot_is_reproducible)
}

fn drifting_day_plan() -> SimulationPlan {
    SimulationPlan::new(
        DifficultyMode::Normal,
        PlayStyle::Drifting,
        DaySource::Builtin(sprint_day),
    )
    .with_expectation(day_accounts_balance)
    .with_expectation(xp_is_banked)
}

// Expectations ----------------------------------------------------------------

fn everything_completed(summary: &SimulationSummary) -> Result<()> {
    let completed = summary.ended(QuestStatus::Completed, None).len();
    ensure!(
        completed == summary.quests().len(),
        "expected every quest completed, got {completed}/{}",
        summary.quests().len()
    );
    ensure!(summary.triaged.is_empty(), "nothing should be triaged on a punctual day");
    ensure!(summary.streak_kept(), "streak should survive a perfect day");
    ensure!(summary.day.darkness_level == 0, "perfect day should stay light");
    Ok(())
}

fn boss_falls(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.boss_defeated, "boss should be defeated");
    let boss = summary
        .final_state
        .boss
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("day lost its boss"))?;
    ensure!(boss.current_hp == 0, "defeated boss has {} HP left", boss.current_hp);
    ensure!(boss.defeated_at.is_some(), "defeat time not recorded");
    ensure!(summary.loot.is_some(), "a boss with rewards should drop loot");
    Ok(())
}

fn xp_is_banked(summary: &SimulationSummary) -> Result<()> {
    let earned: u64 = summary
        .quests()
        .iter()
        .map(|quest| u64::from(quest.earned_xp))
        .sum();
    ensure!(
        earned == summary.final_state.profile.total_xp,
        "quests earned {earned} XP but profile banked {}",
        summary.final_state.profile.total_xp
    );
    ensure!(earned == summary.day.xp_earned, "day summary disagrees on XP");
    Ok(())
}

fn trailing_sides_sacrificed(summary: &SimulationSummary) -> Result<()> {
    let triaged: Vec<&str> = summary.triaged.iter().map(|id| id.as_str()).collect();
    ensure!(
        triaged == ["read", "email"],
        "expected read then email to be sacrificed, got {triaged:?}"
    );
    ensure!(summary.at_risk.is_empty(), "mains fit and should not be at risk");
    Ok(())
}

fn no_main_lost(summary: &SimulationSummary) -> Result<()> {
    let lost: Vec<&str> = summary
        .quests()
        .iter()
        .filter(|quest| quest.is_main() && quest.status != QuestStatus::Completed)
        .map(|quest| quest.id.as_str())
        .collect();
    ensure!(lost.is_empty(), "main quests not completed: {lost:?}");
    Ok(())
}

fn mains_flagged_at_risk(summary: &SimulationSummary) -> Result<()> {
    let sides = summary.quests().iter().filter(|quest| !quest.is_main()).count();
    ensure!(
        summary.triaged.len() == sides,
        "every side quest should be sacrificed, got {}",
        summary.triaged.len()
    );
    ensure!(!summary.at_risk.is_empty(), "overflowing mains should be flagged");
    for id in &summary.at_risk {
        let is_main = summary
            .quests()
            .iter()
            .any(|quest| &quest.id == id && quest.is_main());
        ensure!(is_main, "{id} flagged at risk but is not a main quest");
    }
    Ok(())
}

fn skipped_mains_follow_mode(summary: &SimulationSummary) -> Result<()> {
    let mains = summary.quests().iter().filter(|quest| quest.is_main()).count();
    if summary.mode.is_hardcore() {
        ensure!(
            summary.ended(QuestStatus::Failed, Some(true)).len() == mains,
            "hardcore should fail every skipped main"
        );
        ensure!(
            summary.game_overs == mains,
            "expected {mains} game overs, got {}",
            summary.game_overs
        );
        ensure!(
            summary.verdict == Some(StreakVerdict::MainQuestMissed),
            "hardcore streak should break on missed mains, got {:?}",
            summary.verdict
        );
        ensure!(summary.final_state.profile.current_streak == 0, "streak should reset");
    } else {
        ensure!(summary.game_overs == 0, "only hardcore can end the run");
        ensure!(
            summary.ended(QuestStatus::Sacrificed, Some(true)).len() == mains,
            "skipped mains should be sacrificed"
        );
    }
    ensure!(
        summary.ended(QuestStatus::Completed, Some(false)).len()
            == summary.quests().len() - mains,
        "side quests should still be completed"
    );
    Ok(())
}

fn loot_is_reproducible(summary: &SimulationSummary) -> Result<()> {
    let replay = DayTester::new(false).run_plan(
        &boss_raid_plan().with_mode(summary.mode),
        summary.seed,
    )?;
    ensure!(
        replay.loot == summary.loot,
        "loot differs between runs of seed {}: {:?} vs {:?}",
        summary.seed,
        summary.loot,
        replay.loot
    );
    Ok(())
}

fn day_accounts_balance(summary: &SimulationSummary) -> Result<()> {
    let day = &summary.day;
    let resolved = day.quests_completed + day.quests_sacrificed + day.quests_failed;
    ensure!(
        resolved == summary.quests().len(),
        "{resolved} of {} quests resolved",
        summary.quests().len()
    );
    ensure!(day.darkness_level <= 100, "darkness {} out of range", day.darkness_level);
    ensure!(day.free_time_minutes <= 14 * 60, "free time exceeds the waking day");
    Ok(())
}
