use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use questline_game::{
    ActionError, AttributeId, BossStatus, DayEngine, DayPlan, DifficultyMode, EngineConfig,
    EngineEvent, ManualClock, Profile, QuestDraft, QuestId, QuestStatus, QuestType, StreakVerdict,
    WriteIntent,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    date().and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

fn id(value: &str) -> QuestId {
    QuestId::new(value)
}

fn launch_plan() -> DayPlan {
    DayPlan::from_json(include_str!("fixtures/launch_day.json")).unwrap()
}

fn simple_plan(quests: Vec<QuestDraft>) -> DayPlan {
    let mut plan = DayPlan::new(date());
    plan.wake_time = NaiveTime::from_hms_opt(8, 0, 0);
    plan.bedtime = NaiveTime::from_hms_opt(22, 0, 0);
    plan.quests = quests;
    plan
}

fn engine(plan: DayPlan, mode: DifficultyMode, clock: &ManualClock) -> DayEngine<&ManualClock> {
    let config = EngineConfig::default().with_loot_seed(7);
    let profile = config.new_profile(mode);
    DayEngine::from_plan(config, plan, profile, clock).unwrap()
}

#[test]
fn launch_day_runs_end_to_end() {
    let clock = ManualClock::new(at(8, 0));
    let mut day = engine(launch_plan(), DifficultyMode::Normal, &clock);
    assert_eq!(day.quest(&id("inbox")).unwrap().planned_start, at(10, 15));

    let started = day.start_quest(&id("brief")).unwrap();
    assert_eq!(started.events.len(), 1);
    assert_eq!(started.outbox.len(), 1);
    assert!(matches!(started.outbox[0], WriteIntent::QuestUpdate { .. }));

    // Early finish: 50 of 60 minutes.
    clock.advance_minutes(50);
    let completed = day.complete_quest(&id("brief")).unwrap();
    let brief = day.quest(&id("brief")).unwrap();
    assert_eq!(brief.status, QuestStatus::Completed);
    assert_eq!(brief.earned_xp, 43);
    assert_eq!(brief.accuracy, Some(120.0));
    assert_eq!(brief.boss_damage, 10);
    assert_eq!(day.boss().unwrap().current_hp, 5);
    assert_eq!(day.recent_damage(), Some(10));
    assert_eq!(day.attributes().get(AttributeId::Int), 21);
    assert_eq!(day.attributes().get(AttributeId::Foc), 21);
    assert!(
        completed.any_event(|event| matches!(event, EngineEvent::XpAwarded { amount: 43, .. }))
    );
    assert!(
        completed
            .outbox
            .iter()
            .any(|intent| matches!(intent, WriteIntent::BossUpdate { current_hp: 5, .. }))
    );
    // Later quests are re-planned from the early finish.
    assert_eq!(day.quest(&id("gym")).unwrap().planned_start, at(8, 50));

    day.start_quest(&id("demo")).unwrap();
    clock.advance_minutes(30);
    let defeat = day.complete_quest(&id("demo")).unwrap();
    let boss = day.boss().unwrap();
    assert_eq!(boss.current_hp, 0);
    assert_eq!(boss.status, BossStatus::Defeated);
    assert_eq!(boss.defeated_at, Some(at(9, 20)));
    assert_eq!(day.defeated_boss_title(), Some("Ship the Beta"));
    let loot = day.dropped_loot().cloned().unwrap();
    assert!(["sushi", "movie"].contains(&loot.id.as_str()));
    assert!(defeat.any_event(|event| matches!(event, EngineEvent::BossDefeated { .. })));
    assert!(defeat.any_event(|event| matches!(event, EngineEvent::LootDropped { .. })));
    assert_eq!(day.attributes().get(AttributeId::Cre), 40);

    day.skip_quest(&id("gym")).unwrap();
    assert_eq!(day.quest(&id("gym")).unwrap().status, QuestStatus::Sacrificed);

    day.start_quest(&id("inbox")).unwrap();
    clock.advance_minutes(30);
    day.complete_quest(&id("inbox")).unwrap();

    let summary = day.summary();
    assert_eq!(summary.xp_earned, 93);
    assert_eq!(summary.quests_completed, 3);
    assert_eq!(summary.quests_sacrificed, 1);
    assert_eq!(summary.darkness_level, 0);
    assert_eq!(day.profile().total_xp, 93);

    let closed = day.close_day().unwrap();
    assert!(closed.any_event(|event| matches!(
        event,
        EngineEvent::DayClosed {
            verdict: StreakVerdict::Met,
            current_streak: 1,
            ..
        }
    )));
    assert_eq!(day.profile().longest_streak, 1);

    let claim = day.claim_reward(&loot.id).unwrap();
    assert!(matches!(claim.outbox[0], WriteIntent::RewardClaim { .. }));
    assert!(matches!(
        day.claim_reward(&loot.id),
        Err(ActionError::UnknownReward(_))
    ));
}

#[test]
fn loot_draw_is_reproducible_for_a_seed() {
    let run = || {
        let clock = ManualClock::new(at(8, 0));
        let mut day = engine(launch_plan(), DifficultyMode::Normal, &clock);
        for (quest, minutes) in [("brief", 60), ("demo", 30)] {
            day.start_quest(&id(quest)).unwrap();
            clock.advance_minutes(minutes);
            day.complete_quest(&id(quest)).unwrap();
        }
        day.dropped_loot().cloned()
    };
    let first = run();
    assert!(first.is_some());
    assert_eq!(first, run());
}

#[test]
fn starting_late_triggers_side_quest_triage() {
    let clock = ManualClock::new(at(20, 0));
    let plan = simple_plan(vec![
        QuestDraft::new("report", "Report", QuestType::Main, 60),
        QuestDraft::new("walk", "Walk", QuestType::Side, 30),
        QuestDraft::new("call", "Call mom", QuestType::Side, 45),
    ]);
    let mut day = engine(plan, DifficultyMode::Normal, &clock);

    let outcome = day.start_quest(&id("report")).unwrap();
    assert_eq!(day.recent_sacrifices(), &[id("call")]);
    assert!(day.at_risk().is_empty());
    assert_eq!(day.quest(&id("walk")).unwrap().status, QuestStatus::Pending);
    assert!(outcome.any_event(|event| matches!(event, EngineEvent::QuestsSacrificed { .. })));
    assert!(outcome.outbox.iter().any(|intent| matches!(
        intent,
        WriteIntent::QuestUpdate { quest } if quest.id == id("call")
            && quest.status == QuestStatus::Sacrificed
    )));
    assert_eq!(day.free_time_minutes(), 30);
    assert_eq!(day.quest(&id("walk")).unwrap().planned_start, at(21, 0));
}

#[test]
fn overloaded_main_quests_are_flagged_not_dropped() {
    let clock = ManualClock::new(at(21, 0));
    let plan = simple_plan(vec![
        QuestDraft::new("a", "A", QuestType::Main, 40),
        QuestDraft::new("b", "B", QuestType::Side, 10),
        QuestDraft::new("c", "C", QuestType::Main, 40),
    ]);
    let mut day = engine(plan, DifficultyMode::Normal, &clock);

    let outcome = day.start_quest(&id("a")).unwrap();
    assert_eq!(day.recent_sacrifices(), &[id("b")]);
    assert_eq!(day.at_risk(), &[id("c")]);
    assert_eq!(day.quest(&id("c")).unwrap().status, QuestStatus::Pending);
    assert!(outcome.any_event(|event| matches!(event, EngineEvent::MainQuestsAtRisk { .. })));
    assert!(!day.is_game_over());
}

#[test]
fn hardcore_main_skip_is_game_over_until_acknowledged() {
    let clock = ManualClock::new(at(9, 0));
    let plan = simple_plan(vec![
        QuestDraft::new("m", "Main", QuestType::Main, 30),
        QuestDraft::new("s", "Side", QuestType::Side, 30),
    ]);
    let config = EngineConfig::default();
    let mut profile: Profile = config.new_profile(DifficultyMode::Hardcore);
    profile.current_streak = 4;
    profile.longest_streak = 4;
    let mut day = DayEngine::from_plan(config, plan, profile, &clock).unwrap();

    let outcome = day.skip_quest(&id("m")).unwrap();
    assert_eq!(day.quest(&id("m")).unwrap().status, QuestStatus::Failed);
    assert!(outcome.any_event(|event| matches!(event, EngineEvent::GameOver)));
    assert!(day.is_game_over());
    assert!(outcome.outbox.iter().any(|intent| matches!(
        intent,
        WriteIntent::ProfileUpdate {
            game_over: true,
            ..
        }
    )));

    assert!(matches!(
        day.start_quest(&id("s")),
        Err(ActionError::GameOverPending)
    ));

    let ack = day.acknowledge_game_over().unwrap();
    assert!(!day.is_game_over());
    assert_eq!(day.profile().current_streak, 0);
    assert_eq!(day.profile().longest_streak, 4);
    assert!(matches!(
        ack.outbox.as_slice(),
        [WriteIntent::ProfileUpdate {
            game_over: false,
            current_streak: 0,
            ..
        }]
    ));
    assert!(matches!(
        day.acknowledge_game_over(),
        Err(ActionError::NoGameOver)
    ));

    day.start_quest(&id("s")).unwrap();
    assert!(!day.close_day().unwrap().is_empty());
    assert_eq!(day.profile().current_streak, 0);
}

#[test]
fn hardcore_side_skip_is_only_a_sacrifice() {
    let clock = ManualClock::new(at(9, 0));
    let plan = simple_plan(vec![
        QuestDraft::new("m", "Main", QuestType::Main, 30),
        QuestDraft::new("s", "Side", QuestType::Side, 30),
    ]);
    let mut day = engine(plan, DifficultyMode::Hardcore, &clock);
    let outcome = day.skip_quest(&id("s")).unwrap();
    assert_eq!(day.quest(&id("s")).unwrap().status, QuestStatus::Sacrificed);
    assert!(!outcome.any_event(|event| matches!(event, EngineEvent::GameOver)));
    assert!(!day.is_game_over());
}

#[test]
fn rejected_actions_leave_state_untouched() {
    let clock = ManualClock::new(at(8, 0));
    let plan = simple_plan(vec![
        QuestDraft::new("a", "A", QuestType::Main, 30),
        QuestDraft::new("b", "B", QuestType::Side, 30),
        QuestDraft::new("c", "C", QuestType::Side, 30),
    ]);
    let mut day = engine(plan, DifficultyMode::Normal, &clock);

    let pristine = day.snapshot().clone();
    assert!(matches!(
        day.complete_quest(&id("a")),
        Err(ActionError::Transition { .. })
    ));
    assert!(matches!(
        day.start_quest(&id("ghost")),
        Err(ActionError::UnknownQuest(_))
    ));
    assert_eq!(day.snapshot(), &pristine);

    day.start_quest(&id("a")).unwrap();
    let running = day.snapshot().clone();
    assert!(matches!(
        day.start_quest(&id("b")),
        Err(ActionError::AnotherQuestActive { active }) if active == id("a")
    ));
    assert!(matches!(
        day.reorder_quests(&id("a"), &id("c")),
        Err(ActionError::NotPending(_))
    ));
    assert_eq!(day.snapshot(), &running);

    clock.advance_minutes(30);
    day.complete_quest(&id("a")).unwrap();
    let finished = day.snapshot().clone();
    assert!(matches!(
        day.skip_quest(&id("a")),
        Err(ActionError::Transition { .. })
    ));
    assert!(matches!(
        day.delete_quest(&id("a")),
        Err(ActionError::TerminalQuest(_))
    ));
    assert_eq!(day.snapshot(), &finished);
}

#[test]
fn structural_edits_keep_positions_dense() {
    let clock = ManualClock::new(at(8, 0));
    let plan = simple_plan(vec![
        QuestDraft::new("a", "A", QuestType::Main, 60),
        QuestDraft::new("b", "B", QuestType::Side, 30),
        QuestDraft::new("c", "C", QuestType::Side, 45),
    ]);
    let mut day = engine(plan, DifficultyMode::Normal, &clock);

    let added = day
        .add_quest(QuestDraft::new("d", "D", QuestType::Side, 15))
        .unwrap();
    let d = day.quest(&id("d")).unwrap();
    assert_eq!(d.position, 3);
    assert_eq!(d.base_xp, 10);
    assert_eq!(d.planned_start, at(10, 15));
    assert!(matches!(added.outbox.as_slice(), [WriteIntent::QuestInsert { .. }]));
    assert!(matches!(
        day.add_quest(QuestDraft::new("d", "Again", QuestType::Side, 15)),
        Err(ActionError::Plan(_))
    ));

    let deleted = day.delete_quest(&id("b")).unwrap();
    assert!(matches!(deleted.outbox[0], WriteIntent::QuestDelete { .. }));
    assert_eq!(deleted.outbox.len(), 3);
    assert!(day.snapshot().quests.positions_are_dense());
    assert_eq!(day.quest(&id("d")).unwrap().position, 2);

    day.reorder_quests(&id("d"), &id("a")).unwrap();
    let order: Vec<&str> = day.quests().iter().map(|quest| quest.id.as_str()).collect();
    assert_eq!(order, ["d", "a", "c"]);
    assert!(day.snapshot().quests.positions_are_dense());
    assert_eq!(day.quest(&id("d")).unwrap().planned_start, at(8, 0));
    assert_eq!(day.quest(&id("a")).unwrap().planned_start, at(8, 15));
}

#[test]
fn public_triage_and_recalculation_report_changes() {
    let clock = ManualClock::new(at(8, 0));
    let plan = simple_plan(vec![
        QuestDraft::new("a", "A", QuestType::Main, 60),
        QuestDraft::new("b", "B", QuestType::Side, 60),
    ]);
    let mut day = engine(plan, DifficultyMode::Normal, &clock);

    let shifted = day.recalculate_schedule(0, at(9, 0));
    assert_eq!(shifted.outbox.len(), 2);
    assert!(day.recalculate_schedule(0, at(9, 0)).is_empty());

    clock.set(at(21, 0));
    let triaged = day.run_triage();
    assert_eq!(day.recent_sacrifices(), &[id("b")]);
    assert!(triaged.any_event(|event| matches!(event, EngineEvent::QuestsSacrificed { .. })));
    assert_eq!(day.quest(&id("a")).unwrap().planned_start, at(21, 0));
    assert!(day.run_triage().is_empty());

    day.clear_signals();
    assert!(day.recent_sacrifices().is_empty());
    assert!(day.last_triage().is_none());
}

#[test]
fn a_day_closes_only_once() {
    let clock = ManualClock::new(at(9, 0));
    let plan = simple_plan(vec![
        QuestDraft::new("m", "Main", QuestType::Main, 30),
        QuestDraft::new("s", "Side", QuestType::Side, 30),
    ]);
    let mut day = engine(plan, DifficultyMode::Normal, &clock);
    day.start_quest(&id("m")).unwrap();
    clock.advance_minutes(30);
    day.complete_quest(&id("m")).unwrap();

    let closed = day.close_day().unwrap();
    assert!(closed.any_event(|event| matches!(
        event,
        EngineEvent::DayClosed {
            current_streak: 1,
            ..
        }
    )));
    assert!(day.snapshot().day.closed);
    for _ in 0..2 {
        assert!(matches!(day.close_day(), Err(ActionError::DayClosed(d)) if d == date()));
    }
    assert_eq!(day.profile().current_streak, 1);
    assert_eq!(day.profile().longest_streak, 1);

    let frozen = day.snapshot().clone();
    assert!(matches!(
        day.start_quest(&id("s")),
        Err(ActionError::DayClosed(_))
    ));
    assert!(matches!(
        day.skip_quest(&id("s")),
        Err(ActionError::DayClosed(_))
    ));
    assert!(matches!(
        day.add_quest(QuestDraft::new("late", "Late", QuestType::Side, 15)),
        Err(ActionError::DayClosed(_))
    ));
    clock.set(at(21, 50));
    assert!(day.run_triage().is_empty());
    assert!(day.recalculate_schedule(0, at(21, 50)).is_empty());
    assert_eq!(day.snapshot(), &frozen);
}

#[test]
fn added_quest_follows_the_open_tail_even_when_it_lies_behind_now() {
    let clock = ManualClock::new(at(8, 0));
    let plan = simple_plan(vec![QuestDraft::new("a", "A", QuestType::Main, 60)]);
    let mut day = engine(plan, DifficultyMode::Normal, &clock);

    clock.set(at(12, 0));
    day.add_quest(QuestDraft::new("b", "B", QuestType::Side, 15)).unwrap();
    assert_eq!(day.quest(&id("b")).unwrap().planned_start, at(9, 0));

    let clock = ManualClock::new(at(12, 0));
    let mut empty = engine(simple_plan(Vec::new()), DifficultyMode::Normal, &clock);
    empty
        .add_quest(QuestDraft::new("b", "B", QuestType::Side, 15))
        .unwrap();
    assert_eq!(empty.quest(&id("b")).unwrap().planned_start, at(12, 0));
}

#[test]
fn quests_after_the_boss_falls_record_no_boss_damage() {
    let clock = ManualClock::new(at(8, 0));
    let mut day = engine(launch_plan(), DifficultyMode::Normal, &clock);
    for quest in ["brief", "demo"] {
        day.start_quest(&id(quest)).unwrap();
        clock.advance_minutes(30);
        day.complete_quest(&id(quest)).unwrap();
    }
    assert_eq!(day.boss().unwrap().status, BossStatus::Defeated);

    let mut encore = QuestDraft::new("encore", "Post-launch fixes", QuestType::Main, 30);
    encore.boss_id = Some(day.boss().unwrap().id.clone());
    day.add_quest(encore).unwrap();
    day.start_quest(&id("encore")).unwrap();
    clock.advance_minutes(30);
    let completed = day.complete_quest(&id("encore")).unwrap();

    let encore = day.quest(&id("encore")).unwrap();
    assert!(encore.earned_xp > 0);
    assert_eq!(encore.boss_damage, 0);
    assert!(!completed.any_event(|event| matches!(event, EngineEvent::BossDamaged { .. })));
    assert_eq!(day.boss().unwrap().current_hp, 0);
}
