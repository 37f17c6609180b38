//! Sacrifice triage: decide which quests drop when the open plan no longer
//! fits before bedtime.
//!
//! Only pending and active quests compete for the budget. Side quests are
//! dropped from the end of the queue first; main quests are never dropped
//! here, only reported as at risk when they cannot fit on their own.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::quest::{Quest, QuestId, QuestStatus};
use crate::schedule::minutes_until;

/// Which branch of the triage decision produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageVerdict {
    /// The open plan already fits.
    Fits,
    /// Dropping trailing side quests recovers the overflow.
    SideQuestsDropped,
    /// Main quests alone exceed the budget; every side quest was dropped.
    MainQuestsOverBudget,
}

/// Outcome of one triage pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageReport {
    pub verdict: TriageVerdict,
    pub budget_minutes: f64,
    pub total_minutes: u64,
    pub main_minutes: u64,
    /// Quests newly flagged sacrificed by this pass, in the order they were dropped.
    pub sacrificed: Vec<QuestId>,
    /// Main quests whose cumulative duration runs past the budget.
    pub at_risk: Vec<QuestId>,
}

impl TriageReport {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.sacrificed.is_empty() && self.at_risk.is_empty()
    }
}

/// Run triage over `quests`, flagging sacrificed quests in place.
///
/// Idempotent: once resolved, a second pass with the same inputs changes nothing.
pub fn run_triage(
    quests: &mut [Quest],
    bedtime: NaiveDateTime,
    now: NaiveDateTime,
) -> TriageReport {
    let mut candidates: Vec<(u32, usize)> = quests
        .iter()
        .enumerate()
        .filter(|(_, quest)| quest.is_open())
        .map(|(index, quest)| (quest.position, index))
        .collect();
    candidates.sort_unstable();

    let (main, side): (Vec<usize>, Vec<usize>) = candidates
        .into_iter()
        .map(|(_, index)| index)
        .partition(|index| quests[*index].is_main());

    let budget = minutes_until(bedtime, now);
    let duration_of = |indices: &[usize], quests: &[Quest]| -> u64 {
        indices
            .iter()
            .map(|index| u64::from(quests[*index].duration_minutes))
            .sum()
    };
    let main_minutes = duration_of(&main, &*quests);
    let total_minutes = main_minutes + duration_of(&side, &*quests);

    let mut report = TriageReport {
        verdict: TriageVerdict::Fits,
        budget_minutes: budget,
        total_minutes,
        main_minutes,
        sacrificed: Vec::new(),
        at_risk: Vec::new(),
    };

    if exceeds(total_minutes, budget) {
        if exceeds(main_minutes, budget) {
            report.verdict = TriageVerdict::MainQuestsOverBudget;
            for &index in &side {
                sacrifice(&mut quests[index], &mut report.sacrificed);
            }
            let mut running: u64 = 0;
            for &index in &main {
                running += u64::from(quests[index].duration_minutes);
                if exceeds(running, budget) {
                    report.at_risk.push(quests[index].id.clone());
                }
            }
        } else {
            report.verdict = TriageVerdict::SideQuestsDropped;
            let overflow = minutes_as_f64(total_minutes) - budget;
            let mut recovered = 0.0;
            for &index in side.iter().rev() {
                if recovered >= overflow {
                    break;
                }
                recovered += f64::from(quests[index].duration_minutes);
                sacrifice(&mut quests[index], &mut report.sacrificed);
            }
        }
    }

    log::debug!(
        "triage {:?}: budget {:.1}m, open {}m (main {}m), sacrificed {}, at risk {}",
        report.verdict,
        report.budget_minutes,
        report.total_minutes,
        report.main_minutes,
        report.sacrificed.len(),
        report.at_risk.len()
    );
    report
}

fn sacrifice(quest: &mut Quest, sacrificed: &mut Vec<QuestId>) {
    if quest.set_status(QuestStatus::Sacrificed).is_ok() {
        sacrificed.push(quest.id.clone());
    }
}

fn exceeds(minutes: u64, budget: f64) -> bool {
    minutes_as_f64(minutes) > budget
}

fn minutes_as_f64(minutes: u64) -> f64 {
    crate::numbers::i64_to_f64(i64::try_from(minutes).unwrap_or(i64::MAX))
}
