pub mod catalog;

use anyhow::{Result, ensure};
use questline_game::{DayPlan, DifficultyMode};

use crate::logic::{DaySource, PlayStyle, SimulationPlan, SimulationSummary};
use catalog::{CATALOG, find_catalog_scenario};

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: String,
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(
        key: impl Into<String>,
        name: impl Into<String>,
        plan: SimulationPlan,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            plan,
        }
    }

    /// Copy of this scenario pinned to `mode`.
    #[must_use]
    pub fn in_mode(&self, mode: DifficultyMode) -> Self {
        Self {
            key: self.key.clone(),
            name: format!("{} ({mode})", self.name),
            plan: self.plan.clone().with_mode(mode),
        }
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG
        .iter()
        .map(|entry| (entry.key, entry.description))
        .collect()
}

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    find_catalog_scenario(key)
}

/// Scenario for a caller-supplied day plan, played with drifting timings.
pub fn custom_scenario(plan: DayPlan) -> TestScenario {
    let mode = plan.mode.unwrap_or_default();
    TestScenario::simulation(
        "custom",
        format!("Custom Plan {}", plan.date),
        SimulationPlan::new(mode, PlayStyle::Drifting, DaySource::Custom(plan))
            .with_expectation(every_quest_resolved),
    )
}

fn every_quest_resolved(summary: &SimulationSummary) -> Result<()> {
    let open: Vec<&str> = summary
        .quests()
        .iter()
        .filter(|quest| !quest.is_terminal())
        .map(|quest| quest.id.as_str())
        .collect();
    ensure!(open.is_empty(), "quests left open at close: {open:?}");
    Ok(())
}
