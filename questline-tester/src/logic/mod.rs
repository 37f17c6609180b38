pub mod day_tester;
pub mod reports;
pub mod seeds;
pub mod store;
pub mod tester;

pub use day_tester::{
    DaySource, DayTester, PlayStyle, SimulationExpectation, SimulationPlan, SimulationSummary,
};
pub use seeds::resolve_seed_inputs;
pub use tester::*;
