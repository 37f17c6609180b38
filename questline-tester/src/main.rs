mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use questline_game::{DayPlan, DifficultyMode};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use common::scenario::{
    TestScenario, catalog::CATALOG, custom_scenario, get_scenario, list_scenarios,
};
use common::split_csv;
use logic::{DayTester, LogicTester, ScenarioResult, resolve_seed_inputs};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ModeSelection {
    /// Use each scenario's own difficulty mode
    #[default]
    Scenario,
    Story,
    Normal,
    Hardcore,
    /// Run every scenario once per difficulty mode
    All,
}

impl ModeSelection {
    fn modes(self) -> Option<Vec<DifficultyMode>> {
        match self {
            Self::Scenario => None,
            Self::Story => Some(vec![DifficultyMode::Story]),
            Self::Normal => Some(vec![DifficultyMode::Normal]),
            Self::Hardcore => Some(vec![DifficultyMode::Hardcore]),
            Self::All => Some(DifficultyMode::ALL.to_vec()),
        }
    }

    fn apply(self, scenario: TestScenario) -> Vec<TestScenario> {
        match self.modes() {
            None => vec![scenario],
            Some(modes) => modes.into_iter().map(|mode| scenario.in_mode(mode)).collect(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "questline-tester", version = "0.1.0")]
#[command(about = "Seeded day simulations against the Questline schedule engine")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for the whole catalog)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated; numbers or phrases)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Difficulty override for every scenario
    #[arg(long, value_enum, default_value_t = ModeSelection::Scenario)]
    mode: ModeSelection,

    /// Also simulate a day plan loaded from a JSON file
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let scenarios = collect_scenarios(&args)?;
    log::debug!("running {} scenarios over seeds {seeds:?}", scenarios.len());

    let results = run_scenarios(&args, &scenarios, &seeds);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 Questline Automated Tester".bright_cyan().bold());
    println!("{}", "=================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for entry in CATALOG {
            if !scenarios.iter().any(|s| s == entry.key) {
                scenarios.push(entry.key.to_string());
            }
        }
    }
    scenarios
}

fn load_plan(path: &Path) -> Result<DayPlan> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan {}", path.display()))?;
    DayPlan::from_json(&json).with_context(|| format!("invalid plan {}", path.display()))
}

fn collect_scenarios(args: &Args) -> Result<Vec<TestScenario>> {
    let mut scenarios = Vec::new();
    for key in expand_scenarios(&args.scenarios) {
        match get_scenario(&key) {
            Some(scenario) => scenarios.extend(args.mode.apply(scenario)),
            None => eprintln!("⚠️  Unknown scenario: {}", key.yellow()),
        }
    }
    if let Some(path) = &args.plan {
        scenarios.extend(args.mode.apply(custom_scenario(load_plan(path)?)));
    }
    Ok(scenarios)
}

fn run_scenarios(args: &Args, scenarios: &[TestScenario], seeds: &[u64]) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Day Simulations".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(DayTester::new(args.verbose), args.verbose);
    scenarios
        .iter()
        .flat_map(|scenario| logic_tester.run_scenario(scenario, seeds, args.iterations))
        .collect()
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Questline Day Simulation Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
        }
    }

    if args.report != "json" {
        let duration = start_time.elapsed();
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
