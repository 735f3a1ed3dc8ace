//! Hexfleet headless skirmish harness.
//!
//! Loads a scenario (the bundled one, or the JSON file given as first
//! argument), fields every team with random executors and runs the
//! battle `runs` times, repairing all vessels in between. Prints the
//! tally as JSON.
//!
//! Usage:
//!   cargo run -p hexfleet-skirmish
//!   cargo run -p hexfleet-skirmish -- path/to/scenario.json
//!   HEXFLEET_SEED=7 HEXFLEET_RUNS=50 cargo run -p hexfleet-skirmish

mod scenario;
mod tally;

use futures::executor::block_on;
use tracing::info;

use hexfleet_battle::{BattleManager, Crew, RandomExecutor, Recruit};
use hexfleet_vessel::{BehaviorRegistry, PartLibrary};

use crate::scenario::{Scenario, SkirmishError, DEFAULT_SCENARIO};
use crate::tally::Tally;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn load(path: Option<String>) -> Result<Scenario, SkirmishError> {
    let mut scenario = match path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|source| SkirmishError::Io { path, source })?;
            Scenario::parse(&json)?
        }
        None => Scenario::parse(DEFAULT_SCENARIO)?,
    };
    scenario.apply_overrides(|var| std::env::var(var).ok())?;
    Ok(scenario)
}

fn field(scenario: &Scenario) -> Result<BattleManager, SkirmishError> {
    let library = PartLibrary::from_descs(&scenario.parts)?;
    let config = scenario.config();
    let fallback = Crew::uniform(config.default_roll);
    let mut manager = BattleManager::new(config, BehaviorRegistry::with_builtins())?;

    let mut strategy_seed = scenario.seed;
    for team in &scenario.teams {
        let mut recruits = Vec::with_capacity(team.vessels.len());
        for entry in &team.vessels {
            strategy_seed = strategy_seed.wrapping_add(1);
            let vessel = library.instantiate(&entry.class)?;
            let crew = entry.crew.unwrap_or(fallback);
            recruits.push(Recruit::new(vessel, crew, RandomExecutor::new(strategy_seed)));
        }
        manager.create_and_add_team(team.name.clone(), recruits);
    }
    Ok(manager)
}

fn run() -> Result<(), SkirmishError> {
    let scenario = load(std::env::args().nth(1))?;
    info!(
        teams = scenario.teams.len(),
        runs = scenario.runs,
        seed = scenario.seed,
        "scenario loaded"
    );

    let manager = field(&scenario)?;
    let mut tally = Tally::new(scenario.seed, manager.teams().iter().map(|t| t.name.clone()));
    for run in 0..scenario.runs {
        if run > 0 {
            manager.repair_all();
        }
        let summary = block_on(manager.run())?;
        info!(run, turns = summary.turns, "run finished");
        tally.record(&summary);
    }

    println!("{}", serde_json::to_string_pretty(&tally)?);
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        tracing::error!(error = %e, "skirmish failed");
        std::process::exit(1);
    }
}
