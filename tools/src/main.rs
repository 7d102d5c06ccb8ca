//! habitat-runner: headless accounting runner.
//!
//! Usage:
//!   habitat-runner --seed 12345 --hours 72 --crew 4 --db run.db
//!   habitat-runner --seed 12345 --ipc-mode

use anyhow::Result;
use chrono::{Duration, Utc};
use habitat_core::{
    clock::floor_to_hour,
    colonist::Colonist,
    command::{apply_command, PlayerCommand},
    config::SimConfig,
    engine::{AccountingEngine, NoRemote},
    habitat::Habitat,
    ledger::{AirComposition, AirQuality},
    population::populate,
    report::AccountingReport,
    rng::{RngBank, SubsystemSlot},
    scheduler::{CatchUp, CatchUpMode, CatchUpScheduler},
    store::SimStore,
    types::{SimTime, Units},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    /// Move simulated "now" forward and catch up fully.
    Advance {
        hours: i64,
    },
    /// Account a single due hour, if any.
    Step,
    Command {
        command: PlayerCommand,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    habitat_id: &'a str,
    now: SimTime,
    last_accounted_at: SimTime,
    energy: Units,
    water: Units,
    air: AirComposition,
    air_quality: AirQuality,
    colonists: &'a [Colonist],
    food_left: usize,
    report: Option<&'a AccountingReport>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let hours = parse_arg(&args, "--hours", 72i64);
    let crew = parse_arg(&args, "--crew", 4usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    if !ipc_mode {
        println!("Habitat accounting runner");
        println!("  seed:      {seed}");
        println!("  hours:     {hours}");
        println!("  crew:      {crew}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let store = if db == ":memory:" {
        SimStore::in_memory()?
    } else {
        SimStore::open(db)?
    };
    store.migrate()?;

    let config = SimConfig::load(data_dir)?;
    let mut now = Utc::now();
    let start = floor_to_hour(now) - Duration::hours(hours);
    let habitat_id = format!("habitat-{seed}");
    store.insert_run(&habitat_id, seed, env!("CARGO_PKG_VERSION"), start)?;

    let mut habitat = Habitat::starter(habitat_id.as_str(), start, &config);
    populate(
        &mut habitat,
        crew,
        &mut RngBank::new(seed).for_setup(SubsystemSlot::Population),
    );

    let engine = AccountingEngine::build(config, seed, store, Box::new(NoRemote));
    let mut scheduler = CatchUpScheduler::new(engine);

    if ipc_mode {
        run_ipc_loop(&mut scheduler, &mut habitat, &mut now)?;
    } else {
        let outcome = scheduler.catch_up(&mut habitat, now, CatchUpMode::Recursive)?;
        print_summary(&habitat, &outcome);
    }

    Ok(())
}

fn run_ipc_loop(scheduler: &mut CatchUpScheduler, habitat: &mut Habitat, now: &mut SimTime) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::Advance { hours } => {
                let Some(later) = advance_clock(*now, hours) else {
                    write_error(&mut stdout, &format!("cannot advance {hours} hours"))?;
                    continue;
                };
                *now = later;
                scheduler.catch_up(habitat, *now, CatchUpMode::Recursive)?;
            }
            IpcCommand::Step => {
                scheduler.catch_up(habitat, *now, CatchUpMode::SingleStep)?;
            }
            IpcCommand::Command { command } => {
                if let Err(e) = apply_command(habitat, &command) {
                    log::warn!("Command rejected: {e}");
                    write_error(&mut stdout, &e.to_string())?;
                    continue;
                }
            }
        }
        let state = build_ui_state(habitat, *now);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

/// `now` moved forward by `hours` (negative counts as zero), or `None`
/// when the result would overflow the calendar.
fn advance_clock(now: SimTime, hours: i64) -> Option<SimTime> {
    now.checked_add_signed(Duration::try_hours(hours.max(0))?)
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> io::Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()
}

fn build_ui_state(habitat: &Habitat, now: SimTime) -> UiState<'_> {
    UiState {
        habitat_id: &habitat.id,
        now,
        last_accounted_at: habitat.clock.last_accounted_at,
        energy: habitat.ledger.energy(),
        water: habitat.ledger.water(),
        air: habitat.ledger.air,
        air_quality: habitat.ledger.air.quality(),
        colonists: &habitat.colonists,
        food_left: habitat.food_queue.len(),
        report: habitat.current_report.as_ref(),
    }
}

fn print_summary(habitat: &Habitat, outcome: &CatchUp) {
    println!("=== CYCLES ===");
    for report in &outcome.reports {
        println!("  {}", report.summary());
    }

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  habitat:        {}", habitat.id);
    println!("  cycles run:     {}", outcome.cycles());
    println!("  accounted to:   {}", habitat.clock.last_accounted_at);
    println!("  energy:         {}", habitat.ledger.energy());
    println!("  water:          {}", habitat.ledger.water());
    println!("  air quality:    {:?}", habitat.ledger.air.quality());
    println!("  food left:      {}", habitat.food_queue.len());
    println!("  events:         {}", outcome.events.len());

    println!();
    println!("=== CREW ===");
    if habitat.colonists.is_empty() {
        println!("  (no survivors)");
    }
    for c in &habitat.colonists {
        println!(
            "  {:<24} age {:>3} | health {:>3} | happiness {:>3} | life exp {:>3}",
            c.name, c.age, c.health_physical, c.happiness, c.life_expectancy
        );
    }

    if let Some(report) = &habitat.current_report {
        if !report.problems.is_empty() {
            println!();
            println!("=== LAST HOUR PROBLEMS ===");
            for p in &report.problems {
                println!("  - {p}");
            }
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
