//! The accounting engine — advances one habitat by one simulated hour.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Energy        collect solar + remote, charge batteries
//!   2. Peripheral    run every machine's recipe
//!   3. Air           oxygen top-up, volume refill
//!   4. Colonist      water, air, food, energy; health/happiness; aging
//!   5. Waste         crew waste into storage boxes
//!   6. ModulePower   per-module energy draw
//!   7. Maintenance   prune and merge tanks
//!
//! RULES:
//!   - Subsystems execute in registration order, once per cycle.
//!   - No subsystem calls another subsystem's functions directly.
//!   - All randomness flows through the RngBank (or an injected
//!     scripted source in tests).
//!   - Every emitted event is recorded in the event log.
//!   - A cycle is all or nothing: events, report and snapshot are written
//!     in one transaction before the habitat is updated.
//!   - A cycle always produces a report; shortages are report problems.

use crate::{
    air_subsystem::AirSubsystem,
    clock::cycle_index,
    colonist_subsystem::ColonistSubsystem,
    config::{GlobalSettings, SimConfig},
    energy_subsystem::EnergySubsystem,
    error::SimResult,
    event::{EventLogEntry, SimEvent},
    habitat::Habitat,
    maintenance_subsystem::MaintenanceSubsystem,
    module_power_subsystem::ModulePowerSubsystem,
    peripheral_subsystem::PeripheralSubsystem,
    report::AccountingReport,
    rng::{RandomSource, RngBank, ScriptedRng, SubsystemSlot},
    snapshot::{HabitatSnapshot, SNAPSHOT_INTERVAL},
    store::SimStore,
    subsystem::{CycleContext, SimSubsystem},
    types::SimTime,
    waste_subsystem::WasteSubsystem,
};

pub use crate::energy_subsystem::{EnergyContribution, FixedContribution, NoRemote};

/// The result of one accounting cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Start of the accounted hour.
    pub at: SimTime,
    /// The habitat's new last-accounted time: `at` + 1 hour.
    pub next: SimTime,
    pub report: AccountingReport,
    pub events: Vec<SimEvent>,
}

pub struct AccountingEngine {
    pub config: SimConfig,
    pub rng_bank: RngBank,
    /// Replaces every subsystem stream when set. Tests only.
    scripted: Option<ScriptedRng>,
    subsystems: Vec<(SubsystemSlot, Box<dyn SimSubsystem>)>,
    pub store: SimStore,
    cycles_run: u64,
}

impl AccountingEngine {
    pub fn new(config: SimConfig, seed: u64, store: SimStore) -> Self {
        Self {
            config,
            rng_bank: RngBank::new(seed),
            scripted: None,
            subsystems: Vec::new(),
            store,
            cycles_run: 0,
        }
    }

    /// Build a fully wired engine with all subsystems registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(
        config: SimConfig,
        seed: u64,
        store: SimStore,
        contribution: Box<dyn EnergyContribution>,
    ) -> Self {
        let mut engine = Self::new(config, seed, store);

        // EXECUTION ORDER — fixed, documented, never reordered.
        engine.register(SubsystemSlot::Energy, Box::new(EnergySubsystem::new(contribution)));
        engine.register(SubsystemSlot::Peripheral, Box::new(PeripheralSubsystem::new()));
        engine.register(SubsystemSlot::Air, Box::new(AirSubsystem::new()));
        engine.register(SubsystemSlot::Colonist, Box::new(ColonistSubsystem::new()));
        engine.register(SubsystemSlot::Waste, Box::new(WasteSubsystem::new()));
        engine.register(SubsystemSlot::ModulePower, Box::new(ModulePowerSubsystem::new()));
        engine.register(SubsystemSlot::Maintenance, Box::new(MaintenanceSubsystem::new()));
        engine
    }

    /// Fully wired engine over a migrated in-memory store, default config
    /// and no remote power.
    pub fn build_test(seed: u64) -> SimResult<Self> {
        let store = SimStore::in_memory()?;
        store.migrate()?;
        Ok(Self::build(
            SimConfig::default_test(),
            seed,
            store,
            Box::new(NoRemote),
        ))
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, slot: SubsystemSlot, subsystem: Box<dyn SimSubsystem>) {
        self.subsystems.push((slot, subsystem));
    }

    /// Replace the global settings; takes effect from the next cycle.
    pub fn set_settings(&mut self, settings: GlobalSettings) {
        self.config.settings = settings;
    }

    /// Feed every subsystem from a copy of `rng` instead of the bank.
    pub fn use_scripted_rng(&mut self, rng: ScriptedRng) {
        self.scripted = Some(rng);
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    /// Account one hour: the hour starting at the habitat's rounded
    /// last-accounted time. Advances that time by exactly one hour.
    ///
    /// Subsystems work on a copy of the habitat. The copy replaces
    /// `habitat` only after the cycle is recorded in the store, so an
    /// error leaves the habitat exactly as it was and the hour still due.
    pub fn run_cycle(&mut self, habitat: &mut Habitat) -> SimResult<CycleOutcome> {
        let mut working = habitat.clone();
        let at = working.clock.cycle_start();
        let index = cycle_index(at);
        let habitat_id = working.id.clone();

        let mut report = AccountingReport::begin(&habitat_id, at, &working.ledger);
        let mut logged: Vec<(&'static str, SimEvent)> = vec![(
            "engine",
            SimEvent::CycleStarted {
                habitat_id: habitat_id.clone(),
                at,
            },
        )];

        for (slot, subsystem) in &mut self.subsystems {
            let mut rng: Box<dyn RandomSource> = match &self.scripted {
                Some(scripted) => Box::new(scripted.clone()),
                None => Box::new(self.rng_bank.for_cycle(*slot, index)),
            };
            let mut ctx = CycleContext {
                at,
                habitat: &mut working,
                report: &mut report,
                config: &self.config,
            };
            let name = subsystem.name();
            let new_events = subsystem.update(&mut ctx, rng.as_mut())?;
            logged.extend(new_events.into_iter().map(|event| (name, event)));
        }

        report.finish(&working.ledger);
        logged.push((
            "engine",
            SimEvent::CycleCompleted {
                habitat_id: habitat_id.clone(),
                at,
                problems: report.problems.len(),
            },
        ));

        working.current_report = Some(report.clone());
        let next = working.clock.advance();
        let cycles_run = self.cycles_run + 1;

        // Snapshot every SNAPSHOT_INTERVAL cycles.
        let snapshot = cycles_run
            .is_multiple_of(SNAPSHOT_INTERVAL)
            .then(|| HabitatSnapshot::capture(&working));

        let entries = logged
            .iter()
            .map(|(subsystem, event)| -> SimResult<EventLogEntry> {
                Ok(EventLogEntry {
                    id: None,
                    habitat_id: habitat_id.clone(),
                    at,
                    subsystem: subsystem.to_string(),
                    event_type: event.type_name().to_string(),
                    payload: serde_json::to_string(event)?,
                })
            })
            .collect::<SimResult<Vec<_>>>()?;
        self.store.record_cycle(&entries, &report, snapshot.as_ref())?;

        *habitat = working;
        self.cycles_run = cycles_run;

        log::info!("habitat {habitat_id}: {}", report.summary());
        if snapshot.is_some() {
            log::debug!("Snapshot saved for {habitat_id} at {next}");
        }

        Ok(CycleOutcome {
            at,
            next,
            report,
            events: logged.into_iter().map(|(_, event)| event).collect(),
        })
    }

    /// Query events for one accounted hour from the store.
    /// Used by the determinism test and replay tooling.
    pub fn store_events_for_cycle(&self, habitat_id: &str, at: SimTime) -> SimResult<Vec<EventLogEntry>> {
        self.store.events_for_cycle(habitat_id, at)
    }
}
