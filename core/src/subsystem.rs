//! Subsystem trait and per-cycle context.
//!
//! RULE: Every accounting step implements SimSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, once per cycle.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    habitat::Habitat,
    report::AccountingReport,
    rng::RandomSource,
    types::SimTime,
};

/// Everything a subsystem may touch during one cycle.
pub struct CycleContext<'a> {
    /// Start of the accounted hour.
    pub at: SimTime,
    pub habitat: &'a mut Habitat,
    pub report: &'a mut AccountingReport,
    pub config: &'a SimConfig,
}

/// The contract every subsystem must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per cycle by the engine.
    ///
    /// - `ctx`: the habitat, the report being written and the config
    /// - `rng`: this subsystem's deterministic stream for this cycle
    ///
    /// Returns the events this step emitted.
    fn update(
        &mut self,
        ctx: &mut CycleContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>>;
}
