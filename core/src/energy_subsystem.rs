//! Step 1: collect energy and charge the batteries.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    subsystem::{CycleContext, SimSubsystem},
    types::Units,
};

/// Remote power input supplied by an outside collaborator.
/// `None` means no remote data this cycle.
pub trait EnergyContribution: Send {
    fn energy_contribution(&self) -> Option<Units>;
}

/// No remote link; the floor value is used every cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemote;

impl EnergyContribution for NoRemote {
    fn energy_contribution(&self) -> Option<Units> {
        None
    }
}

/// A constant remote contribution.
#[derive(Debug, Clone, Copy)]
pub struct FixedContribution(pub Units);

impl EnergyContribution for FixedContribution {
    fn energy_contribution(&self) -> Option<Units> {
        Some(self.0)
    }
}

pub struct EnergySubsystem {
    contribution: Box<dyn EnergyContribution>,
}

impl EnergySubsystem {
    pub fn new(contribution: Box<dyn EnergyContribution>) -> Self {
        Self { contribution }
    }
}

impl Default for EnergySubsystem {
    fn default() -> Self {
        Self::new(Box::new(NoRemote))
    }
}

impl SimSubsystem for EnergySubsystem {
    fn name(&self) -> &'static str {
        "energy"
    }

    fn update(
        &mut self,
        ctx: &mut CycleContext<'_>,
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let cfg = &ctx.config.energy;
        let solar: Units = ctx
            .habitat
            .solar_panels
            .iter()
            .map(|p| p.size * cfg.solar_output_per_size)
            .sum();
        let remote = self
            .contribution
            .energy_contribution()
            .unwrap_or(cfg.remote_floor)
            .max(cfg.remote_floor);

        let collected = solar + remote;
        let overflow = ctx.habitat.ledger.charge(collected);
        ctx.report.note(format!(
            "Collected {collected} energy (solar {solar}, remote {remote})"
        ));

        let mut events = Vec::new();
        if overflow > 0 {
            log::warn!("habitat {}: {overflow} energy spilled, batteries full", ctx.habitat.id);
            ctx.report
                .problem(format!("Batteries full: {overflow} energy could not be stored"));
            events.push(SimEvent::EnergySpilled {
                at: ctx.at,
                amount: overflow,
            });
        }

        log::debug!(
            "{} energy: collected={collected} overflow={overflow} stored={}",
            ctx.at,
            ctx.habitat.ledger.energy()
        );
        Ok(events)
    }
}
