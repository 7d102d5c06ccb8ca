//! Step 7: tidy the tank rack.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    subsystem::{CycleContext, SimSubsystem},
};

#[derive(Debug, Default)]
pub struct MaintenanceSubsystem;

impl MaintenanceSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl SimSubsystem for MaintenanceSubsystem {
    fn name(&self) -> &'static str {
        "maintenance"
    }

    fn update(
        &mut self,
        ctx: &mut CycleContext<'_>,
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let settings = ctx.config.settings;
        let ledger = &mut ctx.habitat.ledger;

        let pruned = ledger.prune_empty_tanks(settings.clear_empty_tanks);
        if !pruned.is_empty() {
            ctx.report
                .note(format!("Removed empty tanks: {}", pruned.join(", ")));
        }

        if settings.auto_merge_tanks {
            let merged = ledger.merge_tanks(settings.clear_empty_tanks);
            if merged.moved > 0 {
                ctx.report.note(format!(
                    "Merged {} units between tanks ({} emptied, {} removed)",
                    merged.moved,
                    merged.emptied.len(),
                    merged.discarded.len()
                ));
            }
        }

        log::debug!("{} maintenance: {} tanks", ctx.at, ledger.tanks.len());
        Ok(vec![])
    }
}
