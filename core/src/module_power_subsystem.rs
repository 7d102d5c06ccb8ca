//! Step 6: the modules' own power draw.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    subsystem::{CycleContext, SimSubsystem},
    types::Units,
};

#[derive(Debug, Default)]
pub struct ModulePowerSubsystem;

impl ModulePowerSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl SimSubsystem for ModulePowerSubsystem {
    fn name(&self) -> &'static str {
        "module_power"
    }

    fn update(
        &mut self,
        ctx: &mut CycleContext<'_>,
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let modules = ctx.habitat.unlocked_modules;
        let cost = Units::from(modules) * ctx.config.energy.per_module;
        if ctx.habitat.ledger.discharge(cost) {
            ctx.report.note(format!("{modules} modules drew {cost} energy"));
        } else {
            log::warn!(
                "{} module power: need {cost}, have {}",
                ctx.at,
                ctx.habitat.ledger.energy()
            );
            ctx.report.note(format!(
                "Not enough energy to power {modules} modules ({cost} needed)"
            ));
        }
        Ok(vec![])
    }
}
