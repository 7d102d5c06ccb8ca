//! Step 5: collect the crew's waste into storage boxes.

use crate::{
    error::SimResult,
    event::SimEvent,
    ledger::{Ingredient, ResourceKey},
    rng::RandomSource,
    subsystem::{CycleContext, SimSubsystem},
    types::Units,
};

#[derive(Debug, Default)]
pub struct WasteSubsystem;

impl WasteSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl SimSubsystem for WasteSubsystem {
    fn name(&self) -> &'static str {
        "waste"
    }

    fn update(
        &mut self,
        ctx: &mut CycleContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let crew = ctx.habitat.colonists.len();
        if crew == 0 {
            return Ok(vec![]);
        }

        let mut liquid: Units = 0;
        let mut solid: Units = 0;
        for _ in 0..crew {
            liquid += rng.range_inclusive(1, 2);
            solid += rng.range_inclusive(0, 1);
        }

        let mut events = Vec::new();
        let ledger = &mut ctx.habitat.ledger;
        for (ingredient, amount) in [(Ingredient::WasteLiquid, liquid), (Ingredient::WasteSolid, solid)] {
            let key = ResourceKey::Ingredient(ingredient);
            let leftover = ledger.store(key, amount);
            if leftover > 0 {
                log::warn!("{} waste: {leftover} {key} had nowhere to go", ctx.at);
                ctx.report
                    .problem(format!("No room for {leftover} of {amount} {key}"));
                events.push(SimEvent::ResourceSpilled {
                    at: ctx.at,
                    key,
                    amount: leftover,
                });
            } else if amount > 0 {
                ctx.report.note(format!("Collected {amount} {key}"));
            }
        }

        log::debug!("{} waste: crew={crew} liquid={liquid} solid={solid}", ctx.at);
        Ok(events)
    }
}
