//! Step 3: regulate the air.
//!
//! a. Low quality: top up oxygen from O2 tanks toward 21%.
//! b. Low volume: release Air tanks until the modules' volume is met.

use crate::{
    error::SimResult,
    event::SimEvent,
    ledger::{AirComponent, AirQuality, TankKind},
    rng::RandomSource,
    subsystem::{CycleContext, SimSubsystem},
    types::Units,
};

#[derive(Debug, Default)]
pub struct AirSubsystem;

impl AirSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl SimSubsystem for AirSubsystem {
    fn name(&self) -> &'static str {
        "air"
    }

    fn update(
        &mut self,
        ctx: &mut CycleContext<'_>,
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let ledger = &mut ctx.habitat.ledger;

        let quality = ledger.air.quality();
        if quality <= AirQuality::Medium {
            let deficit = ledger.air.oxygen_deficit();
            if deficit > 0 {
                let added = ledger.drain_tanks(TankKind::O2, deficit);
                ledger.air.add(AirComponent::Oxygen, added);
                if added > 0 {
                    ctx.report
                        .note(format!("Air quality {quality:?}: added {added} oxygen"));
                } else {
                    log::warn!("habitat {}: air {quality:?} and no oxygen in tanks", ctx.habitat.id);
                    ctx.report
                        .problem(format!("Air quality {quality:?}: no oxygen available"));
                }
            } else if ledger.air.volume() > 0 {
                ctx.report.problem(format!(
                    "Air quality {quality:?}: oxygen at target, carbon dioxide too high"
                ));
            }
        }

        let ledger = &mut ctx.habitat.ledger;
        let required = Units::from(ctx.habitat.unlocked_modules) * ctx.config.air.volume_per_module;
        let volume = ledger.air.volume();
        if required > volume {
            let deficit = required - volume;
            let released = ledger.drain_tanks(TankKind::Air, deficit);
            ledger.air.add_mixed_air(released);
            if released < deficit {
                log::warn!(
                    "habitat {}: air volume short by {}",
                    ctx.habitat.id,
                    deficit - released
                );
                ctx.report.problem(format!(
                    "Air volume {} below required {required}: short by {}",
                    volume + released,
                    deficit - released
                ));
            } else {
                ctx.report.note(format!("Released {released} air to refill modules"));
            }
        }

        log::debug!(
            "{} air: quality={:?} volume={}",
            ctx.at,
            ctx.habitat.ledger.air.quality(),
            ctx.habitat.ledger.air.volume()
        );
        Ok(vec![])
    }
}
