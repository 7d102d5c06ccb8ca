//! Step 4: feed, water and ventilate every colonist, then update them.
//!
//! Colonists are processed in population order. One who drops below 1
//! health is removed on the spot and skips the rest of the cycle,
//! weekly aging included.

use crate::{
    clock::is_aging_hour,
    colonist::{update_colonist, AirIntake, Needs, Surroundings},
    error::SimResult,
    event::{DeathCause, SimEvent},
    ledger::{AirComponent, ResourceKey, TankKind},
    rng::RandomSource,
    subsystem::{CycleContext, SimSubsystem},
    types::Units,
};

/// Oxygen breathed per colonist per cycle.
const OXYGEN_PER_BREATH: Units = 2;

#[derive(Debug, Default)]
pub struct ColonistSubsystem;

impl ColonistSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl SimSubsystem for ColonistSubsystem {
    fn name(&self) -> &'static str {
        "colonist"
    }

    fn update(
        &mut self,
        ctx: &mut CycleContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let at = ctx.at;
        let cfg = ctx.config.colonist;
        let bio_fallback = ctx.config.settings.serve_bio_fallback_food;
        let aging = is_aging_hour(at, cfg.aging_weekday, cfg.aging_hour);
        let mut events = Vec::new();

        let mut i = 0;
        while i < ctx.habitat.colonists.len() {
            let habitat = &mut *ctx.habitat;

            let water = habitat
                .ledger
                .consume(ResourceKey::Tank(TankKind::H2O), cfg.water_per_colonist);
            let air = if habitat.ledger.air.o2 >= OXYGEN_PER_BREATH {
                let quality = habitat.ledger.air.quality();
                habitat.ledger.air.remove(AirComponent::Oxygen, OXYGEN_PER_BREATH);
                habitat.ledger.air.add(AirComponent::CarbonDioxide, 1);
                habitat.ledger.air.add(AirComponent::Vapor, 1);
                AirIntake::Breathed(quality)
            } else {
                AirIntake::Suffocating
            };
            let food = habitat.take_food(bio_fallback);
            let energy = habitat.ledger.discharge(cfg.personal_energy);
            let needs = Needs {
                water,
                air,
                food,
                energy,
            };
            let surroundings = Surroundings {
                at,
                tech_level: habitat.tech_level,
                population: habitat.colonists.len(),
                player_experience: habitat.player_experience,
            };

            let colonist = &mut habitat.colonists[i];
            let update = update_colonist(colonist, &needs, &surroundings, rng);

            if !needs.water {
                ctx.report.problem(format!("{} had no water", colonist.name));
            }
            if needs.air == AirIntake::Suffocating {
                ctx.report.problem(format!("{} could not breathe", colonist.name));
            }
            if needs.food.is_none() {
                ctx.report.problem(format!("{} went hungry", colonist.name));
            }
            ctx.report.human_note(format!(
                "{}: health {} ({:+}), happiness {} ({:+}), life expectancy {} ({:+})",
                colonist.name,
                colonist.health_physical,
                update.health,
                colonist.happiness,
                update.happiness,
                colonist.life_expectancy,
                update.life_expectancy,
            ));

            if colonist.health_physical < 1 {
                let dead = habitat.colonists.remove(i);
                log::info!("{at} colonist {} died (health)", dead.name);
                ctx.report.human_note(format!("{} died", dead.name));
                events.push(SimEvent::ColonistDied {
                    at,
                    colonist_id: dead.id,
                    name: dead.name,
                    cause: DeathCause::Health,
                });
                continue;
            }

            if aging {
                colonist.age += 1;
                events.push(SimEvent::ColonistAged {
                    at,
                    colonist_id: colonist.id.clone(),
                    name: colonist.name.clone(),
                    age: colonist.age,
                });
                // Health is already known to be positive here.
                if !colonist.is_alive() {
                    let dead = habitat.colonists.remove(i);
                    log::info!("{at} colonist {} died of old age", dead.name);
                    ctx.report.human_note(format!("{} died of old age", dead.name));
                    events.push(SimEvent::ColonistDied {
                        at,
                        colonist_id: dead.id,
                        name: dead.name,
                        cause: DeathCause::OldAge,
                    });
                    continue;
                }
            }
            i += 1;
        }

        log::debug!(
            "{at} colonists: {} alive, {} events",
            ctx.habitat.colonists.len(),
            events.len()
        );
        Ok(events)
    }
}
