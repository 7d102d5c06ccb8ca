//! Step 2: run every peripheral's recipe, in habitat order.

use crate::{
    error::SimResult,
    event::SimEvent,
    peripheral::{apply_peripheral, PeripheralRun, RecipeEntry},
    rng::RandomSource,
    subsystem::{CycleContext, SimSubsystem},
};

#[derive(Debug, Default)]
pub struct PeripheralSubsystem;

impl PeripheralSubsystem {
    pub fn new() -> Self {
        Self
    }
}

fn describe(entries: &[RecipeEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {}", e.amount, e.key))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SimSubsystem for PeripheralSubsystem {
    fn name(&self) -> &'static str {
        "peripheral"
    }

    fn update(
        &mut self,
        ctx: &mut CycleContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let habitat = &mut *ctx.habitat;
        let report = &mut *ctx.report;
        let mut events = Vec::new();

        for peripheral in &habitat.peripherals {
            let label = format!("{} ({:?})", peripheral.id, peripheral.kind);
            match apply_peripheral(peripheral, &ctx.config.recipes, &mut habitat.ledger, rng) {
                PeripheralRun::PoweredOff => {
                    report.peripheral_note(format!("{label} is powered off"));
                }
                PeripheralRun::Broken => {
                    report.problem(format!("{label} is broken"));
                    report.broken_peripherals.push(peripheral.id.clone());
                    events.push(SimEvent::PeripheralBroken {
                        at: ctx.at,
                        peripheral_id: peripheral.id.clone(),
                    });
                }
                PeripheralRun::NoRecipe => {
                    report.problem(format!("{label} has no recipe"));
                }
                PeripheralRun::NoEnergy { needed, available } => {
                    log::warn!("{label} skipped: needs {needed} energy, {available} available");
                    report.problem(format!(
                        "{label} skipped: needs {needed} energy, only {available} stored"
                    ));
                }
                PeripheralRun::Starved {
                    key,
                    needed,
                    available,
                    consumed,
                } => {
                    log::warn!("{label} starved of {key}: needs {needed}, has {available}");
                    let lost = if consumed.is_empty() {
                        String::new()
                    } else {
                        format!(" ({} already used)", describe(&consumed))
                    };
                    report.problem(format!(
                        "{label} stopped: needs {needed} {key}, only {available} available{lost}"
                    ));
                }
                PeripheralRun::Ran {
                    consumed,
                    produced,
                    spilled,
                } => {
                    report.peripheral_note(format!(
                        "{label} used [{}] made [{}]",
                        describe(&consumed),
                        describe(&produced)
                    ));
                    for spill in spilled {
                        log::warn!("{label} spilled {} {}", spill.amount, spill.key);
                        report.peripheral_note(format!(
                            "{label} spilled {} {}: no room left",
                            spill.amount, spill.key
                        ));
                        events.push(SimEvent::ResourceSpilled {
                            at: ctx.at,
                            key: spill.key,
                            amount: spill.amount,
                        });
                    }
                }
            }
        }

        log::debug!(
            "{} peripherals: ran {} machines, energy left {}",
            ctx.at,
            habitat.peripherals.len(),
            habitat.ledger.energy()
        );
        Ok(events)
    }
}
