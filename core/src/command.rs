//! Player commands — manual ledger and machine operations.

use crate::{
    error::{SimError, SimResult},
    habitat::Habitat,
    ledger::{AirComponent, AirComposition, Container, TankKind},
    types::{EntityId, Units},
};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
/// Variants are appended — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Tanks ─────────────────────────────────────
    ReleaseTank { tank_id: EntityId },
    DiscardTank { tank_id: EntityId },

    // ── Peripherals ───────────────────────────────
    SetPeripheralPower { peripheral_id: EntityId, on: bool },
    RepairPeripheral { peripheral_id: EntityId },

    // ── Supplies ──────────────────────────────────
    AddFood { name: String, count: u32 },
}

/// Apply a command to the habitat. Unknown ids are `NotFound`; the
/// habitat is left untouched in that case.
pub fn apply_command(habitat: &mut Habitat, command: &PlayerCommand) -> SimResult<()> {
    match command {
        PlayerCommand::ReleaseTank { tank_id } => {
            let ledger = &mut habitat.ledger;
            let tank = ledger.tank_mut(tank_id).ok_or_else(|| tank_not_found(tank_id))?;
            let kind = tank.kind;
            let amount = tank.current();
            tank.drain(amount);
            let discard = tank.discard_when_empty;
            release_into_air(&mut ledger.air, kind, amount);
            if discard {
                ledger.remove_tank(tank_id);
            }
            log::debug!("released {amount} from tank {tank_id} ({kind:?})");
        }
        PlayerCommand::DiscardTank { tank_id } => {
            let tank = habitat
                .ledger
                .remove_tank(tank_id)
                .ok_or_else(|| tank_not_found(tank_id))?;
            if tank.current() > 0 {
                log::warn!("discarded tank {tank_id} still holding {}", tank.current());
            }
        }
        PlayerCommand::SetPeripheralPower { peripheral_id, on } => {
            habitat.peripheral_mut(peripheral_id)?.powered_on = *on;
        }
        PlayerCommand::RepairPeripheral { peripheral_id } => {
            habitat.peripheral_mut(peripheral_id)?.is_broken = false;
        }
        PlayerCommand::AddFood { name, count } => {
            for _ in 0..*count {
                habitat.food_queue.push_back(name.clone());
            }
        }
    }
    Ok(())
}

fn release_into_air(air: &mut AirComposition, kind: TankKind, amount: Units) {
    let component = match kind {
        TankKind::Air => {
            air.add_mixed_air(amount);
            return;
        }
        TankKind::O2 => AirComponent::Oxygen,
        TankKind::CO2 => AirComponent::CarbonDioxide,
        TankKind::N2 => AirComponent::Nitrogen,
        TankKind::H2 => AirComponent::Hydrogen,
        TankKind::H2O => AirComponent::Vapor,
        TankKind::CH4 => AirComponent::Methane,
        TankKind::Empty => return,
    };
    air.add(component, amount);
}

fn tank_not_found(id: &str) -> SimError {
    SimError::NotFound {
        kind: "tank",
        id: id.to_string(),
    }
}
