//! Simulation events — the notification surface of the engine.
//!
//! RULE: anything an outside collaborator must react to (a death for the
//! messaging system, an aging milestone for achievements) is emitted as
//! a SimEvent. Events are returned from every cycle and appended to the
//! store's event log.

use crate::{
    ledger::ResourceKey,
    types::{EntityId, HabitatId, SimTime, Units},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
/// Variants are appended — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    CycleStarted {
        habitat_id: HabitatId,
        at: SimTime,
    },
    CycleCompleted {
        habitat_id: HabitatId,
        at: SimTime,
        problems: usize,
    },

    // ── Colonist events ────────────────────────────
    ColonistAged {
        at: SimTime,
        colonist_id: EntityId,
        name: String,
        age: i32,
    },
    ColonistDied {
        at: SimTime,
        colonist_id: EntityId,
        name: String,
        cause: DeathCause,
    },

    // ── Ledger events ──────────────────────────────
    PeripheralBroken {
        at: SimTime,
        peripheral_id: EntityId,
    },
    ResourceSpilled {
        at: SimTime,
        key: ResourceKey,
        amount: Units,
    },
    EnergySpilled {
        at: SimTime,
        amount: Units,
    },
}

impl SimEvent {
    /// Stable name for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CycleStarted { .. } => "cycle_started",
            Self::CycleCompleted { .. } => "cycle_completed",
            Self::ColonistAged { .. } => "colonist_aged",
            Self::ColonistDied { .. } => "colonist_died",
            Self::PeripheralBroken { .. } => "peripheral_broken",
            Self::ResourceSpilled { .. } => "resource_spilled",
            Self::EnergySpilled { .. } => "energy_spilled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Health fell below 1.
    Health,
    /// Age passed life expectancy.
    OldAge,
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub habitat_id: HabitatId,
    pub at: SimTime,
    pub subsystem: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized SimEvent
}
