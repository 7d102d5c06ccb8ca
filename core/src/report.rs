//! The accounting report — one per cycle, read-only once finalized.
//!
//! A habitat keeps exactly one live report (`Habitat::current_report`);
//! each cycle overwrites the previous one. History, when wanted, lives in
//! the store (`SimStore::record_cycle`).

use crate::{
    ledger::{AirComposition, Ledger},
    types::{EntityId, HabitatId, SimTime, Units},
};
use serde::{Deserialize, Serialize};

/// The slice of the ledger a report compares before and after.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerReading {
    pub energy: Units,
    pub water: Units,
    pub air: AirComposition,
}

impl LedgerReading {
    pub fn of(ledger: &Ledger) -> Self {
        Self {
            energy: ledger.energy(),
            water: ledger.water(),
            air: ledger.air,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingReport {
    pub id: String,
    pub habitat_id: HabitatId,
    /// Start of the accounted hour.
    pub at: SimTime,
    pub start: LedgerReading,
    pub end: Option<LedgerReading>,
    pub problems: Vec<String>,
    pub notes: Vec<String>,
    pub peripheral_notes: Vec<String>,
    pub human_notes: Vec<String>,
    pub broken_peripherals: Vec<EntityId>,
}

impl AccountingReport {
    pub fn begin(habitat_id: &str, at: SimTime, ledger: &Ledger) -> Self {
        Self {
            id: format!("{habitat_id}-{}", at.format("%Y%m%d%H")),
            habitat_id: habitat_id.to_string(),
            at,
            start: LedgerReading::of(ledger),
            end: None,
            problems: Vec::new(),
            notes: Vec::new(),
            peripheral_notes: Vec::new(),
            human_notes: Vec::new(),
            broken_peripherals: Vec::new(),
        }
    }

    pub fn problem(&mut self, text: impl Into<String>) {
        self.problems.push(text.into());
    }

    pub fn note(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }

    pub fn peripheral_note(&mut self, text: impl Into<String>) {
        self.peripheral_notes.push(text.into());
    }

    pub fn human_note(&mut self, text: impl Into<String>) {
        self.human_notes.push(text.into());
    }

    pub fn finish(&mut self, ledger: &Ledger) {
        self.end = Some(LedgerReading::of(ledger));
    }

    pub fn is_finished(&self) -> bool {
        self.end.is_some()
    }

    /// One-line summary for logs and the runner.
    pub fn summary(&self) -> String {
        let end = self.end.unwrap_or(self.start);
        format!(
            "{} energy {}→{} water {}→{} o2 {}→{} | {} problems, {} notes",
            self.at.format("%Y-%m-%d %H:00"),
            self.start.energy,
            end.energy,
            self.start.water,
            end.water,
            self.start.air.o2,
            end.air.o2,
            self.problems.len(),
            self.notes.len() + self.peripheral_notes.len() + self.human_notes.len(),
        )
    }
}
