//! Snapshot serialization — full habitat state to/from JSON.
//!
//! A snapshot is taken every SNAPSHOT_INTERVAL cycles. It captures the
//! complete state needed to resume accounting from that hour.

use crate::{
    error::SimResult,
    habitat::Habitat,
    types::{HabitatId, SimTime},
};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_INTERVAL: u64 = 24; // daily

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitatSnapshot {
    pub habitat_id: HabitatId,
    /// The habitat's last-accounted time when the snapshot was taken.
    pub at: SimTime,
    pub habitat: Habitat,
}

impl HabitatSnapshot {
    pub fn capture(habitat: &Habitat) -> Self {
        Self {
            habitat_id: habitat.id.clone(),
            at: habitat.clock.last_accounted_at,
            habitat: habitat.clone(),
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
