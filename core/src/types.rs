//! Shared primitive types used across the entire simulation.

use chrono::{DateTime, Utc};

/// A point in simulated time. One accounting cycle = one hour.
pub type SimTime = DateTime<Utc>;

/// A stable, unique identifier for any entity in a habitat.
pub type EntityId = String;

/// The canonical habitat identifier.
pub type HabitatId = String;

/// Whole resource units (litres, kg, kWh depending on the container).
pub type Units = i64;
