//! Resource kinds and the string keys recipes use to name them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a tank holds. `Empty` tanks are unassigned and can be claimed by
/// any gas or liquid on production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankKind {
    Air,
    O2,
    CO2,
    N2,
    H2,
    H2O,
    CH4,
    Empty,
}

impl TankKind {
    pub const ALL: [TankKind; 8] = [
        Self::Air,
        Self::O2,
        Self::CO2,
        Self::N2,
        Self::H2,
        Self::H2O,
        Self::CH4,
        Self::Empty,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Air => "Air",
            Self::O2 => "O2",
            Self::CO2 => "CO2",
            Self::N2 => "N2",
            Self::H2 => "H2",
            Self::H2O => "H2O",
            Self::CH4 => "CH4",
            Self::Empty => "Empty",
        }
    }
}

/// Solid ingredients and waste, kept in storage boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    Aluminium,
    Copper,
    Iron,
    Lithium,
    Polimer,
    Silica,
    Fertilizer,
    WasteLiquid,
    WasteSolid,
}

impl Ingredient {
    pub const ALL: [Ingredient; 9] = [
        Self::Aluminium,
        Self::Copper,
        Self::Iron,
        Self::Lithium,
        Self::Polimer,
        Self::Silica,
        Self::Fertilizer,
        Self::WasteLiquid,
        Self::WasteSolid,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Aluminium => "Aluminium",
            Self::Copper => "Copper",
            Self::Iron => "Iron",
            Self::Lithium => "Lithium",
            Self::Polimer => "Polimer",
            Self::Silica => "Silica",
            Self::Fertilizer => "Fertilizer",
            Self::WasteLiquid => "WasteLiquid",
            Self::WasteSolid => "WasteSolid",
        }
    }
}

/// A gas in the habitat's air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirComponent {
    Oxygen,
    CarbonDioxide,
    Nitrogen,
    Hydrogen,
    Vapor,
    Methane,
}

impl AirComponent {
    pub const ALL: [AirComponent; 6] = [
        Self::Oxygen,
        Self::CarbonDioxide,
        Self::Nitrogen,
        Self::Hydrogen,
        Self::Vapor,
        Self::Methane,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Oxygen => "oxygen",
            Self::CarbonDioxide => "CarbDiox",
            Self::Nitrogen => "nitrogen",
            Self::Hydrogen => "hydrogen",
            Self::Vapor => "vapor",
            Self::Methane => "methane",
        }
    }
}

/// A recipe key: a tank kind, a box ingredient, or an air component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceKey {
    Tank(TankKind),
    Ingredient(Ingredient),
    Air(AirComponent),
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::Tank(k) => k.code(),
            Self::Ingredient(i) => i.code(),
            Self::Air(a) => a.code(),
        };
        f.write_str(code)
    }
}

impl FromStr for ResourceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(k) = TankKind::ALL.iter().find(|k| k.code() == s) {
            return Ok(Self::Tank(*k));
        }
        if let Some(i) = Ingredient::ALL.iter().find(|i| i.code() == s) {
            return Ok(Self::Ingredient(*i));
        }
        if let Some(a) = AirComponent::ALL.iter().find(|a| a.code() == s) {
            return Ok(Self::Air(*a));
        }
        Err(format!("unknown resource key '{s}'"))
    }
}

impl TryFrom<String> for ResourceKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceKey> for String {
    fn from(key: ResourceKey) -> Self {
        key.to_string()
    }
}
