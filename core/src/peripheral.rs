//! Peripheral production model — machines that convert resources.
//!
//! Recipes are data. Every kind shares one apply procedure:
//!   1. off or broken machines do nothing
//!   2. energy is charged first; no energy, no run
//!   3. consumption in recipe order, stopping at the first shortage
//!   4. production, with anything that does not fit reported as spill
//!
//! Step 3 is deliberately not transactional: entries consumed before the
//! failing one stay consumed.

use crate::{
    ledger::{AirComponent, Ingredient, Ledger, ResourceKey, TankKind},
    rng::RandomSource,
    types::{EntityId, Units},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeripheralKind {
    ScrubberCO2,
    Electrolizer,
    Methanizer,
    WaterFilter,
    BioSolidifier,
    Condensator,
    AirTrap,
}

impl PeripheralKind {
    pub const ALL: [PeripheralKind; 7] = [
        Self::ScrubberCO2,
        Self::Electrolizer,
        Self::Methanizer,
        Self::WaterFilter,
        Self::BioSolidifier,
        Self::Condensator,
        Self::AirTrap,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Peripheral {
    pub id: EntityId,
    pub kind: PeripheralKind,
    pub level: u32,
    pub is_broken: bool,
    pub powered_on: bool,
}

impl Peripheral {
    pub fn new(id: impl Into<EntityId>, kind: PeripheralKind) -> Self {
        Self {
            id: id.into(),
            kind,
            level: 1,
            is_broken: false,
            powered_on: true,
        }
    }
}

/// One signed line of a recipe: negative consumes, positive produces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeEntry {
    pub key: ResourceKey,
    pub amount: Units,
}

impl RecipeEntry {
    pub fn new(key: ResourceKey, amount: Units) -> Self {
        Self { key, amount }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    /// Energy charged per cycle before anything else happens.
    pub energy_cost: Units,
    pub entries: Vec<RecipeEntry>,
    /// Two alternative production sets; one is chosen by a fair coin.
    #[serde(default)]
    pub branches: Option<[Vec<RecipeEntry>; 2]>,
}

impl Recipe {
    pub fn consumption(&self) -> impl Iterator<Item = &RecipeEntry> {
        self.entries.iter().filter(|e| e.amount < 0)
    }

    pub fn production(&self) -> impl Iterator<Item = &RecipeEntry> {
        self.entries.iter().filter(|e| e.amount > 0)
    }
}

/// The recipe table, keyed by peripheral kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeBook {
    recipes: HashMap<PeripheralKind, Recipe>,
}

impl RecipeBook {
    pub fn new(recipes: HashMap<PeripheralKind, Recipe>) -> Self {
        Self { recipes }
    }

    pub fn get(&self, kind: PeripheralKind) -> Option<&Recipe> {
        self.recipes.get(&kind)
    }

    /// Replace individual recipes, keeping the rest.
    pub fn merge(&mut self, overrides: HashMap<PeripheralKind, Recipe>) {
        self.recipes.extend(overrides);
    }

    pub fn builtin() -> Self {
        use ResourceKey::{Air, Ingredient as Ing, Tank};
        let e = RecipeEntry::new;

        let mut recipes = HashMap::new();
        recipes.insert(
            PeripheralKind::ScrubberCO2,
            Recipe {
                energy_cost: 4,
                entries: vec![
                    e(Air(AirComponent::CarbonDioxide), -3),
                    e(Tank(TankKind::CO2), 3),
                ],
                branches: None,
            },
        );
        recipes.insert(
            PeripheralKind::Electrolizer,
            Recipe {
                energy_cost: 5,
                entries: vec![
                    e(Tank(TankKind::H2O), -10),
                    e(Tank(TankKind::H2), 10),
                    e(Air(AirComponent::Oxygen), 5),
                ],
                branches: None,
            },
        );
        recipes.insert(
            PeripheralKind::Methanizer,
            Recipe {
                energy_cost: 6,
                entries: vec![
                    e(Tank(TankKind::CO2), -2),
                    e(Tank(TankKind::H2), -4),
                    e(Tank(TankKind::CH4), 1),
                    e(Tank(TankKind::H2O), 2),
                ],
                branches: None,
            },
        );
        recipes.insert(
            PeripheralKind::WaterFilter,
            Recipe {
                energy_cost: 4,
                entries: vec![e(Ing(Ingredient::WasteLiquid), -4)],
                branches: Some([
                    vec![e(Tank(TankKind::H2O), 3)],
                    vec![e(Tank(TankKind::H2O), 2), e(Air(AirComponent::Vapor), 1)],
                ]),
            },
        );
        recipes.insert(
            PeripheralKind::BioSolidifier,
            Recipe {
                energy_cost: 5,
                entries: vec![e(Ing(Ingredient::WasteSolid), -3)],
                branches: Some([
                    vec![e(Ing(Ingredient::Fertilizer), 2)],
                    vec![e(Tank(TankKind::CH4), 1)],
                ]),
            },
        );
        recipes.insert(
            PeripheralKind::Condensator,
            Recipe {
                energy_cost: 3,
                entries: vec![e(Air(AirComponent::Vapor), -3), e(Tank(TankKind::H2O), 3)],
                branches: None,
            },
        );
        recipes.insert(
            PeripheralKind::AirTrap,
            Recipe {
                energy_cost: 6,
                entries: vec![e(Tank(TankKind::N2), 4)],
                branches: None,
            },
        );
        Self { recipes }
    }
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::builtin()
    }
}

/// What happened when a peripheral was applied for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PeripheralRun {
    PoweredOff,
    Broken,
    NoRecipe,
    /// The battery pool could not cover the energy cost.
    NoEnergy { needed: Units, available: Units },
    /// Consumption stopped at `key`. `consumed` lists entries that were
    /// already taken and are not given back.
    Starved {
        key: ResourceKey,
        needed: Units,
        available: Units,
        consumed: Vec<RecipeEntry>,
    },
    Ran {
        consumed: Vec<RecipeEntry>,
        produced: Vec<RecipeEntry>,
        spilled: Vec<RecipeEntry>,
    },
}

/// Apply one peripheral's recipe against the ledger for one cycle.
pub fn apply_peripheral(
    peripheral: &Peripheral,
    recipes: &RecipeBook,
    ledger: &mut Ledger,
    rng: &mut dyn RandomSource,
) -> PeripheralRun {
    // A broken machine is reported whether or not it is switched on.
    if peripheral.is_broken {
        return PeripheralRun::Broken;
    }
    if !peripheral.powered_on {
        return PeripheralRun::PoweredOff;
    }
    let Some(recipe) = recipes.get(peripheral.kind) else {
        return PeripheralRun::NoRecipe;
    };

    if !ledger.discharge(recipe.energy_cost) {
        return PeripheralRun::NoEnergy {
            needed: recipe.energy_cost,
            available: ledger.energy(),
        };
    }

    let mut consumed = Vec::new();
    for entry in recipe.consumption() {
        let needed = -entry.amount;
        if !ledger.consume(entry.key, needed) {
            return PeripheralRun::Starved {
                key: entry.key,
                needed,
                available: ledger.available(entry.key),
                consumed,
            };
        }
        consumed.push(RecipeEntry::new(entry.key, needed));
    }

    let mut outputs: Vec<RecipeEntry> = recipe.production().copied().collect();
    if let Some(branches) = &recipe.branches {
        let pick = usize::from(rng.coin_flip());
        outputs.extend(branches[pick].iter().filter(|e| e.amount > 0).copied());
    }

    let mut produced = Vec::new();
    let mut spilled = Vec::new();
    for entry in outputs {
        let lost = ledger.store(entry.key, entry.amount);
        if entry.amount - lost > 0 {
            produced.push(RecipeEntry::new(entry.key, entry.amount - lost));
        }
        if lost > 0 {
            spilled.push(RecipeEntry::new(entry.key, lost));
        }
    }

    PeripheralRun::Ran {
        consumed,
        produced,
        spilled,
    }
}
