//! Simulation configuration, loaded from `data/`.
//!
//! `settings.json` carries the global settings and tuning knobs;
//! `peripherals/recipes.json` overrides individual built-in recipes.

use crate::{
    peripheral::{PeripheralKind, Recipe, RecipeBook, RecipeEntry},
    types::Units,
};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Player-facing switches. Replaceable at runtime through
/// `AccountingEngine::set_settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    pub auto_merge_tanks: bool,
    pub clear_empty_tanks: bool,
    pub serve_bio_fallback_food: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            auto_merge_tanks: true,
            clear_empty_tanks: false,
            serve_bio_fallback_food: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Energy per solar panel size unit per cycle.
    pub solar_output_per_size: Units,
    /// Remote contribution used when no remote data is available, and
    /// the lowest value ever accepted from the remote.
    pub remote_floor: Units,
    /// Energy drawn per unlocked module per cycle.
    pub per_module: Units,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            solar_output_per_size: 10,
            remote_floor: 5,
            per_module: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirConfig {
    /// Air volume each unlocked module needs.
    pub volume_per_module: Units,
}

impl Default for AirConfig {
    fn default() -> Self {
        Self { volume_per_module: 225 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonistConfig {
    pub water_per_colonist: Units,
    pub personal_energy: Units,
    pub aging_weekday: Weekday,
    pub aging_hour: u32,
}

impl Default for ColonistConfig {
    fn default() -> Self {
        Self {
            water_per_colonist: 2,
            personal_energy: 1,
            aging_weekday: Weekday::Mon,
            aging_hour: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    settings: GlobalSettings,
    energy: EnergyConfig,
    air: AirConfig,
    colonist: ColonistConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct RecipeOverride {
    kind: PeripheralKind,
    energy_cost: Units,
    entries: Vec<RecipeEntry>,
    #[serde(default)]
    branches: Option<[Vec<RecipeEntry>; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
struct RecipesFile {
    recipes: Vec<RecipeOverride>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub settings: GlobalSettings,
    pub energy: EnergyConfig,
    pub air: AirConfig,
    pub colonist: ColonistConfig,
    pub recipes: RecipeBook,
}

impl SimConfig {
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/settings.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: SettingsFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        let recipe_path = format!("{data_dir}/peripherals/recipes.json");
        let recipe_content = std::fs::read_to_string(&recipe_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {recipe_path}: {e}"))?;
        let recipe_file: RecipesFile = serde_json::from_str(&recipe_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {recipe_path}: {e}"))?;

        let overrides: HashMap<PeripheralKind, Recipe> = recipe_file
            .recipes
            .into_iter()
            .map(|r| {
                (
                    r.kind,
                    Recipe {
                        energy_cost: r.energy_cost,
                        entries: r.entries,
                        branches: r.branches,
                    },
                )
            })
            .collect();
        let mut recipes = RecipeBook::builtin();
        recipes.merge(overrides);

        log::debug!("Loaded config from {data_dir}");
        Ok(Self {
            settings: file.settings,
            energy: file.energy,
            air: file.air,
            colonist: file.colonist,
            recipes,
        })
    }

    /// Hardcoded defaults. No file access.
    pub fn default_test() -> Self {
        Self {
            settings: GlobalSettings::default(),
            energy: EnergyConfig::default(),
            air: AirConfig::default(),
            colonist: ColonistConfig::default(),
            recipes: RecipeBook::builtin(),
        }
    }
}
