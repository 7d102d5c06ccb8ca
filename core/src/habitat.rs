//! The habitat aggregate — one station and everything it owns.
//!
//! Every collection is a flat vector addressed by stable id. The
//! accounting engine borrows the habitat mutably for one cycle at a time.

use crate::{
    clock::AccountingClock,
    colonist::Colonist,
    config::SimConfig,
    error::{SimError, SimResult},
    ledger::{AirComposition, Battery, Ingredient, Ledger, StorageBox, Tank, TankKind},
    peripheral::{Peripheral, PeripheralKind},
    report::AccountingReport,
    types::{EntityId, HabitatId, SimTime, Units},
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarPanel {
    pub id: EntityId,
    pub size: Units,
}

/// A bio-culture kept as the food source of last resort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioBox {
    pub id: EntityId,
    pub dna: String,
    pub population: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habitat {
    pub id: HabitatId,
    pub ledger: Ledger,
    pub peripherals: Vec<Peripheral>,
    pub solar_panels: Vec<SolarPanel>,
    pub colonists: Vec<Colonist>,
    pub food_queue: VecDeque<String>,
    pub bio_boxes: Vec<BioBox>,
    pub unlocked_modules: u32,
    pub tech_level: u32,
    pub player_experience: u32,
    pub clock: AccountingClock,
    /// The most recent cycle's report. Overwritten every cycle.
    pub current_report: Option<AccountingReport>,
}

impl Habitat {
    /// An empty habitat accounted up to `last_accounted_at`.
    pub fn new(id: impl Into<HabitatId>, last_accounted_at: SimTime) -> Self {
        Self {
            id: id.into(),
            ledger: Ledger::default(),
            peripherals: Vec::new(),
            solar_panels: Vec::new(),
            colonists: Vec::new(),
            food_queue: VecDeque::new(),
            bio_boxes: Vec::new(),
            unlocked_modules: 1,
            tech_level: 0,
            player_experience: 0,
            clock: AccountingClock::new(last_accounted_at),
            current_report: None,
        }
    }

    /// The default station layout: four modules, one machine of each kind,
    /// two solar panels, and two days of food. No colonists; see
    /// `population::populate`.
    pub fn starter(id: impl Into<HabitatId>, last_accounted_at: SimTime, config: &SimConfig) -> Self {
        let mut habitat = Self::new(id, last_accounted_at);
        habitat.unlocked_modules = 4;
        habitat.tech_level = 3;

        let volume = Units::from(habitat.unlocked_modules) * config.air.volume_per_module;
        habitat.ledger = Ledger {
            tanks: vec![
                Tank::new("tank-water-1", TankKind::H2O, 500).filled(300),
                Tank::new("tank-oxygen-1", TankKind::O2, 200).filled(150),
                Tank::new("tank-air-1", TankKind::Air, 1000).filled(600),
                Tank::new("tank-co2-1", TankKind::CO2, 200),
                Tank::new("tank-h2-1", TankKind::H2, 200),
                Tank::new("tank-ch4-1", TankKind::CH4, 100),
                Tank::new("tank-n2-1", TankKind::N2, 200).filled(50),
                Tank::new("tank-spare-1", TankKind::Empty, 200),
                Tank::new("tank-spare-2", TankKind::Empty, 200),
            ],
            boxes: vec![
                StorageBox::new("box-waste-liquid", Ingredient::WasteLiquid, 100),
                StorageBox::new("box-waste-solid", Ingredient::WasteSolid, 100),
                StorageBox::new("box-fertilizer", Ingredient::Fertilizer, 50),
                StorageBox::new("box-silica", Ingredient::Silica, 50).filled(20),
                StorageBox::new("box-iron", Ingredient::Iron, 50).filled(20),
            ],
            batteries: vec![
                Battery::new("battery-1", 500).charged(300),
                Battery::new("battery-2", 500).charged(300),
            ],
            air: AirComposition::breathable(volume),
        };

        habitat.peripherals = PeripheralKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| Peripheral::new(format!("peripheral-{}", i + 1), *kind))
            .collect();
        habitat.solar_panels = vec![
            SolarPanel { id: "solar-1".into(), size: 3 },
            SolarPanel { id: "solar-2".into(), size: 3 },
        ];
        habitat.bio_boxes = vec![BioBox {
            id: "bio-1".into(),
            dna: "spirulina".into(),
            population: 40,
        }];
        for meal in ["Potato", "Rice", "Beans", "Tomato"].iter().cycle().take(48) {
            habitat.food_queue.push_back((*meal).to_string());
        }
        habitat
    }

    pub fn peripheral_mut(&mut self, id: &str) -> SimResult<&mut Peripheral> {
        self.peripherals
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| SimError::NotFound {
                kind: "peripheral",
                id: id.to_string(),
            })
    }

    pub fn colonist(&self, id: &str) -> Option<&Colonist> {
        self.colonists.iter().find(|c| c.id == id)
    }

    /// Serve one meal: the head of the food queue, or a unit of a bio
    /// culture when the queue is empty and `bio_fallback` is on.
    pub fn take_food(&mut self, bio_fallback: bool) -> Option<String> {
        if let Some(meal) = self.food_queue.pop_front() {
            return Some(meal);
        }
        if !bio_fallback {
            return None;
        }
        let bio = self.bio_boxes.iter_mut().find(|b| b.population > 0)?;
        bio.population -= 1;
        Some(bio.dna.clone())
    }
}
