//! Colonist model — health, happiness, life expectancy, aging.
//!
//! The functions here are pure: the colonist subsystem settles the
//! resource side (water, air, food, energy) against the ledger and hands
//! the outcome in as `Needs`. Every random draw comes from the injected
//! `RandomSource`.

use crate::{
    ledger::AirQuality,
    rng::{pick, RandomSource},
    types::{EntityId, SimTime},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const FOOD_HISTORY_LEN: usize = 5;

pub const HEALTH_RANGE: (i32, i32) = (0, 100);
pub const HAPPINESS_RANGE: (i32, i32) = (0, 100);
pub const LIFE_EXPECTANCY_RANGE: (i32, i32) = (30, 100);

/// Thresholds a delta is discouraged from crossing.
const DITHER_THRESHOLDS: [i32; 2] = [30, 70];
/// Gap between health and happiness before they are pulled together.
const BALANCE_GAP: i32 = 20;

/// Tech level at which a crew larger than `CROWDED_POPULATION` stops
/// costing happiness.
const TECH_FOR_LARGE_CREW: u32 = 6;
const CROWDED_POPULATION: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    Work,
    Study,
    Leisure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub kind: ActivityKind,
    pub ends_at: SimTime,
}

impl Activity {
    pub fn is_running(&self, at: SimTime) -> bool {
        self.ends_at > at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colonist {
    pub id: EntityId,
    pub name: String,
    pub health_physical: i32,
    pub happiness: i32,
    pub life_expectancy: i32,
    pub age: i32,
    pub food_eaten: VecDeque<String>,
    pub activity: Option<Activity>,
}

impl Colonist {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, age: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            health_physical: 100,
            happiness: 80,
            life_expectancy: 80,
            age,
            food_eaten: VecDeque::with_capacity(FOOD_HISTORY_LEN),
            activity: None,
        }
    }

    /// Positive health and not past life expectancy.
    pub fn is_alive(&self) -> bool {
        self.health_physical >= 1 && self.age <= self.life_expectancy
    }

    /// Remember a meal, keeping only the last five.
    pub fn record_meal(&mut self, food: impl Into<String>) {
        self.food_eaten.push_back(food.into());
        while self.food_eaten.len() > FOOD_HISTORY_LEN {
            self.food_eaten.pop_front();
        }
    }

    pub fn distinct_foods(&self) -> usize {
        let mut seen: Vec<&str> = Vec::with_capacity(self.food_eaten.len());
        for food in &self.food_eaten {
            if !seen.contains(&food.as_str()) {
                seen.push(food);
            }
        }
        seen.len()
    }

    /// Busy on something other than study at `at`.
    pub fn is_working(&self, at: SimTime) -> bool {
        self.activity
            .as_ref()
            .is_some_and(|a| a.is_running(at) && a.kind != ActivityKind::Study)
    }

    pub fn apply_health(&mut self, delta: i32) {
        self.health_physical = clamp(self.health_physical + delta, HEALTH_RANGE);
    }

    pub fn apply_happiness(&mut self, delta: i32) {
        self.happiness = clamp(self.happiness + delta, HAPPINESS_RANGE);
    }

    pub fn apply_life_expectancy(&mut self, delta: i32) {
        self.life_expectancy = clamp(self.life_expectancy + delta, LIFE_EXPECTANCY_RANGE);
    }

    /// Clamp every bounded field; used on freshly loaded or built colonists.
    pub fn normalize(&mut self) {
        self.apply_health(0);
        self.apply_happiness(0);
        self.apply_life_expectancy(0);
    }
}

fn clamp(v: i32, (lo, hi): (i32, i32)) -> i32 {
    v.clamp(lo, hi)
}

/// How breathing went this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirIntake {
    /// Oxygen was consumed; the effect depends on the quality tier.
    Breathed(AirQuality),
    /// Not enough oxygen to breathe at all.
    Suffocating,
}

/// The resource side of one colonist's cycle, already settled.
#[derive(Debug, Clone, PartialEq)]
pub struct Needs {
    pub water: bool,
    pub air: AirIntake,
    /// Name of the food eaten, if any.
    pub food: Option<String>,
    pub energy: bool,
}

/// Habitat-wide inputs to the happiness roll.
#[derive(Debug, Clone, Copy)]
pub struct Surroundings {
    pub at: SimTime,
    pub tech_level: u32,
    pub population: usize,
    pub player_experience: u32,
}

pub fn air_effect(intake: AirIntake) -> i32 {
    match intake {
        AirIntake::Breathed(AirQuality::Great) => 1,
        AirIntake::Breathed(AirQuality::Good) => 0,
        AirIntake::Breathed(AirQuality::Medium) => -1,
        AirIntake::Breathed(AirQuality::Bad) => -3,
        AirIntake::Breathed(AirQuality::Lethal) => -6,
        AirIntake::Suffocating => -6,
    }
}

/// Pull `own` toward `other` when they drift far apart.
fn balance(own: i32, other: i32) -> i32 {
    if own > other + BALANCE_GAP {
        -1
    } else if other > own + BALANCE_GAP {
        1
    } else {
        0
    }
}

/// A delta that would carry `current` across 30 or 70 loses one point.
fn damp_crossing(current: i32, delta: i32) -> i32 {
    let next = current + delta;
    let crosses = DITHER_THRESHOLDS
        .iter()
        .any(|&t| (current < t && next >= t) || (current >= t && next < t));
    if crosses {
        delta - delta.signum()
    } else {
        delta
    }
}

pub fn health_delta(colonist: &Colonist, needs: &Needs) -> i32 {
    let mut delta = if needs.water { 1 } else { -4 };
    delta += air_effect(needs.air);
    delta += if needs.food.is_some() { 1 } else { -4 };
    delta += balance(colonist.health_physical, colonist.happiness);
    damp_crossing(colonist.health_physical, delta)
}

fn tech_bonus(s: &Surroundings) -> i32 {
    let mut bonus = (s.tech_level / 3).min(4) as i32;
    if s.population > CROWDED_POPULATION && s.tech_level < TECH_FOR_LARGE_CREW {
        bonus -= 1;
    }
    bonus
}

fn food_variety(colonist: &Colonist) -> i32 {
    let samples = colonist.food_eaten.len();
    let distinct = colonist.distinct_foods();
    if samples >= 4 && distinct <= 2 {
        -4
    } else if distinct >= 4 {
        1
    } else {
        0
    }
}

/// Candidate mood swings. Each experience tier adds darker outcomes.
pub fn mood_candidates(player_experience: u32) -> Vec<i32> {
    let mut moods = vec![-1, 0, 1, 2];
    if player_experience >= 5 {
        moods.push(-2);
    }
    if player_experience >= 10 {
        moods.extend([-3, -2]);
    }
    if player_experience >= 20 {
        moods.extend([-4, -3]);
    }
    moods
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HappinessRoll {
    pub delta: i32,
    /// Out of personal energy while busy: the running activity takes an
    /// hour longer.
    pub extend_activity: bool,
}

pub fn happiness_delta(
    colonist: &Colonist,
    needs: &Needs,
    surroundings: &Surroundings,
    rng: &mut dyn RandomSource,
) -> HappinessRoll {
    let mut delta = tech_bonus(surroundings);
    delta += food_variety(colonist);

    let working = colonist.is_working(surroundings.at);
    delta += if working { -1 } else { 1 };

    let busy = colonist
        .activity
        .as_ref()
        .is_some_and(|a| a.is_running(surroundings.at));
    let mut extend_activity = false;
    if needs.energy {
        delta += 1;
    } else if busy {
        extend_activity = true;
    } else {
        delta -= 3;
    }

    let moods = mood_candidates(surroundings.player_experience);
    delta += pick(rng, &moods).copied().unwrap_or(0);

    delta += balance(colonist.happiness, colonist.health_physical);
    HappinessRoll {
        delta: damp_crossing(colonist.happiness, delta),
        extend_activity,
    }
}

pub fn life_expectancy_delta(colonist: &Colonist, rng: &mut dyn RandomSource) -> i32 {
    let mut candidates = vec![0];
    if colonist.happiness > 80 {
        candidates.push(1);
    } else if colonist.happiness < 20 {
        candidates.push(-1);
    }
    if colonist.health_physical > 80 {
        candidates.push(1);
    } else if colonist.health_physical < 20 {
        candidates.push(-1);
    }
    if colonist.life_expectancy > 90 {
        candidates.push(-1);
    } else if colonist.life_expectancy < 40 {
        candidates.push(1);
    }
    pick(rng, &candidates).copied().unwrap_or(0)
}

/// Result of one colonist's full update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColonistUpdate {
    pub health: i32,
    pub happiness: i32,
    pub life_expectancy: i32,
}

/// Apply all three deltas for one cycle. Values end clamped.
pub fn update_colonist(
    colonist: &mut Colonist,
    needs: &Needs,
    surroundings: &Surroundings,
    rng: &mut dyn RandomSource,
) -> ColonistUpdate {
    let health = health_delta(colonist, needs);
    let roll = happiness_delta(colonist, needs, surroundings, rng);
    let life = life_expectancy_delta(colonist, rng);

    if let Some(food) = &needs.food {
        colonist.record_meal(food.clone());
    }
    if roll.extend_activity {
        if let Some(activity) = colonist.activity.as_mut() {
            activity.ends_at += Duration::hours(1);
        }
    }

    colonist.apply_health(health);
    colonist.apply_happiness(roll.delta);
    colonist.apply_life_expectancy(life);

    ColonistUpdate {
        health,
        happiness: roll.delta,
        life_expectancy: life,
    }
}
