//! The resource ledger — every tank, box, battery and the air.
//!
//! RULE: the ledger never invents or destroys resource silently.
//! Every mutation either fully succeeds, returns what could not be
//! placed (spill), or reports a shortage to the caller.
//!
//! Containers live in flat vectors owned by the habitat and are
//! addressed by stable id; nothing outside this module holds references
//! into them across a cycle.

pub mod air;
pub mod battery;
pub mod container;
pub mod resource;
pub mod storage;
pub mod tank;

pub use air::{AirComposition, AirQuality};
pub use battery::Battery;
pub use container::{merge_same_kind, Container, MergeOutcome, Stockpile};
pub use resource::{AirComponent, Ingredient, ResourceKey, TankKind};
pub use storage::StorageBox;
pub use tank::Tank;

use crate::{
    error::{SimError, SimResult},
    types::{EntityId, Units},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    pub tanks: Vec<Tank>,
    pub boxes: Vec<StorageBox>,
    pub batteries: Vec<Battery>,
    pub air: AirComposition,
}

impl Ledger {
    // ── Totals ─────────────────────────────────────────────────

    pub fn tank_total(&self, kind: TankKind) -> Units {
        self.tanks.iter().filter(|t| t.kind == kind).map(|t| t.current()).sum()
    }

    pub fn box_total(&self, ingredient: Ingredient) -> Units {
        self.boxes
            .iter()
            .filter(|b| b.ingredient == ingredient)
            .map(|b| b.current())
            .sum()
    }

    pub fn water(&self) -> Units {
        self.tank_total(TankKind::H2O)
    }

    pub fn energy(&self) -> Units {
        self.batteries.iter().map(|b| b.current()).sum()
    }

    /// How much of `key` the ledger can hand out right now.
    pub fn available(&self, key: ResourceKey) -> Units {
        match key {
            ResourceKey::Tank(kind) => self.tank_total(kind),
            ResourceKey::Ingredient(ingredient) => self.box_total(ingredient),
            ResourceKey::Air(component) => self.air.get(component),
        }
    }

    // ── Consumption ────────────────────────────────────────────

    /// Pay `amount` of `key`, drawing from the fullest containers first.
    ///
    /// - `Ok(true)`: paid in full.
    /// - `Ok(false)`: not enough available; nothing was touched.
    /// - `Err(InvariantViolation)`: the drain plan could not be resolved
    ///   to zero; nothing was touched.
    pub fn pay(&mut self, key: ResourceKey, amount: Units) -> SimResult<bool> {
        if amount <= 0 {
            return Ok(true);
        }
        if self.available(key) < amount {
            return Ok(false);
        }
        match key {
            ResourceKey::Air(component) => {
                let taken = self.air.remove(component, amount);
                if taken != amount {
                    self.air.add(component, taken);
                    return Err(unresolved(key, amount, taken));
                }
                Ok(true)
            }
            ResourceKey::Tank(kind) => {
                pay_from(&mut self.tanks, |t| t.kind == kind, key, amount)?;
                Ok(true)
            }
            ResourceKey::Ingredient(ingredient) => {
                pay_from(&mut self.boxes, |b| b.ingredient == ingredient, key, amount)?;
                Ok(true)
            }
        }
    }

    /// `pay`, with invariant violations logged and treated as a failed,
    /// no-op transaction.
    pub fn consume(&mut self, key: ResourceKey, amount: Units) -> bool {
        match self.pay(key, amount) {
            Ok(paid) => paid,
            Err(e) => {
                log::error!("ledger: {e}; transaction skipped");
                false
            }
        }
    }

    // ── Production ─────────────────────────────────────────────

    /// Store `amount` of `key`. Returns the spilled remainder.
    ///
    /// Tank kinds fill the fullest tank with room first, then claim
    /// `Empty` tanks. Air never spills.
    pub fn store(&mut self, key: ResourceKey, amount: Units) -> Units {
        if amount <= 0 {
            return 0;
        }
        match key {
            ResourceKey::Air(component) => {
                self.air.add(component, amount);
                0
            }
            ResourceKey::Tank(kind) => {
                let mut left = fill_into(&mut self.tanks, |t| t.kind == kind, amount);
                if left > 0 && kind != TankKind::Empty {
                    for tank in self.tanks.iter_mut().filter(|t| t.kind == TankKind::Empty) {
                        if left == 0 {
                            break;
                        }
                        tank.claim(kind);
                        left = tank.fill(left);
                    }
                }
                left
            }
            ResourceKey::Ingredient(ingredient) => {
                fill_into(&mut self.boxes, |b| b.ingredient == ingredient, amount)
            }
        }
    }

    // ── Energy ─────────────────────────────────────────────────

    /// Charge batteries in order. Returns energy that did not fit.
    pub fn charge(&mut self, amount: Units) -> Units {
        let mut left = amount.max(0);
        for battery in &mut self.batteries {
            if left == 0 {
                break;
            }
            left = battery.fill(left);
        }
        left
    }

    /// Draw `amount` from the battery pool, fullest first.
    /// All-or-nothing: returns false and touches nothing when short.
    pub fn discharge(&mut self, amount: Units) -> bool {
        if amount <= 0 {
            return true;
        }
        if self.energy() < amount {
            return false;
        }
        let mut order: Vec<usize> = (0..self.batteries.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.batteries[i].current()));
        let mut left = amount;
        for i in order {
            left -= self.batteries[i].drain(left);
            if left == 0 {
                break;
            }
        }
        true
    }

    // ── Tanks ──────────────────────────────────────────────────

    /// Drain tanks of `kind`, fullest first, up to `amount`.
    /// Returns what was drained.
    pub fn drain_tanks(&mut self, kind: TankKind, amount: Units) -> Units {
        let mut order: Vec<usize> = self
            .tanks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == kind)
            .map(|(i, _)| i)
            .collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.tanks[i].current()));
        let mut drained = 0;
        for i in order {
            if drained >= amount {
                break;
            }
            drained += self.tanks[i].drain(amount - drained);
        }
        drained
    }

    pub fn tank(&self, id: &str) -> Option<&Tank> {
        self.tanks.iter().find(|t| t.id == id)
    }

    pub fn tank_mut(&mut self, id: &str) -> Option<&mut Tank> {
        self.tanks.iter_mut().find(|t| t.id == id)
    }

    pub fn remove_tank(&mut self, id: &str) -> Option<Tank> {
        let idx = self.tanks.iter().position(|t| t.id == id)?;
        Some(self.tanks.remove(idx))
    }

    /// Remove empty tanks: every empty tank when `clear_all`, otherwise
    /// only those flagged `discard_when_empty`. Returns removed ids.
    pub fn prune_empty_tanks(&mut self, clear_all: bool) -> Vec<EntityId> {
        let mut removed = Vec::new();
        self.tanks.retain(|t| {
            let prune = t.is_empty() && (clear_all || t.discard_when_empty);
            if prune {
                removed.push(t.id.clone());
            }
            !prune
        });
        removed
    }

    /// Consolidate same-kind tanks.
    pub fn merge_tanks(&mut self, discard_emptied: bool) -> MergeOutcome {
        merge_same_kind(&mut self.tanks, discard_emptied)
    }

    /// True when every container satisfies `0 <= current <= capacity`
    /// and no air component is negative.
    pub fn within_bounds(&self) -> bool {
        fn ok<C: Container>(c: &C) -> bool {
            c.current() >= 0 && c.current() <= c.capacity()
        }
        self.tanks.iter().all(ok)
            && self.boxes.iter().all(ok)
            && self.batteries.iter().all(ok)
            && [
                self.air.o2,
                self.air.co2,
                self.air.n2,
                self.air.h2,
                self.air.h2o,
                self.air.ch4,
            ]
            .iter()
            .all(|v| *v >= 0)
    }
}

fn unresolved(key: ResourceKey, amount: Units, resolved: Units) -> SimError {
    SimError::InvariantViolation(format!(
        "payment of {amount} {key} resolved only {resolved} after draining all containers"
    ))
}

/// Plan a fullest-first drain over matching containers, then commit.
fn pay_from<C: Container>(
    units: &mut [C],
    matches: impl Fn(&C) -> bool,
    key: ResourceKey,
    amount: Units,
) -> SimResult<()> {
    let mut order: Vec<usize> = (0..units.len()).filter(|&i| matches(&units[i])).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(units[i].current()));

    let mut plan: Vec<(usize, Units)> = Vec::new();
    let mut remaining = amount;
    for i in order {
        if remaining == 0 {
            break;
        }
        let take = units[i].current().min(remaining);
        if take > 0 {
            plan.push((i, take));
            remaining -= take;
        }
    }
    if remaining != 0 {
        return Err(unresolved(key, amount, amount - remaining));
    }
    for (i, take) in plan {
        units[i].drain(take);
    }
    Ok(())
}

/// Fill matching containers, fullest-with-room first. Returns leftover.
fn fill_into<C: Container>(units: &mut [C], matches: impl Fn(&C) -> bool, amount: Units) -> Units {
    let mut order: Vec<usize> = (0..units.len())
        .filter(|&i| matches(&units[i]) && units[i].room() > 0)
        .collect();
    order.sort_by_key(|&i| std::cmp::Reverse(units[i].current()));
    let mut left = amount;
    for i in order {
        if left == 0 {
            break;
        }
        left = units[i].fill(left);
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        Ledger {
            tanks: vec![
                Tank::new("w1", TankKind::H2O, 100).filled(30),
                Tank::new("w2", TankKind::H2O, 100).filled(60),
                Tank::new("e1", TankKind::Empty, 50),
            ],
            boxes: vec![StorageBox::new("f1", Ingredient::Fertilizer, 10).filled(9)],
            batteries: vec![Battery::new("b1", 100).charged(40), Battery::new("b2", 100)],
            air: AirComposition::breathable(1000),
        }
    }

    #[test]
    fn pay_draws_fullest_first() {
        let mut l = ledger();
        assert!(l.pay(ResourceKey::Tank(TankKind::H2O), 70).unwrap());
        assert_eq!(l.tank("w2").unwrap().current(), 0);
        assert_eq!(l.tank("w1").unwrap().current(), 20);
    }

    #[test]
    fn short_payment_touches_nothing() {
        let mut l = ledger();
        let before = l.clone();
        assert!(!l.pay(ResourceKey::Tank(TankKind::H2O), 91).unwrap());
        assert_eq!(l, before);
    }

    #[test]
    fn store_claims_empty_tanks_and_reports_spill() {
        let mut l = ledger();
        let spilled = l.store(ResourceKey::Tank(TankKind::H2), 70);
        assert_eq!(spilled, 20);
        let claimed = l.tank("e1").unwrap();
        assert_eq!(claimed.kind, TankKind::H2);
        assert_eq!(claimed.current(), 50);
    }

    #[test]
    fn store_into_boxes_spills_overflow() {
        let mut l = ledger();
        assert_eq!(l.store(ResourceKey::Ingredient(Ingredient::Fertilizer), 5), 4);
        assert_eq!(l.box_total(Ingredient::Fertilizer), 10);
    }

    #[test]
    fn charge_reports_overflow() {
        let mut l = ledger();
        assert_eq!(l.charge(200), 40);
        assert_eq!(l.energy(), 200);
    }

    #[test]
    fn discharge_is_all_or_nothing() {
        let mut l = ledger();
        assert!(!l.discharge(41));
        assert_eq!(l.energy(), 40);
        assert!(l.discharge(40));
        assert_eq!(l.energy(), 0);
    }

    #[test]
    fn prune_respects_policy() {
        let mut l = ledger();
        l.tanks.push(Tank::new("d1", TankKind::O2, 10).discardable());
        let removed = l.prune_empty_tanks(false);
        assert_eq!(removed, vec!["d1".to_string()]);
        let removed = l.prune_empty_tanks(true);
        assert_eq!(removed, vec!["e1".to_string()]);
        assert!(l.within_bounds());
    }
}
