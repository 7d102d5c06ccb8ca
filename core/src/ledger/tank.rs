use super::container::{Container, Stockpile};
use super::resource::TankKind;
use crate::types::{EntityId, Units};
use serde::{Deserialize, Serialize};

/// A pressurised tank holding one gas or liquid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tank {
    pub id: EntityId,
    pub kind: TankKind,
    current: Units,
    capacity: Units,
    /// Remove the tank from the ledger once it runs dry.
    pub discard_when_empty: bool,
}

impl Tank {
    pub fn new(id: impl Into<EntityId>, kind: TankKind, capacity: Units) -> Self {
        Self {
            id: id.into(),
            kind,
            current: 0,
            capacity: capacity.max(0),
            discard_when_empty: false,
        }
    }

    /// Builder: start with `amount` (clamped to capacity).
    pub fn filled(mut self, amount: Units) -> Self {
        self.set_current(amount);
        self
    }

    pub fn discardable(mut self) -> Self {
        self.discard_when_empty = true;
        self
    }

    /// Hand an empty tank over to a new kind.
    pub fn claim(&mut self, kind: TankKind) {
        if self.current == 0 {
            self.kind = kind;
        }
    }
}

impl Container for Tank {
    fn current(&self) -> Units {
        self.current
    }

    fn capacity(&self) -> Units {
        self.capacity
    }

    fn set_current(&mut self, value: Units) {
        self.current = value.clamp(0, self.capacity);
    }
}

impl Stockpile for Tank {
    type Kind = TankKind;

    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TankKind {
        self.kind
    }

    fn mergeable(&self) -> bool {
        self.kind != TankKind::Empty
    }

    fn discard_when_empty(&self) -> bool {
        self.discard_when_empty
    }

    fn on_emptied(&mut self) {
        self.kind = TankKind::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::container::merge_same_kind;

    #[test]
    fn fill_caps_and_returns_leftover() {
        let mut t = Tank::new("t", TankKind::O2, 100).filled(90);
        assert_eq!(t.fill(25), 15);
        assert_eq!(t.current(), 100);
        assert_eq!(t.fill(-3), 0);
    }

    #[test]
    fn drain_caps_at_current() {
        let mut t = Tank::new("t", TankKind::H2O, 100).filled(30);
        assert_eq!(t.drain(50), 30);
        assert_eq!(t.current(), 0);
        assert_eq!(t.drain(5), 0);
    }

    #[test]
    fn filled_never_exceeds_capacity() {
        let t = Tank::new("t", TankKind::N2, 40).filled(400);
        assert_eq!(t.current(), 40);
    }

    #[test]
    fn merge_folds_least_full_into_roomiest() {
        let mut tanks = vec![
            Tank::new("a", TankKind::O2, 100).filled(80),
            Tank::new("b", TankKind::O2, 100).filled(10),
            Tank::new("c", TankKind::O2, 100).filled(40),
            Tank::new("d", TankKind::H2, 100).filled(5),
        ];
        let outcome = merge_same_kind(&mut tanks, false);

        let o2: Units = tanks
            .iter()
            .filter(|t| t.kind == TankKind::O2)
            .map(|t| t.current())
            .sum();
        assert_eq!(o2, 130, "merge must conserve oxygen");
        assert!(outcome.discarded.is_empty());
        assert!(!outcome.emptied.is_empty());
        // The lone hydrogen tank is untouched.
        assert_eq!(tanks.iter().find(|t| t.id == "d").map(|t| t.current()), Some(5));
        for t in &tanks {
            assert!(t.current() <= t.capacity());
        }
        // Emptied tanks are kept as reusable empties.
        for id in &outcome.emptied {
            let t = tanks.iter().find(|t| &t.id == id).unwrap();
            assert_eq!(t.kind, TankKind::Empty);
        }
    }

    #[test]
    fn merge_discards_emptied_when_asked() {
        let mut tanks = vec![
            Tank::new("a", TankKind::CO2, 100).filled(50),
            Tank::new("b", TankKind::CO2, 100).filled(20),
        ];
        let outcome = merge_same_kind(&mut tanks, true);
        assert_eq!(outcome.discarded, vec!["b".to_string()]);
        assert_eq!(tanks.len(), 1);
        assert_eq!(tanks[0].current(), 70);
    }

    #[test]
    fn merge_respects_per_tank_discard_policy() {
        let mut tanks = vec![
            Tank::new("a", TankKind::CH4, 100).filled(50),
            Tank::new("b", TankKind::CH4, 100).filled(20).discardable(),
        ];
        let outcome = merge_same_kind(&mut tanks, false);
        assert_eq!(outcome.discarded, vec!["b".to_string()]);
        assert_eq!(outcome.moved, 20);
    }
}
