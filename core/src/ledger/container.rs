//! The fill/drain contract shared by tanks, boxes and batteries,
//! plus same-kind consolidation.

use crate::types::{EntityId, Units};

/// A bounded store of whole units.
///
/// Implementors keep `0 <= current <= capacity` at all times; `fill` and
/// `drain` are the only mutation paths.
pub trait Container {
    fn current(&self) -> Units;
    fn capacity(&self) -> Units;

    /// Raw setter used by the provided methods. Must clamp.
    fn set_current(&mut self, value: Units);

    fn room(&self) -> Units {
        (self.capacity() - self.current()).max(0)
    }

    fn is_empty(&self) -> bool {
        self.current() == 0
    }

    /// Add up to `amount`. Returns the part that did not fit (never negative).
    fn fill(&mut self, amount: Units) -> Units {
        if amount <= 0 {
            return 0;
        }
        let accepted = amount.min(self.room());
        self.set_current(self.current() + accepted);
        amount - accepted
    }

    /// Remove up to `amount`. Returns the amount actually removed.
    fn drain(&mut self, amount: Units) -> Units {
        if amount <= 0 {
            return 0;
        }
        let taken = amount.min(self.current());
        self.set_current(self.current() - taken);
        taken
    }
}

/// A container that belongs to a kind and can be consolidated with others
/// of the same kind.
pub trait Stockpile: Container {
    type Kind: Copy + PartialEq;

    fn id(&self) -> &str;
    fn kind(&self) -> Self::Kind;

    /// Whether this unit takes part in consolidation at all.
    fn mergeable(&self) -> bool {
        true
    }

    fn discard_when_empty(&self) -> bool {
        false
    }

    /// Called on a unit that was emptied by consolidation and is kept.
    fn on_emptied(&mut self) {}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Total units moved between containers.
    pub moved: Units,
    /// Containers emptied by the merge and removed.
    pub discarded: Vec<EntityId>,
    /// Containers emptied by the merge and kept.
    pub emptied: Vec<EntityId>,
}

/// Consolidate units of the same kind.
///
/// Repeatedly folds the least-full non-empty unit into the non-empty unit
/// of the same kind with the most room left. A unit emptied this way is
/// removed when `discard_emptied` is set or its own policy asks for it;
/// otherwise `on_emptied` is called and it stays in the list.
pub fn merge_same_kind<C: Stockpile>(units: &mut Vec<C>, discard_emptied: bool) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    let mut emptied_idx: Vec<usize> = Vec::new();

    let mut kinds: Vec<C::Kind> = Vec::new();
    for unit in units.iter().filter(|u| u.mergeable()) {
        if !kinds.contains(&unit.kind()) {
            kinds.push(unit.kind());
        }
    }

    for kind in kinds {
        loop {
            let source = units
                .iter()
                .enumerate()
                .filter(|(_, u)| u.mergeable() && u.kind() == kind && !u.is_empty())
                .min_by_key(|(i, u)| (u.current(), *i))
                .map(|(i, _)| i);
            let Some(source) = source else { break };

            let target = units
                .iter()
                .enumerate()
                .filter(|(i, u)| {
                    *i != source
                        && u.mergeable()
                        && u.kind() == kind
                        && !u.is_empty()
                        && u.room() > 0
                })
                .max_by_key(|(i, u)| (u.room(), std::cmp::Reverse(*i)))
                .map(|(i, _)| i);
            let Some(target) = target else { break };

            let amount = units[source].current().min(units[target].room());
            let taken = units[source].drain(amount);
            let leftover = units[target].fill(taken);
            debug_assert_eq!(leftover, 0);
            outcome.moved += taken;

            if units[source].is_empty() {
                emptied_idx.push(source);
            }
        }
    }

    emptied_idx.sort_unstable();
    emptied_idx.dedup();
    for &i in emptied_idx.iter().rev() {
        if discard_emptied || units[i].discard_when_empty() {
            outcome.discarded.push(units[i].id().to_string());
            units.remove(i);
        } else {
            outcome.emptied.push(units[i].id().to_string());
            units[i].on_emptied();
        }
    }
    outcome.discarded.reverse();
    outcome.emptied.reverse();

    outcome
}
