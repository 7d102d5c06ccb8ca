use super::container::Container;
use crate::types::{EntityId, Units};
use serde::{Deserialize, Serialize};

/// An energy store. Charged and discharged only; never destroyed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Battery {
    pub id: EntityId,
    current: Units,
    capacity: Units,
}

impl Battery {
    pub fn new(id: impl Into<EntityId>, capacity: Units) -> Self {
        Self {
            id: id.into(),
            current: 0,
            capacity: capacity.max(0),
        }
    }

    pub fn charged(mut self, amount: Units) -> Self {
        self.set_current(amount);
        self
    }
}

impl Container for Battery {
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
