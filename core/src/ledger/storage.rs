use super::container::{Container, Stockpile};
use super::resource::Ingredient;
use crate::types::{EntityId, Units};
use serde::{Deserialize, Serialize};

/// A storage box for one solid ingredient or waste stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageBox {
    pub id: EntityId,
    pub ingredient: Ingredient,
    current: Units,
    capacity: Units,
}

impl StorageBox {
    pub fn new(id: impl Into<EntityId>, ingredient: Ingredient, capacity: Units) -> Self {
        Self {
            id: id.into(),
            ingredient,
            current: 0,
            capacity: capacity.max(0),
        }
    }

    pub fn filled(mut self, amount: Units) -> Self {
        self.set_current(amount);
        self
    }
}

impl Container for StorageBox {
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

impl Stockpile for StorageBox {
    type Kind = Ingredient;

    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> Ingredient {
        self.ingredient
    }
}
