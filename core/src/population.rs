//! Crew generation for a fresh habitat.

use crate::{
    colonist::Colonist,
    habitat::Habitat,
    name_generator::NameGenerator,
    rng::RandomSource,
    types::EntityId,
};
use uuid::Uuid;

/// Add `count` colonists to the habitat. Returns their ids.
///
/// Ids come from the random stream, so the same seed always yields the
/// same crew.
pub fn populate(habitat: &mut Habitat, count: usize, rng: &mut dyn RandomSource) -> Vec<EntityId> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let raw = (u128::from(rng.next_u64()) << 64) | u128::from(rng.next_u64());
        let id = Uuid::from_u128(raw).to_string();
        let name = NameGenerator::full_name(rng);

        let mut colonist = Colonist::new(id.clone(), name, rng.range_inclusive(20, 45) as i32);
        colonist.health_physical = rng.range_inclusive(70, 100) as i32;
        colonist.happiness = rng.range_inclusive(60, 100) as i32;
        colonist.life_expectancy = rng.range_inclusive(60, 95) as i32;
        colonist.normalize();

        log::debug!("habitat {}: colonist {} ({}) joined", habitat.id, colonist.name, id);
        habitat.colonists.push(colonist);
        ids.push(id);
    }
    ids
}
