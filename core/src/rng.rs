//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through a `RandomSource`. In production that is a
//! SubsystemRng derived from the habitat's master seed; tests may inject
//! a scripted source instead.
//!
//! Each subsystem gets its own RNG stream per cycle, seeded from
//! (master_seed, subsystem slot, cycle index). This means:
//!   - Adding a new subsystem never changes existing subsystems' streams.
//!   - Replaying the same hour always rolls the same values.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// The randomness seam. Mood rolls, waste rolls, life-expectancy picks
/// and the coin-flip production branch all go through this trait.
pub trait RandomSource {
    /// Draw a raw u64 (full range).
    fn next_u64(&mut self) -> u64;

    /// Roll a u64 in [0, n). Returns 0 when n is 0.
    fn next_u64_below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.next_u64() % n
    }

    /// Roll an integer in [lo, hi]. Returns lo when the range is empty.
    fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u64 + 1;
        lo + self.next_u64_below(span) as i64
    }

    /// Unweighted coin flip.
    fn coin_flip(&mut self) -> bool {
        self.next_u64_below(2) == 1
    }
}

/// Pick one element uniformly. None for an empty slice.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.next_u64_below(items.len() as u64) as usize)
}

/// A named, deterministic RNG for a single subsystem.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create a subsystem RNG from the master seed and a stable
    /// stream index. The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl RandomSource for SubsystemRng {
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

/// All subsystem RNGs for a single habitat, indexed by stable slot.
#[derive(Debug, Clone)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// A fresh stream for `slot` during the cycle numbered `cycle_index`
    /// (hours since the Unix epoch of the accounted hour).
    pub fn for_cycle(&self, slot: SubsystemSlot, cycle_index: i64) -> SubsystemRng {
        let stream = (slot as u64) ^ (cycle_index as u64).rotate_left(17);
        SubsystemRng::new(self.master_seed, stream).with_name(slot.name())
    }

    /// A stream for one-off work outside the accounting cycle
    /// (population, runner setup).
    pub fn for_setup(&self, slot: SubsystemSlot) -> SubsystemRng {
        SubsystemRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable subsystem slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every subsystem's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    Energy = 0,
    Peripheral = 1,
    Air = 2,
    Colonist = 3,
    Waste = 4,
    ModulePower = 5,
    Maintenance = 6,
    Population = 7,
    // Add new subsystems here — append only.
}

impl SubsystemSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Peripheral => "peripheral",
            Self::Air => "air",
            Self::Colonist => "colonist",
            Self::Waste => "waste",
            Self::ModulePower => "module_power",
            Self::Maintenance => "maintenance",
            Self::Population => "population",
        }
    }
}

/// Replays a fixed list of raw values, cycling when exhausted.
/// Used by tests that need exact control over every roll.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<u64>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<u64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Every roll returns `value`: `next_u64_below(n)` yields `value % n`.
    pub fn constant(value: u64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRng {
    fn next_u64(&mut self) -> u64 {
        if self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
