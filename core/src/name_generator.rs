//! Deterministic colonist names from curated lists.
//!
//! Same random stream, same crew roster.

use crate::rng::{pick, RandomSource};

pub struct NameGenerator;

impl NameGenerator {
    /// "First Last".
    pub fn full_name(rng: &mut dyn RandomSource) -> String {
        let first = Self::first_name(rng);
        let last = Self::last_name(rng);
        format!("{first} {last}")
    }

    pub fn first_name(rng: &mut dyn RandomSource) -> &'static str {
        pick(rng, FIRST_NAMES).copied().unwrap_or("Crew")
    }

    pub fn last_name(rng: &mut dyn RandomSource) -> &'static str {
        pick(rng, LAST_NAMES).copied().unwrap_or("Member")
    }
}

const FIRST_NAMES: &[&str] = &[
    "Amara", "Anders", "Aiko", "Bashir", "Beatriz", "Bogdan", "Chiara", "Dario", "Dmitri",
    "Elif", "Emeka", "Esther", "Farid", "Freya", "Gaspard", "Greta", "Hana", "Hugo", "Ilse",
    "Imani", "Ivo", "Jonas", "Juno", "Kalani", "Kenji", "Kofi", "Lena", "Lior", "Luca", "Maia",
    "Mateo", "Mira", "Nadia", "Nils", "Noor", "Odile", "Oren", "Paz", "Priya", "Quentin",
    "Rafael", "Rhea", "Rowan", "Saoirse", "Sami", "Sven", "Talia", "Tariq", "Ulla", "Valentin",
    "Vera", "Wren", "Ximena", "Yara", "Yusuf", "Zeno", "Zofia",
];

const LAST_NAMES: &[&str] = &[
    "Abara", "Andersen", "Baptiste", "Bergstrom", "Castellanos", "Chowdhury", "Dahl",
    "Delacroix", "Eze", "Falk", "Ferreira", "Galanis", "Haddad", "Halvorsen", "Ibarra",
    "Ishikawa", "Jansen", "Kaur", "Kowalski", "Lindqvist", "Lovelace", "Mbeki", "Moreau",
    "Nakamura", "Novak", "Okafor", "Olsen", "Petrov", "Quispe", "Rahman", "Reyes", "Sato",
    "Schreiber", "Silva", "Takahashi", "Tremblay", "Ueda", "Varga", "Villanueva", "Wojcik",
    "Yilmaz", "Zhang", "Zubiri",
];
