//! habitat-core: life-support accounting for a self-contained habitat.
//!
//! Air, water, energy, materials and crew evolve through hourly
//! accounting cycles. See `engine` for the cycle order and `scheduler`
//! for catch-up.

pub mod air_subsystem;
pub mod clock;
pub mod colonist;
pub mod colonist_subsystem;
pub mod command;
pub mod config;
pub mod energy_subsystem;
pub mod engine;
pub mod error;
pub mod event;
pub mod habitat;
pub mod ledger;
pub mod maintenance_subsystem;
pub mod module_power_subsystem;
pub mod name_generator;
pub mod peripheral;
pub mod peripheral_subsystem;
pub mod population;
pub mod report;
pub mod rng;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod subsystem;
pub mod types;
pub mod waste_subsystem;
