//! Catch-up scheduling — replays the hours a habitat has missed.
//!
//! The scheduler floors the habitat's last-accounted time to its hour,
//! counts the whole hours up to `now`, and drives the engine once per
//! hour. Each cycle's output timestamp is the next cycle's input.

use crate::{
    engine::AccountingEngine,
    error::{SimError, SimResult},
    event::SimEvent,
    habitat::Habitat,
    report::AccountingReport,
    types::SimTime,
};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchUpMode {
    /// Run every due hour.
    Recursive,
    /// Run at most one hour; the rest stay due.
    SingleStep,
}

/// What one catch-up call did.
#[derive(Debug, Clone, Default)]
pub struct CatchUp {
    /// One report per cycle run, oldest first. Empty when nothing was due.
    pub reports: Vec<AccountingReport>,
    pub events: Vec<SimEvent>,
    /// Hours still due after this call.
    pub remaining: u32,
}

impl CatchUp {
    pub fn cycles(&self) -> usize {
        self.reports.len()
    }
}

pub struct CatchUpScheduler {
    engine: AccountingEngine,
}

impl CatchUpScheduler {
    pub fn new(engine: AccountingEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &AccountingEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AccountingEngine {
        &mut self.engine
    }

    /// Bring `habitat` up to `now`. With nothing due the habitat is not
    /// touched and no report is produced.
    pub fn catch_up(&mut self, habitat: &mut Habitat, now: SimTime, mode: CatchUpMode) -> SimResult<CatchUp> {
        let due = habitat.clock.hours_due(now);
        if due == 0 {
            log::debug!("habitat {}: nothing due at {now}", habitat.id);
            return Ok(CatchUp::default());
        }

        let to_run = match mode {
            CatchUpMode::Recursive => due,
            CatchUpMode::SingleStep => 1,
        };
        log::debug!("habitat {}: {due} hours due, running {to_run}", habitat.id);

        let mut outcome = CatchUp::default();
        for _ in 0..to_run {
            let cycle = self.engine.run_cycle(habitat)?;
            outcome.reports.push(cycle.report);
            outcome.events.extend(cycle.events);
        }
        outcome.remaining = habitat.clock.hours_due(now);
        Ok(outcome)
    }

    /// `catch_up` on a shared habitat. The lock is held for the whole
    /// catch-up, so concurrent callers replay disjoint hours.
    pub fn catch_up_shared(&mut self, shared: &SharedHabitat, now: SimTime, mode: CatchUpMode) -> SimResult<CatchUp> {
        let mut habitat = shared.lock()?;
        self.catch_up(&mut habitat, now, mode)
    }
}

/// A habitat handle that may be shared between threads. Only one writer
/// at a time; a cycle always completes before the next begins.
#[derive(Debug, Clone)]
pub struct SharedHabitat {
    inner: Arc<Mutex<Habitat>>,
}

impl SharedHabitat {
    pub fn new(habitat: Habitat) -> Self {
        Self {
            inner: Arc::new(Mutex::new(habitat)),
        }
    }

    pub fn lock(&self) -> SimResult<MutexGuard<'_, Habitat>> {
        self.inner.lock().map_err(|_| SimError::LockPoisoned)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SimResult<Habitat> {
        Ok(self.lock()?.clone())
    }
}
