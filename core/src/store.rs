//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine calls store methods; subsystems never see the store.

use crate::{
    error::{SimError, SimResult},
    event::EventLogEntry,
    report::AccountingReport,
    snapshot::HabitatSnapshot,
    types::SimTime,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the simulation database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    /// Register a habitat run. Re-registering the same habitat is a no-op.
    pub fn insert_run(&self, habitat_id: &str, seed: u64, version: &str, started_at: SimTime) -> SimResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO habitat_run (habitat_id, seed, version, started_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![habitat_id, seed as i64, version, started_at.timestamp()],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        insert_event(&self.conn, entry)
    }

    pub fn events_for_cycle(&self, habitat_id: &str, at: SimTime) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habitat_id, at, subsystem, event_type, payload
             FROM event_log WHERE habitat_id = ?1 AND at = ?2
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![habitat_id, at.timestamp()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, habitat_id, secs, subsystem, event_type, payload)| {
                Ok(EventLogEntry {
                    id: Some(id),
                    habitat_id,
                    at: from_secs(secs)?,
                    subsystem,
                    event_type,
                    payload,
                })
            })
            .collect()
    }

    // ── Cycle ──────────────────────────────────────────────────

    /// Record everything one cycle produced in a single transaction.
    /// On error nothing from the cycle is left in the database.
    pub fn record_cycle(
        &mut self,
        events: &[EventLogEntry],
        report: &AccountingReport,
        snapshot: Option<&HabitatSnapshot>,
    ) -> SimResult<()> {
        let tx = self.conn.transaction()?;
        for entry in events {
            insert_event(&tx, entry)?;
        }
        insert_report(&tx, report)?;
        if let Some(snapshot) = snapshot {
            insert_snapshot(&tx, snapshot)?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Reports ────────────────────────────────────────────────

    pub fn save_report(&self, report: &AccountingReport) -> SimResult<()> {
        insert_report(&self.conn, report)
    }

    pub fn latest_report(&self, habitat_id: &str) -> SimResult<Option<AccountingReport>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT report_json FROM accounting_report
                 WHERE habitat_id = ?1
                 ORDER BY at DESC, id DESC LIMIT 1",
                params![habitat_id],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j).map_err(SimError::from))
            .transpose()
    }

    pub fn report_count(&self, habitat_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM accounting_report WHERE habitat_id = ?1",
            params![habitat_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, snapshot: &HabitatSnapshot) -> SimResult<()> {
        insert_snapshot(&self.conn, snapshot)
    }

    pub fn latest_snapshot(&self, habitat_id: &str) -> SimResult<Option<HabitatSnapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM habitat_snapshot
                 WHERE habitat_id = ?1
                 ORDER BY at DESC, id DESC LIMIT 1",
                params![habitat_id],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| HabitatSnapshot::from_json(&j)).transpose()
    }
}

fn insert_event(conn: &Connection, entry: &EventLogEntry) -> SimResult<()> {
    conn.execute(
        "INSERT INTO event_log (habitat_id, at, subsystem, event_type, payload)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.habitat_id,
            entry.at.timestamp(),
            entry.subsystem,
            entry.event_type,
            entry.payload,
        ],
    )?;
    Ok(())
}

fn insert_report(conn: &Connection, report: &AccountingReport) -> SimResult<()> {
    let json = serde_json::to_string(report)?;
    conn.execute(
        "INSERT INTO accounting_report (habitat_id, at, report_json) VALUES (?1, ?2, ?3)",
        params![report.habitat_id, report.at.timestamp(), json],
    )?;
    Ok(())
}

fn insert_snapshot(conn: &Connection, snapshot: &HabitatSnapshot) -> SimResult<()> {
    conn.execute(
        "INSERT INTO habitat_snapshot (habitat_id, at, state_json) VALUES (?1, ?2, ?3)",
        params![snapshot.habitat_id, snapshot.at.timestamp(), snapshot.to_json()?],
    )?;
    Ok(())
}

fn from_secs(secs: i64) -> SimResult<SimTime> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| SimError::InvariantViolation(format!("stored timestamp {secs} out of range")))
}
