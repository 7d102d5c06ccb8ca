//! Report history, event log and snapshots in the SQLite store.

use chrono::{Duration, TimeZone, Utc};
use habitat_core::{
    config::SimConfig,
    engine::{AccountingEngine, NoRemote},
    event::EventLogEntry,
    habitat::Habitat,
    population::populate,
    report::AccountingReport,
    rng::{RngBank, SubsystemSlot},
    scheduler::{CatchUpMode, CatchUpScheduler},
    snapshot::{HabitatSnapshot, SNAPSHOT_INTERVAL},
    store::SimStore,
    types::SimTime,
};

fn start() -> SimTime {
    Utc.with_ymd_and_hms(2031, 5, 4, 0, 0, 0).unwrap()
}

fn crewed() -> Habitat {
    let mut habitat = Habitat::starter("store-test", start(), &SimConfig::default_test());
    populate(&mut habitat, 2, &mut RngBank::new(3).for_setup(SubsystemSlot::Population));
    habitat
}

#[test]
fn every_cycle_is_kept_in_report_history() {
    let mut habitat = crewed();
    let mut scheduler = CatchUpScheduler::new(AccountingEngine::build_test(3).unwrap());
    scheduler
        .catch_up(&mut habitat, start() + Duration::hours(5), CatchUpMode::Recursive)
        .unwrap();

    let store = &scheduler.engine().store;
    assert_eq!(store.report_count("store-test").unwrap(), 5);
    assert_eq!(store.latest_report("store-test").unwrap(), habitat.current_report);
    assert_eq!(store.latest_report("nobody").unwrap(), None);
}

#[test]
fn cycle_events_are_logged_in_order() {
    let mut habitat = crewed();
    let mut engine = AccountingEngine::build_test(3).unwrap();
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    let logged = engine.store_events_for_cycle("store-test", outcome.at).unwrap();
    assert_eq!(logged.len(), outcome.events.len());
    assert_eq!(logged.first().map(|e| e.event_type.as_str()), Some("cycle_started"));
    assert_eq!(logged.last().map(|e| e.event_type.as_str()), Some("cycle_completed"));
    assert_eq!(logged[0].subsystem, "engine");
}

#[test]
fn snapshot_is_taken_once_a_day() {
    let mut habitat = crewed();
    let mut engine = AccountingEngine::build_test(3).unwrap();

    for _ in 0..SNAPSHOT_INTERVAL - 1 {
        engine.run_cycle(&mut habitat).unwrap();
    }
    assert!(engine.store.latest_snapshot("store-test").unwrap().is_none());

    engine.run_cycle(&mut habitat).unwrap();
    let snapshot = engine.store.latest_snapshot("store-test").unwrap().expect("snapshot");
    assert_eq!(snapshot.habitat, habitat);
    assert_eq!(snapshot.at, start() + Duration::hours(SNAPSHOT_INTERVAL as i64));
}

#[test]
fn snapshot_resumes_where_it_left_off() {
    let store = SimStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.insert_run("store-test", 3, "0.1.0-test", start()).unwrap();
    store.insert_run("store-test", 3, "0.1.0-test", start()).unwrap();

    let habitat = crewed();
    store.save_snapshot(&HabitatSnapshot::capture(&habitat)).unwrap();
    let restored = store.latest_snapshot("store-test").unwrap().unwrap();
    assert_eq!(restored.habitat, habitat);
}

#[test]
fn single_entries_can_be_written_outside_a_cycle() {
    let store = SimStore::in_memory().unwrap();
    store.migrate().unwrap();
    let habitat = crewed();

    store
        .append_event(&EventLogEntry {
            id: None,
            habitat_id: "store-test".to_string(),
            at: start(),
            subsystem: "command".to_string(),
            event_type: "cycle_started".to_string(),
            payload: "{}".to_string(),
        })
        .unwrap();
    let logged = store.events_for_cycle("store-test", start()).unwrap();
    assert_eq!(logged.len(), 1);
    assert!(logged[0].id.is_some());

    let mut report = AccountingReport::begin("store-test", start(), &habitat.ledger);
    report.finish(&habitat.ledger);
    store.save_report(&report).unwrap();
    assert_eq!(store.latest_report("store-test").unwrap(), Some(report));
}

#[test]
fn failed_store_write_leaves_the_hour_due() {
    let path = std::env::temp_dir().join(format!("habitat-store-fail-{}.db", std::process::id()));
    let path = path.to_str().unwrap().to_string();
    let _ = std::fs::remove_file(&path);

    let store = SimStore::open(&path).unwrap();
    store.migrate().unwrap();
    let mut engine = AccountingEngine::build(SimConfig::default_test(), 3, store, Box::new(NoRemote));

    // Starter layout carries an electrolizer, so the ledger would move.
    let mut habitat = crewed();
    let before = habitat.clone();

    let other = rusqlite::Connection::open(&path).unwrap();
    other.execute_batch("DROP TABLE accounting_report;").unwrap();

    assert!(engine.run_cycle(&mut habitat).is_err());
    assert_eq!(habitat, before);
    assert_eq!(habitat.clock.hours_due(start() + Duration::hours(1)), 1);
    assert_eq!(engine.cycles_run(), 0);
    assert!(engine.store_events_for_cycle("store-test", start()).unwrap().is_empty());

    // Once the table is back the same hour is accounted exactly once.
    engine.store.migrate().unwrap();
    let outcome = engine.run_cycle(&mut habitat).unwrap();
    assert_eq!(outcome.at, start());
    assert_eq!(habitat.clock.last_accounted_at, start() + Duration::hours(1));
    assert_eq!(engine.store.report_count("store-test").unwrap(), 1);

    drop(other);
    drop(engine);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}
