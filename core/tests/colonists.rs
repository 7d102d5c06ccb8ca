//! Colonist updates, deaths and aging through the accounting cycle.

use chrono::{TimeZone, Utc};
use habitat_core::{
    colonist::Colonist,
    engine::AccountingEngine,
    event::{DeathCause, SimEvent},
    habitat::Habitat,
    ledger::{AirComposition, Battery, Tank, TankKind},
    rng::ScriptedRng,
    types::SimTime,
};

/// A Sunday noon: no aging.
fn sunday() -> SimTime {
    Utc.with_ymd_and_hms(2031, 5, 4, 12, 0, 0).unwrap()
}

/// 2031-05-05 is a Monday.
fn monday_midnight() -> SimTime {
    Utc.with_ymd_and_hms(2031, 5, 5, 0, 0, 0).unwrap()
}

fn supplied_habitat(at: SimTime) -> Habitat {
    let mut habitat = Habitat::new("crew-test", at);
    habitat.unlocked_modules = 1;
    habitat.ledger.batteries.push(Battery::new("battery-1", 1000).charged(500));
    habitat.ledger.tanks.push(Tank::new("water", TankKind::H2O, 500).filled(200));
    habitat.ledger.air = AirComposition::breathable(225);
    for _ in 0..10 {
        habitat.food_queue.push_back("Potato".into());
    }
    habitat
}

fn colonist(id: &str, health: i32, happiness: i32) -> Colonist {
    let mut c = Colonist::new(id, format!("Colonist {id}"), 30);
    c.health_physical = health;
    c.happiness = happiness;
    c
}

#[test]
fn oxygen_starvation_costs_health() {
    let mut habitat = supplied_habitat(sunday());
    habitat.ledger.air = AirComposition {
        n2: 225,
        ..Default::default()
    };
    habitat.colonists.push(colonist("a", 50, 50));

    let mut engine = AccountingEngine::build_test(3).unwrap();
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    let a = habitat.colonist("a").unwrap();
    assert!(a.health_physical <= 48, "health {}", a.health_physical);
    assert!(outcome.report.problems.iter().any(|p| p.contains("could not breathe")));
    assert!(outcome.report.problems.iter().any(|p| p.contains("no oxygen")));
}

#[test]
fn breathing_turns_oxygen_into_co2_and_vapor() {
    let mut habitat = supplied_habitat(sunday());
    habitat.colonists.push(colonist("a", 60, 60));
    let before = habitat.ledger.air;

    let mut engine = AccountingEngine::build_test(3).unwrap();
    engine.run_cycle(&mut habitat).unwrap();

    assert_eq!(habitat.ledger.air.o2, before.o2 - 2);
    assert_eq!(habitat.ledger.air.co2, before.co2 + 1);
    assert_eq!(habitat.ledger.air.h2o, before.h2o + 1);
    assert_eq!(habitat.ledger.water(), 198);
    assert_eq!(habitat.food_queue.len(), 9);
}

#[test]
fn dying_colonist_is_removed_and_stays_gone() {
    let mut habitat = supplied_habitat(sunday());
    habitat.ledger.tanks.clear();
    habitat.food_queue.clear();
    habitat.ledger.air = AirComposition::default();
    habitat.colonists.push(colonist("frail", 1, 50));

    let mut engine = AccountingEngine::build_test(3).unwrap();
    let first = engine.run_cycle(&mut habitat).unwrap();

    assert!(habitat.colonists.is_empty());
    assert!(first.events.iter().any(|e| matches!(
        e,
        SimEvent::ColonistDied { colonist_id, cause: DeathCause::Health, .. } if colonist_id == "frail"
    )));

    let second = engine.run_cycle(&mut habitat).unwrap();
    assert!(!second
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::ColonistDied { .. })));
    assert!(second.report.human_notes.is_empty());
}

#[test]
fn death_skips_the_rest_of_the_cycle_for_that_colonist_only() {
    let mut habitat = supplied_habitat(sunday());
    habitat.ledger.air = AirComposition::default();
    habitat.colonists.push(colonist("frail", 1, 50));
    habitat.colonists.push(colonist("sturdy", 90, 90));

    let mut engine = AccountingEngine::build_test(3).unwrap();
    engine.run_cycle(&mut habitat).unwrap();

    assert_eq!(habitat.colonists.len(), 1);
    assert_eq!(habitat.colonists[0].id, "sturdy");
}

#[test]
fn values_stay_clamped_across_many_cycles() {
    let mut habitat = supplied_habitat(sunday());
    habitat.colonists.push(colonist("a", 100, 100));
    habitat.colonists.push(colonist("b", 2, 2));

    let mut engine = AccountingEngine::build_test(11).unwrap();
    for _ in 0..48 {
        engine.run_cycle(&mut habitat).unwrap();
        for c in &habitat.colonists {
            assert!((0..=100).contains(&c.health_physical));
            assert!((0..=100).contains(&c.happiness));
            assert!((30..=100).contains(&c.life_expectancy));
        }
        assert!(habitat.ledger.within_bounds());
    }
}

#[test]
fn monday_midnight_ages_the_crew() {
    let mut habitat = supplied_habitat(monday_midnight());
    habitat.colonists.push(colonist("a", 90, 70));

    let mut engine = AccountingEngine::build_test(5).unwrap();
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    assert_eq!(habitat.colonist("a").unwrap().age, 31);
    assert!(outcome
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::ColonistAged { age: 31, .. })));

    // The next hour is not an aging hour.
    engine.run_cycle(&mut habitat).unwrap();
    assert_eq!(habitat.colonist("a").unwrap().age, 31);
}

#[test]
fn aging_past_life_expectancy_is_fatal() {
    let mut habitat = supplied_habitat(monday_midnight());
    let mut elder = colonist("elder", 70, 70);
    elder.age = 80;
    elder.life_expectancy = 80;
    habitat.colonists.push(elder);

    let mut engine = AccountingEngine::build_test(5).unwrap();
    // Every pick lands on the first candidate: life expectancy holds.
    engine.use_scripted_rng(ScriptedRng::constant(0));
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    assert!(habitat.colonists.is_empty());
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        SimEvent::ColonistDied { cause: DeathCause::OldAge, .. }
    )));
}
