//! Peripheral recipes applied through the accounting cycle.

use chrono::{TimeZone, Utc};
use habitat_core::{
    engine::AccountingEngine,
    event::SimEvent,
    habitat::Habitat,
    ledger::{AirComposition, Battery, Container, Ingredient, ResourceKey, StorageBox, Tank, TankKind},
    peripheral::{apply_peripheral, Peripheral, PeripheralKind, PeripheralRun, RecipeBook},
    rng::ScriptedRng,
    types::SimTime,
};

fn start() -> SimTime {
    Utc.with_ymd_and_hms(2031, 5, 4, 12, 0, 0).unwrap()
}

/// One module, breathable air, charged batteries, no crew.
fn bare_habitat() -> Habitat {
    let mut habitat = Habitat::new("periph-test", start());
    habitat.unlocked_modules = 1;
    habitat.ledger.batteries.push(Battery::new("battery-1", 1000).charged(500));
    habitat.ledger.air = AirComposition::breathable(225);
    habitat
}

#[test]
fn electrolysis_splits_water() {
    let mut habitat = bare_habitat();
    habitat.ledger.tanks.push(Tank::new("water", TankKind::H2O, 100).filled(50));
    habitat.ledger.tanks.push(Tank::new("hydrogen", TankKind::H2, 100));
    habitat.peripherals.push(Peripheral::new("electrolizer", PeripheralKind::Electrolizer));
    let o2_before = habitat.ledger.air.o2;

    let mut engine = AccountingEngine::build_test(1).unwrap();
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    assert_eq!(habitat.ledger.water(), 40);
    assert_eq!(habitat.ledger.tank_total(TankKind::H2), 10);
    assert_eq!(habitat.ledger.air.o2, o2_before + 5);
    assert!(outcome.report.problems.is_empty(), "{:?}", outcome.report.problems);
    assert_eq!(outcome.report.peripheral_notes.len(), 1);
}

#[test]
fn broken_peripheral_never_touches_the_ledger() {
    let mut habitat = bare_habitat();
    habitat.ledger.tanks.push(Tank::new("water", TankKind::H2O, 100).filled(50));
    habitat.ledger.tanks.push(Tank::new("hydrogen", TankKind::H2, 100));
    let mut electrolizer = Peripheral::new("electrolizer", PeripheralKind::Electrolizer);
    electrolizer.is_broken = true;
    habitat.peripherals.push(electrolizer);
    let tanks_before = habitat.ledger.tanks.clone();
    let air_before = habitat.ledger.air;

    let mut engine = AccountingEngine::build_test(1).unwrap();
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    assert_eq!(habitat.ledger.tanks, tanks_before);
    assert_eq!(habitat.ledger.air, air_before);
    assert_eq!(outcome.report.broken_peripherals, vec!["electrolizer".to_string()]);
    assert!(outcome.report.problems.iter().any(|p| p.contains("broken")));
    assert!(outcome
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::PeripheralBroken { peripheral_id, .. } if peripheral_id == "electrolizer")));
}

#[test]
fn broken_peripheral_is_reported_even_when_switched_off() {
    let mut habitat = bare_habitat();
    habitat.ledger.tanks.push(Tank::new("water", TankKind::H2O, 100).filled(50));
    let mut electrolizer = Peripheral::new("e", PeripheralKind::Electrolizer);
    electrolizer.is_broken = true;
    electrolizer.powered_on = false;
    habitat.peripherals.push(electrolizer);

    let mut engine = AccountingEngine::build_test(1).unwrap();
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    assert_eq!(habitat.ledger.water(), 50);
    assert_eq!(outcome.report.broken_peripherals, vec!["e".to_string()]);
    assert!(outcome.report.problems.iter().any(|p| p.contains("broken")));
    assert!(outcome
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::PeripheralBroken { peripheral_id, .. } if peripheral_id == "e")));
}

#[test]
fn powered_off_peripheral_is_only_a_note() {
    let mut habitat = bare_habitat();
    habitat.ledger.tanks.push(Tank::new("water", TankKind::H2O, 100).filled(50));
    let mut electrolizer = Peripheral::new("electrolizer", PeripheralKind::Electrolizer);
    electrolizer.powered_on = false;
    habitat.peripherals.push(electrolizer);

    let mut engine = AccountingEngine::build_test(1).unwrap();
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    assert_eq!(habitat.ledger.water(), 50);
    assert!(outcome.report.problems.is_empty());
    assert!(outcome.report.broken_peripherals.is_empty());
    assert!(outcome.report.peripheral_notes[0].contains("powered off"));
}

#[test]
fn empty_batteries_skip_the_peripheral() {
    let mut habitat = bare_habitat();
    habitat.ledger.batteries = vec![Battery::new("battery-1", 100)];
    habitat.ledger.tanks.push(Tank::new("water", TankKind::H2O, 100).filled(50));
    habitat.peripherals.push(Peripheral::new("electrolizer", PeripheralKind::Electrolizer));

    let mut engine = AccountingEngine::build_test(1).unwrap();
    engine.config.energy.remote_floor = 0;
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    assert_eq!(habitat.ledger.water(), 50);
    assert!(outcome.report.problems.iter().any(|p| p.contains("energy")));
    assert!(habitat.ledger.within_bounds());
}

#[test]
fn consumption_is_not_rolled_back_on_shortage() {
    let mut ledger = bare_habitat().ledger;
    ledger.tanks.push(Tank::new("co2", TankKind::CO2, 100).filled(5));
    let methanizer = Peripheral::new("m", PeripheralKind::Methanizer);

    let run = apply_peripheral(&methanizer, &RecipeBook::builtin(), &mut ledger, &mut ScriptedRng::constant(0));

    match run {
        PeripheralRun::Starved { key, consumed, .. } => {
            assert_eq!(key, ResourceKey::Tank(TankKind::H2));
            assert_eq!(consumed.len(), 1);
        }
        other => panic!("expected a shortage, got {other:?}"),
    }
    // CO2 taken before the hydrogen shortage stays taken.
    assert_eq!(ledger.tank_total(TankKind::CO2), 3);
    assert_eq!(ledger.tank_total(TankKind::CH4), 0);
}

#[test]
fn coin_flip_picks_the_production_branch() {
    let filter = Peripheral::new("f", PeripheralKind::WaterFilter);
    let book = RecipeBook::builtin();
    let ledger_with_waste = || {
        let mut ledger = bare_habitat().ledger;
        ledger.boxes.push(StorageBox::new("waste", Ingredient::WasteLiquid, 50).filled(8));
        ledger.tanks.push(Tank::new("water", TankKind::H2O, 100));
        ledger
    };

    let mut heads = ledger_with_waste();
    let vapor_before = heads.air.h2o;
    apply_peripheral(&filter, &book, &mut heads, &mut ScriptedRng::constant(0));
    assert_eq!(heads.water(), 3);
    assert_eq!(heads.air.h2o, vapor_before);

    let mut tails = ledger_with_waste();
    apply_peripheral(&filter, &book, &mut tails, &mut ScriptedRng::constant(1));
    assert_eq!(tails.water(), 2);
    assert_eq!(tails.air.h2o, vapor_before + 1);
}

#[test]
fn overflow_is_spilled_and_reported() {
    let mut habitat = bare_habitat();
    habitat.ledger.tanks.push(Tank::new("water", TankKind::H2O, 100).filled(50));
    habitat.ledger.tanks.push(Tank::new("hydrogen", TankKind::H2, 4));
    habitat.peripherals.push(Peripheral::new("electrolizer", PeripheralKind::Electrolizer));

    let mut engine = AccountingEngine::build_test(1).unwrap();
    let outcome = engine.run_cycle(&mut habitat).unwrap();

    let hydrogen = habitat.ledger.tank("hydrogen").unwrap();
    assert_eq!(hydrogen.current(), hydrogen.capacity());
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        SimEvent::ResourceSpilled { amount: 6, .. }
    )));
    assert!(outcome.report.peripheral_notes.iter().any(|n| n.contains("spilled")));
}
