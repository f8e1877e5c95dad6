use std::f32::consts::TAU;

use super::*;
use crate::game::command::{CommandKind, CommandList, UnitTypeId};
use crate::game::unit::{BuildQueue, Commandable, EnqueueError, NavAgent};

const EPS: f32 = 1e-4;

fn catalog() -> CommandCatalog {
    CommandCatalog::builtin()
}

fn move_id(catalog: &CommandCatalog) -> CommandId {
    catalog.command_by_name("move").unwrap().id
}

fn spawn_mover(units: &mut Units, catalog: &CommandCatalog, radius: f32) -> EntityId {
    let commands = CommandList::from_slice(&[move_id(catalog)]);
    units.spawn_with(|id| Commandable {
        id,
        unit_type: UnitTypeId(0),
        position: Vec3::ZERO,
        health: 10,
        steering_radius: radius,
        commands,
        nav: Some(NavAgent::new(5.0)),
        production: None,
    })
}

fn spawn_movers(units: &mut Units, catalog: &CommandCatalog, count: usize, radius: f32) -> Vec<EntityId> {
    (0..count).map(|_| spawn_mover(units, catalog, radius)).collect()
}

fn spawn_base(units: &mut Units, catalog: &CommandCatalog) -> EntityId {
    let base = catalog.unit_type_by_name("base").unwrap();
    units.spawn(base, Vec3::new(20.0, 0.0, 20.0), 5)
}

fn assert_close(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < EPS,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

#[test]
fn test_ring_zero_holds_one_unit_at_target() {
    let catalog = catalog();
    let mut units = Units::new();
    let ids = spawn_movers(&mut units, &catalog, 1, 1.0);
    let target = Vec3::new(4.0, 0.0, -2.0);

    let mut dispatcher = Dispatcher::default();
    let report = dispatcher.dispatch(&catalog, &mut units, &ids, TargetHit::ground(target));

    assert_eq!(report.destination_of(ids[0]), Some(target));
    assert_eq!(units.get(ids[0]).unwrap().nav.as_ref().unwrap().destination(), Some(target));
}

#[test]
fn test_ten_units_fill_ring_zero_and_ring_one() {
    let catalog = catalog();
    let mut units = Units::new();
    let ids = spawn_movers(&mut units, &catalog, 10, 1.0);
    let target = Vec3::new(10.0, 0.0, 10.0);

    let mut dispatcher = Dispatcher::default();
    let report = dispatcher.dispatch(&catalog, &mut units, &ids, TargetHit::ground(target));

    assert_close(report.destination_of(ids[0]).unwrap(), target);

    let step = TAU / 10.0;
    for (k, &id) in ids[1..].iter().enumerate() {
        let angle = step * k as f32;
        let expected = target + Vec3::new(3.5 * angle.cos(), 0.0, 3.5 * angle.sin());
        assert_close(report.destination_of(id).unwrap(), expected);
    }

    let state = dispatcher.ring_state();
    assert_eq!(state.ring_index, 1);
    assert_eq!(state.max_per_ring, 10);
    assert_eq!(state.ring_count, 9);
    assert!((state.ring_radius - 3.5).abs() < EPS);
    assert!((state.angular_step - step).abs() < EPS);
}

#[test]
fn test_second_ring_geometry() {
    let catalog = catalog();
    let mut units = Units::new();
    let ids = spawn_movers(&mut units, &catalog, 13, 1.0);

    let mut dispatcher = Dispatcher::default();
    let report = dispatcher.dispatch(&catalog, &mut units, &ids, TargetHit::ground(Vec3::ZERO));

    // Ring 2: radius 7, floor(2π·7 / 2) = 21 slots.
    let state = dispatcher.ring_state();
    assert_eq!(state.ring_index, 2);
    assert_eq!(state.max_per_ring, 21);
    assert!((state.ring_radius - 7.0).abs() < EPS);

    assert_close(report.destination_of(ids[11]).unwrap(), Vec3::new(7.0, 0.0, 0.0));
    let step = TAU / 21.0;
    assert_close(
        report.destination_of(ids[12]).unwrap(),
        Vec3::new(7.0 * step.cos(), 0.0, 7.0 * step.sin()),
    );
}

#[test]
fn test_partial_last_ring_keeps_packed_spacing() {
    let catalog = catalog();
    let mut units = Units::new();
    // One on ring 0, three on a ring sized for ten.
    let ids = spawn_movers(&mut units, &catalog, 4, 1.0);

    let mut dispatcher = Dispatcher::default();
    let report = dispatcher.dispatch(&catalog, &mut units, &ids, TargetHit::ground(Vec3::ZERO));

    let last = report.destination_of(ids[3]).unwrap();
    let angle = last.z.atan2(last.x);
    // Third unit sits at 2 · (2π/10), not at 2 · (2π/3).
    assert!((angle - 2.0 * TAU / 10.0).abs() < EPS);
}

#[test]
fn test_empty_batch_is_noop() {
    let catalog = catalog();
    let mut units = Units::new();
    let ids = spawn_movers(&mut units, &catalog, 3, 1.0);

    let mut dispatcher = Dispatcher::default();
    dispatcher.dispatch(&catalog, &mut units, &ids, TargetHit::ground(Vec3::ZERO));
    let before = dispatcher.ring_state();

    let report = dispatcher.dispatch(&catalog, &mut units, &[], TargetHit::ground(Vec3::ONE));

    assert!(report.is_empty());
    assert_eq!(dispatcher.ring_state(), before);
}

#[test]
fn test_new_batch_resets_accumulator() {
    let catalog = catalog();
    let mut units = Units::new();
    let ids = spawn_movers(&mut units, &catalog, 5, 1.0);
    let target = Vec3::new(-3.0, 0.0, 8.0);

    let mut dispatcher = Dispatcher::default();
    dispatcher.dispatch(&catalog, &mut units, &ids, TargetHit::ground(Vec3::ZERO));
    let report = dispatcher.dispatch(&catalog, &mut units, &ids[2..], TargetHit::ground(target));

    assert_close(report.destination_of(ids[2]).unwrap(), target);
}

#[test]
fn test_non_positive_radius_never_yields_empty_ring() {
    let catalog = catalog();
    for radius in [0.0, -1.0, f32::NAN] {
        let mut units = Units::new();
        let ids = spawn_movers(&mut units, &catalog, 4, radius);
        let target = Vec3::new(1.0, 0.0, 1.0);

        let mut dispatcher = Dispatcher::default();
        let report = dispatcher.dispatch(&catalog, &mut units, &ids, TargetHit::ground(target));

        let state = dispatcher.ring_state();
        assert!(state.max_per_ring >= 1);
        assert!(state.ring_radius.is_finite());
        assert_eq!(report.issued.len(), 4);
        for &id in &ids {
            assert_close(report.destination_of(id).unwrap(), target);
        }
    }
}

#[test]
fn test_random_batches_never_share_destinations() {
    let catalog = catalog();
    let mut rng = fastrand::Rng::with_seed(7);

    for _ in 0..20 {
        let count = rng.usize(1..120);
        let radius = 0.25 + rng.f32() * 1.5;
        let mut units = Units::new();
        let ids = spawn_movers(&mut units, &catalog, count, radius);

        let mut dispatcher = Dispatcher::default();
        let report = dispatcher.dispatch(&catalog, &mut units, &ids, TargetHit::ground(Vec3::ZERO));

        let destinations: Vec<Vec3> = ids.iter().map(|&id| report.destination_of(id).unwrap()).collect();
        for i in 0..destinations.len() {
            for j in (i + 1)..destinations.len() {
                let gap = destinations[i].distance(destinations[j]);
                assert!(gap > radius, "units {} and {} only {} apart (r = {})", i, j, gap, radius);
            }
        }
    }
}

#[test]
fn test_units_without_applicable_command_are_skipped() {
    let catalog = catalog();
    let mut units = Units::new();
    let hut_type = catalog.unit_type_by_name("supply_hut").unwrap();
    let hut = units.spawn(hut_type, Vec3::ZERO, 5);
    let movers = spawn_movers(&mut units, &catalog, 2, 1.0);
    let missing = EntityId(999);
    let target = Vec3::new(2.0, 0.0, 2.0);

    let batch = [hut, missing, movers[0], movers[1]];
    let mut dispatcher = Dispatcher::default();
    let report = dispatcher.dispatch(&catalog, &mut units, &batch, TargetHit::ground(target));

    assert_eq!(report.skipped, vec![hut, missing]);
    // Skipped entities do not take a ring slot.
    assert_close(report.destination_of(movers[0]).unwrap(), target);
    assert_close(report.destination_of(movers[1]).unwrap(), target + Vec3::new(3.5, 0.0, 0.0));
}

#[test]
fn test_lowest_slot_command_wins() {
    let catalog = catalog();
    let mut units = Units::new();
    let move_cmd = move_id(&catalog);
    let build_cmd = catalog.command_by_name("build_worker").unwrap().id;

    // Listed build-first, but move has the lower slot.
    let hybrid = units.spawn_with(|id| Commandable {
        id,
        unit_type: UnitTypeId(0),
        position: Vec3::ZERO,
        health: 1,
        steering_radius: 1.0,
        commands: CommandList::from_slice(&[build_cmd, move_cmd]),
        nav: Some(NavAgent::new(1.0)),
        production: Some(BuildQueue::new(5)),
    });

    let mut dispatcher = Dispatcher::default();
    for _ in 0..3 {
        let report = dispatcher.dispatch(&catalog, &mut units, &[hybrid], TargetHit::ground(Vec3::X));
        assert_eq!(report.issued[0].command, move_cmd);
    }
    assert!(units.get(hybrid).unwrap().production.as_ref().unwrap().is_empty());
}

#[test]
fn test_slot_ties_fall_back_to_registration_order() {
    let catalog = CommandCatalog::from_ron(
        r#"(
            commands: [
                (name: "walk", slot: 0, kind: Move),
                (name: "run", slot: 0, kind: Move),
            ],
            units: [
                (name: "scout", steering_radius: 0.5, move_speed: Some(3.0), commands: ["run", "walk"]),
            ],
        )"#,
    )
    .unwrap();
    let scout_type = catalog.unit_type_by_name("scout").unwrap();
    let run = catalog.command_by_name("run").unwrap().id;

    let mut units = Units::new();
    let scout = units.spawn(scout_type, Vec3::ZERO, 5);

    let mut dispatcher = Dispatcher::default();
    let report = dispatcher.dispatch(&catalog, &mut units, &[scout], TargetHit::ground(Vec3::ONE));
    assert_eq!(report.issued[0].command, run);
}

#[test]
fn test_can_handle_is_pure() {
    let catalog = catalog();
    let mut units = Units::new();
    let base = spawn_base(&mut units, &catalog);
    let mover = spawn_mover(&mut units, &catalog, 1.0);
    let hit = TargetHit::ground(Vec3::new(5.0, 0.0, 5.0));

    for command in catalog.commands() {
        for id in [base, mover] {
            let commandable = units.get_mut(id).unwrap();
            let ctx = CommandContext::new(commandable, hit, 0);
            let first = command.can_handle(&ctx);
            let second = command.can_handle(&ctx);
            assert_eq!(first, second);
        }
    }

    let base_queue = units.get(base).unwrap().production.as_ref().unwrap();
    assert!(base_queue.is_empty());
    assert!(units.get(mover).unwrap().nav.as_ref().unwrap().destination().is_none());
}

#[test]
fn test_building_queues_until_full() {
    let catalog = catalog();
    let mut units = Units::new();
    let base = spawn_base(&mut units, &catalog);
    let build_worker = catalog.command_by_name("build_worker").unwrap();
    let CommandKind::BuildUnit { unit: worker, .. } = build_worker.kind else {
        panic!("build_worker should build a unit");
    };

    let mut dispatcher = Dispatcher::default();
    for expected_len in 1..=5 {
        let report = dispatcher.dispatch(&catalog, &mut units, &[base], TargetHit::ground(Vec3::ZERO));
        assert_eq!(report.issued[0].command, build_worker.id);
        assert_eq!(
            report.issued[0].outcome,
            CommandOutcome::Queued { unit: worker, queue_len: expected_len }
        );
    }

    let report = dispatcher.dispatch(&catalog, &mut units, &[base], TargetHit::ground(Vec3::ZERO));
    assert_eq!(
        report.issued[0].outcome,
        CommandOutcome::Rejected(EnqueueError::QueueFull { capacity: 5 })
    );
    assert_eq!(units.get(base).unwrap().production.as_ref().unwrap().len(), 5);
}

#[test]
fn test_build_dispatch_does_not_touch_ring_state() {
    let catalog = catalog();
    let mut units = Units::new();
    let base = spawn_base(&mut units, &catalog);

    let mut dispatcher = Dispatcher::default();
    dispatcher.dispatch(&catalog, &mut units, &[base], TargetHit::ground(Vec3::ZERO));
    assert_eq!(dispatcher.ring_state(), RingState::default());
}

#[test]
fn test_dispatch_command_applies_only_where_possible() {
    let catalog = catalog();
    let mut units = Units::new();
    let base = spawn_base(&mut units, &catalog);
    let movers = spawn_movers(&mut units, &catalog, 2, 1.0);
    let target = Vec3::new(0.0, 0.0, 6.0);

    let mut dispatcher = Dispatcher::default();
    let report = dispatcher.dispatch_command(
        &catalog,
        &mut units,
        move_id(&catalog),
        &[base, movers[0], movers[1]],
        TargetHit::ground(target),
    );

    assert_eq!(report.skipped, vec![base]);
    assert_close(report.destination_of(movers[0]).unwrap(), target);
    assert_close(report.destination_of(movers[1]).unwrap(), target + Vec3::new(3.5, 0.0, 0.0));
}

#[test]
fn test_dispatch_unknown_command_is_ignored() {
    let catalog = catalog();
    let mut units = Units::new();
    let movers = spawn_movers(&mut units, &catalog, 1, 1.0);

    let mut dispatcher = Dispatcher::default();
    let report = dispatcher.dispatch_command(
        &catalog,
        &mut units,
        CommandId(77),
        &movers,
        TargetHit::ground(Vec3::ZERO),
    );
    assert!(report.is_empty());
}

#[test]
fn test_custom_formation_spacing() {
    let catalog = catalog();
    let mut units = Units::new();
    let ids = spawn_movers(&mut units, &catalog, 2, 2.0);

    let mut dispatcher = Dispatcher::new(FormationConfig {
        layer_spacing_multiplier: 1.0,
        unit_spacing_multiplier: 1.0,
    });
    let report = dispatcher.dispatch(&catalog, &mut units, &ids, TargetHit::ground(Vec3::ZERO));

    assert_close(report.destination_of(ids[1]).unwrap(), Vec3::new(2.0, 0.0, 0.0));
    // floor(2π·2 / 2) = 6
    assert_eq!(dispatcher.ring_state().max_per_ring, 6);
}
