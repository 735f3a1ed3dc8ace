//! Behavior cascades through the reentrant pipeline: destruction damage
//! spreading to neighbours, energy release, and weapon wear.

use hexfleet_hex::Cube;
use hexfleet_test_utils::{core, hull, id_at, TransitionLog, VesselBuilder};
use hexfleet_vessel::part::{AFTER_STATE_CHANGE, BEFORE_DAMAGE};
use hexfleet_vessel::{BehaviorRegistry, PartKind, PartSpec, PartState, Purpose, Vessel};

fn nacelle() -> PartSpec {
    PartSpec::new("Nacelle", PartKind::Engineering, 1)
        .with_behaviors(["on-destroy-damage-neighbors"])
}

fn state(v: &Vessel, at: Cube) -> (i32, PartState) {
    let p = v.get(&at).unwrap();
    (p.current_value(), p.state())
}

#[test]
fn destruction_damages_neighbours_once() {
    let a = Cube::from_xz(0, 0);
    let b = Cube::from_xz(1, 0);
    let c = Cube::from_xz(2, 0);
    let mut v = VesselBuilder::new("Chain")
        .part(a, nacelle())
        .part(b, nacelle())
        .part(c, nacelle())
        .build();
    v.install_all_behaviors(&BehaviorRegistry::with_builtins())
        .unwrap();

    v.damage(id_at(&v, a), 2).unwrap();
    assert_eq!(state(&v, a), (0, PartState::Destroyed));
    assert_eq!(state(&v, b), (0, PartState::Offline));
    assert_eq!(state(&v, c), (1, PartState::Online));

    v.damage(id_at(&v, b), 1).unwrap();
    assert_eq!(state(&v, b), (0, PartState::Destroyed));
    assert_eq!(state(&v, c), (0, PartState::Offline));
    assert_eq!(state(&v, a), (0, PartState::Destroyed));
}

#[test]
fn mutual_destruction_terminates() {
    let a = Cube::from_xz(0, 0);
    let b = Cube::from_xz(0, 1);
    let mut v = VesselBuilder::new("Pair")
        .part(a, nacelle())
        .part(b, nacelle())
        .build();
    v.install_all_behaviors(&BehaviorRegistry::with_builtins())
        .unwrap();
    let log = TransitionLog::new();
    let ib = id_at(&v, b);
    log.watch(&mut v, ib, &[AFTER_STATE_CHANGE]);

    v.damage(id_at(&v, b), 1).unwrap();
    v.damage(id_at(&v, a), 5).unwrap();

    assert_eq!(state(&v, a), (0, PartState::Destroyed));
    assert_eq!(state(&v, b), (0, PartState::Destroyed));
    let states: Vec<_> = log.entries().iter().map(|r| r.transition.new_state).collect();
    assert_eq!(states, vec![PartState::Offline, PartState::Destroyed]);
}

#[test]
fn depleted_core_pulses_at_most_three_times() {
    let center = Cube::ORIGIN;
    let ring: Vec<Cube> = hexfleet_hex::neighbors(&center).to_vec();
    let mut builder = VesselBuilder::new("Reactor")
        .part(center, core(2, 9, 0).with_behaviors(["energy-depleted"]));
    for &cell in &ring {
        builder = builder.part(cell, hull(1));
    }
    let mut v = builder.build();
    v.install_all_behaviors(&BehaviorRegistry::with_builtins())
        .unwrap();

    v.damage(id_at(&v, center), 2).unwrap();

    let knocked = ring
        .iter()
        .filter(|&&c| state(&v, c) == (0, PartState::Offline))
        .count();
    assert_eq!(knocked, 3);
}

#[test]
fn weapons_wear_when_fired() {
    let torpedo = PartSpec::new("Torpedo bay", PartKind::defense(Purpose::Both), 4)
        .with_behaviors(["dammage-after-fire"]);
    let mut v = VesselBuilder::new("Gunboat").part(Cube::ORIGIN, torpedo).build();
    v.install_all_behaviors(&BehaviorRegistry::with_builtins())
        .unwrap();
    let gun = id_at(&v, Cube::ORIGIN);

    assert_eq!(v.fire(gun, true).unwrap(), 4);
    assert_eq!(state(&v, Cube::ORIGIN), (4, PartState::Online));
    assert_eq!(v.fire(gun, false).unwrap(), 4);
    assert_eq!(state(&v, Cube::ORIGIN), (0, PartState::Offline));
}

#[test]
fn install_is_idempotent_and_skips_unknown_names() {
    let plating = PartSpec::new("Hull plating", PartKind::Engineering, 3)
        .with_behaviors(["ignore-1-damage", "warp-bubble"]);
    let mut v = VesselBuilder::new("Armored")
        .part(Cube::ORIGIN, plating)
        .part(Cube::from_xz(1, 0), hull(4))
        .build();
    let registry = BehaviorRegistry::with_builtins();
    v.install_all_behaviors(&registry).unwrap();
    v.install_all_behaviors(&registry).unwrap();
    assert!(v.behaviors_installed());

    let neighbour = v.get(&Cube::from_xz(1, 0)).unwrap();
    assert_eq!(neighbour.listener_count(BEFORE_DAMAGE), 1);

    let id = neighbour.id();
    v.damage(id, 2).unwrap();
    assert_eq!(state(&v, Cube::from_xz(1, 0)), (3, PartState::Damaged));
}

#[test]
fn pulses_from_a_drained_absorber_are_not_lost() {
    let reactor =
        core(2, 3, 0).with_behaviors(["absorb-direct-neighbors-damage", "energy-depleted"]);
    let target = Cube::from_xz(1, 0);
    let mut v = VesselBuilder::new("Shielded")
        .part(Cube::ORIGIN, reactor)
        .part(target, hull(10))
        .build();
    v.install_all_behaviors(&BehaviorRegistry::with_builtins())
        .unwrap();

    let t = v.damage(id_at(&v, target), 5).unwrap().unwrap();

    assert_eq!(state(&v, Cube::ORIGIN), (0, PartState::Offline));
    assert_eq!(state(&v, target), (4, PartState::Damaged));
    assert_eq!((t.old_value, t.new_value), (7, 4));
}
