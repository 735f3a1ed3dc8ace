//! Event ordering and vetoes of the part transition pipeline.

use hexfleet_core::Flow;
use hexfleet_hex::Cube;
use hexfleet_test_utils::{hull, id_at, TransitionLog, VesselBuilder};
use hexfleet_vessel::part::{
    AFTER_DAMAGE, AFTER_REPAIR, AFTER_STATE_CHANGE, BEFORE_DAMAGE, BEFORE_REPAIR,
    BEFORE_STATE_CHANGE, PART_EVENTS,
};
use hexfleet_vessel::{PartState, Vessel};

fn single(max: i32) -> (Vessel, hexfleet_core::PartId, TransitionLog) {
    let mut v = VesselBuilder::new("Target").part(Cube::ORIGIN, hull(max)).build();
    let id = id_at(&v, Cube::ORIGIN);
    let log = TransitionLog::new();
    log.watch(&mut v, id, &PART_EVENTS);
    (v, id, log)
}

#[test]
fn value_and_state_events_in_order() {
    let (mut v, id, log) = single(5);
    v.damage(id, 5).unwrap();
    assert_eq!(
        log.names(),
        vec![BEFORE_DAMAGE, BEFORE_STATE_CHANGE, AFTER_STATE_CHANGE, AFTER_DAMAGE]
    );
    let after = log.entries()[3].transition;
    assert_eq!((after.old_value, after.new_value), (5, 0));
    assert_eq!(after.new_state, PartState::Offline);
}

#[test]
fn same_state_skips_state_events() {
    let (mut v, id, log) = single(5);
    v.damage(id, 1).unwrap();
    log.clear();
    v.damage(id, 1).unwrap();
    assert_eq!(log.names(), vec![BEFORE_DAMAGE, AFTER_DAMAGE]);
}

#[test]
fn repair_back_to_full_goes_online() {
    let (mut v, id, log) = single(4);
    v.damage(id, 4).unwrap();
    log.clear();
    let t = v.repair(id, 9).unwrap().unwrap();
    assert_eq!((t.new_value, t.new_state), (4, PartState::Online));
    assert_eq!(
        log.names(),
        vec![BEFORE_REPAIR, BEFORE_STATE_CHANGE, AFTER_STATE_CHANGE, AFTER_REPAIR]
    );
}

#[test]
fn state_veto_keeps_value_change() {
    let mut v = VesselBuilder::new("Stubborn").part(Cube::ORIGIN, hull(3)).build();
    let id = id_at(&v, Cube::ORIGIN);
    v.on(id, BEFORE_STATE_CHANGE, |_, _| Ok(Flow::Stop)).unwrap();
    let log = TransitionLog::new();
    log.watch(&mut v, id, &[AFTER_STATE_CHANGE, AFTER_DAMAGE]);

    let t = v.damage(id, 3).unwrap().unwrap();

    assert_eq!((t.new_value, t.new_state), (0, PartState::Online));
    assert_eq!(log.names(), vec![AFTER_DAMAGE]);
}

#[test]
fn value_veto_blocks_everything() {
    let mut v = VesselBuilder::new("Immune").part(Cube::ORIGIN, hull(3)).build();
    let id = id_at(&v, Cube::ORIGIN);
    v.on(id, BEFORE_DAMAGE, |_, _| Ok(Flow::Stop)).unwrap();
    let log = TransitionLog::new();
    log.watch(&mut v, id, &[BEFORE_STATE_CHANGE, AFTER_STATE_CHANGE, AFTER_DAMAGE]);

    assert_eq!(v.damage(id, 2).unwrap(), None);
    assert!(log.entries().is_empty());
    assert_eq!(v.part(id).unwrap().current_value(), 3);
}

#[test]
fn listener_may_override_state() {
    let mut v = VesselBuilder::new("Fragile").part(Cube::ORIGIN, hull(3)).build();
    let id = id_at(&v, Cube::ORIGIN);
    v.on(id, BEFORE_DAMAGE, |e, _| {
        e.data.new_state = PartState::Destroyed;
        Ok(Flow::Continue)
    })
    .unwrap();

    let t = v.damage(id, 1).unwrap().unwrap();
    assert_eq!((t.new_value, t.new_state), (2, PartState::Destroyed));
}
