//! End-to-end battles driven by scripted dice and executors.

use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;

use hexfleet_battle::{
    Attack, BattleConfig, BattleError, BattleManager, ConfigError, Hit, LifecycleEvent, MemberId,
    Outcome, RandomExecutor, Recruit, Roll, ScriptedDice, StopWhen, TargetRef, Team, WeaponRef,
    ATTACK,
};
use hexfleet_core::Flow;
use hexfleet_hex::Cube;
use hexfleet_test_utils::{
    crew, cruiser_class, id_at, minimal_warship, standard_library, IdleExecutor, ScriptedExecutor,
};
use hexfleet_vessel::{BehaviorRegistry, PartState, Vessel};

const BRIDGE: Cube = Cube::ORIGIN;

fn phaser_at() -> Cube {
    Cube::from_xz(1, 0)
}

fn manager() -> BattleManager {
    BattleManager::new(BattleConfig::default(), BehaviorRegistry::with_builtins()).unwrap()
}

/// A shoots B's bridge with its phaser every turn; B does nothing.
fn duel(b_escapes: bool) -> (BattleManager, Rc<RefCell<Vec<Hit>>>) {
    let a = minimal_warship("Enterprise");
    let b = minimal_warship("Reliant");
    let shot = Attack {
        attacker: crew(1, 10).tactical,
        source: WeaponRef {
            member: MemberId { team: 0, index: 0 },
            weapon: id_at(&a, phaser_at()),
        },
        target: TargetRef {
            member: MemberId { team: 1, index: 0 },
            part: id_at(&b, BRIDGE),
        },
    };
    let mut m = manager();
    m.create_and_add_team(
        "federation",
        [Recruit::new(a, crew(1, 10), ScriptedExecutor::new(false, vec![shot]))],
    );
    m.create_and_add_team(
        "khan",
        [Recruit::new(b, crew(2, 10), ScriptedExecutor::new(b_escapes, vec![]))],
    );

    let hits = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&hits);
    m.on(ATTACK, move |e, ack| {
        if let LifecycleEvent::Attack { damage, .. } = &e.data {
            seen.borrow_mut().push(damage.hit);
        }
        ack.consume();
        Ok(Flow::Continue)
    })
    .unwrap();
    (m, hits)
}

fn bridge_of(m: &BattleManager, team: &str) -> (i32, PartState) {
    let member = &m.team(team).unwrap().members()[0];
    let vessel = member.vessel();
    let bridge = vessel.get(&BRIDGE).unwrap();
    (bridge.current_value(), bridge.state())
}

#[test]
fn decided_battle_ends_before_first_turn() {
    let a = minimal_warship("Defiant");
    let mut b: Vessel = minimal_warship("Wreck");
    b.damage(id_at(&b, BRIDGE), 5).unwrap();

    let mut m = manager();
    m.create_and_add_team("a", [Recruit::new(a, crew(2, 10), IdleExecutor)]);
    m.create_and_add_team("b", [Recruit::new(b, crew(2, 10), IdleExecutor)]);

    let summary = block_on(m.run()).unwrap();
    assert_eq!(summary.turns, 0);
    assert_eq!(summary.result("a"), Some(Outcome::Victory));
    assert_eq!(summary.result("b"), Some(Outcome::Defeat));
    assert!(summary.teams[1].vessels[0].defeated);
}

#[test]
fn touches_until_the_bridge_falls() {
    let (m, hits) = duel(false);
    let m = m.with_dice(ScriptedDice::new([1]));

    let summary = block_on(m.run()).unwrap();

    assert_eq!(summary.turns, 2);
    assert_eq!(*hits.borrow(), vec![Hit::Touch(2), Hit::Touch(2)]);
    assert_eq!(bridge_of(&m, "khan"), (0, PartState::Destroyed));
    assert_eq!(summary.result("federation"), Some(Outcome::Victory));
    assert_eq!(summary.result("khan"), Some(Outcome::Defeat));
}

#[test]
fn failed_rolls_miss() {
    let (m, hits) = duel(false);
    let m = m.with_dice(ScriptedDice::new([20]));

    let summary = block_on(m.run_until(&StopWhen(|turn: u32, _: &[Team]| turn >= 3))).unwrap();

    assert_eq!(summary.turns, 3);
    assert_eq!(*hits.borrow(), vec![Hit::Missed; 3]);
    assert_eq!(bridge_of(&m, "khan"), (3, PartState::Online));
}

#[test]
fn maneuver_beats_weaker_roll() {
    // Every die shows 1: the attacker scores 2, the dodging pilot 4.
    let (m, hits) = duel(true);
    let m = m.with_dice(ScriptedDice::new([1]));

    let summary = block_on(m.run_until(&StopWhen(|turn: u32, _: &[Team]| turn >= 2))).unwrap();

    assert_eq!(summary.turns, 2);
    assert_eq!(*hits.borrow(), vec![Hit::Avoid; 2]);
    assert_eq!(bridge_of(&m, "khan"), (3, PartState::Online));
}

#[test]
fn unnamed_vessels_get_hull_names() {
    let lib = standard_library();
    let mut m = manager();
    let fleet = ["NX-01", "NX-02"].map(|d| {
        Recruit::new(lib.instantiate(&cruiser_class(d)).unwrap(), crew(2, 10), IdleExecutor)
    });
    m.create_and_add_team("starfleet", fleet);

    let names: Vec<String> = m
        .team("starfleet")
        .unwrap()
        .members()
        .iter()
        .map(|mb| mb.vessel().name().to_string())
        .collect();
    assert_eq!(names, vec!["Cruiser-NX-01#0", "Cruiser-NX-02#1"]);
}

#[test]
fn unknown_roster_slot_aborts() {
    let a = minimal_warship("Lost");
    let stray = Attack {
        attacker: crew(1, 10).tactical,
        source: WeaponRef {
            member: MemberId { team: 0, index: 0 },
            weapon: id_at(&a, phaser_at()),
        },
        target: TargetRef {
            member: MemberId { team: 5, index: 0 },
            part: id_at(&a, BRIDGE),
        },
    };
    let mut m = manager();
    let rogue = ScriptedExecutor::new(false, vec![stray]);
    m.create_and_add_team("a", [Recruit::new(a, crew(1, 10), rogue)]);
    let idle = Recruit::new(minimal_warship("B"), crew(1, 10), IdleExecutor);
    m.create_and_add_team("b", [idle]);

    let err = block_on(m.run()).unwrap_err();
    assert_eq!(
        err,
        BattleError::UnknownMember {
            member: MemberId { team: 5, index: 0 }
        }
    );
}

#[test]
fn zero_turn_cap_is_rejected() {
    let config = BattleConfig {
        max_turns: Some(0),
        ..BattleConfig::default()
    };
    let err = BattleManager::new(config, BehaviorRegistry::with_builtins()).unwrap_err();
    assert_eq!(err, BattleError::Config(ConfigError::ZeroTurnCap));
}

#[test]
fn default_roll_uses_the_configured_spec() {
    let config = BattleConfig {
        default_roll: Roll::new(3, 10),
        ..BattleConfig::default()
    };
    let m = BattleManager::new(config, BehaviorRegistry::with_builtins())
        .unwrap()
        .with_dice(ScriptedDice::new([1, 20, 15]));
    assert_eq!(m.roll_default(), 0);
    let m = manager().with_dice(ScriptedDice::new([1, 5]));
    assert_eq!(m.roll_default(), 3);
}

fn idle_pair(max_turns: Option<u32>) -> BattleManager {
    let config = BattleConfig {
        max_turns,
        ..BattleConfig::default()
    };
    let mut m = BattleManager::new(config, BehaviorRegistry::with_builtins()).unwrap();
    for (team, name) in [("red", "Ares"), ("blue", "Nike")] {
        m.create_and_add_team(
            team,
            [Recruit::new(minimal_warship(name), crew(2, 10), IdleExecutor)],
        );
    }
    m
}

#[test]
fn turn_cap_also_bounds_custom_stop_conditions() {
    let stop = StopWhen(|turn: u32, _: &[Team]| turn >= 10);

    let capped = block_on(idle_pair(Some(3)).run_until(&stop)).unwrap();
    assert_eq!(capped.turns, 3);

    let uncapped = block_on(idle_pair(None).run_until(&stop)).unwrap();
    assert_eq!(uncapped.turns, 10);
    assert_eq!(uncapped.result("red"), Some(Outcome::Victory));
}

fn random_battle(seed: u64) -> BattleManager {
    let lib = standard_library();
    let config = BattleConfig {
        seed,
        max_turns: Some(60),
        ..BattleConfig::default()
    };
    let mut m = BattleManager::new(config, BehaviorRegistry::with_builtins()).unwrap();
    for (i, (team, designation)) in [("red", "R-1"), ("blue", "B-1")].into_iter().enumerate() {
        let vessel = lib.instantiate(&cruiser_class(designation)).unwrap();
        let executor = RandomExecutor::new(seed + i as u64);
        m.create_and_add_team(team, [Recruit::new(vessel, crew(2, 12), executor)]);
    }
    m
}

#[test]
fn seeded_random_battles_replay() {
    let first = block_on(random_battle(11).run()).unwrap();
    let second = block_on(random_battle(11).run()).unwrap();
    assert_eq!(first, second);
    assert!(first.turns <= 60);
}

#[test]
fn repaired_fleet_fights_again() {
    let m = random_battle(3);
    let first = block_on(m.run()).unwrap();
    m.repair_all();
    for team in m.teams() {
        assert!(!team.is_ko());
    }
    let second = block_on(m.run()).unwrap();
    assert!(first.turns <= 60 && second.turns <= 60);
}
