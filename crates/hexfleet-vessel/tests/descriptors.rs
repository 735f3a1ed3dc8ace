//! Descriptor loading: the standard catalogue builds complete vessels,
//! and class descriptors survive a JSON round trip.

use hexfleet_hex::{Cube, HexCoord};
use hexfleet_test_utils::{cruiser_class, standard_library, standard_parts};
use hexfleet_vessel::{BehaviorRegistry, KindTag, PartDesc, PartState, VesselClassDesc};

#[test]
fn cruiser_instantiates_from_catalogue() {
    let lib = standard_library();
    assert_eq!(lib.len(), standard_parts().len());

    let mut v = lib.instantiate(&cruiser_class("NX-01")).unwrap();
    assert_eq!(v.len(), 7);
    assert_eq!(v.get(&Cube::ORIGIN).unwrap().name(), "Bridge");
    assert!(!v.is_ko());
    assert_eq!(v.parts_of_kind(KindTag::Defense).count(), 3);
    assert_eq!(v.energy_balance().produced, 6);

    v.install_all_behaviors(&BehaviorRegistry::with_builtins())
        .unwrap();
    assert!(v.parts().all(|p| p.state() == PartState::Online));
}

#[test]
fn class_json_round_trip() {
    let class = cruiser_class("NX-02");
    let json = serde_json::to_string(&class).unwrap();
    assert!(json.contains("\"hexHash\""));
    let back: VesselClassDesc = serde_json::from_str(&json).unwrap();
    assert_eq!(back, class);

    let vessel = standard_library().instantiate(&back).unwrap();
    let described = VesselClassDesc::from_vessel(&vessel);
    assert_eq!(described.cells, class.cells);
}

#[test]
fn legacy_part_fields_are_read() {
    let raw = r#"[
        {"name":"Bridge","type":"command","value":3,"behaviors":[]},
        {"name":"Disruptor","type":"defense","value":3,"purpose":"ATK"}
    ]"#;
    let parts: Vec<PartDesc> = serde_json::from_str(raw).unwrap();
    assert_eq!(parts[1].purpose.map(|p| p.is_offensive()), Some(true));
    assert_eq!(parts[0].kind, KindTag::Command);
}

#[test]
fn diag_and_grid_hashes_place_cells() {
    let lib = standard_library();
    let class: VesselClassDesc = serde_json::from_str(
        r#"{"designation":"BW5","class":"Warbird","faction":"romulans",
            "cells":[{"coord":"g0$0","name":"Bridge"},{"coord":"d1$0","name":"Phaser"}]}"#,
    )
    .unwrap();
    let v = lib.instantiate(&class).unwrap();
    assert_eq!(v.get(&hexfleet_hex::Grid::new(0, 0)).unwrap().name(), "Bridge");
    let phaser = v.get(&hexfleet_hex::Diag::new(0, 1)).unwrap();
    assert_eq!(phaser.position().hash(), "c1$-1$0");
}
