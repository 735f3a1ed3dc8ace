//! Adjacency, distance and ring enumeration.

use crate::coord::{Cube, HexCoord};

/// Unit steps to the six neighbours, as cube `(x, y, z)` deltas.
///
/// Consecutive entries are 60° apart, which is what [`ring`] relies on.
pub const DIRECTIONS: [Cube; 6] = [
    Cube::unit(0, 1, -1),
    Cube::unit(1, 0, -1),
    Cube::unit(1, -1, 0),
    Cube::unit(0, -1, 1),
    Cube::unit(-1, 0, 1),
    Cube::unit(-1, 1, 0),
];

/// The six cells adjacent to `pos`, in [`DIRECTIONS`] order.
pub fn neighbors(pos: &impl HexCoord) -> [Cube; 6] {
    let c = pos.cube();
    DIRECTIONS.map(|d| c + d)
}

/// Hex distance: the largest absolute cube component difference.
pub fn distance(a: &impl HexCoord, b: &impl HexCoord) -> u32 {
    let d = a.cube() - b.cube();
    d.x()
        .unsigned_abs()
        .max(d.y().unsigned_abs())
        .max(d.z().unsigned_abs())
}

/// Every cell at exactly `radius` from `center`.
///
/// Radius 0 yields the center alone; otherwise `6 * radius` cells in ring
/// walk order, starting `radius` steps along `DIRECTIONS[4]`.
pub fn ring(center: &impl HexCoord, radius: u32) -> Vec<Cube> {
    let center = center.cube();
    if radius == 0 {
        return vec![center];
    }
    let r = radius as i32;
    let mut out = Vec::with_capacity(6 * radius as usize);
    let mut cell = center + DIRECTIONS[4].scale(r);
    for dir in DIRECTIONS {
        for _ in 0..radius {
            out.push(cell);
            cell = cell + dir;
        }
    }
    out
}

/// Every cell within `radius` of `center`, ring by ring from the center.
pub fn disk(center: &impl HexCoord, radius: u32) -> Vec<Cube> {
    (0..=radius).flat_map(|r| ring(center, r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Grid;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn neighbor_order_matches_directions() {
        let n = neighbors(&Cube::ORIGIN);
        assert_eq!(n[0], Cube::new(0, 1, -1).unwrap());
        assert_eq!(n[5], Cube::new(-1, 1, 0).unwrap());
    }

    #[test]
    fn distance_mixes_representations() {
        let a = Grid::new(0, 0);
        let b = Cube::from_xz(2, -1);
        assert_eq!(distance(&a, &b), distance(&a.cube(), &b));
    }

    #[test]
    fn ring_sizes() {
        assert_eq!(ring(&Cube::ORIGIN, 0), vec![Cube::ORIGIN]);
        for r in 1..=5 {
            assert_eq!(ring(&Cube::ORIGIN, r).len(), 6 * r as usize);
        }
        assert_eq!(disk(&Cube::ORIGIN, 2).len(), 19);
    }

    #[test]
    fn ring_one_is_the_neighbourhood() {
        let c = Cube::from_xz(3, -7);
        let ring: HashSet<_> = ring(&c, 1).into_iter().collect();
        let near: HashSet<_> = neighbors(&c).into_iter().collect();
        assert_eq!(ring, near);
    }

    fn arb_cube() -> impl Strategy<Value = Cube> {
        (-200i32..200, -200i32..200).prop_map(|(x, z)| Cube::from_xz(x, z))
    }

    proptest! {
        #[test]
        fn distance_to_self_is_zero(p in arb_cube()) {
            prop_assert_eq!(distance(&p, &p), 0);
        }

        #[test]
        fn neighbors_are_adjacent(p in arb_cube()) {
            for n in neighbors(&p) {
                prop_assert_eq!(distance(&p, &n), 1);
                prop_assert_eq!(n.x() + n.y() + n.z(), 0);
            }
        }

        #[test]
        fn distance_is_a_metric(a in arb_cube(), b in arb_cube(), c in arb_cube()) {
            prop_assert_eq!(distance(&a, &b), distance(&b, &a));
            prop_assert!(distance(&a, &c) <= distance(&a, &b) + distance(&b, &c));
        }

        #[test]
        fn ring_cells_are_distinct_and_at_radius(p in arb_cube(), r in 1u32..8) {
            let cells = ring(&p, r);
            let unique: HashSet<_> = cells.iter().copied().collect();
            prop_assert_eq!(unique.len(), cells.len());
            for c in cells {
                prop_assert_eq!(distance(&p, &c), r);
            }
        }
    }
}
