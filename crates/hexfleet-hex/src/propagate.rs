//! Ring-by-ring traversal around a center cell.

use tracing::trace;

use crate::calc::ring;
use crate::coord::{Cube, HexCoord};

/// Largest ring radius a walk will visit.
pub const MAX_RADIUS: u32 = 20;

/// Visitor verdict for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    /// Continue with the next cell.
    Next,
    /// Leave the current ring and start the next one.
    Up,
    /// End the walk.
    Stop,
}

/// How a walk behaves once every cell of a ring was visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WalkMode {
    /// Move on to the next ring.
    #[default]
    Auto,
    /// End the walk; only [`Walk::Up`] advances.
    Manual,
}

/// How a walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkEnd {
    /// The visitor returned [`Walk::Stop`] while on ring `radius`.
    Stopped {
        /// Ring being visited.
        radius: u32,
    },
    /// A [`WalkMode::Manual`] walk ran out of cells on ring `radius`.
    Exhausted {
        /// Ring that ran out.
        radius: u32,
    },
    /// Ring [`MAX_RADIUS`] was finished without a stop.
    Truncated,
}

/// Walk the rings around `center`, from radius 1 outwards.
///
/// `visit` receives the cell, the whole ring it belongs to and the cell's
/// index in that ring. The walk never goes past [`MAX_RADIUS`]; hitting
/// that cap is reported as [`WalkEnd::Truncated`], not as an error.
pub fn propagate<F>(center: &impl HexCoord, mode: WalkMode, mut visit: F) -> WalkEnd
where
    F: FnMut(Cube, &[Cube], usize) -> Walk,
{
    let center = center.cube();
    for radius in 1..=MAX_RADIUS {
        let cells = ring(&center, radius);
        let mut advanced = false;
        for (i, &cell) in cells.iter().enumerate() {
            match visit(cell, &cells, i) {
                Walk::Next => {}
                Walk::Up => {
                    advanced = true;
                    break;
                }
                Walk::Stop => return WalkEnd::Stopped { radius },
            }
        }
        if !advanced && mode == WalkMode::Manual {
            return WalkEnd::Exhausted { radius };
        }
    }
    trace!(center = %center.hash(), "walk reached radius cap");
    WalkEnd::Truncated
}
