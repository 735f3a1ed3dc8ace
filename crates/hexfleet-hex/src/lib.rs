//! Hexagonal coordinate system for hexfleet.
//!
//! One logical hex position has three lossless representations:
//!
//! - [`Cube`] `(x, y, z)` with `x + y + z = 0`, the canonical form used
//!   for arithmetic and as map key,
//! - [`Diag`] axial `(r, q)`,
//! - [`Grid`] odd-q offset `(x, y)`, used for bounding boxes.
//!
//! Each one renders a canonical hash string (`c{x}${y}${z}`, `d{q}${r}`,
//! `g{x}${y}`) that [`parse_hash`] reads back.
//!
//! [`propagate`] walks concentric rings around a center and is the basis
//! for every radius-limited cascade in the damage model.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod calc;
pub mod coord;
pub mod error;
pub mod propagate;

pub use calc::{disk, distance, neighbors, ring, DIRECTIONS};
pub use coord::{parse_hash, Cube, Diag, Grid, HexCoord, HexPos, COORD_LIMIT};
pub use error::HexError;
pub use propagate::{propagate, Walk, WalkEnd, WalkMode, MAX_RADIUS};
