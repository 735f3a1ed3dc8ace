//! The three coordinate representations and their hash strings.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::HexError;

/// Common view over every coordinate representation.
pub trait HexCoord {
    /// Cube form.
    fn cube(&self) -> Cube;

    /// Axial form.
    fn diag(&self) -> Diag {
        self.cube().diag()
    }

    /// Odd-q offset form.
    fn grid(&self) -> Grid {
        self.cube().grid()
    }

    /// Canonical string identity of this representation.
    fn hash(&self) -> String;
}

/// Largest absolute component a parsed hash may carry. Conversions and
/// ring walks around such a cell stay within `i32`.
pub const COORD_LIMIT: i32 = 1 << 28;

// ── Cube ────────────────────────────────────────────────────────

/// Cube coordinate. Always satisfies `x + y + z = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cube {
    x: i32,
    y: i32,
    z: i32,
}

impl Cube {
    /// The origin.
    pub const ORIGIN: Cube = Cube { x: 0, y: 0, z: 0 };

    /// Build from all three components.
    ///
    /// Returns [`HexError::OffPlane`] unless `x + y + z == 0`.
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self, HexError> {
        if i64::from(x) + i64::from(y) + i64::from(z) != 0 {
            return Err(HexError::OffPlane { x, y, z });
        }
        Ok(Self { x, y, z })
    }

    /// Unchecked constructor for constant tables that are on-plane by
    /// inspection.
    pub(crate) const fn unit(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Build from `x` and `z`; `y` is derived.
    pub fn from_xz(x: i32, z: i32) -> Self {
        Self { x, y: -x - z, z }
    }

    /// Cube x.
    pub fn x(self) -> i32 {
        self.x
    }

    /// Cube y.
    pub fn y(self) -> i32 {
        self.y
    }

    /// Cube z.
    pub fn z(self) -> i32 {
        self.z
    }

    /// Multiply every component by `k`.
    pub fn scale(self, k: i32) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
            z: self.z * k,
        }
    }

    /// Axial form: `r = z`, `q = x`.
    pub fn diag(self) -> Diag {
        Diag {
            r: self.z,
            q: self.x,
        }
    }

    /// Odd-q offset form.
    pub fn grid(self) -> Grid {
        Grid {
            x: self.z + (self.x + (self.x & 1)) / 2,
            y: self.x,
        }
    }
}

impl HexCoord for Cube {
    fn cube(&self) -> Cube {
        *self
    }

    fn hash(&self) -> String {
        format!("c{}${}${}", self.x, self.y, self.z)
    }
}

impl Add for Cube {
    type Output = Cube;

    fn add(self, rhs: Cube) -> Cube {
        Cube {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Cube {
    type Output = Cube;

    fn sub(self, rhs: Cube) -> Cube {
        Cube {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash())
    }
}

// ── Diag ────────────────────────────────────────────────────────

/// Axial coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Diag {
    /// Row axis.
    pub r: i32,
    /// Column axis.
    pub q: i32,
}

impl Diag {
    /// Build an axial coordinate.
    pub fn new(r: i32, q: i32) -> Self {
        Self { r, q }
    }
}

impl HexCoord for Diag {
    fn cube(&self) -> Cube {
        Cube::from_xz(self.q, self.r)
    }

    fn diag(&self) -> Diag {
        *self
    }

    fn hash(&self) -> String {
        format!("d{}${}", self.q, self.r)
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash())
    }
}

// ── Grid ────────────────────────────────────────────────────────

/// Odd-q offset coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Grid {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Grid {
    /// Build an offset coordinate.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl HexCoord for Grid {
    fn cube(&self) -> Cube {
        let z = self.x - (self.y + (self.y & 1)) / 2;
        Cube::from_xz(self.y, z)
    }

    fn grid(&self) -> Grid {
        *self
    }

    fn hash(&self) -> String {
        format!("g{}${}", self.x, self.y)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash())
    }
}

// ── Parsed hashes ───────────────────────────────────────────────

/// A position in whichever representation its hash used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HexPos {
    /// Parsed from `c{x}${y}${z}`.
    Cube(Cube),
    /// Parsed from `d{q}${r}`.
    Diag(Diag),
    /// Parsed from `g{x}${y}`.
    Grid(Grid),
}

impl HexCoord for HexPos {
    fn cube(&self) -> Cube {
        match self {
            Self::Cube(c) => *c,
            Self::Diag(d) => d.cube(),
            Self::Grid(g) => g.cube(),
        }
    }

    fn hash(&self) -> String {
        match self {
            Self::Cube(c) => c.hash(),
            Self::Diag(d) => d.hash(),
            Self::Grid(g) => g.hash(),
        }
    }
}

impl From<Cube> for HexPos {
    fn from(c: Cube) -> Self {
        Self::Cube(c)
    }
}

impl FromStr for HexPos {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, HexError> {
        parse_hash(s)
    }
}

/// Parse a hash string in any of the three forms.
///
/// Components beyond [`COORD_LIMIT`] are rejected.
pub fn parse_hash(input: &str) -> Result<HexPos, HexError> {
    let invalid = |reason: &str| HexError::InvalidHash {
        input: input.to_string(),
        reason: reason.to_string(),
    };
    let mut chars = input.chars();
    let tag = chars.next().ok_or_else(|| invalid("empty"))?;
    let parts = chars
        .as_str()
        .split('$')
        .map(|p| p.parse::<i32>().map_err(|e| invalid(&e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    if parts.iter().any(|p| p.unsigned_abs() > COORD_LIMIT.unsigned_abs()) {
        return Err(invalid("component out of range"));
    }

    match (tag, parts.as_slice()) {
        ('c', &[x, y, z]) => Cube::new(x, y, z)
            .map(HexPos::Cube)
            .map_err(|e| invalid(&e.to_string())),
        ('d', &[q, r]) => Ok(HexPos::Diag(Diag::new(r, q))),
        ('g', &[x, y]) => Ok(HexPos::Grid(Grid::new(x, y))),
        ('c', _) => Err(invalid("cube hash needs 3 components")),
        ('d' | 'g', _) => Err(invalid("hash needs 2 components")),
        _ => Err(invalid("unknown prefix, expected one of c, d, g")),
    }
}
