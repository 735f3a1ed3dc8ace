//! Serde descriptor shapes and the part library.
//!
//! Descriptors are what storage hands over: part blueprints keyed by name
//! and vessel classes listing `(hexHash, partName)` cells. Field names
//! are camelCase; the older `type` / `value` / `coord` / `name` spellings
//! are accepted as aliases.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use hexfleet_hex::{parse_hash, HexCoord};

use crate::error::VesselError;
use crate::part::{KindTag, PartKind, PartSpec, Purpose};
use crate::vessel::{Vessel, VesselInfo};

/// Stored description of a part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDesc {
    /// Unique part name.
    pub name: String,
    /// Kind tag.
    #[serde(alias = "type")]
    pub kind: KindTag,
    /// Capacity.
    #[serde(alias = "value")]
    pub max_value: i32,
    /// Behavior names.
    #[serde(default)]
    pub behaviors: Vec<String>,
    /// Energy produced, energy parts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<i32>,
    /// Storage capacity, energy parts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    /// Purpose, defense parts only. Defaults to `DEF`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<Purpose>,
}

impl PartDesc {
    /// Build the runtime blueprint.
    pub fn to_spec(&self) -> Result<PartSpec, VesselError> {
        if self.name.trim().is_empty() {
            return Err(VesselError::InvalidDescriptor {
                reason: "part name is empty".to_string(),
            });
        }
        if self.max_value < 0 {
            return Err(VesselError::InvalidDescriptor {
                reason: format!("part '{}' has negative capacity {}", self.name, self.max_value),
            });
        }
        let kind = match self.kind {
            KindTag::Energy => PartKind::energy(self.energy.unwrap_or(0), self.stock.unwrap_or(0)),
            KindTag::Defense => PartKind::defense(self.purpose.unwrap_or_default()),
            KindTag::Command => PartKind::Command,
            KindTag::Science => PartKind::Science,
            KindTag::Life => PartKind::Life,
            KindTag::Engineering => PartKind::Engineering,
        };
        Ok(PartSpec::new(self.name.clone(), kind, self.max_value)
            .with_behaviors(self.behaviors.iter().cloned()))
    }
}

/// One cell of a vessel class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDesc {
    /// Position hash in any of the three forms.
    #[serde(alias = "coord")]
    pub hex_hash: String,
    /// Name of the part placed there.
    #[serde(alias = "name")]
    pub part_name: String,
}

/// Stored description of a vessel class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselClassDesc {
    /// Class identity.
    #[serde(flatten)]
    pub info: VesselInfo,
    /// Cells in placement order.
    #[serde(default)]
    pub cells: Vec<CellDesc>,
}

impl VesselClassDesc {
    /// Describe an existing vessel, cells in cube hash form.
    pub fn from_vessel(vessel: &Vessel) -> Self {
        Self {
            info: vessel.info.clone(),
            cells: vessel
                .parts()
                .map(|p| CellDesc {
                    hex_hash: p.position().hash(),
                    part_name: p.name().to_string(),
                })
                .collect(),
        }
    }
}

/// Part blueprints indexed by name.
#[derive(Clone, Debug, Default)]
pub struct PartLibrary {
    parts: IndexMap<String, PartSpec>,
}

impl PartLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from descriptors. Later duplicates win.
    pub fn from_descs<'a>(descs: impl IntoIterator<Item = &'a PartDesc>) -> Result<Self, VesselError> {
        let mut lib = Self::new();
        for desc in descs {
            lib.insert(desc)?;
        }
        Ok(lib)
    }

    /// Add or replace one blueprint.
    pub fn insert(&mut self, desc: &PartDesc) -> Result<(), VesselError> {
        let spec = desc.to_spec()?;
        self.parts.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Blueprint named `name`.
    pub fn get(&self, name: &str) -> Option<&PartSpec> {
        self.parts.get(name)
    }

    /// Number of blueprints.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Build a fresh vessel of `class`.
    pub fn instantiate(&self, class: &VesselClassDesc) -> Result<Vessel, VesselError> {
        let mut vessel = Vessel::new(class.info.clone());
        for cell in &class.cells {
            let position = parse_hash(&cell.hex_hash)?;
            let spec = self
                .get(&cell.part_name)
                .ok_or_else(|| VesselError::UnknownPart {
                    name: cell.part_name.clone(),
                })?;
            vessel.add_cell(&position, spec);
        }
        Ok(vessel)
    }
}
