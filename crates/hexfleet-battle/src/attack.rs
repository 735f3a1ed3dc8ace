//! Attack intents and their resolution.

use std::fmt;

use serde::Serialize;

use hexfleet_core::PartId;

use crate::roll::Roll;
use crate::team::MemberId;

/// The weapon an attack fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponRef {
    /// Attacking member.
    pub member: MemberId,
    /// Defense part used as weapon.
    pub weapon: PartId,
}

/// The part an attack aims at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetRef {
    /// Targeted member.
    pub member: MemberId,
    /// Targeted part.
    pub part: PartId,
}

/// An intended strike, planned in phase 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attack {
    /// Skill rolled for the strike.
    pub attacker: Roll,
    /// Firing weapon.
    pub source: WeaponRef,
    /// Aimed part.
    pub target: TargetRef,
}

/// How an attack ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE", tag = "state", content = "value")]
pub enum Hit {
    /// Connected for this much damage.
    Touch(i32),
    /// The roll had no success.
    Missed,
    /// The target's maneuver beat the roll.
    Avoid,
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Touch(v) => write!(f, "TOUCH({v})"),
            Self::Missed => f.write_str("MISSED"),
            Self::Avoid => f.write_str("AVOID"),
        }
    }
}

/// A resolved attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Damage {
    /// The intent.
    pub attack: Attack,
    /// Successes rolled.
    pub power: u32,
    /// Outcome.
    pub hit: Hit,
}

/// Outcome of `power` against a banked `maneuver`, before the weapon fires.
///
/// `None` means the attack connects; the caller fires the weapon to learn
/// the damage value.
pub fn classify(power: u32, maneuver: u32) -> Option<Hit> {
    if power == 0 {
        Some(Hit::Missed)
    } else if power <= maneuver {
        Some(Hit::Avoid)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_power_misses() {
        assert_eq!(classify(0, 0), Some(Hit::Missed));
        assert_eq!(classify(0, 5), Some(Hit::Missed));
    }

    #[test]
    fn power_within_maneuver_is_avoided() {
        assert_eq!(classify(1, 1), Some(Hit::Avoid));
        assert_eq!(classify(2, 3), Some(Hit::Avoid));
    }

    #[test]
    fn power_above_maneuver_connects() {
        assert_eq!(classify(1, 0), None);
        assert_eq!(classify(4, 3), None);
    }

    #[test]
    fn hit_serializes_with_state_tag() {
        let json = serde_json::to_string(&Hit::Touch(3)).unwrap();
        assert_eq!(json, r#"{"state":"TOUCH","value":3}"#);
        let json = serde_json::to_string(&Hit::Missed).unwrap();
        assert_eq!(json, r#"{"state":"MISSED"}"#);
    }
}
