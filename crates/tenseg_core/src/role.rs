//! Interval role length derivations.
//!
//! Every role's canonical rest length derives from a small set of geometric
//! constants: the golden ratio and the square roots of 2, 3 and 5. The
//! derivation is total over the closed role set; converting a raw tag or
//! name fails fast on anything outside the enumeration so a stale role id
//! from a future schema version can never be silently defaulted.
//!
//! A per-install override table, keyed by role name and loaded from the
//! kernel configuration, shadows the canonical value. Absence of an
//! override is the normal case, not an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tenseg_data::IntervalRole;

use crate::error::{KernelError, Result};

/// The golden ratio, (1 + sqrt(5)) / 2.
#[must_use]
pub fn phi() -> f32 {
    (1.0 + 5.0_f32.sqrt()) / 2.0
}

/// Trait defining the physical derivations for interval roles.
pub trait RoleLogic: Sized {
    /// Canonical rest length derived from the geometric constant table.
    #[must_use]
    fn rest_length(&self) -> f32;

    /// Rest length with any per-install override applied.
    #[must_use]
    fn rest_length_with(&self, overrides: &RoleOverrides) -> f32;

    /// Whether this role is a rigid push member.
    #[must_use]
    fn is_push(&self) -> bool;

    /// Converts a wire tag, failing fast outside the closed set.
    fn from_tag(tag: u8) -> Result<Self>;

    /// Converts a stable role name, failing fast on unknown names.
    fn from_name(name: &str) -> Result<Self>;
}

impl RoleLogic for IntervalRole {
    fn rest_length(&self) -> f32 {
        let root2 = 2.0_f32.sqrt();
        let root3 = 3.0_f32.sqrt();
        let root5 = 5.0_f32.sqrt();
        match self {
            IntervalRole::NexusPush => phi(),
            IntervalRole::ColumnPush => root2 * root3,
            IntervalRole::Triangle => 1.0,
            IntervalRole::Ring => root2 / phi(),
            IntervalRole::Cross => root3 / phi(),
            IntervalRole::BowMid => 1.0 / (phi() * phi()),
            IntervalRole::BowEnd => 1.0 / phi(),
            IntervalRole::RibbonPush => root5,
            IntervalRole::RibbonShort => 1.0 / root2,
            IntervalRole::RibbonLong => root2,
            IntervalRole::Hanger => 1.0 / root3,
        }
    }

    fn rest_length_with(&self, overrides: &RoleOverrides) -> f32 {
        overrides
            .get(self.name())
            .unwrap_or_else(|| self.rest_length())
    }

    fn is_push(&self) -> bool {
        matches!(
            self,
            IntervalRole::NexusPush | IntervalRole::ColumnPush | IntervalRole::RibbonPush
        )
    }

    fn from_tag(tag: u8) -> Result<Self> {
        IntervalRole::ALL
            .get(tag as usize)
            .copied()
            .ok_or(KernelError::UnrecognizedRole(tag))
    }

    fn from_name(name: &str) -> Result<Self> {
        IntervalRole::ALL
            .iter()
            .find(|role| role.name() == name)
            .copied()
            .ok_or_else(|| KernelError::UnknownRoleName(name.to_string()))
    }
}

/// Per-install rest length overrides, keyed by role name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RoleOverrides {
    lengths: HashMap<String, f32>,
}

impl RoleOverrides {
    /// Creates an empty override table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an override; `None` means the canonical length applies.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.lengths.get(name).copied()
    }

    /// Sets an override. The name must belong to the closed role set.
    pub fn set(&mut self, name: &str, length: f32) -> Result<()> {
        IntervalRole::from_name(name)?;
        self.lengths.insert(name.to_string(), length);
        Ok(())
    }

    /// Removes an override, restoring the canonical derivation.
    pub fn clear(&mut self, name: &str) {
        self.lengths.remove(name);
    }

    /// Validates that every key names a real role and every length is
    /// positive. Used at configuration load time.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, length) in &self.lengths {
            IntervalRole::from_name(name)
                .map_err(|_| anyhow::anyhow!("unknown role name in overrides: {name}"))?;
            anyhow::ensure!(
                *length > 0.0,
                "override for {name} must be positive, got {length}"
            );
        }
        Ok(())
    }
}
