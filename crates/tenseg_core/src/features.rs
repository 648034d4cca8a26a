//! Global feature vector: engine-wide physical scalars.
//!
//! Each feature has a canonical default value; the configuration carries a
//! multiplier per feature, and the effective value handed to the numeric
//! engine is `default * factor`. The vector is engine-wide, never
//! instance-scoped.

use serde::{Deserialize, Serialize};
use tenseg_data::GlobalFeature;

use crate::error::{KernelError, Result};

/// Trait defining the canonical scalar table for global features.
pub trait FeatureLogic: Sized {
    /// Canonical default value of this feature.
    #[must_use]
    fn default_value(&self) -> f32;

    /// Converts a stable feature name, failing fast on unknown names.
    fn from_name(name: &str) -> Result<Self>;
}

impl FeatureLogic for GlobalFeature {
    fn default_value(&self) -> f32 {
        match self {
            GlobalFeature::GravityAbove => 0.000_005,
            GlobalFeature::GravityBelowLand => -0.03,
            GlobalFeature::GravityBelowWater => -0.000_01,
            GlobalFeature::DragAbove => 0.000_1,
            GlobalFeature::DragBelowLand => 0.6,
            GlobalFeature::DragBelowWater => 0.001,
            GlobalFeature::LengthVariationSpeed => 0.02,
            GlobalFeature::PushElastic => 1.2,
            GlobalFeature::PullElastic => 0.3,
        }
    }

    fn from_name(name: &str) -> Result<Self> {
        GlobalFeature::ALL
            .iter()
            .find(|feature| feature.name() == name)
            .copied()
            .ok_or_else(|| KernelError::UnrecognizedFeature(name.to_string()))
    }
}

/// Multipliers over the canonical feature defaults.
///
/// Serialized as the `[features]` section of the kernel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureConfig {
    pub gravity_above: f32,
    pub gravity_below_land: f32,
    pub gravity_below_water: f32,
    pub drag_above: f32,
    pub drag_below_land: f32,
    pub drag_below_water: f32,
    pub length_variation_speed: f32,
    pub push_elastic: f32,
    pub pull_elastic: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            gravity_above: 1.0,
            gravity_below_land: 1.0,
            gravity_below_water: 1.0,
            drag_above: 1.0,
            drag_below_land: 1.0,
            drag_below_water: 1.0,
            length_variation_speed: 1.0,
            push_elastic: 1.0,
            pull_elastic: 1.0,
        }
    }
}

impl FeatureConfig {
    /// The multiplier currently set for a feature.
    #[must_use]
    pub fn factor(&self, feature: GlobalFeature) -> f32 {
        match feature {
            GlobalFeature::GravityAbove => self.gravity_above,
            GlobalFeature::GravityBelowLand => self.gravity_below_land,
            GlobalFeature::GravityBelowWater => self.gravity_below_water,
            GlobalFeature::DragAbove => self.drag_above,
            GlobalFeature::DragBelowLand => self.drag_below_land,
            GlobalFeature::DragBelowWater => self.drag_below_water,
            GlobalFeature::LengthVariationSpeed => self.length_variation_speed,
            GlobalFeature::PushElastic => self.push_elastic,
            GlobalFeature::PullElastic => self.pull_elastic,
        }
    }

    /// Sets the multiplier for a feature and returns the effective value.
    pub fn set_factor(&mut self, feature: GlobalFeature, factor: f32) -> f32 {
        let slot = match feature {
            GlobalFeature::GravityAbove => &mut self.gravity_above,
            GlobalFeature::GravityBelowLand => &mut self.gravity_below_land,
            GlobalFeature::GravityBelowWater => &mut self.gravity_below_water,
            GlobalFeature::DragAbove => &mut self.drag_above,
            GlobalFeature::DragBelowLand => &mut self.drag_below_land,
            GlobalFeature::DragBelowWater => &mut self.drag_below_water,
            GlobalFeature::LengthVariationSpeed => &mut self.length_variation_speed,
            GlobalFeature::PushElastic => &mut self.push_elastic,
            GlobalFeature::PullElastic => &mut self.pull_elastic,
        };
        *slot = factor;
        self.effective(feature)
    }

    /// The effective scalar for a feature: canonical default times factor.
    #[must_use]
    pub fn effective(&self, feature: GlobalFeature) -> f32 {
        feature.default_value() * self.factor(feature)
    }

    /// Validates that the multipliers are finite and non-negative where the
    /// feature is magnitude-like (drag, elasticity, variation speed).
    pub fn validate(&self) -> anyhow::Result<()> {
        for feature in GlobalFeature::ALL {
            let factor = self.factor(feature);
            anyhow::ensure!(
                factor.is_finite(),
                "feature factor for {} must be finite",
                feature.name()
            );
        }
        for feature in [
            GlobalFeature::DragAbove,
            GlobalFeature::DragBelowLand,
            GlobalFeature::DragBelowWater,
            GlobalFeature::LengthVariationSpeed,
            GlobalFeature::PushElastic,
            GlobalFeature::PullElastic,
        ] {
            anyhow::ensure!(
                self.factor(feature) >= 0.0,
                "feature factor for {} must be non-negative",
                feature.name()
            );
        }
        Ok(())
    }
}
