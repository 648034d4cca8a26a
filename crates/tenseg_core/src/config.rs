//! Configuration management for the kernel.
//!
//! Strongly-typed configuration that maps to a `kernel.toml` file. The
//! capacity bounds, global feature multipliers, behavior policy and
//! per-install role length overrides all arrive here at initialization;
//! nothing is read from ambient storage afterwards.
//!
//! ## Example `kernel.toml`
//!
//! ```toml
//! [capacity]
//! max_joints = 300
//! max_intervals = 500
//! max_faces = 200
//! max_instances = 32
//!
//! [behavior]
//! gene_policy = "wrap"
//! variation_buckets = 16
//!
//! [features]
//! gravity_above = 1.0
//! drag_above = 1.0
//!
//! [role_lengths]
//! triangle = 1.05
//! ```

use serde::{Deserialize, Serialize};

use crate::features::FeatureConfig;
use crate::genome::GenePolicy;
use crate::layout::InstanceLayout;
use crate::role::RoleOverrides;

/// Capacity bounds shared by every instance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct CapacityConfig {
    pub max_joints: usize,
    pub max_intervals: usize,
    pub max_faces: usize,
    pub max_instances: usize,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            max_joints: 300,
            max_intervals: 500,
            max_faces: 200,
            max_instances: 32,
        }
    }
}

/// Behavior modulation policy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct BehaviorConfig {
    /// What a gene cursor does when the sequence runs out.
    pub gene_policy: GenePolicy,
    /// Number of discrete span variation buckets per gene read.
    pub variation_buckets: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            gene_policy: GenePolicy::Wrap,
            variation_buckets: 16,
        }
    }
}

/// Complete kernel configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct KernelConfig {
    #[serde(default)]
    pub capacity: CapacityConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub role_lengths: RoleOverrides,
}

impl KernelConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.capacity.max_joints > 0, "Joint capacity must be positive");
        anyhow::ensure!(
            self.capacity.max_joints <= 10_000,
            "Joint capacity too large (max 10000)"
        );
        anyhow::ensure!(
            self.capacity.max_intervals > 0,
            "Interval capacity must be positive"
        );
        anyhow::ensure!(
            self.capacity.max_intervals <= 20_000,
            "Interval capacity too large (max 20000)"
        );
        anyhow::ensure!(self.capacity.max_faces > 0, "Face capacity must be positive");
        anyhow::ensure!(
            self.capacity.max_faces <= 10_000,
            "Face capacity too large (max 10000)"
        );
        anyhow::ensure!(
            self.capacity.max_instances > 0,
            "Instance capacity must be positive"
        );
        anyhow::ensure!(
            self.capacity.max_instances <= 1_000,
            "Instance capacity too large (max 1000)"
        );

        anyhow::ensure!(
            self.behavior.variation_buckets >= 2,
            "Variation buckets must be at least 2"
        );
        anyhow::ensure!(
            self.behavior.variation_buckets <= 256,
            "Variation buckets too large (max 256)"
        );

        self.features.validate()?;
        self.role_lengths.validate()?;
        Ok(())
    }

    /// Loads and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The per-instance memory layout these capacities imply.
    #[must_use]
    pub fn layout(&self) -> InstanceLayout {
        InstanceLayout::new(self.capacity.max_intervals, self.capacity.max_faces)
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.capacity).as_bytes());
        hasher.update(format!("{:?}", self.behavior).as_bytes());
        hasher.update(format!("{:?}", self.features).as_bytes());
        hex::encode(hasher.finalize())
    }
}
