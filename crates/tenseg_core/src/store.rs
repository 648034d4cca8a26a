//! Multi-instance fabric store and tick driver.
//!
//! Many structure instances share one capacity pool; every operation
//! names its instance explicitly, so there is no hidden current-instance
//! state to serialize around. The store owns the monotonic joint tag
//! generator, resolves role rest lengths through the override table, and
//! drives the external numeric engine across tick boundaries.

use tenseg_data::{Genome, GlobalFeature, IntervalRole, Laterality};

use crate::behavior::{self, BehaviorSummary};
use crate::config::KernelConfig;
use crate::engine::PhysicsEngine;
use crate::error::{KernelError, Result};
use crate::fabric::{Fabric, IntervalId, JointTag};
use crate::layout::{GeometryView, InstanceLayout};
use crate::metrics::Metrics;
use crate::role::RoleLogic;

/// Monotonic source of joint tags.
///
/// The only way to mint a [`JointTag`]; tags strictly increase and are
/// never reused, even across instance resets.
#[derive(Debug, Clone, Default)]
pub struct TagGenerator {
    next: u64,
}

impl TagGenerator {
    /// Creates a generator starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints the next tag.
    pub fn next_tag(&mut self) -> JointTag {
        let tag = JointTag::new(self.next);
        self.next += 1;
        tag
    }
}

/// The fabric instance store.
pub struct FabricStore {
    config: KernelConfig,
    layout: InstanceLayout,
    instances: Vec<Fabric>,
    tags: TagGenerator,
    metrics: Metrics,
}

impl FabricStore {
    /// Creates a store with every instance slot empty.
    pub fn new(config: KernelConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let capacity = config.capacity;
        let layout = config.layout();
        let instances = (0..capacity.max_instances)
            .map(|_| {
                Fabric::new(
                    capacity.max_joints,
                    capacity.max_intervals,
                    capacity.max_faces,
                )
            })
            .collect();
        Ok(Self {
            config,
            layout,
            instances,
            tags: TagGenerator::new(),
            metrics: Metrics::new(),
        })
    }

    /// Initializes the numeric engine and verifies the layout contract.
    ///
    /// Must be called exactly once before any iterate or view call; a byte
    /// total that disagrees with the derivation is fatal version skew.
    pub fn init_engine<E: PhysicsEngine>(&self, engine: &mut E) -> Result<()> {
        let capacity = self.config.capacity;
        let bytes = engine.init(
            capacity.max_joints,
            capacity.max_intervals,
            capacity.max_faces,
            capacity.max_instances,
        );
        self.layout.verify_contract(capacity.max_instances, bytes)?;
        tracing::info!(
            instances = capacity.max_instances,
            bytes_per_instance = self.layout.total_bytes(),
            "Engine buffer verified"
        );
        Ok(())
    }

    /// The configuration this store was built from.
    #[must_use]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// The derived per-instance memory layout.
    #[must_use]
    pub fn layout(&self) -> InstanceLayout {
        self.layout
    }

    /// The metrics collector.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Number of instance slots.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Borrows an instance.
    pub fn instance(&self, index: usize) -> Result<&Fabric> {
        self.instances
            .get(index)
            .ok_or(KernelError::InstanceOutOfRange {
                index,
                capacity: self.config.capacity.max_instances,
            })
    }

    /// Borrows an instance mutably.
    pub fn instance_mut(&mut self, index: usize) -> Result<&mut Fabric> {
        let capacity = self.config.capacity.max_instances;
        self.instances
            .get_mut(index)
            .ok_or(KernelError::InstanceOutOfRange { index, capacity })
    }

    /// Deep-copies one instance's state over another, unconditionally.
    ///
    /// Supports speculative genome evaluation against a clone without
    /// disturbing the baseline.
    pub fn clone_instance(&mut self, from: usize, to: usize) -> Result<()> {
        self.instance(to)?;
        let copy = self.instance(from)?.clone();
        *self.instance_mut(to)? = copy;
        tracing::debug!(from, to, "Instance cloned");
        Ok(())
    }

    /// Clears one instance back to empty. Capacity is unchanged.
    pub fn reset(&mut self, instance: usize) -> Result<()> {
        self.instance_mut(instance)?.reset();
        Ok(())
    }

    /// Allocates a joint with a freshly minted tag.
    pub fn create_joint(
        &mut self,
        instance: usize,
        laterality: Laterality,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<usize> {
        self.instance(instance)?;
        let tag = self.tags.next_tag();
        self.instance_mut(instance)?
            .create_joint(tag, laterality, x, y, z)
    }

    /// Creates an interval whose initial rest length comes from the role
    /// table with per-install overrides applied.
    pub fn create_interval(
        &mut self,
        instance: usize,
        alpha: usize,
        omega: usize,
        role: IntervalRole,
    ) -> Result<IntervalId> {
        let rest_length = role.rest_length_with(&self.config.role_lengths);
        self.instance_mut(instance)?
            .create_interval(alpha, omega, role, rest_length)
    }

    /// Reassigns an interval's role; the rest length follows the new role.
    pub fn change_interval_role(
        &mut self,
        instance: usize,
        id: IntervalId,
        role: IntervalRole,
    ) -> Result<()> {
        let rest_length = role.rest_length_with(&self.config.role_lengths);
        self.instance_mut(instance)?
            .change_interval_role(id, role, rest_length)
    }

    /// Sets one global feature multiplier and forwards the effective value
    /// to the engine. Returns the value actually in effect.
    pub fn set_feature<E: PhysicsEngine>(
        &mut self,
        engine: &mut E,
        feature: GlobalFeature,
        factor: f32,
    ) -> f32 {
        let effective = self.config.features.set_factor(feature, factor);
        engine.set_feature(feature, effective)
    }

    /// Applies one behavior pass to an instance under the configured
    /// policy, for the instance's active direction.
    pub fn apply_behavior(
        &mut self,
        instance: usize,
        genome: &Genome,
    ) -> Result<BehaviorSummary> {
        let policy = self.config.behavior.gene_policy;
        let buckets = self.config.behavior.variation_buckets;
        let summary = {
            let fabric = self.instance_mut(instance)?;
            behavior::apply_behavior(fabric, genome, policy, buckets)?
        };
        self.metrics.record_behavior(summary.visited);
        Ok(summary)
    }

    /// Advances one instance across a tick boundary.
    ///
    /// The pending direction commits first, so in-flight integration always
    /// sees a single consistent state; then the engine runs the batch and
    /// age/gestation advance. Returns whether the instance is still
    /// gestating (by its countdown or the engine's own account).
    pub fn iterate<E: PhysicsEngine>(
        &mut self,
        engine: &mut E,
        instance: usize,
        ticks: u64,
    ) -> Result<bool> {
        let (still_gestating, intervals, faces) = {
            let fabric = self.instance_mut(instance)?;
            fabric.commit_direction();
            let engine_gestating = engine.iterate(instance, ticks);
            let finished = fabric.advance(ticks);
            if finished {
                tracing::info!(instance, age = fabric.age(), "Gestation complete");
            }
            (
                engine_gestating || fabric.is_gestating(),
                fabric.interval_count(),
                fabric.face_count(),
            )
        };
        self.metrics.record_iterate(ticks, intervals, faces);
        Ok(still_gestating)
    }

    /// Re-centers an instance's joint positions.
    pub fn centralize<E: PhysicsEngine>(&self, engine: &mut E, instance: usize) -> Result<()> {
        self.instance(instance)?;
        engine.centralize(instance);
        Ok(())
    }

    /// Shifts an instance's joint positions to an altitude.
    pub fn set_altitude<E: PhysicsEngine>(
        &self,
        engine: &mut E,
        instance: usize,
        altitude: f32,
    ) -> Result<()> {
        self.instance(instance)?;
        engine.set_altitude(instance, altitude);
        Ok(())
    }

    /// Borrows the live-sized geometry views for one instance.
    ///
    /// The view borrows the engine, so it cannot outlive the buffer or be
    /// held across a mutable engine call such as `iterate`.
    pub fn geometry_view<'a, E: PhysicsEngine>(
        &self,
        engine: &'a E,
        instance: usize,
    ) -> Result<GeometryView<'a>> {
        let fabric = self.instance(instance)?;
        self.layout.view(
            engine.geometry(),
            instance,
            fabric.interval_count(),
            fabric.face_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_strictly_increase() {
        let mut tags = TagGenerator::new();
        let mut previous = None;
        for _ in 0..100 {
            let tag = tags.next_tag();
            if let Some(last) = previous {
                assert!(tag > last);
            }
            previous = Some(tag);
        }
    }

    #[test]
    fn test_instance_out_of_range() {
        let mut config = KernelConfig::default();
        config.capacity.max_instances = 2;
        let store = FabricStore::new(config).unwrap();
        assert!(store.instance(1).is_ok());
        assert_eq!(
            store.instance(2).unwrap_err(),
            KernelError::InstanceOutOfRange {
                index: 2,
                capacity: 2
            }
        );
    }

    #[test]
    fn test_create_interval_uses_override_length() {
        let mut config = KernelConfig::default();
        config.role_lengths.set("triangle", 1.5).unwrap();
        let mut store = FabricStore::new(config).unwrap();
        let a = store
            .create_joint(0, Laterality::Middle, 0.0, 0.0, 0.0)
            .unwrap();
        let b = store
            .create_joint(0, Laterality::Middle, 1.0, 0.0, 0.0)
            .unwrap();
        let id = store
            .create_interval(0, a, b, IntervalRole::Triangle)
            .unwrap();
        assert_eq!(store.instance(0).unwrap().interval(id).unwrap().rest_length(), 1.5);
    }

    #[test]
    fn test_joint_tags_unique_across_instances() {
        let store_config = KernelConfig::default();
        let mut store = FabricStore::new(store_config).unwrap();
        store
            .create_joint(0, Laterality::Middle, 0.0, 0.0, 0.0)
            .unwrap();
        store
            .create_joint(1, Laterality::Middle, 0.0, 0.0, 0.0)
            .unwrap();
        let first = store.instance(0).unwrap().joint(0).unwrap().tag();
        let second = store.instance(1).unwrap().joint(0).unwrap().tag();
        assert!(second > first);
    }
}
