//! The external numeric engine boundary.
//!
//! The kernel owns structure, state and behavior; the force integration
//! itself (accumulation, collision, drag, rest length interpolation) lives
//! behind this trait in the host's numeric engine. The engine owns the
//! shared geometry buffer; the kernel only derives addresses into it via
//! [`crate::layout::InstanceLayout`] and verifies the byte total the
//! engine reports at init time.

use tenseg_data::GlobalFeature;

/// Narrow interface the kernel drives.
///
/// `init` must be called exactly once before any instance operation; the
/// returned byte total is checked against the derived layout and any
/// mismatch is a fatal contract violation. `iterate` runs to completion
/// synchronously; geometry views must not be read while it is in flight,
/// which the borrow on [`PhysicsEngine::geometry`] enforces.
pub trait PhysicsEngine {
    /// Allocates the shared buffer for all instances and returns its total
    /// size in bytes.
    fn init(
        &mut self,
        max_joints: usize,
        max_intervals: usize,
        max_faces: usize,
        max_instances: usize,
    ) -> usize;

    /// Advances one instance by `ticks`, integrating forces and moving
    /// rest lengths toward their per-state targets. Returns whether the
    /// engine still considers the instance gestating.
    fn iterate(&mut self, instance: usize, ticks: u64) -> bool;

    /// Re-centers an instance's joint positions around the origin.
    fn centralize(&mut self, instance: usize);

    /// Shifts an instance's joint positions to the given altitude.
    fn set_altitude(&mut self, instance: usize, altitude: f32);

    /// Applies one effective global feature scalar. Returns the value
    /// actually in effect, after any clamping the engine performs.
    fn set_feature(&mut self, feature: GlobalFeature, value: f32) -> f32;

    /// The whole shared geometry buffer, laid out per
    /// [`crate::layout::InstanceLayout`].
    fn geometry(&self) -> &[f32];
}
