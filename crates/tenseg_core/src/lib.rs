//! # Tenseg Core
//!
//! The simulation kernel for tenseg - a tensegrity structure simulator.
//!
//! This crate contains the deterministic kernel logic, including:
//! - Interval role taxonomy with physically derived rest lengths
//! - Engine memory layout (the binary contract over the shared buffer)
//! - Fabric instance store with generational interval/face arenas
//! - Locomotion state machine (rest, forward, turns, reverse)
//! - Genome-driven behavior modulation per locomotion state
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! The kernel follows a narrow-boundary design:
//! - **Explicit instance handles**: every operation names its instance
//! - **Generational ids**: stale interval/face references fail fast
//! - **Borrowed geometry views**: reads are scoped between ticks
//! - **External numeric engine**: force integration stays behind a trait
//!
//! ## Example
//!
//! ```
//! use tenseg_core::config::KernelConfig;
//! use tenseg_core::store::FabricStore;
//! use tenseg_data::{IntervalRole, Laterality};
//!
//! let mut store = FabricStore::new(KernelConfig::default()).unwrap();
//! let alpha = store.create_joint(0, Laterality::Middle, 0.0, 1.0, 0.0).unwrap();
//! let omega = store.create_joint(0, Laterality::Middle, 1.0, 1.0, 0.0).unwrap();
//! let interval = store.create_interval(0, alpha, omega, IntervalRole::Triangle).unwrap();
//!
//! let fabric = store.instance(0).unwrap();
//! assert_eq!(fabric.interval(interval).unwrap().rest_length(), 1.0);
//! ```

/// Genome-driven span variation per locomotion state
pub mod behavior;
/// Configuration management for kernel parameters
pub mod config;
/// Locomotion direction conversions
pub mod direction;
/// External numeric engine boundary
pub mod engine;
/// Error taxonomy for kernel operations
pub mod error;
/// Single fabric instance: joints, intervals, faces
pub mod fabric;
/// Global feature vector of engine-wide scalars
pub mod features;
/// Gene reading and genome construction
pub mod genome;
/// Engine memory layout and live-sized views
pub mod layout;
/// Metrics collection and logging
pub mod metrics;
/// Interval role length derivations
pub mod role;
/// Multi-instance store and tick driver
pub mod store;

pub use behavior::{apply_behavior, BehaviorSummary};
pub use direction::DirectionLogic;
pub use error::{KernelError, Result};
pub use fabric::{Fabric, FaceId, IntervalId, JointTag};
pub use features::FeatureLogic;
pub use genome::{GenePolicy, GeneReader, GenomeLogic};
pub use layout::{GeometryView, InstanceLayout};
pub use metrics::{init_logging, Metrics};
pub use role::RoleLogic;
pub use store::{FabricStore, TagGenerator};
pub use tenseg_data::{Direction, Genome, GlobalFeature, IntervalRole, Laterality};
