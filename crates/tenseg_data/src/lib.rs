//! Pure data structures for the tenseg simulation kernel.
//!
//! This crate holds the serializable vocabulary shared between the kernel
//! and its hosts: interval roles, joint laterality, locomotion directions,
//! global physics features, and genomes. No simulation logic lives here;
//! the derivations and state machines are in `tenseg_core`.

pub mod data;

pub use data::genome::Genome;
pub use data::role::{IntervalRole, Laterality};
pub use data::state::{Direction, GlobalFeature};
