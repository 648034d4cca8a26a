//! Error types for the tenseg kernel.
//!
//! The taxonomy separates recoverable conditions (capacity exhaustion,
//! invalid or stale ids) from configuration-skew failures (unrecognized
//! tags, layout contract mismatch) that indicate a host/kernel version
//! mismatch and must not be caught and ignored.

use thiserror::Error;

/// Main error type for kernel operations.
#[derive(Error, Debug, PartialEq)]
pub enum KernelError {
    /// A capacity bound was reached; the operation had no effect.
    #[error("Capacity exhausted: {what} (capacity {capacity})")]
    CapacityExhausted { what: &'static str, capacity: usize },

    /// An index was out of range for the live collection.
    #[error("Invalid {what} index: {index}")]
    InvalidIndex { what: &'static str, index: usize },

    /// A generational id referred to a removed or reused slot.
    #[error("Stale {what} id at slot {index}")]
    StaleId { what: &'static str, index: usize },

    /// An instance index exceeded the configured instance capacity.
    #[error("Instance {index} out of range (capacity {capacity})")]
    InstanceOutOfRange { index: usize, capacity: usize },

    /// A role tag outside the closed enumeration. Schema mismatch.
    #[error("Unrecognized interval role tag: {0}")]
    UnrecognizedRole(u8),

    /// A role name with no canonical counterpart. Schema mismatch.
    #[error("Unknown interval role name: {0}")]
    UnknownRoleName(String),

    /// A direction tag outside the closed enumeration. Schema mismatch.
    #[error("Unrecognized direction tag: {0}")]
    UnrecognizedDirection(u8),

    /// A feature name with no canonical counterpart. Schema mismatch.
    #[error("Unrecognized global feature: {0}")]
    UnrecognizedFeature(String),

    /// The engine-reported buffer size disagrees with the derived layout.
    /// Build/version skew, not a runtime-recoverable condition.
    #[error("Memory layout contract mismatch: expected {expected} bytes, engine reports {actual}")]
    LayoutContract { expected: usize, actual: usize },

    /// The gene sequence ran out under the fail-fast exhaustion policy.
    #[error("Gene exhausted at cursor {cursor} (genome length {length})")]
    GeneExhausted { cursor: usize, length: usize },
}

/// Result type alias for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;

impl KernelError {
    /// Creates a capacity exhaustion error.
    #[must_use]
    pub fn capacity(what: &'static str, capacity: usize) -> Self {
        Self::CapacityExhausted { what, capacity }
    }

    /// Creates an invalid index error.
    #[must_use]
    pub fn invalid_index(what: &'static str, index: usize) -> Self {
        Self::InvalidIndex { what, index }
    }

    /// Creates a stale id error.
    #[must_use]
    pub fn stale(what: &'static str, index: usize) -> Self {
        Self::StaleId { what, index }
    }

    /// Whether the host may recover from this error and continue.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CapacityExhausted { .. }
                | Self::InvalidIndex { .. }
                | Self::StaleId { .. }
                | Self::InstanceOutOfRange { .. }
                | Self::GeneExhausted { .. }
        )
    }
}
