//! Engine memory layout: the binary contract over the shared buffer.
//!
//! For one simulation instance, a contiguous byte range is partitioned into
//! five typed regions of 32-bit floats, laid out in this fixed order:
//!
//! 1. line endpoints   — 2 vectors x 3 floats per interval slot
//! 2. line colors      — 2 vectors x 3 floats per interval slot
//! 3. face midpoints   — 1 vector  x 3 floats per face slot
//! 4. face normals     — 3 vectors x 3 floats per face slot
//! 5. face locations   — 3 vectors x 3 floats per face slot
//!
//! Each offset is the exact byte sum of the preceding regions. The numeric
//! engine writes results into exactly these offsets; this module only
//! re-derives addresses and never allocates. The k-th live interval (arena
//! iteration order) owns line slot k, so the written prefix of each region
//! is dense and views are sized by live counts, never by capacity.

use crate::error::{KernelError, Result};

/// Bytes per 32-bit float.
pub const FLOAT_BYTES: usize = 4;
/// Floats per 3-component vector.
pub const VECTOR_FLOATS: usize = 3;
/// Vectors per line segment (alpha and omega endpoints).
pub const LINE_VECTORS: usize = 2;
/// Vectors per face in the normals and locations regions (one per vertex).
pub const FACE_VERTEX_VECTORS: usize = 3;

/// Derived byte layout for one instance, fixed by its capacity bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLayout {
    max_intervals: usize,
    max_faces: usize,
}

impl InstanceLayout {
    /// Derives the layout from the instance capacity bounds.
    #[must_use]
    pub fn new(max_intervals: usize, max_faces: usize) -> Self {
        Self {
            max_intervals,
            max_faces,
        }
    }

    /// Byte offset of the line endpoints region. Always zero.
    #[must_use]
    pub fn line_locations_offset(&self) -> usize {
        0
    }

    /// Byte size of the line endpoints region.
    #[must_use]
    pub fn line_locations_bytes(&self) -> usize {
        self.max_intervals * LINE_VECTORS * VECTOR_FLOATS * FLOAT_BYTES
    }

    /// Byte offset of the line colors region.
    #[must_use]
    pub fn line_colors_offset(&self) -> usize {
        self.line_locations_offset() + self.line_locations_bytes()
    }

    /// Byte size of the line colors region. Same shape as the endpoints.
    #[must_use]
    pub fn line_colors_bytes(&self) -> usize {
        self.max_intervals * LINE_VECTORS * VECTOR_FLOATS * FLOAT_BYTES
    }

    /// Byte offset of the face midpoints region.
    #[must_use]
    pub fn face_midpoints_offset(&self) -> usize {
        self.line_colors_offset() + self.line_colors_bytes()
    }

    /// Byte size of the face midpoints region.
    #[must_use]
    pub fn face_midpoints_bytes(&self) -> usize {
        self.max_faces * VECTOR_FLOATS * FLOAT_BYTES
    }

    /// Byte offset of the face normals region.
    #[must_use]
    pub fn face_normals_offset(&self) -> usize {
        self.face_midpoints_offset() + self.face_midpoints_bytes()
    }

    /// Byte size of the face normals region, one normal per vertex.
    #[must_use]
    pub fn face_normals_bytes(&self) -> usize {
        self.max_faces * FACE_VERTEX_VECTORS * VECTOR_FLOATS * FLOAT_BYTES
    }

    /// Byte offset of the face vertex locations region.
    #[must_use]
    pub fn face_locations_offset(&self) -> usize {
        self.face_normals_offset() + self.face_normals_bytes()
    }

    /// Byte size of the face vertex locations region.
    #[must_use]
    pub fn face_locations_bytes(&self) -> usize {
        self.max_faces * FACE_VERTEX_VECTORS * VECTOR_FLOATS * FLOAT_BYTES
    }

    /// Total bytes for one instance.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.face_locations_offset() + self.face_locations_bytes()
    }

    /// Total floats for one instance.
    #[must_use]
    pub fn total_floats(&self) -> usize {
        self.total_bytes() / FLOAT_BYTES
    }

    /// Byte offset of an instance's slice within the shared buffer.
    #[must_use]
    pub fn instance_offset(&self, instance: usize) -> usize {
        instance * self.total_bytes()
    }

    /// Checks the engine-reported total against the derivation.
    ///
    /// A mismatch is build/version skew between host and kernel; it
    /// surfaces as corrupted geometry and must never be caught and ignored.
    pub fn verify_contract(&self, instances: usize, engine_bytes: usize) -> Result<()> {
        let expected = self.total_bytes() * instances;
        if engine_bytes != expected {
            return Err(KernelError::LayoutContract {
                expected,
                actual: engine_bytes,
            });
        }
        Ok(())
    }

    /// Borrows the live-sized geometry views over an engine buffer.
    ///
    /// `floats` must be the engine's whole shared buffer; `interval_count`
    /// and `face_count` are the live counts at call time. The returned view
    /// borrows the buffer, so it cannot be retained across an `iterate`
    /// call that needs the engine mutably.
    pub fn view<'a>(
        &self,
        floats: &'a [f32],
        instance: usize,
        interval_count: usize,
        face_count: usize,
    ) -> Result<GeometryView<'a>> {
        if interval_count > self.max_intervals {
            return Err(KernelError::invalid_index("interval", interval_count));
        }
        if face_count > self.max_faces {
            return Err(KernelError::invalid_index("face", face_count));
        }
        let start = self.instance_offset(instance) / FLOAT_BYTES;
        let end = start + self.total_floats();
        if end > floats.len() {
            return Err(KernelError::LayoutContract {
                expected: end * FLOAT_BYTES,
                actual: floats.len() * FLOAT_BYTES,
            });
        }
        Ok(GeometryView {
            floats: &floats[start..end],
            layout: *self,
            interval_count,
            face_count,
        })
    }
}

/// Read-only, live-sized numeric views over one instance's geometry.
///
/// All slices are scaled by the live element count at view time, never by
/// capacity, since capacity includes unused trailing slots.
#[derive(Debug, Clone, Copy)]
pub struct GeometryView<'a> {
    floats: &'a [f32],
    layout: InstanceLayout,
    interval_count: usize,
    face_count: usize,
}

impl<'a> GeometryView<'a> {
    /// Line segment endpoints: 6 floats per live interval.
    #[must_use]
    pub fn line_locations(&self) -> &'a [f32] {
        let start = self.layout.line_locations_offset() / FLOAT_BYTES;
        &self.floats[start..start + self.interval_count * LINE_VECTORS * VECTOR_FLOATS]
    }

    /// Line segment colors: 6 floats per live interval.
    #[must_use]
    pub fn line_colors(&self) -> &'a [f32] {
        let start = self.layout.line_colors_offset() / FLOAT_BYTES;
        &self.floats[start..start + self.interval_count * LINE_VECTORS * VECTOR_FLOATS]
    }

    /// Face midpoints: 3 floats per live face.
    #[must_use]
    pub fn face_midpoints(&self) -> &'a [f32] {
        let start = self.layout.face_midpoints_offset() / FLOAT_BYTES;
        &self.floats[start..start + self.face_count * VECTOR_FLOATS]
    }

    /// Face vertex normals: 9 floats per live face.
    #[must_use]
    pub fn face_normals(&self) -> &'a [f32] {
        let start = self.layout.face_normals_offset() / FLOAT_BYTES;
        &self.floats[start..start + self.face_count * FACE_VERTEX_VECTORS * VECTOR_FLOATS]
    }

    /// Face vertex locations: 9 floats per live face.
    #[must_use]
    pub fn face_locations(&self) -> &'a [f32] {
        let start = self.layout.face_locations_offset() / FLOAT_BYTES;
        &self.floats[start..start + self.face_count * FACE_VERTEX_VECTORS * VECTOR_FLOATS]
    }
}
