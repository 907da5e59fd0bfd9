//! Facet generation parameters.

use bsp_csg::{CsgError, Real};

/// Quality parameters handed to every shape when it generates polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetContext {
    segments: u32,
}

impl FacetContext {
    /// Default number of segments around a full circle.
    pub const DEFAULT_SEGMENTS: u32 = 32;

    /// Creates a context approximating circles with `segments` edges.
    pub fn new(segments: u32) -> Result<Self, CsgError> {
        if segments < 3 {
            return Err(CsgError::InvalidDimension {
                name: "segments",
                value: segments as Real,
            });
        }
        Ok(Self { segments })
    }

    /// Number of edges used for a full circle.
    #[inline]
    pub fn segments(&self) -> u32 {
        self.segments
    }
}

impl Default for FacetContext {
    fn default() -> Self {
        Self {
            segments: Self::DEFAULT_SEGMENTS,
        }
    }
}
