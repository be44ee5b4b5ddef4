//! Surface descriptors and surface type classification
//!
//! The header of an RSSA file carries one record per recording surface. The
//! file format never states the overall surface geometry, so it is inferred
//! from the track positions with a simple statistical test.

// external crates
use itertools::Itertools;
use serde::Serialize;

/// Spread of track radii tolerated before a surface stops being a cylinder
///
/// The radii of tracks recorded on a right circular cylinder are identical
/// up to floating-point jitter from the simulation, so the standard
/// deviation cut can be tight. Synthetic high-precision inputs can override
/// it through
/// [surface_type_with_tolerance](crate::source::RssaFile::surface_type_with_tolerance).
pub const RADIUS_SPREAD_TOLERANCE: f64 = 1.0e-4;

/// One surface description record from the file header
///
/// The parameter list is whatever the generating code wrote for the surface
/// card, left uninterpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceDescriptor {
    /// Id of the surface in the model
    pub id: i32,
    /// Macrobody facet info, -1 unless the file sets the macrobody flag
    pub info: i32,
    /// Surface type identifier
    pub kind: i32,
    /// Declared number of surface parameters
    pub num_params: i32,
    /// Surface parameter list
    pub params: Vec<i32>,
}

impl std::fmt::Display for SurfaceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Surface {} (type {}): {}",
            self.id,
            self.kind,
            self.params.iter().join(" ")
        )
    }
}

/// Inferred geometry of the recorded track set
///
/// With more than one surface in the header there is no single answer, so
/// the classification gives up rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SurfaceType {
    /// All tracks sit on a cylinder around the z-axis
    Cylindrical,
    /// A single surface that is not a cylinder
    Planar,
    /// More than one recording surface
    Multiple,
}

impl std::fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Cylindrical => write!(f, "cylindrical"),
            Self::Planar => write!(f, "planar"),
            Self::Multiple => write!(f, "multiple"),
        }
    }
}
