//! Core representation of a loaded RSSA file
//!
//! An [RssaFile] owns everything decoded from one file: the header
//! parameters, the surface list, and the full track table. Once loaded it is
//! never mutated, and every loaded file is independent of every other, so
//! instances can be shared or moved across threads freely.

// internal modules
use crate::source::surface::RADIUS_SPREAD_TOLERANCE;
use crate::source::{Particle, SurfaceDescriptor, SurfaceType, TrackTable};
use crate::utils::f;

// external crates
use itertools::Itertools;
use serde::Serialize;

/// Scalar parameters decoded from the RSSA header records
///
/// Field names follow the internal FORTRAN MCNP variables, which helps
/// maintain consistency with the underlying data for the developer. See the
/// surface source appendix of the MCNP user manuals for the gory details.
#[derive(Debug, Clone, Serialize)]
pub struct Parameters {
    /// Code name, version, date and title line from the first record
    pub identifier: String,
    /// Number of histories of the simulation, given as a negative number
    pub np1: i64,
    /// Number of tracks recorded
    pub nrss: i64,
    /// Number of values recorded for each particle, always 11
    pub nrcd: i32,
    /// Number of surfaces recorded
    pub njsw: i32,
    /// Number of different histories that reached the recording surfaces
    pub niss: i64,
    /// Number of cell records
    pub niwr: i32,
    /// Source particle type
    pub mipts: i32,
    /// Flag for macrobody surfaces
    pub kjaq: i32,
    /// One descriptor per recording surface
    pub surfaces: Vec<SurfaceDescriptor>,
}

impl Parameters {
    /// True history count of the simulation
    ///
    /// The format stores `np1` negated; the sign carries no other meaning.
    pub fn histories(&self) -> i64 {
        self.np1.abs()
    }
}

/// A fully decoded RSSA surface source file
///
/// ```ignore
/// let rssa = rssa::read_rssa("./data/small_cyl.w")?;
/// println!("{rssa}");
/// ```
#[derive(Debug, Clone)]
pub struct RssaFile {
    /// Path the file was read from
    pub path: String,
    /// Decoded header parameters and surface list
    pub parameters: Parameters,
    /// Dense table of every recorded track
    pub tracks: TrackTable,
}

impl RssaFile {
    /// Classify the recorded surface set from the track positions
    ///
    /// A single surface is a cylinder if the spread of track radii stays
    /// below [RADIUS_SPREAD_TOLERANCE], otherwise a plane. Multiple
    /// surfaces are left unclassified.
    pub fn surface_type(&self) -> SurfaceType {
        self.surface_type_with_tolerance(RADIUS_SPREAD_TOLERANCE)
    }

    /// Surface classification with a caller-supplied radius tolerance
    pub fn surface_type_with_tolerance(&self, tolerance: f64) -> SurfaceType {
        // more than one surface and there is no single answer
        if self.parameters.surfaces.len() > 1 {
            return SurfaceType::Multiple;
        }

        // assume a cylinder and check how well the track radii agree
        if self.tracks.radius_std() < tolerance {
            SurfaceType::Cylindrical
        } else {
            SurfaceType::Planar
        }
    }

    /// Human-readable summary of the file contents
    ///
    /// Derived entirely from the parameters and track table, so it can be
    /// regenerated at any time.
    pub fn get_info(&self) -> String {
        let mut info = f!(
            "RSSA file {} was recorded using the following surfaces:\n",
            self.path
        );
        info += &self
            .parameters
            .surfaces
            .iter()
            .map(|s| f!("  Surface id: {}", s.id))
            .join("\n");
        info += "\n";

        match self.surface_type() {
            SurfaceType::Cylindrical => {
                info += &f!(
                    "The surface type is a cylinder with a radius of {:.2}\n",
                    self.tracks.mean_radius()
                );
            }
            SurfaceType::Planar => info += "The surface type is a plane\n",
            SurfaceType::Multiple => {
                info += "Multiple surfaces were recorded, the surface type is ambiguous\n"
            }
        }

        let n_tracks = self.tracks.count(Particle::Neutron);
        let p_tracks = self.tracks.count(Particle::Photon);
        info += &f!(
            "The total amount of tracks recorded is {}, of which {} were neutrons and {} were photons.\n",
            self.parameters.nrss, n_tracks, p_tracks
        );

        info += &f!(
            "The simulation that produced this RSSA run {} histories\n",
            self.parameters.histories()
        );
        info += &f!(
            "The amount of independent histories that reached the RSSA surfaces was {}.\n",
            self.parameters.niss
        );
        info
    }
}

impl std::fmt::Display for RssaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.get_info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Track;

    fn surface(id: i32) -> SurfaceDescriptor {
        SurfaceDescriptor {
            id,
            info: -1,
            kind: 2,
            num_params: 1,
            params: vec![50],
        }
    }

    fn file_with(surfaces: Vec<SurfaceDescriptor>, tracks: Vec<Track>) -> RssaFile {
        RssaFile {
            path: "test.w".to_string(),
            parameters: Parameters {
                identifier: "d1suned test file".to_string(),
                np1: -1000,
                nrss: tracks.len() as i64,
                nrcd: 11,
                njsw: surfaces.len() as i32,
                niss: 900,
                niwr: 0,
                mipts: 1,
                kjaq: 0,
                surfaces,
            },
            tracks: TrackTable::from_tracks(tracks),
        }
    }

    fn track_at(x: f64, y: f64, z: f64, flag: f64) -> Track {
        Track::from_values([1.0, flag, 1.0, 14.1, 0.0, x, y, z, 0.3, 0.4, 101.0])
    }

    /// Tracks sitting on a radius 50 circle, with jitter well below tolerance
    fn cylinder_tracks() -> Vec<Track> {
        (0..100)
            .map(|i| {
                let theta = 0.06 * (i as f64);
                let radius = 50.0 + 1.0e-6 * ((i % 3) as f64);
                track_at(radius * theta.cos(), radius * theta.sin(), i as f64, 8.0e8)
            })
            .collect()
    }

    #[test]
    fn cylinder_is_classified_from_radius_spread() {
        let rssa = file_with(vec![surface(101)], cylinder_tracks());
        assert_eq!(rssa.surface_type(), SurfaceType::Cylindrical);
    }

    #[test]
    fn scattered_radii_classified_as_plane() {
        let tracks = (0..100)
            .map(|i| track_at(10.0 + (i as f64), 0.0, 5.0, 8.0e8))
            .collect();
        let rssa = file_with(vec![surface(101)], tracks);
        assert_eq!(rssa.surface_type(), SurfaceType::Planar);
    }

    #[test]
    fn several_surfaces_are_ambiguous() {
        let rssa = file_with(vec![surface(101), surface(102)], cylinder_tracks());
        assert_eq!(rssa.surface_type(), SurfaceType::Multiple);
    }

    #[test]
    fn tolerance_override_tightens_the_test() {
        let rssa = file_with(vec![surface(101)], cylinder_tracks());
        // the 1e-6 jitter is real, so a 1e-9 tolerance rejects the cylinder
        assert_eq!(
            rssa.surface_type_with_tolerance(1.0e-9),
            SurfaceType::Planar
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let rssa = file_with(vec![surface(101)], cylinder_tracks());
        assert_eq!(rssa.surface_type(), rssa.surface_type());
    }

    #[test]
    fn info_summarises_counts_and_histories() {
        let tracks = vec![
            track_at(50.0, 0.0, 0.0, 8.0e8),
            track_at(0.0, 50.0, 5.0, 1.6e9),
            track_at(-50.0, 0.0, 10.0, 1.6e9),
        ];
        let rssa = file_with(vec![surface(101)], tracks);
        let info = rssa.get_info();

        assert!(info.contains("Surface id: 101"));
        assert!(info.contains("cylinder with a radius of 50.00"));
        assert!(info.contains("3, of which 1 were neutrons and 2 were photons"));
        assert!(info.contains("run 1000 histories"));
        assert!(info.contains("was 900."));
    }
}
