//! Cylindrical surface current binning tools
//!
//! Projects the tracks recorded on a cylindrical surface source onto a 2D
//! (z, theta) grid and normalises the result into a physical particle
//! current density, with a matching grid of relative statistical errors.
//!
//! # Details
//!
//! The grid axes always span the min/max of the tracks actually selected,
//! so the grid auto-scales to whatever survives the particle and geometry
//! filters. Each cell value is
//!
//! `sum(weights) / cell_area / histories * source_intensity`
//!
//! in particles per cm2 per second, and the relative error of a cell with
//! `N` contributing tracks is `1/sqrt(N)`. Cells that collect no tracks at
//! all are maximally uncertain and get a relative error of exactly 1.
//!
//! # Example
//!
//! Bin the neutron current of a file onto a 100x360 grid.
//!
//! ```ignore
//! # use rssa::current::{bin_cylindrical_current, BinningOptions};
//! let rssa = rssa::read_rssa("./data/small_cyl.w")?;
//!
//! let options = BinningOptions {
//!     z_bins: 100,
//!     theta_bins: 360,
//!     source_intensity: 1.7757e20,
//!     ..Default::default()
//! };
//! let grid = bin_cylindrical_current(&rssa, &options)?;
//! println!("{grid}");
//! ```

// internal modules
use crate::error::{Result, RssaError};
use crate::source::{Particle, RssaFile};
use crate::utils::*;

// external crates
use itertools::izip;
use log::debug;
use serde::Serialize;

/// Options controlling [bin_cylindrical_current]
///
/// The geometry pre-filters are exclusive ranges: a track survives the z
/// filter when `min < z < max`, and the perimeter filter when its unrolled
/// circumferential coordinate `radius * theta` lies strictly inside the
/// given bounds.
#[derive(Debug, Clone)]
pub struct BinningOptions {
    /// Which of the two particle classes to bin
    pub particle: Particle,
    /// Number of grid bins along the cylinder axis
    pub z_bins: usize,
    /// Number of grid bins around the circumference
    pub theta_bins: usize,
    /// Physical source intensity the weights are scaled by (particles/s)
    pub source_intensity: f64,
    /// Optional (min, max) filter on track z position
    pub z_range: Option<(f64, f64)>,
    /// Optional (min, max) filter on the unrolled perimeter coordinate
    pub perimeter_range: Option<(f64, f64)>,
}

impl Default for BinningOptions {
    fn default() -> Self {
        Self {
            particle: Particle::Neutron,
            z_bins: 10,
            theta_bins: 10,
            source_intensity: 1.0,
            z_range: None,
            perimeter_range: None,
        }
    }
}

/// Binned particle current over a cylindrical surface
///
/// Grids are flattened row-major with theta varying fastest, i.e. cell
/// `(i, j)` of the `z_bins x theta_bins` grid sits at `i * theta_bins + j`.
/// The extent and resolution are in the unrolled plot coordinates, with the
/// circumference measured as perimeter distance rather than angle.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentGrid {
    /// Current density per cell (particles/cm2/s)
    pub values: Vec<f64>,
    /// Relative statistical error per cell
    pub errors: Vec<f64>,
    /// Number of bins along the cylinder axis
    pub z_bins: usize,
    /// Number of bins around the circumference
    pub theta_bins: usize,
    /// Plot bounds as [perimeter_min, perimeter_max, z_min, z_max] (cm)
    pub extent: [f64; 4],
    /// Physical area of a single cell (cm2)
    pub cell_area: f64,
    /// Cell size as [arc length, z length] (cm)
    pub resolution: [f64; 2],
}

impl CurrentGrid {
    /// Current density of the cell at z index `i`, theta index `j`
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.theta_bins + j]
    }

    /// Relative error of the cell at z index `i`, theta index `j`
    pub fn error(&self, i: usize, j: usize) -> f64 {
        self.errors[i * self.theta_bins + j]
    }

    /// Log10 colour scale bounds for plotting the values grid
    ///
    /// Either derived from an explicit (min, max) value range, or taken as
    /// the decade above the peak cell value with ten decades below it.
    pub fn log_decades(&self, value_range: Option<(f64, f64)>) -> (i32, i32) {
        match value_range {
            Some((low, high)) => (low.log10() as i32, high.log10() as i32),
            None => {
                // the +1 is needed so a peak of 1234 rounds up to 10,000
                let log_max = vec_f64_max(&self.values).log10() as i32 + 1;
                (log_max - 10, log_max)
            }
        }
    }
}

impl std::fmt::Display for CurrentGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "CurrentGrid {\n".to_string();
        s += &f!("    bins: {}x{} (z x theta)\n", self.z_bins, self.theta_bins);
        s += &f!("    cell area: {:.2} cm2\n", self.cell_area);
        s += &f!(
            "    resolution: {:.2}cm x {:.2}cm\n",
            self.resolution[0],
            self.resolution[1]
        );
        s += &f!(
            "    extent: {:.2} to {:.2} (perimeter), {:.2} to {:.2} (z)\n}}",
            self.extent[0],
            self.extent[1],
            self.extent[2],
            self.extent[3]
        );
        write!(f, "{s}")
    }
}

/// Bin the surface current of one particle class onto a (z, theta) grid
///
/// Tracks are selected by particle type and any geometry pre-filters in the
/// [BinningOptions], then accumulated into the grid cell their position
/// falls in. A track sitting exactly on the upper edge of an axis lands in
/// the last bin rather than one past the end.
///
/// The cylinder radius is estimated as the mean track distance from the
/// z-axis, and that one estimate is used for the perimeter filter, cell
/// area, extent, and resolution alike.
///
/// Fails with [RssaError::EmptySelection] when the filters leave nothing to
/// bin, rather than returning a garbage grid.
pub fn bin_cylindrical_current(rssa: &RssaFile, options: &BinningOptions) -> Result<CurrentGrid> {
    if options.z_bins == 0 || options.theta_bins == 0 {
        return Err(RssaError::InvalidArgument(f!(
            "bin counts must be positive, requested {}x{}",
            options.z_bins,
            options.theta_bins
        )));
    }

    // one radius estimate, reused for everything below
    let radius = rssa.tracks.mean_radius();

    // select tracks by particle type, then by the geometry pre-filters
    let mut z_values: Vec<f64> = Vec::new();
    let mut theta_values: Vec<f64> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();
    for track in rssa.tracks.rows() {
        if !track.is_kind(options.particle) {
            continue;
        }

        let z = track.z();
        if let Some((min, max)) = options.z_range {
            if z <= min || z >= max {
                continue;
            }
        }

        // angle around the cylinder in radians, (-pi, pi]
        let theta = track.y().atan2(track.x());
        if let Some((min, max)) = options.perimeter_range {
            let perimeter = radius * theta;
            if perimeter <= min || perimeter >= max {
                continue;
            }
        }

        z_values.push(z);
        theta_values.push(theta);
        weights.push(track.weight());
    }

    if weights.is_empty() {
        return Err(RssaError::EmptySelection(f!(
            "no {} tracks left after filtering",
            options.particle
        )));
    }
    debug!("Selected {} of {} tracks", weights.len(), rssa.tracks.len());

    // axes span the selection only, so the grid scales to the plotted data
    let z_axis = linspace(
        *vec_f64_min(&z_values),
        *vec_f64_max(&z_values),
        options.z_bins + 1,
    );
    let theta_axis = linspace(
        *vec_f64_min(&theta_values),
        *vec_f64_max(&theta_values),
        options.theta_bins + 1,
    );

    // accumulate weights and contributing track counts per cell
    let mut values = vec![0.0; options.z_bins * options.theta_bins];
    let mut counts = vec![0_u64; options.z_bins * options.theta_bins];
    for (z, theta, weight) in izip!(&z_values, &theta_values, &weights) {
        let cell = bin_index(*z, &z_axis) * options.theta_bins + bin_index(*theta, &theta_axis);
        values[cell] += *weight;
        counts[cell] += 1;
    }

    // normalise to a physical current density per cell
    let delta_theta = theta_axis[1] - theta_axis[0];
    let delta_z = z_axis[1] - z_axis[0];
    let cell_area = (radius * delta_theta * delta_z).abs();
    let histories = rssa.parameters.histories() as f64;
    for value in &mut values {
        *value = *value / cell_area / histories * options.source_intensity;
    }

    // empty cells are maximally uncertain, everything else is 1/sqrt(N)
    let errors = counts
        .iter()
        .map(|&n| 1.0 / ((n.max(1)) as f64).sqrt())
        .collect();

    Ok(CurrentGrid {
        values,
        errors,
        z_bins: options.z_bins,
        theta_bins: options.theta_bins,
        extent: [
            radius * theta_axis[0],
            radius * theta_axis[options.theta_bins],
            z_axis[0],
            z_axis[options.z_bins],
        ],
        cell_area,
        resolution: [radius * delta_theta, delta_z],
    })
}

/// Map a value onto its bin index along an axis of evenly spaced edges
///
/// A value sitting exactly on the upper axis edge belongs to the last bin
/// rather than one past the end.
fn bin_index(value: f64, axis: &[f64]) -> usize {
    let step = axis[1] - axis[0];
    let index = ((value - axis[0]) / step).floor() as usize;
    index.min(axis.len() - 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Parameters, SurfaceDescriptor, Track, TrackTable};
    use rstest::rstest;

    /// A track on the radius 50 cylinder at the given angle and height
    fn track_at(theta: f64, z: f64, flag: f64, weight: f64) -> Track {
        Track::from_values([
            1.0,
            flag,
            weight,
            14.1,
            0.0,
            50.0 * theta.cos(),
            50.0 * theta.sin(),
            z,
            0.3,
            0.4,
            101.0,
        ])
    }

    fn test_file(np1: i64, tracks: Vec<Track>) -> RssaFile {
        RssaFile {
            path: "test.w".to_string(),
            parameters: Parameters {
                identifier: "d1suned test file".to_string(),
                np1,
                nrss: tracks.len() as i64,
                nrcd: 11,
                njsw: 1,
                niss: 900,
                niwr: 0,
                mipts: 1,
                kjaq: 0,
                surfaces: vec![SurfaceDescriptor {
                    id: 101,
                    info: -1,
                    kind: 2,
                    num_params: 1,
                    params: vec![50],
                }],
            },
            tracks: TrackTable::from_tracks(tracks),
        }
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(2.5, 0)]
    #[case(5.0, 1)]
    #[case(7.5, 1)]
    #[case(10.0, 1)] // exactly on the upper edge stays in the last bin
    fn bin_index_maps_onto_axis(#[case] value: f64, #[case] expected: usize) {
        let axis = [0.0, 5.0, 10.0];
        assert_eq!(bin_index(value, &axis), expected);
    }

    #[test]
    fn three_photon_tracks_fill_two_z_bins() {
        // photons at z = 0, 5, 10 spread around the circumference
        let tracks = vec![
            track_at(0.0, 0.0, 9.0e8, 1.0),
            track_at(1.0, 5.0, 9.0e8, 1.0),
            track_at(2.0, 10.0, 9.0e8, 1.0),
        ];
        let rssa = test_file(-1000, tracks);

        // the photon mask selects everything, the neutron mask nothing
        assert_eq!(rssa.tracks.count(Particle::Photon), 3);
        assert_eq!(rssa.tracks.count(Particle::Neutron), 0);

        let options = BinningOptions {
            particle: Particle::Photon,
            z_bins: 2,
            theta_bins: 1,
            ..Default::default()
        };
        let grid = bin_cylindrical_current(&rssa, &options).unwrap();

        // one track lands in [0, 5), two in [5, 10]
        assert!(grid.value(0, 0) > 0.0);
        assert!(grid.value(1, 0) > 0.0);
        assert_eq!(grid.value(1, 0), 2.0 * grid.value(0, 0));
        assert_eq!(grid.error(0, 0), 1.0);
        assert_eq!(grid.error(1, 0), 1.0 / 2.0_f64.sqrt());
    }

    #[test]
    fn normalisation_conserves_weight() {
        let tracks: Vec<Track> = (0..50)
            .map(|i| {
                let theta = -3.0 + 0.12 * (i as f64);
                track_at(theta, (i % 7) as f64, 8.0e8, 0.5 + 0.01 * (i as f64))
            })
            .collect();
        let total_weight: f64 = tracks.iter().map(Track::weight).sum();
        let rssa = test_file(-2000, tracks);

        let options = BinningOptions {
            particle: Particle::Neutron,
            z_bins: 4,
            theta_bins: 6,
            source_intensity: 1.7757e20,
            ..Default::default()
        };
        let grid = bin_cylindrical_current(&rssa, &options).unwrap();

        // undo the normalisation cell by cell and compare against the input
        let binned: f64 = grid.values.iter().sum::<f64>() * grid.cell_area * 2000.0
            / options.source_intensity;
        assert!((binned - total_weight).abs() < 1.0e-9 * total_weight);
    }

    #[test]
    fn empty_cells_have_unit_error() {
        // tracks in opposite grid corners leave the other cells empty
        let tracks = vec![
            track_at(-1.0, 0.0, 8.0e8, 1.0),
            track_at(1.0, 10.0, 8.0e8, 1.0),
        ];
        let rssa = test_file(-1000, tracks);

        let options = BinningOptions {
            z_bins: 2,
            theta_bins: 2,
            ..Default::default()
        };
        let grid = bin_cylindrical_current(&rssa, &options).unwrap();

        assert_eq!(grid.value(0, 1), 0.0);
        assert_eq!(grid.error(0, 1), 1.0);
        assert_eq!(grid.value(1, 0), 0.0);
        assert_eq!(grid.error(1, 0), 1.0);
    }

    #[test]
    fn zero_bin_counts_are_rejected() {
        let rssa = test_file(-1000, vec![track_at(0.0, 0.0, 8.0e8, 1.0)]);
        let options = BinningOptions {
            z_bins: 0,
            ..Default::default()
        };

        let result = bin_cylindrical_current(&rssa, &options);
        assert!(matches!(result, Err(RssaError::InvalidArgument(_))));
    }

    #[test]
    fn missing_particle_class_is_an_empty_selection() {
        // an all-neutron file binned as photons
        let rssa = test_file(-1000, vec![track_at(0.0, 0.0, 8.0e8, 1.0)]);
        let options = BinningOptions {
            particle: Particle::Photon,
            ..Default::default()
        };

        let result = bin_cylindrical_current(&rssa, &options);
        assert!(matches!(result, Err(RssaError::EmptySelection(_))));
    }

    #[test]
    fn filters_that_remove_everything_are_an_empty_selection() {
        let rssa = test_file(-1000, vec![track_at(0.0, 5.0, 8.0e8, 1.0)]);
        let options = BinningOptions {
            z_range: Some((100.0, 200.0)),
            ..Default::default()
        };

        let result = bin_cylindrical_current(&rssa, &options);
        assert!(matches!(result, Err(RssaError::EmptySelection(_))));
    }

    #[test]
    fn range_filters_restrict_the_axes() {
        let tracks = vec![
            track_at(0.5, -50.0, 8.0e8, 1.0), // excluded by the z filter
            track_at(0.5, 2.0, 8.0e8, 1.0),
            track_at(0.5, 8.0, 8.0e8, 1.0),
            track_at(0.5, 50.0, 8.0e8, 1.0), // excluded by the z filter
        ];
        let rssa = test_file(-1000, tracks);

        let options = BinningOptions {
            z_bins: 2,
            theta_bins: 1,
            z_range: Some((0.0, 10.0)),
            ..Default::default()
        };
        let grid = bin_cylindrical_current(&rssa, &options).unwrap();

        // the z extent spans the surviving tracks only
        assert_eq!(grid.extent[2], 2.0);
        assert_eq!(grid.extent[3], 8.0);
    }

    #[test]
    fn perimeter_filter_uses_the_mean_radius() {
        // radius 50, so theta 1.0 sits at perimeter 50
        let tracks = vec![
            track_at(0.0, 0.0, 8.0e8, 1.0),
            track_at(0.2, 5.0, 8.0e8, 1.0),
            track_at(1.0, 10.0, 8.0e8, 1.0),
        ];
        let rssa = test_file(-1000, tracks);

        let options = BinningOptions {
            z_bins: 1,
            theta_bins: 1,
            perimeter_range: Some((-1.0, 20.0)),
            ..Default::default()
        };
        let grid = bin_cylindrical_current(&rssa, &options).unwrap();

        // only the first two tracks sit below perimeter 20
        assert_eq!(grid.error(0, 0), 1.0 / 2.0_f64.sqrt());
        assert_eq!(grid.extent[3], 5.0);
    }

    #[test]
    fn log_decades_follow_the_peak_value() {
        let tracks = vec![
            track_at(0.0, 0.0, 8.0e8, 1.0),
            track_at(1.0, 10.0, 8.0e8, 1.0),
        ];
        let rssa = test_file(-1000, tracks);
        let grid = bin_cylindrical_current(
            &rssa,
            &BinningOptions {
                z_bins: 1,
                theta_bins: 1,
                ..Default::default()
            },
        )
        .unwrap();

        let (low, high) = grid.log_decades(Some((1.0e2, 1.0e8)));
        assert_eq!((low, high), (2, 8));

        let (low, high) = grid.log_decades(None);
        assert_eq!(high - low, 10);
    }
}
