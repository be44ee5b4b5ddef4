//! Particle track records and the in-memory track table
//!
//! Every particle crossing recorded in an RSSA file is an 11-value record.
//! The values are packed in a fixed order, so the storage layer is a dense
//! table addressed by offset and all of the useful views are computed on
//! demand from it.
//!
//! The packed flag in the second slot conflates the particle type with the
//! sign of the third direction cosine, so it is kept opaque here and only
//! exposed through the named decode methods.

// internal modules
use crate::source::Particle;

/// Packed flag magnitudes below this are neutrons, the rest photons
///
/// The flag value starts with 8 for neutrons and 16 for photons, followed by
/// eight digits, so anything below 9e8 can only be a neutron.
pub const NEUTRON_FLAG_LIMIT: f64 = 9.0e8;

/// Number of values recorded for each particle crossing
pub const VALUES_PER_TRACK: usize = 11;

// Fixed field order of the 11 packed values
const COL_HISTORY: usize = 0;
const COL_FLAG: usize = 1;
const COL_WEIGHT: usize = 2;
const COL_ENERGY: usize = 3;
const COL_TIME: usize = 4;
const COL_X: usize = 5;
const COL_Y: usize = 6;
const COL_Z: usize = 7;
const COL_U: usize = 8;
const COL_V: usize = 9;
const COL_SURFACE: usize = 10;

/// One recorded particle crossing
///
/// A thin view over the 11 packed values of a track record. The raw slots
/// are deliberately private since two of them carry multiple meanings; the
/// named methods are the only decode operations.
///
/// The third direction cosine is not stored in the file. It is recovered
/// from `u`, `v`, and the sign carried by the packed flag:
///
/// ```rust
/// # use rssa::source::Track;
/// let track = Track::from_values([1.0, -8.0e8, 1.0, 14.1, 0.0,
///                                 50.0, 0.0, 10.0, 0.6, 0.0, 101.0]);
/// let w = track.third_cosine_sign()
///     * (1.0 - track.u().powi(2) - track.v().powi(2)).sqrt();
/// assert!((w + 0.8).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    values: [f64; VALUES_PER_TRACK],
}

impl Track {
    /// Wrap a decoded 11-value record
    pub fn from_values(values: [f64; VALUES_PER_TRACK]) -> Self {
        Self { values }
    }

    /// History number of the source particle that produced this track
    pub fn history(&self) -> f64 {
        self.values[COL_HISTORY].abs()
    }

    /// An uncollided particle is recorded with a negative history number
    pub fn is_uncollided(&self) -> bool {
        self.values[COL_HISTORY] < 0.0
    }

    /// Neutron tracks have a packed flag magnitude below 9e8
    pub fn is_neutron(&self) -> bool {
        self.values[COL_FLAG].abs() < NEUTRON_FLAG_LIMIT
    }

    /// Anything that is not a neutron is a photon
    pub fn is_photon(&self) -> bool {
        !self.is_neutron()
    }

    /// Check the track against a particle selector
    pub fn is_kind(&self, particle: Particle) -> bool {
        match particle {
            Particle::Neutron => self.is_neutron(),
            Particle::Photon => self.is_photon(),
        }
    }

    /// Sign of the third direction cosine, carried by the packed flag
    pub fn third_cosine_sign(&self) -> f64 {
        self.values[COL_FLAG].signum()
    }

    /// Statistical weight of the particle
    pub fn weight(&self) -> f64 {
        self.values[COL_WEIGHT]
    }

    /// Particle energy (MeV)
    pub fn energy(&self) -> f64 {
        self.values[COL_ENERGY]
    }

    /// Time of the crossing (shakes)
    pub fn time(&self) -> f64 {
        self.values[COL_TIME]
    }

    /// Position x coordinate (cm)
    pub fn x(&self) -> f64 {
        self.values[COL_X]
    }

    /// Position y coordinate (cm)
    pub fn y(&self) -> f64 {
        self.values[COL_Y]
    }

    /// Position z coordinate (cm)
    pub fn z(&self) -> f64 {
        self.values[COL_Z]
    }

    /// Direction cosine with the x-axis
    pub fn u(&self) -> f64 {
        self.values[COL_U]
    }

    /// Direction cosine with the y-axis
    pub fn v(&self) -> f64 {
        self.values[COL_V]
    }

    /// Id of the surface the particle crossed
    pub fn surface_id(&self) -> f64 {
        self.values[COL_SURFACE]
    }

    /// Distance from the z-axis (cm)
    pub fn radius(&self) -> f64 {
        self.x().hypot(self.y())
    }
}

/// Dense table of every track recorded in a file
///
/// One contiguous row per crossing, read-only once decoded. All of the
/// derived views below are recomputed from the backing rows on every call,
/// so repeated calls on an unmodified table always agree and nothing is
/// cached.
///
/// MCNP records the values as 8-byte floats, so a large table is ~88 bytes
/// per track as a rough guide.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackTable {
    tracks: Vec<Track>,
}

impl TrackTable {
    /// Build a table from decoded rows
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Number of recorded tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// A table with no tracks at all
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All rows in file order
    pub fn rows(&self) -> &[Track] {
        &self.tracks
    }

    /// Position x coordinates of every track
    pub fn x(&self) -> impl Iterator<Item = f64> + '_ {
        self.tracks.iter().map(Track::x)
    }

    /// Position y coordinates of every track
    pub fn y(&self) -> impl Iterator<Item = f64> + '_ {
        self.tracks.iter().map(Track::y)
    }

    /// Position z coordinates of every track
    pub fn z(&self) -> impl Iterator<Item = f64> + '_ {
        self.tracks.iter().map(Track::z)
    }

    /// Statistical weights of every track
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.tracks.iter().map(Track::weight)
    }

    /// Energies of every track
    pub fn energies(&self) -> impl Iterator<Item = f64> + '_ {
        self.tracks.iter().map(Track::energy)
    }

    /// History numbers of every track
    pub fn histories(&self) -> impl Iterator<Item = f64> + '_ {
        self.tracks.iter().map(Track::history)
    }

    /// Distance of every track from the z-axis
    pub fn radii(&self) -> impl Iterator<Item = f64> + '_ {
        self.tracks.iter().map(Track::radius)
    }

    /// Row mask selecting the neutron tracks
    pub fn neutron_mask(&self) -> Vec<bool> {
        self.tracks.iter().map(Track::is_neutron).collect()
    }

    /// Row mask selecting the photon tracks
    pub fn photon_mask(&self) -> Vec<bool> {
        self.tracks.iter().map(Track::is_photon).collect()
    }

    /// Row mask for either particle selector
    pub fn particle_mask(&self, particle: Particle) -> Vec<bool> {
        match particle {
            Particle::Neutron => self.neutron_mask(),
            Particle::Photon => self.photon_mask(),
        }
    }

    /// Number of tracks of the given particle type
    pub fn count(&self, particle: Particle) -> usize {
        self.tracks.iter().filter(|t| t.is_kind(particle)).count()
    }

    /// Mean distance of the tracks from the z-axis
    ///
    /// For a cylindrical surface source this is the best single estimate of
    /// the cylinder radius, and the same number is reused wherever a radius
    /// is needed downstream.
    pub fn mean_radius(&self) -> f64 {
        self.radii().sum::<f64>() / (self.len() as f64)
    }

    /// Standard deviation of the track distances from the z-axis
    pub fn radius_std(&self) -> f64 {
        let mean = self.mean_radius();
        let variance = self
            .radii()
            .map(|r| (r - mean).powi(2))
            .sum::<f64>()
            / (self.len() as f64);
        variance.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn track_with_flag(flag: f64) -> Track {
        Track::from_values([1.0, flag, 1.0, 14.1, 0.0, 50.0, 0.0, 10.0, 0.3, 0.4, 101.0])
    }

    #[rstest]
    #[case(8.0e8, true)]
    #[case(-8.0e8, true)]
    #[case(8.9e8, true)]
    #[case(9.0e8, false)]
    #[case(1.6e9, false)]
    #[case(-1.6e9, false)]
    fn flag_magnitude_classifies_particle(#[case] flag: f64, #[case] neutron: bool) {
        let track = track_with_flag(flag);
        assert_eq!(track.is_neutron(), neutron);
        assert_eq!(track.is_photon(), !neutron);
    }

    #[test]
    fn flag_sign_gives_third_cosine() {
        assert_eq!(track_with_flag(8.0e8).third_cosine_sign(), 1.0);
        assert_eq!(track_with_flag(-8.0e8).third_cosine_sign(), -1.0);
    }

    #[test]
    fn negative_history_marks_uncollided() {
        let track =
            Track::from_values([-42.0, 8.0e8, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(track.is_uncollided());
        assert_eq!(track.history(), 42.0);
    }

    #[test]
    fn masks_partition_the_table() {
        let table = TrackTable::from_tracks(vec![
            track_with_flag(8.0e8),
            track_with_flag(1.6e9),
            track_with_flag(-8.0e8),
        ]);

        let neutrons = table.neutron_mask();
        let photons = table.photon_mask();
        assert_eq!(neutrons, vec![true, false, true]);
        assert_eq!(photons, vec![false, true, false]);
        assert_eq!(table.count(Particle::Neutron), 2);
        assert_eq!(table.count(Particle::Photon), 1);
    }

    #[test]
    fn views_are_idempotent() {
        let table = TrackTable::from_tracks(vec![
            track_with_flag(8.0e8),
            track_with_flag(1.6e9),
        ]);
        assert_eq!(table.neutron_mask(), table.neutron_mask());
        assert_eq!(
            table.particle_mask(Particle::Photon),
            table.particle_mask(Particle::Photon)
        );
        assert_eq!(table.mean_radius(), table.mean_radius());
    }

    #[test]
    fn radius_statistics() {
        // two tracks at radius 3 and 5 from the axis
        let a = Track::from_values([1.0, 8.0e8, 1.0, 1.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let b = Track::from_values([1.0, 8.0e8, 1.0, 1.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 1.0]);
        let table = TrackTable::from_tracks(vec![a, b]);

        assert_eq!(table.mean_radius(), 4.0);
        assert_eq!(table.radius_std(), 1.0);
    }
}
