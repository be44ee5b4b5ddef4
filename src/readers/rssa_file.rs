//! Reader for MCNP RSSA surface source binaries
//!
//! The file is a sequence of Fortran-style framed records. Every record is
//! bracketed by two 4-byte little-endian integers holding its byte length,
//! and a mismatch between the two means the file is corrupt or not an RSSA
//! file at all.
//!
//! The header records are decoded one at a time. The particle records that
//! follow always have the same 96-byte length, so the whole remaining file
//! is read in a single pass and decoded record-by-record from memory. This
//! was the difference between minutes and seconds on multi-GB files, which
//! are entirely typical for surface sources written at ITER scale.
//!
//! Only files written with the negative-history-count convention and 11
//! values per particle record are understood. Anything else is refused
//! outright rather than half-decoded.

// internal modules
use crate::error::{Result, RssaError};
use crate::readers::parsers;
use crate::source::{Parameters, RssaFile, SurfaceDescriptor, Track, TrackTable};
use crate::source::VALUES_PER_TRACK;
use crate::utils::f;

// standard library
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, trace};
use serde::Deserialize;

/// Generator signature expected in the identification record
///
/// Files from other code versions carry different headers and are refused
/// rather than guessed at.
pub const GENERATOR_SIGNATURE: &str = "d1suned";

/// Full byte length of one framed particle record
const TRACK_RECORD_LENGTH: usize = 96;

/// Byte length of the 11 packed doubles inside a particle record
const TRACK_PAYLOAD_LENGTH: usize = 88;

/// A reader for RSSA surface source binaries
///
/// Decodes the header records and the full particle track table in two
/// stages. Any framing or layout problem aborts the whole load; no partial
/// table is ever returned.
///
/// Example:
/// ```ignore
///     let path = Path::new("./data/small_cyl.w");
///     let reader = RssaReader::new();
///     let rssa = reader.parse(path).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct RssaReader {
    /// Disable progress bar?
    disable_progress: bool,
}

/// Fixed-offset count block of the second header record
///
/// `np1 i64 @0`, `nrss i64 @8`, `nrcd i32 @16`, `njsw i32 @20`, `niss i64
/// @24`. Anything after byte 32 is ignored.
#[derive(Debug, Deserialize)]
struct CountRecord {
    np1: i64,
    nrss: i64,
    nrcd: i32,
    njsw: i32,
    niss: i64,
}

/// Three-integer flag block of the third header record
#[derive(Debug, Deserialize)]
struct FlagRecord {
    niwr: i32,
    mipts: i32,
    kjaq: i32,
}

/// High level methods
impl RssaReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Do not print the tqdm progress indicators
    pub fn disable_progress(&mut self) {
        debug!("Progress bar disabled");
        self.disable_progress = true;
    }

    /// Parse a full RSSA file into an [RssaFile]
    pub fn parse(&self, path: &Path) -> Result<RssaFile> {
        debug!("Reading {}", path.display());
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.parse_reader(&mut reader, &path.display().to_string())
    }

    /// Decode header and tracks from any byte stream
    fn parse_reader<R: Read>(&self, reader: &mut R, path: &str) -> Result<RssaFile> {
        let parameters = Self::read_header(reader)?;
        let tracks = self.read_tracks(reader, &parameters)?;

        Ok(RssaFile {
            path: path.to_string(),
            parameters,
            tracks,
        })
    }
}

/// Framed record IO
impl RssaReader {
    /// Read one length-framed record into an owned buffer
    ///
    /// The stream is left positioned immediately past the trailing length
    /// marker, ready for the next record.
    fn read_record<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
        let prefix = Self::read_marker(reader)?;
        if prefix < 0 {
            return Err(RssaError::Format(f!(
                "record declares a negative length of {prefix} bytes"
            )));
        }

        let mut data = vec![0_u8; prefix as usize];
        reader.read_exact(&mut data)?;

        let suffix = Self::read_marker(reader)?;
        if prefix != suffix {
            return Err(RssaError::Format(f!(
                "the integers before and after a record are not equal ({prefix} != {suffix})"
            )));
        }

        Ok(data)
    }

    /// Read a single 4-byte record length marker
    fn read_marker<R: Read>(reader: &mut R) -> Result<i32> {
        let mut buffer = [0_u8; 4];
        reader.read_exact(&mut buffer)?;
        Ok(i32::from_le_bytes(buffer))
    }
}

/// Header records
impl RssaReader {
    /// Decode the fixed sequence of header records
    fn read_header<R: Read>(reader: &mut R) -> Result<Parameters> {
        // identification record, with the code version, date and title
        let data = Self::read_record(reader)?;
        let identifier = String::from_utf8(data).map_err(|_| {
            RssaError::UnsupportedFormat(
                "the identification record is not valid UTF-8 text".to_string(),
            )
        })?;
        if !identifier.contains(GENERATOR_SIGNATURE) {
            return Err(RssaError::UnsupportedFormat(f!(
                "the code that generated this RSSA file has not been implemented in this reader: {}",
                identifier.trim()
            )));
        }
        trace!("[Identification] {}", identifier.trim());

        // count record
        let data = Self::read_record(reader)?;
        let counts: CountRecord = bincode::deserialize(&data)
            .map_err(|_| RssaError::Format("count record is too short to decode".to_string()))?;
        debug!(
            "np1 {}, nrss {}, nrcd {}, njsw {}, niss {}",
            counts.np1, counts.nrss, counts.nrcd, counts.njsw, counts.niss
        );
        if counts.nrcd != VALUES_PER_TRACK as i32 {
            return Err(RssaError::UnsupportedFormat(f!(
                "the amount of values recorded for each particle should be {VALUES_PER_TRACK} instead of {}",
                counts.nrcd
            )));
        }

        // the flags record only exists for the negative history convention
        if counts.np1 >= 0 {
            return Err(RssaError::UnsupportedFormat(f!(
                "the np1 value is {}, as far as we understand it should be negative",
                counts.np1
            )));
        }
        let data = Self::read_record(reader)?;
        let flags: FlagRecord = bincode::deserialize(&data)
            .map_err(|_| RssaError::Format("flags record is too short to decode".to_string()))?;
        debug!(
            "niwr {}, mipts {}, kjaq {}",
            flags.niwr, flags.mipts, flags.kjaq
        );

        // one record per recording surface
        let mut surfaces: Vec<SurfaceDescriptor> = Vec::with_capacity(counts.njsw as usize);
        for _ in 0..counts.njsw {
            let data = Self::read_record(reader)?;
            let (_, surface) = parsers::surface_record(&data, flags.kjaq).map_err(|_| {
                RssaError::Format("surface record is too short to decode".to_string())
            })?;

            // the declared count is the only cross-check the record offers
            if surface.params.len() != surface.num_params as usize {
                return Err(RssaError::Format(f!(
                    "surface {} declares {} parameters but contains {}",
                    surface.id,
                    surface.num_params,
                    surface.params.len()
                )));
            }

            trace!("[Surface] {surface}");
            surfaces.push(surface);
        }

        // any extra cell records would follow here, but no known case of
        // their actual utility exists and the layout is undocumented
        if flags.niwr > 0 {
            return Err(RssaError::UnsupportedFormat(f!(
                "the file contains {} cell records, behaviour not implemented",
                flags.niwr
            )));
        }

        // summary record holds nothing of interest downstream, discard it
        let _summary = Self::read_record(reader)?;

        Ok(Parameters {
            identifier,
            np1: counts.np1,
            nrss: counts.nrss,
            nrcd: counts.nrcd,
            njsw: counts.njsw,
            niss: counts.niss,
            niwr: flags.niwr,
            mipts: flags.mipts,
            kjaq: flags.kjaq,
            surfaces,
        })
    }
}

/// Bulk particle records
impl RssaReader {
    /// Decode every remaining particle record into a [TrackTable]
    ///
    /// The tail of the file is one fixed-length record per track, so the
    /// whole thing is read in a single pass and split on the known stride.
    /// The inner length markers of every record are still checked; a fixed
    /// stride over corrupt data would otherwise decode garbage silently.
    fn read_tracks<R: Read>(&self, reader: &mut R, parameters: &Parameters) -> Result<TrackTable> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        if data.len() % TRACK_RECORD_LENGTH != 0 {
            return Err(RssaError::Format(f!(
                "track data length of {} bytes is not a multiple of the {TRACK_RECORD_LENGTH} byte record size",
                data.len()
            )));
        }

        let n_records = data.len() / TRACK_RECORD_LENGTH;
        debug!("Decoding {n_records} track records");
        let mut progress_bar = self.init_progress_bar(n_records);

        let mut tracks: Vec<Track> = Vec::with_capacity(n_records);
        for (index, record) in data.chunks_exact(TRACK_RECORD_LENGTH).enumerate() {
            progress_bar.update(1).unwrap();

            // both markers bracket the 88-byte payload
            let prefix = i32::from_le_bytes(record[..4].try_into().unwrap());
            let suffix = i32::from_le_bytes(record[TRACK_RECORD_LENGTH - 4..].try_into().unwrap());
            if prefix != TRACK_PAYLOAD_LENGTH as i32 || suffix != TRACK_PAYLOAD_LENGTH as i32 {
                return Err(RssaError::Format(f!(
                    "track record {index} has length markers ({prefix}, {suffix}) instead of {TRACK_PAYLOAD_LENGTH}"
                )));
            }

            let values: [f64; VALUES_PER_TRACK] =
                bincode::deserialize(&record[4..TRACK_RECORD_LENGTH - 4]).map_err(|_| {
                    RssaError::Format(f!("track record {index} could not be decoded"))
                })?;
            tracks.push(Track::from_values(values));
        }

        // need an extra line for clean spacing if the progress bar is printed
        if !self.disable_progress {
            eprintln!()
        };

        if tracks.len() != parameters.nrss as usize {
            return Err(RssaError::Format(f!(
                "the header declares {} tracks but the file contains {}",
                parameters.nrss,
                tracks.len()
            )));
        }

        Ok(TrackTable::from_tracks(tracks))
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self, total: usize) -> Bar {
        BarBuilder::default()
            .delay(0.0)
            .total(total)
            .unit(" tracks")
            .unit_scale(true)
            .disable(self.disable_progress)
            .build()
            .unwrap()
    }
}
