#![doc(hidden)]
//! Library of readers for the RSSA binary format

// internal modules
use crate::error::Result;
use crate::source::RssaFile;

// standard library
use std::path::Path;

// files under the readers module
pub mod parsers;
mod rssa_file;

// inline important the reader modules for a nice API
#[doc(inline)]
pub use crate::readers::rssa_file::{RssaReader, GENERATOR_SIGNATURE};

/// Read an RSSA surface source file
///
/// Returns a result containing the [RssaFile] with all of the header
/// parameters, surface descriptors, and the full track table decoded from
/// the file at `path`.
///
/// - `path` - Path to the RSSA file, can be [&str], [String], [Path], etc...
///
/// Example
/// ```ignore
/// // Decode the full surface source file
/// let rssa: RssaFile = rssa::read_rssa("path/to/small_cyl.w")?;
/// ```
pub fn read_rssa<P: AsRef<Path>>(path: P) -> Result<RssaFile> {
    let path: &Path = Path::new(path.as_ref());
    let mut reader = RssaReader::new();
    reader.disable_progress();
    reader.parse(path)
}
