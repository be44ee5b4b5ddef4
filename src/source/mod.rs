//! Core surface source data structures
//!
//! # Overview
//!
//! Module for storing and using the data decoded from an RSSA file. All of
//! the reader logic is re-exported to make loading a file very simple.
//!
//! ```ignore
//! // Decode a surface source file into an RssaFile
//! let rssa = rssa::read_rssa("./data/small_cyl.w")?;
//!
//! // print a summary of the file (Display trait implemented)
//! println!("{rssa}");
//! ```
//!
//! The decoded data live in the common [RssaFile] type: the header
//! [Parameters], the [SurfaceDescriptor] list, and the [TrackTable] with one
//! [Track] per recorded particle crossing. Everything is immutable after
//! the load, and the derived views (masks, field accessors, surface
//! classification) are recomputed from the backing table on every call.

// Split into subfiles for development, but anything important is re-exported
mod core;
mod particle;
mod surface;
mod track;

// inline important the source-related modules for a nice public API
#[doc(inline)]
pub use crate::source::core::{Parameters, RssaFile};

#[doc(inline)]
pub use crate::source::particle::Particle;

#[doc(inline)]
pub use crate::source::surface::{SurfaceDescriptor, SurfaceType, RADIUS_SPREAD_TOLERANCE};

#[doc(inline)]
pub use crate::source::track::{Track, TrackTable, NEUTRON_FLAG_LIMIT, VALUES_PER_TRACK};

#[doc(inline)]
pub use crate::readers::read_rssa;
