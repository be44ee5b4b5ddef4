//! # The Rssa crate
//!
//! Analysis tools for interacting with MCNP RSSA surface source files
//!
//! ## Installation
//!
//! Direct install from github:
//!
//! ```shell
//! cargo install --git https://github.com/repositony/rssa.git
//! ```
//!
//! ## Overview
//!
//! RSSA files record every particle crossing of the surfaces named on an SSW
//! card, and routinely run to several GB. This crate decodes them quickly
//! and turns the raw track data into something useful.
//!
//! | Command line | Description                                            |
//! | ------------ | ------------------------------------------------------ |
//! | `rssa`       | Inspect RSSA files and bin surface current maps        |
//!
//! The tool is fully documented with detailed `--help` messages, including
//! examples for common use cases.
//!
//! ### Supported formats
//!
//! Only RSSA files written by D1SUNED with 11 values per particle record
//! are currently understood. Other writers put different information in the
//! headers, and will be refused rather than half-decoded. Support can be
//! extended as files from other code versions become available for testing.
//!
//! ### Supported surfaces
//!
//! Current maps are binned for cylindrical surface sources. The surface
//! geometry is never stated by the file, so it is inferred from the spread
//! of recorded track radii. Planar sources follow a very different plotting
//! logic and are not currently implemented.
//!
//! ## Advanced use
//!
//! Anyone reading these docs is likely familiar with Rust, so between us the
//! command line tool is purely for colleagues and convenience. The crate
//! itself is a lot more useful to those who use Rust, since the challenge
//! with RSSA files is always decoding the undocumented binary layout.
//!
//! ```ignore
//! // import the crate
//! use rssa::read_rssa;
//!
//! // decode a surface source file, header and full track table
//! let rssa = read_rssa("./data/small_cyl.w").unwrap();
//!
//! // now do whatever you want with it:
//! //  - check the surface classification,
//! //  - filter the track table,
//! //  - bin a current density map,
//! //  - etc...
//! println!("{rssa}");
//! ```
//!
//! As an overview:
//! - The [source] module contains all of the relevant structures and
//!   functionality needed for most things.
//! - The [current] module bins filtered track sets into current density
//!   maps with per-cell statistical errors.
//! - The [error] module defines the failure taxonomy; everything is fatal
//!   and nothing is silently coerced.
//!
//! In the background, fixed-layout record payloads are decoded with
//! `bincode`, the variable-layout surface records with the `nom` combinator
//! library, and `clap` is used for the command line interface.
//!
//! The entire file is held in memory for the lifetime of the session, which
//! is the trade that makes multi-GB files load in seconds rather than
//! minutes. MCNP records the equivalent of f64 internally, so a loaded
//! [RssaFile](crate::source::RssaFile) is ~88 bytes per track as a rough
//! guide.
//!
//! All of the useful functionality from the file readers and core data
//! structures are re-exported for convenience.

// Public facing modules
pub mod current;
pub mod error;
pub mod source;
pub mod utils;

// note that docs are hidden to prevent confusing the current simple API
pub mod readers;

// Re-exports of useful data structures
#[doc(inline)]
pub use crate::readers::read_rssa;

#[doc(inline)]
pub use crate::error::{Result, RssaError};
