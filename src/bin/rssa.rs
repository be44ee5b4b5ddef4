//! Command line tool to inspect and plot RSSA surface source files
//!
//! Decodes the header and full track table of an MCNP RSSA binary, skipping
//! the need to open a special viewer or sort it out manually just to check
//! simple properties.
//!
//! Also bins cylindrical surface sources into a current density map with
//! per-cell statistical errors, written out as JSON for plotting.
//!
//! # Usage
//!
//! ```text
//! Usage: rssa <file> [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples,
//! default values, examples, and any important behaviour.
//!
//! ## Options
//!
//! By default a summary of the file parameters and surfaces is logged.
//!
//! ```bash
//! # Print a summary of the header, surfaces, and track counts
//! rssa small_cyl.w
//! ```
//!
//! ### Convert the header to JSON
//!
//! For lovers of python and other languages there is a JSON output option
//! with all of the decoded header parameters and surface descriptors.
//!
//! ```bash
//! # Output a file named 'rssa.json'
//! rssa small_cyl.w --json
//! ```
//!
//! ### Bin a surface current map
//!
//! Cylindrical sources can be binned onto a (z, theta) grid of current
//! density and relative error, written to a JSON file for plotting.
//!
//! ```bash
//! # 100 axial and 360 circumferential bins, neutrons only
//! rssa small_cyl.w --current         \
//!             --particle n           \
//!             --z-bins 100           \
//!             --theta-bins 360       \
//!             --intensity 1.7757e20
//! ```
//!
//! The axial and perimeter ranges may be restricted to zoom the grid into a
//! region of interest before binning.
//!
//! ```bash
//! # Only tracks with z in (-200, 600) and perimeter in (0, 150)
//! rssa small_cyl.w --current --z-range -200 600 --perimeter-range 0 150
//! ```
//!
//! ### Change the output file names
//!
//! By default the file names are 'rssa.json' for the header data and
//! 'current.json' for the binned grids.
//!
//! This can be changed by providing --output with a name
//!
//! ```bash
//! # Output files named 'myfile.json' and 'myfile_current.json'
//! rssa small_cyl.w --json --current --output myfile
//! ```

// standard libraries
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// crate modules
use rssa::current::{bin_cylindrical_current, BinningOptions, CurrentGrid};
use rssa::readers::RssaReader;
use rssa::source::{Particle, RssaFile, SurfaceType};
use rssa::utils::f;

// external crates
use anyhow::{bail, Result};
use clap::Parser;
use log::*;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make 'Info' the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet);

    // Try to read the RSSA binary
    info!("Reading {}", &cli.file);
    let mut reader = RssaReader::new();
    if cli.quiet {
        reader.disable_progress();
    }
    let rssa = reader.parse(Path::new(&cli.file))?;

    // Log a summary of the file parameters to the terminal for reference
    if !cli.quiet {
        print_summary(&rssa);
    }

    if cli.json {
        write_json(&rssa, &cli)?;
    }

    if cli.current {
        let grid = bin_current(&rssa, &cli)?;
        if !cli.quiet {
            println!("{grid}");
        }
        write_current(&grid, &cli)?;
    }

    Ok(())
}

/// Inspect and plot MCNP RSSA surface source files
///
/// Decodes the header and full track table of an RSSA binary, and can bin
/// cylindrical surface sources into current density maps with per-cell
/// statistical errors.
///
/// Examples
/// --------
///
///  Print a summary of the header and surfaces
///     $ rssa small_cyl.w
///
///  Convert the header data to JSON
///     $ rssa small_cyl.w --json
///
///  Bin a neutron current map over 100x360 cells
///     $ rssa small_cyl.w --current --z-bins 100 --theta-bins 360
///
///  Restrict the binned region
///     $ rssa small_cyl.w --current --z-range -200 600
///
/// Notes
/// -----
///
/// Only files written by D1SUNED with 11 values per particle record are
/// currently supported. Current maps are only defined for cylindrical
/// surface sources; the surface type is inferred from the track radii.
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    arg_required_else_help(true),
    before_help(banner()),
    after_help("Typical use: rssa small_cyl.w --current\n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("rssa <file> [options]")
)]
struct Cli {
    // * Positional
    /// Path to RSSA binary file
    #[arg(name = "file")]
    file: String,

    /// Generate a JSON file of the header ('rssa.json' default)
    #[arg(help_heading("Rssa options"))]
    #[arg(short, long)]
    json: bool,

    /// Bin a current map to JSON ('current.json' default)
    #[arg(help_heading("Current map options"))]
    #[arg(short, long)]
    current: bool,

    /// Particle type to bin, 'n' or 'p'
    #[arg(help_heading("Current map options"))]
    #[arg(short, long)]
    #[arg(value_name = "type", default_value = "n")]
    particle: String,

    /// Number of axial bins
    #[arg(help_heading("Current map options"))]
    #[arg(long, value_name = "bins", default_value_t = 10)]
    z_bins: usize,

    /// Number of circumferential bins
    #[arg(help_heading("Current map options"))]
    #[arg(long, value_name = "bins", default_value_t = 10)]
    theta_bins: usize,

    /// Source intensity the weights are scaled by (particles/s)
    #[arg(help_heading("Current map options"))]
    #[arg(long, value_name = "s^-1", default_value_t = 1.0)]
    intensity: f64,

    /// Only bin tracks with min < z < max
    #[arg(help_heading("Current map options"))]
    #[arg(long, num_args = 2, value_names = ["min", "max"])]
    #[arg(allow_negative_numbers = true)]
    z_range: Option<Vec<f64>>,

    /// Only bin tracks with min < perimeter < max
    #[arg(help_heading("Current map options"))]
    #[arg(long, num_args = 2, value_names = ["min", "max"])]
    #[arg(allow_negative_numbers = true)]
    perimeter_range: Option<Vec<f64>>,

    /// Name of output files (excl. extension)
    ///
    /// Defaults to `rssa.json` and `current.json`, and will automatically
    /// set the relevant extension.
    #[arg(help_heading("Rssa options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    output: Option<String>,

    // * Flags
    /// Verbose logging (-v, -vv)
    ///
    /// If specified, the default log level of INFO is increased to DEBUG (-v)
    /// or TRACE (-vv). Errors and Warnings are always logged unless in quiet
    /// (-q) mode.
    #[arg(short, long)]
    #[arg(action = clap::ArgAction::Count)]
    verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

/// Sets up logging at runtime to allow for multiple verbosity levels
#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) {
    stderrlog::new()
        .modules(vec![module_path!()])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
        .unwrap();
}

/// Creates a banner for the command line
#[doc(hidden)]
fn banner() -> String {
    let mut s = f!("{:-<1$}\n", "", 70);
    s += &f!("{:^70}\n", "Rssa :: Surface Source Inspector");
    s += &f!("{:-<1$}", "", 70);
    s
}

#[doc(hidden)]
/// Helper function for cleaning up file IO boilerplate
fn get_writer(path: &str) -> Result<BufWriter<File>> {
    let file: File = File::create(path)?;
    debug!("New bufwriter for {path}");
    Ok(BufWriter::new(file))
}

#[doc(hidden)]
/// Write summary of the file to the terminal
fn print_summary(rssa: &RssaFile) {
    println!("{rssa}");

    // surface parameter lists can run long, so wrap them for the terminal
    for surface in &rssa.parameters.surfaces {
        println!("{}", textwrap::fill(&f!("{surface}"), 70));
    }
}

#[doc(hidden)]
/// Write the decoded header parameters and surfaces to json
fn write_json(rssa: &RssaFile, cli: &Cli) -> Result<()> {
    let output = match &cli.output {
        Some(o) => f!("{o}.json"),
        None => "rssa.json".to_string(),
    };

    debug!("Writing JSON format to {}", output);
    let writer = get_writer(&output)?;
    Ok(serde_json::to_writer_pretty(writer, &rssa.parameters)?)
}

#[doc(hidden)]
/// Bin the requested current map, refusing non-cylindrical sources
fn bin_current(rssa: &RssaFile, cli: &Cli) -> Result<CurrentGrid> {
    match rssa.surface_type() {
        SurfaceType::Cylindrical => (),
        other => bail!("the RSSA contains a {other} surface set, only cylinders can be binned"),
    }

    let options = BinningOptions {
        particle: Particle::try_from(cli.particle.as_str())?,
        z_bins: cli.z_bins,
        theta_bins: cli.theta_bins,
        source_intensity: cli.intensity,
        z_range: range_pair(&cli.z_range),
        perimeter_range: range_pair(&cli.perimeter_range),
    };

    Ok(bin_cylindrical_current(rssa, &options)?)
}

#[doc(hidden)]
/// Clap collects two-value ranges as vectors, the binner wants tuples
fn range_pair(range: &Option<Vec<f64>>) -> Option<(f64, f64)> {
    range.as_ref().map(|r| (r[0], r[1]))
}

#[doc(hidden)]
/// Write the binned grids and their geometry to json
fn write_current(grid: &CurrentGrid, cli: &Cli) -> Result<()> {
    let output = match &cli.output {
        Some(o) => f!("{o}_current.json"),
        None => "current.json".to_string(),
    };

    debug!("Writing JSON format to {}", output);
    let writer = get_writer(&output)?;
    Ok(serde_json::to_writer_pretty(writer, grid)?)
}
