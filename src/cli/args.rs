use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geostretch", version, about = "geostretch CLI")]
pub struct CliArgs {
    /// Enable logging
    #[arg(long, default_value_t = false, global = true)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Percentile contrast stretch of the red/green/blue bands into an 8-bit GeoTIFF
    WhiteBalance {
        /// Input raster with red, green and blue color roles
        #[arg(short, long)]
        input: PathBuf,

        /// Output GeoTIFF (3 bands, Byte)
        #[arg(short, long)]
        output: PathBuf,

        /// Low cutoff percentile; the high cutoff is 100 minus this value
        #[arg(long)]
        percent: Option<f64>,

        /// JSON file with white balance parameters (flags take precedence)
        #[arg(long)]
        params: Option<PathBuf>,
    },

    /// Copy the -32768 no-data cells of a reference raster into another raster
    MaskNodata {
        /// Reference raster (no-data source and georeferencing)
        #[arg(short, long)]
        reference: PathBuf,

        /// Raster whose band 1 is masked
        #[arg(short, long)]
        input: PathBuf,

        /// Output GeoTIFF (1 band, Int32)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the WGS84 footprint (northwest, southeast) of a raster
    Bounds {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the largest red/green/blue sample of a raster and its size
    MaxPixel {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Export GeoJSON points to a SIRGAS2000 / UTM-24S (cm) shapefile
    GeojsonToShp {
        /// Input GeoJSON (WGS84 points)
        #[arg(short, long)]
        input: PathBuf,

        /// Output .shp path; .shx, .dbf and .prj are written alongside
        #[arg(short, long)]
        output: PathBuf,
    },
}
