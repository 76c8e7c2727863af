//! High-level, ergonomic library API: file-to-file entry points for white balance,
//! no-data masking, raster footprints and shapefile export. Prefer these over the
//! low-level `core` and `io` modules when integrating geostretch.
use std::path::Path;

use gdal::Dataset;
use tracing::info;

use crate::core::params::WhiteBalanceParams;
use crate::core::processing::nodata::apply_nodata_mask;
use crate::core::processing::white_balance::apply_white_balance;
use crate::error::Result;
use crate::geo::{CrsRegistry, dataset_bounds_lonlat};
use crate::io::raster::{max_pixel_across_rgb, read_band_as_matrix, write_matrix_to_new_raster};
use crate::io::vector::{ExportReport, export_points_to_shapefile};
use crate::types::LonLatBounds;

/// Percentile contrast stretch of an RGB(N) raster into a 3-band 8-bit GeoTIFF
pub fn white_balance_to_path(input: &Path, output: &Path, params: &WhiteBalanceParams) -> Result<()> {
    apply_white_balance(input, output, params)
}

/// Mask band 1 of `input` with the no-data cells of `reference` and write the
/// result as a single-band Int32 GeoTIFF georeferenced like `reference`.
pub fn mask_nodata_to_path(reference: &Path, input: &Path, output: &Path) -> Result<()> {
    let matrix = read_band_as_matrix(input)?;
    let masked = apply_nodata_mask(reference, matrix)?;
    write_matrix_to_new_raster(output, &masked, reference)?;
    info!("No-data mask from {:?} applied to {:?} -> {:?}", reference, input, output);
    Ok(())
}

/// Geographic footprint of a raster file, northwest corner first
pub fn raster_bounds(path: &Path, registry: &CrsRegistry) -> Result<LonLatBounds> {
    let dataset = Dataset::open(path)?;
    dataset_bounds_lonlat(&dataset, registry)
}

/// Largest red/green/blue sample of a raster, with its width and height
pub fn max_pixel(path: &Path) -> Result<(i32, usize, usize)> {
    max_pixel_across_rgb(path)
}

/// GeoJSON points (WGS84) to a SIRGAS2000 / UTM-24S shapefile
pub fn geojson_to_shapefile(
    input: &Path,
    output: &Path,
    registry: &CrsRegistry,
) -> Result<ExportReport> {
    export_points_to_shapefile(input, output, registry)
}
