use std::path::Path;

use gdal::raster::{Buffer, GdalType, RasterBand};
use gdal::{Dataset, DriverManager, Metadata, errors::GdalError as GdalCrateError};
use ndarray::{Array2, ArrayView1};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::io::staging::StagedOutput;
use crate::types::ColorRole;

/// Errors encountered when accessing rasters and vectors through GDAL
#[derive(Debug, Error)]
pub enum GdalIoError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Band {index} is not available in {path}")]
    MissingBand { path: String, index: usize },
    #[error("Expected {expected} bands, found {found}")]
    InvalidBandCount { expected: &'static str, found: usize },
    #[error("Dimension mismatch: expected {0}x{1}, got {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),
    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),
}

/// Band used when no band carries the requested color role.
///
/// Callers that rely on it must check beforehand that the dataset really has a
/// band 4 holding the wanted channel (typically near-infrared).
pub const FALLBACK_BAND: usize = 4;

/// Bands inspected by the role lookup, in resolution order
pub const ROLE_SCAN_BANDS: usize = 4;

/// Resolve a color role to a 1-based band index.
///
/// `roles[i]` is the role stored on band `i + 1`. Bands are scanned in order and
/// the first match wins; when none of the first [`ROLE_SCAN_BANDS`] bands match,
/// [`FALLBACK_BAND`] is returned.
pub fn resolve_band_index(roles: &[ColorRole], wanted: ColorRole) -> usize {
    roles
        .iter()
        .take(ROLE_SCAN_BANDS)
        .enumerate()
        .map(|(i, role)| (*role, i + 1))
        .find(|(role, _)| *role == wanted)
        .map(|(_, index)| index)
        .unwrap_or(FALLBACK_BAND)
}

/// Stored color roles of the bands considered by the role lookup
pub fn band_roles(dataset: &Dataset) -> std::result::Result<Vec<ColorRole>, GdalIoError> {
    let count = (dataset.raster_count() as usize).min(ROLE_SCAN_BANDS);
    (1..=count)
        .map(|i| {
            let band = dataset.rasterband(i)?;
            Ok(ColorRole::from_interpretation(band.color_interpretation()))
        })
        .collect()
}

/// Band holding `role` in a 3- or 4-band dataset, following [`resolve_band_index`]
pub fn select_band(
    dataset: &Dataset,
    role: ColorRole,
) -> std::result::Result<RasterBand<'_>, GdalIoError> {
    let count = dataset.raster_count() as usize;
    if count < 3 {
        return Err(GdalIoError::InvalidBandCount {
            expected: "3 or 4",
            found: count,
        });
    }
    let index = resolve_band_index(&band_roles(dataset)?, role);
    if index > count {
        return Err(GdalIoError::MissingBand {
            path: dataset_description(dataset),
            index,
        });
    }
    debug!("select_band: {} -> band {}", role, index);
    Ok(dataset.rasterband(index)?)
}

fn dataset_description(dataset: &Dataset) -> String {
    dataset
        .description()
        .unwrap_or_else(|_| "<dataset>".to_string())
}

/// Copy geotransform and projection; pixel data, band count and type are untouched
pub fn copy_geo_metadata(
    source: &Dataset,
    destination: &mut Dataset,
) -> std::result::Result<(), GdalIoError> {
    match source.geo_transform() {
        Ok(gt) => destination.set_geo_transform(&gt)?,
        Err(e) => warn!(
            "{} has no geotransform, output is not georeferenced: {}",
            dataset_description(source),
            e
        ),
    }
    let projection = source.projection();
    if projection.is_empty() {
        warn!("{} has no projection", dataset_description(source));
    } else {
        destination.set_projection(&projection)?;
    }
    Ok(())
}

/// Tag bands 1..=n of `dataset` with the given roles, in order
pub fn assign_color_roles(
    dataset: &Dataset,
    roles: &[ColorRole],
) -> std::result::Result<(), GdalIoError> {
    for (i, role) in roles.iter().enumerate() {
        let mut band = dataset.rasterband(i + 1)?;
        band.set_color_interpretation(role.to_interpretation())?;
    }
    Ok(())
}

/// Read one scanline
pub fn read_row<T: GdalType + Copy>(
    band: &RasterBand,
    row: usize,
    width: usize,
) -> std::result::Result<Vec<T>, GdalIoError> {
    let buf = band.read_as::<T>((0, row as isize), (width, 1), (width, 1), None)?;
    Ok(buf.data().to_vec())
}

/// Read a whole band, one scanline at a time, into a row-major vector
pub fn read_band_rows<T: GdalType + Copy>(
    band: &RasterBand,
) -> std::result::Result<Vec<T>, GdalIoError> {
    let (width, height) = band.size();
    let mut out = Vec::with_capacity(width * height);
    for row in 0..height {
        out.extend(read_row::<T>(band, row, width)?);
    }
    Ok(out)
}

/// Write a row-major buffer one scanline at a time
pub fn write_band_rows<T: GdalType + Copy>(
    band: &mut RasterBand,
    data: &[T],
    width: usize,
    height: usize,
) -> std::result::Result<(), GdalIoError> {
    if data.len() != width * height {
        return Err(GdalIoError::DimensionMismatch(
            width,
            height,
            data.len(),
            1,
        ));
    }
    for (row, line) in data.chunks(width.max(1)).enumerate() {
        let mut buf = Buffer::new((width, 1), line.to_vec());
        band.write((0, row as isize), (width, 1), &mut buf)?;
    }
    Ok(())
}

fn open_with_band1(path: &Path) -> Result<Dataset> {
    let dataset = Dataset::open(path)?;
    if dataset.raster_count() < 1 {
        return Err(GdalIoError::MissingBand {
            path: path.display().to_string(),
            index: 1,
        }
        .into());
    }
    Ok(dataset)
}

/// Width and height of band 1
pub fn image_size(path: &Path) -> Result<(usize, usize)> {
    let dataset = open_with_band1(path)?;
    let band = dataset.rasterband(1)?;
    Ok(band.size())
}

/// Band 1 of a raster as a `(height, width)` f32 matrix
pub fn read_band_as_matrix(path: &Path) -> Result<Array2<f32>> {
    let dataset = open_with_band1(path)?;
    let band = dataset.rasterband(1)?;
    let (width, height) = band.size();
    let mut matrix = Array2::<f32>::zeros((height, width));
    for row in 0..height {
        let line = read_row::<f32>(&band, row, width)?;
        matrix.row_mut(row).assign(&ArrayView1::from(&line[..]));
    }
    debug!("read_band_as_matrix: {:?} ({}x{})", path, width, height);
    Ok(matrix)
}

/// Write `matrix` as a new single-band Int32 GeoTIFF georeferenced like `reference_path`.
///
/// Values are truncated toward zero. The file appears at `path` only once it is
/// complete.
pub fn write_matrix_to_new_raster(
    path: &Path,
    matrix: &Array2<f32>,
    reference_path: &Path,
) -> Result<()> {
    let (height, width) = matrix.dim();
    if width == 0 || height == 0 {
        return Err(Error::ZeroSize { width, height });
    }
    let reference = Dataset::open(reference_path)?;

    let staged = StagedOutput::new(path)?;
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut ds = driver.create_with_band_type::<i32, _>(staged.path(), width, height, 1)?;
    copy_geo_metadata(&reference, &mut ds)?;
    drop(reference);

    let mut band = ds.rasterband(1)?;
    for (row, line) in matrix.rows().into_iter().enumerate() {
        let mut buf = Buffer::new((width, 1), line.iter().map(|v| *v as i32).collect());
        band.write((0, row as isize), (width, 1), &mut buf)?;
    }
    drop(band);
    ds.flush_cache()?;
    drop(ds);

    staged.publish()?;
    info!("write_matrix_to_new_raster: {:?} ({}x{}) written", path, width, height);
    Ok(())
}

/// Largest red/green/blue sample of an open dataset, with its size
pub fn max_pixel_in_dataset(dataset: &Dataset) -> Result<(i32, usize, usize)> {
    let red = select_band(dataset, ColorRole::Red)?;
    let green = select_band(dataset, ColorRole::Green)?;
    let blue = select_band(dataset, ColorRole::Blue)?;
    let (width, height) = red.size();
    for band in [&green, &blue] {
        let (w, h) = band.size();
        if (w, h) != (width, height) {
            return Err(GdalIoError::DimensionMismatch(width, height, w, h).into());
        }
    }

    let mut max_value = i32::MIN;
    for row in 0..height {
        for band in [&red, &green, &blue] {
            let line = read_row::<i16>(band, row, width)?;
            if let Some(m) = line.iter().copied().max() {
                max_value = max_value.max(m as i32);
            }
        }
    }
    Ok((max_value, width, height))
}

/// Largest red/green/blue sample of an RGB(N) raster file, with its size
pub fn max_pixel_across_rgb(path: &Path) -> Result<(i32, usize, usize)> {
    let dataset = Dataset::open(path)?;
    let result = max_pixel_in_dataset(&dataset)?;
    info!(
        "max_pixel_across_rgb: {:?} max={} size={}x{}",
        path, result.0, result.1, result.2
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorRole::*;

    #[test]
    fn first_matching_band_wins() {
        assert_eq!(resolve_band_index(&[Undefined, Red, Green, Blue], Red), 2);
        assert_eq!(resolve_band_index(&[Red, Green, Blue], Blue), 3);
        assert_eq!(resolve_band_index(&[Red, Red, Blue], Red), 1);
    }

    #[test]
    fn unmatched_role_falls_back_to_band_four() {
        assert_eq!(resolve_band_index(&[Undefined, Red, Green, Blue], Nir), 4);
        assert_eq!(resolve_band_index(&[Red, Green, Blue], Nir), FALLBACK_BAND);
        assert_eq!(resolve_band_index(&[], Red), FALLBACK_BAND);
    }

    #[test]
    fn missing_source_geotransform_is_skipped() {
        let driver = DriverManager::get_driver_by_name("MEM").unwrap();
        let source = driver.create_with_band_type::<u8, _>("", 2, 2, 1).unwrap();
        let mut destination = driver.create_with_band_type::<u8, _>("", 2, 2, 1).unwrap();
        let gt = [10.0, 1.0, 0.0, 20.0, 0.0, -1.0];
        destination.set_geo_transform(&gt).unwrap();

        copy_geo_metadata(&source, &mut destination).unwrap();
        assert_eq!(destination.geo_transform().unwrap(), gt);
        assert!(destination.projection().is_empty());
    }

    #[test]
    fn only_first_four_bands_are_scanned() {
        let roles = [Undefined, Undefined, Undefined, Undefined, Red];
        assert_eq!(resolve_band_index(&roles, Red), FALLBACK_BAND);
    }
}
