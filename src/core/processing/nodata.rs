use std::path::Path;

use gdal::Dataset;
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Zip};
use tracing::debug;

use crate::error::Result;
use crate::io::raster::{GdalIoError, read_row};

/// Sample value meaning "no measurement" in every raster this crate handles
pub const NO_DATA_VALUE: f32 = i16::MIN as f32;

/// Copy the sentinel from `reference` into `target` wherever the reference has it
pub fn mask_row(reference: ArrayView1<f32>, target: ArrayViewMut1<f32>) {
    Zip::from(reference).and(target).for_each(|r, t| {
        if *r == NO_DATA_VALUE {
            *t = NO_DATA_VALUE;
        }
    });
}

/// In-memory variant of [`apply_nodata_mask`]
pub fn mask_with_reference(reference: &Array2<f32>, target: &mut Array2<f32>) -> Result<()> {
    let (rh, rw) = reference.dim();
    let (th, tw) = target.dim();
    if (rh, rw) != (th, tw) {
        return Err(GdalIoError::DimensionMismatch(rw, rh, tw, th).into());
    }
    for (r, t) in reference.rows().into_iter().zip(target.rows_mut()) {
        mask_row(r, t);
    }
    Ok(())
}

/// Propagate no-data cells of band 1 of `reference_path` into `target`.
///
/// The reference is streamed one scanline at a time.
pub fn apply_nodata_mask(reference_path: &Path, mut target: Array2<f32>) -> Result<Array2<f32>> {
    let dataset = Dataset::open(reference_path)?;
    if dataset.raster_count() < 1 {
        return Err(GdalIoError::MissingBand {
            path: reference_path.display().to_string(),
            index: 1,
        }
        .into());
    }
    let band = dataset.rasterband(1)?;
    let (width, height) = band.size();
    let (th, tw) = target.dim();
    if (width, height) != (tw, th) {
        return Err(GdalIoError::DimensionMismatch(width, height, tw, th).into());
    }

    for (row, t) in target.rows_mut().into_iter().enumerate() {
        let line = read_row::<f32>(&band, row, width)?;
        mask_row(ArrayView1::from(&line[..]), t);
    }
    debug!("apply_nodata_mask: {:?} ({}x{})", reference_path, width, height);
    Ok(target)
}
