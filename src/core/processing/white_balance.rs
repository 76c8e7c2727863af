//! White balance: a per-band percentile contrast stretch into 8-bit.
//!
//! Each band is buffered in full before its cutoffs are computed, so peak memory
//! grows with `width * height` (one `f64` sample plus one sorted copy per pixel).
use std::path::Path;

use gdal::{Dataset, DriverManager};
use tracing::{debug, info};

use crate::core::params::WhiteBalanceParams;
use crate::core::processing::percentile::{percentile, sorted_copy};
use crate::error::{Error, Result};
use crate::io::raster::{
    GdalIoError, assign_color_roles, copy_geo_metadata, read_band_rows, select_band,
    write_band_rows,
};
use crate::io::staging::StagedOutput;
use crate::types::ColorRole;

/// Upper bound of the output range
pub const STRETCH_MAX: f64 = 255.0;

const RGB: [ColorRole; 3] = [ColorRole::Red, ColorRole::Green, ColorRole::Blue];

/// Low and high cutoffs of an ascending sample set.
///
/// Equal or non-finite cutoffs (NaN or infinite samples in the tails) are a
/// [`Error::DegenerateRange`].
pub fn stretch_thresholds(sorted: &[f64], params: &WhiteBalanceParams) -> Result<(f64, f64)> {
    let low = percentile(sorted, params.low_percentile())?;
    let high = percentile(sorted, params.high_percentile())?;
    if high == low || !low.is_finite() || !high.is_finite() {
        return Err(Error::DegenerateRange { low, high });
    }
    Ok((low, high))
}

/// Map `v` linearly so that `low -> 0` and `high -> 255`, clamp, truncate
#[inline]
pub fn stretch_value(v: f64, low: f64, high: f64) -> u8 {
    let stretched = (v - low) * STRETCH_MAX / (high - low);
    if stretched < 0.0 {
        0
    } else if stretched > STRETCH_MAX {
        255
    } else {
        stretched as u8
    }
}

/// Stretch one band; output keeps the input (unsorted) order
pub fn white_balance_band(samples: &[f64], params: &WhiteBalanceParams) -> Result<Vec<u8>> {
    let sorted = sorted_copy(samples);
    let (low, high) = stretch_thresholds(&sorted, params)?;
    debug!(
        "white_balance_band: n={} low={:.3} high={:.3}",
        samples.len(),
        low,
        high
    );
    Ok(samples
        .iter()
        .map(|&v| stretch_value(v, low, high))
        .collect())
}

/// White balance an already opened dataset into a new 3-band Byte GeoTIFF.
pub fn white_balance_dataset(
    dataset: &Dataset,
    output: &Path,
    params: &WhiteBalanceParams,
) -> Result<()> {
    let params = params.validated()?;
    let bands = RGB
        .iter()
        .map(|role| select_band(dataset, *role))
        .collect::<std::result::Result<Vec<_>, GdalIoError>>()?;
    let (width, height) = bands[0].size();
    for band in &bands[1..] {
        let (w, h) = band.size();
        if (w, h) != (width, height) {
            return Err(GdalIoError::DimensionMismatch(width, height, w, h).into());
        }
    }
    info!(
        "White balance: {}x{} px, cutoffs {}% / {}%",
        width,
        height,
        params.low_percentile(),
        params.high_percentile()
    );

    let staged = StagedOutput::new(output)?;
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut out = driver.create_with_band_type::<u8, _>(staged.path(), width, height, 3)?;
    copy_geo_metadata(dataset, &mut out)?;
    assign_color_roles(&out, &RGB)?;

    for (i, (band, role)) in bands.iter().zip(RGB).enumerate() {
        debug!("Stretching {} band", role);
        let samples = read_band_rows::<f64>(band)?;
        let balanced = white_balance_band(&samples, &params)?;
        let mut out_band = out.rasterband(i + 1)?;
        write_band_rows(&mut out_band, &balanced, width, height)?;
    }
    out.flush_cache()?;
    drop(out);

    staged.publish()?;
    info!("White balance written to {:?}", output);
    Ok(())
}

/// White balance the red/green/blue bands of `input` into `output`.
pub fn apply_white_balance(input: &Path, output: &Path, params: &WhiteBalanceParams) -> Result<()> {
    let dataset = Dataset::open(input)?;
    white_balance_dataset(&dataset, output, params)
}
