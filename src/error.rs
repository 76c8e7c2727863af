//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, GDAL and CRS errors, and provides semantic variants
//! for argument validation and numerically invalid inputs.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] crate::io::GdalIoError),

    #[error("CRS error: {0}")]
    Crs(#[from] crate::geo::CrsError),

    #[error("Failed to publish staged output: {0}")]
    Persist(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Raster dimensions must be greater than 0, got: {width}x{height}")]
    ZeroSize { width: usize, height: usize },

    #[error("Degenerate percentile range: low={low} high={high}")]
    DegenerateRange { low: f64, high: f64 },

    #[error("Degenerate geotransform: {0:?}")]
    DegenerateGeoTransform([f64; 6]),

    #[error("Processing error: {0}")]
    Processing(String),
}

impl From<gdal::errors::GdalError> for Error {
    fn from(e: gdal::errors::GdalError) -> Self {
        Error::Gdal(crate::io::GdalIoError::Gdal(e))
    }
}
