//! Shared types and enums used across geostretch.
//! Includes `ColorRole`, the semantic channel a raster band carries.
use gdal::raster::ColorInterpretation;
use serde::{Deserialize, Serialize};

/// Semantic channel of a raster band.
///
/// GDAL has no portable near-infrared tag, so `Nir` never matches a stored band
/// and is resolved through the fallback rule in
/// [`crate::io::raster::resolve_band_index`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum ColorRole {
    Red,
    Green,
    Blue,
    Nir,
    Undefined,
}

impl ColorRole {
    /// Role stored by GDAL for a band
    pub fn from_interpretation(ci: ColorInterpretation) -> Self {
        match ci {
            ColorInterpretation::RedBand => ColorRole::Red,
            ColorInterpretation::GreenBand => ColorRole::Green,
            ColorInterpretation::BlueBand => ColorRole::Blue,
            _ => ColorRole::Undefined,
        }
    }

    /// Tag written back to GDAL for this role
    pub fn to_interpretation(self) -> ColorInterpretation {
        match self {
            ColorRole::Red => ColorInterpretation::RedBand,
            ColorRole::Green => ColorInterpretation::GreenBand,
            ColorRole::Blue => ColorInterpretation::BlueBand,
            ColorRole::Nir | ColorRole::Undefined => ColorInterpretation::Undefined,
        }
    }
}

impl std::fmt::Display for ColorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorRole::Red => write!(f, "Red"),
            ColorRole::Green => write!(f, "Green"),
            ColorRole::Blue => write!(f, "Blue"),
            ColorRole::Nir => write!(f, "NIR"),
            ColorRole::Undefined => write!(f, "Undefined"),
        }
    }
}

/// A 2D coordinate pair; `x` is longitude/easting, `y` is latitude/northing.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geographic footprint of a raster, northwest corner first.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLatBounds {
    pub northwest: Point,
    pub southeast: Point,
}
