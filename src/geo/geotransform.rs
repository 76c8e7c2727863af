//! Affine pixel <-> map coordinate model and the footprint conversions built on it.
//!
//! Coefficients follow the GDAL ordering
//! `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`:
//!
//! ```text
//! X = origin_x + col * pixel_width + row * row_rotation
//! Y = origin_y + col * col_rotation + row * pixel_height
//! ```
use gdal::Dataset;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::crs::{self, CrsRegistry};
use crate::types::{LonLatBounds, Point};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Axis-aligned transform (rotation terms zero)
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height,
        }
    }

    pub fn from_gdal(gt: [f64; 6]) -> Self {
        Self {
            origin_x: gt[0],
            pixel_width: gt[1],
            row_rotation: gt[2],
            origin_y: gt[3],
            col_rotation: gt[4],
            pixel_height: gt[5],
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Reject transforms with a zero or non-finite pixel size
    pub fn validate(&self) -> Result<Self> {
        let gt = self.to_gdal();
        let degenerate = self.pixel_width == 0.0
            || self.pixel_height == 0.0
            || gt.iter().any(|v| !v.is_finite());
        if degenerate {
            return Err(Error::DegenerateGeoTransform(gt));
        }
        Ok(*self)
    }

    /// Pixel/line to map coordinates
    pub fn apply(&self, col: f64, row: f64) -> Point {
        Point::new(
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Inverse transform, mapping map coordinates back to pixel/line
    pub fn invert(&self) -> Result<GeoTransform> {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;
        if det == 0.0 || !det.is_finite() {
            return Err(Error::DegenerateGeoTransform(self.to_gdal()));
        }
        let inv_det = 1.0 / det;
        Ok(GeoTransform {
            origin_x: (self.row_rotation * self.origin_y - self.origin_x * self.pixel_height)
                * inv_det,
            pixel_width: self.pixel_height * inv_det,
            row_rotation: -self.row_rotation * inv_det,
            origin_y: (-self.pixel_width * self.origin_y + self.origin_x * self.col_rotation)
                * inv_det,
            col_rotation: -self.col_rotation * inv_det,
            pixel_height: self.pixel_width * inv_det,
        })
    }

    /// Corner of the last pixel, using only the axis-aligned terms
    pub fn far_corner(&self, width: usize, height: usize) -> Point {
        Point::new(
            self.origin_x + self.pixel_width * width as f64,
            self.origin_y + self.pixel_height * height as f64,
        )
    }
}

/// Geographic footprint (degrees) of a raster, northwest corner first.
pub fn bounds_to_lonlat(
    geotransform: &GeoTransform,
    projection_ref: &str,
    width: usize,
    height: usize,
    registry: &CrsRegistry,
) -> Result<LonLatBounds> {
    let native = crs::from_projection_ref(projection_ref)?;
    let corners = [
        Point::new(geotransform.origin_x, geotransform.origin_y),
        geotransform.far_corner(width, height),
    ];
    let lonlat = crs::transform_points(&corners, &native, registry.wgs84())?;
    debug!(
        "bounds_to_lonlat: nw=({:.8}, {:.8}) se=({:.8}, {:.8})",
        lonlat[0].x, lonlat[0].y, lonlat[1].x, lonlat[1].y
    );
    Ok(LonLatBounds {
        northwest: lonlat[0],
        southeast: lonlat[1],
    })
}

/// Axis-aligned geotransform whose footprint matches the given geographic corners.
pub fn lonlat_to_geotransform(
    bounds: &LonLatBounds,
    projection_ref: &str,
    width: usize,
    height: usize,
    registry: &CrsRegistry,
) -> Result<GeoTransform> {
    if width == 0 || height == 0 {
        return Err(Error::ZeroSize { width, height });
    }
    let native = crs::from_projection_ref(projection_ref)?;
    let projected =
        crs::transform_points(&[bounds.northwest, bounds.southeast], registry.wgs84(), &native)?;
    let (nw, se) = (projected[0], projected[1]);

    GeoTransform::north_up(
        nw.x,
        nw.y,
        (se.x - nw.x) / width as f64,
        (se.y - nw.y) / height as f64,
    )
    .validate()
}

/// Footprint of an open dataset, using band 1 for the raster size
pub fn dataset_bounds_lonlat(dataset: &Dataset, registry: &CrsRegistry) -> Result<LonLatBounds> {
    let band = dataset.rasterband(1)?;
    let (width, height) = band.size();
    let gt = GeoTransform::from_gdal(dataset.geo_transform()?);
    bounds_to_lonlat(&gt, &dataset.projection(), width, height, registry)
}
