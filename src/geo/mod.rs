//! Coordinate model: the affine geotransform and the CRS reprojection adapter
//! over GDAL/PROJ.
pub mod crs;
pub use crs::{CRS_DEFINITIONS, CrsDefinition, CrsError, CrsRegistry};

pub mod geotransform;
pub use geotransform::{GeoTransform, bounds_to_lonlat, dataset_bounds_lonlat, lonlat_to_geotransform};
