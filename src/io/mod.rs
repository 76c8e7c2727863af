//! I/O layer over GDAL: raster band access by color role, row-streamed matrix
//! read/write, point export to shapefiles, and staged (atomic) outputs.
pub mod raster;
pub use raster::{GdalIoError, copy_geo_metadata, read_band_as_matrix, select_band};

pub mod staging;
pub use staging::StagedOutput;

pub mod vector;
pub use vector::{ExportReport, FieldSchema, export_points_to_shapefile, valid_field_name};
