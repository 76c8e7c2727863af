#![doc = r#"
geostretch — georeferenced raster contrast stretching and raster/vector interop on GDAL.

This crate provides a small, typed API for everyday satellite/aerial image chores:
a percentile contrast stretch ("white balance") of RGB rasters into 8-bit GeoTIFFs,
no-data propagation between rasters, raster footprints in WGS84, and GeoJSON point
export to shapefiles projected to SIRGAS2000 / UTM zone 24S (centimeters).

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

White balance a raster
----------------------
```rust,no_run
use std::path::Path;
use geostretch::{white_balance_to_path, WhiteBalanceParams};

fn main() -> geostretch::Result<()> {
    let params = WhiteBalanceParams::new(0.7)?;
    white_balance_to_path(
        Path::new("/data/scene_rgbn.tif"),
        Path::new("/out/scene_balanced.tif"),
        &params,
    )
}
```

Mask no-data and export points
------------------------------
```rust,no_run
use std::path::Path;
use geostretch::{mask_nodata_to_path, geojson_to_shapefile, CrsRegistry};

fn main() -> geostretch::Result<()> {
    mask_nodata_to_path(
        Path::new("/data/dem.tif"),
        Path::new("/data/slope.tif"),
        Path::new("/out/slope_masked.tif"),
    )?;

    let registry = CrsRegistry::new()?;
    let report = geojson_to_shapefile(
        Path::new("/data/samples.geojson"),
        Path::new("/out/samples.shp"),
        &registry,
    )?;
    println!("{} features -> {:?}", report.features_written, report.files);
    Ok(())
}
```

Error handling
--------------
All public functions return `geostretch::Result<T>`; match on `geostretch::Error`
to handle specific cases such as a degenerate percentile range.

```rust,no_run
use std::path::Path;
use geostretch::{white_balance_to_path, Error, WhiteBalanceParams};

fn main() {
    let params = WhiteBalanceParams::default();
    match white_balance_to_path(Path::new("/in.tif"), Path::new("/out.tif"), &params) {
        Ok(()) => {}
        Err(Error::DegenerateRange { low, high }) => eprintln!("flat band: {low}..{high}"),
        Err(Error::Gdal(e)) => eprintln!("GDAL error: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level, file-to-file entry points.
- [`geo`] — geotransform model and CRS registry.
- [`io`] — band access, matrix read/write, shapefile export, staged outputs.
- [`core`] — percentile, white balance and no-data algorithms.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod geo;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::params::WhiteBalanceParams;
pub use crate::core::processing::nodata::NO_DATA_VALUE;
pub use error::{Error, Result};
pub use geo::{CrsRegistry, GeoTransform};
pub use types::{ColorRole, LonLatBounds, Point};

pub use api::{
    geojson_to_shapefile, mask_nodata_to_path, max_pixel, raster_bounds, white_balance_to_path,
};
pub use io::ExportReport;
