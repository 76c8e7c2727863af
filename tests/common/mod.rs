#![allow(dead_code)]

use std::path::Path;

use gdal::raster::{Buffer, GdalType};
use gdal::{Dataset, DriverManager};
use geostretch::ColorRole;
use geostretch::geo::crs::{SIRGAS2000_UTM24S_CM, definition};

/// Axis-aligned transform inside UTM zone 24S, in centimeters
pub const SIRGAS_GT: [f64; 6] = [55_000_000.0, 1_000.0, 0.0, 960_000_000.0, 0.0, -1_000.0];

pub fn sirgas_wkt() -> &'static str {
    definition(SIRGAS2000_UTM24S_CM).unwrap()
}

fn fill<T: GdalType + Copy>(ds: &Dataset, width: usize, height: usize, bands: &[Vec<T>]) {
    for (i, data) in bands.iter().enumerate() {
        let mut band = ds.rasterband(i + 1).unwrap();
        let mut buf = Buffer::new((width, height), data.clone());
        band.write((0, 0), (width, height), &mut buf).unwrap();
    }
}

/// GeoTIFF on disk, georeferenced in SIRGAS2000 / UTM-24S
pub fn write_tiff<T: GdalType + Copy>(path: &Path, width: usize, height: usize, bands: &[Vec<T>]) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut ds = driver
        .create_with_band_type::<T, _>(path, width, height, bands.len())
        .unwrap();
    ds.set_geo_transform(&SIRGAS_GT).unwrap();
    ds.set_projection(sirgas_wkt()).unwrap();
    fill(&ds, width, height, bands);
    ds.flush_cache().unwrap();
}

/// In-memory dataset whose bands carry the given color roles
pub fn mem_dataset<T: GdalType + Copy>(
    width: usize,
    height: usize,
    bands: &[(ColorRole, Vec<T>)],
) -> Dataset {
    let driver = DriverManager::get_driver_by_name("MEM").unwrap();
    let mut ds = driver
        .create_with_band_type::<T, _>("", width, height, bands.len())
        .unwrap();
    ds.set_geo_transform(&SIRGAS_GT).unwrap();
    ds.set_projection(sirgas_wkt()).unwrap();
    for (i, (role, _)) in bands.iter().enumerate() {
        let mut band = ds.rasterband(i + 1).unwrap();
        band.set_color_interpretation(role.to_interpretation()).unwrap();
    }
    let data: Vec<Vec<T>> = bands.iter().map(|(_, d)| d.clone()).collect();
    fill(&ds, width, height, &data);
    ds
}

pub fn read_all<T: GdalType + Copy>(ds: &Dataset, index: usize) -> Vec<T> {
    let band = ds.rasterband(index).unwrap();
    let (w, h) = band.size();
    band.read_as::<T>((0, 0), (w, h), (w, h), None)
        .unwrap()
        .data()
        .to_vec()
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
