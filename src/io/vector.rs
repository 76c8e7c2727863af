//! Point feature export from any OGR-readable source (GeoJSON in practice) into an
//! ESRI shapefile projected to SIRGAS2000 / UTM-24S centimeters.
use std::fs;
use std::path::{Path, PathBuf};

use gdal::vector::{
    Feature, FieldValue, Geometry, LayerAccess, LayerOptions, OGRFieldType, OGRwkbGeometryType,
};
use gdal::{Dataset, DriverManager};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::geo::crs::{self, CrsRegistry};
use crate::io::raster::GdalIoError;
use crate::io::staging::StagedOutput;
use crate::types::Point;

/// Hard limit of the dBase attribute table used by shapefiles
pub const SHAPEFILE_FIELD_NAME_LIMIT: usize = 10;

/// Files that make up a shapefile, primary first
pub const SHAPEFILE_EXTENSIONS: [&str; 4] = ["shp", "shx", "dbf", "prj"];

/// Shapefile-safe name: the first 10 characters of `name`.
///
/// Truncation can make two names collide; no de-duplication is attempted.
pub fn valid_field_name(name: &str) -> String {
    name.chars().take(SHAPEFILE_FIELD_NAME_LIMIT).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputField {
    /// Index of the field in the source layer
    pub source_index: usize,
    /// Truncated name used in the output layer
    pub name: String,
    pub field_type: OGRFieldType::Type,
}

/// Output attribute layout, fixed once per export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: Vec<OutputField>,
}

impl FieldSchema {
    pub fn from_definitions<I, S>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (S, OGRFieldType::Type)>,
        S: AsRef<str>,
    {
        let fields = definitions
            .into_iter()
            .enumerate()
            .map(|(source_index, (name, field_type))| OutputField {
                source_index,
                name: valid_field_name(name.as_ref()),
                field_type,
            })
            .collect();
        Self { fields }
    }

    pub fn from_layer<L: LayerAccess>(layer: &L) -> Self {
        Self::from_definitions(
            layer
                .defn()
                .fields()
                .map(|field| (field.name(), field.field_type())),
        )
    }

    pub fn fields(&self) -> &[OutputField] {
        &self.fields
    }

    /// Names that occur more than once after truncation
    pub fn collisions(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        let mut dup: Vec<String> = Vec::new();
        for f in &self.fields {
            if seen.contains(&f.name.as_str()) {
                if !dup.contains(&f.name) {
                    dup.push(f.name.clone());
                }
            } else {
                seen.push(&f.name);
            }
        }
        dup
    }

    fn definitions(&self) -> Vec<(&str, OGRFieldType::Type)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.field_type))
            .collect()
    }
}

/// Source attribute read with the accessor matching its declared type.
/// Null or unset values yield `None`.
fn attribute_value(
    feature: &Feature,
    field: &OutputField,
) -> std::result::Result<Option<FieldValue>, GdalIoError> {
    let idx = field.source_index;
    let value = match field.field_type {
        OGRFieldType::OFTInteger => feature.field_as_integer(idx)?.map(FieldValue::IntegerValue),
        OGRFieldType::OFTReal => feature.field_as_double(idx)?.map(FieldValue::RealValue),
        _ => feature.field_as_string(idx)?.map(FieldValue::StringValue),
    };
    Ok(value)
}

/// First vertex of a feature geometry
fn first_point(geometry: &Geometry) -> std::result::Result<Point, GdalIoError> {
    if geometry.point_count() == 0 {
        return Err(GdalIoError::UnsupportedGeometry(geometry.geometry_name()));
    }
    let (x, y, _) = geometry.get_point(0);
    Ok(Point::new(x, y))
}

/// Outcome of a shapefile export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub features_written: usize,
    pub features_skipped: usize,
    /// Every published file, ready to be handed to a packaging step
    pub files: Vec<PathBuf>,
}

/// Delete shapefile parts next to `target` left over from a previous export
/// that the new one did not produce
fn remove_stale_shapefile_parts(target: &Path, published: &[PathBuf]) {
    for ext in SHAPEFILE_EXTENSIONS.iter().chain(["cpg"].iter()) {
        let path = target.with_extension(ext);
        if published.contains(&path) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => debug!("Removed stale output {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove stale output {:?}: {}", path, e),
        }
    }
}

/// Export the point features of the first layer of `source` (WGS84 coordinates)
/// to a shapefile at `target` in SIRGAS2000 / UTM-24S centimeters.
///
/// Nothing is created when the source cannot be opened, and outputs only
/// replace existing files of the same name after the whole layer was written.
pub fn export_points_to_shapefile(
    source: &Path,
    target: &Path,
    registry: &CrsRegistry,
) -> Result<ExportReport> {
    let source_ds = Dataset::open(source)?;
    let mut source_layer = source_ds.layer(0)?;
    let schema = FieldSchema::from_layer(&source_layer);
    let collisions = schema.collisions();
    if !collisions.is_empty() {
        warn!("Truncated field names collide: {}", collisions.join(", "));
    }
    info!(
        "Exporting layer '{}' from {:?} ({} fields)",
        source_layer.name(),
        source,
        schema.fields().len()
    );

    let staged = StagedOutput::new(target)?;
    let driver = DriverManager::get_driver_by_name("ESRI Shapefile")?;
    let mut out_ds = driver.create_vector_only(staged.path())?;
    let out_layer = out_ds.create_layer(LayerOptions {
        name: &source_layer.name(),
        srs: Some(registry.sirgas2000_utm24s()),
        ty: OGRwkbGeometryType::wkbPoint,
        ..Default::default()
    })?;
    out_layer.create_defn_fields(&schema.definitions())?;

    let mut written = 0usize;
    let mut skipped = 0usize;
    for feature in source_layer.features() {
        let Some(geometry) = feature.geometry() else {
            warn!("Skipping feature {:?} without geometry", feature.fid());
            skipped += 1;
            continue;
        };
        let lonlat = first_point(geometry)?;
        let projected =
            crs::transform_point(lonlat, registry.wgs84(), registry.sirgas2000_utm24s())?;

        let mut point = Geometry::empty(OGRwkbGeometryType::wkbPoint)?;
        point.add_point_2d((projected.x, projected.y));

        let mut out_feature = Feature::new(out_layer.defn())?;
        out_feature.set_geometry(point)?;
        for (out_idx, field) in schema.fields().iter().enumerate() {
            if let Some(value) = attribute_value(&feature, field)? {
                out_feature.set_field(out_idx, &value)?;
            }
        }
        out_feature.create(&out_layer)?;
        written += 1;
    }
    drop(out_layer);
    out_ds.flush_cache()?;
    drop(out_ds);

    let files = staged.publish()?;
    remove_stale_shapefile_parts(target, &files);
    info!(
        "Shapefile {:?} written: {} feature(s), {} skipped",
        target, written, skipped
    );
    Ok(ExportReport {
        features_written: written,
        features_skipped: skipped,
        files,
    })
}

/// Legacy boolean contract: `true` when the export completed
pub fn json_to_shapefile(source: &Path, target: &Path, registry: &CrsRegistry) -> bool {
    match export_points_to_shapefile(source, target, registry) {
        Ok(_) => true,
        Err(e) => {
            warn!("Shapefile export from {:?} failed: {}", source, e);
            false
        }
    }
}
