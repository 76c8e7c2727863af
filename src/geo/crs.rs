use gdal::errors::GdalError as GdalCrateError;
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use thiserror::Error;
use tracing::debug;

use crate::types::Point;

/// Errors raised while building CRS descriptors or transforming coordinates
#[derive(Debug, Error)]
pub enum CrsError {
    #[error("Invalid CRS definition for {name}: {source}")]
    InvalidDefinition {
        name: String,
        #[source]
        source: GdalCrateError,
    },
    #[error("Unknown CRS name: {0}")]
    Unknown(String),
    #[error("Coordinate transform failed: {0}")]
    Transform(#[from] GdalCrateError),
    #[error("Transform produced non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// Named entry of the CRS configuration table
#[derive(Debug, Clone, Copy)]
pub struct CrsDefinition {
    pub name: &'static str,
    pub definition: &'static str,
}

pub const WGS84: &str = "WGS84";
pub const SIRGAS2000_UTM24S_CM: &str = "SIRGAS2000_UTM24S_CM";

/// SIRGAS2000 / UTM zone 24S expressed in centimeters. The false easting and
/// northing are scaled up so that every coordinate of the zone stays positive.
const SIRGAS2000_UTM24S_CM_WKT: &str = concat!(
    "PROJCS[\"UTM_Zone_24_Southern_Hemisphere\",",
    "GEOGCS[\"GCS_GRS 1980(IUGG, 1980)\",DATUM[\"unknown\",SPHEROID[\"GRS80\",6378137,298.257222101]],",
    "PRIMEM[\"Greenwich\",0],UNIT[\"Degree\",0.017453292519943295]],",
    "PROJECTION[\"Transverse_Mercator\"],",
    "PARAMETER[\"latitude_of_origin\",0],",
    "PARAMETER[\"central_meridian\",-39],",
    "PARAMETER[\"scale_factor\",0.9996],",
    "PARAMETER[\"false_easting\",50000000],",
    "PARAMETER[\"false_northing\",1000000000],",
    "UNIT[\"Centimeter\",0.01]]"
);

/// Every CRS the crate knows by name. Add new systems here only.
pub const CRS_DEFINITIONS: &[CrsDefinition] = &[
    CrsDefinition {
        name: WGS84,
        definition: "+proj=longlat +datum=WGS84 +no_defs",
    },
    CrsDefinition {
        name: SIRGAS2000_UTM24S_CM,
        definition: SIRGAS2000_UTM24S_CM_WKT,
    },
];

/// Look up a definition string in the configuration table
pub fn definition(name: &str) -> Option<&'static str> {
    CRS_DEFINITIONS
        .iter()
        .find(|d| d.name == name)
        .map(|d| d.definition)
}

/// Parse a WKT or PROJ definition into a descriptor with x=lon/easting, y=lat/northing
pub fn parse_definition(name: &str, def: &str) -> Result<SpatialRef, CrsError> {
    let mut srs = SpatialRef::from_definition(def).map_err(|source| CrsError::InvalidDefinition {
        name: name.to_string(),
        source,
    })?;
    srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    Ok(srs)
}

/// Descriptor for a raster's own projection reference (WKT as stored by GDAL)
pub fn from_projection_ref(projection_ref: &str) -> Result<SpatialRef, CrsError> {
    parse_definition("raster projection", projection_ref)
}

/// Transform one point between two descriptors
pub fn transform_point(point: Point, from: &SpatialRef, to: &SpatialRef) -> Result<Point, CrsError> {
    let ct = CoordTransform::new(from, to)?;
    let (mut x, mut y, mut z) = ([point.x], [point.y], [0.0_f64]);
    ct.transform_coords(&mut x, &mut y, &mut z)?;
    finite_point(x[0], y[0])
}

/// Transform a batch of points between two descriptors
pub fn transform_points(
    points: &[Point],
    from: &SpatialRef,
    to: &SpatialRef,
) -> Result<Vec<Point>, CrsError> {
    let ct = CoordTransform::new(from, to)?;
    let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let mut ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let mut zs = vec![0.0_f64; points.len()];
    ct.transform_coords(&mut xs, &mut ys, &mut zs)?;

    xs.into_iter()
        .zip(ys)
        .map(|(x, y)| finite_point(x, y))
        .collect()
}

fn finite_point(x: f64, y: f64) -> Result<Point, CrsError> {
    if x.is_finite() && y.is_finite() {
        Ok(Point::new(x, y))
    } else {
        Err(CrsError::NonFinite { x, y })
    }
}

/// Process-wide CRS descriptors, parsed once and read-only afterwards.
///
/// Every entry of [`CRS_DEFINITIONS`] is parsed at construction, which fails
/// fast when one does not parse, so operations sharing the registry never see a
/// half-initialized descriptor.
pub struct CrsRegistry {
    descriptors: Vec<(&'static str, SpatialRef)>,
    wgs84: usize,
    sirgas2000_utm24s: usize,
}

impl CrsRegistry {
    pub fn new() -> Result<Self, CrsError> {
        let descriptors = CRS_DEFINITIONS
            .iter()
            .map(|d| Ok((d.name, parse_definition(d.name, d.definition)?)))
            .collect::<Result<Vec<_>, CrsError>>()?;
        let position = |name: &str| {
            descriptors
                .iter()
                .position(|(n, _)| *n == name)
                .ok_or_else(|| CrsError::Unknown(name.to_string()))
        };
        let wgs84 = position(WGS84)?;
        let sirgas2000_utm24s = position(SIRGAS2000_UTM24S_CM)?;
        debug!("CRS registry initialized ({} definitions)", descriptors.len());
        Ok(Self {
            descriptors,
            wgs84,
            sirgas2000_utm24s,
        })
    }

    pub fn wgs84(&self) -> &SpatialRef {
        &self.descriptors[self.wgs84].1
    }

    pub fn sirgas2000_utm24s(&self) -> &SpatialRef {
        &self.descriptors[self.sirgas2000_utm24s].1
    }

    /// Names of the registered systems, in table order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|(name, _)| *name)
    }

    /// Descriptor by table name
    pub fn get(&self, name: &str) -> Result<&SpatialRef, CrsError> {
        self.descriptors
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, srs)| srs)
            .ok_or_else(|| CrsError::Unknown(name.to_string()))
    }

    /// Longitude/latitude in degrees to SIRGAS2000 / UTM-24S centimeters
    pub fn wgs84_to_sirgas2000(&self, x: f64, y: f64) -> Result<Point, CrsError> {
        transform_point(Point::new(x, y), self.wgs84(), self.sirgas2000_utm24s())
    }

    /// SIRGAS2000 / UTM-24S centimeters to longitude/latitude in degrees
    pub fn sirgas2000_to_wgs84(&self, x: f64, y: f64) -> Result<Point, CrsError> {
        transform_point(Point::new(x, y), self.sirgas2000_utm24s(), self.wgs84())
    }
}
