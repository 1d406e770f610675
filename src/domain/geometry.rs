//! Geometry primitives shared by every layer
//!
//! [`GeometryKind`] is fixed for the lifetime of an export session and drives
//! ring grouping, JSON type tags and the Shapefile shape type.

use super::errors::GeoExportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A coordinate pair, `[x, y]`
pub type Point = [f64; 2];

/// An open or closed sequence of coordinates
pub type Path = Vec<Point>;

/// Kind of geometry held by a dataset
///
/// Adding a variant here forces every `match` on ring grouping and type tags
/// to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    /// Closed rings grouped into polygons (outer ring plus holes)
    Polygon,
    /// Open paths
    Polyline,
}

impl GeometryKind {
    /// Type tag used by the JSON family of formats
    pub fn json_type(&self) -> &'static str {
        match self {
            GeometryKind::Polygon => "MultiPolygon",
            GeometryKind::Polyline => "MultiLineString",
        }
    }

    /// ESRI Shapefile shape type code
    pub fn shape_type(&self) -> i32 {
        match self {
            GeometryKind::Polygon => 5,
            GeometryKind::Polyline => 3,
        }
    }

    /// Configuration spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Polygon => "polygon",
            GeometryKind::Polyline => "polyline",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = GeoExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polygon" => Ok(GeometryKind::Polygon),
            "polyline" => Ok(GeometryKind::Polyline),
            other => Err(GeoExportError::Configuration(format!(
                "unexpected geometry type: '{other}'. Must be one of: polygon, polyline"
            ))),
        }
    }
}

/// Output format of one export request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Feature collection with coordinates inlined (`.geojson`)
    GeoJson,
    /// Shared-arc topology (`.topojson`)
    TopoJson,
    /// `.shp` + `.shx` pair bundled into a `.zip`
    Shapefile,
}

impl ExportFormat {
    /// Every supported format, in the order the CLI exports them
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::GeoJson,
        ExportFormat::TopoJson,
        ExportFormat::Shapefile,
    ];

    /// Extension of the delivered file
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::TopoJson => "topojson",
            ExportFormat::Shapefile => "zip",
        }
    }

    /// Whether this format can encode the given geometry kind
    pub fn supports(&self, kind: GeometryKind) -> bool {
        !matches!(
            (self, kind),
            (ExportFormat::TopoJson, GeometryKind::Polyline)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::TopoJson => "topojson",
            ExportFormat::Shapefile => "shapefile",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "geojson" | "json" => Ok(ExportFormat::GeoJson),
            "topojson" => Ok(ExportFormat::TopoJson),
            "shapefile" | "shp" | "zip" => Ok(ExportFormat::Shapefile),
            other => Err(format!(
                "Unknown export format '{other}'. Must be one of: geojson, topojson, shapefile"
            )),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Bounds {
    /// Bounds of a single point
    pub fn from_point(p: Point) -> Self {
        Self {
            xmin: p[0],
            ymin: p[1],
            xmax: p[0],
            ymax: p[1],
        }
    }

    /// Bounds of a set of points, `None` when empty
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Bounds::from_point(*iter.next()?);
        for p in iter {
            bounds.extend_point(*p);
        }
        Some(bounds)
    }

    pub fn extend_point(&mut self, p: Point) {
        self.xmin = self.xmin.min(p[0]);
        self.ymin = self.ymin.min(p[1]);
        self.xmax = self.xmax.max(p[0]);
        self.ymax = self.ymax.max(p[1]);
    }

    pub fn merge(&mut self, other: &Bounds) {
        self.xmin = self.xmin.min(other.xmin);
        self.ymin = self.ymin.min(other.ymin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymax = self.ymax.max(other.ymax);
    }

    /// Whether `other` lies entirely inside these bounds (edges inclusive)
    pub fn contains(&self, other: &Bounds) -> bool {
        other.xmin >= self.xmin
            && other.xmax <= self.xmax
            && other.ymin >= self.ymin
            && other.ymax <= self.ymax
    }

    /// `[xmin, ymin, xmax, ymax]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }

    /// Builds bounds from `[xmin, ymin, xmax, ymax]`, rejecting inverted or non-finite boxes
    pub fn try_from_array(values: [f64; 4]) -> Result<Self, String> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(format!("bounds must be finite, got {values:?}"));
        }
        let [xmin, ymin, xmax, ymax] = values;
        if xmin > xmax || ymin > ymax {
            return Err(format!(
                "bounds must be [xmin, ymin, xmax, ymax] with min <= max, got {values:?}"
            ));
        }
        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_kind_from_str() {
        assert_eq!(
            GeometryKind::from_str("polygon").unwrap(),
            GeometryKind::Polygon
        );
        assert_eq!(
            GeometryKind::from_str("polyline").unwrap(),
            GeometryKind::Polyline
        );
        let err = GeometryKind::from_str("point").unwrap_err();
        assert!(matches!(err, GeoExportError::Configuration(_)));
    }

    #[test]
    fn test_geometry_kind_tags() {
        assert_eq!(GeometryKind::Polygon.json_type(), "MultiPolygon");
        assert_eq!(GeometryKind::Polygon.shape_type(), 5);
        assert_eq!(GeometryKind::Polyline.json_type(), "MultiLineString");
        assert_eq!(GeometryKind::Polyline.shape_type(), 3);
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!(
            ExportFormat::from_str("GeoJSON").unwrap(),
            ExportFormat::GeoJson
        );
        assert_eq!(
            ExportFormat::from_str("shp").unwrap(),
            ExportFormat::Shapefile
        );
        assert!(ExportFormat::from_str("kml").is_err());
    }

    #[test]
    fn test_export_format_support_matrix() {
        assert!(ExportFormat::TopoJson.supports(GeometryKind::Polygon));
        assert!(!ExportFormat::TopoJson.supports(GeometryKind::Polyline));
        assert!(ExportFormat::GeoJson.supports(GeometryKind::Polyline));
        assert!(ExportFormat::Shapefile.supports(GeometryKind::Polyline));
    }

    #[test]
    fn test_bounds_from_points() {
        let pts = vec![[1.0, 5.0], [-2.0, 3.0], [4.0, -1.0]];
        let b = Bounds::from_points(&pts).unwrap();
        assert_eq!(b.to_array(), [-2.0, -1.0, 4.0, 5.0]);
        assert!(Bounds::from_points(&Vec::<Point>::new()).is_none());
    }

    #[test]
    fn test_bounds_contains() {
        let outer = Bounds::try_from_array([0.0, 0.0, 10.0, 10.0]).unwrap();
        let inner = Bounds::try_from_array([2.0, 2.0, 3.0, 3.0]).unwrap();
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_bounds_rejects_inverted() {
        assert!(Bounds::try_from_array([1.0, 0.0, 0.0, 1.0]).is_err());
        assert!(Bounds::try_from_array([0.0, f64::NAN, 1.0, 1.0]).is_err());
    }
}
